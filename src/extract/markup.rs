// src/extract/markup.rs
// =============================================================================
// This module extracts tokens and links from an HTML page.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Never fails: malformed markup is repaired the way a browser would,
//   so a broken page still yields partial results
//
// Token sources on a page:
// - Visible text (anything not inside <script>, <style> or <template>)
// - Every attribute value on <meta>, <input>, <select>, <textarea>
// - href/src of <a>, <link>, <script>, <img>, resolved and split like a URL
// - Variable declarations inside inline <script> blocks
//
// Link sources: only <a href>. Links are resolved against the page URL,
// limited to http/https, stripped of fragments and deduplicated per page.
// =============================================================================

use scraper::{ElementRef, Html};
use std::collections::HashSet;
use url::Url;

use super::script::extract_script_tokens;
use super::tokenize_into;
use super::urls::{add_url_tokens, normalize_url};

// Elements whose text content is never rendered
const HIDDEN_ELEMENTS: [&str; 3] = ["script", "style", "template"];

// Form and metadata elements whose attribute values are all tokenized
const ATTRIBUTE_ELEMENTS: [&str; 4] = ["meta", "input", "select", "textarea"];

// Elements whose href/src is turned into URL tokens
const RESOURCE_ELEMENTS: [&str; 4] = ["a", "link", "script", "img"];

// Everything we learned from one fetched page
#[derive(Debug, Default)]
pub struct Page {
    /// Raw (unfiltered) tokens found on the page
    pub words: HashSet<String>,
    /// Absolute http(s) links from anchors, in document order, no duplicates
    pub links: Vec<String>,
}

// Parses `html` and extracts tokens and links
//
// Parameters:
//   html: the response body
//   page_url: the URL the body was fetched from (for resolving relative links)
pub fn extract_page(html: &str, page_url: &Url) -> Page {
    let document = Html::parse_document(html);
    let mut page = Page::default();
    let mut seen_links = HashSet::new();

    for node in document.root_element().descendants() {
        if let Some(text) = node.value().as_text() {
            let hidden = node.ancestors().any(|ancestor| {
                ancestor
                    .value()
                    .as_element()
                    .map_or(false, |e| HIDDEN_ELEMENTS.contains(&e.name()))
            });
            if !hidden {
                tokenize_into(text, &mut page.words);
            }
            continue;
        }

        let Some(element) = ElementRef::wrap(node) else {
            continue;
        };
        let name = element.value().name();

        if ATTRIBUTE_ELEMENTS.contains(&name) {
            for (_, value) in element.value().attrs() {
                tokenize_into(value, &mut page.words);
            }
        }

        if RESOURCE_ELEMENTS.contains(&name) {
            for attr in ["href", "src"] {
                if let Some(target) = element.value().attr(attr) {
                    if let Ok(absolute) = page_url.join(target) {
                        add_url_tokens(&absolute, &mut page.words);
                    }
                }
            }
        }

        if name == "script" {
            let js: String = element.text().collect();
            if !js.trim().is_empty() {
                page.words.extend(extract_script_tokens(&js));
            }
        }

        if name == "a" {
            let link = element
                .value()
                .attr("href")
                .and_then(|href| page_url.join(href).ok())
                .and_then(normalize_url);
            if let Some(link) = link {
                if seen_links.insert(link.clone()) {
                    page.links.push(link);
                }
            }
        }
    }

    page
}

// -----------------------------------------------------------------------------
// NOTES:
//
// 1. Why walk the tree once instead of using CSS selectors?
//    - Every rule above is keyed on the tag name only
//    - One pass over descendants() visits each node exactly once
//    - ElementRef::wrap() tells us whether a node is an element
//
// 2. What does page_url.join() do with odd hrefs?
//    - "/docs" -> "https://example.com/docs"
//    - "mailto:a@b.c" stays a mailto: URL; normalize_url() then drops it
//    - "javascript:void(0)" still yields URL tokens ("void") but no link
// -----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn page(html: &str) -> Page {
        extract_page(html, &Url::parse("https://example.com/start/").unwrap())
    }

    #[test]
    fn test_anchor_href_tokens_and_link() {
        let page = page(r#"<a href="/path/123abc?x=hello">Go</a>"#);
        for word in ["path", "123abc", "x", "hello", "Go"] {
            assert!(page.words.contains(word), "missing {}", word);
        }
        assert_eq!(page.links, vec!["https://example.com/path/123abc?x=hello"]);
    }

    #[test]
    fn test_visible_text_excludes_script_and_style() {
        let page = page(
            "<html><head><style>.banner { color: red }</style></head>\
             <body><p>Welcome admin</p><script>console.log('noise');</script></body></html>",
        );
        assert!(page.words.contains("Welcome"));
        assert!(page.words.contains("admin"));
        assert!(!page.words.contains("banner"));
        assert!(!page.words.contains("console"));
    }

    #[test]
    fn test_form_attribute_values() {
        let page = page(
            r#"<meta name="generator" content="CustomCMS 4.2">
               <input type="hidden" name="csrf_field" value="internal_token">
               <textarea name="comment_body"></textarea>"#,
        );
        for word in ["generator", "CustomCMS", "hidden", "csrf_field", "internal_token", "comment_body"] {
            assert!(page.words.contains(word), "missing {}", word);
        }
    }

    #[test]
    fn test_resource_urls_are_tokenized() {
        let page = page(
            r#"<script src="/static/bundle_main.js"></script>
               <img src="images/logo-dark.png">
               <link href="https://cdn.example.net/fonts/roboto.css">"#,
        );
        for word in ["static", "bundle_main", "js", "start", "images", "logo", "dark", "fonts", "roboto"] {
            assert!(page.words.contains(word), "missing {}", word);
        }
        assert!(page.links.is_empty());
    }

    #[test]
    fn test_inline_script_declarations() {
        let page = page("<script>var apiKeyName = 'service_key'; doSomething();</script>");
        assert!(page.words.contains("apiKeyName"));
        assert!(page.words.contains("service_key"));
        assert!(!page.words.contains("doSomething"));
    }

    #[test]
    fn test_links_are_normalized_and_deduplicated() {
        let page = page(
            r##"<a href="/about#team">About</a>
                <a href="/about">About again</a>
                <a href="mailto:root@example.com">Mail</a>
                <a href="#top">Top</a>
                <a href="https://other.org/x">Other</a>"##,
        );
        assert_eq!(
            page.links,
            vec![
                "https://example.com/about",
                "https://example.com/start/",
                "https://other.org/x",
            ]
        );
    }

    #[test]
    fn test_malformed_markup_degrades_gracefully() {
        let page = page("<div><p>unclosed <b>bold text<a href='/deep'>link");
        assert!(page.words.contains("unclosed"));
        assert!(page.words.contains("bold"));
        assert_eq!(page.links, vec!["https://example.com/deep"]);
    }
}
