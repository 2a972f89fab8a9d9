// src/extract/script.rs
// =============================================================================
// Token extraction from inline JavaScript.
//
// This is a heuristic, not a JavaScript parser. We only look for declarations
// of the shape:
//
//     var|let|const <identifier> = <expression>;
//
// The identifier becomes a token. The expression has surrounding quotes and
// spaces trimmed and is then tokenized like any other text. Declarations
// without a terminating ';' are not matched.
// =============================================================================

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use super::tokenize_into;

// Extracts identifier and value tokens from variable declarations in `js`
//
// Example:
//   js = "const apiBase = '/internal/v1';"
//   result = {"apiBase", "internal", "v1"}
pub fn extract_script_tokens(js: &str) -> HashSet<String> {
    let mut tokens = HashSet::new();

    for caps in declaration_pattern().captures_iter(js) {
        if let Some(name) = caps.get(1) {
            tokens.insert(name.as_str().to_string());
        }
        if let Some(value) = caps.get(2) {
            let value = value
                .as_str()
                .trim_matches(|c| c == ' ' || c == '"' || c == '\'');
            tokenize_into(value, &mut tokens);
        }
    }

    tokens
}

fn declaration_pattern() -> &'static Regex {
    static DECLARATION: OnceLock<Regex> = OnceLock::new();
    DECLARATION.get_or_init(|| {
        Regex::new(r"(?:var|let|const)\s+(\w+)\s*=\s*([^;]+);").expect("declaration pattern is valid")
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_const_string_declaration() {
        let tokens = extract_script_tokens("const apiBase = '/internal/v1';");
        assert!(tokens.contains("apiBase"));
        assert!(tokens.contains("internal"));
        assert!(tokens.contains("v1"));
    }

    #[test]
    fn test_multiple_declarations() {
        let js = r#"var token = "abc"; let retries = 3; const mode = debug_mode;"#;
        let tokens = extract_script_tokens(js);
        for word in ["token", "abc", "retries", "3", "mode", "debug_mode"] {
            assert!(tokens.contains(word), "missing {}", word);
        }
    }

    #[test]
    fn test_unterminated_declaration_is_ignored() {
        let tokens = extract_script_tokens("let dangling = value");
        assert!(tokens.is_empty());
    }

    #[test]
    fn test_other_statements_are_ignored() {
        let tokens = extract_script_tokens("console.log('hidden'); fetchData();");
        assert!(tokens.is_empty());
    }
}
