//! Extraction of contract expressions from documentation blocks
//!
//! The decorator layer that wraps functions lives outside this crate; the
//! only interface it needs is [`parse_docstring_types`], which pulls
//! `:type <param>: <expression>` lines (and `:rtype:` under the `"return"`
//! key) out of a docstring. The expressions are not validated here; they are
//! validated when handed to `parse` or `check`.

use rustc_hash::FxHashMap;

/// Map parameter names to the contract expressions declared for them
pub fn parse_docstring_types(doc: &str) -> FxHashMap<String, String> {
    let mut types = FxHashMap::default();
    for line in doc.lines() {
        let line = line.trim();
        if let Some(rest) = line.strip_prefix(":type ") {
            if let Some((param, expr)) = rest.split_once(':') {
                let param = param.trim();
                let expr = expr.trim();
                if !param.is_empty() && !expr.is_empty() {
                    types.insert(param.to_string(), expr.to_string());
                }
            }
        } else if let Some(expr) = line.strip_prefix(":rtype:") {
            let expr = expr.trim();
            if !expr.is_empty() {
                types.insert("return".to_string(), expr.to_string());
            }
        }
    }
    types
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_type_lines() {
        let doc = r#" Fill the area inside the current figure.

            :type border: color
            :type inside: list[3](number,>=0,<=1)
        "#;
        let types = parse_docstring_types(doc);
        assert_eq!(types.len(), 2);
        assert_eq!(types["border"], "color");
        assert_eq!(types["inside"], "list[3](number,>=0,<=1)");
    }

    #[test]
    fn test_extracts_rtype() {
        let doc = ":type x: int\n:rtype: list(int)";
        let types = parse_docstring_types(doc);
        assert_eq!(types["x"], "int");
        assert_eq!(types["return"], "list(int)");
    }

    #[test]
    fn test_ignores_prose_and_malformed_lines() {
        let doc = "Returns the frobnicated value.\n:type : int\n:type x\n";
        assert!(parse_docstring_types(doc).is_empty());
    }
}
