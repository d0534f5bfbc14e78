// Extraction of JSON object literals assigned to globals inside <script> blocks.
//
// Grammar: `var <NAME>` then optional whitespace, `=`, optional whitespace,
// then the shortest `{ ... }` followed by `;`. The match is non-greedy and
// spans newlines, so the first `};` after the marker ends the literal.

use regex::Regex;
use scraper::{Html, Selector};
use serde::de::DeserializeOwned;

/// Global that storefront release pages assign their album data to.
pub const TRALBUM_VARIABLE: &str = "TralbumData";

/// A `var NAME = {...};` assignment to look for in page scripts.
pub struct EmbeddedAssignment {
    variable: &'static str,
    marker: String,
    pattern: Regex,
}

impl EmbeddedAssignment {
    pub fn new(variable: &'static str) -> Self {
        let pattern = format!(r"(?s)var {}\s*=\s*(\{{.*?\}});", regex::escape(variable));
        Self {
            variable,
            marker: format!("var {variable} ="),
            pattern: Regex::new(&pattern).expect("valid assignment pattern"),
        }
    }

    /// The assignment used by release pages for their album data.
    pub fn tralbum() -> Self {
        Self::new(TRALBUM_VARIABLE)
    }

    /// Cheap pre-check: does this script mention the assignment at all?
    pub fn is_candidate(&self, script: &str) -> bool {
        script.contains(&self.marker)
    }

    /// Return the object-literal text (braces included) assigned in `script`.
    pub fn extract<'a>(&self, script: &'a str) -> Option<&'a str> {
        if !self.is_candidate(script) {
            return None;
        }
        self.pattern
            .captures(script)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str())
    }

    /// Scan every script in document order and deserialize each candidate.
    ///
    /// The last candidate that parses wins. Candidates that fail to parse
    /// are logged and skipped.
    pub fn scan<T: DeserializeOwned>(&self, document: &Html) -> Option<T> {
        let script_sel = Selector::parse("script").expect("valid selector");
        let mut found = None;

        for (index, script) in document.select(&script_sel).enumerate() {
            let content: String = script.text().collect();
            let Some(literal) = self.extract(&content) else {
                continue;
            };
            tracing::debug!(variable = self.variable, script = index, "Found embedded data script");

            match serde_json::from_str::<T>(literal) {
                Ok(value) => found = Some(value),
                Err(err) => tracing::warn!(
                    variable = self.variable,
                    script = index,
                    error = %err,
                    "Malformed embedded data, skipping"
                ),
            }
        }

        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    #[test]
    fn test_extract_spans_newlines() {
        let script = "var x = 1;\nvar TralbumData = {\n  \"a\": 1,\n  \"b\": {\"c\": 2}\n};\nvar y = 2;";
        let literal = EmbeddedAssignment::tralbum().extract(script).unwrap();
        assert_eq!(literal, "{\n  \"a\": 1,\n  \"b\": {\"c\": 2}\n}");
    }

    #[test]
    fn test_extract_stops_at_first_terminator() {
        let script = r#"var TralbumData = {"a": {"b": 1}}; var Other = {"z": 2};"#;
        let literal = EmbeddedAssignment::tralbum().extract(script).unwrap();
        assert_eq!(literal, r#"{"a": {"b": 1}}"#);
    }

    #[test]
    fn test_extract_requires_marker() {
        let assignment = EmbeddedAssignment::tralbum();
        assert!(assignment.extract(r#"var TralbumData={"a": 1};"#).is_none());
        assert!(assignment.extract(r#"window.TralbumData = {"a": 1};"#).is_none());
        assert!(assignment.extract("var TralbumData = 42;").is_none());
    }

    #[test]
    fn test_scan_last_parsed_candidate_wins() {
        let html = r#"<html><head>
            <script>var TralbumData = {"n": 1};</script>
            <script>var TralbumData = {n: broken};</script>
            <script>var TralbumData = {"n": 3};</script>
            <script>var TralbumData = {"n": 4, oops};</script>
        </head><body></body></html>"#;
        let document = Html::parse_document(html);

        let value: Value = EmbeddedAssignment::tralbum().scan(&document).unwrap();
        assert_eq!(value["n"], 3);
    }

    #[test]
    fn test_scan_all_malformed_yields_none() {
        let html = r#"<script>var TralbumData = {title: 'single quotes'};</script>"#;
        let document = Html::parse_document(html);
        assert!(EmbeddedAssignment::tralbum().scan::<Value>(&document).is_none());
    }

    #[test]
    fn test_custom_variable_is_escaped() {
        let assignment = EmbeddedAssignment::new("data.x");
        assert!(assignment.extract(r#"var dataXx = {"a": 1};"#).is_none());
        assert_eq!(assignment.extract(r#"var data.x = {"a": 1};"#), Some(r#"{"a": 1}"#));
    }
}
