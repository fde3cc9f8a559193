//! Canonical representation of a qualified symbol name.
//!
//! A [`NameHierarchy`] is the sole identity key for a node: two hierarchies
//! are the same symbol iff [`NameHierarchy::to_database_string`] produces
//! byte-equal output.

use serde_json::Value;

const META_DELIMITER: &str = "\tm";
const NAME_DELIMITER: &str = "\tn";
const PARTS_DELIMITER: &str = "\ts";
const SIGNATURE_DELIMITER: &str = "\tp";

/// A single hierarchical element of a symbol's name, e.g. the `m` in `C::m`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameElement {
    pub prefix: String,
    pub name: String,
    pub postfix: String,
}

impl NameElement {
    pub fn new(prefix: impl Into<String>, name: impl Into<String>, postfix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            name: name.into(),
            postfix: postfix.into(),
        }
    }

    /// Convenience constructor for an element with no prefix/postfix.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            prefix: String::new(),
            name: name.into(),
            postfix: String::new(),
        }
    }
}

/// A non-empty ordered sequence of [`NameElement`]s plus a delimiter string.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NameHierarchy {
    pub delimiter: String,
    pub elements: Vec<NameElement>,
}

impl NameHierarchy {
    pub fn new(delimiter: impl Into<String>, elements: Vec<NameElement>) -> Self {
        Self {
            delimiter: delimiter.into(),
            elements,
        }
    }

    /// A one-element hierarchy with an empty delimiter, e.g. the sentinel
    /// `"unsolved symbol"` node or a bare identifier.
    pub fn single(delimiter: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            delimiter: delimiter.into(),
            elements: vec![NameElement::named(name)],
        }
    }

    /// The prefix of `self` containing only its first `len` elements.
    pub fn prefix(&self, len: usize) -> NameHierarchy {
        NameHierarchy {
            delimiter: self.delimiter.clone(),
            elements: self.elements[..len].to_vec(),
        }
    }

    /// Database serialization — the identity key. Bit-exact; the external
    /// reader expects this exact format:
    /// `<delimiter>\tm<elem0>\tn<elem1>\tn…\tn<elemN>`, each `<elem>` being
    /// `<name>\ts<prefix>\tp<postfix>`.
    pub fn to_database_string(&self) -> String {
        let mut serialized = String::new();
        serialized.push_str(&self.delimiter);
        serialized.push_str(META_DELIMITER);
        for (i, element) in self.elements.iter().enumerate() {
            if i != 0 {
                serialized.push_str(NAME_DELIMITER);
            }
            serialized.push_str(&element.name);
            serialized.push_str(PARTS_DELIMITER);
            serialized.push_str(&element.prefix);
            serialized.push_str(SIGNATURE_DELIMITER);
            serialized.push_str(&element.postfix);
        }
        serialized
    }

    /// JSON interchange form, pretty-printed with 4-space indentation:
    /// `{"name_delimiter": …, "name_elements": [{"prefix","name","postfix"}]}`.
    pub fn to_json(&self) -> String {
        let mut elements = Vec::with_capacity(self.elements.len());
        for element in &self.elements {
            elements.push(serde_json::json!({
                "prefix": element.prefix,
                "name": element.name,
                "postfix": element.postfix,
            }));
        }
        let value = serde_json::json!({
            "name_delimiter": self.delimiter,
            "name_elements": elements,
        });
        to_string_pretty_4(&value)
    }

    /// Tolerant JSON parsing: missing or non-string fields default to `""`;
    /// a document that isn't valid JSON, or whose top level isn't an object,
    /// yields an empty hierarchy (zero elements) rather than an error.
    /// `diagnostic` receives a human-readable description of what went
    /// wrong, or is left untouched on success.
    pub fn from_json(serialized: &str, diagnostic: &mut Option<String>) -> NameHierarchy {
        let value: Value = match serde_json::from_str(serialized) {
            Ok(v) => v,
            Err(e) => {
                *diagnostic = Some(format!("failed to parse name hierarchy json: {e}"));
                return NameHierarchy::default();
            }
        };

        let Some(object) = value.as_object() else {
            *diagnostic = Some("name hierarchy json is not an object".to_string());
            return NameHierarchy::default();
        };

        let delimiter = object
            .get("name_delimiter")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        let mut elements = Vec::new();
        if let Some(array) = object.get("name_elements").and_then(Value::as_array) {
            for item in array {
                let prefix = item
                    .get("prefix")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let name = item
                    .get("name")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                let postfix = item
                    .get("postfix")
                    .and_then(Value::as_str)
                    .unwrap_or_default()
                    .to_string();
                elements.push(NameElement {
                    prefix,
                    name,
                    postfix,
                });
            }
        }

        NameHierarchy { delimiter, elements }
    }
}

/// `serde_json`'s built-in pretty printer uses 2-space indentation; the
/// on-disk/interchange format this crate is compatible with uses 4, so the
/// formatter is configured explicitly rather than accepting the default.
fn to_string_pretty_4(value: &Value) -> String {
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut buf = Vec::new();
    let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
    serde::Serialize::serialize(value, &mut serializer).expect("Value serialization cannot fail");
    String::from_utf8(buf).expect("json output is always valid utf-8")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn s1_single_element_database_string() {
        let h = NameHierarchy::new(".", vec![NameElement::named("foo")]);
        assert_eq!(h.to_database_string(), ".\tmfoo\ts\tp");
    }

    #[test]
    fn s2_qualified_database_string() {
        let h = NameHierarchy::new(
            "::",
            vec![
                NameElement::named("ns"),
                NameElement::named("C"),
                NameElement::new("void", "m", "()"),
            ],
        );
        assert_eq!(
            h.to_database_string(),
            "::\tmns\ts\tp\tnC\ts\tp\tnm\tsvoid\tp()"
        );
    }

    #[test]
    fn json_round_trips_when_no_escaping_is_needed() {
        let h = NameHierarchy::new(
            "::",
            vec![NameElement::new("void", "m", "()"), NameElement::named("n")],
        );
        let json = h.to_json();
        let mut diagnostic = None;
        let parsed = NameHierarchy::from_json(&json, &mut diagnostic);
        assert_eq!(parsed, h);
        assert!(diagnostic.is_none());
    }

    #[test]
    fn json_is_pretty_printed_with_four_spaces() {
        let h = NameHierarchy::single(".", "foo");
        let json = h.to_json();
        assert!(json.contains("\n    \"name_delimiter\""));
    }

    #[test]
    fn malformed_json_yields_empty_hierarchy_and_diagnostic() {
        let mut diagnostic = None;
        let parsed = NameHierarchy::from_json("not json", &mut diagnostic);
        assert!(parsed.elements.is_empty());
        assert!(diagnostic.is_some());
    }

    #[test]
    fn missing_fields_default_to_empty_strings() {
        let mut diagnostic = None;
        let parsed = NameHierarchy::from_json(
            r#"{"name_elements":[{"name":"foo"}]}"#,
            &mut diagnostic,
        );
        assert_eq!(parsed.delimiter, "");
        assert_eq!(parsed.elements, vec![NameElement::named("foo")]);
    }

    #[test]
    fn non_object_top_level_yields_empty_hierarchy() {
        let mut diagnostic = None;
        let parsed = NameHierarchy::from_json("[1,2,3]", &mut diagnostic);
        assert!(parsed.elements.is_empty());
        assert!(diagnostic.is_some());
    }

    #[test]
    fn prefix_truncates_elements_and_keeps_delimiter() {
        let h = NameHierarchy::new(
            "::",
            vec![NameElement::named("ns"), NameElement::named("C"), NameElement::named("m")],
        );
        let p = h.prefix(2);
        assert_eq!(p.delimiter, "::");
        assert_eq!(p.elements.len(), 2);
    }
}
