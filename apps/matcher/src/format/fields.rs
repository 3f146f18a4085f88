//! Tolerant accessors over loosely-shaped analysis JSON.
//!
//! Every accessor returns `None` for anything it cannot use (missing key, null,
//! blank string, empty list, unexpected type). Placeholder substitution happens
//! in exactly one place, `field` and `list` below.

use serde_json::Value;

use super::document::Block;

pub const MISSING_VALUE: &str = "N/A";
pub const MISSING_LIST: &str = "Not available";

/// Walks `path` one level at a time, stopping at the first missing level or
/// non-object parent.
pub fn lookup<'a>(doc: &'a Value, path: &[&str]) -> Option<&'a Value> {
    path.iter().try_fold(doc, |node, key| node.as_object()?.get(*key))
}

/// A scalar as display text. Objects and arrays are not scalars.
pub fn scalar(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => non_blank(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// A string-or-object union: an object resolves to its `preferred` key,
/// anything else is read as a scalar.
pub fn scalar_or_member(value: Option<&Value>, preferred: &str) -> Option<String> {
    match value? {
        Value::Object(map) => scalar(map.get(preferred)),
        other => scalar(Some(other)),
    }
}

/// List items as display text, in source order. A bare non-blank string is
/// treated as a one-item list; an empty list is treated as absent.
pub fn items(value: Option<&Value>) -> Option<Vec<String>> {
    let items: Vec<String> = match value? {
        Value::Array(values) => values.iter().filter_map(item_text).collect(),
        Value::String(s) => non_blank(s).into_iter().collect(),
        _ => return None,
    };
    (!items.is_empty()).then_some(items)
}

/// Renders one list element. Named objects (e.g. `{name, proficiency}`) show
/// the name with any qualifier in parentheses.
fn item_text(value: &Value) -> Option<String> {
    match value {
        Value::Object(map) => {
            let name = scalar(map.get("name"))?;
            let qualifier = ["proficiency", "level"]
                .iter()
                .find_map(|k| scalar(map.get(*k)));
            Some(match qualifier {
                Some(q) => format!("{name} ({q})"),
                None => name,
            })
        }
        other => scalar(Some(other)),
    }
}

/// Parses a percentage the way a lenient integer parse would: numbers are
/// truncated toward zero, strings contribute their leading signed digits
/// (`"82%"` → 82, `"76.5"` → 76).
pub fn percentage(value: Option<&Value>) -> Option<i64> {
    match value? {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i64)),
        Value::String(s) => leading_integer(s),
        _ => None,
    }
}

fn leading_integer(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    digits.parse::<i64>().ok().map(|n| sign * n)
}

fn non_blank(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn field(label: &str, value: Option<String>) -> Block {
    Block::Field {
        label: label.to_string(),
        value: value.unwrap_or_else(|| MISSING_VALUE.to_string()),
    }
}

pub fn list(label: &str, items: Option<Vec<String>>) -> Block {
    match items {
        Some(items) => Block::Bullets {
            label: label.to_string(),
            items,
        },
        None => Block::Note {
            label: label.to_string(),
            text: MISSING_LIST.to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_lookup_stops_at_missing_level() {
        let doc = json!({ "companyInfo": { "name": "Acme" }, "flat": "x" });
        assert_eq!(lookup(&doc, &["companyInfo", "name"]), Some(&json!("Acme")));
        assert_eq!(lookup(&doc, &["companyInfo", "overview"]), None);
        assert_eq!(lookup(&doc, &["missing", "name"]), None);
        // a string parent has no children
        assert_eq!(lookup(&doc, &["flat", "name"]), None);
    }

    #[test]
    fn test_scalar_rejects_blank_and_structured_values() {
        assert_eq!(scalar(Some(&json!("  Paris "))), Some("Paris".into()));
        assert_eq!(scalar(Some(&json!(3))), Some("3".into()));
        assert_eq!(scalar(Some(&json!(""))), None);
        assert_eq!(scalar(Some(&json!(null))), None);
        assert_eq!(scalar(Some(&json!({ "year": 2019 }))), None);
        assert_eq!(scalar(None), None);
    }

    #[test]
    fn test_union_prefers_member_of_object() {
        assert_eq!(
            scalar_or_member(Some(&json!({ "name": "ETH Zürich" })), "name"),
            Some("ETH Zürich".into())
        );
        assert_eq!(
            scalar_or_member(Some(&json!("MIT")), "name"),
            Some("MIT".into())
        );
        assert_eq!(scalar_or_member(Some(&json!({ "city": "X" })), "name"), None);
    }

    #[test]
    fn test_items_treats_empty_as_absent() {
        assert_eq!(items(Some(&json!([]))), None);
        assert_eq!(items(Some(&json!([null, ""]))), None);
        assert_eq!(items(None), None);
        assert_eq!(items(Some(&json!({ "a": 1 }))), None);
    }

    #[test]
    fn test_items_render_named_objects_and_strings() {
        let value = json!([
            { "name": "English", "proficiency": "Native" },
            { "name": "German" },
            "French",
            42
        ]);
        assert_eq!(
            items(Some(&value)),
            Some(vec![
                "English (Native)".into(),
                "German".into(),
                "French".into(),
                "42".into()
            ])
        );
    }

    #[test]
    fn test_bare_string_is_single_item_list() {
        assert_eq!(
            items(Some(&json!("Highlight cloud work"))),
            Some(vec!["Highlight cloud work".into()])
        );
    }

    #[test]
    fn test_percentage_parsing() {
        assert_eq!(percentage(Some(&json!(82))), Some(82));
        assert_eq!(percentage(Some(&json!(82.9))), Some(82));
        assert_eq!(percentage(Some(&json!("76%"))), Some(76));
        assert_eq!(percentage(Some(&json!(" 76.5 "))), Some(76));
        assert_eq!(percentage(Some(&json!("-5"))), Some(-5));
        assert_eq!(percentage(Some(&json!("high"))), None);
        assert_eq!(percentage(Some(&json!(null))), None);
        assert_eq!(percentage(None), None);
    }

    #[test]
    fn test_placeholders_are_distinct() {
        assert_eq!(
            field("Location", None),
            Block::Field {
                label: "Location".into(),
                value: "N/A".into()
            }
        );
        assert_eq!(
            list("Hard Skills", None),
            Block::Note {
                label: "Hard Skills".into(),
                text: "Not available".into()
            }
        );
    }
}
