//! Editable text form of value lists.
//!
//! ```text
//! [olivier_james, paul_franklin]
//! [4.1]
//! [#2016-04-01T00:00:00+00:00]
//! []
//! ```
//!
//! [`format_values`] and [`unformat_values`] are inverses for any homogeneous
//! list of valid values: unformatting the formatted text with the list's
//! variant yields the same list.

use crate::error::{MedinxError, Result};
use crate::syntax::validate_value_literal;
use crate::timestamp::parse_timestamp;
use crate::value::{parse_bool, Value, ValueList, Variant};

pub fn format_values(values: &[Value]) -> String {
    let items: Vec<String> = values.iter().map(Value::to_string).collect();
    format!("[{}]", items.join(", "))
}

/// Parses edited text back into values of `variant`.
///
/// Brackets are optional but must come in pairs. Empty items are dropped, so
/// `[]`, `""` and `[ , ]` all give an empty list. One bad item fails the
/// whole call.
pub fn unformat_values(text: &str, variant: Variant) -> Result<ValueList> {
    split_items(text)?
        .map(|item| parse_item(item, variant))
        .collect()
}

/// Guesses the variant of edited text for an attribute that has none yet.
///
/// Every item has to agree: all booleans, all numbers, all `#`-timestamps,
/// otherwise text. `None` when the text holds no item.
pub fn infer_variant(text: &str) -> Result<Option<Variant>> {
    let items: Vec<&str> = split_items(text)?.collect();
    if items.is_empty() {
        return Ok(None);
    }
    let all = |variant: Variant| {
        items
            .iter()
            .all(|item| parse_item(item, variant).is_ok())
    };
    let variant = if all(Variant::Boolean) {
        Variant::Boolean
    } else if all(Variant::Number) {
        Variant::Number
    } else if items.iter().all(|item| item.starts_with('#')) && all(Variant::Timestamp) {
        Variant::Timestamp
    } else {
        Variant::Text
    };
    Ok(Some(variant))
}

fn split_items(text: &str) -> Result<impl Iterator<Item = &str>> {
    let trimmed = text.trim();
    let inner = match (trimmed.strip_prefix('['), trimmed.ends_with(']')) {
        (Some(rest), true) => &rest[..rest.len() - 1],
        (None, false) => trimmed,
        _ => {
            return Err(MedinxError::ValueFormat(format!(
                "unbalanced brackets in \"{}\"",
                text
            )))
        }
    };
    Ok(inner
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty()))
}

fn parse_item(item: &str, variant: Variant) -> Result<Value> {
    let invalid = || MedinxError::ValueFormat(format!("\"{}\" is not a valid {}", item, variant));
    match variant {
        Variant::Number => item
            .parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .map(Value::Number)
            .ok_or_else(invalid),
        Variant::Boolean => parse_bool(item).map(Value::Boolean).ok_or_else(invalid),
        Variant::Timestamp => {
            validate_value_literal(item).map_err(|_| invalid())?;
            let text = item.strip_prefix('#').unwrap_or(item);
            parse_timestamp(text)
                .map(Value::Timestamp)
                .map_err(|_| invalid())
        }
        Variant::Text => {
            if item.starts_with('#') || validate_value_literal(item).is_err() {
                Err(invalid())
            } else {
                Ok(Value::Text(item.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ts(text: &str) -> Value {
        Value::Timestamp(parse_timestamp(text).unwrap())
    }

    #[test]
    fn format_empty_list() {
        assert_eq!(format_values(&[]), "[]");
    }

    #[test]
    fn format_each_variant() {
        assert_eq!(
            format_values(&[Value::from("nobody"), Value::from("them")]),
            "[nobody, them]"
        );
        assert_eq!(format_values(&[Value::Number(4.1), Value::Number(5.0)]), "[4.1, 5.0]");
        assert_eq!(format_values(&[Value::Boolean(false)]), "[false]");
        assert_eq!(
            format_values(&[ts("2016-04-01")]),
            "[#2016-04-01T00:00:00+00:00]"
        );
    }

    #[test]
    fn unformat_each_variant() {
        assert_eq!(
            unformat_values("[4.1]", Variant::Number).unwrap(),
            vec![Value::Number(4.1)]
        );
        assert_eq!(
            unformat_values("[nobody, them]", Variant::Text).unwrap(),
            vec![Value::from("nobody"), Value::from("them")]
        );
        assert_eq!(
            unformat_values("[True, false]", Variant::Boolean).unwrap(),
            vec![Value::Boolean(true), Value::Boolean(false)]
        );
        assert_eq!(
            unformat_values("[#2016-04, 2017]", Variant::Timestamp).unwrap(),
            vec![ts("2016-04-01"), ts("2017-01-01")]
        );
    }

    #[test]
    fn unformat_empty_forms() {
        for text in ["[]", "", "  ", "[ , ]", "[,]"] {
            assert!(unformat_values(text, Variant::Text).unwrap().is_empty(), "{text:?}");
        }
    }

    #[test]
    fn unformat_without_brackets() {
        assert_eq!(
            unformat_values("3, 4", Variant::Number).unwrap(),
            vec![Value::Number(3.0), Value::Number(4.0)]
        );
    }

    #[test]
    fn unformat_rejects_bad_items() {
        assert!(unformat_values("[4.1, high]", Variant::Number).is_err());
        assert!(unformat_values("[yes]", Variant::Boolean).is_err());
        assert!(unformat_values("[#someday]", Variant::Timestamp).is_err());
        assert!(unformat_values("[two words]", Variant::Text).is_err());
        assert!(unformat_values("[#2016]", Variant::Text).is_err());
        assert!(unformat_values("[inf]", Variant::Number).is_err());
    }

    #[test]
    fn non_ascii_timestamp_items_are_format_errors() {
        for text in ["[2016-01-01T12:00+aéb]", "[#2016-01-01T12:00+aéb]", "[#２０１６]"] {
            assert!(
                matches!(
                    unformat_values(text, Variant::Timestamp),
                    Err(MedinxError::ValueFormat(_))
                ),
                "{text}"
            );
        }
        assert_eq!(
            infer_variant("[#2016-01-01T12:00+aéb]").unwrap(),
            Some(Variant::Text)
        );
    }

    #[test]
    fn unformat_rejects_unbalanced_brackets() {
        assert!(matches!(
            unformat_values("[a, b", Variant::Text),
            Err(MedinxError::ValueFormat(_))
        ));
        assert!(unformat_values("a]", Variant::Text).is_err());
    }

    #[test]
    fn format_then_unformat_keeps_offsets() {
        let values = vec![ts("2016-04-01T18:30:05.250+02:00")];
        let text = format_values(&values);
        assert_eq!(unformat_values(&text, Variant::Timestamp).unwrap(), values);
    }

    #[test]
    fn infer_variant_from_text() {
        assert_eq!(infer_variant("[true, False]").unwrap(), Some(Variant::Boolean));
        assert_eq!(infer_variant("[1, 2.5]").unwrap(), Some(Variant::Number));
        assert_eq!(infer_variant("[#2016-04]").unwrap(), Some(Variant::Timestamp));
        assert_eq!(infer_variant("[2016, me]").unwrap(), Some(Variant::Text));
        // bare years read as numbers, not dates
        assert_eq!(infer_variant("2016").unwrap(), Some(Variant::Number));
        assert_eq!(infer_variant("[]").unwrap(), None);
    }
}
