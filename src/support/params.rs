//! Argument validation against declared [`ParamDef`]s.
//!
//! Validation walks the declared parameters, never the incoming object, so unknown fields are
//! dropped rather than rejected. Missing required fields, wrong types, out-of-range numbers and
//! values outside an enum fail with an [`Error::Validation`] naming the offending field
//! (`keywords[1].matchType`, `customDateRange.startDate`). Declared defaults are filled in, so
//! the validated object deserializes straight into a tool's typed argument struct.

use chrono::NaiveDate;
use serde_json::{Map, Value};

use crate::error::{Error, Result};
use crate::tool_definitions::{ParamDef, ParamType};

// Upper bound for money arguments; keeps the micros conversion inside i64
const MAX_MONEY: f64 = 1_000_000_000.0;

/// Validate a raw argument object, returning a normalized object with defaults applied
pub fn validate_arguments(
    params: &[ParamDef],
    arguments: Option<&Map<String, Value>>,
) -> Result<Map<String, Value>> {
    let empty = Map::new();
    validate_object(params, arguments.unwrap_or(&empty), "")
}

fn validate_object(
    params: &[ParamDef],
    arguments: &Map<String, Value>,
    prefix: &str,
) -> Result<Map<String, Value>> {
    let mut validated = Map::new();

    for param in params {
        let field = field_path(prefix, param.name);
        match arguments.get(param.name) {
            None | Some(Value::Null) => {
                if param.required {
                    return Err(Error::validation(field, "is required"));
                }
                if let Some(default) = default_value(&param.param_type) {
                    validated.insert(param.name.to_string(), default);
                }
            }
            Some(value) => {
                let value = validate_value(&param.param_type, value, &field)?;
                validated.insert(param.name.to_string(), value);
            }
        }
    }

    Ok(validated)
}

fn field_path(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}.{name}")
    }
}

fn default_value(param_type: &ParamType) -> Option<Value> {
    match param_type {
        ParamType::Integer { default, .. } => default.map(Value::from),
        ParamType::Number { default } => default.map(Value::from),
        ParamType::Boolean { default } => default.map(Value::from),
        ParamType::Enum { default, .. } => default.map(Value::from),
        ParamType::String { .. }
        | ParamType::Date
        | ParamType::Id
        | ParamType::Money
        | ParamType::StringArray { .. }
        | ParamType::ObjectArray { .. }
        | ParamType::Object { .. } => None,
    }
}

fn validate_value(param_type: &ParamType, value: &Value, field: &str) -> Result<Value> {
    match param_type {
        ParamType::String { max_len } => {
            let text = expect_str(value, field)?;
            check_text(text, *max_len, field)?;
            Ok(Value::from(text))
        }
        ParamType::Date => {
            let text = expect_str(value, field)?;
            NaiveDate::parse_from_str(text, "%Y-%m-%d").map_err(|_| {
                Error::validation(field, format!("'{text}' is not a date in YYYY-MM-DD form"))
            })?;
            Ok(Value::from(text))
        }
        ParamType::Id => validate_id(value, field),
        ParamType::Integer { min, max, .. } => {
            let number = as_whole_number(value)
                .ok_or_else(|| Error::validation(field, "must be an integer"))?;
            if number < *min || number > *max {
                return Err(Error::validation(
                    field,
                    format!("must be between {min} and {max}, got {number}"),
                ));
            }
            Ok(Value::from(number))
        }
        ParamType::Number { .. } => {
            let number = expect_non_negative(value, field)?;
            Ok(Value::from(number))
        }
        ParamType::Money => {
            let amount = expect_non_negative(value, field)?;
            if amount > MAX_MONEY {
                return Err(Error::validation(
                    field,
                    format!("must not exceed {MAX_MONEY}"),
                ));
            }
            Ok(Value::from(amount))
        }
        ParamType::Boolean { .. } => value
            .as_bool()
            .map(Value::from)
            .ok_or_else(|| Error::validation(field, "must be a boolean")),
        ParamType::Enum { values, .. } => {
            let text = expect_str(value, field)?;
            if values.iter().any(|allowed| *allowed == text) {
                Ok(Value::from(text))
            } else {
                Err(Error::validation(
                    field,
                    format!("'{text}' is not one of {}", values.join(", ")),
                ))
            }
        }
        ParamType::StringArray {
            min_items,
            max_items,
            max_len,
        } => {
            let items = expect_array(value, field, *min_items, *max_items)?;
            let mut validated = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let item_field = format!("{field}[{index}]");
                let text = expect_str(item, &item_field)?;
                check_text(text, *max_len, &item_field)?;
                validated.push(Value::from(text));
            }
            Ok(Value::Array(validated))
        }
        ParamType::ObjectArray { fields, min_items } => {
            let items = expect_array(value, field, *min_items, None)?;
            let mut validated = Vec::with_capacity(items.len());
            for (index, item) in items.iter().enumerate() {
                let item_field = format!("{field}[{index}]");
                let object = item
                    .as_object()
                    .ok_or_else(|| Error::validation(&item_field, "must be an object"))?;
                validated.push(Value::Object(validate_object(fields, object, &item_field)?));
            }
            Ok(Value::Array(validated))
        }
        ParamType::Object { fields } => {
            let object = value
                .as_object()
                .ok_or_else(|| Error::validation(field, "must be an object"))?;
            Ok(Value::Object(validate_object(fields, object, field)?))
        }
    }
}

fn expect_str<'a>(value: &'a Value, field: &str) -> Result<&'a str> {
    value
        .as_str()
        .ok_or_else(|| Error::validation(field, "must be a string"))
}

fn check_text(text: &str, max_len: Option<usize>, field: &str) -> Result<()> {
    if text.trim().is_empty() {
        return Err(Error::validation(field, "must not be empty"));
    }
    if let Some(max_len) = max_len {
        let len = text.chars().count();
        if len > max_len {
            return Err(Error::validation(
                field,
                format!("must be at most {max_len} characters, got {len}"),
            ));
        }
    }
    Ok(())
}

fn expect_array<'a>(
    value: &'a Value,
    field: &str,
    min_items: usize,
    max_items: Option<usize>,
) -> Result<&'a Vec<Value>> {
    let items = value
        .as_array()
        .ok_or_else(|| Error::validation(field, "must be an array"))?;
    if items.len() < min_items {
        return Err(Error::validation(
            field,
            format!("must contain at least {min_items} item(s)"),
        ));
    }
    if let Some(max_items) = max_items {
        if items.len() > max_items {
            return Err(Error::validation(
                field,
                format!("must contain at most {max_items} item(s)"),
            ));
        }
    }
    Ok(items)
}

fn expect_non_negative(value: &Value, field: &str) -> Result<f64> {
    let number = value
        .as_f64()
        .filter(|n| n.is_finite())
        .ok_or_else(|| Error::validation(field, "must be a number"))?;
    if number < 0.0 {
        return Err(Error::validation(
            field,
            format!("must not be negative, got {number}"),
        ));
    }
    Ok(number)
}

/// Integers arrive as JSON integers, but some clients send `5.0`
#[allow(clippy::cast_possible_truncation)]
fn as_whole_number(value: &Value) -> Option<i64> {
    value.as_i64().or_else(|| {
        value
            .as_f64()
            .filter(|n| n.is_finite() && n.fract() == 0.0 && n.abs() < 9.0e15)
            .map(|n| n as i64)
    })
}

fn validate_id(value: &Value, field: &str) -> Result<Value> {
    match value {
        Value::String(text) if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) => {
            Ok(Value::from(text.as_str()))
        }
        Value::Number(number) => number
            .as_u64()
            .map(|id| Value::from(id.to_string()))
            .ok_or_else(|| invalid_id(field, value)),
        other => Err(invalid_id(field, other)),
    }
}

fn invalid_id(field: &str, value: &Value) -> Error {
    Error::validation(field, format!("must be a numeric ID, got {value}"))
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use serde_json::json;

    use super::*;

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    fn keyword_params() -> Vec<ParamDef> {
        vec![
            ParamDef::required("adGroupId", "Ad group", ParamType::Id),
            ParamDef::required(
                "keywords",
                "Keywords",
                ParamType::ObjectArray {
                    fields:    vec![
                        ParamDef::required("text", "Text", ParamType::string()),
                        ParamDef::optional(
                            "matchType",
                            "Match",
                            ParamType::enumeration(&["EXACT", "PHRASE", "BROAD"], Some("BROAD")),
                        ),
                    ],
                    min_items: 1,
                },
            ),
            ParamDef::limit(50),
            ParamDef::include_removed(),
        ]
    }

    fn field_of(err: Error) -> String {
        match err {
            Error::Validation { field, .. } => field,
            other => panic!("expected validation error, got {other}"),
        }
    }

    #[test]
    fn test_missing_required_field_is_named() {
        let err = validate_arguments(&keyword_params(), Some(&object(json!({})))).unwrap_err();
        assert_eq!(field_of(err), "adGroupId");
    }

    #[test]
    fn test_missing_arguments_object_treated_as_empty() {
        let err = validate_arguments(&keyword_params(), None).unwrap_err();
        assert_eq!(field_of(err), "adGroupId");
    }

    #[test]
    fn test_null_counts_as_missing() {
        let args = object(json!({ "adGroupId": null, "keywords": [{ "text": "a" }] }));
        let err = validate_arguments(&keyword_params(), Some(&args)).unwrap_err();
        assert_eq!(field_of(err), "adGroupId");
    }

    #[test]
    fn test_defaults_applied_and_unknown_fields_dropped() {
        let args = object(json!({
            "adGroupId": 123,
            "keywords": [{ "text": "running shoes" }],
            "somethingElse": true,
        }));
        let validated = validate_arguments(&keyword_params(), Some(&args)).unwrap();

        assert_eq!(
            Value::Object(validated),
            json!({
                "adGroupId": "123",
                "keywords": [{ "text": "running shoes", "matchType": "BROAD" }],
                "limit": 50,
                "includeRemoved": false,
            })
        );
    }

    #[test]
    fn test_invalid_enum_in_nested_array_names_path() {
        let args = object(json!({
            "adGroupId": "1",
            "keywords": [{ "text": "a" }, { "text": "b", "matchType": "FUZZY" }],
        }));
        let err = validate_arguments(&keyword_params(), Some(&args)).unwrap_err();
        assert!(err.to_string().contains("FUZZY"));
        assert_eq!(field_of(err), "keywords[1].matchType");
    }

    #[test]
    fn test_empty_array_rejected() {
        let args = object(json!({ "adGroupId": "1", "keywords": [] }));
        let err = validate_arguments(&keyword_params(), Some(&args)).unwrap_err();
        assert_eq!(field_of(err), "keywords");
    }

    #[test]
    fn test_limit_range_enforced() {
        let args = object(json!({ "adGroupId": "1", "keywords": [{ "text": "a" }], "limit": 0 }));
        let err = validate_arguments(&keyword_params(), Some(&args)).unwrap_err();
        assert_eq!(field_of(err), "limit");

        let args = object(json!({ "adGroupId": "1", "keywords": [{ "text": "a" }], "limit": 5.0 }));
        let validated = validate_arguments(&keyword_params(), Some(&args)).unwrap();
        assert_eq!(validated["limit"], json!(5));
    }

    #[test]
    fn test_ids_must_be_numeric() {
        let params = vec![ParamDef::campaign_id(true)];
        for bad in [json!("abc"), json!(-4), json!(""), json!(true)] {
            let args = object(json!({ "campaignId": bad }));
            assert_eq!(
                field_of(validate_arguments(&params, Some(&args)).unwrap_err()),
                "campaignId"
            );
        }
    }

    #[test]
    fn test_money_must_be_non_negative() {
        let params = vec![ParamDef::money("budget", "Daily budget", true)];
        let args = object(json!({ "budget": -1.5 }));
        assert_eq!(
            field_of(validate_arguments(&params, Some(&args)).unwrap_err()),
            "budget"
        );

        let args = object(json!({ "budget": 12.5 }));
        let validated = validate_arguments(&params, Some(&args)).unwrap();
        assert_eq!(validated["budget"], json!(12.5));
    }

    #[test]
    fn test_nested_object_dates_validated() {
        let params = vec![ParamDef::custom_date_range()];
        let args = object(json!({
            "customDateRange": { "startDate": "2024-01-01", "endDate": "2024-13-01" }
        }));
        let err = validate_arguments(&params, Some(&args)).unwrap_err();
        assert_eq!(field_of(err), "customDateRange.endDate");
    }

    #[test]
    fn test_string_length_limit() {
        let params = vec![ParamDef::required(
            "headlines",
            "Headlines",
            ParamType::StringArray {
                min_items: 1,
                max_items: Some(2),
                max_len:   Some(5),
            },
        )];
        let args = object(json!({ "headlines": ["short", "too long"] }));
        assert_eq!(
            field_of(validate_arguments(&params, Some(&args)).unwrap_err()),
            "headlines[1]"
        );

        let args = object(json!({ "headlines": ["a", "b", "c"] }));
        assert_eq!(
            field_of(validate_arguments(&params, Some(&args)).unwrap_err()),
            "headlines"
        );
    }
}
