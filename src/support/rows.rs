//! Read access to raw result rows.
//!
//! Rows arrive as nested camelCase JSON (`{"campaign": {"id": "1"}, "metrics": {...}}`). 64-bit
//! counters and ids are JSON strings, doubles are numbers, and absent fields are simply missing.
//! [`Row`] hides those differences behind dotted-path getters with zero/empty defaults.

use serde_json::Value;

use super::money::from_micros;

/// Borrowed view over one result row
#[derive(Debug, Clone, Copy)]
pub struct Row<'a>(&'a Value);

impl<'a> Row<'a> {
    pub const fn new(value: &'a Value) -> Self {
        Self(value)
    }

    /// Value at a dotted camelCase path (`metrics.costMicros`)
    pub fn get(&self, path: &str) -> Option<&'a Value> {
        path.split('.')
            .try_fold(self.0, |value, segment| value.get(segment))
            .filter(|value| !value.is_null())
    }

    pub fn opt_text(&self, path: &str) -> Option<String> {
        self.get(path).map(|value| match value {
            Value::String(text) => text.clone(),
            other => other.to_string(),
        })
    }

    /// Text at `path`, empty when absent
    pub fn text(&self, path: &str) -> String {
        self.opt_text(path).unwrap_or_default()
    }

    #[allow(clippy::cast_possible_truncation)]
    pub fn opt_int(&self, path: &str) -> Option<i64> {
        self.get(path).and_then(|value| match value {
            Value::String(text) => text.parse().ok(),
            Value::Number(number) => number
                .as_i64()
                .or_else(|| number.as_f64().map(|n| n as i64)),
            _ => None,
        })
    }

    /// Integer at `path`, zero when absent
    pub fn int(&self, path: &str) -> i64 {
        self.opt_int(path).unwrap_or(0)
    }

    pub fn opt_float(&self, path: &str) -> Option<f64> {
        self.get(path).and_then(|value| match value {
            Value::String(text) => text.parse().ok(),
            Value::Number(number) => number.as_f64(),
            _ => None,
        })
    }

    /// Float at `path`, zero when absent
    pub fn float(&self, path: &str) -> f64 {
        self.opt_float(path).unwrap_or(0.0)
    }

    /// Micros at `path` converted to a currency amount, when present
    pub fn opt_money(&self, path: &str) -> Option<f64> {
        self.opt_int(path).map(from_micros)
    }

    /// Micros at `path` converted to a currency amount, zero when absent
    pub fn money(&self, path: &str) -> f64 {
        self.opt_money(path).unwrap_or(0.0)
    }

    pub fn flag(&self, path: &str) -> bool {
        self.get(path).and_then(Value::as_bool).unwrap_or(false)
    }

    /// Trailing id of the resource name at `path`
    pub fn resource_id(&self, path: &str) -> Option<String> {
        self.get(path)
            .and_then(Value::as_str)
            .map(id_from_resource_name)
    }

    /// Strings of an array at `path`; object items contribute their `text` field
    pub fn texts(&self, path: &str) -> Vec<String> {
        self.get(path)
            .and_then(Value::as_array)
            .map(|items| {
                items
                    .iter()
                    .filter_map(|item| match item {
                        Value::String(text) => Some(text.clone()),
                        Value::Object(_) => {
                            item.get("text").and_then(Value::as_str).map(String::from)
                        }
                        _ => None,
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

/// Final segment of a resource name: `customers/1/adGroupCriteria/7~99` -> `99`
pub fn id_from_resource_name(resource_name: &str) -> String {
    let last = resource_name.rsplit('/').next().unwrap_or(resource_name);
    last.rsplit('~').next().unwrap_or(last).to_string()
}

/// Wrap every raw row in a [`Row`]
pub fn rows(values: &[Value]) -> impl Iterator<Item = Row<'_>> {
    values.iter().map(Row::new)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_id_from_resource_name() {
        assert_eq!(id_from_resource_name("customers/1/campaigns/42"), "42");
        assert_eq!(id_from_resource_name("customers/1/adGroupCriteria/7~99"), "99");
        assert_eq!(id_from_resource_name("42"), "42");
    }

    #[test]
    fn test_getters_default_when_absent_or_null() {
        let value = json!({ "campaign": { "id": "12", "name": null } });
        let row = Row::new(&value);
        assert_eq!(row.text("campaign.id"), "12");
        assert_eq!(row.opt_text("campaign.name"), None);
        assert_eq!(row.int("metrics.clicks"), 0);
        assert!(row.float("metrics.ctr").abs() < f64::EPSILON);
        assert!(!row.flag("customer.manager"));
    }

    #[test]
    fn test_numeric_strings_and_numbers() {
        let value = json!({ "metrics": { "clicks": "17", "conversions": 2.5, "costMicros": 2_500_000 } });
        let row = Row::new(&value);
        assert_eq!(row.int("metrics.clicks"), 17);
        assert!((row.float("metrics.conversions") - 2.5).abs() < f64::EPSILON);
        assert!((row.money("metrics.costMicros") - 2.5).abs() < f64::EPSILON);
    }

    #[test]
    fn test_resource_id_and_texts() {
        let value = json!({
            "campaign": { "campaignBudget": "customers/1/campaignBudgets/555" },
            "adGroupAd": { "ad": { "responsiveSearchAd": { "headlines": [{ "text": "A" }, { "text": "B" }] } } },
            "finalUrls": ["https://example.com"]
        });
        let row = Row::new(&value);
        assert_eq!(row.resource_id("campaign.campaignBudget").as_deref(), Some("555"));
        assert_eq!(row.texts("adGroupAd.ad.responsiveSearchAd.headlines"), ["A", "B"]);
        assert_eq!(row.texts("finalUrls"), ["https://example.com"]);
    }
}
