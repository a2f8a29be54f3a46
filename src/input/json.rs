use anyhow::{bail, Context, Result};
use serde_json::Value;

use super::{LeadSource, RawLead, RawValue};

/// JSON export: an array of objects, one per lead.
///
/// Column order is the order keys are first seen across all rows.
pub struct JsonSource {
    columns: Vec<String>,
    rows: Vec<RawLead>,
}

impl JsonSource {
    pub fn parse(content: &str) -> Result<Self> {
        let json: Value = serde_json::from_str(content).context("invalid JSON lead export")?;
        let Some(items) = json.as_array() else {
            bail!("JSON lead export must be an array of objects");
        };

        let mut columns: Vec<String> = Vec::new();
        let mut rows = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            let Some(object) = item.as_object() else {
                bail!("row {} is not an object", index + 1);
            };
            let mut lead = RawLead::new(index);
            for (key, value) in object {
                if !columns.contains(key) {
                    columns.push(key.clone());
                }
                lead.fields.insert(key.clone(), to_raw(value));
            }
            rows.push(lead);
        }

        Ok(JsonSource { columns, rows })
    }
}

fn to_raw(value: &Value) -> RawValue {
    match value {
        Value::Null => RawValue::Null,
        Value::Bool(b) => RawValue::Bool(*b),
        Value::Number(n) => n.as_f64().map_or(RawValue::Null, RawValue::Number),
        Value::String(s) => RawValue::Text(s.clone()),
        other => RawValue::Text(other.to_string()),
    }
}

impl LeadSource for JsonSource {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn rows(&self) -> &[RawLead] {
        &self.rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_types() {
        let content = r#"[
            {"Lead Name": "Asha", "Missed Demos": 0, "Link Clicked": true, "Contact Shared": null},
            {"Lead Name": "Ben", "Channel": "Ads"}
        ]"#;
        let source = JsonSource::parse(content).unwrap();

        assert_eq!(source.rows().len(), 2);
        let first = &source.rows()[0];
        assert_eq!(first.get("Missed Demos"), Some(&RawValue::Number(0.0)));
        assert_eq!(first.get("Link Clicked"), Some(&RawValue::Bool(true)));
        assert_eq!(first.get("Contact Shared"), Some(&RawValue::Null));
        assert!(source.columns().contains(&"Channel".to_string()));
    }

    #[test]
    fn test_parse_rejects_non_array() {
        assert!(JsonSource::parse(r#"{"Lead Name": "Asha"}"#).is_err());
        assert!(JsonSource::parse(r#"[1, 2]"#).is_err());
    }
}
