use std::collections::BTreeMap;

use anyhow::Result;
use serde::Serialize;

use crate::models::{ProcessedLead, RiskCategory};
use crate::risk::stats::CategoryStats;

#[derive(Serialize)]
struct JsonReport<'a> {
    statistics: &'a BTreeMap<RiskCategory, CategoryStats>,
    invalid_phone: usize,
    leads: &'a [ProcessedLead],
}

/// Serialize the report as pretty-printed JSON.
pub fn to_string(
    leads: &[ProcessedLead],
    stats: &BTreeMap<RiskCategory, CategoryStats>,
) -> Result<String> {
    let report = JsonReport {
        statistics: stats,
        invalid_phone: leads.iter().filter(|l| l.phone.is_none()).count(),
        leads,
    };
    Ok(serde_json::to_string_pretty(&report)?)
}

pub fn render(leads: &[ProcessedLead], stats: &BTreeMap<RiskCategory, CategoryStats>) -> Result<()> {
    println!("{}", to_string(leads, stats)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{fields, RawLead, RawValue};
    use crate::pipeline::process_row;
    use crate::risk::stats::statistics;

    #[test]
    fn test_json_shape() {
        let raw = RawLead::new(0)
            .with(fields::LEAD_NAME, RawValue::Text("Asha".to_string()))
            .with(fields::MISSED_DEMOS, RawValue::Number(2.0));
        let leads = vec![process_row(&raw)];
        let stats = statistics(&[leads[0].risk]);

        let json: serde_json::Value = serde_json::from_str(&to_string(&leads, &stats).unwrap()).unwrap();

        assert_eq!(json["statistics"]["High"]["count"], 1);
        assert_eq!(json["invalid_phone"], 1);
        assert_eq!(json["leads"][0]["name"], "Asha");
        assert_eq!(json["leads"][0]["risk"], "High");
        assert_eq!(json["leads"][0]["rule"], "missed-demo");
        assert_eq!(json["leads"][0]["record"]["scheduled_by"], "Other");
        assert!(json["leads"][0]["phone"].is_null());
    }
}
