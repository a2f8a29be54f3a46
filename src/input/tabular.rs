use anyhow::{Context, Result};
use csv::ReaderBuilder;

use super::{LeadSource, RawLead, RawValue};

/// Delimited text export with a header row.
///
/// Every cell is kept as [`RawValue::Text`]; short rows simply lack the
/// trailing keys, which the normalizer treats as absent.
pub struct TabularSource {
    columns: Vec<String>,
    rows: Vec<RawLead>,
}

impl TabularSource {
    pub fn parse(content: &str, delimiter: u8) -> Result<Self> {
        let mut reader = ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(content.as_bytes());

        let columns: Vec<String> = reader
            .headers()
            .context("failed to read header row")?
            .iter()
            .map(|h| h.trim().trim_start_matches('\u{feff}').to_string())
            .collect();

        let mut rows = Vec::new();
        for (index, record) in reader.records().enumerate() {
            let record = record.with_context(|| format!("malformed row {}", index + 1))?;
            let mut lead = RawLead::new(index);
            for (column, cell) in columns.iter().zip(record.iter()) {
                lead.fields
                    .insert(column.clone(), RawValue::Text(cell.to_string()));
            }
            rows.push(lead);
        }

        Ok(TabularSource { columns, rows })
    }
}

impl LeadSource for TabularSource {
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
    fn test_parse_csv_with_quotes_and_short_rows() {
        let content = "Lead Name,Contact Number,Missed Demos\n\"Doe, Jane\",555 0100,2\nSam\n";
        let source = TabularSource::parse(content, b',').unwrap();

        assert_eq!(source.columns(), &["Lead Name", "Contact Number", "Missed Demos"]);
        assert_eq!(source.rows().len(), 2);
        assert_eq!(
            source.rows()[0].get("Lead Name"),
            Some(&RawValue::Text("Doe, Jane".to_string()))
        );
        assert_eq!(source.rows()[1].get("Missed Demos"), None);
    }

    #[test]
    fn test_parse_tsv_strips_bom_from_header() {
        let content = "\u{feff}Lead Name\tMissed Demos\nAsha\t0\n";
        let source = TabularSource::parse(content, b'\t').unwrap();

        assert_eq!(source.columns()[0], "Lead Name");
        assert_eq!(source.rows()[0].text("Missed Demos"), Some("0".to_string()));
    }
}
