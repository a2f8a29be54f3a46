use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, Range, Reader};

use super::{LeadSource, RawLead, RawValue};

/// Excel workbook (`.xlsx`, `.xls`). Only the first worksheet is read; its
/// first row is the header.
pub struct SpreadsheetSource {
    columns: Vec<String>,
    rows: Vec<RawLead>,
}

impl SpreadsheetSource {
    pub fn open(path: &Path) -> Result<Self> {
        let mut workbook = open_workbook_auto(path)
            .with_context(|| format!("Failed to open workbook {}", path.display()))?;
        let range = workbook
            .worksheet_range_at(0)
            .context("Workbook has no worksheets")?
            .context("Failed to read the first worksheet")?;
        Ok(Self::from_range(&range))
    }

    pub fn from_range(range: &Range<Data>) -> Self {
        let mut cells = range.rows();
        let columns: Vec<String> = cells
            .next()
            .map(|header| {
                header
                    .iter()
                    .map(|cell| to_raw(cell).as_text().unwrap_or_default())
                    .collect()
            })
            .unwrap_or_default();

        let rows = cells
            .enumerate()
            .map(|(index, row)| {
                let mut lead = RawLead::new(index);
                for (column, cell) in columns.iter().zip(row) {
                    if !column.is_empty() {
                        lead.fields.insert(column.clone(), to_raw(cell));
                    }
                }
                lead
            })
            .collect();

        SpreadsheetSource { columns, rows }
    }
}

impl LeadSource for SpreadsheetSource {
    fn columns(&self) -> &[String] {
        &self.columns
    }

    fn rows(&self) -> &[RawLead] {
        &self.rows
    }
}

/// Typed cell to [`RawValue`]. Error cells (`#N/A`, `#DIV/0!`) read as empty.
pub fn to_raw(cell: &Data) -> RawValue {
    match cell {
        Data::String(s) => RawValue::Text(s.clone()),
        Data::Float(f) => RawValue::Number(*f),
        Data::Int(i) => RawValue::Number(*i as f64),
        Data::Bool(b) => RawValue::Bool(*b),
        Data::DateTime(dt) => RawValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawValue::Text(s.clone()),
        Data::Error(_) | Data::Empty => RawValue::Null,
    }
}
