//! Lead export loading.
//!
//! - [`tabular`] — CSV / TSV exports with a header row.
//! - [`json`] — a JSON array of row objects, keeping numbers and booleans typed.
//! - [`spreadsheet`] — the first worksheet of an Excel workbook, typed cells kept.
//!
//! All produce [`RawLead`]s: weakly typed rows keyed by exact, case-sensitive
//! column names. Interpretation of the values is left to
//! [`crate::risk::normalizer`].

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::Serialize;

pub mod json;
pub mod spreadsheet;
pub mod tabular;

/// Exact column names of a lead export.
pub mod fields {
    pub const LEAD_NAME: &str = "Lead Name";
    pub const CHANNEL: &str = "Channel";
    pub const CONTACT_NUMBER: &str = "Contact Number";
    pub const SCHEDULED_BY: &str = "Scheduled By";
    pub const LINK_CLICKED: &str = "Link Clicked";
    pub const CONTACT_SHARED: &str = "Contact Shared";
    pub const LAST_INTERACTION_DAYS: &str = "Last Interaction Days";
    pub const MISSED_DEMOS: &str = "Missed Demos";
    pub const SHOWED_UP_FOR_DEMO: &str = "Showed Up for Demo";
}

/// Columns a file must carry before any row is processed.
pub const REQUIRED_COLUMNS: [&str; 8] = [
    fields::LEAD_NAME,
    fields::CONTACT_NUMBER,
    fields::SCHEDULED_BY,
    fields::LINK_CLICKED,
    fields::CONTACT_SHARED,
    fields::LAST_INTERACTION_DAYS,
    fields::MISSED_DEMOS,
    fields::SHOWED_UP_FOR_DEMO,
];

/// A single cell as it appeared in the export.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum RawValue {
    Text(String),
    Number(f64),
    Bool(bool),
    Null,
}

impl RawValue {
    /// Textual form used for token matching, trimmed.
    ///
    /// Integral numbers drop their fractional part so that a spreadsheet
    /// `1.0` reads as `1`. `Null` has no text.
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Text(s) => Some(s.trim().to_string()),
            RawValue::Number(n) if n.is_finite() && n.fract() == 0.0 => {
                Some(format!("{}", *n as i64))
            }
            RawValue::Number(n) if n.is_finite() => Some(n.to_string()),
            RawValue::Number(_) => None,
            RawValue::Bool(b) => Some(b.to_string()),
            RawValue::Null => None,
        }
    }

    /// `true` for `Null`, NaN and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        self.as_text().map_or(true, |s| s.is_empty())
    }
}

impl std::fmt::Display for RawValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RawValue::Text(s) => write!(f, "{s}"),
            RawValue::Number(n) => write!(f, "{n}"),
            RawValue::Bool(b) => write!(f, "{b}"),
            RawValue::Null => Ok(()),
        }
    }
}

/// One row of a lead export.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RawLead {
    /// 0-based index of the data row (header excluded).
    pub row: usize,
    pub fields: BTreeMap<String, RawValue>,
}

impl RawLead {
    pub fn new(row: usize) -> Self {
        RawLead {
            row,
            fields: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: &str, value: RawValue) -> Self {
        self.fields.insert(key.to_string(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<&RawValue> {
        self.fields.get(key)
    }

    /// Trimmed text of a field; `None` when absent, null or blank.
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key)
            .and_then(RawValue::as_text)
            .filter(|s| !s.is_empty())
    }
}

/// Export formats understood by [`load_leads`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Csv,
    Tsv,
    Json,
    Xlsx,
}

impl std::fmt::Display for InputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputFormat::Csv => write!(f, "CSV"),
            InputFormat::Tsv => write!(f, "TSV"),
            InputFormat::Json => write!(f, "JSON"),
            InputFormat::Xlsx => write!(f, "Excel"),
        }
    }
}

/// A reader turning an export file into raw rows.
pub trait LeadSource {
    /// Column names in file order.
    fn columns(&self) -> &[String];
    /// All data rows in file order.
    fn rows(&self) -> &[RawLead];
}

/// Zip (`.xlsx`) and OLE2 (`.xls`) container signatures.
const WORKBOOK_MAGIC: [&[u8]; 2] = [b"PK\x03\x04", b"\xD0\xCF\x11\xE0"];

/// Detect the export format from the extension, falling back to sniffing
/// the content: a workbook signature means Excel, a leading `[` means JSON.
pub fn detect_format(path: &Path, content: &[u8]) -> InputFormat {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);

    match ext.as_deref() {
        Some("csv") => InputFormat::Csv,
        Some("tsv") | Some("tab") => InputFormat::Tsv,
        Some("json") => InputFormat::Json,
        Some("xlsx") | Some("xlsm") | Some("xls") => InputFormat::Xlsx,
        _ => {
            if WORKBOOK_MAGIC.iter().any(|magic| content.starts_with(magic)) {
                InputFormat::Xlsx
            } else if content.iter().find(|b| !b.is_ascii_whitespace()) == Some(&b'[') {
                InputFormat::Json
            } else {
                InputFormat::Csv
            }
        }
    }
}

/// Required columns absent from `columns`, in [`REQUIRED_COLUMNS`] order.
pub fn missing_columns(columns: &[String]) -> Vec<&'static str> {
    REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|required| !columns.iter().any(|c| c == required))
        .collect()
}

/// Read, parse and column-check a lead export.
pub fn load_leads(path: &Path) -> Result<(InputFormat, Vec<RawLead>)> {
    let content = std::fs::read(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let format = detect_format(path, &content);

    let source: Box<dyn LeadSource> = match format {
        InputFormat::Csv => Box::new(tabular::TabularSource::parse(utf8(path, &content)?, b',')?),
        InputFormat::Tsv => Box::new(tabular::TabularSource::parse(utf8(path, &content)?, b'\t')?),
        InputFormat::Json => Box::new(json::JsonSource::parse(utf8(path, &content)?)?),
        InputFormat::Xlsx => Box::new(spreadsheet::SpreadsheetSource::open(path)?),
    };

    let missing = missing_columns(source.columns());
    if !missing.is_empty() {
        bail!("Missing required columns: {}", missing.join(", "));
    }

    tracing::debug!(
        format = %format,
        rows = source.rows().len(),
        "loaded lead export"
    );

    Ok((format, source.rows().to_vec()))
}

fn utf8<'a>(path: &Path, content: &'a [u8]) -> Result<&'a str> {
    std::str::from_utf8(content).with_context(|| format!("{} is not valid UTF-8", path.display()))
}
