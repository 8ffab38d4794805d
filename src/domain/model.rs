use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

/// One input row keyed by header, plus its spreadsheet row number
/// (header is row 1, so the first data row is row 2).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    pub row: usize,
    pub data: HashMap<String, String>,
}

impl Record {
    pub fn new(row: usize, data: HashMap<String, String>) -> Self {
        Self { row, data }
    }

    /// Trimmed cell value. Blank cells and spreadsheet `nan` placeholders
    /// count as missing.
    pub fn field(&self, column: &str) -> Option<&str> {
        self.data
            .get(column)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty() && *value != "nan")
    }

    /// First present value among alternative header spellings.
    pub fn field_any(&self, columns: &[String]) -> Option<&str> {
        columns.iter().find_map(|column| self.field(column))
    }
}

/// Canonical garment size codes, plus whatever short literal the form
/// contained when it did not match one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum Size {
    S,
    M,
    L,
    XL,
    XXL,
    Other(String),
}

impl Size {
    pub fn as_str(&self) -> &str {
        match self {
            Size::S => "S",
            Size::M => "M",
            Size::L => "L",
            Size::XL => "XL",
            Size::XXL => "XXL",
            Size::Other(label) => label,
        }
    }

    /// Printing order: S, M, L, XL, XXL, then everything else.
    pub fn rank(&self) -> u32 {
        match self {
            Size::S => 1,
            Size::M => 2,
            Size::L => 3,
            Size::XL => 4,
            Size::XXL => 5,
            Size::Other(_) => 999,
        }
    }
}

impl From<&str> for Size {
    fn from(label: &str) -> Self {
        match label.trim().to_uppercase().as_str() {
            "S" => Size::S,
            "M" => Size::M,
            "L" => Size::L,
            "XL" => Size::XL,
            "XXL" => Size::XXL,
            other => Size::Other(other.to_string()),
        }
    }
}

impl From<String> for Size {
    fn from(label: String) -> Self {
        Size::from(label.as_str())
    }
}

impl From<Size> for String {
    fn from(size: Size) -> Self {
        size.as_str().to_string()
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A person asking for a numbered jersey. `submission_order` is the
/// position in arrival order, earliest first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registrant {
    pub name: String,
    pub requested_number: Option<u32>,
    pub submission_order: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Resolution {
    /// Got the number they asked for.
    Granted,
    /// Asked for a number someone earlier already holds.
    Conflict { requested: u32 },
    /// Request was missing or outside the pool.
    Substituted,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Assignment {
    pub name: String,
    pub number: u8,
    pub resolution: Resolution,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NumberConflict {
    pub name: String,
    pub requested: u32,
    pub assigned: u8,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct LineItem {
    pub design: String,
    pub size: Size,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderRequest {
    pub person: String,
    pub designs: Vec<String>,
    pub quantity_per_size: Vec<(Size, u32)>,
}

/// Rows the batch left out, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SkippedRow {
    pub row: usize,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ConversionReport {
    pub mode: String,
    pub rows_read: usize,
    pub rows_written: usize,
    pub skipped: Vec<SkippedRow>,
    pub conflicts: Vec<NumberConflict>,
    pub substitutions: Vec<Assignment>,
    pub breakdowns: BTreeMap<String, Vec<(String, usize)>>,
}

impl ConversionReport {
    pub fn new(mode: &str) -> Self {
        Self {
            mode: mode.to_string(),
            ..Self::default()
        }
    }

    pub fn skip(&mut self, row: usize, reason: impl Into<String>) {
        let reason = reason.into();
        tracing::warn!("⚠️  Skipping row {} - {}", row, reason);
        self.skipped.push(SkippedRow { row, reason });
    }

    /// Counts by value, most frequent first, ties alphabetical.
    pub fn add_breakdown<'a, I>(&mut self, label: &str, values: I)
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for value in values {
            *counts.entry(value).or_insert(0) += 1;
        }
        let mut counts: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(value, count)| (value.to_string(), count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

        tracing::info!("📊 {} breakdown:", label);
        for (value, count) in &counts {
            tracing::info!("  {:<24} {}", value, count);
        }
        self.breakdowns.insert(label.to_string(), counts);
    }
}

/// Output of a transform step: the encoded CSV plus what happened.
#[derive(Debug, Clone)]
pub struct TransformResult {
    pub csv_output: Vec<u8>,
    pub report: ConversionReport,
}
