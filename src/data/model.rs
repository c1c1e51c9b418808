use std::fmt;

use serde::Serialize;

/// Header of the composite key column in the raw Eurostat extract.
pub const COMPOSITE_KEY_LABEL: &str = r"unit,sex,age,geo\time";

/// Column names of the cleaned output, in order.
pub const OUTPUT_COLUMNS: [&str; 6] = ["unit", "sex", "age", "region", "year", "value"];

// ---------------------------------------------------------------------------
// WideTable – the raw extract as loaded from a tab-delimited file
// ---------------------------------------------------------------------------

/// One row of the raw extract: the composite key plus one raw cell per year.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WideRow {
    /// Comma-joined `unit,sex,age,region` tokens.
    pub key: String,
    /// Raw cell text, one per entry of [`WideTable::year_columns`].
    pub cells: Vec<String>,
}

/// Wide-format table: one row per category tuple, one column per year.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct WideTable {
    /// Year column headers exactly as they appear in the source (e.g. `"2019 "`).
    pub year_columns: Vec<String>,
    pub rows: Vec<WideRow>,
}

impl WideTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// CategoryKey – the four discrete fields of a composite key
// ---------------------------------------------------------------------------

/// The four category fields identifying a series.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CategoryKey {
    pub unit: String,
    pub sex: String,
    pub age: String,
    pub region: String,
}

impl fmt::Display for CategoryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{},{},{}", self.unit, self.sex, self.age, self.region)
    }
}

/// A wide row whose composite key has been split into its four fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyedRow {
    pub key: CategoryKey,
    pub cells: Vec<String>,
}

/// Wide table after key splitting; year columns are untouched.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyedTable {
    pub year_columns: Vec<String>,
    pub rows: Vec<KeyedRow>,
}

impl KeyedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// MeltedTable – long rows whose year and value are still text
// ---------------------------------------------------------------------------

/// A single (series, year) observation before numeric casting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawObservation {
    pub key: CategoryKey,
    pub year: String,
    pub value: String,
}

/// Long-format table with text `year` and `value` fields.
///
/// Produced by the reshaper for tab-delimited sources and directly by the
/// record-oriented loaders.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct MeltedTable {
    pub rows: Vec<RawObservation>,
}

impl MeltedTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// LongTable – the cleaned, typed result
// ---------------------------------------------------------------------------

/// One cleaned observation; serialises to the output column order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Observation {
    pub unit: String,
    pub sex: String,
    pub age: String,
    pub region: String,
    pub year: u32,
    pub value: f64,
}

/// Cleaned long-format table.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct LongTable {
    pub rows: Vec<Observation>,
}

impl LongTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

// ---------------------------------------------------------------------------
// SourceTable – whatever a loader produced
// ---------------------------------------------------------------------------

/// Output of a [`FormatLoader`](super::loader::FormatLoader).
///
/// Tab-delimited sources carry a composite key and must be split and melted;
/// record-oriented sources arrive already in long format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceTable {
    Wide(WideTable),
    Long(MeltedTable),
}

impl SourceTable {
    /// Number of rows as loaded (wide rows or long records).
    pub fn len(&self) -> usize {
        match self {
            SourceTable::Wide(t) => t.len(),
            SourceTable::Long(t) => t.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
