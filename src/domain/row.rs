// ==========================================
// Trade Import - Raw Row Model
// ==========================================
// What the file parsers hand to the row canonicalizer: an ordered list
// of (key, cell) pairs. Keys are either the original header string or a
// bare column index (array-derived sources), kept as an explicit
// discriminant instead of a stringly-typed probe.
// ==========================================

use serde::{Deserialize, Serialize};

/// How a raw cell is addressed within its row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RawKey {
    /// Original (un-normalized) column header.
    Header(String),
    /// Zero-based column index, for sources keyed positionally.
    Index(usize),
}

impl RawKey {
    pub fn header(s: impl Into<String>) -> Self {
        RawKey::Header(s.into())
    }

    /// Display form used when preserving rejected rows for inspection.
    pub fn label(&self) -> String {
        match self {
            RawKey::Header(h) => h.clone(),
            RawKey::Index(i) => i.to_string(),
        }
    }
}

/// An untyped cell value as produced by the spreadsheet/CSV parsers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RawCellValue {
    Text(String),
    Number(f64),
    Null,
}

impl RawCellValue {
    /// Absent cells are skipped entirely by the canonicalizer.
    pub fn is_absent(&self) -> bool {
        match self {
            RawCellValue::Null => true,
            RawCellValue::Text(s) => s.is_empty(),
            RawCellValue::Number(_) => false,
        }
    }
}

/// One parsed input row, in original column order.
pub type RawRow = Vec<(RawKey, RawCellValue)>;

/// Serialize a raw row to a JSON object for error-record preservation.
/// Index keys are rendered as their decimal string.
pub fn raw_row_to_json(row: &RawRow) -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for (key, value) in row {
        let v = match value {
            RawCellValue::Text(s) => serde_json::Value::String(s.clone()),
            RawCellValue::Number(n) => serde_json::Number::from_f64(*n)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            RawCellValue::Null => serde_json::Value::Null,
        };
        map.insert(key.label(), v);
    }
    serde_json::Value::Object(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_cells() {
        assert!(RawCellValue::Null.is_absent());
        assert!(RawCellValue::Text(String::new()).is_absent());
        assert!(!RawCellValue::Text(" ".to_string()).is_absent());
        assert!(!RawCellValue::Number(0.0).is_absent());
    }

    #[test]
    fn test_raw_row_to_json_preserves_values() {
        let row: RawRow = vec![
            (RawKey::header("Company"), RawCellValue::Text("Acme".into())),
            (RawKey::Index(3), RawCellValue::Number(12.5)),
            (RawKey::header("Notes"), RawCellValue::Null),
        ];
        let json = raw_row_to_json(&row);
        assert_eq!(json["Company"], "Acme");
        assert_eq!(json["3"], 12.5);
        assert!(json["Notes"].is_null());
    }
}
