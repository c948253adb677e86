// ==========================================
// Trade Import - Row Canonicalizer
// ==========================================
// Converts one raw parsed row into a canonical row: resolve each key,
// coerce by semantic type, omit empty/unparseable values. Unrecognized
// columns are dropped silently (they are not errors at this stage) but
// can be observed through an injectable sink.
// ==========================================

use chrono::NaiveDate;

use crate::domain::{CanonicalRow, CanonicalValue, RawCellValue, RawKey, RawRow, SemanticType};
use crate::importer::header_mapper::HeaderMapping;
use crate::importer::resolver::AliasResolver;

/// Observer for columns the canonicalizer drops because no canonical
/// field could be resolved. Default behavior is silent.
pub trait DroppedColumnSink: Send + Sync {
    fn column_dropped(&self, row_number: usize, key: &RawKey);
}

pub struct RowCanonicalizer<'a> {
    resolver: &'a AliasResolver,
    dropped_sink: Option<&'a dyn DroppedColumnSink>,
}

impl<'a> RowCanonicalizer<'a> {
    pub fn new(resolver: &'a AliasResolver) -> Self {
        Self {
            resolver,
            dropped_sink: None,
        }
    }

    pub fn with_dropped_sink(mut self, sink: &'a dyn DroppedColumnSink) -> Self {
        self.dropped_sink = Some(sink);
        self
    }

    /// Build the canonical row for one raw input row.
    ///
    /// Header keys resolve through the alias resolver; index keys fall
    /// back to the positional header mapping when one was supplied.
    /// When several raw columns resolve to the same canonical field the
    /// last one in row order wins.
    pub fn to_canonical_row(
        &self,
        row_number: usize,
        raw: &RawRow,
        mapping: Option<&HeaderMapping>,
    ) -> CanonicalRow {
        let mut out = CanonicalRow::new();
        for (key, value) in raw {
            // Absent cells are omitted from the canonical row entirely.
            if value.is_absent() {
                continue;
            }
            let field = match key {
                RawKey::Header(header) => self.resolver.resolve(Some(header)),
                RawKey::Index(index) => mapping.and_then(|m| m.canonical_at(*index)),
            };
            let Some(field) = field else {
                if let Some(sink) = self.dropped_sink {
                    sink.column_dropped(row_number, key);
                }
                continue;
            };
            if let Some(coerced) = coerce(field.semantic_type(), value) {
                out.insert(field, coerced);
            }
        }
        out
    }
}

/// Coerce one cell by the target field's semantic type. `None` means
/// "no value": the field is omitted, never an error at this layer.
fn coerce(kind: SemanticType, value: &RawCellValue) -> Option<CanonicalValue> {
    match kind {
        SemanticType::Number => coerce_number(value).map(CanonicalValue::Number),
        SemanticType::Text => coerce_text(value).map(CanonicalValue::Text),
        SemanticType::Date => coerce_date(value).map(CanonicalValue::Date),
    }
}

fn coerce_number(value: &RawCellValue) -> Option<f64> {
    match value {
        RawCellValue::Number(n) => (!n.is_nan()).then_some(*n),
        RawCellValue::Text(s) => parse_numeric(s),
        RawCellValue::Null => None,
    }
}

/// Parse a formatted numeric string, stripping currency and grouping
/// decoration: `$`, `,`, whitespace, and parentheses.
pub fn parse_numeric(raw: &str) -> Option<f64> {
    let stripped: String = raw
        .chars()
        .filter(|c| !matches!(c, '$' | ',' | '(' | ')') && !c.is_whitespace())
        .collect();
    if stripped.is_empty() || stripped == "-" {
        return None;
    }
    stripped.parse::<f64>().ok().filter(|n| !n.is_nan())
}

fn coerce_text(value: &RawCellValue) -> Option<String> {
    match value {
        RawCellValue::Text(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        RawCellValue::Number(n) => {
            if n.is_nan() {
                return None;
            }
            // Whole numbers render without a trailing ".0" so codes
            // like "847130" survive an Excel numeric cell.
            if n.fract() == 0.0 && n.abs() < 1e15 {
                Some(format!("{}", *n as i64))
            } else {
                Some(n.to_string())
            }
        }
        RawCellValue::Null => None,
    }
}

fn coerce_date(value: &RawCellValue) -> Option<NaiveDate> {
    match value {
        RawCellValue::Text(s) => parse_date(s.trim()),
        RawCellValue::Number(n) => excel_serial_to_date(*n),
        RawCellValue::Null => None,
    }
}

/// Date formats observed in third-party shipment exports.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%Y%m%d", "%d-%b-%Y"];

fn parse_date(raw: &str) -> Option<NaiveDate> {
    if raw.is_empty() {
        return None;
    }
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
}

/// XLSX date cells arrive as serial day counts with epoch 1899-12-30.
/// Values outside a plausible range are treated as plain numbers that
/// happen to land in a date column, i.e. "no value".
fn excel_serial_to_date(serial: f64) -> Option<NaiveDate> {
    if !serial.is_finite() || !(1.0..=2_958_465.0).contains(&serial) {
        return None;
    }
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?;
    epoch.checked_add_days(chrono::Days::new(serial.trunc() as u64))
}
