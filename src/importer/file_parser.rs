// ==========================================
// Trade Import - File Parsers
// ==========================================
// Turns downloaded object bytes into raw rows. The orchestrator only
// supplies the dispatch-by-extension policy; the heavy lifting lives in
// the csv and calamine crates.
// Supported: CSV (.csv) / Excel (.xlsx, .xls)
// ==========================================

use calamine::{Data, Range, Reader, Xls, Xlsx};
use std::io::Cursor;

use crate::domain::{RawCellValue, RawKey, RawRow};
use crate::importer::error::{ImportError, ImportResult};

/// Supported upload formats, decided by file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Xlsx,
    Xls,
}

impl FileFormat {
    pub fn from_path(object_path: &str) -> Option<Self> {
        let ext = object_path.rsplit('.').next()?.to_ascii_lowercase();
        match ext.as_str() {
            "csv" => Some(FileFormat::Csv),
            "xlsx" => Some(FileFormat::Xlsx),
            "xls" => Some(FileFormat::Xls),
            _ => None,
        }
    }
}

/// Output of parsing one uploaded file: the original header row plus
/// every data row keyed by header (cells beyond the header row fall
/// back to index keys).
#[derive(Debug, Clone)]
pub struct ParsedFile {
    pub headers: Vec<String>,
    pub rows: Vec<RawRow>,
}

/// Parse object bytes according to the object path's extension.
/// Unknown extensions fail the whole job immediately.
pub fn parse_object(object_path: &str, bytes: &[u8]) -> ImportResult<ParsedFile> {
    match FileFormat::from_path(object_path) {
        Some(FileFormat::Csv) => parse_csv(bytes),
        Some(FileFormat::Xlsx) => parse_xlsx(bytes),
        Some(FileFormat::Xls) => parse_xls(bytes),
        None => Err(ImportError::UnsupportedFormat(
            object_path.rsplit('.').next().unwrap_or("").to_string(),
        )),
    }
}

// ==========================================
// CSV
// ==========================================
pub fn parse_csv(bytes: &[u8]) -> ImportResult<ParsedFile> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // tolerate ragged rows
        .from_reader(bytes);

    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        let record = record?;
        let mut row: RawRow = Vec::with_capacity(record.len());
        for (col_idx, value) in record.iter().enumerate() {
            let key = match headers.get(col_idx) {
                Some(header) if !header.is_empty() => RawKey::Header(header.clone()),
                _ => RawKey::Index(col_idx),
            };
            let trimmed = value.trim();
            let cell = if trimmed.is_empty() {
                RawCellValue::Null
            } else {
                RawCellValue::Text(trimmed.to_string())
            };
            row.push((key, cell));
        }
        // Fully blank lines are not data rows.
        if row.iter().all(|(_, v)| v.is_absent()) {
            continue;
        }
        rows.push(row);
    }

    Ok(ParsedFile { headers, rows })
}

// ==========================================
// Excel
// ==========================================
// First worksheet only; multi-sheet workbooks import their first tab.
pub fn parse_xlsx(bytes: &[u8]) -> ImportResult<ParsedFile> {
    let mut workbook: Xlsx<_> = Xlsx::new(Cursor::new(bytes))?;
    let first = first_sheet_name(workbook.sheet_names())?;
    let range = workbook.worksheet_range(&first)?;
    sheet_to_parsed(&range)
}

pub fn parse_xls(bytes: &[u8]) -> ImportResult<ParsedFile> {
    let mut workbook: Xls<_> = Xls::new(Cursor::new(bytes))?;
    let first = first_sheet_name(workbook.sheet_names())?;
    let range = workbook.worksheet_range(&first)?;
    sheet_to_parsed(&range)
}

fn first_sheet_name(sheet_names: Vec<String>) -> ImportResult<String> {
    sheet_names
        .into_iter()
        .next()
        .ok_or_else(|| ImportError::ExcelParseError("workbook has no worksheets".to_string()))
}

fn sheet_to_parsed(range: &Range<Data>) -> ImportResult<ParsedFile> {
    let mut rows_iter = range.rows();
    let header_row = rows_iter
        .next()
        .ok_or_else(|| ImportError::ExcelParseError("worksheet has no header row".to_string()))?;

    let headers: Vec<String> = header_row
        .iter()
        .map(|cell| cell.to_string().trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for data_row in rows_iter {
        let mut row: RawRow = Vec::with_capacity(data_row.len());
        for (col_idx, cell) in data_row.iter().enumerate() {
            let key = match headers.get(col_idx) {
                Some(header) if !header.is_empty() => RawKey::Header(header.clone()),
                _ => RawKey::Index(col_idx),
            };
            row.push((key, cell_to_raw(cell)));
        }
        if row.iter().all(|(_, v)| v.is_absent()) {
            continue;
        }
        rows.push(row);
    }

    Ok(ParsedFile { headers, rows })
}

fn cell_to_raw(cell: &Data) -> RawCellValue {
    match cell {
        Data::Empty => RawCellValue::Null,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                RawCellValue::Null
            } else {
                RawCellValue::Text(trimmed.to_string())
            }
        }
        Data::Float(f) => RawCellValue::Number(*f),
        Data::Int(i) => RawCellValue::Number(*i as f64),
        Data::Bool(b) => RawCellValue::Text(b.to_string()),
        // Date cells keep their serial value; the canonicalizer turns
        // them into calendar dates for date-typed fields.
        Data::DateTime(dt) => RawCellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawCellValue::Text(s.clone()),
        Data::Error(_) => RawCellValue::Null,
    }
}
