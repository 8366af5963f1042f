use std::fs::File;
use std::io;
use std::path::Path;

use anyhow::{Context, Result};
use calamine::{open_workbook_auto, Data, DataType, Reader};
use log::debug;
use thiserror::Error;

use crate::vouchers::builder::OutputDocument;
use crate::vouchers::Cell;

#[derive(Debug, Error)]
pub enum SheetError {
    #[error("unsupported file extension: {0}")]
    UnsupportedExtension(String),
    #[error("workbook has no sheets")]
    NoSheets,
}

/// A parsed input file: one trimmed header row plus the data rows below it.
/// Rows that are entirely empty are dropped at ingestion.
#[derive(Debug, Default)]
pub struct Sheet {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Reads the input file, dispatching on its extension. CSV goes through the
/// csv crate; xlsx/xlsm/xls/xlsb/ods go through calamine (first worksheet).
pub fn read_sheet(path: &str) -> Result<Sheet> {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase)
        .unwrap_or_default();

    match extension.as_str() {
        "csv" => {
            let file = File::open(path).with_context(|| format!("failed to open {path}"))?;
            read_csv(file)
        },
        "xlsx" | "xlsm" | "xls" | "xlsb" | "ods" => read_workbook(path),
        other => Err(SheetError::UnsupportedExtension(other.to_string()).into()),
    }
}

pub fn read_csv<Rd: io::Read>(reader: Rd) -> Result<Sheet> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let mut sheet = Sheet::default();
    for (index, record) in csv_reader.records().enumerate() {
        let record = record?;
        if index == 0 {
            sheet.headers = record.iter().map(|h| h.trim().to_string()).collect();
            continue;
        }

        let cells: Vec<Cell> = record
            .iter()
            .map(|field| {
                if field.is_empty() {
                    Cell::Empty
                } else {
                    Cell::Text(field.to_string())
                }
            })
            .collect();
        push_row(&mut sheet, index, cells);
    }

    Ok(sheet)
}

fn read_workbook(path: &str) -> Result<Sheet> {
    let mut workbook = open_workbook_auto(path).with_context(|| format!("failed to open {path}"))?;
    let range = workbook.worksheet_range_at(0).ok_or(SheetError::NoSheets)??;

    let mut sheet = Sheet::default();
    for (index, row) in range.rows().enumerate() {
        if index == 0 {
            sheet.headers = row
                .iter()
                .map(|c| c.as_string().unwrap_or_default().trim().to_string())
                .collect();
            continue;
        }

        let cells: Vec<Cell> = row.iter().map(convert_cell).collect();
        push_row(&mut sheet, index, cells);
    }

    Ok(sheet)
}

fn push_row(sheet: &mut Sheet, index: usize, cells: Vec<Cell>) {
    if cells.iter().all(Cell::is_empty) {
        debug!("skipping empty row, index={}", index);
        return;
    }
    sheet.rows.push(cells);
}

fn convert_cell(cell: &Data) -> Cell {
    match cell {
        Data::Empty | Data::Error(_) => Cell::Empty,
        Data::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                Cell::Empty
            } else {
                Cell::Text(trimmed.to_string())
            }
        },
        Data::Int(i) => Cell::Number(*i as f64),
        Data::Float(f) => Cell::Number(*f),
        // Keep the raw serial so date normalization sees what the sheet stored.
        Data::DateTime(dt) => Cell::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => Cell::Text(s.clone()),
        Data::Bool(b) => Cell::Text(b.to_string()),
    }
}

/// Writes the import payload as pretty-printed JSON, the shape the
/// destination system's import dialog accepts.
pub fn export_json<W: io::Write>(mut writer: W, document: &OutputDocument) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, document)?;
    writeln!(writer)?;
    Ok(())
}
