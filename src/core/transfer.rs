//! Bulk import/export pipeline and its CSV codec
//!
//! Import is partial-success: every data row is validated and written on its
//! own, failures are collected per row and never abort the batch. The only
//! batch-level rejection is a header that does not match the entity's column
//! contract, which is reported once before any row is read.

use std::fs::File;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use miette::Diagnostic;
use rusqlite::params;
use serde::Serialize;
use thiserror::Error;

use crate::core::entity::{EntityKind, ID_COLUMN};
use crate::core::error::DomainError;
use crate::core::ledger::Ledger;
use crate::core::store::Gateway;
use crate::core::validation::FieldMap;

#[derive(Debug, Error, Diagnostic)]
pub enum TransferError {
    #[error("{kind} columns must be [{expected}] or [id, {expected}], found [{found}]")]
    #[diagnostic(
        code(nova::column_mismatch),
        help("export the table once to see the expected header")
    )]
    ColumnMismatch {
        kind: EntityKind,
        expected: String,
        found: String,
    },

    #[error("bulk import is only supported for partners and products, not {0}")]
    #[diagnostic(code(nova::not_importable))]
    NotImportable(EntityKind),

    #[error("CSV error: {0}")]
    #[diagnostic(code(nova::csv))]
    Csv(#[from] csv::Error),

    #[error("cannot access {path}: {source}")]
    #[diagnostic(code(nova::io))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),
}

/// One data row: its text cells, or why it could not be read
pub type Record = Result<Vec<String>, String>;

/// Tabular data: a header and rows of text cells
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Table {
    pub columns: Vec<String>,
    pub rows: Vec<Record>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Errors of one rejected data row (1-based, header excluded)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowError {
    pub index: usize,
    pub errors: Vec<String>,
}

/// Outcome of an import batch
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImportReport {
    pub accepted: usize,
    pub errors: Vec<RowError>,
}

impl ImportReport {
    pub fn rejected(&self) -> usize {
        self.errors.len()
    }
}

/// Check a header against the column contract
///
/// Accepts the natural fields in declaration order, or the same list preceded
/// by the identity column. Returns whether the identity column is present.
pub fn check_columns(kind: EntityKind, columns: &[String]) -> Result<bool, TransferError> {
    let natural = kind.fields();
    let matches = |cols: &[String]| {
        cols.len() == natural.len() && cols.iter().zip(natural.iter()).all(|(a, b)| a == b)
    };

    if matches(columns) {
        Ok(false)
    } else if columns.first().map(String::as_str) == Some(ID_COLUMN) && matches(&columns[1..]) {
        Ok(true)
    } else {
        Err(TransferError::ColumnMismatch {
            kind,
            expected: natural.join(", "),
            found: columns.join(", "),
        })
    }
}

/// Validate and persist each row of a partner or product table
pub fn import_rows(
    ledger: &Ledger,
    kind: EntityKind,
    table: &Table,
) -> Result<ImportReport, TransferError> {
    if !kind.importable() {
        return Err(TransferError::NotImportable(kind));
    }
    check_columns(kind, &table.columns)?;

    let mut report = ImportReport::default();
    for (offset, row) in table.rows.iter().enumerate() {
        let index = offset + 1;

        let row = match row {
            Ok(cells) => cells,
            Err(reason) => {
                report.errors.push(RowError {
                    index,
                    errors: vec![reason.clone()],
                });
                continue;
            }
        };

        if row.len() != table.columns.len() {
            report.errors.push(RowError {
                index,
                errors: vec![format!(
                    "row has {} values, expected {}",
                    row.len(),
                    table.columns.len()
                )],
            });
            continue;
        }

        let mut fields: FieldMap = table
            .columns
            .iter()
            .zip(row.iter())
            .filter(|(c, _)| c.as_str() != ID_COLUMN)
            .map(|(c, v)| (c.clone(), v.clone()))
            .collect();

        if kind == EntityKind::Product && fields.present("stock").is_none() {
            fields.insert("stock", "0");
        }

        let outcome = match kind {
            EntityKind::Partner => ledger.create_partner(&fields).map(|p| p.id),
            _ => ledger.create_product(&fields).map(|p| p.id),
        };

        match outcome {
            Ok(_) => report.accepted += 1,
            Err(err) => {
                tracing::debug!(
                    target: "nova",
                    event = "import_row_rejected",
                    kind = %kind,
                    row = index,
                    reason = err.label()
                );
                report.errors.push(RowError {
                    index,
                    errors: err.messages(),
                });
            }
        }
    }

    tracing::info!(
        target: "nova",
        event = "import_finished",
        kind = %kind,
        accepted = report.accepted,
        rejected = report.rejected()
    );
    Ok(report)
}

/// Every persisted row of a kind, identity first, in storage order
pub fn export_rows(ledger: &Ledger, kind: EntityKind) -> Result<Table, TransferError> {
    let mut columns = vec![ID_COLUMN.to_string()];
    columns.extend(kind.fields().iter().map(|f| f.to_string()));

    let sql = format!(
        "SELECT {} FROM {} ORDER BY id",
        columns.join(", "),
        kind.table()
    );
    let rows = ledger
        .store()
        .fetch_all(&sql, params![])
        .map_err(DomainError::from)?;

    let mut table = Table::new(columns);
    table.rows = rows.iter().map(|r| Ok(r.to_strings())).collect();

    tracing::info!(target: "nova", event = "export_finished", kind = %kind, rows = table.len());
    Ok(table)
}

/// Parse CSV with a header row
///
/// Only an unreadable header fails the whole table. A data row that cannot be
/// parsed or is not valid UTF-8 is kept as an `Err` record in its position.
pub fn read_csv<R: Read>(reader: R) -> Result<Table, TransferError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let columns = rdr
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut table = Table::new(columns);
    for record in rdr.byte_records() {
        match record {
            Ok(record) => table.rows.push(decode_record(&record)),
            Err(err) => {
                let stop = err.is_io_error();
                table.rows.push(Err(format!("unreadable row: {}", err)));
                // the reader cannot resume after an I/O failure
                if stop {
                    break;
                }
            }
        }
    }
    Ok(table)
}

fn decode_record(record: &csv::ByteRecord) -> Record {
    record
        .iter()
        .enumerate()
        .map(|(field, bytes)| {
            std::str::from_utf8(bytes)
                .map(String::from)
                .map_err(|_| format!("invalid UTF-8 in column {}", field + 1))
        })
        .collect()
}

/// Write a table as CSV with a header row
pub fn write_csv<W: Write>(writer: W, table: &Table) -> Result<(), TransferError> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(&table.columns)?;
    for row in table.rows.iter().flatten() {
        wtr.write_record(row)?;
    }
    wtr.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Import a CSV file
pub fn import_csv(ledger: &Ledger, kind: EntityKind, path: &Path) -> Result<ImportReport, TransferError> {
    let file = File::open(path).map_err(|source| TransferError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let table = read_csv(file)?;
    tracing::debug!(target: "nova", event = "import_started", kind = %kind, path = %path.display(), rows = table.len());
    import_rows(ledger, kind, &table)
}

/// Export a kind as CSV to a file
pub fn export_csv(ledger: &Ledger, kind: EntityKind, path: &Path) -> Result<usize, TransferError> {
    let table = export_rows(ledger, kind)?;
    let file = File::create(path).map_err(|source| TransferError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    write_csv(file, &table)?;
    Ok(table.len())
}
