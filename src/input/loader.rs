// src/input/loader.rs
// =============================================================================
// Loads redirect jobs from a CSV file.
//
// Accepted layout (first line is a header and is skipped):
//
//     "source";"target";"status"
//     "https://google.com";"https://www.google.com/";301
//
// The delimiter is picked from the header: `;` when the header has a `;` and
// no `,`, otherwise `,`. Fields may be quoted, so a quoted URL can contain
// the delimiter. A row that comes out as a single field containing `;` is
// split on `;`, which covers semicolon rows under a comma header.
// Leftover quotes are stripped from every field, so lazily quoted values
// are fine.
//
// Anything wrong with the file is fatal for that file: nothing is checked
// until every row has parsed.
//
// Rust concepts:
// - The ? operator with #[from]: csv errors convert into InputError
// - Slice patterns: `[source, target, status]` destructures exactly 3 fields
// =============================================================================

use csv::{ReaderBuilder, StringRecord, Trim};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

use crate::pool::Job;

/// Why an input file could not be turned into jobs.
#[derive(Debug, Error)]
pub enum InputError {
    #[error("the file {0:?} does not exist")]
    NotFound(PathBuf),

    #[error("failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("line {line}: expected 3 fields (source, target, status), found {found}")]
    MalformedRow { line: usize, found: usize },

    #[error("line {line}: empty {field}")]
    EmptyField { line: usize, field: &'static str },

    #[error("line {line}: invalid status code {value:?}")]
    InvalidStatus { line: usize, value: String },
}

/// Reads `path` and returns its rows as jobs, in file order.
pub fn load_jobs(path: &Path) -> Result<Vec<Job>, InputError> {
    let content = fs::read_to_string(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            InputError::NotFound(path.to_path_buf())
        } else {
            InputError::Io {
                path: path.to_path_buf(),
                source,
            }
        }
    })?;

    let jobs = parse_jobs(&content)?;
    debug!("Loaded {} job(s) from {}", jobs.len(), path.display());
    Ok(jobs)
}

/// Parses CSV text (header included) into jobs.
pub fn parse_jobs(content: &str) -> Result<Vec<Job>, InputError> {
    let header = content.lines().next().unwrap_or_default();

    // Rows have their field count checked below, not by the reader
    let mut reader = ReaderBuilder::new()
        .delimiter(delimiter_for(header))
        .has_headers(true)
        .flexible(true)
        .quoting(true)
        .trim(Trim::All)
        .from_reader(content.as_bytes());

    let mut jobs = Vec::new();
    for record in reader.records() {
        let record = record?;
        let line = record.position().map_or(0, |pos| pos.line() as usize);

        let fields = split_fields(&record);
        if fields.iter().all(String::is_empty) {
            continue;
        }

        jobs.push(parse_row(line, fields)?);
    }

    Ok(jobs)
}

fn delimiter_for(header: &str) -> u8 {
    if header.contains(';') && !header.contains(',') {
        b';'
    } else {
        b','
    }
}

fn split_fields(record: &StringRecord) -> Vec<String> {
    match record.len() {
        1 if record[0].contains(';') => record[0].split(';').map(clean_field).collect(),
        _ => record.iter().map(clean_field).collect(),
    }
}

fn parse_row(line: usize, fields: Vec<String>) -> Result<Job, InputError> {
    let [source, target, status] = <[String; 3]>::try_from(fields).map_err(|fields| InputError::MalformedRow {
        line,
        found: fields.len(),
    })?;

    if source.is_empty() {
        return Err(InputError::EmptyField { line, field: "source" });
    }
    if target.is_empty() {
        return Err(InputError::EmptyField { line, field: "target" });
    }

    let expected_status = status
        .parse::<u16>()
        .ok()
        .filter(|code| (100..=999).contains(code))
        .ok_or_else(|| InputError::InvalidStatus {
            line,
            value: status.clone(),
        })?;

    Ok(Job::new(source, target, expected_status))
}

fn clean_field(field: &str) -> String {
    field.replace('"', "").trim().to_string()
}
