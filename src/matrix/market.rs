//! Matrix Market (`.mtx`) reader.
//!
//! Supports the `coordinate` layout with `real` or `integer` fields and `general` or
//! `symmetric` symmetry. Symmetric files store the lower triangle only; the mirrored
//! entries are filled in on load.

use crate::error::KError;
use crate::matrix::sparse::CsrMatrix;
use bitflags::bitflags;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

bitflags! {
    /// Header qualifiers recognised by the reader.
    #[derive(Copy, Clone, Debug, PartialEq, Eq)]
    pub struct MarketFlags: u32 {
        const COORDINATE = 0b0001;
        const INTEGER    = 0b0010;
        const SYMMETRIC  = 0b0100;
    }
}

/// Read a Matrix Market file from disk.
pub fn read_matrix_market<P: AsRef<Path>>(path: P) -> Result<CsrMatrix<f64>, KError> {
    let file = File::open(path)?;
    parse_matrix_market(BufReader::new(file))
}

/// Parse Matrix Market text from any buffered reader.
pub fn parse_matrix_market<R: BufRead>(reader: R) -> Result<CsrMatrix<f64>, KError> {
    let mut lines = reader.lines().enumerate();

    let (line_no, header) = match lines.next() {
        Some((i, line)) => (i + 1, line?),
        None => return Err(parse_err(1, "empty input")),
    };
    let flags = parse_header(line_no, &header)?;

    let mut size: Option<(usize, usize, usize)> = None;
    let mut triplets = Vec::new();
    let mut last_line = line_no;
    for (i, line) in lines {
        let line_no = i + 1;
        last_line = line_no;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }
        let fields: Vec<&str> = trimmed.split_whitespace().collect();
        match size {
            None => {
                if fields.len() != 3 {
                    return Err(parse_err(line_no, "size line must hold rows, columns and entries"));
                }
                size = Some((
                    parse_field(line_no, fields[0])?,
                    parse_field(line_no, fields[1])?,
                    parse_field(line_no, fields[2])?,
                ));
                triplets.reserve(size.map_or(0, |(_, _, nnz)| nnz));
            }
            Some((nrows, ncols, _)) => {
                if fields.len() != 3 {
                    return Err(parse_err(line_no, "entry line must hold row, column and value"));
                }
                let row: usize = parse_field(line_no, fields[0])?;
                let col: usize = parse_field(line_no, fields[1])?;
                if row == 0 || col == 0 || row > nrows || col > ncols {
                    return Err(parse_err(
                        line_no,
                        &format!("index ({row}, {col}) outside a {nrows}x{ncols} matrix"),
                    ));
                }
                let value: f64 = if flags.contains(MarketFlags::INTEGER) {
                    parse_field::<i64>(line_no, fields[2])? as f64
                } else {
                    parse_field(line_no, fields[2])?
                };
                let (i, j) = (row - 1, col - 1);
                triplets.push((i, j, value));
                if flags.contains(MarketFlags::SYMMETRIC) && i != j {
                    triplets.push((j, i, value));
                }
            }
        }
    }

    let (nrows, ncols, nnz) = size.ok_or_else(|| parse_err(last_line, "missing size line"))?;
    let stored = if flags.contains(MarketFlags::SYMMETRIC) {
        triplets.iter().filter(|&&(i, j, _)| i >= j).count()
    } else {
        triplets.len()
    };
    if stored != nnz {
        return Err(parse_err(
            last_line,
            &format!("header announces {nnz} entries, found {stored}"),
        ));
    }
    CsrMatrix::from_triplets(nrows, ncols, &triplets)
}

fn parse_header(line_no: usize, header: &str) -> Result<MarketFlags, KError> {
    let tokens: Vec<String> = header.split_whitespace().map(str::to_ascii_lowercase).collect();
    if tokens.len() != 5 || tokens[0] != "%%matrixmarket" || tokens[1] != "matrix" {
        return Err(parse_err(line_no, "expected '%%MatrixMarket matrix <format> <field> <symmetry>'"));
    }
    let mut flags = MarketFlags::empty();
    match tokens[2].as_str() {
        "coordinate" => flags |= MarketFlags::COORDINATE,
        other => return Err(parse_err(line_no, &format!("unsupported format '{other}'"))),
    }
    match tokens[3].as_str() {
        "real" => {}
        "integer" => flags |= MarketFlags::INTEGER,
        other => return Err(parse_err(line_no, &format!("unsupported field '{other}'"))),
    }
    match tokens[4].as_str() {
        "general" => {}
        "symmetric" => flags |= MarketFlags::SYMMETRIC,
        other => return Err(parse_err(line_no, &format!("unsupported symmetry '{other}'"))),
    }
    Ok(flags)
}

fn parse_field<F: std::str::FromStr>(line_no: usize, field: &str) -> Result<F, KError> {
    field
        .parse()
        .map_err(|_| parse_err(line_no, &format!("cannot parse '{field}'")))
}

fn parse_err(line: usize, msg: &str) -> KError {
    KError::Parse { line, msg: msg.to_string() }
}
