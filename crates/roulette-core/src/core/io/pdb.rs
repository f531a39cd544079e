use crate::core::io::traits::StructureFile;
use crate::core::models::atom::AtomRecord;
use crate::core::models::model::Model;
use crate::core::models::residue::is_excluded_residue;
use crate::core::models::sample::Sample;
use nalgebra::Point3;
use serde::Deserialize;
use std::io::{self, BufRead, Write};
use std::path::Path;
use thiserror::Error;
use tracing::trace;

/// How lines whose depth column does not hold a number are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DepthPolicy {
    /// Abort parsing with [`PdbError::MalformedRecord`].
    #[default]
    Strict,
    /// Drop the line and keep going, as older versions of the tool did.
    SkipInvalid,
}

#[derive(Debug, Error)]
pub enum PdbError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Malformed record on line {line}: {kind}")]
    MalformedRecord { line: usize, kind: PdbParseErrorKind },
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PdbParseErrorKind {
    #[error("Invalid integer in {field} field, columns {columns} (value: '{value}')")]
    InvalidInt {
        field: &'static str,
        columns: String,
        value: String,
    },
    #[error("Invalid float in {field} field, columns {columns} (value: '{value}')")]
    InvalidFloat {
        field: &'static str,
        columns: String,
        value: String,
    },
    #[error("Columns {columns} of the {field} field split a multi-byte character")]
    SplitCharacter {
        field: &'static str,
        columns: String,
    },
}

/// A fixed byte range of an `ATOM` record.
#[derive(Debug, Clone, Copy)]
struct Column {
    field: &'static str,
    start: usize,
    end: usize,
}

impl Column {
    const fn new(field: &'static str, start: usize, end: usize) -> Self {
        Self { field, start, end }
    }

    /// The trimmed slice of `line`, clamped to the line length.
    fn slice<'a>(&self, line: &'a str, line_num: usize) -> Result<&'a str, PdbError> {
        let end = self.end.min(line.len());
        let start = self.start.min(end);
        line.get(start..end)
            .map(str::trim)
            .ok_or_else(|| PdbError::MalformedRecord {
                line: line_num,
                kind: PdbParseErrorKind::SplitCharacter {
                    field: self.field,
                    columns: self.columns(),
                },
            })
    }

    /// The 1-based inclusive column range, as printed in diagnostics.
    fn columns(&self) -> String {
        format!("{}-{}", self.start + 1, self.end)
    }
}

const RECORD: Column = Column::new("record", 0, 6);
const SERIAL: Column = Column::new("serial", 6, 11);
const NAME: Column = Column::new("atom name", 12, 16);
const ALT_LOC: Column = Column::new("alt-loc", 16, 17);
const RES_NAME: Column = Column::new("residue name", 17, 20);
const CHAIN: Column = Column::new("chain", 20, 22);
const RES_SEQ: Column = Column::new("residue sequence", 22, 26);
const X: Column = Column::new("x", 30, 38);
const Y: Column = Column::new("y", 38, 46);
const Z: Column = Column::new("z", 46, 54);
const OCCUPANCY: Column = Column::new("occupancy", 54, 60);
const DEPTH: Column = Column::new("depth", 60, 66);

/// Byte offsets checked for alternate-conformer digits (first atom-name column
/// and the alt-loc column).
const CONFORMER_COLUMNS: [usize; 2] = [12, 16];

fn parse_int(line: &str, column: Column, line_num: usize) -> Result<i32, PdbError> {
    let value = column.slice(line, line_num)?;
    value.parse().map_err(|_| PdbError::MalformedRecord {
        line: line_num,
        kind: PdbParseErrorKind::InvalidInt {
            field: column.field,
            columns: column.columns(),
            value: value.into(),
        },
    })
}

fn parse_float(line: &str, column: Column, line_num: usize) -> Result<f64, PdbError> {
    let value = column.slice(line, line_num)?;
    value.parse().map_err(|_| PdbError::MalformedRecord {
        line: line_num,
        kind: PdbParseErrorKind::InvalidFloat {
            field: column.field,
            columns: column.columns(),
            value: value.into(),
        },
    })
}

fn is_model_terminator(line: &str) -> bool {
    line.starts_with("END") || line.trim().is_empty()
}

fn is_alternate_conformer(line: &str) -> bool {
    let bytes = line.as_bytes();
    CONFORMER_COLUMNS
        .iter()
        .any(|&i| bytes.get(i).is_some_and(u8::is_ascii_digit))
}

/// Parses an `ATOM` line, returning `None` for lines that are deliberately
/// skipped (excluded residue codes, alternate conformers, and unparsable
/// depths under [`DepthPolicy::SkipInvalid`]).
fn parse_atom_line(
    line: &str,
    line_num: usize,
    policy: DepthPolicy,
) -> Result<Option<AtomRecord>, PdbError> {
    let residue_name = RES_NAME.slice(line, line_num)?;
    if is_excluded_residue(residue_name) || is_alternate_conformer(line) {
        trace!(line = line_num, "Skipping excluded or alternate-conformer atom");
        return Ok(None);
    }

    let depth = match (parse_float(line, DEPTH, line_num), policy) {
        (Ok(depth), _) => depth,
        (Err(_), DepthPolicy::SkipInvalid) => {
            trace!(line = line_num, "Skipping atom with unparsable depth");
            return Ok(None);
        }
        (Err(e), DepthPolicy::Strict) => return Err(e),
    };

    Ok(Some(AtomRecord {
        record_type: RECORD.slice(line, line_num)?.to_string(),
        serial: parse_int(line, SERIAL, line_num)?,
        name: NAME.slice(line, line_num)?.to_string(),
        alt_loc: ALT_LOC.slice(line, line_num)?.to_string(),
        residue_name: residue_name.to_string(),
        chain_id: CHAIN.slice(line, line_num)?.to_string(),
        residue_seq: parse_int(line, RES_SEQ, line_num)?,
        position: Point3::new(
            parse_float(line, X, line_num)?,
            parse_float(line, Y, line_num)?,
            parse_float(line, Z, line_num)?,
        ),
        occupancy: parse_float(line, OCCUPANCY, line_num)?,
        depth,
    }))
}

/// The state threaded through a fold over the lines of a structure file.
#[derive(Debug, Default)]
pub struct ModelAccumulator {
    policy: DepthPolicy,
    models: Vec<Model>,
    current: Model,
}

impl ModelAccumulator {
    pub fn new(policy: DepthPolicy) -> Self {
        Self {
            policy,
            ..Default::default()
        }
    }

    /// Consumes one line (`line_num` is 1-based) and returns the next state.
    ///
    /// # Errors
    ///
    /// Returns [`PdbError::MalformedRecord`] if an `ATOM` line has a numeric
    /// field that does not parse.
    pub fn feed(mut self, line_num: usize, line: &str) -> Result<Self, PdbError> {
        if line.starts_with("ATOM") {
            if let Some(atom) = parse_atom_line(line, line_num, self.policy)? {
                self.current.push(atom);
            }
        } else if is_model_terminator(line) {
            self.close_model();
        }
        Ok(self)
    }

    fn close_model(&mut self) {
        if !self.current.is_empty() {
            self.models.push(std::mem::take(&mut self.current));
        }
    }

    /// Closes a trailing unterminated model and returns every model read.
    ///
    /// The trailing model is kept even when earlier models were terminated;
    /// older versions of the tool dropped it in that case.
    pub fn finish(mut self) -> Vec<Model> {
        self.close_model();
        self.models
    }
}

/// Parses an in-memory sequence of lines into models.
///
/// # Errors
///
/// Returns [`PdbError::MalformedRecord`] naming the first offending line.
pub fn parse_lines<I, S>(lines: I, policy: DepthPolicy) -> Result<Vec<Model>, PdbError>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    lines
        .into_iter()
        .enumerate()
        .try_fold(ModelAccumulator::new(policy), |acc, (i, line)| {
            acc.feed(i + 1, line.as_ref())
        })
        .map(ModelAccumulator::finish)
}

/// Formats an atom as a fixed-column `ATOM` record.
///
/// Four-character atom names start in column 13, shorter names in column 14,
/// which keeps the element symbol aligned the way structure viewers expect.
pub fn format_atom_line(atom: &AtomRecord) -> String {
    let name = if atom.name.len() >= 4 {
        format!("{:<4}", atom.name)
    } else {
        format!(" {:<3}", atom.name)
    };
    format!(
        "{:<6}{:>5} {}{:1}{:>3}{:>2}{:>4}    {:>8.3}{:>8.3}{:>8.3}{:>6.2}{:>6.2}",
        "ATOM",
        atom.serial,
        name,
        atom.alt_loc,
        atom.residue_name,
        atom.chain_id,
        atom.residue_seq,
        atom.position.x,
        atom.position.y,
        atom.position.z,
        atom.occupancy,
        atom.depth
    )
}

pub struct PdbFile;

impl StructureFile for PdbFile {
    type ReadOptions = DepthPolicy;
    type Error = PdbError;

    fn read_from(
        reader: &mut impl BufRead,
        options: &Self::ReadOptions,
    ) -> Result<Vec<Model>, Self::Error> {
        reader
            .lines()
            .enumerate()
            .try_fold(ModelAccumulator::new(*options), |acc, (i, line)| {
                acc.feed(i + 1, &line?)
            })
            .map(ModelAccumulator::finish)
    }

    fn write_samples_to(samples: &[Sample], writer: &mut impl Write) -> Result<(), Self::Error> {
        writeln!(writer, "REMARK Generated by chargeroulette")?;
        for (i, sample) in samples.iter().enumerate() {
            writeln!(writer, "MODEL   {:>6}", i + 1)?;
            for atom in sample.atoms() {
                writeln!(writer, "{}", format_atom_line(atom))?;
            }
            writeln!(writer, "TER")?;
            writeln!(writer, "ENDMDL")?;
        }
        writeln!(writer, "END")?;
        Ok(())
    }

    fn write_model_to(model: &Model, writer: &mut impl Write) -> Result<(), Self::Error> {
        for atom in model.atoms() {
            writeln!(writer, "{}", format_atom_line(atom))?;
        }
        writeln!(writer, "END")?;
        Ok(())
    }
}

/// Writes one model per sample to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written; no partial file is left.
pub fn write_structure<P: AsRef<Path>>(samples: &[Sample], path: P) -> Result<(), PdbError> {
    PdbFile::write_samples_to_path(samples, path)
}
