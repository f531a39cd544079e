//! Plain-text charge summaries consumed by the downstream expect scripts.
//!
//! The compact summary has one line per sample:
//!
//! ```text
//! 1,{10 20},{12},{}
//! ```
//!
//! i.e. the 1-based sample index followed by the lysine, arginine and
//! histidine residue numbers, each list wrapped in braces. Consumers split on
//! the commas and braces, so the layout is reproduced exactly.

use crate::core::io::traits::write_atomically;
use crate::core::models::residue::BasicResidue;
use crate::core::models::sample::Sample;
use csv::{QuoteStyle, ReaderBuilder, Terminator, WriterBuilder};
use std::io::{self, Read, Write};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChargesError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("Malformed charge line {line}: {reason}")]
    Malformed { line: u64, reason: String },
}

/// One parsed line of a charge summary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChargeLine {
    pub index: usize,
    pub lysines: Vec<i32>,
    pub arginines: Vec<i32>,
    pub histidines: Vec<i32>,
}

fn braced(ids: &[i32]) -> String {
    let joined: Vec<String> = ids.iter().map(i32::to_string).collect();
    format!("{{{}}}", joined.join(" "))
}

/// Writes the compact per-sample summary.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_charges_to(samples: &[Sample], writer: &mut impl Write) -> Result<(), ChargesError> {
    let mut csv_writer = WriterBuilder::new()
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);

    for (i, sample) in samples.iter().enumerate() {
        let mut record = vec![(i + 1).to_string()];
        record.extend(
            BasicResidue::ALL
                .iter()
                .map(|&category| braced(&sample.residue_ids(category))),
        );
        csv_writer.write_record(&record)?;
    }
    csv_writer.flush()?;
    Ok(())
}

/// Writes the compact per-sample summary to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written; no partial file is left.
pub fn write_charges<P: AsRef<Path>>(samples: &[Sample], path: P) -> Result<(), ChargesError> {
    write_atomically(path, |writer| write_charges_to(samples, writer))
}

fn parse_braced(field: &str, line: u64) -> Result<Vec<i32>, ChargesError> {
    let inner = field
        .strip_prefix('{')
        .and_then(|f| f.strip_suffix('}'))
        .ok_or_else(|| ChargesError::Malformed {
            line,
            reason: format!("expected a braced list, found '{}'", field),
        })?;
    inner
        .split_whitespace()
        .map(|id| {
            id.parse().map_err(|_| ChargesError::Malformed {
                line,
                reason: format!("invalid residue number '{}'", id),
            })
        })
        .collect()
}

/// Parses a compact charge summary.
///
/// # Errors
///
/// Returns [`ChargesError::Malformed`] if a line does not have exactly four
/// fields in the expected layout.
pub fn read_charges(reader: impl Read) -> Result<Vec<ChargeLine>, ChargesError> {
    let mut csv_reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut lines = Vec::new();
    for result in csv_reader.records() {
        let record = result?;
        let line = record.position().map_or(0, |p| p.line());
        if record.len() != 4 {
            return Err(ChargesError::Malformed {
                line,
                reason: format!("expected 4 fields, found {}", record.len()),
            });
        }
        let index = record[0].parse().map_err(|_| ChargesError::Malformed {
            line,
            reason: format!("invalid sample index '{}'", &record[0]),
        })?;
        lines.push(ChargeLine {
            index,
            lysines: parse_braced(&record[1], line)?,
            arginines: parse_braced(&record[2], line)?,
            histidines: parse_braced(&record[3], line)?,
        });
    }
    Ok(lines)
}

/// Writes a human-readable report with one block per sample, ready to paste
/// into an expect script.
///
/// # Errors
///
/// Returns an error if writing fails.
pub fn write_charge_report_to(
    samples: &[Sample],
    structure_path: &Path,
    writer: &mut impl Write,
) -> Result<(), ChargesError> {
    writeln!(writer, "Surface charges sampled with chargeroulette")?;
    writeln!(
        writer,
        "Copy the lysine/arginine/histidine block of a spin into the expect script."
    )?;
    writeln!(writer)?;

    for (i, sample) in samples.iter().enumerate() {
        writeln!(writer, "Charge roulette spin No. {}", i + 1)?;
        writeln!(
            writer,
            "   PDB: model {} of {}",
            i + 1,
            structure_path.display()
        )?;
        writeln!(writer)?;
        for category in BasicResidue::ALL {
            writeln!(
                writer,
                "   set {} {}",
                category.full_name(),
                braced(&sample.residue_ids(category))
            )?;
        }
        writeln!(writer)?;
    }
    Ok(())
}

/// Writes the human-readable report to `path`.
///
/// # Errors
///
/// Returns an error if the file cannot be written; no partial file is left.
pub fn write_charge_report<P: AsRef<Path>>(
    samples: &[Sample],
    structure_path: &Path,
    path: P,
) -> Result<(), ChargesError> {
    write_atomically(path, |writer| {
        write_charge_report_to(samples, structure_path, writer)
    })
}
