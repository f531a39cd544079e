use crate::error::{CliError, Result};
use anyhow::Context;
use chargeroulette::workflows::spin::SpinOutputs;
use std::path::{Path, PathBuf};

/// The input file name without its extension, used to name every output.
pub fn input_stem(input: &Path) -> Result<String> {
    input
        .file_stem()
        .and_then(|s| s.to_str())
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or_else(|| {
            CliError::Argument(format!(
                "Cannot derive an output name from input path '{}'",
                input.display()
            ))
        })
}

pub fn spin_outputs(input: &Path, outdir: &Path, report: bool) -> Result<SpinOutputs> {
    let stem = input_stem(input)?;
    Ok(SpinOutputs {
        structure: outdir.join(format!("{stem}_samples.pdb")),
        charges: outdir.join(format!("{stem}_samples.txt")),
        report: report.then(|| outdir.join(format!("{stem}_samples_report.txt"))),
    })
}

pub fn extract_output(input: &Path, outdir: &Path) -> Result<PathBuf> {
    let stem = input_stem(input)?;
    Ok(outdir.join(format!("{stem}_basic.pdb")))
}

/// Creates the output directory and any missing parents.
pub fn ensure_dir(dir: &Path) -> Result<()> {
    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create output directory '{}'", dir.display()))?;
    Ok(())
}
