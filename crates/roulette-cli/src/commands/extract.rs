use super::spin::{load_structure, print_summary};
use crate::cli::ExtractArgs;
use crate::config::{DefaultsConfig, PartialRouletteConfig};
use crate::error::Result;
use crate::utils::paths;
use chargeroulette::workflows::{extract, spin};
use tracing::info;

pub fn run(args: ExtractArgs, quiet: bool) -> Result<()> {
    let selection = PartialRouletteConfig::load(args.config.as_deref())?
        .merge_selection(&args.selection, &DefaultsConfig::default())?;
    let output = paths::extract_output(&args.input, &args.outdir)?;

    let models = load_structure(&args.input, &selection.depth_policy)?;

    paths::ensure_dir(&args.outdir)?;
    let candidates = extract::run(&models, &selection, &output)?;
    info!("Extraction finished.");

    if !quiet {
        print_summary(
            &spin::summarize(&models, &candidates),
            selection.depth_threshold,
        );
        println!("   Residues: {}", output.display());
    }
    Ok(())
}
