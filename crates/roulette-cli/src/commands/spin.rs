use crate::cli::SpinArgs;
use crate::config::{DefaultsConfig, PartialRouletteConfig};
use crate::error::{CliError, Result};
use crate::utils::paths;
use crate::utils::progress::CliProgressHandler;
use chargeroulette::core::io::pdb::{DepthPolicy, PdbFile};
use chargeroulette::core::io::traits::StructureFile;
use chargeroulette::core::models::model::Model;
use chargeroulette::engine::progress::ProgressReporter;
use chargeroulette::workflows::spin::{self, StructureSummary};
use std::path::Path;
use tracing::info;

pub fn run(args: SpinArgs, quiet: bool) -> Result<()> {
    info!("Building configuration for the spin.");
    let config = PartialRouletteConfig::load(args.config.as_deref())?
        .merge_with_cli(&args, &DefaultsConfig::default())?;
    let outputs = paths::spin_outputs(&args.input, &args.outdir, args.report)?;

    let models = load_structure(&args.input, &config.selection.depth_policy)?;

    let handler = if quiet {
        CliProgressHandler::hidden()
    } else {
        CliProgressHandler::new()
    };
    let reporter = ProgressReporter::with_callback(handler.get_callback());

    let candidates = spin::prepare(&models, &config.selection, &reporter);
    if !quiet {
        print_summary(&candidates.summary, config.selection.depth_threshold);
    }
    let samples = spin::sample(&candidates, &config.sampling, &reporter)?;

    paths::ensure_dir(&args.outdir)?;
    spin::write_outputs(&samples, &outputs)?;

    if !quiet {
        println!(
            "🎰 Drew {} unique samples of {} charges.",
            samples.len(),
            config.sampling.n_charges
        );
        println!("   Structures: {}", outputs.structure.display());
        println!("   Charges:    {}", outputs.charges.display());
        if let Some(report) = &outputs.report {
            println!("   Report:     {}", report.display());
        }
    }
    Ok(())
}

pub(crate) fn load_structure(path: &Path, policy: &DepthPolicy) -> Result<Vec<Model>> {
    info!("Loading input structure from {:?}", path);
    PdbFile::read_from_path(path, policy).map_err(|e| CliError::FileParsing {
        path: path.to_path_buf(),
        source: e.into(),
    })
}

pub(crate) fn print_summary(summary: &StructureSummary, depth_threshold: f64) {
    println!(
        "📄 Structure: {} model(s), {} atoms in the first model, chains [{}]",
        summary.models,
        summary.atoms,
        summary.chains.join(", ")
    );
    println!(
        "⚡ Chargeable residues below {} Å: {}",
        depth_threshold, summary.candidates
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use chargeroulette::core::io::charges::read_charges;
    use chargeroulette::engine::error::EngineError;
    use clap::Parser;
    use std::fs;
    use tempfile::tempdir;

    const STRUCTURE: &str = "\
ATOM      1  N   LYS A  10      10.000   1.500  -2.250  1.00  2.10
ATOM      2  CA  LYS A  10      11.000   1.500  -2.250  1.00  2.00
ATOM      3  CA  GLU A  11      12.000   1.500  -2.250  1.00  1.00
ATOM      4  CA  ARG A  12      13.000   1.500  -2.250  1.00  4.90
ATOM      5  CA  HIS A  15      14.000   1.500  -2.250  1.00  3.00
ATOM      6  CA  LYS A  20      15.000   1.500  -2.250  1.00  1.50
ATOM      7  CA  LYS A  30      16.000   1.500  -2.250  1.00  8.00
END
";

    fn spin_args(dir: &Path, extra: &[&str]) -> SpinArgs {
        let input = dir.join("prot.pdb");
        fs::write(&input, STRUCTURE).unwrap();
        let outdir = dir.join("results");
        let mut argv = vec![
            "roulette".to_string(),
            "spin".to_string(),
            "-i".to_string(),
            input.to_string_lossy().into_owned(),
            "-o".to_string(),
            outdir.to_string_lossy().into_owned(),
        ];
        argv.extend(extra.iter().map(|s| s.to_string()));
        match Cli::parse_from(argv).command {
            Commands::Spin(args) => args,
            _ => panic!("Expected 'spin' subcommand"),
        }
    }

    #[test]
    fn spin_writes_structure_and_charge_files() {
        let dir = tempdir().unwrap();
        let args = spin_args(
            dir.path(),
            &["-n", "2", "-s", "3", "--seed", "11", "--report"],
        );

        run(args, true).unwrap();

        let results = dir.path().join("results");
        let models =
            PdbFile::read_from_path(results.join("prot_samples.pdb"), &DepthPolicy::Strict)
                .unwrap();
        let charges =
            read_charges(fs::File::open(results.join("prot_samples.txt")).unwrap()).unwrap();
        assert_eq!(models.len(), 3);
        assert_eq!(charges.len(), 3);
        assert!(models.iter().all(|m| m.len() == 2));
        assert!(results.join("prot_samples_report.txt").exists());
    }

    #[test]
    fn spin_fails_without_writing_when_candidates_are_scarce() {
        let dir = tempdir().unwrap();
        let args = spin_args(dir.path(), &["-n", "3", "-s", "1", "-K"]);

        let err = run(args, true).unwrap_err();

        assert!(matches!(
            err,
            CliError::Roulette(EngineError::InsufficientCandidates {
                requested: 3,
                available: 2
            })
        ));
        assert!(!dir.path().join("results/prot_samples.pdb").exists());
    }

    #[test]
    fn unreadable_input_is_reported_with_its_path() {
        let dir = tempdir().unwrap();
        let args = spin_args(dir.path(), &["-n", "1", "-s", "1"]);
        fs::write(&args.input, "ATOM      x  CA  LYS A  10\n").unwrap();

        let err = run(args, true).unwrap_err();
        assert!(matches!(err, CliError::FileParsing { .. }));
    }
}
