mod defaults;

use crate::cli::{SelectionArgs, SpinArgs};
use crate::error::{CliError, Result};
use chargeroulette::core::io::pdb::DepthPolicy;
use chargeroulette::core::models::residue::BasicResidue;
use chargeroulette::engine::config::{RouletteConfig, RouletteConfigBuilder, SelectionConfig};
use serde::Deserialize;
use std::collections::BTreeSet;
use std::path::Path;
use tracing::debug;

pub use defaults::DefaultsConfig;

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialSamplingConfig {
    #[serde(rename = "n-charges")]
    n_charges: Option<usize>,
    #[serde(rename = "n-samples")]
    n_samples: Option<usize>,
    patience: Option<usize>,
    seed: Option<u64>,
}

#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct PartialSelectionConfig {
    #[serde(rename = "depth-threshold")]
    depth_threshold: Option<f64>,
    /// Residue types that are never charged, e.g. `["HIS"]`.
    #[serde(default)]
    exclude: Vec<BasicResidue>,
    #[serde(rename = "depth-policy")]
    depth_policy: Option<DepthPolicy>,
}

/// A configuration file with every field optional, merged with the command
/// line before it reaches the library.
///
/// ```toml
/// [sampling]
/// n-charges = 5
/// n-samples = 20
/// patience = 50
///
/// [selection]
/// depth-threshold = 4.0
/// exclude = ["HIS"]
/// depth-policy = "skip-invalid"
/// ```
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
pub struct PartialRouletteConfig {
    sampling: Option<PartialSamplingConfig>,
    selection: Option<PartialSelectionConfig>,
}

impl PartialRouletteConfig {
    pub fn from_file(path: &Path) -> Result<Self> {
        debug!("Loading configuration from file: {:?}", path);
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| CliError::FileParsing {
            path: path.to_path_buf(),
            source: e.into(),
        })
    }

    /// Loads `path` when given, otherwise starts from an empty configuration.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn merge_with_cli(
        mut self,
        args: &SpinArgs,
        defaults: &DefaultsConfig,
    ) -> Result<RouletteConfig> {
        let selection = self.merge_selection(&args.selection, defaults)?;
        let sampling = self.sampling.take().unwrap_or_default();

        let n_charges = args.n_charges.or(sampling.n_charges).ok_or_else(|| {
            CliError::Config(
                "A value for 'n-charges' is required either in the config file or via -n/--n-charges."
                    .to_string(),
            )
        })?;
        let n_samples = args.n_samples.or(sampling.n_samples).ok_or_else(|| {
            CliError::Config(
                "A value for 'n-samples' is required either in the config file or via -s/--n-samples."
                    .to_string(),
            )
        })?;

        RouletteConfigBuilder::new()
            .n_charges(n_charges)
            .n_samples(n_samples)
            .patience(
                args.patience
                    .or(sampling.patience)
                    .unwrap_or(defaults.patience),
            )
            .seed(args.seed.or(sampling.seed))
            .depth_threshold(selection.depth_threshold)
            .residues(selection.residues)
            .depth_policy(selection.depth_policy)
            .build()
            .map_err(|e| CliError::Config(e.to_string()))
    }

    pub fn merge_selection(
        &mut self,
        args: &SelectionArgs,
        defaults: &DefaultsConfig,
    ) -> Result<SelectionConfig> {
        let file = self.selection.take().unwrap_or_default();

        let mut excluded: BTreeSet<BasicResidue> = file.exclude.into_iter().collect();
        for (flag, residue) in [
            (args.no_lys, BasicResidue::Lys),
            (args.no_arg, BasicResidue::Arg),
            (args.no_his, BasicResidue::His),
        ] {
            if flag {
                excluded.insert(residue);
            }
        }

        let depth_policy = if args.skip_invalid_depth {
            DepthPolicy::SkipInvalid
        } else {
            file.depth_policy.unwrap_or(defaults.depth_policy)
        };

        let selection = SelectionConfig {
            depth_threshold: args
                .depth
                .or(file.depth_threshold)
                .unwrap_or(defaults.depth_threshold),
            residues: BasicResidue::ALL
                .into_iter()
                .filter(|r| !excluded.contains(r))
                .collect(),
            depth_policy,
        };
        selection
            .validate()
            .map_err(|e| CliError::Config(e.to_string()))?;
        debug!(?selection, "Resolved residue selection");
        Ok(selection)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::{Cli, Commands};
    use clap::Parser;
    use std::fs;
    use std::path::PathBuf;
    use tempfile::{TempDir, tempdir};

    fn write_config_file(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("roulette.toml");
        fs::write(&path, content).unwrap();
        path
    }

    fn spin_args(extra: &[&str]) -> SpinArgs {
        let mut argv = vec!["roulette", "spin", "-i", "in.pdb", "-o", "out"];
        argv.extend_from_slice(extra);
        match Cli::parse_from(argv).command {
            Commands::Spin(args) => args,
            _ => panic!("Expected 'spin' subcommand"),
        }
    }

    #[test]
    fn cli_only_config_uses_defaults_for_the_rest() {
        let config = PartialRouletteConfig::default()
            .merge_with_cli(&spin_args(&["-n", "3", "-s", "7"]), &DefaultsConfig::default())
            .unwrap();

        assert_eq!(config.sampling.n_charges, 3);
        assert_eq!(config.sampling.n_samples, 7);
        assert_eq!(config.sampling.patience, 10);
        assert_eq!(config.sampling.seed, None);
        assert_eq!(config.selection, SelectionConfig::default());
    }

    #[test]
    fn load_from_file_and_merge_with_defaults() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            [sampling]
            n-charges = 4
            n-samples = 12
            seed = 99

            [selection]
            depth-threshold = 3.5
            exclude = ["HIS"]
            depth-policy = "skip-invalid"
            "#,
        );

        let config = PartialRouletteConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(&spin_args(&[]), &DefaultsConfig::default())
            .unwrap();

        assert_eq!(config.sampling.n_charges, 4);
        assert_eq!(config.sampling.n_samples, 12);
        assert_eq!(config.sampling.patience, 10);
        assert_eq!(config.sampling.seed, Some(99));
        assert_eq!(config.selection.depth_threshold, 3.5);
        assert_eq!(config.selection.residue_codes(), ["LYS", "ARG"]);
        assert_eq!(config.selection.depth_policy, DepthPolicy::SkipInvalid);
    }

    #[test]
    fn cli_args_override_file_values() {
        let dir = tempdir().unwrap();
        let path = write_config_file(
            &dir,
            r#"
            [sampling]
            n-charges = 4
            n-samples = 12
            patience = 30

            [selection]
            depth-threshold = 3.5
            exclude = ["his"]
            "#,
        );

        let config = PartialRouletteConfig::from_file(&path)
            .unwrap()
            .merge_with_cli(
                &spin_args(&["-n", "2", "-p", "5", "-d", "6.0", "-K"]),
                &DefaultsConfig::default(),
            )
            .unwrap();

        assert_eq!(config.sampling.n_charges, 2);
        assert_eq!(config.sampling.n_samples, 12);
        assert_eq!(config.sampling.patience, 5);
        assert_eq!(config.selection.depth_threshold, 6.0);
        assert_eq!(config.selection.residue_codes(), ["ARG"]);
    }

    #[test]
    fn missing_sample_size_returns_error() {
        let result = PartialRouletteConfig::default()
            .merge_with_cli(&spin_args(&["-n", "2"]), &DefaultsConfig::default());

        match result {
            Err(CliError::Config(msg)) => assert!(msg.contains("n-samples")),
            other => panic!("Expected a configuration error, got {:?}", other),
        }
    }

    #[test]
    fn excluding_every_residue_type_is_rejected() {
        let result = PartialRouletteConfig::default().merge_with_cli(
            &spin_args(&["-n", "1", "-s", "1", "-K", "-R", "-H"]),
            &DefaultsConfig::default(),
        );
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn zero_patience_is_rejected() {
        let result = PartialRouletteConfig::default().merge_with_cli(
            &spin_args(&["-n", "1", "-s", "1", "-p", "0"]),
            &DefaultsConfig::default(),
        );
        assert!(matches!(result, Err(CliError::Config(_))));
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let dir = tempdir().unwrap();
        let path = write_config_file(&dir, "[sampling]\nn-charge = 4\n");

        let result = PartialRouletteConfig::from_file(&path);
        assert!(matches!(result, Err(CliError::FileParsing { .. })));
    }

    #[test]
    fn missing_config_file_is_an_io_error() {
        let dir = tempdir().unwrap();
        let result = PartialRouletteConfig::load(Some(&dir.path().join("absent.toml")));
        assert!(matches!(result, Err(CliError::Io(_))));
    }

    #[test]
    fn skip_invalid_depth_flag_overrides_the_file_policy() {
        let mut partial: PartialRouletteConfig =
            toml::from_str("[selection]\ndepth-policy = \"strict\"\n").unwrap();
        let args = SelectionArgs {
            skip_invalid_depth: true,
            ..SelectionArgs::default()
        };

        let selection = partial
            .merge_selection(&args, &DefaultsConfig::default())
            .unwrap();
        assert_eq!(selection.depth_policy, DepthPolicy::SkipInvalid);
    }
}
