//! CLI module for Comprehender.
//!
//! One command: analyse a source directory and write the commented copies,
//! structure dump, diagrams and overview into an output directory.

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::config::ComprehendConfig;
use crate::describe::{Describer, GeminiClient, Placeholder};
use crate::logging::init_logging;
use crate::pipeline::{Pipeline, RunReport};

#[derive(Debug, Parser)]
#[command(name = "comprehender")]
#[command(
    about = "Comprehender - documentation and architecture diagrams for Java projects",
    long_about = None
)]
pub struct Cli {
    /// Directory containing the Java sources
    pub source_dir: PathBuf,

    /// Directory for commented files and diagrams
    pub output_dir: PathBuf,

    /// API key for the Gemini service
    #[arg(long, env = "GEMINI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Regex for files or directories to skip (repeatable), e.g. '.*Test\.java'
    #[arg(long, action = ArgAction::Append)]
    pub exclude: Vec<String>,

    /// Config file (default: <source_dir>/comprehender.toml)
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,

    /// No TODO suggestions in comments and no overview document
    #[arg(long)]
    pub no_suggestions: bool,

    /// Extract files one at a time
    #[arg(long)]
    pub sequential: bool,

    /// Only write the structure dump and the full diagram; no service calls
    #[arg(long)]
    pub diagram_only: bool,
}

impl Cli {
    /// Load the config file and apply command-line overrides on top.
    pub fn resolve_config(&self) -> Result<ComprehendConfig> {
        let path = self
            .config
            .clone()
            .unwrap_or_else(|| ComprehendConfig::default_path(&self.source_dir));
        let mut config = ComprehendConfig::load(&path)
            .with_context(|| format!("loading config {}", path.display()))?;

        config.project.exclude.extend(self.exclude.iter().cloned());
        if self.no_suggestions {
            config.llm.suggestions = false;
        }
        if self.sequential {
            config.pipeline.parallel = false;
        }
        Ok(config)
    }

    fn describer(&self, config: &ComprehendConfig) -> Result<Box<dyn Describer>> {
        match self.api_key.as_deref().filter(|key| !key.trim().is_empty()) {
            Some(key) if !self.diagram_only => {
                let client = GeminiClient::new(key, &config.llm)
                    .context("configuring the description service")?;
                Ok(Box::new(client))
            }
            Some(_) => Ok(Box::new(Placeholder)),
            None => {
                if !self.diagram_only {
                    warn!(
                        "no API key given (--api-key or GEMINI_API_KEY); \
                         comments will be placeholders"
                    );
                }
                Ok(Box::new(Placeholder))
            }
        }
    }
}

/// Run the whole tool for parsed arguments.
pub fn run(cli: &Cli) -> Result<RunReport> {
    init_logging(cli.verbose);

    let config = cli.resolve_config()?;
    let describer = cli.describer(&config)?;
    let report = Pipeline::new(config, describer)
        .diagram_only(cli.diagram_only)
        .run(&cli.source_dir, &cli.output_dir)
        .with_context(|| format!("processing {}", cli.source_dir.display()))?;

    print_summary(&report, &cli.output_dir);
    Ok(report)
}

fn print_summary(report: &RunReport, output_dir: &Path) {
    info!(
        found = report.files_found,
        excluded = report.files_excluded,
        skipped = report.files_skipped,
        "run finished"
    );
    println!(
        "Processed {} of {} files ({} excluded, {} skipped)",
        report.files_processed, report.files_found, report.files_excluded, report.files_skipped
    );
    println!(
        "{} types, {} relationships, {} dependency cycles",
        report.entities,
        report.relationships,
        report.cycles.len()
    );
    println!("Wrote {} files to {}", report.outputs.len(), output_dir.display());
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_arguments() {
        let cli = Cli::try_parse_from([
            "comprehender",
            "src",
            "out",
            "--exclude",
            ".*Test\\.java",
            "--exclude",
            "build/.*",
            "--no-suggestions",
            "--sequential",
        ])
        .unwrap();
        assert_eq!(cli.source_dir, PathBuf::from("src"));
        assert_eq!(cli.output_dir, PathBuf::from("out"));
        assert_eq!(cli.exclude, vec![".*Test\\.java", "build/.*"]);
        assert!(cli.no_suggestions && cli.sequential);
        assert!(!cli.diagram_only);
    }

    #[test]
    fn test_exclude_before_positionals() {
        let cli = Cli::try_parse_from(["comprehender", "--exclude", "gen/", "src", "out"]).unwrap();
        assert_eq!(cli.exclude, vec!["gen/"]);
        assert_eq!(cli.source_dir, PathBuf::from("src"));
        assert_eq!(cli.output_dir, PathBuf::from("out"));
    }

    #[test]
    fn test_missing_output_dir_rejected() {
        assert!(Cli::try_parse_from(["comprehender", "src"]).is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempdir().unwrap();
        fs::write(
            dir.path().join("comprehender.toml"),
            "[project]\nexclude = [\"gen/\"]\n",
        )
        .unwrap();

        let source_dir = dir.path().to_str().unwrap();
        let cli = Cli::try_parse_from([
            "comprehender",
            source_dir,
            "out",
            "--exclude",
            "legacy/",
            "--no-suggestions",
        ])
        .unwrap();
        let config = cli.resolve_config().unwrap();
        assert_eq!(config.project.exclude, vec!["gen/", "legacy/"]);
        assert!(!config.llm.suggestions);
        assert!(config.pipeline.parallel);
    }

    #[test]
    fn test_run_without_key_uses_placeholders() {
        let src = tempdir().unwrap();
        let out = tempdir().unwrap();
        fs::write(src.path().join("Hello.java"), "class Hello {\n  void hi() {}\n}\n").unwrap();

        let cli = Cli {
            source_dir: src.path().to_path_buf(),
            output_dir: out.path().to_path_buf(),
            api_key: None,
            exclude: Vec::new(),
            config: None,
            verbose: false,
            no_suggestions: false,
            sequential: true,
            diagram_only: false,
        };
        let report = run(&cli).unwrap();
        assert_eq!(report.files_processed, 1);

        let commented = fs::read_to_string(out.path().join("Hello_commented.java")).unwrap();
        assert!(commented.contains("Placeholder for this class"));
    }
}
