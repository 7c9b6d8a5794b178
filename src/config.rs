//
//  config.rs
//  Comprehender
//
//  Created by hak (tharun)
//

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{ComprehendError, Result};

/// File name looked up in the source directory when no `--config` is given.
pub const CONFIG_FILE_NAME: &str = "comprehender.toml";

/// Top-level Comprehender configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ComprehendConfig {
    #[serde(default)]
    pub project: ProjectConfig,
    #[serde(default)]
    pub pipeline: PipelineConfig,
    #[serde(default)]
    pub llm: LlmConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Which files make up the project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectConfig {
    /// Source file extension, without the dot.
    #[serde(default = "default_extension")]
    pub extension: String,
    /// Regexes matched against forward-slash paths; matching files are not processed.
    #[serde(default)]
    pub exclude: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Extract files on the rayon pool.
    #[serde(default = "default_true")]
    pub parallel: bool,
}

/// Text-generation service settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LlmConfig {
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Attempts per request, including the first.
    #[serde(default = "default_retries")]
    pub retries: u32,
    /// Delay before the second attempt; doubles on each further attempt.
    #[serde(default = "default_initial_retry_delay_ms")]
    pub initial_retry_delay_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Ask for a TODO improvement line in comments and write the overview document.
    #[serde(default = "default_true")]
    pub suggestions: bool,
}

/// Output file names, relative to the output directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default = "default_diagram_file")]
    pub diagram_file: String,
    #[serde(default = "default_simplified_diagram_file")]
    pub simplified_diagram_file: String,
    #[serde(default = "default_overview_file")]
    pub overview_file: String,
    #[serde(default = "default_structure_file")]
    pub structure_file: String,
    #[serde(default = "default_diagram_title")]
    pub diagram_title: String,
}

fn default_true() -> bool {
    true
}

fn default_extension() -> String {
    "java".to_string()
}

fn default_model() -> String {
    "gemini-2.0-flash".to_string()
}

fn default_endpoint() -> String {
    "https://generativelanguage.googleapis.com/v1beta".to_string()
}

fn default_retries() -> u32 {
    8
}

fn default_initial_retry_delay_ms() -> u64 {
    2000
}

fn default_request_timeout_secs() -> u64 {
    60
}

fn default_diagram_file() -> String {
    "architecture_full.puml".to_string()
}

fn default_simplified_diagram_file() -> String {
    "architecture_simplified_view.puml".to_string()
}

fn default_overview_file() -> String {
    "README_CODECOMPREHENDER.md".to_string()
}

fn default_structure_file() -> String {
    "structure.json".to_string()
}

fn default_diagram_title() -> String {
    crate::render::DEFAULT_TITLE.to_string()
}

impl Default for ProjectConfig {
    fn default() -> Self {
        Self {
            extension: default_extension(),
            exclude: Vec::new(),
        }
    }
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            parallel: default_true(),
        }
    }
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: default_endpoint(),
            retries: default_retries(),
            initial_retry_delay_ms: default_initial_retry_delay_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            suggestions: default_true(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            diagram_file: default_diagram_file(),
            simplified_diagram_file: default_simplified_diagram_file(),
            overview_file: default_overview_file(),
            structure_file: default_structure_file(),
            diagram_title: default_diagram_title(),
        }
    }
}

impl LlmConfig {
    pub fn initial_retry_delay(&self) -> Duration {
        Duration::from_millis(self.initial_retry_delay_ms)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl ComprehendConfig {
    /// Load config from a TOML file. A missing file yields the defaults; a
    /// malformed one is an error.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents).map_err(|source| ComprehendError::Config {
                path: path.to_path_buf(),
                source,
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ComprehendError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    /// The config file used for a source directory when none is given explicitly.
    pub fn default_path(source_dir: &Path) -> PathBuf {
        source_dir.join(CONFIG_FILE_NAME)
    }
}
