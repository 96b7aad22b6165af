use std::path::Path;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::EngineError;
use crate::history::history::DEFAULT_HISTORY_CAPACITY;
use crate::markup::fetch::{DEFAULT_TIMEOUT_SECS, DEFAULT_USER_AGENT};

pub const DEFAULT_CONFIG_FILE: &str = "locator-engine.yaml";

// ============================================================================
// CLI Argument Parsing (clap derive)
// ============================================================================

#[derive(Parser, Debug)]
#[command(
    name = "locator-engine",
    version,
    about = "Synthesize stable locators and infer test flows from web pages"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Path to config file (default: locator-engine.yaml in current dir)
    #[arg(long, global = true)]
    pub config: Option<String>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract elements from a page and infer user flows
    Analyze {
        /// URL to fetch and analyze
        #[arg(long, conflicts_with = "file", required_unless_present = "file")]
        url: Option<String>,

        /// Local HTML file to analyze instead of fetching
        #[arg(long)]
        file: Option<String>,

        /// URL recorded for a local file (used by navigate steps)
        #[arg(long, requires = "file")]
        page_url: Option<String>,

        /// Output format: json, gherkin, playwright, selenium, cypress, webdriverio, testcafe
        #[arg(long)]
        format: Option<String>,

        /// Keep hidden elements
        #[arg(long)]
        include_hidden: bool,

        /// Output file path (default: stdout)
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Synthesize locators for specific elements of a local HTML file
    Inspect {
        /// Local HTML file
        #[arg(long)]
        file: String,

        /// CSS selector of the element to inspect (repeatable)
        #[arg(long = "selector", required = true)]
        selectors: Vec<String>,

        /// Target framework for the code snippet
        #[arg(long)]
        framework: Option<String>,

        /// Write the inspection history as JSON to this path
        #[arg(long)]
        export: Option<String>,
    },
}

// ============================================================================
// Config File Model (optional YAML)
// ============================================================================

/// Optional YAML config file: `locator-engine.yaml`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub analyze: AnalyzeConfig,
    #[serde(default)]
    pub inspect: InspectConfig,
    #[serde(default)]
    pub fetch: FetchConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzeConfig {
    #[serde(default = "default_json")]
    pub format: String,

    #[serde(default)]
    pub include_hidden: bool,
}

impl Default for AnalyzeConfig {
    fn default() -> Self {
        Self {
            format: "json".to_string(),
            include_hidden: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InspectConfig {
    #[serde(default = "default_playwright")]
    pub framework: String,

    #[serde(default = "default_history_capacity")]
    pub history_capacity: usize,

    pub export: Option<String>,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            framework: "playwright".to_string(),
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            export: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FetchConfig {
    #[serde(default = "default_user_agent")]
    pub user_agent: String,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

// Serde default helpers
fn default_json() -> String { "json".to_string() }
fn default_playwright() -> String { "playwright".to_string() }
fn default_history_capacity() -> usize { DEFAULT_HISTORY_CAPACITY }
fn default_user_agent() -> String { DEFAULT_USER_AGENT.to_string() }
fn default_timeout_secs() -> u64 { DEFAULT_TIMEOUT_SECS }

// ============================================================================
// Config File Loading
// ============================================================================

/// Read and parse a config file, surfacing every failure.
pub fn try_load_config(path: &Path) -> Result<AppConfig, EngineError> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| EngineError::io(format!("reading config {}", path.display()), e))?;
    serde_yaml::from_str(&content).map_err(|source| EngineError::ConfigParse {
        path: path.display().to_string(),
        source,
    })
}

/// Load config from a YAML file. Returns defaults if file is missing or malformed.
pub fn load_config(path: Option<&str>) -> AppConfig {
    let config_path = Path::new(path.unwrap_or(DEFAULT_CONFIG_FILE));
    if !config_path.exists() {
        debug!(path = %config_path.display(), "no config file, using defaults");
        return AppConfig::default();
    }

    match try_load_config(config_path) {
        Ok(config) => config,
        Err(e) => {
            warn!(error = %e, "ignoring config file");
            AppConfig::default()
        }
    }
}
