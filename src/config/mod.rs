pub mod cli;
pub mod toml_config;

use crate::core::ConfigProvider;
use crate::utils::error::Result;
use crate::utils::validation::{validate_path, Validate};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::fmt;

/// Which conversion a run performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum Mode {
    /// Core team roster with unique jersey numbers
    Cores,
    /// Executive roster, no numbers
    Exes,
    /// Name, domain and size for distribution
    Sizes,
    /// Volunteer/public orders, one row per item
    Voa,
    /// Per design and size counts from a VOA order file
    Summary,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Cores => "cores",
            Mode::Exes => "exes",
            Mode::Sizes => "sizes",
            Mode::Voa => "voa",
            Mode::Summary => "summary",
        }
    }

    pub fn default_output(&self) -> &'static str {
        match self {
            Mode::Cores => "cores_photoshop.csv",
            Mode::Exes => "exes_photoshop.csv",
            Mode::Sizes => "sizes.csv",
            Mode::Voa => "voa_orders.csv",
            Mode::Summary => "printing_summary.csv",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Seeded when asked, otherwise from OS entropy.
pub fn build_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => {
            tracing::debug!("Using seeded random source: {}", seed);
            StdRng::seed_from_u64(seed)
        }
        None => StdRng::from_entropy(),
    }
}

#[cfg(feature = "cli")]
#[derive(Debug, Clone, clap::Parser)]
#[command(name = "merch-etl")]
#[command(about = "Convert merchandise form exports into print-shop and distribution CSVs")]
pub struct CliConfig {
    /// Conversion to run
    #[arg(value_enum)]
    pub mode: Mode,

    /// CSV export to read
    pub input_path: String,

    /// CSV to write (defaults depend on the mode)
    pub output_path: Option<String>,

    /// TOML file overriding column names and category rules
    #[arg(long)]
    pub config: Option<String>,

    /// Seed for number conflict resolution, for reproducible output
    #[arg(long)]
    pub seed: Option<u64>,

    /// Write a JSON run report to this path
    #[arg(long)]
    pub report: Option<String>,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    pub fn new(mode: Mode, input_path: &str, output_path: Option<&str>) -> Self {
        Self {
            mode,
            input_path: input_path.to_string(),
            output_path: output_path.map(str::to_string),
            config: None,
            seed: None,
            report: None,
            log_format: LogFormat::Text,
            verbose: false,
        }
    }
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input_path
    }

    fn output_path(&self) -> &str {
        self.output_path
            .as_deref()
            .unwrap_or_else(|| self.mode.default_output())
    }

    fn report_path(&self) -> Option<&str> {
        self.report.as_deref()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_path("input_path", &self.input_path)?;
        validate_path("output_path", self.output_path())?;
        if let Some(report) = &self.report {
            validate_path("report", report)?;
        }
        if let Some(config) = &self.config {
            validate_path("config", config)?;
        }
        Ok(())
    }
}
