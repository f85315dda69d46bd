pub mod toml_config;

#[cfg(feature = "cli")]
use crate::domain::model::{ProgressPolicy, ReportFormat};
#[cfg(feature = "cli")]
use crate::domain::ports::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::{AuditError, Result};
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "swatch-audit")]
#[command(about = "Match the colors of a design document against a design-token palette")]
pub struct CliConfig {
    #[arg(short, long, help = "Exported document JSON to scan")]
    pub input: String,

    #[arg(long, default_value = "baseline", help = "baseline, a palette JSON file or an http(s) URL")]
    pub palette: String,

    #[arg(long, default_value = "./scan-output")]
    pub output_path: String,

    #[arg(long, value_delimiter = ',', default_value = "json")]
    pub formats: Vec<ReportFormat>,

    #[arg(long, help = "Bundle the report files into a zip archive")]
    pub archive: bool,

    #[arg(long, help = "Scan the document selection instead of every top-level layer")]
    pub selected_only: bool,

    #[arg(long, default_value = "10")]
    pub palette_timeout: u64,

    #[arg(long, help = "Stream scan events as JSON lines on stdout")]
    pub events: bool,

    #[arg(long, help = "Log as JSON lines")]
    pub log_json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn input_path(&self) -> &str {
        &self.input
    }

    fn palette_source(&self) -> &str {
        &self.palette
    }

    fn output_path(&self) -> &str {
        &self.output_path
    }

    fn output_formats(&self) -> &[ReportFormat] {
        &self.formats
    }

    fn archive(&self) -> bool {
        self.archive
    }

    fn selected_only(&self) -> bool {
        self.selected_only
    }

    fn progress_policy(&self) -> ProgressPolicy {
        ProgressPolicy::default()
    }

    fn palette_timeout_secs(&self) -> u64 {
        self.palette_timeout
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_path("input", &self.input)?;
        validation::validate_path("output_path", &self.output_path)?;
        validation::validate_palette_source("palette", &self.palette)?;
        validation::validate_positive_number("palette_timeout", self.palette_timeout as usize, 1)?;

        if self.formats.is_empty() {
            return Err(AuditError::MissingConfigError {
                field: "formats".to_string(),
            });
        }
        Ok(())
    }
}
