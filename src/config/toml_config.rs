use crate::domain::model::{ProgressPolicy, ReportFormat};
use crate::domain::ports::ConfigProvider;
use crate::utils::error::{AuditError, Result};
use crate::utils::validation::{self, Validate};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub scan: ScanSection,
    pub source: SourceConfig,
    #[serde(default)]
    pub palette: PaletteConfig,
    pub output: OutputConfig,
    pub monitoring: Option<MonitoringConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScanSection {
    pub name: String,
    pub description: Option<String>,
    pub selected_only: Option<bool>,
    pub progress: Option<ProgressPolicy>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceConfig {
    pub document: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaletteConfig {
    #[serde(default = "default_palette_source")]
    pub source: String,
    pub timeout_seconds: Option<u64>,
}

fn default_palette_source() -> String {
    "baseline".to_string()
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            source: default_palette_source(),
            timeout_seconds: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
    pub formats: Vec<ReportFormat>,
    pub archive: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MonitoringConfig {
    pub enabled: bool,
    pub log_level: Option<String>,
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(AuditError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| AuditError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${TOKENS_URL})；未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> String {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").unwrap();

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_non_empty_string("scan.name", &self.scan.name)?;
        validation::validate_path("source.document", &self.source.document)?;
        validation::validate_palette_source("palette.source", &self.palette.source)?;
        validation::validate_path("output.path", &self.output.path)?;

        if self.output.formats.is_empty() {
            return Err(AuditError::InvalidConfigValueError {
                field: "output.formats".to_string(),
                value: "[]".to_string(),
                reason: "At least one format is required. Valid formats: json, csv".to_string(),
            });
        }

        if let Some(progress) = &self.scan.progress {
            validation::validate_positive_number("scan.progress.every", progress.every, 1)?;
        }

        if let Some(timeout) = self.palette.timeout_seconds {
            validation::validate_positive_number("palette.timeout_seconds", timeout as usize, 1)?;
        }

        Ok(())
    }

    pub fn monitoring_enabled(&self) -> bool {
        self.monitoring.as_ref().map(|m| m.enabled).unwrap_or(false)
    }

    pub fn log_level(&self) -> Option<&str> {
        self.monitoring.as_ref().and_then(|m| m.log_level.as_deref())
    }
}

impl ConfigProvider for TomlConfig {
    fn input_path(&self) -> &str {
        &self.source.document
    }

    fn palette_source(&self) -> &str {
        &self.palette.source
    }

    fn output_path(&self) -> &str {
        &self.output.path
    }

    fn output_formats(&self) -> &[ReportFormat] {
        &self.output.formats
    }

    fn archive(&self) -> bool {
        self.output.archive.unwrap_or(false)
    }

    fn selected_only(&self) -> bool {
        self.scan.selected_only.unwrap_or(false)
    }

    fn progress_policy(&self) -> ProgressPolicy {
        self.scan.progress.unwrap_or_default()
    }

    fn palette_timeout_secs(&self) -> u64 {
        self.palette.timeout_seconds.unwrap_or(10)
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = r#"
[scan]
name = "marketing-site"
selected_only = true

[scan.progress]
min_total = 20
every = 10

[source]
document = "./exports/home.json"

[palette]
source = "./tokens/baseline-data.json"
timeout_seconds = 3

[output]
path = "./scan-output"
formats = ["json", "csv"]
archive = true
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.scan.name, "marketing-site");
        assert!(config.selected_only());
        assert!(config.archive());
        assert_eq!(
            config.progress_policy(),
            ProgressPolicy {
                min_total: 20,
                every: 10
            }
        );
        assert_eq!(config.output_formats(), &[ReportFormat::Json, ReportFormat::Csv]);
        assert_eq!(config.palette_timeout_secs(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_defaults_for_optional_sections() {
        let toml_content = r#"
[scan]
name = "defaults"

[source]
document = "page.json"

[output]
path = "./out"
formats = ["json"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.palette_source(), "baseline");
        assert_eq!(config.progress_policy(), ProgressPolicy::default());
        assert!(!config.monitoring_enabled());
        assert!(!config.archive());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("SWATCH_TEST_TOKENS_URL", "https://tokens.example.com/palette.json");

        let toml_content = r#"
[scan]
name = "env"

[source]
document = "page.json"

[palette]
source = "${SWATCH_TEST_TOKENS_URL}"

[output]
path = "./out"
formats = ["csv"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.palette.source, "https://tokens.example.com/palette.json");

        std::env::remove_var("SWATCH_TEST_TOKENS_URL");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = r#"
[scan]
name = "bad"

[scan.progress]
every = 0

[source]
document = "page.json"

[output]
path = "./out"
formats = ["json"]
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_unknown_format_fails_to_parse() {
        let toml_content = r#"
[scan]
name = "bad"

[source]
document = "page.json"

[output]
path = "./out"
formats = ["xml"]
"#;

        assert!(matches!(
            TomlConfig::from_toml_str(toml_content),
            Err(AuditError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[scan]
name = "file-test"

[source]
document = "page.json"

[output]
path = "./out"
formats = ["json"]
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.scan.name, "file-test");
    }
}
