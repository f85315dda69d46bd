use crate::domain::palette::Palette;
use crate::domain::ports::PaletteSource;
use crate::utils::error::{AuditError, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Debug, Clone, Copy, Default)]
pub struct BaselinePalette;

#[async_trait]
impl PaletteSource for BaselinePalette {
    async fn load(&self) -> Result<Palette> {
        Ok(Palette::baseline())
    }

    fn describe(&self) -> String {
        "embedded baseline".to_string()
    }
}

#[derive(Debug, Clone)]
pub struct FilePalette {
    path: PathBuf,
}

impl FilePalette {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl PaletteSource for FilePalette {
    async fn load(&self) -> Result<Palette> {
        let content = tokio::fs::read_to_string(&self.path).await?;
        Palette::from_json_str(&content)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

#[derive(Debug, Clone)]
pub struct HttpPalette {
    url: String,
    client: Client,
}

impl HttpPalette {
    pub fn new(url: &str, timeout_secs: u64) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()?;
        Ok(Self {
            url: url.to_string(),
            client,
        })
    }
}

#[async_trait]
impl PaletteSource for HttpPalette {
    async fn load(&self) -> Result<Palette> {
        tracing::debug!("Fetching palette from {}", self.url);
        let response = self.client.get(&self.url).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuditError::PaletteError {
                message: format!("{} returned HTTP {}", self.url, status),
            });
        }

        let body = response.text().await?;
        Palette::from_json_str(&body)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}

/// Palette source chosen from a `--palette` style string.
#[derive(Debug, Clone)]
pub enum PaletteProvider {
    Baseline(BaselinePalette),
    File(FilePalette),
    Http(HttpPalette),
}

impl PaletteProvider {
    /// `baseline`, an http(s) URL, or a path to a JSON palette file.
    pub fn from_source(source: &str, timeout_secs: u64) -> Result<Self> {
        let source = source.trim();
        if source.eq_ignore_ascii_case("baseline") {
            Ok(PaletteProvider::Baseline(BaselinePalette))
        } else if source.starts_with("http://") || source.starts_with("https://") {
            Ok(PaletteProvider::Http(HttpPalette::new(source, timeout_secs)?))
        } else {
            Ok(PaletteProvider::File(FilePalette::new(source)))
        }
    }
}

#[async_trait]
impl PaletteSource for PaletteProvider {
    async fn load(&self) -> Result<Palette> {
        match self {
            PaletteProvider::Baseline(source) => source.load().await,
            PaletteProvider::File(source) => source.load().await,
            PaletteProvider::Http(source) => source.load().await,
        }
    }

    fn describe(&self) -> String {
        match self {
            PaletteProvider::Baseline(source) => source.describe(),
            PaletteProvider::File(source) => source.describe(),
            PaletteProvider::Http(source) => source.describe(),
        }
    }
}
