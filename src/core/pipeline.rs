use crate::adapters::palette::PaletteProvider;
use crate::adapters::report::ReportWriter;
use crate::core::orchestrator::ScanEngine;
use crate::core::{AuditPipeline, ConfigProvider, ProgressSink, Storage};
use crate::domain::model::{Document, LayerNode, ScanReport};
use crate::utils::error::{AuditError, Result};
use std::path::Path;

/// Reads an exported document from disk and parses it.
pub async fn load_document(path: impl AsRef<Path>) -> Result<Document> {
    let path = path.as_ref();
    let content = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&content).map_err(|e| AuditError::DocumentError {
        message: format!("{}: {}", path.display(), e),
    })
}

/// Scans an exported document file and writes the report into storage.
pub struct DocumentPipeline<S: Storage, C: ConfigProvider> {
    config: C,
    engine: ScanEngine<PaletteProvider>,
    writer: ReportWriter<S>,
}

impl<S: Storage, C: ConfigProvider> DocumentPipeline<S, C> {
    pub fn new(storage: S, config: C) -> Result<Self> {
        let provider =
            PaletteProvider::from_source(config.palette_source(), config.palette_timeout_secs())?;
        let engine = ScanEngine::new(provider).with_progress_policy(config.progress_policy());
        let writer = ReportWriter::new(
            storage,
            config.output_formats().to_vec(),
            config.archive(),
        );

        Ok(Self {
            config,
            engine,
            writer,
        })
    }
}

#[async_trait::async_trait]
impl<S: Storage, C: ConfigProvider> AuditPipeline for DocumentPipeline<S, C> {
    async fn extract(&self) -> Result<Vec<LayerNode>> {
        tracing::debug!("Reading document from: {}", self.config.input_path());
        let document = load_document(self.config.input_path()).await?;

        let selected_only = self.config.selected_only();
        if selected_only && document.selection.is_empty() {
            tracing::warn!("Selection is empty, scanning every top-level layer");
        }

        let targets = document.targets(selected_only).to_vec();
        tracing::info!(
            "Scanning {} top-level layers of {}",
            targets.len(),
            document.name.as_deref().unwrap_or("untitled document")
        );
        Ok(targets)
    }

    async fn scan(
        &self,
        nodes: Vec<LayerNode>,
        progress: &dyn ProgressSink,
    ) -> Result<ScanReport> {
        self.engine.scan(&nodes, progress).await
    }

    async fn load(&self, report: &ScanReport) -> Result<String> {
        let written = self.writer.write(report).await?;
        tracing::debug!("Wrote {}", written.join(", "));

        let output_path = match written.as_slice() {
            [single] => format!("{}/{}", self.config.output_path(), single),
            _ => self.config.output_path().to_string(),
        };
        Ok(output_path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::LocalStorage;
    use crate::domain::model::{ProgressPolicy, ReportFormat};
    use crate::domain::ports::NoProgress;
    use tempfile::TempDir;

    struct MockConfig {
        input_path: String,
        output_path: String,
        formats: Vec<ReportFormat>,
        selected_only: bool,
    }

    impl ConfigProvider for MockConfig {
        fn input_path(&self) -> &str {
            &self.input_path
        }

        fn palette_source(&self) -> &str {
            "baseline"
        }

        fn output_path(&self) -> &str {
            &self.output_path
        }

        fn output_formats(&self) -> &[ReportFormat] {
            &self.formats
        }

        fn archive(&self) -> bool {
            false
        }

        fn selected_only(&self) -> bool {
            self.selected_only
        }

        fn progress_policy(&self) -> ProgressPolicy {
            ProgressPolicy::default()
        }

        fn palette_timeout_secs(&self) -> u64 {
            5
        }
    }

    fn write_document(dir: &TempDir) -> String {
        let document = serde_json::json!({
            "name": "Landing page",
            "selection": [
                {"name": "Hero", "type": "FRAME",
                 "fills": [{"type": "SOLID", "color": {"r": 1, "g": 0.2, "b": 0.4}}]}
            ],
            "children": [
                {"name": "Hero", "type": "FRAME",
                 "fills": [{"type": "SOLID", "color": {"r": 1, "g": 0.2, "b": 0.4}}]},
                {"name": "Footer", "type": "FRAME",
                 "fills": [{"type": "SOLID", "color": {"r": 0.98, "g": 0.98, "b": 0.98}}]}
            ]
        });
        let path = dir.path().join("document.json");
        std::fs::write(&path, serde_json::to_vec(&document).unwrap()).unwrap();
        path.to_str().unwrap().to_string()
    }

    fn pipeline(dir: &TempDir, selected_only: bool) -> DocumentPipeline<LocalStorage, MockConfig> {
        let output_path = dir.path().join("out").to_str().unwrap().to_string();
        let config = MockConfig {
            input_path: write_document(dir),
            output_path: output_path.clone(),
            formats: vec![ReportFormat::Json],
            selected_only,
        };
        DocumentPipeline::new(LocalStorage::new(output_path), config).unwrap()
    }

    #[tokio::test]
    async fn test_extract_respects_selection() {
        let dir = TempDir::new().unwrap();

        assert_eq!(pipeline(&dir, true).extract().await.unwrap().len(), 1);
        assert_eq!(pipeline(&dir, false).extract().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_scan_and_load_write_report() {
        let dir = TempDir::new().unwrap();
        let pipeline = pipeline(&dir, false);

        let nodes = pipeline.extract().await.unwrap();
        let report = pipeline.scan(nodes, &NoProgress).await.unwrap();
        assert_eq!(report.stats.color_matches, 2);
        assert_eq!(report.results[1].token_match.name, "neutral/50");

        let output = pipeline.load(&report).await.unwrap();
        assert!(output.ends_with("report.json"));
        assert!(std::path::Path::new(&output).exists());
    }

    #[tokio::test]
    async fn test_invalid_document_is_a_document_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("broken.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            load_document(&path).await,
            Err(AuditError::DocumentError { .. })
        ));
    }
}
