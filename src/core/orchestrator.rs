use crate::core::scanner::{layer_ref, ScanOutcome, TreeScanner};
use crate::domain::model::{ProgressPolicy, ScanError, ScanProgress, ScanReport, UNNAMED_LAYER};
use crate::domain::palette::Palette;
use crate::domain::ports::{PaletteSource, ProgressSink, SceneNode};
use crate::utils::error::{AuditError, Result};
use std::sync::Arc;
use tokio::sync::OnceCell;

/// Runs scans against a palette that is loaded on first use and then kept
/// for the lifetime of the engine.
pub struct ScanEngine<P: PaletteSource> {
    source: P,
    palette: OnceCell<Arc<Palette>>,
    policy: ProgressPolicy,
}

impl<P: PaletteSource> ScanEngine<P> {
    pub fn new(source: P) -> Self {
        Self {
            source,
            palette: OnceCell::new(),
            policy: ProgressPolicy::default(),
        }
    }

    pub fn with_progress_policy(mut self, policy: ProgressPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub async fn palette(&self) -> Result<Arc<Palette>> {
        let palette = self
            .palette
            .get_or_try_init(|| async {
                tracing::debug!("Loading palette from {}", self.source.describe());
                let palette = self.source.load().await?;
                if palette.is_empty() {
                    return Err(AuditError::EmptyPalette);
                }
                tracing::info!(
                    "🎨 Loaded {} tokens from {}",
                    palette.len(),
                    self.source.describe()
                );
                Ok::<_, AuditError>(Arc::new(palette))
            })
            .await?;
        Ok(Arc::clone(palette))
    }

    /// Scans `nodes` in order. Only a palette failure aborts the scan; every
    /// node-level failure ends up in the report's errors.
    pub async fn scan<N: SceneNode + Sync>(
        &self,
        nodes: &[N],
        progress: &dyn ProgressSink,
    ) -> Result<ScanReport> {
        let palette = self.palette().await?;
        let scanner = TreeScanner::new(&palette);

        let total = nodes.len();
        let mut processed = 0;
        let mut outcome = ScanOutcome::default();

        for node in nodes {
            match scanner.visit(node, &mut outcome) {
                Ok(()) => {
                    processed += 1;
                    if self.policy.should_notify(processed, total) {
                        progress.on_progress(ScanProgress { processed, total });
                    }
                }
                Err(fault) => {
                    let layer = layer_ref(node, UNNAMED_LAYER);
                    tracing::error!("Error processing node {}: {}", layer.name, fault);
                    outcome.errors.push(ScanError::NodeProcessing {
                        layer,
                        reason: fault.to_string(),
                    });
                }
            }

            tokio::task::yield_now().await;
        }

        let report = ScanReport::new(outcome.results, outcome.errors, total, processed);
        tracing::info!(
            "Scan finished: {} layers, {} colors, {} errors",
            report.stats.total_nodes,
            report.stats.color_matches,
            report.stats.error_count
        );
        Ok(report)
    }
}
