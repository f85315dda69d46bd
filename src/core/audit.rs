use crate::core::{AuditPipeline, LogProgress, ProgressSink};
use crate::domain::model::{ScanEvent, ScanReport};
use crate::utils::error::Result;
use crate::utils::monitor::ScanMonitor;
use tokio::sync::mpsc::UnboundedSender;

#[derive(Debug, Clone)]
pub struct AuditSummary {
    pub output_path: String,
    pub report: ScanReport,
}

/// Drives a pipeline through extract, scan and load.
pub struct AuditRunner<P: AuditPipeline> {
    pipeline: P,
    monitor: ScanMonitor,
    events: Option<UnboundedSender<ScanEvent>>,
}

impl<P: AuditPipeline> AuditRunner<P> {
    pub fn new(pipeline: P) -> Self {
        Self::new_with_monitoring(pipeline, false)
    }

    pub fn new_with_monitoring(pipeline: P, monitor_enabled: bool) -> Self {
        Self {
            pipeline,
            monitor: ScanMonitor::new(monitor_enabled),
            events: None,
        }
    }

    /// Streams host events to `events` instead of logging progress.
    pub fn with_events(mut self, events: UnboundedSender<ScanEvent>) -> Self {
        self.events = Some(events);
        self
    }

    /// With an event stream attached, emits `Started`, any `Progress`, then
    /// `Completed` once the report is written or `Failed` if any step fails.
    pub async fn run(&self) -> Result<AuditSummary> {
        tracing::info!("Starting color audit...");
        self.monitor.log_stats("Start");
        self.emit(ScanEvent::Started);

        match self.execute().await {
            Ok(summary) => {
                self.emit(ScanEvent::Completed(summary.report.clone()));
                Ok(summary)
            }
            Err(e) => {
                tracing::error!("Scan failed: {}", e);
                self.emit(ScanEvent::Failed {
                    message: format!("Scan failed: {}", e),
                });
                Err(e)
            }
        }
    }

    async fn execute(&self) -> Result<AuditSummary> {
        tracing::info!("Reading document...");
        let nodes = self.pipeline.extract().await?;
        self.monitor.log_stats("Extract");

        let progress: &dyn ProgressSink = match &self.events {
            Some(events) => events,
            None => &LogProgress,
        };

        let report = self.pipeline.scan(nodes, progress).await?;
        self.monitor.log_stats("Scan");

        tracing::info!("Writing report...");
        let output_path = self.pipeline.load(&report).await?;
        self.monitor.log_stats("Load");
        self.monitor.log_final_stats(report.stats.total_nodes);

        Ok(AuditSummary {
            output_path,
            report,
        })
    }

    fn emit(&self, event: ScanEvent) {
        if let Some(events) = &self.events {
            if events.send(event).is_err() {
                tracing::debug!("Event receiver dropped");
            }
        }
    }
}
