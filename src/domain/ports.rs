use crate::domain::model::{
    LayerData, LayerNode, Paint, PaintList, PaintSlot, ProgressPolicy, ReportFormat,
    ScanEvent, ScanProgress, ScanReport,
};
use crate::domain::palette::Palette;
use crate::utils::error::Result;
use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::mpsc::UnboundedSender;

pub trait Storage: Send + Sync {
    fn read_file(&self, path: &str) -> impl std::future::Future<Output = Result<Vec<u8>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}

pub trait ConfigProvider: Send + Sync {
    fn input_path(&self) -> &str;
    fn palette_source(&self) -> &str;
    fn output_path(&self) -> &str;
    fn output_formats(&self) -> &[ReportFormat];
    fn archive(&self) -> bool;
    fn selected_only(&self) -> bool;
    fn progress_policy(&self) -> ProgressPolicy;
    fn palette_timeout_secs(&self) -> u64;
}

#[async_trait]
pub trait PaletteSource: Send + Sync {
    async fn load(&self) -> Result<Palette>;
    fn describe(&self) -> String;
}

pub trait ProgressSink: Send + Sync {
    fn on_progress(&self, progress: ScanProgress);
}

#[async_trait]
pub trait AuditPipeline: Send + Sync {
    async fn extract(&self) -> Result<Vec<LayerNode>>;
    async fn scan(&self, nodes: Vec<LayerNode>, progress: &dyn ProgressSink)
        -> Result<ScanReport>;
    async fn load(&self, report: &ScanReport) -> Result<String>;
}

/// Failure to read part of a node during traversal.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NodeFault {
    #[error("layer could not be read: {reason}")]
    Unreadable { reason: String },

    #[error("paint #{index} is malformed: {reason}")]
    MalformedPaint { index: usize, reason: String },

    #[error("{0}")]
    Other(String),
}

/// Read-only view of a layer that the tree scanner walks.
pub trait SceneNode: Sized {
    fn name(&self) -> Option<&str>;
    fn node_type(&self) -> Option<&str>;
    fn visible(&self) -> std::result::Result<bool, NodeFault>;
    fn fills(&self) -> std::result::Result<Vec<Paint>, NodeFault>;
    fn strokes(&self) -> std::result::Result<Vec<Paint>, NodeFault>;
    fn children(&self) -> std::result::Result<&[Self], NodeFault>;
}

fn read_paints(list: Option<&PaintList>) -> std::result::Result<Vec<Paint>, NodeFault> {
    let entries = match list {
        Some(PaintList::Entries(entries)) => entries,
        Some(PaintList::Mixed(_)) | None => return Ok(Vec::new()),
    };

    entries
        .iter()
        .enumerate()
        .map(|(index, slot)| match slot {
            PaintSlot::Paint(paint) => Ok(paint.clone()),
            PaintSlot::Malformed(raw) => Err(NodeFault::MalformedPaint {
                index,
                reason: rejection_reason::<Paint>(raw),
            }),
        })
        .collect()
}

fn rejection_reason<T: serde::de::DeserializeOwned>(raw: &Value) -> String {
    match serde_json::from_value::<T>(raw.clone()) {
        Err(e) => e.to_string(),
        Ok(_) => format!("unexpected value {}", raw),
    }
}

impl LayerNode {
    fn unreadable(&self, raw: &Value) -> NodeFault {
        tracing::trace!("Unreadable layer: {}", raw);
        NodeFault::Unreadable {
            reason: rejection_reason::<LayerData>(raw),
        }
    }
}

impl SceneNode for LayerNode {
    fn name(&self) -> Option<&str> {
        match self {
            LayerNode::Layer(data) => data.name.as_deref(),
            LayerNode::Unreadable(raw) => raw.get("name").and_then(Value::as_str),
        }
    }

    fn node_type(&self) -> Option<&str> {
        match self {
            LayerNode::Layer(data) => Some(data.node_type.as_str()).filter(|t| !t.is_empty()),
            LayerNode::Unreadable(raw) => raw.get("type").and_then(Value::as_str),
        }
    }

    fn visible(&self) -> std::result::Result<bool, NodeFault> {
        match self {
            LayerNode::Layer(data) => Ok(data.visible != Some(false)),
            LayerNode::Unreadable(raw) => Err(self.unreadable(raw)),
        }
    }

    fn fills(&self) -> std::result::Result<Vec<Paint>, NodeFault> {
        match self {
            LayerNode::Layer(data) => read_paints(data.fills.as_ref()),
            LayerNode::Unreadable(raw) => Err(self.unreadable(raw)),
        }
    }

    fn strokes(&self) -> std::result::Result<Vec<Paint>, NodeFault> {
        match self {
            LayerNode::Layer(data) => read_paints(data.strokes.as_ref()),
            LayerNode::Unreadable(raw) => Err(self.unreadable(raw)),
        }
    }

    fn children(&self) -> std::result::Result<&[Self], NodeFault> {
        match self {
            LayerNode::Layer(data) => Ok(match &data.children {
                Some(children) => children.as_slice(),
                None => &[],
            }),
            LayerNode::Unreadable(raw) => Err(self.unreadable(raw)),
        }
    }
}

impl ProgressSink for UnboundedSender<ScanEvent> {
    fn on_progress(&self, progress: ScanProgress) {
        if self.send(ScanEvent::Progress(progress)).is_err() {
            tracing::debug!("Progress receiver dropped; continuing scan");
        }
    }
}

/// Reports progress through the log only.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogProgress;

impl ProgressSink for LogProgress {
    fn on_progress(&self, progress: ScanProgress) {
        tracing::info!(
            "⏳ Scanning... ({}/{} layers)",
            progress.processed,
            progress.total
        );
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn on_progress(&self, _progress: ScanProgress) {}
}
