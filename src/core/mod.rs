pub mod audit;
pub mod codec;
pub mod distance;
pub mod matcher;
pub mod orchestrator;
pub mod pipeline;
pub mod scanner;

pub use crate::domain::model::{LayerNode, ScanReport};
pub use crate::domain::palette::{Palette, Token};
pub use crate::domain::ports::{
    AuditPipeline, ConfigProvider, LogProgress, NoProgress, PaletteSource, ProgressSink,
    SceneNode, Storage,
};
pub use crate::utils::error::Result;
