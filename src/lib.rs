pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::{palette::PaletteProvider, storage::LocalStorage};
pub use core::{
    audit::{AuditRunner, AuditSummary},
    orchestrator::ScanEngine,
    pipeline::DocumentPipeline,
};
pub use domain::model::{Document, LayerNode, ScanEvent, ScanReport};
pub use domain::palette::{Palette, Token};
pub use utils::error::{AuditError, Result};
