// Adapters layer: concrete implementations for external systems (palette sources, storage, report files).

pub mod palette;
pub mod report;
pub mod storage;
