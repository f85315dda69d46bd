use crate::core::codec::{self, ColorError};
use crate::core::matcher;
use crate::domain::model::{
    LayerRef, ScanError, ScanResult, StyleKind, UNNAMED_CHILD_LAYER, UNNAMED_LAYER,
};
use crate::domain::palette::Palette;
use crate::domain::ports::{NodeFault, SceneNode};

/// Results and recoverable errors collected from one or more subtrees.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanOutcome {
    pub results: Vec<ScanResult>,
    pub errors: Vec<ScanError>,
}

impl ScanOutcome {
    pub fn merge(mut self, other: ScanOutcome) -> Self {
        self.results.extend(other.results);
        self.errors.extend(other.errors);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty() && self.errors.is_empty()
    }
}

pub(crate) fn layer_name<N: SceneNode>(node: &N, fallback: &str) -> String {
    node.name()
        .filter(|name| !name.is_empty())
        .unwrap_or(fallback)
        .to_string()
}

pub(crate) fn layer_ref<N: SceneNode>(node: &N, fallback: &str) -> LayerRef {
    LayerRef {
        name: layer_name(node, fallback),
        node_type: node.node_type().map(str::to_string),
    }
}

pub struct TreeScanner<'p> {
    palette: &'p Palette,
}

impl<'p> TreeScanner<'p> {
    pub fn new(palette: &'p Palette) -> Self {
        Self { palette }
    }

    /// Scans a whole subtree. A fault on `node` itself is folded into the
    /// outcome as a node error.
    pub fn scan_tree<N: SceneNode>(&self, node: &N) -> ScanOutcome {
        let mut outcome = ScanOutcome::default();
        if let Err(fault) = self.visit(node, &mut outcome) {
            outcome.errors.push(ScanError::NodeProcessing {
                layer: layer_ref(node, UNNAMED_LAYER),
                reason: fault.to_string(),
            });
        }
        outcome
    }

    /// Depth-first, pre-order. Fill, stroke and child failures are recorded
    /// in `sink`; only a fault reading `node` itself is returned.
    pub fn visit<N: SceneNode>(&self, node: &N, sink: &mut ScanOutcome) -> Result<(), NodeFault> {
        if !node.visible()? {
            tracing::trace!("Skipping hidden layer {}", layer_name(node, UNNAMED_LAYER));
            return Ok(());
        }

        self.scan_surface(node, StyleKind::Fill, sink);
        self.scan_surface(node, StyleKind::Stroke, sink);

        for child in node.children()? {
            if let Err(fault) = self.visit(child, sink) {
                let layer = layer_ref(child, UNNAMED_CHILD_LAYER);
                tracing::warn!("Child layer {} failed: {}", layer.name, fault);
                sink.errors.push(ScanError::ChildProcessing {
                    layer,
                    reason: fault.to_string(),
                });
            }
        }

        Ok(())
    }

    fn scan_surface<N: SceneNode>(&self, node: &N, style: StyleKind, sink: &mut ScanOutcome) {
        let paints = match style {
            StyleKind::Fill => node.fills(),
            StyleKind::Stroke => node.strokes(),
        };

        let paints = match paints {
            Ok(paints) => paints,
            Err(fault) => {
                let layer = layer_ref(node, UNNAMED_LAYER);
                tracing::warn!("{} paints of {} failed: {}", style.title(), layer.name, fault);
                sink.errors.push(ScanError::PaintProcessing {
                    layer,
                    style,
                    reason: fault.to_string(),
                });
                return;
            }
        };

        for paint in paints.iter().filter(|p| p.is_solid() && p.is_visible()) {
            let color = match paint
                .color
                .as_ref()
                .ok_or(ColorError::MissingColor)
                .and_then(codec::encode)
            {
                Ok(color) => color,
                Err(e) => {
                    tracing::debug!("Dropping {} paint: {}", style, e);
                    continue;
                }
            };

            let token_match = matcher::match_or_degrade(&color, self.palette);
            sink.results.push(ScanResult {
                layer_name: layer_name(node, UNNAMED_LAYER),
                layer_type: node.node_type().unwrap_or_default().to_string(),
                style,
                color,
                token_match,
            });
        }
    }
}
