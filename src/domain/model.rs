use crate::domain::palette::Token;
use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

pub const UNNAMED_LAYER: &str = "Unnamed layer";
pub const UNNAMED_CHILD_LAYER: &str = "Unnamed child layer";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleKind {
    Fill,
    Stroke,
}

impl StyleKind {
    pub fn label(&self) -> &'static str {
        match self {
            StyleKind::Fill => "fill",
            StyleKind::Stroke => "stroke",
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            StyleKind::Fill => "Fill",
            StyleKind::Stroke => "Stroke",
        }
    }
}

impl fmt::Display for StyleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// How broadly a token is supported or approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Availability {
    Widely,
    Limited,
    New,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Availability {
    pub fn as_str(&self) -> &'static str {
        match self {
            Availability::Widely => "widely",
            Availability::Limited => "limited",
            Availability::New => "new",
            Availability::Unknown => "unknown",
        }
    }

    pub fn icon(&self) -> &'static str {
        match self {
            Availability::Widely => "✅",
            Availability::Limited => "⚠️",
            Availability::New => "🆕",
            Availability::Unknown => "❓",
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaintKind {
    Solid,
    GradientLinear,
    GradientRadial,
    GradientAngular,
    GradientDiamond,
    Image,
    Video,
    #[default]
    #[serde(other)]
    Other,
}

/// Normalized color channels as the host reports them. Any channel may be missing.
/// A present channel that is not a number reads as NaN, so encoding rejects it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ChannelColor {
    #[serde(default, deserialize_with = "lenient_level")]
    pub r: Option<f64>,
    #[serde(default, deserialize_with = "lenient_level")]
    pub g: Option<f64>,
    #[serde(default, deserialize_with = "lenient_level")]
    pub b: Option<f64>,
}

impl ChannelColor {
    pub fn new(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: Some(r),
            g: Some(g),
            b: Some(b),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Paint {
    #[serde(rename = "type", default, deserialize_with = "lenient_kind")]
    pub kind: PaintKind,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_flag"
    )]
    pub visible: Option<bool>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_color"
    )]
    pub color: Option<ChannelColor>,
}

impl Paint {
    pub fn solid(r: f64, g: f64, b: f64) -> Self {
        Self {
            kind: PaintKind::Solid,
            visible: None,
            color: Some(ChannelColor::new(r, g, b)),
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = Some(false);
        self
    }

    pub fn is_solid(&self) -> bool {
        self.kind == PaintKind::Solid
    }

    pub fn is_visible(&self) -> bool {
        self.visible != Some(false)
    }
}

/// One entry of a paint list. Entries that are not paint objects are kept so
/// the scanner can report them instead of the whole document failing to load.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaintSlot {
    Paint(Paint),
    Malformed(Value),
}

/// A node's fills or strokes. Hosts send a non-array marker (e.g. `"mixed"`)
/// when a node carries several paint sets; such lists contribute nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PaintList {
    Entries(Vec<PaintSlot>),
    Mixed(Value),
}

/// A node's children. A non-array value contributes no children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChildList {
    Entries(Vec<LayerNode>),
    Other(Value),
}

impl ChildList {
    pub fn as_slice(&self) -> &[LayerNode] {
        match self {
            ChildList::Entries(children) => children,
            ChildList::Other(_) => &[],
        }
    }
}

/// Only a non-boolean `visible` makes a layer object unreadable; every other
/// field tolerates unexpected types.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LayerData {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_text"
    )]
    pub id: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_text"
    )]
    pub name: Option<String>,
    #[serde(rename = "type", default, deserialize_with = "lenient_type")]
    pub node_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fills: Option<PaintList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub strokes: Option<PaintList>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<ChildList>,
}

impl LayerData {
    pub fn new(node_type: &str, name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            node_type: node_type.to_string(),
            ..Self::default()
        }
    }

    pub fn hidden(mut self) -> Self {
        self.visible = Some(false);
        self
    }

    pub fn with_fill(mut self, paint: Paint) -> Self {
        push_paint(&mut self.fills, paint);
        self
    }

    pub fn with_stroke(mut self, paint: Paint) -> Self {
        push_paint(&mut self.strokes, paint);
        self
    }

    pub fn with_child(mut self, child: impl Into<LayerNode>) -> Self {
        match &mut self.children {
            Some(ChildList::Entries(children)) => children.push(child.into()),
            _ => self.children = Some(ChildList::Entries(vec![child.into()])),
        }
        self
    }
}

fn push_paint(list: &mut Option<PaintList>, paint: Paint) {
    match list {
        Some(PaintList::Entries(entries)) => entries.push(PaintSlot::Paint(paint)),
        _ => *list = Some(PaintList::Entries(vec![PaintSlot::Paint(paint)])),
    }
}

fn lenient_level<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(Some(value.as_f64().unwrap_or(f64::NAN)))
}

// Anything that is not a channel object counts as an absent color.
fn lenient_color<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<ChannelColor>, D::Error> {
    match Value::deserialize(deserializer)? {
        value @ Value::Object(_) => ChannelColor::deserialize(value)
            .map(Some)
            .map_err(serde::de::Error::custom),
        _ => Ok(None),
    }
}

fn lenient_kind<'de, D: Deserializer<'de>>(deserializer: D) -> Result<PaintKind, D::Error> {
    match Value::deserialize(deserializer)? {
        value @ Value::String(_) => Ok(PaintKind::deserialize(value).unwrap_or_default()),
        _ => Ok(PaintKind::Other),
    }
}

// Only an explicit `false` hides a paint.
fn lenient_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<bool>, D::Error> {
    Ok(Value::deserialize(deserializer)?.as_bool())
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        Value::String(text) => Some(text),
        other => Some(other.to_string()),
    })
}

fn lenient_type<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::String(text) => text,
        _ => String::new(),
    })
}

/// A node of the inspected tree as delivered by the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum LayerNode {
    Layer(LayerData),
    Unreadable(Value),
}

impl From<LayerData> for LayerNode {
    fn from(data: LayerData) -> Self {
        LayerNode::Layer(data)
    }
}

/// Exported page content: the current selection and the top-level children.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Document {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub selection: Vec<LayerNode>,
    #[serde(default)]
    pub children: Vec<LayerNode>,
}

impl Document {
    /// The selection when requested and non-empty, otherwise every top-level child.
    pub fn targets(&self, selected_only: bool) -> &[LayerNode] {
        if selected_only && !self.selection.is_empty() {
            &self.selection
        } else {
            &self.children
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRef {
    pub name: String,
    pub node_type: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TokenMatch {
    pub name: String,
    pub value: String,
    pub availability: Availability,
    pub note: String,
    pub distance: Option<f64>,
}

impl TokenMatch {
    pub fn from_token(token: &Token, distance: f64) -> Self {
        Self {
            name: token.name.clone(),
            value: token.value.clone(),
            availability: token.availability,
            note: token.note.clone(),
            distance: Some(distance),
        }
    }

    /// Stand-in match carried by a result whose color could not be matched.
    pub fn degraded(color: &str, reason: &str) -> Self {
        Self {
            name: "Error".to_string(),
            value: color.to_string(),
            availability: Availability::Unknown,
            note: format!("Matching failed: {}", reason),
            distance: None,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.distance.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanResult {
    pub layer_name: String,
    pub layer_type: String,
    #[serde(rename = "styleType")]
    pub style: StyleKind,
    pub color: String,
    pub token_match: TokenMatch,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ScanError {
    #[error("{} processing error: {}", .style.title(), .reason)]
    PaintProcessing {
        layer: LayerRef,
        style: StyleKind,
        reason: String,
    },

    #[error("Child processing error: {reason}")]
    ChildProcessing { layer: LayerRef, reason: String },

    /// A top-level node that failed outside of its own recovery scopes.
    #[error("{reason}")]
    NodeProcessing { layer: LayerRef, reason: String },
}

impl ScanError {
    pub fn layer(&self) -> &LayerRef {
        match self {
            ScanError::PaintProcessing { layer, .. }
            | ScanError::ChildProcessing { layer, .. }
            | ScanError::NodeProcessing { layer, .. } => layer,
        }
    }

    pub fn kind_label(&self) -> &'static str {
        match self {
            ScanError::PaintProcessing { style, .. } => style.label(),
            ScanError::ChildProcessing { .. } => "child",
            ScanError::NodeProcessing { .. } => "node",
        }
    }
}

impl Serialize for ScanError {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let layer = self.layer();
        let mut state = serializer.serialize_struct("ScanError", 4)?;
        state.serialize_field("nodeName", &layer.name)?;
        state.serialize_field("nodeType", &layer.node_type)?;
        state.serialize_field("kind", self.kind_label())?;
        state.serialize_field("error", &self.to_string())?;
        state.end()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanStats {
    pub total_nodes: usize,
    pub processed_nodes: usize,
    pub error_count: usize,
    pub color_matches: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScanReport {
    pub results: Vec<ScanResult>,
    pub stats: ScanStats,
    pub errors: Vec<ScanError>,
    pub scanned_at: DateTime<Utc>,
}

impl ScanReport {
    pub fn new(
        results: Vec<ScanResult>,
        errors: Vec<ScanError>,
        total_nodes: usize,
        processed_nodes: usize,
    ) -> Self {
        let stats = ScanStats {
            total_nodes,
            processed_nodes,
            error_count: errors.len(),
            color_matches: results.len(),
        };
        Self {
            results,
            stats,
            errors,
            scanned_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanProgress {
    pub processed: usize,
    pub total: usize,
}

/// When progress is reported: only for scans over `min_total` top-level
/// nodes, after every `every`-th processed node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressPolicy {
    #[serde(default = "default_min_total")]
    pub min_total: usize,
    #[serde(default = "default_every")]
    pub every: usize,
}

fn default_min_total() -> usize {
    10
}

fn default_every() -> usize {
    5
}

impl Default for ProgressPolicy {
    fn default() -> Self {
        Self {
            min_total: default_min_total(),
            every: default_every(),
        }
    }
}

impl ProgressPolicy {
    pub fn should_notify(&self, processed: usize, total: usize) -> bool {
        total > self.min_total && self.every > 0 && processed % self.every == 0
    }
}

/// Messages sent to the host while a scan runs.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum ScanEvent {
    #[serde(rename = "scan-started")]
    Started,
    #[serde(rename = "scan-progress")]
    Progress(ScanProgress),
    #[serde(rename = "scan-results")]
    Completed(ScanReport),
    #[serde(rename = "scan-error")]
    Failed { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    Json,
    Csv,
}

impl FromStr for ReportFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(ReportFormat::Json),
            "csv" => Ok(ReportFormat::Csv),
            other => Err(format!("unsupported report format '{}' (json, csv)", other)),
        }
    }
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportFormat::Json => f.write_str("json"),
            ReportFormat::Csv => f.write_str("csv"),
        }
    }
}
