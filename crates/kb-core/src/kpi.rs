//! KPI definitions and tile geometry
//!
//! A KPI is a named aggregation over one dataset column with an optional
//! chart and the position/size of its tile on the canvas. The serialized
//! field names (`type`, `x`, `width`, ...) are the persisted format.

use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};

/// Default tile position (pixels from the canvas origin)
pub const DEFAULT_X: f32 = 10.0;
pub const DEFAULT_Y: f32 = 10.0;

/// Default tile size in pixels
pub const DEFAULT_WIDTH: f32 = 150.0;
pub const DEFAULT_HEIGHT: f32 = 100.0;

/// Smallest size a tile can be resized to
pub const MIN_TILE_WIDTH: f32 = 80.0;
pub const MIN_TILE_HEIGHT: f32 = 60.0;

/// Stable identity of a KPI
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KpiId(String);

impl KpiId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Mint a time-based id (Unix milliseconds). If the token is taken the
    /// number is bumped until it is free.
    pub fn mint(taken: impl Fn(&KpiId) -> bool) -> Self {
        let mut millis = chrono::Utc::now().timestamp_millis();
        loop {
            let candidate = Self(millis.to_string());
            if !taken(&candidate) {
                return candidate;
            }
            millis += 1;
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for KpiId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Aggregation applied to the KPI's column
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AggregationKind {
    Sum,
    Avg,
    Min,
    Max,
    /// A stored value this build does not know how to compute
    Other(String),
}

impl AggregationKind {
    /// The kinds offered in the form
    pub const ALL: [AggregationKind; 4] = [
        AggregationKind::Sum,
        AggregationKind::Avg,
        AggregationKind::Min,
        AggregationKind::Max,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            AggregationKind::Sum => "sum",
            AggregationKind::Avg => "avg",
            AggregationKind::Min => "min",
            AggregationKind::Max => "max",
            AggregationKind::Other(other) => other,
        }
    }
}

impl From<String> for AggregationKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "sum" => AggregationKind::Sum,
            "avg" => AggregationKind::Avg,
            "min" => AggregationKind::Min,
            "max" => AggregationKind::Max,
            _ => AggregationKind::Other(value),
        }
    }
}

impl From<AggregationKind> for String {
    fn from(kind: AggregationKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for AggregationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Chart drawn inside a tile
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ChartKind {
    Bar,
    Pie,
    Line,
    /// Any other chart name; drawn with default settings
    Other(String),
}

impl ChartKind {
    /// The kinds offered in the form
    pub const ALL: [ChartKind; 3] = [ChartKind::Bar, ChartKind::Pie, ChartKind::Line];

    pub fn as_str(&self) -> &str {
        match self {
            ChartKind::Bar => "bar",
            ChartKind::Pie => "pie",
            ChartKind::Line => "line",
            ChartKind::Other(other) => other,
        }
    }
}

impl From<String> for ChartKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "bar" => ChartKind::Bar,
            "pie" => ChartKind::Pie,
            "line" => ChartKind::Line,
            _ => ChartKind::Other(value),
        }
    }
}

impl From<ChartKind> for String {
    fn from(kind: ChartKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Size of the area tiles must stay inside
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CanvasBounds {
    pub width: f32,
    pub height: f32,
}

impl CanvasBounds {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }
}

/// A pointer manipulation reported for one tile
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Manipulation {
    /// Move by a delta
    Drag { dx: f32, dy: f32 },

    /// Resize from any edge. `left`/`top` are how far the left/top edges
    /// moved; `width`/`height` are the new size.
    Resize {
        left: f32,
        top: f32,
        width: f32,
        height: f32,
    },
}

/// Tile position and size in pixels
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Geometry {
    #[serde(default = "default_x")]
    pub x: f32,
    #[serde(default = "default_y")]
    pub y: f32,
    #[serde(default = "default_width")]
    pub width: f32,
    #[serde(default = "default_height")]
    pub height: f32,
}

fn default_x() -> f32 {
    DEFAULT_X
}

fn default_y() -> f32 {
    DEFAULT_Y
}

fn default_width() -> f32 {
    DEFAULT_WIDTH
}

fn default_height() -> f32 {
    DEFAULT_HEIGHT
}

impl Default for Geometry {
    fn default() -> Self {
        Self {
            x: DEFAULT_X,
            y: DEFAULT_Y,
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
        }
    }
}

impl Geometry {
    /// Fold a manipulation into this geometry
    pub fn apply(&self, manipulation: Manipulation) -> Geometry {
        match manipulation {
            Manipulation::Drag { dx, dy } => Geometry {
                x: self.x + dx,
                y: self.y + dy,
                ..*self
            },
            Manipulation::Resize {
                left,
                top,
                width,
                height,
            } => {
                let width = width.max(MIN_TILE_WIDTH);
                let height = height.max(MIN_TILE_HEIGHT);

                // Resizing from the left/top keeps the opposite edge fixed
                let x = if left != 0.0 {
                    self.x + self.width - width
                } else {
                    self.x
                };
                let y = if top != 0.0 {
                    self.y + self.height - height
                } else {
                    self.y
                };

                Geometry {
                    x,
                    y,
                    width,
                    height,
                }
            }
        }
    }

    /// Keep the tile fully inside the canvas
    pub fn constrained_to(&self, bounds: CanvasBounds) -> Geometry {
        let width = self.width.min(bounds.width.max(MIN_TILE_WIDTH));
        let height = self.height.min(bounds.height.max(MIN_TILE_HEIGHT));

        Geometry {
            x: self.x.clamp(0.0, (bounds.width - width).max(0.0)),
            y: self.y.clamp(0.0, (bounds.height - height).max(0.0)),
            width,
            height,
        }
    }
}

/// The form-editable part of a KPI
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpiDraft {
    pub name: String,
    pub kind: Option<AggregationKind>,
    pub column: Option<String>,
    pub chart: Option<ChartKind>,
}

/// A persisted KPI definition
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Kpi {
    pub id: KpiId,

    pub name: String,

    #[serde(
        rename = "type",
        default,
        deserialize_with = "blank_as_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub kind: Option<AggregationKind>,

    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub column: Option<String>,

    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub chart: Option<ChartKind>,

    #[serde(flatten)]
    pub geometry: Geometry,
}

impl Kpi {
    /// Create a KPI at the default position and size
    pub fn new(id: KpiId, draft: KpiDraft) -> Self {
        Self {
            id,
            name: draft.name,
            kind: draft.kind,
            column: draft.column,
            chart: draft.chart,
            geometry: Geometry::default(),
        }
    }

    /// Overwrite the editable fields; id and geometry are kept
    pub fn merge(&mut self, draft: KpiDraft) {
        self.name = draft.name;
        self.kind = draft.kind;
        self.column = draft.column;
        self.chart = draft.chart;
    }

    /// Copy of the editable fields
    pub fn draft(&self) -> KpiDraft {
        KpiDraft {
            name: self.name.clone(),
            kind: self.kind.clone(),
            column: self.column.clone(),
            chart: self.chart.clone(),
        }
    }
}

/// Empty strings in stored records mean "unset"
fn blank_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: From<String>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.filter(|s| !s.is_empty()).map(T::from))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Kpi {
        Kpi::new(
            KpiId::new("1700000000000"),
            KpiDraft {
                name: "Total".to_string(),
                kind: Some(AggregationKind::Sum),
                column: Some("Sales".to_string()),
                chart: Some(ChartKind::Bar),
            },
        )
    }

    #[test]
    fn test_new_kpi_uses_default_geometry() {
        let kpi = sample();
        assert_eq!(kpi.geometry, Geometry::default());
        assert_eq!((kpi.geometry.x, kpi.geometry.y), (10.0, 10.0));
        assert_eq!((kpi.geometry.width, kpi.geometry.height), (150.0, 100.0));
    }

    #[test]
    fn test_serialized_field_names() {
        let value = serde_json::to_value(sample()).unwrap();
        assert_eq!(value["id"], "1700000000000");
        assert_eq!(value["type"], "sum");
        assert_eq!(value["column"], "Sales");
        assert_eq!(value["chart"], "bar");
        assert_eq!(value["x"], 10.0);
        assert_eq!(value["height"], 100.0);
    }

    #[test]
    fn test_blank_fields_and_missing_geometry() {
        let json = r#"{"id":"42","name":"Blank","type":"","column":"","chart":""}"#;
        let kpi: Kpi = serde_json::from_str(json).unwrap();
        assert_eq!(kpi.kind, None);
        assert_eq!(kpi.column, None);
        assert_eq!(kpi.chart, None);
        assert_eq!(kpi.geometry, Geometry::default());
    }

    #[test]
    fn test_unknown_kind_survives_round_trip() {
        let json = r#"{"id":"7","name":"Median","type":"median","chart":"doughnut"}"#;
        let kpi: Kpi = serde_json::from_str(json).unwrap();
        assert_eq!(kpi.kind, Some(AggregationKind::Other("median".to_string())));
        assert_eq!(kpi.chart, Some(ChartKind::Other("doughnut".to_string())));

        let back: Kpi = serde_json::from_str(&serde_json::to_string(&kpi).unwrap()).unwrap();
        assert_eq!(back, kpi);
    }

    #[test]
    fn test_merge_keeps_id_and_geometry() {
        let mut kpi = sample();
        kpi.geometry = Geometry { x: 40.0, y: 80.0, width: 220.0, height: 140.0 };

        kpi.merge(KpiDraft {
            name: "Average".to_string(),
            kind: Some(AggregationKind::Avg),
            column: Some("Sales".to_string()),
            chart: None,
        });

        assert_eq!(kpi.id, KpiId::new("1700000000000"));
        assert_eq!(kpi.name, "Average");
        assert_eq!(kpi.chart, None);
        assert_eq!(kpi.geometry, Geometry { x: 40.0, y: 80.0, width: 220.0, height: 140.0 });
    }

    #[test]
    fn test_mint_skips_taken_ids() {
        let first = KpiId::mint(|_| false);
        let taken = first.clone();
        let second = KpiId::mint(|id| id.as_str().parse::<i64>().unwrap() <= taken.as_str().parse::<i64>().unwrap());
        assert_ne!(first, second);
        assert!(second.as_str().parse::<i64>().unwrap() > first.as_str().parse::<i64>().unwrap());
    }

    #[test]
    fn test_drag_adds_delta() {
        let moved = Geometry::default().apply(Manipulation::Drag { dx: 15.0, dy: -5.0 });
        assert_eq!((moved.x, moved.y), (25.0, 5.0));
        assert_eq!((moved.width, moved.height), (150.0, 100.0));
    }

    #[test]
    fn test_resize_from_left_keeps_right_edge() {
        let geometry = Geometry { x: 100.0, y: 50.0, width: 200.0, height: 100.0 };
        let resized = geometry.apply(Manipulation::Resize {
            left: 30.0,
            top: 0.0,
            width: 170.0,
            height: 100.0,
        });
        assert_eq!(resized.x, 130.0);
        assert_eq!(resized.x + resized.width, 300.0);
        assert_eq!(resized.y, 50.0);
    }

    #[test]
    fn test_resize_respects_minimum_size() {
        let resized = Geometry::default().apply(Manipulation::Resize {
            left: 0.0,
            top: 0.0,
            width: 5.0,
            height: 5.0,
        });
        assert_eq!(resized.width, MIN_TILE_WIDTH);
        assert_eq!(resized.height, MIN_TILE_HEIGHT);
    }

    #[test]
    fn test_constrained_to_canvas() {
        let bounds = CanvasBounds::new(400.0, 300.0);
        let outside = Geometry { x: 380.0, y: -20.0, width: 150.0, height: 100.0 };
        let inside = outside.constrained_to(bounds);
        assert_eq!((inside.x, inside.y), (250.0, 0.0));

        let huge = Geometry { x: 0.0, y: 0.0, width: 900.0, height: 900.0 };
        let capped = huge.constrained_to(bounds);
        assert_eq!((capped.width, capped.height), (400.0, 300.0));
    }
}
