//! Tile views for the KPI board
//!
//! Projects KPIs into tile descriptions and draws them on a free-form
//! canvas with drag and resize handles.

pub mod canvas;
pub mod chart;
pub mod plots;
pub mod tile;

pub use canvas::{CanvasEvent, KpiCanvas};
pub use chart::ChartSpec;
pub use tile::{project_dashboard, project_tile, TileDescription};
