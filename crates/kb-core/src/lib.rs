//! Core functionality for the KPI board
//!
//! This crate provides the KPI data model, the in-memory dataset holder,
//! the aggregation engine, the persisted KPI registry and the edit
//! controller that drives the sidebar form.

pub mod aggregate;
pub mod data;
pub mod edit;
pub mod events;
pub mod kpi;
pub mod registry;
pub mod state;
pub mod store;

// Re-export commonly used types
pub use aggregate::{coerce_number, compute_kpi, numeric_column, numeric_points, DisplayValue, NO_DATA};
pub use data::{CellValue, Dataset, Row, TabularStore};
pub use edit::{EditController, EditMode, FormState};
pub use events::EventBus;
pub use kpi::{
    AggregationKind, CanvasBounds, ChartKind, Geometry, Kpi, KpiDraft, KpiId, Manipulation,
};
pub use registry::{KpiRegistry, RegistryError, SaveOutcome};
pub use state::Dashboard;
pub use store::{JsonFileStore, KpiStore, MemoryStore, StoreError};
