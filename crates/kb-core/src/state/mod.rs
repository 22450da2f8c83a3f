use std::sync::Arc;

use tracing::info;

use crate::data::{Dataset, TabularStore};
use crate::edit::{EditController, FormState};
use crate::events::events::{DatasetLoaded, KpiDeleted, KpiSaved, TileManipulated};
use crate::events::EventBus;
use crate::kpi::{CanvasBounds, Kpi, KpiId, Manipulation};
use crate::registry::{KpiRegistry, RegistryError, SaveOutcome};
use crate::store::KpiStore;

/// The dashboard session: KPI registry, loaded dataset and edit form
///
/// All handlers run to completion on the UI thread; a mutation has been
/// persisted by the time it returns.
pub struct Dashboard {
    registry: KpiRegistry,
    tabular: TabularStore,
    editor: EditController,
    event_bus: Arc<EventBus>,
}

impl Dashboard {
    /// Create a dashboard, loading persisted KPIs from the store
    pub fn new(store: Box<dyn KpiStore>) -> Self {
        Self {
            registry: KpiRegistry::load(store),
            tabular: TabularStore::new(),
            editor: EditController::new(),
            event_bus: Arc::new(EventBus::new()),
        }
    }

    pub fn registry(&self) -> &KpiRegistry {
        &self.registry
    }

    pub fn tabular(&self) -> &TabularStore {
        &self.tabular
    }

    pub fn dataset(&self) -> Arc<Dataset> {
        self.tabular.snapshot()
    }

    pub fn editor(&self) -> &EditController {
        &self.editor
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        self.editor.form_mut()
    }

    pub fn selection(&self) -> Option<&KpiId> {
        self.editor.selection()
    }

    pub fn event_bus(&self) -> &Arc<EventBus> {
        &self.event_bus
    }

    /// Changes whenever tiles need to be rebuilt
    pub fn render_key(&self) -> (u64, u64) {
        (self.registry.revision(), self.tabular.generation())
    }

    pub fn set_canvas_bounds(&mut self, bounds: CanvasBounds) {
        self.registry.set_bounds(Some(bounds));
    }

    /// Replace the dataset. KPI definitions are left untouched.
    pub fn load_dataset(&mut self, dataset: Dataset) {
        let source_name = dataset.source_name().to_string();
        let row_count = dataset.row_count();

        self.tabular.replace(dataset);
        let column_count = self.tabular.columns().len();

        info!("Loaded {} ({} rows, {} columns)", source_name, row_count, column_count);
        self.event_bus.publish(DatasetLoaded {
            source_name,
            row_count,
            column_count,
        });
    }

    /// Columns offered in the form
    pub fn columns(&self) -> Vec<String> {
        self.tabular.columns()
    }

    /// A tile was clicked
    pub fn activate_tile(&mut self, id: &KpiId) -> bool {
        self.editor.activate(&self.registry, id)
    }

    /// A pointer action landed outside both the tiles and the form
    pub fn dismiss_selection(&mut self) {
        self.editor.dismiss();
    }

    pub fn save(&mut self) -> Result<SaveOutcome, RegistryError> {
        let outcome = self.editor.save(&mut self.registry)?;
        self.event_bus.publish(KpiSaved {
            id: outcome.id.clone(),
            created: outcome.created,
        });
        Ok(outcome)
    }

    pub fn delete(&mut self) -> Result<Option<Kpi>, RegistryError> {
        let removed = self.editor.delete(&mut self.registry)?;
        if let Some(kpi) = &removed {
            self.event_bus.publish(KpiDeleted { id: kpi.id.clone() });
        }
        Ok(removed)
    }

    /// Drag/resize of a tile; goes straight to the registry
    pub fn manipulate(&mut self, id: &KpiId, manipulation: Manipulation) -> Result<bool, RegistryError> {
        let changed = self.registry.apply_manipulation(id, manipulation)?;
        if changed {
            self.event_bus.publish(TileManipulated { id: id.clone() });
        }
        Ok(changed)
    }
}
