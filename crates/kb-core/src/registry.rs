//! KPI registry: the ordered, persisted collection of KPI definitions

use std::collections::HashSet;

use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::kpi::{CanvasBounds, Kpi, KpiDraft, KpiId, Manipulation};
use crate::store::{KpiStore, StoreError};

/// Errors raised by registry mutations
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("KPI name is required")]
    NameRequired,

    #[error("KPI {0} no longer exists")]
    UnknownKpi(KpiId),

    #[error("Failed to persist KPIs: {0}")]
    Persist(#[from] StoreError),
}

/// Result of a successful save
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub id: KpiId,
    pub created: bool,
}

/// Ordered KPI collection backed by a store
///
/// Every mutation writes the full collection to the store before the
/// in-memory copy changes, so a failed write leaves both sides as they were.
pub struct KpiRegistry {
    kpis: Vec<Kpi>,
    store: Box<dyn KpiStore>,
    bounds: Option<CanvasBounds>,
    revision: u64,
}

impl KpiRegistry {
    /// Load the persisted collection. Missing or unreadable data gives an
    /// empty registry.
    pub fn load(store: Box<dyn KpiStore>) -> Self {
        let kpis = match store.load() {
            Ok(kpis) => {
                info!("Loaded {} KPI(s) from {}", kpis.len(), store.describe());
                dedupe_ids(kpis)
            }
            Err(e) => {
                warn!("Ignoring unreadable KPI storage at {}: {}", store.describe(), e);
                Vec::new()
            }
        };

        Self {
            kpis,
            store,
            bounds: None,
            revision: 0,
        }
    }

    /// Area tiles are kept inside when manipulated
    pub fn set_bounds(&mut self, bounds: Option<CanvasBounds>) {
        self.bounds = bounds;
    }

    pub fn bounds(&self) -> Option<CanvasBounds> {
        self.bounds
    }

    pub fn get(&self, id: &KpiId) -> Option<&Kpi> {
        self.kpis.iter().find(|k| &k.id == id)
    }

    pub fn contains(&self, id: &KpiId) -> bool {
        self.get(id).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Kpi> {
        self.kpis.iter()
    }

    pub fn kpis(&self) -> &[Kpi] {
        &self.kpis
    }

    pub fn len(&self) -> usize {
        self.kpis.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kpis.is_empty()
    }

    /// Incremented after every committed mutation
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Create a KPI (no selection) or merge the draft into the selected one
    pub fn save(
        &mut self,
        selection: Option<&KpiId>,
        mut draft: KpiDraft,
    ) -> Result<SaveOutcome, RegistryError> {
        draft.name = draft.name.trim().to_string();
        if draft.name.is_empty() {
            return Err(RegistryError::NameRequired);
        }

        let mut next = self.kpis.clone();
        let outcome = match selection {
            Some(id) => {
                let Some(existing) = next.iter_mut().find(|k| &k.id == id) else {
                    warn!("Save targeted KPI {} which no longer exists", id);
                    return Err(RegistryError::UnknownKpi(id.clone()));
                };
                existing.merge(draft);
                SaveOutcome {
                    id: id.clone(),
                    created: false,
                }
            }
            None => {
                let id = KpiId::mint(|candidate| self.contains(candidate));
                next.push(Kpi::new(id.clone(), draft));
                SaveOutcome { id, created: true }
            }
        };

        self.commit(next)?;
        info!(
            "{} KPI {}",
            if outcome.created { "Created" } else { "Updated" },
            outcome.id
        );
        Ok(outcome)
    }

    /// Remove the selected KPI. No selection is a no-op.
    pub fn delete(&mut self, selection: Option<&KpiId>) -> Result<Option<Kpi>, RegistryError> {
        let Some(id) = selection else {
            return Ok(None);
        };
        let Some(idx) = self.kpis.iter().position(|k| &k.id == id) else {
            return Ok(None);
        };

        let mut next = self.kpis.clone();
        let removed = next.remove(idx);
        self.commit(next)?;

        info!("Deleted KPI {}", removed.id);
        Ok(Some(removed))
    }

    /// Fold a drag/resize into a KPI's geometry. Unknown ids are ignored.
    pub fn apply_manipulation(
        &mut self,
        id: &KpiId,
        manipulation: Manipulation,
    ) -> Result<bool, RegistryError> {
        let Some(idx) = self.kpis.iter().position(|k| &k.id == id) else {
            return Ok(false);
        };

        let mut geometry = self.kpis[idx].geometry.apply(manipulation);
        if let Some(bounds) = self.bounds {
            geometry = geometry.constrained_to(bounds);
        }
        if geometry == self.kpis[idx].geometry {
            return Ok(false);
        }

        let mut next = self.kpis.clone();
        next[idx].geometry = geometry;
        self.commit(next)?;

        debug!("KPI {} geometry now {:?}", id, geometry);
        Ok(true)
    }

    fn commit(&mut self, next: Vec<Kpi>) -> Result<(), RegistryError> {
        if let Err(e) = self.store.save(&next) {
            error!("Failed to persist KPIs to {}: {}", self.store.describe(), e);
            return Err(e.into());
        }
        self.kpis = next;
        self.revision += 1;
        Ok(())
    }
}

/// Keep the first record for each id
fn dedupe_ids(kpis: Vec<Kpi>) -> Vec<Kpi> {
    let mut seen = HashSet::new();
    kpis.into_iter()
        .filter(|kpi| {
            let fresh = seen.insert(kpi.id.clone());
            if !fresh {
                warn!("Dropping duplicate stored KPI {}", kpi.id);
            }
            fresh
        })
        .collect()
}
