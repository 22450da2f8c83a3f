//! Edit controller: the single-selection state machine behind the form
//!
//! `Idle` means the form creates a new KPI; `Editing` means it is loaded
//! from, and saves back into, one existing KPI.

use tracing::{debug, warn};

use crate::kpi::{AggregationKind, ChartKind, Kpi, KpiDraft, KpiId};
use crate::registry::{KpiRegistry, RegistryError, SaveOutcome};

/// Form title while creating
pub const CREATE_TITLE: &str = "Create KPI";

/// Form title while editing
pub const EDIT_TITLE: &str = "Edit KPI";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditMode {
    #[default]
    Idle,
    Editing(KpiId),
}

/// Values currently in the form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormState {
    pub name: String,
    pub kind: Option<AggregationKind>,
    pub column: Option<String>,
    pub chart: Option<ChartKind>,
}

impl FormState {
    pub fn from_kpi(kpi: &Kpi) -> Self {
        Self {
            name: kpi.name.clone(),
            kind: kpi.kind.clone(),
            column: kpi.column.clone(),
            chart: kpi.chart.clone(),
        }
    }

    pub fn to_draft(&self) -> KpiDraft {
        KpiDraft {
            name: self.name.clone(),
            kind: self.kind.clone(),
            column: self.column.clone(),
            chart: self.chart.clone(),
        }
    }
}

#[derive(Debug, Default)]
pub struct EditController {
    mode: EditMode,
    form: FormState,
}

impl EditController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> &EditMode {
        &self.mode
    }

    /// Id of the KPI loaded into the form, if any
    pub fn selection(&self) -> Option<&KpiId> {
        match &self.mode {
            EditMode::Idle => None,
            EditMode::Editing(id) => Some(id),
        }
    }

    pub fn is_editing(&self) -> bool {
        matches!(self.mode, EditMode::Editing(_))
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn form_mut(&mut self) -> &mut FormState {
        &mut self.form
    }

    pub fn title(&self) -> &'static str {
        if self.is_editing() {
            EDIT_TITLE
        } else {
            CREATE_TITLE
        }
    }

    pub fn delete_visible(&self) -> bool {
        self.is_editing()
    }

    /// Load a tile's KPI into the form. Unsaved form edits are discarded.
    pub fn activate(&mut self, registry: &KpiRegistry, id: &KpiId) -> bool {
        let Some(kpi) = registry.get(id) else {
            warn!("Ignoring activation of unknown KPI {}", id);
            return false;
        };
        self.form = FormState::from_kpi(kpi);
        self.mode = EditMode::Editing(id.clone());
        debug!("Editing KPI {}", id);
        true
    }

    /// Back to idle with a blank form
    pub fn dismiss(&mut self) {
        self.mode = EditMode::Idle;
        self.form = FormState::default();
    }

    /// Save the form. On success the controller returns to idle; a blank
    /// name leaves everything as it was.
    pub fn save(&mut self, registry: &mut KpiRegistry) -> Result<SaveOutcome, RegistryError> {
        let draft = self.form.to_draft();
        match registry.save(self.selection(), draft) {
            Ok(outcome) => {
                self.dismiss();
                Ok(outcome)
            }
            Err(RegistryError::UnknownKpi(id)) => {
                self.dismiss();
                Err(RegistryError::UnknownKpi(id))
            }
            Err(e) => Err(e),
        }
    }

    /// Delete the selected KPI. Without a selection nothing happens.
    pub fn delete(&mut self, registry: &mut KpiRegistry) -> Result<Option<Kpi>, RegistryError> {
        if !self.is_editing() {
            return Ok(None);
        }
        let removed = registry.delete(self.selection())?;
        self.dismiss();
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn registry_with(names: &[&str]) -> (KpiRegistry, Vec<KpiId>) {
        let mut reg = KpiRegistry::load(Box::new(MemoryStore::new()));
        let ids = names
            .iter()
            .map(|name| {
                reg.save(
                    None,
                    KpiDraft {
                        name: name.to_string(),
                        kind: Some(AggregationKind::Sum),
                        column: Some("Sales".to_string()),
                        chart: None,
                    },
                )
                .unwrap()
                .id
            })
            .collect();
        (reg, ids)
    }

    #[test]
    fn test_starts_idle() {
        let ctl = EditController::new();
        assert_eq!(ctl.mode(), &EditMode::Idle);
        assert_eq!(ctl.title(), CREATE_TITLE);
        assert!(!ctl.delete_visible());
        assert_eq!(ctl.form(), &FormState::default());
    }

    #[test]
    fn test_activate_populates_form() {
        let (reg, ids) = registry_with(&["Total"]);
        let mut ctl = EditController::new();

        assert!(ctl.activate(&reg, &ids[0]));
        assert_eq!(ctl.selection(), Some(&ids[0]));
        assert_eq!(ctl.title(), EDIT_TITLE);
        assert!(ctl.delete_visible());
        assert_eq!(ctl.form().name, "Total");
        assert_eq!(ctl.form().column.as_deref(), Some("Sales"));
    }

    #[test]
    fn test_switching_tiles_discards_unsaved_edits() {
        let (reg, ids) = registry_with(&["First", "Second"]);
        let mut ctl = EditController::new();

        ctl.activate(&reg, &ids[0]);
        ctl.form_mut().name = "Unsaved".to_string();
        ctl.activate(&reg, &ids[1]);

        assert_eq!(ctl.selection(), Some(&ids[1]));
        assert_eq!(ctl.form().name, "Second");
        assert_eq!(reg.get(&ids[0]).unwrap().name, "First");
    }

    #[test]
    fn test_activate_unknown_is_ignored() {
        let (reg, _) = registry_with(&["Total"]);
        let mut ctl = EditController::new();
        assert!(!ctl.activate(&reg, &KpiId::new("missing")));
        assert_eq!(ctl.mode(), &EditMode::Idle);
    }

    #[test]
    fn test_save_creates_and_returns_to_idle() {
        let (mut reg, _) = registry_with(&[]);
        let mut ctl = EditController::new();
        ctl.form_mut().name = "Total".to_string();

        let outcome = ctl.save(&mut reg).unwrap();
        assert!(outcome.created);
        assert_eq!(reg.len(), 1);
        assert_eq!(ctl.mode(), &EditMode::Idle);
        assert!(ctl.form().name.is_empty());
    }

    #[test]
    fn test_save_while_editing_updates() {
        let (mut reg, ids) = registry_with(&["Total"]);
        let mut ctl = EditController::new();
        ctl.activate(&reg, &ids[0]);
        ctl.form_mut().kind = Some(AggregationKind::Avg);

        let outcome = ctl.save(&mut reg).unwrap();
        assert!(!outcome.created);
        assert_eq!(reg.len(), 1);
        assert_eq!(reg.get(&ids[0]).unwrap().kind, Some(AggregationKind::Avg));
        assert_eq!(ctl.mode(), &EditMode::Idle);
    }

    #[test]
    fn test_blank_name_keeps_state() {
        let (mut reg, ids) = registry_with(&["Total"]);
        let mut ctl = EditController::new();
        ctl.form_mut().name = "  ".to_string();
        assert!(matches!(ctl.save(&mut reg), Err(RegistryError::NameRequired)));
        assert_eq!(ctl.mode(), &EditMode::Idle);
        assert_eq!(ctl.form().name, "  ");

        ctl.activate(&reg, &ids[0]);
        ctl.form_mut().name.clear();
        assert!(matches!(ctl.save(&mut reg), Err(RegistryError::NameRequired)));
        assert_eq!(ctl.selection(), Some(&ids[0]));
        assert_eq!(reg.get(&ids[0]).unwrap().name, "Total");
    }

    #[test]
    fn test_delete_selected() {
        let (mut reg, ids) = registry_with(&["A", "B"]);
        let mut ctl = EditController::new();
        ctl.activate(&reg, &ids[0]);

        let removed = ctl.delete(&mut reg).unwrap().unwrap();
        assert_eq!(removed.id, ids[0]);
        assert_eq!(reg.len(), 1);
        assert_eq!(ctl.mode(), &EditMode::Idle);
    }

    #[test]
    fn test_delete_without_selection_is_noop() {
        let (mut reg, _) = registry_with(&["A"]);
        let mut ctl = EditController::new();
        ctl.form_mut().name = "draft".to_string();

        assert!(ctl.delete(&mut reg).unwrap().is_none());
        assert_eq!(reg.len(), 1);
        assert_eq!(ctl.form().name, "draft");
    }

    #[test]
    fn test_dismiss_clears_selection() {
        let (reg, ids) = registry_with(&["A"]);
        let mut ctl = EditController::new();
        ctl.activate(&reg, &ids[0]);
        ctl.dismiss();
        assert_eq!(ctl.selection(), None);
        assert_eq!(ctl.form(), &FormState::default());
    }
}
