//! Plan grid controller
//!
//! Owns the persisted plan and the single active edit. Renders nothing;
//! the presentation layer reads `stats()`/`cell_view()` and forwards user
//! actions to the methods below.

use crate::persistence::{KeyValueStore, PersistentKeyedState};
use crate::plan::{Day, MealSlot, Plan, PlanStats};

/// Prompt passed to the confirmation callback of `clear_cell`
pub const CLEAR_PROMPT: &str = "Clear this meal?";

/// The single editable cell, if any
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum EditSession {
    #[default]
    Idle,
    Editing {
        day: Day,
        meal: MealSlot,
        draft: String,
    },
}

impl EditSession {
    pub fn is_editing(&self, day: Day, meal: MealSlot) -> bool {
        matches!(self, EditSession::Editing { day: d, meal: m, .. } if *d == day && *m == meal)
    }

    pub fn draft(&self) -> Option<&str> {
        match self {
            EditSession::Idle => None,
            EditSession::Editing { draft, .. } => Some(draft),
        }
    }
}

/// A user action on the grid, as the view reports it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridAction {
    Edit { day: Day, meal: MealSlot },
    Save,
    Cancel,
    Clear { day: Day, meal: MealSlot },
}

impl GridAction {
    /// Name carried in the view's `data-action` attribute
    pub fn name(&self) -> &'static str {
        match self {
            GridAction::Edit { .. } => "edit",
            GridAction::Save => "save",
            GridAction::Cancel => "cancel",
            GridAction::Clear { .. } => "clear",
        }
    }

    /// Target cell for the cell-scoped actions
    pub fn cell(&self) -> Option<(Day, MealSlot)> {
        match self {
            GridAction::Edit { day, meal } | GridAction::Clear { day, meal } => Some((*day, *meal)),
            GridAction::Save | GridAction::Cancel => None,
        }
    }

    /// Rebuild an action from its name and the cell labels it was tagged with
    pub fn parse(name: &str, day: Option<&str>, meal: Option<&str>) -> Option<Self> {
        let cell = || -> Option<(Day, MealSlot)> {
            Some((Day::from_str(day?)?, MealSlot::from_str(meal?)?))
        };
        match name {
            "edit" => cell().map(|(day, meal)| GridAction::Edit { day, meal }),
            "save" => Some(GridAction::Save),
            "cancel" => Some(GridAction::Cancel),
            "clear" => cell().map(|(day, meal)| GridAction::Clear { day, meal }),
            _ => None,
        }
    }

    /// Editor shortcuts: Enter saves, Escape cancels
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Enter" => Some(GridAction::Save),
            "Escape" => Some(GridAction::Cancel),
            _ => None,
        }
    }
}

/// What the view needs to draw one cell
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellView {
    pub day: Day,
    pub meal: MealSlot,
    pub text: String,
    pub has_meal: bool,
    pub is_editing: bool,
}

pub struct PlanGridController<S> {
    plan: PersistentKeyedState<Plan, S>,
    session: EditSession,
}

impl<S: KeyValueStore> PlanGridController<S> {
    /// Bind the plan to `key` in `store`; nothing is read until `load()`
    pub fn new(key: impl Into<String>, store: S) -> Self {
        Self::from_state(PersistentKeyedState::new(key, Plan::new(), store))
    }

    pub fn from_state(plan: PersistentKeyedState<Plan, S>) -> Self {
        Self {
            plan,
            session: EditSession::Idle,
        }
    }

    /// Run the deferred load, then backfill a blank week if needed
    pub fn load(&mut self) {
        self.plan.load();
        self.ensure_initialized();
    }

    pub fn is_loaded(&self) -> bool {
        self.plan.is_loaded()
    }

    pub fn plan(&self) -> &Plan {
        self.plan.value()
    }

    pub fn session(&self) -> &EditSession {
        &self.session
    }

    pub fn state(&self) -> &PersistentKeyedState<Plan, S> {
        &self.plan
    }

    /// Fill every cell with "" when the loaded plan has no day keys
    ///
    /// Returns true when it wrote. A plan with keys present (even if every
    /// cell is empty) is left alone, so repeated calls are harmless.
    pub fn ensure_initialized(&mut self) -> bool {
        if !self.plan.is_loaded() || !self.plan.value().is_empty() {
            return false;
        }
        log::info!("Initializing blank week plan");
        self.plan.set(Plan::blank());
        true
    }

    pub fn stats(&self) -> PlanStats {
        self.plan.value().stats()
    }

    pub fn cell_view(&self, day: Day, meal: MealSlot) -> CellView {
        let plan = self.plan.value();
        CellView {
            day,
            meal,
            text: plan.cell(day, meal).to_string(),
            has_meal: plan.is_planned(day, meal),
            is_editing: self.session.is_editing(day, meal),
        }
    }

    /// Open the editor on a cell, replacing any other open editor
    pub fn start_edit(&mut self, day: Day, meal: MealSlot) {
        let draft = self.plan.value().cell(day, meal).to_string();
        log::debug!("Editing {} {}", day.as_str(), meal.as_str());
        self.session = EditSession::Editing { day, meal, draft };
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        if let EditSession::Editing { draft, .. } = &mut self.session {
            *draft = text.into();
        }
    }

    /// Commit the draft to its cell; no-op when idle
    pub fn save_edit(&mut self) {
        let EditSession::Editing { day, meal, draft } = std::mem::take(&mut self.session) else {
            return;
        };
        log::debug!("Saving {} {}", day.as_str(), meal.as_str());
        self.plan.update(|plan| plan.with_cell(day, meal, draft));
    }

    pub fn cancel_edit(&mut self) {
        self.session = EditSession::Idle;
    }

    /// Empty a cell once `confirm` agrees; the edit session is untouched
    pub fn clear_cell<F>(&mut self, day: Day, meal: MealSlot, confirm: F) -> bool
    where
        F: FnOnce(&str) -> bool,
    {
        if !confirm(CLEAR_PROMPT) {
            return false;
        }
        log::debug!("Clearing {} {}", day.as_str(), meal.as_str());
        self.plan.update(|plan| plan.with_cell(day, meal, ""));
        true
    }

    /// Route a view action to the matching transition
    pub fn apply<F>(&mut self, action: GridAction, confirm: F)
    where
        F: FnOnce(&str) -> bool,
    {
        match action {
            GridAction::Edit { day, meal } => self.start_edit(day, meal),
            GridAction::Save => self.save_edit(),
            GridAction::Cancel => self.cancel_edit(),
            GridAction::Clear { day, meal } => {
                self.clear_cell(day, meal, confirm);
            }
        }
    }
}
