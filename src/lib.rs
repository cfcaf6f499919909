//! Meal Planner - a weekly 7×3 meal grid kept in local storage
//!
//! Core modules:
//! - `plan`: Days, meal slots and the persisted plan shape
//! - `persistence`: Key-value stores and the typed slot binding
//! - `controller`: Stats and the single-cell edit state machine
//! - `config`: Storage key, log level, native data file
//! - `logging`: Platform logger setup

pub mod config;
pub mod controller;
pub mod logging;
pub mod persistence;
pub mod plan;

pub use config::PlannerConfig;
pub use controller::{CellView, EditSession, GridAction, PlanGridController};
pub use persistence::{KeyValueStore, PersistentKeyedState};
pub use plan::{Day, MealSlot, Plan, PlanStats};
