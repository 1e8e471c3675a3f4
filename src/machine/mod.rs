//! The game state machine.
//!
//! ## Key Types
//!
//! - `GameStateMachine`: Owns the state and applies every transition
//! - `GameMode` / `OptionRoute`: Where the player is and what options do
//! - `PlayerAction` / `ActionOutcome`: Input and result of a transition
//! - `Content`: The catalogs a run is played against

pub mod action;
pub mod content;
pub mod mode;
pub mod state_machine;

pub use action::{ActionEvent, ActionOutcome, Delivery, PlayerAction};
pub use content::Content;
pub use mode::{GameMode, OptionRoute, SetupStep};
pub use state_machine::GameStateMachine;
