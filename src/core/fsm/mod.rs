//=========================================================================
// State Machine System
//=========================================================================
//
// Single-active-state sequencing with a transition-request channel.
//
// Architecture:
//   Fsm<K, P>
//     ├─ states: HashMap<K, Box<dyn State>>
//     ├─ current: Option<K>
//     └─ requests: Rc<Signal<TransitionRequest<K, P>>>
//
// Flow:
//   set_state() → old.on_exit() → new.on_enter()
//   update(dt)  → current.update(dt)
//
// The machine never honors a transition request itself. States dispatch
// requests through their FsmContext; whoever subscribed to the request
// signal (normally the Director) decides whether and when to act.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt::Debug;
use std::hash::Hash;

use thiserror::Error;

//=== Module Declarations =================================================

mod context;
mod machine;

//=== Public API ==========================================================

pub use context::{FsmContext, TransitionRequest};
pub use machine::Fsm;

//=== State Key Trait =====================================================

/// Marker trait for state identifiers.
///
/// State keys uniquely identify states in the machine's registry.
/// Typically implemented by application-specific enums:
///
/// ```
/// use stagecue::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Stage { Boot, Preload, Main }
/// impl StateKey for Stage {}
/// ```
pub trait StateKey: Copy + Eq + Hash + Debug + 'static {}

//=== State Trait =========================================================

/// Defines state behavior with lifecycle hooks and update logic.
///
/// States are registered in [`Fsm`] and activated via
/// [`Fsm::set_state`]. Each state keeps its own data between
/// activations; the machine owns the state for as long as it is
/// registered.
///
/// Lifecycle guarantees (upheld by the machine):
/// - `on_enter` runs exactly once per activation,
/// - `on_exit` runs exactly once before the next state's `on_enter`
///   (or on machine disposal),
/// - the two never overlap.
///
/// # Minimal Implementation
///
/// Only `update()` is required. Lifecycle hooks have default empty
/// implementations:
///
/// ```
/// use stagecue::prelude::*;
///
/// # #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// # enum Stage { Main }
/// # impl StateKey for Stage {}
/// struct MainStage;
///
/// impl State<Stage> for MainStage {
///     fn update(&mut self, _ctx: &FsmContext<Stage>, _dt: f32) {
///         // Only this method is required
///     }
/// }
/// ```
pub trait State<K: StateKey, P: Clone + 'static = ()> {
    /// Called when the state becomes current.
    ///
    /// `payload` carries whatever the transition supplied; it is opaque
    /// to the machine. Default implementation does nothing.
    fn on_enter(&mut self, _ctx: &FsmContext<K, P>, _payload: Option<&P>) {}

    /// Called when the state stops being current.
    ///
    /// Default implementation does nothing. Override to release
    /// whatever `on_enter` acquired.
    fn on_exit(&mut self, _ctx: &FsmContext<K, P>) {}

    /// Called every tick while the state is current.
    ///
    /// `dt` is elapsed time in seconds. The machine forwards it
    /// unclamped and unvalidated; clamping is this state's business.
    fn update(&mut self, ctx: &FsmContext<K, P>, dt: f32);
}

//=== Errors ==============================================================

/// Errors raised by [`Fsm`] operations.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FsmError<K: StateKey> {
    /// `set_state` named a key with no registered state. The current
    /// state is unchanged and no lifecycle hook ran.
    #[error("no state registered under {0:?}")]
    StateNotFound(K),
}
