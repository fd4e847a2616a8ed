//=========================================================================
// Signal System
//=========================================================================
//
// Multicast synchronous publish/subscribe with priority ordering.
//
// Architecture:
//   Signal<A>
//     ├─ bindings: Vec<Rc<Binding<A>>>   (descending priority)
//     └─ memorized: Option<A>            (last dispatch, replayed)
//
// Flow:
//   add()/add_once() → dispatch(args) → Binding::execute() per listener
//
// Listeners are plain closures registered under an explicit `SlotId`.
// Dispatch iterates a snapshot of the binding list, so listeners may
// add or remove bindings on the same signal mid-dispatch without
// corrupting the broadcast in progress.
//
//=========================================================================

//=== External Dependencies ===============================================

use thiserror::Error;

//=== Module Declarations =================================================

mod binding;
#[allow(clippy::module_inception)]
mod signal;

//=== Public API ==========================================================

pub use binding::Binding;
pub use signal::Signal;

//=== Slot Identity =======================================================

/// Identity of a listener's owning object.
///
/// Groups of listeners registered by the same subsystem share an owner,
/// which lets the subsystem detach all of them in one call via
/// [`Signal::remove_all_for`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct OwnerId(pub u64);

/// Identity a listener is registered under.
///
/// Dispatch never consults this; it exists so callers can detach or
/// query a specific listener later, and so a duplicate registration is
/// caught instead of silently doubling a callback. Closures cannot be
/// compared, so the identity is explicit: a static name, optionally
/// scoped to an [`OwnerId`].
///
/// ```
/// use stagecue::prelude::*;
///
/// const PANEL: OwnerId = OwnerId(7);
///
/// let anonymous = SlotId::named("resize-logger");
/// let scoped = SlotId::owned("resize-logger", PANEL);
/// assert_ne!(anonymous, scoped);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId {
    name: &'static str,
    owner: Option<OwnerId>,
}

impl SlotId {
    /// Identity with no owning object.
    pub const fn named(name: &'static str) -> Self {
        Self { name, owner: None }
    }

    /// Identity scoped to an owning object.
    pub const fn owned(name: &'static str, owner: OwnerId) -> Self {
        Self {
            name,
            owner: Some(owner),
        }
    }

    /// The listener name this identity was built from.
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// The owning object, if the identity is scoped to one.
    pub const fn owner(&self) -> Option<OwnerId> {
        self.owner
    }
}

//=== Propagation =========================================================

/// Control value returned by every listener.
///
/// Returning [`Propagation::Halt`] stops the in-flight dispatch before
/// any lower-priority listener runs; the next dispatch is unaffected.
/// [`Signal::halt`] has the same effect from outside the return path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Propagation {
    /// Keep broadcasting to the remaining listeners.
    Continue,

    /// Stop this broadcast; lower-priority listeners do not run.
    Halt,
}

//=== Errors ==============================================================

/// Registration and lifecycle errors raised by [`Signal`].
///
/// These are programmer errors, raised synchronously at the call site.
/// Benign conditions (removing an absent listener, dispatching while
/// inactive) are defined as successful no-ops and never reach here.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SignalError {
    /// The slot already holds a listener registered in the opposite
    /// once/persistent mode. Remove the existing binding first.
    #[error("slot {0:?} already holds a listener with the opposite once/persistent mode")]
    ConflictingMode(SlotId),

    /// The signal has been disposed and accepts no new listeners.
    #[error("signal has been disposed")]
    Disposed,
}

//=========================================================================
// Tests
//=========================================================================
