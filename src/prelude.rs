//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use stagecue::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Director facade
pub use crate::director::{Director, DirectorBuilder};

// Signal bus
pub use crate::core::signal::{
    Binding, OwnerId, Propagation, Signal, SignalError, SlotId,
};

// State machine
pub use crate::core::fsm::{
    Fsm, FsmContext, FsmError, State, StateKey, TransitionRequest,
};

// Input hub
pub use crate::core::input::{
    InputEvent, InputHub, KeyCode, KeyEvent, Modifiers, PointerButton,
    PointerEvent, PointerPosition,
};
