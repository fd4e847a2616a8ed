//=========================================================================
// Input System
//=========================================================================
//
// Signal-driven input fan-out.
//
// Architecture:
//   host → InputHub::ingest(InputEvent)
//             ├─ held-key/button sets, pointer position (queries)
//             └─ Signal dispatch (on_key_down, on_pointer_move, ...)
//
// The hub owns no window and runs no event loop: the host pushes
// portable events in, subsystems subscribe to the signals they care
// about. Each signal is an independent instance with its own
// configuration — the pointer-move signal memorizes so late
// subscribers immediately learn the last cursor position.
//
//=========================================================================

//=== Module Declarations =================================================

mod event;
mod hub;

//=== Public API ==========================================================

pub use event::{
    InputEvent, KeyCode, KeyEvent, Modifiers, PointerButton, PointerEvent, PointerPosition,
};
pub use hub::InputHub;
