//=========================================================================
// Input Event Types
//=========================================================================
//
// Portable representation of low-level input, independent of any
// windowing backend. The host maps whatever its platform reports into
// these types before feeding the hub.
//
// Two layers live here:
// - `InputEvent`: what the host pushes in (raw edges and motion)
// - `KeyEvent` / `PointerEvent` / `PointerPosition`: what the hub's
//   signals carry out to subscribers
//
//=========================================================================

//=== PointerButton =======================================================

/// Pointer button identifier.
///
/// Covers mouse buttons and, for touch input, the synthesized primary
/// contact. Named by role rather than physical position so left-handed
/// mappings and touch stay representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerButton {
    /// Main button: left mouse button, or the touch contact itself.
    Primary,

    /// Context button: right mouse button.
    Secondary,

    /// Wheel click or any other auxiliary button.
    Auxiliary,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the produced character, so
/// bindings survive layout changes. The set covers what a demo scaffold
/// binds (letters, digits, arrows, common chrome keys); extend as
/// needed without breaking existing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Digits -----------------------------------------------------------
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Letters ----------------------------------------------------------
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrows -----------------------------------------------------------
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Chrome -----------------------------------------------------------
    Space,
    Enter,
    Escape,
    Tab,

    /// Key the host could not map. The hub tracks it like any other.
    Unidentified,
}

//=== Modifiers ===========================================================

/// Modifier key state accompanying a key event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Modifiers {
    /// Shift held (either side).
    pub shift: bool,

    /// Ctrl held (either side; Command on macOS).
    pub ctrl: bool,

    /// Alt held (either side; Option on macOS).
    pub alt: bool,
}

impl Modifiers {
    /// No modifiers held.
    pub const NONE: Self = Self {
        shift: false,
        ctrl: false,
        alt: false,
    };

    /// Shift only.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
    };

    /// Ctrl only.
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
    };

    /// Alt only.
    pub const ALT: Self = Self {
        shift: false,
        ctrl: false,
        alt: true,
    };
}

//=== InputEvent ==========================================================

/// Raw input pushed into the hub by the host.
///
/// Pointer coordinates are in whatever space the host uses (pixels,
/// normalized device coordinates); the hub stores and forwards them
/// untouched.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Key pressed. Auto-repeat may deliver this while the key is
    /// already held; the hub collapses repeats to one edge.
    KeyDown { key: KeyCode, modifiers: Modifiers },

    /// Key released.
    KeyUp { key: KeyCode, modifiers: Modifiers },

    /// Pointer button pressed at the given position.
    PointerDown {
        button: PointerButton,
        x: f32,
        y: f32,
    },

    /// Pointer button released at the given position.
    PointerUp {
        button: PointerButton,
        x: f32,
        y: f32,
    },

    /// Pointer moved to a new position.
    PointerMoved { x: f32, y: f32 },
}

//=== Signal Payloads =====================================================

/// Payload of the hub's key signals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KeyEvent {
    pub key: KeyCode,
    pub modifiers: Modifiers,
}

/// Payload of the hub's pointer button signals.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerEvent {
    pub button: PointerButton,
    pub x: f32,
    pub y: f32,
}

/// Payload of the hub's pointer-move signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointerPosition {
    pub x: f32,
    pub y: f32,
}
