//=========================================================================
// Input Hub
//=========================================================================
//
// Ingests portable input events and fans them out over Signals while
// maintaining queryable held-state.
//
// Responsibilities:
// - Maintain discrete input state (held keys/buttons via sets)
// - Track the last known pointer position
// - Collapse key auto-repeat into single edges
// - Broadcast each edge/motion on its dedicated signal
//
// The hub lives wherever the host keeps its per-frame systems; gameplay
// and UI code subscribes to the signals or polls the query methods.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;
use std::fmt;

//=== Internal Dependencies ===============================================

use crate::core::signal::Signal;

use super::event::{InputEvent, KeyCode, KeyEvent, PointerButton, PointerEvent, PointerPosition};

//=== InputHub ============================================================

/// Signal-driven input front-end.
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use stagecue::prelude::*;
///
/// let mut hub = InputHub::new();
/// let clicks = Rc::new(Cell::new(0));
///
/// let probe = Rc::clone(&clicks);
/// hub.on_pointer_down()
///     .add(SlotId::named("click-counter"), 0, move |_| {
///         probe.set(probe.get() + 1);
///         Propagation::Continue
///     })
///     .unwrap();
///
/// hub.ingest(InputEvent::PointerDown { button: PointerButton::Primary, x: 4.0, y: 2.0 });
/// assert_eq!(clicks.get(), 1);
/// assert!(hub.is_button_down(PointerButton::Primary));
/// ```
pub struct InputHub {
    //--- Broadcast Channels ----------------------------------------------
    on_key_down: Signal<KeyEvent>,
    on_key_up: Signal<KeyEvent>,
    on_pointer_down: Signal<PointerEvent>,
    on_pointer_up: Signal<PointerEvent>,
    on_pointer_move: Signal<PointerPosition>,

    //--- Queryable State --------------------------------------------------
    keys_down: HashSet<KeyCode>,
    buttons_down: HashSet<PointerButton>,
    pointer: (f32, f32),
}

impl InputHub {
    //--- Construction -----------------------------------------------------

    /// Creates a hub with no subscribers and nothing held.
    ///
    /// The pointer-move signal memorizes, so a subsystem subscribing
    /// mid-session immediately learns the last cursor position.
    pub fn new() -> Self {
        let on_pointer_move = Signal::new();
        on_pointer_move.set_memorize(true);

        Self {
            on_key_down: Signal::new(),
            on_key_up: Signal::new(),
            on_pointer_down: Signal::new(),
            on_pointer_up: Signal::new(),
            on_pointer_move,
            keys_down: HashSet::new(),
            buttons_down: HashSet::new(),
            pointer: (0.0, 0.0),
        }
    }

    //--- Ingestion --------------------------------------------------------

    /// Digests one event: updates held state, then broadcasts.
    ///
    /// Key repeats (a `KeyDown` for a key already held) and stray
    /// releases (a `KeyUp`/`PointerUp` with nothing held) change no
    /// state and dispatch nothing.
    pub fn ingest(&mut self, event: InputEvent) {
        match event {
            InputEvent::KeyDown { key, modifiers } => {
                if self.keys_down.insert(key) {
                    self.on_key_down.dispatch(KeyEvent { key, modifiers });
                }
            }
            InputEvent::KeyUp { key, modifiers } => {
                if self.keys_down.remove(&key) {
                    self.on_key_up.dispatch(KeyEvent { key, modifiers });
                }
            }
            InputEvent::PointerDown { button, x, y } => {
                self.pointer = (x, y);
                if self.buttons_down.insert(button) {
                    self.on_pointer_down.dispatch(PointerEvent { button, x, y });
                }
            }
            InputEvent::PointerUp { button, x, y } => {
                self.pointer = (x, y);
                if self.buttons_down.remove(&button) {
                    self.on_pointer_up.dispatch(PointerEvent { button, x, y });
                }
            }
            InputEvent::PointerMoved { x, y } => {
                self.pointer = (x, y);
                self.on_pointer_move.dispatch(PointerPosition { x, y });
            }
        }
    }

    //--- Broadcast Channels ----------------------------------------------

    /// Fires once per key press edge (auto-repeat collapsed).
    pub fn on_key_down(&self) -> &Signal<KeyEvent> {
        &self.on_key_down
    }

    /// Fires once per key release edge.
    pub fn on_key_up(&self) -> &Signal<KeyEvent> {
        &self.on_key_up
    }

    /// Fires on pointer button press.
    pub fn on_pointer_down(&self) -> &Signal<PointerEvent> {
        &self.on_pointer_down
    }

    /// Fires on pointer button release.
    pub fn on_pointer_up(&self) -> &Signal<PointerEvent> {
        &self.on_pointer_up
    }

    /// Fires on pointer motion. Memorizes: a new subscriber is
    /// immediately replayed the most recent position.
    pub fn on_pointer_move(&self) -> &Signal<PointerPosition> {
        &self.on_pointer_move
    }

    //--- Queries ----------------------------------------------------------

    /// Whether `key` is currently held.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Whether `button` is currently held.
    pub fn is_button_down(&self, button: PointerButton) -> bool {
        self.buttons_down.contains(&button)
    }

    /// Last known pointer position.
    pub fn pointer_position(&self) -> (f32, f32) {
        self.pointer
    }
}

impl Default for InputHub {
    fn default() -> Self {
        Self::new()
    }
}

//=== Debug Trait ==========================================================

impl fmt::Debug for InputHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let keys: Vec<_> = self.keys_down.iter().collect();

        f.debug_struct("InputHub")
            .field("pointer", &self.pointer)
            .field("keys_down", &keys)
            .field("buttons_down", &self.buttons_down)
            .finish()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use crate::core::signal::{Propagation, SlotId};

    use super::super::event::Modifiers;
    use super::*;

    fn key_down(key: KeyCode) -> InputEvent {
        InputEvent::KeyDown {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    fn key_up(key: KeyCode) -> InputEvent {
        InputEvent::KeyUp {
            key,
            modifiers: Modifiers::NONE,
        }
    }

    #[test]
    fn test_press_and_release_key() {
        let mut hub = InputHub::new();
        let edges = Rc::new(RefCell::new(Vec::new()));

        let down_sink = Rc::clone(&edges);
        hub.on_key_down()
            .add(SlotId::named("down"), 0, move |event: &KeyEvent| {
                down_sink.borrow_mut().push(("down", event.key));
                Propagation::Continue
            })
            .unwrap();
        let up_sink = Rc::clone(&edges);
        hub.on_key_up()
            .add(SlotId::named("up"), 0, move |event: &KeyEvent| {
                up_sink.borrow_mut().push(("up", event.key));
                Propagation::Continue
            })
            .unwrap();

        hub.ingest(key_down(KeyCode::KeyA));
        assert!(hub.is_key_down(KeyCode::KeyA));

        hub.ingest(key_up(KeyCode::KeyA));
        assert!(!hub.is_key_down(KeyCode::KeyA));

        assert_eq!(
            *edges.borrow(),
            vec![("down", KeyCode::KeyA), ("up", KeyCode::KeyA)]
        );
    }

    #[test]
    fn test_auto_repeat_collapses_to_one_edge() {
        let mut hub = InputHub::new();
        let edges = Rc::new(RefCell::new(0u32));

        let sink = Rc::clone(&edges);
        hub.on_key_down()
            .add(SlotId::named("down"), 0, move |_| {
                *sink.borrow_mut() += 1;
                Propagation::Continue
            })
            .unwrap();

        hub.ingest(key_down(KeyCode::Space));
        hub.ingest(key_down(KeyCode::Space)); // auto-repeat
        hub.ingest(key_down(KeyCode::Space));

        assert_eq!(*edges.borrow(), 1);
        assert!(hub.is_key_down(KeyCode::Space));
    }

    #[test]
    fn test_stray_release_dispatches_nothing() {
        let mut hub = InputHub::new();
        let edges = Rc::new(RefCell::new(0u32));

        let sink = Rc::clone(&edges);
        hub.on_key_up()
            .add(SlotId::named("up"), 0, move |_| {
                *sink.borrow_mut() += 1;
                Propagation::Continue
            })
            .unwrap();

        hub.ingest(key_up(KeyCode::KeyQ)); // never pressed
        assert_eq!(*edges.borrow(), 0);
    }

    #[test]
    fn test_button_press_and_release() {
        let mut hub = InputHub::new();

        hub.ingest(InputEvent::PointerDown {
            button: PointerButton::Primary,
            x: 10.0,
            y: 20.0,
        });
        assert!(hub.is_button_down(PointerButton::Primary));
        assert_eq!(hub.pointer_position(), (10.0, 20.0));

        hub.ingest(InputEvent::PointerUp {
            button: PointerButton::Primary,
            x: 11.0,
            y: 21.0,
        });
        assert!(!hub.is_button_down(PointerButton::Primary));
        assert_eq!(hub.pointer_position(), (11.0, 21.0));
    }

    #[test]
    fn test_pointer_move_replays_to_late_subscriber() {
        let mut hub = InputHub::new();

        hub.ingest(InputEvent::PointerMoved { x: 100.0, y: 200.0 });

        // Subscribing after the motion still learns the position.
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        hub.on_pointer_move()
            .add(SlotId::named("late"), 0, move |pos: &PointerPosition| {
                sink.borrow_mut().push((pos.x, pos.y));
                Propagation::Continue
            })
            .unwrap();

        assert_eq!(*seen.borrow(), vec![(100.0, 200.0)]);

        hub.ingest(InputEvent::PointerMoved { x: 150.0, y: 250.0 });
        assert_eq!(*seen.borrow(), vec![(100.0, 200.0), (150.0, 250.0)]);
        assert_eq!(hub.pointer_position(), (150.0, 250.0));
    }

    #[test]
    fn test_key_signals_do_not_replay() {
        let mut hub = InputHub::new();
        hub.ingest(key_down(KeyCode::KeyW));

        let edges = Rc::new(RefCell::new(0u32));
        let sink = Rc::clone(&edges);
        hub.on_key_down()
            .add(SlotId::named("late"), 0, move |_| {
                *sink.borrow_mut() += 1;
                Propagation::Continue
            })
            .unwrap();

        // No fabricated edge for the late subscriber; polling covers it.
        assert_eq!(*edges.borrow(), 0);
        assert!(hub.is_key_down(KeyCode::KeyW));
    }
}
