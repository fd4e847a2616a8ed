//=========================================================================
// State Machine
//=========================================================================
//
// Manages state registration, the single current state, and lifecycle.
//
// States are stored in a HashMap by key; at most one is current at any
// time. This lets states keep their data between activations.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::signal::Signal;

use super::context::{FsmContext, TransitionRequest};
use super::{FsmError, State, StateKey};

//=== Fsm =================================================================

/// Finite-state machine with exactly one current state.
///
/// States are registered once and referenced by key. `set_state` runs
/// the lifecycle handshake — old `on_exit` strictly before new
/// `on_enter` — and `update` forwards the tick to the current state
/// only. A state that wants to hand off control dispatches a
/// [`TransitionRequest`] through its context; the machine broadcasts it
/// on [`Fsm::on_transition_request`] and otherwise stays out of the
/// decision.
///
/// # Example
///
/// ```
/// use stagecue::prelude::*;
///
/// #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
/// enum Stage { Boot, Main }
/// impl StateKey for Stage {}
///
/// struct BootStage;
/// impl State<Stage> for BootStage {
///     fn update(&mut self, ctx: &FsmContext<Stage>, _dt: f32) {
///         ctx.request_transition(Stage::Main, None);
///     }
/// }
///
/// struct MainStage;
/// impl State<Stage> for MainStage {
///     fn update(&mut self, _ctx: &FsmContext<Stage>, _dt: f32) {}
/// }
///
/// let mut fsm: Fsm<Stage> = Fsm::new();
/// fsm.add_state(Stage::Boot, BootStage);
/// fsm.add_state(Stage::Main, MainStage);
/// fsm.set_state(Stage::Boot, None).unwrap();
/// assert!(fsm.is_current(Stage::Boot));
/// ```
pub struct Fsm<K: StateKey, P: Clone + 'static = ()> {
    states: HashMap<K, Box<dyn State<K, P>>>,
    current: Option<K>,
    requests: Rc<Signal<TransitionRequest<K, P>>>,
    disposed: bool,
}

impl<K: StateKey, P: Clone + 'static> Fsm<K, P> {
    //--- Construction -----------------------------------------------------

    /// Creates a machine with no states and no current state.
    pub fn new() -> Self {
        Self {
            states: HashMap::new(),
            current: None,
            requests: Rc::new(Signal::new()),
            disposed: false,
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a state under `key`.
    ///
    /// Registering a key twice replaces the previous state (last write
    /// wins, with a warning). A currently-active state with the same
    /// key is not re-entered; the replacement takes effect on the next
    /// activation.
    pub fn add_state<T>(&mut self, key: K, state: T)
    where
        T: State<K, P> + 'static,
    {
        if self.disposed {
            warn!("Ignoring state {:?} registered on a disposed machine", key);
            return;
        }
        if self.states.insert(key, Box::new(state)).is_some() {
            warn!("State {:?} was already registered and has been replaced", key);
        }
    }

    //--- Transitions ------------------------------------------------------

    /// Makes `key` the current state.
    ///
    /// Runs `on_exit` on the outgoing state (if any), then `on_enter`
    /// on the incoming one with `payload`. Setting the key that is
    /// already current is a successful no-op: no hook runs.
    ///
    /// # Errors
    ///
    /// [`FsmError::StateNotFound`] when no state is registered under
    /// `key`; the current state is unchanged and no hook has run.
    pub fn set_state(&mut self, key: K, payload: Option<P>) -> Result<(), FsmError<K>> {
        if self.is_current(key) {
            debug!("State {:?} is already current, re-entry suppressed", key);
            return Ok(());
        }
        if !self.states.contains_key(&key) {
            return Err(FsmError::StateNotFound(key));
        }

        if let Some(previous) = self.current {
            let ctx = self.context();
            if let Some(state) = self.states.get_mut(&previous) {
                state.on_exit(&ctx);
            }
            debug!("Exited state {:?}", previous);
        }

        self.current = Some(key);
        let ctx = self.context();
        if let Some(state) = self.states.get_mut(&key) {
            state.on_enter(&ctx, payload.as_ref());
        }
        debug!("Entered state {:?}", key);

        Ok(())
    }

    //--- Update Loop ------------------------------------------------------

    /// Forwards the tick to the current state.
    ///
    /// No-op while no state is current. `dt` is elapsed seconds,
    /// forwarded as-is — the machine neither clamps nor validates it.
    pub fn update(&mut self, dt: f32) {
        let Some(key) = self.current else {
            return;
        };
        let ctx = self.context();
        if let Some(state) = self.states.get_mut(&key) {
            state.update(&ctx, dt);
        }
    }

    //--- Introspection ----------------------------------------------------

    /// Key of the current state, if any.
    pub fn current_state(&self) -> Option<K> {
        self.current
    }

    /// Whether `key` is the current state.
    pub fn is_current(&self, key: K) -> bool {
        self.current == Some(key)
    }

    /// Whether a state is registered under `key`.
    pub fn has_state(&self, key: K) -> bool {
        self.states.contains_key(&key)
    }

    /// The transition-request channel.
    ///
    /// A driver must subscribe here to learn when a state wants to hand
    /// off control; the machine never honors a request by itself.
    pub fn on_transition_request(&self) -> Rc<Signal<TransitionRequest<K, P>>> {
        Rc::clone(&self.requests)
    }

    //--- Disposal ---------------------------------------------------------

    /// Tears the machine down.
    ///
    /// Defensively runs `on_exit` on the current state, then drops the
    /// registry and disposes the request signal. A disposed machine is
    /// inert: `add_state` warns and ignores, `set_state` reports
    /// [`FsmError::StateNotFound`], `update` is a no-op.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }

        if let Some(key) = self.current.take() {
            let ctx = FsmContext::new(Some(key), Rc::clone(&self.requests));
            if let Some(state) = self.states.get_mut(&key) {
                state.on_exit(&ctx);
            }
            debug!("Exited state {:?} on disposal", key);
        }

        self.states.clear();
        self.requests.dispose();
        self.disposed = true;
    }

    //--- Internal Helpers -------------------------------------------------

    fn context(&self) -> FsmContext<K, P> {
        FsmContext::new(self.current, Rc::clone(&self.requests))
    }
}

impl<K: StateKey, P: Clone + 'static> Default for Fsm<K, P> {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use crate::core::signal::{Propagation, SlotId};

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestKey {
        A,
        B,
        Boot,
        Preload,
        Main,
    }

    impl StateKey for TestKey {}

    // Lifecycle recorder: every hook pushes "<tag>:<hook>" so tests can
    // assert on exact ordering across states.
    type Trace = Rc<RefCell<Vec<String>>>;

    struct Recorder {
        tag: &'static str,
        trace: Trace,
    }

    impl Recorder {
        fn log(&self, hook: &str) {
            self.trace.borrow_mut().push(format!("{}:{}", self.tag, hook));
        }
    }

    impl State<TestKey, u32> for Recorder {
        fn on_enter(&mut self, _ctx: &FsmContext<TestKey, u32>, payload: Option<&u32>) {
            match payload {
                Some(value) => self.log(&format!("enter({})", value)),
                None => self.log("enter"),
            }
        }

        fn on_exit(&mut self, _ctx: &FsmContext<TestKey, u32>) {
            self.log("exit");
        }

        fn update(&mut self, _ctx: &FsmContext<TestKey, u32>, dt: f32) {
            self.log(&format!("update({})", dt));
        }
    }

    fn machine_with(tags: &[(&'static str, TestKey)], trace: &Trace) -> Fsm<TestKey, u32> {
        let mut fsm = Fsm::new();
        for &(tag, key) in tags {
            fsm.add_state(
                key,
                Recorder {
                    tag,
                    trace: Rc::clone(trace),
                },
            );
        }
        fsm
    }

    fn take(trace: &Trace) -> Vec<String> {
        std::mem::take(&mut *trace.borrow_mut())
    }

    //--- Lifecycle --------------------------------------------------------

    #[test]
    fn first_activation_enters_without_exit() {
        let trace = Trace::default();
        let mut fsm = machine_with(&[("a", TestKey::A)], &trace);

        assert_eq!(fsm.current_state(), None);
        fsm.set_state(TestKey::A, None).unwrap();

        assert_eq!(take(&trace), vec!["a:enter"]);
        assert!(fsm.is_current(TestKey::A));
    }

    #[test]
    fn re_entering_current_state_is_suppressed() {
        let trace = Trace::default();
        let mut fsm = machine_with(&[("a", TestKey::A), ("b", TestKey::B)], &trace);

        fsm.set_state(TestKey::A, None).unwrap();
        fsm.set_state(TestKey::A, None).unwrap();

        // enter ran exactly once, no exit at all
        assert_eq!(take(&trace), vec!["a:enter"]);
    }

    #[test]
    fn transition_exits_old_before_entering_new() {
        let trace = Trace::default();
        let mut fsm = machine_with(&[("a", TestKey::A), ("b", TestKey::B)], &trace);

        fsm.set_state(TestKey::A, None).unwrap();
        fsm.set_state(TestKey::B, None).unwrap();

        assert_eq!(take(&trace), vec!["a:enter", "a:exit", "b:enter"]);
        assert!(fsm.is_current(TestKey::B));
    }

    #[test]
    fn unknown_state_fails_without_side_effects() {
        let trace = Trace::default();
        let mut fsm = machine_with(&[("a", TestKey::A)], &trace);
        fsm.set_state(TestKey::A, None).unwrap();
        take(&trace);

        let err = fsm.set_state(TestKey::B, None);

        assert_eq!(err, Err(FsmError::StateNotFound(TestKey::B)));
        assert!(fsm.is_current(TestKey::A));
        assert!(take(&trace).is_empty()); // no exit, no enter
    }

    #[test]
    fn payload_reaches_on_enter() {
        let trace = Trace::default();
        let mut fsm = machine_with(&[("a", TestKey::A)], &trace);

        fsm.set_state(TestKey::A, Some(7)).unwrap();
        assert_eq!(take(&trace), vec!["a:enter(7)"]);
    }

    //--- Update Loop ------------------------------------------------------

    #[test]
    fn update_reaches_current_state_only() {
        let trace = Trace::default();
        let mut fsm = machine_with(&[("a", TestKey::A), ("b", TestKey::B)], &trace);

        fsm.update(0.5); // no current state yet
        assert!(take(&trace).is_empty());

        fsm.set_state(TestKey::A, None).unwrap();
        take(&trace);
        fsm.update(0.25);

        assert_eq!(take(&trace), vec!["a:update(0.25)"]);
    }

    //--- Registration -----------------------------------------------------

    #[test]
    fn duplicate_registration_overwrites_without_reactivation() {
        let trace = Trace::default();
        let mut fsm = machine_with(&[("old", TestKey::A)], &trace);
        fsm.set_state(TestKey::A, None).unwrap();
        take(&trace);

        fsm.add_state(
            TestKey::A,
            Recorder {
                tag: "new",
                trace: Rc::clone(&trace),
            },
        );

        // No implicit enter on the replacement...
        assert!(take(&trace).is_empty());
        assert!(fsm.is_current(TestKey::A));

        // ...but the replacement is what runs from now on.
        fsm.update(1.0);
        assert_eq!(take(&trace), vec!["new:update(1)"]);
    }

    //--- Transition Requests ----------------------------------------------

    #[test]
    fn boot_sequence_settles_through_request_signal() {
        // End-to-end: Boot's enter announces Preload; the driver's
        // listener records the request and honors it after the dispatch
        // unwinds; then Preload chains to Main the same way.
        struct Announcer {
            tag: &'static str,
            next: Option<TestKey>,
            trace: Trace,
        }

        impl State<TestKey, u32> for Announcer {
            fn on_enter(&mut self, ctx: &FsmContext<TestKey, u32>, _payload: Option<&u32>) {
                self.trace.borrow_mut().push(format!("{}:enter", self.tag));
                if let Some(next) = self.next {
                    ctx.request_transition(next, None);
                }
            }

            fn on_exit(&mut self, _ctx: &FsmContext<TestKey, u32>) {
                self.trace.borrow_mut().push(format!("{}:exit", self.tag));
            }

            fn update(&mut self, _ctx: &FsmContext<TestKey, u32>, _dt: f32) {}
        }

        let trace = Trace::default();
        let mut fsm: Fsm<TestKey, u32> = Fsm::new();
        for (tag, key, next) in [
            ("boot", TestKey::Boot, Some(TestKey::Preload)),
            ("preload", TestKey::Preload, Some(TestKey::Main)),
            ("main", TestKey::Main, None),
        ] {
            fsm.add_state(
                key,
                Announcer {
                    tag,
                    next,
                    trace: Rc::clone(&trace),
                },
            );
        }

        let pending: Rc<RefCell<Option<TransitionRequest<TestKey, u32>>>> =
            Rc::new(RefCell::new(None));
        let sink = Rc::clone(&pending);
        fsm.on_transition_request()
            .add(SlotId::named("driver"), 0, move |req| {
                *sink.borrow_mut() = Some(req.clone());
                Propagation::Continue
            })
            .unwrap();

        fsm.set_state(TestKey::Boot, None).unwrap();
        loop {
            // Take as a standalone statement so the cell is released
            // before set_state re-enters the listener.
            let request = pending.borrow_mut().take();
            let Some(req) = request else { break };
            assert_eq!(req.from, fsm.current_state());
            fsm.set_state(req.to, req.payload).unwrap();
        }

        assert_eq!(
            take(&trace),
            vec![
                "boot:enter",
                "boot:exit",
                "preload:enter",
                "preload:exit",
                "main:enter",
            ]
        );
        assert!(fsm.is_current(TestKey::Main));
    }

    //--- Disposal ---------------------------------------------------------

    #[test]
    fn dispose_defensively_exits_current_state() {
        let trace = Trace::default();
        let mut fsm = machine_with(&[("a", TestKey::A)], &trace);
        fsm.set_state(TestKey::A, None).unwrap();
        take(&trace);

        fsm.dispose();

        assert_eq!(take(&trace), vec!["a:exit"]);
        assert_eq!(fsm.current_state(), None);
    }

    #[test]
    fn disposed_machine_is_inert() {
        let trace = Trace::default();
        let mut fsm = machine_with(&[("a", TestKey::A)], &trace);
        fsm.dispose();

        fsm.add_state(
            TestKey::B,
            Recorder {
                tag: "late",
                trace: Rc::clone(&trace),
            },
        );
        assert!(!fsm.has_state(TestKey::B));
        assert_eq!(fsm.set_state(TestKey::A, None), Err(FsmError::StateNotFound(TestKey::A)));

        fsm.update(1.0);
        assert!(take(&trace).is_empty());
    }

    #[test]
    fn dispose_twice_exits_only_once() {
        let trace = Trace::default();
        let mut fsm = machine_with(&[("a", TestKey::A)], &trace);
        fsm.set_state(TestKey::A, None).unwrap();
        take(&trace);

        fsm.dispose();
        fsm.dispose();

        assert_eq!(take(&trace), vec!["a:exit"]);
    }
}
