//=========================================================================
// Director
//
// Driver facade that owns a state machine and honors its transition
// requests at frame boundaries.
//
// Architecture:
// ```text
//     DirectorBuilder ──build()──> Director ──advance(dt)──> [per frame]
//         │                          │
//         └─ with_state()            ├─ ticks the current state
//                                    └─ applies one pending request
// ```
//
// States announce transitions over the machine's request signal; the
// director records the latest request and applies it after the tick,
// never inside one. One hop per frame keeps request chains finite and
// the enter/exit order observable from outside.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::RefCell;
use std::rc::Rc;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use crate::core::fsm::{Fsm, FsmError, State, StateKey, TransitionRequest};
use crate::core::signal::{Propagation, Signal, SlotId};

//=== DirectorBuilder =====================================================

/// Builder for configuring and constructing a [`Director`].
///
/// Registers states fluently before the director takes ownership of the
/// machine. Nothing is entered at build time; call [`Director::start`]
/// to activate the first state.
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
///     fn on_enter(&mut self, ctx: &FsmContext<Stage>, _payload: Option<&()>) {
///         ctx.request_transition(Stage::Main, None);
///     }
///     fn update(&mut self, _ctx: &FsmContext<Stage>, _dt: f32) {}
/// }
///
/// struct MainStage;
/// impl State<Stage> for MainStage {
///     fn update(&mut self, _ctx: &FsmContext<Stage>, _dt: f32) {}
/// }
///
/// let mut director = DirectorBuilder::new()
///     .with_state(Stage::Boot, BootStage)
///     .with_state(Stage::Main, MainStage)
///     .build();
///
/// director.start(Stage::Boot, None).unwrap();
/// director.advance(1.0 / 60.0); // applies Boot's handoff request
/// assert!(director.is_current(Stage::Main));
/// ```
pub struct DirectorBuilder<K: StateKey, P: Clone + 'static = ()> {
    fsm: Fsm<K, P>,
}

impl<K: StateKey, P: Clone + 'static> DirectorBuilder<K, P> {
    /// Creates a builder with an empty machine.
    pub fn new() -> Self {
        Self { fsm: Fsm::new() }
    }

    /// Registers a state under `key`.
    ///
    /// Last write wins on duplicate keys, as in
    /// [`Fsm::add_state`].
    pub fn with_state<T>(mut self, key: K, state: T) -> Self
    where
        T: State<K, P> + 'static,
    {
        self.fsm.add_state(key, state);
        self
    }

    /// Builds the director and subscribes it to the machine's
    /// transition-request signal.
    pub fn build(self) -> Director<K, P> {
        let pending: Rc<RefCell<Option<TransitionRequest<K, P>>>> = Rc::new(RefCell::new(None));

        let sink = Rc::clone(&pending);
        self.fsm
            .on_transition_request()
            .add(Director::<K, P>::REQUEST_SLOT, 0, move |req: &TransitionRequest<K, P>| {
                let displaced = sink.borrow_mut().replace(req.clone());
                if let Some(old) = displaced {
                    debug!(
                        "Transition request to {:?} displaced by {:?} within one frame",
                        old.to, req.to
                    );
                }
                Propagation::Continue
            })
            .expect("fresh request signal rejected the director listener");

        Director {
            fsm: self.fsm,
            pending,
        }
    }
}

impl<K: StateKey, P: Clone + 'static> Default for DirectorBuilder<K, P> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Director ============================================================

/// Owns an [`Fsm`] and sequences it from an externally supplied tick.
///
/// The host calls [`Director::advance`] once per frame (from its redraw
/// callback, main loop, test harness, ...). Each call ticks the current
/// state, then applies at most one transition request recorded since
/// the previous frame: a request raised during this very tick is
/// honored in the same call, a request raised by the resulting
/// `on_enter` waits for the next frame. When several requests land in
/// one frame the latest wins.
pub struct Director<K: StateKey, P: Clone + 'static = ()> {
    fsm: Fsm<K, P>,
    pending: Rc<RefCell<Option<TransitionRequest<K, P>>>>,
}

impl<K: StateKey, P: Clone + 'static> Director<K, P> {
    const REQUEST_SLOT: SlotId = SlotId::named("director");

    //--- Sequencing -------------------------------------------------------

    /// Enters the initial state.
    ///
    /// # Errors
    ///
    /// [`FsmError::StateNotFound`] when `key` was never registered.
    pub fn start(&mut self, key: K, payload: Option<P>) -> Result<(), FsmError<K>> {
        self.fsm.set_state(key, payload)
    }

    /// Runs one frame: tick the current state, then apply the pending
    /// transition request, if any.
    ///
    /// A request naming an unregistered state is dropped with a
    /// warning; the current state stays put.
    pub fn advance(&mut self, dt: f32) {
        self.fsm.update(dt);

        let request = self.pending.borrow_mut().take();
        if let Some(req) = request {
            match self.fsm.set_state(req.to, req.payload) {
                Ok(()) => {}
                Err(FsmError::StateNotFound(key)) => {
                    warn!("Dropping transition request to unregistered state {:?}", key);
                }
            }
        }
    }

    /// Forces a transition immediately, bypassing the frame boundary.
    ///
    /// For drivers that decide on their own terms instead of honoring
    /// state-raised requests. A pending request is discarded — the
    /// manual transition overrules it — while a request raised by the
    /// incoming state's `on_enter` is kept for the next frame.
    ///
    /// # Errors
    ///
    /// [`FsmError::StateNotFound`] when `key` was never registered; the
    /// pending request survives in that case.
    pub fn set_state(&mut self, key: K, payload: Option<P>) -> Result<(), FsmError<K>> {
        let displaced = self.pending.borrow_mut().take();
        let result = self.fsm.set_state(key, payload);
        if result.is_err() {
            // No hook ran, so nothing new was requested; put it back.
            *self.pending.borrow_mut() = displaced;
        }
        result
    }

    //--- Introspection ----------------------------------------------------

    /// Key of the current state, if any.
    pub fn current_state(&self) -> Option<K> {
        self.fsm.current_state()
    }

    /// Whether `key` is the current state.
    pub fn is_current(&self, key: K) -> bool {
        self.fsm.is_current(key)
    }

    /// The machine's transition-request channel, for observers that
    /// want to watch handoffs (progress HUDs, loggers, tests).
    ///
    /// The director keeps its own listener on this signal; observers
    /// should register under their own [`SlotId`]s.
    pub fn on_transition_request(&self) -> Rc<Signal<TransitionRequest<K, P>>> {
        self.fsm.on_transition_request()
    }

    //--- Disposal ---------------------------------------------------------

    /// Tears the machine down (defensively exiting the current state)
    /// and drops any pending request.
    pub fn dispose(&mut self) {
        self.fsm.dispose();
        self.pending.borrow_mut().take();
    }
}

//=========================================================================
// Tests
//=========================================================================
