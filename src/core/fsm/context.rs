//=========================================================================
// Fsm Context
//=========================================================================
//
// Shared data handed to states during their lifecycle hooks.
//
// Rather than giving each state a back-reference to its owning machine,
// the machine builds a fresh context per call: states stay plain owned
// values, and the request signal travels as a cheap Rc handle.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::rc::Rc;

//=== Internal Dependencies ===============================================

use crate::core::signal::Signal;

use super::StateKey;

//=== Transition Request ==================================================

/// A state's announcement that it wants to hand control to another.
///
/// Dispatched on the machine's request signal by
/// [`FsmContext::request_transition`]. The machine itself never acts on
/// one of these; the subscribed driver decides whether to honor it.
#[derive(Debug, Clone, PartialEq)]
pub struct TransitionRequest<K: StateKey, P: Clone + 'static = ()> {
    /// The state that raised the request, if one was current.
    pub from: Option<K>,

    /// The state being requested.
    pub to: K,

    /// Optional payload for the target state's `on_enter`. Opaque to
    /// the machine and the driver alike.
    pub payload: Option<P>,
}

//=== FsmContext ==========================================================

/// Read-only view of the machine handed to every lifecycle hook.
///
/// Exposes the current key and the transition-request channel. States
/// never touch the machine directly — requesting a transition is a
/// broadcast, not a call, which is what keeps re-entrant
/// enter-during-enter impossible by construction.
pub struct FsmContext<K: StateKey, P: Clone + 'static = ()> {
    current: Option<K>,
    requests: Rc<Signal<TransitionRequest<K, P>>>,
}

impl<K: StateKey, P: Clone + 'static> FsmContext<K, P> {
    pub(super) fn new(current: Option<K>, requests: Rc<Signal<TransitionRequest<K, P>>>) -> Self {
        Self { current, requests }
    }

    /// Key of the state this context was built for, if any.
    pub fn current(&self) -> Option<K> {
        self.current
    }

    /// Announces that the current state wants `to` to take over.
    ///
    /// Dispatches a [`TransitionRequest`] carrying the current key,
    /// the target, and an opaque payload. Fire-and-forget: whether the
    /// transition happens is up to whoever listens.
    pub fn request_transition(&self, to: K, payload: Option<P>) {
        self.requests.dispatch(TransitionRequest {
            from: self.current,
            to,
            payload,
        });
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
    }

    impl StateKey for TestKey {}

    #[test]
    fn request_transition_broadcasts_from_and_payload() {
        let requests: Rc<Signal<TransitionRequest<TestKey, u32>>> = Rc::new(Signal::new());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        requests
            .add(SlotId::named("driver"), 0, move |req| {
                sink.borrow_mut().push(req.clone());
                Propagation::Continue
            })
            .unwrap();

        let ctx = FsmContext::new(Some(TestKey::A), Rc::clone(&requests));
        ctx.request_transition(TestKey::B, Some(42));

        assert_eq!(
            *seen.borrow(),
            vec![TransitionRequest {
                from: Some(TestKey::A),
                to: TestKey::B,
                payload: Some(42),
            }]
        );
    }

    #[test]
    fn request_from_initial_condition_has_no_source() {
        let requests: Rc<Signal<TransitionRequest<TestKey>>> = Rc::new(Signal::new());
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        requests
            .add(SlotId::named("driver"), 0, move |req: &TransitionRequest<TestKey>| {
                sink.borrow_mut().push((req.from, req.to));
                Propagation::Continue
            })
            .unwrap();

        let ctx = FsmContext::new(None, Rc::clone(&requests));
        ctx.request_transition(TestKey::A, None);

        assert_eq!(*seen.borrow(), vec![(None, TestKey::A)]);
    }
}
