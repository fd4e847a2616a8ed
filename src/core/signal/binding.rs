//=========================================================================
// Signal Binding
//=========================================================================
//
// The registered association between one Signal and one listener.
//
// A binding records the listener closure, the slot it was registered
// under, its priority and once/persistent mode, and runtime state
// (active flag, call counter, bound flag). `Signal::add` hands the
// binding back to the caller for introspection; detachment stays keyed
// on the SlotId.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::{Cell, RefCell};
use std::fmt;

//=== Internal Dependencies ===============================================

use super::{Propagation, SlotId};

//=== Listener ============================================================

/// Boxed listener closure invoked on each dispatch.
///
/// Per-listener extras (labels, strengths, handles) are closure
/// captures; only the dispatch arguments travel through the call.
pub(super) type Listener<A> = Box<dyn FnMut(&A) -> Propagation>;

//=== Binding =============================================================

/// One listener registered on a [`Signal`](super::Signal).
///
/// Returned from `add`/`add_once` as an introspection handle. Holding
/// the handle does not keep the binding attached: once detached (by
/// `remove`, `remove_all`, one-shot execution, or `dispose`) the
/// binding never executes again, even if the handle lives on.
pub struct Binding<A> {
    slot: SlotId,
    priority: i32,
    once: bool,
    active: Cell<bool>,
    bound: Cell<bool>,
    call_count: Cell<u64>,
    listener: RefCell<Listener<A>>,
}

impl<A> Binding<A> {
    //--- Construction -----------------------------------------------------

    pub(super) fn new(slot: SlotId, once: bool, priority: i32, listener: Listener<A>) -> Self {
        Self {
            slot,
            priority,
            once,
            active: Cell::new(true),
            bound: Cell::new(true),
            call_count: Cell::new(0),
            listener: RefCell::new(listener),
        }
    }

    //--- Execution --------------------------------------------------------
    //
    // Runs the listener unless the binding is inactive or detached.
    // Returns None when skipped, so the signal can tell a real execution
    // (which consumes a one-shot binding) from a pass-over.
    //
    pub(super) fn execute(&self, args: &A) -> Option<Propagation> {
        if !self.active.get() || !self.bound.get() {
            return None;
        }

        let control = (self.listener.borrow_mut())(args);
        self.call_count.set(self.call_count.get() + 1);
        Some(control)
    }

    pub(super) fn unbind(&self) {
        self.bound.set(false);
    }

    //--- Introspection ----------------------------------------------------

    /// The identity this binding is registered under.
    pub fn slot(&self) -> SlotId {
        self.slot
    }

    /// Dispatch priority; higher runs earlier.
    pub fn priority(&self) -> i32 {
        self.priority
    }

    /// True for `add_once` registrations.
    pub fn is_once(&self) -> bool {
        self.once
    }

    /// True while the binding is still attached to its signal.
    pub fn is_bound(&self) -> bool {
        self.bound.get()
    }

    /// How many times the listener has executed, memorized replay
    /// included.
    pub fn call_count(&self) -> u64 {
        self.call_count.get()
    }

    /// Whether dispatch currently executes this binding.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Pauses or resumes the binding without detaching it.
    ///
    /// An inactive binding is skipped by dispatch but keeps its slot,
    /// priority position, and call count.
    pub fn set_active(&self, active: bool) {
        self.active.set(active);
    }
}

//=== Debug Trait ==========================================================

impl<A> fmt::Debug for Binding<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("slot", &self.slot)
            .field("priority", &self.priority)
            .field("once", &self.once)
            .field("active", &self.active.get())
            .field("bound", &self.bound.get())
            .field("call_count", &self.call_count.get())
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn probe_binding(hits: std::rc::Rc<Cell<u32>>) -> Binding<i32> {
        Binding::new(
            SlotId::named("probe"),
            false,
            0,
            Box::new(move |value| {
                hits.set(hits.get() + *value as u32);
                Propagation::Continue
            }),
        )
    }

    #[test]
    fn execute_runs_listener_and_counts() {
        let hits = std::rc::Rc::new(Cell::new(0));
        let binding = probe_binding(std::rc::Rc::clone(&hits));

        assert_eq!(binding.execute(&2), Some(Propagation::Continue));
        assert_eq!(binding.execute(&3), Some(Propagation::Continue));
        assert_eq!(hits.get(), 5);
        assert_eq!(binding.call_count(), 2);
    }

    #[test]
    fn inactive_binding_is_skipped() {
        let hits = std::rc::Rc::new(Cell::new(0));
        let binding = probe_binding(std::rc::Rc::clone(&hits));

        binding.set_active(false);
        assert_eq!(binding.execute(&1), None);
        assert_eq!(hits.get(), 0);
        assert_eq!(binding.call_count(), 0);

        binding.set_active(true);
        assert_eq!(binding.execute(&1), Some(Propagation::Continue));
        assert_eq!(hits.get(), 1);
    }

    #[test]
    fn unbound_binding_never_executes() {
        let hits = std::rc::Rc::new(Cell::new(0));
        let binding = probe_binding(std::rc::Rc::clone(&hits));

        binding.unbind();
        assert!(!binding.is_bound());
        assert_eq!(binding.execute(&1), None);
        assert_eq!(hits.get(), 0);
    }
}
