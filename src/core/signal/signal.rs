//=========================================================================
// Signal
//=========================================================================
//
// Multicast synchronous broadcast channel with priority ordering.
//
// Bindings are kept sorted by descending priority; equal priorities
// keep insertion order (stable insert). Dispatch iterates a snapshot
// of the list, so listener-triggered add/remove on the same signal
// cannot corrupt the broadcast in progress.
//
// Pattern: add → dispatch (N listeners) → remove/dispose
//
//=========================================================================

//=== External Dependencies ===============================================

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use log::{debug, warn};

//=== Internal Dependencies ===============================================

use super::binding::Binding;
use super::{OwnerId, Propagation, SignalError, SlotId};

//=== Signal ==============================================================

/// Multicast synchronous publish/subscribe channel.
///
/// Listeners are closures registered under an explicit [`SlotId`] with
/// an integer priority (higher runs earlier; ties run in insertion
/// order). A listener registered with [`Signal::add_once`] detaches
/// itself after its first execution. With memorization enabled, the
/// most recent dispatch is replayed once to each listener added
/// afterwards.
///
/// The signal is single-threaded by design: state lives in
/// `Cell`/`RefCell` and all operations take `&self`, so a listener may
/// freely add or remove bindings on the signal that is mid-dispatch.
/// Re-dispatching a signal from inside one of its own listeners is not
/// supported and panics.
///
/// # Example
///
/// ```
/// use std::cell::Cell;
/// use std::rc::Rc;
/// use stagecue::prelude::*;
///
/// let sum = Rc::new(Cell::new(0));
/// let signal: Signal<i32> = Signal::new();
///
/// let probe = Rc::clone(&sum);
/// signal
///     .add(SlotId::named("probe"), 0, move |value| {
///         probe.set(probe.get() + *value);
///         Propagation::Continue
///     })
///     .unwrap();
///
/// signal.dispatch(3);
/// signal.dispatch(4);
/// assert_eq!(sum.get(), 7);
/// ```
pub struct Signal<A: Clone + 'static> {
    /// Attached bindings, descending priority, stable within a priority.
    bindings: RefCell<Vec<Rc<Binding<A>>>>,

    /// Arguments of the most recent dispatch, kept while memorizing.
    memorized: RefCell<Option<A>>,

    /// Inactive signals drop every dispatch. Toggling during a dispatch
    /// only affects the next one.
    active: Cell<bool>,

    /// Whether dispatches are cached for replay to late subscribers.
    memorize: Cell<bool>,

    /// Cleared by `halt()`; reset at the start of every dispatch.
    propagate: Cell<bool>,

    disposed: Cell<bool>,
}

impl<A: Clone + 'static> Signal<A> {
    //--- Construction -----------------------------------------------------

    /// Creates an active signal with no listeners and memorization off.
    pub fn new() -> Self {
        Self {
            bindings: RefCell::new(Vec::new()),
            memorized: RefCell::new(None),
            active: Cell::new(true),
            memorize: Cell::new(false),
            propagate: Cell::new(true),
            disposed: Cell::new(false),
        }
    }

    //--- Registration -----------------------------------------------------

    /// Registers a persistent listener under `slot`.
    ///
    /// Higher `priority` executes earlier; listeners sharing a priority
    /// execute in registration order. If the signal memorizes and a
    /// dispatch has already happened, the new listener is invoked with
    /// the cached arguments immediately, during this call.
    ///
    /// Registering the same `slot` again in the same mode returns the
    /// existing binding unchanged (no duplicate, no replay).
    ///
    /// # Errors
    ///
    /// [`SignalError::ConflictingMode`] if `slot` currently holds a
    /// one-shot listener; [`SignalError::Disposed`] after `dispose`.
    pub fn add<F>(&self, slot: SlotId, priority: i32, listener: F) -> Result<Rc<Binding<A>>, SignalError>
    where
        F: FnMut(&A) -> Propagation + 'static,
    {
        self.register(slot, false, priority, Box::new(listener))
    }

    /// Registers a one-shot listener under `slot`.
    ///
    /// The binding detaches itself after its first execution. A
    /// memorized replay during this call counts as that execution and
    /// detaches the binding before `add_once` returns.
    ///
    /// # Errors
    ///
    /// [`SignalError::ConflictingMode`] if `slot` currently holds a
    /// persistent listener; [`SignalError::Disposed`] after `dispose`.
    pub fn add_once<F>(&self, slot: SlotId, priority: i32, listener: F) -> Result<Rc<Binding<A>>, SignalError>
    where
        F: FnMut(&A) -> Propagation + 'static,
    {
        self.register(slot, true, priority, Box::new(listener))
    }

    fn register(
        &self,
        slot: SlotId,
        once: bool,
        priority: i32,
        listener: Box<dyn FnMut(&A) -> Propagation>,
    ) -> Result<Rc<Binding<A>>, SignalError> {
        if self.disposed.get() {
            return Err(SignalError::Disposed);
        }

        if let Some(existing) = self.find(slot) {
            if existing.is_once() != once {
                return Err(SignalError::ConflictingMode(slot));
            }
            return Ok(existing);
        }

        let binding = Rc::new(Binding::new(slot, once, priority, listener));
        self.insert_sorted(Rc::clone(&binding));
        debug!("Listener {:?} attached (priority {})", slot, priority);

        // Late subscriber replay. Runs outside any borrow of the
        // binding list, so the listener may re-enter this signal.
        if self.memorize.get() {
            let cached = self.memorized.borrow().clone();
            if let Some(args) = cached {
                binding.execute(&args);
                if binding.is_once() {
                    self.detach(&binding);
                }
            }
        }

        Ok(binding)
    }

    //--- Detachment -------------------------------------------------------

    /// Detaches the listener registered under `slot`.
    ///
    /// Removing an absent slot is a successful no-op. Returns the
    /// detached binding for introspection, if one was attached.
    pub fn remove(&self, slot: SlotId) -> Option<Rc<Binding<A>>> {
        let binding = self.find(slot)?;
        self.detach(&binding);
        debug!("Listener {:?} detached", slot);
        Some(binding)
    }

    /// Detaches every listener.
    pub fn remove_all(&self) {
        let mut bindings = self.bindings.borrow_mut();
        for binding in bindings.iter() {
            binding.unbind();
        }
        bindings.clear();
    }

    /// Detaches every listener registered under the given owner.
    ///
    /// This is the grouped form of [`Signal::remove`]: a subsystem that
    /// scoped its registrations to one [`OwnerId`] can tear all of them
    /// down in a single call.
    pub fn remove_all_for(&self, owner: OwnerId) {
        self.bindings.borrow_mut().retain(|binding| {
            if binding.slot().owner() == Some(owner) {
                binding.unbind();
                false
            } else {
                true
            }
        });
    }

    //--- Queries ----------------------------------------------------------

    /// Whether a listener is registered under `slot`.
    pub fn has(&self, slot: SlotId) -> bool {
        self.find(slot).is_some()
    }

    /// Number of attached listeners.
    pub fn listener_count(&self) -> usize {
        self.bindings.borrow().len()
    }

    /// True when no listener is attached.
    pub fn is_empty(&self) -> bool {
        self.bindings.borrow().is_empty()
    }

    //--- Dispatch ---------------------------------------------------------

    /// Broadcasts `args` to every attached listener.
    ///
    /// No-op while the signal is inactive. When memorizing, `args` is
    /// cached before broadcasting, even if no listener is attached.
    /// Listeners run in descending priority order against a snapshot of
    /// the binding list: listeners added during the broadcast do not
    /// see it, and listeners removed during it no longer run. The
    /// broadcast stops early when a listener returns
    /// [`Propagation::Halt`] or calls [`Signal::halt`].
    ///
    /// Listeners are not isolated from each other: a panicking listener
    /// unwinds through this call and the rest of the chain never runs.
    pub fn dispatch(&self, args: A) {
        if self.disposed.get() {
            warn!("Dispatch on a disposed signal ignored");
            return;
        }
        if !self.active.get() {
            return;
        }

        if self.memorize.get() {
            *self.memorized.borrow_mut() = Some(args.clone());
        }

        let snapshot: Vec<Rc<Binding<A>>> = self.bindings.borrow().clone();
        if snapshot.is_empty() {
            return;
        }

        // A halt() from a previous dispatch must not leak into this one.
        self.propagate.set(true);

        for binding in snapshot {
            if !self.propagate.get() {
                break;
            }

            if let Some(control) = binding.execute(&args) {
                if binding.is_once() {
                    self.detach(&binding);
                }
                if control == Propagation::Halt {
                    break;
                }
            }
        }
    }

    /// Stops the in-flight dispatch; lower-priority listeners are
    /// skipped for this broadcast only.
    ///
    /// Meaningful only from inside a listener: every dispatch resets
    /// the flag on entry, so calling this between dispatches has no
    /// effect. Use [`Signal::set_active`] to mute the signal entirely.
    pub fn halt(&self) {
        self.propagate.set(false);
    }

    //--- Memorization -----------------------------------------------------

    /// Drops the memorized arguments without touching any binding.
    pub fn forget(&self) {
        *self.memorized.borrow_mut() = None;
    }

    /// Whether dispatches are cached for replay to late subscribers.
    pub fn is_memorize(&self) -> bool {
        self.memorize.get()
    }

    /// Turns late-subscriber replay on or off.
    ///
    /// Turning it off does not forget an already-cached dispatch; call
    /// [`Signal::forget`] for that.
    pub fn set_memorize(&self, memorize: bool) {
        self.memorize.set(memorize);
    }

    //--- Activity ---------------------------------------------------------

    /// Whether dispatches currently broadcast.
    pub fn is_active(&self) -> bool {
        self.active.get()
    }

    /// Mutes or unmutes the signal. A muted signal drops dispatches
    /// entirely (they are not memorized either).
    pub fn set_active(&self, active: bool) {
        self.active.set(active);
    }

    //--- Disposal ---------------------------------------------------------

    /// Permanently shuts the signal down.
    ///
    /// Detaches every binding and drops the memorized arguments. After
    /// disposal the contract is: registration (`add`/`add_once`) fails
    /// with [`SignalError::Disposed`]; `dispatch` and the detachment
    /// calls degrade to logged no-ops; queries report an empty signal.
    pub fn dispose(&self) {
        if self.disposed.get() {
            return;
        }
        self.remove_all();
        self.forget();
        self.disposed.set(true);
    }

    /// Whether `dispose` has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed.get()
    }

    //--- Internal Helpers -------------------------------------------------

    fn find(&self, slot: SlotId) -> Option<Rc<Binding<A>>> {
        self.bindings
            .borrow()
            .iter()
            .find(|binding| binding.slot() == slot)
            .cloned()
    }

    // Stable insert: after every binding of equal or higher priority,
    // before the first strictly lower one.
    fn insert_sorted(&self, binding: Rc<Binding<A>>) {
        let mut bindings = self.bindings.borrow_mut();
        let index = bindings
            .iter()
            .position(|existing| existing.priority() < binding.priority())
            .unwrap_or(bindings.len());
        bindings.insert(index, binding);
    }

    fn detach(&self, binding: &Rc<Binding<A>>) {
        binding.unbind();
        self.bindings
            .borrow_mut()
            .retain(|existing| !Rc::ptr_eq(existing, binding));
    }
}

impl<A: Clone + 'static> Default for Signal<A> {
    fn default() -> Self {
        Self::new()
    }
}

//=== Debug Trait ==========================================================

impl<A: Clone + 'static> fmt::Debug for Signal<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signal")
            .field("active", &self.active.get())
            .field("memorize", &self.memorize.get())
            .field("listeners", &self.listener_count())
            .field("disposed", &self.disposed.get())
            .finish()
    }
}

//=========================================================================
// Tests
//=========================================================================
