use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque per-language state threaded from one line to the next.
///
/// States are values: they are never mutated once handed out. Any `PartialEq` type
/// can be used as a state, equality being its own `PartialEq`.
pub trait State: fmt::Debug + Send + Sync {
    /// Behavioural equality with another state, of any concrete type.
    fn equals(&self, other: &dyn State) -> bool;

    fn as_any(&self) -> &dyn Any;
}

impl<T> State for T
where
    T: PartialEq + fmt::Debug + Send + Sync + 'static,
{
    fn equals(&self, other: &dyn State) -> bool {
        other
            .as_any()
            .downcast_ref::<T>()
            .is_some_and(|other| self == other)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

/// Shared handle on a state. Identity (`Arc::ptr_eq`) tells callers whether a
/// line changed the state at all.
pub type StateRef = Arc<dyn State>;

/// Returns `input` itself when `produced` is equal to it, `produced` otherwise.
pub(crate) fn reuse_if_equal(input: &StateRef, produced: StateRef) -> StateRef {
    if Arc::ptr_eq(input, &produced) || produced.equals(input.as_ref()) {
        Arc::clone(input)
    } else {
        produced
    }
}
