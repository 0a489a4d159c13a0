//! Error types for the aggregation futures.

use core::fmt;
use core::ops::{Deref, DerefMut};

/// A collection of failure reasons returned when [`any`] finds no
/// successful entry.
///
/// Holds one reason per registered entry, in registration order. Derefs to
/// a slice for inspection; [`into_reasons`][AggregateError::into_reasons]
/// takes ownership.
///
/// # Example
///
/// ```rust
/// use defer_set::DeferSet;
/// use futures_lite::future::block_on;
///
/// # block_on(async {
/// let mut set = DeferSet::<&str, &str>::new();
/// set.register(async { Err("oops") });
/// set.register(async { Err("oh no") });
///
/// let err = set.any().await.unwrap_err();
/// assert_eq!(&*err, &["oops", "oh no"]);
/// # });
/// ```
///
/// [`any`]: crate::DeferSet::any
pub struct AggregateError<E> {
    reasons: Vec<E>,
}

impl<E> AggregateError<E> {
    pub(crate) fn new(reasons: Vec<E>) -> Self {
        Self { reasons }
    }

    /// Consume the error, returning every failure reason in registration
    /// order.
    pub fn into_reasons(self) -> Vec<E> {
        self.reasons
    }
}

impl<E: fmt::Debug> fmt::Debug for AggregateError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for reason in &self.reasons {
            list.entry(reason);
        }
        list.finish()
    }
}

impl<E: fmt::Debug> fmt::Display for AggregateError<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "all futures failed: ")?;
        fmt::Debug::fmt(self, f)
    }
}

impl<E> Deref for AggregateError<E> {
    type Target = [E];

    fn deref(&self) -> &Self::Target {
        &self.reasons
    }
}

impl<E> DerefMut for AggregateError<E> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.reasons
    }
}

impl<E: fmt::Debug> std::error::Error for AggregateError<E> {}
