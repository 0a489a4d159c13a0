use core::fmt;
use core::future::IntoFuture;
use std::sync::Arc;

use futures_lite::FutureExt;

use crate::future::{All, AllSettled, Any, Race};
use crate::utils::SettleCell;
use crate::Key;

/// A growable, keyed set of fallible futures, collapsed on demand under
/// one of four join policies.
///
/// Entries are appended either by handing over a future
/// ([`register`][DeferSet::register]) or by obtaining a one-shot
/// [`Resolver`] to attach to some computation's completion
/// ([`defer`][DeferSet::defer]). Each entry carries a [`Key`]; entries
/// registered without one are keyed by their zero-based registration
/// ordinal. The registry is append-only: entries are never removed or
/// reordered, so an entry's index is stable for the life of the set.
///
/// The four aggregation methods each snapshot the current entries and
/// return a new future over that snapshot; registrations made afterwards
/// are invisible to it. Aggregating twice over the same entries yields two
/// independent futures that settle to equivalent results, which is why
/// aggregation requires `T: Clone` and `E: Clone`.
///
/// Nothing runs on its own: registered futures are driven by whichever
/// aggregation futures are polled, on whatever executor polls them.
///
/// # Example
///
/// ```rust
/// use defer_set::{DeferSet, Key};
/// use futures_lite::future::block_on;
///
/// # block_on(async {
/// let mut set = DeferSet::<u32, &str>::new();
/// set.register_keyed(async { Ok(1) }, "a");
/// set.register_keyed(async { Ok(2) }, "b");
///
/// let values = set.all().await.unwrap();
/// assert_eq!(values[&Key::from("a")], 1);
/// assert_eq!(values[&Key::from("b")], 2);
/// # });
/// ```
pub struct DeferSet<T, E> {
    entries: Vec<Entry<T, E>>,
}

/// One registered future and the key it reports under.
pub(crate) struct Entry<T, E> {
    pub(crate) key: Key,
    pub(crate) cell: Arc<SettleCell<T, E>>,
}

impl<T, E> Clone for Entry<T, E> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<T, E> DeferSet<T, E> {
    /// Create a new, empty set.
    ///
    /// # Example
    ///
    /// ```rust
    /// use defer_set::DeferSet;
    ///
    /// let set = DeferSet::<u32, &str>::new();
    /// assert!(set.is_empty());
    /// ```
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
        }
    }

    /// The number of registered entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no entries have been registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if an entry was registered under `key`.
    pub fn contains_key(&self, key: &Key) -> bool {
        self.entries.iter().any(|entry| entry.key == *key)
    }

    /// The registered keys, in registration order.
    pub fn keys(&self) -> impl Iterator<Item = &Key> + '_ {
        self.entries.iter().map(|entry| &entry.key)
    }

    /// Register a future under its registration ordinal.
    ///
    /// The future's `Ok` and `Err` channels are both preserved; this is
    /// the entry point to use for anything that can fail. It is not
    /// polled here — it runs when an aggregation future over it runs.
    ///
    /// # Example
    ///
    /// ```rust
    /// use defer_set::{DeferSet, Key};
    /// use futures_lite::future::block_on;
    ///
    /// # block_on(async {
    /// let mut set = DeferSet::<u32, &str>::new();
    /// set.register(async { Ok(7) });
    ///
    /// let values = set.all().await.unwrap();
    /// assert_eq!(values[&Key::Index(0)], 7);
    /// # });
    /// ```
    pub fn register<F>(&mut self, future: F)
    where
        F: IntoFuture<Output = Result<T, E>>,
        F::IntoFuture: 'static,
    {
        let key = Key::ordinal(self.entries.len());
        self.register_keyed(future, key);
    }

    /// Register a future under an explicit key.
    pub fn register_keyed<F>(&mut self, future: F, key: impl Into<Key>)
    where
        F: IntoFuture<Output = Result<T, E>>,
        F::IntoFuture: 'static,
    {
        self.entries.push(Entry {
            key: key.into(),
            cell: SettleCell::running(future.into_future().boxed_local()),
        });
    }

    /// Create an entry settled later through the returned [`Resolver`],
    /// keyed by its registration ordinal.
    ///
    /// The resolver holds a reference to its own entry only, never to the
    /// set, so it can be moved into whatever completes the computation.
    ///
    /// Note that a resolver has no failure path: if the upstream
    /// computation fails and the resolver is dropped unresolved, the entry
    /// never settles and any aggregation waiting on it stays pending
    /// forever. Register fallible futures with
    /// [`register`][DeferSet::register] instead.
    ///
    /// # Example
    ///
    /// ```rust
    /// use defer_set::{DeferSet, Key};
    /// use futures_lite::future::{block_on, zip};
    ///
    /// # block_on(async {
    /// let mut set = DeferSet::<u32, &str>::new();
    /// let resolver = set.defer();
    ///
    /// let upstream = async move { resolver.resolve(6) * 2 };
    /// let (doubled, values) = zip(upstream, set.all()).await;
    /// assert_eq!(doubled, 12);
    /// assert_eq!(values.unwrap()[&Key::Index(0)], 6);
    /// # });
    /// ```
    pub fn defer(&mut self) -> Resolver<T, E> {
        let key = Key::ordinal(self.entries.len());
        self.defer_keyed(key)
    }

    /// Create an entry settled later through the returned [`Resolver`],
    /// under an explicit key.
    pub fn defer_keyed(&mut self, key: impl Into<Key>) -> Resolver<T, E> {
        let key = key.into();
        let cell = SettleCell::unresolved();
        self.entries.push(Entry {
            key: key.clone(),
            cell: Arc::clone(&cell),
        });
        Resolver { key, cell }
    }

    /// Wait for every entry to complete, yielding a key-to-value mapping,
    /// or fail with the first entry's failure.
    ///
    /// The mapping's keys appear in registration order; a duplicate key
    /// keeps its first position and takes the later entry's value. Over an
    /// empty set the returned future completes immediately with an empty
    /// mapping.
    pub fn all(&self) -> All<T, E> {
        All::new(self.entries.clone())
    }

    /// Wait for every entry to settle either way, yielding a key-to-
    /// [`Settlement`][crate::Settlement] mapping.
    ///
    /// Unlike [`all`][DeferSet::all] this never fails: each entry's
    /// outcome is captured where its value would otherwise be. Over an
    /// empty set the returned future completes immediately with an empty
    /// mapping.
    pub fn all_settled(&self) -> AllSettled<T, E> {
        AllSettled::new(self.entries.clone())
    }

    /// Wait for the first entry to settle, adopting its outcome verbatim.
    ///
    /// Keys play no part here; the winner's bare value or failure is the
    /// result. Over an empty set the returned future never settles.
    pub fn race(&self) -> Race<T, E> {
        Race::new(self.entries.clone())
    }

    /// Wait for the first entry to complete successfully, ignoring
    /// failures unless every entry fails, in which case all failure
    /// reasons are bundled into an
    /// [`AggregateError`][crate::AggregateError].
    ///
    /// Over an empty set the returned future fails immediately with an
    /// empty [`AggregateError`][crate::AggregateError].
    pub fn any(&self) -> Any<T, E> {
        Any::new(self.entries.clone())
    }
}

impl<T, E> Default for DeferSet<T, E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, E> fmt::Debug for DeferSet<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeferSet").field("len", &self.len()).finish()
    }
}

impl<T, E, F> Extend<F> for DeferSet<T, E>
where
    F: IntoFuture<Output = Result<T, E>>,
    F::IntoFuture: 'static,
{
    fn extend<I: IntoIterator<Item = F>>(&mut self, iter: I) {
        for future in iter {
            self.register(future);
        }
    }
}

impl<T, E, F> FromIterator<F> for DeferSet<T, E>
where
    F: IntoFuture<Output = Result<T, E>>,
    F::IntoFuture: 'static,
{
    fn from_iter<I: IntoIterator<Item = F>>(iter: I) -> Self {
        let mut set = Self::new();
        set.extend(iter);
        set
    }
}

/// One-shot completion handle for an entry created by
/// [`defer`][DeferSet::defer].
///
/// Holds a reference to the single entry it settles. Consuming it with
/// [`resolve`][Resolver::resolve] is the entry's only path to completion;
/// there is no failure path, and dropping the resolver unresolved leaves
/// the entry pending forever (see [`defer`][DeferSet::defer]).
#[must_use = "a resolver does nothing until `resolve` is called"]
pub struct Resolver<T, E> {
    key: Key,
    cell: Arc<SettleCell<T, E>>,
}

impl<T, E> Resolver<T, E> {
    /// The key the entry was registered under.
    pub fn key(&self) -> &Key {
        &self.key
    }
}

impl<T: Clone, E> Resolver<T, E> {
    /// Settle the entry with `value`, passing the value back out unchanged
    /// so the call composes into further chaining.
    ///
    /// Takes the resolver by value: an entry settles exactly once.
    pub fn resolve(self, value: T) -> T {
        self.cell.fulfill(value.clone());
        value
    }
}

impl<T, E> fmt::Debug for Resolver<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolver")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}
