//! Deferred, key-preserving join combinators for async Rust.
//!
//! A [`DeferSet`] collects an open-ended number of fallible futures, each
//! under an optional [`Key`], and collapses them on demand under one of
//! four join policies:
//!
//! - [`DeferSet::all`]: wait for all to complete, keyed; fail on the first `Err`.
//! - [`DeferSet::all_settled`]: wait for all to settle, keyed; never fails.
//! - [`DeferSet::race`]: adopt the outcome of whichever settles first.
//! - [`DeferSet::any`]: take the first success, or bundle every failure.
//!
//! Entries registered without a key fall back to their zero-based
//! registration ordinal, and the keyed results come back as an
//! insertion-ordered [`IndexMap`][indexmap::IndexMap], so key order always
//! matches registration order. Aggregation snapshots the set: each call
//! covers exactly the entries registered so far, and calling again later
//! covers the grown set independently.
//!
//! This is a combinator layer, not a runtime: it works with any executor,
//! spawns nothing, and drives registered futures only while one of its
//! aggregation futures is being polled.
//!
//! # Examples
//!
//! Register named futures and join them into a keyed mapping:
//!
//! ```rust
//! use defer_set::{DeferSet, Key};
//! use futures_lite::future::block_on;
//!
//! block_on(async {
//!     let mut set = DeferSet::<u32, &str>::new();
//!     set.register_keyed(async { Ok(1) }, "x");
//!     set.register_keyed(async { Ok(2) }, "y");
//!     set.register_keyed(async { Ok(3) }, "z");
//!
//!     let values = set.all().await.unwrap();
//!     assert_eq!(values[&Key::from("x")], 1);
//!     assert_eq!(values[&Key::from("y")], 2);
//!     assert_eq!(values[&Key::from("z")], 3);
//! })
//! ```
//!
//! Or hand out a [`Resolver`] and settle an entry from inside another
//! computation; the resolved value passes through for further chaining:
//!
//! ```rust
//! use defer_set::{DeferSet, Key};
//! use futures_lite::future::{block_on, zip};
//!
//! block_on(async {
//!     let mut set = DeferSet::<u32, &str>::new();
//!     let resolver = set.defer_keyed("answer");
//!
//!     let upstream = async move { resolver.resolve(42) };
//!     let (value, all) = zip(upstream, set.all()).await;
//!     assert_eq!(value, 42);
//!     assert_eq!(all.unwrap()[&Key::from("answer")], 42);
//! })
//! ```
//!
//! # Failure channels
//!
//! A future handed to [`register`][DeferSet::register] keeps both of its
//! channels: its `Err` propagates through every policy as documented. A
//! [`Resolver`] is different by design: it can only fulfil. If the
//! upstream computation fails and the resolver is dropped unresolved, that
//! entry never settles and any aggregation waiting on it stays pending
//! forever. Prefer `register` for anything fallible.

#![deny(missing_debug_implementations, nonstandard_style)]
#![warn(missing_docs, unreachable_pub)]

mod errors;
mod key;
mod set;
mod settlement;
mod utils;

pub mod future;

pub use errors::AggregateError;
pub use key::{Key, Token};
pub use set::{DeferSet, Resolver};
pub use settlement::Settlement;
