//! The aggregation futures produced by a [`DeferSet`][crate::DeferSet].
//!
//! Each of the set's four aggregation methods snapshots the entries
//! registered so far and returns one of the futures in this module over
//! that snapshot. All four are lazy: nothing runs until the returned
//! future is polled, and polling it is what drives the registered futures.
//!
//! | Name         | Output                              | When does it settle? |
//! | ---          | ---                                 | ---                  |
//! | [`All`]        | `Result<IndexMap<Key, T>, E>`       | On the first `Err`, else once all complete |
//! | [`AllSettled`] | `IndexMap<Key, Settlement<T, E>>`   | Once all settle, either way |
//! | [`Race`]       | `Result<T, E>`                      | As soon as any entry settles |
//! | [`Any`]        | `Result<T, AggregateError<E>>`      | On the first `Ok`, or once all have failed |

pub use all::All;
pub use all_settled::AllSettled;
pub use any::Any;
pub use race::Race;

mod all;
mod all_settled;
mod any;
mod race;
