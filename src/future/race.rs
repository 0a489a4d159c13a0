use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use crate::set::Entry;

/// Waits for the first entry to settle, adopting its outcome verbatim.
///
/// Over an empty snapshot this future never settles.
///
/// This `struct` is created by the [`race`] method on [`DeferSet`]. See
/// its documentation for more.
///
/// [`race`]: crate::DeferSet::race
/// [`DeferSet`]: crate::DeferSet
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Race<T, E> {
    consumed: bool,
    entries: Vec<Entry<T, E>>,
}

impl<T, E> Race<T, E> {
    pub(crate) fn new(entries: Vec<Entry<T, E>>) -> Self {
        Self {
            consumed: false,
            entries,
        }
    }
}

impl<T, E> fmt::Debug for Race<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Race")
            .field("entries", &self.entries.len())
            .finish()
    }
}

impl<T: Clone, E: Clone> Future for Race<T, E> {
    type Output = Result<T, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        assert!(
            !this.consumed,
            "futures must not be polled after completing"
        );

        for entry in &this.entries {
            if let Poll::Ready(outcome) = entry.cell.poll_settled(cx) {
                this.consumed = true;
                return Poll::Ready(outcome.into_result());
            }
        }

        Poll::Pending
    }
}
