use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use crate::set::Entry;
use crate::{AggregateError, Settlement};

/// Waits for the first entry to complete successfully, collecting failure
/// reasons along the way.
///
/// Failures are ignored while any entry can still succeed. Once every
/// entry has failed, all reasons are surfaced together as an
/// [`AggregateError`]; over an empty snapshot that happens immediately,
/// with no reasons.
///
/// This `struct` is created by the [`any`] method on [`DeferSet`]. See its
/// documentation for more.
///
/// [`any`]: crate::DeferSet::any
/// [`DeferSet`]: crate::DeferSet
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct Any<T, E> {
    consumed: bool,
    pending: usize,
    reasons: Vec<Option<E>>,
    entries: Vec<Entry<T, E>>,
}

impl<T, E> Any<T, E> {
    pub(crate) fn new(entries: Vec<Entry<T, E>>) -> Self {
        Self {
            consumed: false,
            pending: entries.len(),
            reasons: std::iter::repeat_with(|| None).take(entries.len()).collect(),
            entries,
        }
    }
}

// `Any` drives its futures through `Arc<SettleCell>`; nothing is held
// inline or pin-projected, so it is movable regardless of `T`/`E`.
impl<T, E> Unpin for Any<T, E> {}

impl<T, E> fmt::Debug for Any<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Any").field("pending", &self.pending).finish()
    }
}

impl<T: Clone, E: Clone> Future for Any<T, E> {
    type Output = Result<T, AggregateError<E>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        assert!(
            !this.consumed,
            "futures must not be polled after completing"
        );

        for (i, entry) in this.entries.iter().enumerate() {
            if this.reasons[i].is_some() {
                continue;
            }
            match entry.cell.poll_settled(cx) {
                Poll::Ready(Settlement::Fulfilled(value)) => {
                    this.consumed = true;
                    return Poll::Ready(Ok(value));
                }
                Poll::Ready(Settlement::Rejected(reason)) => {
                    this.reasons[i] = Some(reason);
                    this.pending -= 1;
                }
                Poll::Pending => {}
            }
        }

        if this.pending == 0 {
            this.consumed = true;
            let reasons = this.reasons.iter_mut().filter_map(Option::take).collect();
            Poll::Ready(Err(AggregateError::new(reasons)))
        } else {
            Poll::Pending
        }
    }
}
