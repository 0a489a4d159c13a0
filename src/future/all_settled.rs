use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use indexmap::IndexMap;

use crate::set::Entry;
use crate::{Key, Settlement};

/// Waits for every entry to settle, capturing each outcome instead of
/// short-circuiting on failure.
///
/// This `struct` is created by the [`all_settled`] method on [`DeferSet`].
/// See its documentation for more.
///
/// [`all_settled`]: crate::DeferSet::all_settled
/// [`DeferSet`]: crate::DeferSet
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct AllSettled<T, E> {
    consumed: bool,
    pending: usize,
    items: Vec<Option<Settlement<T, E>>>,
    entries: Vec<Entry<T, E>>,
}

impl<T, E> AllSettled<T, E> {
    pub(crate) fn new(entries: Vec<Entry<T, E>>) -> Self {
        Self {
            consumed: false,
            pending: entries.len(),
            items: std::iter::repeat_with(|| None).take(entries.len()).collect(),
            entries,
        }
    }
}

// `AllSettled` drives its futures through `Arc<SettleCell>`; nothing is
// held inline or pin-projected, so it is movable regardless of `T`/`E`.
impl<T, E> Unpin for AllSettled<T, E> {}

impl<T, E> fmt::Debug for AllSettled<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AllSettled")
            .field("pending", &self.pending)
            .finish()
    }
}

impl<T: Clone, E: Clone> Future for AllSettled<T, E> {
    type Output = IndexMap<Key, Settlement<T, E>>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();

        assert!(
            !this.consumed,
            "futures must not be polled after completing"
        );

        for (i, entry) in this.entries.iter().enumerate() {
            if this.items[i].is_some() {
                continue;
            }
            if let Poll::Ready(outcome) = entry.cell.poll_settled(cx) {
                this.items[i] = Some(outcome);
                this.pending -= 1;
            }
        }

        if this.pending == 0 {
            this.consumed = true;
            let mut outcomes = IndexMap::with_capacity(this.entries.len());
            for (entry, slot) in this.entries.iter().zip(this.items.iter_mut()) {
                debug_assert!(slot.is_some(), "every slot must be filled on completion");
                if let Some(outcome) = slot.take() {
                    outcomes.insert(entry.key.clone(), outcome);
                }
            }
            Poll::Ready(outcomes)
        } else {
            Poll::Pending
        }
    }
}
