use core::fmt;
use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use indexmap::IndexMap;

use crate::set::Entry;
use crate::{Key, Settlement};

/// Waits for every entry to complete, or for the first one to fail.
///
/// This `struct` is created by the [`all`] method on [`DeferSet`]. See its
/// documentation for more.
///
/// [`all`]: crate::DeferSet::all
/// [`DeferSet`]: crate::DeferSet
#[must_use = "futures do nothing unless you `.await` or poll them"]
pub struct All<T, E> {
    consumed: bool,
    pending: usize,
    items: Vec<Option<T>>,
    entries: Vec<Entry<T, E>>,
}

impl<T, E> All<T, E> {
    pub(crate) fn new(entries: Vec<Entry<T, E>>) -> Self {
        Self {
            consumed: false,
            pending: entries.len(),
            items: std::iter::repeat_with(|| None).take(entries.len()).collect(),
            entries,
        }
    }
}

// `All` drives its futures through `Arc<SettleCell>`; nothing is held
// inline or pin-projected, so it is movable regardless of `T`/`E`.
impl<T, E> Unpin for All<T, E> {}

impl<T, E> fmt::Debug for All<T, E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("All").field("pending", &self.pending).finish()
    }
}

impl<T: Clone, E: Clone> Future for All<T, E> {
    type Output = Result<IndexMap<Key, T>, E>;

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
            match entry.cell.poll_settled(cx) {
                Poll::Ready(Settlement::Fulfilled(value)) => {
                    this.items[i] = Some(value);
                    this.pending -= 1;
                }
                Poll::Ready(Settlement::Rejected(reason)) => {
                    this.consumed = true;
                    return Poll::Ready(Err(reason));
                }
                Poll::Pending => {}
            }
        }

        if this.pending == 0 {
            this.consumed = true;
            let mut values = IndexMap::with_capacity(this.entries.len());
            for (entry, slot) in this.entries.iter().zip(this.items.iter_mut()) {
                debug_assert!(slot.is_some(), "every slot must be filled on completion");
                if let Some(value) = slot.take() {
                    values.insert(entry.key.clone(), value);
                }
            }
            Poll::Ready(Ok(values))
        } else {
            Poll::Pending
        }
    }
}
