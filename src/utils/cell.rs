use core::future::Future;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll, Waker};

use futures_lite::future::BoxedLocal;

use super::wakers::{BroadcastWaker, WakerList};
use crate::Settlement;

/// One registered future's shareable settlement slot.
///
/// Rust futures are single-consumer, but every aggregation call must be
/// able to observe the same entry independently. The cell bridges that
/// gap: whichever consumer polls first drives the inner future, the inner
/// future is woken through a waker that re-wakes every parked consumer,
/// and the outcome is cached and cloned out on each later poll.
pub(crate) struct SettleCell<T, E> {
    state: Mutex<State<T, E>>,
    wakers: Arc<Mutex<WakerList>>,
    /// Prebuilt broadcast waker handed to the inner future.
    notifier: Waker,
}

enum State<T, E> {
    /// Waiting on a `Resolver` nobody has called yet.
    Unresolved,
    /// Driving a directly registered future.
    Running(BoxedLocal<Result<T, E>>),
    /// Outcome captured; cloned out on every later poll.
    Settled(Settlement<T, E>),
}

impl<T, E> SettleCell<T, E> {
    fn with_state(state: State<T, E>) -> Arc<Self> {
        let wakers = Arc::new(Mutex::new(WakerList::default()));
        let notifier = BroadcastWaker::waker(Arc::clone(&wakers));
        Arc::new(Self {
            state: Mutex::new(state),
            wakers,
            notifier,
        })
    }

    /// A cell settled later through [`SettleCell::fulfill`].
    pub(crate) fn unresolved() -> Arc<Self> {
        Self::with_state(State::Unresolved)
    }

    /// A cell that settles by driving `future` to completion.
    pub(crate) fn running(future: BoxedLocal<Result<T, E>>) -> Arc<Self> {
        Self::with_state(State::Running(future))
    }

    /// Settle an unresolved cell with a value and wake every consumer.
    pub(crate) fn fulfill(&self, value: T) {
        let mut state = self.state.lock().unwrap();
        debug_assert!(
            matches!(*state, State::Unresolved),
            "only unresolved cells can be fulfilled"
        );
        *state = State::Settled(Settlement::Fulfilled(value));
        drop(state);
        self.wakers.lock().unwrap().wake_all();
    }
}

impl<T: Clone, E: Clone> SettleCell<T, E> {
    /// Poll for the cell's settlement on behalf of one consumer.
    pub(crate) fn poll_settled(&self, cx: &mut Context<'_>) -> Poll<Settlement<T, E>> {
        let mut state = self.state.lock().unwrap();
        if let State::Settled(outcome) = &*state {
            return Poll::Ready(outcome.clone());
        }

        // Park this consumer before polling the inner future, so a wake
        // landing mid-poll finds the waker already registered.
        self.wakers.lock().unwrap().push(cx.waker());

        if let State::Running(future) = &mut *state {
            let mut cx = Context::from_waker(&self.notifier);
            if let Poll::Ready(result) = future.as_mut().poll(&mut cx) {
                let outcome = Settlement::from(result);
                *state = State::Settled(outcome.clone());
                drop(state);
                self.wakers.lock().unwrap().wake_all();
                return Poll::Ready(outcome);
            }
        }

        Poll::Pending
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::utils::wakers::DummyWaker;
    use futures_lite::FutureExt;

    fn poll_now<T: Clone, E: Clone>(cell: &SettleCell<T, E>) -> Poll<Settlement<T, E>> {
        let waker = Arc::new(DummyWaker()).into();
        let mut cx = Context::from_waker(&waker);
        cell.poll_settled(&mut cx)
    }

    #[test]
    fn unresolved_until_fulfilled() {
        let cell = SettleCell::<&str, &str>::unresolved();
        assert!(poll_now(&cell).is_pending());

        cell.fulfill("hello");
        assert_eq!(poll_now(&cell), Poll::Ready(Settlement::Fulfilled("hello")));
    }

    #[test]
    fn running_cell_caches_its_outcome() {
        let cell = SettleCell::running(async { Err::<&str, _>("oops") }.boxed_local());
        assert_eq!(poll_now(&cell), Poll::Ready(Settlement::Rejected("oops")));
        // A second consumer observes the cached clone.
        assert_eq!(poll_now(&cell), Poll::Ready(Settlement::Rejected("oops")));
    }
}
