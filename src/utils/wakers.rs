use std::sync::{Arc, Mutex};
use std::task::{Wake, Waker};

/// The set of consumer wakers parked on one settlement cell.
///
/// Consumers re-register on every poll; [`wake_all`][WakerList::wake_all]
/// drains the list, so a woken consumer that stays interested registers
/// again on its next poll.
#[derive(Default)]
pub(crate) struct WakerList {
    wakers: Vec<Waker>,
}

impl WakerList {
    /// Park a consumer's waker, replacing a previous registration from the
    /// same task.
    pub(crate) fn push(&mut self, waker: &Waker) {
        for existing in &mut self.wakers {
            if existing.will_wake(waker) {
                existing.clone_from(waker);
                return;
            }
        }
        self.wakers.push(waker.clone());
    }

    /// Wake every parked consumer and clear the list.
    pub(crate) fn wake_all(&mut self) {
        for waker in self.wakers.drain(..) {
            waker.wake();
        }
    }
}

/// A waker which delegates wake events to every consumer parked on a cell.
///
/// Handed to the inner future of a cell, so that progress made while one
/// consumer drives the future re-wakes all of the consumers waiting on it.
pub(crate) struct BroadcastWaker {
    wakers: Arc<Mutex<WakerList>>,
}

impl BroadcastWaker {
    pub(crate) fn waker(wakers: Arc<Mutex<WakerList>>) -> Waker {
        Waker::from(Arc::new(Self { wakers }))
    }
}

impl Wake for BroadcastWaker {
    fn wake(self: Arc<Self>) {
        self.wakers.lock().unwrap().wake_all();
    }
}

#[cfg(test)]
pub(crate) struct DummyWaker();

#[cfg(test)]
impl Wake for DummyWaker {
    fn wake(self: Arc<Self>) {}
}
