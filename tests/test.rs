use core::future::Future;
use core::pin::Pin;
use core::task::{Context, Poll};

use defer_set::{DeferSet, Key, Settlement, Token};
use futures_lite::future::{block_on, poll_once, zip};

/// A future which is ready only after being polled `remaining` times,
/// standing in for independently-timed work.
struct Countdown<T> {
    remaining: usize,
    value: Option<T>,
}

impl<T> Countdown<T> {
    fn new(remaining: usize, value: T) -> Self {
        Self {
            remaining,
            value: Some(value),
        }
    }
}

impl<T: Unpin> Future for Countdown<T> {
    type Output = T;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.get_mut();
        if this.remaining == 0 {
            Poll::Ready(this.value.take().expect("countdown polled after completion"))
        } else {
            this.remaining -= 1;
            cx.waker().wake_by_ref();
            Poll::Pending
        }
    }
}

#[test]
fn all_maps_keys_to_values_regardless_of_completion_order() {
    block_on(async {
        let mut set = DeferSet::<&str, &str>::new();
        set.register_keyed(Countdown::new(8, Ok("A")), "x");
        set.register_keyed(Countdown::new(4, Ok("B")), "y");
        set.register_keyed(Countdown::new(0, Ok("C")), "z");

        let values = set.all().await.unwrap();
        assert_eq!(values.len(), 3);
        assert_eq!(values[&Key::from("x")], "A");
        assert_eq!(values[&Key::from("y")], "B");
        assert_eq!(values[&Key::from("z")], "C");
        assert_eq!(
            values.keys().cloned().collect::<Vec<_>>(),
            vec![Key::from("x"), Key::from("y"), Key::from("z")]
        );
    });
}

#[test]
fn unkeyed_entries_fall_back_to_ordinals() {
    block_on(async {
        let mut set = DeferSet::<u32, &str>::new();
        for n in 0..4u32 {
            set.register(Countdown::new(n as usize, Ok(n)));
        }

        let values = set.all().await.unwrap();
        assert_eq!(
            values.keys().map(ToString::to_string).collect::<Vec<_>>(),
            vec!["0", "1", "2", "3"]
        );
        for (key, value) in &values {
            assert_eq!(key, &Key::Index(u64::from(*value)));
        }
    });
}

#[test]
fn all_fails_with_the_exact_reason() {
    block_on(async {
        let mut set = DeferSet::<&str, &str>::new();
        set.register_keyed(Countdown::new(1, Ok("A")), "x");
        set.register_keyed(Countdown::new(2, Ok("B")), "y");
        set.register_keyed(async { Err("this failure is intentional") }, "z");

        assert_eq!(set.all().await, Err("this failure is intentional"));
    });
}

#[test]
fn all_settled_reports_every_outcome() {
    block_on(async {
        let mut set = DeferSet::<&str, &str>::new();
        set.register(Countdown::new(2, Ok("A")));
        set.register(Countdown::new(1, Err("first failure")));
        set.register(Countdown::new(0, Ok("B")));
        set.register(async { Err("second failure") });

        let outcomes = set.all_settled().await;
        let rejected = outcomes.values().filter(|s| s.is_rejected()).count();
        assert_eq!(rejected, 2);
        assert_eq!(outcomes.len(), 4);
        assert_eq!(outcomes[&Key::Index(0)], Settlement::Fulfilled("A"));
        assert_eq!(outcomes[&Key::Index(1)], Settlement::Rejected("first failure"));
        assert_eq!(outcomes[&Key::Index(1)].status(), "rejected");
        assert_eq!(outcomes[&Key::Index(2)].status(), "fulfilled");
    });
}

#[test]
fn race_adopts_the_first_settlement() {
    block_on(async {
        let mut set = DeferSet::<&str, &str>::new();
        set.register(Countdown::new(10, Ok("slow")));
        set.register(Countdown::new(0, Ok("fast")));
        set.register(Countdown::new(20, Ok("slowest")));

        assert_eq!(set.race().await, Ok("fast"));
    });
}

#[test]
fn race_adopts_a_first_failure_too() {
    block_on(async {
        let mut set = DeferSet::<&str, &str>::new();
        set.register(Countdown::new(10, Ok("slow")));
        set.register(Countdown::new(0, Err("fast failure")));

        assert_eq!(set.race().await, Err("fast failure"));
    });
}

#[test]
fn any_skips_failures_while_success_is_possible() {
    block_on(async {
        let mut set = DeferSet::<&str, &str>::new();
        // The failure settles well before the success does.
        set.register(Countdown::new(0, Err("early failure")));
        set.register(Countdown::new(6, Ok("late success")));

        assert_eq!(set.any().await.unwrap(), "late success");
    });
}

#[test]
fn any_bundles_every_reason_once_all_fail() {
    block_on(async {
        let mut set = DeferSet::<&str, &str>::new();
        set.register(Countdown::new(3, Err("one")));
        set.register(Countdown::new(0, Err("two")));
        set.register(Countdown::new(1, Err("three")));

        let err = set.any().await.unwrap_err();
        assert_eq!(err.into_reasons(), vec!["one", "two", "three"]);
    });
}

#[test]
fn resolver_passes_the_value_through() {
    block_on(async {
        let mut set = DeferSet::<&str, &str>::new();
        let resolver = set.defer();

        let chained = async move {
            let value = resolver.resolve("payload");
            // the downstream consumer keeps working with the same value
            value.len()
        };

        let (len, values) = zip(chained, set.all()).await;
        assert_eq!(len, 7);
        assert_eq!(values.unwrap()[&Key::Index(0)], "payload");
    });
}

#[test]
fn resolver_settles_race_and_any() {
    block_on(async {
        let mut set = DeferSet::<&str, &str>::new();
        set.register(Countdown::new(50, Ok("slow")));
        let resolver = set.defer_keyed("manual");

        let upstream = async move { resolver.resolve("manual value") };
        let (_, winner) = zip(upstream, set.race()).await;
        assert_eq!(winner, Ok("manual value"));
        assert_eq!(set.any().await.unwrap(), "manual value");
    });
}

#[test]
fn dropped_resolver_leaves_aggregates_pending() {
    block_on(async {
        let mut set = DeferSet::<&str, &str>::new();
        set.register(async { Ok("done") });
        let resolver = set.defer_keyed("never");
        drop(resolver);

        // The unresolved entry has no failure path, so `all` cannot settle.
        assert_eq!(poll_once(set.all()).await, None);
        assert_eq!(poll_once(set.all_settled()).await, None);
        // Policies that don't need every entry still can.
        assert_eq!(set.race().await, Ok("done"));
        assert_eq!(set.any().await.unwrap(), "done");
    });
}

#[test]
fn aggregating_twice_yields_equivalent_results() {
    block_on(async {
        let mut set = DeferSet::<&str, &str>::new();
        set.register_keyed(Countdown::new(2, Ok("A")), "x");
        set.register_keyed(Countdown::new(5, Ok("B")), "y");

        let (first, second) = zip(set.all(), set.all()).await;
        assert_eq!(first, second);

        // And again after everything has already settled.
        let third = set.all().await;
        assert_eq!(first, third);
    });
}

#[test]
fn aggregation_snapshots_the_current_entries() {
    block_on(async {
        let mut set = DeferSet::<&str, &str>::new();
        set.register_keyed(async { Ok("early") }, "a");
        let early = set.all();

        set.register_keyed(async { Ok("late") }, "b");

        let late_values = set.all().await.unwrap();
        assert_eq!(late_values.len(), 2);

        let early_values = early.await.unwrap();
        assert_eq!(early_values.len(), 1);
        assert!(!early_values.contains_key(&Key::from("b")));
    });
}

#[test]
fn concurrent_aggregates_share_the_same_entries() {
    block_on(async {
        let mut set = DeferSet::<&str, &str>::new();
        set.register(Countdown::new(3, Ok("a")));
        set.register(Countdown::new(1, Ok("b")));

        let (values, winner) = zip(set.all(), set.race()).await;
        let values = values.unwrap();
        assert_eq!(values[&Key::Index(0)], "a");
        assert_eq!(values[&Key::Index(1)], "b");
        assert_eq!(winner, Ok("b"));
    });
}

#[test]
fn token_keys_stay_distinct() {
    block_on(async {
        let mut set = DeferSet::<u32, &str>::new();
        let a = Token::new();
        let b = Token::new();
        set.register_keyed(async { Ok(1) }, a);
        set.register_keyed(async { Ok(2) }, b);

        let values = set.all().await.unwrap();
        assert_eq!(values.len(), 2);
        assert_eq!(values[&Key::from(a)], 1);
        assert_eq!(values[&Key::from(b)], 2);
    });
}
