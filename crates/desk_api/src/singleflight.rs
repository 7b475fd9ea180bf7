//! In-flight request registry.
//!
//! Concurrent callers asking for the same key share the first caller's work instead of each
//! issuing their own request. If the leading caller unwinds without a result, waiters fall back
//! to running their own closure.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(PoisonError::into_inner)
}

enum FlightState<V> {
    Pending,
    Done(V),
    Abandoned,
}

struct Flight<V> {
    state: Mutex<FlightState<V>>,
    ready: Condvar,
    waiters: AtomicUsize,
}

pub struct SingleFlight<K, V> {
    flights: Mutex<HashMap<K, Arc<Flight<V>>>>,
}

impl<K, V> Default for SingleFlight<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> SingleFlight<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new() -> Self {
        SingleFlight {
            flights: Mutex::new(HashMap::new()),
        }
    }

    /// Run `work` for `key`, or wait for the identical call already in progress.
    pub fn run(&self, key: K, work: impl FnOnce() -> V) -> V {
        let (flight, leader) = {
            let mut flights = lock(&self.flights);
            match flights.get(&key) {
                Some(existing) => (Arc::clone(existing), false),
                None => {
                    let flight = Arc::new(Flight {
                        state: Mutex::new(FlightState::Pending),
                        ready: Condvar::new(),
                        waiters: AtomicUsize::new(0),
                    });
                    flights.insert(key.clone(), Arc::clone(&flight));
                    (flight, true)
                }
            }
        };

        if !leader {
            flight.waiters.fetch_add(1, Ordering::SeqCst);
            let mut state = lock(&flight.state);
            loop {
                if let FlightState::Done(value) = &*state {
                    return value.clone();
                }
                if matches!(*state, FlightState::Abandoned) {
                    break;
                }
                state = flight
                    .ready
                    .wait(state)
                    .unwrap_or_else(PoisonError::into_inner);
            }
            drop(state);
            tracing::debug!("in-flight leader abandoned; running own request");
            return work();
        }

        let guard = LeaderGuard {
            registry: self,
            key,
            flight,
            settled: false,
        };
        let value = work();
        guard.complete(value.clone());
        value
    }

    /// Keys with a request currently in progress.
    pub fn in_flight(&self) -> usize {
        lock(&self.flights).len()
    }

    /// Callers currently waiting on the request for `key`.
    pub fn waiters(&self, key: &K) -> usize {
        lock(&self.flights)
            .get(key)
            .map(|f| f.waiters.load(Ordering::SeqCst))
            .unwrap_or(0)
    }
}

struct LeaderGuard<'a, K, V>
where
    K: Eq + Hash,
{
    registry: &'a SingleFlight<K, V>,
    key: K,
    flight: Arc<Flight<V>>,
    settled: bool,
}

impl<K, V> LeaderGuard<'_, K, V>
where
    K: Eq + Hash,
{
    fn complete(mut self, value: V) {
        self.settle(FlightState::Done(value));
    }

    fn settle(&mut self, outcome: FlightState<V>) {
        self.settled = true;
        *lock(&self.flight.state) = outcome;
        self.flight.ready.notify_all();

        let mut flights = lock(&self.registry.flights);
        if flights
            .get(&self.key)
            .is_some_and(|f| Arc::ptr_eq(f, &self.flight))
        {
            flights.remove(&self.key);
        }
    }
}

impl<K, V> Drop for LeaderGuard<'_, K, V>
where
    K: Eq + Hash,
{
    fn drop(&mut self) {
        if !self.settled {
            self.settle(FlightState::Abandoned);
        }
    }
}
