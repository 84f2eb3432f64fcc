//! Scripted runtime for tests.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use futures_util::{StreamExt, stream};

use super::types::{ContainerState, LifecycleEvent, StatsSnapshot};
use super::{ContainerRuntime, EventStream, RuntimeError};

/// In-memory [`ContainerRuntime`] with canned answers. Each subscription
/// pops the next scripted event stream; once the script runs out, further
/// subscriptions hang forever. Poll calls count concurrent callers so tests
/// can assert on the fan-out width.
pub struct FakeRuntime {
    event_streams: Mutex<VecDeque<EventStream>>,
    subscriptions: AtomicUsize,
    containers: Mutex<Result<Vec<String>, RuntimeError>>,
    states: Mutex<HashMap<String, Result<ContainerState, RuntimeError>>>,
    stats: Mutex<HashMap<String, Result<StatsSnapshot, RuntimeError>>>,
    poll_delay: Mutex<Duration>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// Event stream that ends after the scripted items.
pub fn scripted_events(items: Vec<Result<LifecycleEvent, RuntimeError>>) -> EventStream {
    stream::iter(items).boxed()
}

/// Event stream that delivers the scripted items and then stays open
/// without ever yielding again.
pub fn scripted_events_then_hang(items: Vec<Result<LifecycleEvent, RuntimeError>>) -> EventStream {
    stream::iter(items).chain(stream::pending()).boxed()
}

impl FakeRuntime {
    pub fn new() -> Self {
        Self {
            event_streams: Mutex::new(VecDeque::new()),
            subscriptions: AtomicUsize::new(0),
            containers: Mutex::new(Ok(Vec::new())),
            states: Mutex::new(HashMap::new()),
            stats: Mutex::new(HashMap::new()),
            poll_delay: Mutex::new(Duration::ZERO),
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    pub fn push_event_stream(&self, stream: EventStream) {
        self.event_streams.lock().unwrap().push_back(stream);
    }

    pub fn set_containers(&self, names: &[&str]) {
        let names = names.iter().map(|name| name.to_string()).collect();
        *self.containers.lock().unwrap() = Ok(names);
    }

    pub fn fail_list(&self, error: RuntimeError) {
        *self.containers.lock().unwrap() = Err(error);
    }

    pub fn set_state(&self, name: &str, state: ContainerState) {
        self.states.lock().unwrap().insert(name.to_string(), Ok(state));
    }

    pub fn fail_state(&self, name: &str, error: RuntimeError) {
        self.states.lock().unwrap().insert(name.to_string(), Err(error));
    }

    pub fn set_stats(&self, name: &str, snapshot: StatsSnapshot) {
        self.stats.lock().unwrap().insert(name.to_string(), Ok(snapshot));
    }

    pub fn fail_stats(&self, name: &str, error: RuntimeError) {
        self.stats.lock().unwrap().insert(name.to_string(), Err(error));
    }

    /// Makes every state/stats call park for `delay` while counted as in
    /// flight, so concurrency limits become observable.
    pub fn set_poll_delay(&self, delay: Duration) {
        *self.poll_delay.lock().unwrap() = delay;
    }

    pub fn subscription_count(&self) -> usize {
        self.subscriptions.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    async fn tracked<T>(&self, result: Result<T, RuntimeError>) -> Result<T, RuntimeError> {
        let in_flight = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(in_flight, Ordering::SeqCst);

        let delay = *self.poll_delay.lock().unwrap();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }
}

#[async_trait]
impl ContainerRuntime for FakeRuntime {
    fn subscribe_events(&self) -> EventStream {
        self.subscriptions.fetch_add(1, Ordering::SeqCst);
        match self.event_streams.lock().unwrap().pop_front() {
            Some(stream) => stream,
            None => stream::pending().boxed(),
        }
    }

    async fn list_running_containers(&self) -> Result<Vec<String>, RuntimeError> {
        self.containers.lock().unwrap().clone()
    }

    async fn container_state(&self, name: &str) -> Result<ContainerState, RuntimeError> {
        let result = self
            .states
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or(Err(RuntimeError::NotFound));
        self.tracked(result).await
    }

    async fn container_stats(&self, name: &str) -> Result<StatsSnapshot, RuntimeError> {
        let result = self
            .stats
            .lock()
            .unwrap()
            .get(name)
            .cloned()
            .unwrap_or(Err(RuntimeError::NotFound));
        self.tracked(result).await
    }
}
