use std::sync::Arc;
use std::time::Duration;

use futures_util::StreamExt;
use tokio::task::JoinHandle;

use super::record::AlarmRecord;
use super::sink::AlarmSink;
use crate::runtime::{ContainerRuntime, EventStream, LifecycleEvent};

const RECONNECT_BASE_DELAY: Duration = Duration::from_millis(250);
const RECONNECT_MAX_DELAY: Duration = Duration::from_secs(30);

/// Watches the container event stream for the life of the process and
/// turns every watched state transition into one alarm record.
///
/// The subscription is expected to break now and then; the monitor logs the
/// failure and opens a new one, backing off while the runtime stays
/// unreachable. It never exits on its own.
pub struct AlarmMonitor<R> {
    runtime: Arc<R>,
    sink: Arc<dyn AlarmSink>,
}

enum StreamState {
    /// `attempt` consecutive subscriptions have failed without delivering
    /// an event; zero means no backoff is due.
    Reconnecting { attempt: u32 },
    Subscribed { stream: EventStream, attempt: u32 },
}

fn reconnect_delay(attempt: u32) -> Duration {
    let shift = attempt.saturating_sub(1).min(16);
    RECONNECT_BASE_DELAY
        .saturating_mul(1 << shift)
        .min(RECONNECT_MAX_DELAY)
}

impl<R: ContainerRuntime + 'static> AlarmMonitor<R> {
    pub fn new(runtime: Arc<R>, sink: Arc<dyn AlarmSink>) -> Self {
        Self { runtime, sink }
    }

    /// Spawns the monitoring loop. Consumes the monitor, so there is
    /// exactly one loop per instance.
    pub fn start(self) -> JoinHandle<()> {
        tokio::spawn(self.run())
    }

    async fn run(self) {
        // TODO align alarms with the containers already down at startup.
        let mut state = StreamState::Reconnecting { attempt: 0 };

        loop {
            state = match state {
                StreamState::Reconnecting { attempt } => {
                    if attempt > 0 {
                        let delay = reconnect_delay(attempt);
                        log::info!(
                            "Resubscribing to container events in {:?} (attempt {})",
                            delay,
                            attempt
                        );
                        tokio::time::sleep(delay).await;
                    } else {
                        log::info!("Subscribing to container events");
                    }
                    StreamState::Subscribed {
                        stream: self.runtime.subscribe_events(),
                        attempt,
                    }
                }
                StreamState::Subscribed { mut stream, attempt } => match stream.next().await {
                    Some(Ok(event)) => {
                        self.handle_event(event);
                        // A delivered event proves the subscription works.
                        StreamState::Subscribed { stream, attempt: 0 }
                    }
                    Some(Err(error)) => {
                        log::error!("Communication with the container runtime failed: {}", error);
                        StreamState::Reconnecting {
                            attempt: attempt + 1,
                        }
                    }
                    None => {
                        log::warn!("Container event stream ended unexpectedly");
                        StreamState::Reconnecting {
                            attempt: attempt + 1,
                        }
                    }
                },
            };
        }
    }

    fn handle_event(&self, event: LifecycleEvent) {
        log::debug!(
            "Container {} reported action {}",
            event.container.name,
            event.action.as_ref()
        );
        if let Some(record) = AlarmRecord::from_event(event) {
            self.sink.emit(&record);
        }
    }
}
