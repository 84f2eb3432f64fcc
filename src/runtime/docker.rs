//! Docker Engine implementation of the runtime facade, using bollard.
//!
//! Every unary call runs under the configured deadline. The event
//! subscription is long-lived and exempt; transport failures there surface
//! as [`RuntimeError::StreamInterrupted`] items on the stream.

use std::collections::HashMap;
use std::future::Future;
use std::time::Duration;

use async_trait::async_trait;
use bollard::Docker;
use bollard::query_parameters::{
    EventsOptions, EventsOptionsBuilder, InspectContainerOptions, InspectContainerOptionsBuilder,
    ListContainersOptions, ListContainersOptionsBuilder, StatsOptions, StatsOptionsBuilder,
};
use futures_util::{StreamExt, future};

use super::types::{ContainerState, LifecycleEvent, StatsSnapshot};
use super::{ContainerRuntime, EventStream, RuntimeError};

pub struct DockerRuntime {
    docker: Docker,
    deadline: Duration,
}

impl DockerRuntime {
    pub fn new(docker: Docker, deadline: Duration) -> Self {
        Self { docker, deadline }
    }

    async fn timed<T>(
        &self,
        call: impl Future<Output = Result<T, bollard::errors::Error>>,
    ) -> Result<T, RuntimeError> {
        match tokio::time::timeout(self.deadline, call).await {
            Ok(result) => result.map_err(map_docker_error),
            Err(_) => Err(RuntimeError::Timeout),
        }
    }
}

fn map_docker_error(error: bollard::errors::Error) -> RuntimeError {
    match error {
        bollard::errors::Error::DockerResponseServerError {
            status_code: 404, ..
        } => RuntimeError::NotFound,
        bollard::errors::Error::RequestTimeoutError => RuntimeError::Timeout,
        other => RuntimeError::Unavailable(other.to_string()),
    }
}

#[async_trait]
impl ContainerRuntime for DockerRuntime {
    fn subscribe_events(&self) -> EventStream {
        let mut filters = HashMap::new();
        filters.insert("type".to_string(), vec!["container".to_string()]);
        let options: EventsOptions = EventsOptionsBuilder::new().filters(&filters).build();

        // The engine already filters by object type; from_message drops
        // anything else that slips through.
        self.docker
            .events(Some(options))
            .filter_map(|message| {
                let item = match message {
                    Ok(event) => LifecycleEvent::from_message(event).map(Ok),
                    Err(e) => Some(Err(RuntimeError::StreamInterrupted(e.to_string()))),
                };
                future::ready(item)
            })
            .boxed()
    }

    async fn list_running_containers(&self) -> Result<Vec<String>, RuntimeError> {
        let options: ListContainersOptions = ListContainersOptionsBuilder::new().build();

        let summaries = self
            .timed(self.docker.list_containers(Some(options)))
            .await?;

        // The engine reports names with a leading slash.
        Ok(summaries
            .into_iter()
            .filter_map(|summary| {
                let name = summary.names?.into_iter().next()?;
                Some(name.trim_start_matches('/').to_string())
            })
            .collect())
    }

    async fn container_state(&self, name: &str) -> Result<ContainerState, RuntimeError> {
        let options: InspectContainerOptions = InspectContainerOptionsBuilder::new().build();

        let info = self
            .timed(self.docker.inspect_container(name, Some(options)))
            .await?;

        Ok(info
            .state
            .and_then(|state| state.status)
            .map(ContainerState::from)
            .unwrap_or(ContainerState::Unknown))
    }

    async fn container_stats(&self, name: &str) -> Result<StatsSnapshot, RuntimeError> {
        // stream=false makes the engine take the two CPU samples itself and
        // respond once, with precpu populated.
        let options: StatsOptions = StatsOptionsBuilder::new()
            .stream(false)
            .one_shot(false)
            .build();

        let mut stats = self.docker.stats(name, Some(options));

        let response = match tokio::time::timeout(self.deadline, stats.next()).await {
            Ok(Some(result)) => result.map_err(map_docker_error)?,
            Ok(None) => {
                return Err(RuntimeError::Unavailable(
                    "empty stats response".to_string(),
                ));
            }
            Err(_) => return Err(RuntimeError::Timeout),
        };

        log::debug!("Raw statistics for {}: {:?}", name, response);

        Ok(StatsSnapshot::from(response))
    }
}
