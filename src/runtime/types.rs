use bollard::models::{
    ContainerCpuStats, ContainerStateStatusEnum, ContainerStatsResponse, EventMessage,
    EventMessageTypeEnum,
};
use serde::{Deserialize, Serialize};

/// Identity of a container at observation time: its name (unique on the
/// host) and the image it was created from. A snapshot, not a live handle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContainerRef {
    #[serde(rename = "container")]
    pub name: String,
    pub image: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContainerAction {
    Die,
    Stop,
    Start,
    Pause,
    Unpause,
    /// Any other action tag reported by the engine, kept verbatim.
    Other(String),
}

impl From<&str> for ContainerAction {
    fn from(action: &str) -> Self {
        match action {
            "die" => Self::Die,
            "stop" => Self::Stop,
            "start" => Self::Start,
            "pause" => Self::Pause,
            "unpause" => Self::Unpause,
            other => Self::Other(other.to_string()),
        }
    }
}

impl AsRef<str> for ContainerAction {
    fn as_ref(&self) -> &str {
        match self {
            Self::Die => "die",
            Self::Stop => "stop",
            Self::Start => "start",
            Self::Pause => "pause",
            Self::Unpause => "unpause",
            Self::Other(tag) => tag.as_str(),
        }
    }
}

/// A container state transition reported by the engine's event stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LifecycleEvent {
    pub container: ContainerRef,
    pub action: ContainerAction,
    /// Seconds since the Unix epoch, as reported by the event source.
    pub timestamp: i64,
}

impl LifecycleEvent {
    /// Maps a raw engine event to a lifecycle event. Returns `None` for
    /// non-container events and for events whose actor carries no name.
    pub fn from_message(message: EventMessage) -> Option<Self> {
        if message.typ != Some(EventMessageTypeEnum::CONTAINER) {
            return None;
        }

        let action = ContainerAction::from(message.action?.as_str());
        let attributes = message.actor.and_then(|actor| actor.attributes)?;

        let name = match attributes.get("name") {
            Some(name) => name.clone(),
            None => {
                log::debug!("Container event without a name attribute, skipping");
                return None;
            }
        };
        let image = attributes.get("image").cloned().unwrap_or_default();

        let timestamp = message
            .time
            .unwrap_or_else(|| chrono::Utc::now().timestamp());

        Some(LifecycleEvent {
            container: ContainerRef { name, image },
            action,
            timestamp,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContainerState {
    Empty,
    Created,
    Running,
    Paused,
    Restarting,
    Removing,
    Exited,
    Dead,
    // Custom state for containers the engine reports without a status
    Unknown,
}

impl ContainerState {
    pub fn is_running(self) -> bool {
        self == Self::Running
    }
}

impl AsRef<str> for ContainerState {
    fn as_ref(&self) -> &str {
        match self {
            Self::Empty => "empty",
            Self::Created => "created",
            Self::Running => "running",
            Self::Paused => "paused",
            Self::Restarting => "restarting",
            Self::Removing => "removing",
            Self::Exited => "exited",
            Self::Dead => "dead",
            Self::Unknown => "unknown",
        }
    }
}

impl From<ContainerStateStatusEnum> for ContainerState {
    fn from(status: ContainerStateStatusEnum) -> Self {
        match status {
            ContainerStateStatusEnum::EMPTY => Self::Empty,
            ContainerStateStatusEnum::CREATED => Self::Created,
            ContainerStateStatusEnum::RUNNING => Self::Running,
            ContainerStateStatusEnum::PAUSED => Self::Paused,
            ContainerStateStatusEnum::RESTARTING => Self::Restarting,
            ContainerStateStatusEnum::REMOVING => Self::Removing,
            ContainerStateStatusEnum::EXITED => Self::Exited,
            ContainerStateStatusEnum::DEAD => Self::Dead,
        }
    }
}

/// One reading of a container's cumulative CPU counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CpuSample {
    /// Total CPU time consumed by the container, in nanoseconds.
    pub total_usage: u64,
    /// Total CPU time consumed by the whole host, in nanoseconds.
    pub system_usage: u64,
}

impl From<ContainerCpuStats> for CpuSample {
    fn from(stats: ContainerCpuStats) -> Self {
        Self {
            total_usage: stats
                .cpu_usage
                .as_ref()
                .and_then(|usage| usage.total_usage)
                .unwrap_or(0),
            system_usage: stats.system_cpu_usage.unwrap_or(0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemorySample {
    pub usage: u64,
    pub limit: u64,
}

/// Point-in-time resource counters for one container. The engine reports
/// the current CPU sample together with the immediately preceding one, so
/// deltas can be derived without keeping state between polls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub cpu: CpuSample,
    pub precpu: CpuSample,
    pub core_count: u32,
    pub memory: MemorySample,
}

impl From<ContainerStatsResponse> for StatsSnapshot {
    fn from(response: ContainerStatsResponse) -> Self {
        let core_count = response
            .cpu_stats
            .as_ref()
            .and_then(|cpu| {
                cpu.online_cpus.or_else(|| {
                    cpu.cpu_usage
                        .as_ref()
                        .and_then(|usage| usage.percpu_usage.as_ref())
                        .map(|cores| cores.len() as u32)
                })
            })
            .unwrap_or(1);

        let memory = response
            .memory_stats
            .map(|memory| MemorySample {
                usage: memory.usage.unwrap_or(0),
                limit: memory.limit.unwrap_or(0),
            })
            .unwrap_or_default();

        Self {
            cpu: response.cpu_stats.map(CpuSample::from).unwrap_or_default(),
            precpu: response
                .precpu_stats
                .map(CpuSample::from)
                .unwrap_or_default(),
            core_count,
            memory,
        }
    }
}
