use serde::Serialize;

use crate::runtime::{ContainerAction, ContainerRef, LifecycleEvent};

pub const ALARM_NAMESPACE: &str = "dockwatch.docker.container";
pub const ALARM_DOMAIN: &str = "docker container status change";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Severity {
    Clear,
    Major,
}

/// One alarm, derived from exactly one lifecycle event. Records carry no
/// identity beyond their content; they are log entries, not stateful
/// objects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmRecord {
    pub namespace: &'static str,
    pub domain: &'static str,
    pub event_timestamp: i64,
    pub description: &'static str,
    pub severity: Severity,
    pub primary_subject: ContainerRef,
}

impl AlarmRecord {
    /// Classifies a lifecycle event. Actions outside the watched set are
    /// not alarm-worthy and yield `None`.
    pub fn from_event(event: LifecycleEvent) -> Option<Self> {
        let (description, severity) = match event.action {
            ContainerAction::Die | ContainerAction::Stop => {
                ("container went down", Severity::Major)
            }
            ContainerAction::Start => ("container went up", Severity::Clear),
            ContainerAction::Pause => ("container processes were paused", Severity::Major),
            ContainerAction::Unpause => ("container processes were unpaused", Severity::Clear),
            ContainerAction::Other(_) => return None,
        };

        Some(Self {
            namespace: ALARM_NAMESPACE,
            domain: ALARM_DOMAIN,
            event_timestamp: event.timestamp,
            description,
            severity,
            primary_subject: event.container,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(action: &str) -> LifecycleEvent {
        LifecycleEvent {
            container: ContainerRef {
                name: "web".to_string(),
                image: "nginx:latest".to_string(),
            },
            action: ContainerAction::from(action),
            timestamp: 1_700_000_000,
        }
    }

    #[test]
    fn test_die_and_stop_classify_as_went_down() {
        for action in ["die", "stop"] {
            let record = AlarmRecord::from_event(event(action)).unwrap();
            assert_eq!(record.description, "container went down");
            assert_eq!(record.severity, Severity::Major);
        }
    }

    #[test]
    fn test_start_classifies_as_went_up() {
        let record = AlarmRecord::from_event(event("start")).unwrap();
        assert_eq!(record.description, "container went up");
        assert_eq!(record.severity, Severity::Clear);
    }

    #[test]
    fn test_pause_classifies_as_major() {
        let record = AlarmRecord::from_event(event("pause")).unwrap();
        assert_eq!(record.description, "container processes were paused");
        assert_eq!(record.severity, Severity::Major);
    }

    #[test]
    fn test_unpause_classifies_as_clear() {
        let record = AlarmRecord::from_event(event("unpause")).unwrap();
        assert_eq!(record.description, "container processes were unpaused");
        assert_eq!(record.severity, Severity::Clear);
    }

    #[test]
    fn test_other_actions_produce_no_alarm() {
        for action in ["create", "destroy", "restart", "exec_create", "attach"] {
            assert!(AlarmRecord::from_event(event(action)).is_none(), "{action}");
        }
    }

    #[test]
    fn test_record_carries_event_fields() {
        let record = AlarmRecord::from_event(event("die")).unwrap();
        assert_eq!(record.namespace, ALARM_NAMESPACE);
        assert_eq!(record.domain, ALARM_DOMAIN);
        assert_eq!(record.event_timestamp, 1_700_000_000);
        assert_eq!(record.primary_subject.name, "web");
        assert_eq!(record.primary_subject.image, "nginx:latest");
    }

    #[test]
    fn test_record_wire_shape() {
        let value = serde_json::to_value(AlarmRecord::from_event(event("die")).unwrap()).unwrap();

        assert_eq!(value["namespace"], "dockwatch.docker.container");
        assert_eq!(value["domain"], "docker container status change");
        assert_eq!(value["eventTimestamp"], 1_700_000_000);
        assert_eq!(value["description"], "container went down");
        assert_eq!(value["severity"], "Major");
        assert_eq!(value["primarySubject"]["container"], "web");
        assert_eq!(value["primarySubject"]["image"], "nginx:latest");
    }
}
