use super::record::AlarmRecord;

/// Destination for alarm records. Each record is handed over exactly once;
/// there is no retry, delivery beyond this point is the sink's concern.
pub trait AlarmSink: Send + Sync {
    fn emit(&self, record: &AlarmRecord);
}

/// Writes each alarm to the log as a single JSON line.
pub struct LogAlarmSink;

impl AlarmSink for LogAlarmSink {
    fn emit(&self, record: &AlarmRecord) {
        match serde_json::to_string(record) {
            Ok(json) => log::info!("Alarm raised: {}", json),
            Err(e) => log::error!("Failed to serialize alarm record: {}", e),
        }
    }
}
