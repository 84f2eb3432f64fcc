//! Container lifecycle alarms.
//!
//! A background monitor subscribes to the engine's event stream and turns
//! every watched state transition (die, stop, start, pause, unpause) into
//! one structured alarm record, emitted through a sink.

pub mod monitor;
pub mod record;
pub mod sink;

pub use monitor::AlarmMonitor;
pub use sink::LogAlarmSink;
