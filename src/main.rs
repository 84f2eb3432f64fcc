use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

mod alarms;
mod api;
mod cli;
mod metrics;
mod runtime;

use alarms::{AlarmMonitor, LogAlarmSink};
use metrics::MetricsCollector;
use runtime::DockerRuntime;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    env_logger::init();

    let args = cli::Args::parse();

    let docker = bollard::Docker::connect_with_local_defaults()?;
    let runtime = Arc::new(DockerRuntime::new(
        docker,
        Duration::from_secs(args.runtime_timeout_secs),
    ));

    let monitor = AlarmMonitor::new(Arc::clone(&runtime), Arc::new(LogAlarmSink));
    let _monitor_task = monitor.start();

    let collector = Arc::new(MetricsCollector::new(runtime, args.max_poll_concurrency));

    tokio::select! {
        result = api::serve(args.bind, collector) => result,
        _ = tokio::signal::ctrl_c() => {
            log::info!("Received shutdown signal, exiting");
            Ok(())
        }
    }
}
