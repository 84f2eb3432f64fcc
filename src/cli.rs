use std::net::SocketAddr;

use clap::Parser;

/// Observes the containers of a single Docker host: lifecycle alarms in
/// the log, resource metrics over HTTP.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Address the metrics API listens on.
    #[arg(long, default_value = "0.0.0.0:8080")]
    pub bind: SocketAddr,

    /// Maximum number of containers polled concurrently during a bulk poll.
    #[arg(long, default_value_t = 25)]
    pub max_poll_concurrency: usize,

    /// Timeout in seconds for each call to the container runtime.
    #[arg(long, default_value_t = 3)]
    pub runtime_timeout_secs: u64,
}
