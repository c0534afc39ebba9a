// Copyright 2025 eraflo
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! `vigild` — serves the host's uptime and aggregate idle time as a
//! two-field fixed-point snapshot over a Unix socket.

use anyhow::Context;
use std::sync::Arc;
use vigil_core::{ClockSource, IdleCounterSource};
use vigil_infra::{BootClock, EndpointConfig, ProcStatIdleSource, ShutdownFlag, UptimeEndpoint};

/// Fixed name the endpoint is registered under. Not configurable.
const SOCKET_PATH: &str = "/run/vigild.sock";

/// World-readable socket node, the moral equivalent of a 0444 procfs entry.
const SOCKET_MODE: u32 = 0o666;

/// Exit status for a failed endpoint registration, distinct from the
/// generic panic/abort statuses so operators can tell it apart.
const EXIT_REGISTRATION_FAILED: i32 = 2;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        log::error!("[vigild] startup failed: {err:#}");
        std::process::exit(EXIT_REGISTRATION_FAILED);
    }
    log::info!("[vigild] stopped");
}

fn run() -> anyhow::Result<()> {
    log::info!("[vigild] starting");

    let shutdown = ShutdownFlag::new();
    shutdown
        .install_signal_handlers()
        .context("installing signal handlers")?;

    let clock: Arc<dyn ClockSource> = Arc::new(BootClock::new());
    let counters: Arc<dyn IdleCounterSource> = Arc::new(ProcStatIdleSource::new());

    let endpoint = UptimeEndpoint::register(
        EndpointConfig {
            path: SOCKET_PATH.into(),
            mode: SOCKET_MODE,
        },
        clock,
        counters,
    )
    .context("registering the uptime endpoint")?;

    endpoint.serve(&shutdown);
    // Dropping the endpoint deregisters the socket name.
    Ok(())
}
