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

//! The Unix-socket read endpoint serving rendered snapshots.

use std::fmt;
use std::fs;
use std::io::{self, Write};
use std::os::unix::fs::PermissionsExt;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use vigil_core::{ClockSource, IdleAggregator, IdleCounterSource, Snapshot};

/// How long the serve loop sleeps between accept polls. Bounds how late a
/// raised shutdown flag is observed.
const ACCEPT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Where and how the endpoint is registered with the host.
#[derive(Debug, Clone)]
pub struct EndpointConfig {
    /// Filesystem path of the listening socket.
    pub path: PathBuf,
    /// Permission bits applied to the socket node after bind, so that
    /// unprivileged callers can read.
    pub mode: u32,
}

/// An error registering the endpoint. Fatal at startup by contract.
#[derive(Debug)]
pub enum EndpointError {
    /// Binding the socket path failed, e.g. the name is taken or its
    /// directory is not writable.
    Bind {
        /// The path that could not be bound.
        path: PathBuf,
        /// The underlying bind error.
        source: io::Error,
    },
    /// The socket bound but could not be made world-readable or
    /// non-blocking; the endpoint would be registered yet unusable.
    Configure {
        /// The path of the partially registered socket.
        path: PathBuf,
        /// The underlying configuration error.
        source: io::Error,
    },
}

impl fmt::Display for EndpointError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointError::Bind { path, source } => {
                write!(f, "failed to bind '{}': {}", path.display(), source)
            }
            EndpointError::Configure { path, source } => {
                write!(f, "failed to configure '{}': {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for EndpointError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EndpointError::Bind { source, .. } => Some(source),
            EndpointError::Configure { source, .. } => Some(source),
        }
    }
}

/// The registered read endpoint.
///
/// Registration is scoped: the listening socket and its filesystem name
/// live exactly as long as this value, and dropping it deregisters the name
/// on every exit path, including startup failure after a partial
/// registration and signal-driven termination.
#[derive(Debug)]
pub struct UptimeEndpoint {
    listener: UnixListener,
    path: PathBuf,
    clock: Arc<dyn ClockSource>,
    idle: IdleAggregator,
}

impl UptimeEndpoint {
    /// Registers the endpoint under the configured name.
    ///
    /// The clock and counter source are consulted once per read request,
    /// never across requests; the endpoint holds no snapshot state.
    pub fn register(
        config: EndpointConfig,
        clock: Arc<dyn ClockSource>,
        counters: Arc<dyn IdleCounterSource>,
    ) -> Result<Self, EndpointError> {
        let listener = UnixListener::bind(&config.path).map_err(|source| EndpointError::Bind {
            path: config.path.clone(),
            source,
        })?;
        // From here on the name exists on disk, so the endpoint value must
        // be constructed (and thus dropped) even if configuration fails.
        let endpoint = Self {
            listener,
            path: config.path,
            clock,
            idle: IdleAggregator::new(counters),
        };
        endpoint.configure(config.mode)?;
        log::info!(
            "[UptimeEndpoint] registered '{}' (mode {:03o}, clock {})",
            endpoint.path.display(),
            config.mode,
            endpoint.clock.clock_id()
        );
        Ok(endpoint)
    }

    fn configure(&self, mode: u32) -> Result<(), EndpointError> {
        let apply = || -> io::Result<()> {
            self.listener.set_nonblocking(true)?;
            fs::set_permissions(&self.path, fs::Permissions::from_mode(mode))
        };
        apply().map_err(|source| EndpointError::Configure {
            path: self.path.clone(),
            source,
        })
    }

    /// Returns the path the endpoint is registered under.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Accepts readers until the shutdown flag is raised.
    ///
    /// Each accepted connection is answered on its own thread with one
    /// freshly computed snapshot, so a slow or aborted reader never stalls
    /// other callers or the accept loop.
    pub fn serve(&self, shutdown: &crate::shutdown::ShutdownFlag) {
        while !shutdown.is_raised() {
            match self.listener.accept() {
                Ok((stream, _addr)) => self.answer(stream),
                Err(err) if err.kind() == io::ErrorKind::WouldBlock => {
                    thread::sleep(ACCEPT_POLL_INTERVAL);
                }
                Err(err) => {
                    log::warn!("[UptimeEndpoint] accept failed: {err}");
                }
            }
        }
        log::info!("[UptimeEndpoint] shutdown requested, leaving serve loop");
    }

    /// Answers one reader with one fresh snapshot.
    fn answer(&self, stream: UnixStream) {
        log::debug!("[UptimeEndpoint] read handle opened");
        let clock = Arc::clone(&self.clock);
        let idle = self.idle.clone();
        let spawned = thread::Builder::new()
            .name("vigil-read".to_string())
            .spawn(move || write_snapshot(stream, clock.as_ref(), &idle));
        if let Err(err) = spawned {
            // The caller simply sees a closed stream; the next read gets a
            // fresh attempt.
            log::warn!("[UptimeEndpoint] could not spawn reader thread: {err}");
        }
    }
}

impl Drop for UptimeEndpoint {
    fn drop(&mut self) {
        match fs::remove_file(&self.path) {
            Ok(()) => log::info!("[UptimeEndpoint] deregistered '{}'", self.path.display()),
            Err(err) => log::warn!(
                "[UptimeEndpoint] failed to unlink '{}': {}",
                self.path.display(),
                err
            ),
        }
    }
}

/// Computes, renders, and writes one snapshot, then closes the stream.
///
/// The stream is dropped on every path out of here, releasing the
/// per-request resources whether the write succeeded or the client went
/// away mid-transfer.
fn write_snapshot(mut stream: UnixStream, clock: &dyn ClockSource, idle: &IdleAggregator) {
    let rendered = Snapshot::capture(clock, idle).render();
    match stream.write_all(rendered.as_bytes()) {
        Ok(()) => log::debug!("[UptimeEndpoint] served {} bytes", rendered.len()),
        Err(err) => log::debug!("[UptimeEndpoint] reader went away: {err}"),
    }
}
