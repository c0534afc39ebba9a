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

//! Cooperative shutdown flag, optionally driven by process signals.

use std::io;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Set by the signal handler; merged into every flag's `is_raised`.
static SIGNALED: AtomicBool = AtomicBool::new(false);

extern "C" fn on_signal(_signum: libc::c_int) {
    SIGNALED.store(true, Ordering::SeqCst);
}

/// A flag that serve loops poll to learn when to stop.
///
/// The flag can be raised locally (tests, embedding code) or by SIGINT /
/// SIGTERM once [`install_signal_handlers`](Self::install_signal_handlers)
/// has run. Signal delivery is process-wide, so the signal side of the flag
/// is shared by every instance.
#[derive(Debug, Clone, Default)]
pub struct ShutdownFlag {
    local: Arc<AtomicBool>,
}

impl ShutdownFlag {
    /// Creates a lowered flag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Routes SIGINT and SIGTERM into this flag.
    pub fn install_signal_handlers(&self) -> io::Result<()> {
        for signum in [libc::SIGINT, libc::SIGTERM] {
            // SAFETY: the handler only performs an atomic store, which is
            // async-signal-safe.
            let previous = unsafe { libc::signal(signum, on_signal as libc::sighandler_t) };
            if previous == libc::SIG_ERR {
                return Err(io::Error::last_os_error());
            }
        }
        log::debug!("[ShutdownFlag] SIGINT/SIGTERM handlers installed");
        Ok(())
    }

    /// Raises the flag.
    pub fn raise(&self) {
        self.local.store(true, Ordering::SeqCst);
    }

    /// Returns whether shutdown has been requested.
    pub fn is_raised(&self) -> bool {
        self.local.load(Ordering::SeqCst) || SIGNALED.load(Ordering::SeqCst)
    }
}
