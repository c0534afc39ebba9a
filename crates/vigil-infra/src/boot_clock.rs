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

//! `CLOCK_BOOTTIME`-based implementation of the [`ClockSource`] trait.

use std::borrow::Cow;
use std::time::Duration;
use vigil_core::ClockSource;

/// A clock that reads the host's boot-time clock.
///
/// `CLOCK_BOOTTIME` is monotonic and, unlike `CLOCK_MONOTONIC`, keeps
/// counting across suspend, which matches what the kernel reports as
/// uptime. Wall-clock adjustments never affect it.
#[derive(Debug, Clone, Copy, Default)]
pub struct BootClock;

impl BootClock {
    /// Creates a new boot-time clock.
    pub fn new() -> Self {
        BootClock
    }
}

impl ClockSource for BootClock {
    fn clock_id(&self) -> Cow<'static, str> {
        Cow::Borrowed("clock-boottime")
    }

    fn uptime(&self) -> Duration {
        let mut ts = libc::timespec {
            tv_sec: 0,
            tv_nsec: 0,
        };
        // SAFETY: `ts` outlives the call and `CLOCK_BOOTTIME` is a valid
        // clock id on this platform.
        let rc = unsafe { libc::clock_gettime(libc::CLOCK_BOOTTIME, &mut ts) };
        if rc != 0 {
            // An unreadable monotonic clock is an unrecoverable host fault,
            // not an error this system can handle.
            panic!(
                "clock_gettime(CLOCK_BOOTTIME) failed: {}",
                std::io::Error::last_os_error()
            );
        }
        Duration::new(ts.tv_sec as u64, ts.tv_nsec as u32)
    }
}
