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

//! Capability trait for reading the host's monotonic uptime.

use std::borrow::Cow;
use std::fmt::Debug;
use std::time::Duration;

/// A source of elapsed-time-since-boot readings.
///
/// Implementations must be backed by a monotonic clock: the value returned
/// by [`uptime`](ClockSource::uptime) never decreases across calls within a
/// single process lifetime, regardless of wall-clock adjustments (manual
/// sets, NTP slew, time-zone changes).
///
/// Reading the clock is infallible by contract. A host whose monotonic
/// clock cannot be read is broken in a way this system cannot recover from,
/// so implementations panic rather than surface an error.
pub trait ClockSource: Send + Sync + Debug {
    /// Returns a unique, human-readable identifier for this clock instance.
    fn clock_id(&self) -> Cow<'static, str>;

    /// Returns the elapsed monotonic time since the host became operational.
    fn uptime(&self) -> Duration;
}
