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

//! The scheduler-tick time unit used by per-unit idle counters.

use std::time::Duration;

const NANOS_PER_SEC: u128 = 1_000_000_000;

/// A count of scheduler clock ticks.
///
/// Per-unit idle counters are maintained by the host in ticks; the
/// ticks-per-second ratio is only known to the counter source, so a `Ticks`
/// value carries no ratio of its own and converts to a [`Duration`] on
/// demand.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticks(u64);

impl Ticks {
    /// A zero tick count.
    pub const ZERO: Ticks = Ticks(0);

    /// Wraps a raw tick count.
    pub const fn new(count: u64) -> Self {
        Ticks(count)
    }

    /// Returns the raw tick count.
    pub const fn count(self) -> u64 {
        self.0
    }

    /// Adds two tick counts, saturating at `u64::MAX`.
    ///
    /// The accumulator for an aggregate across all units must never wrap;
    /// saturation keeps the aggregate well-formed even with an absurd unit
    /// count times an absurd uptime.
    pub const fn saturating_add(self, other: Ticks) -> Ticks {
        Ticks(self.0.saturating_add(other.0))
    }

    /// Converts this tick count into a [`Duration`] given the host's
    /// ticks-per-second ratio.
    ///
    /// A zero ratio yields a zero duration rather than dividing by zero; it
    /// can only come from a misbehaving host query and zero is the safe
    /// reading for it.
    pub fn to_duration(self, ticks_per_second: u32) -> Duration {
        if ticks_per_second == 0 {
            return Duration::ZERO;
        }
        let tps = u64::from(ticks_per_second);
        let secs = self.0 / tps;
        let rem = self.0 % tps;
        // rem < tps, so the widened product stays far below u128 limits and
        // the quotient is always a valid sub-second nanosecond count.
        let nanos = (u128::from(rem) * NANOS_PER_SEC / u128::from(tps)) as u32;
        Duration::new(secs, nanos)
    }
}

impl std::fmt::Display for Ticks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ticks", self.0)
    }
}
