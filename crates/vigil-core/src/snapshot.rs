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

//! The uptime/idle snapshot value and its fixed textual rendering.

use crate::clock::ClockSource;
use crate::idle::IdleAggregator;
use std::time::Duration;

/// Nanoseconds per hundredth of a second, the display resolution.
const NANOS_PER_HUNDREDTH: u32 = 10_000_000;

/// One observation of the paired (uptime, aggregate idle) durations.
///
/// A snapshot is produced fresh for every read request and discarded after
/// rendering; it has no identity and is never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Snapshot {
    /// Monotonic elapsed time since the host became operational.
    pub uptime: Duration,
    /// Cumulative idle time summed across all processing units.
    pub aggregate_idle: Duration,
}

impl Snapshot {
    /// Captures a fresh snapshot from the given clock and aggregator.
    pub fn capture(clock: &dyn ClockSource, idle: &IdleAggregator) -> Self {
        Self {
            uptime: clock.uptime(),
            aggregate_idle: idle.aggregate_idle(),
        }
    }

    /// Renders the snapshot in the two-field fixed-point format:
    /// `<seconds>.<hundredths> <seconds>.<hundredths>\n`.
    ///
    /// The sub-second remainder is truncated to hundredths, never rounded,
    /// so 3661.999s renders as `3661.99` and not `3662.00`. Pure function:
    /// identical inputs always yield identical bytes.
    pub fn render(&self) -> String {
        format!(
            "{}.{:02} {}.{:02}\n",
            self.uptime.as_secs(),
            self.uptime.subsec_nanos() / NANOS_PER_HUNDREDTH,
            self.aggregate_idle.as_secs(),
            self.aggregate_idle.subsec_nanos() / NANOS_PER_HUNDREDTH,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snap(uptime: Duration, idle: Duration) -> Snapshot {
        Snapshot {
            uptime,
            aggregate_idle: idle,
        }
    }

    fn assert_two_field_shape(rendered: &str) {
        // ^\d+\.\d{2} \d+\.\d{2}\n$ without pulling in a regex engine.
        let body = rendered.strip_suffix('\n').expect("trailing newline");
        let fields: Vec<&str> = body.split(' ').collect();
        assert_eq!(fields.len(), 2, "exactly two fields in {rendered:?}");
        for field in fields {
            let (secs, hundredths) = field.split_once('.').expect("decimal point");
            assert!(!secs.is_empty() && secs.bytes().all(|b| b.is_ascii_digit()));
            assert!(secs == "0" || !secs.starts_with('0'), "no leading zeros");
            assert_eq!(hundredths.len(), 2, "two fractional digits");
            assert!(hundredths.bytes().all(|b| b.is_ascii_digit()));
        }
    }

    #[test]
    fn test_end_to_end_example() {
        let s = snap(Duration::from_millis(100_500), Duration::from_millis(95_250));
        assert_eq!(s.render(), "100.50 95.25\n");
    }

    #[test]
    fn test_truncates_instead_of_rounding() {
        let s = snap(Duration::new(3661, 999_000_000), Duration::ZERO);
        assert_eq!(s.render(), "3661.99 0.00\n");
    }

    #[test]
    fn test_small_remainder_truncates_to_zero() {
        let s = snap(Duration::new(3661, 4_000_000), Duration::ZERO);
        assert_eq!(s.render(), "3661.00 0.00\n");
    }

    #[test]
    fn test_zero_sides_render_padded() {
        let s = snap(Duration::ZERO, Duration::ZERO);
        assert_eq!(s.render(), "0.00 0.00\n");
    }

    #[test]
    fn test_output_shape_across_inputs() {
        let cases = [
            snap(Duration::ZERO, Duration::ZERO),
            snap(Duration::from_nanos(1), Duration::from_nanos(999_999_999)),
            snap(Duration::new(9, 90_000_000), Duration::new(10, 100_000_000)),
            snap(Duration::from_secs(86_400_000), Duration::from_secs(1)),
            snap(Duration::new(u64::MAX, 999_999_999), Duration::ZERO),
        ];
        for case in cases {
            assert_two_field_shape(&case.render());
        }
    }

    #[test]
    fn test_render_is_deterministic() {
        let s = snap(Duration::new(12, 345_678_901), Duration::new(6, 789_012_345));
        let first = s.render();
        for _ in 0..8 {
            assert_eq!(s.render(), first);
        }
    }
}
