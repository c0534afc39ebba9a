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

//! Enumeration of processing units and aggregation of their idle counters.

use crate::error::UnitReadError;
use crate::ticks::Ticks;
use std::borrow::Cow;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

/// Identifier of one logical processing unit, as numbered by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitId(
    /// The host-assigned unit number.
    pub u32,
);

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "cpu{}", self.0)
    }
}

/// One unit's idle-counter reading from a single enumeration pass.
///
/// A failed read is data, not control flow: the aggregator decides what a
/// failure means (zero contribution), the source just reports what it saw.
#[derive(Debug, Clone)]
pub struct UnitSample {
    /// The unit this sample belongs to.
    pub unit: UnitId,
    /// The unit's cumulative idle tick count, or why it could not be read.
    pub idle: Result<Ticks, UnitReadError>,
}

/// Capability for enumerating processing units and reading each unit's
/// cumulative idle-time counter.
///
/// The counters are owned and mutated exclusively by the host scheduler;
/// implementations only ever read them and must not cache values across
/// calls. Enumeration is best-effort: a unit that cannot be read appears in
/// the result with an `Err` sample rather than failing the whole pass.
pub trait IdleCounterSource: Send + Sync + Debug {
    /// Returns a unique, human-readable identifier for this source instance.
    fn source_id(&self) -> Cow<'static, str>;

    /// Returns the host's ticks-per-second ratio for the counters this
    /// source reports.
    fn ticks_per_second(&self) -> u32;

    /// Enumerates the processing units currently known to the host and
    /// reads each unit's idle counter. An empty set is a valid result.
    fn sample_units(&self) -> Vec<UnitSample>;
}

/// Sums per-unit idle counters into a single aggregate [`Duration`].
///
/// The aggregate never fails: unreadable units are logged and contribute
/// zero, and the tick accumulator saturates instead of wrapping.
#[derive(Debug, Clone)]
pub struct IdleAggregator {
    source: Arc<dyn IdleCounterSource>,
}

impl IdleAggregator {
    /// Creates an aggregator over the given counter source.
    pub fn new(source: Arc<dyn IdleCounterSource>) -> Self {
        Self { source }
    }

    /// Reads every unit's idle counter and returns the summed idle time.
    pub fn aggregate_idle(&self) -> Duration {
        let mut total = Ticks::ZERO;
        for sample in self.source.sample_units() {
            match sample.idle {
                Ok(ticks) => total = total.saturating_add(ticks),
                Err(err) => {
                    log::warn!(
                        "[IdleAggregator] {}: skipping {}: {}",
                        self.source.source_id(),
                        sample.unit,
                        err
                    );
                }
            }
        }
        total.to_duration(self.source.ticks_per_second())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A fixed unit set standing in for the host counter table.
    #[derive(Debug)]
    struct FakeUnitSet {
        ticks_per_second: u32,
        samples: Vec<UnitSample>,
    }

    impl IdleCounterSource for FakeUnitSet {
        fn source_id(&self) -> Cow<'static, str> {
            Cow::Borrowed("fake-unit-set")
        }

        fn ticks_per_second(&self) -> u32 {
            self.ticks_per_second
        }

        fn sample_units(&self) -> Vec<UnitSample> {
            self.samples.clone()
        }
    }

    fn ok_sample(unit: u32, ticks: u64) -> UnitSample {
        UnitSample {
            unit: UnitId(unit),
            idle: Ok(Ticks::new(ticks)),
        }
    }

    fn failed_sample(unit: u32) -> UnitSample {
        UnitSample {
            unit: UnitId(unit),
            idle: Err(UnitReadError::CounterUnavailable),
        }
    }

    #[test]
    fn test_sums_across_units() {
        let source = Arc::new(FakeUnitSet {
            ticks_per_second: 100,
            samples: vec![ok_sample(0, 100), ok_sample(1, 150), ok_sample(2, 250)],
        });
        let aggregator = IdleAggregator::new(source);
        assert_eq!(aggregator.aggregate_idle(), Duration::from_secs(5));
    }

    #[test]
    fn test_empty_unit_set_is_zero() {
        let source = Arc::new(FakeUnitSet {
            ticks_per_second: 100,
            samples: Vec::new(),
        });
        let aggregator = IdleAggregator::new(source);
        assert_eq!(aggregator.aggregate_idle(), Duration::ZERO);
    }

    #[test]
    fn test_failed_unit_contributes_zero() {
        let source = Arc::new(FakeUnitSet {
            ticks_per_second: 100,
            samples: vec![ok_sample(0, 300), failed_sample(1), ok_sample(2, 200)],
        });
        let aggregator = IdleAggregator::new(source);
        // The aggregate equals the sum of the two healthy units.
        assert_eq!(aggregator.aggregate_idle(), Duration::from_secs(5));
    }

    #[test]
    fn test_all_units_failed_is_zero_not_error() {
        let source = Arc::new(FakeUnitSet {
            ticks_per_second: 100,
            samples: vec![failed_sample(0), failed_sample(1)],
        });
        let aggregator = IdleAggregator::new(source);
        assert_eq!(aggregator.aggregate_idle(), Duration::ZERO);
    }

    #[test]
    fn test_monotonic_across_reads_without_resets() {
        // Counters are cumulative, so a later pass with equal-or-larger
        // values must never produce a smaller aggregate.
        let first = IdleAggregator::new(Arc::new(FakeUnitSet {
            ticks_per_second: 100,
            samples: vec![ok_sample(0, 100), ok_sample(1, 100)],
        }))
        .aggregate_idle();
        let second = IdleAggregator::new(Arc::new(FakeUnitSet {
            ticks_per_second: 100,
            samples: vec![ok_sample(0, 140), ok_sample(1, 100)],
        }))
        .aggregate_idle();
        assert!(second >= first);
    }

    #[test]
    fn test_saturates_instead_of_wrapping() {
        let source = Arc::new(FakeUnitSet {
            ticks_per_second: 100,
            samples: vec![ok_sample(0, u64::MAX), ok_sample(1, u64::MAX)],
        });
        let aggregator = IdleAggregator::new(source);
        let expected = Ticks::new(u64::MAX).to_duration(100);
        assert_eq!(aggregator.aggregate_idle(), expected);
    }
}
