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

//! `/proc/stat`-based implementation of the [`IdleCounterSource`] trait.

use std::borrow::Cow;
use std::path::PathBuf;
use vigil_core::error::UnitReadError;
use vigil_core::{IdleCounterSource, Ticks, UnitId, UnitSample};

/// Where the host publishes its per-unit counter table.
const PROC_STAT_PATH: &str = "/proc/stat";

/// Position of the idle column in a `cpuN` row (after user, nice, system).
const IDLE_COLUMN: usize = 3;

/// An idle counter source backed by the host's `/proc/stat` counter table.
///
/// Each `cpuN` row carries that unit's cumulative time split by category,
/// in ticks of `sysconf(_SC_CLK_TCK)`. Only the idle category counts here;
/// iowait and the interrupt categories are deliberately excluded, matching
/// what the kernel itself sums for the idle field of `/proc/uptime`.
///
/// The table is owned by the host scheduler. This source re-reads it on
/// every call and never caches values.
#[derive(Debug)]
pub struct ProcStatIdleSource {
    path: PathBuf,
    ticks_per_second: u32,
}

impl ProcStatIdleSource {
    /// Creates a source reading the real host counter table.
    pub fn new() -> Self {
        Self::with_path(PROC_STAT_PATH)
    }

    /// Creates a source reading a counter table at an arbitrary path.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ticks_per_second: clock_ticks_per_second(),
        }
    }
}

impl Default for ProcStatIdleSource {
    fn default() -> Self {
        Self::new()
    }
}

impl IdleCounterSource for ProcStatIdleSource {
    fn source_id(&self) -> Cow<'static, str> {
        Cow::Borrowed("proc-stat")
    }

    fn ticks_per_second(&self) -> u32 {
        self.ticks_per_second
    }

    fn sample_units(&self) -> Vec<UnitSample> {
        match std::fs::read_to_string(&self.path) {
            Ok(text) => parse_unit_samples(&text),
            Err(err) => {
                // Treated as an empty unit set: aggregation must not fail
                // because one enumeration pass did.
                log::warn!(
                    "[ProcStatIdleSource] failed to read {}: {}",
                    self.path.display(),
                    err
                );
                Vec::new()
            }
        }
    }
}

/// Returns the host's scheduler tick rate, falling back to the customary
/// 100 Hz if the query misbehaves.
fn clock_ticks_per_second() -> u32 {
    // SAFETY: `sysconf` is thread-safe for this query and has no side effects.
    let hz = unsafe { libc::sysconf(libc::_SC_CLK_TCK) };
    if hz > 0 {
        hz as u32
    } else {
        100
    }
}

/// Extracts one sample per `cpuN` row from counter-table text.
///
/// The aggregate `cpu` row and all non-cpu rows are skipped. A `cpuN` row
/// whose idle column is missing or unparseable yields an `Err` sample so
/// the aggregator can log it; it never aborts the pass.
fn parse_unit_samples(text: &str) -> Vec<UnitSample> {
    let mut samples = Vec::new();
    for line in text.lines() {
        let Some(rest) = line.strip_prefix("cpu") else {
            continue;
        };
        let digits_len = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
        if digits_len == 0 {
            // The aggregate "cpu" row, or an unrelated "cpu*" keyword.
            continue;
        }
        let Ok(unit_number) = rest[..digits_len].parse::<u32>() else {
            continue;
        };
        let unit = UnitId(unit_number);
        let idle = match rest[digits_len..].split_whitespace().nth(IDLE_COLUMN) {
            Some(field) => field
                .parse::<u64>()
                .map(Ticks::new)
                .map_err(|_| UnitReadError::Malformed {
                    detail: format!("idle column {field:?} is not a counter"),
                }),
            None => Err(UnitReadError::CounterUnavailable),
        };
        samples.push(UnitSample { unit, idle });
    }
    samples
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::time::Duration;
    use vigil_core::IdleAggregator;

    const SAMPLE: &str = "\
cpu  6000 30 2000 90000 500 0 60 0 0 0
cpu0 3000 20 1000 47500 300 0 40 0 0 0
cpu1 3000 10 1000 42500 200 0 20 0 0 0
intr 819065 9 0 0 0 0 0 0 0 1 0
ctxt 2064785
btime 1700000000
processes 4367
procs_running 1
";

    #[test]
    fn test_parses_one_sample_per_unit_row() {
        let samples = parse_unit_samples(SAMPLE);
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].unit, UnitId(0));
        assert_eq!(samples[0].idle, Ok(Ticks::new(47_500)));
        assert_eq!(samples[1].unit, UnitId(1));
        assert_eq!(samples[1].idle, Ok(Ticks::new(42_500)));
    }

    #[test]
    fn test_aggregate_row_is_not_a_unit() {
        // The "cpu" row already sums the others; counting it would double
        // the aggregate.
        let samples = parse_unit_samples("cpu  6000 30 2000 90000 500 0 60 0 0 0\n");
        assert!(samples.is_empty());
    }

    #[test]
    fn test_truncated_row_yields_failed_sample() {
        let samples = parse_unit_samples("cpu0 3000 20 1000\n");
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].idle, Err(UnitReadError::CounterUnavailable));
    }

    #[test]
    fn test_garbage_idle_column_yields_failed_sample() {
        let samples = parse_unit_samples("cpu3 3000 20 1000 forty 300 0 40 0 0 0\n");
        assert_eq!(samples.len(), 1);
        assert_eq!(samples[0].unit, UnitId(3));
        assert!(matches!(
            samples[0].idle,
            Err(UnitReadError::Malformed { .. })
        ));
    }

    #[test]
    fn test_empty_table_yields_no_units() {
        assert!(parse_unit_samples("").is_empty());
    }

    #[test]
    fn test_missing_table_yields_empty_set() {
        let source = ProcStatIdleSource::with_path("/nonexistent/vigil-stat");
        assert!(source.sample_units().is_empty());
        let aggregator = IdleAggregator::new(Arc::new(source));
        assert_eq!(aggregator.aggregate_idle(), Duration::ZERO);
    }

    #[test]
    fn test_live_table_enumerates_units() {
        let source = ProcStatIdleSource::new();
        let samples = source.sample_units();
        assert!(!samples.is_empty());
        assert!(source.ticks_per_second() > 0);
    }
}
