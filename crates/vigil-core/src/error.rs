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

//! Error types for per-unit counter reads.

use std::fmt;

/// An error reading a single processing unit's idle counter.
///
/// These errors are recoverable by contract: the aggregator logs them and
/// counts the affected unit as a zero contribution. They never propagate to
/// a caller of the snapshot pipeline.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnitReadError {
    /// The unit was enumerated but its counter could not be fetched, e.g.
    /// it went offline between enumeration and the read.
    CounterUnavailable,
    /// The counter was fetched but its value could not be interpreted.
    Malformed {
        /// What the source found instead of a counter value.
        detail: String,
    },
}

impl fmt::Display for UnitReadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UnitReadError::CounterUnavailable => {
                write!(f, "idle counter unavailable")
            }
            UnitReadError::Malformed { detail } => {
                write!(f, "idle counter malformed: {detail}")
            }
        }
    }
}

impl std::error::Error for UnitReadError {}
