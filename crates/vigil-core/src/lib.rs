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

//! # Vigil Core
//!
//! Foundational crate containing the capability traits, core types, and the
//! snapshot contract shared by every Vigil component. Host-specific code
//! lives in `vigil-infra`; nothing in this crate touches the platform.

#![warn(missing_docs)]

pub mod clock;
pub mod error;
pub mod idle;
pub mod snapshot;
pub mod ticks;

pub use clock::ClockSource;
pub use idle::{IdleAggregator, IdleCounterSource, UnitId, UnitSample};
pub use snapshot::Snapshot;
pub use ticks::Ticks;
