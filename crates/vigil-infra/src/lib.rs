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

//! # Vigil Infra
//!
//! Concrete implementations of Vigil's external dependencies: the Linux
//! `/proc/stat` counter table, the `CLOCK_BOOTTIME` clock, the Unix-socket
//! read endpoint, and signal-driven shutdown.

#![warn(missing_docs)]

pub mod boot_clock;
pub mod endpoint;
pub mod proc_stat;
pub mod shutdown;

pub use boot_clock::BootClock;
pub use endpoint::{EndpointConfig, EndpointError, UptimeEndpoint};
pub use proc_stat::ProcStatIdleSource;
pub use shutdown::ShutdownFlag;
