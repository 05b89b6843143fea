// Copyright 2025 Eric Jingryd (tidynest@proton.me)
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

//! Host capabilities
//!
//! Traits for everything the crate needs from the device, plus default
//! implementations:
//! - `RootExecutor`: privileged file reads and writes
//! - `HostCpuInfo`: logical CPU core count

pub mod cpu;
pub mod executor;

pub use cpu::{FixedCpuInfo, HostCpuInfo, SysfsCpuInfo};
pub use executor::{ExecutorError, ExecutorMode, FsExecutor, RootExecutor};
