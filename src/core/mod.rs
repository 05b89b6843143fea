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

//! src/core/mod.rs
//!
//! Core business logic module
//!
//! This module contains the data structures and pure transformations for
//! affinity config management:
//! - Type definitions for games, threads and whole configs
//! - The native `applist.conf` parser and writer
//! - CPU core spec validation
//! - Import merging by package name
//!
//! Nothing here performs I/O (apart from the cached host core count), so
//! everything can be unit tested without a device.

pub mod merge;
pub mod parser;
pub mod types;
pub mod validator;
pub mod writer;

pub use merge::{merge, MergeOutcome};
pub use parser::parse_app_list;
pub use types::*;
pub use validator::{validate, CoreSpecError};
pub use writer::write_app_list;

#[cfg(test)]
mod tests;
