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

//! CPU core spec validation
//!
//! This module checks the right-hand side of config directives:
//! - Syntax: `4`, `0-7`, `0,2,4`, `0-3,6-7` (whitespace around tokens allowed)
//! - Range order: `start <= end`
//! - Bounds: every core must exist on the device
//!
//! The device core count comes from a `HostCpuInfo` and is cached once per
//! process in a [`CoreCountCache`].

use nom::{
    character::complete::{char, digit1, space0},
    combinator::{all_consuming, map_res, opt},
    sequence::{delimited, pair, preceded},
    IResult, Parser,
};
use std::{
    collections::BTreeSet,
    sync::atomic::{AtomicUsize, Ordering},
};
use thiserror::Error;

use crate::{
    core::types::ValidationResult,
    host::cpu::{HostCpuInfo, SysfsCpuInfo},
};

/// Highest core index accepted by the parser
///
/// Guards range expansion against inputs like `0-4000000000`.
pub const CORE_INDEX_LIMIT: u32 = 1023;

/// Core spec errors
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum CoreSpecError {
    /// Spec is empty or whitespace
    #[error("CPU cores cannot be empty")]
    Empty,

    /// Segment is neither a number nor a `start-end` pair
    #[error("Invalid core segment '{0}'")]
    InvalidSegment(String),

    /// Range start is greater than its end
    #[error("Range start is greater than end: '{0}'")]
    ReversedRange(String),

    /// Index beyond anything a device could have
    #[error("Core index {0} exceeds the supported maximum of {max}", max = CORE_INDEX_LIMIT)]
    IndexTooLarge(u32),

    /// Cores that do not exist on this device
    #[error("CPU cores out of range: {}. Valid cores are 0-{max}", join_cores(.cores))]
    OutOfRange { cores: Vec<u32>, max: u32 },
}

fn join_cores(cores: &[u32]) -> String {
    cores
        .iter()
        .map(|c| c.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse a core spec into its canonical sorted set
///
/// # Example
/// ```
/// use affinity_conf::core::validator::parse_core_spec;
///
/// let cores = parse_core_spec("6-7, 0-2,1").unwrap();
/// assert_eq!(cores.into_iter().collect::<Vec<_>>(), vec![0, 1, 2, 6, 7]);
/// ```
pub fn parse_core_spec(spec: &str) -> Result<BTreeSet<u32>, CoreSpecError> {
    if spec.trim().is_empty() {
        return Err(CoreSpecError::Empty);
    }

    let mut cores = BTreeSet::new();

    for segment in spec.split(',') {
        let segment = segment.trim();

        let (start, end) = match parse_segment(segment) {
            Ok((_, (start, end))) => (start, end.unwrap_or(start)),
            Err(_) => return Err(CoreSpecError::InvalidSegment(segment.to_string())),
        };

        if start > end {
            return Err(CoreSpecError::ReversedRange(segment.to_string()));
        }

        if end > CORE_INDEX_LIMIT {
            return Err(CoreSpecError::IndexTooLarge(end));
        }

        cores.extend(start..=end);
    }

    Ok(cores)
}

/// Parse one comma-free segment: `N` or `start-end`
pub fn parse_segment(input: &str) -> IResult<&str, (u32, Option<u32>)> {
    all_consuming(delimited(
        space0,
        pair(
            parse_core_index,
            opt(preceded(delimited(space0, char('-'), space0), parse_core_index)),
        ),
        space0,
    ))
    .parse(input)
}

fn parse_core_index(input: &str) -> IResult<&str, u32> {
    map_res(digit1, |digits: &str| digits.parse::<u32>()).parse(input)
}

/// Parse and bounds-check a core spec against `max_core_index`
pub fn check_core_spec(spec: &str, max_core_index: u32) -> Result<BTreeSet<u32>, CoreSpecError> {
    let cores = parse_core_spec(spec).map_err(|e| match e {
        CoreSpecError::IndexTooLarge(core) => CoreSpecError::OutOfRange {
            cores: vec![core],
            max: max_core_index,
        },
        other => other,
    })?;

    let out_of_range: Vec<u32> = cores
        .iter()
        .copied()
        .filter(|core| *core > max_core_index)
        .collect();

    if !out_of_range.is_empty() {
        return Err(CoreSpecError::OutOfRange {
            cores: out_of_range,
            max: max_core_index,
        });
    }

    Ok(cores)
}

/// Validates a core spec against `max_core_index`
///
/// # Example
/// ```
/// use affinity_conf::core::validator::validate;
///
/// assert!(validate("0-3,6-7", 7).is_valid);
/// assert!(!validate("8", 7).is_valid);
/// ```
pub fn validate(spec: &str, max_core_index: u32) -> ValidationResult {
    match check_core_spec(spec, max_core_index) {
        Ok(_) => ValidationResult::valid(),
        Err(e) => ValidationResult::invalid(e.to_string()),
    }
}

/// Validates a core spec against this device's core count
pub fn validate_cpu_cores(spec: &str) -> ValidationResult {
    validate(spec, max_core_index())
}

/// Highest valid core index on this device
pub fn max_core_index() -> u32 {
    to_max_index(core_count())
}

fn to_max_index(count: usize) -> u32 {
    u32::try_from(count.saturating_sub(1)).unwrap_or(CORE_INDEX_LIMIT)
}

/// Input hint naming the valid cores on this device
pub fn core_hint() -> String {
    let count = core_count();
    let max = to_max_index(count);
    format!("e.g. 0-{} or {} (this device: {} cores)", max, max, count)
}

/// Once-per-process cache for the device core count
///
/// Zero means "not computed yet". Racing first calls may each query the
/// host, but only the first stored value is ever returned.
#[derive(Debug, Default)]
pub struct CoreCountCache {
    value: AtomicUsize,
}

impl CoreCountCache {
    pub const fn new() -> Self {
        Self {
            value: AtomicUsize::new(0),
        }
    }

    /// Returns the cached count, querying `host` on first use
    pub fn get_or_init(&self, host: &dyn HostCpuInfo) -> usize {
        if let Some(count) = self.get() {
            return count;
        }

        let computed = host.core_count().max(1);
        match self
            .value
            .compare_exchange(0, computed, Ordering::AcqRel, Ordering::Acquire)
        {
            Ok(_) => computed,
            Err(existing) => existing,
        }
    }

    /// Returns the cached count without querying the host
    pub fn get(&self) -> Option<usize> {
        match self.value.load(Ordering::Acquire) {
            0 => None,
            count => Some(count),
        }
    }

    /// Replaces the cached count
    pub fn set(&self, count: usize) {
        self.value.store(count.max(1), Ordering::Release);
    }

    /// Forgets the cached count so the next call queries the host again
    pub fn reset(&self) {
        self.value.store(0, Ordering::Release);
    }
}

static CORE_COUNT: CoreCountCache = CoreCountCache::new();

/// The process-wide core count cache
pub fn core_count_cache() -> &'static CoreCountCache {
    &CORE_COUNT
}

/// Number of logical CPU cores on this device (cached)
pub fn core_count() -> usize {
    CORE_COUNT.get_or_init(&SysfsCpuInfo::default())
}
