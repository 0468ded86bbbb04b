// Copyright (c) The amtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Core functionality for `amtest`.
//!
//! The basic flow of operations is:
//!
//! 1. [`raw_output::parse`] turns the lines printed by `am instrument -r` into status blocks and a
//!    terminal result.
//! 2. [`grouping::group_statuses`] correlates status blocks with the tests that reported them.
//! 3. [`classify::classify`] decides each test's outcome.
//! 4. [`run_results::TestRunResults`] aggregates outcomes, and the [`reporter`] module displays
//!    them or writes them out as JSON or JUnit XML.
//!
//! Steps 1 to 3 are pure functions over in-memory data.

pub mod classify;
pub mod config;
pub mod errors;
pub mod grouping;
mod helpers;
pub mod protocol;
pub mod raw_output;
pub mod reporter;
pub mod run_results;
