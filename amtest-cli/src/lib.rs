// Copyright (c) The amtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parses and reports on the raw output of `am instrument -r`.
//!
//! Pipe the output of an instrumentation run into `amtest report` to get per-test results, a
//! summary, and optionally a JUnit XML report:
//!
//! ```text
//! adb shell am instrument -r -w org.example.test/androidx.test.runner.AndroidJUnitRunner \
//!     | amtest report --junit-path target/junit.xml
//! ```

#![warn(missing_docs)]

mod dispatch;
mod errors;
mod input;
mod output;

#[doc(hidden)]
pub use dispatch::*;
#[doc(hidden)]
pub use errors::*;
#[doc(hidden)]
pub use output::OutputWriter;
