// Copyright (c) The amtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vocabulary of the instrumentation protocol: conventional status codes and well-known keys.

/// Status codes reported by instrumentation test runners.
///
/// These are the values used by the AndroidJUnitRunner family of runners. The parser passes any
/// integer through unchanged, and the [classifier](crate::classify) only distinguishes `OK` from
/// everything else, so this list is informational.
pub enum InstrumentationStatusCode {}

impl InstrumentationStatusCode {
    /// The test finished without failing.
    pub const OK: i64 = 0;

    /// The test started.
    pub const START: i64 = 1;

    /// The test is still running and sent an intermediate report.
    pub const IN_PROGRESS: i64 = 2;

    /// The test errored, for example by throwing an unexpected exception.
    pub const ERROR: i64 = -1;

    /// The test failed an assertion.
    pub const FAILURE: i64 = -2;

    /// The test was ignored.
    pub const IGNORED: i64 = -3;

    /// An assumption in the test was violated.
    pub const ASSUMPTION_FAILURE: i64 = -4;

    /// Returns a short description for `code`, or `"unknown"` for unrecognized values.
    pub fn describe(code: i64) -> &'static str {
        match code {
            Self::OK => "ok",
            Self::START => "start",
            Self::IN_PROGRESS => "in progress",
            Self::ERROR => "error",
            Self::FAILURE => "failure",
            Self::IGNORED => "ignored",
            Self::ASSUMPTION_FAILURE => "assumption failure",
            _ => "unknown",
        }
    }
}

/// Well-known keys in `INSTRUMENTATION_STATUS` lines.
pub enum StatusKey {}

impl StatusKey {
    /// The fully qualified name of the test class.
    pub const CLASS: &'static str = "class";

    /// The name of the test method.
    pub const TEST: &'static str = "test";

    /// The stack trace of a failed test. Usually spans several lines.
    pub const STACK: &'static str = "stack";

    /// Set to `true` by runners that report a skipped test in its own block.
    pub const TEST_SKIPPED: &'static str = "test_skipped";
}
