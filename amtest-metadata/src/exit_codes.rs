// Copyright (c) The amtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

/// Documented exit codes for `amtest` failures.
///
/// `amtest` runs may fail for a variety of reasons. This structure documents the exit codes
/// that may occur in case of expected failures.
///
/// Unknown/unexpected failures will always result in exit code 1.
pub enum AmtestExitCode {}

impl AmtestExitCode {
    /// No errors occurred and amtest exited normally.
    pub const OK: i32 = 0;

    /// The instrumentation output was complete, but it did not contain any tests.
    pub const NO_TESTS_RUN: i32 = 4;

    /// One or more tests failed, or did not report a final status.
    pub const TEST_RUN_FAILED: i32 = 100;

    /// The instrumentation output ended without an `INSTRUMENTATION_CODE` marker.
    ///
    /// The device process likely crashed or was killed before the run finished.
    pub const INCOMPLETE_RUN: i32 = 106;

    /// Reading the instrumentation output produced an error.
    pub const INPUT_READ_ERROR: i32 = 107;

    /// Writing data to stdout, stderr or a report file produced an error.
    pub const WRITE_OUTPUT_ERROR: i32 = 110;

    /// A user issue happened while setting up an amtest invocation.
    pub const SETUP_ERROR: i32 = 96;
}
