// Copyright (c) The amtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Root element for a serializable parse of raw instrumentation output.
///
/// Produced by `amtest parse --message-format json`.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ParseSummary {
    /// How complete the output was.
    pub completeness: CompletenessSummary,

    /// The terminal `INSTRUMENTATION_CODE`, or `None` if it was never seen.
    pub result_code: Option<i64>,

    /// Lines collected under `INSTRUMENTATION_RESULT`, in order.
    pub result_text: Vec<String>,

    /// Status blocks in the order they were reported.
    pub statuses: Vec<StatusBlockSummary>,

    /// How the input lines were consumed.
    pub line_counts: LineCountsSummary,
}

/// A single serializable status block.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct StatusBlockSummary {
    /// The `INSTRUMENTATION_STATUS_CODE` that closed this block.
    pub code: i64,

    /// Fields in the order they were first reported. Each value is a list of lines.
    pub fields: IndexMap<String, Vec<String>>,
}

/// Serializable line accounting for a parse.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LineCountsSummary {
    /// Lines recognized as protocol markers.
    pub markers: usize,

    /// Lines appended to a multi-line value.
    pub values: usize,

    /// Lines seen outside of any value and discarded.
    pub noise: usize,
}

/// Structural completeness of an instrumentation run's output.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum CompletenessSummary {
    /// A terminal `INSTRUMENTATION_CODE` was seen.
    Complete,

    /// Some markers were seen, but no terminal code.
    Partial,

    /// No markers were recognized at all.
    Empty,
}

/// The outcome of a single test.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum OutcomeSummary {
    /// The test passed.
    Pass,

    /// The test failed or errored.
    Fail,

    /// The test was skipped.
    Skip,

    /// No status was reported for the test.
    Unknown,
}

impl fmt::Display for OutcomeSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pass => write!(f, "pass"),
            Self::Fail => write!(f, "fail"),
            Self::Skip => write!(f, "skip"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// A serializable result for a single test.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TestResultSummary {
    /// The test's name, typically `package.Class#method`.
    pub name: String,

    /// The final outcome.
    pub outcome: OutcomeSummary,

    /// Failure diagnostics. Empty unless the test failed.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub log: String,

    /// Duration in milliseconds, as supplied by the caller.
    pub duration_ms: u64,
}

/// Per-outcome counts for a run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct OutcomeCounts {
    /// Number of passing tests.
    pub passed: usize,

    /// Number of failing tests.
    pub failed: usize,

    /// Number of skipped tests.
    pub skipped: usize,

    /// Number of tests without a final status.
    pub unknown: usize,
}

impl OutcomeCounts {
    /// Returns the total number of tests.
    pub fn total(&self) -> usize {
        self.passed + self.failed + self.skipped + self.unknown
    }
}

/// The final status of a classified run.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
#[non_exhaustive]
pub enum RunFinalStatusSummary {
    /// All tests passed or were skipped.
    Passed,

    /// Some tests failed or had no final status.
    Failed {
        /// Number of failed tests.
        failed: usize,

        /// Number of tests without a final status.
        unknown: usize,
    },

    /// The run completed but no tests were reported.
    NoTestsRun,

    /// The output ended before a terminal code was reported.
    Incomplete,
}

/// Root element for a serializable classified run.
///
/// Produced by `amtest report --message-format json`.
#[derive(Clone, Debug, Eq, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RunSummary {
    /// How complete the output was.
    pub completeness: CompletenessSummary,

    /// The terminal `INSTRUMENTATION_CODE`, if any.
    pub result_code: Option<i64>,

    /// Lines collected under `INSTRUMENTATION_RESULT`.
    pub result_text: Vec<String>,

    /// The overall status of the run.
    pub final_status: RunFinalStatusSummary,

    /// Per-outcome counts.
    pub counts: OutcomeCounts,

    /// Results for each test, in the order the tests were first reported.
    pub tests: Vec<TestResultSummary>,
}
