// Copyright (c) The amtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Aggregated results for an entire instrumentation run.

use crate::{
    classify::{TestOutcome, TestResult},
    raw_output::{ParseResult, RunCompleteness},
};
use amtest_metadata::{OutcomeCounts, RunFinalStatusSummary, RunSummary};

/// The results of every test in a run, along with the run's terminal result.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestRunResults {
    completeness: RunCompleteness,
    result_code: Option<i64>,
    result_text: Vec<String>,
    results: Vec<TestResult>,
}

impl TestRunResults {
    /// Creates an empty set of results for the run described by `parsed`.
    pub fn new(parsed: &ParseResult) -> Self {
        Self {
            completeness: parsed.completeness(),
            result_code: parsed.result_code,
            result_text: parsed.result_text.clone(),
            results: Vec::new(),
        }
    }

    /// Adds a single result.
    pub fn add(&mut self, result: TestResult) {
        self.results.push(result);
    }

    /// Adds several results.
    pub fn extend(&mut self, results: impl IntoIterator<Item = TestResult>) {
        self.results.extend(results);
    }

    /// How complete the run's output was.
    pub fn completeness(&self) -> RunCompleteness {
        self.completeness
    }

    /// The terminal result code, if the run reported one.
    pub fn result_code(&self) -> Option<i64> {
        self.result_code
    }

    /// The terminal result text.
    pub fn result_text(&self) -> &[String] {
        &self.result_text
    }

    /// All results, in the order they were added.
    pub fn results(&self) -> &[TestResult] {
        &self.results
    }

    /// Results with the given outcome.
    pub fn results_of(&self, outcome: TestOutcome) -> impl Iterator<Item = &TestResult> + '_ {
        self.results
            .iter()
            .filter(move |result| result.outcome() == outcome)
    }

    /// The number of results with the given outcome.
    pub fn count(&self, outcome: TestOutcome) -> usize {
        self.results_of(outcome).count()
    }

    /// The number of results.
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Returns true if there are no results.
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Per-outcome counts.
    pub fn counts(&self) -> OutcomeCounts {
        let mut counts = OutcomeCounts::default();
        for result in &self.results {
            match result.outcome() {
                TestOutcome::Pass => counts.passed += 1,
                TestOutcome::Fail => counts.failed += 1,
                TestOutcome::Skip => counts.skipped += 1,
                TestOutcome::Unknown => counts.unknown += 1,
            }
        }
        counts
    }

    /// Returns true if there is at least one result and every result passed or was skipped.
    pub fn did_all_pass(&self) -> bool {
        !self.results.is_empty() && self.results.iter().all(|r| r.outcome().is_success())
    }

    /// Computes the final status of the run.
    ///
    /// A run whose output ended before the terminal code is incomplete regardless of the tests
    /// that were reported.
    pub fn final_status(&self) -> RunFinalStatus {
        if self.completeness != RunCompleteness::Complete {
            return RunFinalStatus::Incomplete;
        }
        if self.results.is_empty() {
            return RunFinalStatus::NoTestsRun;
        }

        let counts = self.counts();
        if counts.failed > 0 || counts.unknown > 0 {
            RunFinalStatus::Failed {
                failed: counts.failed,
                unknown: counts.unknown,
            }
        } else {
            RunFinalStatus::Passed
        }
    }

    /// Converts these results into their serializable form.
    pub fn to_summary(&self) -> RunSummary {
        RunSummary {
            completeness: self.completeness.into(),
            result_code: self.result_code,
            result_text: self.result_text.clone(),
            final_status: self.final_status().into(),
            counts: self.counts(),
            tests: self.results.iter().map(TestResult::to_summary).collect(),
        }
    }
}

/// The final status of a run.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RunFinalStatus {
    /// Every test passed or was skipped.
    Passed,

    /// Some tests failed, or never reported a final status.
    Failed {
        /// The number of failed tests.
        failed: usize,

        /// The number of tests without a final status.
        unknown: usize,
    },

    /// The run completed but no tests were reported.
    NoTestsRun,

    /// The output ended before the terminal code was reported.
    Incomplete,
}

impl From<RunFinalStatus> for RunFinalStatusSummary {
    fn from(status: RunFinalStatus) -> Self {
        match status {
            RunFinalStatus::Passed => RunFinalStatusSummary::Passed,
            RunFinalStatus::Failed { failed, unknown } => {
                RunFinalStatusSummary::Failed { failed, unknown }
            }
            RunFinalStatus::NoTestsRun => RunFinalStatusSummary::NoTestsRun,
            RunFinalStatus::Incomplete => RunFinalStatusSummary::Incomplete,
        }
    }
}
