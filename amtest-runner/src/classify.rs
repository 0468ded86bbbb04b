// Copyright (c) The amtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Classification of a test's status blocks into a final outcome.

use crate::{
    grouping::{GroupedStatuses, TestName},
    protocol::{InstrumentationStatusCode, StatusKey},
    raw_output::StatusBlock,
};
use amtest_metadata::{OutcomeSummary, TestResultSummary};
use std::{fmt, time::Duration};
use tracing::trace;

/// The final outcome of a single test.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Ord, PartialOrd)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
pub enum TestOutcome {
    /// The last status reported for the test was `OK`.
    Pass,

    /// The last status reported for the test was anything other than `OK`.
    Fail,

    /// The test was marked as skipped.
    Skip,

    /// No status was reported for the test.
    Unknown,
}

impl TestOutcome {
    /// Returns true if this outcome doesn't indicate a problem.
    pub fn is_success(self) -> bool {
        matches!(self, Self::Pass | Self::Skip)
    }
}

impl fmt::Display for TestOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Skip => "SKIP",
            Self::Unknown => "UNKNOWN",
        };
        // Honor width and alignment flags.
        f.pad(s)
    }
}

impl From<TestOutcome> for OutcomeSummary {
    fn from(outcome: TestOutcome) -> Self {
        match outcome {
            TestOutcome::Pass => OutcomeSummary::Pass,
            TestOutcome::Fail => OutcomeSummary::Fail,
            TestOutcome::Skip => OutcomeSummary::Skip,
            TestOutcome::Unknown => OutcomeSummary::Unknown,
        }
    }
}

/// The classified result of a single test.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct TestResult {
    name: String,
    outcome: TestOutcome,
    log: String,
    duration_ms: u64,
}

impl TestResult {
    /// Creates a new test result.
    pub fn new(
        name: impl Into<String>,
        outcome: TestOutcome,
        log: impl Into<String>,
        duration_ms: u64,
    ) -> Self {
        Self {
            name: name.into(),
            outcome,
            log: log.into(),
            duration_ms,
        }
    }

    /// The name the caller supplied, typically `package.Class#method`.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The final outcome.
    pub fn outcome(&self) -> TestOutcome {
        self.outcome
    }

    /// Failure diagnostics; empty unless the test failed.
    pub fn log(&self) -> &str {
        &self.log
    }

    /// The duration in milliseconds, exactly as supplied.
    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    /// The duration as a [`Duration`].
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.duration_ms)
    }

    /// Converts this result into its serializable form.
    pub fn to_summary(&self) -> TestResultSummary {
        TestResultSummary {
            name: self.name.clone(),
            outcome: self.outcome.into(),
            log: self.log.clone(),
            duration_ms: self.duration_ms,
        }
    }
}

/// Determines the outcome of a single test from its status blocks.
///
/// * No statuses: [`TestOutcome::Unknown`].
/// * Any block with `test_skipped` set to exactly `true`, wherever it appears:
///   [`TestOutcome::Skip`].
/// * Otherwise the last block decides: `OK` passes, anything else fails.
///
/// `exit_code` is the exit code of the instrumentation process. It is informational and never
/// changes the outcome; callers that want stricter semantics combine it themselves.
pub fn classify(
    name: impl Into<String>,
    statuses: &[StatusBlock],
    exit_code: i32,
    duration_ms: u64,
) -> TestResult {
    let name = name.into();

    let Some(last) = statuses.last() else {
        trace!(%name, exit_code, "no statuses reported, outcome is unknown");
        return TestResult::new(name, TestOutcome::Unknown, "", duration_ms);
    };

    let (outcome, log) = if statuses.iter().any(is_skip_marker) {
        (TestOutcome::Skip, String::new())
    } else if last.code == InstrumentationStatusCode::OK {
        (TestOutcome::Pass, String::new())
    } else {
        (TestOutcome::Fail, failure_log(statuses))
    };

    trace!(
        %name,
        %outcome,
        last_code = last.code,
        // A final START block means the test never reported how it ended.
        interrupted = last.is_start(),
        exit_code,
        "classified test"
    );
    TestResult::new(name, outcome, log, duration_ms)
}

/// Classifies every test in `grouped`, in order.
///
/// `duration_ms` is called with each test's name. Unattributed statuses are not classified.
pub fn classify_all<F>(
    grouped: &GroupedStatuses,
    exit_code: i32,
    mut duration_ms: F,
) -> Vec<TestResult>
where
    F: FnMut(&TestName) -> u64,
{
    grouped
        .tests
        .iter()
        .map(|test| {
            classify(
                test.name.to_string(),
                &test.statuses,
                exit_code,
                duration_ms(&test.name),
            )
        })
        .collect()
}

fn is_skip_marker(status: &StatusBlock) -> bool {
    // Anything other than exactly one line reading "true" is not a skip.
    matches!(status.fields.get(StatusKey::TEST_SKIPPED), Some([value]) if value == "true")
}

// The stack of the last block that reported one.
fn failure_log(statuses: &[StatusBlock]) -> String {
    statuses
        .iter()
        .rev()
        .find_map(StatusBlock::stack)
        .map(|lines| lines.join("\n"))
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::raw_output::StatusFields;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;
    use test_case::test_case;
    use test_strategy::proptest;

    const NAME: &str = "test.package.TestClass#testMethod";

    fn block<const N: usize>(code: i64, fields: [(&str, Vec<&str>); N]) -> StatusBlock {
        StatusBlock::new(code, fields.into_iter().collect())
    }

    fn named(code: i64) -> StatusBlock {
        block(
            code,
            [
                ("class", vec!["test.package.TestClass"]),
                ("test", vec!["testMethod"]),
            ],
        )
    }

    fn skipped(value: Vec<&str>) -> StatusBlock {
        block(0, [("test_skipped", value)])
    }

    #[test]
    fn no_status() {
        let result = classify(NAME, &[], 0, 1000);
        assert_eq!(result.name(), NAME);
        assert_eq!(result.outcome(), TestOutcome::Unknown);
        assert_eq!(result.log(), "");
        assert_eq!(result.duration_ms(), 1000);
        assert_eq!(result.duration(), Duration::from_secs(1));
    }

    #[test]
    fn test_passed() {
        let result = classify(NAME, &[named(1), named(0)], 0, 1000);
        assert_eq!(result.outcome(), TestOutcome::Pass);
        assert_eq!(result.log(), "");
    }

    #[test_case(vec![skipped(vec!["true"]), named(1), named(0)] ; "skip first")]
    #[test_case(vec![named(1), skipped(vec!["true"]), named(0)] ; "skip middle")]
    #[test_case(vec![named(1), named(0), skipped(vec!["true"])] ; "skip last")]
    #[test_case(vec![named(1), named(-2), skipped(vec!["true"])] ; "skip beats failure")]
    fn test_skipped(statuses: Vec<StatusBlock>) {
        let result = classify(NAME, &statuses, 0, 1000);
        assert_eq!(result.outcome(), TestOutcome::Skip);
        assert_eq!(result.log(), "");
    }

    #[test_case(vec!["false"] ; "false")]
    #[test_case(vec!["TRUE"] ; "case sensitive")]
    #[test_case(vec!["true", ""] ; "multi line")]
    #[test_case(vec![] ; "no lines")]
    #[test_case(vec![" true"] ; "not trimmed")]
    fn test_skipped_other_values(value: Vec<&str>) {
        let statuses = [skipped(value), named(1), named(0)];
        let result = classify(NAME, &statuses, 0, 1000);
        assert_eq!(result.outcome(), TestOutcome::Pass);
    }

    #[test_case(-1 ; "error")]
    #[test_case(-2 ; "failure")]
    #[test_case(-3 ; "ignored")]
    #[test_case(1 ; "never finished")]
    #[test_case(7 ; "unrecognized")]
    fn test_failed(last_code: i64) {
        let result = classify(NAME, &[named(1), named(last_code)], 0, 1000);
        assert_eq!(result.outcome(), TestOutcome::Fail);
    }

    #[test]
    fn exit_code_does_not_override() {
        let result = classify(NAME, &[named(1), named(0)], -1, 1000);
        assert_eq!(result.outcome(), TestOutcome::Pass);
    }

    #[test]
    fn failure_log_uses_last_stack() {
        let statuses = [
            named(1),
            block(
                -2,
                [
                    ("class", vec!["test.package.TestClass"]),
                    ("stack", vec!["java.lang.AssertionError", "\tat Foo.bar(Foo.java:1)"]),
                ],
            ),
            block(-1, [("stream", vec!["."])]),
        ];
        let result = classify(NAME, &statuses, 0, 5);
        assert_eq!(result.outcome(), TestOutcome::Fail);
        assert_eq!(result.log(), "java.lang.AssertionError\n\tat Foo.bar(Foo.java:1)");
    }

    #[test]
    fn failure_without_stack_has_empty_log() {
        let result = classify(NAME, &[named(-1)], 0, 5);
        assert_eq!(result.outcome(), TestOutcome::Fail);
        assert_eq!(result.log(), "");
    }

    #[test]
    fn summary() {
        let result = TestResult::new(NAME, TestOutcome::Fail, "boom", 12);
        let summary = result.to_summary();
        assert_eq!(summary.name, NAME);
        assert_eq!(summary.outcome, OutcomeSummary::Fail);
        assert_eq!(summary.log, "boom");
        assert_eq!(summary.duration_ms, 12);
    }

    fn arbitrary_block() -> impl Strategy<Value = StatusBlock> {
        (
            -4i64..3,
            prop::collection::vec(("[a-z]{1,6}", prop::collection::vec("[ -~]{0,8}", 0..3)), 0..4),
        )
            .prop_map(|(code, fields)| StatusBlock::new(code, fields.into_iter().collect()))
    }

    #[proptest]
    fn skip_wins_anywhere(
        #[strategy(prop::collection::vec(arbitrary_block(), 0..8))] statuses: Vec<StatusBlock>,
        #[strategy(0..=#statuses.len())] index: usize,
        exit_code: i32,
    ) {
        let mut statuses = statuses;
        statuses.insert(index, skipped(vec!["true"]));
        let result = classify(NAME, &statuses, exit_code, 0);
        prop_assert_eq!(result.outcome(), TestOutcome::Skip);
    }

    #[proptest]
    fn last_code_decides_without_skip(
        #[strategy(prop::collection::vec(arbitrary_block(), 1..8))] statuses: Vec<StatusBlock>,
        exit_code: i32,
        duration_ms: u64,
    ) {
        // Generated keys are lowercase letters only, so test_skipped can't appear.
        let result = classify(NAME, &statuses, exit_code, duration_ms);
        let expected = if statuses.last().map(|s| s.code) == Some(0) {
            TestOutcome::Pass
        } else {
            TestOutcome::Fail
        };
        prop_assert_eq!(result.outcome(), expected);
        prop_assert_eq!(result.duration_ms(), duration_ms);
    }

    #[test]
    fn empty_fields_never_skip() {
        let result = classify(NAME, &[StatusBlock::new(0, StatusFields::new())], 0, 0);
        assert_eq!(result.outcome(), TestOutcome::Pass);
    }
}
