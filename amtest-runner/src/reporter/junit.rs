// Copyright (c) The amtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Code to generate JUnit XML reports from classified results.

use crate::{
    classify::{TestOutcome, TestResult},
    config::JunitConfig,
    errors::WriteEventError,
    helpers::split_test_name,
    raw_output::RunCompleteness,
    run_results::TestRunResults,
};
use indexmap::IndexMap;
use quick_junit::{NonSuccessKind, Report, TestCase, TestCaseStatus, TestSuite};
use std::{fs::File, time::Duration};
use tracing::debug;

static UNKNOWN_MESSAGE: &str = "test did not report a final status";
static INCOMPLETE_MESSAGE: &str = "instrumentation output ended before INSTRUMENTATION_CODE";

/// Writes a JUnit XML report for a run.
#[derive(Clone, Debug)]
pub struct JunitReporter<'cfg> {
    config: JunitConfig<'cfg>,
}

impl<'cfg> JunitReporter<'cfg> {
    /// Creates a new reporter.
    pub fn new(config: JunitConfig<'cfg>) -> Self {
        Self { config }
    }

    /// Builds the report in memory.
    ///
    /// Each test class becomes a test suite, in order of first appearance. Tests without a class
    /// are placed in a suite named after the report. If the output ended before the terminal
    /// code, every suite notes that in its `system-err`.
    pub fn build_report(&self, results: &TestRunResults) -> Report {
        let mut test_suites: IndexMap<&str, TestSuite> = IndexMap::new();
        let mut total_time = Duration::ZERO;

        for result in results.results() {
            let (class, method) = split_test_name(result.name());
            let suite_name = class.unwrap_or(self.config.report_name());
            let test_suite = test_suites
                .entry(suite_name)
                .or_insert_with(|| TestSuite::new(suite_name));

            total_time += result.duration();
            test_suite.add_test_case(self.test_case(suite_name, method, result));
        }

        if results.completeness() != RunCompleteness::Complete {
            for test_suite in test_suites.values_mut() {
                test_suite.set_system_err(INCOMPLETE_MESSAGE);
            }
        }

        let mut report = Report::new(self.config.report_name());
        report
            .set_time(total_time)
            .add_test_suites(test_suites.into_values());
        report
    }

    /// Builds the report and writes it to the configured path.
    ///
    /// Parent directories are created as necessary.
    pub fn write(&self, results: &TestRunResults) -> Result<(), WriteEventError> {
        let report = self.build_report(results);

        let junit_path = self.config.path();
        if let Some(junit_dir) = junit_path.parent() {
            std::fs::create_dir_all(junit_dir).map_err(|error| WriteEventError::Fs {
                file: junit_dir.to_path_buf(),
                error,
            })?;
        }

        let f = File::create(junit_path).map_err(|error| WriteEventError::Fs {
            file: junit_path.to_path_buf(),
            error,
        })?;
        report
            .serialize(f)
            .map_err(|error| WriteEventError::Junit {
                file: junit_path.to_path_buf(),
                error,
            })?;

        debug!(path = %junit_path, tests = results.len(), "wrote JUnit report");
        Ok(())
    }

    fn test_case(&self, classname: &str, method: &str, result: &TestResult) -> TestCase {
        let status = match result.outcome() {
            TestOutcome::Pass => TestCaseStatus::success(),
            TestOutcome::Fail => {
                let mut status = TestCaseStatus::non_success(NonSuccessKind::Failure);
                status.set_type("test failure");
                if let Some(first_line) = result.log().lines().next() {
                    status
                        .set_message(first_line)
                        .set_description(result.log());
                }
                status
            }
            TestOutcome::Skip => TestCaseStatus::skipped(),
            TestOutcome::Unknown => {
                let mut status = TestCaseStatus::non_success(NonSuccessKind::Error);
                status.set_type("unknown status").set_message(UNKNOWN_MESSAGE);
                status
            }
        };

        let mut test_case = TestCase::new(method, status);
        test_case
            .set_classname(classname)
            .set_time(result.duration());

        if result.outcome() == TestOutcome::Fail
            && self.config.store_failure_output()
            && !result.log().is_empty()
        {
            test_case.set_system_out(result.log());
        }

        test_case
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::AmtestConfig, raw_output::parse};
    use camino::Utf8Path;
    use camino_tempfile::tempdir;
    use pretty_assertions::assert_eq;

    fn sample() -> TestRunResults {
        let parsed = parse(["INSTRUMENTATION_RESULT: stream=", "INSTRUMENTATION_CODE: -1"]);
        let mut results = TestRunResults::new(&parsed);
        results.extend([
            TestResult::new("pkg.FooTest#testOk", TestOutcome::Pass, "", 12),
            TestResult::new(
                "pkg.FooTest#testBad",
                TestOutcome::Fail,
                "java.lang.AssertionError: expected 1\n    at pkg.FooTest.testBad(FooTest.java:9)",
                30,
            ),
            TestResult::new("pkg.BarTest#testSkipped", TestOutcome::Skip, "", 0),
            TestResult::new("pkg.BarTest#testLost", TestOutcome::Unknown, "", 0),
            TestResult::new("orphan", TestOutcome::Pass, "", 1),
        ]);
        results
    }

    #[test]
    fn suites_per_class() {
        let config = AmtestConfig::default_config("/work");
        let junit = config
            .junit_with_path(Utf8Path::new("junit.xml"))
            .expect("path provided");
        let report = JunitReporter::new(junit).build_report(&sample());

        assert_eq!(report.name.as_str(), "amtest-run");
        assert_eq!(report.time, Some(Duration::from_millis(43)));

        let suite_names: Vec<_> = report
            .test_suites
            .iter()
            .map(|suite| suite.name.as_str())
            .collect();
        assert_eq!(suite_names, ["pkg.FooTest", "pkg.BarTest", "amtest-run"]);

        let foo = &report.test_suites[0];
        assert_eq!(foo.tests, 2);
        assert_eq!(foo.failures, 1);
        assert_eq!(foo.test_cases[0].name.as_str(), "testOk");
        assert_eq!(
            foo.test_cases[0].classname.as_ref().map(|c| c.as_str()),
            Some("pkg.FooTest")
        );
        assert_eq!(foo.test_cases[0].time, Some(Duration::from_millis(12)));

        let bar = &report.test_suites[1];
        assert_eq!(bar.tests, 2);
        assert_eq!(bar.errors, 1);
    }

    #[test]
    fn failure_details() {
        let config = AmtestConfig::default_config("/work");
        let junit = config
            .junit_with_path(Utf8Path::new("junit.xml"))
            .expect("path provided");
        let report = JunitReporter::new(junit).build_report(&sample());

        let bad = &report.test_suites[0].test_cases[1];
        match &bad.status {
            TestCaseStatus::NonSuccess {
                kind,
                message,
                description,
                ..
            } => {
                assert_eq!(*kind, NonSuccessKind::Failure);
                assert_eq!(
                    message.as_ref().map(|m| m.as_str()),
                    Some("java.lang.AssertionError: expected 1")
                );
                assert_eq!(
                    description.as_ref().map(|d| d.as_str()),
                    Some(
                        "java.lang.AssertionError: expected 1\n    at pkg.FooTest.testBad(FooTest.java:9)"
                    )
                );
            }
            other => panic!("expected a failure, found {other:?}"),
        }
        assert!(bad.system_out.is_some());

        let skipped = &report.test_suites[1].test_cases[0];
        assert!(matches!(skipped.status, TestCaseStatus::Skipped { .. }));

        let lost = &report.test_suites[1].test_cases[1];
        match &lost.status {
            TestCaseStatus::NonSuccess { kind, message, .. } => {
                assert_eq!(*kind, NonSuccessKind::Error);
                assert_eq!(message.as_ref().map(|m| m.as_str()), Some(UNKNOWN_MESSAGE));
            }
            other => panic!("expected an error, found {other:?}"),
        }
    }

    #[test]
    fn write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let config = AmtestConfig::default_config(dir.path());
        let junit = config
            .junit_with_path(Utf8Path::new("reports/nested/junit.xml"))
            .expect("path provided");
        let path = junit.path().to_owned();

        JunitReporter::new(junit)
            .write(&sample())
            .expect("report is written");

        let xml = std::fs::read_to_string(&path).expect("report exists");
        assert!(xml.contains(r#"<testsuites name="amtest-run""#), "{xml}");
        assert!(xml.contains(r#"name="testBad""#), "{xml}");
        assert!(xml.contains(r#"classname="pkg.FooTest""#), "{xml}");
        assert!(
            xml.contains(r#"message="java.lang.AssertionError: expected 1""#),
            "{xml}"
        );
    }

    #[test]
    fn incomplete_run_is_noted() {
        let config = AmtestConfig::default_config("/work");
        let junit = config
            .junit_with_path(Utf8Path::new("junit.xml"))
            .expect("path provided");
        let reporter = JunitReporter::new(junit);

        let report = reporter.build_report(&sample());
        assert!(report.test_suites.iter().all(|s| s.system_err.is_none()));

        let parsed = parse([
            "INSTRUMENTATION_STATUS: class=pkg.FooTest",
            "INSTRUMENTATION_STATUS: test=testOk",
            "INSTRUMENTATION_STATUS_CODE: 1",
        ]);
        let mut results = TestRunResults::new(&parsed);
        results.add(TestResult::new("pkg.FooTest#testOk", TestOutcome::Fail, "", 0));

        let report = reporter.build_report(&results);
        assert_eq!(
            report.test_suites[0]
                .system_err
                .as_ref()
                .map(|s| s.as_str()),
            Some(INCOMPLETE_MESSAGE)
        );
    }
}
