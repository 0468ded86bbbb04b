// Copyright (c) The amtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! End-to-end tests: raw output through parsing, grouping, classification and reporting.

use amtest_runner::{
    classify::{TestOutcome, classify_all},
    config::AmtestConfig,
    grouping::{TestName, group_statuses},
    raw_output::{ParseResult, RunCompleteness, parse},
    reporter::{
        DisplayReporterBuilder, JunitReporter, SerializableFormat, StatusLevel,
        StructuredReporter,
    },
    run_results::{RunFinalStatus, TestRunResults},
};
use amtest_metadata::{OutcomeSummary, RunSummary};
use camino::Utf8Path;
use camino_tempfile::tempdir;
use pretty_assertions::assert_eq;

static MIXED_RUN: &str = include_str!("../fixtures/mixed-run.txt");
static CRASHED_RUN: &str = include_str!("../fixtures/crashed-run.txt");
static DEVICE_OFFLINE: &str = include_str!("../fixtures/device-offline.txt");

fn run(raw: &str) -> (ParseResult, TestRunResults) {
    let parsed = parse(raw.lines());
    let grouped = group_statuses(&parsed.statuses);
    let mut results = TestRunResults::new(&parsed);
    results.extend(classify_all(&grouped, 0, |_| 0));
    (parsed, results)
}

fn outcomes(results: &TestRunResults) -> Vec<(&str, TestOutcome)> {
    results
        .results()
        .iter()
        .map(|result| (result.name(), result.outcome()))
        .collect()
}

#[test]
fn mixed_run() {
    let (parsed, results) = run(MIXED_RUN);

    assert_eq!(parsed.completeness(), RunCompleteness::Complete);
    assert_eq!(parsed.result_code, Some(-1));
    assert_eq!(parsed.result_text.first().map(String::as_str), Some("stream="));
    assert!(parsed.result_text.iter().any(|line| line == "FAILURES!!!"));
    assert_eq!(parsed.line_counts.total(), MIXED_RUN.lines().count());

    assert_eq!(
        outcomes(&results),
        [
            ("org.example.CalculatorTest#testAdd", TestOutcome::Pass),
            ("org.example.CalculatorTest#testDivide", TestOutcome::Fail),
            ("org.example.CalculatorTest#testSlow", TestOutcome::Skip),
            ("org.example.StringsTest#testConcat", TestOutcome::Pass),
        ]
    );

    let failed = &results.results()[1];
    assert_eq!(
        failed.log(),
        "java.lang.AssertionError: expected:<2> but was:<3>\n    \
         at org.junit.Assert.fail(Assert.java:88)\n    \
         at org.example.CalculatorTest.testDivide(CalculatorTest.java:42)\n"
    );

    assert_eq!(
        results.final_status(),
        RunFinalStatus::Failed {
            failed: 1,
            unknown: 0
        }
    );
}

#[test]
fn crashed_run() {
    let (parsed, results) = run(CRASHED_RUN);

    // The runner still reports a terminal code when the process crashes.
    assert_eq!(parsed.completeness(), RunCompleteness::Complete);
    assert_eq!(parsed.result_code, Some(0));
    assert_eq!(parsed.result_text, ["shortMsg=Process crashed."]);

    assert_eq!(
        outcomes(&results),
        [
            ("org.example.CrashTest#testFine", TestOutcome::Pass),
            ("org.example.CrashTest#testCrash", TestOutcome::Fail),
        ]
    );
    assert_eq!(results.results()[1].log(), "");
}

#[test]
fn device_offline() {
    let (parsed, results) = run(DEVICE_OFFLINE);

    assert_eq!(parsed.completeness(), RunCompleteness::Empty);
    assert_eq!(parsed.line_counts.noise, 2);
    assert!(results.is_empty());
    assert_eq!(results.final_status(), RunFinalStatus::Incomplete);
}

#[test]
fn truncated_output_is_incomplete() {
    // Cut the mixed run off partway through the failing test's stack trace.
    let truncated: Vec<_> = MIXED_RUN
        .lines()
        .take_while(|line| !line.contains("CalculatorTest.java:42"))
        .collect();
    let parsed = parse(&truncated);
    let grouped = group_statuses(&parsed.statuses);

    assert_eq!(parsed.completeness(), RunCompleteness::Partial);
    let names: Vec<_> = grouped.tests.iter().map(|test| &test.name).collect();
    assert_eq!(
        names,
        [
            &TestName::new("org.example.CalculatorTest", "testAdd"),
            &TestName::new("org.example.CalculatorTest", "testDivide"),
        ]
    );

    let mut results = TestRunResults::new(&parsed);
    results.extend(classify_all(&grouped, 0, |_| 0));
    // testDivide only reported its start before the output ended.
    assert_eq!(results.results()[1].outcome(), TestOutcome::Fail);
    assert_eq!(results.final_status(), RunFinalStatus::Incomplete);
}

#[test]
fn durations_are_looked_up_by_name() {
    let parsed = parse(MIXED_RUN.lines());
    let grouped = group_statuses(&parsed.statuses);
    let results = classify_all(&grouped, 0, |name| match name.method() {
        "testAdd" => 120,
        "testDivide" => 45,
        _ => 0,
    });

    let durations: Vec<_> = results.iter().map(|r| r.duration_ms()).collect();
    assert_eq!(durations, [120, 45, 0, 0]);
}

#[test]
fn reports() {
    let (_, results) = run(MIXED_RUN);

    let mut human = Vec::new();
    DisplayReporterBuilder::new(StatusLevel::Fail, StatusLevel::None)
        .build()
        .write_run(&results, &mut human)
        .expect("writing to a Vec succeeds");
    let human = String::from_utf8(human).expect("output is UTF-8");
    assert!(human.contains("FAIL [   0.000s] org.example.CalculatorTest#testDivide"));
    assert!(!human.contains("testAdd"));
    assert!(human.contains(
        "Summary: 4 tests run: 2 passed, 1 failed, 1 skipped, 0 unknown (INSTRUMENTATION_CODE: -1)"
    ));

    let mut json = Vec::new();
    StructuredReporter::new(SerializableFormat::Json)
        .write_run(&results, &mut json)
        .expect("writing to a Vec succeeds");
    let summary: RunSummary = serde_json::from_slice(&json).expect("output is valid JSON");
    assert_eq!(summary.counts.total(), 4);
    assert_eq!(summary.tests[2].outcome, OutcomeSummary::Skip);

    let dir = tempdir().unwrap();
    let config = AmtestConfig::from_sources(dir.path(), None).expect("default config is valid");
    let junit = config
        .junit_with_path(Utf8Path::new("out/junit.xml"))
        .expect("path provided");
    let junit_path = junit.path().to_owned();
    JunitReporter::new(junit)
        .write(&results)
        .expect("JUnit report is written");
    let xml = std::fs::read_to_string(junit_path).expect("JUnit report exists");
    assert!(xml.contains(r#"name="org.example.CalculatorTest""#), "{xml}");
    assert!(xml.contains(r#"name="org.example.StringsTest""#), "{xml}");
}
