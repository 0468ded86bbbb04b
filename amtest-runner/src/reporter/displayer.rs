// Copyright (c) The amtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Human-readable reports of classified runs.

use super::StatusLevel;
use crate::{
    classify::{TestOutcome, TestResult},
    errors::WriteEventError,
    helpers::{DisplayTestName, plural},
    raw_output::RunCompleteness,
    run_results::TestRunResults,
};
use owo_colors::{OwoColorize, Style};
use std::{fmt, io, time::Duration};

/// Builder for a [`DisplayReporter`].
#[derive(Debug)]
pub struct DisplayReporterBuilder {
    status_level: StatusLevel,
    final_status_level: StatusLevel,
    should_colorize: bool,
}

impl DisplayReporterBuilder {
    /// Creates a new builder with the given status levels.
    pub fn new(status_level: StatusLevel, final_status_level: StatusLevel) -> Self {
        Self {
            status_level,
            final_status_level,
            should_colorize: false,
        }
    }

    /// Sets whether the output should be colorized.
    pub fn set_colorize(&mut self, should_colorize: bool) -> &mut Self {
        self.should_colorize = should_colorize;
        self
    }

    /// Creates the reporter.
    pub fn build(&self) -> DisplayReporter {
        let mut styles = Styles::default();
        if self.should_colorize {
            styles.colorize();
        }
        DisplayReporter {
            status_level: self.status_level,
            final_status_level: self.final_status_level,
            styles,
        }
    }
}

/// Writes a human-readable report of a run.
///
/// The report has three parts:
///
/// * one status line per test shown at the status level, with failure logs beneath failures
/// * a summary line with per-outcome counts and the run's terminal code
/// * the tests shown at the final status level, listed again
#[derive(Debug)]
pub struct DisplayReporter {
    status_level: StatusLevel,
    final_status_level: StatusLevel,
    styles: Styles,
}

impl DisplayReporter {
    /// Writes the full report for `results`.
    pub fn write_run(
        &self,
        results: &TestRunResults,
        writer: &mut dyn io::Write,
    ) -> Result<(), WriteEventError> {
        self.write_run_impl(results, writer)
            .map_err(WriteEventError::Io)
    }

    fn write_run_impl(&self, results: &TestRunResults, writer: &mut dyn io::Write) -> io::Result<()> {
        for result in results.results() {
            if !self.status_level.shows(result.outcome()) {
                continue;
            }
            self.write_status_line(result, writer)?;
            if result.outcome() == TestOutcome::Fail {
                self.write_failure_log(result, writer)?;
            }
        }

        writeln!(writer, "{}", "------------".style(self.styles.dim))?;
        self.write_summary(results, writer)?;

        for result in results.results() {
            if self.final_status_level.shows(result.outcome()) {
                self.write_status_line(result, writer)?;
            }
        }

        writer.flush()
    }

    fn write_status_line(&self, result: &TestResult, writer: &mut dyn io::Write) -> io::Result<()> {
        let style = self.styles.for_outcome(result.outcome());
        writeln!(
            writer,
            "{:>8} {}{}",
            result.outcome().style(style),
            DisplayBracketedDuration(result.duration()),
            DisplayTestName::new(result.name(), self.styles.class, self.styles.method),
        )
    }

    fn write_failure_log(&self, result: &TestResult, writer: &mut dyn io::Write) -> io::Result<()> {
        for line in result.log().lines() {
            writeln!(writer, "{LOG_INDENT}{line}")?;
        }
        Ok(())
    }

    fn write_summary(&self, results: &TestRunResults, writer: &mut dyn io::Write) -> io::Result<()> {
        let counts = results.counts();
        let total = counts.total();

        write!(
            writer,
            "{}: {} {} run: ",
            "Summary".style(self.styles.count),
            total.style(self.styles.count),
            plural::tests_str(total),
        )?;
        write!(
            writer,
            "{} {}, ",
            counts.passed.style(self.styles.count),
            "passed".style(self.styles.pass),
        )?;
        write!(
            writer,
            "{} {}, ",
            counts.failed.style(self.styles.count),
            "failed".style(self.styles.fail),
        )?;
        write!(
            writer,
            "{} {}, ",
            counts.skipped.style(self.styles.count),
            "skipped".style(self.styles.skip),
        )?;
        write!(
            writer,
            "{} {}",
            counts.unknown.style(self.styles.count),
            "unknown".style(self.styles.unknown),
        )?;

        match (results.completeness(), results.result_code()) {
            (RunCompleteness::Complete, Some(code)) => {
                writeln!(writer, " (INSTRUMENTATION_CODE: {code})")
            }
            _ => writeln!(
                writer,
                " ({}: no INSTRUMENTATION_CODE)",
                "incomplete".style(self.styles.fail)
            ),
        }
    }
}

const LOG_INDENT: &str = "      ";

#[derive(Debug, Default)]
struct Styles {
    count: Style,
    pass: Style,
    fail: Style,
    skip: Style,
    unknown: Style,
    class: Style,
    method: Style,
    dim: Style,
}

impl Styles {
    fn colorize(&mut self) {
        self.count = Style::new().bold();
        self.pass = Style::new().green().bold();
        self.fail = Style::new().red().bold();
        self.skip = Style::new().yellow().bold();
        self.unknown = Style::new().magenta().bold();
        self.class = Style::new().magenta().bold();
        self.method = Style::new().blue().bold();
        self.dim = Style::new().dimmed();
    }

    fn for_outcome(&self, outcome: TestOutcome) -> Style {
        match outcome {
            TestOutcome::Pass => self.pass,
            TestOutcome::Fail => self.fail,
            TestOutcome::Skip => self.skip,
            TestOutcome::Unknown => self.unknown,
        }
    }
}

struct DisplayBracketedDuration(Duration);

impl fmt::Display for DisplayBracketedDuration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // * > means right-align.
        // * 8 is the number of characters to pad to.
        // * .3 means print three digits after the decimal point.
        write!(f, "[{:>8.3?}s] ", self.0.as_secs_f64())
    }
}
