// Copyright (c) The amtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    errors::{ExpectedError, Result},
    input::{InputSource, split_lines},
    output::{OutputContext, OutputOpts, OutputWriter, clap_styles},
};
use amtest_metadata::AmtestExitCode;
use amtest_runner::{
    classify::classify_all,
    config::AmtestConfig,
    grouping::group_statuses,
    raw_output::{ParseResult, parse},
    reporter::{
        DisplayReporterBuilder, JunitReporter, MessageFormat, SerializableFormat, StatusLevel,
        StructuredReporter,
    },
    run_results::{RunFinalStatus, TestRunResults},
};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, Subcommand, ValueEnum};
use supports_color::Stream;
use tracing::{debug, info};

/// Parses and reports on the raw output of Android instrumentation test runs.
///
/// Capture the output of `adb shell am instrument -r -w ...` and pass it to amtest, either as a
/// file or on standard input.
#[derive(Debug, Parser)]
#[command(name = "amtest", version, styles = clap_styles())]
pub struct AmtestApp {
    #[command(flatten)]
    output: OutputOpts,

    #[command(flatten)]
    config_opts: ConfigOpts,

    #[command(subcommand)]
    command: Command,
}

impl AmtestApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app, returning the process exit code on success.
    pub fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        match self.command {
            Command::Parse {
                input,
                message_format,
            } => {
                let parsed = read_and_parse(input.as_deref())?;
                let mut writer = output_writer.stdout_writer();
                StructuredReporter::new(message_format.into()).write_parse(&parsed, &mut writer)?;
                Ok(AmtestExitCode::OK)
            }
            Command::Report {
                input,
                exit_code,
                message_format,
                reporter_opts,
            } => {
                let config = self.config_opts.make_config()?;
                let parsed = read_and_parse(input.as_deref())?;
                let results = classify_run(&parsed, exit_code);

                let mut writer = output_writer.stdout_writer();
                match message_format {
                    MessageFormat::Human => {
                        let mut builder = reporter_opts.to_builder(&config);
                        builder.set_colorize(output.color.should_colorize(Stream::Stdout));
                        builder.build().write_run(&results, &mut writer)?;
                    }
                    MessageFormat::Serializable(format) => {
                        StructuredReporter::new(format).write_run(&results, &mut writer)?;
                    }
                }

                let junit = match &reporter_opts.junit_path {
                    Some(path) => config.junit_with_path(path),
                    None => config.junit(),
                };
                if let Some(junit) = junit {
                    let path = junit.path().to_owned();
                    JunitReporter::new(junit).write(&results)?;
                    if output.verbose {
                        info!("wrote JUnit report to `{path}`");
                    }
                }

                final_status_to_exit_code(results.final_status())
            }
        }
    }
}

#[derive(Debug, Args)]
struct ConfigOpts {
    /// Config file [default: current-dir/.config/amtest.toml]
    #[arg(long, global = true, value_name = "PATH")]
    config_file: Option<Utf8PathBuf>,
}

impl ConfigOpts {
    /// Creates an amtest config rooted at the current directory.
    fn make_config(&self) -> Result<AmtestConfig> {
        let current_dir =
            std::env::current_dir().map_err(|err| ExpectedError::CurrentDirInvalid { err })?;
        let base_dir = Utf8PathBuf::try_from(current_dir)
            .map_err(|err| ExpectedError::CurrentDirInvalidUtf8 { err })?;

        Ok(AmtestConfig::from_sources(
            base_dir,
            self.config_file.as_deref(),
        )?)
    }
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse instrumentation output and print the status blocks and run result
    ///
    /// The output is always machine-readable.
    Parse {
        /// File containing `am instrument -r` output, or `-` for standard input
        #[arg(value_name = "INPUT")]
        input: Option<Utf8PathBuf>,

        /// Output format
        #[arg(short = 'T', long, value_enum, default_value_t, value_name = "FMT")]
        message_format: ParseMessageFormat,
    },
    /// Classify each test in instrumentation output and report on the run
    ///
    /// Exits with a non-zero code if any test failed or did not report a final status, if the
    /// output ended before the instrumentation finished, or if no tests were run.
    Report {
        /// File containing `am instrument -r` output, or `-` for standard input
        #[arg(value_name = "INPUT")]
        input: Option<Utf8PathBuf>,

        /// Exit code of the instrumentation process
        #[arg(long, default_value_t = 0, allow_negative_numbers = true, value_name = "CODE")]
        exit_code: i32,

        /// Output format: human, json, json-pretty
        #[arg(
            short = 'T',
            long,
            default_value = "human",
            env = "AMTEST_MESSAGE_FORMAT",
            value_name = "FMT"
        )]
        message_format: MessageFormat,

        #[command(flatten)]
        reporter_opts: ReporterOpts,
    },
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
enum ParseMessageFormat {
    #[default]
    Json,
    JsonPretty,
}

impl From<ParseMessageFormat> for SerializableFormat {
    fn from(format: ParseMessageFormat) -> Self {
        match format {
            ParseMessageFormat::Json => SerializableFormat::Json,
            ParseMessageFormat::JsonPretty => SerializableFormat::JsonPretty,
        }
    }
}

#[derive(Debug, Default, Args)]
#[command(next_help_heading = "Reporter options")]
struct ReporterOpts {
    /// Test statuses to output [default: from config]
    #[arg(long, value_name = "LEVEL", env = "AMTEST_STATUS_LEVEL")]
    status_level: Option<StatusLevel>,

    /// Test statuses to output at the end of the run [default: from config]
    #[arg(long, value_name = "LEVEL", env = "AMTEST_FINAL_STATUS_LEVEL")]
    final_status_level: Option<StatusLevel>,

    /// Write a JUnit XML report to this path [default: from config]
    #[arg(long, value_name = "PATH", env = "AMTEST_JUNIT_PATH")]
    junit_path: Option<Utf8PathBuf>,
}

impl ReporterOpts {
    fn to_builder(&self, config: &AmtestConfig) -> DisplayReporterBuilder {
        DisplayReporterBuilder::new(
            self.status_level.unwrap_or(config.status_level()),
            self.final_status_level
                .unwrap_or(config.final_status_level()),
        )
    }
}

fn read_and_parse(input: Option<&Utf8Path>) -> Result<ParseResult> {
    let raw = InputSource::new(input).read_to_string()?;
    let parsed = parse(split_lines(&raw));
    debug!(
        statuses = parsed.statuses.len(),
        completeness = ?parsed.completeness(),
        "parsed instrumentation output"
    );
    Ok(parsed)
}

fn classify_run(parsed: &ParseResult, exit_code: i32) -> TestRunResults {
    let grouped = group_statuses(&parsed.statuses);
    if !grouped.unattributed.is_empty() {
        debug!(
            count = grouped.unattributed.len(),
            "ignoring status blocks reported before any test"
        );
    }

    let mut results = TestRunResults::new(parsed);
    // Captured output carries no timing information.
    results.extend(classify_all(&grouped, exit_code, |_| 0));
    results
}

fn final_status_to_exit_code(status: RunFinalStatus) -> Result<i32> {
    match status {
        RunFinalStatus::Passed => Ok(AmtestExitCode::OK),
        RunFinalStatus::Failed { .. } => Err(ExpectedError::TestRunFailed),
        RunFinalStatus::NoTestsRun => Err(ExpectedError::NoTestsRun),
        RunFinalStatus::Incomplete => Err(ExpectedError::IncompleteRun),
    }
}
