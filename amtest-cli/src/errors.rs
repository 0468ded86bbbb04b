// Copyright (c) The amtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::output::StderrStyles;
use amtest_metadata::AmtestExitCode;
use amtest_runner::errors::{ConfigParseError, WriteEventError};
use camino::Utf8PathBuf;
use owo_colors::OwoColorize;
use std::error::Error;
use thiserror::Error;
use tracing::error;

pub(crate) type Result<T, E = ExpectedError> = std::result::Result<T, E>;

// Note that the #[error()] strings are mostly placeholder messages -- the expected way to print out
// errors is with the display_to_stderr method, which colorizes errors.

/// An expected error: one caused by the input, the environment or the tests themselves, rather
/// than a bug in amtest.
#[derive(Debug, Error)]
#[doc(hidden)]
pub enum ExpectedError {
    #[error("current directory is invalid")]
    CurrentDirInvalid {
        #[source]
        err: std::io::Error,
    },
    #[error("current directory is not valid UTF-8")]
    CurrentDirInvalidUtf8 {
        #[source]
        err: camino::FromPathBufError,
    },
    #[error("config parse error")]
    ConfigParseError {
        #[from]
        err: ConfigParseError,
    },
    #[error("failed to read instrumentation output")]
    InputReadError {
        /// The path that was read, or `None` for standard input.
        path: Option<Utf8PathBuf>,
        #[source]
        err: std::io::Error,
    },
    #[error("error writing output")]
    WriteEventError {
        #[from]
        err: WriteEventError,
    },
    #[error("test run failed")]
    TestRunFailed,
    #[error("no tests were run")]
    NoTestsRun,
    #[error("instrumentation output ended early")]
    IncompleteRun,
}

impl ExpectedError {
    pub(crate) fn input_read_error(path: Option<Utf8PathBuf>, err: std::io::Error) -> Self {
        Self::InputReadError { path, err }
    }

    /// Returns the exit code for the process.
    pub fn process_exit_code(&self) -> i32 {
        match self {
            Self::CurrentDirInvalid { .. }
            | Self::CurrentDirInvalidUtf8 { .. }
            | Self::ConfigParseError { .. } => AmtestExitCode::SETUP_ERROR,
            Self::InputReadError { .. } => AmtestExitCode::INPUT_READ_ERROR,
            Self::WriteEventError { .. } => AmtestExitCode::WRITE_OUTPUT_ERROR,
            Self::TestRunFailed => AmtestExitCode::TEST_RUN_FAILED,
            Self::NoTestsRun => AmtestExitCode::NO_TESTS_RUN,
            Self::IncompleteRun => AmtestExitCode::INCOMPLETE_RUN,
        }
    }

    /// Displays this error to stderr.
    pub fn display_to_stderr(&self, styles: &StderrStyles) {
        let mut next_error = match &self {
            Self::CurrentDirInvalid { err } => {
                error!("could not determine the current directory");
                Some(err as &dyn Error)
            }
            Self::CurrentDirInvalidUtf8 { err } => {
                error!(
                    "current directory `{}` is not valid UTF-8",
                    err.as_path().display().style(styles.bold)
                );
                None
            }
            Self::ConfigParseError { err } => {
                error!(
                    "failed to parse amtest config at `{}`",
                    err.config_file().style(styles.bold)
                );
                Some(err.kind() as &dyn Error)
            }
            Self::InputReadError { path, err } => {
                match path {
                    Some(path) => error!(
                        "failed to read instrumentation output from `{}`",
                        path.style(styles.bold)
                    ),
                    None => error!("failed to read instrumentation output from standard input"),
                }
                Some(err as &dyn Error)
            }
            Self::WriteEventError { err } => {
                error!("failed to write output");
                Some(err as &dyn Error)
            }
            Self::TestRunFailed => {
                error!("test run failed");
                None
            }
            Self::NoTestsRun => {
                error!("no tests were run");
                None
            }
            Self::IncompleteRun => {
                error!(
                    "instrumentation output ended before `{}`",
                    "INSTRUMENTATION_CODE".style(styles.bold)
                );
                None
            }
        };

        while let Some(err) = next_error {
            error!(target: "amtest::no_heading", "\nCaused by:\n  {}", err);
            next_error = err.source();
        }
    }
}
