// Copyright (c) The amtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Displays and writes out classified test results.
//!
//! * [`DisplayReporter`] prints a human-readable report.
//! * [`StructuredReporter`] writes parse and run summaries as JSON.
//! * [`JunitReporter`] writes a JUnit XML report.

mod displayer;
mod junit;
mod structured;

pub use displayer::*;
pub use junit::*;
pub use structured::*;

use crate::{
    classify::TestOutcome,
    errors::{MessageFormatParseError, StatusLevelParseError},
};
use serde::Deserialize;
use std::{fmt, str::FromStr};

/// Status level to show in the reporter output.
///
/// Status levels are incremental: each level causes all the statuses listed above it to be output.
/// For example, [`Skip`](Self::Skip) implies [`Fail`](Self::Fail).
#[derive(Copy, Clone, Debug, Eq, Ord, PartialEq, PartialOrd, Deserialize)]
#[cfg_attr(test, derive(test_strategy::Arbitrary))]
#[serde(rename_all = "kebab-case")]
#[non_exhaustive]
pub enum StatusLevel {
    /// No output.
    None,

    /// Only output test failures, and tests that never reported a final status.
    Fail,

    /// Output skipped tests in addition to all variants above.
    Skip,

    /// Output passing tests in addition to all variants above.
    Pass,

    /// Currently has the same meaning as [`Pass`](Self::Pass).
    All,
}

impl StatusLevel {
    /// Returns string representations of all known variants.
    pub fn variants() -> &'static [&'static str] {
        &["none", "fail", "skip", "pass", "all"]
    }

    /// Returns the lowest level at which a test with the given outcome is shown.
    pub fn for_outcome(outcome: TestOutcome) -> Self {
        match outcome {
            TestOutcome::Fail | TestOutcome::Unknown => StatusLevel::Fail,
            TestOutcome::Skip => StatusLevel::Skip,
            TestOutcome::Pass => StatusLevel::Pass,
        }
    }

    /// Returns true if a test with the given outcome is shown at this level.
    pub fn shows(self, outcome: TestOutcome) -> bool {
        self >= Self::for_outcome(outcome)
    }
}

impl FromStr for StatusLevel {
    type Err = StatusLevelParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let val = match s {
            "none" => StatusLevel::None,
            "fail" => StatusLevel::Fail,
            "skip" => StatusLevel::Skip,
            "pass" => StatusLevel::Pass,
            "all" => StatusLevel::All,
            other => return Err(StatusLevelParseError::new(other)),
        };
        Ok(val)
    }
}

impl fmt::Display for StatusLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StatusLevel::None => write!(f, "none"),
            StatusLevel::Fail => write!(f, "fail"),
            StatusLevel::Skip => write!(f, "skip"),
            StatusLevel::Pass => write!(f, "pass"),
            StatusLevel::All => write!(f, "all"),
        }
    }
}

/// The format in which results are written out.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum MessageFormat {
    /// A plain, user-readable report.
    #[default]
    Human,

    /// Machine-readable output.
    Serializable(SerializableFormat),
}

impl MessageFormat {
    /// Returns string representations of all known variants.
    pub fn variants() -> &'static [&'static str] {
        &["human", "json", "json-pretty"]
    }
}

impl FromStr for MessageFormat {
    type Err = MessageFormatParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let val = match s {
            "human" => MessageFormat::Human,
            "json" => MessageFormat::Serializable(SerializableFormat::Json),
            "json-pretty" => MessageFormat::Serializable(SerializableFormat::JsonPretty),
            other => return Err(MessageFormatParseError::new(other)),
        };
        Ok(val)
    }
}

impl fmt::Display for MessageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageFormat::Human => write!(f, "human"),
            MessageFormat::Serializable(SerializableFormat::Json) => write!(f, "json"),
            MessageFormat::Serializable(SerializableFormat::JsonPretty) => {
                write!(f, "json-pretty")
            }
        }
    }
}
