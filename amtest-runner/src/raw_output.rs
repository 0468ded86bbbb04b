// Copyright (c) The amtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Parser for the raw output of `am instrument -r`.
//!
//! The instrumentation runner reports progress as a line-oriented key/value protocol:
//!
//! ```text
//! INSTRUMENTATION_STATUS: class=org.example.FooTest
//! INSTRUMENTATION_STATUS: test=testBar
//! INSTRUMENTATION_STATUS: stack=java.lang.AssertionError
//!     at org.example.FooTest.testBar(FooTest.java:12)
//! INSTRUMENTATION_STATUS_CODE: -2
//! INSTRUMENTATION_RESULT: stream=
//! FAILURES!!!
//! INSTRUMENTATION_CODE: -1
//! ```
//!
//! Values may span several lines: every line that isn't a marker is appended to the value that
//! is currently open. The output from a device is frequently truncated or interleaved with log
//! chatter, so parsing never fails. Incomplete trailing data is dropped instead.

use crate::protocol::{InstrumentationStatusCode, StatusKey};
use amtest_metadata::{CompletenessSummary, LineCountsSummary, ParseSummary, StatusBlockSummary};
use indexmap::IndexMap;
use std::fmt;
use tracing::debug;

const STATUS_PREFIX: &str = "INSTRUMENTATION_STATUS:";
const STATUS_CODE_PREFIX: &str = "INSTRUMENTATION_STATUS_CODE:";
const RESULT_PREFIX: &str = "INSTRUMENTATION_RESULT:";
const CODE_PREFIX: &str = "INSTRUMENTATION_CODE:";

/// Parses the raw output of an instrumentation run.
///
/// Each item is one line, without its line terminator. This is a single forward pass over
/// `lines`; calling it twice on the same input produces equal results.
pub fn parse<I>(lines: I) -> ParseResult
where
    I: IntoIterator,
    I::Item: AsRef<str>,
{
    lines
        .into_iter()
        .fold(ParseState::default(), |state, line| {
            state.advance(line.as_ref())
        })
        .finish()
}

/// The result of [`parse`].
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct ParseResult {
    /// The terminal `INSTRUMENTATION_CODE`, or `None` if it was never seen.
    pub result_code: Option<i64>,

    /// Lines collected under the last `INSTRUMENTATION_RESULT` before the terminal code.
    pub result_text: Vec<String>,

    /// Completed status blocks, in the order they were reported.
    pub statuses: Vec<StatusBlock>,

    /// How each input line was consumed.
    pub line_counts: LineCounts,
}

impl ParseResult {
    /// Returns how structurally complete the output was.
    pub fn completeness(&self) -> RunCompleteness {
        if self.result_code.is_some() {
            RunCompleteness::Complete
        } else if self.line_counts.markers == 0 {
            RunCompleteness::Empty
        } else {
            RunCompleteness::Partial
        }
    }

    /// Converts this result into its serializable form.
    pub fn to_summary(&self) -> ParseSummary {
        ParseSummary {
            completeness: self.completeness().into(),
            result_code: self.result_code,
            result_text: self.result_text.clone(),
            statuses: self.statuses.iter().map(StatusBlock::to_summary).collect(),
            line_counts: self.line_counts.into(),
        }
    }
}

/// Structural completeness of parsed output.
///
/// A run without a terminal code has an unknown overall outcome. No attempt is made to infer one.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum RunCompleteness {
    /// A terminal `INSTRUMENTATION_CODE` was seen.
    Complete,

    /// Some markers were seen, but the terminal code was not.
    Partial,

    /// No markers were recognized at all.
    Empty,
}

impl From<RunCompleteness> for CompletenessSummary {
    fn from(completeness: RunCompleteness) -> Self {
        match completeness {
            RunCompleteness::Complete => CompletenessSummary::Complete,
            RunCompleteness::Partial => CompletenessSummary::Partial,
            RunCompleteness::Empty => CompletenessSummary::Empty,
        }
    }
}

impl fmt::Display for RunCompleteness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Complete => write!(f, "complete"),
            Self::Partial => write!(f, "partial"),
            Self::Empty => write!(f, "empty"),
        }
    }
}

/// Accounting for how input lines were consumed.
///
/// Every line is exactly one of these, so [`total`](Self::total) equals the number of input lines.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LineCounts {
    /// Marker lines.
    pub markers: usize,

    /// Lines appended to an open status field or to the result text. This includes lines whose
    /// value was later dropped because the output ended before it was finalized.
    pub values: usize,

    /// Lines seen while no value was open.
    pub noise: usize,
}

impl LineCounts {
    /// Returns the total number of lines consumed.
    pub fn total(&self) -> usize {
        self.markers + self.values + self.noise
    }
}

impl From<LineCounts> for LineCountsSummary {
    fn from(counts: LineCounts) -> Self {
        LineCountsSummary {
            markers: counts.markers,
            values: counts.values,
            noise: counts.noise,
        }
    }
}

/// A single status reported by the instrumentation runner.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct StatusBlock {
    /// The status code. See [`InstrumentationStatusCode`](crate::protocol::InstrumentationStatusCode)
    /// for conventional values; any value is passed through.
    pub code: i64,

    /// The fields reported before the status code.
    pub fields: StatusFields,
}

impl StatusBlock {
    /// Creates a new status block.
    pub fn new(code: i64, fields: StatusFields) -> Self {
        Self { code, fields }
    }

    /// Returns the test class, if this block reports one.
    pub fn class_name(&self) -> Option<String> {
        self.fields.get_concat(StatusKey::CLASS)
    }

    /// Returns the test method, if this block reports one.
    pub fn test_name(&self) -> Option<String> {
        self.fields.get_concat(StatusKey::TEST)
    }

    /// Returns the lines of the `stack` field, if present.
    pub fn stack(&self) -> Option<&[String]> {
        self.fields.get(StatusKey::STACK)
    }

    /// Returns true if this block marks the start of a test.
    pub fn is_start(&self) -> bool {
        self.code == InstrumentationStatusCode::START
    }

    /// Converts this block into its serializable form.
    pub fn to_summary(&self) -> StatusBlockSummary {
        StatusBlockSummary {
            code: self.code,
            fields: self.fields.inner.clone(),
        }
    }
}

/// An ordered map of status keys to their value lines.
///
/// Keys are kept in the order they were first reported. Multi-line values keep every line,
/// including empty ones.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct StatusFields {
    inner: IndexMap<String, Vec<String>>,
}

impl StatusFields {
    /// Creates an empty set of fields.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the value lines for `key`.
    pub fn get(&self, key: &str) -> Option<&[String]> {
        self.inner.get(key).map(Vec::as_slice)
    }

    /// Returns the value lines for `key` concatenated without separators.
    ///
    /// Useful for fields that are expected to be single-line, such as `class` and `test`.
    pub fn get_concat(&self, key: &str) -> Option<String> {
        self.inner.get(key).map(|lines| lines.concat())
    }

    /// Returns true if `key` was reported.
    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.contains_key(key)
    }

    /// Sets the value lines for `key`, replacing any earlier value.
    pub fn insert(&mut self, key: impl Into<String>, lines: Vec<String>) {
        self.inner.insert(key.into(), lines);
    }

    /// Iterates over keys and value lines in report order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> + '_ {
        self.inner
            .iter()
            .map(|(key, lines)| (key.as_str(), lines.as_slice()))
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns true if there are no fields.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }
}

impl<K, V> FromIterator<(K, Vec<V>)> for StatusFields
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<T: IntoIterator<Item = (K, Vec<V>)>>(iter: T) -> Self {
        let inner = iter
            .into_iter()
            .map(|(key, lines)| (key.into(), lines.into_iter().map(Into::into).collect()))
            .collect();
        Self { inner }
    }
}

/// A single line of raw output, classified by kind.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RawLine<'a> {
    /// `INSTRUMENTATION_STATUS: key=value`.
    Status {
        /// The key, before the first `=`.
        key: &'a str,
        /// The first line of the value.
        value: &'a str,
    },

    /// `INSTRUMENTATION_STATUS_CODE: N`.
    StatusCode(i64),

    /// `INSTRUMENTATION_RESULT: value`.
    Result(&'a str),

    /// `INSTRUMENTATION_CODE: N`.
    Code(i64),

    /// Any other line.
    Text(&'a str),
}

impl<'a> RawLine<'a> {
    /// Classifies a line.
    ///
    /// Markers are recognized by case-sensitive prefixes at the start of the line. Whitespace
    /// after the marker's colon is not part of the value. A code marker whose value isn't an
    /// integer is treated as text.
    pub fn classify(line: &'a str) -> Self {
        if let Some(rest) = line.strip_prefix(STATUS_CODE_PREFIX) {
            return parse_code(line, rest).map_or(Self::Text(line), Self::StatusCode);
        }
        if let Some(rest) = line.strip_prefix(STATUS_PREFIX) {
            let rest = rest.trim_start();
            // Split on the first '=' only: values may contain '=' themselves.
            let (key, value) = rest.split_once('=').unwrap_or((rest, ""));
            return Self::Status { key, value };
        }
        if let Some(rest) = line.strip_prefix(RESULT_PREFIX) {
            return Self::Result(rest.trim_start());
        }
        if let Some(rest) = line.strip_prefix(CODE_PREFIX) {
            return parse_code(line, rest).map_or(Self::Text(line), Self::Code);
        }
        Self::Text(line)
    }

    /// Returns true if this line is a protocol marker.
    pub fn is_marker(&self) -> bool {
        !matches!(self, Self::Text(_))
    }
}

fn parse_code(line: &str, rest: &str) -> Option<i64> {
    match rest.trim().parse() {
        Ok(code) => Some(code),
        Err(error) => {
            debug!("treating marker line as text, code is not an integer ({error}): {line:?}");
            None
        }
    }
}

/// The value currently accumulating lines.
#[derive(Debug)]
enum OpenValue {
    StatusField { key: String, lines: Vec<String> },
    ResultText { lines: Vec<String> },
}

/// State threaded through the fold in [`parse`].
#[derive(Debug, Default)]
struct ParseState {
    open: Option<OpenValue>,
    // Fields flushed for the status block that hasn't seen its status code yet.
    pending_fields: StatusFields,
    // Result text that was closed (for example by a status marker) but not yet finalized by a
    // terminal code.
    pending_result: Option<Vec<String>>,
    result_code: Option<i64>,
    result_text: Vec<String>,
    statuses: Vec<StatusBlock>,
    line_counts: LineCounts,
}

impl ParseState {
    fn advance(mut self, line: &str) -> Self {
        let raw = RawLine::classify(line);
        if raw.is_marker() {
            self.line_counts.markers += 1;
        }

        match raw {
            RawLine::Status { key, value } => {
                self.close_open();
                self.open = Some(OpenValue::StatusField {
                    key: key.to_owned(),
                    lines: vec![value.to_owned()],
                });
            }
            RawLine::StatusCode(code) => {
                self.close_open();
                let fields = std::mem::take(&mut self.pending_fields);
                self.statuses.push(StatusBlock::new(code, fields));
            }
            RawLine::Result(value) => {
                self.close_open();
                self.open = Some(OpenValue::ResultText {
                    lines: vec![value.to_owned()],
                });
            }
            RawLine::Code(code) => {
                self.close_open();
                self.result_text = self.pending_result.take().unwrap_or_default();
                self.result_code = Some(code);
            }
            RawLine::Text(text) => match &mut self.open {
                Some(OpenValue::StatusField { lines, .. } | OpenValue::ResultText { lines }) => {
                    lines.push(text.to_owned());
                    self.line_counts.values += 1;
                }
                None => {
                    self.line_counts.noise += 1;
                }
            },
        }

        self
    }

    /// Moves the open value, if any, to where it will be finalized from.
    fn close_open(&mut self) {
        match self.open.take() {
            Some(OpenValue::StatusField { key, lines }) => {
                // A repeated key within a block replaces the earlier value.
                self.pending_fields.insert(key, lines);
            }
            Some(OpenValue::ResultText { lines }) => {
                self.pending_result = Some(lines);
            }
            None => {}
        }
    }

    fn finish(self) -> ParseResult {
        if self.open.is_some() || !self.pending_fields.is_empty() || self.pending_result.is_some()
        {
            debug!("dropping unterminated data at end of instrumentation output");
        }

        ParseResult {
            result_code: self.result_code,
            result_text: self.result_text,
            statuses: self.statuses,
            line_counts: self.line_counts,
        }
    }
}
