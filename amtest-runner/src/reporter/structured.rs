// Copyright (c) The amtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{errors::WriteEventError, raw_output::ParseResult, run_results::TestRunResults};
use serde::Serialize;
use std::io;

/// A serialized, machine-readable output format.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SerializableFormat {
    /// JSON with no whitespace.
    Json,
    /// JSON, prettified.
    JsonPretty,
}

impl SerializableFormat {
    /// Write this data in the given format to the writer.
    pub fn to_writer(
        self,
        value: &impl Serialize,
        writer: impl io::Write,
    ) -> serde_json::Result<()> {
        match self {
            SerializableFormat::Json => serde_json::to_writer(writer, value),
            SerializableFormat::JsonPretty => serde_json::to_writer_pretty(writer, value),
        }
    }
}

/// Writes parse results and run results as JSON, one document per call.
#[derive(Copy, Clone, Debug)]
pub struct StructuredReporter {
    format: SerializableFormat,
}

impl StructuredReporter {
    /// Creates a new reporter that writes the given format.
    pub fn new(format: SerializableFormat) -> Self {
        Self { format }
    }

    /// Writes the raw parse result.
    pub fn write_parse(
        &self,
        parsed: &ParseResult,
        writer: &mut dyn io::Write,
    ) -> Result<(), WriteEventError> {
        self.write_value(&parsed.to_summary(), writer)
    }

    /// Writes classified results for a run.
    pub fn write_run(
        &self,
        results: &TestRunResults,
        writer: &mut dyn io::Write,
    ) -> Result<(), WriteEventError> {
        self.write_value(&results.to_summary(), writer)
    }

    fn write_value(
        &self,
        value: &impl Serialize,
        writer: &mut dyn io::Write,
    ) -> Result<(), WriteEventError> {
        self.format
            .to_writer(value, &mut *writer)
            .map_err(WriteEventError::Json)?;
        writeln!(writer).map_err(WriteEventError::Io)?;
        writer.flush().map_err(WriteEventError::Io)
    }
}
