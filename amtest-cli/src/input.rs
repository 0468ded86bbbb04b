// Copyright (c) The amtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Reading captured instrumentation output.

use crate::errors::{ExpectedError, Result};
use camino::{Utf8Path, Utf8PathBuf};
use std::io::{self, Read};
use tracing::debug;

/// Where instrumentation output is read from.
#[derive(Clone, Debug, Eq, PartialEq)]
pub(crate) enum InputSource {
    Stdin,
    File(Utf8PathBuf),
}

impl InputSource {
    /// `-` or an absent argument means standard input.
    pub(crate) fn new(input: Option<&Utf8Path>) -> Self {
        match input {
            None => Self::Stdin,
            Some(path) if path.as_str() == "-" => Self::Stdin,
            Some(path) => Self::File(path.to_owned()),
        }
    }

    /// Reads the entire input.
    ///
    /// Output captured from a device is not guaranteed to be valid UTF-8, so invalid sequences
    /// are replaced rather than rejected.
    pub(crate) fn read_to_string(&self) -> Result<String> {
        let bytes = match self {
            Self::Stdin => {
                let mut buf = Vec::new();
                io::stdin()
                    .lock()
                    .read_to_end(&mut buf)
                    .map_err(|err| ExpectedError::input_read_error(None, err))?;
                buf
            }
            Self::File(path) => std::fs::read(path)
                .map_err(|err| ExpectedError::input_read_error(Some(path.clone()), err))?,
        };

        debug!(source = ?self, len = bytes.len(), "read instrumentation output");
        Ok(String::from_utf8_lossy(&bytes).into_owned())
    }
}

/// Splits raw output into lines on `\n`, removing a trailing `\r` from each.
///
/// A final newline does not produce an empty last line.
pub(crate) fn split_lines(raw: &str) -> impl Iterator<Item = &str> {
    raw.split_terminator('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
}
