// Copyright (c) The amtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use camino::{Utf8Path, Utf8PathBuf};
use serde::Deserialize;

/// JUnit report configuration.
///
/// Returned by [`AmtestConfig::junit`](super::AmtestConfig::junit) when a report path is set.
#[derive(Clone, Debug)]
pub struct JunitConfig<'cfg> {
    path: Utf8PathBuf,
    report_name: &'cfg str,
    store_failure_output: bool,
}

impl<'cfg> JunitConfig<'cfg> {
    pub(super) fn new(
        base_dir: &Utf8Path,
        data: &'cfg JunitImpl,
        path_override: Option<&Utf8Path>,
    ) -> Option<Self> {
        let path = path_override.or(data.path.as_deref())?;
        Some(Self {
            path: base_dir.join(path),
            report_name: &data.report_name,
            store_failure_output: data.store_failure_output,
        })
    }

    /// Returns the path to the JUnit report.
    ///
    /// Relative paths in the config are resolved against the directory the config was loaded for.
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }

    /// Returns the name of the JUnit report.
    pub fn report_name(&self) -> &'cfg str {
        self.report_name
    }

    /// Returns true if failure logs should be stored in `<system-out>`.
    pub fn store_failure_output(&self) -> bool {
        self.store_failure_output
    }
}

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(super) struct JunitImpl {
    #[serde(default)]
    path: Option<Utf8PathBuf>,
    report_name: String,
    store_failure_output: bool,
}
