// Copyright (c) The amtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Configuration support for amtest.
//!
//! Configuration is read from the default config embedded in amtest, layered with
//! `.config/amtest.toml` (or a file passed in with `--config-file`). Command-line arguments take
//! precedence over both.

mod imp;
mod junit;

pub use imp::*;
pub use junit::JunitConfig;
