// Copyright (c) The amtest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

#![warn(missing_docs)]

//! Structured, serializable versions of the data produced by `amtest`.
//!
//! `amtest parse --message-format json` and `amtest report --message-format json` produce the
//! types in this crate. Consumers that post-process instrumentation runs should depend on this
//! crate rather than on `amtest-runner`, whose API changes more often.

mod exit_codes;
mod summary;

pub use exit_codes::*;
pub use summary::*;
