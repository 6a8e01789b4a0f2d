// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Shared components of the bringup board bring-up CLI.
// Author: Lukas Bower
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! Board bring-up bridge for kernel images.
//!
//! One run is strictly sequential: resolve the configuration record,
//! validate it against the selected workflow's requirement table, compute
//! the artifact paths, build the external command, then hand the terminal
//! to exactly one child process and propagate its exit status.

/// Build artifact path computation.
pub mod artifact;
/// Configuration record and environment resolution.
pub mod config;
/// Process dispatch seam and console pass-through dispatcher.
pub mod dispatch;
/// Host environment checks for `bringup doctor`.
pub mod doctor;
/// Error taxonomy shared by all components.
pub mod error;
/// External command construction.
pub mod invoke;
/// Platform policy defaults and TOML overrides.
pub mod policy;
/// Workflow variants and requirement validation.
pub mod workflow;

pub use error::BringupError;
