// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Error taxonomy shared by the bring-up components.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use std::io;

use thiserror::Error;

use crate::config::Field;
use crate::workflow::WorkflowKind;

/// Failures a bring-up run can end in.
///
/// Configuration errors are detected before any subprocess is started;
/// tool failures carry the child's own exit status through unmodified.
#[derive(Debug, Error)]
pub enum BringupError {
    /// A field the selected workflow requires was not supplied.
    #[error("missing configuration for `{workflow}`: {field} (set {} or {})", .field.flag(), .field.env_var())]
    MissingConfig {
        /// Workflow whose requirement table flagged the absence.
        workflow: WorkflowKind,
        /// The absent field.
        field: Field,
    },

    /// The external tool could not be started at all.
    #[error("failed to launch {tool}: {source}")]
    SpawnFailure {
        /// Program that failed to start.
        tool: String,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },

    /// The external tool ran and exited nonzero.
    #[error("{tool} exited with code {code}")]
    ToolFailure {
        /// Program that failed.
        tool: String,
        /// Its verbatim exit code.
        code: i32,
    },

    /// The external tool was terminated by a signal.
    #[error("{tool} terminated by a signal")]
    ToolInterrupted {
        /// Program that was interrupted.
        tool: String,
    },
}

impl BringupError {
    /// Process exit code this error maps to.
    ///
    /// A child's nonzero exit is propagated verbatim; everything else is a
    /// plain failure.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            BringupError::ToolFailure { code, .. } => *code,
            _ => 1,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_config_names_field_and_sources() {
        let err = BringupError::MissingConfig {
            workflow: WorkflowKind::Emulate,
            field: Field::BootRom,
        };
        let message = err.to_string();
        assert!(message.contains("`emulate`"));
        assert!(message.contains("boot-rom"));
        assert!(message.contains("--boot-rom"));
        assert!(message.contains("BRINGUP_BOOT_ROM"));
    }

    #[test]
    fn tool_failure_propagates_exit_code() {
        let err = BringupError::ToolFailure {
            tool: "spiflash".to_owned(),
            code: 2,
        };
        assert_eq!(err.exit_code(), 2);
        let err = BringupError::ToolInterrupted {
            tool: "qemu-system-riscv32".to_owned(),
        };
        assert_eq!(err.exit_code(), 1);
    }
}
