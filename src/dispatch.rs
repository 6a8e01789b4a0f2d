// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Spawn workflow invocations with pass-through console I/O.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use std::process::{Command, Stdio};

use crate::config::BoardConfig;
use crate::error::BringupError;
use crate::invoke::{self, Invocation};
use crate::policy::PlatformPolicy;
use crate::workflow::Workflow;

/// How the child process ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildExit {
    /// The child exited with this code.
    Code(i32),
    /// The child was terminated by a signal.
    Interrupted,
}

/// Seam between workflow execution and the operating system.
///
/// Tests substitute a recording implementation to assert what would have
/// been spawned without spawning anything.
pub trait Dispatch {
    /// Run the invocation to completion and report how it ended.
    fn dispatch(&mut self, invocation: &Invocation) -> Result<ChildExit, BringupError>;
}

/// Dispatcher that hands the invoking terminal to the child.
///
/// Both the emulator and the programmer produce live, interactive console
/// output, so stdin/stdout/stderr are inherited rather than captured. The
/// wait is unbounded; interrupt delivery is the operating system's job.
#[derive(Debug, Default)]
pub struct ConsoleDispatcher;

impl Dispatch for ConsoleDispatcher {
    fn dispatch(&mut self, invocation: &Invocation) -> Result<ChildExit, BringupError> {
        let spawn_failure = |source| BringupError::SpawnFailure {
            tool: invocation.tool_name(),
            source,
        };
        let mut child = Command::new(&invocation.program)
            .args(&invocation.args)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(spawn_failure)?;
        let status = child.wait().map_err(spawn_failure)?;
        Ok(match status.code() {
            Some(code) => ChildExit::Code(code),
            None => ChildExit::Interrupted,
        })
    }
}

/// Build, announce, and run the invocation for a validated workflow.
///
/// A nonzero child exit is surfaced verbatim as [`BringupError::ToolFailure`];
/// the child's console output is never captured or reinterpreted. No retries:
/// every failure here is either a configuration mistake or an external
/// condition that retrying cannot fix.
pub fn execute<D: Dispatch>(
    workflow: &Workflow,
    config: &BoardConfig,
    policy: &PlatformPolicy,
    dispatcher: &mut D,
) -> Result<(), BringupError> {
    let invocation = invoke::build(workflow, config, policy);
    log::info!("{}: {}", workflow.kind(), invocation.rendered());
    match dispatcher.dispatch(&invocation)? {
        ChildExit::Code(0) => Ok(()),
        ChildExit::Code(code) => Err(BringupError::ToolFailure {
            tool: invocation.tool_name(),
            code,
        }),
        ChildExit::Interrupted => Err(BringupError::ToolInterrupted {
            tool: invocation.tool_name(),
        }),
    }
}
