// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Construct the external command for a validated workflow.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use std::path::{Path, PathBuf};

use crate::artifact::{Artifact, ArtifactKind};
use crate::config::BoardConfig;
use crate::policy::PlatformPolicy;
use crate::workflow::Workflow;

/// The fully constructed external command.
///
/// Argument order and flag spelling here are a compatibility surface with
/// the emulator and the programmer, not an internal convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Executable to run.
    pub program: PathBuf,
    /// Ordered argument list.
    pub args: Vec<String>,
}

impl Invocation {
    /// Short tool name used in log and error messages.
    #[must_use]
    pub fn tool_name(&self) -> String {
        match self.program.file_name() {
            Some(name) => name.to_string_lossy().into_owned(),
            None => self.program.display().to_string(),
        }
    }

    /// Render the command line for logging and `--dry-run` output.
    #[must_use]
    pub fn rendered(&self) -> String {
        let mut line = self.program.display().to_string();
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

/// Build the invocation for a validated workflow.
#[must_use]
pub fn build(workflow: &Workflow, config: &BoardConfig, policy: &PlatformPolicy) -> Invocation {
    match workflow {
        Workflow::Emulate { boot_rom } => emulator_command(config, policy, boot_rom, None),
        Workflow::EmulateApp {
            boot_rom,
            app,
            load_addr,
        } => emulator_command(config, policy, boot_rom, Some((app.as_path(), *load_addr))),
        Workflow::Flash { hardware_tree } => {
            let image = Artifact::locate(ArtifactKind::RawBinary, config);
            Invocation {
                program: hardware_tree.join(&policy.programmer.path),
                args: vec![format!("--input={}", image.path.display())],
            }
        }
    }
}

fn emulator_command(
    config: &BoardConfig,
    policy: &PlatformPolicy,
    boot_rom: &Path,
    app: Option<(&Path, u32)>,
) -> Invocation {
    let kernel = Artifact::locate(ArtifactKind::Elf, config);
    let mut args = vec![
        "-M".to_owned(),
        policy.emulator.machine.clone(),
        "-kernel".to_owned(),
        kernel.path.display().to_string(),
        "-bios".to_owned(),
        boot_rom.display().to_string(),
    ];
    if let Some((app, load_addr)) = app {
        args.push("-device".to_owned());
        args.push(format!("loader,file={},addr={load_addr:#x}", app.display()));
    }
    args.push("-nographic".to_owned());
    args.push("-serial".to_owned());
    args.push("mon:stdio".to_owned());
    Invocation {
        program: PathBuf::from(policy.emulator.program.clone()),
        args,
    }
}
