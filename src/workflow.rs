// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Workflow variants and requirement validation.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use std::fmt;
use std::path::PathBuf;

use crate::config::{BoardConfig, Field};
use crate::error::BringupError;
use crate::policy::PlatformPolicy;

/// The closed set of bring-up operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowKind {
    /// Boot the kernel image in the emulator.
    Emulate,
    /// Boot the kernel with a userspace app injected into memory.
    EmulateApp,
    /// Write the raw kernel image with the hardware programmer.
    Flash,
}

impl WorkflowKind {
    /// Every workflow, in subcommand order.
    pub const ALL: [WorkflowKind; 3] = [
        WorkflowKind::Emulate,
        WorkflowKind::EmulateApp,
        WorkflowKind::Flash,
    ];

    /// Fixed table of the configuration each workflow cannot run without.
    #[must_use]
    pub fn required(self) -> &'static [Field] {
        match self {
            WorkflowKind::Emulate => &[Field::BootRom],
            WorkflowKind::EmulateApp => &[Field::BootRom, Field::App],
            WorkflowKind::Flash => &[Field::HardwareTree],
        }
    }
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            WorkflowKind::Emulate => "emulate",
            WorkflowKind::EmulateApp => "emulate-with-app",
            WorkflowKind::Flash => "flash",
        };
        f.write_str(name)
    }
}

/// A validated workflow, carrying only the fields it needs.
///
/// Instances exist only past requirement validation; holding one means every
/// mandatory field for that workflow was present, so no later step can trip
/// over absent configuration after a subprocess has been started.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Workflow {
    /// Kernel-only emulation.
    Emulate {
        /// Boot ROM the emulator loads before the kernel.
        boot_rom: PathBuf,
    },
    /// Emulation with a userspace app injected at `load_addr`.
    EmulateApp {
        /// Boot ROM the emulator loads before the kernel.
        boot_rom: PathBuf,
        /// App image placed into emulator memory.
        app: PathBuf,
        /// Memory address the app image is loaded at.
        load_addr: u32,
    },
    /// Hardware flash via the programmer in the hardware tree.
    Flash {
        /// Root of the tree hosting the programmer executable.
        hardware_tree: PathBuf,
    },
}

impl Workflow {
    /// Validate the configuration record against the requirement table and
    /// move the needed values into a workflow variant.
    ///
    /// Fails with [`BringupError::MissingConfig`] naming the first absent
    /// field; nothing is spawned on this path.
    pub fn resolve(
        kind: WorkflowKind,
        config: &BoardConfig,
        policy: &PlatformPolicy,
    ) -> Result<Self, BringupError> {
        let missing = |field| BringupError::MissingConfig {
            workflow: kind,
            field,
        };
        match kind {
            WorkflowKind::Emulate => Ok(Workflow::Emulate {
                boot_rom: config
                    .boot_rom
                    .clone()
                    .ok_or_else(|| missing(Field::BootRom))?,
            }),
            WorkflowKind::EmulateApp => Ok(Workflow::EmulateApp {
                boot_rom: config
                    .boot_rom
                    .clone()
                    .ok_or_else(|| missing(Field::BootRom))?,
                app: config.app.clone().ok_or_else(|| missing(Field::App))?,
                load_addr: config.load_addr.unwrap_or(policy.emulator.load_addr),
            }),
            WorkflowKind::Flash => Ok(Workflow::Flash {
                hardware_tree: config
                    .hardware_tree
                    .clone()
                    .ok_or_else(|| missing(Field::HardwareTree))?,
            }),
        }
    }

    /// Which workflow this is.
    #[must_use]
    pub fn kind(&self) -> WorkflowKind {
        match self {
            Workflow::Emulate { .. } => WorkflowKind::Emulate,
            Workflow::EmulateApp { .. } => WorkflowKind::EmulateApp,
            Workflow::Flash { .. } => WorkflowKind::Flash,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_config() -> BoardConfig {
        BoardConfig {
            target: "t1".to_owned(),
            platform: "p1".to_owned(),
            build_root: PathBuf::from("target"),
            boot_rom: Some(PathBuf::from("/boot.elf")),
            hardware_tree: Some(PathBuf::from("/hw")),
            app: Some(PathBuf::from("/app.tbf")),
            load_addr: None,
        }
    }

    fn clear(config: &mut BoardConfig, field: Field) {
        match field {
            Field::BootRom => config.boot_rom = None,
            Field::App => config.app = None,
            Field::HardwareTree => config.hardware_tree = None,
        }
    }

    #[test]
    fn resolve_agrees_with_the_requirement_table() {
        let policy = PlatformPolicy::default();
        for kind in WorkflowKind::ALL {
            assert!(Workflow::resolve(kind, &full_config(), &policy).is_ok());
            for field in kind.required() {
                let mut config = full_config();
                clear(&mut config, *field);
                match Workflow::resolve(kind, &config, &policy) {
                    Err(BringupError::MissingConfig {
                        workflow,
                        field: reported,
                    }) => {
                        assert_eq!(workflow, kind);
                        assert_eq!(reported, *field);
                    }
                    other => panic!("{kind}: expected MissingConfig, got {other:?}"),
                }
            }
        }
    }

    #[test]
    fn load_addr_falls_back_to_policy_default() {
        let policy = PlatformPolicy::default();
        let workflow = Workflow::resolve(WorkflowKind::EmulateApp, &full_config(), &policy).unwrap();
        match workflow {
            Workflow::EmulateApp { load_addr, .. } => {
                assert_eq!(load_addr, policy.emulator.load_addr);
            }
            other => panic!("unexpected workflow {other:?}"),
        }
    }

    #[test]
    fn configured_load_addr_wins_over_policy() {
        let policy = PlatformPolicy::default();
        let mut config = full_config();
        config.load_addr = Some(0x4000_0000);
        let workflow = Workflow::resolve(WorkflowKind::EmulateApp, &config, &policy).unwrap();
        match workflow {
            Workflow::EmulateApp { load_addr, .. } => assert_eq!(load_addr, 0x4000_0000),
            other => panic!("unexpected workflow {other:?}"),
        }
    }
}
