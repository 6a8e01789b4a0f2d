// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Platform policy defaults and TOML overrides.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use std::fs;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

/// Emulator program invoked for the emulate workflows.
pub const DEFAULT_EMULATOR: &str = "qemu-system-riscv32";
/// Machine model handed to the emulator's `-M` flag.
pub const DEFAULT_MACHINE: &str = "opentitan";
/// App load address used when none is configured.
pub const DEFAULT_LOAD_ADDR: u32 = 0x2003_0000;
/// Programmer location relative to the hardware tree root.
pub const DEFAULT_PROGRAMMER: &str = "build-out/sw/host/spiflash/spiflash";

/// Platform-level constants the workflows depend on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlatformPolicy {
    /// Emulator settings.
    pub emulator: EmulatorPolicy,
    /// Hardware programmer settings.
    pub programmer: ProgrammerPolicy,
}

/// Emulator program, machine model, and default app load address.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmulatorPolicy {
    /// Emulator executable name or path.
    pub program: String,
    /// Machine model selected with `-M`.
    pub machine: String,
    /// Load address for injected app images.
    pub load_addr: u32,
}

/// Hardware programmer location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgrammerPolicy {
    /// Path of the programmer, relative to the hardware tree root.
    pub path: String,
}

impl Default for PlatformPolicy {
    fn default() -> Self {
        Self {
            emulator: EmulatorPolicy {
                program: DEFAULT_EMULATOR.to_owned(),
                machine: DEFAULT_MACHINE.to_owned(),
                load_addr: DEFAULT_LOAD_ADDR,
            },
            programmer: ProgrammerPolicy {
                path: DEFAULT_PROGRAMMER.to_owned(),
            },
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct PolicyToml {
    emulator: Option<EmulatorToml>,
    programmer: Option<ProgrammerToml>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct EmulatorToml {
    program: Option<String>,
    machine: Option<String>,
    load_addr: Option<u32>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ProgrammerToml {
    path: Option<String>,
}

/// Load a policy override file, merged over the built-in defaults.
pub fn load_policy(path: &Path) -> Result<PlatformPolicy> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read policy {}", path.display()))?;
    policy_from_str(&text).with_context(|| format!("invalid policy in {}", path.display()))
}

/// Parse a policy override document, merged over the built-in defaults.
pub fn policy_from_str(text: &str) -> Result<PlatformPolicy> {
    let parsed: PolicyToml = toml::from_str(text).context("invalid policy TOML")?;
    let mut policy = PlatformPolicy::default();
    if let Some(emulator) = parsed.emulator {
        if let Some(program) = emulator.program {
            policy.emulator.program = program;
        }
        if let Some(machine) = emulator.machine {
            policy.emulator.machine = machine;
        }
        if let Some(load_addr) = emulator.load_addr {
            policy.emulator.load_addr = load_addr;
        }
    }
    if let Some(programmer) = parsed.programmer {
        if let Some(programmer_path) = programmer.path {
            policy.programmer.path = programmer_path;
        }
    }
    validate_policy(&policy)?;
    Ok(policy)
}

fn validate_policy(policy: &PlatformPolicy) -> Result<()> {
    if policy.emulator.program.trim().is_empty() {
        return Err(anyhow!("emulator.program must not be empty"));
    }
    if policy.emulator.machine.trim().is_empty() {
        return Err(anyhow!("emulator.machine must not be empty"));
    }
    if policy.emulator.load_addr == 0 {
        return Err(anyhow!("emulator.load_addr must be >= 1"));
    }
    let programmer = policy.programmer.path.trim();
    if programmer.is_empty() {
        return Err(anyhow!("programmer.path must not be empty"));
    }
    if programmer.starts_with('/') {
        return Err(anyhow!(
            "programmer.path must be relative to the hardware tree root"
        ));
    }
    for component in programmer.split('/').filter(|seg| !seg.is_empty()) {
        if component == "." || component == ".." {
            return Err(anyhow!(
                "programmer.path contains invalid component '{component}'"
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_describe_the_reference_platform() {
        let policy = PlatformPolicy::default();
        assert_eq!(policy.emulator.program, "qemu-system-riscv32");
        assert_eq!(policy.emulator.machine, "opentitan");
        assert_eq!(policy.emulator.load_addr, 0x2003_0000);
        assert_eq!(policy.programmer.path, "build-out/sw/host/spiflash/spiflash");
    }

    #[test]
    fn partial_override_keeps_remaining_defaults() {
        let policy = policy_from_str("[emulator]\nload_addr = 0x10000000\n").unwrap();
        assert_eq!(policy.emulator.load_addr, 0x1000_0000);
        assert_eq!(policy.emulator.program, DEFAULT_EMULATOR);
        assert_eq!(policy.programmer.path, DEFAULT_PROGRAMMER);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let err = policy_from_str("[emulator]\nspeed = 3\n").unwrap_err();
        assert!(err.root_cause().to_string().contains("speed"));
    }

    #[test]
    fn absolute_programmer_path_is_rejected() {
        let err = policy_from_str("[programmer]\npath = \"/usr/bin/spiflash\"\n").unwrap_err();
        assert!(err.to_string().contains("relative"));
    }

    #[test]
    fn empty_machine_is_rejected() {
        let err = policy_from_str("[emulator]\nmachine = \" \"\n").unwrap_err();
        assert!(err.to_string().contains("emulator.machine"));
    }

    #[test]
    fn dotdot_programmer_component_is_rejected() {
        let err = policy_from_str("[programmer]\npath = \"../elsewhere/spiflash\"\n").unwrap_err();
        assert!(err.to_string().contains("invalid component"));
    }
}
