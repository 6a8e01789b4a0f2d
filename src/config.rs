// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Resolve the per-run board configuration record.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Result};

/// Target triple assumed when none is supplied.
pub const DEFAULT_TARGET: &str = "riscv32imc-unknown-none-elf";
/// Platform identifier assumed when none is supplied.
pub const DEFAULT_PLATFORM: &str = "opentitan";
/// Build output root assumed when none is supplied.
pub const DEFAULT_BUILD_ROOT: &str = "target";

/// Optional configuration fields a workflow may require.
///
/// Each field knows its flag and environment spelling so a missing-field
/// error can tell the user how to supply it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    /// Boot ROM image handed to the emulator.
    BootRom,
    /// Userspace app image injected into emulator memory.
    App,
    /// Root of the hardware tree hosting the programmer.
    HardwareTree,
}

impl Field {
    /// CLI flag that populates this field.
    #[must_use]
    pub fn flag(self) -> &'static str {
        match self {
            Field::BootRom => "--boot-rom",
            Field::App => "--app",
            Field::HardwareTree => "--tree",
        }
    }

    /// Environment variable consulted when the flag is absent.
    #[must_use]
    pub fn env_var(self) -> &'static str {
        match self {
            Field::BootRom => "BRINGUP_BOOT_ROM",
            Field::App => "BRINGUP_APP",
            Field::HardwareTree => "BRINGUP_HW_TREE",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::BootRom => "boot-rom",
            Field::App => "app",
            Field::HardwareTree => "hardware-tree",
        };
        f.write_str(name)
    }
}

/// Values supplied on the command line, before environment fallback.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    /// Target triple override.
    pub target: Option<String>,
    /// Platform identifier override.
    pub platform: Option<String>,
    /// Build output root override.
    pub build_root: Option<PathBuf>,
    /// Boot ROM path override.
    pub boot_rom: Option<PathBuf>,
    /// Hardware tree root override.
    pub hardware_tree: Option<PathBuf>,
    /// App image path override.
    pub app: Option<PathBuf>,
    /// App load address override.
    pub load_addr: Option<u32>,
}

/// Configuration record built once per run and passed to every component.
///
/// Optional fields stay `None` when unsupplied; requirement checking is the
/// workflow resolver's job, not this record's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BoardConfig {
    /// Compilation target triple, used only for path construction.
    pub target: String,
    /// Board/platform identifier, used only for path construction.
    pub platform: String,
    /// Root directory of the build output tree.
    pub build_root: PathBuf,
    /// Boot ROM image for the emulator workflows.
    pub boot_rom: Option<PathBuf>,
    /// Hardware tree root for the flash workflow.
    pub hardware_tree: Option<PathBuf>,
    /// Userspace app image for the emulate-with-app workflow.
    pub app: Option<PathBuf>,
    /// App load address; the platform policy default applies when unset.
    pub load_addr: Option<u32>,
}

impl BoardConfig {
    /// Resolve the record from CLI overrides, then environment, then defaults.
    pub fn resolve(overrides: ConfigOverrides) -> Result<Self> {
        let target = overrides
            .target
            .or_else(|| env_string("BRINGUP_TARGET"))
            .unwrap_or_else(|| DEFAULT_TARGET.to_owned());
        let platform = overrides
            .platform
            .or_else(|| env_string("BRINGUP_PLATFORM"))
            .unwrap_or_else(|| DEFAULT_PLATFORM.to_owned());
        let build_root = overrides
            .build_root
            .or_else(|| env_path("BRINGUP_BUILD_ROOT"))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_BUILD_ROOT));
        let boot_rom = overrides.boot_rom.or_else(|| env_path(Field::BootRom.env_var()));
        let hardware_tree = overrides
            .hardware_tree
            .or_else(|| env_path(Field::HardwareTree.env_var()));
        let app = overrides.app.or_else(|| env_path(Field::App.env_var()));
        let load_addr = match overrides.load_addr {
            Some(value) => Some(value),
            None => env_addr("BRINGUP_APP_ADDR")?,
        };
        let config = Self {
            target,
            platform,
            build_root,
            boot_rom,
            hardware_tree,
            app,
            load_addr,
        };
        log::debug!("resolved configuration: {config:?}");
        Ok(config)
    }

    /// Look up an optional path field by name.
    #[must_use]
    pub fn path(&self, field: Field) -> Option<&Path> {
        match field {
            Field::BootRom => self.boot_rom.as_deref(),
            Field::App => self.app.as_deref(),
            Field::HardwareTree => self.hardware_tree.as_deref(),
        }
    }
}

/// Parse a load address written as `0x`-prefixed hex or decimal.
pub fn parse_addr(text: &str) -> Result<u32> {
    let trimmed = text.trim();
    let parsed = match trimmed.strip_prefix("0x").or_else(|| trimmed.strip_prefix("0X")) {
        Some(hex) => u32::from_str_radix(hex, 16),
        None => trimmed.parse::<u32>(),
    };
    parsed.map_err(|err| anyhow!("invalid load address '{trimmed}': {err}"))
}

fn env_string(key: &str) -> Option<String> {
    match env::var(key) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        }
        Err(_) => None,
    }
}

fn env_path(key: &str) -> Option<PathBuf> {
    env_string(key).map(PathBuf::from)
}

fn env_addr(key: &str) -> Result<Option<u32>> {
    match env_string(key) {
        Some(value) => parse_addr(&value)
            .map(Some)
            .map_err(|err| anyhow!("{key}: {err}")),
        None => Ok(None),
    }
}
