// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Validate platform policy loading from disk.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use std::fs;

use anyhow::Result;
use bringup::policy::{load_policy, DEFAULT_EMULATOR};
use tempfile::tempdir;

#[test]
fn override_file_merges_over_defaults() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("bringup.toml");
    fs::write(
        &path,
        "[emulator]\nmachine = \"earlgrey\"\nload_addr = 0x20040000\n\n[programmer]\npath = \"bazel-bin/sw/host/opentitantool\"\n",
    )?;
    let policy = load_policy(&path)?;
    assert_eq!(policy.emulator.machine, "earlgrey");
    assert_eq!(policy.emulator.load_addr, 0x2004_0000);
    assert_eq!(policy.emulator.program, DEFAULT_EMULATOR);
    assert_eq!(policy.programmer.path, "bazel-bin/sw/host/opentitantool");
    Ok(())
}

#[test]
fn unknown_keys_name_the_offender() -> Result<()> {
    let dir = tempdir()?;
    let path = dir.path().join("bringup.toml");
    fs::write(&path, "[emulator]\ncpu_count = 2\n")?;
    let err = load_policy(&path).unwrap_err();
    assert!(format!("{err:#}").contains("cpu_count"));
    Ok(())
}

#[test]
fn missing_file_is_reported_with_its_path() {
    let err = load_policy(std::path::Path::new("/definitely/not/here.toml")).unwrap_err();
    assert!(err.to_string().contains("/definitely/not/here.toml"));
}
