// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Compute build artifact paths for a target/platform pair.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use std::path::PathBuf;

use crate::config::BoardConfig;

/// Kind of build output a workflow consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtifactKind {
    /// Kernel ELF image, loaded by the emulator.
    Elf,
    /// Raw binary image, written by the hardware programmer.
    RawBinary,
}

impl ArtifactKind {
    /// File extension the build step uses for this kind.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            ArtifactKind::Elf => "elf",
            ArtifactKind::RawBinary => "bin",
        }
    }
}

/// A resolved build output path.
///
/// Purely derived from the configuration record; no existence check is made
/// here. A missing file surfaces as the external tool's own failure when it
/// tries to open it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    /// What the path points at.
    pub kind: ArtifactKind,
    /// Where the build step put it.
    pub path: PathBuf,
}

impl Artifact {
    /// Resolve `<build_root>/<target>/release/<platform>.<ext>`.
    ///
    /// The layout mirrors the external build step exactly and must not
    /// drift from it.
    #[must_use]
    pub fn locate(kind: ArtifactKind, config: &BoardConfig) -> Self {
        let file = format!("{}.{}", config.platform, kind.extension());
        let path = config
            .build_root
            .join(&config.target)
            .join("release")
            .join(file);
        Self { kind, path }
    }
}
