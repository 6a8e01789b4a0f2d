// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: Deterministic host environment checks for bringup doctor.
// Author: Lukas Bower
#![forbid(unsafe_code)]

use std::process::Command;

use anyhow::{anyhow, Context, Result};

use crate::artifact::{Artifact, ArtifactKind};
use crate::config::BoardConfig;
use crate::policy::PlatformPolicy;
use crate::workflow::{Workflow, WorkflowKind};

/// Buffered doctor transcript.
#[derive(Debug, Default)]
pub struct DoctorReport {
    lines: Vec<String>,
    ready_workflows: usize,
}

impl DoctorReport {
    /// Borrow the collected transcript lines.
    #[must_use]
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Whether at least one workflow could run as configured.
    ///
    /// Tool probes are advisory: which tool matters is only known at
    /// dispatch time, and an emulator-only host legitimately lacks the
    /// programmer (and vice versa).
    #[must_use]
    pub fn healthy(&self) -> bool {
        self.ready_workflows > 0
    }

    fn push(&mut self, status: &str, check: &str, detail: &str) {
        self.lines.push(format!("{status} {check} {detail}"));
    }
}

/// Run the doctor checks and return the transcript.
pub fn run(config: &BoardConfig, policy: &PlatformPolicy) -> DoctorReport {
    let mut report = DoctorReport::default();

    report.push(
        "ok",
        "config",
        &format!(
            "target={} platform={} build_root={}",
            config.target,
            config.platform,
            config.build_root.display()
        ),
    );
    for kind in [ArtifactKind::Elf, ArtifactKind::RawBinary] {
        let artifact = Artifact::locate(kind, config);
        let status = if artifact.path.is_file() { "ok" } else { "warn" };
        report.push(
            status,
            "artifact",
            &format!("ext={} path={}", kind.extension(), artifact.path.display()),
        );
    }

    for kind in WorkflowKind::ALL {
        match Workflow::resolve(kind, config, policy) {
            Ok(_) => {
                report.ready_workflows += 1;
                report.push("ok", "workflow", &format!("name={kind}"));
            }
            Err(err) => {
                report.push("err", "workflow", &format!("name={kind} reason={err}"));
            }
        }
    }

    match tool_version(&policy.emulator.program) {
        Ok(version) => report.push(
            "ok",
            "runtime",
            &format!("tool={} version={version}", policy.emulator.program),
        ),
        Err(err) => report.push(
            "warn",
            "runtime",
            &format!("tool={} reason={err}", policy.emulator.program),
        ),
    }
    match &config.hardware_tree {
        Some(tree) => {
            let programmer = tree.join(&policy.programmer.path);
            let status = if programmer.is_file() { "ok" } else { "warn" };
            report.push(
                status,
                "runtime",
                &format!("tool=programmer path={}", programmer.display()),
            );
        }
        None => report.push(
            "skip",
            "runtime",
            "tool=programmer reason=hardware-tree not configured",
        ),
    }

    report
}

fn tool_version(tool: &str) -> Result<String> {
    let output = Command::new(tool)
        .arg("--version")
        .output()
        .with_context(|| format!("invoke {tool}"))?;
    if !output.status.success() {
        return Err(anyhow!("{tool} exited with {}", output.status));
    }
    let text = if output.stdout.is_empty() {
        String::from_utf8_lossy(&output.stderr).into_owned()
    } else {
        String::from_utf8_lossy(&output.stdout).into_owned()
    };
    let version = text.lines().next().unwrap_or("").trim().to_owned();
    if version.is_empty() {
        Ok("unknown".to_owned())
    } else {
        Ok(version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn bare_config() -> BoardConfig {
        BoardConfig {
            target: "t1".to_owned(),
            platform: "p1".to_owned(),
            build_root: PathBuf::from("target"),
            boot_rom: None,
            hardware_tree: None,
            app: None,
            load_addr: None,
        }
    }

    #[test]
    fn unconfigured_host_is_unhealthy() {
        let report = run(&bare_config(), &PlatformPolicy::default());
        assert!(!report.healthy());
        let workflows: Vec<_> = report
            .lines()
            .iter()
            .filter(|line| line.contains(" workflow "))
            .collect();
        assert_eq!(workflows.len(), WorkflowKind::ALL.len());
        assert!(workflows.iter().all(|line| line.starts_with("err")));
    }

    #[test]
    fn one_ready_workflow_makes_the_host_healthy() {
        let mut config = bare_config();
        config.boot_rom = Some(PathBuf::from("/boot.elf"));
        let report = run(&config, &PlatformPolicy::default());
        assert!(report.healthy());
        assert!(report
            .lines()
            .iter()
            .any(|line| line.starts_with("ok workflow name=emulate")));
        assert!(report
            .lines()
            .iter()
            .any(|line| line.starts_with("err workflow name=flash")));
    }
}
