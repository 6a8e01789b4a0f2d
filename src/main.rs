// Copyright © 2025 Lukas Bower
// SPDX-License-Identifier: Apache-2.0
// Purpose: CLI entry point for the bringup board bring-up tool.
// Author: Lukas Bower
#![forbid(unsafe_code)]
#![warn(missing_docs)]

//! CLI entry point for the board bring-up bridge.

use std::env;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use bringup::config::{self, BoardConfig, ConfigOverrides};
use bringup::dispatch::{self, ConsoleDispatcher};
use bringup::doctor;
use bringup::invoke;
use bringup::policy::{self, PlatformPolicy};
use bringup::workflow::{Workflow, WorkflowKind};
use bringup::BringupError;
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::LevelFilter;

#[derive(Debug, Parser)]
#[command(author = "Lukas Bower", version, about = "Board bring-up bridge for kernel images")]
struct Cli {
    /// Target triple the kernel was built for.
    #[arg(long, global = true, value_name = "TRIPLE")]
    target: Option<String>,

    /// Platform identifier naming the build artifacts.
    #[arg(long, global = true, value_name = "NAME")]
    platform: Option<String>,

    /// Build output root holding `<triple>/release` artifacts.
    #[arg(long, global = true, value_name = "DIR")]
    build_root: Option<PathBuf>,

    /// Path to a platform policy TOML override.
    #[arg(long, global = true, value_name = "FILE")]
    policy: Option<PathBuf>,

    /// Print the external command without running it.
    #[arg(long, global = true, default_value_t = false)]
    dry_run: bool,

    /// Enable verbose logging.
    #[arg(long, global = true, default_value_t = false)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Boot the kernel image in the emulator.
    Emulate(EmulateArgs),
    /// Boot the kernel with a userspace app injected into emulator memory.
    EmulateWithApp(EmulateWithAppArgs),
    /// Write the raw kernel image with the hardware programmer.
    Flash(FlashArgs),
    /// Report configuration, artifact, and host tool readiness.
    Doctor,
}

#[derive(Debug, Parser)]
struct EmulateArgs {
    /// Boot ROM image handed to the emulator.
    #[arg(long, value_name = "FILE")]
    boot_rom: Option<PathBuf>,
}

#[derive(Debug, Parser)]
struct EmulateWithAppArgs {
    #[command(flatten)]
    emulate: EmulateArgs,

    /// Userspace app image injected into emulator memory.
    #[arg(long, value_name = "FILE")]
    app: Option<PathBuf>,

    /// App load address, hex with 0x prefix or decimal.
    #[arg(long, value_name = "ADDR", value_parser = config::parse_addr)]
    load_addr: Option<u32>,
}

#[derive(Debug, Parser)]
struct FlashArgs {
    /// Hardware tree root hosting the programmer.
    #[arg(long, value_name = "DIR")]
    tree: Option<PathBuf>,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    match run(cli) {
        Ok(code) => ExitCode::from(code),
        Err(err) => {
            eprintln!("bringup: {err:#}");
            let code = err
                .downcast_ref::<BringupError>()
                .map_or(1, BringupError::exit_code);
            ExitCode::from(clamp_exit(code))
        }
    }
}

fn run(cli: Cli) -> Result<u8> {
    let policy = load_policy(resolve_policy_path(cli.policy.clone()))?;
    let config = BoardConfig::resolve(overrides_for(&cli))?;
    let kind = match cli.command {
        Command::Doctor => {
            let report = doctor::run(&config, &policy);
            for line in report.lines() {
                println!("{line}");
            }
            return Ok(if report.healthy() { 0 } else { 1 });
        }
        Command::Emulate(_) => WorkflowKind::Emulate,
        Command::EmulateWithApp(_) => WorkflowKind::EmulateApp,
        Command::Flash(_) => WorkflowKind::Flash,
    };
    let workflow = Workflow::resolve(kind, &config, &policy)?;
    if cli.dry_run {
        println!("{}", invoke::build(&workflow, &config, &policy).rendered());
        return Ok(0);
    }
    dispatch::execute(&workflow, &config, &policy, &mut ConsoleDispatcher)?;
    Ok(0)
}

fn overrides_for(cli: &Cli) -> ConfigOverrides {
    let mut overrides = ConfigOverrides {
        target: cli.target.clone(),
        platform: cli.platform.clone(),
        build_root: cli.build_root.clone(),
        ..ConfigOverrides::default()
    };
    match &cli.command {
        Command::Emulate(args) => {
            overrides.boot_rom = args.boot_rom.clone();
        }
        Command::EmulateWithApp(args) => {
            overrides.boot_rom = args.emulate.boot_rom.clone();
            overrides.app = args.app.clone();
            overrides.load_addr = args.load_addr;
        }
        Command::Flash(args) => {
            overrides.hardware_tree = args.tree.clone();
        }
        Command::Doctor => {}
    }
    overrides
}

fn resolve_policy_path(cli_path: Option<PathBuf>) -> Option<PathBuf> {
    if let Some(path) = cli_path {
        return Some(path);
    }
    if let Ok(value) = env::var("BRINGUP_POLICY") {
        let trimmed = value.trim();
        if !trimmed.is_empty() {
            return Some(PathBuf::from(trimmed));
        }
    }
    let fallback = PathBuf::from("bringup.toml");
    if fallback.is_file() {
        return Some(fallback);
    }
    None
}

fn load_policy(path: Option<PathBuf>) -> Result<PlatformPolicy> {
    match path {
        Some(path) => policy::load_policy(&path),
        None => Ok(PlatformPolicy::default()),
    }
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    let mut builder =
        env_logger::Builder::from_env(Env::default().default_filter_or(default_level.as_str()));
    builder.format_timestamp_millis();
    let _ = builder.try_init();
}

fn clamp_exit(code: i32) -> u8 {
    u8::try_from(code).unwrap_or(1)
}
