// Licensed under the Apache-2.0 license

use std::process::Command;

use anyhow::{bail, Context, Result};
use clap::{Args, Parser};

mod bloat;

use bloat::BloatFormat;

pub(crate) const FIRMWARE_TARGET: &str = "thumbv8m.main-none-eabihf";
pub(crate) const FIRMWARE_BIN: &str = "pico2-i2c";
pub(crate) const FIRMWARE_FEATURES: &str = "rt";

// ----------------------------------------------------------------------------
// Command-line Interface

#[derive(Debug, Parser)]
enum Cli {
    /// Build the firmware image for the Pico 2.
    Build(BuildArgs),
    /// Run the host test suite against the simulated registers.
    Test(TestArgs),
    /// Report the size of the firmware image.
    Bloat(BloatArgs),
}

#[derive(Debug, Args)]
struct BuildArgs {
    /// Build in release mode.
    #[arg(long)]
    release: bool,
    /// Extra features to enable besides `rt`.
    #[arg(long, value_delimiter = ',')]
    features: Vec<String>,
}

#[derive(Debug, Args)]
struct TestArgs {
    /// Also run the suite without default features.
    #[arg(long)]
    no_default_features: bool,
}

#[derive(Debug, Args)]
struct BloatArgs {
    /// Analyze the release image.
    #[arg(long)]
    release: bool,
    /// Output format of the size table.
    #[arg(long, value_enum, default_value_t = BloatFormat::Table)]
    format: BloatFormat,
    /// Write full reports to this directory instead of printing a table.
    #[arg(long)]
    report_dir: Option<String>,
}

// ----------------------------------------------------------------------------
// Application

fn main() -> Result<()> {
    match Cli::parse() {
        Cli::Build(args) => build(&args),
        Cli::Test(args) => test(&args),
        Cli::Bloat(args) => match args.report_dir {
            Some(dir) => bloat::generate_report(args.release, FIRMWARE_TARGET, &dir),
            None => bloat::analyze_bloat(args.release, FIRMWARE_TARGET, args.format),
        },
    }
}

fn build(args: &BuildArgs) -> Result<()> {
    let mut features = vec![FIRMWARE_FEATURES.to_string()];
    features.extend(args.features.iter().cloned());

    let mut cmd = Command::new("cargo");
    cmd.args(["build", "--bin", FIRMWARE_BIN, "--target", FIRMWARE_TARGET]);
    cmd.args(["--features", &features.join(",")]);
    if args.release {
        cmd.arg("--release");
    }
    run(cmd)
}

fn test(args: &TestArgs) -> Result<()> {
    let mut cmd = Command::new("cargo");
    cmd.args(["test", "--lib"]);
    run(cmd)?;

    if args.no_default_features {
        let mut cmd = Command::new("cargo");
        cmd.args(["test", "--lib", "--no-default-features"]);
        run(cmd)?;
    }
    Ok(())
}

fn run(mut cmd: Command) -> Result<()> {
    let status = cmd
        .status()
        .with_context(|| format!("Failed to spawn {:?}", cmd))?;
    if !status.success() {
        bail!("{:?} exited with {}", cmd, status);
    }
    Ok(())
}
