// SPDX-License-Identifier: MIT
// © 2025–2026 Christopher Liu

//! `motord`: maps the peripherals, starts the motor and feeds it commands line by line.
//!
//! Commands come from stdin, or from `--device <path>`. A FIFO is reopened when its writers close
//! it, so `echo 50 > /run/motor` can be repeated.

use std::env;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::os::unix::fs::FileTypeExt;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use rpi_motor::device::MotorDevice;
use rpi_motor::hw::{MemRegion, Peripherals, RegisterRegion, StdDelay, PERIPHERAL_BASE};
use rpi_motor::motors::{DcMotor, MotorConfig};

const USAGE: &str = "\
Usage: motord [--device <path>] [--base <hex>] [--dry-run] [--stop-on-exit]

  --device <path>   read commands from <path> instead of stdin (FIFOs are reopened at EOF)
  --base <hex>      peripheral base address (default 0x3F000000)
  --dry-run         run against in-memory registers instead of /dev/mem
  --stop-on-exit    stop the motor when input ends
  --help            print this message

Commands: one signed frequency in Hz per line. Negative reverses, 0 stops.";

#[derive(Debug, PartialEq)]
struct Options {
    device: Option<PathBuf>,
    base: u64,
    dry_run: bool,
    stop_on_exit: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            device: None,
            base: PERIPHERAL_BASE,
            dry_run: false,
            stop_on_exit: false,
        }
    }
}

/// `None` when `--help` was requested.
fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Option<Options>> {
    let mut opts = Options::default();
    let mut args = args.into_iter();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--device" => {
                let path = args.next().context("--device needs a path")?;
                opts.device = Some(PathBuf::from(path));
            }
            "--base" => {
                let value = args.next().context("--base needs an address")?;
                opts.base = parse_hex(&value)?;
            }
            "--dry-run" => opts.dry_run = true,
            "--stop-on-exit" => opts.stop_on_exit = true,
            "-h" | "--help" => return Ok(None),
            other => bail!("unknown argument `{other}`"),
        }
    }

    Ok(Some(opts))
}

fn parse_hex(value: &str) -> Result<u64> {
    let digits = value
        .strip_prefix("0x")
        .or_else(|| value.strip_prefix("0X"))
        .unwrap_or(value);
    u64::from_str_radix(digits, 16).with_context(|| format!("invalid base address `{value}`"))
}

/// Feed every line of `input` to the device. Returns the number of commands handled.
fn serve<R: RegisterRegion, B: BufRead>(dev: &MotorDevice<R>, mut input: B) -> Result<usize> {
    let mut line = Vec::new();
    let mut commands = 0;

    loop {
        line.clear();
        if input.read_until(b'\n', &mut line)? == 0 {
            return Ok(commands);
        }
        commands += dev.write_all(&line).context("motor command failed")?;
    }
}

fn serve_path<R: RegisterRegion>(dev: &MotorDevice<R>, path: &Path) -> Result<usize> {
    let is_fifo = std::fs::metadata(path)
        .with_context(|| format!("cannot stat {}", path.display()))?
        .file_type()
        .is_fifo();
    let mut commands = 0;

    loop {
        let file = File::open(path).with_context(|| format!("cannot open {}", path.display()))?;
        commands += serve(dev, BufReader::new(file))?;
        if !is_fifo {
            return Ok(commands);
        }
        debug!(path = %path.display(), "writers closed, reopening");
    }
}

fn run<R: RegisterRegion>(hw: Peripherals<R>, opts: &Options) -> Result<DcMotor<R>> {
    let motor = DcMotor::start(hw, MotorConfig::default(), &mut StdDelay)
        .context("motor startup failed")?;
    let dev = MotorDevice::new(motor);

    let served = match &opts.device {
        Some(path) => serve_path(&dev, path),
        None => serve(&dev, io::stdin().lock()),
    };

    if opts.stop_on_exit {
        dev.stop().context("failed to stop motor")?;
    }

    let commands = served?;
    info!(commands, "input closed");
    Ok(dev.into_inner())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("rpi_motor=info,motord=info")),
        )
        .init();

    let Some(opts) = parse_args(env::args().skip(1))? else {
        println!("{USAGE}");
        return Ok(());
    };

    if opts.dry_run {
        info!("dry run, registers are simulated");
        let motor = run(Peripherals::<MemRegion>::simulated(), &opts)?;
        let hw = motor.peripherals();
        info!(
            gpio = hw.gpio.regs().writes().len(),
            pwm = hw.pwm.regs().writes().len(),
            clock = hw.clock.regs().writes().len(),
            "register writes"
        );
    } else {
        if opts.base != PERIPHERAL_BASE {
            warn!(base = format_args!("{:#X}", opts.base), "non-default peripheral base");
        }
        let hw = Peripherals::map(opts.base)
            .with_context(|| format!("cannot map peripherals at {:#X}", opts.base))?;
        run(hw, &opts)?;
    }

    Ok(())
}
