//! Argument model and the command flow run against an opened keyboard.

use anyhow::Result;
use clap::Parser;
use k40_rgb_core::comm::{self, DEFAULT_TIMEOUT};
use k40_rgb_core::device::ProfileTarget;
use k40_rgb_core::error::Error;
use k40_rgb_core::protocol::Operation;
use k40_rgb_core::safety;
use k40_rgb_core::status::StatusResponse;
use k40_rgb_core::transport::UsbTransport;
use std::io::Write;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "k40-rgb",
    version,
    about = "Set the backlight color of a Corsair K40 keyboard",
    arg_required_else_help = true
)]
pub struct Cli {
    /// Set control mode: sw (software) or hw (hardware).
    #[arg(short, long, value_name = "CONTROL")]
    pub control: Option<String>,

    /// Set color for profile NUM (1-3) only.
    #[arg(short, long, value_name = "NUM")]
    pub profile: Option<String>,

    /// Set color mode: true (True Color) or max (Max brightness).
    #[arg(short, long, value_name = "MODE")]
    pub mode: Option<String>,

    /// Set animation: off, pulse, cycle.
    #[arg(short, long, value_name = "ANIM")]
    pub anim: Option<String>,

    /// Read the current color and exit.
    #[arg(short, long)]
    pub read: bool,

    /// With --read, print the decoded status as JSON.
    #[arg(long, requires = "read")]
    pub json: bool,

    /// Timeout for each USB transfer in milliseconds (0 waits forever).
    #[arg(long, value_name = "MS", default_value_t = DEFAULT_TIMEOUT.as_millis() as u64)]
    pub timeout_ms: u64,

    /// Red, green and blue (0-255 each, decimal or 0x-prefixed hex).
    #[arg(value_name = "COLOR")]
    pub colors: Vec<String>,
}

impl Cli {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

/// A fully validated command line, ready to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Mode writes, in the order they are applied.
    pub writes: Vec<Operation>,
    pub read: bool,
    pub json: bool,
    /// Final color write, if three channels were given.
    pub color: Option<Operation>,
}

impl Invocation {
    /// Validate every argument. Nothing here touches the device.
    pub fn from_cli(cli: &Cli) -> k40_rgb_core::error::Result<Self> {
        let mut writes = Vec::new();
        if let Some(control) = &cli.control {
            writes.push(Operation::SetColorControl {
                control: safety::parse_control(control)?,
            });
        }
        if let Some(mode) = &cli.mode {
            writes.push(Operation::SetColorMode {
                mode: safety::parse_color_mode(mode)?,
            });
        }
        if let Some(anim) = &cli.anim {
            writes.push(Operation::SetAnimation {
                anim: safety::parse_animation(anim)?,
            });
        }

        let profile = match &cli.profile {
            Some(p) => safety::parse_profile(p)?,
            None => ProfileTarget::Current,
        };

        let color = match cli.colors.as_slice() {
            [] => None,
            [r, g, b] => Some(Operation::SetColor {
                color: safety::parse_color(r, g, b)?,
                profile,
            }),
            other => {
                return Err(Error::InvalidArgument(format!(
                    "invalid argument count: expected 3 color values, got {}",
                    other.len()
                )))
            }
        };

        Ok(Self {
            writes,
            read: cli.read,
            json: cli.json,
            color,
        })
    }
}

/// Human-readable line printed after a successful write.
pub fn confirmation(op: &Operation) -> String {
    match op {
        Operation::SetColor {
            color,
            profile: ProfileTarget::Current,
        } => format!("Set color {color}."),
        Operation::SetColor {
            color,
            profile: ProfileTarget::Profile(slot),
        } => format!("Set color {color} for profile {}.", slot.number()),
        Operation::SetColorMode { mode } => format!("Set color mode to 0x{:04X}.", mode.word()),
        Operation::SetAnimation { anim } => format!("Set animation to 0x{:04X}.", anim.word()),
        Operation::SetColorControl { control } => {
            format!("Set color control to 0x{:04X}.", control.word())
        }
        Operation::ReadStatus => "Read status.".to_string(),
    }
}

/// Dump a status read to `err`.
///
/// A failed transfer is reported and the run continues; a malformed block
/// means the transport broke its contract and is fatal.
fn print_status(
    status: k40_rgb_core::error::Result<StatusResponse>,
    err: &mut dyn Write,
) -> Result<()> {
    match status {
        Ok(status) => writeln!(err, "Status: {}", status.hex_dump())?,
        Err(e @ Error::TransferFailed { .. }) => writeln!(err, "Failed to read status: {e}")?,
        Err(e) => return Err(e.into()),
    }
    Ok(())
}

/// Run a validated invocation against an opened keyboard.
///
/// Mode writes go first, each followed by the settle delay and a status
/// dump. `--read` then prints the current color and stops; otherwise the
/// color write, if any, is issued last.
pub fn run(
    invocation: &Invocation,
    transport: &dyn UsbTransport,
    settle: Duration,
    out: &mut dyn Write,
    err: &mut dyn Write,
) -> Result<()> {
    print_status(comm::read_status(transport), err)?;

    for op in &invocation.writes {
        let observed = comm::apply(transport, op, settle)?;
        writeln!(err, "{}", confirmation(op))?;
        print_status(observed, err)?;
    }

    if invocation.read {
        let status = comm::read_status(transport)?;
        if invocation.json {
            serde_json::to_writer(&mut *out, &status)?;
            writeln!(out)?;
        } else {
            let (r, g, b) = status.rgb();
            writeln!(out, "{r} {g} {b}")?;
        }
        return Ok(());
    }

    if let Some(op) = &invocation.color {
        comm::send(transport, op)?;
        writeln!(err, "{}", confirmation(op))?;
    }

    Ok(())
}
