//! k40-rgb CLI: command-line keyboard backlight tool.

mod app;

use anyhow::{Context, Result};
use clap::Parser;
use k40_rgb_core::comm::TransportConfig;
use k40_rgb_core::error::Error;
use k40_rgb_core::protocol::Direction;
use k40_rgb_core::transport::UsbTransport;
use k40_rgb_core::{pids, CORSAIR_VID};
use rusb::{Recipient, RequestType, UsbContext};
use std::time::Duration;
use tracing::info;

struct CliUsbTransport {
    handle: rusb::DeviceHandle<rusb::Context>,
    timeout: Duration,
}

impl CliUsbTransport {
    fn open(vid: u16, pid: u16, timeout: Duration) -> Result<Self> {
        let mut context = rusb::Context::new().context("Failed to initialize libusb")?;
        context.set_log_level(rusb::LogLevel::Warning);

        let handle = context
            .open_device_with_vid_pid(vid, pid)
            .ok_or(Error::DeviceNotFound { vid, pid })?;

        info!(
            vid = format_args!("0x{:04X}", vid),
            pid = format_args!("0x{:04X}", pid),
            "Opened keyboard"
        );
        Ok(Self { handle, timeout })
    }
}

impl UsbTransport for CliUsbTransport {
    fn control_transfer(
        &self,
        direction: Direction,
        request: u8,
        value: u16,
        index: u16,
        buf: &mut [u8],
    ) -> k40_rgb_core::error::Result<usize> {
        let result = match direction {
            Direction::Out => self.handle.write_control(
                rusb::request_type(rusb::Direction::Out, RequestType::Vendor, Recipient::Device),
                request,
                value,
                index,
                buf,
                self.timeout,
            ),
            Direction::In => self.handle.read_control(
                rusb::request_type(rusb::Direction::In, RequestType::Vendor, Recipient::Device),
                request,
                value,
                index,
                buf,
                self.timeout,
            ),
        };

        result.map_err(|e| Error::TransferFailed {
            operation: "control transfer",
            reason: format!("{e} ({e:?})"),
        })
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = app::Cli::parse();
    let invocation = app::Invocation::from_cli(&cli)?;
    let config = TransportConfig {
        timeout: cli.timeout(),
        ..TransportConfig::default()
    };

    let transport = CliUsbTransport::open(CORSAIR_VID, pids::K40, config.timeout)?;

    let stdout = std::io::stdout();
    let stderr = std::io::stderr();
    app::run(
        &invocation,
        &transport,
        config.settle_delay,
        &mut stdout.lock(),
        &mut stderr.lock(),
    )
}
