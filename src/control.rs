//! Output report construction and the per-session LED/rumble state.

use std::error::Error;

use crate::controllers::{ControllerDescriptor, Generation};
use crate::transport::Transport;

/// Marker byte at the head of a direct-link output report.
const USB_MARKER: u8 = 0xff;
/// Marker byte at the head of a wireless output report.
const BT_MARKER: u8 = 0x80;
/// LED color the hardware shows while waiting to pair; restored on teardown.
const PAIRING_LED: (u8, u8, u8) = (0, 0, 1);

/// Outbound write seam. Implemented by the host's hidraw (or similar)
/// writer; the codec itself only produces bytes.
pub trait Transmit {
    fn write_report(
        &mut self,
        report_id: u8,
        buf: &[u8],
    ) -> Result<(), Box<dyn Error + Send + Sync>>;
}

/// Control fields of one output report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OutputParams {
    pub small_rumble: u8,
    pub big_rumble: u8,
    pub led_red: u8,
    pub led_green: u8,
    pub led_blue: u8,
    pub flash_on: u8,
    pub flash_off: u8,
}

/// Build an output report for the given transport. Returns the report id to
/// write it under along with the payload.
pub fn encode(
    params: &OutputParams,
    desc: &ControllerDescriptor,
    transport: Transport,
) -> (u8, Vec<u8>) {
    let report_id = desc.output_report_id.get(transport);
    let mut buf = vec![0u8; desc.output_report_size.get(transport)];
    let offset = desc.output_offset.get(transport);
    buf[0] = match transport {
        Transport::Usb => USB_MARKER,
        Transport::Bluetooth => BT_MARKER,
    };

    buf[offset + 3] = params.small_rumble;
    buf[offset + 4] = params.big_rumble;
    buf[offset + 5] = params.led_red;
    buf[offset + 6] = params.led_green;
    buf[offset + 7] = params.led_blue;
    // Flash timings, 255 = 2.5 seconds
    buf[offset + 8] = params.flash_on;
    buf[offset + 9] = params.flash_off;

    if desc.output_crc {
        write_crc(report_id, &mut buf);
    }

    (report_id, buf)
}

/// Trailing CRC-32 over the report id plus the payload (checksum bytes still
/// zero), stored big-endian in the last four bytes.
fn write_crc(report_id: u8, buf: &mut [u8]) {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&[report_id]);
    hasher.update(buf);
    let crc = hasher.finalize().to_be_bytes();
    let crcpos = buf.len() - 4;
    buf[crcpos..].copy_from_slice(&crc);
}

/// LED and flash state for one controller session.
///
/// Owned exclusively by that session. Every setter serializes the resulting
/// state and hands exactly one report (two for [`stop_led_flash`]) to the
/// transmitter. Rumble intensity is per-call and never stored.
///
/// [`stop_led_flash`]: ControlState::stop_led_flash
pub struct ControlState {
    descriptor: &'static ControllerDescriptor,
    transport: Transport,
    led: (u8, u8, u8),
    flash: (u8, u8),
    flashing: bool,
}

impl ControlState {
    pub fn new(generation: Generation, transport: Transport) -> Self {
        Self {
            descriptor: generation.descriptor(),
            transport,
            led: (0, 0, 0),
            flash: (0, 0),
            flashing: false,
        }
    }

    /// Sets the intensity of the rumble motors. Valid range is 0-255.
    pub fn rumble(
        &self,
        tx: &mut dyn Transmit,
        small: u8,
        big: u8,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.control(tx, small, big)
    }

    /// Sets the LED color. Values are RGB between 0-255.
    pub fn set_led(
        &mut self,
        tx: &mut dyn Transmit,
        red: u8,
        green: u8,
        blue: u8,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.led = (red, green, blue);
        self.control(tx, 0, 0)
    }

    /// Starts flashing the LED. A no-op while a flash cycle is active.
    pub fn start_led_flash(
        &mut self,
        tx: &mut dyn Transmit,
        on: u8,
        off: u8,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        if self.flashing {
            return Ok(());
        }
        self.flash = (on, off);
        self.flashing = true;
        self.control(tx, 0, 0)
    }

    /// Stops flashing the LED. A no-op when no flash cycle is active.
    pub fn stop_led_flash(
        &mut self,
        tx: &mut dyn Transmit,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        if !self.flashing {
            return Ok(());
        }
        self.flash = (0, 0);
        self.flashing = false;
        // Write twice, once to stop flashing...
        self.control(tx, 0, 0)?;
        // ...and once more to make sure the LED is back on.
        self.control(tx, 0, 0)
    }

    /// Final write of a session: restore the idle pairing color with rumble
    /// and flash cleared. Transmit failure here is expected when the device
    /// is already gone; the caller decides whether to ignore it.
    pub fn shutdown(&mut self, tx: &mut dyn Transmit) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.flash = (0, 0);
        self.flashing = false;
        self.led = PAIRING_LED;
        self.control(tx, 0, 0)
    }

    fn control(
        &self,
        tx: &mut dyn Transmit,
        small: u8,
        big: u8,
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        let params = OutputParams {
            small_rumble: small,
            big_rumble: big,
            led_red: self.led.0,
            led_green: self.led.1,
            led_blue: self.led.2,
            flash_on: self.flash.0,
            flash_off: self.flash.1,
        };
        let (report_id, buf) = encode(&params, self.descriptor, self.transport);
        log::debug!("Writing control report {report_id:#04x} ({} bytes)", buf.len());
        tx.write_report(report_id, &buf)
    }
}
