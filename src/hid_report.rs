//! Input report decoding.
//!
//! The decoder is a pure function over a trimmed report buffer and a
//! generation descriptor; all field extraction is fixed-offset arithmetic,
//! so the same code serves both generations on both transports.

use thiserror::Error;

use crate::controllers::ControllerDescriptor;
use crate::transport::Transport;

/// Reasons an inbound report is discarded. Neither case is fatal: the caller
/// drops the frame and picks up the next one on the following poll.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Rejected {
    #[error("short report: expected {expected} bytes, got {got}")]
    ShortRead { expected: usize, got: usize },
    #[error("unexpected report id: expected {expected:#04x}, got {got:#04x}")]
    UnexpectedReportId { expected: u8, got: u8 },
}

/// One decoded trackpad contact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TouchFinger {
    /// 7-bit contact identifier.
    pub id: u8,
    /// High bit of the contact byte is clear while the finger is down.
    pub active: bool,
    pub x: u16,
    pub y: u16,
}

impl TouchFinger {
    fn unpack(block: &[u8]) -> Self {
        Self {
            id: block[0] & 0x7f,
            active: (block[0] >> 7) == 0,
            x: ((block[2] as u16 & 0x0f) << 8) | block[1] as u16,
            y: ((block[3] as u16) << 4) | ((block[2] as u16 & 0xf0) >> 4),
        }
    }
}

/// Fully decoded snapshot of one input report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct InputState {
    pub left_analog_x: u8,
    pub left_analog_y: u8,
    pub right_analog_x: u8,
    pub right_analog_y: u8,
    pub l2_analog: u8,
    pub r2_analog: u8,

    pub dpad_up: bool,
    pub dpad_down: bool,
    pub dpad_left: bool,
    pub dpad_right: bool,

    pub button_cross: bool,
    pub button_circle: bool,
    pub button_square: bool,
    pub button_triangle: bool,
    pub button_l1: bool,
    pub button_l2: bool,
    pub button_l3: bool,
    pub button_r1: bool,
    pub button_r2: bool,
    pub button_r3: bool,
    pub button_share: bool,
    pub button_options: bool,
    pub button_trackpad: bool,
    pub button_ps: bool,

    pub motion_x: i16,
    pub motion_y: i16,
    pub motion_z: i16,
    /// Sign-inverted relative to the wire value.
    pub orientation_roll: i16,
    pub orientation_yaw: i16,
    pub orientation_pitch: i16,

    pub trackpad_touch0: TouchFinger,
    pub trackpad_touch1: TouchFinger,

    /// Frame counter, top six bits of the status byte.
    pub timestamp: u8,
    pub battery: u8,
    pub plug_usb: bool,
    pub plug_audio: bool,
    pub plug_mic: bool,
}

impl InputState {
    /// Decode a trimmed report buffer into a snapshot.
    ///
    /// Validates length and report id against the descriptor before reading
    /// any field; on rejection the frame is simply skipped.
    pub fn unpack(
        buf: &[u8],
        desc: &ControllerDescriptor,
        transport: Transport,
    ) -> Result<Self, Rejected> {
        let expected = desc.expected_input_len(transport);
        if buf.len() < expected {
            log::trace!("Discarding short report: {} < {expected}", buf.len());
            return Err(Rejected::ShortRead {
                expected,
                got: buf.len(),
            });
        }
        let report_id = desc.input_report_id.get(transport);
        if buf[0] != report_id {
            log::trace!("Discarding foreign report id {:#04x}", buf[0]);
            return Err(Rejected::UnexpectedReportId {
                expected: report_id,
                got: buf[0],
            });
        }

        // Clock-position code: 0 = north through 7 = north-west, 8 = released.
        // Diagonals set two flags.
        let dpad = buf[desc.dpad] & 0x0f;

        Ok(Self {
            left_analog_x: buf[desc.lstick],
            left_analog_y: buf[desc.lstick + 1],
            right_analog_x: buf[desc.rstick],
            right_analog_y: buf[desc.rstick + 1],
            l2_analog: buf[desc.l2_analog],
            r2_analog: buf[desc.r2_analog],

            dpad_up: matches!(dpad, 0 | 1 | 7),
            dpad_down: matches!(dpad, 3 | 4 | 5),
            dpad_left: matches!(dpad, 5 | 6 | 7),
            dpad_right: matches!(dpad, 1 | 2 | 3),

            button_square: buf[desc.symbols] & 0x10 != 0,
            button_cross: buf[desc.symbols] & 0x20 != 0,
            button_circle: buf[desc.symbols] & 0x40 != 0,
            button_triangle: buf[desc.symbols] & 0x80 != 0,

            button_l1: buf[desc.digital] & 0x01 != 0,
            button_r1: buf[desc.digital] & 0x02 != 0,
            button_l2: buf[desc.digital] & 0x04 != 0,
            button_r2: buf[desc.digital] & 0x08 != 0,
            button_share: buf[desc.digital] & 0x10 != 0,
            button_options: buf[desc.digital] & 0x20 != 0,
            button_l3: buf[desc.digital] & 0x40 != 0,
            button_r3: buf[desc.digital] & 0x80 != 0,

            button_ps: buf[desc.status] & 0x01 != 0,
            button_trackpad: buf[desc.status] & 0x02 != 0,

            motion_x: i16_le(buf, desc.accel),
            motion_y: i16_le(buf, desc.accel + 2),
            motion_z: i16_le(buf, desc.accel + 4),

            // The first gyro axis is sign-inverted on the wire.
            orientation_roll: i16_le(buf, desc.gyro).wrapping_neg(),
            orientation_yaw: i16_le(buf, desc.gyro + 2),
            orientation_pitch: i16_le(buf, desc.gyro + 4),

            trackpad_touch0: TouchFinger::unpack(&buf[desc.touch..]),
            // The second contact record starts three bytes into the block.
            trackpad_touch1: TouchFinger::unpack(&buf[desc.touch + 3..]),

            timestamp: buf[desc.status] >> 2,
            battery: buf[desc.battery] & 0x0f,
            plug_usb: buf[desc.battery] & 0x10 != 0,
            plug_audio: buf[desc.battery] & 0x20 != 0,
            plug_mic: buf[desc.battery] & 0x40 != 0,
        })
    }
}

fn i16_le(buf: &[u8], offset: usize) -> i16 {
    i16::from_le_bytes([buf[offset], buf[offset + 1]])
}
