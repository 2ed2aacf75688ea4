//! Byte layout tables for each supported controller generation.
//!
//! Both generations share a single decoder and encoder; everything that
//! differs between them is captured here as data: report ids and sizes,
//! feature-report opcodes, and the byte offset of every decoded field.

use crate::transport::{HeaderTrim, Transport};

// Hardware ID's
pub const SONY_VID: u16 = 0x054c;
pub const DS4_PIDS: [u16; 2] = [0x09cc, 0x054c];
pub const DS5_PID: u16 = 0x0ce6;

/// Payload length of the pairing address feature report.
pub const PAIRING_ADDRESS_LEN: usize = 6;
/// Length of the feature report probed to switch the controller into
/// operational mode (full input reports).
pub const OPERATIONAL_PROBE_LEN: usize = 37;

/// Pair of per-transport values, indexed by [`Transport`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PerTransport<T> {
    pub usb: T,
    pub bt: T,
}

impl<T: Copy> PerTransport<T> {
    pub fn get(&self, transport: Transport) -> T {
        match transport {
            Transport::Usb => self.usb,
            Transport::Bluetooth => self.bt,
        }
    }
}

/// Byte layout and report parameters for one controller generation.
///
/// Constructed once as a static and never mutated. Input field offsets
/// apply to the trimmed report view, see [`HeaderTrim`].
#[derive(Debug)]
pub struct ControllerDescriptor {
    pub input_report_id: PerTransport<u8>,
    pub input_report_size: PerTransport<usize>,
    pub output_report_id: PerTransport<u8>,
    pub output_report_size: PerTransport<usize>,
    /// Offset of the control fields (rumble, LED, flash) in output reports.
    pub output_offset: PerTransport<usize>,
    /// Whether output reports carry a trailing CRC-32.
    pub output_crc: bool,
    /// Feature report id that switches the device to full input reports.
    pub set_operational_op: u8,
    /// Feature report id that returns the wireless pairing address.
    pub pairing_address_op: u8,
    pub trim: HeaderTrim,

    // Input field offsets
    pub lstick: usize,
    pub rstick: usize,
    /// Byte whose low nibble holds the dpad clock-position code.
    pub dpad: usize,
    pub l2_analog: usize,
    pub r2_analog: usize,
    /// Shoulder, stick, share and options button bitmask byte.
    pub digital: usize,
    /// Face button bitmask byte. Shares the dpad byte on the DualShock 4.
    pub symbols: usize,
    /// Trackpad/PS button and frame counter byte.
    pub status: usize,
    pub accel: usize,
    pub gyro: usize,
    /// Battery level nibble plus the plug flags.
    pub battery: usize,
    pub touch: usize,
}

impl ControllerDescriptor {
    /// Report length the decoder expects once transport framing is trimmed.
    pub fn expected_input_len(&self, transport: Transport) -> usize {
        self.input_report_size.get(transport) - self.trim.amount(transport)
    }
}

pub static DUALSHOCK4: ControllerDescriptor = ControllerDescriptor {
    input_report_id: PerTransport { usb: 0x01, bt: 0x11 },
    input_report_size: PerTransport { usb: 64, bt: 78 },
    output_report_id: PerTransport { usb: 0x05, bt: 0x11 },
    output_report_size: PerTransport { usb: 31, bt: 77 },
    output_offset: PerTransport { usb: 0, bt: 2 },
    output_crc: false,
    set_operational_op: 0x02,
    pairing_address_op: 0x81,
    trim: HeaderTrim::Bluetooth(2),
    lstick: 1,
    rstick: 3,
    dpad: 5,
    l2_analog: 8,
    r2_analog: 9,
    digital: 6,
    symbols: 5,
    status: 7,
    accel: 13,
    gyro: 19,
    battery: 30,
    touch: 35,
};

pub static DUALSENSE: ControllerDescriptor = ControllerDescriptor {
    input_report_id: PerTransport { usb: 0x01, bt: 0x31 },
    input_report_size: PerTransport { usb: 64, bt: 78 },
    output_report_id: PerTransport { usb: 0x02, bt: 0x31 },
    output_report_size: PerTransport { usb: 31, bt: 77 },
    output_offset: PerTransport { usb: 0, bt: 2 },
    output_crc: true,
    set_operational_op: 0x09,
    pairing_address_op: 0x09,
    trim: HeaderTrim::Bluetooth(1),
    lstick: 1,
    rstick: 3,
    dpad: 8,
    l2_analog: 5,
    r2_analog: 6,
    digital: 9,
    symbols: 8,
    status: 10,
    accel: 16,
    gyro: 22,
    battery: 32,
    touch: 33,
};

/// The two supported controller generations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Generation {
    DualShock4,
    DualSense,
}

impl Generation {
    /// Map a hardware product id to a generation. An unknown id means an
    /// unsupported device, not an error.
    pub fn from_product_id(product_id: u16) -> Option<Self> {
        match product_id {
            id if DS4_PIDS.contains(&id) => Some(Self::DualShock4),
            DS5_PID => Some(Self::DualSense),
            _ => None,
        }
    }

    pub fn descriptor(&self) -> &'static ControllerDescriptor {
        match self {
            Self::DualShock4 => &DUALSHOCK4,
            Self::DualSense => &DUALSENSE,
        }
    }
}

/// Render the raw pairing address bytes the way the device reports them:
/// reversed, colon separated, uppercase hex. Convenience for callers that
/// issue the pairing address feature request themselves.
pub fn format_pairing_address(raw: &[u8; PAIRING_ADDRESS_LEN]) -> String {
    let mut parts: Vec<String> = raw.iter().map(|b| format!("{b:02X}")).collect();
    parts.reverse();
    parts.join(":")
}
