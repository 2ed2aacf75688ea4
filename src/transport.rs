//! Transport selection and inbound framing adjustment.

/// The link carrying reports between the controller and the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transport {
    Usb,
    Bluetooth,
}

/// How many leading framing bytes to drop from an inbound report, and on
/// which transport. At most one transport needs trimming per generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderTrim {
    None,
    Bluetooth(usize),
    Usb(usize),
}

impl HeaderTrim {
    /// Number of bytes to drop on the given transport.
    pub fn amount(&self, transport: Transport) -> usize {
        match (self, transport) {
            (HeaderTrim::Bluetooth(n), Transport::Bluetooth) => *n,
            (HeaderTrim::Usb(n), Transport::Usb) => *n,
            _ => 0,
        }
    }

    /// Borrowed view of the report with the framing bytes removed. Never
    /// copies. A buffer shorter than the trim amount becomes an empty slice
    /// and gets rejected by the decoder as a short read.
    pub fn trim<'a>(&self, buf: &'a [u8], transport: Transport) -> &'a [u8] {
        let skip = self.amount(transport).min(buf.len());
        &buf[skip..]
    }
}
