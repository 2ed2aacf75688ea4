//! HID report codec for Sony DualShock 4 and DualSense controllers.
//!
//! Decodes raw input reports from either controller generation, over USB or
//! Bluetooth, into [`InputState`] snapshots, and builds the rumble/LED output
//! reports going the other way. Device I/O (enumeration, hidraw reads and
//! writes, feature-report ioctls) is left to the caller; this crate only
//! transforms bytes. Outbound reports reach the device through the
//! [`Transmit`] seam.

pub mod control;
pub mod controllers;
pub mod hid_report;
pub mod transport;

#[cfg(test)]
mod control_test;

pub use control::{encode, ControlState, OutputParams, Transmit};
pub use controllers::{format_pairing_address, ControllerDescriptor, Generation, PerTransport};
pub use hid_report::{InputState, Rejected, TouchFinger};
pub use transport::{HeaderTrim, Transport};
