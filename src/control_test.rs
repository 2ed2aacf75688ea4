use std::error::Error;

use crate::control::{encode, ControlState, OutputParams, Transmit};
use crate::controllers::{Generation, DUALSENSE, DUALSHOCK4};
use crate::transport::Transport;

#[derive(Default)]
struct MockTransmit {
    writes: Vec<(u8, Vec<u8>)>,
}

impl Transmit for MockTransmit {
    fn write_report(
        &mut self,
        report_id: u8,
        buf: &[u8],
    ) -> Result<(), Box<dyn Error + Send + Sync>> {
        self.writes.push((report_id, buf.to_vec()));
        Ok(())
    }
}

fn params() -> OutputParams {
    OutputParams {
        small_rumble: 1,
        big_rumble: 2,
        led_red: 3,
        led_green: 4,
        led_blue: 5,
        flash_on: 6,
        flash_off: 7,
    }
}

#[test]
fn usb_output_layout() {
    let (report_id, buf) = encode(&params(), &DUALSHOCK4, Transport::Usb);
    assert_eq!(report_id, 0x05);
    assert_eq!(buf.len(), 31);
    assert_eq!(buf[0], 0xff);
    // Control fields sit at offset 0 on USB
    assert_eq!(&buf[3..10], &[1, 2, 3, 4, 5, 6, 7]);
    assert!(buf[10..].iter().all(|b| *b == 0));
}

#[test]
fn bluetooth_output_layout() {
    let (report_id, buf) = encode(&params(), &DUALSHOCK4, Transport::Bluetooth);
    assert_eq!(report_id, 0x11);
    assert_eq!(buf.len(), 77);
    assert_eq!(buf[0], 0x80);
    // Control fields shift by the wireless output offset
    assert_eq!(&buf[5..12], &[1, 2, 3, 4, 5, 6, 7]);
}

#[test]
fn dualsense_output_carries_crc() {
    let (report_id, buf) = encode(&params(), &DUALSENSE, Transport::Usb);
    assert_eq!(report_id, 0x02);
    assert_eq!(buf.len(), 31);

    // The checksum covers the report id and the payload with the checksum
    // bytes still zeroed
    let mut payload = buf.clone();
    let crcpos = payload.len() - 4;
    payload[crcpos..].fill(0);
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&[report_id]);
    hasher.update(&payload);
    let crc = hasher.finalize().to_be_bytes();
    assert_eq!(&buf[crcpos..], &crc[..]);
}

#[test]
fn roundtrip_recovers_control_fields() {
    let params = OutputParams {
        small_rumble: 120,
        big_rumble: 255,
        led_red: 64,
        led_green: 0,
        led_blue: 32,
        flash_on: 50,
        flash_off: 25,
    };
    let (_, buf) = encode(&params, &DUALSHOCK4, Transport::Bluetooth);
    let offset = 2;
    let decoded = OutputParams {
        small_rumble: buf[offset + 3],
        big_rumble: buf[offset + 4],
        led_red: buf[offset + 5],
        led_green: buf[offset + 6],
        led_blue: buf[offset + 7],
        flash_on: buf[offset + 8],
        flash_off: buf[offset + 9],
    };
    assert_eq!(decoded, params);
}

#[test]
fn start_flash_is_idempotent_while_active() {
    let mut tx = MockTransmit::default();
    let mut state = ControlState::new(Generation::DualShock4, Transport::Usb);

    state.start_led_flash(&mut tx, 30, 30).unwrap();
    state.start_led_flash(&mut tx, 90, 90).unwrap();
    assert_eq!(tx.writes.len(), 1);
    assert_eq!(&tx.writes[0].1[8..10], &[30, 30]);
}

#[test]
fn stop_flash_writes_twice_and_restores_color() {
    let mut tx = MockTransmit::default();
    let mut state = ControlState::new(Generation::DualShock4, Transport::Usb);

    state.set_led(&mut tx, 10, 20, 30).unwrap();
    state.start_led_flash(&mut tx, 40, 50).unwrap();
    state.stop_led_flash(&mut tx).unwrap();
    assert_eq!(tx.writes.len(), 4);

    let flashing = &tx.writes[1].1;
    assert_eq!(&flashing[8..10], &[40, 50]);

    // Both stop writes carry zeroed flash fields and the steady color
    for (_, buf) in &tx.writes[2..] {
        assert_eq!(&buf[5..8], &[10, 20, 30]);
        assert_eq!(&buf[8..10], &[0, 0]);
    }

    // Stopping again does nothing
    state.stop_led_flash(&mut tx).unwrap();
    assert_eq!(tx.writes.len(), 4);
}

#[test]
fn rumble_keeps_last_led_state() {
    let mut tx = MockTransmit::default();
    let mut state = ControlState::new(Generation::DualShock4, Transport::Usb);

    state.set_led(&mut tx, 10, 20, 30).unwrap();
    state.rumble(&mut tx, 5, 9).unwrap();

    let buf = &tx.writes[1].1;
    assert_eq!(&buf[3..5], &[5, 9]);
    assert_eq!(&buf[5..8], &[10, 20, 30]);
    assert_eq!(&buf[8..10], &[0, 0]);
}

#[test]
fn shutdown_restores_pairing_color() {
    let mut tx = MockTransmit::default();
    let mut state = ControlState::new(Generation::DualShock4, Transport::Usb);

    state.set_led(&mut tx, 99, 0, 0).unwrap();
    state.start_led_flash(&mut tx, 60, 60).unwrap();
    state.shutdown(&mut tx).unwrap();

    let (report_id, buf) = tx.writes.last().unwrap();
    assert_eq!(*report_id, 0x05);
    assert_eq!(&buf[3..5], &[0, 0]);
    assert_eq!(&buf[5..8], &[0, 0, 1]);
    assert_eq!(&buf[8..10], &[0, 0]);
}
