//! Unit tests for key mapping, report framing and descriptor checks.
//!
//! These tests run on the host (not embedded) and verify the pure
//! logic of the mouse report path.

use super::keymap::{lookup_move_byte, lookup_move_key, MouseKey, KEY_HELP};
use super::mouse::{
    InterruptFrame, MouseReport, BUTTON_LEFT, BUTTON_RIGHT, INTERRUPT_FRAME_SIZE,
    MOUSE_REPORT_DESCRIPTOR, MOUSE_REPORT_DESCRIPTOR_LEN,
};
use super::report_protocol::MouseLayout;

// ═══════════════════════════════════════════════════════════════════════════
// Keymap Tests
// ═══════════════════════════════════════════════════════════════════════════

#[test]
fn keymap_clicks() {
    let left = lookup_move_key('q').unwrap();
    assert_eq!(left, MouseReport::click(BUTTON_LEFT));
    assert_eq!((left.buttons, left.x, left.y), (0b01, 0, 0));

    let right = lookup_move_key('e').unwrap();
    assert_eq!((right.buttons, right.x, right.y), (0b10, 0, 0));
}

#[test]
fn keymap_vertical_movement() {
    let up = lookup_move_key('w').unwrap();
    assert_eq!((up.buttons, up.x, up.y), (0, 0, -10));

    let down = lookup_move_key('s').unwrap();
    assert_eq!((down.buttons, down.x, down.y), (0, 0, 10));
}

#[test]
fn keymap_horizontal_movement() {
    let left = lookup_move_key('a').unwrap();
    assert_eq!((left.buttons, left.x, left.y), (0, -10, 0));

    let right = lookup_move_key('d').unwrap();
    assert_eq!((right.buttons, right.x, right.y), (0, 10, 0));
}

#[test]
fn keymap_never_sets_wheel() {
    for c in ['q', 'e', 'w', 's', 'a', 'd'] {
        assert_eq!(lookup_move_key(c).unwrap().wheel, 0);
    }
}

#[test]
fn keymap_ignores_every_other_ascii_character() {
    for byte in 0u8..=0x7F {
        let c = byte as char;
        if "qewsad".contains(c) {
            continue;
        }
        assert!(lookup_move_key(c).is_none(), "{:?} should not map", c);
    }
}

#[test]
fn keymap_is_case_sensitive() {
    for c in ['Q', 'E', 'W', 'S', 'A', 'D'] {
        assert!(MouseKey::from_char(c).is_none());
    }
}

#[test]
fn keymap_bytes_match_characters() {
    assert_eq!(lookup_move_byte(b'd'), lookup_move_key('d'));
    assert_eq!(lookup_move_byte(b'\r'), None);
    // Latin-1 bytes are not characters on a UTF-8 terminal.
    assert_eq!(lookup_move_byte(0xE4), None);
}

#[test]
fn keymap_help_lists_every_binding() {
    for c in ['q', 'e', 'w', 's', 'a', 'd'] {
        assert!(KEY_HELP.lines().any(|l| l.starts_with(c)));
    }
}

// ════════════════════════════════════════════════════════════════════════
// Mouse Report / Frame Tests
// ════════════════════════════════════════════════════════════════════════

#[test]
fn mouse_report_empty() {
    let report = MouseReport::empty();
    assert!(report.is_idle());
    assert_eq!(report, MouseReport::default());
}

#[test]
fn mouse_report_movement_is_not_idle() {
    assert!(!MouseReport::movement(0, -1).is_idle());
    assert!(!MouseReport::click(BUTTON_RIGHT).is_idle());
}

#[test]
fn mouse_report_serialize_payload() {
    let report = MouseReport::movement(-10, 20);
    let mut buf = [0u8; 3];
    assert_eq!(report.serialize(&mut buf), 3);
    assert_eq!(buf, [0x00, 0xF6, 0x14]);
}

#[test]
fn mouse_report_serialize_buffer_too_small() {
    let mut buf = [0u8; 2];
    assert_eq!(MouseReport::empty().serialize(&mut buf), 0);
}

#[test]
fn frame_idle_layout() {
    assert_eq!(InterruptFrame::IDLE.as_bytes(), &[0xA1, 0, 0, 0, 0]);
    assert_eq!(InterruptFrame::from(MouseReport::empty()), InterruptFrame::IDLE);
}

#[test]
fn frame_encodes_signed_deltas() {
    let frame = InterruptFrame::from(MouseKey::Up.report());
    assert_eq!(frame.as_bytes(), &[0xA1, 0x00, 0x00, 0xF6, 0x00]);
    assert_eq!(frame.as_bytes().len(), INTERRUPT_FRAME_SIZE);
}

#[test]
fn frame_forces_wheel_to_zero() {
    let report = MouseReport {
        buttons: BUTTON_LEFT,
        x: 1,
        y: 2,
        wheel: 5,
    };
    assert_eq!(InterruptFrame::from(report).as_bytes()[4], 0);
}

#[test]
fn frame_payload_matches_report_serialization() {
    let report = MouseKey::LeftClick.report();
    let mut buf = [0u8; 3];
    report.serialize(&mut buf);
    assert_eq!(InterruptFrame::from(report).report_payload(), &buf);
}

#[test]
fn frame_from_bytes_accepts_sent_frames() {
    let frame = InterruptFrame::from(MouseKey::Right.report());
    assert_eq!(InterruptFrame::from_bytes(frame.as_bytes()), Some(frame));
    assert_eq!(frame.report_payload(), &[0x00, 0x0A, 0x00]);
}

#[test]
fn frame_from_bytes_rejects_bad_header_and_length() {
    assert_eq!(InterruptFrame::from_bytes(&[0xA2, 0, 0, 0, 0]), None);
    assert_eq!(InterruptFrame::from_bytes(&[0xA1, 0, 0, 0]), None);
    assert_eq!(InterruptFrame::from_bytes(&[0xA1, 0, 0, 0, 0, 0]), None);
}

// ════════════════════════════════════════════════════════════════════════
// Descriptor Tests
// ════════════════════════════════════════════════════════════════════════

#[test]
fn boot_descriptor_length() {
    assert_eq!(MOUSE_REPORT_DESCRIPTOR.len(), MOUSE_REPORT_DESCRIPTOR_LEN);
}

#[test]
fn boot_descriptor_layout() {
    let layout = MouseLayout::parse(MOUSE_REPORT_DESCRIPTOR).unwrap();
    assert_eq!(layout.buttons, 3);
    assert!(layout.has_x);
    assert!(layout.has_y);
    assert!(!layout.has_wheel);
    assert_eq!(layout.report_id, None);
    assert_eq!(layout.input_bits, 24);
    assert_eq!(layout.input_bytes(), 3);
}

#[test]
fn descriptor_with_wheel_and_report_id() {
    let desc = [
        0x05, 0x01, 0x09, 0x02, 0xA1, 0x01, // GD / Mouse / Application
        0x85, 0x02, // Report ID (2)
        0x09, 0x01, 0xA1, 0x00, // Pointer / Physical
        0x05, 0x09, 0x19, 0x01, 0x29, 0x05, 0x95, 0x05, 0x75, 0x01, 0x81, 0x02, // 5 buttons
        0x95, 0x01, 0x75, 0x03, 0x81, 0x01, // padding
        0x05, 0x01, 0x09, 0x30, 0x09, 0x31, 0x09, 0x38, // X, Y, Wheel
        0x75, 0x08, 0x95, 0x03, 0x81, 0x06, //
        0xC0, 0xC0,
    ];
    let layout = MouseLayout::parse(&desc).unwrap();
    assert_eq!(layout.buttons, 5);
    assert!(layout.has_wheel);
    assert_eq!(layout.report_id, Some(2));
    assert_eq!(layout.input_bytes(), 4);
}

#[test]
fn keyboard_descriptor_is_not_a_mouse() {
    let desc = [
        0x05, 0x01, 0x09, 0x06, 0xA1, 0x01, // GD / Keyboard / Application
        0x05, 0x07, 0x19, 0xE0, 0x29, 0xE7, 0x95, 0x08, 0x75, 0x01, 0x81, 0x02, //
        0xC0,
    ];
    assert!(MouseLayout::parse(&desc).is_none());
}

#[test]
fn truncated_descriptor_stops_cleanly() {
    let cut = &MOUSE_REPORT_DESCRIPTOR[..27];
    // Cut mid-item: the items before the cut still count.
    let layout = MouseLayout::parse(cut).unwrap();
    assert_eq!(layout.buttons, 3);
    assert!(!layout.has_x);

    assert!(MouseLayout::parse(&[]).is_none());
    assert!(MouseLayout::parse(&[0x05]).is_none());
}

#[test]
fn padding_only_collection_is_rejected() {
    let desc = [
        0x05, 0x01, 0x09, 0x02, 0xA1, 0x01, //
        0x95, 0x01, 0x75, 0x08, 0x81, 0x01, // constant only
        0xC0,
    ];
    assert!(MouseLayout::parse(&desc).is_none());
}

#[test]
fn oversized_input_is_rejected_without_overflow() {
    // Report Size 256, Report Count 256: 65536 bits.
    let descriptor = [
        0x05, 0x01, 0x09, 0x02, 0xA1, 0x01, 0x76, 0x00, 0x01, 0x96, 0x00, 0x01, 0x81, 0x02,
        0xC0,
    ];
    assert_eq!(MouseLayout::parse(&descriptor), None);
}

#[test]
fn button_count_above_255_is_rejected() {
    // 256 one-bit buttons fit the bit total but not the button count.
    let descriptor = [
        0x05, 0x01, 0x09, 0x02, 0xA1, 0x01, 0x05, 0x09, 0x75, 0x01, 0x96, 0x00, 0x01, 0x81,
        0x02, 0xC0,
    ];
    assert_eq!(MouseLayout::parse(&descriptor), None);
}
