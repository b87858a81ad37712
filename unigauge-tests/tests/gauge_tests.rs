//! Integration Tests für Gauge, Parser und Status-LEDs
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen MockPixelDriver

mod common;

use common::*;
use rgb::RGB8;
use unigauge_core::{
    ColorBuffer, Gauge, Health, ParseError, Status, StatusLayout, parse, render_status,
};

const N: usize = 36;

fn started_gauge() -> Gauge<MockPixelDriver, N> {
    let mut gauge = Gauge::new(MockPixelDriver::new(N), LAYOUT);
    gauge.start();
    gauge.driver_mut().reset_counters();
    gauge
}

/// 36 Einträge, nur der letzte rot
fn last_led_red() -> String {
    let mut colors = [[0, 0, 0]; N];
    colors[N - 1] = [255, 0, 0];
    leds_json(&colors)
}

// ============================================================================
// Tests: Status-LEDs
// ============================================================================

#[test]
fn test_start_shows_initial_status() {
    let mut gauge: Gauge<_, N> = Gauge::new(MockPixelDriver::new(N), LAYOUT);
    gauge.start();

    let driver = gauge.driver();
    assert_eq!(driver.clear_count, 1);
    assert_eq!(driver.show_count, 1);

    let shown = driver.last_shown().unwrap();
    assert_eq!(shown[LAYOUT.network], RED);
    assert_eq!(shown[LAYOUT.link], RED);
    assert_eq!(shown[LAYOUT.parser], GREEN);
    assert_eq!(shown.iter().filter(|&&c| c != OFF).count(), 3);
}

#[test]
fn test_render_same_status_twice_is_identical() {
    let mut driver = MockPixelDriver::new(N);
    let status = Status {
        network: Health::Ok,
        link: Health::Fail,
        parser: Health::Ok,
    };

    render_status(&mut driver, &status, &LAYOUT).unwrap();
    render_status(&mut driver, &status, &LAYOUT).unwrap();

    assert_eq!(driver.shown.len(), 2);
    assert_eq!(driver.shown[0], driver.shown[1]);
}

#[test]
fn test_status_uses_layout_brightness() {
    let layout = StatusLayout {
        network: 0,
        link: 1,
        parser: 2,
        brightness: 255,
    };
    let mut driver = MockPixelDriver::new(4);

    render_status(&mut driver, &Status::default(), &layout).unwrap();

    let shown = driver.last_shown().unwrap();
    assert_eq!(shown[0], RGB8 { r: 255, g: 0, b: 0 });
    assert_eq!(shown[1], RGB8 { r: 255, g: 0, b: 0 });
    assert_eq!(shown[2], RGB8 { r: 0, g: 255, b: 0 });
    assert_eq!(shown[3], OFF);
}

#[test]
fn test_update_network_renders_only_on_change() {
    let mut gauge = started_gauge();

    assert!(gauge.update_network(true));
    assert!(!gauge.update_network(true));
    assert_eq!(gauge.driver().show_count, 1);
    assert_eq!(gauge.driver().last_shown().unwrap()[LAYOUT.network], GREEN);

    assert!(gauge.update_network(false));
    assert_eq!(gauge.driver().show_count, 2);
    assert_eq!(gauge.driver().last_shown().unwrap()[LAYOUT.network], RED);
}

// ============================================================================
// Tests: Nachrichten
// ============================================================================

#[test]
fn test_valid_message_updates_strip() {
    let mut gauge = started_gauge();
    let payload = last_led_red();

    gauge.handle_message(&message(&payload)).unwrap();

    assert_eq!(gauge.frame().get(0), Some(OFF));
    assert_eq!(gauge.frame().get(35), Some(RGB8 { r: 255, g: 0, b: 0 }));
    assert_eq!(gauge.status().parser, Health::Ok);

    let driver = gauge.driver();
    assert_eq!(driver.set_calls.len(), N);
    assert_eq!(driver.show_count, 1);
    assert_eq!(driver.clear_count, 0);
    assert_eq!(driver.last_shown().unwrap()[35], RGB8 { r: 255, g: 0, b: 0 });
}

#[test]
fn test_valid_message_replaces_every_entry() {
    let mut gauge = started_gauge();

    let first: Vec<[i32; 3]> = (0..N as i32).map(|i| [i, 2 * i, 3 * i]).collect();
    gauge.handle_message(&message(&leds_json(&first))).unwrap();

    let second = [[7, 8, 9]; N];
    gauge.handle_message(&message(&leds_json(&second))).unwrap();

    assert!(gauge.frame().iter().all(|c| c == RGB8 { r: 7, g: 8, b: 9 }));
    for (index, (set_index, _)) in gauge.driver().set_calls[N..].iter().enumerate() {
        assert_eq!(*set_index, index);
    }
}

#[test]
fn test_message_never_touches_pixels_beyond_gauge() {
    const SMALL: usize = 8;
    let layout = StatusLayout {
        network: 0,
        link: 1,
        parser: 2,
        brightness: 32,
    };
    let sentinel = RGB8 { r: 1, g: 2, b: 3 };

    let mut gauge: Gauge<_, SMALL> = Gauge::new(MockPixelDriver::new(12), layout);
    gauge.driver_mut().pixels[10] = sentinel;

    let payload = leds_json(&[[200, 100, 50]; SMALL]);
    gauge.handle_message(&message(&payload)).unwrap();

    let driver = gauge.driver();
    assert!(driver.set_calls.iter().all(|(index, _)| *index < SMALL));
    assert_eq!(driver.pixels[10], sentinel);
}

#[test]
fn test_short_message_is_rejected() {
    let mut gauge = started_gauge();
    gauge.handle_message(&message(&last_led_red())).unwrap();
    let before = *gauge.frame();
    gauge.driver_mut().reset_counters();

    let result = gauge.handle_message(&message(r#"{"LEDS":[[1,2]]}"#));

    assert_eq!(result, Err(ParseError::Malformed));
    assert_eq!(*gauge.frame(), before);
    assert_eq!(gauge.status().parser, Health::Fail);

    // Nur die Status-LEDs werden neu gezeichnet
    let driver = gauge.driver();
    assert_eq!(driver.clear_count, 1);
    assert_eq!(driver.show_count, 1);
    assert_eq!(driver.last_shown().unwrap()[LAYOUT.parser], RED);
}

#[test]
fn test_rejected_messages_leave_frame_unchanged() {
    let mut gauge = started_gauge();
    gauge.handle_message(&message(&last_led_red())).unwrap();
    let before = *gauge.frame();

    let mut too_long = [[0, 0, 0]; N + 1].to_vec();
    too_long[0] = [9, 9, 9];
    let out_of_range = {
        let mut colors = [[0, 0, 0]; N];
        colors[4] = [0, 256, 0];
        leds_json(&colors)
    };

    for payload in [
        String::from("not json"),
        String::from(r#"{"leds":[]}"#),
        leds_json(&too_long),
        out_of_range,
    ] {
        assert!(gauge.handle_message(&message(&payload)).is_err());
        assert_eq!(*gauge.frame(), before);
        assert_eq!(gauge.status().parser, Health::Fail);
    }
}

#[test]
fn test_parser_recovers_after_valid_message() {
    let mut gauge = started_gauge();

    let _ = gauge.handle_message(&message("{}"));
    assert_eq!(gauge.status().parser, Health::Fail);

    gauge.handle_message(&message(&last_led_red())).unwrap();
    assert_eq!(gauge.status().parser, Health::Ok);
}

#[test]
fn test_show_failure_keeps_new_frame() {
    let mut gauge = started_gauge();
    gauge.driver_mut().fail_next_show = true;

    assert!(gauge.handle_message(&message(&last_led_red())).is_ok());
    assert_eq!(gauge.frame().get(35), Some(RGB8 { r: 255, g: 0, b: 0 }));
    assert_eq!(gauge.driver().show_count, 0);
}

// ============================================================================
// Tests: Parser
// ============================================================================

#[test]
fn test_encode_then_parse_yields_same_colors() {
    let colors: Vec<[i32; 3]> = (0..N as i32)
        .map(|i| [(i * 7) % 256, 255 - i, (i * 31) % 256])
        .collect();

    let buffer: ColorBuffer<N> = parse(leds_json(&colors).as_bytes()).unwrap();

    for (index, [r, g, b]) in colors.iter().enumerate() {
        let expected = RGB8 {
            r: *r as u8,
            g: *g as u8,
            b: *b as u8,
        };
        assert_eq!(buffer[index], expected);
    }
}

#[test]
fn test_channel_limits() {
    let mut colors = [[128, 128, 128]; N];
    colors[0] = [0, 0, 0];
    colors[1] = [255, 255, 255];
    let buffer: ColorBuffer<N> = parse(leds_json(&colors).as_bytes()).unwrap();
    assert_eq!(buffer[0], OFF);
    assert_eq!(buffer[1], RGB8 { r: 255, g: 255, b: 255 });

    colors[2] = [0, 0, 256];
    assert_eq!(
        parse::<N>(leds_json(&colors).as_bytes()),
        Err(ParseError::OutOfRange {
            pixel: 2,
            value: 256
        })
    );

    colors[2] = [-1, 0, 0];
    assert_eq!(
        parse::<N>(leds_json(&colors).as_bytes()),
        Err(ParseError::OutOfRange {
            pixel: 2,
            value: -1
        })
    );
}
