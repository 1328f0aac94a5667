//! Integration Tests für Segment-Encoder und Mode Renderer

mod common;

use clock_core::segments::{DOT_LEFT_INDEX, DOT_RIGHT_INDEX, pixel_index_for, segments_for};
use clock_core::{
    ClockCommand, ClockEngine, ClockSettings, DetachedLedWriter, DisplaySettings, DotsSettings,
    OperatingMode, PIXEL_COUNT, PixelFrame, QuietHoursConfig, RenderLoop, TimeOfDay, render_frame,
};
use common::{MockLedWriter, MockTicks};
use rgb::RGB8;

const RED: RGB8 = RGB8 { r: 255, g: 0, b: 0 };
const GREEN: RGB8 = RGB8 { r: 0, g: 255, b: 0 };
const BLUE: RGB8 = RGB8 { r: 0, g: 0, b: 255 };
const DARK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

fn render(mode: OperatingMode, now: TimeOfDay, display: &DisplaySettings) -> PixelFrame {
    render_frame(mode, now, display, &DotsSettings::default(), false, 0)
}

/// Alle LEDs einer Ziffer-Position
fn digit_pixels(frame: &PixelFrame, position: usize) -> [RGB8; 7] {
    core::array::from_fn(|segment| {
        frame
            .get(pixel_index_for(position, segment).unwrap())
            .unwrap()
    })
}

// ============================================================================
// Tests: Segment-Encoder
// ============================================================================

#[test]
fn test_leading_zero_only_on_hour_tens() {
    let display = DisplaySettings::default();
    let frame = render(OperatingMode::Clock, TimeOfDay::new(9, 5, 0), &display);

    // Stunden-Zehner: alle 7 LEDs dunkel
    assert!(digit_pixels(&frame, 0).iter().all(|pixel| *pixel == DARK));

    // Minuten-Zehner "0": 6 Segmente an, G aus
    let minute_tens = digit_pixels(&frame, 2);
    let lit = minute_tens.iter().filter(|pixel| **pixel != DARK).count();
    assert_eq!(lit, 6);
    assert_eq!(minute_tens[6], DARK);
}

#[test]
fn test_digit_one_lights_b_and_c_only() {
    let display = DisplaySettings {
        general_color: BLUE,
        ..DisplaySettings::default()
    };
    let frame = render(OperatingMode::Clock, TimeOfDay::new(10, 0, 0), &display);

    // Ziffer 0 ist "1": B → LED 6, C → LED 2
    assert_eq!(frame.get(6), Some(BLUE));
    assert_eq!(frame.get(2), Some(BLUE));
    for index in [0, 1, 3, 4, 5] {
        assert_eq!(frame.get(index), Some(DARK));
    }
}

#[test]
fn test_every_digit_matches_segment_table() {
    let display = DisplaySettings::default();
    for hour in 10..=19u8 {
        let frame = render(OperatingMode::Clock, TimeOfDay::new(hour, 0, 0), &display);
        let mask = segments_for(hour % 10);
        for (segment, pixel) in digit_pixels(&frame, 1).into_iter().enumerate() {
            let expected = if mask & (1 << segment) != 0 {
                display.general_color
            } else {
                DARK
            };
            assert_eq!(pixel, expected, "hour {hour} segment {segment}");
        }
    }
}

// ============================================================================
// Tests: Modes
// ============================================================================

#[test]
fn test_custom_without_per_digit_is_solid_general_color() {
    let display = DisplaySettings {
        general_color: RED,
        ..DisplaySettings::default()
    };
    let dots = DotsSettings {
        left_color: RED,
        right_color: RED,
        ..DotsSettings::default()
    };
    let frame = render_frame(
        OperatingMode::Custom,
        TimeOfDay::new(21, 7, 0),
        &display,
        &dots,
        false,
        0,
    );
    assert_eq!(frame.pixels(), &[RED; PIXEL_COUNT]);
}

#[test]
fn test_custom_with_per_digit_renders_clock() {
    let display = DisplaySettings {
        per_digit_enabled: true,
        per_digit_colors: [RED, GREEN, BLUE, RED],
        ..DisplaySettings::default()
    };
    let custom = render(OperatingMode::Custom, TimeOfDay::new(12, 34, 0), &display);
    let clock = render(OperatingMode::Clock, TimeOfDay::new(12, 34, 0), &display);
    assert_eq!(custom, clock);
    assert_eq!(custom.get(pixel_index_for(1, 0).unwrap()), Some(GREEN));
}

#[test]
fn test_weather_fill_ignores_time() {
    let display = DisplaySettings::default();
    let morning = render(OperatingMode::Weather, TimeOfDay::new(6, 0, 0), &display);
    let evening = render(OperatingMode::Weather, TimeOfDay::new(18, 45, 0), &display);
    assert_eq!(morning, evening);
    for index in (0..PIXEL_COUNT).filter(|i| *i != DOT_LEFT_INDEX && *i != DOT_RIGHT_INDEX) {
        assert_eq!(morning.get(index), Some(display.general_color));
    }
}

#[test]
fn test_forced_dot_color_overrides_both_sides() {
    let dots = DotsSettings {
        left_color: RED,
        right_color: BLUE,
        force_override: true,
        forced_color: GREEN,
        ..DotsSettings::default()
    };
    let frame = render_frame(
        OperatingMode::Clock,
        TimeOfDay::new(12, 0, 0),
        &DisplaySettings::default(),
        &dots,
        false,
        0,
    );
    assert_eq!(frame.get(DOT_LEFT_INDEX), Some(GREEN));
    assert_eq!(frame.get(DOT_RIGHT_INDEX), Some(GREEN));
}

#[test]
fn test_disabled_dots_are_dark() {
    let dots = DotsSettings {
        enabled: false,
        ..DotsSettings::default()
    };
    let frame = render_frame(
        OperatingMode::Weather,
        TimeOfDay::new(12, 0, 0),
        &DisplaySettings::default(),
        &dots,
        false,
        0,
    );
    assert_eq!(frame.get(DOT_LEFT_INDEX), Some(DARK));
    assert_eq!(frame.get(DOT_RIGHT_INDEX), Some(DARK));
}

#[test]
fn test_alarm_mode_dots_blink_but_clock_mode_dots_do_not() {
    let dots = DotsSettings::default();
    let display = DisplaySettings::default();
    let at = |mode, now_ms| {
        render_frame(mode, TimeOfDay::new(8, 0, 0), &display, &dots, false, now_ms)
            .get(DOT_LEFT_INDEX)
    };
    assert_eq!(at(OperatingMode::Alarm, 750), Some(DARK));
    assert_eq!(at(OperatingMode::Alarm, 1_250), Some(dots.left_color));
    assert_eq!(at(OperatingMode::Clock, 750), Some(dots.left_color));
}

#[test]
fn test_firing_alarm_blinks_white() {
    let display = DisplaySettings {
        general_color: RED,
        ..DisplaySettings::default()
    };
    let visible = render_frame(
        OperatingMode::Weather,
        TimeOfDay::new(17, 0, 0),
        &display,
        &DotsSettings::default(),
        true,
        0,
    );
    let hidden = render_frame(
        OperatingMode::Weather,
        TimeOfDay::new(17, 0, 0),
        &display,
        &DotsSettings::default(),
        true,
        500,
    );
    let white = RGB8 {
        r: 255,
        g: 255,
        b: 255,
    };
    assert!(visible.iter().all(|pixel| pixel == DARK || pixel == white));
    assert_eq!(visible.get(DOT_RIGHT_INDEX), Some(white));
    assert!(hidden.is_dark());
}

#[test]
fn test_power_off_renders_dark() {
    let mut settings = ClockSettings::new();
    settings.power.power_on = false;
    settings.power.mode = OperatingMode::Weather;
    let mut engine = ClockEngine::new(settings, 0);
    assert!(engine.tick(0).frame.is_dark());
}

// ============================================================================
// Tests: Brightness
// ============================================================================

#[test]
fn test_quiet_hours_dim_brightness_on_writer() {
    let mut settings = ClockSettings::new();
    settings.time = TimeOfDay::new(23, 30, 0);
    settings.display.quiet_hours = QuietHoursConfig {
        enabled: true,
        start_hour: 23,
        start_minute: 0,
        end_hour: 7,
        end_minute: 0,
        dim_brightness: 5,
    };
    let mut render_loop = RenderLoop::new(
        ClockEngine::new(settings, 0),
        MockLedWriter::new(),
        MockTicks::at(0),
    );

    let report = render_loop.step();
    assert!(report.output.quiet_hours_active);
    assert_eq!(render_loop.writer().last_brightness, Some(5));

    // 07:00 → Ruhezeit vorbei
    render_loop.ticks().set(7 * 3_600_000 + 30 * 60_000);
    let report = render_loop.step();
    assert!(!report.output.quiet_hours_active);
    assert_eq!(render_loop.writer().last_brightness, Some(80));
}

#[test]
fn test_detached_writer_keeps_clock_running() {
    let mut render_loop = RenderLoop::new(
        ClockEngine::new(ClockSettings::new(), 0),
        DetachedLedWriter,
        MockTicks::at(0),
    );
    assert_eq!(render_loop.step().write, Ok(()));

    // Kommandos werden weiter angenommen, die Zeit läuft weiter
    render_loop.apply(ClockCommand::SetTime(TimeOfDay::new(6, 30, 0)));
    render_loop.ticks().advance(90_000);
    let report = render_loop.step();
    assert_eq!(report.write, Ok(()));
    assert_eq!(report.output.now.time, TimeOfDay::new(6, 31, 30));
    assert_eq!(render_loop.snapshot().time, TimeOfDay::new(6, 31, 30));
}
