//! Integration Tests für Uhr, Wecker und Render Loop
//!
//! Diese Tests laufen auf dem Host (x86_64) und nutzen MockLedWriter + MockTicks

mod common;

use clock_core::{
    AlarmEvent, AlarmSettings, Clock, ClockCommand, ClockEngine, ClockSettings, DaysMask,
    LedError, LocalTime, RenderLoop, TimeOfDay, Weekday,
};
use common::{MockLedWriter, MockTicks, monday_at};

const MINUTE_MS: u64 = 60_000;
const DAY_MS: u64 = 24 * 60 * MINUTE_MS;

fn alarm_at_seven(days_mask: DaysMask) -> AlarmSettings {
    AlarmSettings {
        enabled: true,
        hour: 7,
        minute: 0,
        days_mask,
        duration_minutes: 5,
    }
}

/// Render Loop ab Tick 0, synchronisiert auf Montag 07:00:00 UTC
fn synced_loop(alarm: AlarmSettings) -> RenderLoop<MockLedWriter, MockTicks> {
    let settings = ClockSettings {
        alarm,
        ..ClockSettings::new()
    };
    let mut render_loop = RenderLoop::new(
        ClockEngine::new(settings, 0),
        MockLedWriter::new(),
        MockTicks::at(0),
    );
    render_loop.apply(ClockCommand::ExternalSync {
        unix_seconds: monday_at(7, 0),
    });
    render_loop
}

// ============================================================================
// Tests: Clock
// ============================================================================

#[test]
fn test_clock_set_then_read_at_same_tick() {
    let mut clock = Clock::new(TimeOfDay::MIDNIGHT, 0);
    clock.set_time(TimeOfDay::new(13, 37, 42), 987_654);
    assert_eq!(clock.current_time(987_654), TimeOfDay::new(13, 37, 42));
}

#[test]
fn test_clock_advances_one_hour_per_3_600_000_ms() {
    let clock = Clock::new(TimeOfDay::new(22, 30, 0), 10);
    assert_eq!(clock.current_time(10 + 3_600_000), TimeOfDay::new(23, 30, 0));
    assert_eq!(clock.current_time(10 + 2 * 3_600_000), TimeOfDay::new(0, 30, 0));
}

#[test]
fn test_clock_external_sync_has_no_extra_jump() {
    let mut clock = Clock::new(TimeOfDay::new(8, 0, 0), 0);
    clock.on_external_sync(LocalTime::from_unix_seconds(monday_at(9, 15), 0), 50_000);
    assert_eq!(clock.current_time(50_000), TimeOfDay::new(9, 15, 0));
    assert_eq!(clock.now(50_000).weekday, Some(Weekday::Monday));
}

// ============================================================================
// Tests: Alarm
// ============================================================================

#[test]
fn test_alarm_fires_once_per_minute() {
    let mut render_loop = synced_loop(alarm_at_seven(DaysMask::ALL));

    assert_eq!(
        render_loop.step().output.alarm_event,
        Some(AlarmEvent::Started)
    );

    render_loop.ticks().set(5_000);
    let report = render_loop.step();
    assert_eq!(report.output.alarm_event, None);
    assert!(report.output.alarm_firing);

    render_loop.ticks().set(55_000);
    assert_eq!(render_loop.step().output.alarm_event, None);

    assert_eq!(
        render_loop.apply(ClockCommand::StopAlarm),
        Some(AlarmEvent::Stopped)
    );
    render_loop.ticks().set(56_000);
    let report = render_loop.step();
    assert_eq!(report.output.alarm_event, None);
    assert!(!report.output.alarm_firing);

    // 07:01 → kein erneutes Auslösen
    render_loop.ticks().set(MINUTE_MS);
    assert_eq!(render_loop.step().output.alarm_event, None);
}

#[test]
fn test_ringing_alarm_keeps_going_into_next_minute() {
    let mut render_loop = synced_loop(alarm_at_seven(DaysMask::ALL));
    assert_eq!(
        render_loop.step().output.alarm_event,
        Some(AlarmEvent::Started)
    );

    // 07:01 und 07:01:30: klingelt weiter, kein zweites Started
    for now_ms in [MINUTE_MS, MINUTE_MS + 30_000] {
        render_loop.ticks().set(now_ms);
        let report = render_loop.step();
        assert_eq!(report.output.now.time.minute(), 1);
        assert_eq!(report.output.alarm_event, None);
        assert!(report.output.alarm_firing);
    }
}

#[test]
fn test_alarm_fires_again_next_week() {
    let mut render_loop = synced_loop(alarm_at_seven(DaysMask::ALL));
    assert_eq!(
        render_loop.step().output.alarm_event,
        Some(AlarmEvent::Started)
    );
    render_loop.apply(ClockCommand::StopAlarm);

    render_loop.ticks().set(MINUTE_MS);
    render_loop.step();

    // Nächster Montag 07:00
    render_loop.ticks().set(7 * DAY_MS);
    let report = render_loop.step();
    assert_eq!(report.output.now.weekday, Some(Weekday::Monday));
    assert_eq!(report.output.alarm_event, Some(AlarmEvent::Started));
}

#[test]
fn test_alarm_respects_days_mask() {
    let mask = DaysMask::ALL.without(Weekday::Monday);
    let mut render_loop = synced_loop(alarm_at_seven(mask));
    let report = render_loop.step();
    assert_eq!(report.output.alarm_event, None);
    assert!(!report.output.alarm_firing);

    // Dienstag 07:00 klingelt
    render_loop.ticks().set(DAY_MS);
    assert_eq!(
        render_loop.step().output.alarm_event,
        Some(AlarmEvent::Started)
    );
}

#[test]
fn test_alarm_auto_stops_after_duration() {
    let mut render_loop = synced_loop(alarm_at_seven(DaysMask::ALL));
    render_loop.step();

    render_loop.ticks().set(5 * MINUTE_MS - 1);
    let report = render_loop.step();
    assert!(report.output.alarm_firing);
    assert_eq!(report.output.brightness, 255);

    render_loop.ticks().set(5 * MINUTE_MS);
    let report = render_loop.step();
    assert_eq!(report.output.alarm_event, Some(AlarmEvent::Finished));
    assert!(!report.output.alarm_firing);
}

#[test]
fn test_alarm_never_fires_without_weekday() {
    let settings = ClockSettings {
        time: TimeOfDay::new(7, 0, 0),
        alarm: alarm_at_seven(DaysMask::ALL),
        ..ClockSettings::new()
    };
    let mut engine = ClockEngine::new(settings, 0);
    let output = engine.tick(0);
    assert_eq!(output.alarm_event, None);
    assert!(!output.alarm_firing);
}

#[test]
fn test_snapshot_reports_remaining_alarm_time() {
    let mut render_loop = synced_loop(alarm_at_seven(DaysMask::ALL));
    render_loop.step();
    render_loop.ticks().set(60_000);

    let snapshot = render_loop.snapshot();
    assert!(snapshot.alarm.active);
    assert_eq!(snapshot.alarm.remaining_secs, 240);
    assert!(snapshot.synced);
    assert_eq!(snapshot.weekday, Some(Weekday::Monday));
    assert_eq!(snapshot.time, TimeOfDay::new(7, 1, 0));
}

// ============================================================================
// Tests: Render Loop + MockLedWriter
// ============================================================================

#[test]
fn test_render_loop_writes_frame_and_brightness() {
    let mut render_loop = RenderLoop::new(
        ClockEngine::new(ClockSettings::new(), 0),
        MockLedWriter::new(),
        MockTicks::at(0),
    );
    let report = render_loop.step();

    assert_eq!(report.write, Ok(()));
    assert_eq!(render_loop.writer().write_count, 1);
    assert_eq!(render_loop.writer().last_frame, Some(report.output.frame));
    assert_eq!(render_loop.writer().last_brightness, Some(80));
}

#[test]
fn test_render_loop_survives_write_failure() {
    let mut render_loop = RenderLoop::new(
        ClockEngine::new(ClockSettings::new(), 0),
        MockLedWriter::new(),
        MockTicks::at(0),
    );
    render_loop.writer_mut().fail_next_write = true;

    let report = render_loop.step();
    assert_eq!(report.write, Err(LedError::WriteFailed));
    assert_eq!(render_loop.writer().write_count, 0);

    render_loop.ticks().advance(250);
    let report = render_loop.step();
    assert_eq!(report.write, Ok(()));
    assert_eq!(render_loop.writer().write_count, 1);
}

#[test]
fn test_set_time_command_moves_clock() {
    let mut render_loop = RenderLoop::new(
        ClockEngine::new(ClockSettings::new(), 0),
        MockLedWriter::new(),
        MockTicks::at(1_000),
    );
    render_loop.apply(ClockCommand::SetTime(TimeOfDay::new(6, 59, 59)));
    render_loop.ticks().advance(1_000);
    assert_eq!(render_loop.step().output.now.time, TimeOfDay::new(7, 0, 0));
}
