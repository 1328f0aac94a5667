//! Clock Engine: einziger Besitzer von Uhr, Wecker-Zustand und Einstellungen
//!
//! Alle Änderungen laufen über die Setter bzw. [`ClockEngine::apply`];
//! andere Tasks sehen nur Snapshots. Pro Tick wird die Zeit genau einmal
//! berechnet und derselbe Zeitpunkt an Ruhezeit, Wecker und Renderer gegeben.

use crate::alarm::{AlarmEvent, AlarmScheduler, AlarmSettings, AlarmStatus};
use crate::clock::Clock;
use crate::document::ClockDocument;
use crate::frame::PixelFrame;
use crate::quiet_hours::{self, QuietHoursConfig};
use crate::render::{effective_brightness, render_frame};
use crate::settings::{
    ClockSettings, DisplaySettings, DotsSettings, NetworkSettings, PowerSettings, clamp,
};
use crate::types::{ClockCommand, LocalTime, OperatingMode, TimeOfDay, Weekday};

/// Ergebnis eines Render-Ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RenderOutput {
    pub frame: PixelFrame,
    /// Helligkeit für die Hardware (0-255)
    pub brightness: u8,
    /// Der Zeitpunkt, der für diesen Tick verwendet wurde
    pub now: LocalTime,
    pub alarm_event: Option<AlarmEvent>,
    pub alarm_firing: bool,
    pub quiet_hours_active: bool,
}

/// Zustand für die Config-Egress-Schnittstelle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockSnapshot {
    pub settings: ClockSettings,
    pub time: TimeOfDay,
    pub weekday: Option<Weekday>,
    pub synced: bool,
    pub alarm: AlarmStatus,
    /// Effektive Helligkeit (inkl. Ruhezeit/Wecker)
    pub brightness: u8,
    pub quiet_hours_active: bool,
    /// Effektiver Modus (ausgeschaltet → Off)
    pub mode: OperatingMode,
}

pub struct ClockEngine {
    settings: ClockSettings,
    clock: Clock,
    alarm: AlarmScheduler,
}

impl ClockEngine {
    /// Startet mit den (bereits validierten) Einstellungen; die Uhr läuft ab `settings.time`
    pub fn new(settings: ClockSettings, now_ms: u64) -> Self {
        Self {
            settings,
            clock: Clock::new(settings.time, now_ms),
            alarm: AlarmScheduler::new(),
        }
    }

    pub fn settings(&self) -> &ClockSettings {
        &self.settings
    }

    pub fn clock(&self) -> &Clock {
        &self.clock
    }

    pub fn alarm(&self) -> &AlarmScheduler {
        &self.alarm
    }

    // ========================================================================
    // Config Ingress
    // ========================================================================

    pub fn set_power(&mut self, power: PowerSettings) {
        self.settings.power = power;
    }

    pub fn set_time(&mut self, time: TimeOfDay, now_ms: u64) {
        self.settings.time = time;
        self.clock.set_time(time, now_ms);
    }

    pub fn set_display(&mut self, display: DisplaySettings) {
        self.settings.display = sanitize_display(display);
    }

    pub fn set_dots(&mut self, dots: DotsSettings) {
        self.settings.dots = dots;
    }

    /// Neue Wecker-Einstellungen; ein Deaktivieren stoppt beim nächsten Tick
    pub fn set_alarm(&mut self, alarm: AlarmSettings) {
        self.settings.alarm = sanitize_alarm(alarm);
    }

    /// Netzwerk-Einstellungen; ein geänderter UTC-Offset verschiebt eine synchronisierte Uhr
    pub fn set_network(&mut self, network: NetworkSettings, now_ms: u64) {
        let previous = self.settings.network.utc_offset_minutes;
        self.settings.network = NetworkSettings {
            utc_offset_minutes: clamp::utc_offset_minutes(network.utc_offset_minutes as i32),
            ..network
        };
        self.shift_for_offset_change(previous, now_ms);
    }

    /// Stoppt einen klingelnden Wecker sofort
    pub fn stop_alarm(&mut self) -> bool {
        self.alarm.stop()
    }

    /// Zurück in den Startup-Modus
    pub fn exit_special_mode(&mut self) {
        self.settings.power.mode = self.settings.power.startup_mode;
    }

    /// Merged ein (partielles) Dokument
    ///
    /// Fehlende Zeit-Felder übernehmen die aktuell angezeigte Zeit.
    pub fn apply_document(&mut self, doc: &ClockDocument, now_ms: u64) {
        let previous_offset = self.settings.network.utc_offset_minutes;
        self.settings.time = self.clock.current_time(now_ms);
        self.settings.merge_document(doc);

        if doc.time.is_some() {
            self.clock.set_time(self.settings.time, now_ms);
        }
        self.shift_for_offset_change(previous_offset, now_ms);
    }

    // ========================================================================
    // Time Correction
    // ========================================================================

    /// Autoritative lokale Zeit übernehmen
    pub fn on_external_sync(&mut self, local: LocalTime, now_ms: u64) {
        self.clock.on_external_sync(local, now_ms);
    }

    /// Unix-Sekunden (UTC) vom Netzwerk übernehmen
    ///
    /// Gibt `false` zurück, wenn die Zeitsynchronisation deaktiviert ist.
    pub fn on_unix_sync(&mut self, unix_seconds: i64, now_ms: u64) -> bool {
        let network = self.settings.network;
        if !network.time_sync_enabled {
            return false;
        }
        let local = LocalTime::from_unix_seconds(unix_seconds, network.utc_offset_minutes);
        self.clock.on_external_sync(local, now_ms);
        true
    }

    fn shift_for_offset_change(&mut self, previous: i16, now_ms: u64) {
        let delta = self.settings.network.utc_offset_minutes as i32 - previous as i32;
        if delta != 0 && self.clock.is_synced() {
            self.clock.shift_minutes(delta, now_ms);
        }
    }

    /// Führt ein Kommando aus; gibt ein Wecker-Ereignis zurück, falls eines entstand
    pub fn apply(&mut self, command: ClockCommand, now_ms: u64) -> Option<AlarmEvent> {
        match command {
            ClockCommand::SetPower(power) => self.set_power(power),
            ClockCommand::SetTime(time) => self.set_time(time, now_ms),
            ClockCommand::SetDisplay(display) => self.set_display(display),
            ClockCommand::SetDots(dots) => self.set_dots(dots),
            ClockCommand::SetAlarm(alarm) => self.set_alarm(alarm),
            ClockCommand::SetNetwork(network) => self.set_network(network, now_ms),
            ClockCommand::Patch(doc) => self.apply_document(&doc, now_ms),
            ClockCommand::StopAlarm => {
                return self.stop_alarm().then_some(AlarmEvent::Stopped);
            }
            ClockCommand::ExitSpecialMode => self.exit_special_mode(),
            ClockCommand::ExternalSync { unix_seconds } => {
                self.on_unix_sync(unix_seconds, now_ms);
            }
        }
        None
    }

    // ========================================================================
    // Render Tick
    // ========================================================================

    /// Ein Render-Tick: Zeit → {Ruhezeit, Wecker, Renderer} → Frame + Helligkeit
    pub fn tick(&mut self, now_ms: u64) -> RenderOutput {
        let now = self.clock.now(now_ms);
        let alarm_event = self.alarm.update(&self.settings.alarm, now, now_ms);
        let alarm_firing = self.alarm.is_firing(&self.settings.alarm, now_ms);

        let display = &self.settings.display;
        let quiet_hours_active = quiet_hours::is_active(now.time, &display.quiet_hours);
        let brightness = effective_brightness(
            now.time,
            display.brightness,
            &display.quiet_hours,
            alarm_firing,
        );
        let frame = render_frame(
            self.settings.power.effective_mode(),
            now.time,
            display,
            &self.settings.dots,
            alarm_firing,
            now_ms,
        );

        RenderOutput {
            frame,
            brightness,
            now,
            alarm_event,
            alarm_firing,
            quiet_hours_active,
        }
    }

    // ========================================================================
    // Config Egress
    // ========================================================================

    pub fn current_time(&self, now_ms: u64) -> TimeOfDay {
        self.clock.current_time(now_ms)
    }

    pub fn alarm_status(&self, now_ms: u64) -> AlarmStatus {
        self.alarm.status(&self.settings.alarm, now_ms)
    }

    /// Kompletter Zustand; `settings.time` ist die aktuell angezeigte Zeit
    pub fn snapshot(&self, now_ms: u64) -> ClockSnapshot {
        let now = self.clock.now(now_ms);
        let alarm = self.alarm_status(now_ms);
        let display = &self.settings.display;

        ClockSnapshot {
            settings: ClockSettings {
                time: now.time,
                ..self.settings
            },
            time: now.time,
            weekday: now.weekday,
            synced: self.clock.is_synced(),
            alarm,
            brightness: effective_brightness(
                now.time,
                display.brightness,
                &display.quiet_hours,
                alarm.active,
            ),
            quiet_hours_active: quiet_hours::is_active(now.time, &display.quiet_hours),
            mode: self.settings.power.effective_mode(),
        }
    }
}

fn sanitize_display(mut display: DisplaySettings) -> DisplaySettings {
    let quiet = display.quiet_hours;
    display.brightness = clamp::brightness(display.brightness as i32);
    display.single_digit_override.index =
        clamp::digit_index(display.single_digit_override.index as i32);
    display.quiet_hours = QuietHoursConfig {
        start_hour: clamp::hour(quiet.start_hour as i32),
        start_minute: clamp::minute(quiet.start_minute as i32),
        end_hour: clamp::hour(quiet.end_hour as i32),
        end_minute: clamp::minute(quiet.end_minute as i32),
        ..quiet
    };
    display
}

fn sanitize_alarm(alarm: AlarmSettings) -> AlarmSettings {
    AlarmSettings {
        hour: clamp::hour(alarm.hour as i32),
        minute: clamp::minute(alarm.minute as i32),
        duration_minutes: clamp::alarm_duration_minutes(alarm.duration_minutes as i32),
        ..alarm
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::{NetworkSection, TimeSection};
    use crate::types::DaysMask;

    #[test]
    fn test_patch_with_partial_time_keeps_current_values() {
        let mut engine = ClockEngine::new(ClockSettings::new(), 0);
        let doc = ClockDocument {
            time: Some(TimeSection {
                minute: Some(45),
                ..Default::default()
            }),
            ..Default::default()
        };
        // 12:00:00 + 90s = 12:01:30
        engine.apply_document(&doc, 90_000);
        assert_eq!(engine.current_time(90_000), TimeOfDay::new(12, 45, 30));
    }

    #[test]
    fn test_offset_change_shifts_synced_clock() {
        let mut engine = ClockEngine::new(ClockSettings::new(), 0);
        // 1970-01-01 10:00 UTC
        assert!(engine.on_unix_sync(36_000, 0));
        let doc = ClockDocument {
            network: Some(NetworkSection {
                utc_offset_minutes: Some(90),
                ..Default::default()
            }),
            ..Default::default()
        };
        engine.apply_document(&doc, 0);
        assert_eq!(engine.current_time(0), TimeOfDay::new(11, 30, 0));
    }

    #[test]
    fn test_offset_change_leaves_unsynced_clock() {
        let mut engine = ClockEngine::new(ClockSettings::new(), 0);
        engine.set_network(
            NetworkSettings {
                utc_offset_minutes: 60,
                time_sync_enabled: true,
            },
            0,
        );
        assert_eq!(engine.current_time(0), TimeOfDay::new(12, 0, 0));
    }

    #[test]
    fn test_sync_ignored_when_disabled() {
        let mut settings = ClockSettings::new();
        settings.network.time_sync_enabled = false;
        let mut engine = ClockEngine::new(settings, 0);
        assert!(!engine.on_unix_sync(0, 0));
        assert!(!engine.snapshot(0).synced);
    }

    #[test]
    fn test_stop_command_reports_event() {
        let mut engine = ClockEngine::new(ClockSettings::new(), 0);
        engine.on_unix_sync(25_200, 0); // Donnerstag 07:00 UTC
        engine.set_alarm(AlarmSettings {
            enabled: true,
            hour: 7,
            minute: 0,
            days_mask: DaysMask::ALL,
            duration_minutes: 5,
        });
        assert_eq!(engine.tick(0).alarm_event, Some(AlarmEvent::Started));
        assert_eq!(
            engine.apply(ClockCommand::StopAlarm, 100),
            Some(AlarmEvent::Stopped)
        );
        assert_eq!(engine.apply(ClockCommand::StopAlarm, 200), None);
        assert!(!engine.tick(250).alarm_firing);
    }

    #[test]
    fn test_typed_setters_clamp() {
        let mut engine = ClockEngine::new(ClockSettings::new(), 0);
        engine.set_display(DisplaySettings {
            brightness: 0,
            ..DisplaySettings::default()
        });
        engine.set_alarm(AlarmSettings {
            duration_minutes: 200,
            ..AlarmSettings::default()
        });
        assert_eq!(engine.settings().display.brightness, 1);
        assert_eq!(engine.settings().alarm.duration_minutes, 60);
    }
}
