//! Wecker-Zustandsmaschine
//!
//! Zustände: `Idle` (Wecker aus) → `Armed` (wartet auf die Weckzeit)
//! → `Firing` (klingelt) → zurück nach `Armed`/`Idle` nach Ablauf der
//! Klingeldauer oder bei explizitem Stop.
//!
//! Innerhalb derselben Minute klingelt der Wecker nur einmal: die zuletzt
//! ausgelöste (Stunde, Minute) wird gemerkt und erst zurückgesetzt, wenn
//! die Weckminute verlassen oder der Wecker deaktiviert wird.

use crate::types::{DaysMask, LocalTime};

/// Standard-Klingeldauer in Minuten
pub const DEFAULT_ALARM_DURATION_MINUTES: u8 = 5;

/// Maximale Klingeldauer in Minuten
pub const MAX_ALARM_DURATION_MINUTES: u8 = 60;

/// Wecker-Einstellungen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmSettings {
    pub enabled: bool,
    pub hour: u8,
    pub minute: u8,
    pub days_mask: DaysMask,
    /// Klingeldauer in Minuten (1-60)
    pub duration_minutes: u8,
}

impl AlarmSettings {
    /// Klingeldauer in Millisekunden
    pub const fn duration_ms(&self) -> u64 {
        self.duration_minutes as u64 * 60_000
    }
}

impl Default for AlarmSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            hour: 7,
            minute: 0,
            days_mask: DaysMask::WORKDAYS,
            duration_minutes: DEFAULT_ALARM_DURATION_MINUTES,
        }
    }
}

/// Zustand des Weckers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmState {
    /// Wecker deaktiviert
    #[default]
    Idle,
    /// Wecker aktiv, wartet auf die Weckzeit
    Armed,
    /// Wecker klingelt seit `since_ms`
    Firing { since_ms: u64 },
}

/// Zustandsübergang, den der Aufrufer loggen/publizieren kann
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum AlarmEvent {
    /// Wecker hat angefangen zu klingeln
    Started,
    /// Klingeldauer abgelaufen
    Finished,
    /// Explizit gestoppt oder während des Klingelns deaktiviert
    Stopped,
}

/// Status für die Config-Egress-Schnittstelle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct AlarmStatus {
    pub active: bool,
    pub remaining_secs: u32,
}

/// Wecker-Scheduler (besitzt den Laufzeit-Zustand exklusiv)
#[derive(Debug, Clone, Copy, Default)]
pub struct AlarmScheduler {
    state: AlarmState,
    last_trigger: Option<(u8, u8)>,
}

impl AlarmScheduler {
    pub const fn new() -> Self {
        Self {
            state: AlarmState::Idle,
            last_trigger: None,
        }
    }

    pub fn state(&self) -> AlarmState {
        self.state
    }

    /// Zuletzt ausgelöste Weckzeit (Duplikat-Sperre)
    pub fn last_trigger(&self) -> Option<(u8, u8)> {
        self.last_trigger
    }

    /// Ein Tick der Zustandsmaschine
    ///
    /// `now` muss derselbe Zeitpunkt sein, den auch Ruhezeit und Renderer sehen.
    /// Ohne bekannten Wochentag klingelt der Wecker nie.
    pub fn update(
        &mut self,
        settings: &AlarmSettings,
        now: LocalTime,
        now_ms: u64,
    ) -> Option<AlarmEvent> {
        let mut event = None;

        if let AlarmState::Firing { since_ms } = self.state {
            if !settings.enabled {
                event = Some(AlarmEvent::Stopped);
            } else if now_ms.saturating_sub(since_ms) >= settings.duration_ms() {
                event = Some(AlarmEvent::Finished);
            } else {
                return None;
            }
            self.state = AlarmState::Armed;
        }

        if !settings.enabled {
            self.state = AlarmState::Idle;
            self.last_trigger = None;
            return event;
        }
        self.state = AlarmState::Armed;

        let current = (now.time.hour(), now.time.minute());
        if current != (settings.hour, settings.minute) {
            self.last_trigger = None;
            return event;
        }

        let Some(weekday) = now.weekday else {
            return event;
        };
        if !settings.days_mask.contains(weekday) || self.last_trigger == Some(current) {
            return event;
        }

        self.state = AlarmState::Firing { since_ms: now_ms };
        self.last_trigger = Some(current);
        Some(AlarmEvent::Started)
    }

    /// Explizites Stoppen (wirkt sofort)
    ///
    /// Die Duplikat-Sperre bleibt bestehen, damit der Wecker in derselben
    /// Minute nicht erneut auslöst. Gibt `true` zurück, wenn er geklingelt hat.
    pub fn stop(&mut self) -> bool {
        if matches!(self.state, AlarmState::Firing { .. }) {
            self.state = AlarmState::Armed;
            true
        } else {
            false
        }
    }

    /// Klingelt der Wecker zum Tick `now_ms`?
    ///
    /// Berücksichtigt die Klingeldauer auch ohne vorheriges [`update`](Self::update).
    pub fn is_firing(&self, settings: &AlarmSettings, now_ms: u64) -> bool {
        self.remaining_ms(settings, now_ms).is_some()
    }

    /// Verbleibende Klingeldauer, `None` wenn der Wecker nicht klingelt
    pub fn remaining_ms(&self, settings: &AlarmSettings, now_ms: u64) -> Option<u64> {
        match self.state {
            AlarmState::Firing { since_ms } => {
                let end = since_ms.saturating_add(settings.duration_ms());
                (now_ms < end).then(|| end - now_ms)
            }
            _ => None,
        }
    }

    /// Status für Snapshot/API
    pub fn status(&self, settings: &AlarmSettings, now_ms: u64) -> AlarmStatus {
        match self.remaining_ms(settings, now_ms) {
            Some(remaining) => AlarmStatus {
                active: true,
                remaining_secs: remaining.div_ceil(1000) as u32,
            },
            None => AlarmStatus::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{TimeOfDay, Weekday};

    fn monday(hour: u8, minute: u8, second: u8) -> LocalTime {
        LocalTime::new(
            TimeOfDay::new(hour, minute, second),
            Some(Weekday::Monday),
        )
    }

    fn settings() -> AlarmSettings {
        AlarmSettings {
            enabled: true,
            hour: 7,
            minute: 0,
            days_mask: DaysMask::ALL,
            duration_minutes: 5,
        }
    }

    #[test]
    fn test_idle_when_disabled() {
        let mut alarm = AlarmScheduler::new();
        let cfg = AlarmSettings {
            enabled: false,
            ..settings()
        };
        assert_eq!(alarm.update(&cfg, monday(7, 0, 0), 0), None);
        assert_eq!(alarm.state(), AlarmState::Idle);
    }

    #[test]
    fn test_fires_and_records_trigger() {
        let mut alarm = AlarmScheduler::new();
        assert_eq!(
            alarm.update(&settings(), monday(7, 0, 0), 1_000),
            Some(AlarmEvent::Started)
        );
        assert_eq!(alarm.state(), AlarmState::Firing { since_ms: 1_000 });
        assert_eq!(alarm.last_trigger(), Some((7, 0)));
    }

    #[test]
    fn test_unknown_weekday_never_fires() {
        let mut alarm = AlarmScheduler::new();
        let now = LocalTime::new(TimeOfDay::new(7, 0, 0), None);
        assert_eq!(alarm.update(&settings(), now, 0), None);
        assert_eq!(alarm.state(), AlarmState::Armed);
    }

    #[test]
    fn test_stop_keeps_same_minute_suppressed() {
        let mut alarm = AlarmScheduler::new();
        alarm.update(&settings(), monday(7, 0, 0), 0);
        assert!(alarm.stop());
        assert!(!alarm.stop());
        assert_eq!(alarm.update(&settings(), monday(7, 0, 20), 20_000), None);
        assert!(!alarm.is_firing(&settings(), 20_000));
    }

    #[test]
    fn test_disabling_while_firing_stops() {
        let mut alarm = AlarmScheduler::new();
        alarm.update(&settings(), monday(7, 0, 0), 0);
        let cfg = AlarmSettings {
            enabled: false,
            ..settings()
        };
        assert_eq!(
            alarm.update(&cfg, monday(7, 0, 5), 5_000),
            Some(AlarmEvent::Stopped)
        );
        assert_eq!(alarm.state(), AlarmState::Idle);
        assert_eq!(alarm.last_trigger(), None);
    }

    #[test]
    fn test_status_rounds_remaining_seconds_up() {
        let mut alarm = AlarmScheduler::new();
        alarm.update(&settings(), monday(7, 0, 0), 0);
        let status = alarm.status(&settings(), 299_500);
        assert!(status.active);
        assert_eq!(status.remaining_secs, 1);
        assert_eq!(alarm.status(&settings(), 300_000), AlarmStatus::default());
    }
}
