//! Uhr: Anker plus verstrichene Zeit
//!
//! Die Uhr speichert keinen laufenden Zähler, sondern einen Anker
//! (bekannte Uhrzeit + monotoner Tick zum Zeitpunkt des Setzens).
//! Die aktuelle Zeit ist immer `anker + (jetzt - anker_tick)`.

use crate::types::{LocalTime, TimeOfDay};

/// Referenzpunkt für die Zeitberechnung
///
/// Wird bei jedem Setzen/Sync komplett ersetzt, nie in-place verändert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ClockAnchor {
    pub local: LocalTime,
    pub tick_ms: u64,
}

/// Software-Uhr auf Basis eines monotonen Millisekunden-Zählers
#[derive(Debug, Clone, Copy)]
pub struct Clock {
    anchor: ClockAnchor,
    last_sync_ms: Option<u64>,
}

impl Clock {
    /// Startet die Uhr mit einer (manuellen) Uhrzeit; Wochentag unbekannt
    pub fn new(initial: TimeOfDay, now_ms: u64) -> Self {
        Self {
            anchor: ClockAnchor {
                local: LocalTime::from(initial),
                tick_ms: now_ms,
            },
            last_sync_ms: None,
        }
    }

    /// Lokale Zeit (inkl. Wochentag, falls bekannt) zum Tick `now_ms`
    pub fn now(&self, now_ms: u64) -> LocalTime {
        let elapsed_secs = now_ms.saturating_sub(self.anchor.tick_ms) / 1000;
        self.anchor.local.advanced_by(elapsed_secs as i64)
    }

    /// Aktuelle Uhrzeit zum Tick `now_ms`
    pub fn current_time(&self, now_ms: u64) -> TimeOfDay {
        self.now(now_ms).time
    }

    /// Manuelles Setzen der Uhrzeit
    ///
    /// Ein bereits bekannter Wochentag bleibt erhalten.
    pub fn set_time(&mut self, time: TimeOfDay, now_ms: u64) {
        let weekday = self.now(now_ms).weekday;
        self.anchor = ClockAnchor {
            local: LocalTime::new(time, weekday),
            tick_ms: now_ms,
        };
    }

    /// Autoritative Zeit vom Netzwerk übernehmen
    pub fn on_external_sync(&mut self, local: LocalTime, now_ms: u64) {
        self.anchor = ClockAnchor {
            local,
            tick_ms: now_ms,
        };
        self.last_sync_ms = Some(now_ms);
    }

    /// Verschiebt die Uhr um `minutes` (z.B. wenn sich der UTC-Offset ändert)
    pub fn shift_minutes(&mut self, minutes: i32, now_ms: u64) {
        let shifted = self.now(now_ms).advanced_by(minutes as i64 * 60);
        self.anchor = ClockAnchor {
            local: shifted,
            tick_ms: now_ms,
        };
    }

    /// Wurde jemals erfolgreich mit dem Netzwerk synchronisiert?
    pub fn is_synced(&self) -> bool {
        self.last_sync_ms.is_some()
    }

    pub fn anchor(&self) -> ClockAnchor {
        self.anchor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Weekday;

    #[test]
    fn test_current_time_advances_with_ticks() {
        let clock = Clock::new(TimeOfDay::new(12, 0, 0), 1_000);
        assert_eq!(clock.current_time(1_000), TimeOfDay::new(12, 0, 0));
        assert_eq!(clock.current_time(1_999), TimeOfDay::new(12, 0, 0));
        assert_eq!(clock.current_time(62_000), TimeOfDay::new(12, 1, 1));
    }

    #[test]
    fn test_tick_before_anchor_does_not_underflow() {
        let clock = Clock::new(TimeOfDay::new(8, 0, 0), 5_000);
        assert_eq!(clock.current_time(0), TimeOfDay::new(8, 0, 0));
    }

    #[test]
    fn test_set_time_replaces_anchor() {
        let mut clock = Clock::new(TimeOfDay::new(12, 0, 0), 0);
        clock.set_time(TimeOfDay::new(6, 30, 0), 500_000);
        assert_eq!(clock.anchor().tick_ms, 500_000);
        assert_eq!(clock.current_time(500_000), TimeOfDay::new(6, 30, 0));
        assert_eq!(clock.current_time(510_000), TimeOfDay::new(6, 30, 10));
    }

    #[test]
    fn test_set_time_keeps_known_weekday() {
        let mut clock = Clock::new(TimeOfDay::MIDNIGHT, 0);
        clock.on_external_sync(
            LocalTime::new(TimeOfDay::new(23, 59, 0), Some(Weekday::Monday)),
            0,
        );
        // 2 Minuten später ist Dienstag
        clock.set_time(TimeOfDay::new(7, 0, 0), 120_000);
        assert_eq!(clock.now(120_000).weekday, Some(Weekday::Tuesday));
        assert!(clock.is_synced());
    }

    #[test]
    fn test_shift_minutes_moves_weekday() {
        let mut clock = Clock::new(TimeOfDay::MIDNIGHT, 0);
        clock.on_external_sync(
            LocalTime::new(TimeOfDay::new(0, 30, 0), Some(Weekday::Sunday)),
            0,
        );
        clock.shift_minutes(-60, 0);
        let now = clock.now(0);
        assert_eq!(now.time, TimeOfDay::new(23, 30, 0));
        assert_eq!(now.weekday, Some(Weekday::Saturday));
    }
}
