//! Ruhezeiten: gedimmte Helligkeit in einem Zeitfenster
//!
//! Wird in jedem Render-Tick aufgerufen - nur Integer-Vergleiche.

use crate::types::TimeOfDay;

/// Konfiguration der Ruhezeiten
///
/// Das Fenster darf über Mitternacht laufen (z.B. 23:00 → 07:00).
/// Start == Ende bedeutet "ganzer Tag".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct QuietHoursConfig {
    pub enabled: bool,
    pub start_hour: u8,
    pub start_minute: u8,
    pub end_hour: u8,
    pub end_minute: u8,
    /// Helligkeit während der Ruhezeit (0-255)
    pub dim_brightness: u8,
}

impl QuietHoursConfig {
    /// Beginn als Minute des Tages (0..1440)
    pub const fn start_minute_of_day(&self) -> u16 {
        self.start_hour as u16 * 60 + self.start_minute as u16
    }

    /// Ende als Minute des Tages (0..1440)
    pub const fn end_minute_of_day(&self) -> u16 {
        self.end_hour as u16 * 60 + self.end_minute as u16
    }
}

impl Default for QuietHoursConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            start_hour: 22,
            start_minute: 0,
            end_hour: 7,
            end_minute: 0,
            dim_brightness: 10,
        }
    }
}

/// Liegt `now` im Ruhezeit-Fenster?
///
/// ```
/// # use clock_core::{QuietHoursConfig, TimeOfDay, quiet_hours};
/// let cfg = QuietHoursConfig { enabled: true, start_hour: 23, start_minute: 0,
///     end_hour: 7, end_minute: 0, dim_brightness: 5 };
/// assert!(quiet_hours::is_active(TimeOfDay::new(23, 30, 0), &cfg));
/// assert!(!quiet_hours::is_active(TimeOfDay::new(12, 0, 0), &cfg));
/// ```
pub fn is_active(now: TimeOfDay, cfg: &QuietHoursConfig) -> bool {
    if !cfg.enabled {
        return false;
    }

    let current = now.minute_of_day();
    let start = cfg.start_minute_of_day();
    let end = cfg.end_minute_of_day();

    if start == end {
        true
    } else if start < end {
        start <= current && current < end
    } else {
        current >= start || current < end
    }
}
