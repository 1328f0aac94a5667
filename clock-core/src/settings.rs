//! Einstellungen der Uhr
//!
//! Ein explizit besessenes Konfigurations-Objekt statt globaler Variablen.
//! Alle Werte hier sind bereits validiert; das Clamping passiert an der
//! Config-Grenze (siehe [`clamp`] und [`crate::document`]).

use rgb::RGB8;

use crate::frame::WHITE;
use crate::segments::DIGIT_COUNT;
use crate::types::{OperatingMode, TimeOfDay};

pub use crate::alarm::AlarmSettings;
pub use crate::document::ClockDocument;
pub use crate::quiet_hours::QuietHoursConfig;

/// Standard-Farbe der Ziffern (Orange)
pub const DEFAULT_GENERAL_COLOR: RGB8 = RGB8 {
    r: 255,
    g: 85,
    b: 0,
};

/// Standard-Farbe der erzwungenen Punkte (Rot)
pub const DEFAULT_FORCED_DOT_COLOR: RGB8 = RGB8 { r: 255, g: 0, b: 0 };

/// Standard-Helligkeit
pub const DEFAULT_BRIGHTNESS: u8 = 80;

// ============================================================================
// Power
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PowerSettings {
    pub power_on: bool,
    /// Aktueller Modus
    pub mode: OperatingMode,
    /// Modus, zu dem "exit special mode" zurückkehrt
    pub startup_mode: OperatingMode,
}

impl PowerSettings {
    /// Modus, der tatsächlich gerendert wird (ausgeschaltet → Off)
    pub fn effective_mode(&self) -> OperatingMode {
        if self.power_on {
            self.mode
        } else {
            OperatingMode::Off
        }
    }
}

impl Default for PowerSettings {
    fn default() -> Self {
        Self {
            power_on: true,
            mode: OperatingMode::Clock,
            startup_mode: OperatingMode::Clock,
        }
    }
}

// ============================================================================
// Display
// ============================================================================

/// Farb-Override für genau eine Ziffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SingleDigitOverride {
    pub enabled: bool,
    /// Ziffer-Position 0-3
    pub index: u8,
    pub color: RGB8,
}

impl Default for SingleDigitOverride {
    fn default() -> Self {
        Self {
            enabled: false,
            index: 0,
            color: WHITE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    /// Globale Helligkeit (1-255)
    pub brightness: u8,
    pub general_color: RGB8,
    pub per_digit_enabled: bool,
    pub per_digit_colors: [RGB8; DIGIT_COUNT],
    pub single_digit_override: SingleDigitOverride,
    pub quiet_hours: QuietHoursConfig,
}

impl DisplaySettings {
    /// Farbe einer Ziffer
    ///
    /// Rangfolge: Einzelziffer-Override > Farbe pro Ziffer (falls aktiv) > Grundfarbe.
    pub fn digit_color(&self, position: usize) -> RGB8 {
        let single = &self.single_digit_override;
        if single.enabled && single.index as usize == position {
            return single.color;
        }
        if self.per_digit_enabled {
            if let Some(color) = self.per_digit_colors.get(position) {
                return *color;
            }
        }
        self.general_color
    }

    /// Färbt irgendeine Einstellung die Ziffern individuell?
    pub fn has_digit_coloring(&self) -> bool {
        self.per_digit_enabled || self.single_digit_override.enabled
    }
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            brightness: DEFAULT_BRIGHTNESS,
            general_color: DEFAULT_GENERAL_COLOR,
            per_digit_enabled: false,
            per_digit_colors: [DEFAULT_GENERAL_COLOR; DIGIT_COUNT],
            single_digit_override: SingleDigitOverride::default(),
            quiet_hours: QuietHoursConfig::default(),
        }
    }
}

// ============================================================================
// Dots
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DotsSettings {
    pub enabled: bool,
    pub left_color: RGB8,
    pub right_color: RGB8,
    /// Eine Farbe für beide Punkte erzwingen
    pub force_override: bool,
    pub forced_color: RGB8,
    pub force_left: bool,
    pub forced_left_color: RGB8,
    pub force_right: bool,
    pub forced_right_color: RGB8,
}

impl DotsSettings {
    /// Farben (links, rechts)
    ///
    /// Rangfolge: globaler Override > Override pro Seite > konfigurierte Farbe.
    pub fn resolved_colors(&self) -> (RGB8, RGB8) {
        if self.force_override {
            return (self.forced_color, self.forced_color);
        }
        let left = if self.force_left {
            self.forced_left_color
        } else {
            self.left_color
        };
        let right = if self.force_right {
            self.forced_right_color
        } else {
            self.right_color
        };
        (left, right)
    }
}

impl Default for DotsSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            left_color: WHITE,
            right_color: WHITE,
            force_override: false,
            forced_color: DEFAULT_FORCED_DOT_COLOR,
            force_left: false,
            forced_left_color: DEFAULT_FORCED_DOT_COLOR,
            force_right: false,
            forced_right_color: DEFAULT_FORCED_DOT_COLOR,
        }
    }
}

// ============================================================================
// Network
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct NetworkSettings {
    /// UTC-Offset in Minuten (-720..=840)
    pub utc_offset_minutes: i16,
    pub time_sync_enabled: bool,
}

impl Default for NetworkSettings {
    fn default() -> Self {
        Self {
            utc_offset_minutes: 0,
            time_sync_enabled: true,
        }
    }
}

// ============================================================================
// ClockSettings
// ============================================================================

/// Komplette Konfiguration; Startwert kommt vom Storage (oder Defaults)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClockSettings {
    pub power: PowerSettings,
    /// Manuell gesetzte Startzeit
    pub time: TimeOfDay,
    pub display: DisplaySettings,
    pub dots: DotsSettings,
    pub alarm: AlarmSettings,
    pub network: NetworkSettings,
}

impl ClockSettings {
    pub fn new() -> Self {
        Self {
            time: TimeOfDay::new(12, 0, 0),
            ..Self::default()
        }
    }
}

// ============================================================================
// Clamping an der Config-Grenze
// ============================================================================

/// Clamping-Helfer für ungeprüfte Eingaben
pub mod clamp {
    use crate::alarm::MAX_ALARM_DURATION_MINUTES;
    use crate::segments::DIGIT_COUNT;

    pub fn hour(value: i32) -> u8 {
        value.clamp(0, 23) as u8
    }

    pub fn minute(value: i32) -> u8 {
        value.clamp(0, 59) as u8
    }

    pub fn second(value: i32) -> u8 {
        value.clamp(0, 59) as u8
    }

    /// Globale Helligkeit: 0 ist nicht erlaubt (Anzeige wäre "aus" ohne Power-Off)
    pub fn brightness(value: i32) -> u8 {
        value.clamp(1, 255) as u8
    }

    /// Ruhezeit-Helligkeit darf 0 sein
    pub fn dim_brightness(value: i32) -> u8 {
        value.clamp(0, 255) as u8
    }

    pub fn digit_index(value: i32) -> u8 {
        value.clamp(0, DIGIT_COUNT as i32 - 1) as u8
    }

    pub fn utc_offset_minutes(value: i32) -> i16 {
        value.clamp(-720, 840) as i16
    }

    pub fn alarm_duration_minutes(value: i32) -> u8 {
        value.clamp(1, MAX_ALARM_DURATION_MINUTES as i32) as u8
    }

    pub fn days_mask(value: i32) -> u8 {
        value.clamp(0, 0b0111_1111) as u8
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BLUE: RGB8 = RGB8 { r: 0, g: 0, b: 255 };
    const GREEN: RGB8 = RGB8 { r: 0, g: 255, b: 0 };

    #[test]
    fn test_digit_color_general_when_per_digit_disabled() {
        let mut display = DisplaySettings::default();
        display.per_digit_colors[2] = BLUE;
        assert_eq!(display.digit_color(2), DEFAULT_GENERAL_COLOR);
    }

    #[test]
    fn test_single_digit_override_beats_per_digit() {
        let mut display = DisplaySettings::default();
        display.per_digit_enabled = true;
        display.per_digit_colors = [BLUE; DIGIT_COUNT];
        display.single_digit_override = SingleDigitOverride {
            enabled: true,
            index: 3,
            color: GREEN,
        };
        assert_eq!(display.digit_color(3), GREEN);
        assert_eq!(display.digit_color(0), BLUE);
    }

    #[test]
    fn test_power_off_forces_off_mode() {
        let power = PowerSettings {
            power_on: false,
            mode: OperatingMode::Weather,
            startup_mode: OperatingMode::Clock,
        };
        assert_eq!(power.effective_mode(), OperatingMode::Off);
    }

    #[test]
    fn test_per_side_forcing() {
        let dots = DotsSettings {
            force_right: true,
            forced_right_color: BLUE,
            ..DotsSettings::default()
        };
        assert_eq!(dots.resolved_colors(), (WHITE, BLUE));
    }

    #[test]
    fn test_clamp_ranges() {
        assert_eq!(clamp::hour(24), 23);
        assert_eq!(clamp::brightness(0), 1);
        assert_eq!(clamp::dim_brightness(-4), 0);
        assert_eq!(clamp::utc_offset_minutes(-900), -720);
        assert_eq!(clamp::utc_offset_minutes(900), 840);
        assert_eq!(clamp::alarm_duration_minutes(0), 1);
        assert_eq!(clamp::digit_index(9), 3);
    }

    #[test]
    fn test_new_settings_start_at_noon() {
        assert_eq!(ClockSettings::new().time, TimeOfDay::new(12, 0, 0));
    }
}
