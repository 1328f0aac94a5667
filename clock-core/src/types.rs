//! Core Types für die LED-Uhr
//!
//! Datenstrukturen ohne Hardware-Dependencies: Uhrzeit, Wochentag,
//! Betriebsmodus und die Kommandos, die andere Tasks an den Render-Task senden.

use crate::settings::{
    AlarmSettings, ClockDocument, DisplaySettings, DotsSettings, NetworkSettings, PowerSettings,
};

/// Sekunden pro Tag (24h)
pub const SECONDS_PER_DAY: u32 = 86_400;

/// Sekunden pro Woche - Basis für Wochentag-Arithmetik
const SECONDS_PER_WEEK: i64 = 7 * SECONDS_PER_DAY as i64;

// ============================================================================
// TimeOfDay
// ============================================================================

/// Uhrzeit ohne Datum
///
/// Immer normalisiert: Stunde 0-23, Minute 0-59, Sekunde 0-59.
/// Arithmetik läuft modulo 24h.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimeOfDay {
    hour: u8,
    minute: u8,
    second: u8,
}

impl TimeOfDay {
    /// Mitternacht (00:00:00)
    pub const MIDNIGHT: Self = Self::new(0, 0, 0);

    /// Erstellt eine Uhrzeit; Werte außerhalb des Bereichs werden auf das Maximum begrenzt
    ///
    /// ```
    /// # use clock_core::TimeOfDay;
    /// let t = TimeOfDay::new(7, 30, 0);
    /// assert_eq!((t.hour(), t.minute(), t.second()), (7, 30, 0));
    /// assert_eq!(TimeOfDay::new(99, 99, 99), TimeOfDay::new(23, 59, 59));
    /// ```
    pub const fn new(hour: u8, minute: u8, second: u8) -> Self {
        Self {
            hour: if hour > 23 { 23 } else { hour },
            minute: if minute > 59 { 59 } else { minute },
            second: if second > 59 { 59 } else { second },
        }
    }

    /// Wandelt Sekunden seit Mitternacht in eine Uhrzeit um (modulo 24h)
    pub const fn from_seconds_of_day(seconds: u32) -> Self {
        let seconds = seconds % SECONDS_PER_DAY;
        Self {
            hour: (seconds / 3600) as u8,
            minute: ((seconds % 3600) / 60) as u8,
            second: (seconds % 60) as u8,
        }
    }

    pub const fn hour(self) -> u8 {
        self.hour
    }

    pub const fn minute(self) -> u8 {
        self.minute
    }

    pub const fn second(self) -> u8 {
        self.second
    }

    /// Sekunden seit Mitternacht (0..86400)
    pub const fn seconds_of_day(self) -> u32 {
        self.hour as u32 * 3600 + self.minute as u32 * 60 + self.second as u32
    }

    /// Minuten seit Mitternacht (0..1440)
    pub const fn minute_of_day(self) -> u16 {
        self.hour as u16 * 60 + self.minute as u16
    }

    /// Addiert (oder subtrahiert) Sekunden mit Wraparound über Mitternacht
    pub fn wrapping_add_seconds(self, seconds: i64) -> Self {
        let total = (self.seconds_of_day() as i64 + seconds).rem_euclid(SECONDS_PER_DAY as i64);
        Self::from_seconds_of_day(total as u32)
    }

    /// Die vier Ziffern der Anzeige: [Stunde Zehner, Stunde Einer, Minute Zehner, Minute Einer]
    pub const fn display_digits(self) -> [u8; 4] {
        [
            self.hour / 10,
            self.hour % 10,
            self.minute / 10,
            self.minute % 10,
        ]
    }
}

// ============================================================================
// Weekday
// ============================================================================

/// Wochentag, Sonntag = 0 (gleiche Reihenfolge wie die Bits in [`DaysMask`])
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum Weekday {
    Sunday = 0,
    Monday = 1,
    Tuesday = 2,
    Wednesday = 3,
    Thursday = 4,
    Friday = 5,
    Saturday = 6,
}

impl Weekday {
    const ALL: [Weekday; 7] = [
        Weekday::Sunday,
        Weekday::Monday,
        Weekday::Tuesday,
        Weekday::Wednesday,
        Weekday::Thursday,
        Weekday::Friday,
        Weekday::Saturday,
    ];

    /// Index 0..=6 (modulo 7)
    pub const fn from_index(index: u8) -> Self {
        Self::ALL[(index % 7) as usize]
    }

    pub const fn index(self) -> u8 {
        self as u8
    }

    /// Bit dieses Tages in einer [`DaysMask`]
    pub const fn bit(self) -> u8 {
        1 << self as u8
    }

    /// Wochentag eines Tages seit 1970-01-01 (ein Donnerstag)
    pub fn from_days_since_epoch(days: i64) -> Self {
        Self::from_index((days + Weekday::Thursday as i64).rem_euclid(7) as u8)
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Weekday::Sunday => "sunday",
            Weekday::Monday => "monday",
            Weekday::Tuesday => "tuesday",
            Weekday::Wednesday => "wednesday",
            Weekday::Thursday => "thursday",
            Weekday::Friday => "friday",
            Weekday::Saturday => "saturday",
        }
    }
}

// ============================================================================
// DaysMask
// ============================================================================

/// 7-Bit-Menge der Wochentage, an denen der Wecker klingeln darf
///
/// Sonntag = Bit 0 … Samstag = Bit 6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DaysMask(u8);

impl DaysMask {
    pub const NONE: Self = Self(0);
    pub const ALL: Self = Self(0b0111_1111);
    /// Montag bis Freitag
    pub const WORKDAYS: Self = Self(0b0011_1110);

    /// Übernimmt nur die unteren 7 Bits
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits & 0b0111_1111)
    }

    pub const fn bits(self) -> u8 {
        self.0
    }

    pub const fn contains(self, day: Weekday) -> bool {
        self.0 & day.bit() != 0
    }

    pub const fn with(self, day: Weekday) -> Self {
        Self(self.0 | day.bit())
    }

    pub const fn without(self, day: Weekday) -> Self {
        Self(self.0 & !day.bit())
    }
}

// ============================================================================
// LocalTime
// ============================================================================

/// Lokale Uhrzeit plus (falls bekannt) Wochentag
///
/// Der Wochentag ist erst nach einer Netzwerk-Zeitsynchronisation bekannt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LocalTime {
    pub time: TimeOfDay,
    pub weekday: Option<Weekday>,
}

impl LocalTime {
    pub const fn new(time: TimeOfDay, weekday: Option<Weekday>) -> Self {
        Self { time, weekday }
    }

    /// Rechnet Unix-Sekunden (UTC) mit einem UTC-Offset in lokale Zeit um
    ///
    /// ```
    /// # use clock_core::{LocalTime, TimeOfDay, Weekday};
    /// // 2024-01-01 00:30:00 UTC war ein Montag
    /// let local = LocalTime::from_unix_seconds(1_704_069_000, 60);
    /// assert_eq!(local.time, TimeOfDay::new(1, 30, 0));
    /// assert_eq!(local.weekday, Some(Weekday::Monday));
    /// ```
    pub fn from_unix_seconds(unix_seconds: i64, utc_offset_minutes: i16) -> Self {
        let local = unix_seconds + utc_offset_minutes as i64 * 60;
        let days = local.div_euclid(SECONDS_PER_DAY as i64);
        let seconds = local.rem_euclid(SECONDS_PER_DAY as i64);
        Self {
            time: TimeOfDay::from_seconds_of_day(seconds as u32),
            weekday: Some(Weekday::from_days_since_epoch(days)),
        }
    }

    /// Verschiebt die Zeit um `seconds`; der Wochentag wandert über Mitternacht mit
    pub fn advanced_by(self, seconds: i64) -> Self {
        match self.weekday {
            Some(day) => {
                let week_seconds =
                    day.index() as i64 * SECONDS_PER_DAY as i64 + self.time.seconds_of_day() as i64;
                let shifted = (week_seconds + seconds).rem_euclid(SECONDS_PER_WEEK);
                Self {
                    time: TimeOfDay::from_seconds_of_day(
                        (shifted % SECONDS_PER_DAY as i64) as u32,
                    ),
                    weekday: Some(Weekday::from_index(
                        (shifted / SECONDS_PER_DAY as i64) as u8,
                    )),
                }
            }
            None => Self {
                time: self.time.wrapping_add_seconds(seconds),
                weekday: None,
            },
        }
    }
}

impl From<TimeOfDay> for LocalTime {
    fn from(time: TimeOfDay) -> Self {
        Self::new(time, None)
    }
}

// ============================================================================
// OperatingMode
// ============================================================================

/// Betriebsmodus der Anzeige
///
/// Wird einmal an der Config-Grenze aus einem String dekodiert,
/// intern wird nie wieder ein String verglichen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum OperatingMode {
    #[default]
    Clock,
    Timer,
    Weather,
    Custom,
    Alarm,
    Off,
}

impl OperatingMode {
    pub const fn as_str(self) -> &'static str {
        match self {
            OperatingMode::Clock => "clock",
            OperatingMode::Timer => "timer",
            OperatingMode::Weather => "weather",
            OperatingMode::Custom => "custom",
            OperatingMode::Alarm => "alarm",
            OperatingMode::Off => "off",
        }
    }

    /// Dekodiert einen Modus-Namen; unbekannte Namen fallen auf [`OperatingMode::Clock`] zurück
    pub fn from_name_or_default(name: &str) -> Self {
        Self::try_from(name).unwrap_or_default()
    }

    /// Timer und Alarm lassen die Punkte blinken
    pub const fn blinks_dots(self) -> bool {
        matches!(self, OperatingMode::Timer | OperatingMode::Alarm)
    }
}

impl core::convert::TryFrom<&str> for OperatingMode {
    type Error = ();

    fn try_from(name: &str) -> Result<Self, Self::Error> {
        const MODES: [OperatingMode; 6] = [
            OperatingMode::Clock,
            OperatingMode::Timer,
            OperatingMode::Weather,
            OperatingMode::Custom,
            OperatingMode::Alarm,
            OperatingMode::Off,
        ];

        let name = name.trim();
        MODES
            .into_iter()
            .find(|mode| mode.as_str().eq_ignore_ascii_case(name))
            .ok_or(())
    }
}

// ============================================================================
// ClockCommand
// ============================================================================

/// Kommando an den Render-Task
///
/// Der Render-Task ist der einzige Besitzer der Einstellungen; alle anderen
/// Tasks (HTTP, Zeitsync) ändern den Zustand nur über diese Kommandos.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClockCommand {
    SetPower(PowerSettings),
    SetTime(TimeOfDay),
    SetDisplay(DisplaySettings),
    SetDots(DotsSettings),
    SetAlarm(AlarmSettings),
    SetNetwork(NetworkSettings),
    /// Teil-Dokument mit optionalen Feldern (z.B. vom WebSocket)
    Patch(ClockDocument),
    /// Klingelnden Wecker sofort stoppen
    StopAlarm,
    /// Zurück in den Startup-Modus
    ExitSpecialMode,
    /// Autoritative Zeit vom Netzwerk (Unix-Sekunden, UTC)
    ExternalSync { unix_seconds: i64 },
}

// ============================================================================
// defmt::Format Implementations (optional feature)
// ============================================================================

#[cfg(feature = "defmt")]
impl defmt::Format for ClockCommand {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ClockCommand::SetPower(power) => defmt::write!(
                fmt,
                "SetPower {{ on: {}, mode: {} }}",
                power.power_on,
                power.mode
            ),
            ClockCommand::SetTime(time) => defmt::write!(fmt, "SetTime {{ {} }}", time),
            ClockCommand::SetDisplay(display) => defmt::write!(
                fmt,
                "SetDisplay {{ brightness: {} }}",
                display.brightness
            ),
            ClockCommand::SetDots(dots) => {
                defmt::write!(fmt, "SetDots {{ enabled: {} }}", dots.enabled)
            }
            ClockCommand::SetAlarm(alarm) => defmt::write!(
                fmt,
                "SetAlarm {{ enabled: {}, {}:{} }}",
                alarm.enabled,
                alarm.hour,
                alarm.minute
            ),
            ClockCommand::SetNetwork(network) => defmt::write!(
                fmt,
                "SetNetwork {{ utc_offset: {} }}",
                network.utc_offset_minutes
            ),
            ClockCommand::Patch(_) => defmt::write!(fmt, "Patch"),
            ClockCommand::StopAlarm => defmt::write!(fmt, "StopAlarm"),
            ClockCommand::ExitSpecialMode => defmt::write!(fmt, "ExitSpecialMode"),
            ClockCommand::ExternalSync { unix_seconds } => {
                defmt::write!(fmt, "ExternalSync {{ unix: {} }}", unix_seconds)
            }
        }
    }
}
