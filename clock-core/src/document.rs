//! Einstellungs-Dokument für Storage und WebSocket
//!
//! Gleiche Struktur wie die persistierte Config:
//! `power`, `time`, `display` (mit `per_digit_color`, `single_digit_override`,
//! `quiet_hours`), `dots`, `alarm`, `network`.
//!
//! Alle Felder sind optional: ein Dokument ist gleichzeitig ein Patch.
//! Fehlende Felder behalten den alten Wert, Zahlen werden beim Mergen
//! geclampt, ungültige Farben ignoriert.

use rgb::RGB8;

use crate::segments::DIGIT_COUNT;
use crate::settings::{ClockSettings, clamp};
use crate::types::{DaysMask, OperatingMode, TimeOfDay};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct PowerSection {
    pub power_on: Option<bool>,
    pub mode: Option<OperatingMode>,
    pub startup_mode: Option<OperatingMode>,
    pub exit_special_mode: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct TimeSection {
    pub hour: Option<i32>,
    pub minute: Option<i32>,
    pub second: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct PerDigitSection {
    pub enabled: Option<bool>,
    #[cfg_attr(feature = "serde", serde(with = "serde_digit_colors"))]
    pub values: Option<[Option<RGB8>; DIGIT_COUNT]>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct SingleDigitSection {
    pub enabled: Option<bool>,
    pub index: Option<i32>,
    #[cfg_attr(feature = "serde", serde(with = "serde_color"))]
    pub color: Option<RGB8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct QuietHoursSection {
    pub enabled: Option<bool>,
    pub start_hour: Option<i32>,
    pub start_minute: Option<i32>,
    pub end_hour: Option<i32>,
    pub end_minute: Option<i32>,
    pub dim_brightness: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct DisplaySection {
    pub brightness: Option<i32>,
    #[cfg_attr(feature = "serde", serde(with = "serde_color"))]
    pub general_color: Option<RGB8>,
    /// Objekt `{enabled, values}` oder kurz ein Farb-Array (schaltet Per-Digit ein)
    #[cfg_attr(feature = "serde", serde(with = "serde_per_digit"))]
    pub per_digit_color: Option<PerDigitSection>,
    pub single_digit_override: Option<SingleDigitSection>,
    pub quiet_hours: Option<QuietHoursSection>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct DotsSection {
    pub enabled: Option<bool>,
    #[cfg_attr(feature = "serde", serde(with = "serde_color"))]
    pub left_color: Option<RGB8>,
    #[cfg_attr(feature = "serde", serde(with = "serde_color"))]
    pub right_color: Option<RGB8>,
    pub force_override: Option<bool>,
    #[cfg_attr(feature = "serde", serde(with = "serde_color"))]
    pub forced_color: Option<RGB8>,
    pub force_left: Option<bool>,
    #[cfg_attr(feature = "serde", serde(with = "serde_color"))]
    pub forced_left_color: Option<RGB8>,
    pub force_right: Option<bool>,
    #[cfg_attr(feature = "serde", serde(with = "serde_color"))]
    pub forced_right_color: Option<RGB8>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct AlarmSection {
    pub enabled: Option<bool>,
    pub hour: Option<i32>,
    pub minute: Option<i32>,
    pub days_mask: Option<i32>,
    pub duration_minutes: Option<i32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct NetworkSection {
    pub utc_offset_minutes: Option<i32>,
    pub time_sync_enabled: Option<bool>,
}

/// Komplettes (oder partielles) Einstellungs-Dokument
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize), serde(default))]
pub struct ClockDocument {
    pub power: Option<PowerSection>,
    pub time: Option<TimeSection>,
    pub display: Option<DisplaySection>,
    pub dots: Option<DotsSection>,
    pub alarm: Option<AlarmSection>,
    pub network: Option<NetworkSection>,
}

impl ClockDocument {
    /// Vollständiges Dokument aus den aktuellen Einstellungen (Config-Egress)
    pub fn from_settings(settings: &ClockSettings) -> Self {
        let display = &settings.display;
        let quiet = &display.quiet_hours;
        let single = &display.single_digit_override;
        let dots = &settings.dots;
        let alarm = &settings.alarm;

        Self {
            power: Some(PowerSection {
                power_on: Some(settings.power.power_on),
                mode: Some(settings.power.mode),
                startup_mode: Some(settings.power.startup_mode),
                exit_special_mode: Some(false),
            }),
            time: Some(TimeSection {
                hour: Some(settings.time.hour() as i32),
                minute: Some(settings.time.minute() as i32),
                second: Some(settings.time.second() as i32),
            }),
            display: Some(DisplaySection {
                brightness: Some(display.brightness as i32),
                general_color: Some(display.general_color),
                per_digit_color: Some(PerDigitSection {
                    enabled: Some(display.per_digit_enabled),
                    values: Some(display.per_digit_colors.map(Some)),
                }),
                single_digit_override: Some(SingleDigitSection {
                    enabled: Some(single.enabled),
                    index: Some(single.index as i32),
                    color: Some(single.color),
                }),
                quiet_hours: Some(QuietHoursSection {
                    enabled: Some(quiet.enabled),
                    start_hour: Some(quiet.start_hour as i32),
                    start_minute: Some(quiet.start_minute as i32),
                    end_hour: Some(quiet.end_hour as i32),
                    end_minute: Some(quiet.end_minute as i32),
                    dim_brightness: Some(quiet.dim_brightness as i32),
                }),
            }),
            dots: Some(DotsSection {
                enabled: Some(dots.enabled),
                left_color: Some(dots.left_color),
                right_color: Some(dots.right_color),
                force_override: Some(dots.force_override),
                forced_color: Some(dots.forced_color),
                force_left: Some(dots.force_left),
                forced_left_color: Some(dots.forced_left_color),
                force_right: Some(dots.force_right),
                forced_right_color: Some(dots.forced_right_color),
            }),
            alarm: Some(AlarmSection {
                enabled: Some(alarm.enabled),
                hour: Some(alarm.hour as i32),
                minute: Some(alarm.minute as i32),
                days_mask: Some(alarm.days_mask.bits() as i32),
                duration_minutes: Some(alarm.duration_minutes as i32),
            }),
            network: Some(NetworkSection {
                utc_offset_minutes: Some(settings.network.utc_offset_minutes as i32),
                time_sync_enabled: Some(settings.network.time_sync_enabled),
            }),
        }
    }
}

/// Übernimmt `value`, falls vorhanden
fn set<T>(target: &mut T, value: Option<T>) {
    if let Some(value) = value {
        *target = value;
    }
}

impl ClockSettings {
    /// Startwert aus einem persistierten Dokument; fehlende Teile bleiben Default
    pub fn from_document(doc: &ClockDocument) -> Self {
        let mut settings = Self::new();
        settings.merge_document(doc);
        settings
    }

    /// Merged ein (partielles) Dokument in die Einstellungen
    ///
    /// Zahlen werden geclampt, ungültige Farben wurden bereits beim Parsen verworfen.
    pub fn merge_document(&mut self, doc: &ClockDocument) {
        if let Some(power) = &doc.power {
            set(&mut self.power.power_on, power.power_on);
            set(&mut self.power.mode, power.mode);
            set(&mut self.power.startup_mode, power.startup_mode);
            if power.exit_special_mode == Some(true) {
                self.power.mode = self.power.startup_mode;
            }
        }

        if let Some(time) = &doc.time {
            self.time = TimeOfDay::new(
                time.hour.map_or(self.time.hour(), clamp::hour),
                time.minute.map_or(self.time.minute(), clamp::minute),
                time.second.map_or(self.time.second(), clamp::second),
            );
        }

        if let Some(display) = &doc.display {
            let target = &mut self.display;
            set(&mut target.brightness, display.brightness.map(clamp::brightness));
            set(&mut target.general_color, display.general_color);

            if let Some(per_digit) = &display.per_digit_color {
                set(&mut target.per_digit_enabled, per_digit.enabled);
                if let Some(values) = &per_digit.values {
                    for (color, value) in target.per_digit_colors.iter_mut().zip(values) {
                        set(color, *value);
                    }
                }
            }

            if let Some(single) = &display.single_digit_override {
                let target = &mut target.single_digit_override;
                set(&mut target.enabled, single.enabled);
                set(&mut target.index, single.index.map(clamp::digit_index));
                set(&mut target.color, single.color);
            }

            if let Some(quiet) = &display.quiet_hours {
                let target = &mut target.quiet_hours;
                set(&mut target.enabled, quiet.enabled);
                set(&mut target.start_hour, quiet.start_hour.map(clamp::hour));
                set(&mut target.start_minute, quiet.start_minute.map(clamp::minute));
                set(&mut target.end_hour, quiet.end_hour.map(clamp::hour));
                set(&mut target.end_minute, quiet.end_minute.map(clamp::minute));
                set(
                    &mut target.dim_brightness,
                    quiet.dim_brightness.map(clamp::dim_brightness),
                );
            }
        }

        if let Some(dots) = &doc.dots {
            let target = &mut self.dots;
            set(&mut target.enabled, dots.enabled);
            set(&mut target.left_color, dots.left_color);
            set(&mut target.right_color, dots.right_color);
            set(&mut target.force_override, dots.force_override);
            set(&mut target.forced_color, dots.forced_color);
            set(&mut target.force_left, dots.force_left);
            set(&mut target.forced_left_color, dots.forced_left_color);
            set(&mut target.force_right, dots.force_right);
            set(&mut target.forced_right_color, dots.forced_right_color);
        }

        if let Some(alarm) = &doc.alarm {
            let target = &mut self.alarm;
            set(&mut target.enabled, alarm.enabled);
            set(&mut target.hour, alarm.hour.map(clamp::hour));
            set(&mut target.minute, alarm.minute.map(clamp::minute));
            set(
                &mut target.days_mask,
                alarm
                    .days_mask
                    .map(|bits| DaysMask::from_bits(clamp::days_mask(bits))),
            );
            set(
                &mut target.duration_minutes,
                alarm.duration_minutes.map(clamp::alarm_duration_minutes),
            );
        }

        if let Some(network) = &doc.network {
            set(
                &mut self.network.utc_offset_minutes,
                network.utc_offset_minutes.map(clamp::utc_offset_minutes),
            );
            set(&mut self.network.time_sync_enabled, network.time_sync_enabled);
        }
    }
}

// ============================================================================
// serde Implementations (optional feature)
// ============================================================================

/// Farben als `"#RRGGBB"`; alles andere wird zu `None` (alter Wert bleibt)
#[cfg(feature = "serde")]
mod serde_color {
    use core::fmt;

    use rgb::RGB8;
    use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
    use serde::ser::Serializer;

    use crate::color::{format_hex_color, parse_hex_color};

    pub(super) struct ColorVisitor;

    impl<'de> Visitor<'de> for ColorVisitor {
        type Value = Option<RGB8>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a color string like \"#RRGGBB\"")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(parse_hex_color(value))
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_any(ColorVisitor)
        }

        fn visit_bool<E: de::Error>(self, _value: bool) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_i64<E: de::Error>(self, _value: i64) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_u64<E: de::Error>(self, _value: u64) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_f64<E: de::Error>(self, _value: f64) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            while seq.next_element::<IgnoredAny>()?.is_some() {}
            Ok(None)
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
            Ok(None)
        }
    }

    pub fn serialize<S: Serializer>(value: &Option<RGB8>, serializer: S) -> Result<S::Ok, S::Error> {
        match value {
            Some(color) => serializer.serialize_str(format_hex_color(*color).as_str()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<RGB8>, D::Error> {
        deserializer.deserialize_option(ColorVisitor)
    }
}

/// Bis zu vier Farben als JSON-Array; überzählige Einträge werden ignoriert
#[cfg(feature = "serde")]
mod serde_digit_colors {
    use core::fmt;

    use rgb::RGB8;
    use serde::de::{self, Deserialize, Deserializer, IgnoredAny, SeqAccess, Visitor};
    use serde::ser::{Serialize, SerializeSeq, Serializer};

    use super::serde_color;
    use crate::segments::DIGIT_COUNT;

    pub(super) type DigitColors = [Option<RGB8>; DIGIT_COUNT];

    struct LenientColor(Option<RGB8>);

    impl<'de> Deserialize<'de> for LenientColor {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            serde_color::deserialize(deserializer).map(LenientColor)
        }
    }

    struct ColorRef<'a>(&'a Option<RGB8>);

    impl Serialize for ColorRef<'_> {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serde_color::serialize(self.0, serializer)
        }
    }

    struct DigitColorsVisitor;

    impl<'de> Visitor<'de> for DigitColorsVisitor {
        type Value = Option<DigitColors>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an array of up to four color strings")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_seq(DigitColorsVisitor)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
            read_colors(seq).map(Some)
        }
    }

    /// Liest bis zu vier Farben; fehlende bleiben `None`, überzählige werden verworfen
    pub(super) fn read_colors<'de, A: SeqAccess<'de>>(mut seq: A) -> Result<DigitColors, A::Error> {
        let mut colors: DigitColors = [None; DIGIT_COUNT];
        for slot in colors.iter_mut() {
            match seq.next_element::<LenientColor>()? {
                Some(LenientColor(color)) => *slot = color,
                None => return Ok(colors),
            }
        }
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(colors)
    }

    pub fn serialize<S: Serializer>(
        value: &Option<DigitColors>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(colors) => {
                let mut seq = serializer.serialize_seq(Some(DIGIT_COUNT))?;
                for color in colors {
                    seq.serialize_element(&ColorRef(color))?;
                }
                seq.end()
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DigitColors>, D::Error> {
        deserializer.deserialize_option(DigitColorsVisitor)
    }
}

/// `per_digit_color` als Objekt oder als reines Farb-Array
#[cfg(feature = "serde")]
mod serde_per_digit {
    use core::fmt;

    use serde::de::value::MapAccessDeserializer;
    use serde::de::{self, Deserialize, Deserializer, MapAccess, SeqAccess, Visitor};
    use serde::ser::{Serialize, Serializer};

    use super::{PerDigitSection, serde_digit_colors};

    struct PerDigitVisitor;

    impl<'de> Visitor<'de> for PerDigitVisitor {
        type Value = Option<PerDigitSection>;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("a per-digit object or an array of color strings")
        }

        fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
            Ok(None)
        }

        fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Self::Value, D::Error> {
            deserializer.deserialize_any(PerDigitVisitor)
        }

        fn visit_map<A: MapAccess<'de>>(self, map: A) -> Result<Self::Value, A::Error> {
            PerDigitSection::deserialize(MapAccessDeserializer::new(map)).map(Some)
        }

        // Kurzform: Array aktiviert Per-Digit-Farben
        fn visit_seq<A: SeqAccess<'de>>(self, seq: A) -> Result<Self::Value, A::Error> {
            Ok(Some(PerDigitSection {
                enabled: Some(true),
                values: Some(serde_digit_colors::read_colors(seq)?),
            }))
        }
    }

    pub fn serialize<S: Serializer>(
        value: &Option<PerDigitSection>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        value.serialize(serializer)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<PerDigitSection>, D::Error> {
        deserializer.deserialize_option(PerDigitVisitor)
    }
}

/// Modus als Kleinbuchstaben-String; unbekannte Namen → `clock`
#[cfg(feature = "serde")]
mod serde_mode {
    use core::fmt;

    use serde::de::{self, Deserialize, Deserializer, Visitor};
    use serde::ser::{Serialize, Serializer};

    use crate::types::{OperatingMode, Weekday};

    impl Serialize for OperatingMode {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(self.as_str())
        }
    }

    struct ModeVisitor;

    impl<'de> Visitor<'de> for ModeVisitor {
        type Value = OperatingMode;

        fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
            formatter.write_str("an operating mode name")
        }

        fn visit_str<E: de::Error>(self, value: &str) -> Result<Self::Value, E> {
            Ok(OperatingMode::from_name_or_default(value))
        }
    }

    impl<'de> Deserialize<'de> for OperatingMode {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            deserializer.deserialize_str(ModeVisitor)
        }
    }

    impl Serialize for Weekday {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            serializer.serialize_str(self.as_str())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::DEFAULT_GENERAL_COLOR;

    #[test]
    fn test_empty_document_changes_nothing() {
        let mut settings = ClockSettings::new();
        settings.merge_document(&ClockDocument::default());
        assert_eq!(settings, ClockSettings::new());
    }

    #[test]
    fn test_merge_clamps_numbers() {
        let doc = ClockDocument {
            display: Some(DisplaySection {
                brightness: Some(0),
                ..Default::default()
            }),
            alarm: Some(AlarmSection {
                hour: Some(30),
                duration_minutes: Some(500),
                days_mask: Some(0xFFFF),
                ..Default::default()
            }),
            ..Default::default()
        };
        let settings = ClockSettings::from_document(&doc);
        assert_eq!(settings.display.brightness, 1);
        assert_eq!(settings.alarm.hour, 23);
        assert_eq!(settings.alarm.duration_minutes, 60);
        assert_eq!(settings.alarm.days_mask, DaysMask::ALL);
    }

    #[test]
    fn test_exit_special_mode_restores_startup_mode() {
        let mut settings = ClockSettings::new();
        settings.power.mode = OperatingMode::Timer;
        settings.merge_document(&ClockDocument {
            power: Some(PowerSection {
                exit_special_mode: Some(true),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert_eq!(settings.power.mode, OperatingMode::Clock);
    }

    #[test]
    fn test_partial_per_digit_values_keep_rest() {
        let blue = RGB8 { r: 0, g: 0, b: 255 };
        let mut settings = ClockSettings::new();
        settings.merge_document(&ClockDocument {
            display: Some(DisplaySection {
                per_digit_color: Some(PerDigitSection {
                    enabled: Some(true),
                    values: Some([Some(blue), None, None, None]),
                }),
                ..Default::default()
            }),
            ..Default::default()
        });
        assert!(settings.display.per_digit_enabled);
        assert_eq!(settings.display.per_digit_colors[0], blue);
        assert_eq!(settings.display.per_digit_colors[1], DEFAULT_GENERAL_COLOR);
    }

    #[test]
    fn test_from_settings_round_trips_through_merge() {
        let mut configured = ClockSettings::new();
        configured.alarm.enabled = true;
        configured.network.utc_offset_minutes = 120;
        configured.display.quiet_hours.enabled = true;
        let doc = ClockDocument::from_settings(&configured);
        assert_eq!(ClockSettings::from_document(&doc), configured);
    }
}
