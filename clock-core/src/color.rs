//! Pure Farb-Funktionen
//!
//! Hex-Konvertierung für die Config-Grenze und Helligkeits-Skalierung
//! für den Hardware-Layer (testbar ohne Hardware!)

use rgb::RGB8;

/// Parst eine Farbe im Format `#RRGGBB`
///
/// # Beispiele
///
/// ```
/// # use rgb::RGB8;
/// # use clock_core::parse_hex_color;
/// assert_eq!(parse_hex_color("#FF5500"), Some(RGB8 { r: 255, g: 85, b: 0 }));
/// assert_eq!(parse_hex_color("ff5500"), None);
/// ```
pub fn parse_hex_color(value: &str) -> Option<RGB8> {
    let hex = value.trim().strip_prefix('#')?;
    if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    let number = u32::from_str_radix(hex, 16).ok()?;
    Some(RGB8 {
        r: (number >> 16) as u8,
        g: (number >> 8) as u8,
        b: number as u8,
    })
}

/// Farbe als `#RRGGBB` (Großbuchstaben), ohne Allokation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HexString([u8; 7]);

impl HexString {
    pub fn as_str(&self) -> &str {
        // Enthält nur ASCII ('#', 0-9, A-F)
        core::str::from_utf8(&self.0).unwrap_or("#000000")
    }
}

/// Formatiert eine Farbe als `#RRGGBB`
pub fn format_hex_color(color: RGB8) -> HexString {
    const DIGITS: &[u8; 16] = b"0123456789ABCDEF";
    let mut out = [b'#'; 7];
    for (i, byte) in [color.r, color.g, color.b].into_iter().enumerate() {
        out[1 + i * 2] = DIGITS[(byte >> 4) as usize];
        out[2 + i * 2] = DIGITS[(byte & 0x0F) as usize];
    }
    HexString(out)
}

/// Skaliert eine Farbe mit der globalen Helligkeit (0-255)
///
/// Gleiche Formel wie `smart_leds::brightness`: 255 lässt die Farbe unverändert,
/// 0 schaltet die LED aus.
pub fn scale_brightness(color: RGB8, brightness: u8) -> RGB8 {
    let scale = |channel: u8| ((channel as u16 * (brightness as u16 + 1)) >> 8) as u8;
    RGB8 {
        r: scale(color.r),
        g: scale(color.g),
        b: scale(color.b),
    }
}
