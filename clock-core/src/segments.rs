//! Segment-Encoder: Ziffer → Segmente → physische LED
//!
//! Die Verdrahtung des Strips ist eine Hardware-Tatsache und bleibt deshalb
//! als explizite Lookup-Tabelle stehen (keine berechneten Formeln).
//!
//! ```text
//!  ─A─      Strip-Reihenfolge pro Ziffer:
//! F   B       LED 1=E, 2=D, 3=C, 4=G, 5=F, 6=A, 7=B
//!  ─G─
//! E   C     Ziffern 0/1 → Basis 0/7, Punkte → 14/15,
//!  ─D─      Ziffern 2/3 → Basis 16/23
//! ```

use rgb::RGB8;

use crate::frame::{DARK, PixelFrame};

/// Anzahl der Ziffern
pub const DIGIT_COUNT: usize = 4;

/// Segmente pro Ziffer (A..G)
pub const SEGMENTS_PER_DIGIT: usize = 7;

/// Ziffer-Position der Stunden-Zehner (einzige Stelle mit Führungsnull-Unterdrückung)
pub const HOUR_TENS_POSITION: usize = 0;

/// LED-Index des linken Punkts
pub const DOT_LEFT_INDEX: usize = 14;

/// LED-Index des rechten Punkts
pub const DOT_RIGHT_INDEX: usize = 15;

/// 7-Bit Segment-Maske, Bit 0 = Segment A
pub type SegmentMask = u8;

/// Standard-Siebensegment-Kodierung für 0-9 (Reihenfolge A..G, Bit 0 = A)
const DIGIT_SEGMENTS: [SegmentMask; 10] = [
    0b0011_1111, // 0
    0b0000_0110, // 1
    0b0101_1011, // 2
    0b0100_1111, // 3
    0b0110_0110, // 4
    0b0110_1101, // 5
    0b0111_1101, // 6
    0b0000_0111, // 7
    0b0111_1111, // 8
    0b0110_1111, // 9
];

/// Erste LED jeder Ziffer auf dem Strip
///
/// Zwischen Ziffer 1 und 2 sitzen die beiden Punkte, deshalb ist der
/// Abstand nicht gleichmäßig.
const DIGIT_BASE_OFFSET: [usize; DIGIT_COUNT] = [0, 7, 16, 23];

/// Logisches Segment (A..G) → Offset innerhalb der Ziffer
const SEGMENT_LED_OFFSET: [usize; SEGMENTS_PER_DIGIT] = [
    5, // A
    6, // B
    2, // C
    1, // D
    0, // E
    4, // F
    3, // G
];

/// Segment-Maske einer Ziffer; Werte > 9 ergeben eine dunkle Ziffer
pub fn segments_for(digit: u8) -> SegmentMask {
    DIGIT_SEGMENTS.get(digit as usize).copied().unwrap_or(0)
}

/// Segment-Maske mit optionaler Führungsnull-Unterdrückung
pub fn digit_mask(digit: u8, suppress_leading_zero: bool) -> SegmentMask {
    if suppress_leading_zero && digit == 0 {
        0
    } else {
        segments_for(digit)
    }
}

/// Physischer LED-Index für (Ziffer-Position, Segment)
///
/// Gibt `None` zurück, wenn Position oder Segment außerhalb der Tabellen liegt.
pub fn pixel_index_for(position: usize, segment: usize) -> Option<usize> {
    let base = DIGIT_BASE_OFFSET.get(position)?;
    let offset = SEGMENT_LED_OFFSET.get(segment)?;
    Some(base + offset)
}

/// Schreibt eine Ziffer in den Frame
///
/// Beleuchtete Segmente bekommen `color`, alle anderen werden dunkel.
/// LED-Indizes außerhalb des Strips werden still verworfen.
pub fn write_digit(
    frame: &mut PixelFrame,
    position: usize,
    digit: u8,
    color: RGB8,
    suppress_leading_zero: bool,
) {
    let mask = digit_mask(digit, suppress_leading_zero);
    for segment in 0..SEGMENTS_PER_DIGIT {
        let Some(index) = pixel_index_for(position, segment) else {
            continue;
        };
        let lit = mask & (1 << segment) != 0;
        frame.set(index, if lit { color } else { DARK });
    }
}
