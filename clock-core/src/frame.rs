//! Pixel-Frame: eine Farbe pro physischer LED

use rgb::RGB8;

/// Anzahl der LEDs im Strip (4 Ziffern à 7 Segmente + 2 Punkte)
pub const PIXEL_COUNT: usize = 30;

/// Ausgeschaltete LED
pub const DARK: RGB8 = RGB8 { r: 0, g: 0, b: 0 };

/// Volles Weiß (Wecker-Anzeige)
pub const WHITE: RGB8 = RGB8 {
    r: 255,
    g: 255,
    b: 255,
};

/// Kompletter Frame für den LED-Strip
///
/// Wird in jedem Render-Tick neu erzeugt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PixelFrame {
    pixels: [RGB8; PIXEL_COUNT],
}

impl PixelFrame {
    /// Alle LEDs aus
    pub const fn dark() -> Self {
        Self {
            pixels: [DARK; PIXEL_COUNT],
        }
    }

    /// Alle LEDs in einer Farbe
    pub const fn filled(color: RGB8) -> Self {
        Self {
            pixels: [color; PIXEL_COUNT],
        }
    }

    /// Setzt eine LED; Indizes außerhalb des Strips werden still verworfen
    ///
    /// Gibt `false` zurück, wenn der Index verworfen wurde.
    pub fn set(&mut self, index: usize, color: RGB8) -> bool {
        match self.pixels.get_mut(index) {
            Some(pixel) => {
                *pixel = color;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, index: usize) -> Option<RGB8> {
        self.pixels.get(index).copied()
    }

    pub fn pixels(&self) -> &[RGB8; PIXEL_COUNT] {
        &self.pixels
    }

    pub fn iter(&self) -> impl Iterator<Item = RGB8> + '_ {
        self.pixels.iter().copied()
    }

    pub fn is_dark(&self) -> bool {
        self.pixels.iter().all(|pixel| *pixel == DARK)
    }
}

impl Default for PixelFrame {
    fn default() -> Self {
        Self::dark()
    }
}
