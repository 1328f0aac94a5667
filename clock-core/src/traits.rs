//! Hardware Abstraction Traits
//!
//! Schnittstellen für LED-Strip und Zeitbasis ohne konkrete Implementierung.

use crate::frame::PixelFrame;

/// Fehler-Typ für LED-Operationen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LedError {
    /// Peripheral konnte nicht initialisiert werden
    InitFailed,
    WriteFailed,
}

/// Trait für den SmartLED-Strip der Uhr
///
/// Abstrahiert den Zugriff auf den WS2812-Strip (30 LEDs).
///
/// # Implementierungen
/// - **Production:** RmtLedWriter (ESP32 RMT Peripheral)
/// - **Testing:** MockLedWriter (in-memory Mock)
pub trait SmartLedWriter: Send {
    /// Schreibt einen kompletten Frame mit globaler Helligkeit (0-255)
    ///
    /// # Fehlerbehandlung
    /// Gibt `LedError::WriteFailed` zurück wenn Hardware-Zugriff fehlschlägt
    fn write_frame(&mut self, frame: &PixelFrame, brightness: u8) -> Result<(), LedError>;
}

/// Ersatz-Writer, wenn der Strip nicht initialisiert werden konnte
///
/// Verwirft jeden Frame. Die Uhr läuft weiter und nimmt Kommandos an.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedLedWriter;

impl SmartLedWriter for DetachedLedWriter {
    fn write_frame(&mut self, _frame: &PixelFrame, _brightness: u8) -> Result<(), LedError> {
        Ok(())
    }
}

/// Monotoner Millisekunden-Zähler seit Boot
///
/// - **Production:** `embassy_time::Instant`
/// - **Testing:** MockTicks (manuell vorgestellt)
pub trait TickSource {
    fn now_ms(&self) -> u64;
}
