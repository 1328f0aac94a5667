// SmartLED Writer für den 30-LED Strip der Uhr
//
// Nutzt das ESP32 RMT Peripheral um WS2812 LEDs anzusteuern.
// Die globale Helligkeit wird erst hier auf die Frame-Farben angewendet.

use clock_core::{LedError, PIXEL_COUNT, PixelFrame, SmartLedWriter, scale_brightness};
use esp_hal::Blocking;
use esp_hal::rmt::Rmt;
use esp_hal::time::Rate;
use esp_hal_smartled::SmartLedsAdapter;
use smart_leds_trait::SmartLedsWrite;

/// Buffer-Größe für den Strip (24 Bits pro LED + 1 Reset)
pub const LED_BUFFER_SIZE: usize = PIXEL_COUNT * 24 + 1;

/// Real Hardware LED Writer
///
/// Hinweis: Der Buffer muss 'static sein, daher wird er im Task erstellt
/// und als Parameter übergeben statt im Constructor allokiert.
pub struct RmtLedWriter<'a> {
    led: SmartLedsAdapter<'a, LED_BUFFER_SIZE>,
}

impl<'a> RmtLedWriter<'a> {
    /// Erstellt einen neuen RmtLedWriter
    ///
    /// # Parameter
    /// - `gpio8`: GPIO8 Peripheral für die Datenleitung
    /// - `rmt_peripheral`: RMT Peripheral
    /// - `rmt_clock_mhz`: RMT Clock Frequenz in MHz (z.B. 80)
    /// - `buffer`: Buffer für LED-Daten (erstellt mit smart_led_buffer!(PIXEL_COUNT))
    pub fn new(
        gpio8: esp_hal::peripherals::GPIO8<'a>,
        rmt_peripheral: esp_hal::peripherals::RMT<'a>,
        rmt_clock_mhz: u32,
        buffer: &'a mut [esp_hal::rmt::PulseCode; LED_BUFFER_SIZE],
    ) -> Result<Self, LedError> {
        let rmt: Rmt<'a, Blocking> = Rmt::new(rmt_peripheral, Rate::from_mhz(rmt_clock_mhz))
            .map_err(|_| LedError::InitFailed)?;

        let led = SmartLedsAdapter::new(rmt.channel0, gpio8, buffer);

        Ok(Self { led })
    }
}

impl SmartLedWriter for RmtLedWriter<'_> {
    fn write_frame(&mut self, frame: &PixelFrame, brightness: u8) -> Result<(), LedError> {
        self.led
            .write(frame.iter().map(|color| scale_brightness(color, brightness)))
            .map_err(|_| LedError::WriteFailed)
    }
}
