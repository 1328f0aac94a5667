// Hardware Abstraction Layer (HAL) Module
//
// Implementiert die Traits aus clock-core für die ESP32-C6 Hardware.

pub mod led_writer;
pub mod ticks;

pub use led_writer::RmtLedWriter;
pub use ticks::EmbassyTicks;
