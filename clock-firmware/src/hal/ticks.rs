// Zeitbasis: monotoner Millisekunden-Zähler seit Boot

use clock_core::TickSource;
use embassy_time::Instant;

/// TickSource auf Basis von `embassy_time::Instant`
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbassyTicks;

impl TickSource for EmbassyTicks {
    fn now_ms(&self) -> u64 {
        Instant::now().as_millis()
    }
}
