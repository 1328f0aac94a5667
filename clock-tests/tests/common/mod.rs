//! Gemeinsame Mocks für die Integration Tests

#![allow(dead_code)]

use core::cell::Cell;

use clock_core::{LedError, PixelFrame, SmartLedWriter, TickSource};

// ============================================================================
// Mock LED Writer
// ============================================================================

#[derive(Default)]
pub struct MockLedWriter {
    pub last_frame: Option<PixelFrame>,
    pub last_brightness: Option<u8>,
    pub write_count: usize,
    pub fail_next_write: bool,
}

impl MockLedWriter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SmartLedWriter for MockLedWriter {
    fn write_frame(&mut self, frame: &PixelFrame, brightness: u8) -> Result<(), LedError> {
        if self.fail_next_write {
            self.fail_next_write = false;
            return Err(LedError::WriteFailed);
        }

        self.last_frame = Some(*frame);
        self.last_brightness = Some(brightness);
        self.write_count += 1;
        Ok(())
    }
}

// ============================================================================
// Mock Ticks
// ============================================================================

/// Manuell vorgestellter Millisekunden-Zähler
#[derive(Default)]
pub struct MockTicks {
    now_ms: Cell<u64>,
}

impl MockTicks {
    pub fn at(now_ms: u64) -> Self {
        Self {
            now_ms: Cell::new(now_ms),
        }
    }

    pub fn advance(&self, ms: u64) {
        self.now_ms.set(self.now_ms.get() + ms);
    }

    pub fn set(&self, now_ms: u64) {
        self.now_ms.set(now_ms);
    }
}

impl TickSource for MockTicks {
    fn now_ms(&self) -> u64 {
        self.now_ms.get()
    }
}

/// 1970-01-05 (Montag) 00:00:00 UTC
pub const MONDAY_MIDNIGHT_UNIX: i64 = 4 * 86_400;

/// Unix-Sekunden für Montag hh:mm (UTC, Woche ab 1970-01-05)
pub fn monday_at(hour: i64, minute: i64) -> i64 {
    MONDAY_MIDNIGHT_UNIX + hour * 3600 + minute * 60
}
