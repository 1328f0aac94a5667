//! Render Loop Driver
//!
//! Verbindet Engine, Zeitbasis und LED-Strip. Der Firmware-Task ruft
//! [`RenderLoop::step`] alle 250ms auf; Tests treiben ihn mit Mock-Ticks.

use crate::alarm::AlarmEvent;
use crate::engine::{ClockEngine, ClockSnapshot, RenderOutput};
use crate::traits::{LedError, SmartLedWriter, TickSource};
use crate::types::ClockCommand;

/// Render-Periode in Millisekunden
pub const RENDER_INTERVAL_MS: u64 = 250;

/// Ergebnis eines Schritts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickReport {
    pub output: RenderOutput,
    /// Ergebnis des Hardware-Schreibens; ein Fehler stoppt die Uhr nicht
    pub write: Result<(), LedError>,
}

pub struct RenderLoop<L: SmartLedWriter, T: TickSource> {
    engine: ClockEngine,
    writer: L,
    ticks: T,
}

impl<L: SmartLedWriter, T: TickSource> RenderLoop<L, T> {
    pub fn new(engine: ClockEngine, writer: L, ticks: T) -> Self {
        Self {
            engine,
            writer,
            ticks,
        }
    }

    /// Kommando zum aktuellen Tick ausführen
    pub fn apply(&mut self, command: ClockCommand) -> Option<AlarmEvent> {
        let now_ms = self.ticks.now_ms();
        self.engine.apply(command, now_ms)
    }

    /// Ein Tick: Zeit einmal lesen, rendern, Frame schreiben
    pub fn step(&mut self) -> TickReport {
        let now_ms = self.ticks.now_ms();
        let output = self.engine.tick(now_ms);
        let write = self.writer.write_frame(&output.frame, output.brightness);
        TickReport { output, write }
    }

    pub fn snapshot(&self) -> ClockSnapshot {
        self.engine.snapshot(self.ticks.now_ms())
    }

    pub fn engine(&self) -> &ClockEngine {
        &self.engine
    }

    pub fn writer(&self) -> &L {
        &self.writer
    }

    pub fn writer_mut(&mut self) -> &mut L {
        &mut self.writer
    }

    pub fn ticks(&self) -> &T {
        &self.ticks
    }
}
