//! Clock Core - Platform-agnostic Logic and Traits
//!
//! Diese Crate enthält KEINE Hardware-Dependencies.
//! Uhr, Segment-Encoder, Ruhezeiten, Wecker und Renderer sind reine
//! Funktionen bzw. Zustandsmaschinen über einem monotonen Millisekunden-Zähler.

#![no_std]

pub mod alarm;
pub mod clock;
pub mod color;
pub mod document;
pub mod driver;
pub mod engine;
pub mod frame;
pub mod quiet_hours;
pub mod render;
pub mod segments;
pub mod settings;
pub mod traits;
pub mod types;

// Re-exports für einfachen Zugriff
pub use alarm::{AlarmEvent, AlarmScheduler, AlarmSettings, AlarmState, AlarmStatus};
pub use clock::{Clock, ClockAnchor};
pub use color::{format_hex_color, parse_hex_color, scale_brightness};
pub use document::ClockDocument;
pub use driver::{RENDER_INTERVAL_MS, RenderLoop, TickReport};
pub use engine::{ClockEngine, ClockSnapshot, RenderOutput};
pub use frame::{PIXEL_COUNT, PixelFrame};
pub use quiet_hours::QuietHoursConfig;
pub use render::{blink_visible, effective_brightness, render_frame};
pub use settings::{
    ClockSettings, DisplaySettings, DotsSettings, NetworkSettings, PowerSettings,
    SingleDigitOverride,
};
pub use traits::{DetachedLedWriter, LedError, SmartLedWriter, TickSource};
pub use types::{ClockCommand, DaysMask, LocalTime, OperatingMode, TimeOfDay, Weekday};
