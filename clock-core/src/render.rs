//! Mode Renderer: Modus + Uhrzeit + Einstellungen → PixelFrame
//!
//! Pure Funktion ohne Seiteneffekte. Die Helligkeit ist NICHT Teil des
//! Frames, sie wird separat pro Tick bestimmt (siehe [`effective_brightness`]).

use crate::frame::{DARK, PixelFrame, WHITE};
use crate::quiet_hours::{self, QuietHoursConfig};
use crate::segments::{DOT_LEFT_INDEX, DOT_RIGHT_INDEX, HOUR_TENS_POSITION, write_digit};
use crate::settings::{DisplaySettings, DotsSettings};
use crate::types::{OperatingMode, TimeOfDay};

/// Halbe Blink-Periode (an/aus je 500ms)
pub const BLINK_HALF_PERIOD_MS: u64 = 500;

/// Helligkeit während der Wecker klingelt
pub const ALARM_BRIGHTNESS: u8 = 255;

/// Sichtbare Blink-Phase?
pub const fn blink_visible(now_ms: u64) -> bool {
    (now_ms / BLINK_HALF_PERIOD_MS) % 2 == 0
}

/// Rendert den Frame für den aktuellen Tick
///
/// `mode` ist der effektive Modus (ausgeschaltet → [`OperatingMode::Off`]).
/// Ein klingelnder Wecker überschreibt jeden Modus.
pub fn render_frame(
    mode: OperatingMode,
    now: TimeOfDay,
    display: &DisplaySettings,
    dots: &DotsSettings,
    alarm_firing: bool,
    now_ms: u64,
) -> PixelFrame {
    if alarm_firing {
        return render_alarm(now, now_ms);
    }

    let mut frame = match mode {
        OperatingMode::Off => return PixelFrame::dark(),
        OperatingMode::Clock | OperatingMode::Timer | OperatingMode::Alarm => {
            render_clock_digits(now, display)
        }
        OperatingMode::Weather => PixelFrame::filled(display.general_color),
        OperatingMode::Custom if display.has_digit_coloring() => {
            render_clock_digits(now, display)
        }
        OperatingMode::Custom => PixelFrame::filled(display.general_color),
    };

    render_dots(&mut frame, mode, dots, now_ms);
    frame
}

/// Vier Ziffern HH:MM, Stunden-Zehner ohne Führungsnull
fn render_clock_digits(now: TimeOfDay, display: &DisplaySettings) -> PixelFrame {
    let mut frame = PixelFrame::dark();
    for (position, digit) in now.display_digits().into_iter().enumerate() {
        write_digit(
            &mut frame,
            position,
            digit,
            display.digit_color(position),
            position == HOUR_TENS_POSITION,
        );
    }
    frame
}

fn render_dots(frame: &mut PixelFrame, mode: OperatingMode, dots: &DotsSettings, now_ms: u64) {
    let (left, right) = if !dots.enabled || (mode.blinks_dots() && !blink_visible(now_ms)) {
        (DARK, DARK)
    } else {
        dots.resolved_colors()
    };
    frame.set(DOT_LEFT_INDEX, left);
    frame.set(DOT_RIGHT_INDEX, right);
}

/// Wecker: weiße Uhr + weiße Punkte, blinkend
fn render_alarm(now: TimeOfDay, now_ms: u64) -> PixelFrame {
    if !blink_visible(now_ms) {
        return PixelFrame::dark();
    }

    let mut frame = PixelFrame::dark();
    for (position, digit) in now.display_digits().into_iter().enumerate() {
        write_digit(&mut frame, position, digit, WHITE, position == HOUR_TENS_POSITION);
    }
    frame.set(DOT_LEFT_INDEX, WHITE);
    frame.set(DOT_RIGHT_INDEX, WHITE);
    frame
}

/// Helligkeit für den aktuellen Tick
///
/// Wecker → Maximum, Ruhezeit → gedimmt, sonst die globale Helligkeit.
pub fn effective_brightness(
    now: TimeOfDay,
    brightness: u8,
    quiet: &QuietHoursConfig,
    alarm_firing: bool,
) -> u8 {
    if alarm_firing {
        ALARM_BRIGHTNESS
    } else if quiet_hours::is_active(now, quiet) {
        quiet.dim_brightness
    } else {
        brightness
    }
}
