// Clock Render Task - Einziger Besitzer von Uhr, Wecker und Einstellungen
use defmt::{error, info, warn};
use embassy_time::{Duration, Ticker};
use esp_hal_smartled::smart_led_buffer;

use clock_core::{
    AlarmEvent, ClockEngine, ClockSettings, DetachedLedWriter, PIXEL_COUNT, RenderLoop, TickSource,
};

use crate::config::{DEFAULT_UTC_OFFSET_MINUTES, RENDER_INTERVAL_MS, RMT_CLOCK_MHZ};
use crate::hal::{EmbassyTicks, RmtLedWriter};
use crate::{
    ClockCommand, ClockCommandReceiver, ClockSnapshot, ClockStatusPublisher, SmartLedWriter,
};

/// Einstellungen beim Boot (kein Flash-Storage)
fn initial_settings() -> ClockSettings {
    let mut settings = ClockSettings::new();
    settings.network.utc_offset_minutes = DEFAULT_UTC_OFFSET_MINUTES;
    settings
}

fn log_alarm_event(event: AlarmEvent) {
    match event {
        AlarmEvent::Started => info!("Alarm: Started"),
        AlarmEvent::Finished => info!("Alarm: Finished after configured duration"),
        AlarmEvent::Stopped => info!("Alarm: Stopped"),
    }
}

/// Clock Render Logic - Testbare Logik ohne Hardware-Abhängigkeit
///
/// Pro Tick (250ms):
/// - Alle wartenden Kommandos ausführen (HTTP, NTP)
/// - Zeit einmal lesen, Frame rendern und auf den Strip schreiben
/// - Snapshot publishen, wenn er sich geändert hat (mindestens jede Sekunde)
///
/// # Parameter
/// - `led`: LED Writer (Hardware oder Mock)
/// - `status_publisher`: PubSub Publisher für Status-Snapshots
/// - `command_receiver`: Channel Receiver für Uhr-Kommandos
pub async fn clock_render_logic<L: SmartLedWriter>(
    led: L,
    status_publisher: ClockStatusPublisher,
    command_receiver: ClockCommandReceiver,
) {
    let ticks = EmbassyTicks;
    let engine = ClockEngine::new(initial_settings(), ticks.now_ms());
    let mut render_loop = RenderLoop::new(engine, led, ticks);

    let mut ticker = Ticker::every(Duration::from_millis(RENDER_INTERVAL_MS));
    let mut last_published: Option<ClockSnapshot> = None;
    let mut write_failed = false;

    info!("Clock: Render loop started ({} ms)", RENDER_INTERVAL_MS);

    loop {
        // Kommandos abarbeiten (non-blocking) - Stop wirkt spätestens im nächsten Tick
        while let Ok(command) = command_receiver.try_receive() {
            info!("Clock: Command received: {}", command);
            let was_synced = render_loop.engine().clock().is_synced();
            if let Some(event) = render_loop.apply(command) {
                log_alarm_event(event);
            }
            if let ClockCommand::ExternalSync { .. } = command {
                if !render_loop.engine().settings().network.time_sync_enabled {
                    warn!("Clock: Time sync disabled, ignoring network time");
                } else if !was_synced {
                    info!("Clock: First network time received");
                }
            }
        }

        let report = render_loop.step();

        match report.write {
            Err(e) if !write_failed => {
                error!("Clock: Failed to write LED frame: {}", e);
                write_failed = true;
            }
            Ok(()) if write_failed => {
                info!("Clock: LED writes recovered");
                write_failed = false;
            }
            _ => {}
        }

        if let Some(event) = report.output.alarm_event {
            log_alarm_event(event);
        }

        // Zeit ändert sich jede Sekunde → ca. 1 Snapshot pro Sekunde
        let snapshot = render_loop.snapshot();
        if last_published != Some(snapshot) {
            status_publisher.publish_immediate(snapshot);
            last_published = Some(snapshot);
        }

        ticker.next().await;
    }
}

/// Clock Render Task - Embassy Task für parallele Ausführung
///
/// Übernimmt die Hardware-Initialisierung und ruft dann
/// die testbare `clock_render_logic()` Funktion auf. Schlägt die
/// Initialisierung fehl, läuft die Uhr ohne Strip weiter, damit Status
/// und Command Queue bedient bleiben.
///
/// # Parameter
/// - `gpio8`: GPIO8 Peripheral für die Datenleitung des Strips
/// - `rmt_peripheral`: RMT Peripheral für präzises Timing
/// - `status_publisher`: PubSub Publisher für Status-Snapshots
/// - `command_receiver`: Channel Receiver für Uhr-Kommandos
#[embassy_executor::task]
pub async fn clock_render_task(
    gpio8: esp_hal::peripherals::GPIO8<'static>,
    rmt_peripheral: esp_hal::peripherals::RMT<'static>,
    status_publisher: ClockStatusPublisher,
    command_receiver: ClockCommandReceiver,
) {
    // Buffer für SmartLED Daten (30 LEDs)
    let mut rmt_buffer = smart_led_buffer!(PIXEL_COUNT);

    match RmtLedWriter::new(gpio8, rmt_peripheral, RMT_CLOCK_MHZ, &mut rmt_buffer) {
        Ok(led) => clock_render_logic(led, status_publisher, command_receiver).await,
        Err(e) => {
            error!("Clock: Failed to initialize LED strip: {}", e);
            warn!("Clock: Running without LED output");
            clock_render_logic(DetachedLedWriter, status_publisher, command_receiver).await
        }
    }
}
