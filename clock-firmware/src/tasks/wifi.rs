// WiFi Tasks - Station-Verbindung, Netzwerk-Stack und IP-Überwachung
use defmt::{Debug2Format, error, info, warn};
use embassy_net::{Runner, Stack};
use embassy_time::{Duration, Timer};
use esp_radio::wifi::{ClientConfig, ModeConfig, WifiController, WifiDevice, WifiEvent};

use crate::config::{WIFI_PASSWORD, WIFI_RETRY_DELAY_SECS, WIFI_SSID};

/// Polling-Intervall beim Warten auf Link/IP
const NETWORK_POLL_MS: u64 = 500;

/// Konfiguriert und startet den Controller im Station-Modus
async fn start_station(controller: &mut WifiController<'static>) -> Result<(), ()> {
    let client_config = ModeConfig::Client(
        ClientConfig::default()
            .with_ssid(WIFI_SSID.into())
            .with_password(WIFI_PASSWORD.into()),
    );

    controller.set_config(&client_config).map_err(|e| {
        error!("WiFi: Failed to set configuration: {}", Debug2Format(&e));
    })?;
    controller.start_async().await.map_err(|e| {
        error!("WiFi: Failed to start: {}", Debug2Format(&e));
    })?;

    info!("WiFi: Station started");
    Ok(())
}

/// WiFi Connection Task
///
/// Hält die Verbindung zum Access Point und verbindet nach einem
/// Disconnect neu. Die Uhr läuft währenddessen offline weiter.
#[embassy_executor::task]
pub async fn connection_task(mut controller: WifiController<'static>) {
    info!("WiFi: Starting connection task");

    loop {
        if matches!(controller.is_started(), Ok(false))
            && start_station(&mut controller).await.is_err()
        {
            Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
            continue;
        }

        info!("WiFi: Connecting to '{}'...", WIFI_SSID);
        if let Err(e) = controller.connect_async().await {
            error!("WiFi: Connection failed: {}", Debug2Format(&e));
            Timer::after(Duration::from_secs(WIFI_RETRY_DELAY_SECS)).await;
            continue;
        }
        info!("WiFi: Connected");

        controller.wait_for_event(WifiEvent::StaDisconnected).await;
        warn!("WiFi: Disconnected from AP, will retry...");

        Timer::after(Duration::from_secs(2)).await;
    }
}

/// Network Task - prozessiert die Pakete des embassy-net Stacks
#[embassy_executor::task]
pub async fn net_task(mut runner: Runner<'static, WifiDevice<'static>>) -> ! {
    runner.run().await
}

/// Wartet bis der Link steht und DHCP eine IPv4-Adresse geliefert hat
pub async fn wait_for_network(stack: &Stack<'static>) {
    while !stack.is_link_up() {
        Timer::after(Duration::from_millis(NETWORK_POLL_MS)).await;
    }
    while stack.config_v4().is_none() {
        Timer::after(Duration::from_millis(NETWORK_POLL_MS)).await;
    }
}

/// DHCP Monitor Task
///
/// Loggt die Netzwerk-Konfiguration, sobald eine IP-Adresse vorliegt.
/// Die Adresse ist die URL der Web-Oberfläche.
#[embassy_executor::task]
pub async fn dhcp_task(stack: &'static Stack<'static>) {
    wait_for_network(stack).await;

    if let Some(config) = stack.config_v4() {
        info!("WiFi: Got IP address!");
        info!("  Web UI:  http://{}/", Debug2Format(&config.address.address()));
        info!("  Gateway: {}", Debug2Format(&config.gateway));
        info!("  DNS:     {}", Debug2Format(&config.dns_servers));
    }
}
