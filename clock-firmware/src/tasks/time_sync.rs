// NTP Time Sync Task - Holt die Uhrzeit per SNTP und schickt sie an den Render Task
use defmt::{Debug2Format, info, warn};
use embassy_net::udp::{PacketMetadata, UdpSocket};
use embassy_net::{Stack, dns::DnsQueryType};
use embassy_time::{Duration, Timer, with_timeout};

use crate::config::{
    NTP_FAILURE_RETRY_SECS, NTP_MAX_ATTEMPTS, NTP_PORT, NTP_RESYNC_INTERVAL_SECS,
    NTP_RETRY_DELAY_SECS, NTP_SERVER, NTP_TIMEOUT_SECS, NTP_UDP_BUFFER_SIZE,
};
use crate::tasks::wifi::wait_for_network;
use crate::{ClockCommand, ClockCommandSender};

/// Sekunden zwischen 1900-01-01 (NTP-Epoche) und 1970-01-01 (Unix-Epoche)
const NTP_UNIX_OFFSET_SECS: i64 = 2_208_988_800;

/// Größe eines NTP-Pakets (ohne Extensions)
const NTP_PACKET_SIZE: usize = 48;

/// Fehler bei einer Synchronisation
///
/// Die Uhr läuft bei jedem Fehler auf dem letzten Anker weiter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum SyncError {
    DnsFailed,
    NoAddress,
    SocketBind,
    SendFailed,
    Timeout,
    ReceiveFailed,
    ShortResponse,
    InvalidTimestamp,
}

/// Baut einen SNTP-Request (Version 3, Client-Modus)
fn ntp_request() -> [u8; NTP_PACKET_SIZE] {
    let mut request = [0u8; NTP_PACKET_SIZE];
    request[0] = 0x1B; // LI=0, VN=3, Mode=3 (client)
    request
}

/// Liest den Transmit-Timestamp (Bytes 40-43) als Unix-Sekunden
fn parse_ntp_response(response: &[u8]) -> Result<i64, SyncError> {
    let Some(seconds) = response.get(40..44) else {
        return Err(SyncError::ShortResponse);
    };
    let ntp_seconds = u32::from_be_bytes([seconds[0], seconds[1], seconds[2], seconds[3]]);
    if ntp_seconds == 0 {
        return Err(SyncError::InvalidTimestamp);
    }
    Ok(ntp_seconds as i64 - NTP_UNIX_OFFSET_SECS)
}

/// Ein einzelner NTP-Versuch: DNS → UDP Request → Antwort mit Timeout
async fn fetch_ntp_time(stack: Stack<'static>) -> Result<i64, SyncError> {
    let addresses = stack
        .dns_query(NTP_SERVER, DnsQueryType::A)
        .await
        .map_err(|e| {
            warn!("NTP: DNS lookup failed: {}", Debug2Format(&e));
            SyncError::DnsFailed
        })?;
    let server = *addresses.first().ok_or(SyncError::NoAddress)?;

    let mut rx_meta = [PacketMetadata::EMPTY; 1];
    let mut rx_buffer = [0u8; NTP_UDP_BUFFER_SIZE];
    let mut tx_meta = [PacketMetadata::EMPTY; 1];
    let mut tx_buffer = [0u8; NTP_UDP_BUFFER_SIZE];
    let mut socket = UdpSocket::new(
        stack,
        &mut rx_meta,
        &mut rx_buffer,
        &mut tx_meta,
        &mut tx_buffer,
    );
    socket.bind(0).map_err(|_| SyncError::SocketBind)?;

    socket
        .send_to(&ntp_request(), (server, NTP_PORT))
        .await
        .map_err(|_| SyncError::SendFailed)?;

    let mut response = [0u8; NTP_PACKET_SIZE];
    let (len, _from) = with_timeout(
        Duration::from_secs(NTP_TIMEOUT_SECS),
        socket.recv_from(&mut response),
    )
    .await
    .map_err(|_| SyncError::Timeout)?
    .map_err(|_| SyncError::ReceiveFailed)?;

    if len < NTP_PACKET_SIZE {
        return Err(SyncError::ShortResponse);
    }
    parse_ntp_response(&response[..len])
}

/// Bounded Retry: höchstens NTP_MAX_ATTEMPTS Versuche, NTP_RETRY_DELAY_SECS dazwischen
async fn sync_with_retry(stack: Stack<'static>) -> Result<i64, SyncError> {
    let mut attempt = 1;
    loop {
        match fetch_ntp_time(stack).await {
            Ok(unix_seconds) => return Ok(unix_seconds),
            Err(e) if attempt < NTP_MAX_ATTEMPTS => {
                warn!(
                    "NTP: Attempt {}/{} failed: {}",
                    attempt, NTP_MAX_ATTEMPTS, e
                );
                attempt += 1;
                Timer::after(Duration::from_secs(NTP_RETRY_DELAY_SECS)).await;
            }
            Err(e) => return Err(e),
        }
    }
}

/// NTP Time Sync Task
///
/// - Wartet auf eine IP-Adresse
/// - Synchronisiert stündlich, nach einem Fehler schon nach 5 Minuten
/// - Schickt die Zeit als `ClockCommand::ExternalSync` an den Render Task
///
/// Läuft komplett getrennt vom Render Task und kann ihn nie blockieren.
#[embassy_executor::task]
pub async fn time_sync_task(stack: &'static Stack<'static>, command_sender: ClockCommandSender) {
    info!("NTP: Waiting for network...");
    wait_for_network(stack).await;

    loop {
        let next_sync_secs = match sync_with_retry(*stack).await {
            Ok(unix_seconds) => {
                info!("NTP: Time synchronized (unix {})", unix_seconds);
                command_sender
                    .send(ClockCommand::ExternalSync { unix_seconds })
                    .await;
                NTP_RESYNC_INTERVAL_SECS
            }
            Err(e) => {
                warn!(
                    "NTP: Sync failed after {} attempts: {}, retrying in {}s",
                    NTP_MAX_ATTEMPTS, e, NTP_FAILURE_RETRY_SECS
                );
                NTP_FAILURE_RETRY_SECS
            }
        };

        Timer::after(Duration::from_secs(next_sync_secs)).await;
    }
}
