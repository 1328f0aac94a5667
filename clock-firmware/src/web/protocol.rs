// WebSocket-Protokoll-Definitionen
// Definiert die JSON-Nachrichten für Client ↔ Server Kommunikation

use clock_core::{ClockCommand, ClockDocument, ClockSnapshot, OperatingMode, Weekday};
use serde::{Deserialize, Serialize};

/// Client → Server Nachrichten
/// Kommandos vom Browser an den ESP32
///
/// Hinweis: Flache Struktur mit `type`-Feld für serde-json-core Kompatibilität
/// (keine internally tagged enums beim Deserialisieren)
#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct WsClientMessage {
    #[serde(rename = "type")]
    pub msg_type: MessageType,
    /// Teil-Dokument für `update`; alle Felder optional
    #[serde(default)]
    pub settings: Option<ClockDocument>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, defmt::Format)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Update,
    StopAlarm,
    ExitSpecialMode,
    Status,
}

/// Ergebnis der Auswertung einer Client-Nachricht
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClientRequest {
    /// Kommando an den Render Task
    Command(ClockCommand),
    /// Client möchte sofort einen Status
    Status,
    /// Nachricht war gültig, enthielt aber nichts zu tun
    Invalid(&'static str),
}

impl WsClientMessage {
    pub fn into_request(self) -> ClientRequest {
        match self.msg_type {
            MessageType::Update => match self.settings {
                Some(doc) => ClientRequest::Command(ClockCommand::Patch(doc)),
                None => ClientRequest::Invalid("update without settings"),
            },
            MessageType::StopAlarm => ClientRequest::Command(ClockCommand::StopAlarm),
            MessageType::ExitSpecialMode => {
                ClientRequest::Command(ClockCommand::ExitSpecialMode)
            }
            MessageType::Status => ClientRequest::Status,
        }
    }
}

/// Wecker-Status für den Browser
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AlarmStatusPayload {
    pub active: bool,
    pub remaining_secs: u32,
}

/// Server → Client Nachrichten
/// Status-Updates und Fehler vom ESP32 an den Browser
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum WsServerMessage {
    #[serde(rename = "status")]
    Status {
        /// Effektiver Modus (ausgeschaltet → "off")
        mode: OperatingMode,
        weekday: Option<Weekday>,
        synced: bool,
        /// Effektive Helligkeit inkl. Ruhezeit/Wecker
        brightness: u8,
        quiet_hours_active: bool,
        alarm: AlarmStatusPayload,
        /// Aktuelle Einstellungen, `time` ist die angezeigte Uhrzeit
        settings: ClockDocument,
    },
    #[serde(rename = "error")]
    Error { message: &'static str },
}

impl From<&ClockSnapshot> for WsServerMessage {
    fn from(snapshot: &ClockSnapshot) -> Self {
        WsServerMessage::Status {
            mode: snapshot.mode,
            weekday: snapshot.weekday,
            synced: snapshot.synced,
            brightness: snapshot.brightness,
            quiet_hours_active: snapshot.quiet_hours_active,
            alarm: AlarmStatusPayload {
                active: snapshot.alarm.active,
                remaining_secs: snapshot.alarm.remaining_secs,
            },
            settings: ClockDocument::from_settings(&snapshot.settings),
        }
    }
}
