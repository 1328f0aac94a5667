// Projekt-Konfiguration: Konstanten und Hardware-Zuordnungen
#![allow(dead_code)]

// ============================================================================
// LED Konfiguration
// ============================================================================

/// GPIO-Pin für die Datenleitung des LED-Strips (WS2812/Neopixel)
pub const LED_GPIO_PIN: u8 = 8;

/// RMT Taktfrequenz in MHz
/// 80 MHz ist optimal für WS2812 LED-Timing
pub const RMT_CLOCK_MHZ: u32 = 80;

/// Anzahl der LEDs im Strip (4 Ziffern à 7 Segmente + 2 Punkte)
pub const LED_COUNT: usize = clock_core::PIXEL_COUNT;

// ============================================================================
// Uhr Konfiguration
// ============================================================================

/// Render-Intervall in Millisekunden
/// 250ms reicht für die 500ms Blink-Phase und eine flüssige Sekunden-Anzeige
pub const RENDER_INTERVAL_MS: u64 = clock_core::RENDER_INTERVAL_MS;

/// UTC-Offset beim Start (Minuten), bis ein Update per WebSocket kommt
pub const DEFAULT_UTC_OFFSET_MINUTES: i16 = 60;

/// Kapazität der Kommando-Queue (HTTP/NTP → Render Task)
pub const COMMAND_QUEUE_SIZE: usize = 4;

// ============================================================================
// WiFi Konfiguration
// ============================================================================

/// WiFi SSID (Netzwerk-Name)
/// Wird zur Build-Zeit aus der Environment Variable WIFI_SSID geladen
/// Setze diese in .env file (siehe .env.example)
pub const WIFI_SSID: &str = env!(
    "WIFI_SSID",
    "WiFi SSID nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// WiFi Passwort
/// Wird zur Build-Zeit aus der Environment Variable WIFI_PASSWORD geladen
pub const WIFI_PASSWORD: &str = env!(
    "WIFI_PASSWORD",
    "WiFi Password nicht gesetzt! Erstelle .env file (siehe .env.example)"
);

/// Wartezeit nach einem WiFi-Fehler in Sekunden
pub const WIFI_RETRY_DELAY_SECS: u64 = 5;

/// Heap-Größe für WiFi (Bytes)
/// WiFi benötigt dynamischen Speicher für Pakete
pub const WIFI_HEAP_SIZE: usize = 65536; // 64 KB

/// Zusätzliche Heap-Größe (Bytes)
pub const EXTRA_HEAP_SIZE: usize = 36864; // 36 KB

// ============================================================================
// NTP Konfiguration
// ============================================================================

/// NTP Server (wird per DNS aufgelöst)
pub const NTP_SERVER: &str = "pool.ntp.org";

/// NTP Port (RFC 5905)
pub const NTP_PORT: u16 = 123;

/// Versuche pro Synchronisation
pub const NTP_MAX_ATTEMPTS: u8 = 3;

/// Pause zwischen zwei Versuchen in Sekunden
pub const NTP_RETRY_DELAY_SECS: u64 = 2;

/// Timeout pro Versuch in Sekunden
pub const NTP_TIMEOUT_SECS: u64 = 5;

/// Abstand zwischen erfolgreichen Synchronisationen (1 Stunde)
pub const NTP_RESYNC_INTERVAL_SECS: u64 = 3600;

/// Abstand nach einer fehlgeschlagenen Synchronisation (5 Minuten)
pub const NTP_FAILURE_RETRY_SECS: u64 = 300;

/// UDP Buffer-Größe für NTP-Pakete (48 Bytes + Reserve)
pub const NTP_UDP_BUFFER_SIZE: usize = 128;

// ============================================================================
// HTTP Server Konfiguration
// ============================================================================

/// Port der Web-Oberfläche
pub const HTTP_PORT: u16 = 80;

/// Timeout bis zum ersten Request einer (Keep-Alive) Verbindung
pub const HTTP_IDLE_TIMEOUT_SECS: u64 = 5;

/// Timeout für Lesen/Schreiben innerhalb eines Requests
pub const HTTP_IO_TIMEOUT_SECS: u64 = 1;

/// HTTP Buffer-Größe in Bytes
/// Für HTTP Request/Response Headers und Body
pub const HTTP_BUFFER_SIZE: usize = 1024;

/// TCP RX Buffer-Größe in Bytes
pub const TCP_RX_BUFFER_SIZE: usize = 1024;

/// TCP TX Buffer-Größe in Bytes
pub const TCP_TX_BUFFER_SIZE: usize = 2048;

/// WebSocket Message Buffer-Größe in Bytes
/// Ein komplettes Einstellungs-Dokument als Update passt hinein
pub const WEBSOCKET_BUFFER_SIZE: usize = 1536;

/// JSON Serialisierungs-Buffer für WebSocket Status-Updates
/// Status + komplettes Einstellungs-Dokument
pub const JSON_STATUS_BUFFER_SIZE: usize = 2048;

/// JSON Serialisierungs-Buffer für WebSocket Error-Messages
/// Für {"type":"error","message":"..."}
pub const JSON_ERROR_BUFFER_SIZE: usize = 128;

/// Anzahl der HTTP Server Tasks (concurrent connections)
pub const HTTP_TASK_COUNT: usize = 4;
