// Web-Oberfläche: Steuerseite + WebSocket-Protokoll

pub mod protocol;

/// Steuerseite für GET / (wird ins Binary eingebettet)
pub const INDEX_HTML: &str = include_str!("index.html");
