// Task-Modul: Enthält alle Embassy Tasks
//
// Jeder Task läuft asynchron und unabhängig.
// Tasks kommunizieren über Embassy Channels (HTTP/NTP → Render Task → WebSockets).

pub mod clock_render;
pub mod http;
pub mod time_sync;
pub mod wifi;

// Re-export Tasks für einfachen Import
pub use clock_render::clock_render_task;
pub use http::http_server_task;
pub use time_sync::time_sync_task;
pub use wifi::{connection_task, dhcp_task, net_task};
