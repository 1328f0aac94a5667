// HTTP Server Task - Serviert HTML und WebSocket
use core::future::pending;
use defmt::{info, warn};
use embassy_futures::select::{Either, select};
use embassy_net::Stack;
use embassy_time::Duration;
use picoserve::{io::embedded_io_async, response::IntoResponse, response::ws, routing::get};

use crate::config::{
    HTTP_BUFFER_SIZE, HTTP_IDLE_TIMEOUT_SECS, HTTP_IO_TIMEOUT_SECS, HTTP_PORT,
    JSON_ERROR_BUFFER_SIZE, JSON_STATUS_BUFFER_SIZE, TCP_RX_BUFFER_SIZE, TCP_TX_BUFFER_SIZE,
    WEBSOCKET_BUFFER_SIZE,
};
use crate::web::{
    INDEX_HTML,
    protocol::{ClientRequest, WsClientMessage, WsServerMessage},
};
use crate::{ClockCommandSender, ClockSnapshot, ClockStatusChannel, ClockStatusSubscriber};

/// Response-Enum für WebSocket-Endpoint
/// Ermöglicht Rückgabe von entweder WebSocket-Upgrade oder HTTP-Fehler
enum WebSocketResponse {
    Upgrade(
        ws::UpgradedWebSocket<ws::UnspecifiedProtocol, ws::CallbackNotUsingState<WebSocketHandler>>,
    ),
    ServiceUnavailable,
}

impl IntoResponse for WebSocketResponse {
    async fn write_to<
        R: embedded_io_async::Read,
        W: picoserve::response::ResponseWriter<Error = R::Error>,
    >(
        self,
        connection: picoserve::response::Connection<'_, R>,
        response_writer: W,
    ) -> Result<picoserve::ResponseSent, W::Error> {
        match self {
            WebSocketResponse::Upgrade(ws) => ws.write_to(connection, response_writer).await,
            WebSocketResponse::ServiceUnavailable => {
                picoserve::response::Response::new(
                    picoserve::response::StatusCode::new(503),
                    "Service Unavailable: Too many WebSocket connections",
                )
                .with_header("Retry-After", "5")
                .write_to(connection, response_writer)
                .await
            }
        }
    }
}

/// HTTP Server Task - läuft parallel zu anderen Tasks
///
/// - Serviert index.html auf GET /
/// - WebSocket-Endpoint auf /ws: Einstellungen ändern, Wecker stoppen, Status lesen
/// - Kommandos gehen an den Render Task, Status kommt als Snapshot zurück
///
/// **Task Pool:** Diese Task wird 4x gespawnt für concurrent connections.
///
/// # Parameter
/// - `task_id`: Eindeutige ID für diese Server-Instanz (0..3)
/// - `stack`: embassy-net Stack für Netzwerk-Zugriff
/// - `status_channel`: PubSub Channel für Snapshots (WebSocketHandler erstellt Subscriber)
/// - `command_sender`: Channel Sender für Uhr-Kommandos
#[embassy_executor::task(pool_size = crate::config::HTTP_TASK_COUNT)]
pub async fn http_server_task(
    task_id: usize,
    stack: &'static Stack<'static>,
    status_channel: &'static ClockStatusChannel,
    command_sender: ClockCommandSender,
) {
    info!("HTTP: Server task {} listening on port {}", task_id, HTTP_PORT);

    let app = picoserve::Router::new().route("/", get(serve_html)).route(
        "/ws",
        get(
            move |upgrade: picoserve::response::WebSocketUpgrade| async move {
                info!("HTTP: WebSocket upgrade requested");

                // Ein Subscriber pro Verbindung; sind alle belegt → HTTP 503 statt Panic
                match status_channel.subscriber() {
                    Ok(status_subscriber) => {
                        let handler = WebSocketHandler {
                            command_sender,
                            status_subscriber,
                            latest: None,
                        };
                        WebSocketResponse::Upgrade(upgrade.on_upgrade(handler))
                    }
                    Err(_) => {
                        warn!("HTTP: No subscriber slots available, sending HTTP 503");
                        WebSocketResponse::ServiceUnavailable
                    }
                }
            },
        ),
    );

    let config = picoserve::Config::new(picoserve::Timeouts {
        start_read_request: Some(Duration::from_secs(HTTP_IDLE_TIMEOUT_SECS)),
        read_request: Some(Duration::from_secs(HTTP_IO_TIMEOUT_SECS)),
        write: Some(Duration::from_secs(HTTP_IO_TIMEOUT_SECS)),
        persistent_start_read_request: Some(Duration::from_secs(HTTP_IDLE_TIMEOUT_SECS)),
    })
    .keep_connection_alive();

    let mut http_buffer = [0u8; HTTP_BUFFER_SIZE];
    let mut rx_buffer = [0u8; TCP_RX_BUFFER_SIZE];
    let mut tx_buffer = [0u8; TCP_TX_BUFFER_SIZE];

    let server = picoserve::Server::new(&app, &config, &mut http_buffer);

    let _ = server
        .listen_and_serve(task_id, *stack, HTTP_PORT, &mut rx_buffer, &mut tx_buffer)
        .await;

    info!("HTTP: Server task {} ended", task_id);
}

/// Serviert die HTML-Hauptseite
async fn serve_html() -> impl IntoResponse {
    picoserve::response::Response::new(picoserve::response::StatusCode::OK, INDEX_HTML)
        .with_header("Content-Type", "text/html; charset=utf-8")
}

/// Zustand einer WebSocket-Verbindung
struct WebSocketHandler {
    command_sender: ClockCommandSender,
    status_subscriber: ClockStatusSubscriber,
    /// Letzter empfangener Snapshot, beantwortet `{"type":"status"}`
    latest: Option<ClockSnapshot>,
}

impl ws::WebSocketCallback for WebSocketHandler {
    async fn run<R: embedded_io_async::Read, W: embedded_io_async::Write<Error = R::Error>>(
        mut self,
        mut rx: ws::SocketRx<R>,
        mut tx: ws::SocketTx<W>,
    ) -> Result<(), W::Error> {
        info!("HTTP: WebSocket client connected");

        let mut buffer = [0u8; WEBSOCKET_BUFFER_SIZE];

        let close_reason = loop {
            let incoming = select(
                rx.next_message(&mut buffer, pending()),
                self.status_subscriber.next_message_pure(),
            )
            .await;

            let message = match incoming {
                Either::Second(snapshot) => {
                    self.latest = Some(snapshot);
                    Self::send_status(&mut tx, &snapshot).await?;
                    continue;
                }
                Either::First(message) => message?.ignore_never_b(),
            };

            match message {
                Ok(ws::Message::Text(text)) => self.handle_text(&mut tx, text).await?,
                Ok(ws::Message::Ping(data)) => tx.send_pong(data).await?,
                Ok(ws::Message::Binary(_) | ws::Message::Pong(_)) => {}
                Ok(ws::Message::Close(_)) => break None,
                Err(error) => {
                    warn!("HTTP: WebSocket protocol error");
                    break Some((error.code(), "WebSocket Error"));
                }
            }
        };

        info!("HTTP: WebSocket client disconnected");
        tx.close(close_reason).await
    }
}

impl WebSocketHandler {
    /// Wertet eine Text-Nachricht aus; Kommandos gehen an den Render Task
    async fn handle_text<W: embedded_io_async::Write>(
        &mut self,
        tx: &mut ws::SocketTx<W>,
        text: &str,
    ) -> Result<(), W::Error> {
        let Ok((message, _)) = serde_json_core::from_str::<WsClientMessage>(text) else {
            warn!("HTTP: JSON parse error ({} bytes)", text.len());
            return Self::send_error(tx, "JSON parse error").await;
        };

        info!("HTTP: Received {} message", message.msg_type);
        match message.into_request() {
            // Die Antwort kommt mit dem nächsten Snapshot
            ClientRequest::Command(command) => {
                self.command_sender.send(command).await;
                Ok(())
            }
            ClientRequest::Status => match self.latest {
                Some(snapshot) => Self::send_status(tx, &snapshot).await,
                None => Self::send_error(tx, "status not available yet").await,
            },
            ClientRequest::Invalid(reason) => {
                warn!("HTTP: Invalid request: {}", reason);
                Self::send_error(tx, reason).await
            }
        }
    }

    /// Sendet einen Status-Snapshot an den WebSocket-Client
    async fn send_status<W: embedded_io_async::Write>(
        tx: &mut ws::SocketTx<W>,
        snapshot: &ClockSnapshot,
    ) -> Result<(), W::Error> {
        let status = WsServerMessage::from(snapshot);
        let mut json_buffer = [0u8; JSON_STATUS_BUFFER_SIZE];
        match serde_json_core::to_slice(&status, &mut json_buffer) {
            Ok(n) => Self::send_json(tx, &json_buffer[..n]).await,
            Err(_) => {
                warn!("HTTP: Status does not fit into {} bytes", JSON_STATUS_BUFFER_SIZE);
                Ok(())
            }
        }
    }

    /// Sendet eine Fehlermeldung an den WebSocket-Client
    async fn send_error<W: embedded_io_async::Write>(
        tx: &mut ws::SocketTx<W>,
        message: &'static str,
    ) -> Result<(), W::Error> {
        let error = WsServerMessage::Error { message };
        let mut json_buffer = [0u8; JSON_ERROR_BUFFER_SIZE];
        match serde_json_core::to_slice(&error, &mut json_buffer) {
            Ok(n) => Self::send_json(tx, &json_buffer[..n]).await,
            Err(_) => Ok(()),
        }
    }

    async fn send_json<W: embedded_io_async::Write>(
        tx: &mut ws::SocketTx<W>,
        json: &[u8],
    ) -> Result<(), W::Error> {
        // serde-json-core schreibt nur UTF-8
        match core::str::from_utf8(json) {
            Ok(text) => tx.send_text(text).await,
            Err(_) => Ok(()),
        }
    }
}
