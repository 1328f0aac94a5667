// Library-Root: Wiederverwendbare Logik und Module
// Keine Standard-Bibliothek (Embedded System)
#![no_std]

// Module
pub mod config;
pub mod hal;
pub mod tasks;
pub mod web;

// Re-exports von clock-core
pub use clock_core::{ClockCommand, ClockSnapshot, LedError, SmartLedWriter};

// Embassy Channel-Typen
use embassy_sync::blocking_mutex::raw::NoopRawMutex;
use embassy_sync::channel::{Channel, Receiver, Sender};
use embassy_sync::pubsub::{PubSubChannel, Publisher, Subscriber};

use crate::config::COMMAND_QUEUE_SIZE;

// ============================================================================
// Type-Aliase für Channel-Typen
// ============================================================================
//
// Der Render Task ist der einzige Besitzer des Uhr-Zustands:
// - Kommandos kommen über den ClockCommandChannel (HTTP, NTP → Render Task)
// - Snapshots gehen über den ClockStatusChannel raus (Render Task → WebSockets)

/// PubSubChannel für Status-Snapshots
/// - 2: Nachrichten-Kapazität im Queue
/// - 8: Maximale Anzahl Subscribers (WebSocket-Verbindungen)
/// - 1: Publisher (Render Task)
pub type ClockStatusChannel = PubSubChannel<NoopRawMutex, ClockSnapshot, 2, 8, 1>;

/// Publisher für Status-Snapshots (Render Task)
pub type ClockStatusPublisher = Publisher<'static, NoopRawMutex, ClockSnapshot, 2, 8, 1>;

/// Subscriber für Status-Snapshots (je WebSocket-Verbindung einer)
pub type ClockStatusSubscriber = Subscriber<'static, NoopRawMutex, ClockSnapshot, 2, 8, 1>;

/// Channel für Uhr-Kommandos
pub type ClockCommandChannel = Channel<NoopRawMutex, ClockCommand, COMMAND_QUEUE_SIZE>;

/// Sender für Uhr-Kommandos (HTTP Tasks, NTP Task)
pub type ClockCommandSender = Sender<'static, NoopRawMutex, ClockCommand, COMMAND_QUEUE_SIZE>;

/// Receiver für Uhr-Kommandos (Render Task)
pub type ClockCommandReceiver = Receiver<'static, NoopRawMutex, ClockCommand, COMMAND_QUEUE_SIZE>;
