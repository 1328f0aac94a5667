// Keine Standard-Bibliothek verwenden (Embedded System)
#![no_std]
// Kein normaler main() Einstiegspunkt (wird von esp_rtos bereitgestellt)
#![no_main]
// Verbiete mem::forget - gefährlich bei ESP HAL Types mit DMA-Buffern
#![deny(
    clippy::mem_forget,
    reason = "mem::forget is generally not safe to do with esp_hal types, especially those \
    holding buffers for the duration of a data transfer."
)]
// Verbiete große Stack-Frames (Stack ist auf Embedded Systemen begrenzt)
#![deny(clippy::large_stack_frames)]

// Heap Allocator (WiFi benötigt dynamischen Speicher)
extern crate alloc;

use defmt::{Debug2Format, error, info};
use embassy_executor::Spawner;
use embassy_net::{Config as NetConfig, Stack, StackResources};
use embassy_time::{Duration, Timer};

// ESP32-C6 HAL
use esp_hal::clock::CpuClock;
use esp_hal::rng::Rng;
use esp_hal::timer::timg::TimerGroup;

// Backtrace bei Panic und defmt-Ausgabe über espflash
use {esp_backtrace as _, esp_println as _};

use esp_led_clock::config::{EXTRA_HEAP_SIZE, HTTP_TASK_COUNT, WIFI_HEAP_SIZE};
use esp_led_clock::tasks::{
    clock_render_task, connection_task, dhcp_task, http_server_task, net_task, time_sync_task,
};
use esp_led_clock::{ClockCommandChannel, ClockCommandSender, ClockStatusChannel};

// ESP-IDF App Descriptor - ohne ihn verweigert der Bootloader das Image
esp_bootloader_esp_idf::esp_app_desc!();

/// Sockets: HTTP-Listener (4) + NTP UDP (1) + DNS (1) + DHCP (1) + Reserve
const NET_SOCKETS: usize = HTTP_TASK_COUNT + 4;

/// Main Entry Point
///
/// Reihenfolge:
/// 1. HAL, Heap und Embassy Runtime
/// 2. Channels + Render Task: die Uhr läuft sofort los (12:00:00, nicht
///    synchronisiert) und hängt nie am Netzwerk
/// 3. WiFi, NTP und HTTP; schlägt das Radio fehl, läuft die Uhr offline weiter
#[esp_rtos::main]
async fn main(spawner: Spawner) -> ! {
    // CPU auf maximale Taktfrequenz (160 MHz)
    let config = esp_hal::Config::default().with_cpu_clock(CpuClock::max());
    let peripherals = esp_hal::init(config);

    // Zwei Heap-Bereiche: reclaimed RAM (64 KB) + extra (36 KB)
    esp_alloc::heap_allocator!(
        #[esp_hal::ram(reclaimed)]
        size: WIFI_HEAP_SIZE
    );
    esp_alloc::heap_allocator!(size: EXTRA_HEAP_SIZE);

    // Embassy Runtime (Timer + Software Interrupt)
    let timg0 = TimerGroup::new(peripherals.TIMG0);
    let sw_interrupt =
        esp_hal::interrupt::software::SoftwareInterruptControl::new(peripherals.SW_INTERRUPT);
    esp_rtos::start(timg0.timer0, sw_interrupt.software_interrupt0);

    // ========================================================================
    // Uhr: Channels + Render Task
    // ========================================================================

    // Snapshots: Render Task → WebSockets
    // Params: <Mutex, Message, Capacity, MaxSubscribers, MaxPublishers>
    static STATUS_CHANNEL: static_cell::StaticCell<ClockStatusChannel> =
        static_cell::StaticCell::new();
    let status_channel = &*STATUS_CHANNEL.init(ClockStatusChannel::new());
    let status_publisher = status_channel.publisher().unwrap();

    // Kommandos: HTTP + NTP → Render Task
    static COMMAND_CHANNEL: static_cell::StaticCell<ClockCommandChannel> =
        static_cell::StaticCell::new();
    let command_channel = COMMAND_CHANNEL.init(ClockCommandChannel::new());
    let command_sender = command_channel.sender();

    spawner
        .spawn(clock_render_task(
            peripherals.GPIO8,
            peripherals.RMT,
            status_publisher,
            command_channel.receiver(),
        ))
        .unwrap();

    // ========================================================================
    // Netzwerk: WiFi, NTP, HTTP
    // ========================================================================

    static RADIO_INIT: static_cell::StaticCell<esp_radio::Controller> =
        static_cell::StaticCell::new();
    let radio_init = match esp_radio::init() {
        Ok(controller) => RADIO_INIT.init(controller),
        Err(e) => {
            error!("WiFi: Radio init failed: {}, clock runs offline", Debug2Format(&e));
            idle().await
        }
    };

    let (wifi_controller, wifi_interface) =
        match esp_radio::wifi::new(radio_init, peripherals.WIFI, Default::default()) {
            Ok(wifi) => wifi,
            Err(e) => {
                error!("WiFi: Init failed: {}, clock runs offline", Debug2Format(&e));
                idle().await
            }
        };

    // Random seed für den TCP/IP Stack (Hardware RNG)
    let rng = Rng::new();
    let seed = (rng.random() as u64) << 32 | rng.random() as u64;

    static RESOURCES: static_cell::StaticCell<StackResources<NET_SOCKETS>> =
        static_cell::StaticCell::new();
    let (stack, runner) = embassy_net::new(
        wifi_interface.sta,
        NetConfig::dhcpv4(Default::default()),
        RESOURCES.init(StackResources::new()),
        seed,
    );

    // Stack muss 'static sein für Tasks
    static STACK: static_cell::StaticCell<Stack<'static>> = static_cell::StaticCell::new();
    let stack = &*STACK.init(stack);

    spawner.spawn(connection_task(wifi_controller)).unwrap();
    spawner.spawn(net_task(runner)).unwrap();
    spawner.spawn(dhcp_task(stack)).unwrap();

    spawn_network_services(&spawner, stack, status_channel, command_sender);

    info!("Clock: All tasks started");
    idle().await
}

/// NTP Task + HTTP Server Pool
///
/// Jede HTTP-Instanz bedient eine Verbindung und erstellt sich pro
/// WebSocket einen eigenen Subscriber am Status-Channel.
fn spawn_network_services(
    spawner: &Spawner,
    stack: &'static Stack<'static>,
    status_channel: &'static ClockStatusChannel,
    command_sender: ClockCommandSender,
) {
    spawner
        .spawn(time_sync_task(stack, command_sender))
        .unwrap();

    for task_id in 0..HTTP_TASK_COUNT {
        spawner
            .spawn(http_server_task(
                task_id,
                stack,
                status_channel,
                command_sender,
            ))
            .unwrap();
    }
}

/// main() schläft, alle Arbeit läuft in Tasks
async fn idle() -> ! {
    loop {
        Timer::after(Duration::from_secs(3600)).await;
    }
}
