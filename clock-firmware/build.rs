// Build-Script: WiFi-Credentials einbacken und Linker-Skripte setzen

/// Umgebungsvariablen, die `config.rs` per `env!` liest
const BUILD_ENV_KEYS: [&str; 2] = ["WIFI_SSID", "WIFI_PASSWORD"];

fn main() {
    // .env ist optional; alternativ müssen die Variablen in der Shell gesetzt sein
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  .env file nicht gefunden: {}", e);
        eprintln!("   Setze {} als Environment-Variablen", BUILD_ENV_KEYS.join(" und "));
    }

    for key in BUILD_ENV_KEYS {
        println!("cargo:rerun-if-env-changed={}", key);
        if let Ok(value) = std::env::var(key) {
            println!("cargo:rustc-env={}={}", key, value);
        }
    }
    println!("cargo:rerun-if-changed=.env");

    linker_hints();

    // defmt.x vor linkall.x (ESP32 Memory-Layout muss als LETZTES kommen)
    println!("cargo:rustc-link-arg=-Tdefmt.x");
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

/// Fehlendes Symbol → Hinweis für den Entwickler
fn hint_for_symbol(symbol: &str) -> Option<&'static str> {
    const ALLOC_SYMBOLS: [&str; 8] = [
        "free",
        "malloc",
        "calloc",
        "get_free_internal_heap_size",
        "malloc_internal",
        "realloc_internal",
        "calloc_internal",
        "free_internal",
    ];

    if symbol.starts_with("_defmt_") {
        Some("`defmt` not found - add `defmt.x` as linker script and enable esp-println's defmt backend")
    } else if symbol == "_stack_start" {
        Some("Is the linker script `linkall.x` missing?")
    } else if symbol.starts_with("esp_rtos_") {
        Some("`esp-radio` has no scheduler - initialize `esp-rtos` before the radio")
    } else if ALLOC_SYMBOLS.contains(&symbol) {
        Some("Did you forget the `esp-alloc` dependency or its `compat` feature?")
    } else {
        None
    }
}

/// Registriert dieses Build-Script als `--error-handling-script` des Linkers
///
/// Der Linker ruft es bei Fehlern mit `<kind> <symbol>` erneut auf.
fn linker_hints() {
    let args: Vec<String> = std::env::args().collect();

    if let [_, kind, symbol, ..] = args.as_slice() {
        if kind != "undefined-symbol" {
            std::process::exit(1);
        }
        if let Some(hint) = hint_for_symbol(symbol) {
            eprintln!();
            eprintln!("💡 {}", hint);
            eprintln!();
        }
        std::process::exit(0);
    }

    if let Ok(exe) = std::env::current_exe() {
        println!(
            "cargo:rustc-link-arg=--error-handling-script={}",
            exe.display()
        );
    }
}
