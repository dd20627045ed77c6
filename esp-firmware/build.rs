// Build-Script: Wird vor dem Kompilieren ausgeführt
// Bettet config.json ein und konfiguriert den Linker für ESP32-C6 Embedded Rust

use std::path::PathBuf;

fn main() {
    // Lade .env file (optional, z.B. CONFIG_FILE=config.local.json)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("⚠️  .env file nicht gefunden: {}", e);
    }

    embed_config();

    // Registriere hilfsbereiten Error-Handler für Linker-Fehler
    linker_be_nice();

    // Füge Linker-Skripte hinzu:

    // 1. defmt.x - defmt Logging-Support
    //    Definiert Symbole für defmt's binäres Log-Format
    println!("cargo:rustc-link-arg=-Tdefmt.x");

    // 2. linkall.x - ESP32 Memory-Layout
    //    WICHTIG: Muss als LETZTES kommen (sonst Probleme mit flip-link)
    //    Definiert Flash/RAM-Layout und Startup-Code
    println!("cargo:rustc-link-arg=-Tlinkall.x");
}

// Kopiert die Laufzeit-Konfiguration nach OUT_DIR/config.json
//
// Fehlt die Datei, wird eine leere Datei eingebettet. Die Firmware meldet
// das beim Start als "Configuration file 'config.json' not found.".
fn embed_config() {
    println!("cargo:rerun-if-env-changed=CONFIG_FILE");

    let manifest_dir = PathBuf::from(std::env::var("CARGO_MANIFEST_DIR").unwrap());
    let config_file = std::env::var("CONFIG_FILE").unwrap_or_else(|_| "config.json".into());
    let source = manifest_dir.join(config_file);
    println!("cargo:rerun-if-changed={}", source.display());

    let contents = match std::fs::read(&source) {
        Ok(contents) => contents,
        Err(e) => {
            println!(
                "cargo:warning={} nicht lesbar ({}), Firmware startet im Fehlerzustand",
                source.display(),
                e
            );
            Vec::new()
        }
    };

    let out_dir = PathBuf::from(std::env::var("OUT_DIR").unwrap());
    std::fs::write(out_dir.join("config.json"), contents).unwrap();
}

// Error-Handler: Zeigt hilfreiche Tipps bei Linker-Fehlern
// Wird vom Linker als "--error-handling-script" aufgerufen
fn linker_be_nice() {
    let args: Vec<String> = std::env::args().collect();

    // Wenn vom Linker aufgerufen (mit Error-Typ und Symbol-Name)
    if args.len() > 1 {
        let kind = &args[1]; // Fehler-Typ (z.B. "undefined-symbol")
        let what = &args[2]; // Symbol-Name (z.B. "_defmt_...")

        match kind.as_str() {
            "undefined-symbol" => match what.as_str() {
                what if what.starts_with("_defmt_") => {
                    eprintln!();
                    eprintln!(
                        "💡 `defmt` not found - make sure `defmt.x` is added as a linker script"
                    );
                    eprintln!();
                }
                "_stack_start" => {
                    eprintln!();
                    eprintln!("💡 Is the linker script `linkall.x` missing?");
                    eprintln!();
                }
                what if what.starts_with("esp_rtos_") => {
                    eprintln!();
                    eprintln!(
                        "💡 `esp-radio` has no scheduler enabled. Make sure you have initialized `esp-rtos` or provided an external scheduler."
                    );
                    eprintln!();
                }
                "free" | "malloc" | "calloc" | "get_free_internal_heap_size" | "malloc_internal"
                | "realloc_internal" | "calloc_internal" | "free_internal" => {
                    eprintln!();
                    eprintln!(
                        "💡 Did you forget the `esp-alloc` dependency or didn't enable the `compat` feature on it?"
                    );
                    eprintln!();
                }
                _ => (),
            },
            _ => {
                std::process::exit(1);
            }
        }

        std::process::exit(0);
    }

    println!(
        "cargo:rustc-link-arg=--error-handling-script={}",
        std::env::current_exe().unwrap().display()
    );
}
