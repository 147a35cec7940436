//! Build script for quartz-firmware
//!
//! - Sets up linker search paths for memory.x
//! - Parses and validates quartz.toml at compile time
//! - Generates the `BOARD` constant the firmware boots from

use std::env;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use quartz_core::config::BoardConfig;

fn main() {
    let out_dir = PathBuf::from(env::var("OUT_DIR").unwrap());

    setup_linker(&out_dir);
    let config = load_config();
    generate_config(&out_dir, &config);
}

/// Set up linker search paths for memory.x
fn setup_linker(out_dir: &Path) {
    let memory_x = include_bytes!("memory.x");
    let mut f = File::create(out_dir.join("memory.x")).unwrap();
    f.write_all(memory_x).unwrap();

    println!("cargo:rustc-link-search={}", out_dir.display());

    println!("cargo:rerun-if-changed=memory.x");
    println!("cargo:rerun-if-changed=build.rs");
}

/// Read quartz.toml and reject anything the board cannot run
fn load_config() -> BoardConfig {
    println!("cargo:rerun-if-changed=quartz.toml");

    let config_path = Path::new("quartz.toml");

    if !config_path.exists() {
        panic!(
            "\n\
            ╔══════════════════════════════════════════════════════════════════╗\n\
            ║  ERROR: quartz.toml not found!                                   ║\n\
            ║                                                                  ║\n\
            ║  The firmware requires a quartz.toml board configuration file.   ║\n\
            ║  Please create one in the quartz-firmware directory.             ║\n\
            ╚══════════════════════════════════════════════════════════════════╝\n"
        );
    }

    let content = match fs::read_to_string(config_path) {
        Ok(content) => content,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Failed to read quartz.toml                               ║\n\
                ║                                                                  ║\n\
                ║  Error: {:<56} ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                e
            );
        }
    };

    let config: BoardConfig = match toml::from_str(&content) {
        Ok(config) => config,
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Invalid quartz.toml                                      ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                ║                                                                  ║\n\
                {}\n\
                ║                                                                  ║\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    };

    match config.validate() {
        Ok(clocks) => {
            println!(
                "cargo:warning=quartz.toml validated: SYSCLK {} Hz, HCLK {} Hz, PCLK1 {} Hz, PCLK2 {} Hz",
                clocks.sysclk, clocks.hclk, clocks.pclk1, clocks.pclk2
            );
        }
        Err(e) => {
            panic!(
                "\n\
                ╔══════════════════════════════════════════════════════════════════╗\n\
                ║  ERROR: Board configuration rejected                             ║\n\
                ╠══════════════════════════════════════════════════════════════════╣\n\
                {}\n\
                ╚══════════════════════════════════════════════════════════════════╝\n",
                format_error_lines(&e.to_string())
            );
        }
    }

    config
}

/// Format error message lines with box drawing
fn format_error_lines(msg: &str) -> String {
    msg.lines()
        .map(|line| {
            let truncated = if line.chars().count() > 64 {
                format!("{}...", line.chars().take(61).collect::<String>())
            } else {
                line.to_string()
            };
            format!("║  {:<64} ║", truncated)
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Write `OUT_DIR/board_config.rs`
fn generate_config(out_dir: &Path, config: &BoardConfig) {
    let clock = &config.clock;
    let source = format!(
        "/// Board configuration compiled from quartz.toml\n\
         pub const BOARD: BoardConfig = BoardConfig {{\n\
         \x20   clock: ClockPlan {{\n\
         \x20       hse_hz: {},\n\
         \x20       pll_m: {},\n\
         \x20       pll_n: {},\n\
         \x20       pll_p: {},\n\
         \x20       pll_q: {},\n\
         \x20       ahb_div: {},\n\
         \x20       apb1_div: {},\n\
         \x20       apb2_div: {},\n\
         \x20       voltage_scale: VoltageScale::{:?},\n\
         \x20       usb_clock: {},\n\
         \x20   }},\n\
         \x20   tick: TickConfig {{ rate_hz: {} }},\n\
         \x20   heartbeat: HeartbeatConfig {{ period_ms: {} }},\n\
         \x20   uart: UartSettings {{ baudrate: {} }},\n\
         }};\n",
        clock.hse_hz,
        clock.pll_m,
        clock.pll_n,
        clock.pll_p,
        clock.pll_q,
        clock.ahb_div,
        clock.apb1_div,
        clock.apb2_div,
        clock.voltage_scale,
        clock.usb_clock,
        config.tick.rate_hz,
        config.heartbeat.period_ms,
        config.uart.baudrate,
    );

    fs::write(out_dir.join("board_config.rs"), source).unwrap();
}
