//! ovmux - a terminal multiplexing proxy with a floating overlay shell
//!
//! ovmux sits between your terminal and your shell: keystrokes and output
//! pass through untouched while a parsed model of the screen is kept up to
//! date. Ctrl+] suspends pass-through and composites a floating bordered
//! shell over a redraw of the main screen on the alternate screen; Ctrl+]
//! again returns to the live shell.
//!
//! # Quick start
//!
//! ```text
//! ovmux              # run $SHELL (default /bin/sh) behind the proxy
//! Ctrl+]             # toggle the floating overlay shell
//! ```

mod domain;
mod infrastructure;
mod interface_adapter;
mod shared;
mod usecase;

use std::env;

use tracing::{Level, info};
use tracing_subscriber::FmtSubscriber;

use crate::infrastructure::proxy::runner;
use crate::interface_adapter::adapter::{pty_adapter_factory, screen_adapter_factory};
use crate::interface_adapter::controller::ProxyController;
use crate::usecase::proxy_usecase::ProxyUsecase;

/// Version string from Cargo.toml
const VERSION: &str = env!("CARGO_PKG_VERSION");

fn print_version() {
    println!("ovmux {}", VERSION);
}

fn print_help() {
    println!("ovmux {} - terminal multiplexing proxy with a floating overlay shell", VERSION);
    println!();
    println!("Usage: ovmux [OPTIONS]");
    println!();
    println!("Options:");
    println!("  -h, --help            Show this help");
    println!("  -V, --version         Show version");
    println!();
    println!("Hotkeys:");
    println!("  Ctrl+]                Toggle the floating overlay shell");
    println!("                        (also recognized kitty-encoded as ESC[93;5u)");
    println!();
    println!("While the overlay is visible, keystrokes go to the floating shell.");
    println!("The shell comes from $SHELL (default: /bin/sh).");
    println!();
    println!("Exit: quit the main shell.");
}

fn parse_args() {
    for arg in env::args().skip(1) {
        match arg.as_str() {
            "-h" | "--help" => {
                print_help();
                std::process::exit(0);
            }
            "-V" | "--version" => {
                print_version();
                std::process::exit(0);
            }
            arg => {
                eprintln!("ovmux: unknown argument: {}", arg);
                eprintln!("Use --help for usage information");
                std::process::exit(1);
            }
        }
    }
}

/// Log to ~/.ovmux/ovmux.log; stdout and stderr belong to the user's
/// terminal session. Logging is skipped if the file cannot be opened.
fn init_logging() {
    let log_path = env::var_os("HOME")
        .map(std::path::PathBuf::from)
        .map(|h| h.join(".ovmux").join("ovmux.log"))
        .unwrap_or_else(|| std::path::PathBuf::from("ovmux.log"));

    if let Some(parent) = log_path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }

    let log_file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&log_path)
        .ok();

    if let Some(file) = log_file {
        let subscriber = FmtSubscriber::builder()
            .with_max_level(Level::INFO)
            .with_writer(std::sync::Mutex::new(file))
            .with_ansi(false)
            .finish();
        let _ = tracing::subscriber::set_global_default(subscriber);
    }
}

fn main() -> anyhow::Result<()> {
    parse_args();
    init_logging();
    info!("ovmux {} starting", VERSION);

    // Infrastructure concrete adapters
    let pty_adapter = pty_adapter_factory::create_pty_adapter();
    let screen_adapter = screen_adapter_factory::create_screen_adapter();

    // Usecase (depends on port traits via generics)
    let usecase = ProxyUsecase::new(pty_adapter, screen_adapter);

    // Controller
    let controller = ProxyController::new(usecase);

    // Run the proxy
    runner::run(controller)?;

    Ok(())
}
