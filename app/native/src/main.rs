//! Roomdeck - command-line interface for per-room widget layouts.
//!
//! Loads a widget registry and the persisted layouts from disk, runs the
//! layout engine for a room and prints or edits the result.

fn main() {
    if let Err(err) = roomdeck_lib::cli::run() {
        eprintln!("roomdeck: {err}");
        std::process::exit(1);
    }
}
