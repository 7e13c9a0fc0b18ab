mod audio;
mod config;
mod error;
mod keymap;
mod library;
mod mpris;
mod player;
mod runtime;
mod ui;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    runtime::run()
}
