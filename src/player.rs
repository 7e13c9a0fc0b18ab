//! Player core: playback state, the command set and the controller that
//! keeps the audio sink and the UI observers in sync.

mod command;
mod controller;
mod observer;
mod state;

pub use command::Command;
pub use controller::PlaybackController;
pub use observer::{Snapshot, UiObserver};
pub use state::{PlaybackState, Transport};

#[cfg(test)]
mod properties;
