//! Audio output: the sink contract consumed by the player core and its
//! `rodio` implementation.

mod output;
mod types;

#[cfg(test)]
pub(crate) mod mock;

pub use output::RodioSink;
pub use types::{AudioSink, SinkEvent};
