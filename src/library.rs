//! Track model and the directory scanner that builds the playlist.

mod model;
mod scan;

pub use model::*;
pub use scan::scan;
