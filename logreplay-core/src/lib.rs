pub mod conf;
pub mod error;
pub mod logging;
pub mod parse;
pub mod playback;
pub mod sim;
pub mod source;
pub mod summary;

pub use error::{ParseError, ReplayError};
