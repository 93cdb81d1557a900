mod error;
mod parse;
mod types;

#[cfg(test)]
mod tests;

pub use error::*;
pub use types::*;
