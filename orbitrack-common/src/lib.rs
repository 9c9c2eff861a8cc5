//! Wire types shared between the tracking engine and its JSON surface.

pub mod types;

pub use types::*;
