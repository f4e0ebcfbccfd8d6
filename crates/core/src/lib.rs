//! Core data types for the price alert bot.

pub mod asset;
pub mod error;
pub mod movement;
pub mod price;
pub mod window;

pub use asset::*;
pub use error::*;
pub use movement::*;
pub use price::*;
pub use window::*;
