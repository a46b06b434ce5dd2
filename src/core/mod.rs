pub mod config;
pub mod error;
pub mod frame_set;
pub mod navigator;
pub mod session;

#[cfg(test)]
mod session_test;

pub use config::*;
pub use error::*;
pub use frame_set::*;
pub use navigator::*;
pub use session::*;
