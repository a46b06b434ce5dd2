pub mod app;
pub mod controls;


pub use app::*;
