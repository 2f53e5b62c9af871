//! Route handler implementations, grouped by concern.

pub mod config;
pub mod download;
pub mod editor;
pub mod system;

pub use config::*;
pub use download::*;
pub use editor::*;
pub use system::*;
