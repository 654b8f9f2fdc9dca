pub mod config;
pub mod filter;
pub mod item;
pub mod notification;
pub mod project;

pub use config::*;
pub use filter::*;
pub use item::*;
pub use notification::*;
pub use project::*;
