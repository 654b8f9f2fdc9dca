pub mod app;
pub mod input;
pub mod message;
pub mod render;
pub mod settings_form;
pub mod tasks;
pub mod text_buffer;
pub mod theme;
pub mod update;

#[cfg(test)]
mod test_support;

pub use app::{App, Session, run};
pub use message::{Msg, Task};
pub use tasks::execute;
pub use update::update;
