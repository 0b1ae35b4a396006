mod backend;
mod error;
mod event;
mod message;
mod query;
mod slash_commands;
mod upload;
mod workspace;

pub use backend::*;
pub use error::*;
pub use event::*;
pub use message::*;
pub use query::*;
pub use slash_commands::*;
pub use upload::*;
pub use workspace::*;
