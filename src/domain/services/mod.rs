mod app_state;
mod query_client;
mod render;
mod upload_orchestrator;
mod upload_worker;

pub use app_state::*;
pub use query_client::*;
pub use render::*;
pub use upload_orchestrator::*;
pub use upload_worker::*;
