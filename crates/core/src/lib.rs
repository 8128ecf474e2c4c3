pub mod api;
pub mod category;
pub mod config;
pub mod error;
pub mod model;
pub mod sidebar;
pub mod store;
pub mod telemetry;
pub mod toggle;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiClient, TaskRemote};
pub use category::{belongs_to_category, filter_tasks, Category};
pub use config::ClientConfig;
pub use error::{ApiError, ApiResult};
pub use model::*;
pub use sidebar::{AreaGroup, Sidebar};
pub use store::{LoadPhase, LoadTicket, TaskStore};
pub use toggle::{CompletionToggle, TogglePhase, ToggleRequest};
