pub mod dispatcher;
pub mod types;

pub use dispatcher::{DispatchConfig, HandlerDispatcher};
pub use types::{Handler, HandlerResult, HandlerStatus, HandlerTask};
