pub mod admission;
pub mod ante;
pub mod context;
pub mod dispatcher;
mod genesis;
mod handlers;
pub mod service;

#[cfg(test)]
pub(crate) mod fixtures;

pub use ante::AuthorizedMessage;
pub use context::UtilityContext;
pub use dispatcher::{MessageDispatch, MessageDispatcher};
pub use service::UtilityService;
