pub mod context;
pub mod permission;
pub mod session;

pub use context::RequestContext;
pub use session::Session;
