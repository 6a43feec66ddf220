//! HTTP surfaces: the public read API and the token-guarded admin API.

mod admin;
mod auth;
mod middleware;
mod models;
mod public;
mod response;

pub use admin::{AdminState, build_admin_router};
pub use auth::AdminToken;
pub use middleware::RequestContext;
pub use public::{PublicState, build_public_router};
pub use response::{ActionError, ActionResponse};
