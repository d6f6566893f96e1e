pub mod auth;
pub mod channels;
pub mod convert;
pub mod data;
pub mod error;
pub mod middleware;
pub mod pagination;
pub mod password;
pub mod routes;
pub mod state;
pub mod token;
pub mod users;

pub use error::ApiError;
pub use routes::create_router;
pub use state::{AppState, AppStateInner};
