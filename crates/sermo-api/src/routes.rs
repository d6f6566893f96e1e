use axum::{
    Router,
    extract::State,
    middleware,
    routing::{get, post},
};

use crate::middleware::require_token;
use crate::state::AppState;
use crate::{auth, channels, data, users};

/// Build the full application router. Resource routes are served both at the
/// root and under `/api`.
pub fn create_router(state: AppState) -> Router {
    let resources = resource_routes(&state);

    Router::new()
        .route("/", get(home))
        .route("/api/", get(home))
        .merge(resources.clone())
        .nest("/api", resources)
        .with_state(state)
}

fn resource_routes(state: &AppState) -> Router<AppState> {
    let public_routes = Router::new()
        .route("/user", get(users::user_home).post(auth::signup))
        .route("/user/login", post(auth::login))
        .route("/channel", get(channels::channel_home))
        .route("/channel/{id}", get(channels::get_channel))
        .route("/data/{id}", get(data::get_data));

    let protected_routes = Router::new()
        .route("/users", get(users::list_users))
        .route(
            "/user/{id}",
            get(users::get_user)
                .put(users::update_user)
                .delete(users::delete_user),
        )
        .route("/channel", post(channels::create_channel))
        .route("/channels", get(channels::list_channels))
        .route(
            "/channel/{id}",
            axum::routing::put(channels::update_channel).delete(channels::delete_channel),
        )
        .route("/data", get(data::list_data).post(data::create_data))
        .route(
            "/data/{id}",
            axum::routing::put(data::update_data).delete(data::delete_data),
        )
        .route_layer(middleware::from_fn_with_state(state.clone(), require_token));

    public_routes.merge(protected_routes)
}

/// GET / and GET /api/
async fn home(State(state): State<AppState>) -> String {
    format!("Welcome to Sermo - API\nENV: {}", state.environment)
}
