/// Application state and router builder
///
/// Defines the shared application state and builds the axum router with
/// all routes and middleware.
///
/// # Example
///
/// ```no_run
/// use boardflow_api::{app::{build_router, AppState}, config::Config};
/// use sqlx::PgPool;
///
/// # async fn example() -> anyhow::Result<()> {
/// let config = Config::from_env()?;
/// let pool = PgPool::connect(&config.database.url).await?;
/// let state = AppState::new(pool, config);
/// let app = build_router(state);
///
/// let listener = tokio::net::TcpListener::bind("0.0.0.0:8080").await?;
/// axum::serve(listener, app).await?;
/// # Ok(())
/// # }
/// ```

use crate::config::Config;
use crate::error::ApiError;
use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
    routing::{delete, get, post, put},
    Router,
};
use boardflow_shared::auth::token;
use sqlx::PgPool;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer},
};
use tracing::Level;

/// Shared application state
///
/// Cloned for each request handler via axum's `State` extractor.
/// Uses Arc internally for cheap cloning.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: PgPool,

    /// Application configuration
    pub config: Arc<Config>,
}

impl AppState {
    /// Creates new application state
    pub fn new(db: PgPool, config: Config) -> Self {
        Self {
            db,
            config: Arc::new(config),
        }
    }

    /// Gets the token verification secret
    pub fn jwt_secret(&self) -> &str {
        &self.config.auth.jwt_secret
    }
}

/// Builds the complete axum router
///
/// # Architecture
///
/// ```text
/// /
/// ├── /health                       # Health check (public)
/// └── /api/                         # Authenticated API
///     ├── /boards/                  # Board CRUD, star, nested detail
///     ├── /columns/                 # Column CRUD and reorder
///     ├── /tasks/                   # Task CRUD, move, relations
///     ├── /members/                 # Board membership management
///     └── /notifications/           # Per-recipient notification feed
/// ```
///
/// Every route under `/api` passes through the bearer-token middleware,
/// which verifies the identity service's token and injects the resolved
/// [`token::Actor`] into request extensions.
pub fn build_router(state: AppState) -> Router {
    use crate::routes;

    let health_routes = Router::new().route("/health", get(routes::health::health_check));

    let board_routes = Router::new()
        .route("/", post(routes::boards::create_board))
        .route("/", get(routes::boards::list_boards))
        .route("/:id", get(routes::boards::get_board))
        .route("/:id", put(routes::boards::update_board))
        .route("/:id", delete(routes::boards::delete_board))
        .route("/:id/star", post(routes::boards::star_board));

    let column_routes = Router::new()
        .route("/", post(routes::columns::create_column))
        .route("/reorder", post(routes::columns::reorder_columns))
        .route("/board/:board_id", get(routes::columns::list_columns))
        .route("/:id", put(routes::columns::update_column))
        .route("/:id", delete(routes::columns::delete_column));

    let task_routes = Router::new()
        .route("/", post(routes::tasks::create_task))
        .route("/all", get(routes::tasks::get_all_tasks))
        .route("/move", post(routes::tasks::move_task))
        .route("/column/:column_id", get(routes::tasks::get_tasks_by_column))
        .route("/details/:id", get(routes::tasks::get_task_detail))
        .route("/:id", put(routes::tasks::update_task))
        .route("/:id", delete(routes::tasks::delete_task))
        .route("/:id/assignees", post(routes::tasks::add_assignee))
        .route("/:id/assignees/:user_id", delete(routes::tasks::remove_assignee))
        .route("/:id/tags", post(routes::tasks::add_tag))
        .route("/:id/tags/:tag", delete(routes::tasks::remove_tag))
        .route("/:id/comments", post(routes::tasks::add_comment))
        .route("/:id/comments/:comment_id", delete(routes::tasks::delete_comment))
        .route("/:id/attachments", post(routes::tasks::add_attachment))
        .route(
            "/:id/attachments/:attachment_id",
            delete(routes::tasks::delete_attachment),
        );

    let member_routes = Router::new()
        .route("/:board_id", post(routes::members::add_member))
        .route("/:board_id", get(routes::members::get_members))
        .route("/:board_id/:user_id", put(routes::members::update_member_role))
        .route("/:board_id/:user_id", delete(routes::members::remove_member));

    let notification_routes = Router::new()
        .route("/", get(routes::notifications::list_notifications))
        .route("/read-all", put(routes::notifications::mark_all_read))
        .route("/:id/read", put(routes::notifications::mark_read))
        .route("/:id", delete(routes::notifications::delete_notification));

    let api_routes = Router::new()
        .nest("/boards", board_routes)
        .nest("/columns", column_routes)
        .nest("/tasks", task_routes)
        .nest("/members", member_routes)
        .nest("/notifications", notification_routes)
        .layer(axum::middleware::from_fn_with_state(
            state.clone(),
            bearer_auth_layer,
        ));

    Router::new()
        .merge(health_routes)
        .nest("/api", api_routes)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bearer token authentication middleware
///
/// Extracts and verifies the identity service's token from the
/// Authorization header, then injects the resolved actor into request
/// extensions.
async fn bearer_auth_layer(
    state: axum::extract::State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let auth_header = req
        .headers()
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| ApiError::Unauthorized("No token provided".to_string()))?;

    let actor = token::verify_token(token, state.jwt_secret())?;

    req.extensions_mut().insert(actor);

    Ok(next.run(req).await)
}
