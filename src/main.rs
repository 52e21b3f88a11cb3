use axum::{
    middleware,
    routing::{delete, get, post, put},
    Json, Router,
};
use dotenvy::dotenv;
use serde_json::{json, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::env;
use std::net::SocketAddr;
use std::str::FromStr;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

use directory::services::auth_service::JwtKeys;
use directory::state::{AppState, ModerationPolicy};
use directory::web::middleware::auth as auth_middleware;
use directory::web::routes::{admin, auth, businesses, favorites, reviews};

#[tokio::main]
async fn main() {
    dotenv().ok();

    // 1. Start logging
    tracing_subscriber::fmt::init();

    // 2. Connect to the database and run migrations
    let db_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://directory.db".to_string());
    let options = SqliteConnectOptions::from_str(&db_url)
        .expect("DATABASE_URL is not a valid sqlite URL")
        .create_if_missing(true)
        .foreign_keys(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(options)
        .await
        .expect("cannot connect to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("database migration failed");

    // 3. Build shared state
    let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET must be set");
    let state = AppState {
        pool,
        jwt: JwtKeys::new(&jwt_secret),
        moderation: ModerationPolicy::from_env(env::var("MODERATION").ok().as_deref()),
    };

    // 4. Routes. The auth middleware only decodes the caller; handlers that
    // need one extract it and reject anonymous requests themselves.
    let admin_routes = Router::new()
        .route("/users", get(admin::list_users_handler))
        .route("/users/:id", delete(admin::delete_user_handler))
        .route("/reviews", get(admin::list_reviews_handler))
        .route("/reviews/:id", delete(admin::delete_review_handler))
        .route("/businesses", get(admin::list_businesses_handler))
        .route(
            "/businesses/:id",
            put(admin::update_business_handler).delete(admin::delete_business_handler),
        )
        .route("/businesses/:id/approve", post(admin::approve_business_handler));

    let app = Router::new()
        .route("/", get(index_handler))
        .route("/api/auth/register", post(auth::register_handler))
        .route("/api/auth/login", post(auth::login_handler))
        .route("/api/auth/me", get(auth::me_handler))
        .route(
            "/api/businesses",
            get(businesses::search_handler).post(businesses::create_handler),
        )
        .route("/api/businesses/featured", get(businesses::featured_handler))
        .route(
            "/api/businesses/:id",
            get(businesses::detail_handler)
                .put(businesses::update_handler)
                .delete(businesses::delete_handler),
        )
        .route("/api/reviews/business/:business_id", get(reviews::list_handler))
        .route("/api/reviews", post(reviews::create_handler))
        .route("/api/reviews/:id", delete(reviews::delete_handler))
        .route(
            "/api/favorites",
            get(favorites::list_handler).post(favorites::add_handler),
        )
        .route("/api/favorites/:business_id", delete(favorites::remove_handler))
        .nest("/api/admin", admin_routes)
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware::auth_context,
        ))
        .layer(CorsLayer::permissive())
        .layer(CatchPanicLayer::new())
        .with_state(state);

    // 5. Start the server (with fallback port)
    let host = env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string());
    let port: u16 = env::var("PORT")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(3001);
    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("cannot parse host/port");

    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(l) => l,
        Err(e) => {
            eprintln!(
                "⚠️  Could not bind {}: {}. Trying fallback {}:{}",
                addr,
                e,
                host,
                port + 1
            );
            let fallback: SocketAddr = format!("{}:{}", host, port + 1)
                .parse()
                .expect("cannot parse fallback address");
            tokio::net::TcpListener::bind(fallback)
                .await
                .expect("cannot bind fallback port")
        }
    };

    let bound_addr = listener.local_addr().unwrap();
    println!("🚀 Server running on http://{}", bound_addr);

    axum::serve(listener, app).await.unwrap();
}

async fn index_handler() -> Json<Value> {
    Json(json!({
        "message": "Local business directory API",
        "version": "1.0.0",
    }))
}
