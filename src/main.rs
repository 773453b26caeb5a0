use actix_web::dev::Service;
use actix_web::middleware::DefaultHeaders;
use actix_web::{web, App, HttpServer};
use actix_cors::Cors;
use dotenv::dotenv;
use futures::future::{ready, Either};
use futures::TryFutureExt;
use newsdesk_server::auth;
use newsdesk_server::auth::handlers::{login, register};
use newsdesk_server::categories::handlers::{get_categories, update_categories};
use newsdesk_server::error::AppError;
use newsdesk_server::news::handlers::{news_by_category, single_news_by_category};
use newsdesk_server::{health_check, AppState, Settings};
use std::net::TcpListener;
use std::time::Duration;
use tracing::{info, warn, Level};
use tracing_subscriber::FmtSubscriber;

#[actix_web::main]
async fn main() -> newsdesk_server::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .pretty()
        .init();

    // Load configuration
    let config = Settings::new()?;
    info!("Configuration loaded successfully");

    info!("Starting server at {}:{}", config.server.host, config.server.port);

    // Initialize application state
    let state = AppState::new(config.clone()).await?;

    // Apply pending migrations so a fresh database self-provisions
    if let Err(e) = sqlx::migrate!("./migrations").run(state.db.pool()).await {
        warn!("Database migration failed: {}", e);
    }

    let state = web::Data::new(state);

    // Periodically drop rate-limit windows that have rolled over
    let janitor_state = state.clone();
    tokio::spawn(async move {
        loop {
            tokio::time::sleep(Duration::from_secs(60)).await;
            janitor_state.limiter.cleanup();
        }
    });

    // Create and bind TCP listener
    let listener = TcpListener::bind(format!("{}:{}", config.server.host, config.server.port))?;

    let workers = config.server.workers as usize;

    // Start HTTP server
    let server_state = state.clone();
    HttpServer::new(move || {
        let cors = Cors::default()
            .allow_any_origin()
            .allow_any_method()
            .allow_any_header();

        let limiter_state = server_state.clone();

        App::new()
            // Registered first so it runs innermost; CORS preflights are
            // not counted against the limit.
            .wrap_fn(move |req, srv| {
                match auth::check_request(&limiter_state.limiter, &req) {
                    None => Either::Left(srv.call(req).map_ok(|res| res.map_into_left_body())),
                    Some(response) => {
                        Either::Right(ready(Ok(req.into_response(response).map_into_right_body())))
                    }
                }
            })
            .wrap(cors)
            .wrap(
                DefaultHeaders::new()
                    .add(("X-Content-Type-Options", "nosniff"))
                    .add(("X-Frame-Options", "SAMEORIGIN"))
                    .add(("Referrer-Policy", "no-referrer")),
            )
            .app_data(server_state.clone())
            .app_data(web::JsonConfig::default().error_handler(|_err, _req| {
                AppError::ValidationError("Invalid input".to_string()).into()
            }))
            .route("/health", web::get().to(health_check))
            .route("/api/register", web::post().to(register))
            .route("/api/login", web::post().to(login))
            .route("/api/newsByCategory", web::post().to(news_by_category))
            .route("/api/updateCategories", web::post().to(update_categories))
            .route("/api/getCategories", web::get().to(get_categories))
            .route("/api/SingleNewsByCategory", web::post().to(single_news_by_category))
    })
    .listen(listener)?
    .workers(workers)
    .run()
    .await
    .map_err(|e| AppError::InternalError(e.to_string()))?;

    state.shutdown().await?;

    Ok(())
}
