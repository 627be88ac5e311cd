use actix_cors::Cors;
use actix_web::{get, middleware::Logger, web, App, HttpResponse, HttpServer, Responder};
use anyhow::Result;

use paylog::database::init_database;
use paylog::handlers::{remittances, tasks, worklogs};
use paylog::middleware::RequestId;
use paylog::Config;

#[get("/")]
async fn hello() -> impl Responder {
    HttpResponse::Ok().body("Paylog settlement API v1.0")
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now()
    }))
}

#[actix_web::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    log::info!(
        "Configuration loaded (environment: {})",
        config.environment
    );

    init_database(&config.database_url).await?;
    log::info!("Database initialized");

    let config_data = web::Data::new(config.clone());

    let server_address = config.server_address();
    log::info!("Server starting on http://{}", server_address);

    HttpServer::new(move || {
        App::new()
            .app_data(config_data.clone())
            .wrap(
                Cors::default()
                    .allowed_origin("http://localhost:3000")
                    .allowed_methods(vec!["GET", "POST", "PUT", "DELETE", "OPTIONS"])
                    .allowed_headers(vec![
                        "Authorization",
                        "Content-Type",
                        "Accept",
                        "X-Requested-With",
                        "X-Correlation-ID",
                    ])
                    .max_age(3600),
            )
            .wrap(RequestId)
            .wrap(Logger::new(
                r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T correlation_id=%{x-correlation-id}o"#,
            ))
            .service(hello)
            .service(health)
            .service(
                web::scope("/api/v1")
                    .service(
                        web::scope("/tasks")
                            .route("", web::post().to(tasks::create_task))
                            .route("", web::get().to(tasks::get_tasks))
                            .route("/{id}", web::get().to(tasks::get_task)),
                    )
                    .service(
                        web::scope("/worklogs")
                            .route("", web::post().to(worklogs::create_worklog))
                            .route("", web::get().to(worklogs::get_worklogs))
                            .route("/{id}", web::get().to(worklogs::get_worklog))
                            .route("/{id}/segments", web::post().to(worklogs::log_time))
                            .route(
                                "/{id}/segments/{segment_id}/status",
                                web::post().to(worklogs::update_segment_status),
                            )
                            .route(
                                "/{id}/adjustments",
                                web::post().to(worklogs::add_adjustment),
                            ),
                    )
                    .service(
                        web::scope("/remittances")
                            .route(
                                "/generate",
                                web::post().to(remittances::generate_remittances),
                            )
                            .route("", web::get().to(remittances::get_remittances))
                            .route("/{id}", web::get().to(remittances::get_remittance)),
                    ),
            )
    })
    .bind(&server_address)?
    .run()
    .await
    .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
