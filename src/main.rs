use std::sync::Arc;

use actix_web::{App, HttpResponse, HttpServer, middleware, web};

use civic_portal::api::{HttpApi, IssueApi};
use civic_portal::config::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    env_logger::init();

    let config = Config::from_env();
    let secret_key = config.cookie_key();
    let api: Arc<dyn IssueApi> = Arc::new(HttpApi::new(&config.api_base));

    log::info!("Using issue API at {}", config.api_base);
    log::info!("Starting server at http://{}", config.bind_addr);

    let bind_addr = config.bind_addr.clone();
    HttpServer::new(move || {
        App::new()
            .wrap(civic_portal::session_middleware(secret_key.clone(), config.secure_cookies))
            .wrap(middleware::Logger::default())
            .app_data(web::Data::from(api.clone()))
            .service(actix_files::Files::new("/static", &config.static_dir))
            .configure(civic_portal::configure)
            // Default 404 handler (must be registered last)
            .default_service(web::to(|| async {
                let html = include_str!("../templates/errors/404.html");
                HttpResponse::NotFound()
                    .content_type("text/html; charset=utf-8")
                    .body(html)
            }))
    })
    .bind(bind_addr)?
    .run()
    .await
}
