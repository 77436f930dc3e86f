use actix_web::{App, HttpServer, web};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::EnvFilter;

use snipbin::api::{admin, snippets};
use snipbin::cache::CacheFactory;
use snipbin::config::{get_config, init_config};
use snipbin::services::{AccessGate, SnippetService};
use snipbin::storage::StoreFactory;
use snipbin::utils::sealing::ContentSealer;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenvy::dotenv().ok();
    init_config();
    let config = get_config();

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.clone()));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    // 初始化存储后端
    let store = StoreFactory::create(config).await.map_err(|e| {
        std::io::Error::other(format!("Failed to create snippet store: {}", e))
    })?;
    info!("Using storage backend: {}", store.backend_name().await);

    let cache = CacheFactory::create(config);

    // 内容加密（可选）
    let sealer = if config.sealing.enabled {
        let sealer = ContentSealer::new(&config.sealing.key_base64)
            .map_err(|e| std::io::Error::other(format!("Invalid sealing key: {}", e)))?;
        info!("Content sealing enabled");
        Some(Arc::new(sealer))
    } else {
        None
    };

    let service = Arc::new(SnippetService::new(
        store.clone(),
        cache,
        sealer,
        config.features.short_id_length,
        config.cache.default_ttl,
    ));
    let gate = Arc::new(AccessGate::new(store.clone()));

    if config.api.admin_token.is_empty() {
        info!("Admin API is disabled (admin_token not set)");
    } else {
        info!("Admin API available at: /admin");
    }

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    info!("Starting server at http://{}", bind_address);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(store.clone()))
            .app_data(web::Data::new(service.clone()))
            .app_data(web::Data::new(gate.clone()))
            .service(
                web::scope("/api")
                    .route("/snippets", web::post().to(snippets::create_snippet))
                    // 必须在 /snippets/{short_id} 之前注册
                    .route("/snippets/recent", web::get().to(snippets::recent_snippets))
                    .route("/snippets/{short_id}", web::get().to(snippets::get_snippet))
                    .route("/snippets/{short_id}", web::put().to(snippets::update_snippet))
                    .route(
                        "/snippets/{short_id}",
                        web::delete().to(snippets::delete_snippet),
                    )
                    .route(
                        "/snippets/{short_id}/verify",
                        web::post().to(snippets::verify_owner_code),
                    )
                    .route(
                        "/snippets/{short_id}/unlock",
                        web::post().to(snippets::unlock_snippet),
                    ),
            )
            .service(web::scope("/admin").route("/sweep", web::post().to(admin::sweep_expired)))
            .route("/health", web::get().to(admin::health_check))
            .default_service(web::route().to(snippets::not_found))
    })
    .bind(bind_address)?
    .run()
    .await
}
