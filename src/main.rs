use anyhow::Context;
use clap::Parser;
use kislap_sites::utils::{logger, validation::Validate};
use kislap_sites::{app, ApiProjectSource, HostRouting, SiteConfig, SiteEngine, TemplateRegistry};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // 讀取 CLI 參數，若指定 --config 則改由 TOML 檔案提供設定
    let config = match SiteConfig::parse().resolve() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ {}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    // 初始化日誌
    logger::init_logger(config.verbose, config.json_logs);

    tracing::info!("Starting kislap-sites");
    if config.verbose {
        tracing::debug!("Site config: {:?}", config);
    }

    // 驗證配置
    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }

    let source = ApiProjectSource::new(&config.api_base_url, config.request_timeout())
        .context("failed to create project API client")?;
    let registry = Arc::new(TemplateRegistry::standard());
    tracing::debug!("Template registry: {:?}", registry);

    let engine = Arc::new(SiteEngine::new(
        source,
        registry,
        config.color_format,
        &config.root_domain,
    ));
    let routing = HostRouting::new(config.host_resolver())
        .context("failed to set up host routing")?;

    let listener = tokio::net::TcpListener::bind(&config.listen_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.listen_addr))?;

    tracing::info!(
        "🚀 Serving *.{} on {} (API: {}, colors: {})",
        config.root_domain,
        config.listen_addr,
        config.api_base_url,
        config.color_format
    );

    axum::serve(listener, app(engine, routing))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("✅ Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        // 無法監聽訊號時維持服務運行
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
