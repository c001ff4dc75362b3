#[tokio::main]
async fn main() -> anyhow::Result<()> {
    clubhub_observability::init();

    let jwt_secret = std::env::var("JWT_SECRET").unwrap_or_else(|_| {
        tracing::warn!("JWT_SECRET not set; using insecure dev default");
        "dev-secret".to_string()
    });

    let addr = std::env::var("CLUBHUB_ADDR").unwrap_or_else(|_| "0.0.0.0:8080".to_string());

    let app = clubhub_api::app::build_app(jwt_secret);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}
