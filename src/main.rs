//! HTTP server for the matchmaking service.
//!
//! Endpoints: root status, health, farmer/buyer submission, per-owner notifications,
//! and the debug listing/reset routes. Configuration comes from the environment (see `config`).

use cattle_match::{api, Config};
use log::info;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() {
    let _ = env_logger::try_init();
    let config = Config::from_env();
    info!(
        "starting port={} data_dir={:?} enforce_sex={} enforce_quantity={} strict_validation={}",
        config.port,
        config.data_dir,
        config.rules.enforce_sex,
        config.rules.enforce_quantity,
        config.strict_validation
    );

    let app = api::create_router(&config).expect("open record store");

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = TcpListener::bind(&addr).await.expect("bind");
    eprintln!("listening on http://{}", addr);
    axum::serve(listener, app.into_make_service())
        .await
        .expect("serve");
}
