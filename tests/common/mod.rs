use std::sync::Once;
use std::time::Duration;

use promptpull::{app, config::Config, AppState};

static INIT_TRACING: Once = Once::new();

pub fn init_test_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "debug".into()),
            )
            .with_test_writer()
            .try_init();
    });
}

/// Config that accepts loopback URLs so wiremock servers pass the allowlist.
pub fn loopback_config(fetch_timeout: Duration) -> Config {
    Config {
        port: 0,
        allowed_domain: "127.0.0.1".to_string(),
        fetch_timeout,
        user_agent: "promptpull-test".to_string(),
        insecure_ssl: false,
    }
}

/// Serves the real router on an ephemeral port and returns its base URL.
pub async fn spawn_app(config: Config) -> String {
    init_test_tracing();
    let state = AppState::new(config).expect("app state");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind test listener");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app(state)).await.expect("serve");
    });
    format!("http://{addr}")
}

/// POSTs a raw JSON body to `/api/extract`, returning status and parsed body.
pub async fn post_extract(base: &str, body: &str) -> (u16, serde_json::Value) {
    let response = reqwest::Client::new()
        .post(format!("{base}/api/extract"))
        .header("content-type", "application/json")
        .body(body.to_string())
        .send()
        .await
        .expect("request to test app");
    let status = response.status().as_u16();
    let text = response.text().await.expect("response body");
    let json = serde_json::from_str(&text).unwrap_or(serde_json::Value::Null);
    (status, json)
}

pub fn url_body(url: &str) -> String {
    serde_json::json!({ "url": url }).to_string()
}
