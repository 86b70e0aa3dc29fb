//! Command-level tests against a mock REST API and a mock ticker stream.

use futures_util::{SinkExt, StreamExt};
use mktscan_app::{AppConfig, AppError, Application};
use mktscan_core::Price;
use rust_decimal_macros::dec;
use serde_json::json;
use std::sync::Mutex;
use tokio::net::TcpListener;
use tokio::sync::Notify;
use tokio_tungstenite::tungstenite::Message;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn mount_catalog(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/api/v3/exchangeInfo"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "symbols": [
                {"symbol": "BTCUSDT", "status": "TRADING", "baseAsset": "BTC", "quoteAsset": "USDT"},
                {"symbol": "ETHUSDT", "status": "TRADING", "baseAsset": "ETH", "quoteAsset": "USDT"},
                {"symbol": "WIFUSDT", "status": "TRADING", "baseAsset": "WIF", "quoteAsset": "USDT"}
            ]
        })))
        .mount(server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/24hr"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"symbol": "BTCUSDT", "lastPrice": "65000.12", "volume": "21000", "quoteVolume": "1365000000", "priceChangePercent": "-1.2"},
            {"symbol": "ETHUSDT", "lastPrice": "3045.67", "volume": "350000", "quoteVolume": "1065000000", "priceChangePercent": "3.14159"},
            {"symbol": "WIFUSDT", "lastPrice": "2.5", "volume": "90000000", "quoteVolume": "225000000", "priceChangePercent": "10"}
        ])))
        .mount(server)
        .await;
}

fn app_for(rest_url: String, ws_url: String) -> Application {
    let config = AppConfig {
        rest_url,
        ws_url,
        watch_count: 2,
        ..Default::default()
    };
    Application::new(config).unwrap()
}

#[tokio::test]
async fn test_top_table_and_json() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let app = app_for(server.uri(), "ws://127.0.0.1:1".to_string());

    let table = app.top(None, false).await.unwrap();
    let rows: Vec<&str> = table.lines().skip(1).collect();
    assert_eq!(rows.len(), 3);
    assert!(rows[0].contains("ETHUSDT"));
    assert!(rows[0].contains("+3.14%"));
    assert!(rows[1].contains("BTCUSDT"));
    assert!(rows[2].contains("WIFUSDT"));

    let json = app.top(Some(1), true).await.unwrap();
    let tokens: serde_json::Value = serde_json::from_str(&json).unwrap();
    let tokens = tokens.as_array().unwrap();
    assert_eq!(tokens.len(), 1);
    assert_eq!(tokens[0]["id"], "ETHUSDT");
    assert_eq!(tokens[0]["current_price"].as_f64(), Some(3045.67));
    assert_eq!(tokens[0]["total_volume"].as_f64(), Some(350000.0));
}

#[tokio::test]
async fn test_top_uses_configured_majors() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let config = AppConfig {
        rest_url: server.uri(),
        major_assets: Some(vec!["WIF".to_string()]),
        ..Default::default()
    };
    let app = Application::new(config).unwrap();

    let table = app.top(None, false).await.unwrap();
    let rows: Vec<&str> = table.lines().skip(1).collect();
    assert!(rows[0].contains("WIFUSDT"));
    // Remaining instruments fall back to volume order.
    assert!(rows[1].contains("ETHUSDT"));
    assert!(rows[2].contains("BTCUSDT"));
}

#[tokio::test]
async fn test_top_with_failed_catalog_is_empty() {
    let server = MockServer::start().await;
    let app = app_for(server.uri(), "ws://127.0.0.1:1".to_string());

    assert_eq!(app.top(None, true).await.unwrap(), "[]");
    assert_eq!(app.top(None, false).await.unwrap().lines().count(), 1);
}

#[tokio::test]
async fn test_single_symbol_commands() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/v3/ticker/price"))
        .and(query_param("symbol", "BTCUSDT"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"symbol": "BTCUSDT", "price": "0.5"})),
        )
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v3/depth"))
        .and(query_param("symbol", "BTCUSDT"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "lastUpdateId": 9,
            "bids": [["64999.90", "1.5"]],
            "asks": [["65000.10", "0.7"]]
        })))
        .mount(&server)
        .await;
    let app = app_for(server.uri(), "ws://127.0.0.1:1".to_string());

    assert_eq!(app.price("btcusdt").await.unwrap(), "BTCUSDT 0.5000");
    assert_eq!(
        app.price("ETHUSDT").await.unwrap(),
        "ETHUSDT: no price available"
    );
    assert_eq!(
        app.market("ETHUSDT").await.unwrap(),
        "ETHUSDT: no market data available"
    );

    let depth = app.depth("BTCUSDT").await.unwrap();
    assert!(depth.starts_with("BTCUSDT (update 9)"));
    assert!(depth.contains("spread 0.2000"));
}

#[tokio::test]
async fn test_watch_defaults_to_top_ranked() {
    let server = MockServer::start().await;
    mount_catalog(&server).await;
    let app = app_for(server.uri(), "ws://127.0.0.1:1".to_string());

    let symbols = app.watch_symbols(Vec::new()).await.unwrap();
    assert_eq!(symbols, vec!["ETHUSDT", "BTCUSDT"]);
}

#[tokio::test]
async fn test_watch_without_symbols_or_catalog_fails() {
    let server = MockServer::start().await;
    let app = app_for(server.uri(), "ws://127.0.0.1:1".to_string());

    let result = app.watch_until(Vec::new(), async {}, |_| {}).await;
    assert!(matches!(result, Err(AppError::NoSymbols)));
}

#[tokio::test]
async fn test_watch_delivers_stream_updates_then_closes() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let ws_url = format!("ws://{}", listener.local_addr().unwrap());

    let server = tokio::spawn(async move {
        let (tcp, _) = listener.accept().await.unwrap();
        let mut ws = tokio_tungstenite::accept_async(tcp).await.unwrap();
        let frame = json!({
            "stream": "btcusdt@ticker",
            "data": {"e": "24hrTicker", "E": 1, "s": "BTCUSDT", "c": "65000.12"}
        });
        ws.send(Message::Text(frame.to_string())).await.unwrap();

        // Hold the connection until the client closes it.
        let mut saw_close = false;
        while let Some(Ok(msg)) = ws.next().await {
            if matches!(msg, Message::Close(_)) {
                saw_close = true;
            }
        }
        saw_close
    });

    let app = app_for("http://127.0.0.1:1".to_string(), ws_url);
    let received = Notify::new();
    let lines = Mutex::new(Vec::new());

    let count = app
        .watch_until(vec!["btcusdt".to_string()], received.notified(), |update| {
            lines
                .lock()
                .unwrap()
                .push((update.symbol.clone(), update.price));
            received.notify_one();
        })
        .await
        .unwrap();

    assert_eq!(count, 1);
    assert_eq!(
        lines.into_inner().unwrap(),
        vec![("BTCUSDT".to_string(), Price::new(dec!(65000.12)))]
    );
    assert!(!app.stream().is_open().await);
    assert!(server.await.unwrap());
}
