//! End-to-end order flow: builder -> gateway -> history store, through both
//! the web API (axum oneshot) and the CLI command path.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use mockall::mock;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tower::ServiceExt;

use orderdesk::adapters::SqliteStore;
use orderdesk::api::{create_router, AppState};
use orderdesk::cli;
use orderdesk::config::ExchangeConfig;
use orderdesk::domain::{OrderAck, OrderRequest, OrderSide, OrderType};
use orderdesk::error::{DeskError, Result};
use orderdesk::exchange::FuturesGateway;

/// Gateway test double that records every forwarded request.
struct StubGateway {
    calls: Mutex<Vec<OrderRequest>>,
    fail_with: Option<(i64, String)>,
}

impl StubGateway {
    fn ok() -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_with: None,
        })
    }

    fn rejecting(code: i64, message: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            fail_with: Some((code, message.to_string())),
        })
    }

    fn calls(&self) -> Vec<OrderRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl FuturesGateway for StubGateway {
    fn venue(&self) -> &str {
        "stub"
    }

    fn is_dry_run(&self) -> bool {
        false
    }

    async fn place_order(&self, request: &OrderRequest) -> Result<OrderAck> {
        self.calls.lock().unwrap().push(request.clone());
        if let Some((code, message)) = &self.fail_with {
            return Err(DeskError::Exchange {
                code: *code,
                message: message.clone(),
            });
        }
        Ok(OrderAck {
            order_id: 4242,
            client_order_id: "stub-1".to_string(),
            symbol: request.symbol.clone(),
            side: request.side,
            order_type: request.order_type,
            status: "NEW".to_string(),
            orig_qty: request.quantity,
            executed_qty: Decimal::ZERO,
            avg_price: None,
        })
    }

    async fn ping(&self) -> Result<()> {
        Ok(())
    }
}

async fn test_state(gateway: Arc<StubGateway>) -> (AppState, Arc<SqliteStore>) {
    let store = Arc::new(SqliteStore::in_memory().await.unwrap());
    let state = AppState::new(
        store.clone(),
        gateway,
        ExchangeConfig::default(),
        false,
    );
    (state, store)
}

async fn send_json(
    app: axum::Router,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let builder = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(json) => builder
            .header("content-type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

#[tokio::test]
async fn place_order_returns_ack_and_records_history() {
    let gateway = StubGateway::ok();
    let (state, _store) = test_state(gateway.clone()).await;
    let app = create_router(state);

    let (status, body) = send_json(
        app.clone(),
        "POST",
        "/api/orders",
        Some(serde_json::json!({
            "symbol": "btcusdt",
            "side": "buy",
            "type": "market",
            "quantity": "0.01"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["symbol"], "BTCUSDT");
    assert_eq!(body["side"], "BUY");
    assert_eq!(body["type"], "MARKET");
    assert_eq!(body["order_id"], 4242);

    let (status, body) = send_json(app, "GET", "/api/orders", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["total"], 1);
    assert_eq!(body["orders"][0]["symbol"], "BTCUSDT");
    assert_eq!(body["orders"][0]["status"], "NEW");
}

#[tokio::test]
async fn market_order_forwards_minimal_field_set() {
    let gateway = StubGateway::ok();
    let (state, _store) = test_state(gateway.clone()).await;
    let app = create_router(state);

    // Incidental price on a MARKET order must not reach the gateway.
    let (status, _) = send_json(
        app,
        "POST",
        "/api/orders",
        Some(serde_json::json!({
            "symbol": "BTCUSDT",
            "side": "BUY",
            "type": "MARKET",
            "quantity": "0.01",
            "price": "50000"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let calls = gateway.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].price, None);
    assert_eq!(calls[0].stop_price, None);
    assert_eq!(calls[0].time_in_force, None);
}

#[tokio::test]
async fn invalid_side_is_rejected_before_the_gateway() {
    let gateway = StubGateway::ok();
    let (state, _store) = test_state(gateway.clone()).await;
    let app = create_router(state);

    let (status, body) = send_json(
        app,
        "POST",
        "/api/orders",
        Some(serde_json::json!({
            "symbol": "BTCUSDT",
            "side": "HOLD",
            "type": "MARKET",
            "quantity": "0.01"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "side");
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn missing_limit_price_names_the_field() {
    let gateway = StubGateway::ok();
    let (state, _store) = test_state(gateway.clone()).await;
    let app = create_router(state);

    let (status, body) = send_json(
        app,
        "POST",
        "/api/orders",
        Some(serde_json::json!({
            "symbol": "BTCUSDT",
            "side": "BUY",
            "type": "LIMIT",
            "quantity": "0.01"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["field"], "price");
    assert!(gateway.calls().is_empty());
}

#[tokio::test]
async fn venue_rejection_maps_to_bad_gateway_and_is_recorded() {
    let gateway = StubGateway::rejecting(-2019, "Margin is insufficient.");
    let (state, _store) = test_state(gateway.clone()).await;
    let app = create_router(state);

    let (status, body) = send_json(
        app.clone(),
        "POST",
        "/api/orders",
        Some(serde_json::json!({
            "symbol": "BTCUSDT",
            "side": "SELL",
            "type": "STOP_MARKET",
            "quantity": "0.002",
            "stop_price": "65000"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["exchange_code"], -2019);

    // The rejection still lands in the history log.
    let (_, body) = send_json(app, "GET", "/api/orders", None).await;
    assert_eq!(body["total"], 1);
    assert_eq!(body["orders"][0]["status"], "REJECTED");
}

#[tokio::test]
async fn settings_update_masks_the_secret() {
    let gateway = StubGateway::ok();
    let (state, _store) = test_state(gateway).await;
    let app = create_router(state);

    let (status, _) = send_json(
        app.clone(),
        "PUT",
        "/api/settings",
        Some(serde_json::json!({
            "api_key": "test-key",
            "api_secret": "super-secret"
        })),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = send_json(app, "GET", "/api/settings", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["api_key"], "test-key");
    assert_eq!(body["has_secret"], true);
    assert!(body.get("api_secret").is_none());
}

#[tokio::test]
async fn system_status_reports_venue_and_db() {
    let gateway = StubGateway::ok();
    let (state, _store) = test_state(gateway).await;
    let app = create_router(state);

    let (status, body) = send_json(app, "GET", "/api/system/status", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["venue"], "stub");
    assert_eq!(body["db"], "connected");
    assert_eq!(body["testnet"], true);
}

// ============================================================================
// CLI command path
// ============================================================================

mock! {
    Gateway {}

    #[async_trait]
    impl FuturesGateway for Gateway {
        fn venue(&self) -> &str;
        fn is_dry_run(&self) -> bool;
        async fn place_order(&self, request: &OrderRequest) -> Result<OrderAck>;
        async fn ping(&self) -> Result<()>;
    }
}

#[tokio::test]
async fn cli_order_places_and_records() {
    let store = SqliteStore::in_memory().await.unwrap();

    let mut gateway = MockGateway::new();
    gateway.expect_is_dry_run().return_const(false);
    gateway.expect_place_order().returning(|request| {
        Ok(OrderAck {
            order_id: 7,
            client_order_id: "cli-1".to_string(),
            symbol: request.symbol.clone(),
            side: request.side,
            order_type: request.order_type,
            status: "FILLED".to_string(),
            orig_qty: request.quantity,
            executed_qty: request.quantity,
            avg_price: Some(dec!(2000)),
        })
    });

    cli::order::run(
        &gateway,
        &store,
        cli::order::OrderArgs {
            symbol: "ethusdt".to_string(),
            side: "sell".to_string(),
            order_type: "limit".to_string(),
            quantity: dec!(1.5),
            price: Some(dec!(2000)),
            stop_price: None,
            json: false,
        },
    )
    .await
    .unwrap();

    let orders = store.list_orders(10).await.unwrap();
    assert_eq!(orders.len(), 1);
    assert_eq!(orders[0].symbol, "ETHUSDT");
    assert_eq!(orders[0].side, OrderSide::Sell);
    assert_eq!(orders[0].order_type, OrderType::Limit);
    assert_eq!(orders[0].price, Some(dec!(2000)));
    assert_eq!(orders[0].status, "FILLED");
}

#[tokio::test]
async fn cli_order_rejects_invalid_input_without_calling_the_gateway() {
    let store = SqliteStore::in_memory().await.unwrap();

    // No expectations: any gateway call would panic the test.
    let gateway = MockGateway::new();

    let err = cli::order::run(
        &gateway,
        &store,
        cli::order::OrderArgs {
            symbol: "BTC-USDT".to_string(),
            side: "buy".to_string(),
            order_type: "market".to_string(),
            quantity: dec!(0.01),
            price: None,
            stop_price: None,
            json: false,
        },
    )
    .await
    .unwrap_err();

    assert!(err.is_validation());
    assert!(store.list_orders(10).await.unwrap().is_empty());
}
