//! Binance USDⓈ-M futures REST adapter (native, no external SDK dependency).
//!
//! Signed endpoints follow the exchange's HMAC scheme: the query string is
//! signed with HMAC-SHA256, the hex digest is appended as `signature`, and the
//! API key travels in the `X-MBX-APIKEY` header.

use async_trait::async_trait;
use chrono::Utc;
use hmac::{Hmac, Mac};
use reqwest::{Client, Method, StatusCode};
use rust_decimal::Decimal;
use serde::Deserialize;
use sha2::Sha256;
use tracing::{debug, info};

use crate::domain::{OrderAck, OrderRequest};
use crate::error::{DeskError, Result};
use crate::exchange::{Credentials, FuturesGateway};

pub const TESTNET_API_BASE: &str = "https://testnet.binancefuture.com";
pub const MAINNET_API_BASE: &str = "https://fapi.binance.com";

const DEFAULT_RECV_WINDOW_MS: u64 = 5_000;

type HmacSha256 = Hmac<Sha256>;

#[derive(Clone)]
pub struct BinanceFuturesClient {
    http: Client,
    base_url: String,
    credentials: Option<Credentials>,
    recv_window_ms: u64,
    dry_run: bool,
}

/// Order endpoint response. The exchange sends price-like numbers as strings.
#[derive(Debug, Deserialize)]
struct FutPlacedOrder {
    #[serde(rename = "orderId")]
    order_id: i64,
    #[serde(rename = "clientOrderId")]
    client_order_id: String,
    symbol: String,
    status: String,
    #[serde(rename = "origQty")]
    orig_qty: Decimal,
    #[serde(rename = "executedQty")]
    executed_qty: Decimal,
    #[serde(rename = "avgPrice", default)]
    avg_price: Option<Decimal>,
}

/// Error payload for rejected requests: `{"code": -1121, "msg": "..."}`.
#[derive(Debug, Deserialize)]
struct ApiError {
    code: i64,
    msg: String,
}

impl BinanceFuturesClient {
    pub fn new(
        base_url: &str,
        credentials: Option<Credentials>,
        recv_window_ms: u64,
    ) -> Result<Self> {
        Self::build(base_url, credentials, recv_window_ms, false)
    }

    /// A gateway that logs and acknowledges locally instead of submitting.
    pub fn dry_run(base_url: &str) -> Result<Self> {
        Self::build(base_url, None, DEFAULT_RECV_WINDOW_MS, true)
    }

    fn build(
        base_url: &str,
        credentials: Option<Credentials>,
        recv_window_ms: u64,
        dry_run: bool,
    ) -> Result<Self> {
        let http = Client::builder()
            .user_agent(concat!("orderdesk/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| DeskError::Internal(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            recv_window_ms,
            dry_run,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn sign(&self, query: &str) -> Result<String> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| {
                DeskError::Auth(
                    "API credentials not configured; run `orderdesk setup` or set \
                     BINANCE_API_KEY/BINANCE_API_SECRET"
                        .to_string(),
                )
            })?;

        let mut mac = HmacSha256::new_from_slice(credentials.api_secret.as_bytes())
            .map_err(|e| DeskError::Auth(format!("invalid API secret: {}", e)))?;
        mac.update(query.as_bytes());
        Ok(hex::encode(mac.finalize().into_bytes()))
    }

    async fn signed_request(&self, method: Method, path: &str, mut query: Vec<(String, String)>) -> Result<String> {
        let credentials = self
            .credentials
            .as_ref()
            .ok_or_else(|| {
                DeskError::Auth(
                    "API credentials not configured; run `orderdesk setup` or set \
                     BINANCE_API_KEY/BINANCE_API_SECRET"
                        .to_string(),
                )
            })?;

        query.push(("recvWindow".to_string(), self.recv_window_ms.to_string()));
        query.push((
            "timestamp".to_string(),
            Utc::now().timestamp_millis().to_string(),
        ));

        let qs = encode_query(&query);
        let signature = self.sign(&qs)?;
        let url = format!("{}{}?{}&signature={}", self.base_url, path, qs, signature);

        debug!(%path, "sending signed request");

        let resp = self
            .http
            .request(method, &url)
            .header("X-MBX-APIKEY", &credentials.api_key)
            .send()
            .await?;

        Self::read_body(resp).await
    }

    async fn read_body(resp: reqwest::Response) -> Result<String> {
        let status = resp.status();
        let text = resp.text().await?;

        if status.is_success() {
            return Ok(text);
        }

        // Rejections carry a venue error code; surface it unchanged.
        if let Ok(err) = serde_json::from_str::<ApiError>(&text) {
            return Err(DeskError::Exchange {
                code: err.code,
                message: err.msg,
            });
        }

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(DeskError::Internal(format!(
                "exchange rate limited the request: {}",
                text
            )));
        }

        Err(DeskError::Internal(format!(
            "exchange request failed: status={} body={}",
            status, text
        )))
    }

    fn simulated_ack(request: &OrderRequest) -> OrderAck {
        OrderAck {
            order_id: 0,
            client_order_id: "dry-run".to_string(),
            symbol: request.symbol.clone(),
            side: request.side,
            order_type: request.order_type,
            status: "NEW".to_string(),
            orig_qty: request.quantity,
            executed_qty: Decimal::ZERO,
            avg_price: None,
        }
    }
}

/// Serialize an [`OrderRequest`] into the exchange's query parameters.
///
/// Only here do decimals become strings; absent optional fields produce no
/// pair at all, so the signed query never mentions a field the order type
/// does not use.
fn order_query_pairs(request: &OrderRequest) -> Vec<(String, String)> {
    let mut pairs = vec![
        ("symbol".to_string(), request.symbol.clone()),
        ("side".to_string(), request.side.as_str().to_string()),
        ("type".to_string(), request.order_type.as_str().to_string()),
        ("quantity".to_string(), request.quantity.to_string()),
    ];

    if let Some(price) = request.price {
        pairs.push(("price".to_string(), price.to_string()));
    }
    if let Some(stop_price) = request.stop_price {
        pairs.push(("stopPrice".to_string(), stop_price.to_string()));
    }
    if let Some(tif) = request.time_in_force {
        pairs.push(("timeInForce".to_string(), tif.as_str().to_string()));
    }

    pairs
}

fn encode_query(pairs: &[(String, String)]) -> String {
    pairs
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&")
}

#[async_trait]
impl FuturesGateway for BinanceFuturesClient {
    fn venue(&self) -> &str {
        "binance-futures"
    }

    fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    async fn place_order(&self, request: &OrderRequest) -> Result<OrderAck> {
        if self.dry_run {
            info!(
                symbol = %request.symbol,
                side = %request.side,
                order_type = %request.order_type,
                quantity = %request.quantity,
                "DRY RUN: would submit order"
            );
            return Ok(Self::simulated_ack(request));
        }

        let pairs = order_query_pairs(request);
        let body = self
            .signed_request(Method::POST, "/fapi/v1/order", pairs)
            .await?;

        let placed: FutPlacedOrder = serde_json::from_str(&body)
            .map_err(|e| DeskError::Internal(format!("invalid order response: {}", e)))?;

        info!(
            order_id = placed.order_id,
            symbol = %placed.symbol,
            status = %placed.status,
            "order placed"
        );

        Ok(OrderAck {
            order_id: placed.order_id,
            client_order_id: placed.client_order_id,
            symbol: placed.symbol,
            side: request.side,
            order_type: request.order_type,
            status: placed.status,
            orig_qty: placed.orig_qty,
            executed_qty: placed.executed_qty,
            // The exchange reports 0 until something fills.
            avg_price: placed.avg_price.filter(|p| !p.is_zero()),
        })
    }

    async fn ping(&self) -> Result<()> {
        let url = format!("{}/fapi/v1/ping", self.base_url);
        let resp = self.http.get(&url).send().await?;
        Self::read_body(resp).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::OrderIntent;
    use rust_decimal_macros::dec;

    fn client_with_secret(secret: &str) -> BinanceFuturesClient {
        BinanceFuturesClient::new(
            TESTNET_API_BASE,
            Some(Credentials {
                api_key: "key".to_string(),
                api_secret: secret.to_string(),
            }),
            DEFAULT_RECV_WINDOW_MS,
        )
        .unwrap()
    }

    #[test]
    fn signature_matches_documented_example() {
        // Test vector from the exchange's signed-endpoint documentation.
        let client =
            client_with_secret("NhqPtmdSJYdKjVHjA7PZj4Mge3R5YNiP1e3UZjInClVN65XAbvqqM6A7H5fATj0j");
        let query = "symbol=LTCBTC&side=BUY&type=LIMIT&timeInForce=GTC&quantity=1&price=0.1&recvWindow=5000&timestamp=1499827319559";
        assert_eq!(
            client.sign(query).unwrap(),
            "c8db56825ae71d6d79447849e617115f4a920fa2acdcab2b053c4b2838bd6b71"
        );
    }

    #[test]
    fn market_order_query_has_no_optional_fields() {
        let request = OrderRequest::build(&OrderIntent::new("btcusdt", "buy", "market", dec!(0.01)))
            .unwrap();
        let pairs = order_query_pairs(&request);
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["symbol", "side", "type", "quantity"]);
        assert_eq!(encode_query(&pairs), "symbol=BTCUSDT&side=BUY&type=MARKET&quantity=0.01");
    }

    #[test]
    fn limit_order_query_carries_price_and_tif() {
        let request = OrderRequest::build(
            &OrderIntent::new("ETHUSDT", "SELL", "LIMIT", dec!(1.5)).with_price(dec!(2000)),
        )
        .unwrap();
        let pairs = order_query_pairs(&request);
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["symbol", "side", "type", "quantity", "price", "timeInForce"]);
    }

    #[test]
    fn stop_market_order_query_carries_stop_price_only() {
        let request = OrderRequest::build(
            &OrderIntent::new("BTCUSDT", "BUY", "STOP_MARKET", dec!(0.002))
                .with_stop_price(dec!(65000)),
        )
        .unwrap();
        let pairs = order_query_pairs(&request);
        let keys: Vec<&str> = pairs.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(keys, ["symbol", "side", "type", "quantity", "stopPrice"]);
    }

    #[tokio::test]
    async fn dry_run_acknowledges_without_network() {
        let client = BinanceFuturesClient::dry_run(TESTNET_API_BASE).unwrap();
        let request = OrderRequest::build(&OrderIntent::new("btcusdt", "buy", "market", dec!(0.01)))
            .unwrap();

        let ack = client.place_order(&request).await.unwrap();
        assert!(client.is_dry_run());
        assert_eq!(ack.symbol, "BTCUSDT");
        assert_eq!(ack.orig_qty, dec!(0.01));
        assert_eq!(ack.executed_qty, Decimal::ZERO);
    }
}
