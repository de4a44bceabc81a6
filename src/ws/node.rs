//! NewBlock subscription against a node's websocket RPC.
//!
//! Opens one subscription and then blocks on the read half for the life of
//! the process. There is intentionally no reconnect, no backoff, and no
//! delivery queue here: if the stream drops, the process exits and the
//! supervisor restarts it. Alerts are disposable.

use crate::config::Config;
use crate::events::BlockEvents;
use crate::notify::AlertSink;
use crate::ws::WsError;
use futures_util::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{info, warn};
use url::Url;

const NEW_BLOCK_QUERY: &str = "tm.event='NewBlock'";

/// JSON-RPC envelope for frames arriving on the subscription.
#[derive(Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<RpcResult>,
}

#[derive(Deserialize)]
struct RpcResult {
    /// Flat event map carried by NewBlock frames; absent on the subscribe
    /// confirmation.
    #[serde(default)]
    events: Option<serde_json::Value>,
}

/// Derive the websocket endpoint from the node's RPC address.
pub fn websocket_url(node_url: &str) -> Result<Url, WsError> {
    let url = Url::parse(node_url)?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        other => return Err(WsError::Scheme(other.to_string())),
    };
    let host = url.host_str().unwrap_or("localhost");

    let endpoint = match url.port() {
        Some(port) => format!("{}://{}:{}/websocket", scheme, host, port),
        None => format!("{}://{}/websocket", scheme, host),
    };
    Ok(Url::parse(&endpoint)?)
}

/// Subscribe to NewBlock events and forward every auction-start alert to
/// `sink`, one at a time, in the order the node emitted them.
///
/// Returns only on a fatal transport failure; the steady state loops
/// forever. Connection and subscription errors are startup failures and
/// are not retried.
pub async fn run(config: &Config, sink: &dyn AlertSink) -> Result<(), WsError> {
    let url = websocket_url(&config.node_url)?;

    info!(url = %url, "connecting to node");
    let (ws_stream, _response) = connect_async(url.as_str()).await?;
    let (mut write, mut read) = ws_stream.split();

    let sub_msg = serde_json::json!({
        "jsonrpc": "2.0",
        "method": "subscribe",
        "id": "0",
        "params": { "query": NEW_BLOCK_QUERY },
    });
    write.send(Message::Text(sub_msg.to_string())).await?;

    info!(query = NEW_BLOCK_QUERY, "listening for new blocks");

    while let Some(msg) = read.next().await {
        match msg? {
            Message::Text(text) => {
                process_frame(&text, sink).await;
            }
            Message::Ping(data) => {
                let _ = write.send(Message::Pong(data)).await;
            }
            Message::Close(frame) => {
                info!(frame = ?frame, "node closed the subscription");
                break;
            }
            _ => {}
        }
    }

    Err(WsError::Closed)
}

/// Decode one subscription frame and forward any auction-start alerts.
///
/// Frames that carry no event map (the subscribe confirmation) are skipped
/// silently. Frames whose payload does not match the expected schema are
/// logged and skipped; one malformed batch must not take the listener
/// down.
async fn process_frame(text: &str, sink: &dyn AlertSink) {
    let events = match decode_frame(text) {
        Ok(Some(events)) => events,
        Ok(None) => return,
        Err(e) => {
            warn!(error = %e, "skipping undecodable event batch");
            return;
        }
    };

    for alert in events.auction_starts() {
        info!(
            auction_id = %alert.id,
            auction_type = %alert.auction_type,
            "new auction started"
        );
        sink.deliver(&alert.to_string()).await;
    }
}

fn decode_frame(text: &str) -> Result<Option<BlockEvents>, serde_json::Error> {
    let envelope: RpcEnvelope = serde_json::from_str(text)?;
    match envelope.result.and_then(|result| result.events) {
        Some(events) => BlockEvents::from_value(events).map(Some),
        None => Ok(None),
    }
}
