pub mod node;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WsError {
    #[error("websocket connection failed: {0}")]
    Connection(#[from] tokio_tungstenite::tungstenite::Error),
    #[error("url parse error: {0}")]
    Url(#[from] url::ParseError),
    #[error("unsupported node url scheme: {0}")]
    Scheme(String),
    #[error("subscription stream ended")]
    Closed,
}
