//! Text frame decoding for the realtime feed.
//!
//! Socket.IO over Engine.IO v4 prefixes every text frame with packet type
//! digits: `0` open, `2` ping, `3` pong, `4x` Socket.IO packets where `x` is
//! `0` connect, `1` disconnect, `2` event, `4` connect error. An event looks
//! like `42/namespace,17["newOrder",{...}]`, where namespace and ack id are
//! both optional. Servers that skip Socket.IO send bare JSON objects
//! instead: `{"event": "newOrder", "data": {...}}` (`type`/`payload` are
//! accepted as aliases).

use serde::Deserialize;
use serde_json::Value;

use crate::infrastructure::config::realtime::FeedProtocol;

/// Engine.IO reply to an open packet: connect to the default namespace.
pub const CONNECT_REPLY: &str = "40";
/// Engine.IO reply to a ping.
pub const PONG_REPLY: &str = "3";

/// A decoded text frame.
#[derive(Debug, Clone, PartialEq)]
pub enum Frame {
    /// Engine.IO open handshake; the client must answer [`CONNECT_REPLY`].
    Open,
    /// Engine.IO ping; the client must answer [`PONG_REPLY`].
    Ping,
    /// Namespace connect acknowledged.
    Connected,
    /// Server-side disconnect (Engine.IO close or Socket.IO disconnect).
    Disconnect,
    /// Namespace connect refused.
    ConnectError(String),
    /// Named event with its first argument (or `null`).
    Event { name: String, data: Value },
    /// Anything the feed does not act on (pongs, acks, upgrades, noops).
    Ignored,
}

#[derive(Deserialize)]
struct JsonEvent {
    #[serde(alias = "type")]
    event: String,
    #[serde(default, alias = "payload")]
    data: Value,
}

/// Decode one text frame.
///
/// # Errors
///
/// Returns a description of the problem when the frame claims to carry an
/// event but its body is not valid.
pub fn parse_frame(text: &str, protocol: FeedProtocol) -> Result<Frame, String> {
    let text = text.trim();
    if text.starts_with('{') {
        return parse_json_event(text);
    }
    match protocol {
        FeedProtocol::Json => Ok(Frame::Ignored),
        FeedProtocol::SocketIo => parse_engine_io(text),
    }
}

fn parse_json_event(text: &str) -> Result<Frame, String> {
    let event: JsonEvent =
        serde_json::from_str(text).map_err(|e| format!("invalid JSON event frame: {e}"))?;
    Ok(Frame::Event {
        name: event.event,
        data: event.data,
    })
}

fn parse_engine_io(text: &str) -> Result<Frame, String> {
    let mut chars = text.chars();
    let Some(kind) = chars.next() else {
        return Ok(Frame::Ignored);
    };
    let rest = chars.as_str();
    match kind {
        '0' => Ok(Frame::Open),
        '1' => Ok(Frame::Disconnect),
        '2' => Ok(Frame::Ping),
        '4' => parse_socket_io(rest),
        _ => Ok(Frame::Ignored),
    }
}

fn parse_socket_io(packet: &str) -> Result<Frame, String> {
    let mut chars = packet.chars();
    let Some(kind) = chars.next() else {
        return Ok(Frame::Ignored);
    };
    let body = skip_namespace(chars.as_str());
    match kind {
        '0' => Ok(Frame::Connected),
        '1' => Ok(Frame::Disconnect),
        '2' => parse_event(body),
        '4' => {
            let message = serde_json::from_str::<Value>(body)
                .ok()
                .and_then(|v| v.get("message").and_then(Value::as_str).map(String::from))
                .unwrap_or_else(|| body.to_string());
            Ok(Frame::ConnectError(message))
        }
        _ => Ok(Frame::Ignored),
    }
}

/// Strip `/namespace,` when present.
fn skip_namespace(body: &str) -> &str {
    if body.starts_with('/') {
        match body.find(',') {
            Some(idx) => &body[idx + 1..],
            None => "",
        }
    } else {
        body
    }
}

fn parse_event(body: &str) -> Result<Frame, String> {
    let json = body.trim_start_matches(|c: char| c.is_ascii_digit());
    let args: Vec<Value> =
        serde_json::from_str(json).map_err(|e| format!("invalid event packet: {e}"))?;
    let mut args = args.into_iter();
    let name = match args.next() {
        Some(Value::String(name)) => name,
        _ => return Err("event packet without a name".into()),
    };
    Ok(Frame::Event {
        name,
        data: args.next().unwrap_or(Value::Null),
    })
}
