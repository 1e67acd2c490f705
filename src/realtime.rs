//! 直播聊天实时通道
//!
//! 后端使用 Socket.IO（Engine.IO v4 + Socket.IO v5，WebSocket 传输）。
//! 这里只实现文本帧的编解码与 `/live-comments` 命名空间的会话逻辑，
//! 不涉及任何 I/O：调用方把收到的文本帧交给 [`LiveCommentsChannel::on_frame`]，
//! 再把返回的帧写回 WebSocket。
//!
//! 连接断开后不会自动重连，状态停在 [`ChannelStatus::Closed`]。

use serde::Deserialize;
use serde_json::{Value, json};
use thiserror::Error;
use vidshare_shared::{Comment, LIVE_COMMENTS_NAMESPACE};

const EVENT_JOIN: &str = "join-video";
const EVENT_NEW_COMMENT: &str = "new-comment";
const EVENT_COMMENT_DELETED: &str = "comment-deleted";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameError {
    #[error("empty frame")]
    Empty,
    #[error("unknown packet type '{0}'")]
    UnknownType(char),
    #[error("invalid payload: {0}")]
    Payload(String),
}

// =========================================================
// Engine.IO 帧
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub enum EnginePacket {
    /// 握手：`0{"sid":..,"pingInterval":..}`
    Open(Value),
    Close,
    Ping(String),
    Pong(String),
    /// 携带一个 Socket.IO 包
    Message(String),
    Upgrade,
    Noop,
}

impl EnginePacket {
    pub fn decode(frame: &str) -> Result<Self, FrameError> {
        let mut chars = frame.chars();
        let kind = chars.next().ok_or(FrameError::Empty)?;
        let rest = chars.as_str();
        Ok(match kind {
            '0' => EnginePacket::Open(
                serde_json::from_str(rest).map_err(|e| FrameError::Payload(e.to_string()))?,
            ),
            '1' => EnginePacket::Close,
            '2' => EnginePacket::Ping(rest.to_string()),
            '3' => EnginePacket::Pong(rest.to_string()),
            '4' => EnginePacket::Message(rest.to_string()),
            '5' => EnginePacket::Upgrade,
            '6' => EnginePacket::Noop,
            other => return Err(FrameError::UnknownType(other)),
        })
    }

    pub fn encode(&self) -> String {
        match self {
            EnginePacket::Open(data) => format!("0{data}"),
            EnginePacket::Close => "1".to_string(),
            EnginePacket::Ping(data) => format!("2{data}"),
            EnginePacket::Pong(data) => format!("3{data}"),
            EnginePacket::Message(data) => format!("4{data}"),
            EnginePacket::Upgrade => "5".to_string(),
            EnginePacket::Noop => "6".to_string(),
        }
    }
}

// =========================================================
// Socket.IO 包
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub enum SocketPacket {
    Connect {
        namespace: String,
        data: Option<Value>,
    },
    Disconnect {
        namespace: String,
    },
    Event {
        namespace: String,
        id: Option<u64>,
        name: String,
        args: Vec<Value>,
    },
    Ack {
        namespace: String,
        id: u64,
        args: Vec<Value>,
    },
    ConnectError {
        namespace: String,
        data: Option<Value>,
    },
}

impl SocketPacket {
    pub fn event(namespace: &str, name: &str, payload: Value) -> Self {
        SocketPacket::Event {
            namespace: namespace.to_string(),
            id: None,
            name: name.to_string(),
            args: vec![payload],
        }
    }

    pub fn namespace(&self) -> &str {
        match self {
            SocketPacket::Connect { namespace, .. }
            | SocketPacket::Disconnect { namespace }
            | SocketPacket::Event { namespace, .. }
            | SocketPacket::Ack { namespace, .. }
            | SocketPacket::ConnectError { namespace, .. } => namespace,
        }
    }

    /// 解析 Engine.IO message 帧中的 Socket.IO 包
    ///
    /// 格式：`<type>[/<namespace>,][<ack id>][<json>]`
    pub fn decode(packet: &str) -> Result<Self, FrameError> {
        let mut chars = packet.chars();
        let kind = chars.next().ok_or(FrameError::Empty)?;
        let mut rest = chars.as_str();

        let namespace = if rest.starts_with('/') {
            let end = rest.find(',').unwrap_or(rest.len());
            let ns = &rest[..end];
            rest = rest.get(end + 1..).unwrap_or("");
            ns.to_string()
        } else {
            "/".to_string()
        };

        let digits = rest.find(|c: char| !c.is_ascii_digit()).unwrap_or(rest.len());
        let id = if digits > 0 {
            rest[..digits].parse::<u64>().ok()
        } else {
            None
        };
        rest = &rest[digits..];

        let data = if rest.is_empty() {
            None
        } else {
            Some(
                serde_json::from_str::<Value>(rest)
                    .map_err(|e| FrameError::Payload(e.to_string()))?,
            )
        };

        match kind {
            '0' => Ok(SocketPacket::Connect { namespace, data }),
            '1' => Ok(SocketPacket::Disconnect { namespace }),
            '2' => {
                let mut args = match data {
                    Some(Value::Array(items)) => items,
                    _ => return Err(FrameError::Payload("event without arguments".to_string())),
                };
                if args.is_empty() {
                    return Err(FrameError::Payload("event without name".to_string()));
                }
                let name = match args.remove(0) {
                    Value::String(name) => name,
                    other => return Err(FrameError::Payload(format!("event name {other}"))),
                };
                Ok(SocketPacket::Event {
                    namespace,
                    id,
                    name,
                    args,
                })
            }
            '3' => {
                let id = id.ok_or_else(|| FrameError::Payload("ack without id".to_string()))?;
                let args = match data {
                    Some(Value::Array(items)) => items,
                    _ => Vec::new(),
                };
                Ok(SocketPacket::Ack {
                    namespace,
                    id,
                    args,
                })
            }
            '4' => Ok(SocketPacket::ConnectError { namespace, data }),
            other => Err(FrameError::UnknownType(other)),
        }
    }

    pub fn encode(&self) -> String {
        fn prefix(kind: u8, namespace: &str) -> String {
            if namespace == "/" {
                kind.to_string()
            } else {
                format!("{kind}{namespace},")
            }
        }

        match self {
            SocketPacket::Connect { namespace, data } => {
                let mut out = prefix(0, namespace);
                if let Some(data) = data {
                    out.push_str(&data.to_string());
                }
                out
            }
            SocketPacket::Disconnect { namespace } => prefix(1, namespace),
            SocketPacket::Event {
                namespace,
                id,
                name,
                args,
            } => {
                let mut out = prefix(2, namespace);
                if let Some(id) = id {
                    out.push_str(&id.to_string());
                }
                let mut items = vec![Value::String(name.clone())];
                items.extend(args.iter().cloned());
                out.push_str(&Value::Array(items).to_string());
                out
            }
            SocketPacket::Ack {
                namespace,
                id,
                args,
            } => format!("{}{}{}", prefix(3, namespace), id, Value::Array(args.clone())),
            SocketPacket::ConnectError { namespace, data } => {
                let mut out = prefix(4, namespace);
                if let Some(data) = data {
                    out.push_str(&data.to_string());
                }
                out
            }
        }
    }

    /// 包装为 Engine.IO message 帧
    pub fn to_frame(&self) -> String {
        EnginePacket::Message(self.encode()).encode()
    }
}

// =========================================================
// /live-comments 通道
// =========================================================

#[derive(Debug, Clone, PartialEq)]
pub enum ChatEvent {
    NewComment(Comment),
    CommentDeleted { comment_id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChannelStatus {
    #[default]
    Connecting,
    Joined,
    Closed,
}

/// 一次 `on_frame` 的结果：需要写回的帧与解析出的聊天事件
#[derive(Debug, Default, PartialEq)]
pub struct ChannelOutput {
    pub outgoing: Vec<String>,
    pub events: Vec<ChatEvent>,
}

#[derive(Deserialize)]
struct DeletedPayload {
    #[serde(rename = "commentId")]
    comment_id: String,
}

#[derive(Debug, Clone)]
pub struct LiveCommentsChannel {
    video_id: String,
    status: ChannelStatus,
}

impl LiveCommentsChannel {
    pub fn new(video_id: impl Into<String>) -> Self {
        Self {
            video_id: video_id.into(),
            status: ChannelStatus::Connecting,
        }
    }

    pub fn status(&self) -> ChannelStatus {
        self.status
    }

    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    fn join_frame(&self) -> String {
        SocketPacket::event(
            LIVE_COMMENTS_NAMESPACE,
            EVENT_JOIN,
            json!({ "videoId": self.video_id }),
        )
        .to_frame()
    }

    pub fn on_frame(&mut self, frame: &str) -> ChannelOutput {
        let mut output = ChannelOutput::default();
        if self.status == ChannelStatus::Closed {
            return output;
        }

        let packet = match EnginePacket::decode(frame) {
            Ok(packet) => packet,
            Err(e) => {
                tracing::warn!(error = %e, "dropping malformed engine frame");
                return output;
            }
        };

        match packet {
            EnginePacket::Open(_) => {
                output.outgoing.push(
                    SocketPacket::Connect {
                        namespace: LIVE_COMMENTS_NAMESPACE.to_string(),
                        data: None,
                    }
                    .to_frame(),
                );
            }
            EnginePacket::Ping(data) => output.outgoing.push(EnginePacket::Pong(data).encode()),
            EnginePacket::Close => self.close(),
            EnginePacket::Message(payload) => self.on_packet(&payload, &mut output),
            EnginePacket::Pong(_) | EnginePacket::Upgrade | EnginePacket::Noop => {}
        }
        output
    }

    fn on_packet(&mut self, payload: &str, output: &mut ChannelOutput) {
        let packet = match SocketPacket::decode(payload) {
            Ok(packet) => packet,
            Err(e) => {
                tracing::warn!(error = %e, "dropping malformed socket packet");
                return;
            }
        };
        if packet.namespace() != LIVE_COMMENTS_NAMESPACE {
            return;
        }

        match packet {
            SocketPacket::Connect { .. } => {
                self.status = ChannelStatus::Joined;
                tracing::debug!(video_id = %self.video_id, "joined live comments");
                output.outgoing.push(self.join_frame());
            }
            SocketPacket::Disconnect { .. } => self.close(),
            SocketPacket::ConnectError { data, .. } => {
                tracing::warn!(?data, "live comments namespace refused");
                self.close();
            }
            SocketPacket::Event { name, mut args, .. } => {
                if args.is_empty() {
                    return;
                }
                let payload = args.swap_remove(0);
                match name.as_str() {
                    EVENT_NEW_COMMENT => match serde_json::from_value::<Comment>(payload) {
                        Ok(comment) => output.events.push(ChatEvent::NewComment(comment)),
                        Err(e) => tracing::warn!(error = %e, "invalid new-comment payload"),
                    },
                    EVENT_COMMENT_DELETED => match serde_json::from_value::<DeletedPayload>(payload) {
                        Ok(p) => output.events.push(ChatEvent::CommentDeleted {
                            comment_id: p.comment_id,
                        }),
                        Err(e) => tracing::warn!(error = %e, "invalid comment-deleted payload"),
                    },
                    _ => {}
                }
            }
            SocketPacket::Ack { .. } => {}
        }
    }

    /// 已加入时切换视频，立即重新发送 join
    pub fn switch_video(&mut self, video_id: impl Into<String>) -> Vec<String> {
        self.video_id = video_id.into();
        if self.status == ChannelStatus::Joined {
            vec![self.join_frame()]
        } else {
            Vec::new()
        }
    }

    /// 主动离开命名空间
    pub fn leave(&mut self) -> Vec<String> {
        let was_open = self.status != ChannelStatus::Closed;
        self.close();
        if was_open {
            vec![
                SocketPacket::Disconnect {
                    namespace: LIVE_COMMENTS_NAMESPACE.to_string(),
                }
                .to_frame(),
            ]
        } else {
            Vec::new()
        }
    }

    /// 底层连接关闭
    pub fn close(&mut self) {
        if self.status != ChannelStatus::Closed {
            tracing::info!(video_id = %self.video_id, "live comments channel closed");
        }
        self.status = ChannelStatus::Closed;
    }
}

/// 由 API 地址推导 Socket.IO 的 WebSocket 地址（只保留协议与主机）
pub fn socket_url(api_base_url: &str) -> String {
    let (scheme, rest) = match api_base_url.split_once("://") {
        Some(("https", rest)) => ("wss", rest),
        Some((_, rest)) => ("ws", rest),
        None => ("ws", api_base_url),
    };
    let host = rest.split(['/', '?', '#']).next().unwrap_or(rest);
    format!("{scheme}://{host}/socket.io/?EIO=4&transport=websocket")
}
