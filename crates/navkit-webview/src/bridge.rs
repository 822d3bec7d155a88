//! JavaScript message bridge between page scripts and the host.
//!
//! Messages flow in both directions:
//! - **Page -> host**: page scripts call `window.navkit.postMessage(name, body)`,
//!   which forwards `{"name": ..., "body": ...}` as JSON over the platform IPC
//!   channel. The host decodes it into a [`JavaScriptMessage`] and routes it
//!   to the handler registered under `name`.
//! - **Host -> page**: the host evaluates [`js_dispatch_message`], which invokes
//!   callbacks the page registered with `window.navkit.on(name, callback)`.

use std::collections::{BTreeMap, HashMap};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::events::FrameInfo;

/// A decoded JavaScript value.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MessageBody {
    Null,
    Bool(bool),
    Number(f64),
    Text(String),
    List(Vec<MessageBody>),
    Map(BTreeMap<String, MessageBody>),
}

impl MessageBody {
    /// Decode a JSON document. Malformed input is an error, not `Null`.
    pub fn from_json_str(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str::<serde_json::Value>(raw).map(Self::from)
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MessageBody::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MessageBody::Number(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            MessageBody::Bool(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, MessageBody>> {
        match self {
            MessageBody::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, MessageBody::Null)
    }
}

impl From<serde_json::Value> for MessageBody {
    fn from(value: serde_json::Value) -> Self {
        use serde_json::Value;
        match value {
            Value::Null => MessageBody::Null,
            Value::Bool(b) => MessageBody::Bool(b),
            // Every JSON number fits an f64, possibly with rounding.
            Value::Number(n) => MessageBody::Number(n.as_f64().unwrap_or_default()),
            Value::String(s) => MessageBody::Text(s),
            Value::Array(items) => MessageBody::List(items.into_iter().map(Self::from).collect()),
            Value::Object(map) => MessageBody::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

/// A message posted by page script.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JavaScriptMessage {
    /// Handler name the page addressed.
    pub name: String,
    pub body: MessageBody,
    pub frame: FrameInfo,
    pub timestamp: DateTime<Utc>,
}

impl JavaScriptMessage {
    pub fn new(name: impl Into<String>, body: MessageBody, frame: FrameInfo) -> Self {
        Self {
            name: name.into(),
            body,
            frame,
            timestamp: Utc::now(),
        }
    }

    pub fn body_as_str(&self) -> Option<&str> {
        self.body.as_str()
    }

    pub fn body_as_map(&self) -> Option<&BTreeMap<String, MessageBody>> {
        self.body.as_map()
    }
}

/// Wire shape produced by [`BRIDGE_INIT_SCRIPT`].
#[derive(Debug, Deserialize)]
struct RawMessage {
    name: String,
    #[serde(default)]
    body: serde_json::Value,
}

/// Callback invoked for messages addressed to a registered name.
pub type MessageHandler = Box<dyn Fn(&JavaScriptMessage) + Send + Sync>;

/// What happened to a raw IPC payload.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    Delivered(JavaScriptMessage),
    /// Well-formed, but nobody registered the name.
    Unhandled(JavaScriptMessage),
    Malformed,
}

/// Routes incoming page messages to named handlers.
#[derive(Default)]
pub struct MessageRouter {
    handlers: HashMap<String, MessageHandler>,
}

impl MessageRouter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` under `name`. Returns `true` if it replaced one.
    pub fn register(&mut self, name: impl Into<String>, handler: MessageHandler) -> bool {
        let name = name.into();
        debug!(handler = %name, "message handler registered");
        self.handlers.insert(name, handler).is_some()
    }

    pub fn unregister(&mut self, name: &str) -> bool {
        self.handlers.remove(name).is_some()
    }

    pub fn is_registered(&self, name: &str) -> bool {
        self.handlers.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Decode a raw IPC body and deliver it.
    pub fn dispatch_raw(&self, raw: &str, frame: FrameInfo) -> DispatchOutcome {
        let parsed: RawMessage = match serde_json::from_str(raw) {
            Ok(parsed) => parsed,
            Err(e) => {
                warn!(body_len = raw.len(), error = %e, "page message rejected: invalid JSON");
                return DispatchOutcome::Malformed;
            }
        };

        let message = JavaScriptMessage::new(parsed.name, MessageBody::from(parsed.body), frame);
        self.dispatch(message)
    }

    pub fn dispatch(&self, message: JavaScriptMessage) -> DispatchOutcome {
        match self.handlers.get(&message.name) {
            Some(handler) => {
                debug!(handler = %message.name, main_frame = message.frame.is_main_frame, "page message");
                handler(&message);
                DispatchOutcome::Delivered(message)
            }
            None => {
                warn!(handler = %message.name, "page message for unregistered handler");
                DispatchOutcome::Unhandled(message)
            }
        }
    }
}

/// JavaScript snippet that sets up the bridge on the page side.
/// Injected as an initialization script into every document.
pub const BRIDGE_INIT_SCRIPT: &str = r#"
(function() {
    window.navkit = window.navkit || {};
    window.navkit.postMessage = function(name, body) {
        window.ipc.postMessage(JSON.stringify({
            name: name,
            body: body === undefined ? null : body
        }));
    };
    // Callbacks registered by page code to handle messages from the host
    window.navkit._handlers = {};
    window.navkit.on = function(name, callback) {
        window.navkit._handlers[name] = callback;
    };
    window.navkit._dispatch = function(name, payload) {
        var handler = window.navkit._handlers[name];
        if (handler) {
            handler(payload);
        }
    };
})();
"#;

/// Generate a JS snippet that dispatches a message to a page-side handler.
pub fn js_dispatch_message(name: &str, payload: &serde_json::Value) -> String {
    let payload_json = serde_json::to_string(payload).unwrap_or_else(|_| "null".to_string());
    format!(
        "window.navkit._dispatch({}, {});",
        serde_json::to_string(name).unwrap_or_else(|_| "\"unknown\"".to_string()),
        payload_json,
    )
}
