//! Navigation lifecycle events emitted by the web-rendering component.

use navkit_common::WebViewError;
use serde::{Deserialize, Serialize};
use std::fmt;
use tokio::sync::mpsc;
use url::Url;

/// Identifies one renderer-bound navigation command.
///
/// Issued in increasing order by the session controller. Events stamped
/// with an older token belong to a superseded load.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NavigationToken(u64);

impl NavigationToken {
    pub const INITIAL: NavigationToken = NavigationToken(0);

    pub fn new(value: u64) -> Self {
        Self(value)
    }

    pub fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl fmt::Display for NavigationToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Origin of the document that produced an event or message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecurityOrigin {
    pub host: String,
    /// `0` when the scheme's default port is in use.
    pub port: u16,
    pub protocol: String,
}

impl SecurityOrigin {
    pub fn new(host: impl Into<String>, port: u16, protocol: impl Into<String>) -> Self {
        Self {
            host: host.into(),
            port,
            protocol: protocol.into(),
        }
    }

    /// Derive the origin of a URL. `None` for host-less URLs.
    pub fn from_url(url: &Url) -> Option<Self> {
        let host = url.host_str()?;
        Some(Self::new(host, url.port().unwrap_or(0), url.scheme()))
    }

    /// `protocol://host[:port]`, omitting a zero port.
    pub fn origin(&self) -> String {
        if self.port != 0 {
            format!("{}://{}:{}", self.protocol, self.host, self.port)
        } else {
            format!("{}://{}", self.protocol, self.host)
        }
    }
}

/// Which frame of the page an event belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FrameInfo {
    pub is_main_frame: bool,
    /// The frame's request URL, when known.
    pub url: Option<Url>,
    pub security_origin: Option<SecurityOrigin>,
}

impl Default for FrameInfo {
    fn default() -> Self {
        Self::main()
    }
}

impl FrameInfo {
    pub fn main() -> Self {
        Self {
            is_main_frame: true,
            url: None,
            security_origin: None,
        }
    }

    /// Frame metadata for a document at `url`, origin derived from it.
    pub fn for_url(is_main_frame: bool, url: Url) -> Self {
        Self {
            is_main_frame,
            security_origin: SecurityOrigin::from_url(&url),
            url: Some(url),
        }
    }
}

/// Lifecycle notifications from the rendering component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum NavigationEvent {
    Started {
        url: Url,
    },
    Committed {
        url: Url,
    },
    Finished {
        url: Url,
        #[serde(default)]
        title: String,
        #[serde(default)]
        can_go_back: bool,
        #[serde(default)]
        can_go_forward: bool,
    },
    Failed {
        error: WebViewError,
    },
    Redirected {
        from: Url,
        to: Url,
    },
    /// Some renderers report the title separately from `Finished`.
    TitleChanged {
        title: String,
    },
    Progress {
        progress: f64,
    },
}

impl NavigationEvent {
    /// The URL the event points at, if it carries one.
    pub fn url(&self) -> Option<&Url> {
        match self {
            NavigationEvent::Started { url }
            | NavigationEvent::Committed { url }
            | NavigationEvent::Finished { url, .. } => Some(url),
            NavigationEvent::Redirected { to, .. } => Some(to),
            _ => None,
        }
    }
}

/// An event together with its routing metadata.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NavigationEnvelope {
    /// Token of the command that caused this event.
    pub token: NavigationToken,
    #[serde(default)]
    pub frame: FrameInfo,
    pub event: NavigationEvent,
}

impl NavigationEnvelope {
    /// A main-frame event.
    pub fn main(token: NavigationToken, event: NavigationEvent) -> Self {
        Self {
            token,
            frame: FrameInfo::main(),
            event,
        }
    }

    pub fn in_frame(token: NavigationToken, frame: FrameInfo, event: NavigationEvent) -> Self {
        Self {
            token,
            frame,
            event,
        }
    }
}

pub type EventSender = mpsc::UnboundedSender<NavigationEnvelope>;
pub type EventReceiver = mpsc::UnboundedReceiver<NavigationEnvelope>;

/// Channel carrying renderer events to the coordination context, in the
/// order the renderer observed them.
pub fn event_channel() -> (EventSender, EventReceiver) {
    mpsc::unbounded_channel()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn tokens_increase() {
        let t0 = NavigationToken::INITIAL;
        let t1 = t0.next();
        assert!(t1 > t0);
        assert_eq!(t1.value(), 1);
        assert_eq!(t1.to_string(), "#1");
    }

    #[test]
    fn origin_omits_zero_port() {
        let origin = SecurityOrigin::new("apple.com", 0, "https");
        assert_eq!(origin.origin(), "https://apple.com");

        let origin = SecurityOrigin::new("localhost", 8080, "http");
        assert_eq!(origin.origin(), "http://localhost:8080");
    }

    #[test]
    fn origin_from_url() {
        let origin = SecurityOrigin::from_url(&url("https://example.com:8443/a")).unwrap();
        assert_eq!(origin, SecurityOrigin::new("example.com", 8443, "https"));

        // Default ports are reported as 0
        let origin = SecurityOrigin::from_url(&url("https://example.com/")).unwrap();
        assert_eq!(origin.port, 0);

        assert!(SecurityOrigin::from_url(&url("about:blank")).is_none());
    }

    #[test]
    fn frame_defaults_to_main() {
        let frame = FrameInfo::default();
        assert!(frame.is_main_frame);
        assert!(frame.url.is_none());

        let sub = FrameInfo::for_url(false, url("https://ads.example.com/frame"));
        assert!(!sub.is_main_frame);
        assert_eq!(
            sub.security_origin.map(|o| o.origin()).as_deref(),
            Some("https://ads.example.com")
        );
    }

    #[test]
    fn event_url_accessor() {
        let started = NavigationEvent::Started {
            url: url("https://a.com"),
        };
        assert_eq!(started.url(), Some(&url("https://a.com")));

        let redirect = NavigationEvent::Redirected {
            from: url("https://a.com"),
            to: url("https://b.com"),
        };
        assert_eq!(redirect.url(), Some(&url("https://b.com")));

        let failed = NavigationEvent::Failed {
            error: WebViewError::Timeout,
        };
        assert_eq!(failed.url(), None);
    }

    #[test]
    fn envelope_from_json_defaults_frame() {
        let json = r#"{
            "token": 3,
            "event": {"type": "finished", "url": "https://apple.com/", "title": "Apple"}
        }"#;
        let envelope: NavigationEnvelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.token, NavigationToken::new(3));
        assert!(envelope.frame.is_main_frame);
        assert_eq!(
            envelope.event,
            NavigationEvent::Finished {
                url: url("https://apple.com/"),
                title: "Apple".into(),
                can_go_back: false,
                can_go_forward: false,
            }
        );
    }

    #[test]
    fn failed_event_from_json() {
        let json = r#"{"type": "failed", "error": {"kind": "network", "message": "offline"}}"#;
        let event: NavigationEvent = serde_json::from_str(json).unwrap();
        assert_eq!(
            event,
            NavigationEvent::Failed {
                error: WebViewError::Network("offline".into())
            }
        );
    }

    #[tokio::test]
    async fn channel_preserves_order() {
        let (tx, mut rx) = event_channel();
        for i in 0..3 {
            tx.send(NavigationEnvelope::main(
                NavigationToken::new(i),
                NavigationEvent::Progress { progress: 0.5 },
            ))
            .unwrap();
        }
        drop(tx);

        let mut seen = Vec::new();
        while let Some(envelope) = rx.recv().await {
            seen.push(envelope.token.value());
        }
        assert_eq!(seen, vec![0, 1, 2]);
    }
}
