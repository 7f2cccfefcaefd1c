//! Caller identity and throttled route classes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Who is making a request, as far as throttling is concerned.
///
/// Authenticated callers are keyed by their user id; everyone else by a
/// best-effort client IP string supplied by the gateway.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CallerIdentity {
    /// An authenticated user, keyed by opaque user id.
    User(String),
    /// An anonymous caller, keyed by client IP.
    Ip(String),
}

impl CallerIdentity {
    /// Renders the throttle-table key for this identity.
    #[must_use]
    pub fn key(&self) -> String {
        match self {
            Self::User(id) => format!("user:{id}"),
            Self::Ip(addr) => format!("ip:{addr}"),
        }
    }

    /// Returns true for authenticated callers.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Self::User(_))
    }
}

/// The request families that carry their own rate-limit window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteClass {
    /// Conversation turns against the model.
    ChatMessage,
    /// Anonymous story likes (always IP-keyed).
    Like,
    /// Story review submissions.
    Review,
    /// PDF export requests.
    PdfExport,
}

impl fmt::Display for RouteClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::ChatMessage => "chat_message",
            Self::Like => "like",
            Self::Review => "review",
            Self::PdfExport => "pdf_export",
        };
        f.write_str(name)
    }
}
