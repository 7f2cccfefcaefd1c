//! Per-route-class throttle policies.

use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use innerstory_core::identity::RouteClass;

use crate::window::{FixedWindowTable, RatePolicy};

/// Size cap per table before expired entries are swept.
pub const TABLE_CAP: usize = 10_000;

/// One fixed-window table per throttled route class.
///
/// The set is a plain value injected through application state, so tests
/// substitute tight policies and a fixed clock. It is advisory: per-host
/// and approximate under horizontal scale-out.
#[derive(Debug)]
pub struct ThrottleSet {
    chat: Mutex<FixedWindowTable>,
    likes: Mutex<FixedWindowTable>,
    reviews: Mutex<FixedWindowTable>,
    exports: Mutex<FixedWindowTable>,
}

impl ThrottleSet {
    /// Builds a set with explicit per-class policies.
    #[must_use]
    pub fn new(
        chat: RatePolicy,
        likes: RatePolicy,
        reviews: RatePolicy,
        exports: RatePolicy,
        cap: usize,
    ) -> Self {
        Self {
            chat: Mutex::new(FixedWindowTable::new(chat, cap)),
            likes: Mutex::new(FixedWindowTable::new(likes, cap)),
            reviews: Mutex::new(FixedWindowTable::new(reviews, cap)),
            exports: Mutex::new(FixedWindowTable::new(exports, cap)),
        }
    }

    /// The production policies: chat 20/min, likes 30/min, reviews
    /// 5/hour, PDF exports 3/hour.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(
            RatePolicy {
                limit: 20,
                window: Duration::seconds(60),
            },
            RatePolicy {
                limit: 30,
                window: Duration::seconds(60),
            },
            RatePolicy {
                limit: 5,
                window: Duration::seconds(3600),
            },
            RatePolicy {
                limit: 3,
                window: Duration::seconds(3600),
            },
            TABLE_CAP,
        )
    }

    /// Admits or rejects one request for `key` on the given route class.
    pub fn admit(&self, route: RouteClass, key: &str, now: DateTime<Utc>) -> bool {
        let table = match route {
            RouteClass::ChatMessage => &self.chat,
            RouteClass::Like => &self.likes,
            RouteClass::Review => &self.reviews,
            RouteClass::PdfExport => &self.exports,
        };
        table
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .admit(key, now)
    }
}
