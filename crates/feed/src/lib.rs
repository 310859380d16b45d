//! Live feed client and the subscription pipeline.
//!
//! - [`feed`] - the [`LiveFeed`] collaborator interface and the
//!   [`FeedSubscription`] it hands out.
//! - [`client`] / [`messages`] / [`reconnect`] - WebSocket implementation
//!   of the feed with exponential-backoff reconnection.
//! - [`channel`] - in-process feed for tests and replay.
//! - [`subscriber`] - [`LiveFeedSubscriber`], which drives change
//!   detection, dashboard state and warning recording for every snapshot.
//! - [`display`] - the dashboard state published to readers.

pub mod channel;
pub mod client;
pub mod display;
pub mod feed;
pub mod messages;
pub mod reconnect;
pub mod subscriber;

pub use channel::ChannelFeed;
pub use client::WebSocketFeed;
pub use display::{DashboardState, MetricReading};
pub use feed::{FeedError, FeedSubscription, LiveFeed};
pub use subscriber::{LiveFeedSubscriber, SubscriptionHandle};
