//! Client SDK for the Gluon CloudLink Enterprise REST API.
//!
//! CloudLink exposes two storage primitives (objects and lists of objects)
//! and a push notification endpoint. This crate wraps them behind a typed
//! client:
//!
//! - argument validation runs before any network call,
//! - stored payloads are deserialized into caller-specified types, either
//!   through serde or a caller-supplied mapper closure,
//! - non-200 responses map to [`CloudLinkError::Status`] carrying the status
//!   code, reason phrase and response body.
//!
//! Two client implementations share the same domain model: the async
//! [`CloudLinkClient`] (default) and a blocking counterpart in [`blocking`]
//! behind the `blocking` cargo feature.
//!
//! ```no_run
//! use cloudlink_enterprise::{CloudLinkClient, CloudLinkConfig, PushNotification,
//!     PushNotificationTarget};
//!
//! # async fn run() -> Result<(), cloudlink_enterprise::CloudLinkError> {
//! let client = CloudLinkClient::new(CloudLinkConfig::new("server-key"))?;
//!
//! let notification = PushNotification {
//!     title: "Hello".into(),
//!     body: "World".into(),
//!     target: PushNotificationTarget::topic("greetings"),
//!     ..Default::default()
//! };
//! let sent = client.send_push_notification(&notification).await?;
//! println!("sent notification {:?}", sent.identifier);
//! # Ok(())
//! # }
//! ```

pub mod client;
pub mod config;
pub mod errors;
pub mod models;

#[cfg(feature = "blocking")]
pub mod blocking;

pub use client::CloudLinkClient;
pub use config::CloudLinkConfig;
pub use errors::CloudLinkError;
pub use models::{
    ExpirationType, ObjectData, Priority, PushNotification, PushNotificationTarget, StringObject,
    TargetType,
};
