//! Cinema Rust Client
//!
//! A Rust client library for the cinema booking API, with bearer token
//! authentication, single-flight token refresh, retry-once on 401 and an
//! error bus that reports terminal failures to whatever UI is listening.

pub mod api_client;
pub mod auth_client;
pub mod booking;
pub mod endpoints;
pub mod error;
pub mod error_bus;
pub mod keep_alive;
pub mod refresh;
pub mod token_store;
pub mod types;

pub use api_client::{ApiClient, ClientConfig, RequestBody, RequestOptions, RetryPolicy};
pub use auth_client::AuthSession;
pub use booking::SeatSelection;
pub use error::{ClientError, Result};
pub use error_bus::{ApiErrorEvent, ErrorBus, SubscriptionId};
pub use keep_alive::spawn_keep_alive;
pub use refresh::RefreshCoordinator;
pub use token_store::TokenStore;
