//! # Shopify Admin Tasks
//!
//! Two operator tasks against a single store's GraphQL Admin API, sharing one
//! configured client.
//!
//! ## Overview
//!
//! This crate provides:
//! - Type-safe configuration via [`TasksConfig`] and [`TasksConfigBuilder`],
//!   loaded from the environment or a `.env` file
//! - Validated newtypes for the store URL and credentials
//! - A GraphQL client that treats a non-empty `errors` array as a failure
//! - [`tasks::leaderboard`]: top 50 customers of a tagged segment, ranked by
//!   amount spent, written to CSV
//! - [`tasks::flag_capture`]: find the flag product, stop tracking its
//!   inventory and look for an order that already contains it
//!
//! ## Quick Start
//!
//! ```rust
//! use shopify_admin_tasks::{AccessToken, ApiVersion, StoreUrl, TasksConfig};
//!
//! let config = TasksConfig::builder()
//!     .store_url(StoreUrl::new("https://my-store.myshopify.com").unwrap())
//!     .access_token(AccessToken::new("shpat_example").unwrap())
//!     .api_version(ApiVersion::V2025_01)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.api_version(), &ApiVersion::V2025_01);
//! ```
//!
//! ## Running the Tasks
//!
//! ```rust,ignore
//! use shopify_admin_tasks::tasks::flag_capture::{capture_the_flag, FlagCaptureOptions};
//! use shopify_admin_tasks::tasks::leaderboard::{generate_customer_leaderboard, LeaderboardOptions};
//! use shopify_admin_tasks::{GraphqlClient, TasksConfig};
//!
//! let config = TasksConfig::from_env()?;
//! let client = GraphqlClient::new(&config)?;
//!
//! let report = generate_customer_leaderboard(&client, &LeaderboardOptions::default()).await?;
//! println!("exported {} customers", report.exported);
//!
//! let report = capture_the_flag(&client, &config, &FlagCaptureOptions::default()).await?;
//! println!("captured: {}", report.is_captured());
//! ```
//!
//! ## Design Principles
//!
//! - **No global state**: Configuration is instance-based and passed explicitly
//! - **Fail-fast validation**: All newtypes validate on construction
//! - **One attempt per call**: No retries or rate-limit sleeping
//! - **Explicit step outcomes**: Tolerated failures are
//!   [`tasks::StepOutcome::Warning`], never silently dropped

pub mod clients;
pub mod config;
pub mod error;
pub mod tasks;

// Re-export public types at crate root for convenience
pub use clients::{GraphqlClient, GraphqlError, HttpError};
pub use config::{
    AccessToken, ApiVersion, StorePassword, StoreUrl, TasksConfig, TasksConfigBuilder,
};
pub use error::ConfigError;
