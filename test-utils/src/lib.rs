//! Roundwatch Test Utils
//!
//! Shared testing utilities for the round status bot: temporary configuration
//! directories, status response fixtures and a scripted topic protocol server.
//!
//! # Overview
//!
//! - **TestBuilder**: Fluent builder for configuring a test environment
//! - **TestContext**: Test environment owning a temporary configuration directory
//! - **TopicTestServer**: Local TCP server answering topic queries with scripted frames
//! - **TestError**: Error types that can occur during test setup
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::{builder::TestBuilder, topic::{frame, server::TopicTestServer}};
//!
//! #[tokio::test]
//! async fn test_status_query() -> Result<(), TestError> {
//!     let test = TestBuilder::new()
//!         .with_config_file("round-status", r#"{ "host": "127.0.0.1" }"#)
//!         .build()?;
//!
//!     let server = TopicTestServer::start(vec![frame::string_response("round_id=1")]).await?;
//!     // Point the client at server.port()...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod fixture;
pub mod topic;
