//! Topic protocol test helpers.
//!
//! - `frame` - Builders for raw response frames
//! - `server` - Scripted local server that records requests

pub mod frame;
pub mod server;
