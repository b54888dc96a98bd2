//! Discord bot integration.
//!
//! Slash commands arrive as interactions regardless of intents; the message intents
//! are only needed for prefix commands such as `!mind`.
//!
//! - `start` - Client construction and presence-aware shutdown
//! - `handler` - Gateway event handlers
//! - `command` - Slash and prefix command definitions and dispatch

pub mod command;
pub mod handler;
pub mod start;
