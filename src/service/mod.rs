//! Service layer for round status tracking, the assistant and their settings.
//!
//! - `assistant` - Assistant backend seam, its OpenAI client and Discord replies
//! - `round_status` - Polls the game server and reconciles the status display
//! - `settings` - Validates and applies settings slash command changes

pub mod assistant;
pub mod round_status;
pub mod settings;
