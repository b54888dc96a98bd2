//! Domain models shared by the poller, the display and the command layer.

pub mod bot_status;
pub mod display;
pub mod game_phase;
pub mod status;
