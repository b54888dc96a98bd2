/// Presence shown by the bot account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotStatus {
    Off,
    Ready,
}

impl BotStatus {
    pub fn text(self) -> &'static str {
        match self {
            Self::Off => "Offline",
            Self::Ready => "Watching the round",
        }
    }
}
