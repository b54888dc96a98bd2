//! Message commands addressed with the configured prefix or a bot mention.

use serenity::all::UserId;

pub const MIND: &str = "mind";

/// A command split out of a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrefixCommand<'a> {
    pub name: &'a str,
    /// Remainder of the message after the command name, trimmed.
    pub args: &'a str,
}

/// Splits `content` into a command if it starts with `prefix` or mentions the bot.
///
/// # Returns
/// - `None` - Message is not addressed to the bot or names no command
/// - `Some(PrefixCommand)` - Command name and its arguments
pub fn parse<'a>(content: &'a str, prefix: &str, bot_id: UserId) -> Option<PrefixCommand<'a>> {
    let rest = strip_mention(content, bot_id).or_else(|| content.strip_prefix(prefix))?;

    let (name, args) = match rest.split_once(char::is_whitespace) {
        Some((name, args)) => (name, args.trim()),
        None => (rest, ""),
    };

    if name.is_empty() {
        return None;
    }

    Some(PrefixCommand { name, args })
}

fn strip_mention(content: &str, bot_id: UserId) -> Option<&str> {
    [format!("<@{}>", bot_id), format!("<@!{}>", bot_id)]
        .iter()
        .find_map(|mention| content.strip_prefix(mention.as_str()))
        .map(str::trim_start)
}
