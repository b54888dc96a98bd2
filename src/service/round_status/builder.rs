//! Round status embed construction.

use serenity::all::{CreateEmbed, CreateEmbedFooter};

use crate::model::display::{StatusDisplay, StatusView};

const STARTUP_COLOR: u32 = 0xe67e22;
const LOBBY_COLOR: u32 = 0x3498db;
const IN_GAME_COLOR: u32 = 0x2ecc71;
const END_GAME_COLOR: u32 = 0xad1457;
const OFFLINE_COLOR: u32 = 0x95a5a6;

const TITLE: &str = "Round";
const FOOTER: &str = "roundwatch";

/// Builds the status embed for a view.
///
/// Live views are colored by phase. The offline view keeps the fields of the last
/// known phase but swaps the color and states that the bot is offline.
///
/// # Arguments
/// - `view` - Display content and offline marker
///
/// # Returns
/// - `CreateEmbed` - Embed ready for posting or editing
pub fn build_status_embed(view: &StatusView) -> CreateEmbed {
    let display = &view.display;

    let (color, description) = if view.offline {
        (
            OFFLINE_COLOR,
            format!("Bot offline, last known status: {}", display.phase_label()),
        )
    } else {
        (phase_color(display), display.phase_label().to_string())
    };

    let mut embed = CreateEmbed::new()
        .title(TITLE)
        .description(description)
        .color(color);

    match display {
        StatusDisplay::Startup { round_id } => {
            embed = embed.field("Round ID", round_id_text(round_id), true);
        }
        StatusDisplay::Lobby { round_id, players } => {
            embed = embed
                .field("Round ID", round_id_text(round_id), true)
                .field("Players", players_text(*players), true);
        }
        StatusDisplay::InGame {
            round_id,
            players,
            round_time,
        } => {
            embed = embed
                .field("Round ID", round_id_text(round_id), true)
                .field("Players", players_text(*players), true)
                .field("Round time", round_time, true);
        }
        StatusDisplay::EndGame {
            finished_at,
            round_id,
        } => {
            embed = embed
                .field(
                    "Round finished",
                    finished_at.format("%Y-%m-%d %H:%M:%S").to_string(),
                    true,
                )
                .field("Round ID", round_id_text(round_id), true);
        }
    }

    embed.footer(CreateEmbedFooter::new(FOOTER))
}

fn phase_color(display: &StatusDisplay) -> u32 {
    match display {
        StatusDisplay::Startup { .. } => STARTUP_COLOR,
        StatusDisplay::Lobby { .. } => LOBBY_COLOR,
        StatusDisplay::InGame { .. } => IN_GAME_COLOR,
        StatusDisplay::EndGame { .. } => END_GAME_COLOR,
    }
}

fn round_id_text(round_id: &str) -> String {
    if round_id.is_empty() {
        "-".to_string()
    } else {
        round_id.to_string()
    }
}

fn players_text(players: i64) -> String {
    if players < 0 {
        "unknown".to_string()
    } else {
        format!("{} player(s)", players)
    }
}
