//! Roulette MCP Server implementation
//!
//! Exposes the raffle game to MCP clients: edit the pool, spin, inspect history.

use std::fmt::Write as _;

use crate::client::{ClientError, GameView, RouletteClient, SpinView, WinnerView};
use anyhow::Result;
use rmcp::handler::server::wrapper::Parameters;
use rmcp::{
    handler::server::tool::ToolRouter,
    model::{CallToolResult, Content, Implementation, ServerCapabilities, ServerInfo},
    tool, tool_handler, tool_router, ErrorData as McpError, ServerHandler,
};
use schemars::JsonSchema;
use serde::Deserialize;

/// Roulette MCP Server
#[derive(Clone)]
pub struct RouletteServer {
    client: RouletteClient,
    tool_router: ToolRouter<Self>,
}

impl RouletteServer {
    pub fn from_env() -> Result<Self> {
        let client = RouletteClient::from_env()?;
        Ok(Self {
            client,
            tool_router: Self::tool_router(),
        })
    }
}

// --- Tool Parameter Types ---

#[derive(Debug, Deserialize, JsonSchema)]
pub struct SetParticipantsParams {
    /// Names as editor text, one per line. Blank lines are ignored.
    #[serde(default)]
    pub text: Option<String>,
    /// Names as an explicit list. Takes precedence over `text`.
    #[serde(default)]
    pub participants: Option<Vec<String>>,
}

fn reply<T>(result: Result<T, ClientError>, render: impl FnOnce(&T) -> String) -> CallToolResult {
    match result {
        Ok(value) => CallToolResult::success(vec![Content::text(render(&value))]),
        Err(e) => {
            let mut message = e.to_string();
            if e.is_retryable() {
                message.push_str(" (temporary, try again)");
            } else if let ClientError::Api { status: 404, .. } = e {
                message.push_str(" (check ROULETTE_API_URL)");
            }
            CallToolResult::error(vec![Content::text(message)])
        }
    }
}

#[tool_router]
impl RouletteServer {
    #[tool(description = "Show the current participants and the winner history. Call this first.")]
    async fn game(&self) -> Result<CallToolResult, McpError> {
        Ok(reply(self.client.get_game().await, render_game))
    }

    #[tool(
        description = "Replace the participant pool. Pass 'text' with one name per line, or 'participants' as a list. Winner history is kept."
    )]
    async fn set_participants(
        &self,
        params: Parameters<SetParticipantsParams>,
    ) -> Result<CallToolResult, McpError> {
        let params = params.0;
        let result = match (params.participants, params.text) {
            (Some(list), _) => self.client.set_participants(&list).await,
            (None, Some(text)) => self.client.set_participants_text(&text).await,
            (None, None) => {
                return Ok(CallToolResult::error(vec![Content::text(
                    "Provide either 'text' or 'participants'",
                )]))
            }
        };
        Ok(reply(result, render_game))
    }

    #[tool(
        description = "Draw one winner uniformly at random and remove them from the pool. Needs at least 2 participants."
    )]
    async fn spin(&self) -> Result<CallToolResult, McpError> {
        Ok(reply(self.client.spin().await, render_spin))
    }

    #[tool(description = "Restore the default participants and clear all winners.")]
    async fn reset(&self) -> Result<CallToolResult, McpError> {
        Ok(reply(self.client.reset_game().await, render_game))
    }

    #[tool(description = "List winners, most recent first.")]
    async fn winners(&self) -> Result<CallToolResult, McpError> {
        Ok(reply(self.client.winners().await, |winners| {
            render_winners(winners)
        }))
    }

    #[tool(description = "Clear the winner history without touching the participants.")]
    async fn clear_winners(&self) -> Result<CallToolResult, McpError> {
        Ok(reply(self.client.clear_winners().await, render_game))
    }

    #[tool(description = "Check that the API and its storage are reachable.")]
    async fn health(&self) -> Result<CallToolResult, McpError> {
        Ok(reply(self.client.health().await, |health| {
            format!(
                "API {} (v{}), storage {}",
                health.status, health.version, health.storage
            )
        }))
    }
}

#[tool_handler]
impl ServerHandler for RouletteServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: Default::default(),
            capabilities: ServerCapabilities::builder().enable_tools().build(),
            server_info: Implementation {
                name: "roulette".into(),
                title: Some("Roulette MCP Server".into()),
                version: env!("CARGO_PKG_VERSION").into(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                r#"Roulette - raffle draws without replacement

WORKFLOW:
1. 'game' - See the participants and previous winners
2. 'set_participants' - Replace the pool (one name per line)
3. 'spin' - Draw a winner; they leave the pool
4. 'winners' - Review the draw history
5. 'reset' - Start over with the default pool

RULES:
- A spin needs at least 2 participants
- Duplicate names are separate entries; a draw removes only one
- Busy or unavailable errors are temporary; retry the same call"#
                    .into(),
            ),
        }
    }
}

// --- Rendering ---

fn render_game(game: &GameView) -> String {
    let mut out = format!("Game {} ({})\n", game.id, game.phase);

    let _ = writeln!(out, "\nParticipants ({}):", game.participants.len());
    if game.participants.is_empty() {
        out.push_str("  (none)\n");
    }
    for (i, name) in game.participants.iter().enumerate() {
        let _ = writeln!(out, "  {}. {}", i + 1, name);
    }

    out.push('\n');
    out.push_str(&render_winners(&game.winners));
    out
}

/// History is rendered newest first; the API returns it oldest first
fn render_winners(winners: &[WinnerView]) -> String {
    if winners.is_empty() {
        return "No winners yet.\n".to_string();
    }

    let mut out = format!("Winners ({}):\n", winners.len());
    for winner in winners.iter().rev() {
        let _ = writeln!(
            out,
            "  #{} {} - {} (out of {})",
            winner.position,
            winner.name,
            winner.timestamp.format("%Y-%m-%d %H:%M:%S UTC"),
            winner.total_participants
        );
    }
    out
}

fn render_spin(spin: &SpinView) -> String {
    let mut out = format!(
        "Winner #{}: {} (drawn from {})\n",
        spin.winner.position, spin.winner.name, spin.winner.total_participants
    );
    let _ = writeln!(out, "Total winners so far: {}", spin.total_winners);
    match spin.remaining_participants.len() {
        0 => out.push_str("No participants left.\n"),
        1 => {
            let _ = writeln!(
                out,
                "Only {} is left; add participants or reset to keep drawing.",
                spin.remaining_participants[0]
            );
        }
        n => {
            let _ = writeln!(out, "{} participants left.", n);
        }
    }
    out
}
