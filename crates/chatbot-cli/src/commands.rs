//! Slash commands available at the prompt.

use std::io::Write;

use chatbot_core::ModelProvider;
use chatbot_llm::ChatProvider;
use colored::Colorize;

use crate::render::BOT_PREFIX;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// `/list`
    ListModels,
    /// `/show`
    ShowProvider,
    /// `/showModel`
    ShowModel,
    /// `/help`
    Help,
    /// `/exit`
    Exit,
    Unknown(String),
}

/// Whether the prompt loop keeps going after a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

impl Command {
    /// Parse trimmed prompt input. Returns `None` for anything that is not a
    /// slash command.
    pub fn parse(input: &str) -> Option<Self> {
        let name = input.strip_prefix('/')?;
        Some(match name {
            "list" => Command::ListModels,
            "show" => Command::ShowProvider,
            "showModel" => Command::ShowModel,
            "help" => Command::Help,
            "exit" => Command::Exit,
            other => Command::Unknown(other.to_string()),
        })
    }

    pub async fn execute<W: Write>(
        &self,
        provider: &dyn ChatProvider,
        config: &ModelProvider,
        out: &mut W,
    ) -> anyhow::Result<Flow> {
        match self {
            Command::ListModels => list_models(provider, out).await?,
            Command::ShowProvider => show_provider(config, out)?,
            Command::ShowModel => {
                writeln!(out, "{}Current model configured: {}", BOT_PREFIX, config.model)?
            }
            Command::Help => show_help(out)?,
            Command::Exit => {
                writeln!(out, "{}Goodbye!", BOT_PREFIX)?;
                return Ok(Flow::Exit);
            }
            Command::Unknown(name) => {
                writeln!(out, "{}Unknown command: {}", BOT_PREFIX, name)?;
                show_help(out)?;
            }
        }
        Ok(Flow::Continue)
    }
}

async fn list_models<W: Write>(provider: &dyn ChatProvider, out: &mut W) -> anyhow::Result<()> {
    let body = match provider.list_models().await {
        Ok(body) => body,
        Err(err) => {
            log::error!("Model listing failed: {}", err);
            writeln!(
                out,
                "{}",
                format!("{}Error fetching models: {}", BOT_PREFIX, err).red()
            )?;
            return Ok(());
        }
    };

    match serde_json::from_str::<serde_json::Value>(&body)
        .and_then(|value| serde_json::to_string_pretty(&value))
    {
        Ok(pretty) => writeln!(out, "Available Models:\n{}", pretty)?,
        Err(_) => writeln!(out, "Available Models (raw response):\n{}", body)?,
    }
    Ok(())
}

fn show_provider<W: Write>(config: &ModelProvider, out: &mut W) -> anyhow::Result<()> {
    writeln!(out, "--- Current Provider Configuration ---")?;
    writeln!(out, "Provider Name: {}", config.provider)?;
    writeln!(out, "Base URL: {}", config.base_url)?;
    writeln!(out, "API Key: {}", config.masked_api_key())?;
    writeln!(out, "Configured Model: {}", config.model)?;
    writeln!(out, "API Endpoints:")?;
    for (name, path) in &config.apis {
        writeln!(out, "  - {}: {}", name, path)?;
    }
    writeln!(out, "------------------------------------")?;
    Ok(())
}

fn show_help<W: Write>(out: &mut W) -> anyhow::Result<()> {
    writeln!(out, "Available commands:")?;
    writeln!(out, "  /list      - List available models from the provider.")?;
    writeln!(out, "  /show      - Show the current provider configuration.")?;
    writeln!(out, "  /showModel - Show the currently selected model.")?;
    writeln!(out, "  /help      - Display this help message.")?;
    writeln!(out, "  /exit      - Quit the chatbot.")?;
    Ok(())
}
