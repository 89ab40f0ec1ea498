mod commands;
mod logging;
mod render;

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::Context;
use chatbot_core::ModelProvider;
use chatbot_llm::session::DEFAULT_MAX_TOKENS;
use chatbot_llm::{ChatProvider, ChatSession, OpenAICompatProvider};
use clap::Parser;
use colored::Colorize;

use commands::{Command, Flow};
use render::TerminalRenderer;

#[derive(Parser, Debug)]
#[command(name = "chatbot")]
#[command(about = "Interactive streaming chat client for OpenAI-compatible endpoints")]
#[command(version)]
struct Cli {
    /// System prompt sent at the start of every request
    #[arg(long, env = "CHAT_SYSTEM_PROMPT", default_value = "")]
    system_prompt: String,

    /// Token budget for the context sent with each request
    #[arg(long, env = "CHAT_MAX_TOKENS", default_value_t = DEFAULT_MAX_TOKENS)]
    max_tokens: u32,

    /// Enable debug logging
    #[arg(
        long,
        short,
        env = "DEBUG",
        value_parser = clap::builder::BoolishValueParser::new()
    )]
    debug: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // before parsing, so .env values can back the CLI flags
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    logging::init_logging(cli.debug);
    if let Err(err) = dotenv {
        log::warn!(
            "No .env file loaded ({}), attempting to use environment variables directly.",
            err
        );
    }

    let config = ModelProvider::from_env().context("Failed to load config")?;
    log::debug!(
        "Provider '{}' at {} with endpoints {:?}",
        config.provider,
        config.base_url,
        config.apis
    );

    let provider: Arc<dyn ChatProvider> = Arc::new(OpenAICompatProvider::new(config.clone()));
    let mut session =
        ChatSession::new(provider, &cli.system_prompt).with_max_tokens(cli.max_tokens);

    run_interactive_chat(&mut session, &config).await
}

async fn run_interactive_chat(
    session: &mut ChatSession,
    config: &ModelProvider,
) -> anyhow::Result<()> {
    println!("Welcome to the Chatbot! Type '/exit' to quit.");
    println!("Using Model: {}", config.model.cyan().bold());
    println!("--------------------------------------------");

    let stdin = io::stdin();
    let mut renderer = TerminalRenderer::new(io::stdout());

    loop {
        print!("{}", "You: ".cyan().bold());
        io::stdout().flush()?;

        let mut input = String::new();
        if stdin.read_line(&mut input)? == 0 {
            println!();
            println!("Bot: Goodbye!");
            break;
        }
        let input = input.trim();

        if input.is_empty() {
            continue;
        }

        if let Some(command) = Command::parse(input) {
            let flow = command
                .execute(session.provider(), config, &mut io::stdout())
                .await?;
            if flow == Flow::Exit {
                break;
            }
            continue;
        }

        let result = session.send(input, &mut renderer).await;
        renderer.finish_turn(&result)?;
    }

    Ok(())
}
