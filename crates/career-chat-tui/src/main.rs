use anyhow::Result;
use career_chat_core::{ApiClient, Config};
use clap::{Parser, Subcommand};
use colored::*;

mod app;
mod handler;
mod logging;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

#[derive(Parser)]
#[command(name = "career-chat")]
#[command(about = "Talk with an AI career counselor from the terminal")]
struct Cli {
    /// Chat backend address (defaults to the configured one, then http://localhost:8000)
    #[arg(long, global = true, env = "CAREER_CHAT_BASE_URL")]
    base_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the chat window (default)
    Chat {
        /// Continue an existing conversation by id
        #[arg(long)]
        resume: Option<String>,
    },
    /// Check that the backend is reachable
    Health,
    /// List conversation ids held by the backend
    Conversations,
    /// Show or change saved settings
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Print the effective settings
    Show,
    /// Save the backend address
    SetBaseUrl { url: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().unwrap_or_else(|err| {
        eprintln!("{}: {}", "Ignoring unreadable config".yellow(), err);
        Config::new()
    });
    let base_url = config.resolve_base_url(cli.base_url.as_deref());
    let client = ApiClient::new(&base_url);

    match cli.command.unwrap_or(Commands::Chat { resume: None }) {
        Commands::Chat { resume } => run_chat(client, resume).await?,
        Commands::Health => {
            logging::configure_stderr_logging();
            check_health(&client).await?
        }
        Commands::Conversations => {
            logging::configure_stderr_logging();
            list_conversations(&client).await?
        }
        Commands::Config { action } => match action {
            ConfigAction::Show => {
                println!("{} {}", "Config file:".bold(), Config::get_config_path()?.display());
                println!("{} {}", "Backend:".bold(), base_url.green());
            }
            ConfigAction::SetBaseUrl { url } => {
                Config::save_base_url(&url)?;
                println!("Saved backend address {}", url.green());
            }
        },
    }

    Ok(())
}

async fn run_chat(client: ApiClient, resume: Option<String>) -> Result<()> {
    let log_path = logging::configure_file_logging()?;
    tracing::info!(base_url = client.base_url(), log = %log_path.display(), "starting chat session");

    let mut app = App::new(client);
    if let Some(conversation_id) = resume {
        let outcome = app.controller.resume(&app.client, &conversation_id).await;
        tracing::info!(?outcome, conversation_id, "resume finished");
    }

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut events = EventHandler::new();

    let result = run_loop(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    result
}

async fn run_loop(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    app.scroll_to_bottom();

    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event).await?,
            None => break,
        }
    }

    Ok(())
}

async fn check_health(client: &ApiClient) -> Result<()> {
    match client.health().await {
        Ok(health) if health.is_ok() => {
            println!("{} {}", "✓".green(), client.base_url());
        }
        Ok(health) => {
            println!("{} {} reported status {}", "!".yellow(), client.base_url(), health.status.yellow());
        }
        Err(e) => {
            println!("{}: {:#}", "Error connecting to backend".red(), e);
            println!("Check the address with: {}", "career-chat config show".bold());
        }
    }

    Ok(())
}

async fn list_conversations(client: &ApiClient) -> Result<()> {
    let ids = client.list_conversations().await?;

    if ids.is_empty() {
        println!("{}", "No conversations yet".yellow());
        return Ok(());
    }

    for id in ids {
        println!("  • {}", id);
    }
    println!("\nResume one with: {}", "career-chat chat --resume <id>".bold());

    Ok(())
}
