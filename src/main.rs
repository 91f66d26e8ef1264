use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

use sentinel::config::FeedConfig;
use sentinel::feed::{ChannelHandler, EventFeedClient, FeedClient, FeedMessage, PromptInput};
use sentinel::view::{render_row, CheckOutcome, FeedView};

#[derive(Parser)]
#[command(name = "sentinel", about = "Blocked-prompt feed of the LLM safety gateway")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print recent blocked prompts, then follow the live feed.
    Feed {
        /// How many historical events to load first.
        #[arg(long, default_value_t = 200)]
        limit: usize,
        /// Stop after this many seconds instead of waiting for Ctrl-C.
        #[arg(long)]
        duration_secs: Option<u64>,
    },
    /// Ask the gateway whether a prompt would be allowed.
    Check { prompt: String },
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::from_default_env())
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = FeedConfig::from_env()?;
    let client = FeedClient::from_config(&config)?;
    info!("Sentinel feed client started in {} mode", client.mode());

    match cli.command {
        Command::Feed { limit, duration_secs } => follow_feed(&client, limit, duration_secs).await,
        Command::Check { prompt } => check(&client, &prompt).await,
    }
}

async fn follow_feed(client: &FeedClient, limit: usize, duration_secs: Option<u64>) -> Result<()> {
    let mut view = FeedView::new();
    let (handler, mut messages) = ChannelHandler::new();
    let subscription = client.subscribe(handler);

    match client.fetch_recent_events(Some(limit)).await {
        Ok(page) => view.apply_page(page),
        Err(e) => {
            warn!("Fetching blocked prompts failed: {}", e);
            view.apply_fetch_error(&e);
        }
    }
    print!("{}", view.render());

    let deadline = async {
        match duration_secs {
            Some(secs) => tokio::time::sleep(Duration::from_secs(secs)).await,
            None => std::future::pending::<()>().await,
        }
    };
    tokio::pin!(deadline);

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = &mut deadline => break,
            message = messages.recv() => {
                // Sender is gone once the subscription task has ended.
                let Some(message) = message else { break };
                if let FeedMessage::Event(event) = &message {
                    println!("{}", render_row(event));
                }
                let before = view.status();
                view.apply(message);
                if view.status() != before {
                    println!("{}", view.status_line());
                }
            }
        }
    }

    subscription.close();
    info!("Feed stopped after {} blocked prompts", view.len());
    Ok(())
}

async fn check(client: &FeedClient, prompt: &str) -> Result<()> {
    let result = match PromptInput::parse(prompt) {
        Ok(input) => client.check_prompt(&input).await,
        Err(e) => Err(e),
    };

    let outcome = CheckOutcome::from_result(result);
    if let CheckOutcome::Failed(e) = &outcome {
        warn!("Prompt check failed: {}", e);
    }
    println!("{}", outcome.render());

    if outcome.is_error() {
        return Err(anyhow!("prompt check did not produce a verdict"));
    }
    Ok(())
}
