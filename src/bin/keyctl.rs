//! keyctl - provision and revoke API keys against a running server.
//!
//! ```text
//! keyctl generate 123456789012345678
//! keyctl revoke 123456789012345678
//! keyctl set-news "**Maintenance** tonight"
//! ```

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;
use utility_api::client::ControlClient;

#[derive(Debug, Parser)]
#[command(name = "keyctl", about = "Admin client for the utility API")]
struct Cli {
    /// Base URL of the server
    #[arg(long, env = "UTILITY_API_URL", default_value = "http://127.0.0.1:3000")]
    base_url: String,

    /// Admin shared secret sent in X-API-KEY
    #[arg(long, env = "UTILITY_API_ADMIN_SECRET", hide_env_values = true)]
    admin_secret: String,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Issue a key for a user, or show the one they already have
    Generate { user_id: String },
    /// Show the key issued to a user
    Show { user_id: String },
    /// Show which user owns a key
    Whois { api_key: String },
    /// Revoke a user's key
    Revoke { user_id: String },
    /// Print the current announcement
    News,
    /// Replace the announcement; pass an empty string to clear it
    SetNews { content: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let client = ControlClient::new(&cli.base_url, cli.admin_secret)?;

    match cli.command {
        Command::Generate { user_id } => {
            let response = client.generate_key(&user_id).await?;
            if !response.created {
                tracing::info!(user_id = %response.user_id, "user already had a key");
            }
            println!("Your API key is:\n{}", response.api_key);
        }
        Command::Show { user_id } => {
            let response = client.get_key(&user_id).await?;
            println!("{}", response.api_key);
        }
        Command::Whois { api_key } => {
            let response = client.get_user(&api_key).await?;
            println!("{}", response.user_id);
        }
        Command::Revoke { user_id } => {
            let response = client.revoke_key(&user_id).await?;
            if response.deleted {
                println!("Revoked key for {user_id}");
            } else {
                println!("{user_id} had no key");
            }
        }
        Command::News => {
            let response = client.get_news().await?;
            println!("{}", response.content.unwrap_or_default());
        }
        Command::SetNews { content } => {
            let response = client.set_news(&content).await?;
            match response.content {
                Some(content) => println!("Announcement set:\n{content}"),
                None => println!("Announcement cleared"),
            }
        }
    }

    Ok(())
}
