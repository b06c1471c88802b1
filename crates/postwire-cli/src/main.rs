//! postwire - fetch posts and log in against a backend from the terminal.
//!
//! This binary is the composition root: it loads configuration, builds one
//! shared transport, hands it to the services, and prints what they observe.

use std::io;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use postwire_core::{AuthService, PostService, ReqwestTransport, ServiceConfig, Transport};

const USAGE: &str = "\
Usage:
  postwire posts [ID]      Fetch the post list, or show a single post
  postwire login <EMAIL>   Log in (password is read from the terminal)
  postwire --help          Show this message

Environment:
  POSTWIRE_POSTS_URL, POSTWIRE_LOGIN_URL, POSTWIRE_TIMEOUT_SECS, RUST_LOG";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Posts { id: Option<i64> },
    Login { email: String },
    Help,
}

fn parse_args(args: &[String]) -> Result<Command> {
    match args.first().map(String::as_str) {
        None | Some("--help") | Some("-h") => Ok(Command::Help),
        Some("posts") => {
            let id = args
                .get(1)
                .map(|raw| raw.parse::<i64>().with_context(|| format!("Invalid post id: {}", raw)))
                .transpose()?;
            Ok(Command::Posts { id })
        }
        Some("login") => match args.get(1) {
            Some(email) => Ok(Command::Login { email: email.clone() }),
            None => bail!("login requires an email address\n\n{}", USAGE),
        },
        Some(other) => bail!("Unknown command: {}\n\n{}", other, USAGE),
    }
}

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let command = parse_args(&args)?;
    if command == Command::Help {
        println!("{}", USAGE);
        return Ok(());
    }

    let config = ServiceConfig::load()?;
    info!(posts_url = %config.posts_url, login_url = %config.login_url, "Configuration loaded");

    let transport: Arc<dyn Transport> = Arc::new(
        ReqwestTransport::new(config.request_timeout()).context("Failed to create HTTP client")?,
    );

    match command {
        Command::Posts { id } => show_posts(PostService::new(transport, &config), id).await,
        Command::Login { email } => login(AuthService::new(transport, &config), &email).await,
        Command::Help => Ok(()),
    }
}

async fn show_posts(service: PostService, id: Option<i64>) -> Result<()> {
    let count = service.refresh().await.context("Could not fetch posts")?;

    match id {
        Some(id) => {
            let post = service
                .post(id)
                .ok_or_else(|| anyhow::anyhow!("Post {} not found", id))?;
            println!("#{} {}", post.id, post.title);
            if !post.body.is_empty() {
                println!();
                println!("{}", post.body);
            }
        }
        None => {
            for post in service.posts().borrow().iter() {
                println!("{:>4}  {}", post.id, post.display_title());
            }
            println!("{} posts ({})", count, service.status().get().display());
        }
    }
    Ok(())
}

async fn login(service: AuthService, email: &str) -> Result<()> {
    let password = rpassword::prompt_password(format!("Password for {}: ", email))
        .context("Failed to read password")?;

    service
        .login(email, password)
        .await
        .context("Login failed")?;

    if service.is_authenticated() {
        println!("Logged in as {}, token stored for this session", email);
    }
    Ok(())
}
