//! Action entrypoint.
//!
//! Loads inputs from the environment, wires the live backend and runs the
//! selected workflow. Any fatal error is surfaced to the workflow log as an
//! `::error::` command and the process exits non-zero; soft conditions never
//! reach this level.

#![cfg_attr(not(test), forbid(unsafe_code))]

use tracing::info;

use theme_actions::backend::LiveBackend;
use theme_actions::config::ActionConfig;
use theme_actions::error::ActionError;
use theme_actions::github::{CommentsClient, GithubContext};
use theme_actions::shopify::ThemesClient;
use theme_actions::themekit::ThemeKit;
use theme_actions::{outputs, workflow};

// ::error:: output must go to stdout for the runner to pick it up
#[allow(clippy::print_stdout)]
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    if let Err(e) = run().await {
        // the equivalent of setFailed: an error annotation on the run
        println!("::error::{e}");
        std::process::exit(1);
    }
}

async fn run() -> Result<(), ActionError> {
    // Load .env file if present (ignore errors if not found)
    let _ = dotenvy::dotenv();

    let config = ActionConfig::from_env()?;
    let context = GithubContext::from_env();
    info!(action = %config.action, "Running Shopify theme action");

    let themes = ThemesClient::new(&config.shopify);
    let themekit = ThemeKit::new(&config.shopify, config.themekit_flags.clone());
    let comments = match (&config.github_token, &context) {
        (Some(token), Some(ctx)) => Some(CommentsClient::new(ctx, token.clone())),
        _ => None,
    };
    let backend = LiveBackend::new(themes, themekit, comments);

    if let Some(action_outputs) = workflow::run(&backend, &config, context.as_ref()).await? {
        outputs::publish(&action_outputs)?;
    }

    info!("Action completed");
    Ok(())
}
