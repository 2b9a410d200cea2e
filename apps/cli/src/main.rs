use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use client_core::{
    in_memory::{InMemoryAccounts, InMemoryCatalog},
    FormField, LoadState, ProductFeed, RegistrationController, RegistrationService, ScreenRouter,
    ScreenState,
};
use shared::protocol::RegisterRequest;
use tracing::info;
use tracing_subscriber::EnvFilter;

mod config;

use config::{load_settings, Settings};

#[derive(Parser, Debug)]
#[command(about = "Drive the marketplace registration and product grid flows")]
struct Cli {
    #[arg(long, default_value = "marketplace.toml")]
    config: PathBuf,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fill in the registration form and submit it.
    Register {
        #[arg(long, default_value = "")]
        name: String,
        #[arg(long, default_value = "")]
        email: String,
        #[arg(long, default_value = "")]
        password: String,
        #[arg(long, default_value = "")]
        repeat_password: String,
        /// Emails that already have an account.
        #[arg(long = "taken")]
        taken: Vec<String>,
    },
    /// Scroll through the product grid one row at a time.
    Browse {
        #[arg(long, default_value_t = 30)]
        scroll_steps: usize,
        #[arg(long, default_value_t = 2)]
        columns: usize,
        /// Items visible at once.
        #[arg(long, default_value_t = 6)]
        viewport: usize,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let settings = load_settings(&cli.config)?;
    info!(?settings, config = %cli.config.display(), "settings loaded");

    match cli.command {
        Command::Register {
            name,
            email,
            password,
            repeat_password,
            taken,
        } => {
            register(
                &settings,
                [name, email, password, repeat_password],
                taken,
            )
            .await
        }
        Command::Browse {
            scroll_steps,
            columns,
            viewport,
        } => browse(&settings, scroll_steps, columns.max(1), viewport.max(1)).await,
    }
}

async fn register(settings: &Settings, values: [String; 4], taken: Vec<String>) -> Result<()> {
    let accounts = InMemoryAccounts::new();
    for email in taken {
        accounts
            .register(&RegisterRequest {
                name: "existing".to_string(),
                email: email.clone(),
                password: "existing1".to_string(),
            })
            .await
            .with_context(|| format!("failed to seed account '{email}'"))?;
    }

    let mut controller = RegistrationController::with_password_max_len(settings.password_max_len);
    let mut router = ScreenRouter::default();

    for (field, value) in FormField::ALL.into_iter().zip(values) {
        controller.on_field_changed(field, value);
    }
    if let Some(banner) = controller.screen_state().error_message() {
        println!("form: {banner}");
    }

    let snapshot = controller.snapshot();
    controller.submit(&accounts, snapshot).await;
    controller.sync_navigation(&mut router);

    match controller.screen_state() {
        ScreenState::Success(user) => {
            println!("registered: {}", serde_json::to_string(user)?);
        }
        state => {
            let banner = state.error_message().unwrap_or("registration did not complete");
            println!("error: {banner}");
            for field in FormField::ALL {
                println!("  {field:?}: {:?}", controller.field_state(field));
            }
        }
    }
    println!("screen: {}", router.current().route());
    Ok(())
}

async fn browse(
    settings: &Settings,
    scroll_steps: usize,
    columns: usize,
    viewport: usize,
) -> Result<()> {
    let catalog = InMemoryCatalog::generated(settings.catalog_size);
    if catalog.is_empty() {
        println!("catalog is empty; nothing to browse");
        return Ok(());
    }
    let mut feed = ProductFeed::new(settings.feed_options());

    feed.load_next(&catalog).await;
    report_page(&feed);

    let mut last_visible = viewport - 1;
    for step in 0..scroll_steps {
        let total = feed.items().len();
        if total == 0 {
            break;
        }
        let index = last_visible.min(total - 1);
        if feed.scroll_to(&catalog, Some(index)).await {
            println!("step {step}: last visible #{index} reached the end");
            report_page(&feed);
        }
        last_visible += columns;
    }

    println!(
        "loaded {} of {} products ({:?})",
        feed.items().len(),
        catalog.len(),
        feed.state()
    );
    Ok(())
}

fn report_page(feed: &ProductFeed) {
    match feed.state() {
        LoadState::Failed(reason) => println!("  page failed: {reason}"),
        state => println!(
            "  {} products loaded, next cursor {} ({state:?})",
            feed.items().len(),
            feed.next_cursor().0
        ),
    }
}
