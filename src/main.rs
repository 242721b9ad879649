mod bot;
mod fetch;
mod intake;
mod profile;
mod reply;
mod sandbox;
mod slack;
mod staging;

use bot::{Bot, BotConfig, SnippetPipeline};
use fetch::{Fetcher, FetcherConfig};
use intake::{Intake, IntakeConfig};
use profile::{Registry, SnippetsConfig};
use sandbox::{DockerRuntime, SandboxConfig, SandboxExecutor};
use slack::{ChatPlatform, SlackClient, SlackConfig};
use staging::{RandomJobIds, StagingStore};
use std::sync::Arc;
use tokio::signal;
use tracing::{Level, error, info};
use tracing_subscriber::fmt;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let level = std::env::var("SNIPBOT_LOG_LEVEL")
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(Level::INFO);

    fmt()
        .with_max_level(level)
        .with_target(true)
        .with_thread_ids(true)
        .with_file(true)
        .with_line_number(true)
        .init();

    info!("Starting snipbot...");

    let config = BotConfig::from_env()?;
    let snippets = SnippetsConfig::load(&config.languages_path)?;
    let sandbox_config = SandboxConfig {
        runtime_binary: config.container_runtime.clone(),
        ..SandboxConfig::from_snippets(&snippets)
    };
    let staging = StagingStore::prepare(&snippets.folder).await?;
    let registry = Arc::new(Registry::new(snippets));

    info!(
        languages = %registry.supported().join(", "),
        staging_dir = %staging.dir().display(),
        runtime = %sandbox_config.runtime_binary,
        "Configuration loaded"
    );

    let platform: Arc<dyn ChatPlatform> = Arc::new(SlackClient::new(SlackConfig {
        api_base: config.slack_api_base.clone(),
        ..SlackConfig::new(config.slack_token.clone())
    })?);

    let prefetch = sandbox_config.prefetch_images;
    let executor = SandboxExecutor::new(
        Arc::new(DockerRuntime::new(&sandbox_config)),
        sandbox_config,
    );

    if prefetch {
        let images = registry.images();
        let executor = executor.clone();
        tokio::spawn(async move {
            executor.prefetch_images(&images).await;
        });
    }

    let pipeline = Arc::new(SnippetPipeline::new(
        registry,
        Fetcher::new(FetcherConfig::default())?,
        staging,
        executor,
        Arc::clone(&platform),
        Arc::new(RandomJobIds),
        config.slack_token.clone(),
    ));

    let bot = Bot::connect(pipeline, platform).await?;
    info!(bot_id = bot.bot_id(), "Connected to chat platform");

    let (intake, mut events) = Intake::new(IntakeConfig {
        listen_addr: config.listen_addr.clone(),
        listen_port: config.listen_port,
        ..Default::default()
    })
    .await?;
    info!(addr = %intake.local_addr()?, "Intake initialized");

    let intake_handle = tokio::spawn(async move {
        if let Err(e) = intake.run().await {
            error!(error = %e, "Intake server error");
        }
    });

    info!("Entering main loop...");

    loop {
        tokio::select! {
            Some(event) = events.recv() => {
                bot.dispatch(&event.body);
            }
            _ = async {
                signal::ctrl_c().await.ok();
            } => {
                info!("Received shutdown signal");
                break;
            }
        }
    }

    // In-flight jobs are left to their sandbox timeouts; --rm cleans up containers
    intake_handle.abort();

    info!("Goodbye!");
    Ok(())
}
