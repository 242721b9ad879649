// Event dispatch

use crate::bot::commands::Commands;
use crate::bot::error::BotError;
use crate::bot::pipeline::SnippetPipeline;
use crate::slack::{ChatPlatform, MessageEvent, PlatformEvent};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

/// Turns platform events into snippet jobs, reruns and command replies.
/// Every accepted event runs on its own task.
pub struct Bot {
    pipeline: Arc<SnippetPipeline>,
    commands: Arc<Commands>,
    platform: Arc<dyn ChatPlatform>,
    bot_id: Arc<str>,
}

impl Bot {
    pub fn new(
        pipeline: Arc<SnippetPipeline>,
        platform: Arc<dyn ChatPlatform>,
        bot_id: &str,
    ) -> Result<Self, BotError> {
        let commands = Commands::new(Arc::clone(pipeline.registry()), bot_id)?;
        info!(bot_id = %bot_id, "bot ready");
        Ok(Self {
            pipeline,
            commands: Arc::new(commands),
            platform,
            bot_id: Arc::from(bot_id),
        })
    }

    /// Look up the bot identity on the platform, then build
    pub async fn connect(
        pipeline: Arc<SnippetPipeline>,
        platform: Arc<dyn ChatPlatform>,
    ) -> Result<Self, BotError> {
        let bot_id = platform.identity().await?;
        Self::new(pipeline, platform, &bot_id)
    }

    pub fn bot_id(&self) -> &str {
        &self.bot_id
    }

    /// Route one raw event. Returns the spawned task, if any.
    pub fn dispatch(&self, body: &str) -> Option<JoinHandle<()>> {
        let event: PlatformEvent = match serde_json::from_str(body) {
            Ok(event) => event,
            Err(e) => {
                warn!(error = %e, "dropping malformed event");
                return None;
            }
        };

        match event {
            PlatformEvent::Message(message) => self.on_message(message),
            PlatformEvent::ReactionAdded(reaction) => {
                let pipeline = Arc::clone(&self.pipeline);
                let bot_id = Arc::clone(&self.bot_id);
                Some(tokio::spawn(async move {
                    pipeline.rerun(&reaction, &bot_id).await;
                }))
            }
            PlatformEvent::Other => {
                debug!("ignoring event");
                None
            }
        }
    }

    fn on_message(&self, message: MessageEvent) -> Option<JoinHandle<()>> {
        if let Some(file) = message.shared_snippet() {
            if !self.pipeline.registry().is_supported(&file.filetype) {
                debug!(file_id = %file.id, filetype = %file.filetype, "unsupported snippet ignored");
                return None;
            }
            let pipeline = Arc::clone(&self.pipeline);
            let file = file.clone();
            return Some(tokio::spawn(async move {
                pipeline.run_snippet(&file).await;
            }));
        }

        if message.user.as_deref() == Some(&*self.bot_id) {
            return None;
        }
        let channel = message.channel?;
        let reply = self.commands.respond(message.text.as_deref()?)?;

        let platform = Arc::clone(&self.platform);
        Some(tokio::spawn(async move {
            if let Err(e) = platform.post_message(&channel, &reply).await {
                warn!(channel = %channel, error = %e, "failed to post command reply");
            }
        }))
    }
}
