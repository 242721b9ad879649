// Help and diagnostic commands addressed to the bot

use crate::profile::Registry;
use crate::reply::pre;
use regex::Regex;
use std::sync::Arc;

/// Routes `<@bot> snippets ...` messages
pub struct Commands {
    registry: Arc<Registry>,
    support: Regex,
    config: Regex,
}

impl Commands {
    pub fn new(registry: Arc<Registry>, bot_id: &str) -> Result<Self, regex::Error> {
        let mention = format!("<@{}>:?", regex::escape(bot_id));
        Ok(Self {
            registry,
            support: Regex::new(&format!(r"{} snippets support", mention))?,
            config: Regex::new(&format!(r"{} snippets config (.*)", mention))?,
        })
    }

    /// Reply for a message, or `None` when it is not a command
    pub fn respond(&self, text: &str) -> Option<String> {
        if self.support.is_match(text) {
            return Some(self.supported());
        }

        let lang = self.config.captures(text)?.get(1)?.as_str().trim();
        Some(pre(&self.registry.describe(lang)))
    }

    /// `I can run: a, b, c`
    pub fn supported(&self) -> String {
        format!("I can run: {}", self.registry.supported().join(", "))
    }
}
