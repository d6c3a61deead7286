//! Message template catalog.
//!
//! Templates come from a JSON file keyed by message name, with built-in
//! defaults when no file is configured. Placeholders use `{name}` syntax;
//! doubled braces escape to literals. Rendering fails on an unknown key or
//! an unfilled placeholder, and silently ignores surplus arguments.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use super::reply::{ColorClass, Reply};
use crate::error::{BotError, Result};

/// Every key the bot renders; the catalog must cover these at startup.
pub const RENDERED_KEYS: [&str; 7] = [
    "hello",
    "help",
    "invalid-command",
    "unauthorized-user",
    "bot-not-ready",
    "update-success",
    "update-failure",
];

/// One template in the catalog, in the message file's shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageTemplate {
    pub title: String,
    #[serde(rename = "description")]
    pub body: String,
    pub color: ColorClass,
    /// Destination channel name; empty means contextual
    #[serde(default)]
    pub channel: String,
}

/// Immutable catalog of reply templates, loaded once at startup.
pub struct MessageCatalog {
    templates: HashMap<String, MessageTemplate>,
}

impl MessageCatalog {
    /// Load a catalog from a JSON file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let templates: HashMap<String, MessageTemplate> = serde_json::from_str(&content)?;
        info!(path = %path.display(), templates = templates.len(), "Message catalog loaded");
        Ok(Self { templates })
    }

    /// The built-in template set.
    pub fn built_in() -> Self {
        let mut templates = HashMap::new();

        templates.insert(
            "hello".to_string(),
            MessageTemplate {
                title: "Hello!".to_string(),
                body: "Hi {mention}, I'm {name}! Try `{prefix}help` to see what I can do."
                    .to_string(),
                color: ColorClass::Default,
                channel: String::new(),
            },
        );
        templates.insert(
            "help".to_string(),
            MessageTemplate {
                title: "Help".to_string(),
                body: "{desc}".to_string(),
                color: ColorClass::Default,
                channel: String::new(),
            },
        );
        templates.insert(
            "invalid-command".to_string(),
            MessageTemplate {
                title: "Unknown Command".to_string(),
                body: "I don't recognize that command. Try `{prefix}help` for the list of commands I know."
                    .to_string(),
                color: ColorClass::Failure,
                channel: String::new(),
            },
        );
        templates.insert(
            "unauthorized-user".to_string(),
            MessageTemplate {
                title: "Unauthorized".to_string(),
                body: "Sorry {mention}, you don't have permission to run that command."
                    .to_string(),
                color: ColorClass::Failure,
                channel: String::new(),
            },
        );
        templates.insert(
            "bot-not-ready".to_string(),
            MessageTemplate {
                title: "Hold On".to_string(),
                body: "{mention} I'm still syncing the course catalog. Try again in a moment."
                    .to_string(),
                color: ColorClass::Default,
                channel: String::new(),
            },
        );
        templates.insert(
            "update-success".to_string(),
            MessageTemplate {
                title: "Catalog Updated".to_string(),
                body: "Inserted {inserted} course(s), corrected {updated}. {courses} course(s) on record."
                    .to_string(),
                color: ColorClass::Success,
                channel: "general".to_string(),
            },
        );
        templates.insert(
            "update-failure".to_string(),
            MessageTemplate {
                title: "Catalog Update Failed".to_string(),
                body: "The course catalog could not be refreshed: {reason}".to_string(),
                color: ColorClass::Failure,
                channel: "general".to_string(),
            },
        );

        Self { templates }
    }

    /// Check that every listed key has a template.
    pub fn validate(&self, keys: &[&str]) -> Result<()> {
        let missing: Vec<&str> = keys
            .iter()
            .filter(|key| !self.templates.contains_key(**key))
            .copied()
            .collect();
        if missing.is_empty() {
            Ok(())
        } else {
            Err(BotError::Config(format!(
                "message catalog is missing templates: {}",
                missing.join(", ")
            )))
        }
    }

    /// Render a template into a reply, substituting `{placeholder}` args.
    pub fn render(&self, key: &str, args: &[(&str, String)]) -> Result<Reply> {
        let template = self
            .templates
            .get(key)
            .ok_or_else(|| BotError::Config(format!("message catalog has no template '{}'", key)))?;

        let title = fill(&template.title, args)
            .map_err(|reason| BotError::Config(format!("template '{}': {}", key, reason)))?;
        let body = fill(&template.body, args)
            .map_err(|reason| BotError::Config(format!("template '{}': {}", key, reason)))?;

        Ok(Reply {
            title,
            body,
            color: template.color,
            channel_name: template.channel.clone(),
        })
    }
}

/// Substitute `{name}` placeholders from `args`.
///
/// `{{` and `}}` escape to literal braces. A placeholder with no matching
/// argument is an error; arguments with no matching placeholder are not.
fn fill(template: &str, args: &[(&str, String)]) -> std::result::Result<String, String> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' => {
                if chars.peek() == Some(&'{') {
                    chars.next();
                    out.push('{');
                    continue;
                }
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => name.push(c),
                        None => return Err("unterminated placeholder".to_string()),
                    }
                }
                match args.iter().find(|(key, _)| *key == name) {
                    Some((_, value)) => out.push_str(value),
                    None => return Err(format!("no argument for placeholder '{{{}}}'", name)),
                }
            }
            '}' => {
                if chars.peek() == Some(&'}') {
                    chars.next();
                    out.push('}');
                } else {
                    return Err("stray '}' outside a placeholder".to_string());
                }
            }
            c => out.push(c),
        }
    }

    Ok(out)
}
