//! Reply descriptors.

use serde::{Deserialize, Serialize};

/// Color class of a reply, mapped to a concrete palette at delivery time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ColorClass {
    Default,
    Success,
    Failure,
}

/// A rendered reply, free of any transport types.
///
/// `channel_name` names the destination channel; the empty string is the
/// contextual sentinel meaning "wherever the triggering message arrived".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub title: String,
    pub body: String,
    pub color: ColorClass,
    pub channel_name: String,
}

impl Reply {
    /// Whether this reply falls back to the triggering message's channel.
    pub fn wants_contextual_channel(&self) -> bool {
        self.channel_name.is_empty()
    }

    /// Fallback reply for when the catalog itself failed to render.
    pub fn misconfiguration(reason: impl Into<String>) -> Self {
        Self {
            title: "Misconfiguration".to_string(),
            body: reason.into(),
            color: ColorClass::Failure,
            channel_name: String::new(),
        }
    }
}
