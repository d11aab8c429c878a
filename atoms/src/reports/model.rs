use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::media::{ImageAsset, MediaError};

/// Shown until the first resolution attempt reports back
pub const UNRESOLVED_ADDRESS_TEXT: &str = "Location not resolved yet";

/// Urgency of a complaint. The first variant is the default selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Priority {
    #[default]
    High,
    Medium,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Medium, Priority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "High",
            Priority::Medium => "Medium",
            Priority::Low => "Low",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!("unknown priority: {}", other)),
        }
    }
}

/// In-progress complaint data owned by one workflow instance
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDraft {
    pub title: String,
    pub description: String,
    pub address: String,
    pub timestamp: String,
    pub priority: Priority,
    pub image: Option<ImageAsset>,
}

impl ReportDraft {
    pub fn new(timestamp: impl Into<String>) -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            address: UNRESOLVED_ADDRESS_TEXT.to_string(),
            timestamp: timestamp.into(),
            priority: Priority::default(),
            image: None,
        }
    }
}

/// Validated complaint, ready to hand to the submission boundary.
///
/// Serializes to `{title, description, address, timestamp, priority, imageData}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportPayload {
    title: String,
    description: String,
    address: String,
    timestamp: String,
    priority: String,
    #[serde(rename = "imageData")]
    image_data: String,
}

impl ReportPayload {
    pub(crate) fn new(
        title: String,
        description: String,
        address: String,
        timestamp: String,
        priority: Priority,
        image_data: String,
    ) -> Self {
        Self {
            title,
            description,
            address,
            timestamp,
            priority: priority.as_str().to_string(),
            image_data,
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn address(&self) -> &str {
        &self.address
    }

    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    pub fn priority(&self) -> &str {
        &self.priority
    }

    /// Base-64 text of the image bytes
    pub fn image_data(&self) -> &str {
        &self.image_data
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("a title is required")]
    MissingTitle,

    #[error("a description is required")]
    MissingDescription,

    #[error("an image is required")]
    MissingImage,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssembleError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("failed to process the image: {0}")]
    ImageEncodingFailed(#[source] MediaError),
}
