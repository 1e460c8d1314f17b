use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

/// Media categories served through the CDN
///
/// Every signing operation is tagged with a category so logs and callers can tell
/// question images, explainer videos and learner recordings apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaCategory {
    Image,
    Video,
    Audio,
}

impl MediaCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MediaCategory::Image => "image",
            MediaCategory::Video => "video",
            MediaCategory::Audio => "audio",
        }
    }
}

impl FromStr for MediaCategory {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "image" => Ok(MediaCategory::Image),
            "video" => Ok(MediaCategory::Video),
            "audio" => Ok(MediaCategory::Audio),
            _ => Err(anyhow::anyhow!("Invalid media category: {}", s)),
        }
    }
}

impl Display for MediaCategory {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(self.as_str())
    }
}
