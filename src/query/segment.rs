//! Audience segments for notification campaigns.
//!
//! A segment is a named audience-selection rule. The wire discriminator is
//! `segment_type`; each kind has a closed shape, validated when the request
//! is built rather than trusted as an opaque payload.

use serde::{Deserialize, Serialize};

use crate::error::{ConsoleError, Result};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "segment_type", rename_all = "snake_case")]
pub enum Segment {
    /// Every registered player.
    AllUsers,
    /// Players matching criteria evaluated server-side.
    Criteria {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        min_deposit: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        country: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        registered_after: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        last_active_after: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        vip_level: Option<u8>,
    },
    /// An explicit player-id list, typically sourced from an uploaded file.
    PlayerList { player_ids: Vec<String> },
}

impl Segment {
    /// Validate at the request-construction boundary.
    pub fn validate(&self) -> Result<()> {
        match self {
            Self::AllUsers => Ok(()),
            Self::Criteria {
                min_deposit,
                country,
                registered_after,
                last_active_after,
                vip_level,
            } => {
                if min_deposit.is_none()
                    && country.is_none()
                    && registered_after.is_none()
                    && last_active_after.is_none()
                    && vip_level.is_none()
                {
                    return Err(ConsoleError::InvalidSegment(
                        "criteria segment sets no criteria".to_string(),
                    ));
                }
                if let Some(deposit) = min_deposit
                    && *deposit < 0.0
                {
                    return Err(ConsoleError::InvalidSegment(
                        "min_deposit cannot be negative".to_string(),
                    ));
                }
                Ok(())
            }
            Self::PlayerList { player_ids } => {
                if player_ids.is_empty() {
                    return Err(ConsoleError::InvalidSegment(
                        "player list is empty".to_string(),
                    ));
                }
                if player_ids.iter().any(|id| id.trim().is_empty()) {
                    return Err(ConsoleError::InvalidSegment(
                        "player list contains a blank id".to_string(),
                    ));
                }
                Ok(())
            }
        }
    }
}
