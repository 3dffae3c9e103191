use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Move, RoundId, UserId};

/// A user's validated best result on a round.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Score {
    /// Round the score belongs to.
    pub round_id: RoundId,
    /// User who achieved the score.
    pub user_id: UserId,
    /// Number of moves in the solution, in `1..=MAX_SCORED_MOVES`.
    pub moves: u32,
    /// The replayable solution.
    pub move_sequence: Vec<Move>,
    /// When the solution was submitted.
    pub completed_at: DateTime<Utc>,
    /// How many times the user has improved their score on this round.
    #[serde(default = "first_attempt")]
    pub attempt_count: u32,
}

impl Score {
    /// Whether this score should replace `best`: only strictly fewer moves do.
    #[must_use]
    pub const fn improves_on(&self, best: &Score) -> bool {
        self.moves < best.moves
    }
}

const fn first_attempt() -> u32 {
    1
}

/// Rank tier awarded within a round's leaderboard.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Medal {
    /// Lowest move count on the round.
    Gold,
    /// Second-lowest move count.
    Silver,
    /// Third-lowest move count.
    Bronze,
}

impl Medal {
    /// Medal awarded to the provided 1-based tier, if any.
    #[must_use]
    pub const fn for_tier(tier: u32) -> Option<Medal> {
        match tier {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }

    /// Points contributed to the global leaderboard.
    #[must_use]
    pub const fn points(self) -> u32 {
        match self {
            Medal::Gold => 3,
            Medal::Silver => 2,
            Medal::Bronze => 1,
        }
    }
}

/// Reasons a username is rejected.
#[derive(Clone, Copy, Debug, Error, PartialEq, Eq)]
pub enum UsernameError {
    /// Fewer than three characters after trimming.
    #[error("username must be at least 3 characters long")]
    TooShort,
    /// More than twenty characters after trimming.
    #[error("username must be no more than 20 characters long")]
    TooLong,
    /// Contains something other than letters, digits, `-` or `_`.
    #[error("username can only contain letters, numbers, hyphens, and underscores")]
    InvalidCharacter,
}

/// Public display name chosen by a user.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Trims and validates a username.
    pub fn parse(raw: &str) -> Result<Self, UsernameError> {
        let trimmed = raw.trim();
        let length = trimmed.chars().count();
        if length < 3 {
            return Err(UsernameError::TooShort);
        }
        if length > 20 {
            return Err(UsernameError::TooLong);
        }
        if !trimmed
            .chars()
            .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
        {
            return Err(UsernameError::InvalidCharacter);
        }
        Ok(Self(trimmed.to_owned()))
    }

    /// The validated name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Username::parse(&value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

/// Identity attributes supplied by the external identity provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Identity {
    /// Opaque stable user identifier.
    pub user_id: UserId,
    /// Email address, when the provider shares one.
    #[serde(default)]
    pub email: Option<String>,
    /// Chosen display name, when set.
    #[serde(default)]
    pub username: Option<Username>,
}

impl Identity {
    /// Creates an identity carrying only the user id.
    #[must_use]
    pub fn anonymous(user_id: UserId) -> Self {
        Self {
            user_id,
            email: None,
            username: None,
        }
    }

    /// Name shown on leaderboards: the username, else the email, else the id.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.username
            .as_ref()
            .map(Username::as_str)
            .or(self.email.as_deref())
            .unwrap_or_else(|| self.user_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(moves: u32) -> Score {
        Score {
            round_id: RoundId::new("round"),
            user_id: UserId::new("user"),
            moves,
            move_sequence: Vec::new(),
            completed_at: DateTime::<Utc>::from_timestamp(1_700_000_000, 0).expect("timestamp"),
            attempt_count: 1,
        }
    }

    #[test]
    fn only_strictly_fewer_moves_improve() {
        assert!(score(9).improves_on(&score(12)));
        assert!(!score(12).improves_on(&score(12)));
        assert!(!score(15).improves_on(&score(12)));
    }

    #[test]
    fn username_is_trimmed_and_checked() {
        assert_eq!(
            Username::parse("  robo_fan-7 ").map(|name| name.as_str().to_owned()),
            Ok("robo_fan-7".to_owned())
        );
        assert_eq!(Username::parse("ab"), Err(UsernameError::TooShort));
        assert_eq!(
            Username::parse("a".repeat(21).as_str()),
            Err(UsernameError::TooLong)
        );
        assert_eq!(
            Username::parse("robot fan"),
            Err(UsernameError::InvalidCharacter)
        );
    }

    #[test]
    fn display_name_falls_back_to_email_then_id() {
        let mut identity = Identity::anonymous(UserId::new("sub-123"));
        assert_eq!(identity.display_name(), "sub-123");
        identity.email = Some("player@example.com".to_owned());
        assert_eq!(identity.display_name(), "player@example.com");
        identity.username = Some(Username::parse("ricochet").expect("valid username"));
        assert_eq!(identity.display_name(), "ricochet");
    }

    #[test]
    fn medal_tiers_and_points() {
        assert_eq!(Medal::for_tier(1), Some(Medal::Gold));
        assert_eq!(Medal::for_tier(3), Some(Medal::Bronze));
        assert_eq!(Medal::for_tier(4), None);
        assert_eq!(Medal::for_tier(0), None);
        assert_eq!(
            Medal::Gold.points() * 2 + Medal::Silver.points(),
            8,
            "two gold and one silver are worth eight points"
        );
    }
}
