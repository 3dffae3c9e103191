//! Single-line share codes that carry a complete round between invocations.
//!
//! A code reads `ricochet:v1:<payload>`, where the payload is the round's
//! JSON wire form encoded as unpadded base64.

use std::{error::Error, fmt};

use base64::{engine::general_purpose::STANDARD_NO_PAD, Engine as _};
use ricochet_core::Round;

const CODE_DOMAIN: &str = "ricochet";
const CODE_VERSION: &str = "v1";

/// Prefix emitted before the encoded round payload.
pub(crate) const CODE_HEADER: &str = "ricochet:v1";
const FIELD_DELIMITER: char = ':';

/// Encodes `round` into a share code.
pub(crate) fn encode(round: &Round) -> Result<String, ShareCodeError> {
    let json = serde_json::to_vec(round).map_err(ShareCodeError::InvalidPayload)?;
    Ok(format!("{CODE_HEADER}:{}", STANDARD_NO_PAD.encode(json)))
}

/// Decodes the round carried by a share code.
pub(crate) fn decode(value: &str) -> Result<Round, ShareCodeError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ShareCodeError::Empty);
    }

    let mut parts = trimmed.split(FIELD_DELIMITER);
    let domain = parts.next().ok_or(ShareCodeError::MissingPrefix)?;
    let version = parts.next().ok_or(ShareCodeError::MissingVersion)?;
    let payload = parts.next().ok_or(ShareCodeError::MissingPayload)?;
    if parts.next().is_some() {
        return Err(ShareCodeError::TrailingSegments);
    }

    if domain != CODE_DOMAIN {
        return Err(ShareCodeError::InvalidPrefix(domain.to_owned()));
    }
    if version != CODE_VERSION {
        return Err(ShareCodeError::UnsupportedVersion(version.to_owned()));
    }

    let bytes = STANDARD_NO_PAD
        .decode(payload.as_bytes())
        .map_err(ShareCodeError::InvalidEncoding)?;
    serde_json::from_slice(&bytes).map_err(ShareCodeError::InvalidPayload)
}

/// Errors raised while reading or writing share codes.
#[derive(Debug)]
pub(crate) enum ShareCodeError {
    /// The code was empty or whitespace.
    Empty,
    /// The domain segment was missing.
    MissingPrefix,
    /// The version segment was missing.
    MissingVersion,
    /// The payload segment was missing.
    MissingPayload,
    /// The code carried more segments than expected.
    TrailingSegments,
    /// The code belongs to another domain.
    InvalidPrefix(String),
    /// The code uses a version this binary cannot read.
    UnsupportedVersion(String),
    /// The payload was not valid base64.
    InvalidEncoding(base64::DecodeError),
    /// The payload did not hold a valid round.
    InvalidPayload(serde_json::Error),
}

impl fmt::Display for ShareCodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "share code was empty"),
            Self::MissingPrefix => write!(f, "share code is missing the prefix"),
            Self::MissingVersion => write!(f, "share code is missing the version"),
            Self::MissingPayload => write!(f, "share code is missing the round payload"),
            Self::TrailingSegments => write!(f, "share code has unexpected trailing segments"),
            Self::InvalidPrefix(prefix) => write!(f, "share code prefix '{prefix}' is not supported"),
            Self::UnsupportedVersion(version) => {
                write!(f, "share code version '{version}' is not supported")
            }
            Self::InvalidEncoding(error) => write!(f, "could not decode round payload: {error}"),
            Self::InvalidPayload(error) => write!(f, "round payload is not a valid round: {error}"),
        }
    }
}

impl Error for ShareCodeError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InvalidEncoding(error) => Some(error),
            Self::InvalidPayload(error) => Some(error),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use ricochet_core::{
        Board, Cell, ConfigId, RobotColor, Robots, RoundId, Side, TargetPosition, UserId, Wall,
    };

    use super::*;

    fn round() -> Round {
        let robots = Robots::new([
            Cell::new(12, 1),
            Cell::new(0, 0),
            Cell::new(5, 9),
            Cell::new(14, 14),
            Cell::new(3, 3),
        ])
        .expect("valid placement");
        Round::new(
            RoundId::new("0e0b7a4f"),
            ConfigId::new("7"),
            UserId::new("author"),
            DateTime::<Utc>::from_timestamp(1_700_000_000, 0).expect("timestamp"),
            robots,
            TargetPosition {
                color: RobotColor::Yellow,
                cell: Cell::new(4, 11),
            },
            Board::with_custom_walls([Wall::new(Cell::new(3, 4), Side::Right)]),
        )
        .expect("valid round")
    }

    #[test]
    fn carries_the_whole_round() {
        let round = round();
        let code = encode(&round).expect("round encodes");
        assert!(code.starts_with(&format!("{CODE_HEADER}:")));

        let decoded = decode(&format!("  {code}\n")).expect("code decodes");
        assert_eq!(decoded, round);
        assert!(decoded
            .board()
            .has_wall(Cell::new(4, 4), Side::Left));
    }

    #[test]
    fn rejects_malformed_codes() {
        assert!(matches!(decode("   "), Err(ShareCodeError::Empty)));
        assert!(matches!(
            decode("ricochet"),
            Err(ShareCodeError::MissingVersion)
        ));
        assert!(matches!(
            decode("ricochet:v1"),
            Err(ShareCodeError::MissingPayload)
        ));
        assert!(matches!(
            decode("puzzle:v1:abc"),
            Err(ShareCodeError::InvalidPrefix(prefix)) if prefix == "puzzle"
        ));
        assert!(matches!(
            decode("ricochet:v9:abc"),
            Err(ShareCodeError::UnsupportedVersion(version)) if version == "v9"
        ));
        assert!(matches!(
            decode("ricochet:v1:abc:def"),
            Err(ShareCodeError::TrailingSegments)
        ));
        assert!(matches!(
            decode("ricochet:v1:!!!"),
            Err(ShareCodeError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn rejects_payloads_that_break_round_invariants() {
        let json = br#"{"roundId":"r","configId":"1","authorId":"a","createdAt":"2023-11-14T22:13:20Z","initialRobotPositions":{"red":"4,11","green":"0,0","blue":"1,0","yellow":"2,0","silver":"3,0"},"targetPosition":{"color":"red","cell":"4,11"},"walls":[]}"#;
        let code = format!("{CODE_HEADER}:{}", STANDARD_NO_PAD.encode(json));
        assert!(matches!(
            decode(&code),
            Err(ShareCodeError::InvalidPayload(_))
        ));
    }
}
