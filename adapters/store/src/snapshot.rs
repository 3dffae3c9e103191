use std::collections::BTreeMap;

use ricochet_core::{store::Profile, Configuration, Round, Score};
use serde::{Deserialize, Serialize};

use crate::{MemoryBackend, StoreSettings, Tables};

/// Serializable copy of every table held by a [`MemoryBackend`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    /// Stored board configurations.
    #[serde(default)]
    pub configurations: Vec<Configuration>,
    /// Stored rounds, solved or not.
    #[serde(default)]
    pub rounds: Vec<Round>,
    /// Best score of every user on every round.
    #[serde(default)]
    pub scores: Vec<Score>,
    /// User profiles.
    #[serde(default)]
    pub profiles: Vec<Profile>,
}

impl MemoryBackend {
    /// Copies every table out of the backend.
    #[must_use]
    pub fn snapshot(&self) -> Snapshot {
        let tables = self.lock();
        Snapshot {
            configurations: tables.configurations.values().cloned().collect(),
            rounds: tables.rounds.values().cloned().collect(),
            scores: tables.scores.values().cloned().collect(),
            profiles: tables.profiles.values().cloned().collect(),
        }
    }

    /// Rebuilds a backend from a snapshot.
    ///
    /// Later entries win when the snapshot repeats a key. New configuration
    /// ids continue after the highest numeric id found.
    #[must_use]
    pub fn restore(settings: StoreSettings, snapshot: Snapshot) -> Self {
        let last_config_id = snapshot
            .configurations
            .iter()
            .filter_map(|configuration| configuration.config_id().as_str().parse::<u64>().ok())
            .max()
            .unwrap_or(0);

        let tables = Tables {
            configurations: snapshot
                .configurations
                .into_iter()
                .map(|configuration| (configuration.config_id().clone(), configuration))
                .collect(),
            last_config_id,
            rounds: snapshot
                .rounds
                .into_iter()
                .map(|round| (round.round_id().clone(), round))
                .collect(),
            scores: snapshot
                .scores
                .into_iter()
                .map(|score| ((score.round_id.clone(), score.user_id.clone()), score))
                .collect::<BTreeMap<_, _>>(),
            profiles: snapshot
                .profiles
                .into_iter()
                .map(|profile| (profile.identity.user_id.clone(), profile))
                .collect(),
        };
        log::debug!(
            "restored {} configurations, {} rounds, {} scores",
            tables.configurations.len(),
            tables.rounds.len(),
            tables.scores.len()
        );

        Self::with_tables(settings, tables)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use ricochet_core::{
        store::{ConfigurationStore, RoundStore, ScoreStore},
        Board, Cell, ConfigurationDraft, RobotColor, Robots, RoundId, TargetPosition, UserId,
    };

    use super::*;

    fn at(seconds: i64) -> DateTime<Utc> {
        DateTime::<Utc>::from_timestamp(1_700_000_000 + seconds, 0).expect("timestamp")
    }

    #[test]
    fn restored_backend_keeps_tables_and_id_sequence() {
        let backend = MemoryBackend::new(StoreSettings::default());
        let alice = UserId::new("alice");
        let created = backend
            .configurations()
            .create(ConfigurationDraft::new([], [Cell::new(4, 4)]), &alice, at(0))
            .expect("created");

        let robots = Robots::new([
            Cell::new(0, 0),
            Cell::new(1, 0),
            Cell::new(2, 0),
            Cell::new(3, 0),
            Cell::new(5, 0),
        ])
        .expect("valid placement");
        let round = Round::new(
            RoundId::new("r1"),
            created.config_id().clone(),
            alice.clone(),
            at(1),
            robots,
            TargetPosition {
                color: RobotColor::Blue,
                cell: Cell::new(4, 4),
            },
            Board::standard(),
        )
        .expect("valid round");
        backend.rounds().create(round).expect("stored");
        let _ = backend
            .rounds()
            .mark_solved(&RoundId::new("r1"), &alice, at(3))
            .expect("marked");
        let _ = backend
            .scores()
            .upsert_if_better(Score {
                round_id: RoundId::new("r1"),
                user_id: alice.clone(),
                moves: 7,
                move_sequence: Vec::new(),
                completed_at: at(3),
                attempt_count: 2,
            })
            .expect("stored");

        let json = serde_json::to_string(&backend.snapshot()).expect("snapshot serializes");
        let snapshot: Snapshot = serde_json::from_str(&json).expect("snapshot parses");
        let restored = MemoryBackend::restore(StoreSettings::default(), snapshot);

        assert_eq!(restored.snapshot(), backend.snapshot());
        assert_eq!(restored.rounds().list_solved().expect("listed").len(), 1);

        let next = restored
            .configurations()
            .create(ConfigurationDraft::new([], [Cell::new(9, 9)]), &alice, at(9))
            .expect("created");
        assert_ne!(next.config_id(), created.config_id());
    }

    #[test]
    fn empty_document_restores_an_empty_backend() {
        let snapshot: Snapshot = serde_json::from_str("{}").expect("snapshot parses");
        let restored = MemoryBackend::restore(StoreSettings::default(), snapshot);
        assert_eq!(restored.snapshot(), Snapshot::default());
    }
}
