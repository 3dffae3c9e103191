use std::thread;

use chrono::{DateTime, Utc};
use ricochet_core::{
    store::{
        ConfigurationStore, ProfileStore, RoundStore, ScoreStore, StoreError, UpsertOutcome,
    },
    Board, Cell, ConfigId, ConfigurationDraft, Identity, RobotColor, Robots, Round, RoundId, Score,
    TargetPosition, UserId, Username,
};
use ricochet_store::{MemoryBackend, StoreSettings};

fn at(seconds: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_700_000_000 + seconds, 0).expect("timestamp")
}

fn draft() -> ConfigurationDraft {
    ConfigurationDraft::new([], [Cell::new(4, 4), Cell::new(12, 2)])
}

fn round(round_id: &str, config_id: &ConfigId) -> Round {
    authored_round(round_id, config_id, "alice")
}

fn authored_round(round_id: &str, config_id: &ConfigId, author: &str) -> Round {
    let robots = Robots::new([
        Cell::new(0, 0),
        Cell::new(1, 1),
        Cell::new(2, 2),
        Cell::new(3, 3),
        Cell::new(5, 5),
    ])
    .expect("valid placement");
    Round::new(
        RoundId::new(round_id),
        config_id.clone(),
        UserId::new(author),
        at(0),
        robots,
        TargetPosition {
            color: RobotColor::Green,
            cell: Cell::new(4, 4),
        },
        Board::standard(),
    )
    .expect("valid round")
}

fn score(round_id: &str, user: &str, moves: u32, seconds: i64) -> Score {
    Score {
        round_id: RoundId::new(round_id),
        user_id: UserId::new(user),
        moves,
        move_sequence: Vec::new(),
        completed_at: at(seconds),
        attempt_count: 1,
    }
}

#[test]
fn private_configurations_become_visible_once_a_round_is_solved() {
    let backend = MemoryBackend::new(StoreSettings::default());
    let configurations = backend.configurations();
    let rounds = backend.rounds();
    let alice = UserId::new("alice");
    let bob = UserId::new("bob");

    let created = configurations.create(draft(), &alice, at(0)).expect("created");
    let config_id = created.config_id().clone();

    assert_eq!(configurations.get(&config_id, &alice), Ok(created.clone()));
    assert!(matches!(
        configurations.get(&config_id, &bob),
        Err(StoreError::NotFound(_))
    ));

    rounds
        .create(round("r1", &config_id))
        .expect("round stored");
    assert!(configurations.get(&config_id, &bob).is_err());

    assert_eq!(
        rounds.mark_solved(&RoundId::new("r1"), &alice, at(10)),
        Ok(true)
    );
    assert_eq!(configurations.get(&config_id, &bob), Ok(created));
}

#[test]
fn baseline_configurations_are_visible_to_everyone() {
    let settings = StoreSettings {
        baseline_author: UserId::new("curator"),
    };
    let backend = MemoryBackend::new(settings);
    let configurations = backend.configurations();

    let created = configurations
        .create(draft(), &UserId::new("curator"), at(0))
        .expect("created");
    assert!(created.is_baseline());
    assert_eq!(
        configurations.get(created.config_id(), &UserId::new("anyone")),
        Ok(created)
    );
}

#[test]
fn only_the_author_may_update_or_delete() {
    let backend = MemoryBackend::new(StoreSettings::default());
    let configurations = backend.configurations();
    let rounds = backend.rounds();
    let alice = UserId::new("alice");
    let mallory = UserId::new("mallory");

    let created = configurations.create(draft(), &alice, at(0)).expect("created");
    let config_id = created.config_id().clone();

    let replacement = ConfigurationDraft::new([], [Cell::new(0, 9)]);
    assert!(matches!(
        configurations.update(&config_id, replacement.clone(), &mallory, at(5)),
        Err(StoreError::Forbidden(_))
    ));
    assert!(matches!(
        configurations.delete(&config_id, &mallory),
        Err(StoreError::Forbidden(_))
    ));

    let updated = configurations
        .update(&config_id, replacement, &alice, at(30))
        .expect("updated");
    assert_eq!(updated.targets().len(), 1);
    assert_eq!(updated.config_id(), &config_id);
    assert_eq!(updated.created_at(), at(0));
    assert_eq!(updated.updated_at(), at(30));

    rounds
        .create(round("kept", &config_id))
        .expect("round stored");
    configurations
        .delete(&config_id, &alice)
        .expect("deleted");
    assert!(configurations.list(&alice).expect("listed").is_empty());
    assert_eq!(
        rounds.list_for_config(&config_id).expect("listed").len(),
        1,
        "rounds outlive their configuration"
    );
}

#[test]
fn first_solve_is_recorded_once() {
    let backend = MemoryBackend::new(StoreSettings::default());
    let rounds = backend.rounds();
    let config_id = ConfigId::new("1");
    rounds.create(round("r1", &config_id)).expect("stored");
    rounds.create(round("r2", &config_id)).expect("stored");
    assert!(matches!(
        rounds.create(round("r1", &config_id)),
        Err(StoreError::Duplicate(_))
    ));

    assert_eq!(
        rounds.mark_solved(&RoundId::new("r1"), &UserId::new("alice"), at(1)),
        Ok(true)
    );
    assert_eq!(
        rounds.mark_solved(&RoundId::new("r1"), &UserId::new("bob"), at(2)),
        Ok(false)
    );

    let solved = rounds.list_solved().expect("listed");
    assert_eq!(solved.len(), 1);
    let first = solved[0].first_solve().expect("solved");
    assert_eq!(first.by, UserId::new("alice"));
    assert_eq!(first.at, at(1));

    assert!(matches!(
        rounds.mark_solved(&RoundId::new("missing"), &UserId::new("bob"), at(3)),
        Err(StoreError::NotFound(_))
    ));
}

#[test]
fn worse_or_equal_scores_never_replace_the_best() {
    let backend = MemoryBackend::new(StoreSettings::default());
    let scores = backend.scores();

    assert!(matches!(
        scores.upsert_if_better(score("r", "alice", 12, 0)),
        Ok(UpsertOutcome::Stored(_))
    ));
    assert_eq!(
        scores.upsert_if_better(score("r", "alice", 15, 1)),
        Ok(UpsertOutcome::NotImproved { current_best: 12 })
    );
    assert_eq!(
        scores.upsert_if_better(score("r", "alice", 12, 2)),
        Ok(UpsertOutcome::NotImproved { current_best: 12 })
    );

    let best = scores
        .best_for(&RoundId::new("r"), &UserId::new("alice"))
        .expect("read")
        .expect("stored");
    assert_eq!(best.moves, 12);
    assert_eq!(best.completed_at, at(0));
    assert_eq!(best.attempt_count, 1);
}

#[test]
fn improvements_increment_the_attempt_count() {
    let backend = MemoryBackend::new(StoreSettings::default());
    let scores = backend.scores();

    for (moves, seconds) in [(20, 0), (14, 1), (9, 2)] {
        let _ = scores
            .upsert_if_better(score("r", "alice", moves, seconds))
            .expect("written");
    }
    let _ = scores
        .upsert_if_better(score("r", "bob", 11, 3))
        .expect("written");

    let alice = scores.list_for_user(&UserId::new("alice")).expect("listed");
    assert_eq!(alice.len(), 1);
    assert_eq!(alice[0].moves, 9);
    assert_eq!(alice[0].attempt_count, 3);
    assert_eq!(
        scores.list_for_round(&RoundId::new("r")).expect("listed").len(),
        2
    );
}

#[test]
fn concurrent_submissions_keep_the_lowest_score() {
    let backend = MemoryBackend::new(StoreSettings::default());

    thread::scope(|scope| {
        for worker in 0..8u32 {
            let backend = &backend;
            let _ = scope.spawn(move || {
                let scores = backend.scores();
                for step in 0..25u32 {
                    let moves = 5 + (worker * 7 + step * 13) % 90;
                    let _ = scores
                        .upsert_if_better(score("race", "alice", moves, i64::from(step)))
                        .expect("written");
                }
            });
        }
    });

    let expected = (0..8u32)
        .flat_map(|worker| (0..25u32).map(move |step| 5 + (worker * 7 + step * 13) % 90))
        .min()
        .expect("scores submitted");
    let best = backend
        .scores()
        .best_for(&RoundId::new("race"), &UserId::new("alice"))
        .expect("read")
        .expect("stored");
    assert_eq!(best.moves, expected);
}

#[test]
fn usernames_are_attached_to_profiles() {
    let backend = MemoryBackend::new(StoreSettings::default());
    let profiles = backend.profiles();
    let identity = Identity {
        user_id: UserId::new("sub-1"),
        email: Some("player@example.com".to_owned()),
        username: None,
    };

    assert_eq!(profiles.get(&identity.user_id), Ok(None));
    let created = profiles
        .set_username(&identity, Username::parse("first").expect("valid"), at(0))
        .expect("stored");
    assert_eq!(created.identity.display_name(), "first");
    assert_eq!(created.created_at, at(0));

    let renamed = profiles
        .set_username(&identity, Username::parse("second").expect("valid"), at(5))
        .expect("stored");
    assert_eq!(renamed.created_at, at(0));
    assert_eq!(renamed.updated_at, at(5));
    assert_eq!(renamed.identity.email.as_deref(), Some("player@example.com"));
    assert_eq!(
        profiles.get(&identity.user_id).expect("read"),
        Some(renamed)
    );
}

#[test]
fn configurations_carry_creation_and_update_times() {
    let backend = MemoryBackend::new(StoreSettings::default());
    let configurations = backend.configurations();
    let alice = UserId::new("alice");

    let created = configurations
        .create(draft(), &alice, at(100))
        .expect("created");
    assert_eq!(created.created_at(), at(100));
    assert_eq!(created.updated_at(), at(100));

    let invalid = ConfigurationDraft::new([], [Cell::new(7, 7)]);
    assert!(matches!(
        configurations.update(created.config_id(), invalid, &alice, at(150)),
        Err(StoreError::InvalidConfiguration(_))
    ));

    let _ = configurations
        .update(created.config_id(), draft(), &alice, at(200))
        .expect("updated");
    let stored = configurations
        .get(created.config_id(), &alice)
        .expect("visible to author");
    assert_eq!(stored.created_at(), at(100));
    assert_eq!(stored.updated_at(), at(200));
}

#[test]
fn only_the_author_may_delete_a_round() {
    let backend = MemoryBackend::new(StoreSettings::default());
    let rounds = backend.rounds();
    let scores = backend.scores();
    let config_id = ConfigId::new("1");
    rounds
        .create(authored_round("r1", &config_id, "alice"))
        .expect("stored");
    let _ = scores
        .upsert_if_better(score("r1", "bob", 6, 1))
        .expect("written");

    let stored = rounds
        .get(&RoundId::new("r1"))
        .expect("read")
        .expect("stored");
    assert_eq!(stored.author_id(), &UserId::new("alice"));
    assert_eq!(stored.created_at(), at(0));

    assert!(matches!(
        rounds.delete(&RoundId::new("r1"), &UserId::new("bob")),
        Err(StoreError::Forbidden(_))
    ));
    assert!(rounds.get(&RoundId::new("r1")).expect("read").is_some());

    rounds
        .delete(&RoundId::new("r1"), &UserId::new("alice"))
        .expect("deleted");
    assert_eq!(rounds.get(&RoundId::new("r1")), Ok(None));
    assert!(matches!(
        rounds.delete(&RoundId::new("r1"), &UserId::new("alice")),
        Err(StoreError::NotFound(_))
    ));
    assert_eq!(
        scores.list_for_round(&RoundId::new("r1")).expect("listed").len(),
        1,
        "scores outlive their round"
    );
}
