use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use proptest::prelude::*;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use ricochet_core::{
    Cell, ConfigId, Configuration, ConfigurationDraft, Side, UserId, Wall, SIDES,
};
use ricochet_system_round_generation::{generate_round, GenerationSettings};

fn at(seconds: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(1_700_000_000 + seconds, 0).expect("timestamp")
}

fn author() -> UserId {
    UserId::new("player")
}

fn configuration() -> impl Strategy<Value = Configuration> {
    let free: Vec<Cell> = Cell::all().filter(|cell| !cell.is_center()).collect();
    let targets = proptest::sample::subsequence(free, 1..12);
    let walls = proptest::collection::vec(
        (0u8..16, 0u8..16, 0usize..4).prop_map(|(x, y, side)| Wall::new(Cell::new(x, y), SIDES[side])),
        0..24,
    );
    (walls, targets).prop_map(|(walls, targets)| {
        Configuration::new(
            ConfigId::new("1"),
            UserId::new("author"),
            ConfigurationDraft::new(walls, targets),
            false,
            at(0),
        )
        .expect("targets avoid the center")
    })
}

proptest! {
    #[test]
    fn generated_rounds_respect_placement_invariants(
        configuration in configuration(),
        seed in any::<u64>(),
    ) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let settings = GenerationSettings::default();
        let round = generate_round(&configuration, &author(), at(5), &mut rng, &settings)
            .expect("generation succeeds");

        let cells: Vec<Cell> = round.initial_robots().iter().map(|(_, cell)| cell).collect();
        prop_assert_eq!(cells.len(), 5);
        let distinct: BTreeSet<Cell> = cells.iter().copied().collect();
        prop_assert_eq!(distinct.len(), 5);
        prop_assert!(cells.iter().all(|cell| !cell.is_center()));

        let target = round.target();
        prop_assert!(configuration.targets().contains(&target.cell));
        prop_assert!(!round.initial_robots().is_occupied(target.cell));
        prop_assert!(!round.is_solved());
    }

    #[test]
    fn same_seed_reproduces_the_round(
        configuration in configuration(),
        seed in any::<u64>(),
    ) {
        let settings = GenerationSettings::default();
        let generate = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            generate_round(&configuration, &author(), at(5), &mut rng, &settings)
                .expect("generation succeeds")
        };
        let first = generate(seed);
        let second = generate(seed);
        prop_assert_eq!(first, second);
    }
}

#[test]
fn round_carries_configuration_walls() {
    let wall = Wall::new(Cell::new(5, 9), Side::Right);
    let configuration = Configuration::new(
        ConfigId::new("12"),
        UserId::new("author"),
        ConfigurationDraft::new([wall], [Cell::new(2, 13)]),
        false,
        at(0),
    )
    .expect("valid configuration");

    let mut rng = ChaCha8Rng::seed_from_u64(2024);
    let settings = GenerationSettings::default();
    let round = generate_round(&configuration, &author(), at(5), &mut rng, &settings)
        .expect("generation succeeds");

    assert!(round.board().has_wall(Cell::new(5, 9), Side::Right));
    assert!(round.board().has_wall(Cell::new(6, 9), Side::Left));
    assert_eq!(round.target().cell, Cell::new(2, 13));
}

#[test]
fn different_seeds_yield_distinct_round_ids() {
    let configuration = Configuration::new(
        ConfigId::new("1"),
        UserId::new("author"),
        ConfigurationDraft::new([], [Cell::new(0, 0)]),
        true,
        at(0),
    )
    .expect("valid configuration");
    let settings = GenerationSettings::default();

    let ids: BTreeSet<String> = (0..16u64)
        .map(|seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            generate_round(&configuration, &author(), at(5), &mut rng, &settings)
                .expect("generation succeeds")
                .round_id()
                .to_string()
        })
        .collect();
    assert_eq!(ids.len(), 16);
}
