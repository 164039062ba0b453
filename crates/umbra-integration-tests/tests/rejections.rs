//! The literal rejection scenarios: every command failure is a typed error
//! with no partial mutation.

use umbra_core::command::{EngineError, MoveOrder};
use umbra_core::test_utils::*;

fn fixture() -> Vec<umbra_core::planet::PlanetDescriptor> {
    vec![
        descriptor(1, 0, 0, 0),       // user1 homeworld
        descriptor(2, 100, 0, 0),     // neighbor, dist 100
        descriptor(3, 8_080, 0, 0),   // beyond the initial radius
        descriptor(4, 7_950, 0, 0),   // homeworld near the rim
        descriptor(5, 50, 0, 1),      // level 1, not a valid homeworld
        descriptor(7, 200, 0, 0),     // beyond a level-0 planet's range
    ]
}

fn order(player_n: u8, from: u8, to: u8, energy: u64, silver: u64, now: u64) -> MoveOrder {
    MoveOrder {
        player: player(player_n),
        from: pid(from),
        to: pid(to),
        max_distance: 1_000,
        energy,
        silver,
        now,
    }
}

#[test]
fn moving_more_silver_than_exists_is_rejected() {
    let mut engine = test_engine(fixture());
    engine.initialize_player(player(1), pid(1), 1).unwrap();
    let result = engine.move_fleet(order(1, 1, 2, 10_000, 100, 10));
    assert_eq!(
        result.unwrap_err(),
        EngineError::InsufficientSilver {
            requested: 100,
            available: 0,
        }
    );
}

#[test]
fn moving_more_energy_than_exists_is_rejected() {
    let mut engine = test_engine(fixture());
    engine.initialize_player(player(1), pid(1), 1).unwrap();
    let available = engine.planet(&pid(1), 10).unwrap().energy;
    let result = engine.move_fleet(order(1, 1, 2, 99_999_999_999, 0, 10));
    assert_eq!(
        result.unwrap_err(),
        EngineError::InsufficientEnergy {
            requested: 99_999_999_999,
            available,
        }
    );
}

#[test]
fn a_move_that_decays_to_nothing_is_rejected() {
    let mut engine = test_engine(fixture());
    engine.initialize_player(player(1), pid(1), 1).unwrap();
    let result = engine.move_fleet(order(1, 1, 2, 100, 0, 10));
    assert_eq!(result.unwrap_err(), EngineError::NoForceArrives);
}

#[test]
fn moving_from_an_unowned_planet_is_rejected() {
    let mut engine = test_engine(fixture());
    engine.initialize_player(player(1), pid(1), 1).unwrap();
    engine.initialize_player(player(2), pid(2), 1).unwrap();
    let result = engine.move_fleet(order(1, 2, 1, 10_000, 0, 10));
    assert_eq!(result.unwrap_err(), EngineError::NotOwner);
}

#[test]
fn moving_beyond_the_world_radius_is_rejected() {
    let mut engine = test_engine(fixture());
    engine.initialize_player(player(1), pid(4), 1).unwrap();
    // dist 130 is within range, but the destination sits past the rim and
    // is too small to push it out.
    let result = engine.move_fleet(order(1, 4, 3, 20_000, 0, 10));
    assert_eq!(result.unwrap_err(), EngineError::OutOfRange);
}

#[test]
fn moving_beyond_the_claimed_max_distance_is_rejected() {
    let mut engine = test_engine(fixture());
    engine.initialize_player(player(1), pid(1), 1).unwrap();
    let mut tight = order(1, 1, 2, 20_000, 0, 10);
    tight.max_distance = 50;
    let result = engine.move_fleet(tight);
    assert_eq!(result.unwrap_err(), EngineError::OutOfRange);
}

#[test]
fn moving_beyond_the_planets_range_is_rejected() {
    let mut engine = test_engine(fixture());
    engine.initialize_player(player(1), pid(1), 1).unwrap();
    let range = engine.planet(&pid(1), 10).unwrap().range;
    assert!(range < 200);
    let result = engine.move_fleet(order(1, 1, 7, 20_000, 0, 10));
    assert_eq!(result.unwrap_err(), EngineError::OutOfRange);
}

#[test]
fn initializing_on_a_touched_planet_is_rejected() {
    let mut engine = test_engine(fixture());
    engine.initialize_player(player(1), pid(1), 1).unwrap();
    engine.move_fleet(order(1, 1, 2, 20_000, 0, 10)).unwrap();

    // The homeworld itself and the touched destination are both taken.
    assert_eq!(
        engine.initialize_player(player(2), pid(1), 20).unwrap_err(),
        EngineError::AlreadyOwned
    );
    assert_eq!(
        engine.initialize_player(player(2), pid(2), 20).unwrap_err(),
        EngineError::AlreadyOwned
    );
}

#[test]
fn second_homeworld_is_rejected() {
    let mut engine = test_engine(fixture());
    engine.initialize_player(player(1), pid(1), 1).unwrap();
    assert_eq!(
        engine.initialize_player(player(1), pid(2), 10).unwrap_err(),
        EngineError::InvalidHomeworld
    );
}

#[test]
fn homeworld_above_level_zero_is_rejected() {
    let mut engine = test_engine(fixture());
    assert_eq!(
        engine.initialize_player(player(1), pid(5), 1).unwrap_err(),
        EngineError::InvalidHomeworld
    );
}

#[test]
fn unknown_locations_are_rejected() {
    let mut engine = test_engine(fixture());
    engine.initialize_player(player(1), pid(1), 1).unwrap();
    let result = engine.move_fleet(order(1, 1, 9, 10_000, 0, 10));
    assert_eq!(result.unwrap_err(), EngineError::UnknownPlanet(pid(9)));
}

#[test]
fn commands_with_a_rewound_clock_are_rejected() {
    let mut engine = test_engine(fixture());
    engine.initialize_player(player(1), pid(1), 100).unwrap();
    let result = engine.refresh_planet(pid(1), 50);
    assert!(matches!(
        result,
        Err(EngineError::ClockRegression { now: 50, .. })
    ));
}

#[test]
fn a_rejected_command_leaves_no_partial_mutation() {
    let mut engine = test_engine(fixture());
    engine.initialize_player(player(1), pid(1), 1).unwrap();
    engine.initialize_player(player(2), pid(2), 1).unwrap();
    engine.refresh_planet(pid(1), 10).unwrap();
    engine.refresh_planet(pid(2), 10).unwrap();

    let before = engine.state_hash();
    // Same timestamp, so even the lazy materialization is a no-op; the
    // rejected command must change nothing at all.
    let result = engine.move_fleet(order(1, 2, 1, 10_000, 0, 10));
    assert_eq!(result.unwrap_err(), EngineError::NotOwner);
    assert_eq!(engine.state_hash(), before);
}
