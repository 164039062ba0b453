//! A full session on a generated universe: mine a chunk, claim a
//! homeworld, and expand -- exercising the engine against the real
//! coordinate/identity generator instead of hand-written fixtures.

use umbra_core::command::{Engine, MoveOrder};
use umbra_core::config::GameConfig;
use umbra_core::id::PlayerId;
use umbra_core::planet::{PlanetDescriptor, PlanetLevel};
use umbra_universe::{Universe, UniverseConfig};

fn mined_universe() -> (Universe, Vec<PlanetDescriptor>) {
    let mut universe = Universe::new(UniverseConfig::default());
    let found = universe.mine_chunk(0, 0, 96);
    (universe, found)
}

/// A deterministic pick of a homeworld and a nearby conquest target.
fn pick_pair(found: &[PlanetDescriptor]) -> (PlanetDescriptor, PlanetDescriptor) {
    let home = found
        .iter()
        .find(|d| d.level == PlanetLevel(0))
        .copied()
        .expect("a level-0 planet in the starting chunk");
    let target = found
        .iter()
        .find(|d| d.level == PlanetLevel(0) && d.id != home.id)
        .copied()
        .expect("a second level-0 planet in the starting chunk");
    (home, target)
}

#[test]
fn a_session_on_a_generated_universe() {
    let (universe, found) = mined_universe();
    let (home, target) = pick_pair(&found);
    let dist = home.distance_to(&target);
    assert!(dist <= 160, "chunk planets should be within asteroid range");

    let mut engine = Engine::new(GameConfig::default(), Box::new(universe));
    let player = PlayerId([5; 20]);
    engine.initialize_player(player, home.id, 100).unwrap();

    // Grow to full strength, then take the neighbor.
    engine.refresh_planet(home.id, 10_000).unwrap();
    let receipt = engine
        .move_fleet(MoveOrder {
            player,
            from: home.id,
            to: target.id,
            max_distance: dist,
            energy: 60_000,
            silver: 0,
            now: 10_000,
        })
        .unwrap();

    let landed = engine
        .refresh_planet(target.id, receipt.arrival.arrival_time)
        .unwrap();
    assert_eq!(landed.owner, player);
    assert!(landed.energy > 0);
}

#[test]
fn two_replicas_of_the_same_universe_agree() {
    let (universe_a, found) = mined_universe();
    let (universe_b, _) = mined_universe();
    let (home, target) = pick_pair(&found);

    let mut a = Engine::new(GameConfig::default(), Box::new(universe_a));
    let mut b = Engine::new(GameConfig::default(), Box::new(universe_b));
    let player = PlayerId([5; 20]);

    for engine in [&mut a, &mut b] {
        engine.initialize_player(player, home.id, 100).unwrap();
        engine.refresh_planet(home.id, 10_000).unwrap();
        engine
            .move_fleet(MoveOrder {
                player,
                from: home.id,
                to: target.id,
                max_distance: 200,
                energy: 60_000,
                silver: 0,
                now: 10_000,
            })
            .unwrap();
        engine.refresh_planet(target.id, 50_000).unwrap();
    }

    assert_eq!(a.state_hash(), b.state_hash());
}
