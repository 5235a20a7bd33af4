use super::*;

fn load(n: u8) -> Load {
    Load::new(n).unwrap()
}

fn left_actor(seed: u64) -> Actor {
    Actor::new(ActorId::Left, PileId::Big, PileId::Small, Rng64::new(seed))
}

/// Poll until the actor blocks, draining its output pile so it never stalls on delivery.
fn run_trip(actor: &mut Actor, piles: &mut Piles) -> Vec<ActorPose> {
    let mut seen = Vec::new();
    loop {
        match actor.poll(piles) {
            Poll::Yielded => seen.push(actor.pose()),
            Poll::Blocked => {
                if piles.get_mut(PileId::Small).try_pop().is_none() {
                    return seen;
                }
            }
        }
    }
}

#[test]
fn blocks_on_empty_input_without_moving() {
    let mut piles = Piles::default();
    let mut actor = left_actor(1);
    assert_eq!(actor.poll(&mut piles), Poll::Blocked);
    assert_eq!(actor.pose().state, ActorState::Picking);
    assert_eq!(actor.pose().offset, Vec2::ZERO);
}

#[test]
fn one_trip_visits_states_in_order() {
    let mut piles = Piles::seeded(Some(load(4)), None);
    let mut actor = left_actor(2);
    let poses = run_trip(&mut actor, &mut piles);

    let mut states: Vec<ActorState> = poses.iter().map(|p| p.state).collect();
    states.dedup();
    assert_eq!(
        states,
        vec![
            ActorState::Picking,
            ActorState::Carrying,
            ActorState::Unloading,
            ActorState::Returning,
        ]
    );
    assert_eq!(actor.pose().state, ActorState::Picking);
    assert_eq!(actor.trips(), 1);
}

#[test]
fn yields_per_phase_follow_the_load() {
    for n in [1u8, 5, 9] {
        let mut piles = Piles::seeded(Some(load(n)), None);
        let mut actor = left_actor(u64::from(n));
        let poses = run_trip(&mut actor, &mut piles);
        let count = |s: ActorState| poses.iter().filter(|p| p.state == s).count();

        assert_eq!(count(ActorState::Picking), usize::from(n));
        assert_eq!(count(ActorState::Carrying), load(n).carry_steps() as usize);
        assert_eq!(count(ActorState::Unloading), usize::from(n));
        assert_eq!(count(ActorState::Returning), 15);
    }
}

#[test]
fn offsets_stay_in_bounds() {
    let mut piles = Piles::seeded(Some(load(7)), None);
    let mut actor = left_actor(11);
    for pose in run_trip(&mut actor, &mut piles) {
        assert!((0.0..=150.0).contains(&pose.offset.x), "{pose:?}");
        assert!(pose.offset.y >= 0.0);
        match pose.state {
            ActorState::Picking => {
                assert_eq!(pose.offset, Vec2::ZERO);
            }
            ActorState::Unloading => {
                assert_eq!(pose.offset, Vec2::new(150.0, 0.0));
            }
            ActorState::Carrying | ActorState::Returning => {}
        }
    }
}

#[test]
fn bumps_alternate_with_flat_steps() {
    let mut piles = Piles::seeded(Some(load(9)), None);
    let mut actor = left_actor(5);
    let poses = run_trip(&mut actor, &mut piles);
    let moving: Vec<&ActorPose> = poses
        .iter()
        .filter(|p| matches!(p.state, ActorState::Carrying | ActorState::Returning))
        .collect();

    for pair in moving.windows(2) {
        if pair[0].offset.y > 0.0 && pair[0].state == pair[1].state {
            assert_eq!(pair[1].offset.y, 0.0);
        }
    }
    assert!(moving.iter().any(|p| p.offset.y > 0.0));
    assert!(moving.iter().all(|p| p.offset.y < 5.0));
}

#[test]
fn carry_positions_advance_by_the_load_increment() {
    let mut piles = Piles::seeded(Some(load(5)), None);
    let mut actor = left_actor(3);
    let carry: Vec<f64> = run_trip(&mut actor, &mut piles)
        .iter()
        .filter(|p| p.state == ActorState::Carrying)
        .map(|p| p.offset.x)
        .collect();
    assert_eq!(carry.len(), 75);
    assert_eq!(carry[0], 0.0);
    assert_eq!(carry[1], 2.0);
    assert_eq!(carry[74], 148.0);
}

#[test]
fn delivery_blocks_until_output_is_free() {
    let mut piles = Piles::seeded(Some(load(1)), Some(load(2)));
    let mut actor = left_actor(4);
    let mut yields = 0;
    while actor.poll(&mut piles) == Poll::Yielded {
        yields += 1;
    }
    // 1 loading + 15 carrying + 1 unloading, then stuck on the occupied small pile.
    assert_eq!(yields, 17);
    assert_eq!(actor.pose().state, ActorState::Unloading);
    assert_eq!(actor.pose().cart, Some(load(1)));
    assert_eq!(actor.poll(&mut piles), Poll::Blocked);

    assert_eq!(piles.get_mut(PileId::Small).try_pop(), Some(load(2)));
    assert_eq!(actor.poll(&mut piles), Poll::Yielded);
    assert_eq!(actor.pose().state, ActorState::Returning);
    assert_eq!(piles.get(PileId::Small).peek(), Some(load(1)));
}

#[test]
fn state_indices_and_cycle() {
    for s in ActorState::ALL {
        assert_eq!(ActorState::ALL[usize::from(s.index())], s);
        assert_ne!(s.next(), s);
    }
    assert_eq!(ActorState::Returning.next(), ActorState::Picking);
}
