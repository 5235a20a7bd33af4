use super::*;

fn load(n: u8) -> Load {
    Load::new(n).unwrap()
}

#[test]
fn holds_at_most_one_load() {
    let mut pile = Pile::new();
    assert!(pile.is_empty());
    pile.try_push(load(3)).unwrap();
    assert!(pile.is_full());

    // A second push is refused and the load handed back untouched.
    assert_eq!(pile.try_push(load(7)), Err(load(7)));
    assert!(pile.is_full());
    assert_eq!(pile.peek(), Some(load(3)));
}

#[test]
fn pop_frees_the_slot_for_the_next_push() {
    let mut pile = Pile::with_load(load(2));
    assert_eq!(pile.try_pop(), Some(load(2)));
    assert_eq!(pile.try_pop(), None);
    pile.try_push(load(9)).unwrap();
    assert_eq!(pile.pushed(), 2);
    assert_eq!(pile.popped(), 1);
}

#[test]
fn seeded_piles_leave_oven_empty() {
    let piles = Piles::seeded(Some(load(1)), Some(load(10)));
    assert_eq!(piles.contents(), [Some(load(1)), Some(load(10)), None]);
    assert_eq!(PileId::Small.name(), "small");
}
