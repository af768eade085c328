mod common;

use common::random_transition;
use rl::ReplayBuffer;

#[test]
fn overflow_evicts_exactly_the_oldest() {
    let capacity = 100;
    let extra = 37;
    let mut rng = fastrand::Rng::with_seed(11);
    let inserted: Vec<_> = (0..capacity + extra).map(|_| random_transition(&mut rng)).collect();

    let mut buf = ReplayBuffer::new(capacity);
    for t in &inserted {
        buf.push(*t);
        assert!(buf.len() <= capacity);
    }

    assert_eq!(buf.len(), capacity);
    let kept: Vec<_> = buf.iter().copied().collect();
    assert_eq!(kept, inserted[extra..]);
}

#[test]
fn size_never_exceeds_capacity_for_any_capacity() {
    let mut rng = fastrand::Rng::with_seed(3);
    for capacity in 1..20 {
        let mut buf = ReplayBuffer::new(capacity);
        for n in 1..=3 * capacity {
            buf.push(random_transition(&mut rng));
            assert_eq!(buf.len(), n.min(capacity));
        }
    }
}

#[test]
fn repeated_samples_are_independent_draws() {
    let mut rng = fastrand::Rng::with_seed(5);
    let mut buf = ReplayBuffer::new(10);
    for _ in 0..10 {
        buf.push(random_transition(&mut rng));
    }
    let first = buf.sample(32, &mut rng);
    let second = buf.sample(32, &mut rng);
    assert_eq!(first.len(), 32);
    assert_ne!(first, second);
}
