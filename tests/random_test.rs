use sketch_ngin::{InnerSpace, random::Random};

use crate::common::test_utils::assert_close;

mod common;

#[test]
fn same_seed_same_sequence() {
    let mut a = Random::new(1234);
    let mut b = Random::new(1234);
    for _ in 0..100 {
        assert_eq!(a.value(), b.value());
        assert_eq!(a.gaussian(2.0, 0.5), b.gaussian(2.0, 0.5));
    }
    assert_eq!(a.noise3d(0.3, 0.1, 0.7, 2.0, 1.0), b.noise3d(0.3, 0.1, 0.7, 2.0, 1.0));
}

#[test]
fn reseeding_restarts_the_sequence() {
    let mut random = Random::new(5);
    let first: Vec<f32> = (0..10).map(|_| random.value()).collect();
    random.set_seed(5);
    let again: Vec<f32> = (0..10).map(|_| random.value()).collect();
    assert_eq!(first, again);
    assert_eq!(random.seed(), 5);
}

#[test]
fn forks_are_reproducible_but_independent() {
    let mut a = Random::new(8);
    let mut b = Random::new(8);
    let mut fork_a = a.fork();
    let mut fork_b = b.fork();
    assert_eq!(fork_a.seed(), fork_b.seed());
    assert_eq!(fork_a.value(), fork_b.value());
    assert_ne!(fork_a.seed(), 8);
}

#[test]
fn values_stay_in_range() {
    let mut random = Random::new(77);
    for _ in 0..1000 {
        let v = random.value();
        assert!((0.0..1.0).contains(&v));
        let r = random.range(-2.0, 3.0);
        assert!((-2.0..3.0).contains(&r));
        let i = random.range_floor(1, 10);
        assert!((1..10).contains(&i));
    }
}

#[test]
fn picking_from_nothing_fails() {
    let mut random = Random::new(1);
    let empty: [u8; 0] = [];
    assert!(random.pick(&empty).is_err());
    assert_eq!(random.pick(&[3]).ok(), Some(&3));
}

#[test]
fn shuffle_is_a_permutation() {
    let mut random = Random::new(3);
    let items: Vec<u32> = (0..50).collect();
    let mut shuffled = random.shuffle(&items);
    assert_eq!(shuffled.len(), items.len());
    assert_ne!(shuffled, items);
    shuffled.sort();
    assert_eq!(shuffled, items);
}

#[test]
fn gaussian_has_expected_moments() {
    let mut random = Random::new(21);
    let samples: Vec<f32> = (0..20_000).map(|_| random.gaussian(3.0, 2.0)).collect();
    let mean = samples.iter().sum::<f32>() / samples.len() as f32;
    let variance =
        samples.iter().map(|s| (s - mean) * (s - mean)).sum::<f32>() / samples.len() as f32;
    assert_close(mean, 3.0, 0.1);
    assert_close(variance.sqrt(), 2.0, 0.1);
}

#[test]
fn points_fall_inside_their_shapes() {
    let mut random = Random::new(9);
    for _ in 0..500 {
        assert!(random.inside_circle(1.5).magnitude() <= 1.5 + 1e-5);
        assert!(random.inside_sphere(0.5).magnitude() <= 0.5 + 1e-5);
        assert_close(random.on_circle(2.0).magnitude(), 2.0, 1e-4);
        assert_close(random.on_sphere(2.0).magnitude(), 2.0, 1e-4);
        assert_close(random.quaternion().magnitude(), 1.0, 1e-4);
    }
}

#[test]
fn noise_is_bounded_by_amplitude() {
    let random = Random::new(4);
    for i in 0..400 {
        let x = i as f32 * 0.173;
        let y = (i % 23) as f32 * 0.41;
        assert!(random.noise2d(x, y, 1.0, 0.5).abs() <= 0.5 + 1e-5);
        assert!(random.noise3d(x, y, x - y, 1.0, 0.5).abs() <= 0.5 + 1e-5);
        assert!(random.noise4d(x, y, 0.2, y, 1.0, 0.5).abs() <= 0.5 + 1e-5);
    }
}

#[test]
fn noise_depends_on_seed() {
    let a = Random::new(1);
    let b = Random::new(2);
    let differs = (0..20).any(|i| {
        let x = i as f32 * 0.37 + 0.1;
        a.noise2d(x, 0.5, 1.0, 1.0) != b.noise2d(x, 0.5, 1.0, 1.0)
    });
    assert!(differs);
}
