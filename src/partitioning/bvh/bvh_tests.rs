use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::{Bvh, BvhOptions, SplitMethod};
use crate::bounding_volume::{Aabb, BoundingVolume};
use crate::math::{Point, Real, Vector};
use crate::query::Ray;
use crate::shape::{Ball, Cuboid, Primitive};

const ALL_SPLIT_METHODS: [SplitMethod; 3] = [
    SplitMethod::Sah,
    SplitMethod::Middle,
    SplitMethod::EqualCounts,
];

fn random_balls(len: usize, seed: u64) -> Vec<Ball> {
    let mut rng = StdRng::seed_from_u64(seed);
    (0..len)
        .map(|_| {
            let x: Real = rng.gen_range(-10.0..10.0);
            let y: Real = rng.gen_range(-10.0..10.0);
            let z: Real = rng.gen_range(-10.0..10.0);
            let radius: Real = rng.gen_range(0.1..1.0);
            Ball::new(Point::new(x, y, z), radius)
        })
        .collect()
}

fn random_ray(rng: &mut StdRng) -> Ray {
    let origin = Point::new(
        rng.gen_range(-15.0..15.0),
        rng.gen_range(-15.0..15.0),
        rng.gen_range(-15.0..15.0),
    );

    loop {
        let dir = Vector::new(
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
            rng.gen_range(-1.0..1.0),
        );
        if dir.norm_squared() > 1.0e-6 {
            return Ray::new(origin, dir);
        }
    }
}

/// Walks the flattened tree, checking at every step that:
/// - nodes are laid out in depth-first order with the first child of every
///   interior node at the next array index;
/// - the AABB of every interior node is exactly the union of its children's;
/// - every primitive is covered by exactly one leaf range.
fn check_well_formed<P: Primitive>(bvh: &Bvh<P>) {
    fn check_node<P: Primitive>(
        bvh: &Bvh<P>,
        id: usize,
        next_expected: &mut usize,
        covered: &mut [bool],
    ) -> Aabb {
        assert_eq!(id, *next_expected);
        *next_expected += 1;

        let node = &bvh.nodes[id];
        if node.is_leaf() {
            let first = node.offset as usize;
            for i in first..first + node.prim_count() {
                assert!(!covered[i], "primitive referenced by two leaves");
                covered[i] = true;
            }
            node.aabb()
        } else {
            let left = check_node(bvh, id + 1, next_expected, covered);
            let right = check_node(bvh, node.offset as usize, next_expected, covered);
            assert_eq!(left.merged(&right), node.aabb());
            node.aabb()
        }
    }

    let mut covered = vec![false; bvh.len()];
    let mut next_expected = 0;
    let root_aabb = check_node(bvh, 0, &mut next_expected, &mut covered);

    assert_eq!(next_expected, bvh.node_count());
    assert!(covered.iter().all(|c| *c), "a leaf range misses a primitive");

    // The root bound must enclose exactly the primitives' world bounds.
    let mut expected = Aabb::new_invalid();
    for prim in bvh.primitives() {
        expected.merge(&prim.world_bound());
    }
    assert_eq!(root_aabb, expected);

    // The reordered array must be a permutation of the original one.
    let mut sources = bvh.source_indices().to_vec();
    sources.sort_unstable();
    assert!(sources.iter().enumerate().all(|(i, s)| i == *s as usize));
}

#[test]
fn bvh_well_formed_all_split_methods() {
    for split_method in ALL_SPLIT_METHODS {
        for len in [1, 2, 3, 7, 64, 100] {
            let bvh = Bvh::new(
                random_balls(len, 42),
                &BvhOptions {
                    split_method,
                    max_leaf_prims: 4,
                },
            );
            check_well_formed(&bvh);
        }
    }
}

#[test]
fn coincident_centroids_become_one_leaf() {
    // Three identical balls cannot be separated by any split plane. Even
    // with a leaf budget of 1 the build must terminate with a single
    // 3-primitive leaf instead of recursing forever.
    let ball = Ball::new(Point::new(1.0, 2.0, 3.0), 0.5);
    let bvh = Bvh::new(
        vec![ball, ball, ball],
        &BvhOptions {
            split_method: SplitMethod::Sah,
            max_leaf_prims: 1,
        },
    );

    assert_eq!(bvh.node_count(), 1);
    assert_eq!(bvh.nodes[0].prim_count(), 3);
    check_well_formed(&bvh);

    let ray = Ray::new(Point::new(1.0, 2.0, -10.0), Vector::z());
    assert!(bvh.intersects_ray(&ray, Real::MAX));
}

#[test]
fn closest_hit_reports_near_box_first() {
    let boxes = vec![
        Cuboid::new(Point::new(0.0, 0.0, 0.0), Point::new(1.0, 1.0, 1.0)),
        Cuboid::new(Point::new(10.0, 0.0, 0.0), Point::new(11.0, 1.0, 1.0)),
    ];
    let bvh = Bvh::new(boxes, &BvhOptions::default());

    let ray = Ray::new(Point::new(-1.0, 0.5, 0.5), Vector::x());
    assert!(bvh.intersects_ray(&ray, Real::MAX));

    let (prim, interaction) = bvh.cast_ray(&ray, Real::MAX).unwrap();
    assert_eq!(prim, 0);
    assert!(relative_eq!(interaction.time_of_impact, 1.0, epsilon = 1.0e-5));
    assert_eq!(interaction.normal, -Vector::x());

    // Shooting from the other side must report the far box instead.
    let ray = Ray::new(Point::new(12.5, 0.5, 0.5), -Vector::x());
    let (prim, interaction) = bvh.cast_ray(&ray, Real::MAX).unwrap();
    assert_eq!(prim, 1);
    assert!(relative_eq!(interaction.time_of_impact, 1.5, epsilon = 1.0e-5));
}

#[test]
fn rebuilds_answer_queries_identically() {
    let balls = random_balls(100, 7);
    let options = BvhOptions::default();
    let bvh1 = Bvh::new(balls.clone(), &options);
    let bvh2 = Bvh::new(balls, &options);

    let mut rng = StdRng::seed_from_u64(1234);
    for _ in 0..64 {
        let ray = random_ray(&mut rng);
        assert_eq!(
            bvh1.intersects_ray(&ray, Real::MAX),
            bvh2.intersects_ray(&ray, Real::MAX)
        );

        match (bvh1.cast_ray(&ray, Real::MAX), bvh2.cast_ray(&ray, Real::MAX)) {
            (None, None) => {}
            (Some((prim1, inter1)), Some((prim2, inter2))) => {
                assert_eq!(prim1, prim2);
                assert_eq!(inter1.time_of_impact, inter2.time_of_impact);
            }
            (hit1, hit2) => panic!("query mismatch: {:?} vs {:?}", hit1, hit2),
        }
    }
}

#[test]
fn split_method_parsing() {
    assert_eq!("sah".parse::<SplitMethod>().unwrap(), SplitMethod::Sah);
    assert_eq!("middle".parse::<SplitMethod>().unwrap(), SplitMethod::Middle);
    assert_eq!(
        "equal".parse::<SplitMethod>().unwrap(),
        SplitMethod::EqualCounts
    );
    assert_eq!(
        "equalcounts".parse::<SplitMethod>().unwrap(),
        SplitMethod::EqualCounts
    );
    assert!("bvh42".parse::<SplitMethod>().is_err());
}

#[test]
#[should_panic]
fn empty_primitive_set_is_rejected() {
    let _ = Bvh::<Ball>::new(Vec::new(), &BvhOptions::default());
}

#[test]
#[should_panic]
fn zero_direction_ray_is_rejected() {
    let bvh = Bvh::new(random_balls(4, 0), &BvhOptions::default());
    let ray = Ray::new(Point::origin(), Vector::zeros());
    let _ = bvh.cast_ray(&ray, Real::MAX);
}
