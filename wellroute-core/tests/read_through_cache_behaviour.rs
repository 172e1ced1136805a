//! Behavioural tests for the read-through cache.
#![cfg(feature = "serde")]

use geo::Coord;
use rstest::fixture;
use rstest_bdd_macros::{given, scenario, then, when};
use std::cell::{Cell, RefCell};
use thiserror::Error;
use wellroute_core::cache::{MemoryCacheStore, ReadThroughError, matrix_cache_key, read_through};
use wellroute_core::{Site, TimeMatrix};

#[derive(Debug, Error)]
#[error("routing service unavailable")]
struct Unavailable;

fn three_sites() -> Vec<Site> {
    ["Home", "Well 1", "Well 2"]
        .into_iter()
        .zip(0_u64..)
        .map(|(name, id)| Site::new(id, name, Coord { x: -108.0, y: 36.7 }))
        .collect()
}

fn flat_matrix(size: usize) -> TimeMatrix {
    (0..size)
        .map(|i| (0..size).map(|j| if i == j { 0 } else { 15 }).collect())
        .collect()
}

#[derive(Debug, Default)]
struct World {
    store: RefCell<MemoryCacheStore>,
    computations: Cell<u32>,
    last_error: RefCell<Option<ReadThroughError<Unavailable>>>,
}

#[fixture]
fn world() -> World {
    World::default()
}

#[given("an empty cache store")]
fn empty_store(#[from(world)] world: &World) {
    world.store.replace(MemoryCacheStore::default());
}

#[when("I look up the matrix for three sites")]
fn look_up_matrix(#[from(world)] world: &World) {
    let sites = three_sites();
    let key = matrix_cache_key(&sites);
    let store = world.store.borrow();
    let matrix: Result<TimeMatrix, ReadThroughError<Unavailable>> =
        read_through(&*store, &key, || {
            world.computations.set(world.computations.get() + 1);
            Ok(flat_matrix(sites.len()))
        });
    let matrix = matrix.expect("lookup should succeed");
    assert_eq!(matrix.len(), 3);
}

#[when("a lookup fails to compute")]
fn failing_lookup(#[from(world)] world: &World) {
    let store = world.store.borrow();
    let outcome: Result<TimeMatrix, _> =
        read_through(&*store, "matrix:broken", || Err(Unavailable));
    world.last_error.replace(outcome.err());
}

#[then("the matrix is computed once")]
fn computed_once(#[from(world)] world: &World) {
    assert_eq!(world.computations.get(), 1);
}

#[then("the cache holds one entry")]
fn holds_one(#[from(world)] world: &World) {
    assert_eq!(world.store.borrow().len().expect("len"), 1);
}

#[then("the cache holds no entries")]
fn holds_none(#[from(world)] world: &World) {
    assert!(world.store.borrow().is_empty().expect("is_empty"));
}

#[then("a compute error is returned")]
fn compute_error(#[from(world)] world: &World) {
    assert!(matches!(
        &*world.last_error.borrow(),
        Some(ReadThroughError::Compute(Unavailable))
    ));
}

macro_rules! register_scenario {
    ($fn_name:ident, $title:literal) => {
        #[scenario(path = "tests/features/read_through_cache.feature", name = $title)]
        fn $fn_name(#[from(world)] world: World) {
            let _ = world;
        }
    };
}

register_scenario!(stores_on_miss, "computing and storing a value on a miss");
register_scenario!(serves_repeat_from_cache, "serving a repeated lookup from the cache");
register_scenario!(surfaces_compute_failure, "surfacing a failed computation");
