// Copyright (C) 2025 Jeremy J. Carroll. See LICENSE for details.

//! Integration tests for the census driver.

mod common;

use common::{all_gluings, analyse, count_orbits, init_tracing, pairings};
use tricensus::{
    BoundaryOption, CancelFlag, Census, CensusOptions, PurgeFlags, SearchOptions, SearchOutcome,
};

/// Closed triangulations on `n` tetrahedra, counted by brute force.
fn brute_force_closed(n: usize, orientable_only: bool) -> u64 {
    pairings(n, BoundaryOption::Forbidden, None)
        .iter()
        .map(|(p, autos)| {
            let valid: Vec<_> = all_gluings(p)
                .into_iter()
                .filter(|g| {
                    let t = analyse(p, g);
                    !t.invalid_edge
                        && t.closed_link_euler.iter().all(|&e| e == 2)
                        && (!orientable_only || t.orientable)
                })
                .collect();
            count_orbits(p, autos, &valid) as u64
        })
        .sum()
}

#[test]
fn test_small_closed_censuses() {
    init_tracing();
    for n in 1..=2 {
        for orientable_only in [false, true] {
            let options = CensusOptions::new(n)
                .with_search(SearchOptions::default().with_orientable_only(orientable_only));
            let mut seen = 0;
            let summary = Census::new(options)
                .unwrap()
                .run(&CancelFlag::new(), |s| {
                    assert!(s.is_complete());
                    assert!(s.pairing().is_closed());
                    seen += 1;
                })
                .unwrap();
            assert_eq!(summary.outcome, SearchOutcome::Completed);
            assert_eq!(summary.pairings, pairings(n, BoundaryOption::Forbidden, None).len() as u64);
            assert_eq!(summary.skipped, 0);
            assert_eq!(summary.triangulations, seen);
            assert_eq!(summary.triangulations, brute_force_closed(n, orientable_only));
        }
    }
}

#[test]
fn test_orientable_census_is_smaller() {
    init_tracing();
    let run = |orientable_only: bool| {
        let options = CensusOptions::new(3)
            .with_search(SearchOptions::default().with_orientable_only(orientable_only));
        Census::new(options).unwrap().run(&CancelFlag::new(), |_| {}).unwrap()
    };
    let all = run(false);
    let orientable = run(true);
    assert!(orientable.triangulations > 0);
    assert!(orientable.triangulations <= all.triangulations);
    assert_eq!(orientable.pairings, all.pairings);
}

#[test]
fn test_purge_skips_bad_subgraphs() {
    init_tracing();
    let plain = Census::new(CensusOptions::new(3)).unwrap();
    let purge = PurgeFlags::NON_MINIMAL_PRIME | PurgeFlags::P2_REDUCIBLE;
    let purging = Census::new(
        CensusOptions::new(3).with_search(SearchOptions::default().with_purge(purge)),
    )
    .unwrap();

    let full = plain.run(&CancelFlag::new(), |_| {}).unwrap();
    let trimmed = purging.run(&CancelFlag::new(), |_| {}).unwrap();
    let bad = pairings(3, BoundaryOption::Forbidden, None)
        .iter()
        .filter(|(p, _)| p.has_bad_subgraph())
        .count() as u64;
    assert!(bad > 0);
    assert_eq!(trimmed.skipped, bad);
    assert_eq!(trimmed.pairings + trimmed.skipped, full.pairings);
    assert!(trimmed.triangulations <= full.triangulations);
}

#[test]
fn test_bounded_census() {
    init_tracing();
    let options = CensusOptions::new(2)
        .with_boundary(BoundaryOption::Required)
        .with_search(SearchOptions::default().with_target_euler(2));
    let summary = Census::new(options)
        .unwrap()
        .run(&CancelFlag::new(), |s| {
            assert!(!s.pairing().is_closed());
        })
        .unwrap();
    assert_eq!(summary.outcome, SearchOutcome::Completed);
    assert!(summary.pairings > 0);
}

#[test]
fn test_cancel_mid_census() {
    init_tracing();
    let cancel = CancelFlag::new();
    let remote = cancel.clone();
    let mut seen = 0;
    let summary = Census::new(CensusOptions::new(3))
        .unwrap()
        .run(&cancel, |_| {
            seen += 1;
            if seen == 3 {
                remote.cancel();
            }
        })
        .unwrap();
    assert_eq!(summary.outcome, SearchOutcome::Cancelled);
    assert_eq!(summary.triangulations, 3);
}
