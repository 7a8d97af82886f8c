use chunkpack_core::pool::{Job, JobQueue};
use proptest::prelude::*;
use std::collections::HashSet;
use std::thread;

fn claim_all(jobs: usize, threads: usize) -> Vec<Vec<usize>> {
    let q = JobQueue::new((0..jobs as u64).map(|i| Job::new(i, vec![0u8])).collect()).unwrap();
    thread::scope(|s| {
        let handles: Vec<_> = (0..threads)
            .map(|_| {
                s.spawn(|| {
                    let mut mine = Vec::new();
                    while let Some(h) = q.pop_next() {
                        h.with(|j| assert_eq!(j.id as usize, h.index()));
                        mine.push(h.index());
                    }
                    mine
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    })
}

#[test]
fn empty_queue_yields_nothing() {
    let claims = claim_all(0, 4);
    assert!(claims.iter().all(Vec::is_empty));
}

#[test]
fn each_worker_sees_ascending_indices() {
    for claims in claim_all(500, 8) {
        assert!(claims.windows(2).all(|w| w[0] < w[1]));
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn every_job_claimed_exactly_once(jobs in 0usize..400, threads in 1usize..16) {
        let claims = claim_all(jobs, threads);
        let total: usize = claims.iter().map(Vec::len).sum();
        prop_assert_eq!(total, jobs);
        let unique: HashSet<usize> = claims.into_iter().flatten().collect();
        prop_assert_eq!(unique.len(), jobs);
        prop_assert!(unique.iter().all(|&i| i < jobs));
    }
}
