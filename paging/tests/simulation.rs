use paging::{
    Access, AllocPolicy, EvictPolicy, PagingError, Process, ProcessSpec,
    ReplacementScope, Reporter, RunReport, SimulationConfig, Simulator,
};
use rand::prelude::*;

struct CountingReporter {
    snapshots: usize,
    snapshot_times: Vec<usize>,
    summaries: usize,
}

impl CountingReporter {
    fn new() -> Self {
        CountingReporter {
            snapshots: 0,
            snapshot_times: Vec::new(),
            summaries: 0,
        }
    }
}

impl Reporter for CountingReporter {
    fn page_tables(&mut self, time: usize, _: &[Process]) -> std::io::Result<()> {
        self.snapshots += 1;
        self.snapshot_times.push(time);
        Ok(())
    }
    fn summary(&mut self, _: &[Process], _: &RunReport) -> std::io::Result<()> {
        self.summaries += 1;
        Ok(())
    }
}

fn config(
    evict: EvictPolicy,
    scope: ReplacementScope,
    snapshot_period: usize,
) -> SimulationConfig {
    SimulationConfig {
        memory_bytes: 800,
        page_bytes: 100,
        alloc: AllocPolicy::Equal,
        evict,
        scope,
        snapshot_period,
    }
}

fn specs() -> Vec<ProcessSpec> {
    vec![
        ProcessSpec { pid: 0, size_bytes: 600 },
        ProcessSpec { pid: 1, size_bytes: 900 },
    ]
}

fn random_trace(rng: &mut StdRng, len: usize) -> Vec<Access> {
    (0..len)
        .map(|_| {
            let pid = rng.gen_range(0..2);
            let pages = if pid == 0 { 6 } else { 9 };
            Access {
                pid,
                addr: 100 * rng.gen_range(0..pages),
            }
        })
        .collect()
}

#[test]
fn worked_example_six_faults() {
    // 1 process, 400-byte space, 100-byte pages, 4 frames, FIFO global:
    // five distinct pages fault, and re-touching the first faults again
    // because admitting the fifth evicted it.
    let cfg = SimulationConfig {
        memory_bytes: 400,
        page_bytes: 100,
        alloc: AllocPolicy::Equal,
        evict: EvictPolicy::Fifo,
        scope: ReplacementScope::Global,
        snapshot_period: 0,
    };
    let trace: Vec<Access> = [100, 200, 300, 400, 500, 100]
        .iter()
        .map(|&addr| Access { pid: 0, addr })
        .collect();
    let mut sim =
        Simulator::new(cfg, &[ProcessSpec { pid: 0, size_bytes: 400 }], trace).unwrap();
    let report = sim.run(&mut CountingReporter::new()).unwrap();
    assert_eq!(report.total_faults, 6);
    assert_eq!(report.total_accesses, 6);
    assert_eq!(report.total_fault_rate, 100.0);
}

#[test]
fn frames_are_conserved_under_every_policy() {
    let mut rng = StdRng::seed_from_u64(17);
    let trace = random_trace(&mut rng, 500);
    for evict in [
        EvictPolicy::Fifo,
        EvictPolicy::SecondChance,
        EvictPolicy::Lru,
        EvictPolicy::Lfu,
    ] {
        for scope in [ReplacementScope::Global, ReplacementScope::Local] {
            let cfg = config(evict, scope, 0);
            let total_frames = cfg.total_frames();
            let mut sim = Simulator::new(cfg, &specs(), trace.clone()).unwrap();
            sim.run(&mut CountingReporter::new()).unwrap();
            let quota_sum: usize =
                sim.processes().iter().map(|p| p.frame_quota).sum();
            assert_eq!(quota_sum, total_frames, "{} {}", evict, scope);
            for p in sim.processes() {
                assert!(p.loaded_count <= p.frame_quota, "{} {}", evict, scope);
                let resident =
                    p.page_table.iter().filter(|e| e.present).count();
                assert_eq!(resident, p.loaded_count, "{} {}", evict, scope);
            }
        }
    }
}

#[test]
fn local_replacement_never_moves_quota() {
    let mut rng = StdRng::seed_from_u64(5);
    let trace = random_trace(&mut rng, 400);
    let mut sim = Simulator::new(
        config(EvictPolicy::Lru, ReplacementScope::Local, 0),
        &specs(),
        trace,
    )
    .unwrap();
    sim.run(&mut CountingReporter::new()).unwrap();
    // 8 frames split equally over 2 processes, untouched by local eviction
    let quotas: Vec<usize> = sim.processes().iter().map(|p| p.frame_quota).collect();
    assert_eq!(quotas, vec![4, 4]);
}

#[test]
fn identical_runs_are_identical() {
    let mut rng = StdRng::seed_from_u64(99);
    let trace = random_trace(&mut rng, 600);
    let run = |trace: Vec<Access>| {
        let mut sim = Simulator::new(
            config(EvictPolicy::SecondChance, ReplacementScope::Global, 0),
            &specs(),
            trace,
        )
        .unwrap();
        sim.run(&mut CountingReporter::new()).unwrap()
    };
    assert_eq!(run(trace.clone()), run(trace));
}

#[test]
fn snapshot_period_controls_emission() {
    let mut rng = StdRng::seed_from_u64(2);
    let trace = random_trace(&mut rng, 250);

    let mut off = CountingReporter::new();
    let mut sim = Simulator::new(
        config(EvictPolicy::Fifo, ReplacementScope::Global, 0),
        &specs(),
        trace.clone(),
    )
    .unwrap();
    sim.run(&mut off).unwrap();
    assert_eq!(off.snapshots, 0);
    assert_eq!(off.summaries, 1);

    let mut on = CountingReporter::new();
    let mut sim = Simulator::new(
        config(EvictPolicy::Fifo, ReplacementScope::Global, 100),
        &specs(),
        trace,
    )
    .unwrap();
    sim.run(&mut on).unwrap();
    assert_eq!(on.snapshots, 2);
    // labeled with the 0-based position of the triggering reference
    assert_eq!(on.snapshot_times, vec![99, 199]);
}

#[test]
fn zero_quota_aborts_before_simulation() {
    // 9 processes over 8 frames: the equal share is zero
    let specs: Vec<ProcessSpec> = (0..9)
        .map(|pid| ProcessSpec { pid, size_bytes: 300 })
        .collect();
    let err = Simulator::new(
        config(EvictPolicy::Fifo, ReplacementScope::Global, 0),
        &specs,
        Vec::new(),
    )
    .unwrap_err();
    assert_eq!(err, PagingError::ZeroFrameQuota { pid: 0 });
}

#[test]
fn mapped_pages_accumulate_and_never_shrink() {
    let mut rng = StdRng::seed_from_u64(41);
    let trace = random_trace(&mut rng, 300);
    let mut sim = Simulator::new(
        config(EvictPolicy::Lfu, ReplacementScope::Global, 0),
        &specs(),
        trace,
    )
    .unwrap();
    sim.run(&mut CountingReporter::new()).unwrap();
    for p in sim.processes() {
        // every distinct page of the touched range got mapped exactly once
        assert!(p.mapped_count() <= p.page_count);
        let mut tags: Vec<usize> =
            p.page_table.iter().map(|e| e.frame_tag).collect();
        tags.sort_unstable();
        tags.dedup();
        assert_eq!(tags.len(), p.page_table.len());
    }
}
