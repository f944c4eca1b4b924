//! The trace replay driver.
//!
//! Owns the process directory and the load-order record; everything is one
//! sequential pass over the trace, so there is exactly one writer and no
//! locking anywhere.

use log::{debug, info};

use crate::eviction::{self, PageRef};
use crate::frame_alloc;
use crate::process::{PageEntry, Process};
use crate::{Access, PagingError, ProcessSpec, SimulationConfig};

/// Every referenced bit in every page table is cleared this often, so the
/// second-chance sweep sees a bounded working set.
const REFERENCE_RESET_INTERVAL: usize = 100;

/// Sink for periodic page-table dumps and the end-of-run report. The core
/// never does I/O itself; whatever implements this does.
pub trait Reporter {
    fn page_tables(&mut self, time: usize, processes: &[Process]) -> std::io::Result<()>;
    fn summary(&mut self, processes: &[Process], report: &RunReport)
        -> std::io::Result<()>;
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProcessReport {
    pub pid: usize,
    pub fault_count: usize,
    pub access_count: usize,
    /// Percent of this process's accesses that faulted.
    pub fault_rate: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunReport {
    pub processes: Vec<ProcessReport>,
    pub total_faults: usize,
    pub total_accesses: usize,
    pub total_fault_rate: f64,
}

#[derive(Debug)]
pub struct Simulator {
    config: SimulationConfig,
    processes: Vec<Process>,
    /// Global chronological first-mapping order. Append-only; scans skip
    /// entries whose page has since been evicted.
    load_order: Vec<PageRef>,
    trace: Vec<Access>,
}

impl Simulator {
    /// Build the process directory, allocate frame quotas and validate the
    /// trace. Any error here is fatal; nothing has been simulated yet.
    pub fn new(
        config: SimulationConfig,
        specs: &[ProcessSpec],
        trace: Vec<Access>,
    ) -> Result<Self, PagingError> {
        if specs.is_empty() {
            return Err(PagingError::NoProcesses);
        }
        let mut processes: Vec<Process> = specs
            .iter()
            .map(|s| Process::new(s.pid, s.size_bytes, config.page_bytes))
            .collect();
        frame_alloc::assign_quotas(config.total_frames(), config.alloc, &mut processes)?;
        for access in &trace {
            if !processes.iter().any(|p| p.pid == access.pid) {
                return Err(PagingError::UnknownProcess { pid: access.pid });
            }
        }
        Ok(Simulator {
            config,
            processes,
            load_order: Vec::new(),
            trace,
        })
    }

    pub fn processes(&self) -> &[Process] {
        &self.processes
    }

    /// Replay the whole trace, emitting snapshots and the final report
    /// through `reporter`.
    pub fn run<R: Reporter>(&mut self, reporter: &mut R) -> std::io::Result<RunReport> {
        let trace = std::mem::take(&mut self.trace);
        info!(
            "replaying {} references: {} {} {}",
            trace.len(),
            self.config.alloc,
            self.config.evict,
            self.config.scope
        );
        for (ts, access) in trace.iter().enumerate() {
            self.step(ts, *access);

            // snapshot before the reset so a shared tick dumps the bits
            // as the references left them
            if self.config.snapshot_period > 0
                && (ts + 1) % self.config.snapshot_period == 0
            {
                reporter.page_tables(ts, &self.processes)?;
            }
            if (ts + 1) % REFERENCE_RESET_INTERVAL == 0 {
                self.reset_reference_bits();
            }
        }

        let report = self.report(trace.len());
        reporter.summary(&self.processes, &report)?;
        Ok(report)
    }

    /// Classify one reference as hit, fault on a known page, or first
    /// touch, and update the owning process accordingly.
    fn step(&mut self, ts: usize, access: Access) {
        let pi = self.index_of(access.pid);
        self.processes[pi].access_count += 1;

        match self.processes[pi].lookup(access.addr) {
            Some(page) if self.processes[pi].page_table[page].present => {
                self.processes[pi].page_table[page].touch(ts);
            }
            Some(page) => {
                // mapped once, currently evicted
                self.ensure_free_frame(pi);
                let proc = &mut self.processes[pi];
                proc.page_table[page].reload(ts);
                proc.loaded_count += 1;
                proc.fault_count += 1;
                debug!("t={}: pid {} reloads page {} (addr {})", ts, proc.pid, page, access.addr);
            }
            None => {
                self.ensure_free_frame(pi);
                let proc = &mut self.processes[pi];
                let page = proc.page_table.len();
                proc.page_table.push(PageEntry::load(access.addr, ts));
                proc.loaded_count += 1;
                proc.fault_count += 1;
                debug!("t={}: pid {} maps page {} (addr {})", ts, proc.pid, page, access.addr);
                self.load_order.push((pi, page));
            }
        }
    }

    /// Evict if the process is at its quota, so the caller can admit one
    /// page immediately afterwards.
    fn ensure_free_frame(&mut self, requester: usize) {
        if self.processes[requester].loaded_count >= self.processes[requester].frame_quota {
            eviction::evict_page(
                self.config.evict,
                self.config.scope,
                &mut self.processes,
                &self.load_order,
                requester,
            );
        }
    }

    fn reset_reference_bits(&mut self) {
        for proc in self.processes.iter_mut() {
            for entry in proc.page_table.iter_mut() {
                entry.referenced = false;
            }
        }
    }

    fn index_of(&self, pid: usize) -> usize {
        self.processes
            .iter()
            .position(|p| p.pid == pid)
            .expect("trace pids are validated at construction")
    }

    fn report(&self, total_accesses: usize) -> RunReport {
        let processes: Vec<ProcessReport> = self
            .processes
            .iter()
            .map(|p| ProcessReport {
                pid: p.pid,
                fault_count: p.fault_count,
                access_count: p.access_count,
                fault_rate: fault_rate(p.fault_count, p.access_count),
            })
            .collect();
        let total_faults = processes.iter().map(|p| p.fault_count).sum();
        RunReport {
            processes,
            total_faults,
            total_accesses,
            total_fault_rate: fault_rate(total_faults, total_accesses),
        }
    }
}

fn fault_rate(faults: usize, accesses: usize) -> f64 {
    if accesses == 0 {
        0.0
    } else {
        100.0 * faults as f64 / accesses as f64
    }
}
