use std::fmt;

pub mod eviction;
pub mod frame_alloc;
pub mod process;
pub mod simulator;

pub use process::{PageEntry, Process};
pub use simulator::{ProcessReport, Reporter, RunReport, Simulator};

/// How the frame pool is divided among processes at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocPolicy {
    Equal,
    Proportional,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EvictPolicy {
    Fifo,
    SecondChance,
    Lru,
    Lfu,
}

/// Whether a victim may be any process's page or only the faulting one's.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplacementScope {
    Global,
    Local,
}

impl fmt::Display for AllocPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AllocPolicy::Equal => write!(f, "equal"),
            AllocPolicy::Proportional => write!(f, "proportional"),
        }
    }
}

impl fmt::Display for EvictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvictPolicy::Fifo => write!(f, "FIFO"),
            EvictPolicy::SecondChance => write!(f, "SecondChance"),
            EvictPolicy::Lru => write!(f, "LRU"),
            EvictPolicy::Lfu => write!(f, "LFU"),
        }
    }
}

impl fmt::Display for ReplacementScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReplacementScope::Global => write!(f, "global"),
            ReplacementScope::Local => write!(f, "local"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub memory_bytes: usize,
    pub page_bytes: usize,
    pub alloc: AllocPolicy,
    pub evict: EvictPolicy,
    pub scope: ReplacementScope,
    /// Dump page tables every this many references; 0 disables snapshots.
    pub snapshot_period: usize,
}

impl SimulationConfig {
    pub fn total_frames(&self) -> usize {
        self.memory_bytes / self.page_bytes
    }
}

/// A process declaration from the plist file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProcessSpec {
    pub pid: usize,
    pub size_bytes: usize,
}

/// One memory reference from the ptrace file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Access {
    pub pid: usize,
    pub addr: usize,
}

/// Fatal preconditions. All of these abort the run before the first
/// reference is processed; there is no partial result to recover.
#[derive(Debug, PartialEq, Eq)]
pub enum PagingError {
    /// Frame allocation left a process without a single frame.
    ZeroFrameQuota { pid: usize },
    NoProcesses,
    /// The trace references a pid missing from the process list.
    UnknownProcess { pid: usize },
}

impl fmt::Display for PagingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PagingError::ZeroFrameQuota { pid } => {
                write!(f, "process {} was allocated 0 frames", pid)
            }
            PagingError::NoProcesses => write!(f, "process list is empty"),
            PagingError::UnknownProcess { pid } => {
                write!(f, "trace references unknown process {}", pid)
            }
        }
    }
}

impl std::error::Error for PagingError {}
