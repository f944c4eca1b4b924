//! Per-process page tables and counters.

/// One page-table slot. Created on first touch and never removed; eviction
/// only clears it back to the zeroed non-resident state, so the slot can be
/// reloaded later without losing its identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEntry {
    pub present: bool,
    /// Accessed since the last periodic reset (or second-chance sweep).
    pub referenced: bool,
    /// The trace address this entry maps. Lookup key, not a frame number.
    pub frame_tag: usize,
    pub loaded_at: usize,
    pub last_referenced_at: usize,
    /// Monotonic while resident; reset only when the page is reloaded.
    pub reference_count: usize,
}

impl PageEntry {
    pub(crate) fn load(frame_tag: usize, now: usize) -> Self {
        PageEntry {
            present: true,
            referenced: true,
            frame_tag,
            loaded_at: now,
            last_referenced_at: now,
            reference_count: 1,
        }
    }

    /// Bring an evicted entry back into a frame.
    pub(crate) fn reload(&mut self, now: usize) {
        self.present = true;
        self.referenced = true;
        self.reference_count = 1;
        self.loaded_at = now;
        self.last_referenced_at = now;
    }

    /// Record a hit on a resident page.
    pub(crate) fn touch(&mut self, now: usize) {
        self.reference_count += 1;
        self.last_referenced_at = now;
        self.referenced = true;
    }

    /// Push the entry out of its frame. The mapping itself survives.
    pub(crate) fn clear(&mut self) {
        self.present = false;
        self.referenced = false;
        self.reference_count = 0;
        self.loaded_at = 0;
        self.last_referenced_at = 0;
    }
}

/// Process control block: the page table plus running counters.
#[derive(Debug, Clone)]
pub struct Process {
    pub pid: usize,
    pub size_bytes: usize,
    /// ceil(size_bytes / page_bytes)
    pub page_count: usize,
    /// Frames this process may hold. Migrates between processes under
    /// global replacement, fixed under local.
    pub frame_quota: usize,
    /// Pages currently resident. Kept <= frame_quota by evicting first.
    pub loaded_count: usize,
    pub fault_count: usize,
    pub access_count: usize,
    /// Populated left to right in first-touch order; never shrinks.
    pub page_table: Vec<PageEntry>,
}

impl Process {
    pub fn new(pid: usize, size_bytes: usize, page_bytes: usize) -> Self {
        // A partial trailing page still needs a whole page.
        let page_count =
            size_bytes / page_bytes + usize::from(size_bytes % page_bytes != 0);
        Process {
            pid,
            size_bytes,
            page_count,
            frame_quota: 0,
            loaded_count: 0,
            fault_count: 0,
            access_count: 0,
            page_table: Vec::new(),
        }
    }

    /// Pages ever mapped. Non-decreasing; entries below this index keep
    /// their identity even while evicted.
    pub fn mapped_count(&self) -> usize {
        self.page_table.len()
    }

    /// Index of the entry keyed by this trace address, if ever mapped.
    pub(crate) fn lookup(&self, addr: usize) -> Option<usize> {
        self.page_table.iter().position(|e| e.frame_tag == addr)
    }
}
