//! Victim selection and eviction accounting.
//!
//! Candidates are always resident pages; the load-order record is the scan
//! backbone for FIFO, second chance and the global min-scans. Evicted
//! entries stay in the record as holes, so every scan skips non-present
//! entries.

use log::debug;

use crate::process::{PageEntry, Process};
use crate::{EvictPolicy, ReplacementScope};

/// Position of a mapped page: (process index, page index) into the process
/// directory. Load-order entries are never removed, only the entry they
/// point at goes non-present.
pub(crate) type PageRef = (usize, usize);

const NO_VICTIM: &str = "eviction requested with no resident page in scope";

/// Select and evict one victim so `requester` can admit a page. Under
/// global scope the freed frame migrates to the requester for the rest of
/// the run; under local scope quotas never change.
pub(crate) fn evict_page(
    policy: EvictPolicy,
    scope: ReplacementScope,
    directory: &mut [Process],
    load_order: &[PageRef],
    requester: usize,
) {
    match policy {
        EvictPolicy::Fifo => evict_fifo(scope, directory, load_order, requester),
        EvictPolicy::SecondChance => {
            evict_second_chance(scope, directory, load_order, requester)
        }
        EvictPolicy::Lru => {
            evict_min(scope, directory, load_order, requester, |e| {
                e.last_referenced_at
            })
        }
        EvictPolicy::Lfu => {
            evict_min(scope, directory, load_order, requester, |e| e.reference_count)
        }
    }
}

/// Earliest-loaded resident page in scope.
fn evict_fifo(
    scope: ReplacementScope,
    directory: &mut [Process],
    load_order: &[PageRef],
    requester: usize,
) {
    let victim = load_order
        .iter()
        .copied()
        .filter(|&(owner, _)| scope == ReplacementScope::Global || owner == requester)
        .find(|&(owner, page)| directory[owner].page_table[page].present)
        .expect(NO_VICTIM);
    remove_victim(directory, victim, scope, requester);
}

/// One pass over the load order: referenced resident pages lose their bit
/// and are skipped; the first unreferenced resident page is evicted. If the
/// pass exhausts the record every resident page just lost its bit, and plain
/// FIFO decides in the same scope.
fn evict_second_chance(
    scope: ReplacementScope,
    directory: &mut [Process],
    load_order: &[PageRef],
    requester: usize,
) {
    let mut victim = None;
    for &(owner, page) in load_order {
        if scope == ReplacementScope::Local && owner != requester {
            continue;
        }
        let entry = &mut directory[owner].page_table[page];
        if !entry.present {
            continue;
        }
        if entry.referenced {
            entry.referenced = false;
            continue;
        }
        victim = Some((owner, page));
        break;
    }
    match victim {
        Some(v) => remove_victim(directory, v, scope, requester),
        None => evict_fifo(scope, directory, load_order, requester),
    }
}

/// Minimum-key scan for LRU/LFU. Global scope walks the load order and a
/// tie keeps the later entry (`<=`); local scope walks the requester's own
/// page table and a tie keeps the first entry (strict `<`).
fn evict_min(
    scope: ReplacementScope,
    directory: &mut [Process],
    load_order: &[PageRef],
    requester: usize,
    key: fn(&PageEntry) -> usize,
) {
    let victim = match scope {
        ReplacementScope::Global => {
            let mut best: Option<(PageRef, usize)> = None;
            for &(owner, page) in load_order {
                let entry = &directory[owner].page_table[page];
                if !entry.present {
                    continue;
                }
                let k = key(entry);
                if best.map_or(true, |(_, best_k)| k <= best_k) {
                    best = Some(((owner, page), k));
                }
            }
            best.map(|(v, _)| v)
        }
        ReplacementScope::Local => {
            let mut best: Option<(usize, usize)> = None;
            for (page, entry) in directory[requester].page_table.iter().enumerate() {
                if !entry.present {
                    continue;
                }
                let k = key(entry);
                if best.map_or(true, |(_, best_k)| k < best_k) {
                    best = Some((page, k));
                }
            }
            best.map(|(page, _)| (requester, page))
        }
    };
    let victim = victim.expect(NO_VICTIM);
    remove_victim(directory, victim, scope, requester);
}

fn remove_victim(
    directory: &mut [Process],
    (owner, page): PageRef,
    scope: ReplacementScope,
    requester: usize,
) {
    directory[owner].page_table[page].clear();
    match scope {
        ReplacementScope::Global => {
            directory[owner].loaded_count -= 1;
            directory[owner].frame_quota -= 1;
            directory[requester].frame_quota += 1;
            debug!(
                "evicted page {} of pid {}; frame migrates to pid {}",
                page, directory[owner].pid, directory[requester].pid
            );
        }
        ReplacementScope::Local => {
            // victim owner is the requester under local scope
            directory[requester].loaded_count -= 1;
            debug!("evicted page {} of pid {}", page, directory[requester].pid);
        }
    }
}
