//! Startup division of the frame pool into per-process quotas.

use crate::process::Process;
use crate::{AllocPolicy, PagingError};

/// Assign every process its initial frame quota. A quota of zero means the
/// process could never hold a page, so the run must not start.
pub fn assign_quotas(
    total_frames: usize,
    policy: AllocPolicy,
    processes: &mut [Process],
) -> Result<(), PagingError> {
    match policy {
        AllocPolicy::Equal => {
            let nproc = processes.len();
            let share = total_frames / nproc;
            for (i, proc) in processes.iter_mut().enumerate() {
                // The last process absorbs the division remainder.
                proc.frame_quota = if i + 1 < nproc {
                    share
                } else {
                    total_frames - share * (nproc - 1)
                };
                if proc.frame_quota == 0 {
                    return Err(PagingError::ZeroFrameQuota { pid: proc.pid });
                }
            }
        }
        AllocPolicy::Proportional => {
            let total_pages: usize = processes.iter().map(|p| p.page_count).sum();
            for proc in processes.iter_mut() {
                proc.frame_quota = if total_pages == 0 {
                    0
                } else {
                    proc.page_count * total_frames / total_pages
                };
                if proc.frame_quota == 0 {
                    return Err(PagingError::ZeroFrameQuota { pid: proc.pid });
                }
            }
        }
    }
    Ok(())
}
