//! Snapshot and summary output in the historical `ptable.txt` layout.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use paging::{Process, Reporter, RunReport, SimulationConfig};

/// Writes periodic page-table dumps to the snapshot file and the final
/// summary to stdout.
pub struct FileReporter {
    config: SimulationConfig,
    snapshot: Option<BufWriter<File>>,
}

impl FileReporter {
    /// The snapshot file is only created when snapshots are enabled, so a
    /// `period` of 0 leaves no trace on disk.
    pub fn create<P: AsRef<Path>>(
        config: SimulationConfig,
        path: P,
    ) -> io::Result<Self> {
        let snapshot = if config.snapshot_period > 0 {
            Some(BufWriter::new(File::create(path)?))
        } else {
            None
        };
        Ok(FileReporter { config, snapshot })
    }
}

impl Reporter for FileReporter {
    fn page_tables(&mut self, time: usize, processes: &[Process]) -> io::Result<()> {
        match self.snapshot.as_mut() {
            Some(out) => write_page_tables(out, time, processes),
            None => Ok(()),
        }
    }

    fn summary(&mut self, processes: &[Process], report: &RunReport) -> io::Result<()> {
        if let Some(out) = self.snapshot.as_mut() {
            out.flush()?;
        }
        let stdout = io::stdout();
        write_summary(&mut stdout.lock(), &self.config, processes, report)
    }
}

pub fn write_page_tables<W: Write>(
    out: &mut W,
    time: usize,
    processes: &[Process],
) -> io::Result<()> {
    writeln!(
        out,
        "------------------------------ Time: {} ------------------------------",
        time
    )?;
    for (i, proc) in processes.iter().enumerate() {
        writeln!(
            out,
            "PROCESS {}: ({} pages, {} frames)",
            i, proc.page_count, proc.frame_quota
        )?;
        for page in 0..proc.page_count {
            // pages beyond the mapped prefix print as zeroed placeholders
            let (inframe, addts, refts, refbit, refcount, tag) =
                match proc.page_table.get(page) {
                    Some(e) => (
                        u8::from(e.present),
                        e.loaded_at,
                        e.last_referenced_at,
                        u8::from(e.referenced),
                        e.reference_count,
                        e.frame_tag,
                    ),
                    None => (0, 0, 0, 0, 0, 0),
                };
            writeln!(
                out,
                "page:{:<5} inframe:{:<2} addts:{:<3}refts:{:<3}refbit:{:<2}refcount:{:<3}frame address:{:<5}",
                page, inframe, addts, refts, refbit, refcount, tag
            )?;
        }
    }
    Ok(())
}

pub fn write_summary<W: Write>(
    out: &mut W,
    config: &SimulationConfig,
    processes: &[Process],
    report: &RunReport,
) -> io::Result<()> {
    writeln!(out, "*****************************************************")?;
    writeln!(
        out,
        "memsize   : {:>13}   pagesize: {:>12}   period     : {:>8}  nframes: {}",
        config.memory_bytes,
        config.page_bytes,
        config.snapshot_period,
        config.total_frames()
    )?;
    writeln!(
        out,
        "allocation: {:>13}   eviction: {:>12}   replacement: {:>8}",
        config.alloc.to_string(),
        config.evict.to_string(),
        config.scope.to_string()
    )?;
    writeln!(out, "trace contains {} memory accesses", report.total_accesses)?;
    writeln!(out, "*****************************************************")?;
    writeln!(out, "{} processes -- memory sizes:", processes.len())?;
    for (i, proc) in processes.iter().enumerate() {
        writeln!(
            out,
            "proc[{}] :{:>4} bytes pages: {:>4} frames:{:>4} free:{:>4}",
            i, proc.size_bytes, proc.page_count, proc.frame_quota, proc.frame_quota
        )?;
    }
    writeln!(out, "*****************************************************")?;
    for (i, proc) in report.processes.iter().enumerate() {
        writeln!(
            out,
            "Process {} faults: {}/{} ({:.3}%)\n",
            i, proc.fault_count, proc.access_count, proc.fault_rate
        )?;
    }
    writeln!(
        out,
        "Total faults: {}/{} ({:.3}%)\n",
        report.total_faults, report.total_accesses, report.total_fault_rate
    )?;
    Ok(())
}
