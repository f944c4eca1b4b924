//! Input-file parsing for the simulator.
//!
//! Two formats, both fully materialized before simulation starts:
//!
//! - plist: a process-count line, then one `pid size_bytes` line per process
//! - ptrace: one `pid address` reference per line
//!
//! Blank lines are ignored in both.

use std::fmt;
use std::fs;
use std::path::Path;

use log::info;
use paging::{Access, ProcessSpec};

#[derive(Debug)]
pub enum TraceError {
    Io(std::io::Error),
    Malformed {
        file: String,
        line: usize,
        reason: String,
    },
}

impl fmt::Display for TraceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceError::Io(e) => write!(f, "{}", e),
            TraceError::Malformed { file, line, reason } => {
                write!(f, "{}:{}: {}", file, line, reason)
            }
        }
    }
}

impl std::error::Error for TraceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TraceError::Io(e) => Some(e),
            TraceError::Malformed { .. } => None,
        }
    }
}

impl From<std::io::Error> for TraceError {
    fn from(e: std::io::Error) -> Self {
        TraceError::Io(e)
    }
}

pub fn read_plist<P: AsRef<Path>>(path: P) -> Result<Vec<ProcessSpec>, TraceError> {
    let name = path.as_ref().display().to_string();
    let content = fs::read_to_string(path.as_ref())?;
    let specs = parse_plist(&content, &name)?;
    info!("read {} process declarations from {}", specs.len(), name);
    Ok(specs)
}

pub fn read_ptrace<P: AsRef<Path>>(path: P) -> Result<Vec<Access>, TraceError> {
    let name = path.as_ref().display().to_string();
    let content = fs::read_to_string(path.as_ref())?;
    let accesses = parse_ptrace(&content, &name)?;
    info!("read {} memory accesses from {}", accesses.len(), name);
    Ok(accesses)
}

pub fn parse_plist(content: &str, file: &str) -> Result<Vec<ProcessSpec>, TraceError> {
    let mut lines = numbered_lines(content);

    let (line, text) = lines.next().ok_or_else(|| TraceError::Malformed {
        file: file.to_string(),
        line: 1,
        reason: "missing process count".to_string(),
    })?;
    let expected = parse_field::<usize>(text, "process count", file, line)?;

    let mut specs = Vec::with_capacity(expected);
    for (line, text) in lines {
        if specs.len() == expected {
            return Err(TraceError::Malformed {
                file: file.to_string(),
                line,
                reason: format!("more than {} process lines", expected),
            });
        }
        let (pid, size_bytes) = parse_pair(text, "size", file, line)?;
        specs.push(ProcessSpec { pid, size_bytes });
    }

    if specs.len() != expected {
        return Err(TraceError::Malformed {
            file: file.to_string(),
            line: content.lines().count(),
            reason: format!("expected {} processes, found {}", expected, specs.len()),
        });
    }
    Ok(specs)
}

pub fn parse_ptrace(content: &str, file: &str) -> Result<Vec<Access>, TraceError> {
    let mut accesses = Vec::new();
    for (line, text) in numbered_lines(content) {
        let (pid, addr) = parse_pair(text, "address", file, line)?;
        accesses.push(Access { pid, addr });
    }
    Ok(accesses)
}

fn numbered_lines(content: &str) -> impl Iterator<Item = (usize, &str)> {
    content
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty())
}

/// A `pid <second>` line; `what` names the second field for error messages.
fn parse_pair(
    text: &str,
    what: &str,
    file: &str,
    line: usize,
) -> Result<(usize, usize), TraceError> {
    let mut fields = text.split_whitespace();
    let pid = fields.next().unwrap_or("");
    let second = fields.next().ok_or_else(|| TraceError::Malformed {
        file: file.to_string(),
        line,
        reason: format!("expected `pid {}`, got {:?}", what, text),
    })?;
    if fields.next().is_some() {
        return Err(TraceError::Malformed {
            file: file.to_string(),
            line,
            reason: format!("trailing data after `pid {}`", what),
        });
    }
    Ok((
        parse_field(pid, "pid", file, line)?,
        parse_field(second, what, file, line)?,
    ))
}

fn parse_field<T: std::str::FromStr>(
    text: &str,
    what: &str,
    file: &str,
    line: usize,
) -> Result<T, TraceError> {
    text.trim().parse().map_err(|_| TraceError::Malformed {
        file: file.to_string(),
        line,
        reason: format!("invalid {}: {:?}", what, text.trim()),
    })
}
