//! Command-line handling.
//!
//! Six positional arguments select the run configuration; the input and
//! output file names default to the historical `plist.txt` / `ptrace.txt` /
//! `ptable.txt` and can be overridden with options.

use std::path::PathBuf;
use std::process;

use paging::{AllocPolicy, EvictPolicy, ReplacementScope, SimulationConfig};

pub struct Options {
    pub config: SimulationConfig,
    pub plist: PathBuf,
    pub ptrace: PathBuf,
    pub output: PathBuf,
}

pub fn print_usage(program: &str) {
    eprintln!(
        "usage: {} [OPTIONS] <memsize> <pagesize> <alloc> <eviction> <replacement> <period>",
        program
    );
    eprintln!("      memsize  - size of physical memory in bytes");
    eprintln!("      pagesize - size of pages/frames in bytes");
    eprintln!("      alloc:");
    eprintln!("          0 - equal allocation");
    eprintln!("          1 - proportional allocation");
    eprintln!("      eviction:");
    eprintln!("          0 - FIFO page replacement");
    eprintln!("          1 - second chance replacement");
    eprintln!("          2 - LRU replacement");
    eprintln!("          3 - LFU replacement");
    eprintln!("      replacement:");
    eprintln!("          0 - global replacement");
    eprintln!("          1 - local replacement");
    eprintln!("      period   - dump page tables every period references (0 = never)");
    eprintln!();
    eprintln!("Options:");
    eprintln!("      --plist <file>    process list file (default: plist.txt)");
    eprintln!("      --trace <file>    memory trace file (default: ptrace.txt)");
    eprintln!("      --output <file>   page-table dump file (default: ptable.txt)");
    eprintln!("      -h, --help        print this message");
}

pub fn parse<I: Iterator<Item = String>>(mut args: I) -> Result<Options, String> {
    let program = args.next().unwrap_or_else(|| String::from("page-sim"));

    let mut plist = PathBuf::from("plist.txt");
    let mut ptrace = PathBuf::from("ptrace.txt");
    let mut output = PathBuf::from("ptable.txt");
    let mut positional = Vec::new();

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-h" | "--help" => {
                print_usage(&program);
                process::exit(0);
            }
            "--plist" => plist = PathBuf::from(value_of(&arg, &mut args)?),
            "--trace" => ptrace = PathBuf::from(value_of(&arg, &mut args)?),
            "--output" => output = PathBuf::from(value_of(&arg, &mut args)?),
            _ if arg.starts_with('-') => {
                return Err(format!("unknown option: {}", arg));
            }
            _ => positional.push(arg),
        }
    }

    if positional.len() != 6 {
        print_usage(&program);
        return Err(format!("expected 6 arguments, got {}", positional.len()));
    }

    let memory_bytes = parse_number(&positional[0], "memsize")?;
    let page_bytes = parse_number(&positional[1], "pagesize")?;
    if memory_bytes == 0 || page_bytes == 0 {
        return Err(String::from("memsize and pagesize must be nonzero"));
    }

    let alloc = match positional[2].as_str() {
        "0" => AllocPolicy::Equal,
        "1" => AllocPolicy::Proportional,
        other => {
            return Err(format!(
                "allocation algorithm must be 0 (equal) or 1 (proportional), got {}",
                other
            ))
        }
    };
    let evict = match positional[3].as_str() {
        "0" => EvictPolicy::Fifo,
        "1" => EvictPolicy::SecondChance,
        "2" => EvictPolicy::Lru,
        "3" => EvictPolicy::Lfu,
        other => {
            return Err(format!(
                "eviction algorithm must be 0 (FIFO), 1 (second chance), 2 (LRU) or 3 (LFU), got {}",
                other
            ))
        }
    };
    let scope = match positional[4].as_str() {
        "0" => ReplacementScope::Global,
        "1" => ReplacementScope::Local,
        other => {
            return Err(format!(
                "replacement must be 0 (global) or 1 (local), got {}",
                other
            ))
        }
    };
    let snapshot_period = parse_number(&positional[5], "period")?;

    Ok(Options {
        config: SimulationConfig {
            memory_bytes,
            page_bytes,
            alloc,
            evict,
            scope,
            snapshot_period,
        },
        plist,
        ptrace,
        output,
    })
}

fn value_of<I: Iterator<Item = String>>(flag: &str, args: &mut I) -> Result<String, String> {
    args.next().ok_or_else(|| format!("{} needs a value", flag))
}

fn parse_number(text: &str, what: &str) -> Result<usize, String> {
    text.parse()
        .map_err(|_| format!("invalid {}: {}", what, text))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        std::iter::once(String::from("page-sim"))
            .chain(list.iter().map(|s| s.to_string()).collect::<Vec<_>>())
    }

    #[test]
    fn parses_the_positional_form() {
        let opts = parse(args(&["1024", "256", "1", "2", "0", "50"])).unwrap();
        assert_eq!(opts.config.memory_bytes, 1024);
        assert_eq!(opts.config.page_bytes, 256);
        assert_eq!(opts.config.alloc, AllocPolicy::Proportional);
        assert_eq!(opts.config.evict, EvictPolicy::Lru);
        assert_eq!(opts.config.scope, ReplacementScope::Global);
        assert_eq!(opts.config.snapshot_period, 50);
        assert_eq!(opts.plist, PathBuf::from("plist.txt"));
        assert_eq!(opts.ptrace, PathBuf::from("ptrace.txt"));
        assert_eq!(opts.output, PathBuf::from("ptable.txt"));
    }

    #[test]
    fn file_options_override_defaults() {
        let opts = parse(args(&[
            "--plist", "p.txt", "400", "100", "0", "0", "1", "0", "--output", "out.txt",
        ]))
        .unwrap();
        assert_eq!(opts.plist, PathBuf::from("p.txt"));
        assert_eq!(opts.output, PathBuf::from("out.txt"));
        assert_eq!(opts.config.scope, ReplacementScope::Local);
    }

    #[test]
    fn rejects_bad_codes() {
        assert!(parse(args(&["400", "100", "2", "0", "0", "0"])).is_err());
        assert!(parse(args(&["400", "100", "0", "4", "0", "0"])).is_err());
        assert!(parse(args(&["400", "100", "0", "0", "2", "0"])).is_err());
        assert!(parse(args(&["400", "0", "0", "0", "0", "0"])).is_err());
    }

    #[test]
    fn rejects_unknown_options_and_arity() {
        assert!(parse(args(&["--frobnicate", "400", "100", "0", "0", "0", "0"])).is_err());
        assert!(parse(args(&["400", "100", "0", "0", "0"])).is_err());
    }
}
