use std::env;
use std::process;

use log::info;

use page_sim::cli;
use page_sim::report::FileReporter;
use paging::Simulator;

fn main() {
    env_logger::init();

    let opts = match cli::parse(env::args()) {
        Ok(opts) => opts,
        Err(e) => {
            eprintln!("{}", e);
            process::exit(1);
        }
    };

    if let Err(e) = run(opts) {
        eprintln!("error: {}", e);
        process::exit(1);
    }
}

fn run(opts: cli::Options) -> Result<(), Box<dyn std::error::Error>> {
    let specs = trace::read_plist(&opts.plist)?;
    let accesses = trace::read_ptrace(&opts.ptrace)?;
    info!(
        "{} processes, {} references, {} frames",
        specs.len(),
        accesses.len(),
        opts.config.total_frames()
    );

    let mut reporter = FileReporter::create(opts.config.clone(), &opts.output)?;
    let mut sim = Simulator::new(opts.config, &specs, accesses)?;
    sim.run(&mut reporter)?;
    Ok(())
}
