//! Drives the virtual memory simulator through its write-then-read workload.
//!
//! Usage: simulator [lru|fifo] [OPTIONS]
//!
//! Options:
//!   --pages N         number of virtual pages (default 16)
//!   --frames N        number of physical frames (default 4)
//!   --page-size N     cells per page (default 1024)
//!   --swap-file PATH  keep pages in PATH instead of memory
//!   --output PATH     per-access report (default SimulationOutput.txt)
//!   --all-accesses    report writes as well as reads
//!   --dump            print page table and frames when done
//!
//! Logging is controlled with RUST_LOG (default `info`).

mod output;
mod swap_file;

use std::path::PathBuf;

use anyhow::{bail, Context};
use log::{error, info};
use vm::{BackingStore, Cell, MemoryBackingStore, Mmu, MmuConfig, ReplacementPolicy, Simulation, VmError};

use crate::{output::FileRecorder, swap_file::SwapFileStore};

struct Args {
    config: MmuConfig,
    swap_file: Option<PathBuf>,
    output: PathBuf,
    reads_only: bool,
    dump: bool,
}

fn parse_args() -> anyhow::Result<Args> {
    let mut args = Args {
        config: MmuConfig::default(),
        swap_file: None,
        output: PathBuf::from("SimulationOutput.txt"),
        reads_only: true,
        dump: false,
    };

    let mut iter = std::env::args().skip(1);

    while let Some(arg) = iter.next() {
        let mut value = |name: &str| iter.next().with_context(|| format!("{} needs a value", name));

        match arg.as_str() {
            "--pages" => args.config.num_pages = value("--pages")?.parse()?,
            "--frames" => args.config.num_frames = value("--frames")?.parse()?,
            "--page-size" => args.config.page_size = value("--page-size")?.parse()?,
            "--swap-file" => args.swap_file = Some(PathBuf::from(value("--swap-file")?)),
            "--output" => args.output = PathBuf::from(value("--output")?),
            "--all-accesses" => args.reads_only = false,
            "--dump" => args.dump = true,
            flag if flag.starts_with("--") => bail!("unknown option {}", flag),
            policy => args.config.policy = policy.parse::<ReplacementPolicy>()?,
        }
    }

    args.config.validate()?;

    Ok(args)
}

fn frame_hex(cells: &[Cell]) -> String {
    let bytes: Vec<u8> = cells.iter().flat_map(|cell| cell.to_be_bytes()).collect();
    hex::encode(bytes)
}

fn run<S: BackingStore>(args: &Args, store: S) -> anyhow::Result<()> {
    let recorder = FileRecorder::create(&args.output, args.reads_only)
        .with_context(|| format!("creating {}", args.output.display()))?;

    let mmu = Mmu::with_parts(args.config, store, recorder)?;
    let mut simulation = Simulation::new(mmu);

    println!("Simulation running!");

    simulation.start()?;
    let report = simulation.stop()?;

    println!("Simulation ended!");
    println!("Number of page faults: {}", report.total_page_faults);
    println!("Order of page faults: {}", report.reference_string);

    let mmu = simulation.into_mmu();

    if args.dump {
        print!("{}", mmu.page_table());
        print!("{}", mmu.frame_table());
        for (page, frame) in mmu.resident_pages() {
            if let Some(frame) = mmu.frame_table().frame(frame) {
                println!("page {}: {}", page, frame_hex(frame.cells()));
            }
        }
    }

    let (_, recorder, _) = mmu.into_parts();
    let lines = recorder.lines();
    recorder
        .finish()
        .with_context(|| format!("writing {}", args.output.display()))?;

    info!("wrote {} access lines to {}", lines, args.output.display());

    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = parse_args()?;

    let result = match &args.swap_file {
        Some(path) => {
            let store = SwapFileStore::open_or_create(path, args.config.num_pages, args.config.page_size)?;
            run(&args, store)
        }
        None => run(
            &args,
            MemoryBackingStore::new(args.config.num_pages, args.config.page_size),
        ),
    };

    if let Err(err) = &result {
        if err.downcast_ref::<VmError>().map_or(false, VmError::is_defect) {
            error!("simulator: internal MMU defect, aborting");
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_hex_is_big_endian_per_cell() {
        assert_eq!(frame_hex(&[1, -1]), "00000001ffffffff");
    }
}
