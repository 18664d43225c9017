//! ipdb-gen: CLI tool for compacting and querying IP location dumps.

use clap::{Parser, Subcommand};
use ipdb::{cidr, dump, Compactor};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "ipdb-gen")]
#[command(version = "0.1.0")]
#[command(about = "Compact and query IPv4 location database dumps", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compact a raw dump into a minimal covering dump
    Compact {
        /// Input dump file (one network;attrs record per line)
        #[arg(short, long)]
        input: PathBuf,

        /// Output dump file
        #[arg(short, long)]
        output: PathBuf,

        /// Disable the coarse-country merge rule
        #[arg(long)]
        no_coarse_country: bool,

        /// Verbose output
        #[arg(short, long)]
        verbose: bool,
    },

    /// Look up the record covering an address
    Lookup {
        /// Dump file to load
        #[arg(short, long)]
        db: PathBuf,

        /// Dotted IPv4 address to resolve
        ip: String,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Compact {
            input,
            output,
            no_coarse_country,
            verbose,
        } => {
            if let Err(e) = compact_dump(&input, &output, no_coarse_country, verbose) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
        Commands::Lookup { db, ip } => {
            if let Err(e) = lookup(&db, &ip) {
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        }
    }
}

fn compact_dump(
    input: &PathBuf,
    output: &PathBuf,
    no_coarse_country: bool,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    if verbose {
        println!("Reading input dump: {:?}", input);
    }

    let tree = dump::read_tree(File::open(input)?)?;
    if verbose {
        println!("Loaded {} prefixes ({} trie nodes)", tree.len(), tree.node_count());
    }

    let compactor = if no_coarse_country {
        Compactor::with_coarse_country(None)
    } else {
        Compactor::new()
    };
    let records = compactor.compact(&tree)?;

    let mut writer = BufWriter::new(File::create(output)?);
    dump::write_records(&mut writer, &records)?;
    writer.flush()?;

    println!(
        "Compacted {} prefixes -> {} records into {:?}",
        tree.len(),
        records.len(),
        output
    );
    Ok(())
}

fn lookup(db: &PathBuf, ip: &str) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cidr::parse_addr(ip)?;
    let tree = dump::read_tree(File::open(db)?)?;

    match tree.lookup(addr) {
        Some(record) => println!("{}", record),
        None => println!("{}: no covering prefix", ip),
    }
    Ok(())
}
