//! DeltaKV CLI
//!
//! Command-line interface operating directly on a database file.

use std::time::Instant;

use clap::{Parser, Subcommand};
use deltakv::{Config, Engine, Result};
use tracing_subscriber::{fmt, EnvFilter};

/// DeltaKV CLI
#[derive(Parser, Debug)]
#[command(name = "deltakv")]
#[command(about = "CLI for the DeltaKV embedded key-value store")]
#[command(version)]
struct Args {
    /// Database file
    #[arg(short, long, default_value = "./deltakv.db")]
    db: String,

    /// Delete any existing database before running the command
    #[arg(long)]
    create: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get a value by key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key-value pair
    Put {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Print recovery statistics for the database
    Stats,

    /// Run a random insert/modify/delete workload
    Bench {
        /// Number of operations
        #[arg(short, long, default_value = "100000")]
        ops: usize,

        /// Key size in bytes
        #[arg(long, default_value = "16")]
        key_size: usize,

        /// Value size in bytes
        #[arg(long, default_value = "256")]
        value_size: usize,

        /// PRNG seed
        #[arg(short, long, default_value = "42")]
        seed: u64,
    },
}

fn main() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,deltakv=info"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<()> {
    let config = Config::builder().path(&args.db).build();
    let engine = if args.create {
        Engine::create(config)?
    } else {
        Engine::open(config)?
    };

    match args.command {
        Commands::Get { key } => match engine.get(key.as_bytes())? {
            Some(value) => println!("{}", String::from_utf8_lossy(&value)),
            None => println!("(nil)"),
        },
        Commands::Put { key, value } => {
            engine.put(key.as_bytes(), value.as_bytes())?;
            println!("OK");
        }
        Commands::Del { key } => {
            engine.delete(key.as_bytes())?;
            println!("OK");
        }
        Commands::Stats => {
            let recovery = engine.recovery();
            println!("file:        {}", engine.path().display());
            println!("bytes:       {}", engine.file_len());
            println!("keys:        {}", engine.key_count());
            println!("pages:       {}", engine.page_count());
            println!("records:     {}", recovery.records_recovered);
            println!("  inserts:   {}", recovery.inserts);
            println!("  modifies:  {}", recovery.modifies);
            println!("  deletes:   {}", recovery.deletes);
            println!("  snapshots: {}", recovery.page_records);
        }
        Commands::Bench {
            ops,
            key_size,
            value_size,
            seed,
        } => bench(&engine, ops, key_size, value_size, seed)?,
    }

    engine.close()
}

/// Mixed workload: each step picks insert, modify or delete with equal odds
fn bench(engine: &Engine, ops: usize, key_size: usize, value_size: usize, seed: u64) -> Result<()> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut keys: Vec<Vec<u8>> = Vec::new();
    let (mut inserts, mut modifies, mut deletes) = (0u64, 0u64, 0u64);

    let start = Instant::now();
    for _ in 0..ops {
        match rng.u8(0..3) {
            0 => {
                let key: Vec<u8> = std::iter::repeat_with(|| rng.u8(..)).take(key_size).collect();
                let value: Vec<u8> = std::iter::repeat_with(|| rng.u8(..)).take(value_size).collect();
                engine.put(&key, &value)?;
                keys.push(key);
                inserts += 1;
            }
            1 if !keys.is_empty() => {
                let value: Vec<u8> = std::iter::repeat_with(|| rng.u8(..)).take(value_size).collect();
                let key = &keys[rng.usize(..keys.len())];
                engine.put(key, &value)?;
                modifies += 1;
            }
            2 if !keys.is_empty() => {
                let key = keys.swap_remove(rng.usize(..keys.len()));
                engine.delete(&key)?;
                deletes += 1;
            }
            _ => {}
        }
    }
    let written = engine.flush()?;
    let elapsed = start.elapsed();

    let total = inserts + modifies + deletes;
    println!(
        "{} ops ({} inserts, {} modifies, {} deletes) in {:.3}s = {:.0} ops/s",
        total,
        inserts,
        modifies,
        deletes,
        elapsed.as_secs_f64(),
        total as f64 / elapsed.as_secs_f64().max(f64::EPSILON)
    );
    println!("{} records flushed, log is {} bytes", written, engine.file_len());

    Ok(())
}
