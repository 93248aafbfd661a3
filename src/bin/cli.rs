//! hashtree CLI
//!
//! Command-line interface for inspecting and mutating a hashtree index file.

use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, EnvFilter};

use hashtree::{ContentStore, HashStore, MemoryStore};

/// hashtree CLI
#[derive(Parser, Debug)]
#[command(name = "hashtree-cli")]
#[command(about = "Persistent content-hash index over a memory-mapped file")]
#[command(version)]
struct Args {
    /// Index file path
    #[arg(short, long, default_value = "./hashtree.db")]
    file: String,

    /// Requested capacity in bytes; the file is zero-extended up to this.
    /// 0 keeps an existing file at its current size.
    #[arg(short, long, default_value = "0")]
    size: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Get the value hash stored for a key hash
    Get {
        /// 64-hex-character key hash
        key: String,
    },

    /// Set a key hash to a value hash
    Set {
        /// 64-hex-character key hash
        key: String,

        /// 64-hex-character value hash
        value: String,
    },

    /// Print the superblock (magic, declared size, root, next free)
    Info,

    /// Hash arbitrary bytes the way the content store would
    PutBlob {
        /// Data to hash
        data: String,
    },
}

fn main() {
    // Initialize tracing/logging
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,hashtree=debug"));

    fmt().with_env_filter(filter).with_target(true).init();

    let args = Args::parse();

    if let Err(e) = run(args) {
        tracing::error!("{}", e);
        std::process::exit(1);
    }
}

fn run(args: Args) -> hashtree::Result<()> {
    match args.command {
        Commands::Get { key } => {
            let store = HashStore::open_path(&args.file, args.size)?;
            match store.get(&key)? {
                Some(value) => println!("{}", value),
                None => {
                    println!("(absent)");
                    std::process::exit(2);
                }
            }
        }

        Commands::Set { key, value } => {
            let mut store = HashStore::open_path(&args.file, args.size)?;
            store.set(&key, &value)?;
            store.flush()?;
        }

        Commands::Info => {
            let store = HashStore::open_path(&args.file, args.size)?;
            println!("magic:         {:?}", store.magic());
            println!("declared_size: {}", store.declared_size());
            println!("root:          {}", store.root_slot());
            println!("next_free:     {}", store.next_free());
            println!("records:       {}", store.record_count());
        }

        Commands::PutBlob { data } => {
            let content = MemoryStore::new();
            let hash = content.put(data.as_bytes())?;
            println!("{}", hash);
        }
    }

    Ok(())
}
