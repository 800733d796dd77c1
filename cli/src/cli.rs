//! # CLI Interface
//!
//! Defines the command-line argument structure for `shade` using `clap`
//! derive. Supports three subcommands: `inspect`, `demo` and `version`.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use shade_protocol::proof::Relation;

/// Shade confidential-note client.
///
/// Inspects note records and runs comparison proofs against an in-process
/// session holder.
#[derive(Parser, Debug)]
#[command(
    name = "shade",
    about = "Shade confidential-note client",
    version,
    propagate_version = true
)]
pub struct ShadeCli {
    /// Default log filter. `RUST_LOG` takes precedence when set.
    #[arg(
        long,
        global = true,
        env = "SHADE_LOG",
        default_value = "shade=info,shade_protocol=info"
    )]
    pub log: String,

    /// Log output format: `pretty` or `json`.
    #[arg(long, global = true, env = "SHADE_LOG_FORMAT", default_value = "pretty")]
    pub log_format: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Print the predicates of a note record read from a JSON file.
    Inspect(InspectArgs),
    /// Register a note, prove a comparison against it and verify the proof.
    Demo(DemoArgs),
    /// Print version information and exit.
    Version,
}

#[derive(Parser, Debug)]
pub struct InspectArgs {
    /// Path to a JSON note record (`id`, `noteHash`, `value`, `viewingKey`,
    /// `owner`, `asset`, `status`). Use `-` for stdin.
    pub record: PathBuf,
}

#[derive(Parser, Debug)]
pub struct DemoArgs {
    /// Value of the registered note.
    #[arg(long)]
    pub original: u64,

    /// Value of the comparison note.
    #[arg(long)]
    pub comparison: u64,

    /// Relation to prove: eq, gt, lt, gte or lte.
    #[arg(long, short = 'r', default_value = "gte")]
    pub relation: Relation,

    /// Sender recorded on the proof. Defaults to the demo owner.
    #[arg(long, env = "SHADE_SENDER")]
    pub sender: Option<String>,

    /// Grant the registered note's viewing key to this address after
    /// proving. Repeatable.
    #[arg(long = "grant", value_name = "ADDRESS")]
    pub grant: Vec<String>,

    /// Seed for note blindings and the proving-key setup. Random when
    /// omitted.
    #[arg(long)]
    pub seed: Option<u64>,
}
