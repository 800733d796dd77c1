// Copyright (c) 2026 Shade Contributors. MIT License.
// See LICENSE for details.

//! # Shade CLI
//!
//! Entry point for the `shade` binary.
//!
//! - `inspect` - read a note record and print what the client can tell
//!   about it without any session
//! - `demo`    - run the whole comparison flow against an in-process
//!   session holder
//! - `version` - print build version information

mod cli;
mod logging;

use std::io::Read;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;

use shade_protocol::gateway::InMemoryGateway;
use shade_protocol::note::{MaterializedNote, NoteIdentity, ViewingKey};
use shade_protocol::proof::{CompareOptions, ProofOrchestrator};
use shade_protocol::zkp::LocalRangeProver;

use cli::{Commands, ShadeCli};
use logging::LogFormat;

/// Owner of every note the demo registers.
const DEMO_OWNER: &str = "0x1111111111111111111111111111111111111111";
/// Asset every demo note denominates.
const DEMO_ASSET: &str = "0x2222222222222222222222222222222222222222";

#[tokio::main]
async fn main() -> Result<()> {
    let cli = ShadeCli::parse();

    match cli.command {
        Commands::Inspect(args) => {
            logging::init_logging(&cli.log, LogFormat::from_str_lossy(&cli.log_format));
            inspect(args)
        }
        Commands::Demo(args) => {
            logging::init_logging(&cli.log, LogFormat::from_str_lossy(&cli.log_format));
            run_demo(args).await
        }
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

fn inspect(args: cli::InspectArgs) -> Result<()> {
    let json = if args.record.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("failed to read note record from stdin")?;
        buf
    } else {
        std::fs::read_to_string(&args.record)
            .with_context(|| format!("failed to read {}", args.record.display()))?
    };

    let note = NoteIdentity::from_json(&json).context("failed to parse note record")?;

    println!("id         : {}", note.id());
    println!("note hash  : {}", note.note_hash().unwrap_or("-"));
    match note.value() {
        Some(value) => println!("value      : {value}"),
        None => println!("value      : -"),
    }
    match note.status() {
        Some(status) => println!("status     : {status:?}"),
        None => println!("status     : -"),
    }
    println!(
        "owner      : {}",
        note.owner().map(|o| o.address.as_str()).unwrap_or("-")
    );
    println!(
        "asset      : {}",
        note.asset().map(|a| a.address.as_str()).unwrap_or("-")
    );
    println!("valid      : {}", note.is_valid());
    println!("visible    : {}", note.is_visible());
    println!("destroyed  : {}", note.is_destroyed());
    Ok(())
}

async fn run_demo(args: cli::DemoArgs) -> Result<()> {
    let mut rng = match args.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let gateway = Arc::new(InMemoryGateway::new());
    let key = ViewingKey::random(args.original, &mut rng);
    let record = gateway
        .register_note(&key, DEMO_OWNER, DEMO_ASSET)
        .context("failed to register demo note")?;
    let note = NoteIdentity::from_record(record);
    tracing::info!(note = %note.id(), "demo note registered");

    let comparison = MaterializedNote::create(args.comparison, DEMO_OWNER, &mut rng);

    let (prover, verifier) = LocalRangeProver::setup(&mut rng, gateway.clone(), DEMO_OWNER)
        .context("failed to set up the range prover")?;
    let orchestrator = ProofOrchestrator::new(gateway.clone(), Arc::new(prover));

    let options = CompareOptions {
        sender: args.sender.clone(),
        remainder_note: None,
    };
    let proof = orchestrator
        .compare(args.relation, &note, &comparison, options)
        .await
        .with_context(|| {
            format!(
                "failed to prove {} {} {}",
                args.original, args.relation, args.comparison
            )
        })?;
    let valid = verifier.verify(&proof).context("proof verification failed")?;

    println!("note       : {}", note.id());
    println!("note hash  : {}", note.note_hash().unwrap_or("-"));
    println!("relation   : {}", proof.relation());
    println!("sender     : {}", proof.sender());
    println!("proof size : {} bytes", proof.size());
    println!("transcript : 0x{}", hex::encode(proof.transcript_digest()));
    println!("verified   : {valid}");

    if !args.grant.is_empty() {
        let granted = note
            .try_grant_access(gateway.as_ref(), args.grant.clone())
            .await
            .context("failed to grant note access")?;
        println!("granted    : {granted} ({} addresses)", args.grant.len());
    }

    println!("gateway    : {} calls", gateway.call_count());
    Ok(())
}

fn print_version() {
    println!("shade    {}", env!("CARGO_PKG_VERSION"));
    println!("protocol {}", shade_protocol::config::PROTOCOL_VERSION);
    println!("rustc    {}", rustc_version());
}

fn rustc_version() -> &'static str {
    option_env!("RUSTC_VERSION").unwrap_or("unknown")
}
