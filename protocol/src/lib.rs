// Copyright (c) 2026 Shade Contributors. MIT License.
// See LICENSE for details.

//! # Shade Protocol: Confidential Note Client
//!
//! Client-side orchestration for confidential value notes. A note hides its
//! value behind a Pedersen commitment; only accounts holding its viewing key
//! can open it. This crate never holds session secrets itself: every key it
//! needs is requested from the session holder through a
//! [`gateway::ConnectionGateway`].
//!
//! ## Architecture
//!
//! - **note** - Note identity, viewing keys, materialization and access
//!   grants.
//! - **gateway** - The request/response seam to the session holder, its
//!   wire types, and an in-memory implementation.
//! - **proof** - Comparison relations and the orchestrator that turns a note
//!   and an operand into a prover request.
//! - **zkp** - Pedersen commitments and the reference Groth16 prover.
//! - **crypto** - Hashing and sealed viewing-key encryption.
//! - **config** - Operation names, wire lengths and domain tags.
//!
//! ## Failure model
//!
//! Note operations have a strict form (`try_export`, `try_grant_access`)
//! returning [`note::NoteError`], and a fail-closed form (`export`,
//! `grant_access`) that collapses every failure to an absent result.
//! Comparisons on [`proof::ProofOrchestrator`] return `Result` only; `.ok()`
//! gives the fail-closed view. Proofs are only ever requested for an
//! original note that was actually exported.

pub mod config;
pub mod crypto;
pub mod gateway;
pub mod note;
pub mod proof;
pub mod zkp;
