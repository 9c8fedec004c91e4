//! Top-level module for the Markov chain engine.
//!
//! This module provides the building blocks of a word-level chain:
//! - Corpus tokenization (`Tokenizer`)
//! - Per-token successor distributions (`State`)
//! - The trained transition table (`TransitionTable`) and its `Trainer`
//! - Start-token selection and generation policies (`generator`)
//! - A single-owner model instance tying them together (`MarkovChain`)

/// Single-owner model instance: corpus tokens plus their transition table.
///
/// Exposes import, training, persistence and generation entry points.
pub mod markov_chain;

/// Regex-based extraction of token sequences from raw text.
pub mod tokenizer;

/// Successor group: one token or a fixed-length run of tokens.
pub mod successor;

/// Ordered successor distribution of a single token.
///
/// Tracks occurrence counts and supports weighted random sampling.
pub mod state;

/// Token → distribution mapping built by training.
pub mod transition_table;

/// Single-pass training of a transition table.
pub mod trainer;

/// Terminal progress reporting used while training.
mod progress;

/// Binary save/load of transition tables and the readable dump.
pub mod persistence;

/// Start-token selection and the fixed-length / sentence-count policies.
pub mod generator;

/// Generation parameters (stop policy, start source, lookup key).
pub mod generation_input;
