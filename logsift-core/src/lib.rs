//! Logsift Core
//!
//! Core types and abstractions for the Logsift failure summarizer.
//!
//! This crate contains:
//! - Domain types: failed steps, raw logs, summaries and artifact naming
//! - DTOs: wire types for the GitHub Actions API and the analysis service
//! - Tokenizers and the token-bounded chunker

pub mod chunk;
pub mod domain;
pub mod dto;
pub mod tokenizer;
