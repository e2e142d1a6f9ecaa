//! Canonicalization: reduce the evidence set for one product key into a
//! single merged view
//!
//! `ranking` orders the evidence, `merge` resolves each payload field
//! against that order, `engine` wires both to the store under per-key
//! mutual exclusion (`key_lock`).

pub mod engine;
pub mod key_lock;
pub mod merge;
pub mod ranking;

pub use engine::{canonicalize, CanonicalizationFailure};
pub use key_lock::KeyLocks;
pub use ranking::{rank, SourcePriorities};
