//! Core business logic for Dompet.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. All domain types, validation rules, and state machines
//! live here; durable storage and delivery are injected collaborators.
//!
//! # Modules
//!
//! - `wallet` - User wallets and platform sub-wallets
//! - `ledger` - Append-only transaction ledger and balance mutation
//! - `workflow` - Staged approval chains (opex, claims, leave, disputes)
//! - `guardian` - Automated dispute sweep
//! - `notify` - Notification sink collaborator interface

pub mod guardian;
pub mod ledger;
pub mod notify;
pub mod wallet;
pub mod workflow;
