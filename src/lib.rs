//! Monthly Sales Aggregation and Analysis Engine
//!
//! This crate ingests per-month point-of-sale extracts, merges them into one
//! chronological dataset and derives the figures a retail dashboard needs:
//! monthly and category totals, period-over-period growth, top-N product
//! rankings and stock severity tiers.

#![warn(missing_docs)]

pub mod analysis;
pub mod api;
pub mod config;
pub mod error;
pub mod models;
