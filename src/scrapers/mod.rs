//! The scraping and extraction pipeline.
//!
//! Listing pages are fetched per category and mined for article records by
//! layered heuristics, since no single selector survives every redesign of
//! the site.
//!
//! # Pipeline
//!
//! | Stage | Module | Role |
//! |-------|--------|------|
//! | Fetch | [`fetch`] | Sequential per-category GET, cross-category dedup, fallback pass, size cap |
//! | Discover | [`strategies`] | Ordered node-discovery strategies with link dedup and early stop |
//! | Extract | [`extract`] | One node to one record; every field has a fallback chain |
//! | Normalize | [`dates`] | Date text to a day count |
//! | Classify | [`classify`] | Keyword category labels |
//!
//! Failures degrade rather than propagate: a bad node is dropped, a failing
//! strategy is skipped, an unreachable category is logged and passed over.

pub mod classify;
pub mod dates;
pub mod extract;
pub mod fetch;
pub mod strategies;
