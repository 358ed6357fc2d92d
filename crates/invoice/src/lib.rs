//! `strata-invoice` — deterministic invoice document rendering.
//!
//! Pure byte assembly: a `(Due, Member)` pair plus an injected generation
//! date becomes a fixed-layout single-page PDF. No clock reads, no I/O, so
//! identical input produces byte-identical output.

mod pdf;
pub mod renderer;

pub use renderer::{attachment_filename, InvoiceRenderer, IssuerDetails};
