// src/checker/mod.rs
// =============================================================================
// This module contains the redirect checking logic.
//
// Submodules:
// - redirect: Makes the single no-follow request and classifies the response
// - destination: Resolves the Location header and compares URLs component
//   by component
// - error: The per-check error taxonomy
//
// This file (mod.rs) is the module root - it re-exports the public API so
// callers can write `checker::RedirectChecker` instead of
// `checker::redirect::RedirectChecker`.
//
// Rust concepts:
// - Private submodules: Only what is re-exported below is visible outside
// - pub use: Re-exporting items from submodules
// =============================================================================

mod destination;
mod error;
mod redirect;

pub use error::{CheckError, ErrorKind};
pub use redirect::{CheckOutcome, RedirectChecker};
