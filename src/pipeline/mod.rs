//! Pipeline stages for PDF translation.
//!
//! Each submodule implements exactly one transformation step. Keeping stages
//! separate makes each independently testable and lets us swap
//! implementations (e.g. a different translation backend) without touching
//! other stages.
//!
//! ## Data Flow
//!
//! ```text
//! extract ──▶ translate ──▶ compose
//! (per-page   (chunk +      (wrap, paginate,
//!  text)       remote call)  embed font)
//! ```
//!
//! 1. [`extract`]   — pull per-page text out of the source PDF; runs in
//!    `spawn_blocking` because the extraction engine is CPU-bound
//! 2. [`translate`] — chunk one page and drive the retried remote calls;
//!    the only stage with network I/O
//! 3. [`compose`]   — lay the translated text out into a fresh paginated
//!    document and serialise it
//!
//! The scheduling of stage 2 across pages lives in [`crate::schedule`]; the
//! orchestration of all three lives in [`crate::translate`].

pub mod compose;
pub mod extract;
pub mod remote;
pub mod translate;
