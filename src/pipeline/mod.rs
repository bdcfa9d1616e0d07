//! Pipeline stages for image-to-PDF export.
//!
//! Each submodule implements exactly one transformation step.
//!
//! ## Data Flow
//!
//! ```text
//! ingest ──▶ (ContentList) ──▶ encode ──▶ layout ──▶ pdf
//! (filter,    ordered pages     (decode,   (fit +     (lopdf page
//!  read,                         JPEG)      centre)    tree)
//!  probe)
//! ```
//!
//! 1. [`ingest`]: filter blobs by media type, read and probe them
//!    concurrently, and hand back payloads in input order
//! 2. [`encode`]: decode a payload to pixels and re-encode as JPEG; runs in
//!    `spawn_blocking` because both halves are CPU-bound
//! 3. [`layout`]: aspect-preserving fit inside the margin box, centred
//! 4. [`pdf`]   : place each JPEG on its own page and serialise

pub mod encode;
pub mod ingest;
pub mod layout;
pub mod pdf;
