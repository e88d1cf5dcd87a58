//! docsift - typed value extraction from scanned pages.
//!
//! Given an ordered list of scanned page images, docsift recognizes their
//! text through an injected OCR capability and scans the result for
//! substrings that parse as locale-rendered numbers, percentages, currency
//! amounts, dates, times or date-times.
//!
//! The pipeline has three parts:
//!
//! - [`formats::FormatCatalog`]: per-family catalogs of locale formatters,
//!   deduplicated by the text each formatter produces for a fixed canonical
//!   sample, built once per process.
//! - [`fetch::TextFetcher`]: concurrent per-page recognition with a
//!   write-once cache, page-ordered aggregation and cooperative cancellation.
//! - [`detect::DetectionEngine`]: a bounded sliding-window search that
//!   attempts every catalog formatter against every window and collects all
//!   successful parses as candidates.
//!
//! All matches at all window lengths are surfaced; ranking or deduplicating
//! ambiguous candidates is left to the caller.

pub mod cli;
pub mod detect;
pub mod fetch;
pub mod formats;
pub mod ocr;
pub mod page;

pub use detect::{Candidate, DetectError, DetectEvent, DetectionEngine};
pub use fetch::{FetchError, FetchEvent, TextFetcher};
pub use formats::{DetectedValue, FormatCatalog, ValueKind};
pub use ocr::{OcrConfig, OcrEngine, OcrEngineFactory, RecognitionError};
pub use page::{Page, PageId, PageIdAllocator};
