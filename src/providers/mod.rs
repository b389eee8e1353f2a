//! Provider adapters
//!
//! One adapter per vendor. Each translates the defaulted, truncated request
//! into the vendor's streaming completion call and yields incremental text
//! for the relay. Adapters own vendor credentials and connection setup;
//! everything past the initial connect is surfaced as stream items so the
//! relay can downgrade failures to in-band error chunks.

pub mod anthropic;
pub mod openai;
pub mod sse;
pub mod vertex;

use futures::Stream;
use std::pin::Pin;

use crate::error::AppError;

/// Incremental text produced by a provider adapter.
///
/// The stream's natural end is the end-of-response signal; adapters never
/// encode termination as an error value.
pub type TextStream = Pin<Box<dyn Stream<Item = Result<String, AppError>> + Send>>;
