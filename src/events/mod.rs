//! Event acquisition and validation.
//!
//! [`RangeFetcher`] retrieves every matching event over an arbitrarily large
//! block range, adaptively subdividing queries the provider rejects.
//! [`EventValidator`] then filters the candidate set by inspecting each
//! event's transaction receipt for a disqualifying log topic, with bounded
//! concurrency and bounded retry.

mod fetcher;
mod hint;
mod validator;

pub use fetcher::RangeFetcher;
pub use hint::{AlchemyRangeHint, NoRangeHint, RangeHint};
pub use validator::EventValidator;
