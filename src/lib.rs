//! Server-driven HTTP content negotiation
//!
//! Given a client's `Accept`, `Accept-Charset`, `Accept-Encoding` and
//! `Accept-Language` headers and a set of candidate representations
//! ("variants") of a resource, computes which variant the client prefers, or
//! a full ranking: the algorithm of RFC 7231 §5.3 in the shape of RFC
//! 2616's historical selection procedure. The crate decides *which* variant
//! wins; transport, response generation and caching headers are out of
//! scope.
//!
//! Everything is pure and synchronous: headers in, ranking out, no shared
//! state between calls.
//!
//! # Examples
//!
//! ```
//! use std::collections::HashMap;
//! use conneg::{negotiate, Variant};
//!
//! let headers = HashMap::from([
//!     ("Accept".to_string(), "text/html, */*;q=0".to_string()),
//! ]);
//! let variants = vec![
//!     ("lol", Variant::new("text/html")
//!         .with_charset("iso-8859-1")
//!         .with_language("en")
//!         .with_size(31337)),
//!     ("wut", Variant::new("application/xml")
//!         .with_charset("utf-8")
//!         .with_language("en")
//!         .with_size(12345)),
//! ];
//!
//! assert_eq!(negotiate(&headers, &variants), Some("lol"));
//! ```
//!
//! Headers can come from a plain map (HTTP or CGI-style keys), an
//! [`http::HeaderMap`], an [`http::Request`], or a previously parsed
//! [`AcceptModel`]; see [`HeaderSource`].
//!
//! # Semantics worth knowing
//!
//! - A media type matching nothing in `Accept` (not even `*/*`) scores
//!   0.1, not 0: type mismatches are *deprioritized, never excluded*. Callers
//!   wanting strict "qualifies or not" gating should use
//!   [`negotiate_all`] and treat an empty result as HTTP 406 rather than
//!   layering on the single-pick result.
//! - A variant declaring no language scores a flat 0.5 when another variant
//!   in the pool declares one. This is a judgment call pinned by tests, not
//!   settled HTTP semantics.
//! - `us-ascii` content is always charset-acceptable, whatever
//!   `Accept-Charset` says.
//! - An empty header value means "no preference", not "nothing acceptable".
//! - Quality values out of `[0, 1]` are clamped, never rejected; nothing in
//!   this crate returns an error.

mod headers;
mod language;
mod model;
mod negotiator;
mod score;
mod variant;

pub use model::{AcceptEntry, AcceptModel, HeaderSource, TokenMap};
pub use negotiator::Negotiator;
pub use score::score;
pub use variant::Variant;

/// Parses a header source into an [`AcceptModel`], without language
/// fallback expansion
///
/// Idempotent: feeding a parsed model back in returns it unchanged. Use
/// [`Negotiator::with_language_fallbacks`] for the expansion variant.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use conneg::parse_headers;
///
/// let headers = HashMap::from([
///     ("HTTP_ACCEPT_ENCODING".to_string(), "gzip, br;q=0.7".to_string()),
/// ]);
/// let model = parse_headers(&headers);
/// let encodings = model.encoding().unwrap();
/// assert_eq!(encodings["gzip"].quality, 1.0);
/// assert_eq!(encodings["br"].quality, 0.7);
/// ```
pub fn parse_headers(source: impl Into<HeaderSource>) -> AcceptModel {
	headers::parse(source.into(), false)
}

/// Picks the preferred variant key with default options
///
/// One-shot form of [`Negotiator::negotiate`]: no language fallbacks, no
/// custom tiebreak. `None` only when `variants` is empty.
pub fn negotiate<K: Clone>(
	source: impl Into<HeaderSource>,
	variants: &[(K, Variant)],
) -> Option<K> {
	Negotiator::new().negotiate(source, variants)
}

/// Ranks every acceptable variant key with default options
///
/// One-shot form of [`Negotiator::negotiate_all`]; zero-score variants are
/// filtered out, and an empty result means "no acceptable representation".
pub fn negotiate_all<K: Clone>(
	source: impl Into<HeaderSource>,
	variants: &[(K, Variant)],
) -> Vec<K> {
	Negotiator::new().negotiate_all(source, variants)
}
