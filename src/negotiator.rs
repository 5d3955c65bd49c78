//! Variant ranking and the configurable entry point

use std::cmp::Ordering;
use std::fmt;

use crate::headers;
use crate::model::{AcceptModel, HeaderSource};
use crate::score::score;
use crate::variant::Variant;

type Tiebreak<K> = Box<dyn Fn(&K, &K) -> Ordering + Send + Sync>;

/// A reusable, configured negotiator
///
/// Holds the per-call options: whether to expand language fallbacks while
/// parsing, and an optional secondary comparator applied to variant keys on
/// exact score ties (before the final smaller-size-first tie-break). The
/// negotiator is stateless across calls and can be shared between threads.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use conneg::{Negotiator, Variant};
///
/// let headers = HashMap::from([
///     ("Accept".to_string(), "text/html, */*;q=0".to_string()),
///     ("Accept-Language".to_string(), "en-us, *;q=0".to_string()),
/// ]);
/// let variants = vec![
///     ("lol", Variant::new("text/html")
///         .with_weight(0.5)
///         .with_charset("iso-8859-1")
///         .with_language("en")
///         .with_size(31337)),
///     ("wut", Variant::new("application/xml")
///         .with_charset("utf-8")
///         .with_language("en")
///         .with_size(12345)),
///     ("hurr", Variant::new("text/plain").with_weight(0.1)),
///     ("good", Variant::new("text/html")
///         .with_weight(0.5)
///         .with_charset("utf-8")
///         .with_language("en")
///         .with_size(22222)),
/// ];
///
/// let negotiator = Negotiator::new().with_language_fallbacks();
/// assert_eq!(negotiator.negotiate(&headers, &variants), Some("good"));
/// ```
pub struct Negotiator<K> {
	add_language_fallbacks: bool,
	tiebreak: Option<Tiebreak<K>>,
}

impl<K> fmt::Debug for Negotiator<K> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Negotiator")
			.field("add_language_fallbacks", &self.add_language_fallbacks)
			.field("tiebreak", &self.tiebreak.as_ref().map(|_| ".."))
			.finish()
	}
}

impl<K: Clone> Negotiator<K> {
	/// Creates a negotiator with no language fallbacks and no tiebreak
	pub fn new() -> Self {
		Self {
			add_language_fallbacks: false,
			tiebreak: None,
		}
	}

	/// Enables language-tag fallback expansion during parsing
	/// (see [`crate::parse_headers`] and the crate docs)
	pub fn with_language_fallbacks(mut self) -> Self {
		self.add_language_fallbacks = true;
		self
	}

	/// Installs a secondary comparator over variant keys, consulted only on
	/// exact score ties
	///
	/// # Examples
	///
	/// ```
	/// use std::collections::HashMap;
	/// use conneg::{Negotiator, Variant};
	///
	/// let headers: HashMap<String, String> = HashMap::new();
	/// let variants = vec![
	///     ("a", Variant::new("text/plain")),
	///     ("b", Variant::new("text/plain")),
	/// ];
	///
	/// let negotiator = Negotiator::new().with_tiebreak(|a: &&str, b: &&str| b.cmp(a));
	/// assert_eq!(negotiator.negotiate(&headers, &variants), Some("b"));
	/// ```
	pub fn with_tiebreak(
		mut self,
		tiebreak: impl Fn(&K, &K) -> Ordering + Send + Sync + 'static,
	) -> Self {
		self.tiebreak = Some(Box::new(tiebreak));
		self
	}

	/// Parses a header source into an [`AcceptModel`] using this
	/// negotiator's options; pre-parsed input passes through unchanged
	pub fn parse_headers(&self, source: impl Into<HeaderSource>) -> AcceptModel {
		headers::parse(source.into(), self.add_language_fallbacks)
	}

	/// Returns the client's preferred variant key
	///
	/// `None` only when the variant set is empty. A variant whose score
	/// collapsed to zero ranks last but remains selectable, so a caller that
	/// wants strict HTTP 406 semantics should use
	/// [`negotiate_all`](Self::negotiate_all) and test for emptiness.
	pub fn negotiate(
		&self,
		source: impl Into<HeaderSource>,
		variants: &[(K, Variant)],
	) -> Option<K> {
		self.rank(source.into(), variants)
			.into_iter()
			.next()
			.map(|(key, _)| key)
	}

	/// Returns every acceptable variant key, most preferred first
	///
	/// Variants whose score collapsed to zero are filtered out; an empty
	/// result means "no acceptable representation", analogous to HTTP 406.
	pub fn negotiate_all(
		&self,
		source: impl Into<HeaderSource>,
		variants: &[(K, Variant)],
	) -> Vec<K> {
		self.rank(source.into(), variants)
			.into_iter()
			.filter(|(_, quality)| *quality > 0.0)
			.map(|(key, _)| key)
			.collect()
	}

	/// Scores and orders the whole pool: score descending, then the caller's
	/// tiebreak, then size ascending (the bandwidth-favoring default).
	fn rank(&self, source: HeaderSource, variants: &[(K, Variant)]) -> Vec<(K, f64)> {
		let accept = headers::parse(source, self.add_language_fallbacks);
		let pool_declares_language = variants
			.iter()
			.any(|(_, variant)| variant.language.is_some());

		let mut scored: Vec<(&K, f64, u64)> = variants
			.iter()
			.map(|(key, variant)| {
				let quality = score(&accept, variant, pool_declares_language);
				tracing::trace!(
					quality,
					media_type = %variant.media_type,
					size = variant.size,
					"scored variant"
				);
				(key, quality, variant.size)
			})
			.collect();

		scored.sort_by(|a, b| {
			b.1.partial_cmp(&a.1)
				.unwrap_or(Ordering::Equal)
				.then_with(|| match &self.tiebreak {
					Some(tiebreak) => tiebreak(a.0, b.0),
					None => Ordering::Equal,
				})
				.then_with(|| a.2.cmp(&b.2))
		});

		scored
			.into_iter()
			.map(|(key, quality, _)| (key.clone(), quality))
			.collect()
	}
}

impl<K: Clone> Default for Negotiator<K> {
	fn default() -> Self {
		Self::new()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;
	use std::collections::HashMap;

	fn headers(pairs: &[(&str, &str)]) -> HashMap<String, String> {
		pairs
			.iter()
			.map(|(name, value)| (name.to_string(), value.to_string()))
			.collect()
	}

	#[rstest]
	fn test_smaller_size_wins_ties() {
		let variants = vec![
			("big", Variant::new("text/plain").with_size(5000)),
			("small", Variant::new("text/plain").with_size(3000)),
		];
		let chosen = Negotiator::new().negotiate(&headers(&[]), &variants);
		assert_eq!(chosen, Some("small"));
	}

	#[rstest]
	fn test_custom_tiebreak_precedes_size() {
		let variants = vec![
			("a", Variant::new("text/plain").with_size(1)),
			("b", Variant::new("text/plain").with_size(2)),
		];
		let negotiator = Negotiator::new().with_tiebreak(|a: &&str, b: &&str| b.cmp(a));
		assert_eq!(negotiator.negotiate(&headers(&[]), &variants), Some("b"));
	}

	#[rstest]
	fn test_empty_pool_yields_none() {
		let variants: Vec<(&str, Variant)> = Vec::new();
		assert_eq!(Negotiator::new().negotiate(&headers(&[]), &variants), None);
		assert!(
			Negotiator::<&str>::new()
				.negotiate_all(&headers(&[]), &variants)
				.is_empty()
		);
	}

	#[rstest]
	fn test_zero_scores_filtered_from_ranking() {
		let variants = vec![
			("html", Variant::new("text/html")),
			("xml", Variant::new("application/xml")),
		];
		let accepted = Negotiator::new()
			.negotiate_all(&headers(&[("Accept", "text/html, */*;q=0")]), &variants);
		assert_eq!(accepted, vec!["html"]);
	}

	#[rstest]
	fn test_single_pick_still_returns_zero_score_top() {
		let variants = vec![("html", Variant::new("text/html"))];
		let negotiator = Negotiator::new();
		let headers = headers(&[("Accept", "text/html;q=0")]);
		assert_eq!(negotiator.negotiate(&headers, &variants), Some("html"));
		assert!(negotiator.negotiate_all(&headers, &variants).is_empty());
	}

	#[rstest]
	fn test_weight_scales_ranking() {
		let variants = vec![
			("light", Variant::new("text/plain").with_weight(0.2)),
			("heavy", Variant::new("text/plain").with_weight(0.9)),
		];
		let all = Negotiator::new().negotiate_all(&headers(&[]), &variants);
		assert_eq!(all, vec!["heavy", "light"]);
	}
}
