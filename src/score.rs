//! The composite quality scorer

use std::collections::HashMap;

use crate::language;
use crate::model::{AcceptModel, TokenMap};
use crate::variant::Variant;

/// Quality given to a media type that matches nothing in the `Accept`
/// header, not even `*/*`. Deliberately above zero: an unmatched type is
/// deprioritized, never excluded outright.
const UNMATCHED_TYPE_QUALITY: f64 = 0.1;

/// Floor for a declared-but-unmatched language, so it still outranks
/// no-match-at-all cases in edge sorts.
const UNMATCHED_LANGUAGE_FLOOR: f64 = 0.001;

/// Quality given to a variant that declares no language while another
/// variant in the same pool does. A judgment call, not a normative rule;
/// pinned by tests.
const LANGUAGE_LESS_QUALITY: f64 = 0.5;

/// Scores one variant against a parsed accept model
///
/// The score is the product of five independent factors (intrinsic weight,
/// encoding, charset, language, and media type), each defaulting to 1 when
/// the client expressed no preference on that axis.
/// `pool_declares_language` must say whether *any* variant in the caller's
/// candidate set declares a language, since that changes how a
/// language-less variant is treated.
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use conneg::{parse_headers, score, Variant};
///
/// let headers = HashMap::from([
///     ("Accept".to_string(), "text/html, */*;q=0".to_string()),
/// ]);
/// let model = parse_headers(&headers);
///
/// let html = Variant::new("text/html");
/// let xml = Variant::new("application/xml");
/// assert_eq!(score(&model, &html, false), 1.0);
/// assert_eq!(score(&model, &xml, false), 0.0);
/// ```
pub fn score(accept: &AcceptModel, variant: &Variant, pool_declares_language: bool) -> f64 {
	let qs = variant.weight;
	let qe = encoding_quality(accept, variant);
	let qc = charset_quality(accept, variant);
	let ql = language_quality(accept, variant, pool_declares_language);
	let qt = type_quality(accept, variant);
	qs * qe * qc * ql * qt
}

/// Exact-token quality, improved by the wildcard entry when that is higher.
/// Nothing matching means zero: for encodings and charsets a limited header
/// really does exclude unlisted tokens.
fn token_quality(tokens: &TokenMap, token: &str) -> f64 {
	let mut quality = tokens.get(token).map_or(0.0, |entry| entry.quality);
	if let Some(star) = tokens.get("*")
		&& star.quality > quality
	{
		quality = star.quality;
	}
	quality
}

/// A variant that declares no encoding is not penalized even when the
/// client limited encodings: an unencoded variant is conceptually distinct
/// from declared codings, and `identity` is not special-cased.
fn encoding_quality(accept: &AcceptModel, variant: &Variant) -> f64 {
	let (Some(tokens), Some(encoding)) = (accept.encoding(), variant.encoding.as_deref()) else {
		return 1.0;
	};
	token_quality(tokens, &encoding.trim().to_ascii_lowercase())
}

/// Same shape as encoding, except `us-ascii` is always acceptable
/// regardless of the header, per the historical convention.
fn charset_quality(accept: &AcceptModel, variant: &Variant) -> f64 {
	let (Some(tokens), Some(charset)) = (accept.charset(), variant.charset.as_deref()) else {
		return 1.0;
	};
	let charset = charset.trim().to_ascii_lowercase();
	if charset == "us-ascii" {
		return 1.0;
	}
	token_quality(tokens, &charset)
}

/// Walks the variant's tag from most-specific to least-specific, then the
/// wildcard. A specific prefix at `q=0` is an explicit rejection and
/// short-circuits to zero; `*;q=0` rejects only when no specific level
/// matched, so it cannot override a positive specific match. Otherwise the
/// best quality seen wins, floored at [`UNMATCHED_LANGUAGE_FLOOR`].
fn language_quality(
	accept: &AcceptModel,
	variant: &Variant,
	pool_declares_language: bool,
) -> f64 {
	let Some(tokens) = accept.language() else {
		return 1.0;
	};
	let Some(tag) = variant.language.as_deref() else {
		return if pool_declares_language {
			LANGUAGE_LESS_QUALITY
		} else {
			1.0
		};
	};

	let tag = language::canonical_tag(tag);
	let subtags: Vec<&str> = tag.split('-').filter(|part| !part.is_empty()).collect();

	let mut quality = UNMATCHED_LANGUAGE_FLOOR;
	let mut matched_specific = false;
	for length in (1..=subtags.len()).rev() {
		let prefix = subtags[..length].join("-");
		if let Some(entry) = tokens.get(&prefix) {
			if entry.quality == 0.0 {
				return 0.0;
			}
			matched_specific = true;
			if entry.quality > quality {
				quality = entry.quality;
			}
		}
	}

	if let Some(star) = tokens.get("*") {
		if star.quality == 0.0 {
			if !matched_specific {
				return 0.0;
			}
		} else if star.quality > quality {
			quality = star.quality;
		}
	}

	quality
}

/// Major/minor media-type matching: exact minor, then the major's `*`, then
/// `*/*`, then the [`UNMATCHED_TYPE_QUALITY`] floor. Accept tokens without
/// a `/` can never match and are skipped. Parameters on the variant's media
/// type (anything after `;`) are ignored.
fn type_quality(accept: &AcceptModel, variant: &Variant) -> f64 {
	let Some(tokens) = accept.media_type() else {
		return 1.0;
	};
	if variant.media_type.is_empty() {
		return 1.0;
	}

	let mut table: HashMap<&str, HashMap<&str, f64>> = HashMap::new();
	for (token, entry) in tokens {
		let Some((major, minor)) = token.split_once('/') else {
			continue;
		};
		table.entry(major).or_default().insert(minor, entry.quality);
	}

	let media_type = variant.media_type.trim().to_ascii_lowercase();
	let essence = media_type.split(';').next().unwrap_or("");
	let mut parts = essence.split('/').filter(|part| !part.is_empty());
	let major = parts.next().unwrap_or("");
	let minor = parts.next().unwrap_or("");

	if let Some(quality) = table.get(major).and_then(|minors| minors.get(minor)) {
		return *quality;
	}
	if let Some(quality) = table.get(major).and_then(|minors| minors.get("*")) {
		return *quality;
	}
	if let Some(quality) = table.get("*").and_then(|minors| minors.get("*")) {
		return *quality;
	}
	UNMATCHED_TYPE_QUALITY
}
