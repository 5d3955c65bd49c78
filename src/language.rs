//! Language tag canonicalization and optional fallback expansion

use crate::model::AcceptEntry;

/// Canonicalizes one language tag: `_` becomes `-`, repeated separators
/// collapse, everything lower-cased (`EN__US` → `en-us`)
pub(crate) fn canonical_tag(tag: &str) -> String {
	let mut canonical = String::with_capacity(tag.len());
	let mut previous_was_separator = false;
	for ch in tag.trim().chars() {
		let ch = if ch == '_' { '-' } else { ch.to_ascii_lowercase() };
		if ch == '-' {
			if previous_was_separator {
				continue;
			}
			previous_was_separator = true;
		} else {
			previous_was_separator = false;
		}
		canonical.push(ch);
	}
	canonical
}

/// Rewrites every tag of a header-ordered `Accept-Language` token list to
/// canonical form
///
/// Tags that collide after canonicalization merge into the earlier
/// position with the later entry's value, the parser's last-write-wins
/// policy, so the header's own order is what survives.
pub(crate) fn canonicalize(entries: &mut Vec<(String, AcceptEntry)>) {
	let mut index = 0;
	while index < entries.len() {
		let canonical = canonical_tag(&entries[index].0);
		match entries[..index].iter().position(|(tag, _)| *tag == canonical) {
			Some(earlier) => {
				let (_, entry) = entries.remove(index);
				entries[earlier].1 = entry;
			}
			None => {
				entries[index].0 = canonical;
				index += 1;
			}
		}
	}
}

/// Supplements specific tags with their more generic prefixes
///
/// Accepting `en-us` weakly implies accepting `en` (RFC 4647 basic
/// filtering), which RFC 7231 does not mandate; this opt-in pass inserts
/// each missing prefix at the parent's quality × 0.999, compounding per
/// shorter level, so `zh-hans-cn;q=0.8` adds `zh-hans;q≈0.7992` and
/// `zh;q≈0.7984`. Tags are expanded in header order, so when siblings
/// share a prefix the leftmost tag supplies it. Existing entries are never
/// overwritten, and a tag the client explicitly rejected with `q=0` is
/// never expanded.
pub(crate) fn add_fallbacks(entries: &mut Vec<(String, AcceptEntry)>) {
	let tags: Vec<(String, f64)> = entries
		.iter()
		.filter(|(tag, _)| tag.contains('-'))
		.map(|(tag, entry)| (tag.clone(), entry.quality))
		.collect();

	for (tag, quality) in tags {
		if quality == 0.0 {
			continue;
		}

		let subtags: Vec<&str> = tag.split('-').collect();
		let mut fallback_quality = quality;
		for length in (1..subtags.len()).rev() {
			fallback_quality *= 0.999;
			let prefix = subtags[..length].join("-");
			if !entries.iter().any(|(existing, _)| *existing == prefix) {
				entries.push((prefix, AcceptEntry::new(fallback_quality)));
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	fn entries(pairs: &[(&str, f64)]) -> Vec<(String, AcceptEntry)> {
		pairs
			.iter()
			.map(|(tag, quality)| (tag.to_string(), AcceptEntry::new(*quality)))
			.collect()
	}

	fn quality(entries: &[(String, AcceptEntry)], tag: &str) -> f64 {
		entries
			.iter()
			.find(|(existing, _)| existing == tag)
			.map(|(_, entry)| entry.quality)
			.unwrap()
	}

	#[rstest]
	#[case("en-US", "en-us")]
	#[case("EN_US", "en-us")]
	#[case("zh--CN", "zh-cn")]
	#[case("zh_-_Hans", "zh-hans")]
	#[case(" fr ", "fr")]
	fn test_canonical_tag(#[case] tag: &str, #[case] expected: &str) {
		assert_eq!(canonical_tag(tag), expected);
	}

	#[rstest]
	fn test_canonicalize_merges_colliding_tags() {
		let mut langs = entries(&[("EN_US", 0.8), ("fr", 0.6), ("en-us", 0.3)]);
		canonicalize(&mut langs);

		assert_eq!(langs.len(), 2);
		assert_eq!(langs[0].0, "en-us");
		assert_eq!(langs[0].1.quality, 0.3);
		assert_eq!(langs[1].0, "fr");
	}

	#[rstest]
	fn test_fallbacks_added_at_discounted_quality() {
		let mut langs = entries(&[("en-us", 1.0)]);
		add_fallbacks(&mut langs);

		assert_eq!(quality(&langs, "en-us"), 1.0);
		assert!((quality(&langs, "en") - 0.999).abs() < 1e-12);
	}

	#[rstest]
	fn test_fallbacks_compound_per_level() {
		let mut langs = entries(&[("zh-hans-cn", 0.8)]);
		add_fallbacks(&mut langs);

		assert!((quality(&langs, "zh-hans") - 0.8 * 0.999).abs() < 1e-12);
		assert!((quality(&langs, "zh") - 0.8 * 0.999 * 0.999).abs() < 1e-12);
	}

	#[rstest]
	fn test_shared_prefix_comes_from_leftmost_tag() {
		let mut langs = entries(&[("en-us", 1.0), ("en-gb", 0.5)]);
		add_fallbacks(&mut langs);
		assert!((quality(&langs, "en") - 0.999).abs() < 1e-12);

		// reversed header order, reversed outcome
		let mut langs = entries(&[("en-gb", 0.5), ("en-us", 1.0)]);
		add_fallbacks(&mut langs);
		assert!((quality(&langs, "en") - 0.5 * 0.999).abs() < 1e-12);
	}

	#[rstest]
	fn test_fallbacks_never_overwrite() {
		let mut langs = entries(&[("en-us", 1.0), ("en", 0.2)]);
		add_fallbacks(&mut langs);

		assert_eq!(quality(&langs, "en"), 0.2);
		assert_eq!(langs.len(), 2);
	}

	#[rstest]
	fn test_rejected_tag_not_expanded() {
		let mut langs = entries(&[("en-us", 0.0)]);
		add_fallbacks(&mut langs);

		assert_eq!(langs.len(), 1);
	}

	#[rstest]
	fn test_bare_tags_left_alone() {
		let mut langs = entries(&[("en", 1.0)]);
		add_fallbacks(&mut langs);

		assert_eq!(langs.len(), 1);
	}
}
