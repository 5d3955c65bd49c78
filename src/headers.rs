//! Parsing of `Accept*` header values into an [`AcceptModel`]

use std::collections::HashMap;

use crate::language;
use crate::model::{AcceptEntry, AcceptModel, Dimension, HeaderSource};

/// Parses a header source into an accept model
///
/// Pre-parsed input passes through unchanged. Raw input has each recognized
/// `Accept*` key tokenized; the language dimension is canonicalized and,
/// when `add_language_fallbacks` is set, supplemented with shorter tags per
/// RFC 4647 basic filtering. Both language passes run on the tokens while
/// they still carry the header's left-to-right order, so a prefix shared by
/// several tags always resolves the same way.
pub(crate) fn parse(source: HeaderSource, add_language_fallbacks: bool) -> AcceptModel {
	let raw = match source {
		HeaderSource::Parsed(model) => return model,
		HeaderSource::Raw(raw) => raw,
	};

	let mut model = AcceptModel::default();
	for (name, value) in &raw {
		let Some(dimension) = Dimension::from_header_name(name) else {
			continue;
		};
		let Some(mut entries) = parse_dimension(value) else {
			continue;
		};
		if dimension == Dimension::Language {
			language::canonicalize(&mut entries);
			if add_language_fallbacks {
				language::add_fallbacks(&mut entries);
			}
		}
		model.set(dimension, entries.into_iter().collect());
	}

	tracing::debug!(
		media_type = model.media_type.is_some(),
		charset = model.charset.is_some(),
		encoding = model.encoding.is_some(),
		language = model.language.is_some(),
		"parsed accept headers"
	);

	model
}

/// Tokenizes one header value, preserving header order
///
/// All whitespace is stripped up front (quoted-string parameter values are
/// not supported). Returns `None` for an empty value, which callers treat
/// as "dimension absent" rather than "nothing acceptable". Tokens without
/// an explicit `q` get a descending implicit quality starting at 1.0 so the
/// author's left-to-right ordering survives; the counter is local to this
/// one header value. A duplicate token keeps its first position but takes
/// the later entry's value.
fn parse_dimension(value: &str) -> Option<Vec<(String, AcceptEntry)>> {
	let value: String = value.chars().filter(|c| !c.is_whitespace()).collect();
	if value.is_empty() {
		return None;
	}

	let mut tokens: Vec<(String, AcceptEntry)> = Vec::new();
	let mut implicit_quality = 1.0_f64;

	for candidate in value.split(',') {
		let mut pieces = candidate.split(';');
		let token = pieces.next().unwrap_or("");
		if token.is_empty() {
			continue;
		}

		let mut explicit_quality = None;
		let mut params: HashMap<String, Option<String>> = HashMap::new();
		for param in pieces {
			if param.is_empty() {
				continue;
			}
			let (name, param_value) = match param.split_once('=') {
				Some((name, rest)) => (name, Some(rest.trim_start_matches('='))),
				None => (param, None),
			};
			let name = name.to_ascii_lowercase();
			if name == "q" {
				// a bare `q` or `q=` behaves like no q at all
				if let Some(raw_q) = param_value
					&& !raw_q.is_empty()
				{
					explicit_quality = Some(clamp_quality(raw_q.parse().unwrap_or(0.0)));
				}
			} else {
				params.insert(name, param_value.map(str::to_owned));
			}
		}

		let quality = match explicit_quality {
			Some(quality) => quality,
			None => {
				let quality = implicit_quality;
				implicit_quality -= 0.0001;
				quality
			}
		};

		let token = token.to_ascii_lowercase();
		let entry = AcceptEntry { quality, params };
		match tokens.iter_mut().find(|(existing, _)| *existing == token) {
			Some((_, slot)) => *slot = entry,
			None => tokens.push((token, entry)),
		}
	}

	if tokens.is_empty() { None } else { Some(tokens) }
}

/// Out-of-range qualities are corrected, never rejected; a `q` that failed
/// to parse (or parsed to NaN) degrades to 0.0
fn clamp_quality(quality: f64) -> f64 {
	if quality.is_nan() {
		return 0.0;
	}
	quality.clamp(0.0, 1.0)
}
