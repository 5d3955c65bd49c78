//! The parsed accept model and the header-source input type

use std::collections::HashMap;

/// Tokens of one negotiation dimension, keyed by the lower-cased token
/// (media type, charset, encoding, language tag, or the wildcard `*`).
pub type TokenMap = HashMap<String, AcceptEntry>;

/// A single parsed `Accept*` header entry
///
/// Only `quality` participates in scoring; any other `name=value` parameters
/// found on the token (e.g. `level=1`) are kept in `params` for callers that
/// want them.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcceptEntry {
	/// Quality factor, always clamped into `[0.0, 1.0]`
	pub quality: f64,
	/// Remaining token parameters, lower-cased names; a parameter without
	/// an `=value` part is stored as `None`
	#[cfg_attr(feature = "serde", serde(default))]
	pub params: HashMap<String, Option<String>>,
}

impl AcceptEntry {
	/// Creates an entry with the given quality and no extra parameters
	///
	/// # Examples
	///
	/// ```
	/// use conneg::AcceptEntry;
	///
	/// let entry = AcceptEntry::new(0.8);
	/// assert_eq!(entry.quality, 0.8);
	/// assert!(entry.params.is_empty());
	/// ```
	pub fn new(quality: f64) -> Self {
		Self {
			quality,
			params: HashMap::new(),
		}
	}
}

/// The four negotiation dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Dimension {
	MediaType,
	Charset,
	Encoding,
	Language,
}

impl Dimension {
	/// Maps a header or CGI environment key to its dimension
	///
	/// Accepts any casing, `-` or `_` separators, and an optional `HTTP_`
	/// prefix, so `Accept-Language`, `accept_language` and
	/// `HTTP_ACCEPT_LANGUAGE` all canonicalize. Every other key is ignored.
	pub(crate) fn from_header_name(name: &str) -> Option<Self> {
		let key = name.trim().to_ascii_uppercase().replace('-', "_");
		let key = key.strip_prefix("HTTP_").unwrap_or(&key);
		match key {
			"ACCEPT" => Some(Self::MediaType),
			"ACCEPT_CHARSET" => Some(Self::Charset),
			"ACCEPT_ENCODING" => Some(Self::Encoding),
			"ACCEPT_LANGUAGE" => Some(Self::Language),
			_ => None,
		}
	}
}

/// The parsed representation of a request's `Accept*` headers
///
/// One optional token map per negotiation dimension. A dimension that is
/// `None` means the client expressed no preference on that axis, which the
/// scorer treats as accept-all. An empty or all-whitespace header value also
/// leaves its dimension `None` rather than meaning "reject everything".
///
/// # Examples
///
/// ```
/// use std::collections::HashMap;
/// use conneg::parse_headers;
///
/// let headers = HashMap::from([
///     ("Accept-Language".to_string(), "en-US, fr;q=0.8".to_string()),
/// ]);
/// let model = parse_headers(&headers);
/// let langs = model.language().unwrap();
/// assert_eq!(langs["en-us"].quality, 1.0);
/// assert_eq!(langs["fr"].quality, 0.8);
/// assert!(model.charset().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AcceptModel {
	#[cfg_attr(
		feature = "serde",
		serde(rename = "type", default, skip_serializing_if = "Option::is_none")
	)]
	pub(crate) media_type: Option<TokenMap>,
	#[cfg_attr(
		feature = "serde",
		serde(default, skip_serializing_if = "Option::is_none")
	)]
	pub(crate) charset: Option<TokenMap>,
	#[cfg_attr(
		feature = "serde",
		serde(default, skip_serializing_if = "Option::is_none")
	)]
	pub(crate) encoding: Option<TokenMap>,
	#[cfg_attr(
		feature = "serde",
		serde(default, skip_serializing_if = "Option::is_none")
	)]
	pub(crate) language: Option<TokenMap>,
}

impl AcceptModel {
	/// Tokens parsed from `Accept`, if the header was present and non-empty
	pub fn media_type(&self) -> Option<&TokenMap> {
		self.media_type.as_ref()
	}

	/// Tokens parsed from `Accept-Charset`
	pub fn charset(&self) -> Option<&TokenMap> {
		self.charset.as_ref()
	}

	/// Tokens parsed from `Accept-Encoding`
	pub fn encoding(&self) -> Option<&TokenMap> {
		self.encoding.as_ref()
	}

	/// Tokens parsed from `Accept-Language`, canonicalized (`en_US` → `en-us`)
	pub fn language(&self) -> Option<&TokenMap> {
		self.language.as_ref()
	}

	/// True when no dimension carried a preference
	pub fn is_empty(&self) -> bool {
		self.media_type.is_none()
			&& self.charset.is_none()
			&& self.encoding.is_none()
			&& self.language.is_none()
	}

	pub(crate) fn set(&mut self, dimension: Dimension, tokens: TokenMap) {
		let slot = match dimension {
			Dimension::MediaType => &mut self.media_type,
			Dimension::Charset => &mut self.charset,
			Dimension::Encoding => &mut self.encoding,
			Dimension::Language => &mut self.language,
		};
		*slot = Some(tokens);
	}
}

/// Where the `Accept*` headers come from
///
/// The explicit tagged union that replaces shape-sniffing of the input: a
/// raw header (or CGI-style environment) mapping gets parsed, while a model
/// that was already parsed passes through unchanged, making
/// [`parse_headers`](crate::parse_headers) idempotent.
///
/// Conversions exist from owned and borrowed `HashMap<String, String>`,
/// from [`http::HeaderMap`] and [`http::Request`], and from an
/// [`AcceptModel`].
#[derive(Debug, Clone)]
pub enum HeaderSource {
	/// Raw header names (any casing, `-` or `_` separators, with or without
	/// an `HTTP_` prefix) mapped to their unparsed string values
	Raw(HashMap<String, String>),
	/// An already-parsed model, returned as-is
	Parsed(AcceptModel),
}

impl From<HashMap<String, String>> for HeaderSource {
	fn from(raw: HashMap<String, String>) -> Self {
		Self::Raw(raw)
	}
}

impl From<&HashMap<String, String>> for HeaderSource {
	fn from(raw: &HashMap<String, String>) -> Self {
		Self::Raw(raw.clone())
	}
}

impl From<AcceptModel> for HeaderSource {
	fn from(model: AcceptModel) -> Self {
		Self::Parsed(model)
	}
}

impl From<&AcceptModel> for HeaderSource {
	fn from(model: &AcceptModel) -> Self {
		Self::Parsed(model.clone())
	}
}

impl From<&http::HeaderMap> for HeaderSource {
	/// Repeated header names are comma-joined per RFC 9110 field-line
	/// merging; values that are not valid UTF-8 are skipped.
	fn from(map: &http::HeaderMap) -> Self {
		let mut raw: HashMap<String, String> = HashMap::new();
		for (name, value) in map {
			let Ok(value) = value.to_str() else { continue };
			raw.entry(name.as_str().to_owned())
				.and_modify(|joined| {
					joined.push(',');
					joined.push_str(value);
				})
				.or_insert_with(|| value.to_owned());
		}
		Self::Raw(raw)
	}
}

impl<T> From<&http::Request<T>> for HeaderSource {
	fn from(request: &http::Request<T>) -> Self {
		request.headers().into()
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use rstest::rstest;

	#[rstest]
	#[case("Accept", Some(Dimension::MediaType))]
	#[case("accept", Some(Dimension::MediaType))]
	#[case("Accept-Charset", Some(Dimension::Charset))]
	#[case("ACCEPT_ENCODING", Some(Dimension::Encoding))]
	#[case("HTTP_ACCEPT_LANGUAGE", Some(Dimension::Language))]
	#[case("http_accept", Some(Dimension::MediaType))]
	#[case("Content-Type", None)]
	#[case("Accept-Datetime", None)]
	fn test_header_name_canonicalization(
		#[case] name: &str,
		#[case] expected: Option<Dimension>,
	) {
		assert_eq!(Dimension::from_header_name(name), expected);
	}

	#[rstest]
	fn test_header_map_conversion_joins_repeats() {
		let mut map = http::HeaderMap::new();
		map.append(http::header::ACCEPT_LANGUAGE, "en".parse().unwrap());
		map.append(http::header::ACCEPT_LANGUAGE, "fr;q=0.5".parse().unwrap());

		let HeaderSource::Raw(raw) = HeaderSource::from(&map) else {
			panic!("expected raw headers");
		};
		assert_eq!(raw["accept-language"], "en,fr;q=0.5");
	}

	#[rstest]
	fn test_parsed_model_passes_through() {
		let mut model = AcceptModel::default();
		model.set(
			Dimension::Charset,
			TokenMap::from([("utf-8".to_string(), AcceptEntry::new(1.0))]),
		);

		let HeaderSource::Parsed(inner) = HeaderSource::from(&model) else {
			panic!("expected parsed model");
		};
		assert_eq!(inner, model);
	}

	#[rstest]
	fn test_empty_model() {
		assert!(AcceptModel::default().is_empty());
	}
}
