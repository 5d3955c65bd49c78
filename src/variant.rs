//! Candidate representations of a resource

/// One candidate representation offered for a resource
///
/// Replaces the historical positional six-element form (weight, type,
/// encoding, charset, language, size) with an explicit record. Unset fields
/// take the documented defaults: weight 1.0, empty media type, no
/// encoding/charset/language, size 0. The identifying key is not part of the
/// variant; callers carry it alongside as `(key, Variant)` pairs and it
/// round-trips through negotiation unchanged.
///
/// # Examples
///
/// ```
/// use conneg::Variant;
///
/// let variant = Variant::new("text/html")
///     .with_weight(0.5)
///     .with_charset("utf-8")
///     .with_language("en")
///     .with_size(22222);
///
/// assert_eq!(variant.media_type, "text/html");
/// assert_eq!(variant.weight, 0.5);
/// assert_eq!(variant.charset.as_deref(), Some("utf-8"));
/// assert_eq!(variant.encoding, None);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Variant {
	/// The server's own preference for this representation, nominally in
	/// `[0, 1]`
	#[cfg_attr(feature = "serde", serde(default = "default_weight"))]
	pub weight: f64,
	/// Media type token, e.g. `text/html` (`charset=` and other parameters
	/// after `;` are ignored during matching)
	#[cfg_attr(feature = "serde", serde(rename = "type", default))]
	pub media_type: String,
	/// Content coding token, e.g. `gzip`; an unencoded variant declares none
	#[cfg_attr(feature = "serde", serde(default))]
	pub encoding: Option<String>,
	/// Charset token, e.g. `utf-8`
	#[cfg_attr(feature = "serde", serde(default))]
	pub charset: Option<String>,
	/// Language tag, e.g. `en-us`
	#[cfg_attr(feature = "serde", serde(default))]
	pub language: Option<String>,
	/// Size in bytes; smaller wins score ties
	#[cfg_attr(feature = "serde", serde(default))]
	pub size: u64,
}

#[cfg(feature = "serde")]
fn default_weight() -> f64 {
	1.0
}

impl Variant {
	/// Creates a variant of the given media type with default weight 1.0
	///
	/// # Examples
	///
	/// ```
	/// use conneg::Variant;
	///
	/// let variant = Variant::new("application/json");
	/// assert_eq!(variant.weight, 1.0);
	/// assert_eq!(variant.size, 0);
	/// ```
	pub fn new(media_type: impl Into<String>) -> Self {
		Self {
			weight: 1.0,
			media_type: media_type.into(),
			encoding: None,
			charset: None,
			language: None,
			size: 0,
		}
	}

	/// Sets the intrinsic preference weight
	pub fn with_weight(mut self, weight: f64) -> Self {
		self.weight = weight;
		self
	}

	/// Sets the content coding
	pub fn with_encoding(mut self, encoding: impl Into<String>) -> Self {
		self.encoding = Some(encoding.into());
		self
	}

	/// Sets the charset
	pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
		self.charset = Some(charset.into());
		self
	}

	/// Sets the language tag
	pub fn with_language(mut self, language: impl Into<String>) -> Self {
		self.language = Some(language.into());
		self
	}

	/// Sets the size in bytes
	pub fn with_size(mut self, size: u64) -> Self {
		self.size = size;
		self
	}
}

impl Default for Variant {
	fn default() -> Self {
		Self::new("")
	}
}
