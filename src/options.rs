use std::borrow::Cow;

/// The [`Options::depth_limit`] by default, and the one [`diff`](`crate::diff::diff`) uses.
pub const DEFAULT_DEPTH_LIMIT: usize = 1024;

/// Configuration shared by [`construct`](`crate::construct`), [`reconcile`](`crate::reconcile`) and [`render`](`crate::render`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
	/// Maximum nesting depth processed before giving up with a depth limit error.
	pub depth_limit: usize,
	/// The attribute key whose value is applied as style rather than as an attribute.
	pub style_key: Cow<'static, str>,
}

impl Default for Options {
	fn default() -> Self {
		Self {
			depth_limit: DEFAULT_DEPTH_LIMIT,
			style_key: Cow::Borrowed("style"),
		}
	}
}

impl Options {
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	#[must_use]
	pub fn depth_limit(self, depth_limit: usize) -> Self {
		Self { depth_limit, ..self }
	}

	#[must_use]
	pub fn style_key(self, style_key: impl Into<Cow<'static, str>>) -> Self {
		Self {
			style_key: style_key.into(),
			..self
		}
	}
}
