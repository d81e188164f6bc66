/// Configuration options for the parser.
///
/// # Examples
///
/// ```rust
/// use jsonstep::{Parser, ParserOptions};
///
/// let parser = Parser::with_options(
///     (),
///     ParserOptions {
///         allow_multiple_values: false,
///         max_depth: Some(64),
///         ..Default::default()
///     },
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParserOptions {
    /// Whether to allow any Unicode whitespace between JSON values.
    ///
    /// By default, the parser only recognizes the four whitespace characters
    /// defined by the JSON specification: space (U+0020), line feed (U+000A),
    /// carriage return (U+000D), and horizontal tab (U+0009).
    ///
    /// # Default
    ///
    /// `false`
    pub allow_unicode_whitespace: bool,

    /// Whether the input may hold several concatenated top-level values, as
    /// in JSON Lines or `{}{}{}`.
    ///
    /// Whitespace between values is optional. A value ends as soon as it is
    /// complete, so `[1]{}` and `1true` are two documents each, while two
    /// adjacent numbers need whitespace between them (`12` is one number).
    /// Each completed top-level value is reported with
    /// [`EventHandler::on_document_end`](crate::EventHandler::on_document_end).
    /// When `false`, anything but whitespace after the first value is an
    /// error.
    ///
    /// # Default
    ///
    /// `true`
    pub allow_multiple_values: bool,

    /// Maximum number of simultaneously open arrays and maps, enforced by the
    /// parser itself. `None` leaves depth unchecked here; a
    /// [`NestingCounter`](crate::NestingCounter) in the handler chain can
    /// still bound it.
    ///
    /// # Default
    ///
    /// `None`
    pub max_depth: Option<usize>,
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            allow_unicode_whitespace: false,
            allow_multiple_values: true,
            max_depth: None,
        }
    }
}
