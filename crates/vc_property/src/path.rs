//! Provide the property path syntax.
//!
//! A path is a sequence of segments:
//!
//! - Name: `name`, separated from the previous segment by `.`
//! - Key: `[key]`, `['quoted key']` or `["quoted key"]`
//!
//! A key may follow a name directly or start the path. Quoted keys may
//! contain `.`, `[` and `]`.
//!
//! # Examples
//!
//! ```
//! use vc_property::path::{PropertyPath, Segment};
//!
//! let path = PropertyPath::parse("spouse.nicknames[0]").unwrap();
//! assert_eq!(path.len(), 3);
//! assert_eq!(path.segments()[0], Segment::Name("spouse".into()));
//! assert_eq!(path.prefix(2), "spouse.nicknames");
//! assert_eq!(path.to_string(), "spouse.nicknames[0]");
//! ```

use alloc::borrow::Cow;
use alloc::boxed::Box;
use alloc::string::{String, ToString};
use alloc::vec::Vec;
use core::fmt;
use core::str::FromStr;

// -----------------------------------------------------------------------------
// ParseError

/// Path parsing error information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// Byte position in `path`.
    pub offset: usize,
    /// The path that the error occurred in.
    pub path: String,
    /// The underlying error.
    pub error: Cow<'static, str>,
}

impl ParseError {
    fn new(path: &str, offset: usize, error: impl Into<Cow<'static, str>>) -> Self {
        Self {
            offset,
            path: path.to_string(),
            error: error.into(),
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "encountered an error at offset {} while parsing `{}`: {}",
            self.offset, self.path, self.error,
        )
    }
}

impl core::error::Error for ParseError {}

// -----------------------------------------------------------------------------
// Segment

/// A single step of a [`PropertyPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// A named property, e.g. `spouse`.
    Name(String),
    /// A list index or map key, e.g. `[0]` or `['key']`.
    Key {
        /// The key without brackets and quotes.
        key: String,
        /// Whether the key was written in quotes.
        quoted: bool,
    },
}

impl Segment {
    /// Returns the property name for [`Segment::Name`].
    #[inline]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Key { .. } => None,
        }
    }

    /// Returns the key for [`Segment::Key`].
    #[inline]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Self::Key { key, .. } => Some(key),
            Self::Name(_) => None,
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Key { key, quoted: false } => write!(f, "[{key}]"),
            Self::Key { key, quoted: true } => {
                let quote = if key.contains('\'') { '"' } else { '\'' };
                write!(f, "[{quote}{key}{quote}]")
            }
        }
    }
}

// -----------------------------------------------------------------------------
// PropertyPath

/// A parsed, reusable property path.
///
/// Parsing is pure: the same input always yields the same segments.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PropertyPath {
    segments: Box<[Segment]>,
}

impl PropertyPath {
    /// Parses `path` into segments.
    ///
    /// # Examples
    ///
    /// ```
    /// use vc_property::path::PropertyPath;
    ///
    /// assert!(PropertyPath::parse("ratings['a.b']").is_ok());
    /// assert_eq!(PropertyPath::parse("[']").unwrap_err().offset, 1);
    /// assert!(PropertyPath::parse("a..b").is_err());
    /// ```
    pub fn parse(path: &str) -> Result<Self, ParseError> {
        Parser { path, pos: 0 }.parse()
    }

    /// Returns all segments in order.
    #[inline]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Returns the number of segments, always at least one.
    #[inline]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    /// Renders the first `n` segments canonically.
    ///
    /// Used to name the failing property in errors.
    pub fn prefix(&self, n: usize) -> String {
        let mut out = String::new();
        for (index, segment) in self.segments.iter().take(n).enumerate() {
            if index > 0 && matches!(segment, Segment::Name(_)) {
                out.push('.');
            }
            // Writing into a `String` cannot fail.
            let _ = fmt::write(&mut out, format_args!("{segment}"));
        }
        out
    }
}

impl fmt::Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, segment) in self.segments.iter().enumerate() {
            if index > 0 && matches!(segment, Segment::Name(_)) {
                f.write_str(".")?;
            }
            fmt::Display::fmt(segment, f)?;
        }
        Ok(())
    }
}

impl FromStr for PropertyPath {
    type Err = ParseError;

    #[inline]
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

// -----------------------------------------------------------------------------
// Parser

struct Parser<'a> {
    path: &'a str,
    pos: usize,
}

impl Parser<'_> {
    fn error(&self, offset: usize, error: &'static str) -> ParseError {
        ParseError::new(self.path, offset, error)
    }

    #[inline]
    fn peek(&self) -> Option<u8> {
        self.path.as_bytes().get(self.pos).copied()
    }

    fn parse(mut self) -> Result<PropertyPath, ParseError> {
        if self.path.is_empty() {
            return Err(self.error(0, "empty path"));
        }

        let mut segments = Vec::new();

        // A leading key is allowed, a leading `.` is not.
        if self.peek() == Some(b'[') {
            segments.push(self.parse_key()?);
        } else {
            segments.push(self.parse_name()?);
        }

        while let Some(byte) = self.peek() {
            match byte {
                b'.' => {
                    self.pos += 1;
                    segments.push(self.parse_name()?);
                }
                b'[' => segments.push(self.parse_key()?),
                b']' => return Err(self.error(self.pos, "unexpected `]`")),
                _ => return Err(self.error(self.pos, "expected `.` or `[` after `]`")),
            }
        }

        Ok(PropertyPath {
            segments: segments.into_boxed_slice(),
        })
    }

    fn parse_name(&mut self) -> Result<Segment, ParseError> {
        let start = self.pos;
        let rest = &self.path[start..];
        let len = rest.find(['.', '[', ']']).unwrap_or(rest.len());

        if len == 0 {
            return Err(self.error(start, "empty segment"));
        }
        self.pos += len;
        Ok(Segment::Name(rest[..len].to_string()))
    }

    fn parse_key(&mut self) -> Result<Segment, ParseError> {
        let open = self.pos;
        self.pos += 1;

        match self.peek() {
            None => Err(self.error(open, "unclosed bracket")),
            Some(quote @ (b'\'' | b'"')) => self.parse_quoted_key(open, quote as char),
            Some(_) => {
                let rest = &self.path[self.pos..];
                let Some(close) = rest.find(']') else {
                    return Err(self.error(open, "unclosed bracket"));
                };
                if let Some(nested) = rest[..close].find('[') {
                    return Err(self.error(self.pos + nested, "unexpected `[` inside brackets"));
                }
                if close == 0 {
                    return Err(self.error(open, "empty key"));
                }
                let key = rest[..close].to_string();
                self.pos += close + 1;
                Ok(Segment::Key { key, quoted: false })
            }
        }
    }

    fn parse_quoted_key(&mut self, open: usize, quote: char) -> Result<Segment, ParseError> {
        let quote_pos = self.pos;
        let body_start = quote_pos + 1;
        let Some(len) = self.path[body_start..].find(quote) else {
            return Err(self.error(quote_pos, "unterminated quote"));
        };
        let close_quote = body_start + len;
        if len == 0 {
            return Err(self.error(open, "empty key"));
        }

        self.pos = close_quote + 1;
        match self.peek() {
            Some(b']') => {
                self.pos += 1;
                Ok(Segment::Key {
                    key: self.path[body_start..close_quote].to_string(),
                    quoted: true,
                })
            }
            None => Err(self.error(open, "unclosed bracket")),
            Some(_) => Err(self.error(self.pos, "unexpected text after closing quote")),
        }
    }
}

// -----------------------------------------------------------------------------
// AccessPath

/// Anything that can be used as a property path.
///
/// Implemented for `&str`, `&String`, `String`, [`PropertyPath`] and
/// `&PropertyPath`. Parsed paths are borrowed, strings are parsed per call.
pub trait AccessPath {
    /// Returns the parsed form of this path.
    fn parse_path(&self) -> Result<Cow<'_, PropertyPath>, ParseError>;
}

impl AccessPath for &str {
    #[inline]
    fn parse_path(&self) -> Result<Cow<'_, PropertyPath>, ParseError> {
        PropertyPath::parse(self).map(Cow::Owned)
    }
}

impl AccessPath for &String {
    #[inline]
    fn parse_path(&self) -> Result<Cow<'_, PropertyPath>, ParseError> {
        PropertyPath::parse(self).map(Cow::Owned)
    }
}

impl AccessPath for String {
    #[inline]
    fn parse_path(&self) -> Result<Cow<'_, PropertyPath>, ParseError> {
        PropertyPath::parse(self).map(Cow::Owned)
    }
}

impl AccessPath for PropertyPath {
    #[inline]
    fn parse_path(&self) -> Result<Cow<'_, PropertyPath>, ParseError> {
        Ok(Cow::Borrowed(self))
    }
}

impl AccessPath for &PropertyPath {
    #[inline]
    fn parse_path(&self) -> Result<Cow<'_, PropertyPath>, ParseError> {
        Ok(Cow::Borrowed(*self))
    }
}

// -----------------------------------------------------------------------------
// Tests

#[cfg(test)]
mod tests {
    use alloc::string::ToString;

    use super::{PropertyPath, Segment};

    fn key(key: &str, quoted: bool) -> Segment {
        Segment::Key {
            key: key.into(),
            quoted,
        }
    }

    #[test]
    fn nested_names() {
        let path = PropertyPath::parse("spouse.spouse.name").unwrap();
        assert_eq!(path.len(), 3);
        assert_eq!(path.segments()[2], Segment::Name("name".into()));
        assert_eq!(path.prefix(1), "spouse");
    }

    #[test]
    fn keys_and_quotes() {
        let path = PropertyPath::parse("ratings['a.b[c]'][0].name").unwrap();
        assert_eq!(
            path.segments(),
            &[
                Segment::Name("ratings".into()),
                key("a.b[c]", true),
                key("0", false),
                Segment::Name("name".into()),
            ]
        );
        assert_eq!(path.to_string(), "ratings['a.b[c]'][0].name");
        assert_eq!(path.prefix(2), "ratings['a.b[c]']");

        let path = PropertyPath::parse("[\"it's\"]").unwrap();
        assert_eq!(path.segments(), &[key("it's", true)]);
        assert_eq!(path.to_string(), "[\"it's\"]");
    }

    #[test]
    fn leading_key() {
        let path: PropertyPath = "[3].name".parse().unwrap();
        assert_eq!(path.segments()[0], key("3", false));
        assert_eq!(path.prefix(2), "[3].name");
    }

    #[test]
    fn malformed_paths() {
        let cases = [
            ("", 0, "empty path"),
            ("a..b", 2, "empty segment"),
            ("a.", 2, "empty segment"),
            (".a", 0, "empty segment"),
            ("['", 1, "unterminated quote"),
            ("[']", 1, "unterminated quote"),
            ("a[0", 1, "unclosed bracket"),
            ("a[", 1, "unclosed bracket"),
            ("a[]", 1, "empty key"),
            ("a['x'y]", 5, "unexpected text after closing quote"),
            ("a]", 1, "unexpected `]`"),
            ("a[0]b", 4, "expected `.` or `[` after `]`"),
            ("a[[0]", 2, "unexpected `[` inside brackets"),
            ("a.[0]", 2, "empty segment"),
        ];

        for (input, offset, message) in cases {
            let err = PropertyPath::parse(input).unwrap_err();
            assert_eq!(err.offset, offset, "offset for {input:?}");
            assert_eq!(err.error, message, "message for {input:?}");
            assert_eq!(err.path, input);
        }
    }

    #[test]
    fn parsing_is_deterministic() {
        let a = PropertyPath::parse("list[1].map['k']").unwrap();
        let b = PropertyPath::parse("list[1].map['k']").unwrap();
        assert_eq!(a, b);
    }
}
