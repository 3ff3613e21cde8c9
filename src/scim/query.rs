//! SCIM request query parsing: pagination plus the constrained filter
//! grammar.
//!
//! The filter grammar is deliberately tiny. A filter is exactly one
//! comparison of the shape
//!
//! ```text
//! attribute op "value"
//! ```
//!
//! where `attribute` is one or more ASCII letters, `op` is exactly two ASCII
//! letters, and `value` is one or more non-whitespace, non-quote characters
//! inside double quotes. Anything that does not match this shape (logical
//! connectives, unquoted values, spaces inside the value) yields no filter
//! at all rather than a parse error; identity providers routinely send
//! filters the service does not support, and a list without the filter is
//! the compatible answer. Pagination parameters are parsed with the same
//! leniency: a missing or unparseable `startIndex` or `count` falls back to
//! its default instead of failing the request.

use serde::Deserialize;

/// Default 1-based index for the first page.
const DEFAULT_START_INDEX: usize = 1;

/// Default page size.
const DEFAULT_COUNT: usize = 100;

/// A parsed filter comparison.
///
/// `attribute` and `operation` preserve the case the caller sent. The
/// operation token is captured but deliberately not interpreted: the only
/// downstream consumer applies exact email equality whatever the token says.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AttributeFilter {
    /// Attribute name, e.g. `email`.
    pub attribute: String,
    /// Two-letter comparison token, e.g. `eq`.
    pub operation: String,
    /// Unquoted comparison value.
    pub value: String,
}

/// Structured pagination and filter parameters for one list request.
///
/// # Examples
///
/// ```
/// use scim_provision::scim::query::ScimQuery;
///
/// let query = ScimQuery::from_params(Some("email eq \"a@b.com\""), Some("11"), None);
/// assert_eq!(query.start_index, 11);
/// assert_eq!(query.count, 100);
/// assert_eq!(query.filter.unwrap().value, "a@b.com");
///
/// let lenient = ScimQuery::from_params(Some("not a scim filter"), Some("abc"), Some("-4"));
/// assert_eq!(lenient.start_index, 1);
/// assert_eq!(lenient.count, 100);
/// assert!(lenient.filter.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScimQuery {
    /// 1-based index of the first record to return.
    pub start_index: usize,
    /// Maximum number of records to return.
    pub count: usize,
    /// Parsed filter, when the raw filter matched the supported shape.
    pub filter: Option<AttributeFilter>,
}

impl Default for ScimQuery {
    fn default() -> Self {
        Self {
            start_index: DEFAULT_START_INDEX,
            count: DEFAULT_COUNT,
            filter: None,
        }
    }
}

impl ScimQuery {
    /// Build a query from raw request parameters, applying defaults for
    /// anything absent or unparseable.
    pub fn from_params(
        filter: Option<&str>,
        start_index: Option<&str>,
        count: Option<&str>,
    ) -> Self {
        Self {
            start_index: parse_or_default(start_index, DEFAULT_START_INDEX),
            count: parse_or_default(count, DEFAULT_COUNT),
            filter: filter.and_then(parse_filter),
        }
    }

    /// Number of records to skip, clamped so `startIndex=0` behaves like 1.
    pub fn skip(&self) -> usize {
        self.start_index.saturating_sub(1)
    }
}

/// Raw list-endpoint query parameters as they arrive on the wire.
///
/// Both numeric parameters are carried as strings so that a value like
/// `startIndex=abc` reaches the lenient parser instead of being rejected at
/// extraction time.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListParams {
    /// Raw filter expression.
    pub filter: Option<String>,
    /// Raw 1-based start index.
    #[serde(rename = "startIndex")]
    pub start_index: Option<String>,
    /// Raw page size.
    pub count: Option<String>,
}

impl ListParams {
    /// Parse into a [`ScimQuery`], never failing.
    pub fn to_query(&self) -> ScimQuery {
        ScimQuery::from_params(
            self.filter.as_deref(),
            self.start_index.as_deref(),
            self.count.as_deref(),
        )
    }
}

fn parse_or_default(raw: Option<&str>, default: usize) -> usize {
    raw.and_then(|s| s.trim().parse().ok()).unwrap_or(default)
}

/// Parse a raw filter string, returning `None` on any shape mismatch.
pub fn parse_filter(raw: &str) -> Option<AttributeFilter> {
    let mut scanner = Scanner::new(raw.trim());

    let attribute = scanner.take_letters();
    if attribute.is_empty() || !scanner.take_one_whitespace() {
        return None;
    }

    let operation = scanner.take_letters();
    if operation.len() != 2 || !scanner.take_one_whitespace() {
        return None;
    }

    if !scanner.take_char('"') {
        return None;
    }
    let value = scanner.take_value();
    if value.is_empty() || !scanner.take_char('"') || !scanner.at_end() {
        return None;
    }

    Some(AttributeFilter {
        attribute: attribute.to_string(),
        operation: operation.to_string(),
        value: value.to_string(),
    })
}

/// Cursor over the trimmed filter input.
struct Scanner<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Scanner<'a> {
    fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    fn rest(&self) -> &'a str {
        &self.input[self.pos..]
    }

    fn at_end(&self) -> bool {
        self.pos == self.input.len()
    }

    /// Consume a run of ASCII letters, possibly empty.
    fn take_letters(&mut self) -> &'a str {
        let rest = self.rest();
        let end = rest
            .find(|c: char| !c.is_ascii_alphabetic())
            .unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }

    /// Consume exactly one whitespace character.
    fn take_one_whitespace(&mut self) -> bool {
        match self.rest().chars().next() {
            Some(c) if c.is_whitespace() => {
                self.pos += c.len_utf8();
                true
            }
            _ => false,
        }
    }

    fn take_char(&mut self, expected: char) -> bool {
        if self.rest().starts_with(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    /// Consume a run of non-whitespace, non-quote characters, possibly empty.
    fn take_value(&mut self) -> &'a str {
        let rest = self.rest();
        let end = rest
            .find(|c: char| c.is_whitespace() || c == '"')
            .unwrap_or(rest.len());
        self.pos += end;
        &rest[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn filter(attribute: &str, operation: &str, value: &str) -> AttributeFilter {
        AttributeFilter {
            attribute: attribute.to_string(),
            operation: operation.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn parses_simple_comparison() {
        assert_eq!(
            parse_filter("email eq \"a@b.com\""),
            Some(filter("email", "eq", "a@b.com"))
        );
    }

    #[test]
    fn preserves_caller_case() {
        assert_eq!(
            parse_filter("userName EQ \"Bob\""),
            Some(filter("userName", "EQ", "Bob"))
        );
    }

    #[test]
    fn accepts_surrounding_whitespace() {
        assert_eq!(
            parse_filter("  email sw \"a\"  "),
            Some(filter("email", "sw", "a"))
        );
    }

    #[test]
    fn rejects_shape_mismatches() {
        for raw in [
            "",
            "garbage",
            "email eq a@b.com",
            "email eq \"\"",
            "email eq \"a b\"",
            "email  eq \"a\"",
            "email equals \"a\"",
            "email e \"a\"",
            "email eq \"a\" and active eq \"true\"",
            "(email eq \"a\")",
            "email eq \"a",
            "eq \"a\"",
            "email2 eq \"a\"",
        ] {
            assert_eq!(parse_filter(raw), None, "expected no filter for {raw:?}");
        }
    }

    #[test]
    fn pagination_defaults_apply_leniently() {
        let query = ScimQuery::from_params(None, None, None);
        assert_eq!((query.start_index, query.count), (1, 100));

        let query = ScimQuery::from_params(None, Some("abc"), Some("12px"));
        assert_eq!((query.start_index, query.count), (1, 100));

        let query = ScimQuery::from_params(None, Some("0"), Some("25"));
        assert_eq!((query.start_index, query.count), (0, 25));
        assert_eq!(query.skip(), 0);

        let query = ScimQuery::from_params(None, Some(" 7 "), Some("3"));
        assert_eq!(query.skip(), 6);
    }

    #[test]
    fn list_params_round_trip() {
        let params = ListParams {
            filter: Some("email eq \"x@y.z\"".to_string()),
            start_index: Some("2".to_string()),
            count: Some("5".to_string()),
        };
        let query = params.to_query();
        assert_eq!(query.start_index, 2);
        assert_eq!(query.count, 5);
        assert_eq!(query.filter, Some(filter("email", "eq", "x@y.z")));
    }

    proptest! {
        #[test]
        fn well_formed_filters_parse(
            attribute in "[a-zA-Z]{1,16}",
            operation in "[a-zA-Z]{2}",
            value in "[a-zA-Z0-9@._%+-]{1,24}",
        ) {
            let raw = format!("{attribute} {operation} \"{value}\"");
            prop_assert_eq!(
                parse_filter(&raw),
                Some(filter(&attribute, &operation, &value))
            );
        }

        #[test]
        fn arbitrary_input_never_panics(raw in any::<String>()) {
            let _ = parse_filter(&raw);
        }

        #[test]
        fn unquoted_input_never_produces_a_filter(raw in "[a-zA-Z0-9 .@]*") {
            prop_assert_eq!(parse_filter(&raw), None);
        }

        #[test]
        fn numeric_pagination_round_trips(start in 0usize..10_000, count in 0usize..10_000) {
            let query = ScimQuery::from_params(
                None,
                Some(&start.to_string()),
                Some(&count.to_string()),
            );
            prop_assert_eq!(query.start_index, start);
            prop_assert_eq!(query.count, count);
        }

        #[test]
        fn pagination_never_panics(start in any::<String>(), count in any::<String>()) {
            let _ = ScimQuery::from_params(None, Some(&start), Some(&count));
        }
    }
}
