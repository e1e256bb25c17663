//! SRPath: slash-separated addresses into a content tree
//!
//! Grammar:
//!
//! ```text
//! path      = [ "/" ] [ component *( "/" component ) ]
//! component = filter [ index ] | index
//! filter    = "*" | quoted | name
//! quoted    = '"' *( char | "\\" ( '"' | "\\" ) ) '"'
//! index     = "[" digits "]"
//! ```
//!
//! A name matches a concept meaning (case-insensitive), a concept code
//! value, or a value type name such as `NUM` or `CONTAINER`. A component
//! without a filter indexes the direct children.

use crate::PathError;
use octofhir_sr_model::ContentItem;
use std::fmt;
use std::str::FromStr;
use winnow::ascii::{digit1, space0};
use winnow::combinator::{alt, cut_err, delimited, opt, preceded, repeat, separated};
use winnow::error::{StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::stream::Offset;
use winnow::token::take_till;

const RESERVED: [char; 5] = ['/', '[', ']', '"', '*'];

/// Component filter
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Filter {
    /// `*`, or no filter at all
    Any,
    /// Concept meaning, concept code value or value type name
    Name(String),
}

impl Filter {
    /// Check if a content item passes the filter
    pub fn matches(&self, item: &ContentItem) -> bool {
        match self {
            Filter::Any => true,
            Filter::Name(name) => {
                item.value_type().as_str() == name
                    || item
                        .concept_name
                        .as_ref()
                        .is_some_and(|c| c.value() == name || c.meaning.eq_ignore_ascii_case(name))
            }
        }
    }
}

/// One level of a path
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathComponent {
    pub filter: Filter,
    pub index: Option<usize>,
}

impl PathComponent {
    /// Component matching any child
    pub fn any() -> Self {
        Self {
            filter: Filter::Any,
            index: None,
        }
    }

    /// Component matching children by name
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            filter: Filter::Name(name.into()),
            index: None,
        }
    }

    pub fn with_index(mut self, index: usize) -> Self {
        self.index = Some(index);
        self
    }

    /// Children passing the filter, in document order, with their 0-based child index
    pub fn select<'s, 'c>(
        &'s self,
        children: &'c [ContentItem],
    ) -> impl Iterator<Item = (usize, &'c ContentItem)> + use<'s, 'c> {
        children
            .iter()
            .enumerate()
            .filter(move |(_, child)| self.filter.matches(child))
    }
}

/// A parsed SRPath
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SrPath {
    components: Vec<PathComponent>,
}

impl SrPath {
    /// The path addressing the root item
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse path text
    pub fn parse(text: &str) -> Result<Self, PathError> {
        let raw = path.parse(text).map_err(|e| {
            let message = e.inner().to_string();
            PathError::Syntax {
                offset: e.offset(),
                message: if message.is_empty() {
                    "unexpected input".to_string()
                } else {
                    message.replace('\n', "; ")
                },
            }
        })?;

        let components = raw
            .into_iter()
            .map(|component| {
                let index = component
                    .index
                    .map(|digits| {
                        digits.parse::<usize>().map_err(|_| PathError::InvalidIndex {
                            offset: digits.offset_from(&text),
                            text: digits.to_string(),
                        })
                    })
                    .transpose()?;
                Ok(PathComponent {
                    filter: component.filter,
                    index,
                })
            })
            .collect::<Result<Vec<_>, PathError>>()?;
        Ok(Self { components })
    }

    pub fn components(&self) -> &[PathComponent] {
        &self.components
    }

    pub fn is_root(&self) -> bool {
        self.components.is_empty()
    }

    /// Append a component
    pub fn join(mut self, component: PathComponent) -> Self {
        self.components.push(component);
        self
    }
}

impl FromStr for SrPath {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SrPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.components.is_empty() {
            return f.write_str("/");
        }
        for component in &self.components {
            write!(f, "/{}", component)?;
        }
        Ok(())
    }
}

impl fmt::Display for PathComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.filter {
            Filter::Any => f.write_str("*")?,
            Filter::Name(name) if needs_quotes(name) => {
                write!(f, "\"{}\"", name.replace('\\', "\\\\").replace('"', "\\\""))?;
            }
            Filter::Name(name) => f.write_str(name)?,
        }
        if let Some(index) = self.index {
            write!(f, "[{}]", index)?;
        }
        Ok(())
    }
}

fn needs_quotes(name: &str) -> bool {
    name.is_empty() || name.trim() != name || name.contains(RESERVED)
}

// === Grammar ===

struct RawComponent<'a> {
    filter: Filter,
    index: Option<&'a str>,
}

fn path<'a>(input: &mut &'a str) -> ModalResult<Vec<RawComponent<'a>>> {
    opt('/').parse_next(input)?;
    if input.is_empty() {
        return Ok(Vec::new());
    }
    separated(1.., component, '/').parse_next(input)
}

fn component<'a>(input: &mut &'a str) -> ModalResult<RawComponent<'a>> {
    alt((
        (filter, opt(index)).map(|(filter, index)| RawComponent { filter, index }),
        index.map(|index| RawComponent {
            filter: Filter::Any,
            index: Some(index),
        }),
    ))
    .context(StrContext::Label("path component"))
    .parse_next(input)
}

fn filter(input: &mut &str) -> ModalResult<Filter> {
    alt((
        '*'.value(Filter::Any),
        quoted.map(Filter::Name),
        take_till(1.., RESERVED)
            .verify(|name: &str| !name.trim().is_empty())
            .map(|name: &str| Filter::Name(name.trim().to_string())),
    ))
    .parse_next(input)
}

fn quoted(input: &mut &str) -> ModalResult<String> {
    let part = alt((
        take_till(1.., ['"', '\\']),
        preceded(
            '\\',
            cut_err(alt(("\"", "\\")))
                .context(StrContext::Expected(StrContextValue::Description("escaped quote or backslash"))),
        ),
    ));
    delimited(
        '"',
        repeat(0.., part).fold(String::new, |mut name, piece: &str| {
            name.push_str(piece);
            name
        }),
        cut_err('"').context(StrContext::Expected(StrContextValue::CharLiteral('"'))),
    )
    .parse_next(input)
}

fn index<'a>(input: &mut &'a str) -> ModalResult<&'a str> {
    delimited(
        '[',
        cut_err(delimited(space0, digit1, space0)).context(StrContext::Expected(StrContextValue::Description("index"))),
        cut_err(']').context(StrContext::Expected(StrContextValue::CharLiteral(']'))),
    )
    .parse_next(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("", "/")]
    #[case("/", "/")]
    #[case("Findings", "/Findings")]
    #[case("/Findings/Finding[1]", "/Findings/Finding[1]")]
    #[case("/ Findings /NUM", "/Findings/NUM")]
    #[case("/[2]/*", "/*[2]/*")]
    #[case("/\"Size/Volume\"[0]", "/\"Size/Volume\"[0]")]
    #[case("/Finding[ 3 ]", "/Finding[3]")]
    fn test_canonical_display(#[case] text: &str, #[case] canonical: &str) {
        let path = SrPath::parse(text).unwrap();
        assert_eq!(path.to_string(), canonical);
        assert_eq!(SrPath::parse(canonical).unwrap(), path);
    }

    #[rstest]
    #[case("/Finding[", 9)]
    #[case("/Finding[x]", 9)]
    #[case("/Finding[1", 10)]
    #[case("/\"open", 6)]
    fn test_syntax_errors(#[case] text: &str, #[case] offset: usize) {
        let err = SrPath::parse(text).unwrap_err();
        assert!(matches!(err, PathError::Syntax { .. }), "{:?}", err);
        assert_eq!(err.offset(), offset);
    }

    #[test]
    fn test_quotes_and_backslashes_are_escaped() {
        let path = SrPath::root().join(PathComponent::named(r#"Size "L" \ W"#).with_index(1));
        assert_eq!(path.to_string(), r#"/"Size \"L\" \\ W"[1]"#);
        assert_eq!(SrPath::parse(&path.to_string()).unwrap(), path);
    }

    #[test]
    fn test_unknown_escape_is_rejected() {
        let err = SrPath::parse(r#"/"a\x""#).unwrap_err();
        assert!(matches!(err, PathError::Syntax { .. }), "{:?}", err);
        assert_eq!(err.offset(), 4);
    }

    #[test]
    fn test_empty_component_is_rejected() {
        let err = SrPath::parse("/A//B").unwrap_err();
        assert_eq!(err.code().to_string(), "SR0300");
    }

    #[test]
    fn test_index_overflow() {
        let err = SrPath::parse("/A[99999999999999999999999]").unwrap_err();
        assert_eq!(
            err,
            PathError::InvalidIndex {
                offset: 3,
                text: "99999999999999999999999".to_string()
            }
        );
    }

    #[test]
    fn test_builder() {
        let path = SrPath::root()
            .join(PathComponent::named("Imaging Measurements"))
            .join(PathComponent::any().with_index(2));
        insta::assert_snapshot!(path.to_string(), @"/Imaging Measurements/*[2]");
    }
}
