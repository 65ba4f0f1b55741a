//! CSS selector parsing.
//! Spec: <https://www.w3.org/TR/selectors-3/#w3cselgrammar>
//!
//! A reference parser that builds selector trees from text on top of `cssparser`. Compound
//! selectors become right-nested `And` chains and complex selectors nest right-to-left, so
//! `ul > li.item` is `Child(ul, And(li, .item))`. Input that is well formed but outside what the
//! tree can express (pseudo-elements, `ns|*`, attribute case flags, a compound on the left of a
//! combinator, a compound inside `:not()`) lowers to `SelectNothing`.

use crate::{
    AttributeOperation, AttributeSelector, Combinator, ComplexSelector, Namespace, ParserOptions,
    Selector, SelectorGroup, SimpleSelector, SourceLocator, TypeSelector,
};
use core::error::Error;
use core::fmt;
use cssparser::{
    BasicParseErrorKind, ParseError, ParseErrorKind, Parser, ParserInput, ToCss as _, Token,
};
use log::debug;

type ParseResult<'src, T> = Result<T, ParseError<'src, SelectorParseErrorKind>>;

/// CSS 2.1 pseudo-elements that may be written with a single colon.
const LEGACY_PSEUDO_ELEMENTS: [&str; 4] = ["before", "after", "first-line", "first-letter"];

/// What went wrong while parsing a selector.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SelectorParseErrorKind {
    /// No selector where one was required (empty input, `a,,b`).
    EmptySelector,
    /// A combinator with nothing after it (`div >`).
    DanglingCombinator,
    /// `.`, `|` or `:` not followed by an identifier.
    ExpectedIdentifier,
    /// An attribute selector with an unknown operator (`[a/=b]`).
    InvalidAttributeOperator,
    /// A token that cannot appear where it was found, serialized.
    UnexpectedToken(String),
    /// The input ended in the middle of a selector.
    UnexpectedEnd,
}

impl fmt::Display for SelectorParseErrorKind {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptySelector => formatter.write_str("empty selector"),
            Self::DanglingCombinator => formatter.write_str("combinator without a right operand"),
            Self::ExpectedIdentifier => formatter.write_str("expected an identifier"),
            Self::InvalidAttributeOperator => formatter.write_str("invalid attribute operator"),
            Self::UnexpectedToken(token) => write!(formatter, "unexpected token `{token}`"),
            Self::UnexpectedEnd => formatter.write_str("unexpected end of input"),
        }
    }
}

/// A selector parse failure with its position.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelectorParseError {
    pub kind: SelectorParseErrorKind,
    pub location: SourceLocator,
}

impl SelectorParseError {
    /// Detach a `cssparser` error from the input it borrows.
    fn from_css(
        error: &ParseError<'_, SelectorParseErrorKind>,
        input: &str,
        options: &ParserOptions,
    ) -> Self {
        let kind = match &error.kind {
            ParseErrorKind::Basic(BasicParseErrorKind::EndOfInput) => {
                SelectorParseErrorKind::UnexpectedEnd
            }
            ParseErrorKind::Basic(BasicParseErrorKind::UnexpectedToken(token)) => {
                SelectorParseErrorKind::UnexpectedToken(token.to_css_string())
            }
            ParseErrorKind::Basic(other) => {
                SelectorParseErrorKind::UnexpectedToken(format!("{other:?}"))
            }
            ParseErrorKind::Custom(kind) => kind.clone(),
        };
        let offset = byte_offset(input, error.location.line as usize, error.location.column);
        let location = SourceLocator::new(
            offset,
            display_line(error.location.line, options),
            error.location.column,
        )
        .with_source(options.source_uri.clone());
        Self { kind, location }
    }
}

impl fmt::Display for SelectorParseError {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}: {}", self.location, self.kind)
    }
}

impl Error for SelectorParseError {}

/// 1-based line number in the enclosing stylesheet of a 0-based line in `input`.
const fn display_line(line: u32, options: &ParserOptions) -> u32 {
    line.saturating_add(options.line_offset).saturating_add(1)
}

/// Byte offset of a 0-based line and 1-based column.
fn byte_offset(input: &str, line_index: usize, column: u32) -> usize {
    let line_start: usize = input
        .split_inclusive('\n')
        .take(line_index)
        .map(str::len)
        .sum();
    line_start
        .saturating_add(column.saturating_sub(1) as usize)
        .min(input.len())
}

/// Parse a selector list from CSS text with default options.
///
/// # Errors
/// Returns a [`SelectorParseError`] if the text is not a selector list.
pub fn parse_selector_group(input: &str) -> Result<SelectorGroup, SelectorParseError> {
    parse_selector_group_with(input, &ParserOptions::default())
}

/// Parse a selector list from CSS text.
///
/// # Errors
/// Returns a [`SelectorParseError`] if the text is not a selector list.
pub fn parse_selector_group_with(
    input: &str,
    options: &ParserOptions,
) -> Result<SelectorGroup, SelectorParseError> {
    let mut parser_input = ParserInput::new(input);
    let mut parser = Parser::new(&mut parser_input);
    let locator = locate(&parser, options);
    let selectors = parser
        .parse_entirely(|group| {
            group.parse_comma_separated(|member| parse_complex_selector(member, options))
        })
        .map_err(|error| SelectorParseError::from_css(&error, input, options))?;
    let Some(group) = SelectorGroup::new(selectors) else {
        return Err(SelectorParseError {
            kind: SelectorParseErrorKind::EmptySelector,
            location: locator,
        });
    };
    Ok(group.located(locator))
}

/// Parse one complex selector (no commas) with default options.
///
/// # Errors
/// Returns a [`SelectorParseError`] if the text is not a single selector.
pub fn parse_selector(input: &str) -> Result<Selector, SelectorParseError> {
    let options = ParserOptions::default();
    let mut parser_input = ParserInput::new(input);
    let mut parser = Parser::new(&mut parser_input);
    parser
        .parse_entirely(|complex| parse_complex_selector(complex, &options))
        .map_err(|error| SelectorParseError::from_css(&error, input, &options))
}

/// Current position as a locator.
fn locate(input: &Parser<'_, '_>, options: &ParserOptions) -> SourceLocator {
    let location = input.current_source_location();
    SourceLocator::new(
        input.position().byte_index(),
        display_line(location.line, options),
        location.column,
    )
    .with_source(options.source_uri.clone())
}

/// A compound selector as written, before lowering.
struct Compound {
    /// Never empty.
    simples: Vec<SimpleSelector>,
    /// Start of the compound.
    locator: SourceLocator,
}

/// Parse one complex selector: compounds separated by combinators.
/// Selectors Level 3 §8
fn parse_complex_selector<'src>(
    input: &mut Parser<'src, '_>,
    options: &ParserOptions,
) -> ParseResult<'src, Selector> {
    input.skip_whitespace();
    let mut compounds = vec![parse_compound(input, options)?];
    let mut combinators = Vec::new();
    while let Some(combinator) = parse_combinator(input)? {
        input.skip_whitespace();
        if input.is_exhausted() {
            return Err(input.new_custom_error(SelectorParseErrorKind::DanglingCombinator));
        }
        combinators.push(combinator);
        compounds.push(parse_compound(input, options)?);
    }
    Ok(lower_complex(compounds, &combinators))
}

/// Parse the combinator after a compound, or `None` at the end of the selector.
fn parse_combinator<'src>(input: &mut Parser<'src, '_>) -> ParseResult<'src, Option<Combinator>> {
    let mut any_whitespace = false;
    loop {
        let state = input.state();
        let Ok(token) = input.next_including_whitespace().cloned() else {
            return Ok(None);
        };
        match token {
            Token::WhiteSpace(_) => any_whitespace = true,
            Token::Delim('>') => return Ok(Some(Combinator::Child)),
            Token::Delim('+') => return Ok(Some(Combinator::AdjacentSibling)),
            Token::Delim('~') => return Ok(Some(Combinator::GeneralSibling)),
            _ => {
                input.reset(&state);
                if any_whitespace {
                    return Ok(Some(Combinator::Descendant));
                }
                return Err(input.new_error_for_next_token());
            }
        }
    }
}

/// Parse a sequence of simple selectors with nothing between them.
/// Selectors Level 3 §4
fn parse_compound<'src>(
    input: &mut Parser<'src, '_>,
    options: &ParserOptions,
) -> ParseResult<'src, Compound> {
    let locator = locate(input, options);
    let mut simples = Vec::new();
    while let Some(simple) = parse_simple(input, options)? {
        simples.push(simple);
    }
    if simples.is_empty() {
        if input.is_exhausted() {
            return Err(input.new_custom_error(SelectorParseErrorKind::EmptySelector));
        }
        return Err(input.new_error_for_next_token());
    }
    Ok(Compound { simples, locator })
}

/// Parse one simple selector, or `None` (input untouched) if the next token does not start one.
fn parse_simple<'src>(
    input: &mut Parser<'src, '_>,
    options: &ParserOptions,
) -> ParseResult<'src, Option<SimpleSelector>> {
    let state = input.state();
    let Ok(token) = input.next_including_whitespace().cloned() else {
        return Ok(None);
    };
    let simple = match token {
        Token::Ident(_) | Token::Delim('*' | '|') => {
            input.reset(&state);
            parse_type_or_universal(input, options)?
        }
        Token::IDHash(id) => SimpleSelector::Id(owned(&id)),
        Token::Delim('.') => SimpleSelector::Class(expect_local_name(input)?),
        Token::SquareBracketBlock => input.parse_nested_block(parse_attribute)?,
        Token::Colon => parse_pseudo(input, options)?,
        _ => {
            input.reset(&state);
            return Ok(None);
        }
    };
    Ok(Some(simple))
}

/// `name`, `*`, `ns|name`, `*|name`, `|name`, `*|*`.
/// Selectors Level 3 §6.1, §6.2
fn parse_type_or_universal<'src>(
    input: &mut Parser<'src, '_>,
    options: &ParserOptions,
) -> ParseResult<'src, SimpleSelector> {
    let location = input.current_source_location();
    let token = input.next_including_whitespace()?.clone();
    match token {
        Token::Ident(name) => {
            if input.try_parse(expect_bar).is_ok() {
                parse_explicit_local_name(input, Namespace::Named(owned(&name)))
            } else {
                Ok(SimpleSelector::Type(TypeSelector::with_namespace(
                    options.default_namespace.clone(),
                    owned(&name),
                )))
            }
        }
        Token::Delim('*') => {
            if input.try_parse(expect_bar).is_ok() {
                parse_explicit_local_name(input, Namespace::Any)
            } else {
                Ok(SimpleSelector::Universal)
            }
        }
        Token::Delim('|') => parse_explicit_local_name(input, Namespace::None),
        other => Err(location.new_unexpected_token_error(other)),
    }
}

/// The local name after `ns|`.
fn parse_explicit_local_name<'src>(
    input: &mut Parser<'src, '_>,
    namespace: Namespace,
) -> ParseResult<'src, SimpleSelector> {
    let location = input.current_source_location();
    let token = input.next_including_whitespace()?.clone();
    match token {
        Token::Ident(name) => Ok(SimpleSelector::Type(TypeSelector::with_namespace(
            namespace,
            owned(&name),
        ))),
        Token::Delim('*') if namespace == Namespace::Any => Ok(SimpleSelector::Universal),
        Token::Delim('*') => {
            debug!("namespaced universal selector {namespace:?}|* is unsupported; never matches");
            Ok(SimpleSelector::SelectNothing)
        }
        other => Err(location.new_unexpected_token_error(other)),
    }
}

fn expect_bar<'src>(input: &mut Parser<'src, '_>) -> ParseResult<'src, ()> {
    let location = input.current_source_location();
    let token = input.next_including_whitespace()?.clone();
    match token {
        Token::Delim('|') => Ok(()),
        other => Err(location.new_unexpected_token_error(other)),
    }
}

/// An identifier immediately following the previous token.
fn expect_local_name<'src>(input: &mut Parser<'src, '_>) -> ParseResult<'src, String> {
    let location = input.current_source_location();
    match input.next_including_whitespace().cloned() {
        Ok(Token::Ident(name)) => Ok(owned(&name)),
        Ok(_) | Err(_) => Err(location.new_custom_error(SelectorParseErrorKind::ExpectedIdentifier)),
    }
}

/// The contents of `[...]`.
/// Selectors Level 3 §6.3
fn parse_attribute<'src>(input: &mut Parser<'src, '_>) -> ParseResult<'src, SimpleSelector> {
    input.skip_whitespace();
    let (namespace, name) = parse_attribute_name(input)?;
    let location = input.current_source_location();
    let Ok(operator) = input.next().cloned() else {
        return Ok(SimpleSelector::Attribute(AttributeSelector {
            namespace,
            name,
            operation: AttributeOperation::Exists,
        }));
    };
    let operation: fn(String) -> AttributeOperation = match operator {
        Token::Delim('=') => AttributeOperation::Equals,
        Token::IncludeMatch => AttributeOperation::Includes,
        Token::DashMatch => AttributeOperation::DashMatch,
        Token::PrefixMatch => AttributeOperation::Prefix,
        Token::SubstringMatch => AttributeOperation::Substring,
        Token::SuffixMatch => AttributeOperation::Suffix,
        _ => {
            return Err(location.new_custom_error(SelectorParseErrorKind::InvalidAttributeOperator));
        }
    };
    let value = owned(input.expect_ident_or_string()?);
    let has_flags = input
        .try_parse(|flags| flags.expect_ident().map(|_| ()))
        .is_ok();
    input.expect_exhausted()?;
    if has_flags {
        debug!("attribute selector [{name}] with case flags is unsupported; never matches");
        return Ok(SimpleSelector::SelectNothing);
    }
    Ok(SimpleSelector::Attribute(AttributeSelector {
        namespace,
        name,
        operation: operation(value),
    }))
}

/// `name`, `ns|name`, `*|name`, `|name` inside `[...]`. Without a prefix there is no namespace.
fn parse_attribute_name<'src>(input: &mut Parser<'src, '_>) -> ParseResult<'src, (Namespace, String)> {
    let location = input.current_source_location();
    let token = input.next_including_whitespace()?.clone();
    match token {
        Token::Ident(name) => {
            if input.try_parse(expect_bar).is_ok() {
                Ok((Namespace::Named(owned(&name)), expect_local_name(input)?))
            } else {
                Ok((Namespace::None, owned(&name)))
            }
        }
        Token::Delim('*') => {
            expect_bar(input)?;
            Ok((Namespace::Any, expect_local_name(input)?))
        }
        Token::Delim('|') => Ok((Namespace::None, expect_local_name(input)?)),
        other => Err(location.new_unexpected_token_error(other)),
    }
}

/// Everything after a `:`.
/// Selectors Level 3 §6.6, §7
fn parse_pseudo<'src>(
    input: &mut Parser<'src, '_>,
    options: &ParserOptions,
) -> ParseResult<'src, SimpleSelector> {
    let location = input.current_source_location();
    let token = input.next_including_whitespace()?.clone();
    match token {
        Token::Ident(name) => {
            let lowered = name.to_ascii_lowercase();
            if LEGACY_PSEUDO_ELEMENTS.contains(&lowered.as_str()) {
                debug!("pseudo-element :{lowered} is unsupported; never matches");
                return Ok(SimpleSelector::SelectNothing);
            }
            Ok(SimpleSelector::PseudoClass(lowered))
        }
        Token::Function(name) if name.eq_ignore_ascii_case("not") => {
            input.parse_nested_block(|inner| parse_negation(inner, options))
        }
        Token::Function(name) => {
            let arguments = input.parse_nested_block(raw_arguments)?;
            Ok(SimpleSelector::FunctionPseudoClass {
                name: name.to_ascii_lowercase(),
                arguments,
            })
        }
        Token::Colon => {
            let element_location = input.current_source_location();
            let element = input.next_including_whitespace()?.clone();
            match element {
                Token::Ident(name) => {
                    debug!("pseudo-element ::{name} is unsupported; never matches");
                }
                Token::Function(name) => {
                    input.parse_nested_block(raw_arguments)?;
                    debug!("pseudo-element ::{name}() is unsupported; never matches");
                }
                other => return Err(element_location.new_unexpected_token_error(other)),
            }
            Ok(SimpleSelector::SelectNothing)
        }
        other => Err(location.new_unexpected_token_error(other)),
    }
}

/// The contents of `:not(...)`: exactly one simple selector.
/// Selectors Level 3 §6.6.7
fn parse_negation<'src>(
    input: &mut Parser<'src, '_>,
    options: &ParserOptions,
) -> ParseResult<'src, SimpleSelector> {
    input.skip_whitespace();
    let compound = parse_compound(input, options)?;
    input.skip_whitespace();
    input.expect_exhausted()?;
    let Ok([inner]) = <[SimpleSelector; 1]>::try_from(compound.simples) else {
        debug!(
            "compound selector inside :not() at {} is unsupported; never matches",
            compound.locator
        );
        return Ok(SimpleSelector::SelectNothing);
    };
    if inner == SimpleSelector::SelectNothing {
        debug!(
            "unsupported argument to :not() at {}; never matches",
            compound.locator
        );
        return Ok(SimpleSelector::SelectNothing);
    }
    Ok(SimpleSelector::Negation(Box::new(inner)))
}

/// Functional pseudo-class arguments, kept as written.
fn raw_arguments<'src>(input: &mut Parser<'src, '_>) -> ParseResult<'src, String> {
    let start = input.position();
    while input.next_including_whitespace_and_comments().is_ok() {}
    Ok(input.slice_from(start).trim().to_owned())
}

/// `s1 s2 ... sn` becomes `And(s1, And(s2, ... sn))`.
fn lower_compound(compound: Compound) -> Selector {
    let Compound { simples, locator } = compound;
    let mut reversed = simples.into_iter().rev();
    let Some(subject) = reversed.next() else {
        return Selector::Simple(SimpleSelector::SelectNothing);
    };
    reversed.fold(Selector::Simple(subject), |second, first| {
        Selector::Complex(
            ComplexSelector::new(Combinator::And, first, second).located(locator.clone()),
        )
    })
}

/// `c0 op0 c1 op1 c2` becomes `op0(c0, op1(c1, c2))`. Every compound left of a combinator must
/// be a single simple selector.
fn lower_complex(compounds: Vec<Compound>, combinators: &[Combinator]) -> Selector {
    let mut reversed = compounds.into_iter().rev();
    let Some(subject) = reversed.next() else {
        return Selector::Simple(SimpleSelector::SelectNothing);
    };
    let mut selector = lower_compound(subject);
    for (compound, &combinator) in reversed.zip(combinators.iter().rev()) {
        let Compound { simples, locator } = compound;
        let Ok([first]) = <[SimpleSelector; 1]>::try_from(simples) else {
            debug!("compound selector left of {combinator:?} at {locator} is unsupported; never matches");
            return Selector::Simple(SimpleSelector::SelectNothing);
        };
        selector = Selector::Complex(
            ComplexSelector::new(combinator, first, selector).located(locator),
        );
    }
    selector
}

#[inline]
fn owned(value: &str) -> String {
    value.to_owned()
}
