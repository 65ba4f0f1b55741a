//! Token production and serialization.
//!
//! Every node re-emits itself as a flat `cssparser::Token` stream. Joining the serialized tokens
//! (with [`serialize_tokens`]) and parsing the text again yields a selector that matches the same
//! elements.

use crate::{
    AttributeOperation, AttributeSelector, Combinator, ComplexSelector, Namespace, Selector,
    SelectorGroup, SimpleSelector, TypeSelector,
};
use core::fmt;
use cssparser::{Parser, ParserInput, ToCss, Token, TokenSerializationType};

/// Write `tokens` as CSS text, inserting an empty comment wherever two adjacent tokens would
/// otherwise run together (`.a` followed by `div` must not become `.adiv`).
///
/// # Errors
/// Propagates errors from `dest`.
pub fn serialize_tokens<W: fmt::Write>(tokens: &[Token<'_>], dest: &mut W) -> fmt::Result {
    let mut previous = TokenSerializationType::nothing();
    for token in tokens {
        let current = token.serialization_type();
        if previous.needs_separator_when_before(current) {
            dest.write_str("/**/")?;
        }
        token.to_css(dest)?;
        previous = current;
    }
    Ok(())
}

/// Re-tokenize raw CSS text, flattening nested blocks into open/close token pairs.
fn flatten_tokens<'sel, F: FnMut(Token<'sel>)>(parser: &mut Parser<'sel, '_>, consumer: &mut F) {
    while let Ok(token) = parser.next_including_whitespace_and_comments().cloned() {
        let closing = match token {
            Token::Function(_) | Token::ParenthesisBlock => Some(Token::CloseParenthesis),
            Token::SquareBracketBlock => Some(Token::CloseSquareBracket),
            Token::CurlyBracketBlock => Some(Token::CloseCurlyBracket),
            _ => None,
        };
        consumer(token);
        if let Some(close) = closing {
            let nested: Result<(), cssparser::ParseError<'sel, ()>> =
                parser.parse_nested_block(|nested| {
                    flatten_tokens(nested, consumer);
                    Ok(())
                });
            if nested.is_err() {
                break;
            }
            consumer(close);
        }
    }
}

/// `prefix|`, `|` or nothing.
fn produce_namespace_prefix<'sel, F: FnMut(Token<'sel>)>(
    namespace: &'sel Namespace,
    implicit: &Namespace,
    consumer: &mut F,
) {
    if namespace == implicit {
        return;
    }
    match namespace {
        Namespace::Any => consumer(Token::Delim('*')),
        Namespace::None => {}
        Namespace::Named(prefix) => consumer(Token::Ident(prefix.as_str().into())),
    }
    consumer(Token::Delim('|'));
}

impl TypeSelector {
    /// Unprefixed type selectors are in any namespace, so `Any` emits no prefix.
    pub fn produce_tokens<'sel, F: FnMut(Token<'sel>)>(&'sel self, consumer: &mut F) {
        produce_namespace_prefix(&self.namespace, &Namespace::Any, consumer);
        consumer(Token::Ident(self.name.as_str().into()));
    }
}

impl AttributeSelector {
    /// Unprefixed attribute names have no namespace, so `None` emits no prefix.
    pub fn produce_tokens<'sel, F: FnMut(Token<'sel>)>(&'sel self, consumer: &mut F) {
        consumer(Token::SquareBracketBlock);
        produce_namespace_prefix(&self.namespace, &Namespace::None, consumer);
        consumer(Token::Ident(self.name.as_str().into()));
        let operator = match &self.operation {
            AttributeOperation::Exists => None,
            AttributeOperation::Equals(_) => Some(Token::Delim('=')),
            AttributeOperation::Includes(_) => Some(Token::IncludeMatch),
            AttributeOperation::DashMatch(_) => Some(Token::DashMatch),
            AttributeOperation::Prefix(_) => Some(Token::PrefixMatch),
            AttributeOperation::Substring(_) => Some(Token::SubstringMatch),
            AttributeOperation::Suffix(_) => Some(Token::SuffixMatch),
        };
        if let (Some(operator), Some(operand)) = (operator, self.operation.operand()) {
            consumer(operator);
            consumer(Token::QuotedString(operand.into()));
        }
        consumer(Token::CloseSquareBracket);
    }
}

impl SimpleSelector {
    pub fn produce_tokens<'sel, F: FnMut(Token<'sel>)>(&'sel self, consumer: &mut F) {
        match self {
            Self::Universal => consumer(Token::Delim('*')),
            Self::Type(type_selector) => type_selector.produce_tokens(consumer),
            Self::Id(id) => consumer(Token::IDHash(id.as_str().into())),
            Self::Class(class) => {
                consumer(Token::Delim('.'));
                consumer(Token::Ident(class.as_str().into()));
            }
            Self::PseudoClass(name) => {
                consumer(Token::Colon);
                consumer(Token::Ident(name.as_str().into()));
            }
            Self::FunctionPseudoClass { name, arguments } => {
                consumer(Token::Colon);
                consumer(Token::Function(name.as_str().into()));
                let mut input = ParserInput::new(arguments);
                flatten_tokens(&mut Parser::new(&mut input), consumer);
                consumer(Token::CloseParenthesis);
            }
            Self::Negation(inner) => {
                consumer(Token::Colon);
                consumer(Token::Function("not".into()));
                inner.produce_tokens(consumer);
                consumer(Token::CloseParenthesis);
            }
            Self::Attribute(attribute) => attribute.produce_tokens(consumer),
            // `:not(*)` reads back as something that never matches and weighs nothing.
            Self::SelectNothing => {
                consumer(Token::Colon);
                consumer(Token::Function("not".into()));
                consumer(Token::Delim('*'));
                consumer(Token::CloseParenthesis);
            }
        }
    }
}

impl ComplexSelector {
    pub fn produce_tokens<'sel, F: FnMut(Token<'sel>)>(&'sel self, consumer: &mut F) {
        self.first.produce_tokens(consumer);
        match self.combinator {
            Combinator::And => {}
            Combinator::Descendant => consumer(Token::WhiteSpace(" ")),
            Combinator::Child => consumer(Token::Delim('>')),
            Combinator::AdjacentSibling => consumer(Token::Delim('+')),
            Combinator::GeneralSibling => consumer(Token::Delim('~')),
        }
        self.second.produce_tokens(consumer);
    }
}

impl Selector {
    pub fn produce_tokens<'sel, F: FnMut(Token<'sel>)>(&'sel self, consumer: &mut F) {
        match self {
            Self::Simple(simple) => simple.produce_tokens(consumer),
            Self::Complex(complex) => complex.produce_tokens(consumer),
        }
    }

    /// Collect [`Selector::produce_tokens`] into a vector.
    pub fn tokens(&self) -> Vec<Token<'_>> {
        let mut tokens = Vec::new();
        self.produce_tokens(&mut |token| tokens.push(token));
        tokens
    }
}

impl SelectorGroup {
    /// Members separated by `, `.
    pub fn produce_tokens<'sel, F: FnMut(Token<'sel>)>(&'sel self, consumer: &mut F) {
        for (index, selector) in self.selectors().iter().enumerate() {
            if index > 0 {
                consumer(Token::Comma);
                consumer(Token::WhiteSpace(" "));
            }
            selector.produce_tokens(consumer);
        }
    }

    /// Collect [`SelectorGroup::produce_tokens`] into a vector.
    pub fn tokens(&self) -> Vec<Token<'_>> {
        let mut tokens = Vec::new();
        self.produce_tokens(&mut |token| tokens.push(token));
        tokens
    }
}

impl ToCss for SimpleSelector {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        let mut tokens = Vec::new();
        self.produce_tokens(&mut |token| tokens.push(token));
        serialize_tokens(&tokens, dest)
    }
}

impl ToCss for Selector {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        serialize_tokens(&self.tokens(), dest)
    }
}

impl ToCss for SelectorGroup {
    fn to_css<W: fmt::Write>(&self, dest: &mut W) -> fmt::Result {
        serialize_tokens(&self.tokens(), dest)
    }
}

impl fmt::Display for SelectorGroup {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.to_css(formatter)
    }
}
