//! Selector list parsing per
//! [Selectors Level 4 § 18 Grammar](https://www.w3.org/TR/selectors-4/#grammar).
//!
//! ```text
//! <selector-list>     = <complex-selector>#
//! <complex-selector>  = <compound-selector> [ <combinator>? <compound-selector> ]*
//! <compound-selector> = [ <type-selector>? <subclass-selector>* <pseudo-element-selector>? ]!
//! ```

pub mod ast;
mod nth;
mod token;
mod tokenizer;

use crate::error::SelectorError;
use crate::namespaces::Namespaces;
use crate::pseudo::PseudoElement;
use ast::{
    AttributeNamespace, AttributeOperator, AttributeSelector, Combinator, ComplexSelector,
    CompoundSelector, Nth, ParsedSelector, PseudoClass, SimpleSelector,
};
use token::Token;
use tokenizer::tokenize;

/// Parse a comma-separated selector list.
///
/// ```
/// use sift_select::Namespaces;
/// use sift_select::parser::parse_selector_list;
///
/// let selectors = parse_selector_list("ul > li:first-child, p::before", &Namespaces::new()).unwrap();
/// assert_eq!(selectors.len(), 2);
/// assert!(selectors[1].pseudo_element.is_some());
/// ```
///
/// # Errors
///
/// Any syntax error, unknown pseudo-class or pseudo-element, or undeclared
/// namespace prefix invalidates the whole list.
pub fn parse_selector_list(
    input: &str,
    namespaces: &Namespaces,
) -> Result<Vec<ParsedSelector>, SelectorError> {
    let tokens = tokenize(input);
    SelectorParser::new(&tokens, namespaces).parse_list()
}

/// What a single simple-selector step produced.
enum Simple {
    Selector(SimpleSelector),
    PseudoElement(PseudoElement),
}

/// Error for `found` appearing where `expected` should have been.
fn unexpected(found: Option<&Token>, expected: &'static str) -> SelectorError {
    match found {
        Some(token) => SelectorError::UnexpectedToken {
            found: token.to_string(),
            expected,
        },
        None => SelectorError::UnexpectedEnd { expected },
    }
}

struct TokenStream<'t> {
    tokens: &'t [Token],
    position: usize,
}

impl<'t> TokenStream<'t> {
    const fn new(tokens: &'t [Token]) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    fn peek(&self) -> Option<&'t Token> {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> Option<&'t Token> {
        self.tokens.get(self.position + offset)
    }

    fn advance(&mut self) -> Option<&'t Token> {
        let token = self.tokens.get(self.position)?;
        self.position += 1;
        Some(token)
    }

    /// Skip whitespace tokens, reporting whether there were any.
    fn skip_whitespace(&mut self) -> bool {
        let start = self.position;
        while self.peek() == Some(&Token::Whitespace) {
            self.position += 1;
        }
        self.position > start
    }
}

struct SelectorParser<'t, 'n> {
    stream: TokenStream<'t>,
    namespaces: &'n Namespaces,
}

impl<'t, 'n> SelectorParser<'t, 'n> {
    const fn new(tokens: &'t [Token], namespaces: &'n Namespaces) -> Self {
        Self {
            stream: TokenStream::new(tokens),
            namespaces,
        }
    }

    fn parse_list(&mut self) -> Result<Vec<ParsedSelector>, SelectorError> {
        let mut selectors = Vec::new();
        loop {
            let _ = self.stream.skip_whitespace();
            if matches!(self.stream.peek(), None | Some(Token::Comma)) {
                return Err(SelectorError::Empty);
            }
            selectors.push(self.parse_selector()?);
            match self.stream.advance() {
                None => return Ok(selectors),
                Some(Token::Comma) => {}
                found => return Err(unexpected(found, "',' between selectors")),
            }
        }
    }

    /// [§ 4.3 Complex selectors](https://www.w3.org/TR/selectors-4/#complex)
    ///
    /// Stops before a `,` or at the end of input.
    fn parse_selector(&mut self) -> Result<ParsedSelector, SelectorError> {
        let (first, mut pseudo_element) = self.parse_compound()?;
        let mut compounds = vec![first];
        let mut combinators = Vec::new();

        loop {
            let had_whitespace = self.stream.skip_whitespace();
            let combinator = match self.stream.peek() {
                None | Some(Token::Comma) => break,
                Some(Token::Delim('>')) => Combinator::Child,
                Some(Token::Delim('+')) => Combinator::NextSibling,
                Some(Token::Delim('~')) => Combinator::SubsequentSibling,
                Some(_) if had_whitespace => Combinator::Descendant,
                found => return Err(unexpected(found, "a combinator or ','")),
            };
            if combinator != Combinator::Descendant {
                let _ = self.stream.advance();
                let _ = self.stream.skip_whitespace();
            }

            // "Pseudo-elements may only be placed after the compound selector
            // that represents the originating element"
            if let Some(pseudo) = pseudo_element {
                return Err(SelectorError::MisplacedPseudoElement(pseudo.to_string()));
            }

            let (compound, pseudo) = self.parse_compound()?;
            pseudo_element = pseudo;
            combinators.push(combinator);
            compounds.push(compound);
        }

        // `A > B C` arrives as compounds [A, B, C] and combinators [>, ' '];
        // store it subject-first: C, then (' ', B), then (>, A).
        let subject = compounds.pop().unwrap_or_default();
        let chain = compounds
            .into_iter()
            .zip(combinators)
            .rev()
            .map(|(compound, combinator)| (combinator, compound))
            .collect();
        let complex = ComplexSelector {
            subject,
            combinators: chain,
        };

        let mut specificity = complex.specificity();
        if pseudo_element.is_some() {
            // "count the number of type selectors and pseudo-elements (= C)"
            specificity.2 += 1;
        }

        Ok(ParsedSelector {
            complex,
            specificity,
            pseudo_element,
        })
    }

    /// [§ 4.2 Compound selectors](https://www.w3.org/TR/selectors-4/#compound)
    fn parse_compound(
        &mut self,
    ) -> Result<(CompoundSelector, Option<PseudoElement>), SelectorError> {
        let mut simple_selectors = Vec::new();
        let has_type_selector = self.parse_type_selector(&mut simple_selectors)?;

        let mut pseudo_element = None;
        while let Some(simple) = self.parse_simple_selector()? {
            match simple {
                Simple::Selector(selector) => simple_selectors.push(selector),
                Simple::PseudoElement(pseudo) => {
                    pseudo_element = Some(pseudo);
                    break;
                }
            }
        }

        if !has_type_selector && simple_selectors.is_empty() && pseudo_element.is_none() {
            return Err(unexpected(self.stream.peek(), "a compound selector"));
        }
        Ok((CompoundSelector { simple_selectors }, pseudo_element))
    }

    /// [§ 5.1 Type selectors](https://www.w3.org/TR/selectors-4/#type-selectors)
    /// and [§ 5.3 Namespaces](https://www.w3.org/TR/selectors-4/#type-nmsp)
    ///
    /// - `ns|E`: elements with name E in namespace ns
    /// - `*|E`: elements with name E in any namespace, including none
    /// - `|E`: elements with name E without a namespace
    /// - `E`: elements with name E in the default namespace, if declared
    ///
    /// Returns whether a type or universal selector was present.
    fn parse_type_selector(
        &mut self,
        out: &mut Vec<SimpleSelector>,
    ) -> Result<bool, SelectorError> {
        let has_prefix = self.stream.peek_at(1) == Some(&Token::Delim('|'));
        let (namespace, local_name) = match self.stream.peek() {
            Some(Token::Ident(prefix)) if has_prefix => {
                self.stream.position += 2;
                let url = self.namespaces.resolve(prefix)?.to_string();
                (Some(url), self.parse_element_name()?)
            }
            Some(Token::Delim('*')) if has_prefix => {
                self.stream.position += 2;
                (None, self.parse_element_name()?)
            }
            Some(Token::Delim('|')) => {
                self.stream.position += 1;
                (Some(String::new()), self.parse_element_name()?)
            }
            Some(Token::Ident(name)) => {
                self.stream.position += 1;
                (self.default_namespace(), Some(name.clone()))
            }
            Some(Token::Delim('*')) => {
                self.stream.position += 1;
                (self.default_namespace(), None)
            }
            _ => return Ok(false),
        };

        if let Some(local_name) = local_name {
            out.push(SimpleSelector::LocalName {
                lower_local_name: local_name.to_ascii_lowercase(),
                local_name,
            });
        }
        if let Some(url) = namespace {
            out.push(SimpleSelector::Namespace(url));
        }
        Ok(true)
    }

    /// The part after `|`: a name, or `*` for any (`None`).
    fn parse_element_name(&mut self) -> Result<Option<String>, SelectorError> {
        match self.stream.peek() {
            Some(Token::Ident(name)) => {
                self.stream.position += 1;
                Ok(Some(name.clone()))
            }
            Some(Token::Delim('*')) => {
                self.stream.position += 1;
                Ok(None)
            }
            found => Err(unexpected(found, "an element name after '|'")),
        }
    }

    fn default_namespace(&self) -> Option<String> {
        self.namespaces.default_namespace().map(str::to_string)
    }

    /// One subclass selector or the trailing pseudo-element; `None` when the
    /// next token cannot start one.
    fn parse_simple_selector(&mut self) -> Result<Option<Simple>, SelectorError> {
        let Some(token) = self.stream.peek() else {
            return Ok(None);
        };
        let selector = match token {
            Token::Hash { value, is_id: true } => {
                self.stream.position += 1;
                SimpleSelector::Id(value.clone())
            }
            Token::Hash { is_id: false, .. } => {
                return Err(unexpected(Some(token), "an identifier after '#'"));
            }
            Token::Delim('.') => {
                self.stream.position += 1;
                match self.stream.advance() {
                    Some(Token::Ident(name)) => SimpleSelector::Class(name.clone()),
                    found => return Err(unexpected(found, "a class name after '.'")),
                }
            }
            Token::LeftBracket => {
                self.stream.position += 1;
                SimpleSelector::Attribute(self.parse_attribute_selector()?)
            }
            Token::Colon => {
                self.stream.position += 1;
                return self.parse_pseudo().map(Some);
            }
            _ => return Ok(None),
        };
        Ok(Some(Simple::Selector(selector)))
    }

    /// After the first `:`.
    fn parse_pseudo(&mut self) -> Result<Simple, SelectorError> {
        let double_colon = self.stream.peek() == Some(&Token::Colon);
        if double_colon {
            self.stream.position += 1;
        }

        match self.stream.advance() {
            Some(Token::Ident(name)) if double_colon => name
                .parse::<PseudoElement>()
                .map(Simple::PseudoElement)
                .map_err(|_| SelectorError::UnknownPseudoElement(name.clone())),
            Some(Token::Ident(name)) => {
                if let Ok(pseudo) = name.parse::<PseudoElement>() {
                    if pseudo.allows_single_colon() {
                        return Ok(Simple::PseudoElement(pseudo));
                    }
                }
                pseudo_class(name).map(|pc| Simple::Selector(SimpleSelector::PseudoClass(pc)))
            }
            Some(Token::Function(name)) if double_colon => {
                Err(SelectorError::UnknownPseudoElement(format!("{name}()")))
            }
            Some(Token::Function(name)) => {
                let arguments = self.consume_arguments()?;
                self.functional_pseudo_class(name, arguments)
                    .map(Simple::Selector)
            }
            found => Err(unexpected(found, "a pseudo-class or pseudo-element name")),
        }
    }

    /// The tokens between a function token and its matching `)`, which is
    /// consumed.
    fn consume_arguments(&mut self) -> Result<&'t [Token], SelectorError> {
        let tokens = self.stream.tokens;
        let start = self.stream.position;
        let mut depth = 0usize;
        loop {
            match self.stream.advance() {
                None => return Err(SelectorError::UnexpectedEnd { expected: "')'" }),
                Some(Token::RightParen) if depth == 0 => {
                    return Ok(&tokens[start..self.stream.position - 1]);
                }
                Some(Token::RightParen) => depth -= 1,
                Some(Token::Function(_) | Token::LeftParen) => depth += 1,
                Some(_) => {}
            }
        }
    }

    fn functional_pseudo_class(
        &self,
        name: &str,
        arguments: &[Token],
    ) -> Result<SimpleSelector, SelectorError> {
        let pseudo = match name.to_ascii_lowercase().as_str() {
            "nth-child" => PseudoClass::NthChild(Nth::parse(arguments)?),
            "nth-last-child" => PseudoClass::NthLastChild(Nth::parse(arguments)?),
            "nth-of-type" => PseudoClass::NthOfType(Nth::parse(arguments)?),
            "nth-last-of-type" => PseudoClass::NthLastOfType(Nth::parse(arguments)?),
            "lang" => PseudoClass::Lang(parse_language_range(arguments)?),
            "not" => return Ok(SimpleSelector::Negation(self.parse_nested(arguments)?)),
            "is" | "matches" => return Ok(SimpleSelector::Is(self.parse_nested(arguments)?)),
            "where" => return Ok(SimpleSelector::Where(self.parse_nested(arguments)?)),
            _ => return Err(SelectorError::UnknownPseudoClass(format!("{name}()"))),
        };
        Ok(SimpleSelector::PseudoClass(pseudo))
    }

    /// A selector list argument of `:not()`, `:is()` or `:where()`.
    /// Pseudo-elements are not valid inside.
    fn parse_nested(&self, arguments: &[Token]) -> Result<Vec<ComplexSelector>, SelectorError> {
        SelectorParser::new(arguments, self.namespaces)
            .parse_list()?
            .into_iter()
            .map(|parsed| match parsed.pseudo_element {
                Some(pseudo) => Err(SelectorError::MisplacedPseudoElement(pseudo.to_string())),
                None => Ok(parsed.complex),
            })
            .collect()
    }

    /// [§ 6.1 Attribute selectors](https://www.w3.org/TR/selectors-4/#attribute-representation),
    /// after the `[`.
    fn parse_attribute_selector(&mut self) -> Result<AttributeSelector, SelectorError> {
        let _ = self.stream.skip_whitespace();
        let (namespace, name) = self.parse_attribute_name()?;
        let lower_name = name.to_ascii_lowercase();
        let _ = self.stream.skip_whitespace();

        let operator = match self.stream.advance() {
            Some(Token::RightBracket) => {
                return Ok(AttributeSelector {
                    name,
                    lower_name,
                    namespace,
                    operator: None,
                });
            }
            Some(Token::Delim('=')) => AttributeOperator::Equals,
            Some(Token::Delim(c)) if self.stream.peek() == Some(&Token::Delim('=')) => {
                let operator = attribute_operator(*c).ok_or_else(|| {
                    SelectorError::InvalidAttribute(format!("unknown operator '{c}='"))
                })?;
                self.stream.position += 1;
                operator
            }
            found => return Err(unexpected(found, "an attribute operator or ']'")),
        };

        let _ = self.stream.skip_whitespace();
        let value = match self.stream.advance() {
            Some(Token::Ident(value) | Token::String(value)) => value.clone(),
            _ => {
                return Err(SelectorError::InvalidAttribute(format!(
                    "expected an identifier or string value for '{name}'"
                )));
            }
        };
        let _ = self.stream.skip_whitespace();
        if self.stream.advance() != Some(&Token::RightBracket) {
            return Err(SelectorError::InvalidAttribute(format!(
                "expected ']' after the value of '{name}'"
            )));
        }

        Ok(AttributeSelector {
            name,
            lower_name,
            namespace,
            operator: Some((operator, value)),
        })
    }

    /// `attr`, `|attr`, `*|attr` or `ns|attr`. A `|` directly followed by `=`
    /// is the `|=` operator, not a namespace separator.
    fn parse_attribute_name(&mut self) -> Result<(AttributeNamespace, String), SelectorError> {
        let has_prefix = self.stream.peek_at(1) == Some(&Token::Delim('|'))
            && self.stream.peek_at(2) != Some(&Token::Delim('='));
        let namespace = match self.stream.peek() {
            Some(Token::Ident(prefix)) if has_prefix => {
                self.stream.position += 2;
                AttributeNamespace::Url(self.namespaces.resolve(prefix)?.to_string())
            }
            Some(Token::Delim('*')) if has_prefix => {
                self.stream.position += 2;
                AttributeNamespace::Any
            }
            Some(Token::Delim('|')) => {
                self.stream.position += 1;
                AttributeNamespace::Null
            }
            _ => AttributeNamespace::Null,
        };
        match self.stream.advance() {
            Some(Token::Ident(name)) => Ok((namespace, name.clone())),
            found => Err(unexpected(found, "an attribute name")),
        }
    }
}

/// Argument-less pseudo-classes.
fn pseudo_class(name: &str) -> Result<PseudoClass, SelectorError> {
    let pseudo = match name.to_ascii_lowercase().as_str() {
        "root" => PseudoClass::Root,
        "empty" => PseudoClass::Empty,
        "first-child" => PseudoClass::FirstChild,
        "last-child" => PseudoClass::LastChild,
        "only-child" => PseudoClass::OnlyChild,
        "first-of-type" => PseudoClass::FirstOfType,
        "last-of-type" => PseudoClass::LastOfType,
        "only-of-type" => PseudoClass::OnlyOfType,
        "link" | "any-link" => PseudoClass::Link,
        "enabled" => PseudoClass::Enabled,
        "disabled" => PseudoClass::Disabled,
        "checked" => PseudoClass::Checked,
        // [§ 9 User action pseudo-classes](https://www.w3.org/TR/selectors-4/#useraction-pseudos)
        // [§ 8 Location pseudo-classes](https://www.w3.org/TR/selectors-4/#location)
        // [§ 10 Time-dimensional pseudo-classes](https://www.w3.org/TR/selectors-4/#time-pseudos)
        lower @ ("hover" | "active" | "focus" | "visited" | "target" | "focus-within"
        | "focus-visible" | "current" | "past" | "future") => {
            PseudoClass::Dynamic(lower.to_string())
        }
        _ => return Err(SelectorError::UnknownPseudoClass(name.to_string())),
    };
    Ok(pseudo)
}

fn attribute_operator(c: char) -> Option<AttributeOperator> {
    match c {
        '~' => Some(AttributeOperator::Includes),
        '|' => Some(AttributeOperator::DashMatch),
        '^' => Some(AttributeOperator::Prefix),
        '$' => Some(AttributeOperator::Suffix),
        '*' => Some(AttributeOperator::Substring),
        _ => None,
    }
}

/// The single identifier or string argument of `:lang()`.
fn parse_language_range(arguments: &[Token]) -> Result<String, SelectorError> {
    let mut stream = TokenStream::new(arguments);
    let _ = stream.skip_whitespace();
    let range = match stream.advance() {
        Some(Token::Ident(range) | Token::String(range)) => range.clone(),
        found => return Err(unexpected(found, "a language range")),
    };
    let _ = stream.skip_whitespace();
    match stream.peek() {
        None => Ok(range),
        found => Err(unexpected(found, "')' after the language range")),
    }
}
