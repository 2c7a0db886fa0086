use chumsky::prelude::*;

use crate::{
    prelude::*,
    term::{Atom, Term},
};

pub trait SimpleParser<I: Clone + std::hash::Hash, O>:
    Parser<I, O, Error = ParseError<I>> + Clone
{
    #[allow(clippy::type_complexity)]
    fn spanned(self) -> chumsky::combinator::MapWithSpan<Self, fn(O, Span) -> Spanned<O>, O>
    where
        Self: Sized,
        I: std::cmp::Eq,
    {
        self.map_with_span(|value, span| Spanned { span, value })
    }
}
impl<I: Clone + std::hash::Hash, O, T> SimpleParser<I, O> for T where
    T: Parser<I, O, Error = ParseError<I>> + Clone
{
}

#[derive(PartialEq, Eq, Hash, Clone, derive_more::Display, Debug)]
pub enum Token {
    #[display(fmt = "(")]
    LParen,
    #[display(fmt = ")")]
    RParen,
    #[display(fmt = "*")]
    Star,
    #[display(fmt = "{_0}")]
    Atom(Atom),
}

pub fn lexer() -> impl SimpleParser<char, Vec<Spanned<Token>>> {
    let token = choice((
        just('(').to(Token::LParen),
        just(')').to(Token::RParen),
        just('*').to(Token::Star),
        just('a').to(Token::Atom(Atom::A)),
        just('b').to(Token::Atom(Atom::B)),
    ));
    token.spanned().padded().repeated().then_ignore(end())
}

fn term_parser() -> impl SimpleParser<Token, Term> {
    recursive(|term: Recursive<_, Term, _>| {
        let atom = select! { Token::Atom(atom) => Term::Atom(atom) }.labelled("atom");

        // ( term * term )
        let node = term
            .clone()
            .then_ignore(just(Token::Star))
            .then(term)
            .delimited_by(just(Token::LParen), just(Token::RParen))
            .map(|(left, right)| Term::node(left, right))
            .labelled("node");

        choice((atom, node))
    })
    .labelled("term")
}

fn parse_full<T>(
    s: &str,
    parser: impl SimpleParser<Token, T>,
) -> Result<T, Vec<ParseError<String>>> {
    let len = s.chars().count();
    let eoi = Span {
        start: len,
        end: len + 1,
    };
    let tokens = lexer().parse(s).map_err(|es| {
        es.into_iter()
            .map(|e| e.map(|e| e.to_string()))
            .collect::<Vec<_>>()
    })?;
    let value = parser
        .then_ignore(end())
        .parse(chumsky::Stream::from_iter(
            eoi,
            tokens
                .into_iter()
                .map(|Spanned { span, value }| (value, span)),
        ))
        .map_err(|es| {
            es.into_iter()
                .map(|e| e.map(|e| e.to_string()))
                .collect::<Vec<_>>()
        })?;
    Ok(value)
}

/// Parses the canonical syntax produced by [`Term::canonical`], allowing
/// whitespace between tokens.
pub fn parse_term(s: &str) -> Result<Term, Vec<ParseError<String>>> {
    parse_full(s, term_parser())
}
