use winnow::combinator::{alt, cut_err, delimited, opt, preceded, repeat, terminated};
use winnow::error::{ModalResult, StrContext, StrContextValue};
use winnow::prelude::*;
use winnow::token::take_while;

use crate::Expr;

// -- Whitespace -------------------------------------------------------------

fn ws(input: &mut &str) -> ModalResult<()> {
    take_while(0.., char::is_whitespace)
        .void()
        .parse_next(input)
}

// -- Words ------------------------------------------------------------------

const RESERVED: [char; 8] = ['[', ']', '<', '>', '|', '+', '(', ')'];

fn is_word_char(c: char) -> bool {
    !c.is_whitespace() && !RESERVED.contains(&c)
}

fn word<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    take_while(1.., is_word_char)
        .context(StrContext::Expected(StrContextValue::Description("word")))
        .parse_next(input)
}

// -- Atoms ------------------------------------------------------------------

fn exact(input: &mut &str) -> ModalResult<Expr> {
    delimited(('[', ws), cut_err(word), cut_err((ws, ']')))
        .map(|w| Expr::Exact(w.to_owned()))
        .parse_next(input)
}

fn group(input: &mut &str) -> ModalResult<Expr> {
    delimited('(', cut_err(expr), cut_err((ws, ')')))
        .map(|e| Expr::Group(Box::new(e)))
        .parse_next(input)
}

/// A bare word, or a word followed by an `<exclusion>` suffix.
fn term_or_exclude(input: &mut &str) -> ModalResult<Expr> {
    let w = word.parse_next(input)?;
    let exclusion =
        opt(preceded((ws, '<'), cut_err(terminated(expr, (ws, '>'))))).parse_next(input)?;
    Ok(match exclusion {
        Some(inner) => Expr::TermExclude(w.to_owned(), Box::new(inner)),
        None => Expr::Term(w.to_owned()),
    })
}

fn atom(input: &mut &str) -> ModalResult<Expr> {
    ws.parse_next(input)?;
    alt((exact, group, term_or_exclude))
        .context(StrContext::Expected(StrContextValue::Description(
            "expression",
        )))
        .parse_next(input)
}

// -- Expressions (precedence: OR < AND; unary forms bind tightest) ----------

fn and_expr(input: &mut &str) -> ModalResult<Expr> {
    let first = atom(input)?;
    let rest: Vec<Expr> = repeat(0.., preceded((ws, '+'), cut_err(atom))).parse_next(input)?;
    Ok(rest
        .into_iter()
        .fold(first, |acc, r| Expr::And(Box::new(acc), Box::new(r))))
}

fn or_expr(input: &mut &str) -> ModalResult<Expr> {
    let first = and_expr(input)?;
    let rest: Vec<Expr> = repeat(0.., preceded((ws, '|'), cut_err(and_expr))).parse_next(input)?;
    Ok(rest
        .into_iter()
        .fold(first, |acc, r| Expr::Or(Box::new(acc), Box::new(r))))
}

pub fn expr(input: &mut &str) -> ModalResult<Expr> {
    let e = or_expr(input)?;
    ws.parse_next(input)?;
    Ok(e)
}
