use std::str::FromStr;

use nom::{
    IResult, Parser,
    branch::alt,
    character::complete::{alpha1, alphanumeric0, char, digit0, digit1, multispace0, one_of},
    combinator::{cut, map, map_res, opt, recognize, value},
    sequence::{delimited, preceded},
};
use thiserror::Error;

use crate::{
    Expression, NumericConstant,
    expression::{
        NumericConstantError,
        ast::operator::Operator,
        function::{Constant, Function},
    },
};

/// Maximum recursion depth accepted by the parser. Parentheses, unary signs
/// and chained `^` all count towards it.
pub const MAX_NESTING: usize = 64;

/// Maximum number of binary operators in one expression.
pub const MAX_OPERATORS: usize = 256;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ParseError {
    #[error("Empty expression")]
    Empty,
    #[error("Unknown name '{name}' at position {position}")]
    UnknownName { name: String, position: usize },
    #[error("Invalid number at position {position}: {source}")]
    InvalidNumber {
        position: usize,
        source: NumericConstantError,
    },
    #[error("Unexpected '{found}' at position {position}")]
    UnexpectedToken { found: String, position: usize },
    #[error("Unexpected end of expression")]
    UnexpectedEnd,
    #[error("Expression nests deeper than {0} levels")]
    TooDeep(usize),
    #[error("Expression has more than {0} operators")]
    TooLong(usize),
}

/// Parse whitespace (spaces, tabs, newlines)
fn ws<'a, P, O>(inner: P) -> impl Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>
where
    P: Parser<&'a str, Output = O, Error = nom::error::Error<&'a str>>,
{
    delimited(multispace0, inner, multispace0)
}

/// Recognise a bare name (letters followed by letters or digits)
fn name_token(input: &str) -> IResult<&str, &str> {
    recognize((alpha1, alphanumeric0)).parse(input)
}

/// Recognise the text of an unsigned decimal number
fn number_token(input: &str) -> IResult<&str, &str> {
    recognize((
        alt((
            recognize((digit1, opt((char('.'), digit0)))),
            recognize((char('.'), digit1)),
        )),
        opt((one_of("eE"), opt(one_of("+-")), digit1)),
    ))
    .parse(input)
}

/// Parse a numeric constant
fn numeric_constant(input: &str) -> IResult<&str, NumericConstant> {
    map_res(number_token, NumericConstant::from_str).parse(input)
}

/// Parse the variable or a named constant
fn name(input: &str) -> IResult<&str, Expression> {
    map_res(name_token, |s: &str| {
        if s.eq_ignore_ascii_case("x") {
            Ok(Expression::Variable)
        } else {
            Constant::from_str(s).map(Expression::Named)
        }
    })
    .parse(input)
}

/// Parse a parenthesised argument; once the opening parenthesis is seen
/// failures are fatal so errors point at the real problem.
fn parenthesised(input: &str) -> IResult<&str, Expression> {
    delimited(ws(char('(')), cut(additive), cut(ws(char(')')))).parse(input)
}

/// Parse a parenthesised expression
fn parentheses(input: &str) -> IResult<&str, Expression> {
    map(parenthesised, Expression::parentheses).parse(input)
}

/// Parse a call to an allow-listed function
fn function_call(input: &str) -> IResult<&str, Expression> {
    map_res(
        (name_token, parenthesised),
        |(name, argument)| Function::from_str(name).map(|f| Expression::call(f, argument)),
    )
    .parse(input)
}

/// Parse primary expressions (atoms)
fn primary(input: &str) -> IResult<&str, Expression> {
    alt((
        map(numeric_constant, Expression::Constant),
        // Try the call before the bare name since both start with a name
        function_call,
        name,
        parentheses,
    ))
    .parse(input)
}

/// Parse exponentiation (right-associative, binds tighter than unary signs)
fn power(input: &str) -> IResult<&str, Expression> {
    let (input, base) = primary(input)?;

    if let Ok((input, _)) = ws(char('^')).parse(input) {
        let (input, exponent) = unary(input)?;
        Ok((input, Expression::exponentiation(base, exponent)))
    } else {
        Ok((input, base))
    }
}

/// Parse unary expressions (unary operators)
fn unary(input: &str) -> IResult<&str, Expression> {
    alt((
        map(preceded(ws(char('+')), unary), |expr| {
            Expression::UnaryPlus(Box::new(expr))
        }),
        map(preceded(ws(char('-')), unary), Expression::unary_minus),
        power,
    ))
    .parse(input)
}

/// Parse multiplication and division (left-associative)
fn multiplicative(input: &str) -> IResult<&str, Expression> {
    let (mut input, mut left) = unary(input)?;

    loop {
        let op_result = alt((
            value(Operator::Multiply, ws(char('*'))),
            value(Operator::Divide, ws(char('/'))),
        ))
        .parse(input);

        if let Ok((new_input, op)) = op_result {
            let (new_input, right) = unary(new_input)?;
            input = new_input;
            left = match op {
                Operator::Multiply => Expression::multiply(left, right),
                _ => Expression::divide(left, right),
            };
        } else {
            break;
        }
    }

    Ok((input, left))
}

/// Parse addition and subtraction (left-associative)
fn additive(input: &str) -> IResult<&str, Expression> {
    let (mut input, mut left) = multiplicative(input)?;

    loop {
        let op_result = alt((
            value(Operator::Add, ws(char('+'))),
            value(Operator::Subtract, ws(char('-'))),
        ))
        .parse(input);

        if let Ok((new_input, op)) = op_result {
            let (new_input, right) = multiplicative(new_input)?;
            input = new_input;
            left = match op {
                Operator::Add => Expression::add(left, right),
                _ => Expression::subtract(left, right),
            };
        } else {
            break;
        }
    }

    Ok((input, left))
}

/// Parse an expression, returning any unconsumed input
pub fn expression(input: &str) -> IResult<&str, Expression> {
    ws(additive).parse(input)
}

/// Bounds read off the raw text before any recursion happens.
#[derive(Debug, Default, PartialEq)]
struct Shape {
    /// Deepest parser recursion: open parentheses plus the unary signs and
    /// `^` chained since the last binary operator at each open level.
    nesting: usize,
    /// Binary operators, each of which adds a level to a left-leaning tree.
    operators: usize,
}

fn shape(input: &str) -> Shape {
    let mut shape = Shape::default();
    // Chain length per open parenthesis, innermost last.
    let mut chains = vec![0usize];
    let mut depth = 0usize;
    let mut prev: Option<char> = None;
    let mut prev2: Option<char> = None;

    for ch in input.chars().filter(|c| !c.is_whitespace()) {
        let exponent_sign = matches!(prev, Some('e' | 'E'))
            && matches!(prev2, Some(c) if c.is_ascii_digit() || c == '.');
        let operand_before = !matches!(prev, None | Some('(' | '^' | '*' | '/' | '+' | '-'));

        match ch {
            '(' => {
                chains.push(0);
                depth += 1;
            }
            ')' if chains.len() > 1 => {
                depth -= 1 + chains.pop().unwrap_or_default();
            }
            '+' | '-' if exponent_sign => {}
            '+' | '-' | '*' | '/' if operand_before => {
                shape.operators += 1;
                if let Some(chain) = chains.last_mut() {
                    depth -= *chain;
                    *chain = 0;
                }
            }
            '+' | '-' | '^' => {
                if let Some(chain) = chains.last_mut() {
                    *chain += 1;
                    depth += 1;
                }
            }
            _ => {}
        }
        shape.nesting = shape.nesting.max(depth);
        prev2 = prev;
        prev = Some(ch);
    }
    shape
}

/// Turns the input left at a failure point into a descriptive error.
fn classify(full: &str, rest: &str) -> ParseError {
    let rest = rest.trim_start();
    let position = full.len() - rest.len();

    if rest.is_empty() {
        return ParseError::UnexpectedEnd;
    }
    if let Ok((_, token)) = name_token(rest) {
        if Function::from_str(token).is_err()
            && Constant::from_str(token).is_err()
            && !token.eq_ignore_ascii_case("x")
        {
            return ParseError::UnknownName {
                name: token.to_string(),
                position,
            };
        }
        return ParseError::UnexpectedToken {
            found: token.to_string(),
            position,
        };
    }
    if let Ok((_, token)) = number_token(rest) {
        if let Err(source) = NumericConstant::from_str(token) {
            return ParseError::InvalidNumber { position, source };
        }
        return ParseError::UnexpectedToken {
            found: token.to_string(),
            position,
        };
    }

    let found = rest.chars().next().map(String::from).unwrap_or_default();
    ParseError::UnexpectedToken { found, position }
}

/// Parses the whole input as one expression.
pub fn parse_complete(input: &str) -> Result<Expression, ParseError> {
    if input.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    let shape = shape(input);
    if shape.nesting > MAX_NESTING {
        return Err(ParseError::TooDeep(MAX_NESTING));
    }
    if shape.operators > MAX_OPERATORS {
        return Err(ParseError::TooLong(MAX_OPERATORS));
    }

    match expression(input) {
        Ok(("", expr)) => Ok(expr),
        Ok((rest, _)) => Err(classify(input, rest)),
        Err(nom::Err::Error(e)) | Err(nom::Err::Failure(e)) => Err(classify(input, e.input)),
        Err(nom::Err::Incomplete(_)) => Err(ParseError::UnexpectedEnd),
    }
}
