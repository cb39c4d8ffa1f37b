use std::{fmt, str::FromStr};

use operator::Operator;

use super::{
    NumericConstant,
    function::{Constant, Function},
    parse::ParseError,
};

/// Parsed single-variable function of `x`.
#[derive(Debug, Clone, PartialEq)]
pub enum Expression {
    Constant(NumericConstant),
    Named(Constant),
    Variable,
    // Operators
    Parentheses(Box<Expression>),
    Exponentiation(Box<Expression>, Box<Expression>),
    UnaryPlus(Box<Expression>),
    UnaryMinus(Box<Expression>),
    Multiply(Box<Expression>, Box<Expression>),
    Divide(Box<Expression>, Box<Expression>),
    Add(Box<Expression>, Box<Expression>),
    Subtract(Box<Expression>, Box<Expression>),
    // Function Calls
    FunctionCall {
        function: Function,
        argument: Box<Expression>,
    },
}

impl Expression {
    /// Parses a complete expression; trailing input is an error.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        super::parse::parse_complete(input)
    }

    pub fn constant(value: f64) -> Self {
        Expression::Constant(NumericConstant(value))
    }

    pub fn parentheses(expr: Expression) -> Self {
        Expression::Parentheses(Box::new(expr))
    }

    pub fn exponentiation(base: Expression, exponent: Expression) -> Self {
        Expression::Exponentiation(Box::new(base), Box::new(exponent))
    }

    pub fn unary_minus(expr: Expression) -> Self {
        Expression::UnaryMinus(Box::new(expr))
    }

    pub fn multiply(lhs: Expression, rhs: Expression) -> Self {
        Expression::Multiply(Box::new(lhs), Box::new(rhs))
    }

    pub fn divide(lhs: Expression, rhs: Expression) -> Self {
        Expression::Divide(Box::new(lhs), Box::new(rhs))
    }

    pub fn add(lhs: Expression, rhs: Expression) -> Self {
        Expression::Add(Box::new(lhs), Box::new(rhs))
    }

    pub fn subtract(lhs: Expression, rhs: Expression) -> Self {
        Expression::Subtract(Box::new(lhs), Box::new(rhs))
    }

    pub fn call(function: Function, argument: Expression) -> Self {
        Expression::FunctionCall {
            function,
            argument: Box::new(argument),
        }
    }

    pub fn top_operator(&self) -> Option<Operator> {
        match self {
            Expression::Parentheses(_) => Some(Operator::Paren),
            Expression::Exponentiation(_, _) => Some(Operator::Exponentiation),
            Expression::UnaryPlus(_) => Some(Operator::UnaryPlus),
            Expression::UnaryMinus(_) => Some(Operator::UnaryMinus),
            Expression::Multiply(_, _) => Some(Operator::Multiply),
            Expression::Divide(_, _) => Some(Operator::Divide),
            Expression::Add(_, _) => Some(Operator::Add),
            Expression::Subtract(_, _) => Some(Operator::Subtract),
            Expression::Constant(_)
            | Expression::Named(_)
            | Expression::Variable
            | Expression::FunctionCall { .. } => None,
        }
    }

    /// Direct sub-expressions, left to right.
    pub fn children(&self) -> Vec<&Expression> {
        match self {
            Expression::Constant(_) | Expression::Named(_) | Expression::Variable => Vec::new(),
            Expression::Parentheses(expr)
            | Expression::UnaryPlus(expr)
            | Expression::UnaryMinus(expr)
            | Expression::FunctionCall { argument: expr, .. } => vec![expr.as_ref()],
            Expression::Exponentiation(lhs, rhs)
            | Expression::Multiply(lhs, rhs)
            | Expression::Divide(lhs, rhs)
            | Expression::Add(lhs, rhs)
            | Expression::Subtract(lhs, rhs) => vec![lhs.as_ref(), rhs.as_ref()],
        }
    }

    pub fn operators(&self) -> Vec<Operator> {
        let mut acc = Vec::new();
        self.walk(&mut |expr| {
            if let Some(op) = expr.top_operator() {
                acc.push(op);
            }
        });
        acc
    }

    pub fn functions(&self) -> Vec<Function> {
        let mut acc = Vec::new();
        self.walk(&mut |expr| {
            if let Expression::FunctionCall { function, .. } = expr {
                acc.push(*function);
            }
        });
        acc
    }

    pub fn contains_variable(&self) -> bool {
        let mut found = false;
        self.walk(&mut |expr| found |= matches!(expr, Expression::Variable));
        found
    }

    /// Pre-order traversal.
    fn walk<F: FnMut(&Expression)>(&self, visit: &mut F) {
        visit(self);
        for child in self.children() {
            child.walk(visit);
        }
    }
}

impl FromStr for Expression {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Expression::parse(s)
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expression::Constant(value) => write!(f, "{}", value),
            Expression::Named(constant) => write!(f, "{}", constant),
            Expression::Variable => write!(f, "x"),
            Expression::Parentheses(expr) => write!(f, "({})", expr),
            Expression::Exponentiation(base, exponent) => write!(f, "{} ^ {}", base, exponent),
            Expression::UnaryPlus(expr) => write!(f, "+{}", expr),
            Expression::UnaryMinus(expr) => write!(f, "-{}", expr),
            Expression::Multiply(lhs, rhs) => write!(f, "{} * {}", lhs, rhs),
            Expression::Divide(lhs, rhs) => write!(f, "{} / {}", lhs, rhs),
            Expression::Add(lhs, rhs) => write!(f, "{} + {}", lhs, rhs),
            Expression::Subtract(lhs, rhs) => write!(f, "{} - {}", lhs, rhs),
            Expression::FunctionCall { function, argument } => {
                write!(f, "{}({})", function, argument)
            }
        }
    }
}

pub mod operator {
    //! ### Operators
    //! Supported operators in precedence order. Addition, subtraction,
    //! multiplication and division associate left-to-right; exponentiation
    //! associates right-to-left and binds tighter than the unary signs, so
    //! `-x^2` is `-(x^2)` and `2^-1` is `0.5`.
    //!
    //! | Operators | Precedence Group         |
    //! |:---------:|:-------------------------|
    //! | ( )       | Parentheses              |
    //! | ^         | Exponentiation           |
    //! | + -       | Unary operators          |
    //! | * /       | Multiplication, division |
    //! | + -       | Addition, subtraction    |

    use std::{cmp, fmt};

    #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
    pub enum Operator {
        Paren,
        Exponentiation,
        UnaryPlus,
        UnaryMinus,
        Multiply,
        Divide,
        Add,
        Subtract,
    }

    impl Operator {
        pub fn precedence(&self) -> u8 {
            match self {
                Operator::Paren => 0,
                Operator::Exponentiation => 1,
                Operator::UnaryPlus | Operator::UnaryMinus => 2,
                Operator::Multiply | Operator::Divide => 3,
                Operator::Add | Operator::Subtract => 4,
            }
        }
    }

    impl fmt::Display for Operator {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            let symbol = match self {
                Operator::Paren => "()",
                Operator::Exponentiation => "^",
                Operator::UnaryPlus | Operator::Add => "+",
                Operator::UnaryMinus | Operator::Subtract => "-",
                Operator::Multiply => "*",
                Operator::Divide => "/",
            };
            write!(f, "{}", symbol)
        }
    }

    impl PartialOrd for Operator {
        fn partial_cmp(&self, other: &Self) -> Option<cmp::Ordering> {
            Some(self.cmp(other))
        }
    }

    impl Ord for Operator {
        fn cmp(&self, other: &Self) -> cmp::Ordering {
            self.precedence().cmp(&other.precedence())
        }
    }
}
