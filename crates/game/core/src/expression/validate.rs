use super::ExpressionError;
use super::operator::Fixity;
use super::token::Token;

/// Checks token grammar in a single left-to-right scan.
///
/// A cursor tracks whether a value is expected next. Numbers and prefix
/// operators need it set; postfix operators, infix operators and `)` need it
/// clear. The first violation is reported with its 1-indexed position and
/// nothing is evaluated.
pub fn validate(tokens: &[Token]) -> Result<(), ExpressionError> {
    if tokens.is_empty() {
        return Err(ExpressionError::Empty);
    }

    let mut expect_value = true;
    let mut depth: usize = 0;

    for (index, token) in tokens.iter().enumerate() {
        let position = index + 1;
        match token {
            Token::Number(_) => {
                if !expect_value {
                    return Err(ExpressionError::UnexpectedNumber { position });
                }
                expect_value = false;
            }
            Token::Operator(op) => {
                let def = op.op.definition();
                match def.fixity {
                    Fixity::OpenParen => {
                        if !expect_value {
                            return Err(ExpressionError::UnexpectedOpenParen { position });
                        }
                        depth += 1;
                    }
                    Fixity::CloseParen => {
                        if expect_value {
                            return Err(ExpressionError::UnexpectedCloseParen { position });
                        }
                        depth = depth
                            .checked_sub(1)
                            .ok_or(ExpressionError::UnmatchedCloseParen { position })?;
                    }
                    Fixity::Prefix => {
                        if !expect_value {
                            return Err(ExpressionError::UnexpectedPrefix {
                                symbol: def.symbol,
                                position,
                            });
                        }
                    }
                    Fixity::Postfix => {
                        if expect_value {
                            return Err(ExpressionError::UnexpectedPostfix {
                                symbol: def.symbol,
                                position,
                            });
                        }
                    }
                    Fixity::Infix => {
                        if expect_value {
                            return Err(ExpressionError::UnexpectedOperator {
                                symbol: def.symbol,
                                position,
                            });
                        }
                        expect_value = true;
                    }
                }
            }
        }
    }

    if expect_value {
        return Err(ExpressionError::TrailingOperator);
    }
    if depth != 0 {
        return Err(ExpressionError::UnclosedParen { missing: depth });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::OperatorId::*;

    fn n(value: f64) -> Token {
        Token::number(value)
    }

    fn op(id: crate::expression::OperatorId) -> Token {
        Token::op(id)
    }

    #[test]
    fn empty_expression_is_rejected() {
        assert_eq!(validate(&[]), Err(ExpressionError::Empty));
    }

    #[test]
    fn leading_infix_operator_reports_position_one() {
        let err = validate(&[op(Add), n(5.0)]).unwrap_err();
        assert_eq!(
            err,
            ExpressionError::UnexpectedOperator {
                symbol: "+",
                position: 1
            }
        );
        assert_eq!(err.to_string(), "Unexpected operator + at position 1");
    }

    #[test]
    fn adjacent_numbers_are_rejected() {
        assert_eq!(
            validate(&[n(1.0), n(2.0)]),
            Err(ExpressionError::UnexpectedNumber { position: 2 })
        );
    }

    #[test]
    fn dangling_operator_is_rejected() {
        assert_eq!(
            validate(&[n(1.0), op(Multiply)]),
            Err(ExpressionError::TrailingOperator)
        );
    }

    #[test]
    fn parentheses_must_balance() {
        assert_eq!(
            validate(&[op(Lparen), op(Lparen), n(1.0)]),
            Err(ExpressionError::UnclosedParen { missing: 2 })
        );
        assert_eq!(
            validate(&[n(1.0), op(Rparen)]),
            Err(ExpressionError::UnmatchedCloseParen { position: 2 })
        );
        assert_eq!(
            validate(&[op(Lparen), op(Rparen)]),
            Err(ExpressionError::UnexpectedCloseParen { position: 2 })
        );
        assert_eq!(
            validate(&[n(2.0), op(Lparen), n(1.0), op(Rparen)]),
            Err(ExpressionError::UnexpectedOpenParen { position: 2 })
        );
    }

    #[test]
    fn unary_operators_attach_on_the_correct_side() {
        assert!(validate(&[op(Sqrt), n(9.0)]).is_ok());
        assert!(validate(&[n(3.0), op(Factorial)]).is_ok());
        assert!(validate(&[op(Negate), op(Sqrt), n(9.0), op(Square)]).is_ok());
        assert_eq!(
            validate(&[op(Factorial), n(3.0)]),
            Err(ExpressionError::UnexpectedPostfix {
                symbol: "!",
                position: 1
            })
        );
        assert_eq!(
            validate(&[n(3.0), op(Sqrt)]),
            Err(ExpressionError::UnexpectedPrefix {
                symbol: "√",
                position: 2
            })
        );
    }

    #[test]
    fn grouped_expression_is_accepted() {
        let tokens = [
            op(Lparen),
            n(2.0),
            op(Add),
            n(3.0),
            op(Rparen),
            op(Multiply),
            n(4.0),
        ];
        assert!(validate(&tokens).is_ok());
    }
}
