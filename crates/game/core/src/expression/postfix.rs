use super::ExpressionError;
use super::operator::{Fixity, OperatorFn};
use super::token::{OperatorToken, Token};

/// Shunting-yard conversion from infix to postfix.
///
/// Prefix operators wait on the stack for their operand; postfix operators go
/// straight to the output because their operand is already there. An infix
/// operator pops stacked operators of higher precedence, and of equal
/// precedence unless it is right-associative, stopping at `(`.
///
/// Expects a sequence that passed [`validate`](super::validate); leftover `(`
/// are discarded rather than emitted.
pub fn to_postfix(tokens: &[Token]) -> Vec<Token> {
    let mut output = Vec::with_capacity(tokens.len());
    let mut stack: Vec<OperatorToken> = Vec::new();

    for token in tokens {
        let op = match token {
            Token::Number(_) => {
                output.push(*token);
                continue;
            }
            Token::Operator(op) => *op,
        };

        let def = op.op.definition();
        match def.fixity {
            Fixity::OpenParen | Fixity::Prefix => stack.push(op),
            Fixity::Postfix => output.push(Token::Operator(op)),
            Fixity::CloseParen => {
                while let Some(top) = stack.pop() {
                    if top.op.definition().fixity == Fixity::OpenParen {
                        break;
                    }
                    output.push(Token::Operator(top));
                }
            }
            Fixity::Infix => {
                while let Some(top) = stack.last() {
                    let top_def = top.op.definition();
                    if top_def.fixity == Fixity::OpenParen {
                        break;
                    }
                    let pops = top_def.precedence > def.precedence
                        || (top_def.precedence == def.precedence && !def.right_associative);
                    if !pops {
                        break;
                    }
                    output.push(Token::Operator(*top));
                    stack.pop();
                }
                stack.push(op);
            }
        }
    }

    while let Some(top) = stack.pop() {
        if top.op.definition().fixity != Fixity::OpenParen {
            output.push(Token::Operator(top));
        }
    }

    output
}

/// Evaluates a postfix sequence with a value stack.
///
/// Binary operators receive `(earlier, later)` operands. Any non-finite
/// intermediate fails the whole evaluation, naming the sub-operation.
pub fn evaluate_postfix(postfix: &[Token]) -> Result<f64, ExpressionError> {
    let mut stack: Vec<f64> = Vec::with_capacity(postfix.len());

    for token in postfix {
        let op = match token {
            Token::Number(number) => {
                stack.push(number.value);
                continue;
            }
            Token::Operator(op) => op,
        };

        let def = op.op.definition();
        match def.apply {
            OperatorFn::Unary(apply) => {
                let a = stack.pop().ok_or(ExpressionError::NotEnoughOperands)?;
                let value = apply(a);
                if !value.is_finite() {
                    return Err(ExpressionError::InvalidUnary {
                        symbol: def.symbol,
                        operand: a,
                    });
                }
                stack.push(value);
            }
            OperatorFn::Binary(apply) => {
                let (Some(b), Some(a)) = (stack.pop(), stack.pop()) else {
                    return Err(ExpressionError::NotEnoughOperands);
                };
                let value = apply(a, b);
                if !value.is_finite() {
                    return Err(ExpressionError::InvalidBinary {
                        lhs: a,
                        symbol: def.symbol,
                        rhs: b,
                    });
                }
                stack.push(value);
            }
            OperatorFn::Grouping => return Err(ExpressionError::InvalidStructure),
        }
    }

    match stack.as_slice() {
        [value] => Ok(*value),
        _ => Err(ExpressionError::InvalidStructure),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expression::OperatorId::{self, *};

    fn n(value: f64) -> Token {
        Token::number(value)
    }

    fn op(id: OperatorId) -> Token {
        Token::op(id)
    }

    fn run(tokens: &[Token]) -> Result<f64, ExpressionError> {
        evaluate_postfix(&to_postfix(tokens))
    }

    #[test]
    fn multiplication_binds_tighter_than_addition() {
        assert_eq!(run(&[n(2.0), op(Add), n(3.0), op(Multiply), n(4.0)]), Ok(14.0));
    }

    #[test]
    fn subtraction_is_left_associative() {
        assert_eq!(
            run(&[n(10.0), op(Subtract), n(3.0), op(Subtract), n(2.0)]),
            Ok(5.0)
        );
        assert_eq!(run(&[n(12.0), op(Divide), n(3.0), op(Divide), n(2.0)]), Ok(2.0));
    }

    #[test]
    fn power_is_right_associative() {
        assert_eq!(run(&[n(2.0), op(Power), n(3.0), op(Power), n(2.0)]), Ok(512.0));
    }

    #[test]
    fn parentheses_override_precedence() {
        let tokens = [
            op(Lparen),
            n(2.0),
            op(Add),
            n(3.0),
            op(Rparen),
            op(Multiply),
            n(4.0),
        ];
        assert_eq!(run(&tokens), Ok(20.0));
    }

    #[test]
    fn prefix_binds_to_the_following_value() {
        assert_eq!(run(&[op(Sqrt), n(16.0), op(Add), n(1.0)]), Ok(5.0));
        assert_eq!(run(&[op(Negate), n(3.0), op(Multiply), n(2.0)]), Ok(-6.0));
    }

    #[test]
    fn postfix_binds_to_the_preceding_value() {
        assert_eq!(run(&[n(2.0), op(Add), n(3.0), op(Factorial)]), Ok(8.0));
        assert_eq!(run(&[n(3.0), op(Square), op(Triangle)]), Ok(45.0));
    }

    #[test]
    fn domain_failures_name_the_operation() {
        let err = run(&[n(5.0), op(Divide), n(0.0)]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid operation: 5 ÷ 0");
        let err = run(&[op(Sqrt), op(Negate), n(4.0)]).unwrap_err();
        assert_eq!(err.to_string(), "Invalid operation: √(-4)");
    }

    #[test]
    fn malformed_postfix_is_reported() {
        assert_eq!(
            evaluate_postfix(&[n(1.0), op(Add)]),
            Err(ExpressionError::NotEnoughOperands)
        );
        assert_eq!(
            evaluate_postfix(&[n(1.0), n(2.0)]),
            Err(ExpressionError::InvalidStructure)
        );
    }

    #[test]
    fn leftover_open_parens_are_dropped() {
        let postfix = to_postfix(&[op(Lparen), n(1.0), op(Add), n(2.0)]);
        assert_eq!(postfix, vec![n(1.0), n(2.0), op(Add)]);
    }
}
