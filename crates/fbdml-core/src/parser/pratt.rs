//! Pratt binding powers for value expressions.

use crate::lexer::TokenKind;

/// Binding power of the postfix `COLLATE collation` clause.
pub const COLLATE_BINDING_POWER: u8 = 9;

/// Returns the prefix binding power for a unary operator.
///
/// Returns `None` if the token is not a unary operator.
#[must_use]
pub const fn prefix_binding_power(kind: &TokenKind) -> Option<u8> {
    match kind {
        TokenKind::Plus | TokenKind::Minus => Some(7),
        _ => None,
    }
}

/// Returns the infix binding power for a token.
///
/// Returns `(left_bp, right_bp)`; all operators here are left associative.
/// Returns `None` if the token is not an infix operator.
#[must_use]
pub const fn infix_binding_power(kind: &TokenKind) -> Option<(u8, u8)> {
    match kind {
        TokenKind::Concat => Some((1, 2)),
        TokenKind::Plus | TokenKind::Minus => Some((3, 4)),
        TokenKind::Star | TokenKind::Slash => Some((5, 6)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precedence_order() {
        let concat = infix_binding_power(&TokenKind::Concat).map(|(l, _)| l);
        let add = infix_binding_power(&TokenKind::Plus).map(|(l, _)| l);
        let mul = infix_binding_power(&TokenKind::Star).map(|(l, _)| l);
        assert!(concat < add);
        assert!(add < mul);
        assert!(mul < prefix_binding_power(&TokenKind::Minus));
        assert!(prefix_binding_power(&TokenKind::Minus) < Some(COLLATE_BINDING_POWER));
    }

    #[test]
    fn test_left_associative() {
        for kind in [TokenKind::Concat, TokenKind::Minus, TokenKind::Slash] {
            let (l, r) = infix_binding_power(&kind).unwrap();
            assert!(l < r);
        }
    }

    #[test]
    fn test_non_operators() {
        assert_eq!(infix_binding_power(&TokenKind::Comma), None);
        assert_eq!(infix_binding_power(&TokenKind::Eq), None);
        assert_eq!(prefix_binding_power(&TokenKind::Star), None);
    }
}
