pub mod token;
pub use token::is_keyword;

use logos::Logos;
use crate::diagnostics::RewriteError;
use crate::span::{Span, Spanned};
use token::Token;

pub fn lex(source: &str) -> Result<Vec<Spanned<Token>>, RewriteError> {
    let mut tokens = Vec::new();
    let mut lexer = Token::lexer(source);

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(tok) => tokens.push(Spanned::new(tok, Span::new(span.start, span.end))),
            Err(()) => {
                let text = &source[span.start..span.end];
                let msg = if text.starts_with('"') {
                    "unterminated string literal".to_string()
                } else {
                    format!("unexpected character '{text}'")
                };
                return Err(RewriteError::syntax(msg, Span::new(span.start, span.end)));
            }
        }
    }

    // `1.2.3` would otherwise lex as FloatLit(1.2) + Dot + IntLit(3)
    for pair in tokens.windows(2) {
        if pair[0].node == Token::FloatLit
            && pair[1].node == Token::Dot
            && pair[0].span.end == pair[1].span.start
        {
            return Err(RewriteError::syntax(
                "invalid number format: multiple decimal points",
                pair[0].span.to(pair[1].span),
            ));
        }
    }

    Ok(tokens)
}
