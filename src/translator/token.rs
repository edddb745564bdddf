//! Tokens and a tokenizer for SML source lines.

use logos::{Lexer, Logos, Span};

/// Enumeration of all tokens of an SML source line.
#[derive(Logos, Debug, PartialEq, Clone, Copy)]
pub enum Token<'a> {
    /// Errorneous token. Whitespace is skipped.
    #[error]
    #[regex(r"[ \t\r\n\f]+", logos::skip)]
    Error,

    /// A run of non-whitespace characters: a label, an opcode or an operand.
    #[regex(r"[^ \t\r\n\f]+", Lexer::slice)]
    Word(&'a str),
}

/// A word of a source line together with its byte range within the line.
#[derive(Debug, Clone, PartialEq)]
pub struct Word<'a> {
    pub text: &'a str,
    pub span: Span,
}

/// Splits a single line into its whitespace-delimited words.
pub fn words(line: &str) -> Vec<Word> {
    Token::lexer(line)
        .spanned()
        .filter_map(|(token, span)| match token {
            Token::Word(text) => Some(Word { text, span }),
            Token::Error => None,
        })
        .collect()
}

/// Returns the label name if `word` is a label definition (`name:`).
pub fn label_definition(word: &str) -> Option<&str> {
    match word.len() {
        0 | 1 => None,
        len if word.ends_with(':') => Some(&word[..len - 1]),
        _ => None,
    }
}
