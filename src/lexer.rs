use crate::error::BwwError;
use std::borrow::Cow;

/// Token types for BWW documents
#[derive(Debug, Clone, PartialEq)]
pub enum Token {
    /// A whole `Bagpipe Reader:1.0` style version line
    Version(String),
    /// A quoted string, already unescaped
    Str(String),
    /// Any other run of non-separator characters: glyphs, names, values
    Word(String),
    Comma,
    LeftParen,
    RightParen,
}

/// A token with its position in the source
#[derive(Debug, Clone)]
pub struct LocatedToken {
    pub token: Token,
    pub line: usize,
    pub column: usize,
    /// Byte offset of the first byte of the token in the original input
    pub offset: usize,
    /// Byte offset just past the token
    pub end: usize,
}

/// Decode raw input. Valid UTF-8 is used as is; anything else is read one
/// byte per character (Latin-1), which never fails. The flag tells the lexer
/// how to map characters back to byte offsets.
pub fn decode(bytes: &[u8]) -> (Cow<'_, str>, bool) {
    match std::str::from_utf8(bytes) {
        Ok(text) => (Cow::Borrowed(text), false),
        Err(_) => (Cow::Owned(bytes.iter().map(|&b| b as char).collect()), true),
    }
}

/// Lexer for tokenizing BWW source
pub struct Lexer<'a> {
    input: &'a str,
    chars: std::iter::Peekable<std::str::Chars<'a>>,
    line: usize,
    column: usize,
    position: usize,
    offset: usize,
    single_byte: bool,
    at_line_start: bool,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, single_byte: bool) -> Self {
        Self {
            input,
            chars: input.chars().peekable(),
            line: 1,
            column: 1,
            position: 0,
            offset: 0,
            single_byte,
            at_line_start: true,
        }
    }

    fn advance(&mut self) -> Option<char> {
        let c = self.chars.next()?;
        self.position += c.len_utf8();
        self.offset += if self.single_byte { 1 } else { c.len_utf8() };
        if c == '\n' {
            self.line += 1;
            self.column = 1;
            self.at_line_start = true;
        } else {
            self.column += 1;
        }
        Some(c)
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    fn error(&self, line: usize, column: usize, offset: usize, message: String) -> BwwError {
        BwwError::ParseError {
            line,
            column,
            offset,
            message,
        }
    }

    fn check_version_line(&self) -> bool {
        self.at_line_start && self.input[self.position..].starts_with("Bagpipe")
    }

    fn is_separator(c: char) -> bool {
        c.is_whitespace() || matches!(c, ',' | '(' | ')' | '"')
    }

    pub fn tokenize(&mut self) -> Result<Vec<LocatedToken>, BwwError> {
        let mut tokens = Vec::new();

        if let Some(&'\u{feff}') = self.peek() {
            self.advance();
            // the mark is not part of any token
            self.column = 1;
        }

        while let Some(&c) = self.peek() {
            let line = self.line;
            let column = self.column;
            let offset = self.offset;

            if c.is_whitespace() {
                self.advance();
                continue;
            }

            if self.check_version_line() {
                let start = self.position;
                while let Some(&ch) = self.peek() {
                    if ch == '\n' {
                        break;
                    }
                    self.advance();
                }
                let text = self.input[start..self.position].trim_end().to_string();
                self.at_line_start = false;
                tokens.push(LocatedToken {
                    token: Token::Version(text),
                    line,
                    column,
                    offset,
                    end: self.offset,
                });
                continue;
            }
            self.at_line_start = false;

            let token = match c {
                ',' => {
                    self.advance();
                    Token::Comma
                }
                '(' => {
                    self.advance();
                    Token::LeftParen
                }
                ')' => {
                    self.advance();
                    Token::RightParen
                }
                '"' => {
                    self.advance();
                    let mut text = String::new();
                    loop {
                        match self.advance() {
                            Some('"') => break,
                            Some('\\') => match self.peek() {
                                Some(&'"') | Some(&'\\') => {
                                    if let Some(escaped) = self.advance() {
                                        text.push(escaped);
                                    }
                                }
                                _ => text.push('\\'),
                            },
                            Some('\n') | None => {
                                return Err(self.error(
                                    line,
                                    column,
                                    offset,
                                    "Unterminated string literal".to_string(),
                                ));
                            }
                            Some(ch) => text.push(ch),
                        }
                    }
                    Token::Str(text)
                }
                _ => {
                    let start = self.position;
                    while let Some(&ch) = self.peek() {
                        if Self::is_separator(ch) {
                            break;
                        }
                        self.advance();
                    }
                    Token::Word(self.input[start..self.position].to_string())
                }
            };

            tokens.push(LocatedToken {
                token,
                line,
                column,
                offset,
                end: self.offset,
            });
        }

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> Vec<Token> {
        let mut lexer = Lexer::new(source, false);
        lexer
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    fn word(s: &str) -> Token {
        Token::Word(s.to_string())
    }

    #[test]
    fn test_staff_words() {
        assert_eq!(
            lex("& sharpf sharpc 4_4 I!''  LA_4\n!t"),
            vec![
                word("&"),
                word("sharpf"),
                word("sharpc"),
                word("4_4"),
                word("I!''"),
                word("LA_4"),
                word("!t"),
            ]
        );
    }

    #[test]
    fn test_config_line() {
        assert_eq!(
            lex("TuneTempo,90\nFontSizes,(90,100)"),
            vec![
                word("TuneTempo"),
                Token::Comma,
                word("90"),
                word("FontSizes"),
                Token::Comma,
                Token::LeftParen,
                word("90"),
                Token::Comma,
                word("100"),
                Token::RightParen,
            ]
        );
    }

    #[test]
    fn test_description_line() {
        assert_eq!(
            lex("\"Scotland \\\"the\\\" Brave\",(T,L,0,0,Times New Roman)"),
            vec![
                Token::Str("Scotland \"the\" Brave".to_string()),
                Token::Comma,
                Token::LeftParen,
                word("T"),
                Token::Comma,
                word("L"),
                Token::Comma,
                word("0"),
                Token::Comma,
                word("0"),
                Token::Comma,
                word("Times"),
                word("New"),
                word("Roman"),
                Token::RightParen,
            ]
        );
    }

    #[test]
    fn test_version_line() {
        assert_eq!(
            lex("Bagpipe Reader:1.0\r\nTuneTempo,80"),
            vec![
                Token::Version("Bagpipe Reader:1.0".to_string()),
                word("TuneTempo"),
                Token::Comma,
                word("80"),
            ]
        );
    }

    #[test]
    fn test_bagpipe_inside_a_line_is_a_word() {
        assert_eq!(lex("& Bagpipe"), vec![word("&"), word("Bagpipe")]);
    }

    #[test]
    fn test_positions() {
        let mut lexer = Lexer::new("&\n  LA_4", false);
        let tokens = lexer.tokenize().unwrap();
        assert_eq!((tokens[1].line, tokens[1].column), (2, 3));
        assert_eq!((tokens[1].offset, tokens[1].end), (4, 8));
    }

    #[test]
    fn test_unterminated_string() {
        let mut lexer = Lexer::new("\"Amazing Grace,(T)", false);
        match lexer.tokenize() {
            Err(BwwError::ParseError { line, column, message, .. }) => {
                assert_eq!((line, column), (1, 1));
                assert!(message.contains("Unterminated"));
            }
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_latin1_offsets() {
        let bytes = b"\"Caf\xe9\",(T) & LA_4";
        let (text, single_byte) = decode(bytes);
        assert!(single_byte);
        let tokens = Lexer::new(&text, single_byte).tokenize().unwrap();
        assert_eq!(tokens[0].token, Token::Str("Caf\u{e9}".to_string()));
        let last = tokens.last().unwrap();
        assert_eq!(&bytes[last.offset..last.end], b"LA_4");
    }
}
