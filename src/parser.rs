use crate::error::BwwError;
use crate::grammar::*;
use crate::lexer::{decode, Lexer, LocatedToken, Token};

/// Parse a BWW document into its raw tree.
///
/// The input is decoded as UTF-8 when valid and as Latin-1 otherwise. Any
/// grammar violation aborts the whole document.
pub fn parse(bytes: &[u8]) -> Result<RawTree, BwwError> {
    let (text, single_byte) = decode(bytes);
    let tokens = Lexer::new(&text, single_byte).tokenize()?;
    let mut parser = Parser::new(tokens);
    let tree = parser.parse_document()?;
    log::debug!("parsed {} tune(s)", tree.tunes.len());
    Ok(tree)
}

/// What a header parameter found inside a tune body means for that tune.
enum BodyParam {
    /// The parameter belongs to the next tune; leave it unconsumed.
    NextTune,
    Item(BodyItem),
}

/// Parser for BWW token streams
pub struct Parser {
    tokens: Vec<LocatedToken>,
    position: usize,
}

impl Parser {
    pub fn new(tokens: Vec<LocatedToken>) -> Self {
        Self {
            tokens,
            position: 0,
        }
    }

    fn current(&self) -> Option<&LocatedToken> {
        self.tokens.get(self.position)
    }

    fn peek_token(&self, ahead: usize) -> Option<&Token> {
        self.tokens.get(self.position + ahead).map(|t| &t.token)
    }

    fn advance(&mut self) -> Option<&LocatedToken> {
        let token = self.tokens.get(self.position);
        self.position += 1;
        token
    }

    fn error_here(&self, message: String) -> BwwError {
        let located = self.current().or_else(|| self.tokens.last());
        match located {
            Some(t) => BwwError::ParseError {
                line: t.line,
                column: t.column,
                offset: if self.current().is_some() { t.offset } else { t.end },
                message,
            },
            None => BwwError::ParseError {
                line: 1,
                column: 1,
                offset: 0,
                message,
            },
        }
    }

    fn expect_comma(&mut self, after: &str) -> Result<(), BwwError> {
        match self.current().map(|t| &t.token) {
            Some(Token::Comma) => {
                self.advance();
                Ok(())
            }
            _ => Err(self.error_here(format!("Expected ',' after {}", after))),
        }
    }

    /// A version line, a quoted description or `Name,`.
    fn at_header_param(&self) -> bool {
        match self.peek_token(0) {
            Some(Token::Version(_)) | Some(Token::Str(_)) => true,
            Some(Token::Word(_)) => matches!(self.peek_token(1), Some(Token::Comma)),
            _ => false,
        }
    }

    pub fn parse_document(&mut self) -> Result<RawTree, BwwError> {
        let mut tunes = Vec::new();
        while self.current().is_some() {
            tunes.push(self.parse_tune()?);
        }
        Ok(RawTree { tunes })
    }

    fn parse_tune(&mut self) -> Result<RawTune, BwwError> {
        let start = self.current().map(|t| t.offset).unwrap_or(0);
        let mut tune = RawTune::default();

        while self.at_header_param() {
            tune.header.push(self.parse_header_param()?);
        }

        let mut staff: Option<Staff> = None;
        while let Some(located) = self.current() {
            if self.at_header_param() {
                let saved_position = self.position;
                match self.parse_body_param()? {
                    BodyParam::NextTune => {
                        self.position = saved_position;
                        break;
                    }
                    BodyParam::Item(item) => {
                        if let Some(s) = staff.take() {
                            tune.body.push(BodyItem::Staff(s));
                        }
                        tune.body.push(item);
                    }
                }
                continue;
            }

            let word = match &located.token {
                Token::Word(w) => w.clone(),
                other => return Err(self.error_here(format!("Unexpected {:?}", other))),
            };
            let kind = classify(&word)
                .ok_or_else(|| self.error_here(format!("Unknown glyph '{}'", word)))?;
            let glyph = Glyph {
                kind,
                text: word,
                line: located.line,
                column: located.column,
            };
            self.advance();

            if kind == GlyphKind::Clef {
                if let Some(s) = staff.take() {
                    tune.body.push(BodyItem::Staff(s));
                }
            }
            staff.get_or_insert_with(Staff::default).glyphs.push(glyph);
        }
        if let Some(s) = staff.take() {
            tune.body.push(BodyItem::Staff(s));
        }

        let end = self
            .position
            .checked_sub(1)
            .and_then(|last| self.tokens.get(last))
            .map(|t| t.end)
            .unwrap_or(start);
        tune.span = start..end;
        Ok(tune)
    }

    /// A header parameter met after the body has started.
    fn parse_body_param(&mut self) -> Result<BodyParam, BwwError> {
        let param = self.parse_header_param()?;
        Ok(match param {
            HeaderParam::Version { .. } | HeaderParam::Config { .. } => BodyParam::NextTune,
            HeaderParam::Tempo { value } => {
                if self.at_header_param() {
                    BodyParam::NextTune
                } else {
                    BodyParam::Item(BodyItem::Tempo { value })
                }
            }
            HeaderParam::Description(d) => {
                if d.tag() == Some("T") {
                    BodyParam::NextTune
                } else {
                    BodyParam::Item(BodyItem::Description(d))
                }
            }
        })
    }

    fn parse_header_param(&mut self) -> Result<HeaderParam, BwwError> {
        let token = self.current().map(|t| t.token.clone());
        match token {
            Some(Token::Version(text)) => {
                self.advance();
                Ok(HeaderParam::Version { text })
            }
            Some(Token::Str(text)) => {
                self.advance();
                self.expect_comma("description text")?;
                let fields = self.parse_values()?;
                Ok(HeaderParam::Description(Description { text, fields }))
            }
            Some(Token::Word(name)) => {
                self.advance();
                self.expect_comma(&name)?;
                let values = self.parse_values()?;
                if name == "TuneTempo" {
                    Ok(HeaderParam::Tempo {
                        value: values.join(","),
                    })
                } else {
                    Ok(HeaderParam::Config { name, values })
                }
            }
            _ => Err(self.error_here("Expected a header parameter".to_string())),
        }
    }

    /// `(v1,v2 with spaces,v3)` or a single word.
    fn parse_values(&mut self) -> Result<Vec<String>, BwwError> {
        let token = self.current().map(|t| t.token.clone());
        match token {
            Some(Token::LeftParen) => {
                self.advance();
            }
            Some(Token::Word(value)) | Some(Token::Str(value)) => {
                self.advance();
                return Ok(vec![value]);
            }
            _ => return Err(self.error_here("Expected a value".to_string())),
        }

        let mut values = Vec::new();
        let mut words: Vec<String> = Vec::new();
        loop {
            let token = self.current().map(|t| t.token.clone());
            match token {
                Some(Token::Word(w)) | Some(Token::Str(w)) => {
                    self.advance();
                    words.push(w);
                }
                Some(Token::Comma) => {
                    self.advance();
                    values.push(words.join(" "));
                    words.clear();
                }
                Some(Token::RightParen) => {
                    self.advance();
                    values.push(words.join(" "));
                    return Ok(values);
                }
                Some(_) => {
                    return Err(self.error_here("Unexpected token in value list".to_string()));
                }
                None => {
                    return Err(self.error_here("Unterminated value list".to_string()));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "Bagpipe Reader:1.0\n\
        MIDINoteMappings,(54,56,58,59,61,63,64,66,68,56,58,60,61,63,65,66,68,70)\n\
        TuneFormat,(1,0,F,L,500,500,500,500,P,0,0)\n\
        TuneTempo,90\n\
        \"Scotland the Brave\",(T,L,0,0,Times New Roman,16,700,0,0,18,0,0,0)\n\
        \"March\",(Y,C,0,0,Times New Roman,14,400,0,0,18,0,0,0)\n";

    #[test]
    fn test_header_params() {
        let source = format!("{}& sharpf sharpc 4_4 LA_4 !t\n", HEADER);
        let tree = parse(source.as_bytes()).unwrap();
        assert_eq!(tree.tunes.len(), 1);

        let tune = &tree.tunes[0];
        assert_eq!(tune.header.len(), 6);
        assert!(matches!(&tune.header[0], HeaderParam::Version { text } if text == "Bagpipe Reader:1.0"));
        match &tune.header[2] {
            HeaderParam::Config { name, values } => {
                assert_eq!(name, "TuneFormat");
                assert_eq!(values.len(), 11);
                assert_eq!(values[2], "F");
            }
            other => panic!("Expected config, got {:?}", other),
        }
        assert!(matches!(&tune.header[3], HeaderParam::Tempo { value } if value == "90"));
        match &tune.header[4] {
            HeaderParam::Description(d) => {
                assert_eq!(d.text, "Scotland the Brave");
                assert_eq!(d.tag(), Some("T"));
                assert_eq!(d.fields[4], "Times New Roman");
            }
            other => panic!("Expected description, got {:?}", other),
        }
        assert_eq!(tune.title(), Some("Scotland the Brave"));
    }

    #[test]
    fn test_staves() {
        let source = "TuneTempo,80\n& 4_4 LA_4 !\n& B_4 !t\n";
        let tree = parse(source.as_bytes()).unwrap();
        let body = &tree.tunes[0].body;
        assert_eq!(body.len(), 2);
        match &body[0] {
            BodyItem::Staff(staff) => {
                let kinds: Vec<GlyphKind> = staff.glyphs.iter().map(|g| g.kind).collect();
                assert_eq!(
                    kinds,
                    vec![
                        GlyphKind::Clef,
                        GlyphKind::TimeSignature,
                        GlyphKind::Melody,
                        GlyphKind::Barline
                    ]
                );
                assert_eq!((staff.glyphs[2].line, staff.glyphs[2].column), (2, 7));
            }
            other => panic!("Expected staff, got {:?}", other),
        }
    }

    #[test]
    fn test_multiple_tunes_and_spans() {
        let source = "\"One\",(T,L)\n& LA_4 !t\n\"Two\",(T,L)\nTuneTempo,70\n& B_4 !t\n";
        let tree = parse(source.as_bytes()).unwrap();
        assert_eq!(tree.tunes.len(), 2);
        assert_eq!(tree.tunes[0].title(), Some("One"));
        assert_eq!(tree.tunes[1].title(), Some("Two"));
        assert_eq!(&source[tree.tunes[0].span.clone()], "\"One\",(T,L)\n& LA_4 !t");
        assert_eq!(
            &source[tree.tunes[1].span.clone()],
            "\"Two\",(T,L)\nTuneTempo,70\n& B_4 !t"
        );
    }

    #[test]
    fn test_tempo_change_in_body() {
        let source = "TuneTempo,80\n& LA_4 !\nTuneTempo,100\n& B_4 !t\n";
        let tree = parse(source.as_bytes()).unwrap();
        assert_eq!(tree.tunes.len(), 1);
        let body = &tree.tunes[0].body;
        assert_eq!(body.len(), 3);
        assert!(matches!(&body[1], BodyItem::Tempo { value } if value == "100"));
    }

    #[test]
    fn test_tempo_followed_by_header_starts_new_tune() {
        let source = "TuneTempo,80\n& LA_4 !t\nTuneTempo,100\n\"Next\",(T,L)\n& B_4 !t\n";
        let tree = parse(source.as_bytes()).unwrap();
        assert_eq!(tree.tunes.len(), 2);
        assert_eq!(tree.tunes[1].header.len(), 2);
    }

    #[test]
    fn test_inline_description_stays_in_body() {
        let source = "\"Tune\",(T,L)\n& LA_4 !t\n\"2nd time only\",(I,L)\n& B_4 !t\n";
        let tree = parse(source.as_bytes()).unwrap();
        assert_eq!(tree.tunes.len(), 1);
        assert!(matches!(&tree.tunes[0].body[1], BodyItem::Description(d) if d.tag() == Some("I")));
    }

    #[test]
    fn test_unknown_glyph() {
        match parse(b"TuneTempo,80\n& LA_4 xyz !t") {
            Err(BwwError::ParseError { line, column, offset, message }) => {
                assert_eq!((line, column, offset), (2, 8, 20));
                assert_eq!(message, "Unknown glyph 'xyz'");
            }
            other => panic!("Expected ParseError, got {:?}", other),
        }
    }

    #[test]
    fn test_broken_header() {
        assert!(matches!(
            parse(b"\"Title\" & LA_4"),
            Err(BwwError::ParseError { .. })
        ));
        assert!(matches!(
            parse(b"FontSizes,(90,100"),
            Err(BwwError::ParseError { .. })
        ));
        assert!(matches!(
            parse(b"& LA_4 ) !t"),
            Err(BwwError::ParseError { .. })
        ));
    }

    #[test]
    fn test_empty_document() {
        assert_eq!(parse(b"").unwrap(), RawTree::default());
        assert_eq!(parse(b"  \n\t").unwrap(), RawTree::default());
    }
}
