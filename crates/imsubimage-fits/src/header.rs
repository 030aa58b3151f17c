//! Header card parsing and serialization.

use std::str;

use crate::block::{pad_to_block, BLOCK_SIZE, CARD_SIZE, HEADER_PAD_BYTE};
use crate::error::{Error, Result};
use crate::value::{format_value, parse_value, Value};

/// One 80-byte keyword record.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    /// Keyword, ASCII, left-justified, space-padded.
    pub keyword: [u8; 8],
    pub value: Option<Value>,
    pub comment: Option<String>,
}

/// Pad a keyword name to 8 bytes.
pub const fn keyword(name: &[u8]) -> [u8; 8] {
    let mut kw = [b' '; 8];
    let mut i = 0;
    while i < name.len() && i < 8 {
        kw[i] = name[i];
        i += 1;
    }
    kw
}

const END: [u8; 8] = keyword(b"END");

/// Free text bytes after a commentary keyword.
pub const COMMENTARY_TEXT_LEN: usize = CARD_SIZE - 8;
const COMMENTARY: [[u8; 8]; 3] = [keyword(b"COMMENT"), keyword(b"HISTORY"), [b' '; 8]];

impl Card {
    pub fn new(name: &str, value: Value) -> Self {
        Card {
            keyword: keyword(name.as_bytes()),
            value: Some(value),
            comment: None,
        }
    }

    pub fn history(text: &str) -> Self {
        Card {
            keyword: keyword(b"HISTORY"),
            value: None,
            comment: Some(text.to_string()),
        }
    }

    /// HISTORY cards carrying `text`, split so no card truncates it.
    pub fn history_lines(text: &str) -> Vec<Card> {
        let mut cards = Vec::new();
        let mut rest = text;
        while rest.len() > COMMENTARY_TEXT_LEN {
            let mut split = COMMENTARY_TEXT_LEN;
            while !rest.is_char_boundary(split) {
                split -= 1;
            }
            let (head, tail) = rest.split_at(split);
            cards.push(Card::history(head));
            rest = tail;
        }
        cards.push(Card::history(rest));
        cards
    }

    pub fn with_comment(mut self, comment: &str) -> Self {
        self.comment = Some(comment.to_string());
        self
    }

    /// The keyword without trailing spaces.
    pub fn keyword_str(&self) -> &str {
        str::from_utf8(&self.keyword).unwrap_or("").trim_end()
    }

    pub fn is_end(&self) -> bool {
        self.keyword == END
    }

    pub fn is_commentary(&self) -> bool {
        COMMENTARY.contains(&self.keyword)
    }
}

fn free_text(bytes: &[u8]) -> Result<Option<String>> {
    let text = str::from_utf8(bytes)
        .map_err(|_| Error::InvalidHeader("card is not ASCII"))?
        .trim_end();
    Ok((!text.is_empty()).then(|| text.to_string()))
}

/// Parse a single 80-byte card.
pub fn parse_card(bytes: &[u8; CARD_SIZE]) -> Result<Card> {
    let mut kw = [b' '; 8];
    kw.copy_from_slice(&bytes[..8]);
    if !kw
        .iter()
        .all(|b| matches!(b, b'A'..=b'Z' | b'0'..=b'9' | b' ' | b'-' | b'_'))
    {
        return Err(Error::InvalidKeyword);
    }

    let mut card = Card {
        keyword: kw,
        value: None,
        comment: None,
    };
    if card.is_end() {
        return Ok(card);
    }
    if card.is_commentary() || &bytes[8..10] != b"= " {
        card.comment = free_text(&bytes[8..])?;
        return Ok(card);
    }
    match parse_value(&bytes[10..]) {
        Some((value, comment)) => {
            card.value = Some(value);
            card.comment = comment.map(str::to_string);
        }
        None => {
            let field = str::from_utf8(&bytes[10..])
                .map_err(|_| Error::InvalidHeader("card is not ASCII"))?;
            card.comment = field
                .split_once('/')
                .and_then(|(_, c)| free_text(c.trim_start().as_bytes()).ok().flatten());
        }
    }
    Ok(card)
}

/// A parsed header: its cards up to and including END, and its byte length.
#[derive(Debug, Clone, PartialEq)]
pub struct Header {
    pub cards: Vec<Card>,
    /// Bytes occupied in the stream, a whole number of blocks.
    pub byte_len: usize,
}

impl Header {
    pub fn find(&self, name: &str) -> Option<&Card> {
        let kw = keyword(name.as_bytes());
        self.cards.iter().find(|c| c.keyword == kw)
    }

    pub fn value(&self, name: &str) -> Option<&Value> {
        self.find(name).and_then(|c| c.value.as_ref())
    }

    /// A mandatory integer keyword.
    pub fn required_integer(&self, name: &'static str) -> Result<i64> {
        self.value(name)
            .ok_or(Error::MissingKeyword(name))?
            .as_integer()
            .ok_or(Error::InvalidHeader("expected an integer value"))
    }

    pub fn float_or(&self, name: &str, default: f64) -> f64 {
        self.value(name).and_then(Value::as_float).unwrap_or(default)
    }
}

/// Parse consecutive header blocks until the END card.
///
/// Only whole blocks are scanned.
pub fn parse_header_blocks(data: &[u8]) -> Result<Header> {
    let mut cards = Vec::new();
    for (block_idx, block) in data.chunks_exact(BLOCK_SIZE).enumerate() {
        for chunk in block.chunks_exact(CARD_SIZE) {
            let bytes: &[u8; CARD_SIZE] = chunk
                .try_into()
                .map_err(|_| Error::InvalidHeader("short card"))?;
            let card = parse_card(bytes)?;
            let is_end = card.is_end();
            cards.push(card);
            if is_end {
                return Ok(Header {
                    cards,
                    byte_len: (block_idx + 1) * BLOCK_SIZE,
                });
            }
        }
    }
    Err(Error::UnexpectedEof)
}

/// Serialize one card to its 80-byte image.
pub fn format_card(card: &Card) -> [u8; CARD_SIZE] {
    let mut buf = [b' '; CARD_SIZE];
    buf[..8].copy_from_slice(&card.keyword);
    match (&card.value, &card.comment) {
        (Some(value), comment) => {
            buf[8..10].copy_from_slice(b"= ");
            let field = format_value(value);
            buf[10..].copy_from_slice(&field);
            if let Some(comment) = comment {
                insert_comment(&mut buf[10..], comment);
            }
        }
        (None, Some(text)) => {
            let len = text.len().min(COMMENTARY_TEXT_LEN);
            buf[8..8 + len].copy_from_slice(&text.as_bytes()[..len]);
        }
        (None, None) => {}
    }
    buf
}

/// Append ` / comment` after the value in a 70-byte field.
fn insert_comment(field: &mut [u8], comment: &str) {
    let content_end = if field[0] == b'\'' {
        field.iter().rposition(|&b| b == b'\'').map_or(20, |i| i + 1)
    } else {
        20
    };
    let start = content_end + 3;
    if start >= field.len() {
        return;
    }
    field[content_end + 1] = b'/';
    let len = comment.len().min(field.len() - start);
    field[start..start + len].copy_from_slice(&comment.as_bytes()[..len]);
}

/// Serialize cards into whole header blocks, appending END.
pub fn serialize_header(cards: &[Card]) -> Vec<u8> {
    let mut buf = Vec::with_capacity((cards.len() + 1) * CARD_SIZE);
    for card in cards {
        buf.extend_from_slice(&format_card(card));
    }
    let mut end = [b' '; CARD_SIZE];
    end[..8].copy_from_slice(&END);
    buf.extend_from_slice(&end);
    pad_to_block(&mut buf, HEADER_PAD_BYTE);
    buf
}
