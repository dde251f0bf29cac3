//! Rich-text runs from OmniGraffle labels.
//!
//! Labels are stored as RTF produced by the Cocoa text system, for example:
//!
//! ```text
//! {\rtf1\ansi\ansicpg1252\cocoartf949
//! {\fonttbl\f0\fswiss\fcharset0 Helvetica;}
//! {\colortbl;\red255\green255\blue255;\red255\green0\blue0;}
//! \pard\tx560\qc
//!
//! \f0\fs24 \cf2 Hello\
//! World}
//! ```
//!
//! [`extract_runs`] tokenizes the text up front and then interprets it lazily:
//! the returned [`Runs`] iterator yields one [`TextRun`] per visual line, each
//! carrying an SVG style fragment describing the character formatting in
//! effect where the line starts (fill color, font size, weight, slant).
//! Text that is not RTF is split into lines with an empty style.

use std::vec;

use log::trace;
use winnow::{
    Parser as _,
    ascii::digit1,
    combinator::{alt, opt, preceded, repeat},
    error::{ContextError, ErrMode},
    stream::AsChar,
    token::{any, one_of, take_while},
};

use crate::error::{ParseError, Result};

type IResult<O> = std::result::Result<O, ErrMode<ContextError>>;

/// Destination groups whose content is never rendered.
const SKIPPED_DESTINATIONS: &[&str] = &[
    "fonttbl",
    "stylesheet",
    "info",
    "pict",
    "header",
    "footer",
    "listtable",
    "listoverridetable",
    "expandedcolortbl",
    "filetbl",
    "revtbl",
    "generator",
    "NeXTGraphic",
];

/// One line of label text with its style fragment.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TextRun {
    text: String,
    style: String,
}

impl TextRun {
    pub fn new(text: impl Into<String>, style: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: style.into(),
        }
    }

    /// The visible characters of the line.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// The SVG style fragment, e.g. `fill:#ff0000;font-size:12px`. Empty when
    /// the line carries no explicit formatting.
    pub fn style(&self) -> &str {
        &self.style
    }
}

/// Splits label text into styled runs, one per line.
///
/// Each call starts a fresh iteration over `text`.
///
/// # Errors
///
/// Returns [`ParseError::InvalidRichText`] when RTF text cannot be tokenized
/// (for example a dangling backslash at the end).
///
/// # Examples
///
/// ```
/// # use graffle_parser::rtf::extract_runs;
/// let rtf = r"{\rtf1\ansi{\colortbl;\red255\green0\blue0;}\cf1\fs24 Hello\
/// World}";
/// let runs: Vec<_> = extract_runs(rtf).unwrap().collect();
/// assert_eq!(runs.len(), 2);
/// assert_eq!(runs[0].text(), "Hello");
/// assert_eq!(runs[0].style(), "fill:#ff0000;font-size:12px");
/// assert_eq!(runs[1].text(), "World");
/// ```
pub fn extract_runs(text: &str) -> Result<Runs<'_>> {
    let tokens = if text.trim_start().starts_with("{\\rtf") {
        tokenize(text)?
    } else {
        plain_tokens(text)
    };
    trace!(tokens = tokens.len(); "Tokenized label text");
    Ok(Runs::new(tokens))
}

// =============================================================================
// Tokenizer
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token<'a> {
    GroupStart,
    GroupEnd,
    ControlWord { name: &'a str, param: Option<i32> },
    Symbol(char),
    Hex(u8),
    /// A backslash followed by a newline: a paragraph break.
    LineBreak,
    /// A bare newline, which RTF ignores.
    Newline,
    Text(&'a str),
}

fn tokenize(input: &str) -> Result<Vec<Token<'_>>> {
    let mut remaining = input;
    let tokens: Vec<Token<'_>> = repeat(0.., token)
        .parse_next(&mut remaining)
        .map_err(|_| ParseError::InvalidRichText {
            offset: input.len() - remaining.len(),
        })?;

    if !remaining.is_empty() {
        return Err(ParseError::InvalidRichText {
            offset: input.len() - remaining.len(),
        });
    }
    Ok(tokens)
}

fn plain_tokens(text: &str) -> Vec<Token<'_>> {
    let mut tokens = Vec::new();
    for (index, line) in text.lines().enumerate() {
        if index > 0 {
            tokens.push(Token::LineBreak);
        }
        tokens.push(Token::Text(line));
    }
    tokens
}

fn token<'s>(input: &mut &'s str) -> IResult<Token<'s>> {
    alt((
        '{'.value(Token::GroupStart),
        '}'.value(Token::GroupEnd),
        preceded('\\', escape),
        one_of(['\r', '\n']).value(Token::Newline),
        take_while(1.., |c: char| !matches!(c, '\\' | '{' | '}' | '\r' | '\n')).map(Token::Text),
    ))
    .parse_next(input)
}

fn escape<'s>(input: &mut &'s str) -> IResult<Token<'s>> {
    alt((
        control_word,
        preceded('\'', take_while(2, AsChar::is_hex_digit))
            .map(|hex: &str| Token::Hex(u8::from_str_radix(hex, 16).unwrap_or(b'?'))),
        one_of(['\r', '\n']).value(Token::LineBreak),
        any.map(Token::Symbol),
    ))
    .parse_next(input)
}

fn control_word<'s>(input: &mut &'s str) -> IResult<Token<'s>> {
    let name = take_while(1.., AsChar::is_alpha).parse_next(input)?;
    let param = opt((opt('-'), digit1).take()).parse_next(input)?;
    // A single space after a control word is its delimiter, not text.
    opt(' ').parse_next(input)?;

    Ok(Token::ControlWord {
        name,
        param: param.and_then(|p: &str| p.parse().ok()),
    })
}

// =============================================================================
// Interpreter
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Destination {
    Body,
    ColorTable,
    Skip,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct CharFormat {
    color: Option<usize>,
    half_points: Option<i32>,
    bold: bool,
    italic: bool,
}

#[derive(Debug, Clone, Copy)]
struct GroupState {
    format: CharFormat,
    destination: Destination,
}

/// Lazy iterator over the lines of a label. Created by [`extract_runs`].
#[derive(Debug)]
pub struct Runs<'a> {
    tokens: vec::IntoIter<Token<'a>>,
    stack: Vec<GroupState>,
    state: GroupState,
    colors: Vec<Option<[u8; 3]>>,
    pending_color: [u8; 3],
    pending_color_set: bool,
    unicode_skip: usize,
    skip_pending: usize,
    at_group_start: bool,
    finished: bool,
}

impl<'a> Runs<'a> {
    fn new(tokens: Vec<Token<'a>>) -> Self {
        Self {
            tokens: tokens.into_iter(),
            stack: Vec::new(),
            state: GroupState {
                format: CharFormat::default(),
                destination: Destination::Body,
            },
            colors: Vec::new(),
            pending_color: [0; 3],
            pending_color_set: false,
            unicode_skip: 1,
            skip_pending: 0,
            at_group_start: false,
            finished: false,
        }
    }

    /// Applies one token. Returns `true` when the token ends the current line.
    fn step(&mut self, token: Token<'a>, line: &mut Line) -> bool {
        let at_group_start = std::mem::replace(&mut self.at_group_start, false);

        match token {
            Token::GroupStart => {
                self.stack.push(self.state);
                self.at_group_start = true;
            }
            Token::GroupEnd => {
                if let Some(state) = self.stack.pop() {
                    self.state = state;
                }
            }
            Token::Symbol('*') if at_group_start => {
                self.state.destination = Destination::Skip;
            }
            Token::ControlWord { name, param } => {
                return self.control_word(name, param, at_group_start, line);
            }
            _ if self.state.destination == Destination::Skip => {}
            Token::Text(text) => match self.state.destination {
                Destination::ColorTable => self.color_table_text(text),
                _ => self.push_text(text, line),
            },
            Token::Symbol(symbol) => match symbol {
                '\\' | '{' | '}' => self.push_char(symbol, line),
                '~' => self.push_char('\u{a0}', line),
                '_' => self.push_char('-', line),
                _ => {}
            },
            Token::Hex(byte) => self.push_char(cp1252(byte), line),
            Token::LineBreak => return self.state.destination == Destination::Body,
            Token::Newline => {}
        }
        false
    }

    fn control_word(
        &mut self,
        name: &str,
        param: Option<i32>,
        at_group_start: bool,
        line: &mut Line,
    ) -> bool {
        if at_group_start {
            if name == "colortbl" {
                self.state.destination = Destination::ColorTable;
                return false;
            }
            if SKIPPED_DESTINATIONS.contains(&name) {
                self.state.destination = Destination::Skip;
                return false;
            }
        }

        match self.state.destination {
            Destination::Skip => return false,
            Destination::ColorTable => {
                let channel = match name {
                    "red" => 0,
                    "green" => 1,
                    "blue" => 2,
                    _ => return false,
                };
                self.pending_color[channel] = param.unwrap_or(0).clamp(0, 255) as u8;
                self.pending_color_set = true;
                return false;
            }
            Destination::Body => {}
        }

        let format = &mut self.state.format;
        match name {
            "par" | "line" => return true,
            "plain" => *format = CharFormat::default(),
            "b" => format.bold = param != Some(0),
            "i" => format.italic = param != Some(0),
            "cf" => format.color = param.and_then(|p| usize::try_from(p).ok()),
            "fs" => format.half_points = param,
            "tab" => self.push_char('\t', line),
            "uc" => self.unicode_skip = param.and_then(|p| usize::try_from(p).ok()).unwrap_or(1),
            "u" => {
                if let Some(code) = param {
                    // Code points above 32767 are written as negative numbers.
                    let code = if code < 0 { code + 65536 } else { code };
                    let ch = u32::try_from(code)
                        .ok()
                        .and_then(char::from_u32)
                        .unwrap_or('\u{fffd}');
                    self.push_char(ch, line);
                    self.skip_pending = self.unicode_skip;
                }
            }
            "emdash" => self.push_char('\u{2014}', line),
            "endash" => self.push_char('\u{2013}', line),
            "bullet" => self.push_char('\u{2022}', line),
            "lquote" => self.push_char('\u{2018}', line),
            "rquote" => self.push_char('\u{2019}', line),
            "ldblquote" => self.push_char('\u{201c}', line),
            "rdblquote" => self.push_char('\u{201d}', line),
            _ => {}
        }
        false
    }

    fn color_table_text(&mut self, text: &str) {
        for _ in text.chars().filter(|c| *c == ';') {
            let entry = self.pending_color_set.then_some(self.pending_color);
            self.colors.push(entry);
            self.pending_color = [0; 3];
            self.pending_color_set = false;
        }
    }

    fn push_text(&mut self, text: &str, line: &mut Line) {
        for ch in text.chars() {
            self.push_char(ch, line);
        }
    }

    fn push_char(&mut self, ch: char, line: &mut Line) {
        if self.skip_pending > 0 {
            self.skip_pending -= 1;
            return;
        }
        if line.format.is_none() {
            line.format = Some(self.state.format);
        }
        line.text.push(ch);
    }

    fn finish_line(&self, line: Line) -> TextRun {
        let format = line.format.unwrap_or(self.state.format);
        TextRun::new(line.text, self.style_of(format))
    }

    fn style_of(&self, format: CharFormat) -> String {
        let mut parts = Vec::new();

        let color = format
            .color
            .and_then(|index| self.colors.get(index).copied().flatten());
        if let Some([r, g, b]) = color {
            parts.push(format!("fill:#{r:02x}{g:02x}{b:02x}"));
        }
        if let Some(half_points) = format.half_points {
            parts.push(format!("font-size:{}px", half_points as f32 / 2.0));
        }
        if format.bold {
            parts.push("font-weight:bold".to_string());
        }
        if format.italic {
            parts.push("font-style:italic".to_string());
        }

        parts.join(";")
    }
}

#[derive(Debug, Default)]
struct Line {
    text: String,
    format: Option<CharFormat>,
}

/// Decodes a `\'hh` byte as Windows-1252, the code page Cocoa writes
/// (`\ansicpg1252`). Bytes the code page leaves undefined map to the
/// matching C1 control.
fn cp1252(byte: u8) -> char {
    match byte {
        0x80 => '\u{20ac}',
        0x82 => '\u{201a}',
        0x83 => '\u{0192}',
        0x84 => '\u{201e}',
        0x85 => '\u{2026}',
        0x86 => '\u{2020}',
        0x87 => '\u{2021}',
        0x88 => '\u{02c6}',
        0x89 => '\u{2030}',
        0x8a => '\u{0160}',
        0x8b => '\u{2039}',
        0x8c => '\u{0152}',
        0x8e => '\u{017d}',
        0x91 => '\u{2018}',
        0x92 => '\u{2019}',
        0x93 => '\u{201c}',
        0x94 => '\u{201d}',
        0x95 => '\u{2022}',
        0x96 => '\u{2013}',
        0x97 => '\u{2014}',
        0x98 => '\u{02dc}',
        0x99 => '\u{2122}',
        0x9a => '\u{0161}',
        0x9b => '\u{203a}',
        0x9c => '\u{0153}',
        0x9e => '\u{017e}',
        0x9f => '\u{0178}',
        other => char::from(other),
    }
}

impl Iterator for Runs<'_> {
    type Item = TextRun;

    fn next(&mut self) -> Option<TextRun> {
        if self.finished {
            return None;
        }

        let mut line = Line::default();
        while let Some(token) = self.tokens.next() {
            if self.step(token, &mut line) {
                return Some(self.finish_line(line));
            }
        }

        self.finished = true;
        // A trailing line break does not start a new visual line.
        if line.text.is_empty() {
            None
        } else {
            Some(self.finish_line(line))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn runs(text: &str) -> Vec<TextRun> {
        extract_runs(text).unwrap().collect()
    }

    const COCOA_LABEL: &str = "{\\rtf1\\ansi\\ansicpg1252\\cocoartf949\n\
        {\\fonttbl\\f0\\fswiss\\fcharset0 Helvetica;}\n\
        {\\colortbl;\\red255\\green255\\blue255;\\red255\\green0\\blue0;}\n\
        \\pard\\tx560\\tx1120\\qc\\pardirnatural\n\
        \n\
        \\f0\\fs24 \\cf2 Hello\\\n\
        World}";

    #[test]
    fn test_tokenize_control_words() {
        let tokens = tokenize(r"{\rtf1\fs-2 x}").unwrap();
        assert_eq!(
            tokens,
            vec![
                Token::GroupStart,
                Token::ControlWord { name: "rtf", param: Some(1) },
                Token::ControlWord { name: "fs", param: Some(-2) },
                Token::Text("x"),
                Token::GroupEnd,
            ]
        );
    }

    #[test]
    fn test_tokenize_symbols_and_hex() {
        let tokens = tokenize(r"\{\'e9\\").unwrap();
        assert_eq!(
            tokens,
            vec![Token::Symbol('{'), Token::Hex(0xe9), Token::Symbol('\\')]
        );
    }

    #[test]
    fn test_tokenize_rejects_dangling_backslash() {
        let err = tokenize("{\\rtf1 abc\\").unwrap_err();
        assert_eq!(err, ParseError::InvalidRichText { offset: 10 });
    }

    #[test]
    fn test_extract_runs_cocoa_label() {
        let runs = runs(COCOA_LABEL);
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].text(), "Hello");
        assert_eq!(runs[0].style(), "fill:#ff0000;font-size:12px");
        assert_eq!(runs[1].text(), "World");
        assert_eq!(runs[1].style(), "fill:#ff0000;font-size:12px");
    }

    #[test]
    fn test_extract_runs_skips_font_table_text() {
        let runs = runs(COCOA_LABEL);
        assert!(runs.iter().all(|run| !run.text().contains("Helvetica")));
    }

    #[test]
    fn test_extract_runs_auto_color_has_no_fill() {
        let runs = runs(r"{\rtf1{\colortbl;\red0\green0\blue255;}\cf0 plain}");
        assert_eq!(runs, vec![TextRun::new("plain", "")]);
    }

    #[test]
    fn test_extract_runs_par_and_formatting() {
        let runs = runs(r"{\rtf1\b Bold\par\plain\i Slanted\b0\par}");
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0], TextRun::new("Bold", "font-weight:bold"));
        assert_eq!(runs[1], TextRun::new("Slanted", "font-style:italic"));
    }

    #[test]
    fn test_extract_runs_group_scoping() {
        let runs = runs(r"{\rtf1 a{\b b}c}");
        assert_eq!(runs, vec![TextRun::new("abc", "")]);
    }

    #[test]
    fn test_extract_runs_escapes_and_unicode() {
        let runs = runs(r"{\rtf1 caf\'e9 \{x\} \u8226? ok}");
        assert_eq!(runs[0].text(), "caf\u{e9} {x} \u{2022} ok");
    }

    #[test]
    fn test_extract_runs_decodes_windows_1252() {
        let runs = runs(r"{\rtf1\ansi\ansicpg1252 \'93quoted\'94 \'96 \'80\'e9\'81}");
        assert_eq!(
            runs[0].text(),
            "\u{201c}quoted\u{201d} \u{2013} \u{20ac}\u{e9}\u{81}"
        );
    }

    #[test]
    fn test_cp1252_matches_latin1_outside_c1_range() {
        assert_eq!(cp1252(b'A'), 'A');
        assert_eq!(cp1252(0xa0), '\u{a0}');
        assert_eq!(cp1252(0xff), '\u{ff}');
        assert_eq!(cp1252(0x92), '\u{2019}');
        assert_eq!(cp1252(0x9d), '\u{9d}');
    }

    #[test]
    fn test_extract_runs_skips_ignorable_destinations() {
        let runs = runs(r"{\rtf1{\*\expandedcolortbl;;}visible}");
        assert_eq!(runs, vec![TextRun::new("visible", "")]);
    }

    #[test]
    fn test_extract_runs_keeps_blank_middle_lines() {
        let runs = runs(r"{\rtf1 one\par\par three}");
        let texts: Vec<&str> = runs.iter().map(TextRun::text).collect();
        assert_eq!(texts, ["one", "", "three"]);
    }

    #[test]
    fn test_extract_runs_plain_text() {
        let runs = runs("first\nsecond");
        assert_eq!(
            runs,
            vec![TextRun::new("first", ""), TextRun::new("second", "")]
        );
    }

    #[test]
    fn test_extract_runs_empty_text() {
        assert!(runs("").is_empty());
    }

    #[test]
    fn test_extract_runs_is_restartable() {
        let first: Vec<TextRun> = extract_runs(COCOA_LABEL).unwrap().collect();
        let second: Vec<TextRun> = extract_runs(COCOA_LABEL).unwrap().collect();
        assert_eq!(first, second);
    }
}
