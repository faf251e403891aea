//! Character-class recognizers and the first-char index over them.

use std::collections::BTreeMap;

use super::identifier::{self, IdentifierStyle};
use crate::token::TokenKind;

/// How the text matched by a recognizer becomes a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classifier {
    /// Always produce this kind.
    Kind(TokenKind),
    /// `Keyword` if the text is in the language's keyword table, else `Identifier`.
    KeywordLookup,
    /// Consume the text without producing a token.
    Discard,
}

/// String literal flavours a language accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringStyle {
    /// Plain quote characters, backslash-escaped, single line.
    pub quotes: &'static [char],
    /// C# `@"..."` with doubled-quote escapes, may span lines.
    pub verbatim: bool,
    /// C# `$"..."` and `$@"..."`.
    pub interpolated: bool,
    /// Java `"""..."""`.
    pub text_blocks: bool,
    /// TypeScript backtick templates, may span lines.
    pub templates: bool,
}

/// A single character-class recognizer.
///
/// `Block` is the only compound recognizer; the engine tracks its open and
/// close characters. Every other recognizer matches a leaf token with `scan`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Recognizer {
    Whitespace,
    LineComment(&'static str),
    BlockComment { open: &'static str, close: &'static str },
    String(StringStyle),
    Block { open: char, close: char },
    Identifier(IdentifierStyle),
    Operators(&'static [&'static str]),
    Separators(&'static [&'static str]),
    Number,
    /// Line starting with the given character, up to the line end.
    Directive(char),
}

impl Recognizer {
    /// ASCII characters that may start a match.
    pub fn first_chars(&self) -> Vec<char> {
        match self {
            Self::Whitespace => vec![' ', '\t', '\n', '\r', '\x0B', '\x0C'],
            Self::LineComment(open) | Self::BlockComment { open, .. } => open.chars().take(1).collect(),
            Self::String(style) => {
                let mut chars = style.quotes.to_vec();
                if style.verbatim {
                    chars.push('@');
                }
                if style.interpolated {
                    chars.push('$');
                }
                if style.text_blocks && !chars.contains(&'"') {
                    chars.push('"');
                }
                if style.templates {
                    chars.push('`');
                }
                chars
            }
            Self::Block { open, .. } => vec![*open],
            Self::Identifier(style) => {
                let mut chars: Vec<char> = ('a'..='z').chain('A'..='Z').collect();
                chars.push('_');
                chars.extend_from_slice(style.extra_start);
                chars
            }
            Self::Operators(ops) | Self::Separators(ops) => {
                let mut chars: Vec<char> = ops.iter().filter_map(|op| op.chars().next()).collect();
                chars.sort_unstable();
                chars.dedup();
                chars
            }
            Self::Number => ('0'..='9').collect(),
            Self::Directive(c) => vec![*c],
        }
    }

    /// Whether this recognizer may claim non-ASCII characters.
    fn accepts_unicode(&self) -> bool {
        matches!(self, Self::Whitespace | Self::Identifier(_))
    }

    /// Length of the longest leaf match at `pos`, if any.
    ///
    /// Always `None` for `Block`, which the engine handles itself.
    pub fn scan(&self, chars: &[char], pos: usize) -> Option<usize> {
        let end = match self {
            Self::Whitespace => {
                let mut i = pos;
                while i < chars.len() && is_whitespace(chars[i]) {
                    i += 1;
                }
                i
            }
            Self::LineComment(open) => {
                if !starts_with(chars, pos, open) {
                    return None;
                }
                let mut i = pos + open.chars().count();
                while i < chars.len() && chars[i] != '\n' && chars[i] != '\r' {
                    i += 1;
                }
                i
            }
            Self::BlockComment { open, close } => {
                if !starts_with(chars, pos, open) {
                    return None;
                }
                let mut i = pos + open.chars().count();
                loop {
                    if i >= chars.len() {
                        return None;
                    }
                    if starts_with(chars, i, close) {
                        break i + close.chars().count();
                    }
                    i += 1;
                }
            }
            Self::String(style) => scan_string(chars, pos, style)?,
            Self::Block { .. } => return None,
            Self::Identifier(style) => pos + identifier::scan(chars, pos, style)?,
            Self::Operators(ops) | Self::Separators(ops) => {
                let len = ops
                    .iter()
                    .filter(|op| starts_with(chars, pos, op))
                    .map(|op| op.chars().count())
                    .max()?;
                pos + len
            }
            Self::Number => scan_number(chars, pos)?,
            Self::Directive(c) => {
                if chars.get(pos) != Some(c) {
                    return None;
                }
                let mut i = pos;
                while i < chars.len() && chars[i] != '\n' && chars[i] != '\r' {
                    i += 1;
                }
                i
            }
        };
        (end > pos).then(|| end - pos)
    }
}

/// A recognizer paired with its classifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub recognizer: Recognizer,
    pub classifier: Classifier,
}

impl Rule {
    pub fn new(recognizer: Recognizer, classifier: Classifier) -> Self {
        Self {
            recognizer,
            classifier,
        }
    }
}

/// Ordered rules plus a sorted first-char index over them.
#[derive(Debug, Clone)]
pub struct RecognizerSet {
    rules: Vec<Rule>,
    index: BTreeMap<char, Vec<usize>>,
    unicode: Vec<usize>,
    closers: Vec<char>,
}

impl RecognizerSet {
    pub fn new(rules: Vec<Rule>) -> Self {
        let mut index: BTreeMap<char, Vec<usize>> = BTreeMap::new();
        let mut unicode = Vec::new();
        let mut closers = Vec::new();

        for (i, rule) in rules.iter().enumerate() {
            for c in rule.recognizer.first_chars() {
                let candidates = index.entry(c).or_default();
                if !candidates.contains(&i) {
                    candidates.push(i);
                }
            }
            if rule.recognizer.accepts_unicode() {
                unicode.push(i);
            }
            if let Recognizer::Block { close, .. } = rule.recognizer {
                closers.push(close);
            }
        }

        Self {
            rules,
            index,
            unicode,
            closers,
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn rule(&self, index: usize) -> &Rule {
        &self.rules[index]
    }

    /// Indices of the rules that may start a match at `c`, in declared order.
    pub fn candidates(&self, c: char) -> &[usize] {
        if c.is_ascii() {
            self.index.get(&c).map(Vec::as_slice).unwrap_or(&[])
        } else {
            &self.unicode
        }
    }

    /// Whether `c` closes some block recognizer.
    pub fn is_closer(&self, c: char) -> bool {
        self.closers.contains(&c)
    }
}

pub(crate) fn is_whitespace(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

fn starts_with(chars: &[char], pos: usize, pattern: &str) -> bool {
    let mut i = pos;
    for p in pattern.chars() {
        if chars.get(i) != Some(&p) {
            return false;
        }
        i += 1;
    }
    true
}

fn scan_string(chars: &[char], pos: usize, style: &StringStyle) -> Option<usize> {
    let first = *chars.get(pos)?;

    if style.text_blocks && starts_with(chars, pos, "\"\"\"") {
        let mut i = pos + 3;
        while i < chars.len() {
            if chars[i] == '\\' {
                i += 2;
                continue;
            }
            if starts_with(chars, i, "\"\"\"") {
                return Some(i + 3);
            }
            i += 1;
        }
        return None;
    }

    if style.templates && first == '`' {
        return scan_quoted(chars, pos + 1, '`', true);
    }

    if style.verbatim || style.interpolated {
        let prefix: String = chars[pos..chars.len().min(pos + 3)].iter().collect();
        let verbatim_prefix = ["@\"", "$@\"", "@$\""]
            .iter()
            .find(|p| style.verbatim && prefix.starts_with(**p));
        if let Some(p) = verbatim_prefix {
            return scan_verbatim(chars, pos + p.chars().count());
        }
        if style.interpolated && prefix.starts_with("$\"") {
            return scan_quoted(chars, pos + 2, '"', false);
        }
    }

    if style.quotes.contains(&first) {
        return scan_quoted(chars, pos + 1, first, false);
    }
    None
}

/// Scan to the closing `quote`, honouring backslash escapes.
fn scan_quoted(chars: &[char], mut i: usize, quote: char, multiline: bool) -> Option<usize> {
    while i < chars.len() {
        match chars[i] {
            '\\' => i += 2,
            c if c == quote => return Some(i + 1),
            '\n' | '\r' if !multiline => return None,
            _ => i += 1,
        }
    }
    None
}

/// Scan a verbatim string body where `""` is an escaped quote.
fn scan_verbatim(chars: &[char], mut i: usize) -> Option<usize> {
    while i < chars.len() {
        if chars[i] == '"' {
            if chars.get(i + 1) == Some(&'"') {
                i += 2;
                continue;
            }
            return Some(i + 1);
        }
        i += 1;
    }
    None
}

fn scan_number(chars: &[char], pos: usize) -> Option<usize> {
    if !chars.get(pos)?.is_ascii_digit() {
        return None;
    }
    let mut i = pos;
    let digit_run = |mut i: usize, radix: u32| {
        while i < chars.len() && (chars[i].is_digit(radix) || chars[i] == '_') {
            i += 1;
        }
        i
    };

    if chars[pos] == '0' && matches!(chars.get(pos + 1), Some('x' | 'X')) {
        i = digit_run(pos + 2, 16);
    } else if chars[pos] == '0' && matches!(chars.get(pos + 1), Some('b' | 'B')) {
        i = digit_run(pos + 2, 2);
    } else {
        i = digit_run(i, 10);
        if chars.get(i) == Some(&'.') && chars.get(i + 1).is_some_and(|c| c.is_ascii_digit()) {
            i = digit_run(i + 1, 10);
        }
        if matches!(chars.get(i), Some('e' | 'E')) {
            let mut j = i + 1;
            if matches!(chars.get(j), Some('+' | '-')) {
                j += 1;
            }
            if chars.get(j).is_some_and(|c| c.is_ascii_digit()) {
                i = digit_run(j, 10);
            }
        }
    }

    while i < chars.len() && matches!(chars[i], 'f' | 'F' | 'd' | 'D' | 'm' | 'M' | 'l' | 'L' | 'u' | 'U' | 'n') {
        i += 1;
    }
    Some(i)
}
