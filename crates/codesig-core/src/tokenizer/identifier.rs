//! Identifier recognizer that understands dotted names, generic parameter
//! lists and array suffixes, so `Map<String, List<int>>[]` is one token.

/// Identifier flavour of a language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentifierStyle {
    /// Extra characters allowed at the start of a name (`@` in C#, `$` in TypeScript).
    pub extra_start: &'static [char],
    /// Extra characters allowed after the first one.
    pub extra_part: &'static [char],
    /// Accept `<...>` parameter lists after a name.
    pub generics: bool,
    /// Accept Java wildcard arguments: `?`, `? extends T`, `? super T`.
    pub wildcards: bool,
    /// Deepest accepted nesting of `<...>`.
    pub max_generic_depth: usize,
}

/// Length of the identifier starting at `pos`, if any.
pub(crate) fn scan(chars: &[char], pos: usize, style: &IdentifierStyle) -> Option<usize> {
    let end = scan_type(chars, pos, style, 0)?;
    Some(end - pos)
}

/// `name ('.' name)* generics? '?'? ('[' ']')*`, with `?` only inside generics.
fn scan_type(chars: &[char], pos: usize, style: &IdentifierStyle, depth: usize) -> Option<usize> {
    let mut i = scan_dotted_name(chars, pos, style)?;
    if style.generics && chars.get(i) == Some(&'<') {
        if let Some(end) = scan_generic_args(chars, i, style, depth + 1) {
            i = end;
        } else if depth > 0 {
            return None;
        }
    }
    if depth > 0 && chars.get(i) == Some(&'?') {
        i += 1;
    }
    while chars.get(i) == Some(&'[') && chars.get(i + 1) == Some(&']') {
        i += 2;
    }
    Some(i)
}

fn scan_dotted_name(chars: &[char], pos: usize, style: &IdentifierStyle) -> Option<usize> {
    let mut i = scan_name(chars, pos, style)?;
    while chars.get(i) == Some(&'.') {
        match scan_name(chars, i + 1, style) {
            Some(end) => i = end,
            None => break,
        }
    }
    Some(i)
}

fn scan_name(chars: &[char], pos: usize, style: &IdentifierStyle) -> Option<usize> {
    let first = *chars.get(pos)?;
    let starts = first.is_alphabetic() || first == '_' || style.extra_start.contains(&first);
    if !starts {
        return None;
    }
    let mut i = pos + 1;
    while let Some(&c) = chars.get(i) {
        if c.is_alphanumeric() || c == '_' || style.extra_part.contains(&c) {
            i += 1;
        } else {
            break;
        }
    }
    // a lone prefix character such as `@` or `$` is not a name
    if i == pos + 1 && style.extra_start.contains(&first) && !style.extra_part.contains(&first) {
        return None;
    }
    Some(i)
}

/// `'<' type (',' type)* '>'` with optional spaces around parameters.
fn scan_generic_args(chars: &[char], pos: usize, style: &IdentifierStyle, depth: usize) -> Option<usize> {
    if depth > style.max_generic_depth || chars.get(pos) != Some(&'<') {
        return None;
    }
    let mut i = skip_spaces(chars, pos + 1);
    loop {
        i = scan_argument(chars, i, style, depth)?;
        i = skip_spaces(chars, i);
        match chars.get(i) {
            Some(',') => i = skip_spaces(chars, i + 1),
            Some('>') => return Some(i + 1),
            _ => return None,
        }
    }
}

fn scan_argument(chars: &[char], pos: usize, style: &IdentifierStyle, depth: usize) -> Option<usize> {
    if !style.wildcards || chars.get(pos) != Some(&'?') {
        return scan_type(chars, pos, style, depth);
    }
    let after = skip_spaces(chars, pos + 1);
    for bound in ["extends", "super"] {
        let end = after + bound.len();
        let matches = bound.chars().enumerate().all(|(k, c)| chars.get(after + k) == Some(&c));
        if matches && chars.get(end) == Some(&' ') {
            return scan_type(chars, skip_spaces(chars, end), style, depth);
        }
    }
    Some(pos + 1)
}

fn skip_spaces(chars: &[char], mut i: usize) -> usize {
    while chars.get(i) == Some(&' ') {
        i += 1;
    }
    i
}
