//! Greedy line filling for index titles.
//!
//! # Invariants
//! - Text is cut into chunks: whitespace runs, `--` dashes between words,
//!   and words split after inner hyphens (`zero-copy` -> `zero-`, `copy`).
//! - Whitespace inside a line is kept as written; whitespace at line edges
//!   is dropped.
//! - Widths count chars, not display columns.

const TAB_SIZE: usize = 8;

/// Fills lines of at most `width` chars, breaking only between chunks
/// unless a single chunk is wider than a whole line.
pub(crate) fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut chunks = split_chunks(&expand_whitespace(text));
    chunks.reverse();

    let mut lines: Vec<String> = Vec::new();
    while !chunks.is_empty() {
        if !lines.is_empty() && chunks.last().is_some_and(|chunk| is_blank(chunk)) {
            chunks.pop();
        }

        let mut line: Vec<Vec<char>> = Vec::new();
        let mut len = 0;
        while let Some(chunk) = chunks.last() {
            if len + chunk.len() > width {
                break;
            }
            len += chunk.len();
            line.extend(chunks.pop());
        }
        if chunks.last().is_some_and(|chunk| chunk.len() > width) {
            split_long_chunk(&mut chunks, &mut line, width - len);
        }
        if line.last().is_some_and(|chunk| is_blank(chunk)) {
            line.pop();
        }
        if !line.is_empty() {
            lines.push(line.concat().into_iter().collect());
        }
    }
    lines
}

fn split_long_chunk(chunks: &mut [Vec<char>], line: &mut Vec<Vec<char>>, space_left: usize) {
    let Some(chunk) = chunks.last_mut() else {
        return;
    };
    let mut end = space_left;
    if let Some(hyphen) = chunk[..space_left].iter().rposition(|ch| *ch == '-') {
        if hyphen > 0 && chunk[..hyphen].iter().any(|ch| *ch != '-') {
            end = hyphen + 1;
        }
    }
    let rest = chunk.split_off(end);
    line.push(std::mem::replace(chunk, rest));
}

/// Expands tabs to 8-column stops and turns other ASCII whitespace into spaces.
fn expand_whitespace(text: &str) -> Vec<char> {
    let mut out = Vec::with_capacity(text.len());
    let mut column = 0;
    for ch in text.chars() {
        match ch {
            '\t' => {
                let pad = TAB_SIZE - column % TAB_SIZE;
                out.extend(std::iter::repeat(' ').take(pad));
                column += pad;
            }
            '\n' | '\r' => {
                out.push(' ');
                column = 0;
            }
            '\u{b}' | '\u{c}' => {
                out.push(' ');
                column += 1;
            }
            _ => {
                out.push(ch);
                column += 1;
            }
        }
    }
    out
}

fn split_chunks(chars: &[char]) -> Vec<Vec<char>> {
    let mut chunks = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = if chars[start] == ' ' {
            start + chars[start..].iter().take_while(|ch| **ch == ' ').count()
        } else if let Some(run) = dash_break(chars, start) {
            start + run
        } else {
            word_end(chars, start)
        };
        chunks.push(chars[start..end].to_vec());
        start = end;
    }
    chunks
}

fn word_end(chars: &[char], start: usize) -> usize {
    let mut end = start + 1;
    loop {
        if hyphen_break(chars, end) {
            return end + 1;
        }
        match chars.get(end) {
            None | Some(' ') => return end,
            Some(_) if dash_break(chars, end).is_some() => return end,
            Some(_) => end += 1,
        }
    }
}

/// Length of a `--` run at `at` that sits between two words.
fn dash_break(chars: &[char], at: usize) -> Option<usize> {
    let after_word = at
        .checked_sub(1)
        .and_then(|prev| chars.get(prev))
        .is_some_and(|ch| is_word_punct(*ch));
    if !after_word {
        return None;
    }
    let run = chars[at..].iter().take_while(|ch| **ch == '-').count();
    let before_word = chars.get(at + run).is_some_and(|ch| is_word(*ch));
    (run >= 2 && before_word).then_some(run)
}

/// Whether a word may break after the hyphen at `at`.
///
/// Needs two letters (or `x-y`) before it and a letter pair, optionally
/// hyphen-joined, after it.
fn hyphen_break(chars: &[char], at: usize) -> bool {
    let char_at = |offset: isize| at.checked_add_signed(offset).and_then(|i| chars.get(i));
    let letter = |offset: isize| char_at(offset).is_some_and(|ch| is_letter(*ch));
    let hyphen = |offset: isize| char_at(offset) == Some(&'-');

    hyphen(0)
        && ((letter(-2) && letter(-1)) || (letter(-3) && hyphen(-2) && letter(-1)))
        && letter(1)
        && (letter(2) || (hyphen(2) && letter(3)))
}

fn is_blank(chunk: &[char]) -> bool {
    chunk.iter().all(|ch| *ch == ' ')
}

fn is_word(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn is_letter(ch: char) -> bool {
    is_word(ch) && !ch.is_numeric()
}

fn is_word_punct(ch: char) -> bool {
    is_word(ch) || matches!(ch, '!' | '"' | '\'' | '&' | '.' | ',' | '?')
}
