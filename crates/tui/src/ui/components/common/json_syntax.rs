//! JSON syntax-highlighting helpers for read-only output panes.
//!
//! A single-pass scanner, not a parser: good enough for the pretty-printed
//! JSON we render ourselves. Object keys are told apart from string values
//! by looking ahead for a colon.

use flowtty_util::truncate_with_ellipsis;
use ratatui::style::Style;
use ratatui::text::{Line, Span};

use crate::ui::theme::Theme;

/// String values longer than this render collapsed; keys never collapse.
const STRING_COLLAPSE_LENGTH: usize = 80;

/// Builds syntax-highlighted lines from an already pretty-printed JSON string.
pub fn highlighted_json_lines<'value>(formatted_json: &'value str, theme: &dyn Theme) -> Vec<Line<'value>> {
    formatted_json
        .lines()
        .map(|line| Line::from(highlight_json_line(line, theme)))
        .collect()
}

fn highlight_json_line<'line>(line: &'line str, theme: &dyn Theme) -> Vec<Span<'line>> {
    let mut spans = Vec::new();
    let mut index = 0usize;
    while index < line.len() {
        let remaining = &line[index..];
        let Some(character) = remaining.chars().next() else {
            break;
        };
        let character_length = character.len_utf8();
        if character.is_whitespace() {
            let whitespace_end = remaining
                .find(|candidate: char| !candidate.is_whitespace())
                .unwrap_or(remaining.len());
            spans.push(Span::styled(&remaining[..whitespace_end], theme.text_style()));
            index += whitespace_end;
            continue;
        }
        if character == '"' {
            let (token, consumed_length) = parse_json_string_token(remaining);
            let is_key = colon_follows(&remaining[consumed_length..]);
            let style = if is_key {
                theme.syntax_type_style()
            } else {
                theme.syntax_string_style()
            };
            spans.push(string_token_span(token, is_key, style));
            index += consumed_length;
            continue;
        }
        if punctuation_token(character).is_some() {
            spans.push(Span::styled(&remaining[..character_length], theme.text_secondary_style()));
            index += character_length;
            continue;
        }
        if starts_with_json_keyword(remaining, "true") || starts_with_json_keyword(remaining, "false") {
            let token = if starts_with_json_keyword(remaining, "true") {
                "true"
            } else {
                "false"
            };
            spans.push(Span::styled(token, theme.syntax_keyword_style()));
            index += token.len();
            continue;
        }
        if starts_with_json_keyword(remaining, "null") {
            spans.push(Span::styled("null", theme.text_muted_style()));
            index += 4;
            continue;
        }
        if character == '-' || character.is_ascii_digit() {
            let number_length = parse_json_number_length(remaining);
            if number_length > 0 {
                spans.push(Span::styled(&remaining[..number_length], theme.syntax_number_style()));
                index += number_length;
                continue;
            }
        }

        spans.push(Span::styled(&remaining[..character_length], theme.text_style()));
        index += character_length;
    }
    spans
}

/// Collapses over-long string values (log entries, traces) to keep the
/// detail panes readable. The quotes stay so the text still reads as JSON.
fn string_token_span(token: &str, is_key: bool, style: Style) -> Span<'_> {
    if !is_key
        && let Some(inner) = token.strip_prefix('"').and_then(|rest| rest.strip_suffix('"'))
        && inner.chars().count() > STRING_COLLAPSE_LENGTH
    {
        let collapsed = truncate_with_ellipsis(inner, STRING_COLLAPSE_LENGTH);
        return Span::styled(format!("\"{collapsed}\""), style);
    }
    Span::styled(token, style)
}

fn punctuation_token(character: char) -> Option<&'static str> {
    match character {
        '{' => Some("{"),
        '}' => Some("}"),
        '[' => Some("["),
        ']' => Some("]"),
        ':' => Some(":"),
        ',' => Some(","),
        _ => None,
    }
}

fn colon_follows(rest: &str) -> bool {
    rest.trim_start().starts_with(':')
}

fn parse_json_string_token(input: &str) -> (&str, usize) {
    let bytes = input.as_bytes();
    let mut index = 1usize;
    let mut escaped = false;
    while index < bytes.len() {
        let byte = bytes[index];
        if escaped {
            escaped = false;
            index += 1;
            continue;
        }
        if byte == b'\\' {
            escaped = true;
            index += 1;
            continue;
        }
        if byte == b'"' {
            return (&input[..=index], index + 1);
        }
        index += 1;
    }
    (input, input.len())
}

fn parse_json_number_length(input: &str) -> usize {
    let mut index = 0usize;
    for character in input.chars() {
        if character.is_ascii_digit() || matches!(character, '-' | '+' | '.' | 'e' | 'E') {
            index += character.len_utf8();
        } else {
            break;
        }
    }
    index
}

fn starts_with_json_keyword(input: &str, keyword: &str) -> bool {
    input.strip_prefix(keyword).is_some_and(|rest| {
        rest.chars()
            .next()
            .is_none_or(|character| !character.is_ascii_alphanumeric() && character != '_')
    })
}
