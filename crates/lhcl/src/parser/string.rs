//! Quoted strings and heredocs
use super::lexical::{backtrack, inline_ws, unterminated};
use crate::escape::{quoted_length, unescape_string};
use crate::node::HereDoc;
use winnow::combinator::opt;
use winnow::error::ModalResult;
use winnow::prelude::*;
use winnow::token::take_while;

/// `"..."`, returns the unescaped content
///
/// Interpolations (`${ ... }`) and directives (`%{ ... }`) may contain nested strings and
/// are kept verbatim.
pub(crate) fn quoted_string(input: &mut &str) -> ModalResult<String> {
    let text = *input;
    if !text.starts_with('"') {
        return backtrack();
    }

    match quoted_length(text) {
        Some(length) => {
            *input = &text[length..];
            Ok(unescape_string(&text[1..length - 1]))
        }
        None => {
            *input = &text[1..];
            unterminated(input, "quoted string")
        }
    }
}

fn is_marker_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// `<<MARKER` or `<<-MARKER` followed by the body lines and the closing marker
///
/// The closing marker may be indented and followed by closing punctuation, which is left in
/// the input.
pub(crate) fn heredoc(input: &mut &str) -> ModalResult<HereDoc> {
    let (indented, marker) = (
        "<<",
        opt('-'),
        take_while(1.., is_marker_char),
        inline_ws,
        '\n',
    )
        .map(|(_, dash, marker, _, _)| (dash.is_some(), marker))
        .parse_next(input)?;

    let text = *input;
    let mut offset = 0;

    loop {
        let line_end = text[offset..]
            .find('\n')
            .map(|index| offset + index + 1)
            .unwrap_or(text.len());
        let line = &text[offset..line_end];
        let content = line.trim_start();

        if let Some(rest) = content.strip_prefix(marker) {
            let closes = rest
                .chars()
                .all(|c| c.is_whitespace() || matches!(c, ',' | ')' | ']' | '}'));
            if closes {
                let consumed = offset + (line.len() - content.len()) + marker.len();
                *input = &text[consumed..];
                return Ok(HereDoc::new(
                    marker.to_string(),
                    indented,
                    text[..offset].to_string(),
                ));
            }
        }

        if line_end == text.len() {
            return unterminated(input, "heredoc");
        }
        offset = line_end;
    }
}
