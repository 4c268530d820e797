//! Expression tokens and their insertion into editable text
//!
//! A reference to upstream output is written `{{ Node Label.field[0].sub }}`.
//! The picker is opened by typing either `@` or `{{`; on selection the
//! trigger text up to the cursor is replaced by the finished token.
//!
//! Cursor positions are counted in characters, not bytes.

use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::path::DrillPath;

static TOKEN_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{\{\s*(.*?)\s*\}\}").expect("token pattern is valid"));

/// Which syntax opened the picker
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerKind {
    /// `@` mention
    Mention,
    /// `{{` open braces
    Braces,
}

/// A trigger found before the cursor
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Trigger {
    pub kind: TriggerKind,
    /// Byte offset of the trigger's first character
    pub start: usize,
}

/// Result of splicing a token into text
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insertion {
    /// The full new text
    pub text: String,
    /// Cursor position (in characters) just after the inserted token
    pub cursor: usize,
}

/// Build the token for a node label and drill path
pub fn format_token(label: &str, path: &DrillPath) -> String {
    let suffix = path.to_string();
    if suffix.is_empty() {
        format!("{{{{ {} }}}}", label)
    } else if suffix.starts_with('[') {
        format!("{{{{ {}{} }}}}", label, suffix)
    } else {
        format!("{{{{ {}.{} }}}}", label, suffix)
    }
}

/// Byte offset of the `cursor`-th character, clamped to the end of `text`
fn byte_offset(text: &str, cursor: usize) -> usize {
    text.char_indices()
        .nth(cursor)
        .map(|(offset, _)| offset)
        .unwrap_or(text.len())
}

/// Find the open trigger nearest the end of `before`
///
/// The last `@` counts only if nothing between it and the end is
/// whitespace or `{`. The last `{{` counts only if no `}}` closes it.
/// When both count, the later one wins.
pub fn find_trigger(before: &str) -> Option<Trigger> {
    let mention = before.rfind('@').filter(|&at| {
        !before[at + 1..]
            .chars()
            .any(|c| c.is_whitespace() || c == '{')
    });
    let braces = before
        .rfind("{{")
        .filter(|&open| !before[open + 2..].contains("}}"));

    match (mention, braces) {
        (Some(at), Some(open)) if at > open => Some(Trigger {
            kind: TriggerKind::Mention,
            start: at,
        }),
        (_, Some(open)) => Some(Trigger {
            kind: TriggerKind::Braces,
            start: open,
        }),
        (Some(at), None) => Some(Trigger {
            kind: TriggerKind::Mention,
            start: at,
        }),
        (None, None) => None,
    }
}

/// Splice `token` into `text` at the trigger before `cursor`
///
/// Replaces from the trigger start through the cursor and keeps whatever
/// followed the cursor. Without a trigger the token is appended to the
/// end of the text.
pub fn insert(text: &str, cursor: usize, token: &str) -> Insertion {
    let split = byte_offset(text, cursor);
    let (before, after) = text.split_at(split);

    match find_trigger(before) {
        Some(trigger) => {
            let prefix = &before[..trigger.start];
            log::debug!(
                "Replacing {:?} trigger at byte {} with '{}'",
                trigger.kind,
                trigger.start,
                token
            );
            Insertion {
                text: format!("{}{}{}", prefix, token, after),
                cursor: prefix.chars().count() + token.chars().count(),
            }
        }
        None => {
            let text = format!("{}{}", text, token);
            let cursor = text.chars().count();
            Insertion { text, cursor }
        }
    }
}

/// An expression token found in text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpressionRef {
    /// Byte range of the whole `{{ … }}` token
    pub range: Range<usize>,
    /// Trimmed content between the braces
    pub inner: String,
}

impl ExpressionRef {
    /// If this token starts with `label`, the drill path that follows it
    pub fn path_after(&self, label: &str) -> Option<DrillPath> {
        let rest = self.inner.strip_prefix(label)?;
        if rest.is_empty() {
            Some(DrillPath::root())
        } else if let Some(path) = rest.strip_prefix('.') {
            DrillPath::parse(path).ok()
        } else if rest.starts_with('[') {
            DrillPath::parse(rest).ok()
        } else {
            None
        }
    }
}

/// All `{{ … }}` tokens in `text`, in order
pub fn references(text: &str) -> Vec<ExpressionRef> {
    TOKEN_PATTERN
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let inner = caps.get(1)?;
            Some(ExpressionRef {
                range: whole.range(),
                inner: inner.as_str().to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const TOKEN: &str = "{{ Node A.output }}";

    #[test]
    fn test_format_token() {
        assert_eq!(format_token("Node A", &DrillPath::root()), "{{ Node A }}");
        assert_eq!(
            format_token("Node A", &DrillPath::parse("items[0].name").unwrap()),
            "{{ Node A.items[0].name }}"
        );
        assert_eq!(
            format_token("List", &DrillPath::parse("[1].id").unwrap()),
            "{{ List[1].id }}"
        );
    }

    #[test]
    fn test_insert_at_mention() {
        let result = insert("Hello @", 7, TOKEN);
        assert_eq!(result.text, "Hello {{ Node A.output }}");
        assert_eq!(result.cursor, 25);
    }

    #[test]
    fn test_insert_preserves_trailing_text() {
        let result = insert("Hello @No world", 9, TOKEN);
        assert_eq!(result.text, "Hello {{ Node A.output }} world");
        assert_eq!(result.cursor, 25);
    }

    #[test]
    fn test_insert_at_braces() {
        let result = insert("Dear {{ No", 10, TOKEN);
        assert_eq!(result.text, "Dear {{ Node A.output }}");
    }

    #[test]
    fn test_later_trigger_wins() {
        // Unclosed braces first, then a mention closer to the cursor
        let text = "{{ abc @foo";
        let trigger = find_trigger(text).unwrap();
        assert_eq!(trigger.kind, TriggerKind::Mention);
        assert_eq!(trigger.start, 7);
        assert_eq!(insert(text, 11, TOKEN).text, "{{ abc {{ Node A.output }}");

        // Mention first, then braces closer to the cursor
        let text = "@foo{{ x";
        let trigger = find_trigger(text).unwrap();
        assert_eq!(trigger.kind, TriggerKind::Braces);
        assert_eq!(trigger.start, 4);
    }

    #[test]
    fn test_mention_broken_by_whitespace_or_brace() {
        assert_eq!(find_trigger("@foo bar"), None);
        assert_eq!(find_trigger("@foo\n"), None);
        assert_eq!(find_trigger("@fo{o"), None);

        // Whitespace after the mention falls back to an open brace trigger
        let trigger = find_trigger("{{ a @b c").unwrap();
        assert_eq!(trigger.kind, TriggerKind::Braces);
        assert_eq!(trigger.start, 0);
    }

    #[test]
    fn test_closed_braces_do_not_trigger() {
        assert_eq!(find_trigger("{{ A.x }} and"), None);
        let trigger = find_trigger("{{ A.x }} {{ B").unwrap();
        assert_eq!(trigger.start, 10);
    }

    #[test]
    fn test_no_trigger_appends_to_end() {
        let result = insert("plain text", 3, TOKEN);
        assert_eq!(result.text, "plain text{{ Node A.output }}");
        assert_eq!(result.cursor, result.text.chars().count());
    }

    #[test]
    fn test_cursor_counts_characters() {
        let result = insert("héllo @", 7, TOKEN);
        assert_eq!(result.text, "héllo {{ Node A.output }}");
        assert_eq!(result.cursor, 25);
    }

    #[test]
    fn test_cursor_past_end_is_clamped() {
        let result = insert("Hi @", 100, TOKEN);
        assert_eq!(result.text, "Hi {{ Node A.output }}");
    }

    #[test]
    fn test_references() {
        let refs = references("To {{ Fetch.body.email }}, from {{Webhook}} and {{ }}");
        assert_eq!(refs.len(), 3);
        assert_eq!(refs[0].inner, "Fetch.body.email");
        assert_eq!(refs[0].range, 3..25);
        assert_eq!(refs[1].inner, "Webhook");
        assert_eq!(refs[2].inner, "");
    }

    #[test]
    fn test_path_after() {
        let refs = references("{{ Fetch User.items[0].name }} {{ Fetch Users }}");
        assert_eq!(
            refs[0].path_after("Fetch User").unwrap().to_string(),
            "items[0].name"
        );
        assert!(refs[1].path_after("Fetch User").is_none());
        assert!(refs[1].path_after("Fetch Users").unwrap().is_empty());
    }
}
