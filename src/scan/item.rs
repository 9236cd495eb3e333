use crate::value::ResultValue;
use serde::{Deserialize, Serialize};
use std::fmt;

/// An element of a scanned collection.
pub trait ScanItem: Clone + Send + 'static {
    /// Identity used to match local edits by key, or `None` for kinds that
    /// are only addressable by position.
    fn match_key(&self) -> Option<&str>;

    /// Text the server-side filter pattern is matched against.
    fn match_subject(&self) -> &str;

    /// Entries this item contributes to a flat scan reply, e.g. field then
    /// value for a hash.
    fn reply_entries(&self) -> Vec<ResultValue>;
}

/// Target of a local update or removal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// View-local position. Only meaningful against the view as currently
    /// loaded; a reset renumbers everything.
    Position(usize),
    /// Field name, member, or set value.
    Key(String),
}

impl Locator {
    pub fn key(key: impl Into<String>) -> Self {
        Locator::Key(key.into())
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Position(index) => write!(f, "position {index}"),
            Locator::Key(key) => write!(f, "key {key:?}"),
        }
    }
}

/// Where a locally inserted item lands in the view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertAt {
    Append,
    /// Clamped to the view length.
    Index(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetMember {
    pub value: String,
}

impl SetMember {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl ScanItem for SetMember {
    fn match_key(&self) -> Option<&str> {
        Some(&self.value)
    }

    fn match_subject(&self) -> &str {
        &self.value
    }

    fn reply_entries(&self) -> Vec<ResultValue> {
        vec![ResultValue::scalar(self.value.as_str())]
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashField {
    pub field: String,
    pub value: String,
}

impl HashField {
    pub fn new(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl ScanItem for HashField {
    fn match_key(&self) -> Option<&str> {
        Some(&self.field)
    }

    fn match_subject(&self) -> &str {
        &self.field
    }

    fn reply_entries(&self) -> Vec<ResultValue> {
        vec![
            ResultValue::scalar(self.field.as_str()),
            ResultValue::scalar(self.value.as_str()),
        ]
    }
}

/// A list element. Its index is its position in the loaded view, never a
/// server identity; see [`ScanSession::indexed`](super::ScanSession::indexed).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListElement {
    pub value: String,
}

impl ListElement {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }
}

impl ScanItem for ListElement {
    fn match_key(&self) -> Option<&str> {
        None
    }

    fn match_subject(&self) -> &str {
        &self.value
    }

    fn reply_entries(&self) -> Vec<ResultValue> {
        vec![ResultValue::scalar(self.value.as_str())]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredMember {
    pub member: String,
    pub score: f64,
}

impl ScoredMember {
    pub fn new(member: impl Into<String>, score: f64) -> Self {
        Self {
            member: member.into(),
            score,
        }
    }
}

impl ScanItem for ScoredMember {
    fn match_key(&self) -> Option<&str> {
        Some(&self.member)
    }

    fn match_subject(&self) -> &str {
        &self.member
    }

    fn reply_entries(&self) -> Vec<ResultValue> {
        vec![
            ResultValue::scalar(self.member.as_str()),
            ResultValue::scalar(self.score.to_string()),
        ]
    }
}

/// A page shaped like a raw `*SCAN` reply: the cursor followed by the flat
/// entry list.
pub fn scan_reply<I: ScanItem>(cursor: &str, items: &[I]) -> ResultValue {
    ResultValue::sequence([
        ResultValue::scalar(cursor),
        ResultValue::Sequence(items.iter().flat_map(ScanItem::reply_entries).collect()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::render_lines;

    #[test]
    fn test_hash_page_renders_like_hscan_reply() {
        let reply = scan_reply(
            "17",
            &[HashField::new("name", "ada"), HashField::new("lang", "en")],
        );

        assert_eq!(
            render_lines(&reply, "", true),
            vec![
                r#"1) "17""#,
                r#"2) 1) "name""#,
                r#"   2) "ada""#,
                r#"   3) "lang""#,
                r#"   4) "en""#,
            ]
        );
    }

    #[test]
    fn test_scores_print_without_trailing_zeroes() {
        let reply = scan_reply("0", &[ScoredMember::new("a", 1.0), ScoredMember::new("b", 2.5)]);

        assert_eq!(
            reply,
            ResultValue::sequence([
                ResultValue::scalar("0"),
                ResultValue::sequence([
                    ResultValue::scalar("a"),
                    ResultValue::scalar("1"),
                    ResultValue::scalar("b"),
                    ResultValue::scalar("2.5"),
                ]),
            ])
        );
    }

    #[test]
    fn test_empty_page_renders_empty_array() {
        let reply = scan_reply::<SetMember>("0", &[]);
        assert_eq!(
            render_lines(&reply, "", true),
            vec![r#"1) "0""#, "2) (empty array)"]
        );
    }

    #[test]
    fn test_locator_display() {
        assert_eq!(Locator::Position(3).to_string(), "position 3");
        assert_eq!(Locator::key("f").to_string(), r#"key "f""#);
    }
}
