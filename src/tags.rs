//! Labels attachable to announcements and users.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::forms::{require_text, FormError};

/// Colours a tag may be created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Colour {
    /// red
    Red,
    /// orange
    Orange,
    /// yellow
    Yellow,
    /// green
    Green,
    /// teal
    Teal,
    /// blue
    Blue,
    /// cyan
    Cyan,
    /// purple
    Purple,
    /// pink
    Pink,
    /// linkedin
    Linkedin,
    /// facebook
    Facebook,
    /// messenger
    Messenger,
    /// whatsapp
    Whatsapp,
    /// twitter
    Twitter,
    /// telegram
    Telegram,
}

impl Colour {
    /// The full palette in menu order.
    pub const PALETTE: [Self; 15] = [
        Self::Red,
        Self::Orange,
        Self::Yellow,
        Self::Green,
        Self::Teal,
        Self::Blue,
        Self::Cyan,
        Self::Purple,
        Self::Pink,
        Self::Linkedin,
        Self::Facebook,
        Self::Messenger,
        Self::Whatsapp,
        Self::Twitter,
        Self::Telegram,
    ];

    /// Wire name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Orange => "orange",
            Self::Yellow => "yellow",
            Self::Green => "green",
            Self::Teal => "teal",
            Self::Blue => "blue",
            Self::Cyan => "cyan",
            Self::Purple => "purple",
            Self::Pink => "pink",
            Self::Linkedin => "linkedin",
            Self::Facebook => "facebook",
            Self::Messenger => "messenger",
            Self::Whatsapp => "whatsapp",
            Self::Twitter => "twitter",
            Self::Telegram => "telegram",
        }
    }
}

impl fmt::Display for Colour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Colour {
    type Err = FormError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::PALETTE
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| FormError::UnknownColour(s.to_string()))
    }
}

/// A tag as stored by the backend.
///
/// The colour is kept as a plain string: tags created elsewhere may carry
/// values outside the palette and are still displayed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    /// Backend identity.
    pub id: String,
    /// Label.
    pub name: String,
    /// Display colour.
    pub colour: String,
}

/// A validated tag payload for create and update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TagDraft {
    /// Label.
    pub name: String,
    /// Display colour.
    pub colour: Colour,
}

impl TagDraft {
    /// Validates a name and colour pair.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or the colour is not in the palette.
    pub fn new(name: &str, colour: &str) -> Result<Self, FormError> {
        Ok(Self { name: require_text("name", name)?, colour: colour.parse()? })
    }

    /// Builds an update draft, keeping the existing values for blank inputs.
    ///
    /// # Errors
    ///
    /// Returns an error if the resulting colour is not in the palette.
    pub fn edit(
        existing: &Tag,
        name: Option<&str>,
        colour: Option<&str>,
    ) -> Result<Self, FormError> {
        let name = name.filter(|n| !n.trim().is_empty()).unwrap_or(existing.name.as_str());
        let colour = colour.filter(|c| !c.trim().is_empty()).unwrap_or(existing.colour.as_str());
        Self::new(name, colour)
    }
}

/// Tag ids to attach to and detach from a user.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagAssignment {
    /// Tags to attach.
    pub add: Vec<String>,
    /// Tags to detach.
    pub remove: Vec<String>,
}

impl TagAssignment {
    /// Computes the changes that turn `current` into `desired`.
    #[must_use]
    pub fn diff(current: &[Tag], desired: &[String]) -> Self {
        let have: BTreeSet<&str> = current.iter().map(|t| t.id.as_str()).collect();
        let want: BTreeSet<&str> = desired.iter().map(String::as_str).collect();
        Self {
            add: want.difference(&have).map(|s| (*s).to_string()).collect(),
            remove: have.difference(&want).map(|s| (*s).to_string()).collect(),
        }
    }

    /// Whether nothing changes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.add.is_empty() && self.remove.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(id: &str) -> Tag {
        Tag { id: id.into(), name: id.to_uppercase(), colour: "red".into() }
    }

    #[test]
    fn draft_requires_name_and_palette_colour() {
        assert_eq!(TagDraft::new("", "red"), Err(FormError::Empty("name")));
        assert_eq!(
            TagDraft::new("Staff", "beige"),
            Err(FormError::UnknownColour("beige".into()))
        );
        let draft = TagDraft::new(" Staff ", "WhatsApp").unwrap();
        assert_eq!(draft.name, "Staff");
        assert_eq!(draft.colour, Colour::Whatsapp);
    }

    #[test]
    fn edit_keeps_existing_values_for_blank_fields() {
        let existing = Tag { id: "t1".into(), name: "Old".into(), colour: "blue".into() };
        let draft = TagDraft::edit(&existing, Some(""), Some("teal")).unwrap();
        assert_eq!(draft, TagDraft { name: "Old".into(), colour: Colour::Teal });
    }

    #[test]
    fn colour_serializes_lowercase() {
        let json = serde_json::to_value(TagDraft::new("x", "linkedin").unwrap()).unwrap();
        assert_eq!(json["colour"], "linkedin");
    }

    #[test]
    fn assignment_diff_adds_and_removes() {
        let current = vec![tag("a"), tag("b")];
        let desired = vec!["b".to_string(), "c".to_string()];
        let diff = TagAssignment::diff(&current, &desired);
        assert_eq!(diff.add, ["c"]);
        assert_eq!(diff.remove, ["a"]);
        assert!(TagAssignment::diff(&current, &["a".into(), "b".into()]).is_empty());
    }
}
