use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One of the five colors of the color pie.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Color {
    White,
    Blue,
    Black,
    Red,
    Green,
}

impl Color {
    /// Canonical WUBRG order.
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    pub fn symbol(self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    /// Looks up a lower-case whole-word color name.
    pub fn from_name(name: &str) -> Option<Color> {
        match name {
            "white" => Some(Color::White),
            "blue" => Some(Color::Blue),
            "black" => Some(Color::Black),
            "red" => Some(Color::Red),
            "green" => Some(Color::Green),
            _ => None,
        }
    }
}

/// A validated color identity such as `UB` or `WBRG`.
///
/// Only constructed by the resolver, which guarantees 1 to 5 symbols drawn
/// from `WUBRG`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ColorCode(String);

impl ColorCode {
    pub(crate) fn new_unchecked(code: String) -> Self {
        Self(code)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for ColorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Search text handed to the search collaborator; consumed by value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorIdentityQuery(String);

impl ColorIdentityQuery {
    pub(crate) fn new(query: String) -> Self {
        Self(query)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for ColorIdentityQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display-ready commander.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommanderRecord {
    pub name: String,
    #[serde(
        rename = "imagePrimaryURL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub image_primary_url: Option<String>,
    #[serde(
        rename = "imageFallbackURL",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub image_fallback_url: Option<String>,
    #[serde(rename = "detailURL")]
    pub detail_url: String,
}

impl CommanderRecord {
    /// Image to show: the card's own image, else its first face's.
    pub fn image_url(&self) -> Option<&str> {
        self.image_primary_url
            .as_deref()
            .or(self.image_fallback_url.as_deref())
    }
}

/// Which upstream link becomes a record's detail URL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DetailLink {
    #[default]
    CardPage,
    RelatedResource,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageUris {
    pub normal: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardFace {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
}

/// A card object as returned by the Scryfall search endpoint. Unknown
/// fields are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScryfallCard {
    pub name: String,
    #[serde(default)]
    pub image_uris: Option<ImageUris>,
    #[serde(default)]
    pub card_faces: Option<Vec<CardFace>>,
    pub scryfall_uri: String,
    #[serde(default)]
    pub related_uris: Option<HashMap<String, String>>,
}

/// One page of a Scryfall list response.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub data: Vec<ScryfallCard>,
    #[serde(default)]
    pub has_more: bool,
    #[serde(default)]
    pub next_page: Option<String>,
    #[serde(default)]
    pub total_cards: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    All,
    RandomOne,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    All(Vec<CommanderRecord>),
    RandomOne(Option<CommanderRecord>),
}

impl SearchOutcome {
    pub fn records(&self) -> Vec<&CommanderRecord> {
        match self {
            SearchOutcome::All(records) => records.iter().collect(),
            SearchOutcome::RandomOne(record) => record.iter().collect(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggled(self) -> Theme {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

impl std::str::FromStr for Theme {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "light" => Ok(Theme::Light),
            "dark" => Ok(Theme::Dark),
            other => Err(format!("unknown theme '{}', expected light or dark", other)),
        }
    }
}
