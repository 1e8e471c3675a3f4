//! Story content: cities, chapters and story pieces.
//!
//! A chapter is a small graph of story pieces. Each piece carries template
//! text for the generator and says where the story goes next: a list of
//! follow-up pieces, a fight, or the end of the written content.

use serde::{Deserialize, Serialize};

use crate::core::{Catalog, ChapterId, CityKey, ContentError, Definition, EnemyKey, StoryPieceId};

/// Placeholder replaced with the current city's name.
pub const CITY_PLACEHOLDER: &str = "[city]";

/// A city the player can start in.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct City {
    pub key: CityKey,
    pub description: String,
    /// School of magic practised there.
    pub school: String,
}

impl City {
    #[must_use]
    pub fn new(key: impl Into<String>, description: impl Into<String>, school: impl Into<String>) -> Self {
        Self {
            key: CityKey::new(key),
            description: description.into(),
            school: school.into(),
        }
    }

    /// Display label for the city picker, e.g. `"Emberpeak (A volcanic city...)"`.
    #[must_use]
    pub fn label(&self) -> String {
        format!("{} ({})", self.key, self.description)
    }
}

impl Definition for City {
    type Key = CityKey;

    fn key(&self) -> &CityKey {
        &self.key
    }

    fn missing(key: &CityKey) -> ContentError {
        ContentError::UnknownCity(key.clone())
    }
}

/// Ordered city list. Setup picks cities by position.
pub type CityCatalog = Catalog<City>;

/// Where a story piece leads.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoryNext {
    /// Option `i` leads to `pieces[i % len]`.
    Options { pieces: Vec<StoryPieceId> },
    /// Every option starts this fight.
    Combat {
        enemies: Vec<EnemyKey>,
        /// Piece to continue with after a win. Defaults to the chapter start.
        #[serde(default)]
        victory: Option<StoryPieceId>,
    },
    /// No more written content.
    End,
}

/// One node of a chapter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoryPiece {
    pub id: StoryPieceId,
    /// Template text; may contain [`CITY_PLACEHOLDER`].
    pub text: String,
    pub next: StoryNext,
}

impl StoryPiece {
    #[must_use]
    pub fn options(id: impl Into<String>, text: impl Into<String>, pieces: &[&str]) -> Self {
        Self {
            id: StoryPieceId::new(id),
            text: text.into(),
            next: StoryNext::Options {
                pieces: pieces.iter().map(|p| StoryPieceId::new(*p)).collect(),
            },
        }
    }

    #[must_use]
    pub fn combat(id: impl Into<String>, text: impl Into<String>, enemy: impl Into<String>) -> Self {
        Self {
            id: StoryPieceId::new(id),
            text: text.into(),
            next: StoryNext::Combat {
                enemies: vec![EnemyKey::new(enemy)],
                victory: None,
            },
        }
    }

    #[must_use]
    pub fn end(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            id: StoryPieceId::new(id),
            text: text.into(),
            next: StoryNext::End,
        }
    }

    /// Set the piece a combat link continues with after victory.
    #[must_use]
    pub fn on_victory(mut self, piece: impl Into<String>) -> Self {
        if let StoryNext::Combat { victory, .. } = &mut self.next {
            *victory = Some(StoryPieceId::new(piece));
        }
        self
    }

    /// Template text with the city substituted.
    #[must_use]
    pub fn render(&self, city: &str) -> String {
        self.text.replace(CITY_PLACEHOLDER, city)
    }
}

/// A chapter of the story.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    pub id: ChapterId,
    #[serde(default)]
    pub possible_locations: Vec<CityKey>,
    pub pieces: Vec<StoryPiece>,
}

impl Chapter {
    #[must_use]
    pub fn new(id: u32) -> Self {
        Self {
            id: ChapterId::new(id),
            possible_locations: Vec::new(),
            pieces: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_locations(mut self, cities: &[&str]) -> Self {
        self.possible_locations = cities.iter().map(|c| CityKey::new(*c)).collect();
        self
    }

    #[must_use]
    pub fn with_piece(mut self, piece: StoryPiece) -> Self {
        self.pieces.push(piece);
        self
    }

    /// Look up a piece by id.
    pub fn piece(&self, id: &StoryPieceId) -> Result<&StoryPiece, ContentError> {
        self.pieces
            .iter()
            .find(|p| &p.id == id)
            .ok_or_else(|| ContentError::UnknownStoryPiece {
                chapter: self.id,
                piece: id.clone(),
            })
    }
}

impl Definition for Chapter {
    type Key = ChapterId;

    fn key(&self) -> &ChapterId {
        &self.id
    }

    fn missing(key: &ChapterId) -> ContentError {
        ContentError::UnknownChapter(*key)
    }
}

/// Chapters by number.
pub type StoryCatalog = Catalog<Chapter>;

/// Resolve `piece` in `chapter`.
pub fn find_piece<'a>(
    story: &'a StoryCatalog,
    chapter: ChapterId,
    piece: &StoryPieceId,
) -> Result<&'a StoryPiece, ContentError> {
    story.get(&chapter)?.piece(piece)
}
