//! Tile catalog and the per-level block name mapping.

use std::{collections::BTreeMap, fmt};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifier written to level files for a block kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TileId(i32);

impl TileId {
    /// Creates a new tile identifier with the provided numeric value.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Retrieves the numeric representation of the identifier.
    #[must_use]
    pub const fn get(&self) -> i32 {
        self.0
    }
}

impl fmt::Display for TileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Graphics lookup key for the player sprite. Never stored in a grid.
pub const PLAYER_SPRITE_ID: TileId = TileId::new(-1);

/// Name under which the player sprite id is published in block mappings.
const PLAYER_NAME: &str = "PLAYER";

/// Kinds of tiles that can occupy a level grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Empty space the player can move through.
    #[default]
    Air,
    /// Solid terrain.
    Ground,
    /// Obstacle that kills the player on contact.
    Enemy,
    /// Collectible worth points.
    Coin,
    /// Location where the player enters the level.
    Spawn,
    /// Location the player must reach to finish the level.
    Goal,
}

impl TileKind {
    /// Every tile kind in reserved id order.
    pub const ALL: [TileKind; 6] = [
        Self::Air,
        Self::Ground,
        Self::Enemy,
        Self::Coin,
        Self::Spawn,
        Self::Goal,
    ];

    /// Identifier reserved for the kind by the generator.
    #[must_use]
    pub const fn reserved_id(self) -> TileId {
        match self {
            Self::Air => TileId::new(0),
            Self::Ground => TileId::new(1),
            Self::Enemy => TileId::new(2),
            Self::Coin => TileId::new(3),
            Self::Spawn => TileId::new(4),
            Self::Goal => TileId::new(5),
        }
    }

    /// Canonical upper-case name used in the `!blocks` section.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Air => "AIR",
            Self::Ground => "GROUND",
            Self::Enemy => "ENEMY",
            Self::Coin => "COIN",
            Self::Spawn => "SPAWN",
            Self::Goal => "GOAL",
        }
    }

    /// Resolves a block name, ignoring ASCII case.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.name().eq_ignore_ascii_case(name))
    }
}

/// Reasons a block mapping entry may be rejected.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum BlockMappingError {
    /// The name is already bound to another id.
    #[error("block name `{name}` is already mapped to id {existing}")]
    DuplicateName {
        /// Upcased name that was inserted twice.
        name: String,
        /// Identifier the name was first bound to.
        existing: TileId,
    },
    /// The id is already bound to another name.
    #[error("block id {id} is already mapped to `{existing}`")]
    DuplicateId {
        /// Identifier that was inserted twice.
        id: TileId,
        /// Name the id was first bound to.
        existing: String,
    },
}

/// Bijective mapping between block names and tile identifiers.
///
/// Names are stored upcased, so lookups are case-insensitive.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BlockMapping {
    by_name: BTreeMap<String, TileId>,
    by_id: BTreeMap<TileId, String>,
}

impl BlockMapping {
    /// Creates an empty mapping.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mapping used by the generator: every [`TileKind`] plus the player sprite.
    #[must_use]
    pub fn reserved() -> Self {
        let mut mapping = Self::new();
        let reserved = std::iter::once((PLAYER_NAME, PLAYER_SPRITE_ID))
            .chain(TileKind::ALL.map(|kind| (kind.name(), kind.reserved_id())));
        for (name, id) in reserved {
            let _ = mapping.by_name.insert(name.to_owned(), id);
            let _ = mapping.by_id.insert(id, name.to_owned());
        }
        mapping
    }

    /// Binds `name` to `id`, rejecting entries that would break the bijection.
    ///
    /// Re-inserting an identical pair is accepted.
    pub fn insert(&mut self, name: &str, id: TileId) -> Result<(), BlockMappingError> {
        let name = name.to_ascii_uppercase();
        if let Some(existing) = self.by_name.get(&name) {
            if *existing == id {
                return Ok(());
            }
            return Err(BlockMappingError::DuplicateName {
                name,
                existing: *existing,
            });
        }
        if let Some(existing) = self.by_id.get(&id) {
            return Err(BlockMappingError::DuplicateId {
                id,
                existing: existing.clone(),
            });
        }
        let _ = self.by_id.insert(id, name.clone());
        let _ = self.by_name.insert(name, id);
        Ok(())
    }

    /// Identifier bound to `name`, ignoring ASCII case.
    #[must_use]
    pub fn id_of(&self, name: &str) -> Option<TileId> {
        self.by_name.get(&name.to_ascii_uppercase()).copied()
    }

    /// Upcased name bound to `id`.
    #[must_use]
    pub fn name_of(&self, id: TileId) -> Option<&str> {
        self.by_id.get(&id).map(String::as_str)
    }

    /// Tile kind an identifier stands for, resolved through its name.
    #[must_use]
    pub fn kind_of(&self, id: TileId) -> Option<TileKind> {
        self.name_of(id).and_then(TileKind::from_name)
    }

    /// Identifier this mapping assigns to `kind`.
    #[must_use]
    pub fn id_for(&self, kind: TileKind) -> Option<TileId> {
        self.id_of(kind.name())
    }

    /// Iterates over `(name, id)` pairs in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, TileId)> {
        self.by_id.iter().map(|(id, name)| (name.as_str(), *id))
    }

    /// Number of entries in the mapping.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Reports whether the mapping holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reserved_mapping_covers_every_kind_and_the_player() {
        let mapping = BlockMapping::reserved();
        assert_eq!(mapping.len(), TileKind::ALL.len() + 1);
        for kind in TileKind::ALL {
            assert_eq!(mapping.id_for(kind), Some(kind.reserved_id()));
            assert_eq!(mapping.kind_of(kind.reserved_id()), Some(kind));
        }
        assert_eq!(mapping.id_of("player"), Some(PLAYER_SPRITE_ID));
        assert_eq!(mapping.kind_of(PLAYER_SPRITE_ID), None);
    }

    #[test]
    fn reserved_mapping_iterates_in_id_order() {
        let ids: Vec<i32> = BlockMapping::reserved()
            .iter()
            .map(|(_, id)| id.get())
            .collect();
        assert_eq!(ids, vec![-1, 0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn names_are_case_insensitive() {
        let mut mapping = BlockMapping::new();
        mapping.insert("Ground", TileId::new(7)).expect("insert");
        assert_eq!(mapping.id_of("GROUND"), Some(TileId::new(7)));
        assert_eq!(mapping.id_of("ground"), Some(TileId::new(7)));
        assert_eq!(mapping.name_of(TileId::new(7)), Some("GROUND"));
        assert_eq!(mapping.kind_of(TileId::new(7)), Some(TileKind::Ground));
    }

    #[test]
    fn insert_rejects_entries_breaking_the_bijection() {
        let mut mapping = BlockMapping::new();
        mapping.insert("air", TileId::new(0)).expect("insert");
        mapping
            .insert("AIR", TileId::new(0))
            .expect("identical pair is accepted");

        assert_eq!(
            mapping.insert("air", TileId::new(1)),
            Err(BlockMappingError::DuplicateName {
                name: "AIR".to_owned(),
                existing: TileId::new(0),
            })
        );
        assert_eq!(
            mapping.insert("ground", TileId::new(0)),
            Err(BlockMappingError::DuplicateId {
                id: TileId::new(0),
                existing: "AIR".to_owned(),
            })
        );
    }

    #[test]
    fn tile_kind_names_resolve_back() {
        for kind in TileKind::ALL {
            assert_eq!(TileKind::from_name(&kind.name().to_lowercase()), Some(kind));
        }
        assert_eq!(TileKind::from_name("player"), None);
    }
}
