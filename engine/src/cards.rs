//! Card metadata served to the engine's card-data callback.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

/// Type flag marking link monsters.
pub const TYPE_LINK: u32 = 0x400_0000;

/// A card row as stored in a card database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PackedCard {
    pub code: u32,
    pub alias: u32,
    pub type_flags: u32,
    /// Level or link rating in bits 0-7, right scale in 16-23, left scale in 24-31.
    pub level: u32,
    pub attribute: u32,
    pub race: u64,
    pub attack: i32,
    /// Link marker bitmask for link monsters.
    pub defense: i32,
}

/// Unpacked card statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CardStats {
    pub code: u32,
    pub alias: u32,
    pub type_flags: u32,
    /// Level, rank or link rating.
    pub level: u32,
    pub attribute: u32,
    pub race: u64,
    pub attack: i32,
    pub defense: i32,
    pub left_scale: u32,
    pub right_scale: u32,
    pub link_marker: u32,
}

impl CardStats {
    #[must_use]
    pub const fn from_packed(card: PackedCard) -> Self {
        let is_link = card.type_flags & TYPE_LINK != 0;
        Self {
            code: card.code,
            alias: card.alias,
            type_flags: card.type_flags,
            level: card.level & 0xFF,
            attribute: card.attribute,
            race: card.race,
            attack: card.attack,
            defense: if is_link { 0 } else { card.defense },
            left_scale: (card.level >> 24) & 0xFF,
            right_scale: (card.level >> 16) & 0xFF,
            link_marker: if is_link { card.defense as u32 } else { 0 },
        }
    }

    #[must_use]
    pub const fn is_link(&self) -> bool {
        self.type_flags & TYPE_LINK != 0
    }
}

/// Shared, read-mostly card table.
///
/// Clones share one table. Lookups take a read lock and may run from the
/// engine's callback while a step is in progress; [`reload`](Self::reload)
/// builds the new table first and holds the write lock only for the swap.
#[derive(Debug, Clone, Default)]
pub struct CardStore {
    cards: Arc<RwLock<HashMap<u32, CardStats>>>,
}

impl CardStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: impl IntoIterator<Item = CardStats>) -> Self {
        let store = Self::new();
        store.reload(cards);
        store
    }

    pub fn lookup(&self, code: u32) -> Option<CardStats> {
        self.cards
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&code)
            .copied()
    }

    /// Inserts or replaces one card.
    pub fn insert(&self, stats: CardStats) -> Option<CardStats> {
        self.cards
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(stats.code, stats)
    }

    /// Replaces the whole table.
    pub fn reload(&self, cards: impl IntoIterator<Item = CardStats>) {
        let table: HashMap<u32, CardStats> = cards.into_iter().map(|c| (c.code, c)).collect();
        *self.cards.write().unwrap_or_else(PoisonError::into_inner) = table;
    }

    pub fn len(&self) -> usize {
        self.cards.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(feature = "sqlite")]
mod sqlite {
    use std::fmt;
    use std::path::Path;

    use rusqlite::{Connection, OpenFlags};

    use super::{CardStats, CardStore, PackedCard};

    const SELECT_CARDS: &str =
        "SELECT id, alias, type, level, attribute, race, atk, def FROM datas";

    /// Failure reading a card database.
    #[derive(Debug)]
    pub struct CardDbError {
        source: rusqlite::Error,
    }

    impl fmt::Display for CardDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "card database: {}", self.source)
        }
    }

    impl std::error::Error for CardDbError {
        fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
            Some(&self.source)
        }
    }

    impl From<rusqlite::Error> for CardDbError {
        fn from(source: rusqlite::Error) -> Self {
            Self { source }
        }
    }

    impl CardStore {
        /// Loads every row of the `datas` table of a `cards.cdb` file.
        pub fn open_sqlite(path: impl AsRef<Path>) -> Result<Self, CardDbError> {
            let store = Self::new();
            store.reload_sqlite(path)?;
            Ok(store)
        }

        /// Replaces the table with the contents of a card database.
        pub fn reload_sqlite(&self, path: impl AsRef<Path>) -> Result<usize, CardDbError> {
            let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)?;
            let cards = read_cards(&conn)?;
            let count = cards.len();
            self.reload(cards);
            tracing::debug!(count, "card database loaded");
            Ok(count)
        }
    }

    pub(super) fn read_cards(conn: &Connection) -> Result<Vec<CardStats>, CardDbError> {
        let mut stmt = conn.prepare(SELECT_CARDS)?;
        let rows = stmt.query_map([], |row| {
            Ok(PackedCard {
                code: row.get(0)?,
                alias: row.get(1)?,
                type_flags: row.get(2)?,
                level: row.get(3)?,
                attribute: row.get(4)?,
                race: row.get::<_, i64>(5)?.try_into().unwrap_or_default(),
                attack: row.get(6)?,
                defense: row.get(7)?,
            })
        })?;
        let mut cards = Vec::new();
        for row in rows {
            cards.push(CardStats::from_packed(row?));
        }
        Ok(cards)
    }

}

#[cfg(feature = "sqlite")]
pub use sqlite::CardDbError;

#[cfg(test)]
mod tests {
    use super::*;

    fn card(code: u32) -> CardStats {
        CardStats {
            code,
            ..CardStats::default()
        }
    }

    #[test]
    fn unpacks_pendulum_scales() {
        let stats = CardStats::from_packed(PackedCard {
            code: 1,
            type_flags: 0x100_0021,
            level: 0x0808_0004,
            defense: 1200,
            ..PackedCard::default()
        });
        assert_eq!(stats.level, 4);
        assert_eq!(stats.left_scale, 8);
        assert_eq!(stats.right_scale, 8);
        assert_eq!(stats.defense, 1200);
        assert_eq!(stats.link_marker, 0);
    }

    #[test]
    fn link_monsters_repurpose_defense() {
        let stats = CardStats::from_packed(PackedCard {
            code: 2,
            type_flags: TYPE_LINK | 0x1,
            level: 3,
            defense: 0x2A,
            ..PackedCard::default()
        });
        assert!(stats.is_link());
        assert_eq!(stats.level, 3);
        assert_eq!(stats.defense, 0);
        assert_eq!(stats.link_marker, 0x2A);
    }

    #[test]
    fn clones_share_the_table() {
        let store = CardStore::new();
        let view = store.clone();
        assert!(view.is_empty());
        store.insert(card(10));
        assert_eq!(view.lookup(10), Some(card(10)));
        assert_eq!(view.len(), 1);
    }

    #[test]
    fn reload_swaps_everything() {
        let store = CardStore::from_cards([card(1), card(2)]);
        store.reload([card(3)]);
        assert_eq!(store.lookup(1), None);
        assert_eq!(store.lookup(3), Some(card(3)));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn concurrent_readers() {
        let store = CardStore::from_cards((0..100).map(card));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let store = store.clone();
                std::thread::spawn(move || (0..100).filter(|c| store.lookup(*c).is_some()).count())
            })
            .collect();
        store.reload((0..100).map(card));
        for handle in handles {
            assert_eq!(handle.join().unwrap(), 100);
        }
    }
}
