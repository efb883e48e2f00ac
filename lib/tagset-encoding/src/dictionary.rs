use std::{fmt, hash::BuildHasher as _};

use hashbrown::HashTable;

type FastBuildHasher = foldhash::quality::RandomState;

/// Result of looking up a tag in a [`TagDictionary`].
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Lookup {
    /// The tag was already present, at the given index.
    Existing(usize),

    /// The tag was not present, and has been inserted at the given index.
    Inserted(usize),
}

impl Lookup {
    /// Returns the index of the tag.
    pub const fn index(self) -> usize {
        match self {
            Self::Existing(index) | Self::Inserted(index) => index,
        }
    }
}

/// An append-only dictionary of tags.
///
/// Tags are assigned indices in first-seen order, starting at zero. Once assigned, an index never changes and never
/// gets reused, and a tag is never stored more than once.
///
/// ## Storage
///
/// Tag bytes are copied into a single string arena, with a span table mapping each index to its bytes. The hash index
/// holds nothing but indices, and resolves them through the span table when comparing or rehashing. Inserting a tag
/// therefore never allocates on its own: the arena, the span table, and the hash index each grow geometrically, and
/// only when they run out of room.
pub struct TagDictionary {
    hash_builder: FastBuildHasher,
    indices: HashTable<usize>,
    spans: Vec<(usize, usize)>,
    arena: String,
}

impl TagDictionary {
    /// Creates a new, empty `TagDictionary`.
    pub fn new() -> Self {
        Self {
            hash_builder: FastBuildHasher::default(),
            indices: HashTable::new(),
            spans: Vec::new(),
            arena: String::new(),
        }
    }

    /// Creates a new, empty `TagDictionary` with room for `tags` tags totalling `bytes` bytes.
    pub fn with_capacity(tags: usize, bytes: usize) -> Self {
        Self {
            hash_builder: FastBuildHasher::default(),
            indices: HashTable::with_capacity(tags),
            spans: Vec::with_capacity(tags),
            arena: String::with_capacity(bytes),
        }
    }

    /// Returns the number of tags in the dictionary.
    pub fn len(&self) -> usize {
        self.spans.len()
    }

    /// Returns `true` if the dictionary is empty.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty()
    }

    /// Returns the total size of all tags in the dictionary, in bytes.
    pub fn tag_bytes(&self) -> usize {
        self.arena.len()
    }

    /// Returns the tag at the given index, if one exists.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.spans.get(index).map(|&(start, end)| &self.arena[start..end])
    }

    /// Returns the index of the given tag, if it is present.
    pub fn index_of(&self, tag: &str) -> Option<usize> {
        let hash = self.hash_builder.hash_one(tag);
        self.indices
            .find(hash, |&index| resolve(&self.spans, &self.arena, index) == tag)
            .copied()
    }

    /// Looks up the given tag, inserting it at the next available index if it is not yet present.
    pub fn get_or_insert(&mut self, tag: &str) -> Lookup {
        let hash = self.hash_builder.hash_one(tag);

        let Self {
            hash_builder,
            indices,
            spans,
            arena,
        } = self;

        if let Some(&index) = indices.find(hash, |&index| resolve(&*spans, &*arena, index) == tag) {
            return Lookup::Existing(index);
        }

        let index = spans.len();
        let start = arena.len();
        arena.push_str(tag);
        spans.push((start, arena.len()));

        indices.insert_unique(hash, index, |&index| hash_builder.hash_one(resolve(&*spans, &*arena, index)));

        Lookup::Inserted(index)
    }

    /// Returns an iterator over the tags in the dictionary, in index order.
    pub fn iter(&self) -> impl Iterator<Item = &str> + '_ {
        self.spans.iter().map(|&(start, end)| &self.arena[start..end])
    }
}

impl Default for TagDictionary {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for TagDictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TagDictionary")
            .field("len", &self.len())
            .field("tag_bytes", &self.tag_bytes())
            .finish()
    }
}

fn resolve<'a>(spans: &[(usize, usize)], arena: &'a str, index: usize) -> &'a str {
    let (start, end) = spans[index];
    &arena[start..end]
}
