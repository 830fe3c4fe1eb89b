/// A selectable tag or genre from the bundled facet catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FacetRef {
    pub id: u32,
    pub name: &'static str,
    pub slug: &'static str,
}

/// Which facet list a `FacetRef` belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetKind {
    Tag,
    Genre,
}

impl FacetKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Tag => "Tag",
            Self::Genre => "Genre",
        }
    }
}

const fn facet(id: u32, name: &'static str, slug: &'static str) -> FacetRef {
    FacetRef { id, name, slug }
}

pub const ALL_TAGS: &[FacetRef] = &[
    facet(31, "Singleplayer", "singleplayer"),
    facet(7, "Multiplayer", "multiplayer"),
    facet(13, "Atmospheric", "atmospheric"),
    facet(42, "Great Soundtrack", "great-soundtrack"),
    facet(24, "RPG", "rpg"),
    facet(18, "Co-op", "co-op"),
    facet(118, "Story Rich", "story-rich"),
    facet(36, "Open World", "open-world"),
    facet(411, "cooperative", "cooperative"),
    facet(8, "First-Person", "first-person"),
    facet(149, "Third Person", "third-person"),
    facet(4, "Funny", "funny"),
    facet(37, "Sandbox", "sandbox"),
    facet(123, "Comedy", "comedy"),
    facet(150, "Third-Person Shooter", "third-person-shooter"),
    facet(62, "Moddable", "moddable"),
    facet(40836, "Full controller support", "full-controller-support"),
    facet(397, "Online multiplayer", "online-multiplayer"),
    facet(64, "Fantasy", "fantasy"),
    facet(193, "Classic", "classic"),
    facet(32, "Sci-fi", "sci-fi"),
    facet(16, "Horror", "horror"),
    facet(15, "Stealth", "stealth"),
    facet(69, "Action-Adventure", "action-adventure"),
];

pub const ALL_GENRES: &[FacetRef] = &[
    facet(4, "Action", "action"),
    facet(51, "Indie", "indie"),
    facet(3, "Adventure", "adventure"),
    facet(5, "RPG", "role-playing-games-rpg"),
    facet(10, "Strategy", "strategy"),
    facet(2, "Shooter", "shooter"),
    facet(40, "Casual", "casual"),
    facet(14, "Simulation", "simulation"),
    facet(7, "Puzzle", "puzzle"),
    facet(11, "Arcade", "arcade"),
    facet(83, "Platformer", "platformer"),
    facet(59, "Massively Multiplayer", "massively-multiplayer"),
    facet(1, "Racing", "racing"),
    facet(15, "Sports", "sports"),
    facet(6, "Fighting", "fighting"),
    facet(19, "Family", "family"),
    facet(28, "Board Games", "board-games"),
    facet(34, "Educational", "educational"),
    facet(17, "Card", "card"),
];

/// All selectable facets in filter-panel order: tags first, then genres.
pub fn entries() -> Vec<(FacetKind, FacetRef)> {
    ALL_TAGS
        .iter()
        .map(|f| (FacetKind::Tag, *f))
        .chain(ALL_GENRES.iter().map(|f| (FacetKind::Genre, *f)))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_entries_order_tags_then_genres() {
        let all = entries();
        assert_eq!(all.len(), ALL_TAGS.len() + ALL_GENRES.len());
        assert_eq!(all[0], (FacetKind::Tag, ALL_TAGS[0]));
        assert_eq!(all[ALL_TAGS.len()], (FacetKind::Genre, ALL_GENRES[0]));
    }

    #[test]
    fn test_slugs_unique_within_kind() {
        let tags: HashSet<_> = ALL_TAGS.iter().map(|f| f.slug).collect();
        assert_eq!(tags.len(), ALL_TAGS.len());
        let genres: HashSet<_> = ALL_GENRES.iter().map(|f| f.slug).collect();
        assert_eq!(genres.len(), ALL_GENRES.len());
    }
}
