//! The content library catalog.

use std::sync::RwLock;

use vrlab_types::{ContentId, ContentItem, Difficulty, EnvironmentKind};

use crate::error::StoreError;

const STORE: &str = "content";

const PLACEHOLDER_THUMBNAIL: &str = "/placeholder.svg?height=200&width=300";

/// Optional filters for [`ContentCatalog::list`], compared against wire tags.
///
/// A tag that names no environment or difficulty simply matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentFilter {
    /// Environment tag, e.g. `forest`.
    pub environment_type: Option<String>,
    /// Difficulty tag, e.g. `beginner`.
    pub difficulty: Option<String>,
}

impl ContentFilter {
    fn matches(&self, item: &ContentItem) -> bool {
        self.environment_type
            .as_deref()
            .is_none_or(|tag| item.environment_type.as_str() == tag)
            && self
                .difficulty
                .as_deref()
                .is_none_or(|tag| item.difficulty_level.as_str() == tag)
    }
}

/// Read access to the catalog.
pub trait ContentCatalog: Send + Sync {
    /// Items matching `filter`, in catalog order.
    fn list(&self, filter: &ContentFilter) -> Result<Vec<ContentItem>, StoreError>;

    /// The id a newly created item would receive (`len + 1`).
    fn next_id(&self) -> Result<ContentId, StoreError>;

    /// Drop every item.
    fn clear(&self) -> Result<(), StoreError>;
}

/// [`ContentCatalog`] backed by a vector.
#[derive(Debug)]
pub struct MemoryContentCatalog {
    items: RwLock<Vec<ContentItem>>,
}

impl MemoryContentCatalog {
    /// A catalog holding exactly `items`.
    pub const fn with_items(items: Vec<ContentItem>) -> Self {
        Self {
            items: RwLock::new(items),
        }
    }

    /// The stock library served by the content API.
    pub fn seeded() -> Self {
        Self::with_items(stock_items())
    }
}

impl Default for MemoryContentCatalog {
    fn default() -> Self {
        Self::seeded()
    }
}

impl ContentCatalog for MemoryContentCatalog {
    fn list(&self, filter: &ContentFilter) -> Result<Vec<ContentItem>, StoreError> {
        let items = self
            .items
            .read()
            .map_err(|_poisoned| StoreError::Poisoned(STORE))?;
        Ok(items.iter().filter(|i| filter.matches(i)).cloned().collect())
    }

    fn next_id(&self) -> Result<ContentId, StoreError> {
        let items = self
            .items
            .read()
            .map_err(|_poisoned| StoreError::Poisoned(STORE))?;
        let len = u64::try_from(items.len()).unwrap_or(u64::MAX);
        Ok(ContentId(len.saturating_add(1)))
    }

    fn clear(&self) -> Result<(), StoreError> {
        self.items
            .write()
            .map_err(|_poisoned| StoreError::Poisoned(STORE))?
            .clear();
        Ok(())
    }
}

fn item(
    id: u64,
    title: &str,
    description: &str,
    environment_type: EnvironmentKind,
    content_url: &str,
    difficulty_level: Difficulty,
    duration_minutes: u32,
) -> ContentItem {
    ContentItem {
        id: ContentId(id),
        title: title.to_owned(),
        description: description.to_owned(),
        environment_type,
        content_url: content_url.to_owned(),
        thumbnail_url: PLACEHOLDER_THUMBNAIL.to_owned(),
        difficulty_level,
        duration_minutes,
    }
}

fn stock_items() -> Vec<ContentItem> {
    vec![
        item(
            1,
            "Ocean Depths Explorer",
            "Dive into the mysterious depths of the ocean and discover marine life",
            EnvironmentKind::Underwater,
            "/vr/ocean-depths",
            Difficulty::Beginner,
            15,
        ),
        item(
            2,
            "Space Station Adventure",
            "Experience life aboard a space station in zero gravity",
            EnvironmentKind::Space,
            "/vr/space-station",
            Difficulty::Intermediate,
            25,
        ),
        item(
            3,
            "Ancient Forest Journey",
            "Walk through an enchanted ancient forest with magical creatures",
            EnvironmentKind::Forest,
            "/vr/ancient-forest",
            Difficulty::Beginner,
            20,
        ),
        item(
            4,
            "Cyberpunk City Tour",
            "Navigate through a futuristic cyberpunk metropolis",
            EnvironmentKind::Urban,
            "/vr/cyberpunk-city",
            Difficulty::Advanced,
            30,
        ),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn titles(catalog: &MemoryContentCatalog, filter: &ContentFilter) -> Vec<String> {
        catalog
            .list(filter)
            .unwrap_or_default()
            .into_iter()
            .map(|i| i.title)
            .collect()
    }

    #[test]
    fn stock_catalog_has_four_experiences() {
        let items = MemoryContentCatalog::seeded()
            .list(&ContentFilter::default())
            .unwrap_or_default();
        let ids: Vec<ContentId> = items.iter().map(|i| i.id).collect();
        assert_eq!(ids, vec![ContentId(1), ContentId(2), ContentId(3), ContentId(4)]);
        assert!(items.iter().all(|i| i.environment_type != EnvironmentKind::Mountain));
    }

    #[test]
    fn filters_by_environment_and_difficulty() {
        let catalog = MemoryContentCatalog::seeded();

        let beginner = ContentFilter {
            difficulty: Some("beginner".to_owned()),
            ..ContentFilter::default()
        };
        assert_eq!(
            titles(&catalog, &beginner),
            vec!["Ocean Depths Explorer", "Ancient Forest Journey"]
        );

        let forest_advanced = ContentFilter {
            environment_type: Some("forest".to_owned()),
            difficulty: Some("advanced".to_owned()),
        };
        assert!(titles(&catalog, &forest_advanced).is_empty());
    }

    #[test]
    fn unknown_tag_matches_nothing() {
        let catalog = MemoryContentCatalog::seeded();
        let filter = ContentFilter {
            environment_type: Some("volcano".to_owned()),
            ..ContentFilter::default()
        };
        assert!(titles(&catalog, &filter).is_empty());
    }

    #[test]
    fn next_id_does_not_grow_the_catalog() {
        let catalog = MemoryContentCatalog::seeded();
        assert_eq!(catalog.next_id(), Ok(ContentId(5)));
        assert_eq!(catalog.next_id(), Ok(ContentId(5)));
    }
}
