use async_trait::async_trait;
use uuid::Uuid;

use quill_core::domain::{Category, Tag};
use quill_core::error::RepoError;
use quill_core::ports::{BaseRepository, CategoryRepository, TagRepository};

use super::SharedTables;

pub struct InMemoryCategoryRepository {
    tables: SharedTables,
}

impl InMemoryCategoryRepository {
    pub(super) fn new(tables: SharedTables) -> Self {
        Self { tables }
    }
}

fn check_category(existing: &[&Category], category: &Category) -> Result<(), RepoError> {
    for other in existing.iter().filter(|c| c.id != category.id) {
        if other.name == category.name {
            return Err(RepoError::Duplicate("category name".to_string()));
        }
        if other.slug == category.slug {
            return Err(RepoError::Duplicate("category slug".to_string()));
        }
    }
    Ok(())
}

#[async_trait]
impl BaseRepository<Category, Uuid> for InMemoryCategoryRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.tables.read().await.categories.get(&id).cloned())
    }

    async fn insert(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        check_category(&tables.categories.values().collect::<Vec<_>>(), &category)?;
        if let Some(parent) = category.parent_id {
            if !tables.categories.contains_key(&parent) {
                return Err(RepoError::Constraint(format!("category {parent} does not exist")));
            }
        }
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }

    async fn update(&self, category: Category) -> Result<Category, RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.categories.contains_key(&category.id) {
            return Err(RepoError::NotFound);
        }
        check_category(&tables.categories.values().collect::<Vec<_>>(), &category)?;
        tables.categories.insert(category.id, category.clone());
        Ok(category)
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.values().find(|c| c.slug == slug).cloned())
    }

    async fn list(&self) -> Result<Vec<Category>, RepoError> {
        let tables = self.tables.read().await;
        let mut categories: Vec<Category> = tables.categories.values().cloned().collect();
        categories.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(categories)
    }

    async fn children(&self, parent_id: Uuid) -> Result<Vec<Category>, RepoError> {
        let tables = self.tables.read().await;
        let mut children: Vec<Category> = tables
            .categories
            .values()
            .filter(|c| c.parent_id == Some(parent_id))
            .cloned()
            .collect();
        children.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(children)
    }
}

pub struct InMemoryTagRepository {
    tables: SharedTables,
}

impl InMemoryTagRepository {
    pub(super) fn new(tables: SharedTables) -> Self {
        Self { tables }
    }
}

#[async_trait]
impl BaseRepository<Tag, Uuid> for InMemoryTagRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Tag>, RepoError> {
        Ok(self.tables.read().await.tags.get(&id).cloned())
    }

    async fn insert(&self, tag: Tag) -> Result<Tag, RepoError> {
        let mut tables = self.tables.write().await;
        for other in tables.tags.values() {
            if other.name == tag.name {
                return Err(RepoError::Duplicate("tag name".to_string()));
            }
            if other.slug == tag.slug {
                return Err(RepoError::Duplicate("tag slug".to_string()));
            }
        }
        tables.tags.insert(tag.id, tag.clone());
        Ok(tag)
    }

    async fn update(&self, tag: Tag) -> Result<Tag, RepoError> {
        let mut tables = self.tables.write().await;
        match tables.tags.get_mut(&tag.id) {
            Some(stored) => {
                *stored = tag.clone();
                Ok(tag)
            }
            None => Err(RepoError::NotFound),
        }
    }
}

#[async_trait]
impl TagRepository for InMemoryTagRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Tag>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.tags.values().find(|t| t.slug == slug).cloned())
    }

    async fn find_many(&self, ids: &[Uuid]) -> Result<Vec<Tag>, RepoError> {
        let tables = self.tables.read().await;
        Ok(ids
            .iter()
            .filter_map(|id| tables.tags.get(id))
            .cloned()
            .collect())
    }

    async fn list(&self) -> Result<Vec<Tag>, RepoError> {
        let tables = self.tables.read().await;
        let mut tags: Vec<Tag> = tables.tags.values().cloned().collect();
        tags.sort_by(|a, b| a.created_time.cmp(&b.created_time).then(a.id.cmp(&b.id)));
        Ok(tags)
    }
}
