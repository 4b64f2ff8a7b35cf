//! Category tree and tag registry.

use std::collections::HashSet;
use std::sync::Arc;

use uuid::Uuid;

use crate::domain::slug::{is_valid_slug, slugify};
use crate::domain::{Category, Tag};
use crate::error::{DomainError, RepoError};
use crate::ports::{CategoryRepository, TagRepository};

const MAX_NAME_LEN: usize = 80;

pub struct TaxonomyService {
    categories: Arc<dyn CategoryRepository>,
    tags: Arc<dyn TagRepository>,
}

impl TaxonomyService {
    pub fn new(categories: Arc<dyn CategoryRepository>, tags: Arc<dyn TagRepository>) -> Self {
        Self { categories, tags }
    }

    pub async fn create_category(
        &self,
        name: &str,
        slug: Option<&str>,
        parent_id: Option<Uuid>,
    ) -> Result<Category, DomainError> {
        let (name, slug) = validate_label(name, slug)?;
        if let Some(parent_id) = parent_id {
            self.category(parent_id).await?;
        }

        let category = self
            .categories
            .insert(Category::new(name, Some(slug), parent_id))
            .await?;

        tracing::info!(category_id = %category.id, slug = %category.slug, "Category created");
        Ok(category)
    }

    /// Move a category under `parent_id` (or to the root with `None`).
    pub async fn set_parent(
        &self,
        id: Uuid,
        parent_id: Option<Uuid>,
    ) -> Result<Category, DomainError> {
        let mut category = self.category(id).await?;

        if let Some(parent_id) = parent_id {
            if parent_id == id {
                return Err(DomainError::Validation(
                    "A category cannot be its own parent".to_string(),
                ));
            }
            let path = self.category_path(parent_id).await?;
            if path.iter().any(|c| c.id == id) {
                return Err(DomainError::Validation(format!(
                    "Moving '{}' under '{}' would create a cycle",
                    category.slug,
                    path.last().map(|c| c.slug.as_str()).unwrap_or_default()
                )));
            }
        }

        category.parent_id = parent_id;
        self.categories.update(category).await.map_err(|e| match e {
            RepoError::NotFound => DomainError::not_found("category", id),
            other => other.into(),
        })
    }

    pub async fn categories(&self) -> Result<Vec<Category>, DomainError> {
        Ok(self.categories.list().await?)
    }

    pub async fn category(&self, id: Uuid) -> Result<Category, DomainError> {
        self.categories
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("category", id))
    }

    pub async fn category_by_slug(&self, slug: &str) -> Result<Category, DomainError> {
        self.categories
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("category", slug))
    }

    pub async fn children(&self, id: Uuid) -> Result<Vec<Category>, DomainError> {
        Ok(self.categories.children(id).await?)
    }

    /// Ancestors of `id` from the root down, ending with the category itself.
    /// Fails if the stored parent links loop.
    pub async fn category_path(&self, id: Uuid) -> Result<Vec<Category>, DomainError> {
        let mut path = Vec::new();
        let mut seen = HashSet::new();
        let mut next = Some(id);

        while let Some(current) = next {
            if !seen.insert(current) {
                tracing::error!(category_id = %id, "Category parent links form a cycle");
                return Err(DomainError::Validation(format!(
                    "Category {id} has a cyclic parent chain"
                )));
            }
            let category = self.category(current).await?;
            next = category.parent_id;
            path.push(category);
        }

        path.reverse();
        Ok(path)
    }

    pub async fn create_tag(&self, name: &str, slug: Option<&str>) -> Result<Tag, DomainError> {
        let (name, slug) = validate_label(name, slug)?;
        let tag = self.tags.insert(Tag::new(name, Some(slug))).await?;

        tracing::info!(tag_id = %tag.id, slug = %tag.slug, "Tag created");
        Ok(tag)
    }

    pub async fn tags(&self) -> Result<Vec<Tag>, DomainError> {
        Ok(self.tags.list().await?)
    }

    pub async fn tag_by_slug(&self, slug: &str) -> Result<Tag, DomainError> {
        self.tags
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| DomainError::not_found("tag", slug))
    }
}

/// Trim the name and settle on a slug, derived when none is given.
fn validate_label(name: &str, slug: Option<&str>) -> Result<(String, String), DomainError> {
    let name = name.trim();
    if name.is_empty() || name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::Validation(format!(
            "Name must be between 1 and {MAX_NAME_LEN} characters"
        )));
    }

    let slug = match slug {
        Some(slug) if !is_valid_slug(slug) => {
            return Err(DomainError::Validation(format!("'{slug}' is not a valid slug")));
        }
        Some(slug) => slug.to_string(),
        None => slugify(name),
    };
    if slug.is_empty() {
        return Err(DomainError::Validation(
            "Name must contain at least one letter or digit".to_string(),
        ));
    }

    Ok((name.to_string(), slug))
}
