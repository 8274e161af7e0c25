use serde::{Deserialize, Serialize};

use stockwise_core::{CategoryId, DomainError, DomainResult, Entity};

use crate::{MAX_DESCRIPTION_LEN, MAX_NAME_LEN};

/// Product category. Names are unique, enforced by the persistence tier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Category {
    #[serde(default)]
    pub id: Option<CategoryId>,
    #[serde(rename = "nombre", default)]
    pub name: Option<String>,
    #[serde(rename = "descripcion", default)]
    pub description: Option<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: None,
            name: Some(name.into()),
            description,
        }
    }
}

impl Entity for Category {
    type Id = CategoryId;

    fn id(&self) -> Option<Self::Id> {
        self.id
    }
}

/// Validate a category payload (create and update share one rule set).
pub fn validate_category(category: &Category) -> DomainResult<()> {
    let name = category.name.as_deref().unwrap_or_default();
    if name.trim().is_empty() {
        return Err(DomainError::validation("category name is required"));
    }
    if name.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(
            "category name must not exceed 100 characters",
        ));
    }
    if let Some(description) = &category.description {
        if description.chars().count() > MAX_DESCRIPTION_LEN {
            return Err(DomainError::validation(
                "description must not exceed 500 characters",
            ));
        }
    }
    Ok(())
}

/// Check a category name used as a lookup key and return it trimmed.
pub fn normalize_category_name(name: &str) -> DomainResult<String> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(DomainError::validation("category name is required"));
    }
    Ok(trimmed.to_string())
}
