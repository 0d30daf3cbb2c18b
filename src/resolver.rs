//! Recipe lookup.
//!
//! The planner resolves each step's recipe and material list through a
//! [`RecipeResolver`]. Lookups may fail; the planner records those steps as
//! skipped instead of failing the whole plan.
//!
//! [`RecipeBook`] is an in-memory resolver that can be loaded with serde.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt::Debug;

use crate::models::{ActivityKind, Material, Recipe};

/// Recipe lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
    /// No recipe for this blueprint under this activity.
    #[error("no {activity} recipe for blueprint {blueprint_id}")]
    NotFound {
        blueprint_id: u32,
        activity: ActivityKind,
    },
    /// The backing data source could not answer.
    #[error("recipe source unavailable: {detail}")]
    Unavailable { detail: String },
}

/// Source of recipe data.
pub trait RecipeResolver: Send + Sync + Debug {
    /// Recipe header. `Ok(None)` = not found.
    fn resolve(
        &self,
        blueprint_id: u32,
        activity: ActivityKind,
    ) -> Result<Option<Recipe>, ResolveError>;

    /// Materials consumed by one run.
    fn materials(
        &self,
        blueprint_id: u32,
        activity: ActivityKind,
    ) -> Result<Vec<Material>, ResolveError>;
}

/// A recipe together with its materials.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeEntry {
    /// Recipe header.
    pub recipe: Recipe,
    /// Materials per run.
    pub materials: Vec<Material>,
}

/// In-memory recipe table keyed by blueprint and activity.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "Vec<RecipeEntry>", into = "Vec<RecipeEntry>")]
pub struct RecipeBook {
    entries: HashMap<(u32, ActivityKind), RecipeEntry>,
}

impl RecipeBook {
    /// Creates an empty book.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a recipe with its materials, replacing any previous entry.
    pub fn with_recipe(mut self, recipe: Recipe, materials: Vec<Material>) -> Self {
        self.insert(recipe, materials);
        self
    }

    /// Inserts a recipe with its materials, replacing any previous entry.
    pub fn insert(&mut self, recipe: Recipe, materials: Vec<Material>) {
        self.entries.insert(
            (recipe.blueprint_id, recipe.activity),
            RecipeEntry { recipe, materials },
        );
    }

    /// Looks up an entry.
    pub fn get(&self, blueprint_id: u32, activity: ActivityKind) -> Option<&RecipeEntry> {
        self.entries.get(&(blueprint_id, activity))
    }

    /// Number of recipes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the book is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl RecipeResolver for RecipeBook {
    fn resolve(
        &self,
        blueprint_id: u32,
        activity: ActivityKind,
    ) -> Result<Option<Recipe>, ResolveError> {
        Ok(self.get(blueprint_id, activity).map(|e| e.recipe.clone()))
    }

    fn materials(
        &self,
        blueprint_id: u32,
        activity: ActivityKind,
    ) -> Result<Vec<Material>, ResolveError> {
        self.get(blueprint_id, activity)
            .map(|e| e.materials.clone())
            .ok_or(ResolveError::NotFound {
                blueprint_id,
                activity,
            })
    }
}

impl From<Vec<RecipeEntry>> for RecipeBook {
    fn from(entries: Vec<RecipeEntry>) -> Self {
        let mut book = Self::new();
        for entry in entries {
            book.insert(entry.recipe, entry.materials);
        }
        book
    }
}

impl From<RecipeBook> for Vec<RecipeEntry> {
    fn from(book: RecipeBook) -> Self {
        let mut entries: Vec<RecipeEntry> = book.entries.into_values().collect();
        entries.sort_by_key(|e| (e.recipe.blueprint_id, e.recipe.activity));
        entries
    }
}
