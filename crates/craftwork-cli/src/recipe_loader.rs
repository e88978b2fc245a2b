//! Recipe asset loading and management.
//!
//! This module provides:
//! - Loading recipes from `<recipe_dir>/*.toml`
//! - Recipe validation on load
//! - Recipe registry with lookup by ID, name, and category

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use craftwork_common::{CraftworkError, RecipeId, SchemaVersion};
use craftwork_core::{CraftingError, Item, Recipe, StatCost};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during recipe loading.
#[derive(Debug, Error)]
pub enum RecipeLoadError {
    /// File not found.
    #[error("Recipe file not found: {0}")]
    NotFound(PathBuf),

    /// Failed to read file.
    #[error("Failed to read recipe file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML.
    #[error("Failed to parse recipe TOML: {0}")]
    ParseError(#[from] toml::de::Error),

    /// File version cannot be read.
    #[error("Unsupported recipe file: {0}")]
    UnsupportedVersion(#[from] CraftworkError),

    /// Validation error.
    #[error("Recipe validation error: {0}")]
    ValidationError(String),

    /// Duplicate recipe ID.
    #[error("Duplicate recipe ID: {0}")]
    DuplicateId(u32),

    /// No recipe with this ID or name.
    #[error("Unknown recipe: {0}")]
    UnknownRecipe(String),
}

/// Result type for recipe loading operations.
pub type RecipeLoadResult<T> = Result<T, RecipeLoadError>;

/// An item and quantity from file, used for ingredients and outputs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipeComponent {
    /// Item kind.
    #[serde(flatten)]
    pub item: Item,
    /// Quantity required or produced.
    pub quantity: u32,
}

/// A recipe definition loaded from file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeDefinition {
    /// Unique recipe identifier.
    pub id: u32,
    /// Display name.
    pub name: String,
    /// Recipe description.
    #[serde(default)]
    pub description: String,
    /// Recipe category for grouping.
    #[serde(default = "default_category")]
    pub category: String,
    /// Required ingredients (consumed).
    #[serde(default)]
    pub ingredients: Vec<RecipeComponent>,
    /// Produced items.
    #[serde(default)]
    pub outputs: Vec<RecipeComponent>,
    /// Item shown for the recipe (defaults to the first output).
    #[serde(default)]
    pub display_item: Option<Item>,
    /// Non-item cost.
    #[serde(default)]
    pub cost: StatCost,
    /// Time to craft in game minutes.
    #[serde(default)]
    pub craft_time_minutes: u32,
}

fn default_category() -> String {
    "misc".to_string()
}

impl RecipeDefinition {
    /// Validates the recipe definition.
    pub fn validate(&self) -> RecipeLoadResult<()> {
        if self.name.trim().is_empty() {
            return Err(RecipeLoadError::ValidationError(format!(
                "Recipe {} has empty name",
                self.id
            )));
        }

        if self.outputs.is_empty() {
            return Err(RecipeLoadError::ValidationError(format!(
                "Recipe {} has no outputs",
                self.id
            )));
        }

        for (i, ingredient) in self.ingredients.iter().enumerate() {
            if ingredient.quantity == 0 {
                return Err(RecipeLoadError::ValidationError(format!(
                    "Recipe {} ingredient {} has zero quantity",
                    self.id, i
                )));
            }
        }

        for (i, output) in self.outputs.iter().enumerate() {
            if output.quantity == 0 {
                return Err(RecipeLoadError::ValidationError(format!(
                    "Recipe {} output {} has zero quantity",
                    self.id, i
                )));
            }
        }

        Ok(())
    }

    /// Converts to a core Recipe.
    pub fn to_recipe(&self) -> RecipeLoadResult<Recipe> {
        let mut builder = Recipe::builder(&self.name)
            .id(RecipeId::new(self.id))
            .description(&self.description)
            .cost(self.cost)
            .craft_time(self.craft_time_minutes);

        for ingredient in &self.ingredients {
            builder = builder.ingredient(ingredient.item.clone(), ingredient.quantity);
        }

        for output in &self.outputs {
            builder = builder.output(output.item.clone(), output.quantity);
        }

        if let Some(item) = &self.display_item {
            builder = builder.display_item(item.clone());
        }

        builder.build().map_err(|e: CraftingError| {
            RecipeLoadError::ValidationError(format!("Recipe {}: {e}", self.id))
        })
    }
}

/// A collection of recipes from a single file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecipeFile {
    /// File format version.
    #[serde(default = "default_version")]
    pub version: String,
    /// Recipes in this file.
    #[serde(default)]
    pub recipes: Vec<RecipeDefinition>,
}

fn default_version() -> String {
    SchemaVersion::CRAFTING_RECIPE.to_string()
}

impl RecipeFile {
    /// Parses a recipe file and checks its version.
    pub fn parse(content: &str) -> RecipeLoadResult<Self> {
        let file: Self = toml::from_str(content)?;
        SchemaVersion::CRAFTING_RECIPE.check_readable(&file.version)?;
        Ok(file)
    }
}

/// Recipe registry with fast lookup.
#[derive(Debug, Default)]
pub struct RecipeRegistry {
    /// Recipes by ID.
    by_id: HashMap<u32, RecipeDefinition>,
    /// Recipe IDs by name (lowercase).
    by_name: HashMap<String, u32>,
    /// Recipe IDs by category.
    by_category: HashMap<String, Vec<u32>>,
}

impl RecipeRegistry {
    /// Creates a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of registered recipes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    /// Returns true if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }

    /// Registers a recipe.
    pub fn register(&mut self, recipe: RecipeDefinition) -> RecipeLoadResult<()> {
        if self.by_id.contains_key(&recipe.id) {
            return Err(RecipeLoadError::DuplicateId(recipe.id));
        }

        let id = recipe.id;
        self.by_category
            .entry(recipe.category.clone())
            .or_default()
            .push(id);
        self.by_name.insert(recipe.name.to_lowercase(), id);
        self.by_id.insert(id, recipe);

        Ok(())
    }

    /// Gets a recipe by ID.
    #[must_use]
    pub fn get(&self, id: u32) -> Option<&RecipeDefinition> {
        self.by_id.get(&id)
    }

    /// Gets a recipe by name (case-insensitive).
    #[must_use]
    pub fn get_by_name(&self, name: &str) -> Option<&RecipeDefinition> {
        self.by_name
            .get(&name.to_lowercase())
            .and_then(|id| self.by_id.get(id))
    }

    /// Resolves a numeric ID or a name.
    #[must_use]
    pub fn find(&self, key: &str) -> Option<&RecipeDefinition> {
        key.parse::<u32>()
            .ok()
            .and_then(|id| self.get(id))
            .or_else(|| self.get_by_name(key))
    }

    /// Gets all recipes in a category.
    #[must_use]
    pub fn get_by_category(&self, category: &str) -> Vec<&RecipeDefinition> {
        self.by_category
            .get(category)
            .map(|ids| ids.iter().filter_map(|id| self.by_id.get(id)).collect())
            .unwrap_or_default()
    }

    /// Returns all recipes ordered by ID.
    #[must_use]
    pub fn sorted(&self) -> Vec<&RecipeDefinition> {
        let mut recipes: Vec<_> = self.by_id.values().collect();
        recipes.sort_by_key(|r| r.id);
        recipes
    }

    /// Searches recipes by name substring (case-insensitive).
    #[must_use]
    pub fn search(&self, query: &str) -> Vec<&RecipeDefinition> {
        let query_lower = query.to_lowercase();
        self.by_id
            .values()
            .filter(|r| r.name.to_lowercase().contains(&query_lower))
            .collect()
    }
}

/// Statistics for the recipe loader.
#[derive(Debug, Default, Clone)]
pub struct RecipeLoaderStats {
    /// Number of files loaded.
    pub files_loaded: u32,
    /// Number of recipes loaded.
    pub recipes_loaded: u32,
    /// Number of validation errors.
    pub validation_errors: u32,
}

/// Recipe file loader.
#[derive(Debug)]
pub struct RecipeLoader {
    /// Base path for recipe files.
    base_path: PathBuf,
    /// Recipe registry.
    registry: RecipeRegistry,
    /// Statistics.
    stats: RecipeLoaderStats,
}

impl RecipeLoader {
    /// Creates a new recipe loader.
    #[must_use]
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        let base_path = base_path.into();
        debug!("Initializing recipe loader at: {:?}", base_path);

        Self {
            base_path,
            registry: RecipeRegistry::new(),
            stats: RecipeLoaderStats::default(),
        }
    }

    /// Returns the recipe registry.
    #[must_use]
    pub fn registry(&self) -> &RecipeRegistry {
        &self.registry
    }

    /// Returns loader statistics.
    #[must_use]
    pub fn stats(&self) -> &RecipeLoaderStats {
        &self.stats
    }

    /// Loads all recipes from the base path.
    ///
    /// Files that fail to load are logged and counted, not fatal.
    pub fn load_all(&mut self) -> RecipeLoadResult<()> {
        if !self.base_path.is_dir() {
            return Err(RecipeLoadError::NotFound(self.base_path.clone()));
        }

        let mut paths: Vec<PathBuf> = fs::read_dir(&self.base_path)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();

        for path in paths {
            if let Err(e) = self.load_file(&path) {
                warn!("Failed to load recipe file {:?}: {}", path, e);
                self.stats.validation_errors += 1;
            }
        }

        info!(
            "Loaded {} recipes from {} files",
            self.stats.recipes_loaded, self.stats.files_loaded
        );

        Ok(())
    }

    /// Loads recipes from a single file.
    pub fn load_file(&mut self, path: &Path) -> RecipeLoadResult<()> {
        debug!("Loading recipe file: {:?}", path);

        let content = fs::read_to_string(path)?;
        let recipe_file = RecipeFile::parse(&content)?;

        let mut loaded_count = 0;
        for recipe in recipe_file.recipes {
            if let Err(e) = recipe.validate() {
                warn!("Invalid recipe in {:?}: {}", path, e);
                self.stats.validation_errors += 1;
                continue;
            }

            match self.registry.register(recipe) {
                Ok(()) => loaded_count += 1,
                Err(e) => {
                    warn!("Failed to register recipe from {:?}: {}", path, e);
                    self.stats.validation_errors += 1;
                },
            }
        }

        self.stats.files_loaded += 1;
        self.stats.recipes_loaded += loaded_count;
        debug!("Loaded {} recipes from {:?}", loaded_count, path);

        Ok(())
    }

    /// Resolves a recipe by ID or name and builds it.
    pub fn recipe(&self, key: &str) -> RecipeLoadResult<Recipe> {
        self.registry
            .find(key)
            .ok_or_else(|| RecipeLoadError::UnknownRecipe(key.to_string()))?
            .to_recipe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use craftwork_core::ItemClass;
    use tempfile::TempDir;

    const PLANK_FILE: &str = r#"
version = "1.0.0"

[[recipes]]
id = 1
name = "Plank"
category = "materials"
craft_time_minutes = 10

[recipes.cost]
stamina = 2

[[recipes.ingredients]]
name = "Wood"
category = "Resource"
class = "resource"
quantity = 2

[[recipes.outputs]]
name = "Plank"
category = "Material"
description = "A flat board"
quantity = 1
"#;

    fn component(name: &str, quantity: u32) -> RecipeComponent {
        RecipeComponent {
            item: Item::new(name, "Resource", ItemClass::Resource),
            quantity,
        }
    }

    fn sample_recipe() -> RecipeDefinition {
        RecipeDefinition {
            id: 1,
            name: "Test Recipe".to_string(),
            description: "A test recipe".to_string(),
            category: "test".to_string(),
            ingredients: vec![component("Ore", 2)],
            outputs: vec![component("Iron Bar", 1)],
            display_item: None,
            cost: StatCost::default(),
            craft_time_minutes: 60,
        }
    }

    #[test]
    fn test_recipe_validation_valid() {
        assert!(sample_recipe().validate().is_ok());
    }

    #[test]
    fn test_recipe_validation_empty_name() {
        let mut recipe = sample_recipe();
        recipe.name = String::new();
        assert!(matches!(
            recipe.validate(),
            Err(RecipeLoadError::ValidationError(_))
        ));
    }

    #[test]
    fn test_recipe_validation_no_outputs() {
        let mut recipe = sample_recipe();
        recipe.outputs.clear();
        assert!(matches!(
            recipe.validate(),
            Err(RecipeLoadError::ValidationError(_))
        ));
    }

    #[test]
    fn test_recipe_validation_zero_quantity() {
        let mut recipe = sample_recipe();
        recipe.ingredients[0].quantity = 0;
        assert!(recipe.validate().is_err());

        let mut recipe = sample_recipe();
        recipe.outputs[0].quantity = 0;
        assert!(recipe.validate().is_err());
    }

    #[test]
    fn test_registry_register_and_get() {
        let mut registry = RecipeRegistry::new();
        registry.register(sample_recipe()).expect("should register");
        assert_eq!(registry.len(), 1);

        let found = registry.get(1);
        assert_eq!(found.expect("found").name, "Test Recipe");
    }

    #[test]
    fn test_registry_duplicate_id() {
        let mut registry = RecipeRegistry::new();
        let recipe = sample_recipe();

        registry.register(recipe.clone()).expect("should register");
        let result = registry.register(recipe);
        assert!(matches!(result, Err(RecipeLoadError::DuplicateId(1))));
    }

    #[test]
    fn test_registry_find_by_id_or_name() {
        let mut registry = RecipeRegistry::new();
        registry.register(sample_recipe()).expect("should register");

        assert!(registry.find("1").is_some());
        assert!(registry.find("TEST RECIPE").is_some());
        assert!(registry.find("2").is_none());
        assert!(registry.find("unknown").is_none());
    }

    #[test]
    fn test_registry_category_and_search() {
        let mut registry = RecipeRegistry::new();

        let mut sword = sample_recipe();
        sword.id = 2;
        sword.name = "Iron Sword".to_string();
        sword.category = "weapons".to_string();

        let mut shield = sample_recipe();
        shield.id = 3;
        shield.name = "Iron Shield".to_string();

        registry.register(shield).expect("register");
        registry.register(sword).expect("register");
        registry.register(sample_recipe()).expect("register");

        assert_eq!(registry.get_by_category("weapons").len(), 1);
        assert_eq!(registry.get_by_category("test").len(), 2);
        assert_eq!(registry.search("IRON").len(), 2);
        let ids: Vec<u32> = registry.sorted().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_definition_to_recipe() {
        let recipe = sample_recipe().to_recipe().expect("valid");

        assert_eq!(recipe.id(), Some(RecipeId::new(1)));
        assert_eq!(recipe.output_name(), "Test Recipe");
        assert_eq!(recipe.ingredients().len(), 1);
        assert_eq!(recipe.ingredients()[0].required_amount(), 2);
        assert_eq!(recipe.display_item().name(), "Iron Bar");
        assert_eq!(recipe.craft_time_minutes(), 60);
    }

    #[test]
    fn test_parse_toml() {
        let recipe_file = RecipeFile::parse(PLANK_FILE).expect("parse");
        assert_eq!(recipe_file.recipes.len(), 1);

        let recipe = &recipe_file.recipes[0];
        assert_eq!(recipe.name, "Plank");
        assert_eq!(recipe.cost.stamina, 2);
        assert_eq!(recipe.ingredients[0].item.class(), ItemClass::Resource);
        assert_eq!(recipe.outputs[0].item.class(), ItemClass::Object);
        assert_eq!(recipe.outputs[0].item.description(), "A flat board");
    }

    #[test]
    fn test_parse_rejects_future_major_version() {
        let content = PLANK_FILE.replace("1.0.0", "2.0.0");
        assert!(matches!(
            RecipeFile::parse(&content),
            Err(RecipeLoadError::UnsupportedVersion(_))
        ));
    }

    #[test]
    fn test_load_all_skips_bad_files() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        fs::write(temp_dir.path().join("planks.toml"), PLANK_FILE).expect("write");
        fs::write(temp_dir.path().join("broken.toml"), "recipes = 5").expect("write");
        fs::write(temp_dir.path().join("notes.txt"), "ignored").expect("write");

        let mut loader = RecipeLoader::new(temp_dir.path());
        loader.load_all().expect("directory exists");

        assert_eq!(loader.stats().files_loaded, 1);
        assert_eq!(loader.stats().recipes_loaded, 1);
        assert_eq!(loader.stats().validation_errors, 1);
        assert_eq!(loader.recipe("plank").expect("loaded").craft_time_minutes(), 10);
    }

    #[test]
    fn test_unknown_recipe() {
        let loader = RecipeLoader::new("/nonexistent/recipes");
        assert!(matches!(
            loader.recipe("anvil"),
            Err(RecipeLoadError::UnknownRecipe(ref key)) if key == "anvil"
        ));
    }

    #[test]
    fn test_load_all_missing_directory() {
        let mut loader = RecipeLoader::new("/nonexistent/recipes");
        assert!(matches!(loader.load_all(), Err(RecipeLoadError::NotFound(_))));
    }
}
