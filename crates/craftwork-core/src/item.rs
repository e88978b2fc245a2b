//! Stackable items and kind equivalence.

use serde::{Deserialize, Serialize};

/// Concrete class tag of an item.
///
/// Two items with the same name and category but a different class are
/// different kinds (a "Copper" resource is not a "Copper" tool).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ItemClass {
    /// Plain object (default)
    #[default]
    Object,
    /// Raw gathered resource
    Resource,
    /// Tool
    Tool,
    /// Weapon
    Weapon,
    /// Placeable furniture
    Furniture,
    /// Mod-defined class
    Custom(u32),
}

/// Borrowed kind key of an item: the `(name, category, class)` triple.
///
/// This is the only thing recipe matching compares. Stack size and
/// description never take part.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ItemKind<'a> {
    /// Display name
    pub name: &'a str,
    /// Category name
    pub category: &'a str,
    /// Concrete class tag
    pub class: ItemClass,
}

/// A stack of identical items occupying one inventory slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    name: String,
    category: String,
    #[serde(default)]
    class: ItemClass,
    #[serde(default)]
    description: String,
    #[serde(default = "default_stack")]
    stack: u32,
}

const fn default_stack() -> u32 {
    1
}

impl Item {
    /// Creates a single unit of an item.
    #[must_use]
    pub fn new(name: impl Into<String>, category: impl Into<String>, class: ItemClass) -> Self {
        Self {
            name: name.into(),
            category: category.into(),
            class,
            description: String::new(),
            stack: 1,
        }
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the stack size.
    #[must_use]
    pub const fn with_stack(mut self, stack: u32) -> Self {
        self.stack = stack;
        self
    }

    /// Returns the display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the category name.
    #[must_use]
    pub fn category(&self) -> &str {
        &self.category
    }

    /// Returns the class tag.
    #[must_use]
    pub const fn class(&self) -> ItemClass {
        self.class
    }

    /// Returns the description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Returns the stack size.
    #[must_use]
    pub const fn stack(&self) -> u32 {
        self.stack
    }

    /// Overwrites the stack size.
    pub fn set_stack(&mut self, stack: u32) {
        self.stack = stack;
    }

    /// Grows the stack by `amount`.
    pub fn add_to_stack(&mut self, amount: u32) {
        self.stack = self.stack.saturating_add(amount);
    }

    /// Returns a fresh single unit of the same kind.
    #[must_use]
    pub fn get_one(&self) -> Self {
        Self {
            stack: 1,
            ..self.clone()
        }
    }

    /// Returns the kind key used for equivalence.
    #[must_use]
    pub fn kind(&self) -> ItemKind<'_> {
        ItemKind {
            name: &self.name,
            category: &self.category,
            class: self.class,
        }
    }

    /// Checks whether `other` is interchangeable with this item.
    #[must_use]
    pub fn is_same_kind(&self, other: &Item) -> bool {
        same_kind(self, other)
    }
}

/// Kind equivalence: equal name, category and class. Stack is ignored.
#[must_use]
pub fn same_kind(a: &Item, b: &Item) -> bool {
    a.kind() == b.kind()
}

impl std::fmt::Display for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} x{}", self.name, self.stack)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wood() -> Item {
        Item::new("Wood", "Resource", ItemClass::Resource)
    }

    #[test]
    fn test_same_kind_ignores_stack_and_description() {
        let a = wood().with_stack(5);
        let b = wood().with_stack(1).with_description("Freshly chopped");
        assert!(same_kind(&a, &b));
        assert!(a.is_same_kind(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_same_kind_requires_all_three_fields() {
        let base = wood();
        assert!(!same_kind(&base, &Item::new("Stone", "Resource", ItemClass::Resource)));
        assert!(!same_kind(&base, &Item::new("Wood", "Furniture", ItemClass::Resource)));
        assert!(!same_kind(&base, &Item::new("Wood", "Resource", ItemClass::Object)));
        assert!(!same_kind(
            &base,
            &Item::new("Wood", "Resource", ItemClass::Custom(7))
        ));
    }

    #[test]
    fn test_get_one_resets_stack() {
        let stack = wood().with_stack(40).with_description("Oak");
        let one = stack.get_one();
        assert_eq!(one.stack(), 1);
        assert_eq!(one.description(), "Oak");
        assert!(one.is_same_kind(&stack));
    }

    #[test]
    fn test_add_to_stack_saturates() {
        let mut item = wood().with_stack(u32::MAX - 1);
        item.add_to_stack(5);
        assert_eq!(item.stack(), u32::MAX);
    }

    #[test]
    fn test_item_deserialize_defaults() {
        let item: Item = toml::from_str(
            r#"
name = "Wood"
category = "Resource"
"#,
        )
        .expect("parse");
        assert_eq!(item.class(), ItemClass::Object);
        assert_eq!(item.stack(), 1);
    }
}
