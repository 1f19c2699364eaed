//! Shopping list aggregation.
//!
//! The store hands back one [`CartIngredientLine`] per (cart entry, recipe
//! ingredient) pair. [`ShoppingList::aggregate`] groups those lines by
//! ingredient identity, never by display name, so two ingredients sharing a
//! name but differing in unit stay separate.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::{IngredientId, RecipeId};

/// One ingredient line of one recipe in a user's cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartIngredientLine {
    /// Recipe the line belongs to.
    pub recipe_id: RecipeId,
    /// Ingredient identity, the grouping key.
    pub ingredient_id: IngredientId,
    /// Ingredient name.
    pub name: String,
    /// Measurement unit.
    pub measurement_unit: String,
    /// Amount for this recipe.
    pub amount: i32,
}

/// Aggregated line of a shopping list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingListItem {
    /// Ingredient identity.
    pub ingredient_id: IngredientId,
    /// Ingredient name.
    pub name: String,
    /// Measurement unit.
    pub measurement_unit: String,
    /// Sum of the amounts across every recipe in the cart.
    pub total_amount: u64,
}

/// Ordered, deduplicated shopping list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShoppingList {
    items: Vec<ShoppingListItem>,
}

impl ShoppingList {
    /// The list for an empty cart.
    #[must_use]
    pub const fn empty() -> Self {
        Self { items: Vec::new() }
    }

    /// Group `lines` by ingredient and sum their amounts.
    ///
    /// Items are ordered by name, then unit, then ingredient id, so the same
    /// cart contents always produce the same list.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::{CartIngredientLine, IngredientId, RecipeId, ShoppingList};
    ///
    /// let flour = |recipe_id, amount| CartIngredientLine {
    ///     recipe_id,
    ///     ingredient_id: IngredientId(1),
    ///     name: "flour".into(),
    ///     measurement_unit: "g".into(),
    ///     amount,
    /// };
    /// let list = ShoppingList::aggregate(vec![
    ///     flour(RecipeId::random(), 200),
    ///     flour(RecipeId::random(), 300),
    /// ]);
    /// assert_eq!(list.items().len(), 1);
    /// assert_eq!(list.items()[0].total_amount, 500);
    /// ```
    #[must_use]
    pub fn aggregate(lines: impl IntoIterator<Item = CartIngredientLine>) -> Self {
        let mut grouped: BTreeMap<IngredientId, ShoppingListItem> = BTreeMap::new();
        for line in lines {
            // Amounts are validated as positive; clamp anything else to zero.
            let amount = u64::try_from(line.amount).unwrap_or(0);
            grouped
                .entry(line.ingredient_id)
                .and_modify(|item| item.total_amount = item.total_amount.saturating_add(amount))
                .or_insert(ShoppingListItem {
                    ingredient_id: line.ingredient_id,
                    name: line.name,
                    measurement_unit: line.measurement_unit,
                    total_amount: amount,
                });
        }

        let mut items: Vec<ShoppingListItem> = grouped.into_values().collect();
        items.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.measurement_unit.cmp(&b.measurement_unit))
                .then_with(|| a.ingredient_id.cmp(&b.ingredient_id))
        });
        Self { items }
    }

    /// Aggregated items in display order.
    #[must_use]
    pub fn items(&self) -> &[ShoppingListItem] {
        &self.items
    }

    /// Whether the cart produced no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn line(recipe: RecipeId, id: i64, name: &str, unit: &str, amount: i32) -> CartIngredientLine {
        CartIngredientLine {
            recipe_id: recipe,
            ingredient_id: IngredientId(id),
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
            amount,
        }
    }

    #[rstest]
    fn sums_shared_ingredient_across_recipes() {
        let (a, b) = (RecipeId::random(), RecipeId::random());
        let list = ShoppingList::aggregate(vec![
            line(a, 1, "flour", "g", 200),
            line(a, 2, "eggs", "pcs", 2),
            line(b, 1, "flour", "g", 300),
        ]);

        let summary: Vec<(&str, u64)> = list
            .items()
            .iter()
            .map(|item| (item.name.as_str(), item.total_amount))
            .collect();
        assert_eq!(summary, vec![("eggs", 2), ("flour", 500)]);
    }

    #[rstest]
    fn same_name_different_ingredient_stays_separate() {
        let recipe = RecipeId::random();
        let list = ShoppingList::aggregate(vec![
            line(recipe, 5, "salt", "tsp", 1),
            line(recipe, 4, "salt", "g", 10),
        ]);

        let units: Vec<&str> = list
            .items()
            .iter()
            .map(|item| item.measurement_unit.as_str())
            .collect();
        assert_eq!(units, vec!["g", "tsp"]);
    }

    #[rstest]
    fn empty_cart_yields_empty_list() {
        let list = ShoppingList::aggregate(Vec::new());
        assert!(list.is_empty());
        assert_eq!(list, ShoppingList::empty());
    }

    #[rstest]
    fn ordering_is_independent_of_input_order() {
        let recipe = RecipeId::random();
        let lines = vec![
            line(recipe, 3, "sugar", "g", 50),
            line(recipe, 1, "butter", "g", 100),
            line(recipe, 2, "milk", "ml", 250),
        ];
        let mut reversed = lines.clone();
        reversed.reverse();

        assert_eq!(ShoppingList::aggregate(lines), ShoppingList::aggregate(reversed));
    }
}
