//! The kitchen's fixed menu.

use common::{Ingredient, Recipe};
use serde::{Deserialize, Serialize};

/// A pancake from the standard menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MenuItem {
    DarkChocolate,
    DarkChocolateWhippedCream,
    DarkChocolateWhippedCreamHazelnuts,
    MilkChocolate,
    MilkChocolateHazelnuts,
}

impl MenuItem {
    pub const ALL: [MenuItem; 5] = [
        MenuItem::DarkChocolate,
        MenuItem::DarkChocolateWhippedCream,
        MenuItem::DarkChocolateWhippedCreamHazelnuts,
        MenuItem::MilkChocolate,
        MenuItem::MilkChocolateHazelnuts,
    ];

    pub fn ingredients(&self) -> &'static [Ingredient] {
        use Ingredient::*;

        match self {
            MenuItem::DarkChocolate => &[DarkChocolate],
            MenuItem::DarkChocolateWhippedCream => &[DarkChocolate, WhippedCream],
            MenuItem::DarkChocolateWhippedCreamHazelnuts => {
                &[DarkChocolate, WhippedCream, Hazelnuts]
            }
            MenuItem::MilkChocolate => &[MilkChocolate],
            MenuItem::MilkChocolateHazelnuts => &[MilkChocolate, Hazelnuts],
        }
    }

    /// Builds the recipe for this menu item.
    pub fn recipe(&self) -> Recipe {
        // Every menu entry lists at least one ingredient.
        Recipe::new(self.ingredients().iter().copied())
            .unwrap_or_else(|_| unreachable!("menu item {self:?} has no ingredients"))
    }
}
