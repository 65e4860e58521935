use crate::models::PhaseTag;
use serde::Serialize;

/// One row of the fixed food reference table.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Food {
    pub name: &'static str,
    pub phase: PhaseTag,
    pub category: &'static str,
}

/// One card of the fixed recipe collection.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Recipe {
    pub title: &'static str,
    pub phase: PhaseTag,
    pub time: &'static str,
    pub ingredients: &'static str,
    pub steps: &'static str,
}

/// Allowed foods, fixed at build time; the slice order is the display order.
pub const FOODS: &[Food] = &[
    Food { name: "Chicken breast", phase: PhaseTag::Attack, category: "Meat" },
    Food { name: "Lean beef", phase: PhaseTag::Attack, category: "Meat" },
    Food { name: "Eggs", phase: PhaseTag::Attack, category: "Protein" },
    Food { name: "Cottage cheese 0%", phase: PhaseTag::Attack, category: "Dairy" },
    Food { name: "Kefir 0%", phase: PhaseTag::Attack, category: "Dairy" },
    Food { name: "Any fish", phase: PhaseTag::Attack, category: "Seafood" },
    Food { name: "Oat bran", phase: PhaseTag::Attack, category: "Grains" },
    Food { name: "Cucumbers", phase: PhaseTag::Cruise, category: "Vegetables" },
    Food { name: "Tomatoes", phase: PhaseTag::Cruise, category: "Vegetables" },
    Food { name: "Cabbage", phase: PhaseTag::Cruise, category: "Vegetables" },
    Food { name: "Mushrooms", phase: PhaseTag::Cruise, category: "Vegetables" },
    Food { name: "Zucchini", phase: PhaseTag::Cruise, category: "Vegetables" },
];

pub const RECIPES: &[Recipe] = &[
    Recipe {
        title: "Oat bran flatbread",
        phase: PhaseTag::Attack,
        time: "10 min",
        ingredients: "2 tbsp oat bran, 1 egg, 1 tbsp cottage cheese 0%",
        steps: "Mix everything until smooth. Cook on a dry non-stick pan for 2-3 minutes per side.",
    },
    Recipe {
        title: "Chicken roll",
        phase: PhaseTag::Attack,
        time: "40 min",
        ingredients: "Chicken fillet, garlic, spices, gelatin",
        steps: "Slice the fillet and mix with the spices and dry gelatin. Wrap tightly in foil and bake at 180°C.",
    },
];

/// Case-insensitive substring match over food names; table order is kept.
/// An empty query matches everything.
pub fn search_foods(query: &str) -> Vec<&'static Food> {
    let needle = query.to_lowercase();
    FOODS
        .iter()
        .filter(|food| food.name.to_lowercase().contains(&needle))
        .collect()
}
