//! Turning the quoted text fragments of an LLM answer into byte spans.

use log::warn;
use serde::Deserialize;

use crate::model::{Ingredient, Recipe, RecipeStep, TextSpan, Timer};

#[derive(Debug, Deserialize, Default)]
pub(crate) struct LlmRecipe {
    #[serde(default)]
    pub servings: Option<u32>,
    #[serde(default)]
    pub ingredients: Vec<LlmIngredient>,
    #[serde(default)]
    pub steps: Vec<LlmStep>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LlmIngredient {
    pub name: String,
    #[serde(default)]
    pub quantity: Option<f64>,
    #[serde(default)]
    pub unit: Option<String>,
    #[serde(default)]
    pub quantity_text: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LlmStep {
    pub description: String,
    #[serde(default)]
    pub ingredients: Vec<LlmIngredient>,
    #[serde(default)]
    pub timers: Vec<LlmTimer>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct LlmTimer {
    pub text: String,
    #[serde(default)]
    pub lower_seconds: u32,
    #[serde(default)]
    pub upper_seconds: u32,
}

impl LlmRecipe {
    pub fn into_recipe(self) -> Recipe {
        Recipe {
            steps: self.steps.into_iter().map(resolve_step).collect(),
            ingredients: self
                .ingredients
                .into_iter()
                .map(|ingredient| ingredient_without_position(ingredient, ""))
                .collect(),
            number_of_people: self.servings,
        }
    }
}

fn ingredient_without_position(ingredient: LlmIngredient, description: &str) -> Ingredient {
    Ingredient {
        name: ingredient.name,
        quantity: ingredient.quantity.unwrap_or(0.0),
        unit: ingredient.unit.unwrap_or_default(),
        quantity_position: TextSpan::whole(description),
    }
}

pub(crate) fn resolve_step(step: LlmStep) -> RecipeStep {
    let description = step.description;

    let mut timers = Vec::with_capacity(step.timers.len());
    let mut cursor = 0;
    for timer in step.timers {
        let text = timer.text.trim();
        match find_from(&description, text, cursor) {
            Some(position) => {
                cursor = position.end;
                timers.push(Timer {
                    position,
                    lower_bound_seconds: timer.lower_seconds,
                    upper_bound_seconds: timer.upper_seconds.max(timer.lower_seconds),
                });
            }
            None => warn!("Dropping timer '{}': not found in step text", timer.text),
        }
    }

    let mut claimed: Vec<TextSpan> = timers.iter().map(|timer| timer.position).collect();
    let mut ingredients = Vec::with_capacity(step.ingredients.len());
    for ingredient in step.ingredients {
        let position = ingredient
            .quantity_text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .and_then(|text| find_unclaimed(&description, text, &claimed));

        match position {
            Some(position) => {
                claimed.push(position);
                ingredients.push(Ingredient {
                    name: ingredient.name,
                    quantity: ingredient.quantity.unwrap_or(0.0),
                    unit: ingredient.unit.unwrap_or_default(),
                    quantity_position: position,
                });
            }
            None => {
                if let Some(text) = &ingredient.quantity_text {
                    warn!(
                        "Quantity '{}' of '{}' not found in step text",
                        text, ingredient.name
                    );
                }
                ingredients.push(ingredient_without_position(ingredient, &description));
            }
        }
    }

    RecipeStep {
        description,
        ingredients,
        timers,
    }
}

/// First whole-word occurrence of `needle` at or after `from`.
fn find_from(haystack: &str, needle: &str, from: usize) -> Option<TextSpan> {
    if needle.is_empty() {
        return None;
    }
    haystack
        .get(from..)?
        .match_indices(needle)
        .map(|(offset, _)| TextSpan::new(from + offset, from + offset + needle.len()))
        .find(|span| is_word_bounded(haystack, *span))
}

/// First whole-word occurrence of `needle` overlapping none of `claimed`.
fn find_unclaimed(haystack: &str, needle: &str, claimed: &[TextSpan]) -> Option<TextSpan> {
    haystack
        .match_indices(needle)
        .map(|(offset, _)| TextSpan::new(offset, offset + needle.len()))
        .filter(|span| is_word_bounded(haystack, *span))
        .find(|span| {
            !claimed
                .iter()
                .any(|other| span.begin < other.end && other.begin < span.end)
        })
}

/// The span neither starts nor ends inside a word or number, so "2" does not match inside "200".
fn is_word_bounded(text: &str, span: TextSpan) -> bool {
    let before = text[..span.begin].chars().next_back();
    let after = text[span.end..].chars().next();
    let first = text[span.begin..span.end].chars().next();
    let last = text[span.begin..span.end].chars().next_back();

    let joins = |outer: Option<char>, inner: Option<char>| match (outer, inner) {
        (Some(outer), Some(inner)) => outer.is_alphanumeric() && inner.is_alphanumeric(),
        _ => false,
    };
    !joins(before, first) && !joins(after, last)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn llm_ingredient(name: &str, quantity: f64, unit: &str, text: Option<&str>) -> LlmIngredient {
        LlmIngredient {
            name: name.to_string(),
            quantity: Some(quantity),
            unit: Some(unit.to_string()),
            quantity_text: text.map(str::to_string),
        }
    }

    #[test]
    fn test_resolve_pasta_step() {
        let step = resolve_step(LlmStep {
            description: "Boil water for 5 minutes, add 200 g pasta.".to_string(),
            ingredients: vec![llm_ingredient("pasta", 200.0, "g", Some("200 g"))],
            timers: vec![LlmTimer {
                text: "5 minutes".to_string(),
                lower_seconds: 300,
                upper_seconds: 300,
            }],
        });

        assert_eq!(step.timers[0].position, TextSpan::new(15, 24));
        assert_eq!(step.ingredients[0].quantity_position, TextSpan::new(30, 35));
    }

    #[test]
    fn test_same_quantity_text_claims_distinct_spans() {
        let step = resolve_step(LlmStep {
            description: "Add 2 eggs, then 2 yolks.".to_string(),
            ingredients: vec![
                llm_ingredient("eggs", 2.0, "", Some("2")),
                llm_ingredient("yolks", 2.0, "", Some("2")),
            ],
            timers: Vec::new(),
        });

        assert_eq!(step.ingredients[0].quantity_position, TextSpan::new(4, 5));
        assert_eq!(step.ingredients[1].quantity_position, TextSpan::new(17, 18));
    }

    #[test]
    fn test_quantity_does_not_match_inside_number() {
        let step = resolve_step(LlmStep {
            description: "Bake at 200 degrees with 2 trays".to_string(),
            ingredients: vec![llm_ingredient("trays", 2.0, "", Some("2"))],
            timers: Vec::new(),
        });
        assert_eq!(step.ingredients[0].quantity_position, TextSpan::new(25, 26));
    }

    #[test]
    fn test_quantity_inside_timer_is_not_claimed() {
        let step = resolve_step(LlmStep {
            description: "Cook 5 minutes with 5 cloves".to_string(),
            ingredients: vec![llm_ingredient("garlic", 5.0, "", Some("5"))],
            timers: vec![LlmTimer {
                text: "5 minutes".to_string(),
                lower_seconds: 300,
                upper_seconds: 0,
            }],
        });
        assert_eq!(step.ingredients[0].quantity_position, TextSpan::new(20, 21));
        assert_eq!(step.timers[0].upper_bound_seconds, 300);
    }

    #[test]
    fn test_unresolved_fragments() {
        let description = "Season to taste.";
        let step = resolve_step(LlmStep {
            description: description.to_string(),
            ingredients: vec![
                llm_ingredient("salt", 1.0, "pinch", Some("1 pinch")),
                llm_ingredient("pepper", 1.0, "", None),
            ],
            timers: vec![LlmTimer {
                text: "10 minutes".to_string(),
                lower_seconds: 600,
                upper_seconds: 600,
            }],
        });

        assert!(step.timers.is_empty());
        for ingredient in &step.ingredients {
            assert!(ingredient.quantity_position.is_whole_range(description));
        }
    }

    #[test]
    fn test_timers_resolve_in_order() {
        let step = resolve_step(LlmStep {
            description: "Rest 5 minutes, flip, rest 5 minutes".to_string(),
            ingredients: Vec::new(),
            timers: vec![
                LlmTimer {
                    text: "5 minutes".to_string(),
                    lower_seconds: 300,
                    upper_seconds: 300,
                },
                LlmTimer {
                    text: "5 minutes".to_string(),
                    lower_seconds: 300,
                    upper_seconds: 300,
                },
            ],
        });
        assert_eq!(step.timers[0].position, TextSpan::new(5, 14));
        assert_eq!(step.timers[1].position, TextSpan::new(27, 36));
    }

    #[test]
    fn test_recipe_level_fields() {
        let llm: LlmRecipe = serde_json::from_str(
            r#"{"servings": 2, "ingredients": [{"name": "pasta", "quantity": 200, "unit": "g"}], "steps": []}"#,
        )
        .unwrap();
        let recipe = llm.into_recipe();
        assert_eq!(recipe.number_of_people, Some(2));
        assert_eq!(recipe.ingredients[0].quantity, 200.0);
        assert_eq!(recipe.ingredients[0].unit, "g");
    }
}
