//! Cutting a recipe into translatable fragments and rebuilding it from their
//! translations.
//!
//! Step descriptions are cut at every timer and quantity boundary, so after
//! translation each span can be moved to the offset where its fragment ended
//! up. Fragments without letters (numbers, punctuation) are kept verbatim and
//! never sent to the translator.

use std::collections::{BTreeSet, HashMap};

use crate::error::CookscaleError;
use crate::model::{Ingredient, Recipe, RecipeStep, TextSpan, Timer};

/// Every fragment of `recipe` that needs translating, in a fixed order.
pub fn collect_sentences(recipe: &Recipe) -> Vec<String> {
    let mut sentences = Vec::new();
    rewrite_recipe(recipe, &mut |text: &str| {
        sentences.push(text.to_string());
        text.to_string()
    });
    sentences
}

/// Rebuild `recipe` with `translated[i]` in place of `collect_sentences(recipe)[i]`.
pub fn apply_translation(recipe: &Recipe, translated: &[String]) -> Result<Recipe, CookscaleError> {
    let expected = collect_sentences(recipe).len();
    if translated.len() != expected {
        return Err(CookscaleError::Translation(format!(
            "expected {} translated sentences, got {}",
            expected,
            translated.len()
        )));
    }

    let mut translations = translated.iter();
    Ok(rewrite_recipe(recipe, &mut |text: &str| {
        translations
            .next()
            .cloned()
            .unwrap_or_else(|| text.to_string())
    }))
}

type Rewrite<'a> = dyn FnMut(&str) -> String + 'a;

fn rewrite_recipe(recipe: &Recipe, rewrite: &mut Rewrite<'_>) -> Recipe {
    let steps = recipe
        .steps
        .iter()
        .map(|step| rewrite_step(step, rewrite))
        .collect();
    let ingredients = recipe
        .ingredients
        .iter()
        .map(|ingredient| Ingredient {
            name: rewrite_words(&ingredient.name, rewrite),
            unit: rewrite_words(&ingredient.unit, rewrite),
            ..ingredient.clone()
        })
        .collect();

    Recipe {
        steps,
        ingredients,
        number_of_people: recipe.number_of_people,
    }
}

fn rewrite_step(step: &RecipeStep, rewrite: &mut Rewrite<'_>) -> RecipeStep {
    let description = step.description.as_str();

    let mut boundaries = BTreeSet::from([0, description.len()]);
    for timer in &step.timers {
        if timer.position.is_valid_in(description) {
            boundaries.insert(timer.position.begin);
            boundaries.insert(timer.position.end);
        }
    }
    for ingredient in &step.ingredients {
        if ingredient.quantity_in_text(description) {
            boundaries.insert(ingredient.quantity_position.begin);
            boundaries.insert(ingredient.quantity_position.end);
        }
    }

    let boundaries: Vec<usize> = boundaries.into_iter().collect();
    let mut moved = HashMap::with_capacity(boundaries.len());
    let mut rebuilt = String::with_capacity(description.len());
    for pair in boundaries.windows(2) {
        moved.insert(pair[0], rebuilt.len());
        rebuilt.push_str(&rewrite_words(&description[pair[0]..pair[1]], rewrite));
    }
    moved.insert(description.len(), rebuilt.len());

    let move_span = |span: TextSpan| -> Option<TextSpan> {
        Some(TextSpan::new(*moved.get(&span.begin)?, *moved.get(&span.end)?))
    };

    let ingredients = step
        .ingredients
        .iter()
        .map(|ingredient| {
            let quantity_position = if ingredient.quantity_in_text(description) {
                move_span(ingredient.quantity_position)
            } else {
                None
            }
            .unwrap_or_else(|| TextSpan::whole(&rebuilt));
            Ingredient {
                name: rewrite_words(&ingredient.name, rewrite),
                quantity: ingredient.quantity,
                unit: rewrite_words(&ingredient.unit, rewrite),
                quantity_position,
            }
        })
        .collect();

    let timers = step
        .timers
        .iter()
        .map(|timer| Timer {
            position: if timer.position.is_valid_in(description) {
                move_span(timer.position)
            } else {
                None
            }
            .unwrap_or_else(|| TextSpan::new(rebuilt.len(), rebuilt.len())),
            ..timer.clone()
        })
        .collect();

    RecipeStep {
        description: rebuilt,
        ingredients,
        timers,
    }
}

/// Rewrite the trimmed core of `text` when it contains a letter, keeping the
/// surrounding whitespace in place.
fn rewrite_words(text: &str, rewrite: &mut Rewrite<'_>) -> String {
    if !text.chars().any(char::is_alphabetic) {
        return text.to_string();
    }
    let core = text.trim();
    let lead = &text[..text.len() - text.trim_start().len()];
    let trail = &text[text.trim_end().len()..];
    format!("{}{}{}", lead, rewrite(core), trail)
}
