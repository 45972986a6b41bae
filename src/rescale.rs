//! Expanding placeholder templates into text for a number of servings.

use crate::format::format_quantity;
use crate::model::{Ingredient, RecipeStep};
use crate::segment::{quantities_in_range, TextBlock, QUANTITY_PLACEHOLDER};

/// Servings the recipe was written for and servings currently requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Servings {
    pub original: u32,
    pub current: u32,
}

impl Servings {
    /// `original` is floored at 1 so scaling never divides by zero.
    pub fn new(original: u32, current: u32) -> Self {
        Servings {
            original: original.max(1),
            current,
        }
    }

    pub fn scale(&self, quantity: f64) -> f64 {
        quantity / self.original as f64 * self.current as f64
    }
}

pub fn scaled_quantity(ingredient: &Ingredient, servings: Servings) -> String {
    format_quantity(servings.scale(ingredient.quantity))
}

/// Fill the placeholders of `block` with quantities scaled to `servings`.
///
/// Always works from `block.template`; a previously rendered string has lost
/// its placeholders and cannot be rescaled again.
pub fn rescale_block(block: &TextBlock, step: &RecipeStep, servings: Servings) -> String {
    let mut text = block.template.clone();

    for index in quantities_in_range(step, block.start, block.end)
        .into_iter()
        .rev()
    {
        let quantity = scaled_quantity(&step.ingredients[index], servings);
        // Ascending order, so the first remaining placeholder belongs to this ingredient
        text = text.replacen(QUANTITY_PLACEHOLDER, &quantity, 1);
    }

    strip_leading_separators(&text).to_string()
}

/// Drop whitespace and punctuation left in front of the first word, e.g. the
/// ", " in ", add 400 g pasta." that follows a timer. Text without any
/// letter is returned unchanged.
fn strip_leading_separators(text: &str) -> &str {
    if !text.chars().any(char::is_alphabetic) {
        return text;
    }
    match text.find(char::is_alphanumeric) {
        Some(start) => &text[start..],
        None => text,
    }
}
