//! Display-ready pieces of a recipe for a chosen number of servings.

use crate::model::{Ingredient, Recipe, RecipeStep, Timer};
use crate::rescale::{rescale_block, scaled_quantity, Servings};
use crate::segment::{segment_step, Block, StepSegmentation};

#[derive(Debug, Clone, PartialEq)]
pub enum RenderedBlock {
    Text(String),
    Timer { index: usize, timer: Timer },
}

/// One step with its segmentation computed once and rendered for any
/// number of servings.
#[derive(Debug, Clone)]
pub struct StepView {
    step: RecipeStep,
    segmentation: StepSegmentation,
}

impl StepView {
    pub fn new(step: RecipeStep) -> Self {
        let segmentation = segment_step(&step);
        StepView { step, segmentation }
    }

    pub fn step(&self) -> &RecipeStep {
        &self.step
    }

    pub fn segmentation(&self) -> &StepSegmentation {
        &self.segmentation
    }

    pub fn render(&self, servings: Servings) -> Vec<RenderedBlock> {
        self.segmentation
            .blocks
            .iter()
            .filter_map(|block| match block {
                Block::Text(text) => Some(RenderedBlock::Text(rescale_block(
                    text, &self.step, servings,
                ))),
                Block::Timer { index } => {
                    self.step
                        .timers
                        .get(*index)
                        .map(|timer| RenderedBlock::Timer {
                            index: *index,
                            timer: timer.clone(),
                        })
                }
            })
            .collect()
    }

    pub fn ingredient_lines(&self, servings: Servings) -> Vec<IngredientLine> {
        ingredient_lines(&self.step, servings)
    }
}

/// Views for every step of `recipe`
pub fn step_views(recipe: &Recipe) -> Vec<StepView> {
    recipe.steps.iter().cloned().map(StepView::new).collect()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientLine {
    pub name: String,
    pub quantity: Option<String>,
    pub unit: Option<String>,
}

/// Ingredient list of one step. Quantities that do not appear in the step text are hidden.
pub fn ingredient_lines(step: &RecipeStep, servings: Servings) -> Vec<IngredientLine> {
    step.ingredients
        .iter()
        .map(|ingredient| {
            let shown = !ingredient
                .quantity_position
                .is_whole_range(&step.description);
            line(ingredient, shown, servings)
        })
        .collect()
}

/// Ingredient list of the whole recipe. Unknown (zero) quantities are hidden.
pub fn recipe_ingredient_lines(recipe: &Recipe, servings: Servings) -> Vec<IngredientLine> {
    recipe
        .ingredients
        .iter()
        .map(|ingredient| line(ingredient, ingredient.quantity > 0.0, servings))
        .collect()
}

fn line(ingredient: &Ingredient, show_quantity: bool, servings: Servings) -> IngredientLine {
    IngredientLine {
        name: capitalize(&ingredient.name),
        quantity: show_quantity.then(|| scaled_quantity(ingredient, servings)),
        unit: (!ingredient.unit.is_empty()).then(|| ingredient.unit.clone()),
    }
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// `m:ss`, or `m:ss - m:ss` when the bounds differ
pub fn format_timer(timer: &Timer) -> String {
    let lower = format_seconds(timer.lower_bound_seconds);
    if timer.upper_bound_seconds > timer.lower_bound_seconds {
        format!("{} - {}", lower, format_seconds(timer.upper_bound_seconds))
    } else {
        lower
    }
}

fn format_seconds(seconds: u32) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Plain text line for one ingredient, e.g. `Pasta: 400 g`
pub fn format_ingredient_line(line: &IngredientLine) -> String {
    match (&line.quantity, &line.unit) {
        (Some(quantity), Some(unit)) => format!("{}: {} {}", line.name, quantity, unit),
        (Some(quantity), None) => format!("{}: {}", line.name, quantity),
        (None, Some(unit)) => format!("{} ({})", line.name, unit),
        (None, None) => line.name.clone(),
    }
}

/// Servings label as shown next to the servings controls
pub fn format_servings(servings: Servings) -> String {
    format!("{} (recipe for {})", servings.current, servings.original)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::TextSpan;

    fn pasta_step() -> RecipeStep {
        let mut step = RecipeStep::new("Boil water for 5 minutes, add 200 g pasta.");
        step.timers.push(Timer {
            position: TextSpan::new(15, 24),
            lower_bound_seconds: 300,
            upper_bound_seconds: 300,
        });
        step.ingredients.push(Ingredient {
            name: "pasta".to_string(),
            quantity: 200.0,
            unit: "g".to_string(),
            quantity_position: TextSpan::new(30, 35),
        });
        step.ingredients.push(Ingredient {
            name: "salt".to_string(),
            quantity: 1.0,
            unit: String::new(),
            quantity_position: TextSpan::new(0, 42),
        });
        step
    }

    #[test]
    fn test_render_step() {
        let view = StepView::new(pasta_step());
        let blocks = view.render(Servings::new(2, 4));

        assert_eq!(blocks.len(), 3);
        assert_eq!(
            blocks[0],
            RenderedBlock::Text("Boil water for 5 minutes".to_string())
        );
        assert!(matches!(blocks[1], RenderedBlock::Timer { index: 0, .. }));
        assert_eq!(blocks[2], RenderedBlock::Text("add 400 g pasta.".to_string()));
    }

    #[test]
    fn test_render_is_repeatable() {
        let view = StepView::new(pasta_step());
        view.render(Servings::new(2, 7));
        assert_eq!(
            view.render(Servings::new(2, 1))[2],
            RenderedBlock::Text("add 100 g pasta.".to_string())
        );
    }

    #[test]
    fn test_step_ingredient_lines() {
        let lines = ingredient_lines(&pasta_step(), Servings::new(2, 3));
        assert_eq!(
            lines,
            vec![
                IngredientLine {
                    name: "Pasta".to_string(),
                    quantity: Some("300".to_string()),
                    unit: Some("g".to_string()),
                },
                IngredientLine {
                    name: "Salt".to_string(),
                    quantity: None,
                    unit: None,
                },
            ]
        );
    }

    #[test]
    fn test_recipe_ingredient_lines() {
        let recipe = Recipe {
            ingredients: vec![
                Ingredient {
                    name: "ëggs".to_string(),
                    quantity: 3.0,
                    unit: String::new(),
                    quantity_position: TextSpan::new(0, 0),
                },
                Ingredient {
                    name: "pepper".to_string(),
                    quantity: 0.0,
                    unit: String::new(),
                    quantity_position: TextSpan::new(0, 0),
                },
            ],
            ..Default::default()
        };
        let lines = recipe_ingredient_lines(&recipe, Servings::new(2, 1));
        assert_eq!(lines[0].name, "Ëggs");
        assert_eq!(lines[0].quantity.as_deref(), Some("1 1/2"));
        assert_eq!(lines[1].quantity, None);
        assert_eq!(format_ingredient_line(&lines[1]), "Pepper");
    }

    #[test]
    fn test_format_timer() {
        let timer = |lower, upper| Timer {
            position: TextSpan::new(0, 0),
            lower_bound_seconds: lower,
            upper_bound_seconds: upper,
        };
        assert_eq!(format_timer(&timer(300, 300)), "5:00");
        assert_eq!(format_timer(&timer(90, 120)), "1:30 - 2:00");
        assert_eq!(format_timer(&timer(5, 0)), "0:05");
    }

    #[test]
    fn test_format_servings() {
        assert_eq!(format_servings(Servings::new(2, 5)), "5 (recipe for 2)");
    }

    #[test]
    fn test_format_ingredient_line() {
        let line = IngredientLine {
            name: "Pasta".to_string(),
            quantity: Some("400".to_string()),
            unit: Some("g".to_string()),
        };
        assert_eq!(format_ingredient_line(&line), "Pasta: 400 g");
    }
}
