use cookscale::rescale::rescale_block;
use cookscale::{
    segment_step, Block, Ingredient, RecipeStep, Servings, TextSpan, Timer, QUANTITY_PLACEHOLDER,
};

fn timer(begin: usize, end: usize) -> Timer {
    Timer {
        position: TextSpan::new(begin, end),
        lower_bound_seconds: 60,
        upper_bound_seconds: 60,
    }
}

fn ingredient(name: &str, quantity: f64, unit: &str, begin: usize, end: usize) -> Ingredient {
    Ingredient {
        name: name.to_string(),
        quantity,
        unit: unit.to_string(),
        quantity_position: TextSpan::new(begin, end),
    }
}

fn step(description: &str, timers: Vec<Timer>, ingredients: Vec<Ingredient>) -> RecipeStep {
    RecipeStep {
        description: description.to_string(),
        ingredients,
        timers,
    }
}

fn rendered(step: &RecipeStep, servings: Servings) -> Vec<String> {
    segment_step(step)
        .text_blocks()
        .map(|block| rescale_block(block, step, servings))
        .collect()
}

#[test]
fn test_blocks_reconstruct_description() {
    let steps = vec![
        step("Stir well.", vec![], vec![]),
        step("10 minutes in the oven", vec![timer(0, 10)], vec![]),
        step("Rest 5 min 10 min", vec![timer(5, 10), timer(11, 17)], vec![]),
        step(
            "Fry 2 onions for 3 minutes, then add 1 1/2 cups of stock and simmer 20 minutes.",
            vec![timer(17, 26), timer(68, 78)],
            vec![
                ingredient("onion", 2.0, "", 4, 5),
                ingredient("stock", 1.5, "cups", 37, 47),
            ],
        ),
        step(
            "Crème fraîche: 200 g, 2 min",
            vec![timer(24, 29)],
            vec![ingredient("crème", 200.0, "g", 17, 22)],
        ),
    ];

    for step in &steps {
        let segmentation = segment_step(step);
        assert_eq!(segmentation.reconstruct(), step.description);
        let timers = segmentation
            .blocks
            .iter()
            .filter(|block| matches!(block, Block::Timer { .. }))
            .count();
        assert_eq!(timers, step.timers.len());
    }
}

#[test]
fn test_timer_blocks_follow_their_text() {
    let step = step("Rest 5 min 10 min", vec![timer(5, 10), timer(11, 17)], vec![]);
    let blocks = segment_step(&step).blocks;

    assert_eq!(blocks.len(), 4);
    assert!(matches!(&blocks[0], Block::Text(text) if text.content == "Rest 5 min"));
    assert_eq!(blocks[1], Block::Timer { index: 0 });
    assert!(matches!(&blocks[2], Block::Text(text) if text.content == " 10 min"));
    assert_eq!(blocks[3], Block::Timer { index: 1 });
}

#[test]
fn test_every_quantity_gets_a_placeholder() {
    let step = step(
        "Fry 2 onions for 3 minutes, then add 1 1/2 cups of stock and simmer 20 minutes.",
        vec![timer(17, 26), timer(68, 78)],
        vec![
            ingredient("onion", 2.0, "", 4, 5),
            ingredient("stock", 1.5, "cups", 37, 47),
            ingredient("salt", 1.0, "", 0, 79),
        ],
    );
    let segmentation = segment_step(&step);
    let placeholders: usize = segmentation
        .text_blocks()
        .map(|block| block.placeholder_count())
        .sum();
    assert_eq!(placeholders, 2);

    let templates: Vec<&str> = segmentation
        .text_blocks()
        .map(|block| block.template.as_str())
        .collect();
    assert_eq!(
        templates[1],
        format!(", then add {} cups of stock and simmer 20 minutes", QUANTITY_PLACEHOLDER)
    );
}

#[test]
fn test_rescaling_to_original_servings_keeps_text() {
    let step = step(
        "Fry 2 onions for 3 minutes, then add 1 1/2 cups of stock and simmer 20 minutes.",
        vec![timer(17, 26), timer(68, 78)],
        vec![
            ingredient("onion", 2.0, "", 4, 5),
            ingredient("stock", 1.5, "cups", 37, 47),
        ],
    );
    assert_eq!(
        rendered(&step, Servings::new(4, 4)),
        vec![
            "Fry 2 onions for 3 minutes",
            "then add 1 1/2 cups of stock and simmer 20 minutes",
            ".",
        ]
    );
}

#[test]
fn test_rescaling_changes_only_quantities() {
    let step = step(
        "Fry 2 onions for 3 minutes, then add 1 1/2 cups of stock and simmer 20 minutes.",
        vec![timer(17, 26), timer(68, 78)],
        vec![
            ingredient("onion", 2.0, "", 4, 5),
            ingredient("stock", 1.5, "cups", 37, 47),
        ],
    );
    assert_eq!(
        rendered(&step, Servings::new(4, 2)),
        vec![
            "Fry 1 onions for 3 minutes",
            "then add 3/4 cups of stock and simmer 20 minutes",
            ".",
        ]
    );
    assert_eq!(
        rendered(&step, Servings::new(4, 6))[1],
        "then add 2 1/4 cups of stock and simmer 20 minutes"
    );
}

#[test]
fn test_rescaling_after_any_sequence_of_changes() {
    let step = step(
        "Boil water for 5 minutes, add 200 g pasta.",
        vec![timer(15, 24)],
        vec![ingredient("pasta", 200.0, "g", 30, 35)],
    );
    for current in [7, 1, 80, 3, 2] {
        rendered(&step, Servings::new(2, current));
    }
    assert_eq!(rendered(&step, Servings::new(2, 4))[1], "add 400 g pasta.");
}

#[test]
fn test_multibyte_description() {
    let description = "Crème fraîche: 200 g, 2 min";
    let step = step(
        description,
        vec![timer(24, 29)],
        vec![ingredient("crème", 200.0, "g", 17, 22)],
    );
    assert_eq!(TextSpan::new(17, 22).slice(description), Some("200 g"));
    assert_eq!(
        rendered(&step, Servings::new(1, 2)),
        vec!["Crème fraîche: 400 g, 2 min"]
    );
}

#[test]
fn test_invalid_quantity_span_is_left_alone() {
    let step = step("Add 2 eggs.", vec![], vec![ingredient("eggs", 2.0, "", 4, 40)]);
    assert_eq!(rendered(&step, Servings::new(1, 3)), vec!["Add 2 eggs."]);
}

#[test]
fn test_scaling_down_keeps_small_quantities() {
    let step = step(
        "Add 0.1 tsp salt.",
        vec![],
        vec![ingredient("salt", 0.1, "tsp", 4, 11)],
    );
    assert_eq!(rendered(&step, Servings::new(8, 1)), vec!["Add 0.01 tsp salt."]);
    assert_eq!(rendered(&step, Servings::new(8, 4)), vec!["Add 0.05 tsp salt."]);
}
