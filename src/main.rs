use log::{info, warn};
use std::env;

use cookscale::render::{
    format_ingredient_line, format_servings, format_timer, recipe_ingredient_lines, step_views,
    RenderedBlock,
};
use cookscale::{
    CookscaleConfig, ExtractedText, ProcessingState, RecipeOrchestrator, RecipeSource,
};

const USAGE: &str = "Usage: cookscale <recipe-file> [servings] [--translate]";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    // Get the recipe file and options from command-line arguments
    let args: Vec<String> = env::args().skip(1).collect();
    let path = args
        .iter()
        .find(|arg| !arg.starts_with("--"))
        .ok_or(USAGE)?;
    let servings: Option<u32> = args
        .iter()
        .filter(|arg| !arg.starts_with("--"))
        .nth(1)
        .map(|arg| arg.parse())
        .transpose()
        .map_err(|_| USAGE)?;

    let mut config = CookscaleConfig::load()?;
    if args.iter().any(|arg| arg == "--translate") {
        config.translate_to_target = true;
    }

    let content = tokio::fs::read_to_string(path).await?;
    let source = if path.ends_with(".json") {
        RecipeSource::Extracted(ExtractedText::from_json(&content)?)
    } else {
        RecipeSource::PlainText(content)
    };

    let orchestrator = RecipeOrchestrator::builder().config(&config)?.build()?;
    wait_for_recipe(&orchestrator, source).await?;

    if let Some(target) = servings {
        adjust_servings(&orchestrator, target);
    }
    if config.translate_to_target {
        wait_for_translation(&orchestrator).await;
    }

    print_recipe(&orchestrator)
}

async fn wait_for_recipe(
    orchestrator: &RecipeOrchestrator,
    source: RecipeSource,
) -> Result<(), Box<dyn std::error::Error>> {
    let observables = orchestrator.observables();
    let mut states = observables.processing_state.subscribe();
    let mut progress = observables.progress_percent.subscribe();

    orchestrator.initialize(source);
    loop {
        tokio::select! {
            Some(percent) = progress.recv() => eprintln!("Extracting recipe... {}%", percent),
            state = states.recv() => match state {
                Some(ProcessingState::Succeeded) => return Ok(()),
                Some(ProcessingState::Failed) => {
                    let message = observables
                        .failure_message
                        .get()
                        .unwrap_or_else(|| "Extraction failed".to_string());
                    return Err(message.into());
                }
                Some(_) => {}
                None => return Err("Recipe processing stopped unexpectedly".into()),
            },
        }
    }
}

fn adjust_servings(orchestrator: &RecipeOrchestrator, target: u32) {
    let Some(mut current) = orchestrator.servings().map(|servings| servings.current) else {
        return;
    };
    while current != target {
        if current < target {
            orchestrator.increment_servings();
        } else {
            orchestrator.decrement_servings();
        }
        match orchestrator.servings() {
            Some(servings) if servings.current != current => current = servings.current,
            _ => {
                warn!("Cannot cook for {} people, staying at {}", target, current);
                return;
            }
        }
    }
    info!("Cooking for {} people", current);
}

async fn wait_for_translation(orchestrator: &RecipeOrchestrator) {
    let observables = orchestrator.observables();
    let mut recipes = observables.recipe.subscribe();
    let mut failures = observables.failure_message.subscribe();
    // The first value of each subscription is the current one
    failures.recv().await;
    orchestrator.translate(true);

    while orchestrator.is_translating() {
        tokio::select! {
            Some(_) = recipes.recv() => {}
            Some(failure) = failures.recv() => {
                if let Some(message) = failure {
                    warn!("{}, showing the original recipe", message);
                    return;
                }
            }
            else => return,
        }
    }
}

fn print_recipe(orchestrator: &RecipeOrchestrator) -> Result<(), Box<dyn std::error::Error>> {
    let recipe = orchestrator.recipe().ok_or("No recipe available")?;
    let servings = orchestrator
        .servings()
        .ok_or("No servings available")?
        .servings();

    println!("Servings: {}", format_servings(servings));
    if orchestrator.observables().default_servings_applied.get() {
        println!("(servings not found in the recipe, assuming {})", servings.original);
    }

    println!("\nIngredients:");
    for line in recipe_ingredient_lines(&recipe, servings) {
        println!("  - {}", format_ingredient_line(&line));
    }

    println!("\nSteps:");
    for (number, view) in step_views(&recipe).iter().enumerate() {
        println!("{}.", number + 1);
        for block in view.render(servings) {
            match block {
                RenderedBlock::Text(text) => println!("   {}", text),
                RenderedBlock::Timer { timer, .. } => println!("   [timer {}]", format_timer(&timer)),
            }
        }
        for line in view.ingredient_lines(servings) {
            println!("   * {}", format_ingredient_line(&line));
        }
    }

    Ok(())
}
