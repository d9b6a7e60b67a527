use std::path::Path;
use std::sync::mpsc;
use std::time::Instant;

use narrate_rs::{
    backends::espeak::EspeakBackend,
    script::{Ingredient, Recipe, RecipeBuilder},
    Sequencer,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let recipe = match std::env::args().nth(1) {
        Some(path) => Recipe::from_json_file(Path::new(&path))?,
        None => sample_recipe(),
    };

    let (sink, events) = mpsc::channel();
    let backend = EspeakBackend::new(sink);
    let mut narrator = Sequencer::new(backend, events);

    if !narrator.is_supported() {
        eprintln!("espeak-ng is not installed; nothing to narrate");
        return Ok(());
    }

    println!("Available voices: {}", narrator.voices().len());
    narrator.set_rate(1.1);

    let segments = recipe.narration();
    println!(
        "Narrating \"{}\" ({} segments)",
        recipe.title,
        segments.len()
    );

    let start = Instant::now();
    narrator.speak(segments);
    narrator.block_until_idle();
    println!("Finished in {:.2?}", start.elapsed());

    Ok(())
}

fn sample_recipe() -> Recipe {
    RecipeBuilder::default()
        .title("Tomato Soup")
        .description("A quick weeknight soup.")
        .servings(2u32)
        .ingredients(vec![
            Ingredient {
                name: "tomatoes".to_string(),
                amount: "6".to_string(),
                unit: "whole".to_string(),
            },
            Ingredient {
                name: "vegetable stock".to_string(),
                amount: "2".to_string(),
                unit: "cups".to_string(),
            },
        ])
        .instructions(vec![
            "Roast the tomatoes until blistered.".to_string(),
            "Blend with the stock and simmer for ten minutes.".to_string(),
        ])
        .build()
        .expect("sample recipe is complete")
}
