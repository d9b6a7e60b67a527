//! Narration scripts: turning structured recipes into segment lists.
//!
//! A [`Recipe`] flattens into the segment order a cook expects to hear:
//! title, description, the ingredient list, then numbered instruction steps.
//! Each segment is one utterance for the
//! [`Sequencer`](crate::Sequencer), so pause/resume land on natural
//! boundaries.

use std::fs;
use std::path::Path;

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

#[derive(thiserror::Error, Debug)]
pub enum ScriptError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid recipe JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One recipe ingredient.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ingredient {
    pub name: String,
    /// Amount as written (`"2"`, `"0.5"`, `"a pinch"`). Kept as text so
    /// non-numeric amounts survive serving scaling untouched.
    pub amount: String,
    pub unit: String,
}

/// A recipe ready to be narrated.
///
/// Construct directly, through [`RecipeBuilder`], or from a JSON file:
///
/// ```no_run
/// use std::path::Path;
/// use narrate_rs::script::Recipe;
///
/// let recipe = Recipe::from_json_file(Path::new("soup.json"))?;
/// let segments = recipe.narration();
/// # Ok::<(), narrate_rs::script::ScriptError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Builder)]
#[builder(setter(into))]
pub struct Recipe {
    pub title: String,
    #[builder(default)]
    pub description: String,
    /// Serving count the ingredient amounts are written for.
    #[builder(default = "4")]
    pub servings: u32,
    #[builder(default)]
    pub ingredients: Vec<Ingredient>,
    #[builder(default)]
    pub instructions: Vec<String>,
}

impl Recipe {
    /// Load a recipe from a JSON file.
    pub fn from_json_file(path: &Path) -> Result<Self, ScriptError> {
        let content = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    /// Flatten the recipe into narration segments at its written serving
    /// count.
    pub fn narration(&self) -> Vec<String> {
        self.narration_for_servings(self.servings)
    }

    /// Flatten the recipe into narration segments, scaling numeric
    /// ingredient amounts to `servings`.
    pub fn narration_for_servings(&self, servings: u32) -> Vec<String> {
        let mut segments =
            Vec::with_capacity(4 + self.ingredients.len() + self.instructions.len());

        segments.push(format!("Recipe: {}", self.title));
        if !self.description.is_empty() {
            segments.push(self.description.clone());
        }

        if !self.ingredients.is_empty() {
            segments.push("Ingredients:".to_string());
            for ingredient in &self.ingredients {
                let amount = scale_amount(&ingredient.amount, self.servings, servings);
                segments.push(format!(
                    "{} {} {}",
                    amount, ingredient.unit, ingredient.name
                ));
            }
        }

        if !self.instructions.is_empty() {
            segments.push("Instructions:".to_string());
            for (i, step) in self.instructions.iter().enumerate() {
                segments.push(format!("Step {}: {}", i + 1, step));
            }
        }

        segments
    }
}

/// Scale a textual amount by `to / from` servings.
///
/// Only a leading numeric value is scaled; amounts like `"a pinch"` pass
/// through unchanged. Scaled values render with one decimal place, dropping
/// a trailing `.0`.
fn scale_amount(amount: &str, from: u32, to: u32) -> String {
    if from == 0 || from == to {
        return amount.to_string();
    }
    let Some(numeric) = leading_number(amount) else {
        return amount.to_string();
    };
    let scaled = numeric * to as f32 / from as f32;
    let rendered = format!("{scaled:.1}");
    rendered
        .strip_suffix(".0")
        .unwrap_or(&rendered)
        .to_string()
}

/// Parse the leading decimal number of an amount, if any.
fn leading_number(s: &str) -> Option<f32> {
    let s = s.trim_start();
    let end = s
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(s.len());
    s[..end].parse().ok()
}

#[cfg(test)]
mod tests {
    use super::{Ingredient, Recipe, RecipeBuilder};

    fn soup() -> Recipe {
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
                    name: "cream".to_string(),
                    amount: "0.5".to_string(),
                    unit: "cup".to_string(),
                },
                Ingredient {
                    name: "salt".to_string(),
                    amount: "a pinch".to_string(),
                    unit: "of".to_string(),
                },
            ])
            .instructions(vec![
                "Roast the tomatoes.".to_string(),
                "Blend and simmer.".to_string(),
            ])
            .build()
            .expect("complete recipe")
    }

    #[test]
    fn narration_reads_title_ingredients_then_steps() {
        let segments = soup().narration();
        assert_eq!(
            segments,
            vec![
                "Recipe: Tomato Soup",
                "A quick weeknight soup.",
                "Ingredients:",
                "6 whole tomatoes",
                "0.5 cup cream",
                "a pinch of salt",
                "Instructions:",
                "Step 1: Roast the tomatoes.",
                "Step 2: Blend and simmer.",
            ]
        );
    }

    #[test]
    fn doubling_servings_doubles_numeric_amounts() {
        let segments = soup().narration_for_servings(4);
        assert!(segments.contains(&"12 whole tomatoes".to_string()));
        assert!(segments.contains(&"1 cup cream".to_string()));
    }

    #[test]
    fn halving_servings_keeps_fractional_amounts_readable() {
        let segments = soup().narration_for_servings(1);
        assert!(segments.contains(&"3 whole tomatoes".to_string()));
        // 0.25 renders as 0.2 under round-half-to-even.
        assert!(segments.contains(&"0.2 cup cream".to_string()));
    }

    #[test]
    fn non_numeric_amounts_pass_through_scaling() {
        let segments = soup().narration_for_servings(6);
        assert!(segments.contains(&"a pinch of salt".to_string()));
    }

    #[test]
    fn builder_fills_optional_fields() {
        let recipe = RecipeBuilder::default()
            .title("Toast")
            .build()
            .expect("title is the only required field");
        assert_eq!(recipe.servings, 4);
        assert_eq!(recipe.narration(), vec!["Recipe: Toast"]);
    }

    #[test]
    fn loads_a_recipe_from_json() {
        let path = std::env::temp_dir().join("narrate-recipe-test.json");
        std::fs::write(
            &path,
            r#"{
                "title": "Porridge",
                "description": "",
                "servings": 1,
                "ingredients": [
                    {"name": "oats", "amount": "50", "unit": "grams"}
                ],
                "instructions": ["Simmer the oats in water."]
            }"#,
        )
        .expect("temp file is writable");

        let recipe = Recipe::from_json_file(&path).expect("valid recipe JSON");
        assert_eq!(recipe.title, "Porridge");
        assert_eq!(recipe.ingredients.len(), 1);

        let missing = Recipe::from_json_file(std::path::Path::new("/nonexistent/recipe.json"));
        assert!(missing.is_err());
    }
}
