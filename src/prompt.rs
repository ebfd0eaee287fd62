use serde_json::{Value, json};

use crate::constants::{ERROR_NO_INGREDIENTS, SYSTEM_PERSONA};
use crate::error::RelayError;

/// Minimum length of a single ingredient entry, matching the submission rule
/// enforced by the original form.
pub const MIN_INGREDIENT_CHARS: usize = 3;

/// Validated, ordered ingredient list. Entries are carried verbatim into the
/// prompt; validation only gates whether a submission is accepted at all.
#[derive(Debug, Clone)]
pub struct Ingredients(Vec<String>);

impl Ingredients {
    pub fn parse(items: Vec<String>) -> Result<Self, RelayError> {
        if items.is_empty() {
            return Err(RelayError::bad_request(ERROR_NO_INGREDIENTS));
        }
        for item in &items {
            if item.trim().chars().count() < MIN_INGREDIENT_CHARS {
                return Err(RelayError::bad_request(&format!(
                    "ingredient {:?} is too short (minimum {} characters)",
                    item, MIN_INGREDIENT_CHARS
                )));
            }
        }
        Ok(Self(items))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Renders the list as `- item` lines joined with CRLF, preserving input
    /// order.
    pub fn bulleted(&self) -> String {
        self.0
            .iter()
            .map(|item| format!("- {}", item))
            .collect::<Vec<_>>()
            .join("\r\n")
    }
}

fn user_prompt(listed_items: &str) -> String {
    format!(
        "Dear husband, I want to cook something with the ingredients in my house but I don't come up with any ideas. Based on the following ingredients and quantities, write a recipe for me to do, it does not necessarily need to include all of the ingredients listed and you can't add ingredients that I haven't listed to you.\nCurrently, I have:\n{}\nWhat can I make?",
        listed_items
    )
}

/// Builds the upstream completion payload: the templated user prompt plus the
/// fixed persona, streaming enabled. Pure construction.
pub fn completion_request(ingredients: &Ingredients, model: &str, temperature: f64) -> Value {
    json!({
        "model": model,
        "messages": [
            {
                "role": "user",
                "content": user_prompt(&ingredients.bulleted()),
            },
            {
                "role": "system",
                "content": SYSTEM_PERSONA,
            },
        ],
        "temperature": temperature,
        "stream": true,
    })
}
