//! Prompt construction for classification requests.
//!
//! Each identification method gets a natural-language instruction plus a
//! JSON schema the backend is asked to conform to. Description requests
//! additionally enumerate the known-species catalog so the model grounds
//! its suggestions in entries we can augment.

use avis_core::{defaults, SpeciesCatalogEntry};

/// System role shared by all classification prompts.
pub const SYSTEM_PROMPT: &str =
    "You are an expert ornithologist. Respond only with a JSON object matching \
     the requested schema. Confidence values are numbers between 0 and 1.";

/// Instruction for photo classification. The image travels alongside the
/// prompt as an attached payload.
pub fn photo_prompt() -> String {
    "Identify the species of the bird in the attached photo. Provide the species \
     name, a confidence level (0-1), and a brief description of the species."
        .to_string()
}

/// Instruction for video classification.
pub fn video_prompt() -> String {
    "Identify the species of the bird in the attached video recording. Provide \
     the species name, a confidence level (0-1), and a brief description of the \
     species."
        .to_string()
}

/// Instruction for song classification.
pub fn song_prompt() -> String {
    "Identify the bird species from the attached audio recording of its song. \
     Provide the species name, a confidence level (0-1), a brief description of \
     the species, and any alternative species suggestions. Confidence should be \
     high only if the song is clear."
        .to_string()
}

/// Instruction for free-text description classification.
///
/// The catalog enumeration guides the model toward names the augmenter can
/// match exactly; an empty catalog simply omits the list.
pub fn description_prompt(text: &str, catalog: &[SpeciesCatalogEntry]) -> String {
    let mut prompt = String::from(
        "Identify bird species from the user's textual description. Provide a list \
         of 1 to 3 possible species matching the description. For each bird, give \
         the species name, a confidence level (0-1), and a brief description.\n",
    );

    if !catalog.is_empty() {
        prompt.push_str(
            "\nMap your suggestions to the known birds below whenever possible, \
             using their exact names and descriptions:\n",
        );
        for entry in catalog {
            prompt.push_str(&format!("- {}: {}\n", entry.name, entry.description));
        }
    }

    prompt.push_str(&format!("\nUser description:\n\"{}\"\n", text));
    prompt
}

/// JSON schema for the single-subject result shape, passed as the backend's
/// `format` constraint.
pub fn single_result_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "species": { "type": "string" },
            "confidence": { "type": "number", "minimum": 0.0, "maximum": 1.0 },
            "description": { "type": "string" },
            "alternativeSpecies": {
                "type": "array",
                "items": { "type": "string" }
            }
        },
        "required": ["species", "confidence", "description"]
    })
}

/// JSON schema for the multi-subject (description) result shape.
pub fn suggestions_schema() -> serde_json::Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            "birds": {
                "type": "array",
                "maxItems": defaults::MAX_SUGGESTIONS,
                "items": {
                    "type": "object",
                    "properties": {
                        "name": { "type": "string" },
                        "confidence": { "type": "number", "minimum": 0.0, "maximum": 1.0 },
                        "description": { "type": "string" },
                        "imageUrl": { "type": "string" },
                        "imageHint": { "type": "string" }
                    },
                    "required": ["name", "confidence", "description"]
                }
            }
        },
        "required": ["birds"]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use avis_core::{Habitat, SpeciesSize};

    fn entry(name: &str, description: &str) -> SpeciesCatalogEntry {
        SpeciesCatalogEntry {
            id: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            description: description.to_string(),
            image_url: None,
            image_hint: None,
            size: SpeciesSize::Medium,
            habitat: Habitat::Forest,
            colors: vec![],
        }
    }

    #[test]
    fn test_description_prompt_enumerates_catalog() {
        let catalog = vec![
            entry("Blue Jay", "A noisy and intelligent bird."),
            entry("Mallard", "A common duck."),
        ];
        let prompt = description_prompt("blue bird with a crest", &catalog);
        assert!(prompt.contains("- Blue Jay: A noisy and intelligent bird."));
        assert!(prompt.contains("- Mallard: A common duck."));
        assert!(prompt.contains("\"blue bird with a crest\""));
    }

    #[test]
    fn test_description_prompt_with_empty_catalog() {
        let prompt = description_prompt("small yellow bird", &[]);
        assert!(!prompt.contains("known birds"));
        assert!(prompt.contains("small yellow bird"));
    }

    #[test]
    fn test_single_schema_requires_confidence() {
        let schema = single_result_schema();
        let required = schema["required"].as_array().unwrap();
        assert!(required.contains(&serde_json::json!("confidence")));
        assert!(required.contains(&serde_json::json!("species")));
    }

    #[test]
    fn test_suggestions_schema_caps_entries() {
        let schema = suggestions_schema();
        assert_eq!(
            schema["properties"]["birds"]["maxItems"],
            serde_json::json!(defaults::MAX_SUGGESTIONS)
        );
    }
}
