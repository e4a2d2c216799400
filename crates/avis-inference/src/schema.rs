//! Strict validation of raw classification responses.
//!
//! The service's output is duck-typed JSON; everything here re-checks it
//! against the expected result shape before any value crosses into the rest
//! of the system. A response that parses as JSON but violates field types or
//! ranges is rejected exactly like a malformed one.

use serde::Deserialize;

use avis_core::{
    defaults, Error, Result, SingleIdentification, SpeciesSuggestion, SpeciesSuggestions,
};

/// Raw single-subject response, before validation.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSingle {
    species: Option<String>,
    confidence: Option<f64>,
    description: Option<String>,
    #[serde(default)]
    alternative_species: Option<Vec<String>>,
}

/// Raw multi-subject response, before validation.
#[derive(Debug, Deserialize)]
struct RawSuggestions {
    birds: Option<Vec<RawSuggestion>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSuggestion {
    name: Option<String>,
    confidence: Option<f64>,
    description: Option<String>,
    #[serde(default)]
    image_url: Option<String>,
    #[serde(default)]
    image_hint: Option<String>,
}

fn require_confidence(value: Option<f64>, context: &str) -> Result<f64> {
    let confidence = value
        .ok_or_else(|| Error::Classification(format!("{}: missing confidence", context)))?;
    if !(0.0..=1.0).contains(&confidence) || !confidence.is_finite() {
        return Err(Error::Classification(format!(
            "{}: confidence {} outside [0, 1]",
            context, confidence
        )));
    }
    Ok(confidence)
}

fn require_string(value: Option<String>, context: &str, field: &str) -> Result<String> {
    match value {
        Some(s) if !s.trim().is_empty() => Ok(s),
        _ => Err(Error::Classification(format!(
            "{}: missing {}",
            context, field
        ))),
    }
}

/// Parse and validate a single-subject (photo/video/song) response.
pub fn parse_single(content: &str) -> Result<SingleIdentification> {
    let raw: RawSingle = serde_json::from_str(content)
        .map_err(|e| Error::Classification(format!("Malformed response: {}", e)))?;

    Ok(SingleIdentification {
        species: require_string(raw.species, "single result", "species")?,
        confidence: require_confidence(raw.confidence, "single result")?,
        description: require_string(raw.description, "single result", "description")?,
        alternative_species: raw.alternative_species.unwrap_or_default(),
    })
}

/// Parse and validate a multi-subject (description) response.
///
/// Zero suggestions is valid; an empty catalog or an unmatchable
/// description degrades gracefully. More than the schema's cap is a
/// violation.
pub fn parse_suggestions(content: &str) -> Result<SpeciesSuggestions> {
    let raw: RawSuggestions = serde_json::from_str(content)
        .map_err(|e| Error::Classification(format!("Malformed response: {}", e)))?;

    let raw_birds = raw
        .birds
        .ok_or_else(|| Error::Classification("suggestions: missing birds array".into()))?;

    if raw_birds.len() > defaults::MAX_SUGGESTIONS {
        return Err(Error::Classification(format!(
            "suggestions: {} entries exceeds maximum of {}",
            raw_birds.len(),
            defaults::MAX_SUGGESTIONS
        )));
    }

    let mut birds = Vec::with_capacity(raw_birds.len());
    for (i, raw_bird) in raw_birds.into_iter().enumerate() {
        let context = format!("suggestion {}", i);
        birds.push(SpeciesSuggestion {
            name: require_string(raw_bird.name, &context, "name")?,
            confidence: require_confidence(raw_bird.confidence, &context)?,
            description: require_string(raw_bird.description, &context, "description")?,
            image_url: raw_bird.image_url,
            image_hint: raw_bird.image_hint,
        });
    }

    Ok(SpeciesSuggestions { birds })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_single_valid() {
        let result = parse_single(
            r#"{"species": "Blue Jay", "confidence": 0.92,
                "description": "Bright blue plumage.",
                "alternativeSpecies": ["Steller's Jay"]}"#,
        )
        .unwrap();
        assert_eq!(result.species, "Blue Jay");
        assert_eq!(result.confidence, 0.92);
        assert_eq!(result.alternative_species, vec!["Steller's Jay"]);
    }

    #[test]
    fn test_parse_single_without_alternatives() {
        let result = parse_single(
            r#"{"species": "Mallard", "confidence": 0.5, "description": "A duck."}"#,
        )
        .unwrap();
        assert!(result.alternative_species.is_empty());
    }

    #[test]
    fn test_parse_single_missing_confidence_rejected() {
        // A response claiming a species without confidence violates the schema.
        let err = parse_single(r#"{"species": "Sparrow", "description": "Small."}"#).unwrap_err();
        assert!(matches!(err, Error::Classification(_)));
    }

    #[test]
    fn test_parse_single_confidence_out_of_range_rejected() {
        let err = parse_single(
            r#"{"species": "Sparrow", "confidence": 1.5, "description": "Small."}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Classification(_)));

        let err = parse_single(
            r#"{"species": "Sparrow", "confidence": -0.1, "description": "Small."}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Classification(_)));
    }

    #[test]
    fn test_parse_single_not_json_rejected() {
        let err = parse_single("I think it's a Blue Jay!").unwrap_err();
        assert!(matches!(err, Error::Classification(_)));
    }

    #[test]
    fn test_parse_single_empty_species_rejected() {
        let err =
            parse_single(r#"{"species": "  ", "confidence": 0.9, "description": "x"}"#)
                .unwrap_err();
        assert!(matches!(err, Error::Classification(_)));
    }

    #[test]
    fn test_parse_suggestions_valid() {
        let result = parse_suggestions(
            r#"{"birds": [
                {"name": "Blue Jay", "confidence": 0.8, "description": "Blue."},
                {"name": "Steller's Jay", "confidence": 0.4, "description": "Darker.",
                 "imageUrl": "https://example.com/s.jpg"}
            ]}"#,
        )
        .unwrap();
        assert_eq!(result.birds.len(), 2);
        assert_eq!(
            result.birds[1].image_url.as_deref(),
            Some("https://example.com/s.jpg")
        );
    }

    #[test]
    fn test_parse_suggestions_empty_is_valid() {
        let result = parse_suggestions(r#"{"birds": []}"#).unwrap();
        assert!(result.birds.is_empty());
    }

    #[test]
    fn test_parse_suggestions_missing_birds_rejected() {
        let err = parse_suggestions(r#"{"species": "Blue Jay"}"#).unwrap_err();
        assert!(matches!(err, Error::Classification(_)));
    }

    #[test]
    fn test_parse_suggestions_too_many_rejected() {
        let err = parse_suggestions(
            r#"{"birds": [
                {"name": "A", "confidence": 0.9, "description": "a"},
                {"name": "B", "confidence": 0.8, "description": "b"},
                {"name": "C", "confidence": 0.7, "description": "c"},
                {"name": "D", "confidence": 0.6, "description": "d"}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Classification(_)));
    }

    #[test]
    fn test_parse_suggestions_bad_entry_rejected() {
        let err = parse_suggestions(
            r#"{"birds": [{"name": "Blue Jay", "description": "no confidence"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Classification(_)));
    }
}
