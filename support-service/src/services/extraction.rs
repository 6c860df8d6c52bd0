//! Reply-analysis resource extraction.
//!
//! Sends the generated reply back through the completion provider with an
//! instruction to name any resources the reply itself mentioned, then maps
//! the returned entities to resource records. Every failure mode here
//! degrades to an empty list; this pass must never fail the chat request.

use crate::models::{ChatTurn, Location, Resource, ResourceKind};
use crate::services::providers::{ChatProvider, GenerationParams};
use crate::services::regions::RegionResolver;
use crate::services::resources;
use serde::Deserialize;

/// Largest whole-mile value for distances on extracted records.
const EXTRACTED_MAX_MILES: u32 = 5;

/// Entity shape the analysis call is asked to return.
#[derive(Debug, Deserialize)]
struct DetectedEntity {
    #[serde(default)]
    name: Option<String>,
    #[serde(default, rename = "type")]
    kind: Option<String>,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    #[allow(dead_code)]
    mentioned: Option<String>,
}

fn analysis_prompt(reply: &str) -> String {
    format!(
        r#"Identify any resources, services, organizations, or places mentioned in the following response that could help someone. Return ONLY a JSON array of objects, no other text.

For each resource found, return an object with:
- "name": the specific name mentioned (e.g. "988 Lifeline", "BetterHelp")
- "type": one of ["crisis", "therapy", "support", "medical", "community", "housing", "food", "employment", "digital"]
- "description": brief description of what they offer
- "mentioned": the exact phrase that mentioned this resource

Response to analyze:
"{reply}"

Return an empty array [] if no specific resources, services, or organizations are mentioned."#
    )
}

/// Run the analysis call over a generated reply and map any named
/// entities to resource records. Returns an empty list on any failure.
pub async fn extract_reply_resources(
    provider: &dyn ChatProvider,
    model: &str,
    reply: &str,
    location: Option<&Location>,
    regions: &dyn RegionResolver,
) -> Vec<Resource> {
    let params = GenerationParams {
        model: Some(model.to_string()),
        // Low temperature: this call is parsed, not read.
        temperature: Some(0.1),
        max_tokens: Some(500),
        ..GenerationParams::default()
    };

    let prompt = analysis_prompt(reply);

    let analysis = match provider.complete(&[ChatTurn::user(prompt)], &params).await {
        Ok(response) => response.text,
        Err(e) => {
            tracing::warn!(
                error = %e,
                "Reply analysis call failed, continuing without extracted resources"
            );
            return Vec::new();
        }
    };

    let entities = match parse_entities(&analysis) {
        Ok(entities) => entities,
        Err(e) => {
            tracing::warn!(
                error = %e,
                analysis_len = analysis.len(),
                "Reply analysis did not parse as a resource array"
            );
            return Vec::new();
        }
    };

    let total = entities.len();
    let records: Vec<Resource> = entities
        .into_iter()
        .filter_map(|entity| entity_resource(entity, location, regions))
        .collect();

    if records.len() < total {
        tracing::warn!(
            dropped = total - records.len(),
            "Dropped analysis entities missing a name or type"
        );
    }

    for record in &records {
        tracing::debug!(kind = %record.kind, name = %record.name, "Extracted resource");
    }

    records
}

/// Parse the analysis output as a JSON array. Models wrap arrays in prose
/// often enough that the first-`[`-to-last-`]` slice is retried before
/// giving up.
fn parse_entities(raw: &str) -> Result<Vec<DetectedEntity>, serde_json::Error> {
    match serde_json::from_str(raw) {
        Ok(entities) => Ok(entities),
        Err(err) => {
            if let (Some(start), Some(end)) = (raw.find('['), raw.rfind(']')) {
                if start < end {
                    return serde_json::from_str(&raw[start..=end]);
                }
            }
            Err(err)
        }
    }
}

/// Map one detected entity to a record. Entities without a name or type
/// are dropped; an unrecognized type label maps to `support`.
fn entity_resource(
    entity: DetectedEntity,
    location: Option<&Location>,
    regions: &dyn RegionResolver,
) -> Option<Resource> {
    let name = entity.name.filter(|n| !n.is_empty())?;
    let kind_label = entity.kind.filter(|k| !k.is_empty())?;

    if kind_label.eq_ignore_ascii_case("digital") || resources::is_digital_service(&name) {
        return Some(resources::digital_resource(&name));
    }

    let kind = ResourceKind::from_label(&kind_label).unwrap_or(ResourceKind::Support);
    let description = entity
        .description
        .filter(|d| !d.is_empty())
        .unwrap_or_else(|| resources::default_description(kind).to_string());

    let record = match location {
        Some(loc) => {
            let locality = regions.locate(loc);
            let name = if name.contains(&locality.city) {
                name
            } else {
                format!("{} {}", locality.city, name)
            };
            let directions = resources::maps_link(loc, &urlencoding::encode(&name));
            Resource {
                kind,
                name,
                description,
                phone: resources::default_phone(kind).map(str::to_string),
                website: Some(resources::default_website(kind).to_string()),
                directions: Some(directions),
                distance: Some(resources::fabricated_distance(EXTRACTED_MAX_MILES)),
            }
        }
        None => Resource {
            kind,
            name,
            description,
            phone: resources::default_phone(kind).map(str::to_string),
            website: Some(resources::default_website(kind).to_string()),
            directions: None,
            distance: Some("Contact for details".to_string()),
        },
    };

    Some(record)
}
