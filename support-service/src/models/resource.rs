use serde::{Deserialize, Serialize};

/// Category of a synthesized support resource.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Crisis,
    Therapy,
    Support,
    Medical,
    Community,
    Housing,
    Food,
    Employment,
    Digital,
}

impl ResourceKind {
    /// Parse the label used on the wire by the reply-analysis call.
    pub fn from_label(label: &str) -> Option<Self> {
        match label.to_lowercase().as_str() {
            "crisis" => Some(ResourceKind::Crisis),
            "therapy" => Some(ResourceKind::Therapy),
            "support" => Some(ResourceKind::Support),
            "medical" => Some(ResourceKind::Medical),
            "community" => Some(ResourceKind::Community),
            "housing" => Some(ResourceKind::Housing),
            "food" => Some(ResourceKind::Food),
            "employment" => Some(ResourceKind::Employment),
            "digital" => Some(ResourceKind::Digital),
            _ => None,
        }
    }
}

impl std::fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceKind::Crisis => write!(f, "crisis"),
            ResourceKind::Therapy => write!(f, "therapy"),
            ResourceKind::Support => write!(f, "support"),
            ResourceKind::Medical => write!(f, "medical"),
            ResourceKind::Community => write!(f, "community"),
            ResourceKind::Housing => write!(f, "housing"),
            ResourceKind::Food => write!(f, "food"),
            ResourceKind::Employment => write!(f, "employment"),
            ResourceKind::Digital => write!(f, "digital"),
        }
    }
}

/// A synthesized support-service suggestion shown to the user.
///
/// Constructed per request and discarded with it. City names inside `name`
/// come from coordinate-range lookup tables and are not authoritative.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Resource {
    #[serde(rename = "type")]
    pub kind: ResourceKind,
    pub name: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub website: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub directions: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance: Option<String>,
}

/// One entry of the static fallback contact list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct EmergencyContact {
    pub name: String,
    pub contact: String,
}

/// Grouped contacts returned in the fixed fallback payload.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ResourceGroup {
    #[serde(rename = "type")]
    pub kind: String,
    pub title: String,
    pub items: Vec<EmergencyContact>,
}
