//! Resource record synthesis.
//!
//! Two sources feed the resource list shown next to a reply: direct
//! keyword triggers on the user's own message, and entities the
//! reply-analysis call finds in the generated reply (see
//! [`crate::services::extraction`]). Everything here is table-driven so
//! the trigger lists and record contents stay independently testable.

use crate::models::{Location, Resource, ResourceKind};
use crate::services::regions::RegionResolver;
use rand::Rng;

/// Upper bound on the combined resource list returned to the caller.
pub const MAX_RESOURCES: usize = 3;

/// One direct-trigger category: the phrases that fire it and the record
/// it synthesizes.
struct NeedCategory {
    kind: ResourceKind,
    triggers: &'static [&'static str],
    /// Name suffix when a locality is known ("Jersey City Emergency Shelter").
    located_name: &'static str,
    /// Full name when no location was supplied.
    generic_name: &'static str,
    description: &'static str,
    website: &'static str,
    /// Pre-joined query for the maps directions link.
    map_query: &'static str,
    /// Largest whole-mile value for the fabricated distance string.
    max_miles: u32,
}

/// Checked in this order; the response preserves it.
const NEED_CATEGORIES: &[NeedCategory] = &[
    NeedCategory {
        kind: ResourceKind::Housing,
        triggers: &["homeless", "nowhere to go", "need shelter", "evicted"],
        located_name: "Emergency Shelter",
        generic_name: "Emergency Housing Services",
        description: "Emergency shelter and housing assistance",
        website: "https://www.hudexchange.info",
        map_query: "emergency+shelter",
        max_miles: 3,
    },
    NeedCategory {
        kind: ResourceKind::Food,
        triggers: &["hungry", "starving", "need food", "food bank"],
        located_name: "Food Bank",
        generic_name: "Food Assistance Services",
        description: "Emergency food assistance and meal programs",
        website: "https://www.feedingamerica.org",
        map_query: "food+bank",
        max_miles: 2,
    },
    NeedCategory {
        kind: ResourceKind::Employment,
        triggers: &["need a job", "unemployed", "work", "employment"],
        located_name: "Career Center",
        generic_name: "Employment Services",
        description: "Job search assistance and career training",
        website: "https://www.careeronestop.org",
        map_query: "career+center",
        max_miles: 4,
    },
    NeedCategory {
        kind: ResourceKind::Medical,
        triggers: &["sick", "medical", "health", "doctor"],
        located_name: "Community Health Center",
        generic_name: "Community Health Services",
        description: "Affordable healthcare and medical services",
        website: "https://www.samhsa.gov/find-help/national-helpline",
        map_query: "community+health+center",
        max_miles: 3,
    },
];

/// Apps whose mention marks an entity as a digital service even when the
/// analysis call typed it otherwise.
const DIGITAL_SERVICE_KEYWORDS: &[&str] = &["betterhelp", "headspace", "calm", "talkspace"];

/// Scan the user's message for immediate needs and synthesize one record
/// per matched category, in the fixed category-check order.
pub fn direct_resources(
    message: &str,
    location: Option<&Location>,
    regions: &dyn RegionResolver,
) -> Vec<Resource> {
    let lowered = message.to_lowercase();

    NEED_CATEGORIES
        .iter()
        .filter(|c| c.triggers.iter().any(|t| lowered.contains(t)))
        .map(|c| c.synthesize(location, regions))
        .collect()
}

impl NeedCategory {
    fn synthesize(&self, location: Option<&Location>, regions: &dyn RegionResolver) -> Resource {
        match location {
            Some(loc) => {
                let city = regions.locate(loc).city;
                Resource {
                    kind: self.kind,
                    name: format!("{} {}", city, self.located_name),
                    description: self.description.to_string(),
                    phone: Some("211".to_string()),
                    website: Some(self.website.to_string()),
                    directions: Some(maps_link(loc, self.map_query)),
                    distance: Some(fabricated_distance(self.max_miles)),
                }
            }
            None => Resource {
                kind: self.kind,
                name: self.generic_name.to_string(),
                description: self.description.to_string(),
                phone: Some("211".to_string()),
                website: Some(self.website.to_string()),
                directions: None,
                distance: Some("Call for locations".to_string()),
            },
        }
    }
}

/// Direct-trigger records first, then extracted ones, capped at
/// [`MAX_RESOURCES`].
pub fn merge_resources(direct: Vec<Resource>, extracted: Vec<Resource>) -> Vec<Resource> {
    let mut all = direct;
    all.extend(extracted);
    all.truncate(MAX_RESOURCES);
    all
}

/// Whether an entity name refers to a known digital mental-health app.
pub fn is_digital_service(name: &str) -> bool {
    let lowered = name.to_lowercase();
    DIGITAL_SERVICE_KEYWORDS.iter().any(|k| lowered.contains(k))
}

/// Canned record for a digital mental-health service named in a reply.
pub fn digital_resource(name: &str) -> Resource {
    let keyword = name.to_lowercase();

    if keyword.contains("betterhelp") {
        return online_record(
            ResourceKind::Therapy,
            "BetterHelp Online Therapy",
            "Professional therapy via video, phone, and messaging",
            "https://betterhelp.com",
            "Available online 24/7",
        );
    }
    if keyword.contains("talkspace") {
        return online_record(
            ResourceKind::Therapy,
            "Talkspace Therapy",
            "Text, audio, and video therapy with licensed therapists",
            "https://talkspace.com",
            "Available online",
        );
    }
    if keyword.contains("headspace") {
        return online_record(
            ResourceKind::Support,
            "Headspace Meditation",
            "Guided meditation and mindfulness exercises",
            "https://headspace.com",
            "Mobile app & web",
        );
    }
    if keyword.contains("calm") {
        return online_record(
            ResourceKind::Support,
            "Calm App",
            "Sleep stories, meditation, and relaxation tools",
            "https://calm.com",
            "Mobile app & web",
        );
    }
    if keyword.contains("psychology today") {
        return online_record(
            ResourceKind::Therapy,
            "Psychology Today",
            "Find therapists, psychiatrists, and support groups",
            "https://psychologytoday.com/us/therapists",
            "Therapist directory",
        );
    }
    if keyword.contains("seven cups") || keyword.contains("7 cups") {
        return online_record(
            ResourceKind::Support,
            "7 Cups",
            "Free emotional support and online therapy",
            "https://7cups.com",
            "Available 24/7 online",
        );
    }
    if keyword.contains("crisis text line") {
        let mut record = online_record(
            ResourceKind::Crisis,
            "Crisis Text Line",
            "Free crisis support via text message",
            "https://crisistextline.org",
            "Text HOME to 741741",
        );
        record.phone = Some("741741".to_string());
        return record;
    }
    if keyword.contains("online therapy") || keyword.contains("therapy app") {
        return online_record(
            ResourceKind::Therapy,
            "Online Therapy Options",
            "Explore digital mental health platforms",
            "https://www.samhsa.gov/find-help/national-helpline",
            "Various platforms available",
        );
    }

    online_record(
        ResourceKind::Support,
        "Digital Mental Health Tools",
        "Apps and websites for mental health support",
        "https://www.nami.org/About-Mental-Illness/Treatments/Mental-Health-Apps",
        "Available online",
    )
}

fn online_record(
    kind: ResourceKind,
    name: &str,
    description: &str,
    website: &str,
    distance: &str,
) -> Resource {
    Resource {
        kind,
        name: name.to_string(),
        description: description.to_string(),
        phone: None,
        website: Some(website.to_string()),
        directions: None,
        distance: Some(distance.to_string()),
    }
}

/// Default description for records the analysis call left undescribed.
pub fn default_description(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Crisis => "24/7 crisis support and intervention",
        ResourceKind::Therapy => "Professional mental health counseling",
        ResourceKind::Support => "Peer support and community resources",
        ResourceKind::Medical => "Medical and psychiatric services",
        ResourceKind::Community => "Community-based assistance programs",
        ResourceKind::Housing => "Housing assistance and emergency shelter",
        ResourceKind::Food => "Food assistance and meal programs",
        ResourceKind::Employment => "Job training and employment services",
        ResourceKind::Digital => "Online mental health resources",
    }
}

/// Hotline number attached to records of a given kind, where one exists.
pub fn default_phone(kind: ResourceKind) -> Option<&'static str> {
    match kind {
        ResourceKind::Crisis => Some("988"),
        ResourceKind::Medical
        | ResourceKind::Housing
        | ResourceKind::Food
        | ResourceKind::Employment => Some("211"),
        _ => None,
    }
}

/// Directory website per kind, with 211.org as the catch-all.
pub fn default_website(kind: ResourceKind) -> &'static str {
    match kind {
        ResourceKind::Crisis => "https://suicidepreventionlifeline.org",
        ResourceKind::Therapy | ResourceKind::Medical => {
            "https://www.samhsa.gov/find-help/national-helpline"
        }
        ResourceKind::Support => "https://www.nami.org",
        ResourceKind::Housing => "https://www.hudexchange.info",
        ResourceKind::Food => "https://www.feedingamerica.org",
        ResourceKind::Employment => "https://www.careeronestop.org",
        ResourceKind::Community | ResourceKind::Digital => "https://www.211.org",
    }
}

/// Google Maps search link for a query near the given coordinates. The
/// query must already be `+`-joined or percent-encoded.
pub fn maps_link(location: &Location, query: &str) -> String {
    format!(
        "https://maps.google.com/?q={},{}+{}",
        location.latitude, location.longitude, query
    )
}

/// Fabricated "N.M miles away" distance string. Presentation filler, like
/// the city names: no distance is actually computed.
pub fn fabricated_distance(max_miles: u32) -> String {
    let mut rng = rand::thread_rng();
    format!(
        "{}.{} miles away",
        rng.gen_range(1..=max_miles),
        rng.gen_range(0..10)
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::regions::StaticRegionTable;

    #[test]
    fn homeless_without_location_yields_generic_housing_record() {
        let records = direct_resources("I'm homeless", None, &StaticRegionTable);

        assert_eq!(records.len(), 1);
        let housing = &records[0];
        assert_eq!(housing.kind, ResourceKind::Housing);
        assert_eq!(housing.name, "Emergency Housing Services");
        assert_eq!(housing.phone.as_deref(), Some("211"));
        assert!(housing.directions.is_none());
        assert_eq!(housing.distance.as_deref(), Some("Call for locations"));
    }

    #[test]
    fn hungry_and_nowhere_to_go_yields_housing_then_food() {
        let records =
            direct_resources("I am hungry and have nowhere to go", None, &StaticRegionTable);

        assert_eq!(records.len(), 2);
        assert_eq!(records[0].kind, ResourceKind::Housing);
        assert_eq!(records[0].name, "Emergency Housing Services");
        assert_eq!(records[1].kind, ResourceKind::Food);
        assert_eq!(records[1].name, "Food Assistance Services");
    }

    #[test]
    fn located_record_carries_city_name_and_directions() {
        let loc = Location {
            latitude: 40.72,
            longitude: -74.04,
        };
        let records = direct_resources("I'm homeless", Some(&loc), &StaticRegionTable);

        assert_eq!(records.len(), 1);
        let housing = &records[0];
        assert!(housing.name.ends_with("Emergency Shelter"));
        assert_ne!(housing.name, "Emergency Housing Services");
        let directions = housing.directions.as_deref().unwrap();
        assert!(directions.starts_with("https://maps.google.com/?q=40.72,-74.04"));
        assert!(housing.distance.as_deref().unwrap().ends_with("miles away"));
    }

    #[test]
    fn merge_caps_at_three_with_direct_priority() {
        let direct = direct_resources(
            "homeless, hungry, sick and unemployed",
            None,
            &StaticRegionTable,
        );
        assert_eq!(direct.len(), 4);

        let extracted = vec![digital_resource("BetterHelp")];
        let merged = merge_resources(direct, extracted);

        assert_eq!(merged.len(), MAX_RESOURCES);
        assert_eq!(merged[0].kind, ResourceKind::Housing);
        assert_eq!(merged[1].kind, ResourceKind::Food);
        assert_eq!(merged[2].kind, ResourceKind::Employment);
    }

    #[test]
    fn digital_catalog_matches_known_apps() {
        assert_eq!(digital_resource("BetterHelp").name, "BetterHelp Online Therapy");
        assert_eq!(digital_resource("the Calm app").name, "Calm App");
        assert_eq!(digital_resource("7 Cups").name, "7 Cups");

        let ctl = digital_resource("Crisis Text Line");
        assert_eq!(ctl.kind, ResourceKind::Crisis);
        assert_eq!(ctl.phone.as_deref(), Some("741741"));

        let unknown = digital_resource("some new wellness site");
        assert_eq!(unknown.name, "Digital Mental Health Tools");
    }

    #[test]
    fn digital_service_detection() {
        assert!(is_digital_service("BetterHelp"));
        assert!(is_digital_service("try Headspace tonight"));
        assert!(!is_digital_service("Jersey City Food Bank"));
    }
}
