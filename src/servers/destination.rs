//! Destination search back-end: attractions, activities and landmarks.

use axum::{routing::post, Json, Router};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationRequest {
    pub destination: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DestinationResponse {
    pub destination: String,
    pub attractions: Vec<String>,
    pub activities: Vec<String>,
    pub landmarks: Vec<String>,
}

struct CatalogEntry {
    key: &'static str,
    attractions: &'static [&'static str],
    activities: &'static [&'static str],
    landmarks: &'static [&'static str],
}

const CATALOG: &[CatalogEntry] = &[
    CatalogEntry {
        key: "paris",
        attractions: &["Eiffel Tower", "Louvre Museum", "Notre-Dame Cathedral", "Arc de Triomphe"],
        activities: &["Seine River Cruise", "Wine Tasting", "Cooking Classes", "Shopping on Champs-Élysées"],
        landmarks: &["Sacré-Cœur", "Versailles Palace", "Panthéon"],
    },
    CatalogEntry {
        key: "barcelona",
        attractions: &["Sagrada Familia", "Park Güell", "Gothic Quarter", "Casa Batlló"],
        activities: &["Beach Activities", "Tapas Tours", "Flamenco Shows", "Wine Tours"],
        landmarks: &["La Rambla", "Camp Nou", "Montjuïc"],
    },
    CatalogEntry {
        key: "tokyo",
        attractions: &["Tokyo Tower", "Senso-ji Temple", "Imperial Palace", "Shibuya Crossing"],
        activities: &["Sushi Making Class", "Tea Ceremony", "Sumo Wrestling", "Karaoke"],
        landmarks: &["Mount Fuji", "Meiji Shrine", "Tokyo Skytree"],
    },
    CatalogEntry {
        key: "new york",
        attractions: &["Statue of Liberty", "Central Park", "Times Square", "Empire State Building"],
        activities: &["Broadway Shows", "Museum Tours", "Food Tours", "Shopping"],
        landmarks: &["Brooklyn Bridge", "One World Trade Center", "Rockefeller Center"],
    },
    CatalogEntry {
        key: "london",
        attractions: &["Big Ben", "Tower of London", "British Museum", "Buckingham Palace"],
        activities: &["Thames River Cruise", "Afternoon Tea", "West End Shows", "Pub Tours"],
        landmarks: &["London Eye", "Tower Bridge", "Westminster Abbey"],
    },
    CatalogEntry {
        key: "morocco",
        attractions: &["Marrakech Medina", "Hassan II Mosque", "Jardin Majorelle", "Bahia Palace"],
        activities: &["Desert Safari", "Hammam Experience", "Cooking Classes", "Souk Shopping"],
        landmarks: &["Chefchaouen", "Fes Medina", "Atlas Mountains"],
    },
    CatalogEntry {
        key: "sidi bennour",
        attractions: &["Local Markets", "Traditional Architecture", "Agricultural Sites"],
        activities: &["Cultural Tours", "Local Cuisine Tasting", "Countryside Walks"],
        landmarks: &["Historic Center", "Regional Farmlands"],
    },
];

static DEFAULT_ENTRY: CatalogEntry = CatalogEntry {
    key: "",
    attractions: &["Local Museums", "City Center", "Historical Sites"],
    activities: &["Cultural Tours", "Local Cuisine", "Walking Tours", "Shopping"],
    landmarks: &["Main Square", "Local Parks", "Historic Buildings"],
};

/// Exact match on the normalized name first, then containment in either direction.
fn lookup(destination: &str) -> &'static CatalogEntry {
    let needle = destination.trim().to_lowercase();

    CATALOG
        .iter()
        .find(|entry| entry.key == needle)
        .or_else(|| {
            CATALOG
                .iter()
                .find(|entry| needle.contains(entry.key) || entry.key.contains(needle.as_str()))
        })
        .unwrap_or(&DEFAULT_ENTRY)
}

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

pub fn search(request: &DestinationRequest) -> DestinationResponse {
    let entry = lookup(&request.destination);
    DestinationResponse {
        destination: request.destination.clone(),
        attractions: owned(entry.attractions),
        activities: owned(entry.activities),
        landmarks: owned(entry.landmarks),
    }
}

async fn search_destination(Json(request): Json<DestinationRequest>) -> Json<DestinationResponse> {
    tracing::debug!(destination = %request.destination, "Searching destination");
    Json(search(&request))
}

pub fn router() -> Router {
    Router::new()
        .route("/tools/search_destination", post(search_destination))
        .merge(super::common_routes(
            "search-tools",
            &["/tools/search_destination", "/health"],
        ))
}
