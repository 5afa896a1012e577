//! Destination search tool.

use async_trait::async_trait;

use super::{Backend, Tool};
use crate::servers::destination::{DestinationRequest, DestinationResponse};

/// Look up attractions, activities and landmarks for a destination.
pub struct SearchDestination {
    backend: Backend,
}

impl SearchDestination {
    pub fn new(backend: Backend) -> Self {
        Self { backend }
    }
}

fn render(response: &DestinationResponse) -> String {
    let mut result = format!("Destination: {}\n\n", response.destination);

    result.push_str("Top Attractions:\n");
    for attraction in response.attractions.iter().take(5) {
        result.push_str(&format!("  • {}\n", attraction));
    }

    result.push_str("\nActivities:\n");
    for activity in response.activities.iter().take(5) {
        result.push_str(&format!("  • {}\n", activity));
    }

    result.push_str("\nLandmarks:\n");
    for landmark in response.landmarks.iter().take(3) {
        result.push_str(&format!("  • {}\n", landmark));
    }

    result
}

#[async_trait]
impl Tool for SearchDestination {
    fn name(&self) -> &str {
        "search_destination"
    }

    fn description(&self) -> &str {
        "Search for attractions, activities, and landmarks in a destination. Input: destination name"
    }

    async fn invoke(&self, input: &str) -> anyhow::Result<String> {
        let destination = input.trim();
        if destination.is_empty() {
            return Err(anyhow::anyhow!("Destination name is required"));
        }

        let request = DestinationRequest {
            destination: destination.to_string(),
        };
        let response: DestinationResponse = self
            .backend
            .post("tools/search_destination", &request)
            .await?;
        Ok(render(&response))
    }

    async fn health_check(&self) -> anyhow::Result<()> {
        self.backend.health().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_caps_each_section() {
        let response = DestinationResponse {
            destination: "Somewhere".to_string(),
            attractions: (1..=7).map(|i| format!("A{}", i)).collect(),
            activities: vec!["Walk".to_string()],
            landmarks: (1..=4).map(|i| format!("L{}", i)).collect(),
        };
        let text = render(&response);

        assert!(text.starts_with("Destination: Somewhere\n"));
        assert!(text.contains("  • A5\n"));
        assert!(!text.contains("A6"));
        assert!(text.contains("  • Walk\n"));
        assert!(text.contains("  • L3\n"));
        assert!(!text.contains("L4"));
    }
}
