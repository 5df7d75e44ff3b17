//! Grounding block assembly.
//!
//! The chat model is stateless per call. Whatever it should "remember" about
//! the trip must be re-sent every turn, and this block is that memory: the
//! trip's route and dates followed by all six sections, labeled, in contract
//! order.

use itinera_types::{TravelPlanSections, TripRequest};

/// Serialize a trip and its plan into the grounding block for chat turns.
#[must_use]
pub fn grounding_block(request: &TripRequest, sections: &TravelPlanSections) -> String {
    let mut block = String::new();

    block.push_str(&format!(
        "Trip: {} to {}, {} through {}.\n",
        request.source, request.destination, request.start_date, request.end_date
    ));
    block.push_str("\nGenerated travel plan:\n");
    for (id, body) in sections.iter() {
        block.push_str(&format!("\n## {}\n{}\n", id.title(), body));
    }

    block
}
