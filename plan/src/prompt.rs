//! Prompt construction.
//!
//! Both builders are deterministic: identical input yields an identical
//! prompt string. The plan prompt embeds every scalar trip field verbatim
//! and spells out the section contract (`1..=6`, fixed titles) so the parser
//! can recover the sections by title text afterwards.

use itinera_types::{SectionId, TravelPlanSections, TripRequest};

use crate::grounding::grounding_block;

/// Render the plan-generation prompt for a trip.
#[must_use]
pub fn plan_prompt(request: &TripRequest) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "Act as an expert travel planner. Create a detailed travel plan for the following trip:\n\n",
    );
    prompt.push_str(&format!("From: {}\n", request.source));
    prompt.push_str(&format!("To: {}\n", request.destination));
    prompt.push_str(&format!(
        "Dates: {} to {}\n",
        request.start_date, request.end_date
    ));
    prompt.push_str(&format!("Budget: {}\n", request.budget));
    prompt.push_str(&format!("Number of Travelers: {}\n", request.travelers));
    prompt.push_str(&format!("Interests: {}\n", request.interests_label()));

    prompt.push_str(
        "\nPlease provide a comprehensive travel plan with the following sections. \
         Use the exact section numbers and titles as shown below:\n\n",
    );
    for id in SectionId::ALL {
        prompt.push_str(&format!("{}. {}\n", id.number(), id.prompt_heading()));
    }
    prompt.push_str(
        "\nFor each section, provide detailed information and recommendations. \
         Keep the section numbers and titles exactly as shown above to ensure proper parsing.",
    );

    prompt
}

/// Render a follow-up chat prompt.
///
/// The model is stateless per call: everything it may rely on is the role
/// instruction, the grounding block, and the latest question. Earlier chat
/// turns are deliberately not replayed.
#[must_use]
pub fn chat_prompt(
    request: &TripRequest,
    sections: &TravelPlanSections,
    question: &str,
) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "You are a helpful travel assistant. Answer the traveler's question about the \
         travel plan below.\n\n",
    );
    prompt.push_str(&grounding_block(request, sections));
    prompt.push_str(&format!("\nQuestion: {question}\n\n"));
    prompt.push_str(
        "Answer with respect to this plan. If the plan does not cover the question, \
         say so and give your best general advice for the destination.",
    );

    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::collections::BTreeSet;
    use std::num::NonZeroU32;

    use itinera_types::Interest;

    fn request() -> TripRequest {
        TripRequest {
            source: "Oslo".to_string(),
            destination: "Marrakesh".to_string(),
            start_date: NaiveDate::from_ymd_opt(2025, 9, 3).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2025, 9, 12).unwrap(),
            budget: "1500-2500".to_string(),
            travelers: NonZeroU32::new(3).unwrap(),
            interests: BTreeSet::from([Interest::Adventure, Interest::Food]),
        }
    }

    #[test]
    fn plan_prompt_embeds_every_scalar_field() {
        let prompt = plan_prompt(&request());

        assert!(prompt.contains("From: Oslo"));
        assert!(prompt.contains("To: Marrakesh"));
        assert!(prompt.contains("Dates: 2025-09-03 to 2025-09-12"));
        assert!(prompt.contains("Budget: 1500-2500"));
        assert!(prompt.contains("Number of Travelers: 3"));
        assert!(prompt.contains("Interests: Adventure, Food"));
    }

    #[test]
    fn plan_prompt_lists_the_section_contract_in_order() {
        let prompt = plan_prompt(&request());

        let mut last = 0;
        for id in SectionId::ALL {
            let line = format!("{}. {}", id.number(), id.prompt_heading());
            let position = prompt.find(&line).unwrap_or_else(|| {
                panic!("prompt is missing contract line {line:?}");
            });
            assert!(position > last, "sections out of order at {line:?}");
            last = position;
        }
    }

    #[test]
    fn plan_prompt_is_deterministic() {
        assert_eq!(plan_prompt(&request()), plan_prompt(&request()));
    }

    #[test]
    fn chat_prompt_carries_grounding_and_question() {
        let sections = TravelPlanSections::from_fn(|id| format!("{} body", id.title()));
        let prompt = chat_prompt(&request(), &sections, "Is the riad walkable to the souk?");

        assert!(prompt.contains("Oslo"));
        assert!(prompt.contains("Daily Itinerary"));
        assert!(prompt.contains("Question: Is the riad walkable to the souk?"));
    }
}
