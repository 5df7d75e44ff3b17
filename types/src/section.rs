//! The six-section plan contract.
//!
//! [`SectionId`] is the closed set of topics a generated travel plan is
//! divided into, and [`TravelPlanSections`] is the record that always holds
//! a body for every one of them. Consumers never branch on a missing key:
//! an unmatched section carries its placeholder text instead.

use serde::{Deserialize, Serialize};

/// Closed enumeration of the plan's sections, in contract order.
///
/// The variant order is load-bearing: it is the numbering emitted into the
/// prompt (`1..=6`) and the order every consumer renders sections in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SectionId {
    TravelOptions,
    Accommodation,
    Itinerary,
    Dining,
    Transportation,
    CostBreakdown,
}

impl SectionId {
    pub const ALL: [SectionId; 6] = [
        SectionId::TravelOptions,
        SectionId::Accommodation,
        SectionId::Itinerary,
        SectionId::Dining,
        SectionId::Transportation,
        SectionId::CostBreakdown,
    ];

    /// 1-based number used in the prompt's section contract.
    #[must_use]
    pub const fn number(self) -> usize {
        self.index() + 1
    }

    pub(crate) const fn index(self) -> usize {
        match self {
            SectionId::TravelOptions => 0,
            SectionId::Accommodation => 1,
            SectionId::Itinerary => 2,
            SectionId::Dining => 3,
            SectionId::Transportation => 4,
            SectionId::CostBreakdown => 5,
        }
    }

    /// Display title, also the text the parser matches against.
    #[must_use]
    pub const fn title(self) -> &'static str {
        match self {
            SectionId::TravelOptions => "Best Travel Options",
            SectionId::Accommodation => "Accommodation Suggestions",
            SectionId::Itinerary => "Daily Itinerary",
            SectionId::Dining => "Food & Dining Options",
            SectionId::Transportation => "Local Transportation Tips",
            SectionId::CostBreakdown => "Estimated Cost Breakdown",
        }
    }

    /// Heading as emitted into the prompt contract.
    ///
    /// Only the first section carries a parenthetical qualifier; the parser
    /// strips parentheticals before matching, so both spellings map here.
    #[must_use]
    pub const fn prompt_heading(self) -> &'static str {
        match self {
            SectionId::TravelOptions => "Best Travel Options (flights/trains)",
            other => other.title(),
        }
    }

    /// Body substituted when the model's reply had nothing usable.
    #[must_use]
    pub const fn placeholder(self) -> &'static str {
        match self {
            SectionId::TravelOptions => "No travel options available",
            SectionId::Accommodation => "No accommodation suggestions available",
            SectionId::Itinerary => "No itinerary available",
            SectionId::Dining => "No dining options available",
            SectionId::Transportation => "No transportation tips available",
            SectionId::CostBreakdown => "No cost breakdown available",
        }
    }
}

/// A body for every [`SectionId`], created once per successful parse and
/// immutable thereafter. Replaced wholesale when a new trip is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelPlanSections {
    travel_options: String,
    accommodation: String,
    itinerary: String,
    dining: String,
    transportation: String,
    cost_breakdown: String,
}

impl TravelPlanSections {
    /// Build the record by asking `body` for every section in order.
    pub fn from_fn(mut body: impl FnMut(SectionId) -> String) -> Self {
        Self {
            travel_options: body(SectionId::TravelOptions),
            accommodation: body(SectionId::Accommodation),
            itinerary: body(SectionId::Itinerary),
            dining: body(SectionId::Dining),
            transportation: body(SectionId::Transportation),
            cost_breakdown: body(SectionId::CostBreakdown),
        }
    }

    /// All six placeholders; what an unparseable reply degrades to.
    #[must_use]
    pub fn placeholders() -> Self {
        Self::from_fn(|id| id.placeholder().to_string())
    }

    #[must_use]
    pub fn get(&self, id: SectionId) -> &str {
        match id {
            SectionId::TravelOptions => &self.travel_options,
            SectionId::Accommodation => &self.accommodation,
            SectionId::Itinerary => &self.itinerary,
            SectionId::Dining => &self.dining,
            SectionId::Transportation => &self.transportation,
            SectionId::CostBreakdown => &self.cost_breakdown,
        }
    }

    /// True when this section holds its placeholder rather than model text.
    #[must_use]
    pub fn is_placeholder(&self, id: SectionId) -> bool {
        self.get(id) == id.placeholder()
    }

    /// Sections in contract order.
    pub fn iter(&self) -> impl Iterator<Item = (SectionId, &str)> {
        SectionId::ALL.into_iter().map(move |id| (id, self.get(id)))
    }
}
