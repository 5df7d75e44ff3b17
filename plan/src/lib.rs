//! The plan pipeline: prompt out, sections back.
//!
//! Three pure stages, no IO:
//!
//! - [`plan_prompt`] renders a [`TripRequest`](itinera_types::TripRequest)
//!   into the model prompt carrying the numbered six-section contract;
//!   [`chat_prompt`] builds the follow-up chat prompt.
//! - [`parse`] recovers the six sections from the model's loosely formatted
//!   markdown reply. It never fails: unmatched sections degrade to their
//!   placeholder text.
//! - [`grounding_block`] serializes a trip and its parsed sections into the
//!   grounding block that gives each stateless chat call its memory.

mod grounding;
mod parser;
mod prompt;

pub use grounding::grounding_block;
pub use parser::{DuplicatePolicy, SectionParser, parse};
pub use prompt::{chat_prompt, plan_prompt};
