//! Prompt construction for the generate and select stages.

use crate::ai::ChatMessage;

/// System instruction for the generation stage.
pub const GENERATION_SYSTEM: &str =
    "You are an assistant generating multiple innovative ideas while keeping the original goal in mind.";

/// System instruction for the selection stage.
pub const SELECTION_SYSTEM: &str =
    "You are an assistant that selects the single best idea while keeping the original goal in mind.";

/// User prompt asking for three options.
///
/// Round 0 only knows the topic; later rounds riff on the previous winner
/// and are anchored back to the original goal.
pub fn generation_prompt(topic: &str, current_idea: &str, iteration: usize) -> String {
    if iteration == 0 {
        format!(
            "Generate 3 creative and feasible ideas for the topic: \"{current_idea}\" while keeping the original goal in mind."
        )
    } else {
        format!(
            "Generate 3 variations of the previously selected best idea: \"{current_idea}\". \
             Ensure that these variations stay true to the original goal: \"{topic}\" and improve upon the previous idea."
        )
    }
}

/// User prompt asking to pick the single best option.
pub fn selection_prompt(topic: &str, options: &str) -> String {
    format!("Original goal: \"{topic}\"\n\nSelect the best idea from these options: {options}")
}

/// Full message list for the generation call.
pub fn generation_messages(topic: &str, current_idea: &str, iteration: usize) -> Vec<ChatMessage> {
    vec![
        ChatMessage::system(GENERATION_SYSTEM),
        ChatMessage::user(generation_prompt(topic, current_idea, iteration)),
    ]
}

/// Full message list for the selection call.
pub fn selection_messages(topic: &str, options: &str) -> Vec<ChatMessage> {
    vec![ChatMessage::system(SELECTION_SYSTEM), ChatMessage::user(selection_prompt(topic, options))]
}
