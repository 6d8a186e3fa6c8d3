use crate::models::{ThesisType, Tone};

/// Instruction sent to every network provider.
pub fn build_prompt(field_of_study: &str, num_ideas: u32, thesis_type: ThesisType, tone: Tone) -> String {
    format!(
        "Generate {num_ideas} thesis ideas in the field of {field_of_study}, focusing on {thesis_type} topics.\n\
         Cover a broad range of subfields within {field_of_study} rather than a single trend, \
         and keep every idea specific enough to be researched within one thesis.\n\
         Use a {tone} writing style.\n\
         \n\
         Format each thesis idea as:\n\
         Thesis Idea 1: [Thesis statement]\n\
         [Brief explanation of the idea, its significance, and potential research directions]\n\
         \n\
         Thesis Idea 2: [Thesis statement]\n\
         [Brief explanation of the idea, its significance, and potential research directions]\n\
         \n\
         ...and so on."
    )
}
