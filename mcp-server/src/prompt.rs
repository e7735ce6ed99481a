use rmcp::model::{GetPromptResult, Prompt, PromptMessage, PromptMessageRole};

pub const QUERY_PROMPT_NAME: &str = "query";
const QUERY_PROMPT_DESCRIPTION: &str = "Photo search prompt";
const QUERY_PROMPT_TEXT: &str = "Search for person, place, or thing";

pub fn list_prompts() -> Vec<Prompt> {
    vec![Prompt::new(
        QUERY_PROMPT_NAME,
        Some(QUERY_PROMPT_DESCRIPTION),
        None,
    )]
}

/// None for an unknown prompt name.
pub fn get_prompt(name: &str) -> Option<GetPromptResult> {
    match name {
        QUERY_PROMPT_NAME => Some(GetPromptResult {
            description: Some(QUERY_PROMPT_DESCRIPTION.to_string()),
            messages: vec![PromptMessage::new_text(
                PromptMessageRole::User,
                QUERY_PROMPT_TEXT,
            )],
        }),
        _ => None,
    }
}
