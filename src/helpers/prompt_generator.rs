use crate::constants::prompts::{PROMPT_SEPARATOR, THINKING_MODE_INSTRUCTION};
use crate::structs::prompt_payload::PromptPayload;

pub fn compose_system_prompt(prompt: &str, thinking_mode: bool) -> String {
    if thinking_mode {
        format!("{THINKING_MODE_INSTRUCTION}{PROMPT_SEPARATOR}{prompt}")
    } else {
        prompt.to_string()
    }
}

pub fn generate_payload(system_prompt: &str, file_content: String) -> PromptPayload {
    PromptPayload {
        system_instruction: system_prompt.to_string(),
        user_content: file_content,
    }
}
