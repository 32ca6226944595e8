/// One request worth of prompt material: the instruction and a single file's text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPayload {
    pub system_instruction: String,
    pub user_content: String,
}
