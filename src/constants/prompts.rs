pub const THINKING_MODE_INSTRUCTION: &str = "Before you begin, first think step-by-step to thoroughly understand the user's request below. \
Formulate a detailed, internal plan to process the text according to all the provided rules. \
After you have a clear plan, execute it on the text. \
CRITICAL INSTRUCTION: Your final output must contain ONLY the fully processed text itself. \
Do NOT include your thoughts, your plan, or any other conversational phrases or markdown formatting in your response.";

pub const PROMPT_SEPARATOR: &str = "\n\n---\n\n";

pub const SAMPLE_PROMPT: &str = "Translate the following text into English. Keep the original structure and line breaks. Do not use Markdown formatting in your output.";
