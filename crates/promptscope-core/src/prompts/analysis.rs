/// Instruction sent as a dedicated system message to providers that accept one.
pub const ANALYST_SYSTEM_INSTRUCTION: &str =
    "You are an expert in analyzing AI system prompts and their influence on conversations.";

const PREAMBLE: &str = "\
You are an expert in system prompt interpretability and discourse analysis.

Task: Carefully analyze the following system prompt and conversation log.
Identify which specific segments of the system prompt directly influenced
the agent's responses. Also, analyze if any part of the user's prior statements
influenced the agent's next or subsequent responses.";

// Six fields per agent turn. Downstream readers key off these labels.
const REPORT_SCHEMA: &str = "\
For EACH agent response, provide:
1. The Agent's Response
2. Relevant System Prompt Segments (quote exact text)
3. Influence Score (0-1.0)
4. Specific Evidence of Influence
5. Explanation of Semantic Connection
6. Any User Statements Influencing This Response

Response Format:
```
Response 1:
- Agent Response: \"...\"
- Relevant Segments: [list of segments]
- Influence Score: X.XX
- Evidence: [direct quote mapping]
- Explanation: [semantic connection details]
- User Influence: [user statement(s) influencing response]
```

Provide a comprehensive, analytical breakdown that shows
how the system prompt and user inputs guide the agent's communication strategy.";

/// Render the single analysis instruction sent to the remote model.
///
/// Both inputs are embedded verbatim, once each, between fixed section
/// headers. Nothing in the inputs is escaped or interpreted.
pub fn render_analysis_prompt(system_prompt: &str, conversation_log: &str) -> String {
    let mut out = String::with_capacity(
        PREAMBLE.len() + REPORT_SCHEMA.len() + system_prompt.len() + conversation_log.len() + 64,
    );
    out.push_str(PREAMBLE);
    out.push_str("\n\nSystem Prompt:\n");
    out.push_str(system_prompt);
    out.push_str("\n\nConversation Log:\n");
    out.push_str(conversation_log);
    out.push_str("\n\n");
    out.push_str(REPORT_SCHEMA);
    out.push('\n');
    out
}
