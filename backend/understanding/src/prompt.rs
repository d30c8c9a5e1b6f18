//! Fixed instructions sent with every image.

use stockaudit_core::PromptStyle;

const REASONING_PROMPT: &str = r#"You are an inventory auditing AI.

Identify the main object in the image.

Respond ONLY in valid JSON:

{
  "item": "item_name",
  "confidence": "short reasoning"
}"#;

const CATEGORY_PROMPT: &str = r#"You are an inventory auditing agent.

TASK:
- Analyze the image
- Identify the item clearly

RULES (VERY IMPORTANT):
- Respond with ONLY valid JSON
- Do NOT add explanations
- Do NOT use markdown
- Do NOT add extra text

JSON FORMAT (STRICT):
{
  "item": "item_name",
  "category": "category_name"
}"#;

/// The instruction text for a prompt style.
pub fn instruction(style: PromptStyle) -> &'static str {
    match style {
        PromptStyle::Reasoning => REASONING_PROMPT,
        PromptStyle::Category => CATEGORY_PROMPT,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_style_names_its_field() {
        assert!(instruction(PromptStyle::Reasoning).contains(r#""confidence""#));
        assert!(instruction(PromptStyle::Category).contains(r#""category""#));
        assert!(instruction(PromptStyle::Category).contains(r#""item""#));
    }
}
