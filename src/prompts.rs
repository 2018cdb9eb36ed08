//! Instruction prompts sent alongside every image.
//!
//! A flow picks a [`PromptStyle`]; the vision stage asks it for the
//! instruction text.

/// Free-text extraction, used for photos sent to the bot.
pub const FREE_TEXT_PROMPT: &str = "Extract any text visible in this image, including VIN numbers, license plates, or any other readable text. If you find multiple pieces of text, list them clearly.";

/// Extraction from a rasterised document page.
pub const DOCUMENT_PROMPT: &str = "Extract all the text content from this image. Look for any readable text including VIN numbers, license plates, vehicle information, or any other text content. Provide a clear, organized summary of all text found.";

/// Structured extraction with a fixed field set.
///
/// The model's answer is forwarded as-is; nothing downstream parses it.
pub const STRUCTURED_PROMPT: &str = r#"Extract the information visible in this image and reply with a single JSON object and nothing else, using exactly these keys:

{
  "vin": "vehicle identification number, or null",
  "license_plate": "license plate number, or null",
  "vehicle_info": "make, model, year, colour or any other vehicle details, or null",
  "address": "any postal or street address, or null",
  "other_text": "all remaining readable text, or null"
}

Use null for any field that is not present in the image."#;

/// Which instruction template accompanies the image.
///
/// The binary exposes these as `free-text`, `document` and `structured`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PromptStyle {
    /// List every piece of readable text. (default)
    #[default]
    FreeText,
    /// Organised summary of a document page.
    DocumentSummary,
    /// JSON object with `vin`, `license_plate`, `vehicle_info`, `address`, `other_text`.
    Structured,
}

impl PromptStyle {
    /// The instruction text for this style.
    pub fn instruction(self) -> &'static str {
        match self {
            PromptStyle::FreeText => FREE_TEXT_PROMPT,
            PromptStyle::DocumentSummary => DOCUMENT_PROMPT,
            PromptStyle::Structured => STRUCTURED_PROMPT,
        }
    }
}
