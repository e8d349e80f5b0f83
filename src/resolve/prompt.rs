//! Prompt used to fill in uncertain digits.

/// Build the text-only prompt asking the model to replace each `?` in
/// `ambiguous`, using `prior` (the last confirmed reading) as a hint.
///
/// ```rust
/// use gas_meter_reader::resolve::build_resolution_prompt;
///
/// let prompt = build_resolution_prompt("12?.5", "123.4");
/// assert!(prompt.contains("\"12?.5\""));
/// assert!(prompt.contains("\"123.4\""));
/// ```
pub fn build_resolution_prompt(ambiguous: &str, prior: &str) -> String {
    format!(
        "\
The value \"{ambiguous}\" is the output of an analog meter reading taken from a photograph.
Digits that could not be read with confidence are marked with the \"?\" character.

Using the previously recorded meter value \"{prior}\" as a reference (only if it is not empty),
replace each \"?\" with the most probable digit to estimate the complete reading.

Instructions:
- Return a string with exactly the same length as the input value.
- Replace only the \"?\" characters; keep every other character unchanged.
- Output only the predicted value, without any explanations or additional text.
"
    )
}
