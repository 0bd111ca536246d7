use dialoguer::Confirm;

use crate::error::Result;

/// Asks a yes/no question, defaulting to no.
///
/// # Arguments
/// * `skip` - Answer yes without asking
/// * `prompt` - The question
pub fn confirm(skip: bool, prompt: String) -> Result<bool> {
    if skip {
        return Ok(true);
    }

    Ok(Confirm::new().with_prompt(prompt).default(false).interact()?)
}
