use inquire::Confirm;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum PromptError {
    #[error("unable to read the answer to a prompt")]
    #[diagnostic(
        code(codelite_gen::prompt::inquire),
        help("Run without --interactive when no terminal is attached")
    )]
    Inquire(#[from] inquire::InquireError),
}

/// Asks whether the previewed project files should be written.
pub fn apply_changes() -> Result<bool, PromptError> {
    let answer = Confirm::new("Write these project files?")
        .with_default(false)
        .with_help_message("Existing project files are replaced")
        .prompt()?;

    Ok(answer)
}
