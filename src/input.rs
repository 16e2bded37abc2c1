use inquire::{error::InquireError, Confirm};

type InputResult<T> = Result<T, InquireError>;

pub fn confirm_overwrite(path: &str) -> InputResult<bool> {
    Confirm::new(&format!("'{}' already exists, overwrite?", path))
        .with_help_message("Hand-edited hours in the file will be lost")
        .with_default(false)
        .prompt()
}
