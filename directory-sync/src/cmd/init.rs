//! `directory-sync init` command — generate a `.env` template.

use std::fs;
use std::path::Path;

use crate::config::generate_env_template;
use crate::error::Error;

/// Execute the `init` command.
///
/// Writes the template to `output`. Refuses to overwrite an existing file
/// unless `force` is `true`.
///
/// # Errors
///
/// Returns an error if the file already exists (without `--force`) or if
/// writing fails.
pub fn run(output: &Path, force: bool) -> Result<(), Error> {
    if output.exists() && !force {
        return Err(Error::config(format!(
            "'{}' already exists, use --force to overwrite",
            output.display()
        )));
    }

    fs::write(output, generate_env_template())?;
    tracing::info!(path = %output.display(), "template written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refuses_to_overwrite_without_force() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        fs::write(&path, "KEEP=1\n").unwrap();

        let err = run(&path, false).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert_eq!(fs::read_to_string(&path).unwrap(), "KEEP=1\n");

        run(&path, true).unwrap();
        assert!(fs::read_to_string(&path).unwrap().contains("AWS_S3_BUCKET="));
    }

    #[test]
    fn writes_fresh_template() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");

        run(&path, false).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), generate_env_template());
    }
}
