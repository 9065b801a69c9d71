//! `directory-sync build` command — harvest and write the envelope locally.
//!
//! Needs no cloud credentials; useful for inspecting what `publish` would
//! upload.

use std::fs;
use std::io::Write;
use std::path::Path;

use crate::config::DirectoryArgs;
use crate::error::Error;
use crate::harvest::harvest_directories;
use crate::record::ResultEnvelope;

/// Execute the `build` command.
///
/// # Errors
///
/// Returns an error if harvesting, serialization or writing fails.
pub async fn run(directories: &DirectoryArgs, output: &Path, pretty: bool) -> Result<(), Error> {
    let envelope = harvest_directories(directories).await?;
    write_envelope(&envelope, output, pretty)
}

/// Writes `envelope` to `output`, or to stdout when `output` is `-`.
fn write_envelope(envelope: &ResultEnvelope, output: &Path, pretty: bool) -> Result<(), Error> {
    let body = if pretty {
        serde_json::to_vec_pretty(envelope)?
    } else {
        envelope.to_json()?
    };

    if output == Path::new("-") {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&body)?;
        stdout.write_all(b"\n")?;
        stdout.flush()?;
    } else {
        fs::write(output, &body)?;
        tracing::info!(
            path = %output.display(),
            mainnet = envelope.mainnet.len(),
            testnet = envelope.testnet.len(),
            "envelope written"
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn writes_envelope_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("graz-chains.json");

        write_envelope(&ResultEnvelope::default(), &path, false).unwrap();
        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            r#"{"mainnet":{},"testnet":{}}"#
        );

        write_envelope(&ResultEnvelope::default(), &path, true).unwrap();
        let pretty: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(pretty, serde_json::json!({"mainnet": {}, "testnet": {}}));
    }
}
