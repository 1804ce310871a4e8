use camino::{Utf8Path, Utf8PathBuf};

use crate::error::RoproError;

/// Resolved per-run configuration. One value is built from the CLI arguments
/// and passed to every stage; no process-global state.
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub input_dir: Utf8PathBuf,
    pub output_base: Utf8PathBuf,
    pub prefix: String,
    pub blastn_path: Option<Utf8PathBuf>,
    pub run_alignment: bool,
}

impl RunConfig {
    pub fn resolve(
        input_dir: &str,
        output_base: &str,
        prefix: &str,
        blastn_path: Option<&str>,
        run_alignment: bool,
    ) -> Result<Self, RoproError> {
        let input_dir = absolutize(input_dir)?;
        if !input_dir.as_std_path().is_dir() {
            return Err(RoproError::NotADirectory(input_dir));
        }
        let output_base = absolutize(output_base)?;
        if !output_base.as_std_path().is_dir() {
            return Err(RoproError::NotADirectory(output_base));
        }

        Ok(Self {
            input_dir,
            output_base,
            prefix: prefix.to_string(),
            blastn_path: blastn_path.map(Utf8PathBuf::from),
            run_alignment,
        })
    }

    /// Name of the sample being reported on, taken from the input directory.
    pub fn sample_name(&self) -> &str {
        self.input_dir.file_name().unwrap_or(self.input_dir.as_str())
    }
}

fn absolutize(path: &str) -> Result<Utf8PathBuf, RoproError> {
    let path = Utf8Path::new(path);
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|err| RoproError::Filesystem(err.to_string()))?;
    let cwd =
        Utf8PathBuf::from_path_buf(cwd).map_err(|_| RoproError::Filesystem("non-utf8 working directory".to_string()))?;
    Ok(cwd.join(path))
}
