use std::fs;

use camino::{Utf8Path, Utf8PathBuf};

use crate::config::RunConfig;
use crate::error::RoproError;

/// Output layout for one run: everything lands under `<output_base>/ropro_<prefix>`.
#[derive(Debug, Clone)]
pub struct Workspace {
    base_dir: Utf8PathBuf,
    prefix: String,
}

impl Workspace {
    pub fn create(config: &RunConfig) -> Result<Self, RoproError> {
        let base_dir = config
            .output_base
            .join(format!("ropro_{}", config.prefix));
        fs::create_dir_all(base_dir.as_std_path())
            .map_err(|err| RoproError::Filesystem(err.to_string()))?;
        Ok(Self {
            base_dir,
            prefix: config.prefix.clone(),
        })
    }

    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    pub fn report_path(&self) -> Utf8PathBuf {
        self.base_dir.join(format!("report_{}.txt", self.prefix))
    }

    pub fn seqs_dir(&self, label: &str) -> Utf8PathBuf {
        self.base_dir.join(format!("seqs_{label}"))
    }

    pub fn ensure_seqs_dir(&self, label: &str) -> Result<Utf8PathBuf, RoproError> {
        let dir = self.seqs_dir(label);
        fs::create_dir_all(dir.as_std_path())
            .map_err(|err| RoproError::Filesystem(err.to_string()))?;
        Ok(dir)
    }
}
