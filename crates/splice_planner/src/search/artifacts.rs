use std::{
    fs::File,
    io::{BufWriter, Write},
    path::{Path, PathBuf},
};

use serde::Serialize;
use thiserror::Error;

use crate::problem::candidate::CandidateInsertion;

use super::cost_aggregator::CandidateRoutes;

#[derive(Debug, Error)]
pub enum ArtifactError {
    #[error("Failed to write artifact {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to serialize artifact {}: {source}", path.display())]
    Serialize {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Serialize)]
struct MergedRoutesArtifact<'a> {
    candidate: &'a CandidateInsertion,
    #[serde(flatten)]
    routes: &'a CandidateRoutes,
}

/// Run folder receiving per-candidate artifacts.
pub struct ArtifactStore {
    folder: PathBuf,
}

impl ArtifactStore {
    pub fn new<P: AsRef<Path>>(folder: P) -> Result<Self, ArtifactError> {
        let folder = folder.as_ref().to_path_buf();

        std::fs::create_dir_all(&folder).map_err(|source| ArtifactError::Io {
            path: folder.clone(),
            source,
        })?;

        Ok(ArtifactStore { folder })
    }

    pub fn folder(&self) -> &Path {
        &self.folder
    }

    pub fn merged_routes_path(&self, candidate: &CandidateInsertion) -> PathBuf {
        self.folder
            .join(format!("merged_routes_{}.json", candidate.id()))
    }

    pub fn stage_merged_routes(
        &self,
        candidate: &CandidateInsertion,
        routes: &CandidateRoutes,
    ) -> Result<PathBuf, ArtifactError> {
        let path = self.merged_routes_path(candidate);

        write_json(
            &path,
            &MergedRoutesArtifact {
                candidate,
                routes,
            },
        )?;

        Ok(path)
    }
}

pub(crate) fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ArtifactError> {
    let io_error = |source| ArtifactError::Io {
        path: path.to_path_buf(),
        source,
    };

    let file = File::create(path).map_err(io_error)?;
    let mut writer = BufWriter::with_capacity(64 * 1024, file);

    serde_json::to_writer_pretty(&mut writer, value).map_err(|source| {
        ArtifactError::Serialize {
            path: path.to_path_buf(),
            source,
        }
    })?;

    writer.flush().map_err(io_error)?;

    Ok(())
}
