//! Model file downloads from the Hugging Face Hub.
//!
//! The downloader is built with the credentials for one construction and
//! dropped afterwards. Files land in the standard hub cache, so repeated
//! constructions of the same model only hit the network for metadata.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use hf_hub::api::tokio::{Api, ApiBuilder, ApiError, ApiRepo};
use hf_hub::{Repo, RepoType};
use ragkit_core::config::HubCredentials;
use serde::Deserialize;
use tracing::{debug, info};

use super::error::LocalError;

const SINGLE_WEIGHTS: &str = "model.safetensors";
const SHARDED_WEIGHTS_INDEX: &str = "model.safetensors.index.json";

/// Paths to the files a local model needs.
#[derive(Debug, Clone)]
pub struct ModelFiles {
    /// `config.json`
    pub config: PathBuf,
    /// `tokenizer.json`
    pub tokenizer: PathBuf,
    /// One or more safetensors files.
    pub weights: Vec<PathBuf>,
}

#[derive(Debug, Deserialize)]
struct ShardIndex {
    weight_map: std::collections::HashMap<String, String>,
}

/// Downloads model repositories from the hub.
pub struct HubDownloader {
    api: Api,
}

// `hf_hub::api::tokio::Api` does not implement `Debug`.
impl std::fmt::Debug for HubDownloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HubDownloader").finish_non_exhaustive()
    }
}

impl HubDownloader {
    /// Create a downloader, authenticated when credentials are given.
    pub fn new(credentials: Option<&HubCredentials>) -> Result<Self, LocalError> {
        let api = ApiBuilder::new()
            .with_progress(false)
            .with_token(credentials.map(|c| c.token().to_string()))
            .build()
            .map_err(|e| LocalError::ModelLoading {
                message: format!("Failed to create Hugging Face API client: {e}"),
            })?;

        Ok(Self { api })
    }

    /// Download config, tokenizer, and weights for `model_id` at `revision`.
    ///
    /// Weights are read from `model.safetensors` when the repository has a
    /// single file, else from every shard listed in
    /// `model.safetensors.index.json`.
    pub async fn download_model(
        &self,
        model_id: &str,
        revision: &str,
    ) -> Result<ModelFiles, LocalError> {
        info!(
            "Downloading model files for: {} (revision: {})",
            model_id, revision
        );

        let repo = self.repo(model_id, revision);

        let config = download_file(&repo, model_id, "config.json").await?;
        let tokenizer = download_file(&repo, model_id, "tokenizer.json").await?;
        let weights = download_weights(&repo, model_id).await?;

        info!(
            "Downloaded {} with {} weight file(s)",
            model_id,
            weights.len()
        );

        Ok(ModelFiles {
            config,
            tokenizer,
            weights,
        })
    }

    /// Download `filename` if the repository has it.
    ///
    /// Authentication failures are still errors; any other failure means
    /// the file is absent.
    pub async fn download_optional(
        &self,
        model_id: &str,
        revision: &str,
        filename: &str,
    ) -> Result<Option<PathBuf>, LocalError> {
        let repo = self.repo(model_id, revision);
        match download_file(&repo, model_id, filename).await {
            Ok(path) => Ok(Some(path)),
            Err(err @ LocalError::Authentication { .. }) => Err(err),
            Err(err) => {
                debug!("Optional file {} not available: {}", filename, err);
                Ok(None)
            }
        }
    }

    fn repo(&self, model_id: &str, revision: &str) -> ApiRepo {
        self.api.repo(Repo::with_revision(
            model_id.to_string(),
            RepoType::Model,
            revision.to_string(),
        ))
    }
}

async fn download_weights(repo: &ApiRepo, model_id: &str) -> Result<Vec<PathBuf>, LocalError> {
    match download_file(repo, model_id, SINGLE_WEIGHTS).await {
        Ok(path) => return Ok(vec![path]),
        Err(err @ LocalError::Authentication { .. }) => return Err(err),
        Err(err) => debug!("No single weights file, trying shards: {}", err),
    }

    let index_path = download_file(repo, model_id, SHARDED_WEIGHTS_INDEX).await?;
    let mut weights = Vec::new();
    for shard in shard_names(&index_path)? {
        weights.push(download_file(repo, model_id, &shard).await?);
    }
    Ok(weights)
}

/// Unique shard file names listed in a safetensors index, in sorted order.
fn shard_names(index_path: &Path) -> Result<BTreeSet<String>, LocalError> {
    let content = std::fs::read_to_string(index_path)?;
    let index: ShardIndex =
        serde_json::from_str(&content).map_err(|e| LocalError::ModelLoading {
            message: format!("Failed to parse {SHARDED_WEIGHTS_INDEX}: {e}"),
        })?;

    let shards: BTreeSet<String> = index.weight_map.into_values().collect();
    if shards.is_empty() {
        return Err(LocalError::ModelLoading {
            message: format!("{SHARDED_WEIGHTS_INDEX} lists no weight files"),
        });
    }
    Ok(shards)
}

async fn download_file(
    repo: &ApiRepo,
    model_id: &str,
    filename: &str,
) -> Result<PathBuf, LocalError> {
    debug!("Downloading file: {}", filename);

    let path = repo
        .get(filename)
        .await
        .map_err(|e| map_hub_error(model_id, filename, &e))?;

    debug!("Downloaded {} to: {:?}", filename, path);
    Ok(path)
}

fn map_hub_error(model_id: &str, filename: &str, err: &ApiError) -> LocalError {
    if let ApiError::RequestError(request) = err {
        if matches!(request.status().map(|s| s.as_u16()), Some(401 | 403)) {
            return LocalError::Authentication {
                message: format!("Access to {model_id} was denied: {err}"),
            };
        }
    }

    LocalError::ModelLoading {
        message: format!("Failed to download {filename} from {model_id}: {err}"),
    }
}
