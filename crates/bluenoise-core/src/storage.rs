//! Filesystem persistence layer.
//!
//! All durable state lives under a single data directory:
//!
//! ```text
//! <data_dir>/
//!   staging/                         private in-flight writes
//!   blobs/<object id>                immutable object content
//!   buckets/<bucket>/bucket.json     bucket marker
//!   buckets/<bucket>/objects/<sha256(key)>.json   object metadata
//!   .health/                         health probe scratch space
//! ```
//!
//! Content is staged into `staging/` through [`tempfile`], flushed, and then
//! renamed into `blobs/`. Metadata records are written the same way, so a
//! reader of the directory only ever sees complete files. A blob becomes
//! visible to clients only after its metadata record has been renamed into
//! place and the in-memory index has been updated.
//!
//! Blob files are owned by [`BlobHandle`]. Once a handle has been
//! [retired](BlobHandle::retire), the file is removed as soon as the last
//! reference to the handle is dropped, so readers holding an older version
//! finish against intact content.

use std::collections::HashSet;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};

use anyhow::Context;
use bluenoise_model::types::ObjectMetadata;
use bytes::Bytes;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

use crate::checksums::key_digest;
use crate::error::StoreResult;

const STAGING_DIR: &str = "staging";
const BLOBS_DIR: &str = "blobs";
const BUCKETS_DIR: &str = "buckets";
const OBJECTS_DIR: &str = "objects";
const HEALTH_DIR: &str = ".health";
const BUCKET_MARKER: &str = "bucket.json";

// ---------------------------------------------------------------------------
// Records
// ---------------------------------------------------------------------------

/// Persisted bucket marker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketMarker {
    /// Bucket name.
    pub name: String,
    /// Creation time.
    pub created_at: DateTime<Utc>,
}

/// A bucket and its objects as found on disk at startup.
#[derive(Debug)]
pub struct LoadedBucket {
    /// The bucket marker.
    pub marker: BucketMarker,
    /// Objects whose metadata and content were both present.
    pub objects: Vec<(ObjectMetadata, BlobHandle)>,
}

// ---------------------------------------------------------------------------
// Blobs
// ---------------------------------------------------------------------------

/// Content written to the staging area but not yet committed.
///
/// Dropping a staged blob deletes the staging file.
#[derive(Debug)]
pub struct StagedBlob {
    file: tempfile::NamedTempFile,
    size: u64,
}

/// A committed, immutable content file.
#[derive(Debug)]
pub struct BlobHandle {
    path: PathBuf,
    size: u64,
    retired: AtomicBool,
}

impl BlobHandle {
    pub(crate) fn new(path: PathBuf, size: u64) -> Self {
        Self {
            path,
            size,
            retired: AtomicBool::new(false),
        }
    }

    /// Mark the content as unreachable; the file is removed on drop.
    pub fn retire(&self) {
        self.retired.store(true, Ordering::Release);
    }

    /// Whether [`BlobHandle::retire`] has been called.
    #[must_use]
    pub fn is_retired(&self) -> bool {
        self.retired.load(Ordering::Acquire)
    }

    /// Read the full content.
    ///
    /// Fails if the file no longer holds the recorded number of bytes.
    pub async fn read(&self) -> StoreResult<Bytes> {
        let data = tokio::fs::read(&self.path)
            .await
            .with_context(|| format!("failed to read blob {}", self.path.display()))?;
        if data.len() as u64 != self.size {
            return Err(anyhow::anyhow!(
                "blob {} holds {} bytes, expected {}",
                self.path.display(),
                data.len(),
                self.size
            )
            .into());
        }
        Ok(Bytes::from(data))
    }
}

impl Drop for BlobHandle {
    fn drop(&mut self) {
        if !self.is_retired() {
            return;
        }
        if let Err(e) = std::fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                warn!(path = %self.path.display(), error = %e, "failed to remove retired blob");
            }
        } else {
            trace!(path = %self.path.display(), "removed retired blob");
        }
    }
}

// ---------------------------------------------------------------------------
// DiskStorage
// ---------------------------------------------------------------------------

/// Durable storage rooted at the data directory.
#[derive(Debug)]
pub struct DiskStorage {
    root: PathBuf,
}

impl DiskStorage {
    /// Open (and create if needed) the directory layout under `root`.
    pub async fn open(root: impl Into<PathBuf>) -> StoreResult<Self> {
        let storage = Self { root: root.into() };
        for dir in [
            storage.staging_dir(),
            storage.blobs_dir(),
            storage.buckets_dir(),
        ] {
            tokio::fs::create_dir_all(&dir)
                .await
                .with_context(|| format!("failed to create {}", dir.display()))?;
        }
        debug!(root = %storage.root.display(), "opened disk storage");
        Ok(storage)
    }

    /// Scratch directory reserved for health probes.
    #[must_use]
    pub fn health_dir(&self) -> PathBuf {
        self.root.join(HEALTH_DIR)
    }

    fn staging_dir(&self) -> PathBuf {
        self.root.join(STAGING_DIR)
    }

    fn blobs_dir(&self) -> PathBuf {
        self.root.join(BLOBS_DIR)
    }

    fn buckets_dir(&self) -> PathBuf {
        self.root.join(BUCKETS_DIR)
    }

    fn bucket_dir(&self, bucket: &str) -> PathBuf {
        self.buckets_dir().join(bucket)
    }

    fn metadata_path(&self, bucket: &str, key: &str) -> PathBuf {
        self.bucket_dir(bucket)
            .join(OBJECTS_DIR)
            .join(format!("{}.json", key_digest(key)))
    }

    /// Persist a bucket marker and its empty object namespace.
    pub async fn create_bucket(&self, marker: &BucketMarker) -> StoreResult<()> {
        let objects_dir = self.bucket_dir(&marker.name).join(OBJECTS_DIR);
        tokio::fs::create_dir_all(&objects_dir)
            .await
            .with_context(|| format!("failed to create {}", objects_dir.display()))?;

        let json = serde_json::to_vec_pretty(marker).context("failed to encode bucket marker")?;
        self.write_atomic(self.bucket_dir(&marker.name).join(BUCKET_MARKER), json)
            .await
    }

    /// Write `data` to a private staging file and flush it to disk.
    pub async fn stage_blob(&self, data: Bytes) -> StoreResult<StagedBlob> {
        let staging = self.staging_dir();
        let staged = tokio::task::spawn_blocking(move || -> anyhow::Result<StagedBlob> {
            let mut file = tempfile::Builder::new()
                .prefix("blob-")
                .tempfile_in(&staging)
                .with_context(|| format!("failed to create staging file in {}", staging.display()))?;
            file.write_all(&data).context("failed to write staging file")?;
            file.as_file().sync_all().context("failed to sync staging file")?;
            Ok(StagedBlob {
                file,
                size: data.len() as u64,
            })
        })
        .await
        .context("staging task failed")??;

        trace!(path = %staged.file.path().display(), size = staged.size, "staged blob");
        Ok(staged)
    }

    /// Move a staged blob into the blob store under `id`.
    pub async fn commit_blob(&self, staged: StagedBlob, id: &str) -> StoreResult<BlobHandle> {
        let target = self.blobs_dir().join(id);
        let size = staged.size;
        let dest = target.clone();
        tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
            staged
                .file
                .persist(&dest)
                .with_context(|| format!("failed to commit blob {}", dest.display()))?;
            Ok(())
        })
        .await
        .context("commit task failed")??;

        trace!(path = %target.display(), size, "committed blob");
        Ok(BlobHandle::new(target, size))
    }

    /// Atomically write the metadata record for an object.
    pub async fn write_metadata(&self, metadata: &ObjectMetadata) -> StoreResult<()> {
        let json = serde_json::to_vec_pretty(metadata).context("failed to encode metadata")?;
        self.write_atomic(self.metadata_path(&metadata.bucket, &metadata.key), json)
            .await
    }

    /// Remove the metadata record for an object.
    pub async fn remove_metadata(&self, bucket: &str, key: &str) -> StoreResult<()> {
        let path = self.metadata_path(bucket, key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(anyhow::Error::new(e)
                .context(format!("failed to remove {}", path.display()))
                .into()),
        }
    }

    /// Write `data` to `target` through a staging file and an atomic rename.
    async fn write_atomic(&self, target: PathBuf, data: Vec<u8>) -> StoreResult<()> {
        let staging = self.staging_dir();
        tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
            let mut file = tempfile::Builder::new()
                .prefix("meta-")
                .tempfile_in(&staging)
                .context("failed to create staging file")?;
            file.write_all(&data).context("failed to write staging file")?;
            file.as_file().sync_all().context("failed to sync staging file")?;
            file.persist(&target)
                .with_context(|| format!("failed to publish {}", target.display()))?;
            Ok(())
        })
        .await
        .context("write task failed")??;
        Ok(())
    }

    /// Load every bucket and object from disk.
    ///
    /// Leftover staging files are removed, metadata records that cannot be
    /// decoded or whose content is missing are skipped, and blobs that no
    /// record references are deleted.
    pub async fn load(&self) -> StoreResult<Vec<LoadedBucket>> {
        let staging = self.staging_dir();
        let blobs = self.blobs_dir();
        let buckets = self.buckets_dir();
        let loaded = tokio::task::spawn_blocking(move || load_blocking(&staging, &blobs, &buckets))
            .await
            .context("load task failed")??;
        Ok(loaded)
    }
}

fn load_blocking(staging: &Path, blobs: &Path, buckets: &Path) -> anyhow::Result<Vec<LoadedBucket>> {
    for entry in read_dir(staging)? {
        if let Err(e) = std::fs::remove_file(&entry) {
            warn!(path = %entry.display(), error = %e, "failed to remove leftover staging file");
        }
    }

    let mut loaded = Vec::new();
    let mut referenced = HashSet::new();

    for bucket_dir in read_dir(buckets)? {
        let marker_path = bucket_dir.join(BUCKET_MARKER);
        let marker: BucketMarker = match read_json(&marker_path) {
            Ok(marker) => marker,
            Err(e) => {
                warn!(path = %marker_path.display(), error = %e, "skipping unreadable bucket marker");
                continue;
            }
        };

        let mut objects = Vec::new();
        for meta_path in read_dir(&bucket_dir.join(OBJECTS_DIR))? {
            let metadata: ObjectMetadata = match read_json(&meta_path) {
                Ok(metadata) => metadata,
                Err(e) => {
                    warn!(path = %meta_path.display(), error = %e, "skipping unreadable metadata record");
                    continue;
                }
            };
            let blob_path = blobs.join(&metadata.id);
            if !blob_path.is_file() {
                warn!(
                    bucket = %metadata.bucket,
                    key = %metadata.key,
                    id = %metadata.id,
                    "skipping metadata record with missing content"
                );
                continue;
            }
            referenced.insert(metadata.id.clone());
            let size = metadata.size;
            objects.push((metadata, BlobHandle::new(blob_path, size)));
        }

        debug!(bucket = %marker.name, objects = objects.len(), "loaded bucket");
        loaded.push(LoadedBucket { marker, objects });
    }

    for blob in read_dir(blobs)? {
        let referenced_blob = blob
            .file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| referenced.contains(name));
        if !referenced_blob {
            debug!(path = %blob.display(), "removing orphaned blob");
            if let Err(e) = std::fs::remove_file(&blob) {
                warn!(path = %blob.display(), error = %e, "failed to remove orphaned blob");
            }
        }
    }

    Ok(loaded)
}

/// List the entries of `dir`, treating a missing directory as empty.
fn read_dir(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    let entries = match std::fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(e) => return Err(anyhow::Error::new(e).context(format!("failed to list {}", dir.display()))),
    };
    let mut paths = entries
        .map(|entry| entry.map(|e| e.path()))
        .collect::<Result<Vec<_>, _>>()
        .with_context(|| format!("failed to list {}", dir.display()))?;
    paths.sort();
    Ok(paths)
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let data = std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    serde_json::from_slice(&data).with_context(|| format!("failed to decode {}", path.display()))
}
