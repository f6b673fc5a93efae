use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use aws_config::{defaults, BehaviorVersion};
use aws_credential_types::Credentials;
use aws_sdk_s3::{
    config::{Builder as S3ConfigBuilder, Region},
    error::SdkError,
    Client,
};
use aws_smithy_types::byte_stream::ByteStream;
use bytes::Bytes;
use serde::{de::DeserializeOwned, Serialize};
use tokio::sync::RwLock;
use tracing::debug;

use crate::errors::{AppError, AppResult};

/// Logical keys of the persisted blobs.
pub mod keys {
    pub const SESSION_USER: &str = "session-user";
    pub const USERS_DB: &str = "users-db";
    pub const DIARY: &str = "diary";
    pub const SAVED_PLANS: &str = "saved-plans";

    /// Per-owner key for a collection, e.g. `diary/<user id>`.
    pub fn owned(base: &str, owner: &uuid::Uuid) -> String {
        format!("{}/{}", base, owner)
    }
}

/// Last-write-wins blob store keyed by string.
#[async_trait]
pub trait KvStore: Send + Sync {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Bytes>>;
    async fn put(&self, key: &str, value: Bytes) -> anyhow::Result<()>;
    async fn delete(&self, key: &str) -> anyhow::Result<()>;
}

/// Reads and decodes a JSON blob. `Ok(None)` when the key is absent.
pub async fn load_json<T: DeserializeOwned>(store: &dyn KvStore, key: &str) -> AppResult<Option<T>> {
    let Some(raw) = store.get(key).await? else {
        return Ok(None);
    };
    let value = serde_json::from_slice(&raw).map_err(|source| AppError::Corrupt {
        key: key.to_string(),
        source,
    })?;
    Ok(Some(value))
}

pub async fn save_json<T: Serialize + ?Sized>(store: &dyn KvStore, key: &str, value: &T) -> AppResult<()> {
    let body = serde_json::to_vec(value).map_err(|e| AppError::Storage(e.into()))?;
    store.put(key, Bytes::from(body)).await?;
    debug!(key, "blob written");
    Ok(())
}

#[derive(Clone, Default)]
pub struct MemoryStore {
    entries: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every entry, for asserting that nothing changed.
    pub async fn snapshot(&self) -> HashMap<String, Bytes> {
        self.entries.read().await.clone()
    }
}

#[async_trait]
impl KvStore for MemoryStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Bytes>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Bytes) -> anyhow::Result<()> {
        self.entries.write().await.insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }
}

/// One JSON file per key inside a directory.
#[derive(Clone)]
pub struct FsStore {
    dir: PathBuf,
}

impl FsStore {
    pub async fn new(dir: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let dir = dir.into();
        tokio::fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("create store dir {}", dir.display()))?;
        Ok(Self { dir })
    }

    fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{}.json", key.replace('/', "__")))
    }
}

#[async_trait]
impl KvStore for FsStore {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Bytes>> {
        let path = self.path_for(key);
        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Some(Bytes::from(data))),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e).with_context(|| format!("read {}", path.display())),
        }
    }

    async fn put(&self, key: &str, value: Bytes) -> anyhow::Result<()> {
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &value)
            .await
            .with_context(|| format!("write {}", tmp.display()))?;
        tokio::fs::rename(&tmp, &path)
            .await
            .with_context(|| format!("rename into {}", path.display()))?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        let path = self.path_for(key);
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e).with_context(|| format!("remove {}", path.display())),
        }
    }
}

/// S3/MinIO bucket, one object per key.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub async fn new(
        endpoint: &str,
        bucket: &str,
        access_key: &str,
        secret_key: &str,
        region: &str,
    ) -> anyhow::Result<Self> {
        let shared = defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(Credentials::new(
                access_key, secret_key, None, None, "static",
            ))
            .endpoint_url(endpoint)
            .load()
            .await;

        let conf = S3ConfigBuilder::from(&shared)
            .endpoint_url(endpoint)
            .force_path_style(true)
            .build();

        Ok(Self {
            client: Client::from_conf(conf),
            bucket: bucket.to_string(),
        })
    }
}

#[async_trait]
impl KvStore for S3Store {
    async fn get(&self, key: &str) -> anyhow::Result<Option<Bytes>> {
        let out = match self
            .client
            .get_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
        {
            Ok(out) => out,
            Err(SdkError::ServiceError(e)) if e.err().is_no_such_key() => return Ok(None),
            Err(e) => return Err(e).context("s3 get_object"),
        };
        let body = out.body.collect().await.context("s3 read body")?;
        Ok(Some(body.into_bytes()))
    }

    async fn put(&self, key: &str, value: Bytes) -> anyhow::Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(value))
            .content_type("application/json")
            .send()
            .await
            .context("s3 put_object")?;
        Ok(())
    }

    async fn delete(&self, key: &str) -> anyhow::Result<()> {
        self.client
            .delete_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await
            .context("s3 delete_object")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_store_roundtrip_and_delete() {
        let store = MemoryStore::new();
        assert!(store.get("k").await.unwrap().is_none());
        store.put("k", Bytes::from_static(b"v")).await.unwrap();
        assert_eq!(store.get("k").await.unwrap().unwrap(), Bytes::from_static(b"v"));
        store.delete("k").await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn load_json_reports_corrupt_blob() {
        let store = MemoryStore::new();
        store.put(keys::DIARY, Bytes::from_static(b"[{oops")).await.unwrap();
        let err = load_json::<Vec<String>>(&store, keys::DIARY).await.unwrap_err();
        assert!(matches!(err, AppError::Corrupt { ref key, .. } if key == keys::DIARY));
    }

    #[tokio::test]
    async fn fs_store_persists_across_instances() {
        let dir = std::env::temp_dir().join(format!("foodai-fs-{}", uuid::Uuid::new_v4()));
        let key = keys::owned(keys::SAVED_PLANS, &uuid::Uuid::new_v4());

        let store = FsStore::new(&dir).await.unwrap();
        save_json(&store, &key, &vec!["a", "b"]).await.unwrap();

        let reopened = FsStore::new(&dir).await.unwrap();
        let back: Vec<String> = load_json(&reopened, &key).await.unwrap().unwrap();
        assert_eq!(back, vec!["a", "b"]);

        reopened.delete(&key).await.unwrap();
        reopened.delete(&key).await.unwrap();
        assert!(reopened.get(&key).await.unwrap().is_none());
        let _ = tokio::fs::remove_dir_all(&dir).await;
    }
}
