use std::sync::Arc;

use tracing::{debug, instrument};
use uuid::Uuid;

use super::types::DiaryEntry;
use crate::errors::AppResult;
use crate::storage::{keys, load_json, save_json, KvStore};

/// One user's diary, stored newest first as a single blob.
#[derive(Clone)]
pub struct DiaryStore {
    store: Arc<dyn KvStore>,
    key: String,
}

impl DiaryStore {
    pub fn for_user(store: Arc<dyn KvStore>, user_id: &Uuid) -> Self {
        Self {
            store,
            key: keys::owned(keys::DIARY, user_id),
        }
    }

    pub async fn list(&self) -> AppResult<Vec<DiaryEntry>> {
        Ok(load_json(self.store.as_ref(), &self.key).await?.unwrap_or_default())
    }

    /// Prepends the entry and returns the new diary.
    #[instrument(skip(self, entry), fields(entry_id = %entry.id, date = %entry.date))]
    pub async fn append(&self, entry: DiaryEntry) -> AppResult<Vec<DiaryEntry>> {
        let mut entries = self.list().await?;
        entries.insert(0, entry);
        save_json(self.store.as_ref(), &self.key, &entries).await?;
        Ok(entries)
    }

    /// Removes the entry with this id, keeping the order of the rest.
    /// Unknown ids leave storage untouched.
    #[instrument(skip(self))]
    pub async fn remove(&self, id: Uuid) -> AppResult<Vec<DiaryEntry>> {
        let mut entries = self.list().await?;
        let before = entries.len();
        entries.retain(|e| e.id != id);
        if entries.len() == before {
            debug!("diary entry not found");
            return Ok(entries);
        }
        save_json(self.store.as_ref(), &self.key, &entries).await?;
        Ok(entries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use crate::testing::entry_on;

    fn diary() -> (DiaryStore, MemoryStore) {
        let mem = MemoryStore::new();
        (DiaryStore::for_user(Arc::new(mem.clone()), &Uuid::new_v4()), mem)
    }

    #[tokio::test]
    async fn append_prepends() {
        let (diary, _) = diary();
        diary.append(entry_on("2026-10-18", "Oats", 320.0)).await.unwrap();
        let list = diary.append(entry_on("2026-10-19", "Wrap", 380.0)).await.unwrap();
        assert_eq!(list[0].food_name, "Wrap");
        assert_eq!(list[1].food_name, "Oats");
        assert_eq!(diary.list().await.unwrap(), list);
    }

    #[tokio::test]
    async fn remove_drops_exactly_one_and_keeps_order() {
        let (diary, _) = diary();
        let a = entry_on("2026-10-19", "A", 100.0);
        let b = entry_on("2026-10-19", "B", 200.0);
        let c = entry_on("2026-10-19", "C", 300.0);
        for e in [a.clone(), b.clone(), c.clone()] {
            diary.append(e).await.unwrap();
        }
        let list = diary.remove(b.id).await.unwrap();
        let names: Vec<_> = list.iter().map(|e| e.food_name.as_str()).collect();
        assert_eq!(names, vec!["C", "A"]);
        assert_eq!(diary.list().await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn removing_unknown_id_writes_nothing() {
        let (diary, mem) = diary();
        diary.append(entry_on("2026-10-19", "A", 100.0)).await.unwrap();
        let before = mem.snapshot().await;
        let list = diary.remove(Uuid::new_v4()).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(mem.snapshot().await, before);
    }

    #[tokio::test]
    async fn diaries_are_per_user() {
        let mem = Arc::new(MemoryStore::new());
        let mine = DiaryStore::for_user(mem.clone(), &Uuid::new_v4());
        let theirs = DiaryStore::for_user(mem, &Uuid::new_v4());
        mine.append(entry_on("2026-10-19", "A", 100.0)).await.unwrap();
        assert!(theirs.list().await.unwrap().is_empty());
    }
}
