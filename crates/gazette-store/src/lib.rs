//! Article persistence for the Gazette blog server.
//!
//! Articles live in an embedded [`redb`] database, one table keyed by
//! slug with bincode-encoded rows. Slug uniqueness is enforced by the
//! store: the existence check and the insert happen inside a single write
//! transaction, so two concurrent posts of the same slug cannot both
//! succeed.

use gazette_core::{AppError, Article};
use redb::{Database, ReadableTable, ReadableTableMetadata, TableDefinition};
use std::path::Path;
use thiserror::Error;
use tracing::info;

/// Articles keyed by lowercase slug, bincode-encoded.
const ARTICLES: TableDefinition<&str, &[u8]> = TableDefinition::new("articles");

/// Storage failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// An article with this slug is already stored.
    #[error("slug already exists")]
    SlugExists,

    /// The database could not be opened or created.
    #[error("failed to open database: {0}")]
    Open(#[from] redb::DatabaseError),

    /// A transaction could not be started.
    #[error("transaction failed: {0}")]
    Transaction(#[from] redb::TransactionError),

    /// A table could not be opened.
    #[error("table access failed: {0}")]
    Table(#[from] redb::TableError),

    /// A read or write inside a transaction failed.
    #[error("storage operation failed: {0}")]
    Storage(#[from] redb::StorageError),

    /// A transaction failed to commit.
    #[error("commit failed: {0}")]
    Commit(#[from] redb::CommitError),

    /// A stored row could not be encoded or decoded.
    #[error("encoding failed: {0}")]
    Encoding(#[from] bincode::Error),
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::SlugExists => Self::SlugExists,
            other => Self::Storage(other.to_string()),
        }
    }
}

/// The article collection.
pub struct ArticleStore {
    db: Database,
}

impl ArticleStore {
    /// Opens (or creates) the article database at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when the database file cannot be created or the
    /// table cannot be initialized.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let path = path.as_ref();
        let db = Database::create(path)?;

        let write_txn = db.begin_write()?;
        write_txn.open_table(ARTICLES)?;
        write_txn.commit()?;

        info!(path = %path.display(), "article store opened");
        Ok(Self { db })
    }

    /// Inserts a new article.
    ///
    /// The existence check and the insert share one write transaction, so
    /// a duplicate slug can never be stored twice.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::SlugExists`] when the slug is taken, or a
    /// storage error when the transaction fails.
    pub fn insert(&self, article: &Article) -> Result<(), StoreError> {
        let encoded = bincode::serialize(article)?;

        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ARTICLES)?;
            if table.get(article.slug.as_str())?.is_some() {
                return Err(StoreError::SlugExists);
            }
            table.insert(article.slug.as_str(), encoded.as_slice())?;
        }
        write_txn.commit()?;

        info!(slug = %article.slug, "article stored");
        Ok(())
    }

    /// Fetches an article by its (already lowercased) slug.
    ///
    /// # Errors
    ///
    /// Returns an error when storage access or decoding fails.
    pub fn get(&self, slug: &str) -> Result<Option<Article>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ARTICLES)?;
        match table.get(slug)? {
            Some(guard) => Ok(Some(bincode::deserialize(guard.value())?)),
            None => Ok(None),
        }
    }

    /// Lists every stored article in the table's natural iteration order.
    ///
    /// # Errors
    ///
    /// Returns an error when storage access or decoding fails.
    pub fn list(&self) -> Result<Vec<Article>, StoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ARTICLES)?;

        let mut articles = Vec::new();
        for item in table.iter()? {
            let (_, value) = item?;
            articles.push(bincode::deserialize(value.value())?);
        }
        Ok(articles)
    }

    /// Returns the number of stored articles.
    ///
    /// # Errors
    ///
    /// Returns an error when storage access fails.
    pub fn count(&self) -> Result<u64, StoreError> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ARTICLES)?;
        Ok(table.len()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn open_store(dir: &TempDir) -> ArticleStore {
        ArticleStore::open(dir.path().join("articles.redb")).unwrap()
    }

    fn sample(slug: &str) -> Article {
        Article::new("A Title", slug, "A description", "Some content")
    }

    #[test]
    fn test_insert_and_get() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let article = sample("hello-world");
        store.insert(&article).unwrap();

        let fetched = store.get("hello-world").unwrap().unwrap();
        assert_eq!(fetched, article);
    }

    #[test]
    fn test_get_missing_is_none() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        assert!(store.get("nope").unwrap().is_none());
    }

    #[test]
    fn test_duplicate_slug_rejected() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store.insert(&sample("taken")).unwrap();
        let err = store.insert(&sample("taken")).unwrap_err();

        assert!(matches!(err, StoreError::SlugExists));
        assert_eq!(store.count().unwrap(), 1);
    }

    #[test]
    fn test_failed_insert_leaves_original_row() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        let first = sample("taken");
        store.insert(&first).unwrap();

        let mut second = sample("taken");
        second.title = "Replacement".to_string();
        assert!(store.insert(&second).is_err());

        let stored = store.get("taken").unwrap().unwrap();
        assert_eq!(stored.title, "A Title");
    }

    #[test]
    fn test_list_returns_all() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);

        store.insert(&sample("alpha")).unwrap();
        store.insert(&sample("beta")).unwrap();
        store.insert(&sample("gamma")).unwrap();

        let articles = store.list().unwrap();
        assert_eq!(articles.len(), 3);

        let mut slugs: Vec<_> = articles.iter().map(|a| a.slug.as_str()).collect();
        slugs.sort_unstable();
        assert_eq!(slugs, ["alpha", "beta", "gamma"]);
    }

    #[test]
    fn test_list_empty_store() {
        let dir = TempDir::new().unwrap();
        let store = open_store(&dir);
        assert!(store.list().unwrap().is_empty());
    }

    #[test]
    fn test_reopen_preserves_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("articles.redb");

        {
            let store = ArticleStore::open(&path).unwrap();
            store.insert(&sample("persisted")).unwrap();
        }

        let store = ArticleStore::open(&path).unwrap();
        assert!(store.get("persisted").unwrap().is_some());
    }

    #[test]
    fn test_slug_exists_maps_to_conflict() {
        let err = AppError::from(StoreError::SlugExists);
        assert_eq!(err.status_code(), http::StatusCode::CONFLICT);
        assert_eq!(err.error_code(), "slug_exists");
    }
}
