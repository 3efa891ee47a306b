//! In-memory record stores and cache for tests.
//!
//! The stores count reads so tests can tell a cache hit from a store
//! round trip. The cache can be switched into failing reads or writes.

use crate::cache::CacheInterface;
use async_trait::async_trait;
use chrono::Utc;
use quill_core::{
    Category, CategoryId, Post, PostId, QuillError, QuillResult, RecordRange, User, UserId,
};
use quill_repository::{CategoryRepository, PostRepository, UserRepository};
use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicI64, AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::Duration;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Cache store backed by a map. TTLs are recorded, never enforced.
#[derive(Debug, Default)]
pub struct InMemoryCache {
    entries: Mutex<BTreeMap<String, (String, Duration)>>,
    fail_reads: AtomicBool,
    fail_writes: AtomicBool,
}

impl InMemoryCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every read fail with a cache error.
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    /// Makes every write and delete fail with a cache error.
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Stores a raw value, bypassing failure injection.
    pub fn insert_raw(&self, key: &str, value: &str) {
        lock(&self.entries).insert(key.to_string(), (value.to_string(), Duration::ZERO));
    }

    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        lock(&self.entries).contains_key(key)
    }

    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        lock(&self.entries).keys().cloned().collect()
    }

    /// TTL the key was last written with.
    #[must_use]
    pub fn ttl_of(&self, key: &str) -> Option<Duration> {
        lock(&self.entries).get(key).map(|(_, ttl)| *ttl)
    }

    fn check_writes(&self) -> QuillResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(QuillError::cache("injected write failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl CacheInterface for InMemoryCache {
    async fn get_raw(&self, key: &str) -> QuillResult<Option<String>> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(QuillError::cache("injected read failure"));
        }
        Ok(lock(&self.entries).get(key).map(|(value, _)| value.clone()))
    }

    async fn set_raw(&self, key: &str, value: &str, ttl: Duration) -> QuillResult<()> {
        self.check_writes()?;
        lock(&self.entries).insert(key.to_string(), (value.to_string(), ttl));
        Ok(())
    }

    async fn delete(&self, key: &str) -> QuillResult<bool> {
        self.check_writes()?;
        Ok(lock(&self.entries).remove(key).is_some())
    }

    async fn delete_by_prefix(&self, prefix: &str) -> QuillResult<u64> {
        self.check_writes()?;
        let mut entries = lock(&self.entries);
        let before = entries.len();
        entries.retain(|key, _| !key.starts_with(prefix));
        Ok((before - entries.len()) as u64)
    }

    async fn ping(&self) -> QuillResult<()> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(QuillError::cache("injected read failure"));
        }
        Ok(())
    }

    async fn close(&self) {}

    fn is_enabled(&self) -> bool {
        true
    }
}

/// Rows of one record family, keyed by store-assigned id.
#[derive(Debug)]
struct Table<T> {
    rows: Mutex<BTreeMap<i64, T>>,
    next_id: AtomicI64,
    reads: AtomicUsize,
}

impl<T: Clone> Table<T> {
    fn new() -> Self {
        Self {
            rows: Mutex::new(BTreeMap::new()),
            next_id: AtomicI64::new(1),
            reads: AtomicUsize::new(0),
        }
    }

    fn next_id(&self) -> i64 {
        self.next_id.fetch_add(1, Ordering::SeqCst)
    }

    fn get(&self, id: i64) -> Option<T> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        lock(&self.rows).get(&id).cloned()
    }

    fn range(&self, range: RecordRange) -> Vec<T> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let skip = usize::try_from(range.offset()).unwrap_or(usize::MAX);
        let take = usize::try_from(range.limit()).unwrap_or(usize::MAX);
        lock(&self.rows).values().skip(skip).take(take).cloned().collect()
    }

    fn remove(&self, id: i64) -> Option<T> {
        lock(&self.rows).remove(&id)
    }

    fn reads(&self) -> usize {
        self.reads.load(Ordering::SeqCst)
    }
}

/// In-memory user store enforcing email uniqueness.
#[derive(Debug)]
pub struct InMemoryUserRepository {
    table: Table<User>,
}

impl Default for InMemoryUserRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryUserRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }

    /// Number of id and range reads served.
    #[must_use]
    pub fn reads(&self) -> usize {
        self.table.reads()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: &User) -> QuillResult<User> {
        let mut rows = lock(&self.table.rows);
        if rows.values().any(|u| u.email == user.email) {
            return Err(QuillError::conflict("email already exists"));
        }
        let mut saved = user.clone();
        saved.id = UserId::new(self.table.next_id());
        rows.insert(saved.id.into_inner(), saved.clone());
        Ok(saved)
    }

    async fn find_by_id(&self, id: UserId) -> QuillResult<Option<User>> {
        Ok(self.table.get(id.into_inner()))
    }

    async fn find_by_email(&self, email: &str) -> QuillResult<Option<User>> {
        Ok(lock(&self.table.rows)
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_range(&self, range: RecordRange) -> QuillResult<Vec<User>> {
        Ok(self.table.range(range))
    }

    async fn update(&self, user: &User) -> QuillResult<User> {
        let mut rows = lock(&self.table.rows);
        if rows.values().any(|u| u.email == user.email && u.id != user.id) {
            return Err(QuillError::conflict("email already exists"));
        }
        let row = rows
            .get_mut(&user.id.into_inner())
            .ok_or_else(|| QuillError::not_found("User", user.id))?;
        *row = user.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: UserId) -> QuillResult<Option<User>> {
        Ok(self.table.remove(id.into_inner()))
    }
}

/// In-memory category store enforcing name uniqueness.
#[derive(Debug)]
pub struct InMemoryCategoryRepository {
    table: Table<Category>,
}

impl Default for InMemoryCategoryRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryCategoryRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }

    #[must_use]
    pub fn reads(&self) -> usize {
        self.table.reads()
    }
}

#[async_trait]
impl CategoryRepository for InMemoryCategoryRepository {
    async fn create(&self, category: &Category) -> QuillResult<Category> {
        let mut rows = lock(&self.table.rows);
        if rows.values().any(|c| c.name == category.name) {
            return Err(QuillError::conflict("category name already exists"));
        }
        let mut saved = category.clone();
        saved.id = CategoryId::new(self.table.next_id());
        rows.insert(saved.id.into_inner(), saved.clone());
        Ok(saved)
    }

    async fn find_by_id(&self, id: CategoryId) -> QuillResult<Option<Category>> {
        Ok(self.table.get(id.into_inner()))
    }

    async fn find_range(&self, range: RecordRange) -> QuillResult<Vec<Category>> {
        Ok(self.table.range(range))
    }

    async fn update(&self, category: &Category) -> QuillResult<Category> {
        let mut rows = lock(&self.table.rows);
        if rows
            .values()
            .any(|c| c.name == category.name && c.id != category.id)
        {
            return Err(QuillError::conflict("category name already exists"));
        }
        let row = rows
            .get_mut(&category.id.into_inner())
            .ok_or_else(|| QuillError::not_found("Category", category.id))?;
        *row = category.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: CategoryId) -> QuillResult<Option<Category>> {
        Ok(self.table.remove(id.into_inner()))
    }
}

/// In-memory post store enforcing slug uniqueness.
#[derive(Debug)]
pub struct InMemoryPostRepository {
    table: Table<Post>,
}

impl Default for InMemoryPostRepository {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryPostRepository {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: Table::new(),
        }
    }

    #[must_use]
    pub fn reads(&self) -> usize {
        self.table.reads()
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn create(&self, post: &Post) -> QuillResult<Post> {
        let mut rows = lock(&self.table.rows);
        if rows.values().any(|p| p.slug == post.slug) {
            return Err(QuillError::conflict("slug already exists"));
        }
        let mut saved = post.clone();
        saved.id = PostId::new(self.table.next_id());
        rows.insert(saved.id.into_inner(), saved.clone());
        Ok(saved)
    }

    async fn find_by_id(&self, id: PostId) -> QuillResult<Option<Post>> {
        Ok(self.table.get(id.into_inner()))
    }

    async fn find_range(&self, range: RecordRange) -> QuillResult<Vec<Post>> {
        Ok(self.table.range(range))
    }

    async fn update(&self, post: &Post) -> QuillResult<Post> {
        let mut rows = lock(&self.table.rows);
        if rows.values().any(|p| p.slug == post.slug && p.id != post.id) {
            return Err(QuillError::conflict("slug already exists"));
        }
        let row = rows
            .get_mut(&post.id.into_inner())
            .ok_or_else(|| QuillError::not_found("Post", post.id))?;
        *row = post.clone();
        row.updated_at = Utc::now();
        Ok(row.clone())
    }

    async fn delete(&self, id: PostId) -> QuillResult<Option<Post>> {
        Ok(self.table.remove(id.into_inner()))
    }
}
