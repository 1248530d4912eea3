//! In-memory store - used when no database is configured, and in tests.
//!
//! Mirrors the relational schema closely enough for the services: ids come
//! from a per-table sequence, unique columns and foreign keys are checked on
//! save. Data is lost on process restart.

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use yatube_core::domain::{Comment, Follow, Group, Post, UNSAVED_ID, User};
use yatube_core::error::RepoError;
use yatube_core::ports::{
    BaseRepository, CommentRepository, FeedScope, FollowRepository, GroupRepository,
    PostRepository, UserRepository,
};
use yatube_core::services::Repositories;

trait Row: Clone {
    fn id(&self) -> i64;
    fn set_id(&mut self, id: i64);
}

macro_rules! impl_row {
    ($($ty:ty),*) => {
        $(impl Row for $ty {
            fn id(&self) -> i64 {
                self.id
            }

            fn set_id(&mut self, id: i64) {
                self.id = id;
            }
        })*
    };
}

impl_row!(User, Post, Group, Comment, Follow);

struct Table<T> {
    rows: BTreeMap<i64, T>,
    last_id: i64,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<T: Row> Table<T> {
    fn get(&self, id: i64) -> Option<T> {
        self.rows.get(&id).cloned()
    }

    fn contains(&self, id: i64) -> bool {
        self.rows.contains_key(&id)
    }

    fn values(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    fn save(&mut self, mut row: T) -> Result<T, RepoError> {
        if row.id() == UNSAVED_ID {
            self.last_id += 1;
            row.set_id(self.last_id);
        } else if !self.rows.contains_key(&row.id()) {
            return Err(RepoError::NotFound);
        }

        self.rows.insert(row.id(), row.clone());
        Ok(row)
    }
}

#[derive(Default)]
struct Tables {
    users: Table<User>,
    groups: Table<Group>,
    posts: Table<Post>,
    comments: Table<Comment>,
    follows: Table<Follow>,
}

impl Tables {
    /// Posts in `scope`, newest first with ties in insertion order.
    fn scoped_posts(&self, scope: FeedScope) -> Vec<&Post> {
        let followed: HashSet<i64> = match scope {
            FeedScope::FollowedBy(user_id) => self
                .follows
                .values()
                .filter(|f| f.user_id == user_id)
                .map(|f| f.author_id)
                .collect(),
            _ => HashSet::new(),
        };

        let mut posts: Vec<&Post> = self
            .posts
            .values()
            .filter(|p| match scope {
                FeedScope::All => true,
                FeedScope::Group(group_id) => p.group_id == Some(group_id),
                FeedScope::Author(author_id) => p.author_id == author_id,
                FeedScope::FollowedBy(_) => followed.contains(&p.author_id),
            })
            .collect();

        posts.sort_by(|a, b| b.pub_date.cmp(&a.pub_date).then(a.id.cmp(&b.id)));
        posts
    }
}

/// Shared in-memory tables. Cloning shares the same data.
#[derive(Clone, Default)]
pub struct InMemoryDatabase {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryDatabase {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn users(&self) -> InMemoryUserRepository {
        InMemoryUserRepository(self.clone())
    }

    pub fn groups(&self) -> InMemoryGroupRepository {
        InMemoryGroupRepository(self.clone())
    }

    pub fn posts(&self) -> InMemoryPostRepository {
        InMemoryPostRepository(self.clone())
    }

    pub fn comments(&self) -> InMemoryCommentRepository {
        InMemoryCommentRepository(self.clone())
    }

    pub fn follows(&self) -> InMemoryFollowRepository {
        InMemoryFollowRepository(self.clone())
    }

    /// Every repository, backed by these tables.
    pub fn repositories(&self) -> Repositories {
        Repositories {
            users: Arc::new(self.users()),
            posts: Arc::new(self.posts()),
            groups: Arc::new(self.groups()),
            comments: Arc::new(self.comments()),
            follows: Arc::new(self.follows()),
        }
    }

    /// Total number of follow edges.
    pub async fn follow_count(&self) -> usize {
        self.tables.read().await.follows.rows.len()
    }

    /// Total number of posts.
    pub async fn post_count(&self) -> usize {
        self.tables.read().await.posts.rows.len()
    }
}

fn by_ids<T: Row>(table: &Table<T>, ids: &[i64]) -> Vec<T> {
    ids.iter().filter_map(|id| table.get(*id)).collect()
}

pub struct InMemoryUserRepository(InMemoryDatabase);

#[async_trait]
impl BaseRepository<User, i64> for InMemoryUserRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<User>, RepoError> {
        Ok(self.0.tables.read().await.users.get(id))
    }

    async fn save(&self, user: User) -> Result<User, RepoError> {
        let mut tables = self.0.tables.write().await;
        if tables
            .users
            .values()
            .any(|u| u.username == user.username && u.id != user.id)
        {
            return Err(RepoError::Constraint("duplicate username".to_string()));
        }
        tables.users.save(user)
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        let tables = self.0.tables.read().await;
        Ok(tables.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<User>, RepoError> {
        Ok(by_ids(&self.0.tables.read().await.users, ids))
    }
}

pub struct InMemoryGroupRepository(InMemoryDatabase);

#[async_trait]
impl BaseRepository<Group, i64> for InMemoryGroupRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Group>, RepoError> {
        Ok(self.0.tables.read().await.groups.get(id))
    }

    async fn save(&self, group: Group) -> Result<Group, RepoError> {
        let mut tables = self.0.tables.write().await;
        if tables
            .groups
            .values()
            .any(|g| g.slug == group.slug && g.id != group.id)
        {
            return Err(RepoError::Constraint("duplicate slug".to_string()));
        }
        tables.groups.save(group)
    }
}

#[async_trait]
impl GroupRepository for InMemoryGroupRepository {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Group>, RepoError> {
        let tables = self.0.tables.read().await;
        Ok(tables.groups.values().find(|g| g.slug == slug).cloned())
    }

    async fn find_by_ids(&self, ids: &[i64]) -> Result<Vec<Group>, RepoError> {
        Ok(by_ids(&self.0.tables.read().await.groups, ids))
    }

    async fn all(&self) -> Result<Vec<Group>, RepoError> {
        let tables = self.0.tables.read().await;
        let mut groups: Vec<Group> = tables.groups.values().cloned().collect();
        groups.sort_by(|a, b| a.title.cmp(&b.title).then(a.id.cmp(&b.id)));
        Ok(groups)
    }
}

pub struct InMemoryPostRepository(InMemoryDatabase);

#[async_trait]
impl BaseRepository<Post, i64> for InMemoryPostRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Post>, RepoError> {
        Ok(self.0.tables.read().await.posts.get(id))
    }

    async fn save(&self, post: Post) -> Result<Post, RepoError> {
        let mut tables = self.0.tables.write().await;
        if !tables.users.contains(post.author_id) {
            return Err(RepoError::Constraint("post author does not exist".to_string()));
        }
        if let Some(group_id) = post.group_id {
            if !tables.groups.contains(group_id) {
                return Err(RepoError::Constraint("post group does not exist".to_string()));
            }
        }
        tables.posts.save(post)
    }
}

#[async_trait]
impl PostRepository for InMemoryPostRepository {
    async fn find_by_author(
        &self,
        post_id: i64,
        author_id: i64,
    ) -> Result<Option<Post>, RepoError> {
        let tables = self.0.tables.read().await;
        Ok(tables.posts.get(post_id).filter(|p| p.author_id == author_id))
    }

    async fn count(&self, scope: FeedScope) -> Result<u64, RepoError> {
        Ok(self.0.tables.read().await.scoped_posts(scope).len() as u64)
    }

    async fn list(
        &self,
        scope: FeedScope,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<Post>, RepoError> {
        let tables = self.0.tables.read().await;
        Ok(tables
            .scoped_posts(scope)
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect())
    }
}

pub struct InMemoryCommentRepository(InMemoryDatabase);

#[async_trait]
impl BaseRepository<Comment, i64> for InMemoryCommentRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Comment>, RepoError> {
        Ok(self.0.tables.read().await.comments.get(id))
    }

    async fn save(&self, comment: Comment) -> Result<Comment, RepoError> {
        let mut tables = self.0.tables.write().await;
        if !tables.posts.contains(comment.post_id) || !tables.users.contains(comment.author_id) {
            return Err(RepoError::Constraint(
                "comment references a missing post or user".to_string(),
            ));
        }
        tables.comments.save(comment)
    }
}

#[async_trait]
impl CommentRepository for InMemoryCommentRepository {
    async fn find_by_post(&self, post_id: i64) -> Result<Vec<Comment>, RepoError> {
        let tables = self.0.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created.cmp(&b.created).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn count_by_posts(&self, post_ids: &[i64]) -> Result<HashMap<i64, u64>, RepoError> {
        let tables = self.0.tables.read().await;
        let wanted: HashSet<&i64> = post_ids.iter().collect();

        let mut counts = HashMap::new();
        for comment in tables.comments.values().filter(|c| wanted.contains(&c.post_id)) {
            *counts.entry(comment.post_id).or_insert(0) += 1;
        }
        Ok(counts)
    }
}

pub struct InMemoryFollowRepository(InMemoryDatabase);

#[async_trait]
impl BaseRepository<Follow, i64> for InMemoryFollowRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<Follow>, RepoError> {
        Ok(self.0.tables.read().await.follows.get(id))
    }

    async fn save(&self, follow: Follow) -> Result<Follow, RepoError> {
        let mut tables = self.0.tables.write().await;
        if !tables.users.contains(follow.user_id) || !tables.users.contains(follow.author_id) {
            return Err(RepoError::Constraint("follow references a missing user".to_string()));
        }
        if tables.follows.values().any(|f| {
            f.user_id == follow.user_id && f.author_id == follow.author_id && f.id != follow.id
        }) {
            return Err(RepoError::Constraint("duplicate follow".to_string()));
        }
        tables.follows.save(follow)
    }
}

#[async_trait]
impl FollowRepository for InMemoryFollowRepository {
    async fn exists(&self, user_id: i64, author_id: i64) -> Result<bool, RepoError> {
        let tables = self.0.tables.read().await;
        Ok(tables
            .follows
            .values()
            .any(|f| f.user_id == user_id && f.author_id == author_id))
    }

    async fn delete_pair(&self, user_id: i64, author_id: i64) -> Result<u64, RepoError> {
        let mut tables = self.0.tables.write().await;
        let before = tables.follows.rows.len();
        tables
            .follows
            .rows
            .retain(|_, f| !(f.user_id == user_id && f.author_id == author_id));
        Ok((before - tables.follows.rows.len()) as u64)
    }

    async fn count_following(&self, user_id: i64) -> Result<u64, RepoError> {
        let tables = self.0.tables.read().await;
        Ok(tables.follows.values().filter(|f| f.user_id == user_id).count() as u64)
    }

    async fn count_followers(&self, author_id: i64) -> Result<u64, RepoError> {
        let tables = self.0.tables.read().await;
        Ok(tables
            .follows
            .values()
            .filter(|f| f.author_id == author_id)
            .count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;

    async fn user(db: &InMemoryDatabase, username: &str) -> User {
        db.users()
            .save(User::new(username.into(), String::new(), String::new(), "hash".into()))
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_save_assigns_sequential_ids() {
        let db = InMemoryDatabase::new();
        let first = user(&db, "first").await;
        let second = user(&db, "second").await;

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn test_duplicate_username_is_constraint_violation() {
        let db = InMemoryDatabase::new();
        user(&db, "yaloh").await;

        let result = db
            .users()
            .save(User::new("yaloh".into(), String::new(), String::new(), "x".into()))
            .await;
        assert!(matches!(result, Err(RepoError::Constraint(_))));
    }

    #[tokio::test]
    async fn test_listing_orders_by_pub_date_then_id() {
        let db = InMemoryDatabase::new();
        let author = user(&db, "author").await;
        let now = Utc::now();

        let mut older = Post::new(author.id, "older".into(), None, None);
        older.pub_date = now - Duration::minutes(5);
        let mut tie_a = Post::new(author.id, "tie a".into(), None, None);
        tie_a.pub_date = now;
        let mut tie_b = Post::new(author.id, "tie b".into(), None, None);
        tie_b.pub_date = now;

        let posts = db.posts();
        posts.save(older).await.unwrap();
        posts.save(tie_a).await.unwrap();
        posts.save(tie_b).await.unwrap();

        let texts: Vec<String> = posts
            .list(FeedScope::All, 0, 10)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.text)
            .collect();
        assert_eq!(texts, vec!["tie a", "tie b", "older"]);
    }

    #[tokio::test]
    async fn test_delete_pair_removes_edge() {
        let db = InMemoryDatabase::new();
        let a = user(&db, "a").await;
        let b = user(&db, "b").await;

        db.follows().save(Follow::new(a.id, b.id)).await.unwrap();
        assert!(db.follows().exists(a.id, b.id).await.unwrap());

        assert_eq!(db.follows().delete_pair(a.id, b.id).await.unwrap(), 1);
        assert_eq!(db.follow_count().await, 0);
    }
}
