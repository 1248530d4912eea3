//! Service behaviour over the in-memory adapters.

#![cfg(feature = "auth")]

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono::Utc;
use yatube_core::DomainError;
use yatube_core::domain::{Group, Post, User};
use yatube_core::ports::{AuthError, BaseRepository, ImageUpload, PasswordService};
use yatube_core::services::{
    AccountService, CommentService, FeedService, FollowService, INDEX_CACHE_PREFIX, PageCache,
    PostForm, PostService, SignupForm,
};
use yatube_infra::{
    Argon2PasswordService, InMemoryCache, InMemoryDatabase, InMemoryImageStore, JwtConfig,
    JwtTokenService,
};

struct App {
    db: InMemoryDatabase,
    images: Arc<InMemoryImageStore>,
    accounts: AccountService,
    posts: PostService,
    feeds: FeedService,
    comments: CommentService,
    follows: FollowService,
}

impl App {
    fn new() -> Self {
        let db = InMemoryDatabase::new();
        let repos = db.repositories();
        let images = Arc::new(InMemoryImageStore::new());
        let tokens = Arc::new(JwtTokenService::new(JwtConfig {
            secret: "test-secret".to_string(),
            ..JwtConfig::default()
        }));

        Self {
            accounts: AccountService::new(
                repos.users.clone(),
                Arc::new(Argon2PasswordService::new()),
                tokens,
            ),
            posts: PostService::new(repos.clone(), images.clone()),
            feeds: FeedService::new(repos.clone()),
            comments: CommentService::new(repos.clone()),
            follows: FollowService::new(repos),
            images,
            db,
        }
    }

    async fn user(&self, username: &str) -> User {
        self.db
            .users()
            .save(User::new(
                username.to_string(),
                String::new(),
                String::new(),
                "hash".to_string(),
            ))
            .await
            .unwrap()
    }

    async fn group(&self, slug: &str) -> Group {
        self.db
            .groups()
            .save(Group::new(
                format!("Group {slug}"),
                slug.to_string(),
                String::new(),
            ))
            .await
            .unwrap()
    }

    async fn post(&self, author: &User, text: &str) -> Post {
        self.posts.create(author.id, text_form(text)).await.unwrap()
    }
}

fn text_form(text: &str) -> PostForm {
    PostForm {
        text: text.to_string(),
        ..Default::default()
    }
}

fn png_bytes() -> Vec<u8> {
    let img = image::RgbImage::from_pixel(3, 3, image::Rgb([10, 120, 200]));
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

fn field_error(err: DomainError, field: &str) -> bool {
    matches!(err, DomainError::Validation(errors) if errors.contains(field))
}

#[tokio::test]
async fn test_signup_then_login() {
    let app = App::new();

    let session = app
        .accounts
        .signup(SignupForm {
            username: "yaloh".to_string(),
            password: "loshik123".to_string(),
            first_name: "Ya".to_string(),
            last_name: "Loh".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(session.user.full_name(), "Ya Loh");
    assert!(!session.token.is_empty());

    let session = app.accounts.login("yaloh", "loshik123").await.unwrap();
    assert_eq!(session.user.username, "yaloh");

    let wrong = app.accounts.login("yaloh", "loshik124").await;
    assert!(matches!(wrong, Err(DomainError::Unauthorized)));

    let unknown = app.accounts.login("nobody", "loshik123").await;
    assert!(matches!(unknown, Err(DomainError::Unauthorized)));
}

/// Argon2 hashing that records how logins reached it.
#[derive(Default)]
struct RecordingPasswords {
    inner: Argon2PasswordService,
    verified: AtomicUsize,
    unknown: AtomicUsize,
}

impl PasswordService for RecordingPasswords {
    fn hash(&self, password: &str) -> Result<String, AuthError> {
        self.inner.hash(password)
    }

    fn verify(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        self.verified.fetch_add(1, Ordering::SeqCst);
        self.inner.verify(password, hash)
    }

    fn verify_unknown_user(&self, password: &str) {
        self.unknown.fetch_add(1, Ordering::SeqCst);
        self.inner.verify_unknown_user(password);
    }
}

#[tokio::test]
async fn test_login_with_unknown_username_still_hashes() {
    let db = InMemoryDatabase::new();
    let passwords = Arc::new(RecordingPasswords::default());
    let accounts = AccountService::new(
        db.repositories().users,
        passwords.clone(),
        Arc::new(JwtTokenService::new(JwtConfig {
            secret: "test-secret".to_string(),
            ..JwtConfig::default()
        })),
    );

    let unknown = accounts.login("nobody", "loshik123").await;
    assert!(matches!(unknown, Err(DomainError::Unauthorized)));
    assert_eq!(passwords.unknown.load(Ordering::SeqCst), 1);
    assert_eq!(passwords.verified.load(Ordering::SeqCst), 0);

    accounts
        .signup(SignupForm {
            username: "yaloh".to_string(),
            password: "loshik123".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();
    let wrong = accounts.login("yaloh", "loshik124").await;
    assert!(matches!(wrong, Err(DomainError::Unauthorized)));
    assert_eq!(passwords.unknown.load(Ordering::SeqCst), 1);
    assert_eq!(passwords.verified.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_signup_rejects_taken_username() {
    let app = App::new();
    app.user("yaloh").await;

    let err = app
        .accounts
        .signup(SignupForm {
            username: "yaloh".to_string(),
            password: "loshik123".to_string(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(field_error(err, "username"));
}

#[tokio::test]
async fn test_new_post_shows_on_every_feed() {
    let app = App::new();
    let author = app.user("leo").await;
    let group = app.group("cats").await;

    let post = app
        .posts
        .create(
            author.id,
            PostForm {
                text: "  Hello  ".to_string(),
                group: Some(group.id.to_string()),
                image: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(post.author_id, author.id);
    assert_eq!(post.text, "Hello");

    let index = app.feeds.index(None).await.unwrap();
    assert_eq!(index.items[0].post.id, post.id);
    assert_eq!(index.items[0].author.username, "leo");

    let (_, group_page) = app.feeds.group("cats", None).await.unwrap();
    assert_eq!(group_page.items[0].post.id, post.id);
    assert_eq!(group_page.items[0].group.as_ref().map(|g| g.slug.as_str()), Some("cats"));

    let profile = app.feeds.profile("leo", None, None).await.unwrap();
    assert_eq!(profile.posts_count, 1);
    assert_eq!(profile.page.items[0].post.id, post.id);
}

#[tokio::test]
async fn test_create_rejects_empty_text_and_unknown_group() {
    let app = App::new();
    let author = app.user("leo").await;

    let err = app.posts.create(author.id, text_form("   ")).await.unwrap_err();
    assert!(field_error(err, "text"));

    let err = app
        .posts
        .create(
            author.id,
            PostForm {
                text: "text".to_string(),
                group: Some("999".to_string()),
                image: None,
            },
        )
        .await
        .unwrap_err();
    assert!(field_error(err, "group"));
    assert_eq!(app.db.post_count().await, 0);
}

#[tokio::test]
async fn test_invalid_image_creates_nothing() {
    let app = App::new();
    let author = app.user("leo").await;

    let err = app
        .posts
        .create(
            author.id,
            PostForm {
                text: "with picture".to_string(),
                group: None,
                image: Some(ImageUpload {
                    filename: Some("small.gif".to_string()),
                    data: b"this is not a gif".to_vec(),
                }),
            },
        )
        .await
        .unwrap_err();

    assert!(field_error(err, "image"));
    assert_eq!(app.db.post_count().await, 0);
    assert!(app.images.is_empty().await);
}

#[tokio::test]
async fn test_valid_image_is_stored() {
    let app = App::new();
    let author = app.user("leo").await;
    let data = png_bytes();

    let post = app
        .posts
        .create(
            author.id,
            PostForm {
                text: "with picture".to_string(),
                group: None,
                image: Some(ImageUpload {
                    filename: Some("small.png".to_string()),
                    data: data.clone(),
                }),
            },
        )
        .await
        .unwrap();

    let key = post.image.expect("image path");
    assert!(key.starts_with("posts/") && key.ends_with(".png"));
    assert_eq!(app.images.get(&key).await, Some(data));

    let detail = app.feeds.post("leo", post.id).await.unwrap();
    assert_eq!(detail.item.post.image.as_deref(), Some(key.as_str()));
}

#[tokio::test]
async fn test_edit_moves_post_between_groups() {
    let app = App::new();
    let author = app.user("leo").await;
    let cats = app.group("cats").await;
    let dogs = app.group("dogs").await;

    let post = app
        .posts
        .create(
            author.id,
            PostForm {
                text: "original".to_string(),
                group: Some(cats.id.to_string()),
                image: None,
            },
        )
        .await
        .unwrap();

    let editable = app
        .posts
        .editable(Some(author.id), "leo", post.id)
        .await
        .unwrap();
    let edited = app
        .posts
        .edit(
            editable,
            PostForm {
                text: "edited".to_string(),
                group: Some(dogs.id.to_string()),
                image: None,
            },
        )
        .await
        .unwrap();

    assert_eq!(edited.id, post.id);
    assert_eq!(edited.pub_date, post.pub_date);
    assert_eq!(edited.author_id, author.id);

    let detail = app.feeds.post("leo", post.id).await.unwrap();
    assert_eq!(detail.item.post.text, "edited");

    let (_, cats_page) = app.feeds.group("cats", None).await.unwrap();
    assert!(cats_page.items.is_empty());

    let (_, dogs_page) = app.feeds.group("dogs", None).await.unwrap();
    assert_eq!(dogs_page.items[0].post.text, "edited");

    let profile = app.feeds.profile("leo", None, None).await.unwrap();
    assert_eq!(profile.page.items[0].post.text, "edited");
    assert_eq!(app.db.post_count().await, 1);
}

#[tokio::test]
async fn test_edit_keeps_image_without_new_upload() {
    let app = App::new();
    let author = app.user("leo").await;

    let post = app
        .posts
        .create(
            author.id,
            PostForm {
                text: "picture".to_string(),
                group: None,
                image: Some(ImageUpload {
                    filename: None,
                    data: png_bytes(),
                }),
            },
        )
        .await
        .unwrap();

    let editable = app
        .posts
        .editable(Some(author.id), "leo", post.id)
        .await
        .unwrap();
    let edited = app
        .posts
        .edit(editable, text_form("still a picture"))
        .await
        .unwrap();
    assert_eq!(edited.image, post.image);
}

#[tokio::test]
async fn test_only_the_author_may_edit() {
    let app = App::new();
    let author = app.user("leo").await;
    let other = app.user("mia").await;
    let post = app.post(&author, "mine").await;

    let by_other = app.posts.editable(Some(other.id), "leo", post.id).await;
    assert!(matches!(by_other, Err(DomainError::Unauthorized)));

    let anonymous = app.posts.editable(None, "leo", post.id).await;
    assert!(matches!(anonymous, Err(DomainError::Unauthorized)));

    let missing = app.posts.editable(Some(author.id), "leo", 999).await;
    assert!(matches!(missing, Err(DomainError::NotFound { .. })));

    let detail = app.feeds.post("leo", post.id).await.unwrap();
    assert_eq!(detail.item.post.text, "mine");
}

#[tokio::test]
async fn test_post_detail_requires_matching_author() {
    let app = App::new();
    let author = app.user("leo").await;
    app.user("mia").await;
    let post = app.post(&author, "mine").await;

    assert!(matches!(
        app.feeds.post("mia", post.id).await,
        Err(DomainError::NotFound { .. })
    ));
    assert!(matches!(
        app.feeds.post("ghost", post.id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_follow_and_unfollow() {
    let app = App::new();
    let reader = app.user("reader").await;
    let author = app.user("author").await;

    assert!(app.follows.follow(reader.id, "author").await.unwrap());
    assert!(!app.follows.follow(reader.id, "author").await.unwrap());
    assert_eq!(app.db.follow_count().await, 1);

    let profile = app
        .feeds
        .profile("author", None, Some(reader.id))
        .await
        .unwrap();
    assert!(profile.following);
    assert_eq!(profile.followers_count, 1);

    assert_eq!(app.follows.unfollow(reader.id, "author").await.unwrap(), 1);
    assert_eq!(app.db.follow_count().await, 0);
    let profile = app
        .feeds
        .profile("author", None, Some(reader.id))
        .await
        .unwrap();
    assert_eq!(profile.author.id, author.id);
    assert!(!profile.following);
    assert_eq!(profile.followers_count, 0);
}

#[tokio::test]
async fn test_self_follow_is_ignored() {
    let app = App::new();
    let user = app.user("narcissus").await;

    assert!(!app.follows.follow(user.id, "narcissus").await.unwrap());
    assert_eq!(app.db.follow_count().await, 0);

    let missing = app.follows.follow(user.id, "ghost").await;
    assert!(matches!(missing, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_follow_feed_contains_only_followed_authors() {
    let app = App::new();
    let reader = app.user("reader").await;
    let stranger = app.user("stranger").await;
    let author = app.user("author").await;

    app.follows.follow(reader.id, "author").await.unwrap();
    let post = app.post(&author, "for followers").await;

    let feed = app.feeds.follow(reader.id, None).await.unwrap();
    assert_eq!(feed.items.len(), 1);
    assert_eq!(feed.items[0].post.id, post.id);

    let feed = app.feeds.follow(stranger.id, None).await.unwrap();
    assert!(feed.items.is_empty());
    assert_eq!(feed.num_pages, 1);
}

#[tokio::test]
async fn test_comments_listed_oldest_first() {
    let app = App::new();
    let author = app.user("leo").await;
    let reader = app.user("mia").await;
    let post = app.post(&author, "discuss").await;

    app.comments.add(reader.id, "leo", post.id, "first").await.unwrap();
    app.comments.add(author.id, "leo", post.id, "second").await.unwrap();

    let detail = app.feeds.post("leo", post.id).await.unwrap();
    let texts: Vec<&str> = detail
        .comments
        .iter()
        .map(|c| c.comment.text.as_str())
        .collect();
    assert_eq!(texts, vec!["first", "second"]);
    assert_eq!(detail.comments[0].author.username, "mia");
    assert_eq!(detail.item.comments_count, 2);

    let empty = app.comments.add(reader.id, "leo", post.id, "  ").await;
    assert!(field_error(empty.unwrap_err(), "text"));

    let missing = app.comments.add(reader.id, "leo", 999, "hello").await;
    assert!(matches!(missing, Err(DomainError::NotFound { .. })));
}

#[tokio::test]
async fn test_pagination_clamps_page_numbers() {
    let app = App::new();
    let author = app.user("leo").await;
    let start = Utc::now();

    for i in 0..13 {
        let mut post = Post::new(author.id, format!("post {i}"), None, None);
        post.pub_date = start + chrono::Duration::seconds(i);
        app.db.posts().save(post).await.unwrap();
    }

    let first = app.feeds.index(None).await.unwrap();
    assert_eq!(first.items.len(), 10);
    assert_eq!(first.num_pages, 2);
    assert_eq!(first.items[0].post.text, "post 12");

    let second = app.feeds.index(Some(2)).await.unwrap();
    assert_eq!(second.items.len(), 3);
    assert_eq!(second.items[2].post.text, "post 0");

    let past_end = app.feeds.index(Some(99)).await.unwrap();
    assert_eq!(past_end.number, 2);

    let below = app.feeds.index(Some(0)).await.unwrap();
    assert_eq!(below.number, 1);

    assert_eq!(app.feeds.index_page_number(Some(i64::MAX)).await.unwrap(), 2);
    assert_eq!(app.feeds.index_page_number(Some(-3)).await.unwrap(), 1);
    assert_eq!(app.feeds.index_page_number(None).await.unwrap(), 1);

    let reader = app.user("reader").await;
    app.follows.follow(reader.id, "leo").await.unwrap();
    let follow = app.feeds.follow(reader.id, Some(3)).await.unwrap();
    assert_eq!(follow.items.len(), 3);
    assert_eq!(follow.num_pages, 3);
}

async fn render_index(feeds: &FeedService) -> Result<String, DomainError> {
    let page = feeds.index(None).await?;
    Ok(page
        .items
        .iter()
        .map(|item| item.post.text.as_str())
        .collect::<Vec<_>>()
        .join(","))
}

#[tokio::test]
async fn test_index_cache_serves_stale_page_until_expiry() {
    let app = App::new();
    let author = app.user("leo").await;
    let cache = PageCache::new(
        Arc::new(InMemoryCache::new()),
        INDEX_CACHE_PREFIX,
        Duration::from_millis(100),
    );

    app.post(&author, "first").await;
    let body = cache.get_or_render("1", || render_index(&app.feeds)).await.unwrap();
    assert_eq!(body, "first");

    app.post(&author, "second").await;
    let cached = cache.get_or_render("1", || render_index(&app.feeds)).await.unwrap();
    assert_eq!(cached, "first");

    tokio::time::sleep(Duration::from_millis(150)).await;
    let fresh = cache.get_or_render("1", || render_index(&app.feeds)).await.unwrap();
    assert!(fresh.contains("second"));
}
