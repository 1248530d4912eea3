#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::database::entity::{post, user};
    use crate::database::postgres_repo::{
        PostgresPostRepository, PostgresUserRepository, scope_condition,
    };
    use sea_orm::{DatabaseBackend, EntityTrait, MockDatabase, QueryFilter, QueryTrait, Value};
    use yatube_core::domain::{Post, User};
    use yatube_core::ports::{BaseRepository, FeedScope, PostRepository};

    fn post_model(id: i64, author_id: i64, text: &str) -> post::Model {
        post::Model {
            id,
            text: text.to_owned(),
            pub_date: chrono::Utc::now().into(),
            image: None,
            author_id,
            group_id: None,
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(42, 7, "Test Post")]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = BaseRepository::<Post, i64>::find_by_id(&repo, 42)
            .await
            .unwrap();

        let post = result.unwrap();
        assert_eq!(post.text, "Test Post");
        assert_eq!(post.id, 42);
        assert_eq!(post.author_id, 7);
    }

    #[tokio::test]
    async fn test_save_new_user_returns_generated_id() {
        let now = chrono::Utc::now();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![user::Model {
                id: 1,
                username: "yaloh".to_owned(),
                first_name: String::new(),
                last_name: String::new(),
                password_hash: "hash".to_owned(),
                date_joined: now.into(),
            }]])
            .into_connection();

        let repo = PostgresUserRepository::new(db);
        let user = User::new("yaloh".into(), String::new(), String::new(), "hash".into());
        let saved = BaseRepository::<User, i64>::save(&repo, user).await.unwrap();

        assert_eq!(saved.id, 1);
        assert_eq!(saved.username, "yaloh");
    }

    #[tokio::test]
    async fn test_count_feed() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![BTreeMap::from([(
                "num_items",
                Value::BigInt(Some(12)),
            )])]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        assert_eq!(repo.count(FeedScope::Author(7)).await.unwrap(), 12);
    }

    #[tokio::test]
    async fn test_list_preserves_store_order() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![
                post_model(3, 7, "newest"),
                post_model(1, 7, "oldest"),
            ]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);
        let posts = repo.list(FeedScope::All, 0, 10).await.unwrap();

        let ids: Vec<i64> = posts.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![3, 1]);
    }

    #[test]
    fn test_follow_scope_uses_subquery() {
        let sql = post::Entity::find()
            .filter(scope_condition(FeedScope::FollowedBy(7)))
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains("IN (SELECT"), "{sql}");
        assert!(sql.contains(r#"FROM "follows""#), "{sql}");
    }

    #[test]
    fn test_group_scope_filters_group() {
        let sql = post::Entity::find()
            .filter(scope_condition(FeedScope::Group(3)))
            .build(DatabaseBackend::Postgres)
            .to_string();

        assert!(sql.contains(r#""posts"."group_id" = 3"#), "{sql}");
    }
}
