//! Paging a SeaORM entity on in-memory SQLite.

#[cfg(all(feature = "sea-orm", feature = "sqlite"))]
mod tests {
    use std::sync::Arc;

    use anyhow::Result;
    use pager_core::Error;
    use pager_db::sea::{filter_to_condition, ColumnMap, SeaSource};
    use pager_db::{Filter, PageError, Pageable, Pager, QueryParameters, SortDirection};
    use sea_orm::entity::prelude::*;
    use sea_orm::{
        ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbBackend, QueryFilter,
        QueryOrder, QueryTrait,
    };

    #[derive(Debug, Clone, PartialEq, Eq, DeriveEntityModel)]
    #[sea_orm(table_name = "articles")]
    pub struct Model {
        #[sea_orm(primary_key, auto_increment = false)]
        pub id: i64,
        pub name: String,
        pub score: i64,
        pub deleted: bool,
        pub author: Option<String>,
    }

    #[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
    pub enum Relation {}

    impl ActiveModelBehavior for ActiveModel {}

    impl Pageable for Model {}

    async fn connect() -> Result<DatabaseConnection> {
        // a single connection keeps the in-memory database alive and shared
        let mut opts = ConnectOptions::new("sqlite::memory:");
        opts.max_connections(1).min_connections(1).sqlx_logging(false);
        let db = Database::connect(opts).await?;

        db.execute_unprepared(
            "CREATE TABLE articles (
                id INTEGER PRIMARY KEY NOT NULL,
                name TEXT NOT NULL,
                score INTEGER NOT NULL,
                deleted BOOLEAN NOT NULL,
                author TEXT
            )",
        )
        .await?;
        db.execute_unprepared(
            "INSERT INTO articles (id, name, score, deleted, author) VALUES
                (1, 'Alpha', 10, 0, 'ann'),
                (2, 'beta', 30, 0, NULL),
                (3, 'Gamma', 20, 0, 'bot'),
                (4, '50% off', 30, 0, 'ann'),
                (5, '5000 off', 20, 0, NULL),
                (6, 'alpha deleted', 40, 1, 'bot')",
        )
        .await?;
        Ok(db)
    }

    async fn pager() -> Result<Pager<SeaSource<Entity, DatabaseConnection>>> {
        let db = connect().await?;
        let source = SeaSource::new(Arc::new(db), ColumnMap::<Entity>::all_columns());
        Ok(Pager::new(source))
    }

    fn ids(items: &[Model]) -> Vec<i64> {
        items.iter().map(|m| m.id).collect()
    }

    #[tokio::test]
    async fn test_default_page_excludes_deleted_rows() -> Result<()> {
        let pager = pager().await?;

        let page = pager.get_page(&QueryParameters::new(), |m| m).await?;

        assert_eq!(page.query.total_count, 5);
        assert_eq!(ids(&page.items), vec![4, 5, 1, 3, 2]);
        Ok(())
    }

    #[tokio::test]
    async fn test_composite_sort_with_primary_key_tiebreak() -> Result<()> {
        let pager = pager().await?;
        let query = QueryParameters::new()
            .with_sort("score|Descending&name|Ascending", SortDirection::Ascending);

        let page = pager.get_page(&query, |m| m).await?;

        assert_eq!(ids(&page.items), vec![4, 2, 5, 3, 1]);
        Ok(())
    }

    #[tokio::test]
    async fn test_window_and_index_correction() -> Result<()> {
        let pager = pager().await?;

        let page = pager
            .get_page(&QueryParameters::new().with_page(1, 2), |m| m.id)
            .await?;
        assert_eq!(page.items, vec![1, 3]);

        let page = pager
            .get_page(&QueryParameters::new().with_page(10, 2), |m| m.id)
            .await?;
        assert_eq!(page.query.page_index, 2);
        assert_eq!(page.items, vec![2]);
        Ok(())
    }

    #[tokio::test]
    async fn test_search_escapes_like_wildcards() -> Result<()> {
        let pager = pager().await?;

        let page = pager
            .get_page(&QueryParameters::new().with_search("50%"), |m| m.id)
            .await?;

        assert_eq!(page.items, vec![4]);
        assert_eq!(page.query.total_count, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_search_is_case_insensitive_and_keeps_baseline() -> Result<()> {
        let pager = pager().await?;

        let page = pager
            .get_page(&QueryParameters::new().with_search("ALPHA"), |m| m.id)
            .await?;

        assert_eq!(page.items, vec![1]);
        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_column_is_request_error() -> Result<()> {
        let pager = pager().await?;
        let query = QueryParameters::new().with_sort("author", SortDirection::Ascending);

        let err = pager.get_page(&query, |m| m).await.unwrap_err();

        assert!(matches!(err, PageError::Request(Error::UnknownField(_))));
        Ok(())
    }

    #[test]
    fn test_column_map_is_case_insensitive() {
        let columns = ColumnMap::<Entity>::new().insert("Title", Column::Name);
        assert!(columns.get("title").is_some());
        assert!(columns.get("TITLE").is_some());
        assert!(columns.get("score").is_none());
        assert!(ColumnMap::<Entity>::all_columns().get("Score").is_some());
    }

    #[test]
    fn test_filter_compiles_to_sql() {
        let filter = Filter::Eq(Column::Deleted, false.into())
            .and(Filter::Contains(Column::Name, "a_b".to_string()).not())
            .or(Filter::Eq(Column::Author, pager_db::Value::Null));

        let sql = Entity::find()
            .filter(filter_to_condition(&filter))
            .build(DbBackend::Sqlite)
            .to_string();

        assert!(sql.contains(r#""author" IS NULL"#), "{sql}");
        assert!(sql.contains(" OR "), "{sql}");
        assert!(sql.contains("NOT "), "{sql}");
        assert!(sql.contains("LOWER("), "{sql}");
        assert!(sql.contains(r"LIKE '%a\_b%' ESCAPE '\'"), "{sql}");
    }

    async fn ids_where(db: &DatabaseConnection, filter: Filter<Column>) -> Result<Vec<i64>> {
        let rows = Entity::find()
            .filter(filter_to_condition(&filter))
            .order_by_asc(Column::Id)
            .all(db)
            .await?;
        Ok(ids(&rows))
    }

    #[tokio::test]
    async fn test_or_not_and_null_conditions_run_on_sqlite() -> Result<()> {
        let db = connect().await?;
        let live = || Filter::Eq(Column::Deleted, false.into());

        let unassigned = live().and(Filter::Eq(Column::Author, pager_db::Value::Null));
        assert_eq!(ids_where(&db, unassigned).await?, vec![2, 5]);

        let either = live().and(
            Filter::Eq(Column::Author, pager_db::Value::Null)
                .or(Filter::Contains(Column::Name, "ALPHA".to_string())),
        );
        assert_eq!(ids_where(&db, either).await?, vec![1, 2, 5]);

        // NULL authors are unknown under NOT, so only 'ann' rows remain
        let not_bot = live().and(Filter::Contains(Column::Author, "bot".to_string()).not());
        assert_eq!(ids_where(&db, not_bot).await?, vec![1, 4]);
        Ok(())
    }
}
