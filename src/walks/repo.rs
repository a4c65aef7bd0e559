use anyhow::Context;
use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::walks::repo_types::{ArrondissementCount, NewWalk, Walk, WalkChanges};

/// Persistence operations on walks.
#[async_trait]
pub trait WalkRepo: Send + Sync {
    async fn list(&self) -> anyhow::Result<Vec<Walk>>;
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Walk>>;
    /// Case-insensitive literal substring match on the intro text.
    async fn search_intro(&self, term: &str) -> anyhow::Result<Vec<Walk>>;
    async fn count_by_arrondissement(&self, arrondissement: i32) -> anyhow::Result<i64>;
    async fn summary(&self) -> anyhow::Result<Vec<ArrondissementCount>>;
    async fn create(&self, walk: NewWalk) -> anyhow::Result<Walk>;
    /// Returns `None` when no walk has this id.
    async fn update(&self, id: Uuid, changes: WalkChanges) -> anyhow::Result<Option<Walk>>;
    /// Returns `false` when no walk has this id.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

#[derive(Clone)]
pub struct PgWalkRepo {
    db: PgPool,
}

impl PgWalkRepo {
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }
}

/// Escape LIKE metacharacters so the term only ever matches literally.
pub(crate) fn like_pattern(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len() + 2);
    escaped.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.push('%');
    escaped
}

#[async_trait]
impl WalkRepo for PgWalkRepo {
    async fn list(&self) -> anyhow::Result<Vec<Walk>> {
        let rows = sqlx::query_as::<_, Walk>(
            r#"
            SELECT id, nom, arrondissement, texte_intro, date_publication
            FROM walks
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("list walks")?;
        Ok(rows)
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Walk>> {
        let row = sqlx::query_as::<_, Walk>(
            r#"
            SELECT id, nom, arrondissement, texte_intro, date_publication
            FROM walks
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.db)
        .await
        .context("find walk by id")?;
        Ok(row)
    }

    async fn search_intro(&self, term: &str) -> anyhow::Result<Vec<Walk>> {
        let rows = sqlx::query_as::<_, Walk>(
            r#"
            SELECT id, nom, arrondissement, texte_intro, date_publication
            FROM walks
            WHERE texte_intro ILIKE $1 ESCAPE '\'
            "#,
        )
        .bind(like_pattern(term))
        .fetch_all(&self.db)
        .await
        .context("search walks")?;
        Ok(rows)
    }

    async fn count_by_arrondissement(&self, arrondissement: i32) -> anyhow::Result<i64> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM walks
            WHERE arrondissement = $1
            "#,
        )
        .bind(arrondissement)
        .fetch_one(&self.db)
        .await
        .context("count walks by arrondissement")?;
        Ok(count)
    }

    async fn summary(&self) -> anyhow::Result<Vec<ArrondissementCount>> {
        let rows = sqlx::query_as::<_, ArrondissementCount>(
            r#"
            SELECT arrondissement, COUNT(*) AS count
            FROM walks
            GROUP BY arrondissement
            ORDER BY arrondissement
            "#,
        )
        .fetch_all(&self.db)
        .await
        .context("summarise walks")?;
        Ok(rows)
    }

    async fn create(&self, walk: NewWalk) -> anyhow::Result<Walk> {
        let row = sqlx::query_as::<_, Walk>(
            r#"
            INSERT INTO walks (nom, arrondissement, texte_intro)
            VALUES ($1, $2, $3)
            RETURNING id, nom, arrondissement, texte_intro, date_publication
            "#,
        )
        .bind(walk.name)
        .bind(walk.arrondissement)
        .bind(walk.intro_text)
        .fetch_one(&self.db)
        .await
        .context("insert walk")?;
        Ok(row)
    }

    async fn update(&self, id: Uuid, changes: WalkChanges) -> anyhow::Result<Option<Walk>> {
        let row = sqlx::query_as::<_, Walk>(
            r#"
            UPDATE walks
               SET nom = CASE WHEN $2 THEN $3 ELSE nom END,
                   arrondissement = COALESCE($4, arrondissement),
                   texte_intro = COALESCE($5, texte_intro),
                   date_publication = COALESCE($6, date_publication)
             WHERE id = $1
            RETURNING id, nom, arrondissement, texte_intro, date_publication
            "#,
        )
        .bind(id)
        .bind(changes.name.is_some())
        .bind(changes.name.flatten())
        .bind(changes.arrondissement)
        .bind(changes.intro_text)
        .bind(changes.published_at)
        .fetch_optional(&self.db)
        .await
        .context("update walk")?;
        Ok(row)
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let result = sqlx::query("DELETE FROM walks WHERE id = $1")
            .bind(id)
            .execute(&self.db)
            .await
            .context("delete walk")?;
        Ok(result.rows_affected() > 0)
    }
}
