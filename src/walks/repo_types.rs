use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Walk record in the database.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Walk {
    #[serde(rename = "_id")]
    pub id: Uuid,
    #[serde(rename = "nom")]
    #[sqlx(rename = "nom")]
    pub name: Option<String>,
    pub arrondissement: i32,
    #[serde(rename = "texte_intro")]
    #[sqlx(rename = "texte_intro")]
    pub intro_text: String,
    #[serde(rename = "date_publication", with = "time::serde::rfc3339")]
    #[sqlx(rename = "date_publication")]
    pub published_at: OffsetDateTime,
}

/// Number of walks sharing one arrondissement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ArrondissementCount {
    #[serde(rename = "_id")]
    pub arrondissement: i32,
    pub count: i64,
}

/// Validated input for a new walk.
#[derive(Debug, Clone)]
pub struct NewWalk {
    pub name: Option<String>,
    pub arrondissement: i32,
    pub intro_text: String,
}

/// Fields to merge into an existing walk; `None` keeps the stored value.
/// `name: Some(None)` clears the name.
#[derive(Debug, Clone, Default)]
pub struct WalkChanges {
    pub name: Option<Option<String>>,
    pub arrondissement: Option<i32>,
    pub intro_text: Option<String>,
    pub published_at: Option<OffsetDateTime>,
}
