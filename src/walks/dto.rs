use serde::{Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;

use crate::error::AppError;
use crate::walks::repo_types::{NewWalk, WalkChanges};

pub const MIN_ARRONDISSEMENT: i32 = 1;
pub const MAX_ARRONDISSEMENT: i32 = 20;

/// Request body for `POST /add`.
#[derive(Debug, Deserialize)]
pub struct CreateWalkRequest {
    pub nom: Option<String>,
    pub arrondissement: Option<i32>,
    pub texte_intro: Option<String>,
}

/// Request body for `POST /update-one/:id`. Every field is optional;
/// `"nom": null` clears the name while an absent `nom` keeps it.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateWalkRequest {
    #[serde(default, deserialize_with = "present")]
    pub nom: Option<Option<String>>,
    pub arrondissement: Option<i32>,
    pub texte_intro: Option<String>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub date_publication: Option<OffsetDateTime>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CountResponse {
    pub count: i64,
}

fn present<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

fn check_arrondissement(value: i32) -> Result<i32, AppError> {
    if (MIN_ARRONDISSEMENT..=MAX_ARRONDISSEMENT).contains(&value) {
        Ok(value)
    } else {
        Err(AppError::Validation(format!(
            "arrondissement must be between {MIN_ARRONDISSEMENT} and {MAX_ARRONDISSEMENT}, got {value}"
        )))
    }
}

impl TryFrom<CreateWalkRequest> for NewWalk {
    type Error = AppError;

    fn try_from(req: CreateWalkRequest) -> Result<Self, Self::Error> {
        // zero counts as absent, like an empty intro
        let arrondissement = req
            .arrondissement
            .filter(|a| *a != 0)
            .ok_or(AppError::MissingFields)?;
        let intro_text = req
            .texte_intro
            .filter(|t| !t.trim().is_empty())
            .ok_or(AppError::MissingFields)?;

        Ok(NewWalk {
            name: req.nom,
            arrondissement: check_arrondissement(arrondissement)?,
            intro_text,
        })
    }
}

impl TryFrom<UpdateWalkRequest> for WalkChanges {
    type Error = AppError;

    fn try_from(req: UpdateWalkRequest) -> Result<Self, Self::Error> {
        let arrondissement = req.arrondissement.map(check_arrondissement).transpose()?;
        if matches!(&req.texte_intro, Some(t) if t.trim().is_empty()) {
            return Err(AppError::Validation("texte_intro must not be empty".into()));
        }

        Ok(WalkChanges {
            name: req.nom,
            arrondissement,
            intro_text: req.texte_intro,
            published_at: req.date_publication,
        })
    }
}
