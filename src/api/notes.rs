//! Notes (per-user REST resource).

use serde::{Deserialize, Serialize};

use crate::http::{ApiResult, ClientError, MarketClient};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub created_at: String,
    #[serde(default)]
    pub user: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNote {
    pub title: String,
    pub content: String,
}

impl NewNote {
    fn validate(&self) -> ApiResult<()> {
        if self.title.trim().is_empty() {
            return Err(ClientError::InvalidInput("note title must not be blank".into()));
        }
        if self.title.chars().count() > 200 {
            return Err(ClientError::InvalidInput("note title is longer than 200 characters".into()));
        }
        Ok(())
    }
}

impl MarketClient {
    pub async fn notes(&self) -> ApiResult<Vec<Note>> {
        self.get_json("/api/notes/").await
    }

    pub async fn note(&self, id: u64) -> ApiResult<Note> {
        self.get_json(&format!("/api/notes/{id}/")).await
    }

    pub async fn create_note(&self, note: &NewNote) -> ApiResult<Note> {
        note.validate()?;
        self.post_json("/api/notes/", note).await
    }

    pub async fn update_note(&self, id: u64, note: &NewNote) -> ApiResult<Note> {
        note.validate()?;
        self.put_json(&format!("/api/notes/{id}/"), note).await
    }

    pub async fn delete_note(&self, id: u64) -> ApiResult<()> {
        self.delete(&format!("/api/notes/{id}/")).await
    }
}
