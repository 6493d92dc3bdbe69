use anyhow::Result;
use sea_orm::{
    ActiveValue, DatabaseConnection, EntityTrait, sea_query::OnConflict,
};

use crate::entities::{prelude::*, saved_states};

/// Key/value access to the `saved_states` table
#[derive(Clone)]
pub struct StateRepository {
    db: DatabaseConnection,
}

impl StateRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    pub async fn find_payload(&self, key: &str) -> Result<Option<String>> {
        let model = SavedStates::find_by_id(key.to_string()).one(&self.db).await?;
        Ok(model.map(|m| m.payload))
    }

    /// Insert or overwrite the payload stored under `key`.
    pub async fn save_payload(&self, key: &str, payload: String) -> Result<()> {
        let model = saved_states::ActiveModel {
            key: ActiveValue::Set(key.to_string()),
            payload: ActiveValue::Set(payload),
            updated_at: ActiveValue::Set(chrono::Utc::now().into()),
        };

        SavedStates::insert(model)
            .on_conflict(
                OnConflict::column(saved_states::Column::Key)
                    .update_columns([
                        saved_states::Column::Payload,
                        saved_states::Column::UpdatedAt,
                    ])
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;
        Ok(())
    }

    /// Returns whether a row was removed.
    pub async fn delete(&self, key: &str) -> Result<bool> {
        let result = SavedStates::delete_by_id(key.to_string())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }
}
