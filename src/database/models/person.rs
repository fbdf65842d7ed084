use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use sqlx::FromRow;
use uuid::Uuid;

use crate::services::cooldown::Cooldowns;

/// A registered member of the group.
#[derive(Debug, Clone, PartialEq)]
pub struct Person {
    pub id: String,
    pub name: String,
    pub chat_id: Option<String>,
    pub tracking_token: Option<String>,
    pub cooldowns: Cooldowns,
    pub created_at: String,
}

#[derive(Debug, FromRow)]
struct PersonRow {
    id: String,
    name: String,
    chat_id: Option<String>,
    tracking_token: Option<String>,
    cooldowns: String,
    created_at: String,
}

impl From<PersonRow> for Person {
    fn from(row: PersonRow) -> Self {
        let cooldowns = cooldowns_from_json(&row.name, &row.cooldowns);
        Person {
            id: row.id,
            name: row.name,
            chat_id: row.chat_id.filter(|c| !c.trim().is_empty()),
            tracking_token: row.tracking_token.filter(|t| !t.trim().is_empty()),
            cooldowns,
            created_at: row.created_at,
        }
    }
}

impl Person {
    pub async fn create(
        pool: &sqlx::SqlitePool,
        name: &str,
        chat_id: Option<String>,
        tracking_token: Option<String>,
    ) -> Result<Self, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            "INSERT INTO people (id, name, chat_id, tracking_token, cooldowns, created_at) VALUES (?, ?, ?, ?, '{}', ?)"
        )
        .bind(&id)
        .bind(name)
        .bind(&chat_id)
        .bind(&tracking_token)
        .bind(&now)
        .execute(pool)
        .await?;

        Self::find_by_name(pool, name)
            .await?
            .ok_or(sqlx::Error::RowNotFound)
    }

    pub async fn find_all(pool: &sqlx::SqlitePool) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, PersonRow>(
            "SELECT id, name, chat_id, tracking_token, cooldowns, created_at FROM people ORDER BY name COLLATE NOCASE"
        )
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(Person::from).collect())
    }

    /// Case-insensitive lookup by display name.
    pub async fn find_by_name(
        pool: &sqlx::SqlitePool,
        name: &str,
    ) -> Result<Option<Self>, sqlx::Error> {
        let row = sqlx::query_as::<_, PersonRow>(
            "SELECT id, name, chat_id, tracking_token, cooldowns, created_at FROM people WHERE name = ? COLLATE NOCASE"
        )
        .bind(name)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(Person::from))
    }

    pub async fn update_cooldowns(
        pool: &sqlx::SqlitePool,
        person_id: &str,
        cooldowns: &Cooldowns,
    ) -> Result<(), sqlx::Error> {
        let result = sqlx::query("UPDATE people SET cooldowns = ? WHERE id = ?")
            .bind(cooldowns_to_json(cooldowns))
            .bind(person_id)
            .execute(pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(sqlx::Error::RowNotFound);
        }

        Ok(())
    }

    pub async fn count(pool: &sqlx::SqlitePool) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM people")
            .fetch_one(pool)
            .await
    }
}

/// Decodes the stored JSON object. Anything unreadable is dropped so the
/// affected requester is treated as having no cooldown.
pub fn cooldowns_from_json(person: &str, raw: &str) -> Cooldowns {
    let map = match serde_json::from_str::<Map<String, Value>>(raw) {
        Ok(map) => map,
        Err(e) => {
            tracing::debug!("Ignoring unreadable cooldowns for {}: {}", person, e);
            return Cooldowns::new();
        }
    };

    map.into_iter()
        .filter_map(|(requester, value)| {
            let expiry = value.as_str().and_then(parse_timestamp);
            if expiry.is_none() {
                tracing::debug!("Ignoring malformed cooldown for {} from {}: {}", person, requester, value);
            }
            expiry.map(|expiry| (requester, expiry))
        })
        .collect()
}

pub fn cooldowns_to_json(cooldowns: &Cooldowns) -> String {
    let map: Map<String, Value> = cooldowns
        .iter()
        .map(|(requester, expiry)| (requester.to_string(), Value::String(expiry.to_rfc3339())))
        .collect();

    Value::Object(map).to_string()
}

/// RFC 3339, or an ISO timestamp without offset which is read as UTC.
fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| Utc.from_utc_datetime(&naive))
}
