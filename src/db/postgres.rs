//! Postgres-backed credential store (`member`, `authority`, `member_authority`).

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::FromRow;
use tracing::debug;
use uuid::Uuid;

use super::{CredentialStore, DbPool};
use crate::error::{AppError, AppResult};
use crate::models::{MemberRecord, NewMember};

#[derive(Debug, FromRow)]
struct MemberRow {
    id: Uuid,
    member_name: String,
    password: String,
    nickname: String,
    activated: bool,
    created_at: DateTime<Utc>,
    authorities: Vec<String>,
}

impl From<MemberRow> for MemberRecord {
    fn from(r: MemberRow) -> Self {
        Self {
            id: r.id,
            membername: r.member_name,
            password_hash: r.password,
            nickname: r.nickname,
            activated: r.activated,
            authorities: r.authorities.into_iter().collect(),
            created_at: r.created_at,
        }
    }
}

#[derive(Clone)]
pub struct PgCredentialStore {
    pool: DbPool,
}

impl PgCredentialStore {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialStore {
    async fn find_by_membername(&self, membername: &str) -> AppResult<Option<MemberRecord>> {
        let row = sqlx::query_as::<_, MemberRow>(
            r#"
            SELECT m.member_id AS id, m.member_name, m.password, m.nickname, m.activated, m.created_at,
                   COALESCE(
                       array_agg(ma.authority_name::text) FILTER (WHERE ma.authority_name IS NOT NULL),
                       '{}'::text[]
                   ) AS authorities
            FROM member m
            LEFT JOIN member_authority ma ON ma.member_id = m.member_id
            WHERE m.member_name = $1
            GROUP BY m.member_id
            "#,
        )
        .bind(membername)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.map(MemberRecord::from))
    }

    async fn save(&self, member: NewMember) -> AppResult<MemberRecord> {
        let id = Uuid::new_v4();
        let mut tx = self.pool.begin().await?;

        let created: Option<(DateTime<Utc>,)> = sqlx::query_as(
            r#"
            INSERT INTO member (member_id, member_name, password, nickname, activated)
            VALUES ($1, $2, $3, $4, $5)
            ON CONFLICT (member_name) DO NOTHING
            RETURNING created_at
            "#,
        )
        .bind(id)
        .bind(&member.membername)
        .bind(&member.password_hash)
        .bind(&member.nickname)
        .bind(member.activated)
        .fetch_optional(&mut *tx)
        .await?;
        let (created_at,) = created.ok_or_else(|| {
            AppError::Conflict(format!("Member {} is already registered", member.membername))
        })?;

        for authority in &member.authorities {
            sqlx::query("INSERT INTO authority (authority_name) VALUES ($1) ON CONFLICT DO NOTHING")
                .bind(authority)
                .execute(&mut *tx)
                .await?;
            sqlx::query("INSERT INTO member_authority (member_id, authority_name) VALUES ($1, $2)")
                .bind(id)
                .bind(authority)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        debug!(membername = %member.membername, "member saved");

        Ok(MemberRecord {
            id,
            membername: member.membername,
            password_hash: member.password_hash,
            nickname: member.nickname,
            activated: member.activated,
            authorities: member.authorities,
            created_at,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::ROLE_MEMBER;

    /// Needs a migrated database; skipped unless `TEST_DATABASE_URL` is set.
    #[tokio::test]
    async fn save_then_find_and_reject_duplicate() {
        let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
            eprintln!("Skip postgres store test: set TEST_DATABASE_URL");
            return;
        };
        let pool = match crate::db::create_pool(&url, crate::db::PoolSettings::default()).await
        {
            Ok(p) => p,
            Err(e) => {
                eprintln!("Skip postgres store test: {}", e);
                return;
            }
        };
        let store = PgCredentialStore::new(pool);
        let name = format!("pg{}", &Uuid::new_v4().simple().to_string()[..12]);
        let new = NewMember {
            membername: name.clone(),
            password_hash: "digest".to_string(),
            nickname: "nick".to_string(),
            activated: true,
            authorities: [ROLE_MEMBER.to_string()].into_iter().collect(),
        };

        store.save(new.clone()).await.unwrap();
        let found = store.find_by_membername(&name).await.unwrap().unwrap();
        assert_eq!(found.membername, name);
        assert!(found.authorities.contains(ROLE_MEMBER));
        assert!(matches!(store.save(new).await, Err(AppError::Conflict(_))));
    }
}
