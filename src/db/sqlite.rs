use crate::db::models::{AccountRecord, NewAccount};
use crate::db::schema::SQLITE_INIT;
use crate::error::RelayError;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions, SqliteRow};
use sqlx::{Pool, Row, Sqlite};
use std::str::FromStr;

pub type SqlitePool = Pool<Sqlite>;

#[derive(Clone)]
pub struct AccountStorage {
    pool: SqlitePool,
}

impl AccountStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `database_url` and run
    /// the schema DDL.
    pub async fn connect(database_url: &str) -> Result<Self, RelayError> {
        let connect_opts =
            SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new().connect_with(connect_opts).await?;
        let storage = Self::new(pool);
        storage.init_schema().await?;
        Ok(storage)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Initialize the schema by executing the bundled DDL.
    pub async fn init_schema(&self) -> Result<(), RelayError> {
        // execute multiple statements safely (SQLite supports multi-commands but sqlx::query doesn't)
        for stmt in SQLITE_INIT.split(';') {
            let s = stmt.trim();
            if s.is_empty() {
                continue;
            }
            sqlx::query(s).execute(&self.pool).await?;
        }
        Ok(())
    }

    /// Look up by mailbox alias. The alias is not structurally unique, so
    /// prefer the most recently created row if duplicates ever appear.
    pub async fn find_by_alias(&self, alias: &str) -> Result<Option<AccountRecord>, RelayError> {
        let row = sqlx::query(
            r#"SELECT id, user_id, email, zmail_address, access_token, refresh_token, created_at
               FROM accounts WHERE zmail_address = ?
               ORDER BY created_at DESC, id DESC LIMIT 1"#,
        )
        .bind(alias)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    pub async fn find_by_id(&self, id: i64) -> Result<Option<AccountRecord>, RelayError> {
        let row = sqlx::query(
            r#"SELECT id, user_id, email, zmail_address, access_token, refresh_token, created_at
               FROM accounts WHERE id = ?"#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.map(Self::row_to_model).transpose()
    }

    /// Insert a new record and return it with its assigned id.
    pub async fn create(&self, account: NewAccount) -> Result<AccountRecord, RelayError> {
        let created_at = Utc::now();
        let result = sqlx::query(
            r#"INSERT INTO accounts (
                user_id, email, zmail_address, access_token, refresh_token, created_at
            ) VALUES (?, ?, ?, ?, ?, ?)"#,
        )
        .bind(&account.user_id)
        .bind(&account.email)
        .bind(&account.zmail_address)
        .bind(&account.access_token)
        .bind(&account.refresh_token)
        .bind(created_at.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(AccountRecord {
            id: result.last_insert_rowid(),
            user_id: account.user_id,
            email: account.email,
            zmail_address: account.zmail_address,
            access_token: account.access_token,
            refresh_token: account.refresh_token,
            created_at,
        })
    }

    /// Overwrite both tokens on the row with the durable `id`. The tokens
    /// always travel together since the provider rotates both on refresh;
    /// `created_at` is left untouched.
    pub async fn update_tokens(
        &self,
        id: i64,
        access_token: &str,
        refresh_token: &str,
    ) -> Result<(), RelayError> {
        let result = sqlx::query(
            "UPDATE accounts SET access_token = ?, refresh_token = ? WHERE id = ?",
        )
        .bind(access_token)
        .bind(refresh_token)
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RelayError::RecordNotFound { id });
        }
        Ok(())
    }

    fn row_to_model(row: SqliteRow) -> Result<AccountRecord, RelayError> {
        let id: i64 = row.try_get("id")?;
        let user_id: String = row.try_get("user_id")?;
        let email: String = row.try_get("email")?;
        let zmail_address: String = row.try_get("zmail_address")?;
        let access_token: String = row.try_get("access_token")?;
        let refresh_token: String = row.try_get("refresh_token")?;
        let created_at_str: String = row.try_get("created_at")?;

        let created_at: DateTime<Utc> = chrono::DateTime::parse_from_rfc3339(&created_at_str)
            .map_err(|e| sqlx::Error::Decode(Box::new(e)))?
            .with_timezone(&Utc);

        Ok(AccountRecord {
            id,
            user_id,
            email,
            zmail_address,
            access_token,
            refresh_token,
            created_at,
        })
    }
}
