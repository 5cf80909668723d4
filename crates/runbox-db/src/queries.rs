use crate::Database;
use crate::models::{SnippetMetaRow, SnippetRow, UserProfile, UserRow};
use anyhow::Result;
use rusqlite::{Connection, OptionalExtension};

impl Database {
    // -- Users --

    /// Insert a new user and return the generated id.
    pub fn create_user(
        &self,
        username: &str,
        email: &str,
        password_hash: &str,
        profile: &UserProfile,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO users (username, email, password_hash, age, gender, job_role, institution, phone)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                rusqlite::params![
                    username,
                    email,
                    password_hash,
                    profile.age,
                    profile.gender,
                    profile.job_role,
                    profile.institution,
                    profile.phone,
                ],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    pub fn get_user_by_email(&self, email: &str) -> Result<Option<UserRow>> {
        self.with_conn(|conn| query_user_by_email(conn, email))
    }

    // -- Snippets --

    /// Insert a saved snippet and return the generated id. Each save is a
    /// fresh row; snippets are never updated in place.
    pub fn insert_snippet(
        &self,
        user_id: i64,
        filename: &str,
        language: &str,
        code: &str,
    ) -> Result<i64> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO codes (user_id, filename, language, code) VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![user_id, filename, language, code],
            )?;
            Ok(conn.last_insert_rowid())
        })
    }

    /// Metadata for all of a user's snippets, newest first.
    pub fn list_snippets_by_owner(&self, user_id: i64) -> Result<Vec<SnippetMetaRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, filename, language, created_at FROM codes
                 WHERE user_id = ?1
                 ORDER BY created_at DESC, id DESC",
            )?;

            let rows = stmt
                .query_map([user_id], |row| {
                    Ok(SnippetMetaRow {
                        id: row.get(0)?,
                        filename: row.get(1)?,
                        language: row.get(2)?,
                        created_at: row.get(3)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;

            Ok(rows)
        })
    }

    /// Full snippet by id, filtered on the owner. A snippet that exists
    /// but belongs to someone else looks exactly like one that doesn't
    /// exist.
    pub fn get_snippet(&self, user_id: i64, id: i64) -> Result<Option<SnippetRow>> {
        self.with_conn(|conn| {
            let row = conn
                .query_row(
                    "SELECT id, user_id, filename, language, code, created_at FROM codes
                     WHERE id = ?1 AND user_id = ?2",
                    [id, user_id],
                    |row| {
                        Ok(SnippetRow {
                            id: row.get(0)?,
                            user_id: row.get(1)?,
                            filename: row.get(2)?,
                            language: row.get(3)?,
                            code: row.get(4)?,
                            created_at: row.get(5)?,
                        })
                    },
                )
                .optional()?;

            Ok(row)
        })
    }

    // -- Liveness --

    /// Current database time, used by the /ping probe.
    pub fn db_time(&self) -> Result<String> {
        self.with_conn(|conn| {
            let now: String =
                conn.query_row("SELECT datetime('now')", [], |row| row.get(0))?;
            Ok(now)
        })
    }
}

fn query_user_by_email(conn: &Connection, email: &str) -> Result<Option<UserRow>> {
    let mut stmt = conn.prepare(
        "SELECT id, username, email, password_hash, created_at FROM users WHERE email = ?1",
    )?;

    let row = stmt
        .query_row([email], |row| {
            Ok(UserRow {
                id: row.get(0)?,
                username: row.get(1)?,
                email: row.get(2)?,
                password_hash: row.get(3)?,
                created_at: row.get(4)?,
            })
        })
        .optional()?;

    Ok(row)
}
