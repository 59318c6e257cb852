//! SQLite-backed catalog storage

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, Utc};
use log::{debug, info};
use rusqlite::types::Type;
use rusqlite::{Connection, OptionalExtension, Row, params};
use uuid::Uuid;

use super::{
    Company, Directory, NewReport, PersistedReport, ReportCatalog, ScannerSetting, SettingUpdate,
    StoreResult, User,
};
use crate::client::BackendKind;
use crate::error::StoreError;

/// Schema version stored in `PRAGMA user_version`
const SCHEMA_VERSION: i32 = 1;

const SCHEMA: &str = r#"
    CREATE TABLE IF NOT EXISTS companies (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL UNIQUE,
        created_at INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY NOT NULL,
        email TEXT NOT NULL UNIQUE,
        name TEXT NOT NULL DEFAULT '',
        company_id TEXT NOT NULL REFERENCES companies(id),
        created_at INTEGER NOT NULL
    );

    CREATE TABLE IF NOT EXISTS scanner_settings (
        company_id TEXT NOT NULL REFERENCES companies(id),
        scanner TEXT NOT NULL,
        scanner_url TEXT NOT NULL DEFAULT '',
        scanner_port INTEGER NOT NULL DEFAULT 0,
        api_key TEXT NOT NULL DEFAULT '',
        updated_at INTEGER NOT NULL,
        PRIMARY KEY (company_id, scanner)
    );

    CREATE TABLE IF NOT EXISTS reports (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        company_id TEXT NOT NULL REFERENCES companies(id),
        download_link TEXT NOT NULL,
        report_type TEXT NOT NULL,
        created_at INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_reports_company_type ON reports(company_id, report_type);
"#;

/// SQLite catalog. The connection is serialized behind a mutex.
pub struct Store {
    conn: Mutex<Connection>,
}

impl Store {
    /// Open or create the catalog at `path`
    pub fn open_at(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| StoreError::Io(format!("Failed to create catalog dir: {}", e)))?;
        }

        Self::init(Connection::open(path)?)
    }

    /// Open a throwaway in-memory catalog
    #[cfg(test)]
    pub fn open_in_memory() -> StoreResult<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> StoreResult<Self> {
        let version: i32 = conn
            .pragma_query_value(None, "user_version", |r| r.get(0))
            .unwrap_or(0);

        if version > SCHEMA_VERSION {
            return Err(StoreError::Database(format!(
                "catalog schema version {} is newer than supported version {}",
                version, SCHEMA_VERSION
            )));
        }

        conn.pragma_update(None, "foreign_keys", true)?;
        conn.execute_batch(SCHEMA)?;
        conn.pragma_update(None, "user_version", SCHEMA_VERSION)?;

        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|_| StoreError::Database("catalog lock poisoned".to_string()))
    }

    /// Find a company by name, creating it if absent
    pub fn get_or_create_company(&self, name: &str) -> StoreResult<Company> {
        let conn = self.conn()?;

        let existing = conn
            .query_row(
                "SELECT id, name FROM companies WHERE name = ?1",
                [name],
                company_from_row,
            )
            .optional()?;
        if let Some(company) = existing {
            return Ok(company);
        }

        let company = Company {
            id: Uuid::new_v4(),
            name: name.to_string(),
        };
        conn.execute(
            "INSERT INTO companies (id, name, created_at) VALUES (?1, ?2, ?3)",
            params![company.id.to_string(), company.name, Utc::now().timestamp()],
        )?;
        info!("Created company {} ({})", company.name, company.id);

        Ok(company)
    }

    /// Look up a company by id
    pub fn company(&self, company_id: Uuid) -> StoreResult<Company> {
        self.conn()?
            .query_row(
                "SELECT id, name FROM companies WHERE id = ?1",
                [company_id.to_string()],
                company_from_row,
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound(format!("company {}", company_id)))
    }

    /// Register a user in a company. An existing email returns the existing user.
    pub fn register_user(&self, email: &str, name: &str, company_id: Uuid) -> StoreResult<User> {
        if let Some(user) = self.user_by_email(email)? {
            info!("User {} already registered", email);
            return Ok(user);
        }

        let user = User {
            id: Uuid::new_v4(),
            email: email.to_string(),
            name: name.to_string(),
            company_id,
        };
        self.conn()?.execute(
            "INSERT INTO users (id, email, name, company_id, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                user.id.to_string(),
                user.email,
                user.name,
                user.company_id.to_string(),
                Utc::now().timestamp()
            ],
        )?;

        Ok(user)
    }

    /// Look up a user by email
    pub fn user_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        Ok(self
            .conn()?
            .query_row(
                "SELECT id, email, name, company_id FROM users WHERE email = ?1",
                [email],
                user_from_row,
            )
            .optional()?)
    }

    /// Create or partially update a company's settings for one scanner.
    ///
    /// Fields left as `None`, empty or zero keep their stored value.
    pub fn upsert_scanner_setting(
        &self,
        company_id: Uuid,
        scanner: BackendKind,
        update: &SettingUpdate,
    ) -> StoreResult<ScannerSetting> {
        let url = update.scanner_url.as_deref().filter(|u| !u.is_empty());
        let port = update.scanner_port.filter(|p| *p != 0);
        let api_key = update.api_key.as_deref().filter(|k| !k.is_empty());

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO scanner_settings
                 (company_id, scanner, scanner_url, scanner_port, api_key, updated_at)
             VALUES (?1, ?2, COALESCE(?3, ''), COALESCE(?4, 0), COALESCE(?5, ''), ?6)
             ON CONFLICT (company_id, scanner) DO UPDATE SET
                 scanner_url = COALESCE(?3, scanner_url),
                 scanner_port = COALESCE(?4, scanner_port),
                 api_key = COALESCE(?5, api_key),
                 updated_at = ?6",
            params![
                company_id.to_string(),
                scanner.tag(),
                url,
                port,
                api_key,
                Utc::now().timestamp()
            ],
        )?;
        debug!("Saved {} settings for company {}", scanner, company_id);

        select_setting(&conn, company_id, scanner)?
            .ok_or_else(|| StoreError::NotFound(format!("{} settings", scanner)))
    }

    /// All scanner settings configured for a company
    pub fn scanner_settings(&self, company_id: Uuid) -> StoreResult<Vec<ScannerSetting>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT company_id, scanner, scanner_url, scanner_port, api_key
             FROM scanner_settings WHERE company_id = ?1 ORDER BY scanner",
        )?;
        let settings = stmt
            .query_map([company_id.to_string()], setting_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(settings)
    }
}

impl Directory for Store {
    fn user(&self, user_id: Uuid) -> StoreResult<User> {
        self.conn()?
            .query_row(
                "SELECT id, email, name, company_id FROM users WHERE id = ?1",
                [user_id.to_string()],
                user_from_row,
            )
            .optional()?
            .ok_or_else(|| StoreError::NotFound(format!("user {}", user_id)))
    }

    fn scanner_setting(
        &self,
        company_id: Uuid,
        scanner: BackendKind,
    ) -> StoreResult<ScannerSetting> {
        select_setting(&*self.conn()?, company_id, scanner)?.ok_or_else(|| {
            StoreError::NotFound(format!(
                "{} settings for company {}. Run `scanvault setting set {}`",
                scanner,
                company_id,
                scanner.tag().to_lowercase()
            ))
        })
    }
}

impl ReportCatalog for Store {
    fn insert_report(&self, report: NewReport) -> StoreResult<PersistedReport> {
        let now = Utc::now();
        let persisted = PersistedReport {
            id: Uuid::new_v4(),
            name: report.name,
            company_id: report.company_id,
            download_link: report.download_link,
            report_type: report.report_type,
            created_at: DateTime::from_timestamp(now.timestamp(), 0).unwrap_or(now),
        };

        self.conn()?.execute(
            "INSERT INTO reports (id, name, company_id, download_link, report_type, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            params![
                persisted.id.to_string(),
                persisted.name,
                persisted.company_id.to_string(),
                persisted.download_link,
                persisted.report_type.tag(),
                persisted.created_at.timestamp()
            ],
        )?;

        Ok(persisted)
    }

    fn list_reports(
        &self,
        company_id: Uuid,
        report_type: BackendKind,
    ) -> StoreResult<Vec<PersistedReport>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, name, company_id, download_link, report_type, created_at
             FROM reports
             WHERE company_id = ?1 AND report_type = ?2
             ORDER BY created_at, rowid",
        )?;
        let reports = stmt
            .query_map(
                params![company_id.to_string(), report_type.tag()],
                report_from_row,
            )?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(reports)
    }
}

fn select_setting(
    conn: &Connection,
    company_id: Uuid,
    scanner: BackendKind,
) -> StoreResult<Option<ScannerSetting>> {
    Ok(conn
        .query_row(
            "SELECT company_id, scanner, scanner_url, scanner_port, api_key
             FROM scanner_settings WHERE company_id = ?1 AND scanner = ?2",
            params![company_id.to_string(), scanner.tag()],
            setting_from_row,
        )
        .optional()?)
}

fn uuid_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

fn backend_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<BackendKind> {
    let raw: String = row.get(idx)?;
    BackendKind::from_tag(&raw).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            idx,
            Type::Text,
            format!("unknown backend tag {}", raw).into(),
        )
    })
}

fn company_from_row(row: &Row<'_>) -> rusqlite::Result<Company> {
    Ok(Company {
        id: uuid_column(row, 0)?,
        name: row.get(1)?,
    })
}

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: uuid_column(row, 0)?,
        email: row.get(1)?,
        name: row.get(2)?,
        company_id: uuid_column(row, 3)?,
    })
}

fn setting_from_row(row: &Row<'_>) -> rusqlite::Result<ScannerSetting> {
    Ok(ScannerSetting {
        company_id: uuid_column(row, 0)?,
        scanner: backend_column(row, 1)?,
        scanner_url: row.get(2)?,
        scanner_port: row.get(3)?,
        api_key: row.get(4)?,
    })
}

fn report_from_row(row: &Row<'_>) -> rusqlite::Result<PersistedReport> {
    let created_at: i64 = row.get(5)?;
    Ok(PersistedReport {
        id: uuid_column(row, 0)?,
        name: row.get(1)?,
        company_id: uuid_column(row, 2)?,
        download_link: row.get(3)?,
        report_type: backend_column(row, 4)?,
        created_at: DateTime::from_timestamp(created_at, 0).unwrap_or_default(),
    })
}
