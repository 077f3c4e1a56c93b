//! Project model
//!
//! A product idea tracked from market research, with its stock on hand.

use rusqlite::types::Type;
use rusqlite::{params, Connection, Row};
use serde::{Deserialize, Deserializer, Serialize};

use crate::db::DbResult;

/// Lifecycle state of a project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectStatus {
    #[default]
    Draft,
    Active,
    Archived,
}

impl ProjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProjectStatus::Draft => "draft",
            ProjectStatus::Active => "active",
            ProjectStatus::Archived => "archived",
        }
    }

    /// Parse from string; unknown values are `None`
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "draft" => Some(ProjectStatus::Draft),
            "active" => Some(ProjectStatus::Active),
            "archived" => Some(ProjectStatus::Archived),
            _ => None,
        }
    }
}

/// A stored project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub title: String,
    pub status: ProjectStatus,
    pub demand: String,
    pub competition: String,
    pub profit_estimate: Option<f64>,
    pub tags: Vec<String>,
    pub stock_qty: i64,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

/// Data for creating a new project
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectCreate {
    pub title: String,
    #[serde(default)]
    pub status: ProjectStatus,
    #[serde(default = "default_signal")]
    pub demand: String,
    #[serde(default = "default_signal")]
    pub competition: String,
    pub profit_estimate: Option<f64>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub notes: Option<String>,
}

fn default_signal() -> String {
    "Unknown".to_string()
}

/// Present-but-null becomes `Some(None)`; combined with `#[serde(default)]`
/// an absent field stays `None`.
fn nullable<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Data for updating a project; absent fields are left untouched.
///
/// `profit_estimate` and `notes` are nullable: `Some(None)` clears them.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ProjectUpdate {
    pub title: Option<String>,
    pub status: Option<ProjectStatus>,
    pub demand: Option<String>,
    pub competition: Option<String>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub profit_estimate: Option<Option<f64>>,
    pub tags: Option<Vec<String>>,
    pub stock_qty: Option<i64>,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub notes: Option<Option<String>>,
}

impl Project {
    /// Create a Project from a database row
    fn from_row(row: &Row) -> rusqlite::Result<Self> {
        let status: String = row.get("status")?;
        let tags: String = row.get("tags")?;

        Ok(Self {
            id: row.get("id")?,
            title: row.get("title")?,
            status: ProjectStatus::parse(&status).unwrap_or_default(),
            demand: row.get("demand")?,
            competition: row.get("competition")?,
            profit_estimate: row.get("profit_estimate")?,
            tags: serde_json::from_str(&tags)
                .map_err(|e| rusqlite::Error::FromSqlConversionFailure(0, Type::Text, Box::new(e)))?,
            stock_qty: row.get("stock_qty")?,
            notes: row.get("notes")?,
            created_at: row.get("created_at")?,
            updated_at: row.get("updated_at")?,
        })
    }

    /// Insert a new project into the database
    pub fn create(conn: &Connection, data: &ProjectCreate) -> DbResult<Self> {
        let tags = serde_json::to_string(&data.tags)?;

        conn.execute(
            r#"
            INSERT INTO projects (title, status, demand, competition, profit_estimate, tags, notes)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
            params![
                data.title,
                data.status.as_str(),
                data.demand,
                data.competition,
                data.profit_estimate,
                tags,
                data.notes,
            ],
        )?;

        let id = conn.last_insert_rowid();
        Self::get_by_id(conn, id)?.ok_or_else(|| {
            crate::db::DbError::Sqlite(rusqlite::Error::QueryReturnedNoRows)
        })
    }

    /// Get a project by ID
    pub fn get_by_id(conn: &Connection, id: i64) -> DbResult<Option<Self>> {
        let mut stmt = conn.prepare("SELECT * FROM projects WHERE id = ?1")?;

        let result = stmt.query_row([id], Self::from_row);
        match result {
            Ok(project) => Ok(Some(project)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// List projects, newest first, optionally filtered by status
    pub fn list(
        conn: &Connection,
        status: Option<ProjectStatus>,
        limit: i64,
        offset: i64,
    ) -> DbResult<Vec<Self>> {
        let projects = match status {
            Some(status) => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM projects WHERE status = ?1 ORDER BY created_at DESC, id DESC LIMIT ?2 OFFSET ?3",
                )?;
                let rows = stmt.query_map(params![status.as_str(), limit, offset], Self::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
            None => {
                let mut stmt = conn.prepare(
                    "SELECT * FROM projects ORDER BY created_at DESC, id DESC LIMIT ?1 OFFSET ?2",
                )?;
                let rows = stmt.query_map(params![limit, offset], Self::from_row)?;
                rows.collect::<Result<Vec<_>, _>>()?
            }
        };

        Ok(projects)
    }

    /// Count projects, optionally filtered by status
    pub fn count(conn: &Connection, status: Option<ProjectStatus>) -> DbResult<i64> {
        let count: i64 = match status {
            Some(status) => conn.query_row(
                "SELECT COUNT(*) FROM projects WHERE status = ?1",
                [status.as_str()],
                |row| row.get(0),
            )?,
            None => conn.query_row("SELECT COUNT(*) FROM projects", [], |row| row.get(0))?,
        };
        Ok(count)
    }

    /// Update a project. Returns `None` if it does not exist.
    pub fn update(conn: &Connection, id: i64, data: &ProjectUpdate) -> DbResult<Option<Self>> {
        let mut updates = Vec::new();
        let mut params_vec: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(ref title) = data.title {
            updates.push(format!("title = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(title.clone()));
        }
        if let Some(status) = data.status {
            updates.push(format!("status = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(status.as_str()));
        }
        if let Some(ref demand) = data.demand {
            updates.push(format!("demand = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(demand.clone()));
        }
        if let Some(ref competition) = data.competition {
            updates.push(format!("competition = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(competition.clone()));
        }
        if let Some(profit) = data.profit_estimate {
            updates.push(format!("profit_estimate = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(profit));
        }
        if let Some(ref tags) = data.tags {
            updates.push(format!("tags = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(serde_json::to_string(tags)?));
        }
        if let Some(stock_qty) = data.stock_qty {
            updates.push(format!("stock_qty = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(stock_qty));
        }
        if let Some(ref notes) = data.notes {
            updates.push(format!("notes = ?{}", params_vec.len() + 1));
            params_vec.push(Box::new(notes.clone()));
        }

        if updates.is_empty() {
            return Self::get_by_id(conn, id);
        }

        updates.push("updated_at = datetime('now')".to_string());

        let sql = format!(
            "UPDATE projects SET {} WHERE id = ?{}",
            updates.join(", "),
            params_vec.len() + 1
        );

        params_vec.push(Box::new(id));

        let params_refs: Vec<&dyn rusqlite::ToSql> = params_vec.iter().map(|p| p.as_ref()).collect();
        conn.execute(&sql, params_refs.as_slice())?;

        Self::get_by_id(conn, id)
    }

    /// Add `delta` to the stock quantity. Returns `None` if the project does not exist.
    pub fn adjust_stock(conn: &Connection, id: i64, delta: i64) -> DbResult<Option<Self>> {
        conn.execute(
            "UPDATE projects SET stock_qty = stock_qty + ?1, updated_at = datetime('now') WHERE id = ?2",
            params![delta, id],
        )?;
        Self::get_by_id(conn, id)
    }

    /// Delete a project. Returns `Ok(false)` if it was not found.
    pub fn delete(conn: &Connection, id: i64) -> DbResult<bool> {
        let rows = conn.execute("DELETE FROM projects WHERE id = ?1", [id])?;
        Ok(rows > 0)
    }
}
