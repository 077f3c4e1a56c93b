//! Project operations
//!
//! Validation and pagination on top of the project model.

use serde::Serialize;
use thiserror::Error;

use crate::db::{Database, DbError};
use crate::models::{Project, ProjectCreate, ProjectStatus, ProjectUpdate};

/// Project operation errors
#[derive(Debug, Error)]
pub enum ProjectError {
    #[error("{0}")]
    Invalid(String),

    #[error(transparent)]
    Db(#[from] DbError),
}

pub type ProjectResult<T> = Result<T, ProjectError>;

/// Response for list_projects
#[derive(Debug, Serialize)]
pub struct ListProjectsResponse {
    pub items: Vec<Project>,
    pub total: i64,
    pub limit: i64,
    pub offset: i64,
}

/// Response for a successful delete_project
#[derive(Debug, Serialize)]
pub struct DeleteProjectResponse {
    pub success: bool,
    pub deleted_id: i64,
}

fn clean_title(title: &str) -> ProjectResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ProjectError::Invalid("Project title cannot be empty".to_string()));
    }
    Ok(title.to_string())
}

/// Create a new project
pub fn create_project(db: &Database, mut data: ProjectCreate) -> ProjectResult<Project> {
    data.title = clean_title(&data.title)?;
    data.tags.retain(|t| !t.trim().is_empty());

    let conn = db.get_conn()?;
    Ok(Project::create(&conn, &data)?)
}

/// Get a project by ID
pub fn get_project(db: &Database, id: i64) -> ProjectResult<Option<Project>> {
    let conn = db.get_conn()?;
    Ok(Project::get_by_id(&conn, id)?)
}

/// List projects with optional status filter and pagination
pub fn list_projects(
    db: &Database,
    status: Option<&str>,
    limit: i64,
    offset: i64,
) -> ProjectResult<ListProjectsResponse> {
    let limit = limit.clamp(1, 200);
    let offset = offset.max(0);
    let status = match status {
        Some(s) => Some(
            ProjectStatus::parse(s)
                .ok_or_else(|| ProjectError::Invalid(format!("Unknown project status '{}'", s)))?,
        ),
        None => None,
    };

    let conn = db.get_conn()?;

    let items = Project::list(&conn, status, limit, offset)?;
    let total = Project::count(&conn, status)?;

    Ok(ListProjectsResponse {
        items,
        total,
        limit,
        offset,
    })
}

/// Update a project. `Ok(None)` if it does not exist.
pub fn update_project(db: &Database, id: i64, mut data: ProjectUpdate) -> ProjectResult<Option<Project>> {
    if let Some(ref title) = data.title {
        data.title = Some(clean_title(title)?);
    }
    if matches!(data.stock_qty, Some(qty) if qty < 0) {
        return Err(ProjectError::Invalid("stock_qty cannot be negative".to_string()));
    }

    let conn = db.get_conn()?;
    Ok(Project::update(&conn, id, &data)?)
}

/// Change stock on hand by `delta`. `Ok(None)` if the project does not exist.
pub fn adjust_project_stock(db: &Database, id: i64, delta: i64) -> ProjectResult<Option<Project>> {
    let conn = db.get_conn()?;

    let Some(project) = Project::get_by_id(&conn, id)? else {
        return Ok(None);
    };

    let Some(new_qty) = project.stock_qty.checked_add(delta) else {
        return Err(ProjectError::Invalid(format!(
            "Stock change of {} for '{}' is out of range",
            delta, project.title
        )));
    };

    if new_qty < 0 {
        return Err(ProjectError::Invalid(format!(
            "Not enough stock for '{}'. Need {}, have {}.",
            project.title,
            delta.unsigned_abs(),
            project.stock_qty
        )));
    }

    Ok(Project::adjust_stock(&conn, id, delta)?)
}

/// Delete a project. `Ok(None)` if it does not exist.
pub fn delete_project(db: &Database, id: i64) -> ProjectResult<Option<DeleteProjectResponse>> {
    let conn = db.get_conn()?;

    let deleted = Project::delete(&conn, id)?;
    Ok(deleted.then_some(DeleteProjectResponse {
        success: true,
        deleted_id: id,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::run_migrations;

    fn setup() -> Database {
        let db = Database::in_memory().unwrap();
        db.with_conn(|conn| run_migrations(conn)).unwrap();
        db
    }

    fn create(title: &str) -> ProjectCreate {
        serde_json::from_value(serde_json::json!({ "title": title })).unwrap()
    }

    #[test]
    fn test_create_trims_and_validates_title() {
        let db = setup();
        let project = create_project(&db, create("  Reed Diffuser  ")).unwrap();
        assert_eq!(project.title, "Reed Diffuser");

        let err = create_project(&db, create("   ")).unwrap_err();
        assert!(matches!(err, ProjectError::Invalid(ref msg) if msg.contains("empty")));
    }

    #[test]
    fn test_list_clamps_and_filters() {
        let db = setup();
        for title in ["A", "B", "C"] {
            create_project(&db, create(title)).unwrap();
        }

        let page = list_projects(&db, None, 0, -5).unwrap();
        assert_eq!(page.limit, 1);
        assert_eq!(page.offset, 0);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.total, 3);

        let drafts = list_projects(&db, Some("DRAFT"), 50, 0).unwrap();
        assert_eq!(drafts.total, 3);
        assert!(list_projects(&db, Some("sold"), 50, 0).is_err());
    }

    #[test]
    fn test_update_rejects_bad_values() {
        let db = setup();
        let project = create_project(&db, create("Planter")).unwrap();

        let blank = ProjectUpdate {
            title: Some(" ".to_string()),
            ..Default::default()
        };
        assert!(update_project(&db, project.id, blank).is_err());

        let negative = ProjectUpdate {
            stock_qty: Some(-1),
            ..Default::default()
        };
        assert!(update_project(&db, project.id, negative).is_err());

        assert!(update_project(&db, 404, ProjectUpdate::default()).unwrap().is_none());
    }

    #[test]
    fn test_adjust_stock_guards_underflow() {
        let db = setup();
        let project = create_project(&db, create("Candle")).unwrap();

        let stocked = adjust_project_stock(&db, project.id, 4).unwrap().unwrap();
        assert_eq!(stocked.stock_qty, 4);

        let err = adjust_project_stock(&db, project.id, -5).unwrap_err();
        assert!(err.to_string().contains("Need 5, have 4"));

        assert!(adjust_project_stock(&db, 404, 1).unwrap().is_none());
    }

    #[test]
    fn test_adjust_stock_extreme_deltas() {
        let db = setup();
        let project = create_project(&db, create("Soap")).unwrap();
        adjust_project_stock(&db, project.id, 1).unwrap().unwrap();

        let err = adjust_project_stock(&db, project.id, i64::MAX).unwrap_err();
        assert!(matches!(err, ProjectError::Invalid(ref msg) if msg.contains("out of range")));

        let err = adjust_project_stock(&db, project.id, i64::MIN).unwrap_err();
        assert!(err.to_string().contains("Need 9223372036854775808, have 1"));

        let unchanged = get_project(&db, project.id).unwrap().unwrap();
        assert_eq!(unchanged.stock_qty, 1);
    }

    #[test]
    fn test_delete_project() {
        let db = setup();
        let project = create_project(&db, create("Candle")).unwrap();

        let deleted = delete_project(&db, project.id).unwrap().unwrap();
        assert_eq!(deleted.deleted_id, project.id);
        assert!(delete_project(&db, project.id).unwrap().is_none());
        assert!(get_project(&db, project.id).unwrap().is_none());
    }
}
