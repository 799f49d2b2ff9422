use std::path::PathBuf;

use tracing::{error, info, instrument, warn};

use crate::error::{StoreError, StoreResult};
use crate::model::employee::EmployeeRecord;
use crate::utils::flat_file::{FlatFile, Record};

/// The employee roster: a flat file plus an in-memory snapshot of known IDs.
///
/// The snapshot is built once by [`EmployeeDirectory::load`] and patched by
/// [`add`](Self::add) / [`remove`](Self::remove). Edits made to the file by other
/// programs while this value is alive are not picked up.
#[derive(Debug)]
pub struct EmployeeDirectory {
    file: FlatFile,
    known_ids: Vec<String>,
}

impl EmployeeDirectory {
    /// Read the roster from `path`. An unreadable file is logged and yields an
    /// empty directory; the next [`add`](Self::add) creates it.
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let file = FlatFile::new(path);

        let known_ids = match file.read_all::<EmployeeRecord>() {
            Ok(records) => records.into_iter().map(|r| r.id).collect(),
            Err(e) => {
                error!(error = %e, "Failed to load employee data, starting with no employees");
                Vec::new()
            }
        };

        info!(file = %file.label(), total = known_ids.len(), "Employee directory loaded");
        Self { file, known_ids }
    }

    pub fn file(&self) -> &FlatFile {
        &self.file
    }

    pub fn total(&self) -> usize {
        self.known_ids.len()
    }

    pub fn contains(&self, employee_id: &str) -> bool {
        self.known_ids.iter().any(|id| id == employee_id)
    }

    /// Append an employee. IDs are not checked for uniqueness.
    #[instrument(skip(self), fields(file = %self.file.label()))]
    pub fn add(&mut self, employee_id: &str, name: &str) -> StoreResult<EmployeeRecord> {
        validate_token("employee ID", employee_id)?;
        validate_token("employee name", name)?;

        if self.contains(employee_id) {
            warn!("Adding duplicate employee ID");
        }

        let record = EmployeeRecord::new(employee_id, name);
        self.file.append(&record).map_err(|e| {
            error!(error = %e, "Failed to add employee");
            e
        })?;

        self.known_ids.push(record.id.clone());
        info!(total = self.total(), "Employee added");
        Ok(record)
    }

    /// Drop every record with this ID from the file and the snapshot.
    ///
    /// The file is rewritten even when nothing matches.
    #[instrument(skip(self), fields(file = %self.file.label()))]
    pub fn remove(&mut self, employee_id: &str) -> StoreResult<usize> {
        let removed = self
            .file
            .retain(|r: &EmployeeRecord| r.key() != employee_id)
            .map_err(|e| {
                error!(error = %e, "Failed to remove employee");
                e
            })?;

        if removed == 0 {
            info!("Employee not found");
            return Err(StoreError::EmployeeNotFound {
                employee_id: employee_id.to_string(),
            });
        }

        self.known_ids.retain(|id| id != employee_id);
        info!(removed, total = self.total(), "Employee removed");
        Ok(removed)
    }

    /// Every record on disk, in insertion order. Does not consult the snapshot.
    pub fn list_all(&self) -> StoreResult<Vec<EmployeeRecord>> {
        self.file.read_all()
    }
}

fn validate_token(field: &'static str, value: &str) -> StoreResult<()> {
    if value.is_empty() || value.chars().any(char::is_whitespace) {
        return Err(StoreError::InvalidToken {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn directory(dir: &TempDir) -> EmployeeDirectory {
        EmployeeDirectory::load(dir.path().join("employee_data.txt"))
    }

    #[test]
    fn missing_file_loads_empty() {
        let dir = TempDir::new().unwrap();
        let employees = directory(&dir);

        assert_eq!(employees.total(), 0);
        assert!(!employees.contains("E1"));
    }

    #[test]
    fn load_counts_existing_records_including_duplicates() {
        let dir = TempDir::new().unwrap();
        fs::write(
            dir.path().join("employee_data.txt"),
            "E1 Alice\nE2 Bob\nE1 Alicia\n",
        )
        .unwrap();

        let employees = directory(&dir);

        assert_eq!(employees.total(), 3);
        assert!(employees.contains("E1"));
        assert!(employees.contains("E2"));
    }

    #[test]
    fn load_survives_non_utf8_names() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("employee_data.txt"), b"E1 Alice\nE2 Jos\xe9\n").unwrap();

        let mut employees = directory(&dir);

        assert_eq!(employees.total(), 2);
        assert!(employees.contains("E2"));
        assert_eq!(employees.remove("E1").unwrap(), 1);
        assert_eq!(
            employees.list_all().unwrap(),
            vec![EmployeeRecord::new("E2", "Jos\u{FFFD}")]
        );
    }

    #[test]
    fn added_employees_list_in_call_order() {
        let dir = TempDir::new().unwrap();
        let mut employees = directory(&dir);

        for (id, name) in [("E3", "Carol"), ("E1", "Alice"), ("E2", "Bob")] {
            employees.add(id, name).unwrap();
        }

        let listed = employees.list_all().unwrap();
        assert_eq!(
            listed,
            vec![
                EmployeeRecord::new("E3", "Carol"),
                EmployeeRecord::new("E1", "Alice"),
                EmployeeRecord::new("E2", "Bob"),
            ]
        );
        assert_eq!(employees.total(), 3);
        assert_eq!(
            fs::read_to_string(employees.file().path()).unwrap(),
            "E3 Carol\nE1 Alice\nE2 Bob\n"
        );
    }

    #[test]
    fn add_rejects_names_with_spaces() {
        let dir = TempDir::new().unwrap();
        let mut employees = directory(&dir);

        let err = employees.add("E1", "Alice Smith").unwrap_err();

        assert!(matches!(err, StoreError::InvalidToken { field: "employee name", .. }));
        assert_eq!(employees.total(), 0);
        assert!(!employees.file().path().exists());
    }

    #[test]
    fn failed_append_leaves_snapshot_untouched() {
        let dir = TempDir::new().unwrap();
        // a directory cannot be opened for appending
        let mut employees = EmployeeDirectory::load(dir.path());

        let err = employees.add("E1", "Alice").unwrap_err();

        assert!(err.is_io());
        assert_eq!(employees.total(), 0);
        assert!(!employees.contains("E1"));
    }

    #[test]
    fn remove_deletes_record_and_id() {
        let dir = TempDir::new().unwrap();
        let mut employees = directory(&dir);
        employees.add("E1", "Alice").unwrap();
        employees.add("E2", "Bob").unwrap();

        assert_eq!(employees.remove("E1").unwrap(), 1);

        assert_eq!(employees.total(), 1);
        assert!(!employees.contains("E1"));
        assert_eq!(
            employees.list_all().unwrap(),
            vec![EmployeeRecord::new("E2", "Bob")]
        );
    }

    #[test]
    fn remove_drops_all_duplicates_from_file_and_snapshot() {
        let dir = TempDir::new().unwrap();
        let mut employees = directory(&dir);
        employees.add("E1", "Alice").unwrap();
        employees.add("E2", "Bob").unwrap();
        employees.add("E1", "Alicia").unwrap();

        assert_eq!(employees.remove("E1").unwrap(), 2);

        assert_eq!(employees.total(), 1);
        assert!(!employees.contains("E1"));
        assert_eq!(
            fs::read_to_string(employees.file().path()).unwrap(),
            "E2 Bob\n"
        );
    }

    #[test]
    fn remove_unknown_id_reports_not_found() {
        let dir = TempDir::new().unwrap();
        let mut employees = directory(&dir);
        employees.add("E1", "Alice").unwrap();

        let err = employees.remove("E9").unwrap_err();

        assert!(matches!(err, StoreError::EmployeeNotFound { ref employee_id } if employee_id == "E9"));
        assert_eq!(employees.total(), 1);
        assert_eq!(
            fs::read_to_string(employees.file().path()).unwrap(),
            "E1 Alice\n"
        );
    }

    #[test]
    fn snapshot_does_not_follow_out_of_band_edits() {
        let dir = TempDir::new().unwrap();
        let mut employees = directory(&dir);
        employees.add("E1", "Alice").unwrap();

        fs::write(employees.file().path(), "E5 Eve\n").unwrap();

        assert!(employees.contains("E1"));
        assert!(!employees.contains("E5"));
        assert_eq!(
            employees.list_all().unwrap(),
            vec![EmployeeRecord::new("E5", "Eve")]
        );
    }
}
