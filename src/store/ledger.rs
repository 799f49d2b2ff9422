use std::path::PathBuf;

use chrono::Utc;
use tracing::{error, info, instrument, warn};

use crate::error::{StoreError, StoreResult};
use crate::model::attendance::AttendancePunch;
use crate::store::directory::EmployeeDirectory;
use crate::utils::flat_file::{FlatFile, Record};

/// What "display attendance" has to show.
#[derive(Debug)]
pub enum AttendanceReport {
    /// Nothing recorded and nobody to record it for.
    NoEmployees,
    NoRecords,
    Punches(Vec<AttendancePunch>),
    /// The file could not be opened. `no_employees` asks for the notice as well.
    Unreadable {
        error: StoreError,
        no_employees: bool,
    },
}

/// Append-only attendance punches, gated by directory membership.
#[derive(Debug)]
pub struct AttendanceLedger {
    file: FlatFile,
}

impl AttendanceLedger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            file: FlatFile::new(path),
        }
    }

    pub fn file(&self) -> &FlatFile {
        &self.file
    }

    /// Punch in `employee_id` at the current wall-clock second.
    pub fn mark_attendance(
        &self,
        employees: &EmployeeDirectory,
        employee_id: &str,
    ) -> StoreResult<AttendancePunch> {
        self.record_punch(employees, employee_id, Utc::now().timestamp())
    }

    #[instrument(skip(self, employees), fields(file = %self.file.label()))]
    pub fn record_punch(
        &self,
        employees: &EmployeeDirectory,
        employee_id: &str,
        timestamp: i64,
    ) -> StoreResult<AttendancePunch> {
        if !employees.contains(employee_id) {
            warn!("Rejected punch for unknown employee");
            return Err(StoreError::UnknownEmployee {
                employee_id: employee_id.to_string(),
            });
        }

        let punch = AttendancePunch::new(employee_id, timestamp);
        self.file.append(&punch).map_err(|e| {
            error!(error = %e, "Failed to mark attendance");
            e
        })?;

        info!("Attendance marked");
        Ok(punch)
    }

    /// All punches in the order they were recorded.
    ///
    /// Only a corrupt record is an `Err`; an unopenable file is reported inside
    /// the report so the caller can show the notice alongside it.
    pub fn list_all(&self, employees: &EmployeeDirectory) -> StoreResult<AttendanceReport> {
        let no_employees = employees.total() == 0;

        let unreadable = |error: StoreError| {
            error!(error = %error, no_employees, "Failed to open attendance");
            AttendanceReport::Unreadable {
                error,
                no_employees,
            }
        };

        match self.file.is_empty() {
            Ok(true) if no_employees => return Ok(AttendanceReport::NoEmployees),
            Ok(true) => return Ok(AttendanceReport::NoRecords),
            Ok(false) => {}
            Err(e) => return Ok(unreadable(e)),
        }

        // metadata can succeed where opening does not
        let punches = match self.file.read_all::<AttendancePunch>() {
            Ok(punches) => punches,
            Err(e) if e.is_io() => return Ok(unreadable(e)),
            Err(e) => {
                error!(error = %e, "Failed to read attendance");
                return Err(e);
            }
        };

        if punches.is_empty() {
            return Ok(AttendanceReport::NoRecords);
        }
        Ok(AttendanceReport::Punches(punches))
    }

    /// Drop every punch, whether or not there were any.
    pub fn clear_all(&self) -> StoreResult<()> {
        self.file.truncate().map_err(|e| {
            error!(error = %e, "Failed to clear attendance");
            e
        })?;

        info!(file = %self.file.label(), "Attendance cleared");
        Ok(())
    }

    /// Drop the punches of one employee, keeping everyone else's in order.
    /// Returns the number removed, which may be zero.
    #[instrument(skip(self), fields(file = %self.file.label()))]
    pub fn clear_for_employee(&self, employee_id: &str) -> StoreResult<usize> {
        let removed = self
            .file
            .retain(|p: &AttendancePunch| p.key() != employee_id)
            .map_err(|e| {
                error!(error = %e, "Failed to clear employee attendance");
                e
            })?;

        info!(removed, "Employee attendance cleared");
        Ok(removed)
    }
}
