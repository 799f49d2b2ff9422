use derive_more::{Display, Error};
use std::io;

/// Everything that can go wrong while touching the employee or attendance files.
///
/// The `Display` text is what the console shows the user.
#[derive(Debug, Display, Error)]
pub enum StoreError {
    #[display(fmt = "Error opening {} for {}: {}", file, action, source)]
    Io {
        file: String,
        action: &'static str,
        source: io::Error,
    },

    #[display(
        fmt = "Error: Employee ID {} not found. Please enter a valid Employee ID.",
        employee_id
    )]
    UnknownEmployee { employee_id: String },

    #[display(fmt = "Employee ID {} not found.", employee_id)]
    EmployeeNotFound { employee_id: String },

    #[display(fmt = "Invalid {} {:?}: must be a single word without spaces.", field, value)]
    InvalidToken { field: &'static str, value: String },

    #[display(fmt = "Corrupt record #{} in {}: {:?} is not a valid {}", record, file, token, expected)]
    Corrupt {
        file: String,
        record: usize,
        token: String,
        expected: &'static str,
    },
}

impl StoreError {
    pub fn io(file: impl Into<String>, action: &'static str, source: io::Error) -> Self {
        StoreError::Io {
            file: file.into(),
            action,
            source,
        }
    }

    /// File-level failures belong on stderr; the rest are ordinary user feedback.
    pub fn is_io(&self) -> bool {
        matches!(self, StoreError::Io { .. })
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
