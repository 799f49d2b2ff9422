use std::fmt;

use crate::utils::flat_file::Record;

/// One line of the employee data file: `<id> <name>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeRecord {
    pub id: String,
    pub name: String,
}

impl EmployeeRecord {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for EmployeeRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.id, self.name)
    }
}

impl Record for EmployeeRecord {
    const VALUE_KIND: &'static str = "employee name";

    fn from_tokens(key: &str, value: &str) -> Option<Self> {
        Some(Self::new(key, value))
    }

    fn key(&self) -> &str {
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_as_single_space_separated_line() {
        let rec = EmployeeRecord::new("E1", "Alice");
        assert_eq!(rec.to_string(), "E1 Alice");
        assert_eq!(rec.key(), "E1");
    }
}
