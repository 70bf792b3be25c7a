//! Employee directory: handles used on the schedule plus aliases used elsewhere.

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{RosterError, RosterResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Employee {
    /// Name written into schedule cells.
    pub handle: String,
    /// Alternative name, e.g. the full name used in surveys.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

pub trait EmployeeDirectory {
    /// Look up an employee by handle or alias.
    fn resolve(&self, name_or_alias: &str) -> Option<&Employee>;

    fn employees(&self) -> &[Employee];

    fn require(&self, name_or_alias: &str) -> RosterResult<&Employee> {
        self.resolve(name_or_alias)
            .ok_or_else(|| RosterError::UnknownEmployee(name_or_alias.to_string()))
    }

    /// True if `name` is exactly a handle (aliases do not count).
    fn is_handle(&self, name: &str) -> bool {
        self.resolve(name).is_some_and(|e| e.handle == name)
    }
}

#[derive(Debug, Default, Deserialize, Serialize)]
struct EmployeeFile {
    #[serde(default, rename = "employee")]
    employees: Vec<Employee>,
}

/// Directory loaded from `employees.toml`:
///
/// ```toml
/// [[employee]]
/// handle = "Andi"
/// alias = "Andreas Muster"
/// ```
#[derive(Debug, Clone, Default)]
pub struct EmployeeList {
    employees: Vec<Employee>,
    index: HashMap<String, usize>,
}

impl EmployeeList {
    pub fn new(employees: Vec<Employee>) -> Self {
        let mut index = HashMap::new();
        for (i, e) in employees.iter().enumerate() {
            index.insert(e.handle.clone(), i);
            if let Some(alias) = &e.alias {
                index.insert(alias.clone(), i);
            }
        }
        EmployeeList { employees, index }
    }

    pub fn load(path: &Path) -> RosterResult<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)?;
        let file: EmployeeFile =
            toml::from_str(&content).map_err(|e| RosterError::Config(e.to_string()))?;
        Ok(EmployeeList::new(file.employees))
    }

    pub fn save(&self, path: &Path) -> RosterResult<()> {
        let file = EmployeeFile { employees: self.employees.clone() };
        let content =
            toml::to_string_pretty(&file).map_err(|e| RosterError::Config(e.to_string()))?;
        crate::fs::write_atomic(path, &content)
    }
}

impl EmployeeDirectory for EmployeeList {
    fn resolve(&self, name_or_alias: &str) -> Option<&Employee> {
        self.index.get(name_or_alias).map(|&i| &self.employees[i])
    }

    fn employees(&self) -> &[Employee] {
        &self.employees
    }
}
