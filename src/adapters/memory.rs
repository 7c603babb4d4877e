use crate::domain::model::{Company, Department, Employee, Timecard};
use crate::domain::ports::DataAccess;
use crate::utils::error::{GuardError, Result};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

#[derive(Debug, Default)]
struct Tables {
    companies: Vec<Company>,
    departments: Vec<Department>,
    employees: Vec<Employee>,
    timecards: Vec<Timecard>,
}

/// 以記憶體保存資料的 `DataAccess` 實作
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_company(&self, name: &str) {
        let mut tables = self.tables.write().await;
        if !tables.companies.iter().any(|c| c.name == name) {
            tables.companies.push(Company {
                name: name.to_string(),
            });
        }
    }

    /// 同時登記所屬公司
    pub async fn insert_department(&self, department: Department) {
        self.insert_company(&department.company).await;
        let mut tables = self.tables.write().await;
        tables
            .departments
            .retain(|d| !(d.company == department.company && d.dept_id == department.dept_id));
        tables.departments.push(department);
    }

    pub async fn insert_employee(&self, employee: Employee) {
        let mut tables = self.tables.write().await;
        tables.employees.retain(|e| e.emp_id != employee.emp_id);
        tables.employees.push(employee);
    }

    pub async fn insert_timecard(&self, timecard: Timecard) {
        self.tables.write().await.timecards.push(timecard);
    }
}

#[async_trait]
impl DataAccess for InMemoryStore {
    async fn get_department(&self, company: &str, dept_id: i64) -> Result<Option<Department>> {
        let tables = self.tables.read().await;
        Ok(tables
            .departments
            .iter()
            .find(|d| d.company == company && d.dept_id == dept_id)
            .cloned())
    }

    async fn get_all_department(&self, company: &str) -> Result<Vec<Department>> {
        let tables = self.tables.read().await;
        Ok(tables
            .departments
            .iter()
            .filter(|d| d.company == company)
            .cloned()
            .collect())
    }

    async fn get_all_companies(&self) -> Result<Vec<Company>> {
        Ok(self.tables.read().await.companies.clone())
    }

    async fn update_department(&self, department: Department) -> Result<Department> {
        let mut tables = self.tables.write().await;
        let slot = tables
            .departments
            .iter_mut()
            .find(|d| d.company == department.company && d.dept_id == department.dept_id)
            .ok_or_else(|| GuardError::DataAccessError {
                message: format!(
                    "No department {} in company {}",
                    department.dept_id, department.company
                ),
            })?;

        tracing::debug!("Persisting department {}", department.dept_id);
        *slot = department.clone();
        Ok(department)
    }

    async fn get_employee(&self, emp_id: i64) -> Result<Option<Employee>> {
        let tables = self.tables.read().await;
        Ok(tables.employees.iter().find(|e| e.emp_id == emp_id).cloned())
    }

    async fn get_employee_by_no(&self, emp_no: &str) -> Result<Option<Employee>> {
        let tables = self.tables.read().await;
        Ok(tables.employees.iter().find(|e| e.emp_no == emp_no).cloned())
    }

    async fn get_all_timecard(&self, emp_id: i64) -> Result<Vec<Timecard>> {
        let tables = self.tables.read().await;
        Ok(tables
            .timecards
            .iter()
            .filter(|t| t.emp_id == emp_id)
            .cloned()
            .collect())
    }
}
