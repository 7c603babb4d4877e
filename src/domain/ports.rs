use crate::domain::model::{Company, Department, Employee, Timecard};
use crate::utils::error::Result;
use async_trait::async_trait;
use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};

/// 資料層介面：查詢回傳 `None` 表示找不到，`Err` 表示資料層本身失敗
#[async_trait]
pub trait DataAccess: Send + Sync {
    async fn get_department(&self, company: &str, dept_id: i64) -> Result<Option<Department>>;
    async fn get_all_department(&self, company: &str) -> Result<Vec<Department>>;
    async fn get_all_companies(&self) -> Result<Vec<Company>>;
    async fn update_department(&self, department: Department) -> Result<Department>;
    async fn get_employee(&self, emp_id: i64) -> Result<Option<Employee>>;
    async fn get_employee_by_no(&self, emp_no: &str) -> Result<Option<Employee>>;
    async fn get_all_timecard(&self, emp_id: i64) -> Result<Vec<Timecard>>;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeptNoScope {
    /// 只比對同一公司的部門
    #[default]
    Company,
    /// 比對所有公司的部門
    Global,
}

pub trait RuleSettings: Send + Sync {
    fn business_open(&self) -> NaiveTime;
    fn business_close(&self) -> NaiveTime;
    fn min_timecard_duration(&self) -> Duration;
    fn dept_no_scope(&self) -> DeptNoScope;
}
