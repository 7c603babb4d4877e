use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Company {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Department {
    pub company: String,
    pub dept_id: i64,
    pub dept_name: String,
    pub dept_no: String,
    pub location: String,
}

/// 部門的部分更新；`None` 或空字串代表「未提供」
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DepartmentPatch {
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub dept_id: Option<i64>,
    #[serde(default)]
    pub dept_name: Option<String>,
    #[serde(default)]
    pub dept_no: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
}

fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl DepartmentPatch {
    /// 0 視同未提供
    pub fn dept_id(&self) -> Option<i64> {
        self.dept_id.filter(|id| *id != 0)
    }

    pub fn company(&self) -> Option<&str> {
        supplied(&self.company)
    }

    pub fn dept_name(&self) -> Option<&str> {
        supplied(&self.dept_name)
    }

    pub fn dept_no(&self) -> Option<&str> {
        supplied(&self.dept_no)
    }

    pub fn location(&self) -> Option<&str> {
        supplied(&self.location)
    }
}

impl Department {
    /// 只套用 patch 中有提供的欄位，其餘保持原值
    pub fn apply(&self, patch: &DepartmentPatch) -> Department {
        Department {
            company: self.company.clone(),
            dept_id: self.dept_id,
            dept_name: patch.dept_name().unwrap_or(self.dept_name.as_str()).to_string(),
            dept_no: patch.dept_no().unwrap_or(self.dept_no.as_str()).to_string(),
            location: patch.location().unwrap_or(self.location.as_str()).to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Employee {
    pub emp_id: i64,
    pub emp_name: String,
    pub emp_no: String,
    pub hire_date: NaiveDate,
    pub job: String,
    pub salary: f64,
    pub dept_id: i64,
    /// 0 表示沒有主管（公司第一位員工）
    pub mng_id: i64,
}

pub const NO_MANAGER: i64 = 0;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Timecard {
    pub timecard_id: i64,
    pub emp_id: i64,
    pub start_time: NaiveDateTime,
    pub end_time: NaiveDateTime,
}
