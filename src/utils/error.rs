use chrono::NaiveDate;
use thiserror::Error;

/// 單一業務規則的違反，訊息可直接顯示給使用者
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    #[error("dept_id and company are required")]
    MissingRequiredFields,

    #[error("Department not found")]
    DepartmentNotFound,

    #[error("Department {dept_id} does not exist in company {company}")]
    UnknownDepartment { company: String, dept_id: i64 },

    #[error("Department number {dept_no} is already in use")]
    DuplicateDeptNo { dept_no: String },

    #[error("Department lookup failed: {message}")]
    LookupFailed { message: String },

    #[error("Manager {mng_id} does not exist")]
    ManagerNotFound { mng_id: i64 },

    #[error("Employee {emp_id} does not exist")]
    EmployeeNotFound { emp_id: i64 },

    #[error("Employee number {emp_no} already exists")]
    DuplicateEmployeeNumber { emp_no: String },

    #[error("Invalid hire date '{value}', expected YYYY-MM-DD")]
    InvalidHireDate { value: String },

    #[error("Hire date {date} is in the future")]
    HireDateInFuture { date: NaiveDate },

    #[error("Hire date {date} falls on a weekend")]
    HireDateOnWeekend { date: NaiveDate },

    #[error("Invalid start time '{value}'")]
    InvalidStartTime { value: String },

    #[error("Start time falls on a weekend")]
    StartTimeOnWeekend,

    #[error("Start time must be between {open} and {close}")]
    StartTimeOutsideBusinessHours { open: String, close: String },

    #[error("Start time must be between Monday of the current week and now")]
    StartTimeOutsideCurrentWeek,

    #[error("Invalid end time '{value}'")]
    InvalidEndTime { value: String },

    #[error("End time is before start time")]
    EndBeforeStart,

    #[error("Timecard must be at least {minutes} minutes long")]
    TimecardTooShort { minutes: i64 },

    #[error("Start time and end time must be on the same day")]
    EndTimeOnDifferentDay,

    #[error("End time must be between {open} and {close}")]
    EndTimeOutsideBusinessHours { open: String, close: String },

    #[error("A timecard already exists for {date}")]
    DuplicateTimecard { date: NaiveDate },
}

#[derive(Error, Debug)]
pub enum GuardError {
    #[error("{0}")]
    SingleViolation(Violation),

    #[error("{}", join_messages(.0))]
    AggregateViolation(Vec<Violation>),

    #[error("Data access error: {message}")]
    DataAccessError { message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

fn join_messages(violations: &[Violation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

impl From<Violation> for GuardError {
    fn from(violation: Violation) -> Self {
        GuardError::SingleViolation(violation)
    }
}

impl GuardError {
    /// 業務規則失敗（相對於基礎設施錯誤）
    pub fn is_violation(&self) -> bool {
        matches!(
            self,
            GuardError::SingleViolation(_) | GuardError::AggregateViolation(_)
        )
    }

    pub fn violations(&self) -> &[Violation] {
        match self {
            GuardError::SingleViolation(v) => std::slice::from_ref(v),
            GuardError::AggregateViolation(vs) => vs,
            _ => &[],
        }
    }
}

pub type Result<T> = std::result::Result<T, GuardError>;
