use crate::core::guard::ScopeLocks;
use crate::core::temporal;
use crate::domain::model::{Department, DepartmentPatch, NO_MANAGER};
use crate::domain::ports::{DataAccess, DeptNoScope, RuleSettings};
use crate::utils::error::{GuardError, Result, Violation};
use chrono::{NaiveDateTime, NaiveTime};

const GLOBAL_SCOPE: &str = "*";

/// `validate_department_update` 的彙整結果
#[derive(Debug, Clone, PartialEq)]
pub struct DepartmentCheck {
    pub errors: Vec<Violation>,
    pub existing: Option<Department>,
}

impl DepartmentCheck {
    fn rejected(errors: Vec<Violation>) -> Self {
        Self {
            errors,
            existing: None,
        }
    }

    pub fn valid(&self) -> bool {
        self.errors.is_empty() && self.existing.is_some()
    }

    pub fn into_result(self) -> Result<Department> {
        match (self.errors.is_empty(), self.existing) {
            (true, Some(existing)) => Ok(existing),
            (true, None) => Err(GuardError::AggregateViolation(vec![
                Violation::DepartmentNotFound,
            ])),
            (false, _) => Err(GuardError::AggregateViolation(self.errors)),
        }
    }
}

fn reject(violation: Violation) -> GuardError {
    tracing::warn!("❌ Rule rejected: {}", violation);
    violation.into()
}

fn clock(time: NaiveTime) -> String {
    time.format("%H:%M").to_string()
}

pub struct ValidationService<D: DataAccess, C: RuleSettings> {
    store: D,
    settings: C,
    locks: ScopeLocks,
}

impl<D: DataAccess, C: RuleSettings> ValidationService<D, C> {
    pub fn new(store: D, settings: C) -> Self {
        Self {
            store,
            settings,
            locks: ScopeLocks::new(),
        }
    }

    pub fn store(&self) -> &D {
        &self.store
    }

    pub fn settings(&self) -> &C {
        &self.settings
    }

    /// 目前仍被持有或等待中的唯一性範圍數
    pub fn active_scopes(&self) -> usize {
        self.locks.scope_count()
    }

    /// 收集所有違反的規則而不提前中斷；找不到部門時才停止後續檢查。
    /// 資料層錯誤會轉成 `Violation::LookupFailed`，此函式不會回傳錯誤。
    pub async fn validate_department_update(&self, patch: &DepartmentPatch) -> DepartmentCheck {
        let (company, dept_id) = match (patch.company(), patch.dept_id()) {
            (Some(company), Some(dept_id)) => (company, dept_id),
            _ => return DepartmentCheck::rejected(vec![Violation::MissingRequiredFields]),
        };

        tracing::debug!("Looking up department {} in {}", dept_id, company);
        let existing = match self.store.get_department(company, dept_id).await {
            Ok(Some(existing)) => existing,
            Ok(None) => return DepartmentCheck::rejected(vec![Violation::DepartmentNotFound]),
            Err(e) => {
                return DepartmentCheck::rejected(vec![Violation::LookupFailed {
                    message: e.to_string(),
                }])
            }
        };

        let mut errors = Vec::new();

        if let Some(dept_no) = patch.dept_no().filter(|no| *no != existing.dept_no) {
            match self.departments_in_scope(company).await {
                Ok(departments) => {
                    let taken = departments.iter().any(|d| {
                        d.dept_no == dept_no && !(d.company == company && d.dept_id == dept_id)
                    });
                    if taken {
                        errors.push(Violation::DuplicateDeptNo {
                            dept_no: dept_no.to_string(),
                        });
                    }
                }
                Err(e) => errors.push(Violation::LookupFailed {
                    message: e.to_string(),
                }),
            }
        }

        if !errors.is_empty() {
            tracing::warn!("❌ Department update rejected with {} error(s)", errors.len());
        }

        DepartmentCheck {
            errors,
            existing: Some(existing),
        }
    }

    async fn departments_in_scope(&self, company: &str) -> Result<Vec<Department>> {
        match self.settings.dept_no_scope() {
            DeptNoScope::Company => self.store.get_all_department(company).await,
            DeptNoScope::Global => {
                let mut all = Vec::new();
                for other in self.store.get_all_companies().await? {
                    all.extend(self.store.get_all_department(&other.name).await?);
                }
                Ok(all)
            }
        }
    }

    fn scope_key<'a>(&self, patch: &'a DepartmentPatch) -> &'a str {
        match self.settings.dept_no_scope() {
            DeptNoScope::Company => patch.company().unwrap_or_default(),
            DeptNoScope::Global => GLOBAL_SCOPE,
        }
    }

    /// 驗證後只套用 patch 提供的欄位，再交給資料層寫入
    pub async fn update_department(&self, patch: &DepartmentPatch) -> Result<Department> {
        let _scope = self.locks.acquire(self.scope_key(patch)).await;

        let existing = self.validate_department_update(patch).await.into_result()?;
        let updated = existing.apply(patch);
        let saved = self.store.update_department(updated).await?;

        tracing::info!(
            "✅ Department {} in {} updated",
            saved.dept_id,
            saved.company
        );
        Ok(saved)
    }

    pub async fn validate_department(&self, company: &str, dept_id: i64) -> Result<()> {
        match self.store.get_department(company, dept_id).await? {
            Some(_) => Ok(()),
            None => Err(reject(Violation::UnknownDepartment {
                company: company.to_string(),
                dept_id,
            })),
        }
    }

    pub async fn validate_manager(&self, mng_id: i64) -> Result<()> {
        if mng_id == NO_MANAGER {
            return Ok(());
        }
        match self.store.get_employee(mng_id).await? {
            Some(_) => Ok(()),
            None => Err(reject(Violation::ManagerNotFound { mng_id })),
        }
    }

    pub fn validate_hire_date(&self, hire_date: &str, now: NaiveDateTime) -> Result<()> {
        let date = temporal::parse_hire_date(hire_date).ok_or_else(|| {
            reject(Violation::InvalidHireDate {
                value: hire_date.to_string(),
            })
        })?;

        if date > now.date() {
            return Err(reject(Violation::HireDateInFuture { date }));
        }
        if temporal::is_weekend(date) {
            return Err(reject(Violation::HireDateOnWeekend { date }));
        }
        Ok(())
    }

    pub async fn validate_employee_number(&self, emp_no: &str) -> Result<()> {
        match self.store.get_employee_by_no(emp_no).await? {
            Some(_) => Err(reject(Violation::DuplicateEmployeeNumber {
                emp_no: emp_no.to_string(),
            })),
            None => Ok(()),
        }
    }

    pub fn validate_start_time(&self, start_time: &str, now: NaiveDateTime) -> Result<()> {
        let start = temporal::parse_timestamp(start_time).ok_or_else(|| {
            reject(Violation::InvalidStartTime {
                value: start_time.to_string(),
            })
        })?;

        if temporal::is_weekend(start.date()) {
            return Err(reject(Violation::StartTimeOnWeekend));
        }

        let (open, close) = (self.settings.business_open(), self.settings.business_close());
        if !temporal::within_business_hours(start.time(), open, close) {
            return Err(reject(Violation::StartTimeOutsideBusinessHours {
                open: clock(open),
                close: clock(close),
            }));
        }

        if !temporal::within_current_week(start, now) {
            return Err(reject(Violation::StartTimeOutsideCurrentWeek));
        }
        Ok(())
    }

    pub fn validate_end_time(&self, start_time: &str, end_time: &str) -> Result<()> {
        let start = temporal::parse_timestamp(start_time).ok_or_else(|| {
            reject(Violation::InvalidStartTime {
                value: start_time.to_string(),
            })
        })?;
        let end = temporal::parse_timestamp(end_time).ok_or_else(|| {
            reject(Violation::InvalidEndTime {
                value: end_time.to_string(),
            })
        })?;

        let elapsed = end - start;
        if elapsed < chrono::Duration::zero() {
            return Err(reject(Violation::EndBeforeStart));
        }
        let minimum = self.settings.min_timecard_duration();
        if elapsed < minimum {
            return Err(reject(Violation::TimecardTooShort {
                minutes: minimum.num_minutes(),
            }));
        }

        if !temporal::same_calendar_day(start, end) {
            return Err(reject(Violation::EndTimeOnDifferentDay));
        }

        let (open, close) = (self.settings.business_open(), self.settings.business_close());
        if !temporal::within_business_hours(end.time(), open, close) {
            return Err(reject(Violation::EndTimeOutsideBusinessHours {
                open: clock(open),
                close: clock(close),
            }));
        }
        Ok(())
    }

    pub async fn validate_no_duplicate_timecard(&self, emp_id: i64, start_time: &str) -> Result<()> {
        let start = temporal::parse_timestamp(start_time).ok_or_else(|| {
            reject(Violation::InvalidStartTime {
                value: start_time.to_string(),
            })
        })?;

        tracing::debug!("Checking existing timecards of employee {}", emp_id);
        let timecards = self.store.get_all_timecard(emp_id).await?;
        if timecards
            .iter()
            .any(|card| temporal::same_calendar_day(card.start_time, start))
        {
            return Err(reject(Violation::DuplicateTimecard { date: start.date() }));
        }
        Ok(())
    }

    pub async fn validate_employee(&self, emp_id: i64) -> Result<()> {
        match self.store.get_employee(emp_id).await? {
            Some(_) => Ok(()),
            None => Err(reject(Violation::EmployeeNotFound { emp_id })),
        }
    }

    /// 新增打卡紀錄前的完整檢查：員工存在、開始/結束時間、同日不重複
    pub async fn validate_new_timecard(
        &self,
        emp_id: i64,
        start_time: &str,
        end_time: &str,
        now: NaiveDateTime,
    ) -> Result<()> {
        self.validate_employee(emp_id).await?;
        self.validate_start_time(start_time, now)?;
        self.validate_end_time(start_time, end_time)?;
        self.validate_no_duplicate_timecard(emp_id, start_time).await
    }
}
