use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use org_guard::config::toml_config::RulesConfig;
use org_guard::domain::model::{Employee, Timecard, NO_MANAGER};
use org_guard::utils::logger;
use org_guard::{GuardError, InMemoryStore, ValidationService, Violation};
use std::io::Write;
use tempfile::NamedTempFile;

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(y, m, d)
        .unwrap()
        .and_hms_opt(h, min, 0)
        .unwrap()
}

fn employee(emp_id: i64, mng_id: i64) -> Employee {
    Employee {
        emp_id,
        emp_name: format!("Employee {}", emp_id),
        emp_no: format!("E-{}", emp_id),
        hire_date: NaiveDate::from_ymd_opt(2021, 9, 1).unwrap(),
        job: "Analyst".to_string(),
        salary: 52000.0,
        dept_id: 1,
        mng_id,
    }
}

async fn seeded_store() -> InMemoryStore {
    let store = InMemoryStore::new();
    store.insert_employee(employee(1, NO_MANAGER)).await;
    store.insert_employee(employee(2, 1)).await;
    store
        .insert_timecard(Timecard {
            timecard_id: 100,
            emp_id: 2,
            start_time: at(2024, 3, 4, 8, 0),
            end_time: at(2024, 3, 4, 16, 0),
        })
        .await;
    store
}

fn violation_of(result: org_guard::Result<()>) -> Option<Violation> {
    match result {
        Err(GuardError::SingleViolation(v)) => Some(v),
        _ => None,
    }
}

#[tokio::test]
async fn test_timecard_flow_for_current_week() -> Result<()> {
    let service = ValidationService::new(seeded_store().await, RulesConfig::default());
    // 星期五下午
    let now = at(2024, 3, 8, 17, 30);

    service
        .validate_new_timecard(2, "2024-03-05 08:00:00", "2024-03-05 17:00:00", now)
        .await?;

    assert_eq!(
        violation_of(
            service
                .validate_new_timecard(2, "2024-03-04 13:00:00", "2024-03-04 15:00:00", now)
                .await
        ),
        Some(Violation::DuplicateTimecard {
            date: NaiveDate::from_ymd_opt(2024, 3, 4).unwrap()
        })
    );
    Ok(())
}

#[tokio::test]
async fn test_monday_morning_window_starts_today() -> Result<()> {
    let service = ValidationService::new(seeded_store().await, RulesConfig::default());
    let now = at(2024, 3, 11, 9, 30);

    service.validate_start_time("2024-03-11 08:15:00", now)?;
    assert_eq!(
        violation_of(service.validate_start_time("2024-03-08 10:00:00", now)),
        Some(Violation::StartTimeOutsideCurrentWeek)
    );
    Ok(())
}

#[tokio::test]
async fn test_exactly_one_hour_passes_and_crossing_midnight_fails() -> Result<()> {
    let service = ValidationService::new(seeded_store().await, RulesConfig::default());

    service.validate_end_time("2024-03-05 17:00:00", "2024-03-05 18:00:00")?;
    assert_eq!(
        violation_of(service.validate_end_time("2024-03-05 17:01:00", "2024-03-05 18:00:00")),
        Some(Violation::TimecardTooShort { minutes: 60 })
    );
    assert_eq!(
        violation_of(service.validate_end_time("2024-03-31 17:00:00", "2024-04-01 17:00:00")),
        Some(Violation::EndTimeOnDifferentDay)
    );
    Ok(())
}

#[tokio::test]
async fn test_rules_follow_configured_business_hours() -> Result<()> {
    let mut temp_file = NamedTempFile::new()?;
    temp_file.write_all(
        br#"
[business_hours]
start = "09:00"
end = "17:00"

[timecard]
min_duration_minutes = 30

[logging]
level = "debug"
"#,
    )?;

    let config = RulesConfig::from_file(temp_file.path())?;
    logger::init_logger(&config.logging);
    let service = ValidationService::new(seeded_store().await, config);
    let now = at(2024, 3, 8, 17, 30);

    service.validate_start_time("2024-03-05 09:00:00", now)?;
    service.validate_end_time("2024-03-05 09:00:00", "2024-03-05 09:30:00")?;

    let early = violation_of(service.validate_start_time("2024-03-05 08:30:00", now));
    assert_eq!(
        early,
        Some(Violation::StartTimeOutsideBusinessHours {
            open: "09:00".to_string(),
            close: "17:00".to_string()
        })
    );
    assert_eq!(
        early.map(|v| v.to_string()),
        Some("Start time must be between 09:00 and 17:00".to_string())
    );
    Ok(())
}

#[tokio::test]
async fn test_manager_chain() -> Result<()> {
    let service = ValidationService::new(seeded_store().await, RulesConfig::default());

    service.validate_manager(NO_MANAGER).await?;
    service.validate_manager(1).await?;
    assert_eq!(
        violation_of(service.validate_manager(3).await),
        Some(Violation::ManagerNotFound { mng_id: 3 })
    );
    Ok(())
}
