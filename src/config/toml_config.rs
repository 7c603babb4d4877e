use crate::domain::ports::{DeptNoScope, RuleSettings};
use crate::utils::error::{GuardError, Result};
use crate::utils::validation::{self, Validate};
use chrono::{Duration, NaiveTime};
use serde::{Deserialize, Serialize};
use std::path::Path;

const DEFAULT_OPEN: (u32, u32) = (8, 0);
const DEFAULT_CLOSE: (u32, u32) = (18, 0);
const DEFAULT_MIN_DURATION_MINUTES: i64 = 60;
const DEFAULT_LOG_LEVEL: &str = "info";
const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RulesConfig {
    #[serde(default)]
    pub business_hours: BusinessHoursConfig,
    #[serde(default)]
    pub timecard: TimecardConfig,
    #[serde(default)]
    pub department: DepartmentConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BusinessHoursConfig {
    #[serde(default, with = "hh_mm", skip_serializing_if = "Option::is_none")]
    pub start: Option<NaiveTime>,
    #[serde(default, with = "hh_mm", skip_serializing_if = "Option::is_none")]
    pub end: Option<NaiveTime>,
}

/// `"HH:MM"` 字串與 `NaiveTime` 互轉；格式錯誤在解析 TOML 時就失敗
mod hh_mm {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S: Serializer>(
        value: &Option<NaiveTime>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(time) => serializer.serialize_str(&time.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<NaiveTime>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        NaiveTime::parse_from_str(&raw, FORMAT).map(Some).map_err(|e| {
            serde::de::Error::custom(format!("expected HH:MM, got '{}' ({})", raw, e))
        })
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TimecardConfig {
    pub min_duration_minutes: Option<i64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DepartmentConfig {
    pub dept_no_scope: Option<DeptNoScope>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    pub json: Option<bool>,
}

impl LoggingConfig {
    pub fn level(&self) -> &str {
        self.level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL)
    }

    pub fn json(&self) -> bool {
        self.json.unwrap_or(false)
    }
}

fn hm(hour_min: (u32, u32)) -> NaiveTime {
    NaiveTime::from_hms_opt(hour_min.0, hour_min.1, 0).unwrap_or(NaiveTime::MIN)
}

impl RulesConfig {
    /// 從 TOML 檔案載入並驗證配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(GuardError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析並驗證配置；不合理的值直接回傳錯誤，不會退回預設值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        let config: Self =
            toml::from_str(&processed_content).map_err(|e| GuardError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// 替換環境變數 (例如 ${OPEN_HOUR})，未設定的變數保持原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        use regex::Regex;
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| GuardError::ConfigValidationError {
            field: "environment".to_string(),
            message: e.to_string(),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    /// 驗證配置的合理性
    pub fn validate_config(&self) -> Result<()> {
        validation::validate_ordered(
            "business_hours",
            self.business_open(),
            self.business_close(),
        )?;

        if let Some(minutes) = self.timecard.min_duration_minutes {
            validation::validate_positive_number("timecard.min_duration_minutes", minutes, 1)?;
        }

        if let Some(level) = &self.logging.level {
            validation::validate_non_empty_string("logging.level", level)?;
            validation::validate_one_of("logging.level", level, &LOG_LEVELS)?;
        }

        Ok(())
    }
}

impl RuleSettings for RulesConfig {
    fn business_open(&self) -> NaiveTime {
        self.business_hours.start.unwrap_or_else(|| hm(DEFAULT_OPEN))
    }

    fn business_close(&self) -> NaiveTime {
        self.business_hours.end.unwrap_or_else(|| hm(DEFAULT_CLOSE))
    }

    fn min_timecard_duration(&self) -> Duration {
        Duration::minutes(
            self.timecard
                .min_duration_minutes
                .unwrap_or(DEFAULT_MIN_DURATION_MINUTES),
        )
    }

    fn dept_no_scope(&self) -> DeptNoScope {
        self.department.dept_no_scope.unwrap_or_default()
    }
}

impl Validate for RulesConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_defaults_without_any_section() {
        let config = RulesConfig::from_toml_str("").unwrap();

        assert_eq!(config.business_open(), hm((8, 0)));
        assert_eq!(config.business_close(), hm((18, 0)));
        assert_eq!(config.min_timecard_duration(), Duration::hours(1));
        assert_eq!(config.dept_no_scope(), DeptNoScope::Company);
        assert_eq!(config.logging.level(), "info");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_full_toml_config() {
        let toml_content = r#"
[business_hours]
start = "07:30"
end = "17:00"

[timecard]
min_duration_minutes = 30

[department]
dept_no_scope = "global"

[logging]
level = "debug"
json = true
"#;

        let config = RulesConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.business_open(), hm((7, 30)));
        assert_eq!(config.business_close(), hm((17, 0)));
        assert_eq!(config.min_timecard_duration(), Duration::minutes(30));
        assert_eq!(config.dept_no_scope(), DeptNoScope::Global);
        assert!(config.logging.json());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("ORG_GUARD_TEST_CLOSE", "16:00");

        let toml_content = r#"
[business_hours]
end = "${ORG_GUARD_TEST_CLOSE}"
"#;

        let config = RulesConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.business_close(), hm((16, 0)));

        std::env::remove_var("ORG_GUARD_TEST_CLOSE");
    }

    #[test]
    fn test_invalid_values_fail_to_load() {
        let invalid = [
            "[business_hours]\nstart = \"18:00\"\nend = \"08:00\"",
            "[business_hours]\nstart = \"8am\"",
            "[business_hours]\nstart = \"8am\"\nend = \"6pm\"",
            "[business_hours]\nend = \"07:00\"",
            "[timecard]\nmin_duration_minutes = 0",
            "[logging]\nlevel = \"chatty\"",
        ];

        for content in invalid {
            assert!(
                RulesConfig::from_toml_str(content).is_err(),
                "accepted: {}",
                content
            );
        }
    }

    #[test]
    fn test_malformed_clock_is_a_parse_error() {
        let result = RulesConfig::from_toml_str("[business_hours]\nstart = \"8am\"");
        assert!(matches!(
            result,
            Err(GuardError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_clock_round_trips_through_toml() {
        let config = RulesConfig::from_toml_str("[business_hours]\nstart = \"07:45\"").unwrap();
        let rendered = toml::to_string(&config).unwrap();

        assert!(rendered.contains("start = \"07:45\""));
        assert_eq!(
            RulesConfig::from_toml_str(&rendered).unwrap().business_open(),
            hm((7, 45))
        );
    }

    #[test]
    fn test_unknown_scope_is_a_parse_error() {
        let result = RulesConfig::from_toml_str(
            r#"
[department]
dept_no_scope = "planet"
"#,
        );
        assert!(matches!(
            result,
            Err(GuardError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[timecard]
min_duration_minutes = 45
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = RulesConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.min_timecard_duration(), Duration::minutes(45));
    }
}
