//! Launching a new campaign
//!
//! The form is checked on the client before anything is sent, mirroring
//! the window rules the contract enforces. The check accumulates every
//! problem instead of stopping at the first, so the form can show them
//! all at once.
//!
//! # Checks
//!
//! 1. Every field is filled in
//! 2. The goal is a positive ether amount
//! 3. Both dates parse
//! 4. `start >= now`, `end >= start`, `end <= now + max duration`
//! 5. Both timestamps fit `uint32`

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::Deserialize;
use serde_json::Value;

use crate::boundary::{WriteCall, WriteFunction};
use crate::category::Category;
use crate::config::DappConfig;
use crate::units::{parse_ether, WeiAmount};
use crate::wallet::WalletSession;
use crate::{Error, Result};

/// Raw form input, exactly as typed
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct LaunchForm {
    pub title: String,
    pub description: String,
    /// Funding goal in ether
    pub goal: String,
    pub category: String,
    /// `YYYY-MM-DD`, `YYYY-MM-DDTHH:MM[:SS]`, RFC 3339, or unix seconds
    pub start: String,
    pub end: String,
}

/// Form field a diagnostic refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchField {
    Title,
    Description,
    Goal,
    Category,
    Start,
    End,
}

impl std::fmt::Display for LaunchField {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LaunchField::Title => write!(f, "title"),
            LaunchField::Description => write!(f, "description"),
            LaunchField::Goal => write!(f, "goal"),
            LaunchField::Category => write!(f, "category"),
            LaunchField::Start => write!(f, "start"),
            LaunchField::End => write!(f, "end"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub field: LaunchField,
    pub message: String,
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        let prefix = match self.severity {
            Severity::Error => "error",
            Severity::Warning => "warning",
        };
        write!(f, "{} [{}]: {}", prefix, self.field, self.message)
    }
}

/// Launch arguments that passed every check
#[derive(Debug, Clone, PartialEq)]
pub struct ValidLaunch {
    pub goal: WeiAmount,
    pub start: u32,
    pub end: u32,
}

/// Outcome of [`check_launch`]
#[derive(Debug, Clone, Default)]
pub struct LaunchCheck {
    pub diagnostics: Vec<Diagnostic>,
    valid: Option<ValidLaunch>,
}

impl LaunchCheck {
    /// Returns true if no errors were found (warnings are OK)
    pub fn is_valid(&self) -> bool {
        !self.diagnostics.iter().any(|d| d.severity == Severity::Error)
    }

    pub fn errors(&self) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Error)
            .collect()
    }

    pub fn warnings(&self) -> Vec<&Diagnostic> {
        self.diagnostics
            .iter()
            .filter(|d| d.severity == Severity::Warning)
            .collect()
    }

    /// Converted arguments, present only when the check passed
    pub fn valid(&self) -> Option<&ValidLaunch> {
        self.valid.as_ref()
    }

    fn add_error(&mut self, field: LaunchField, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Error,
            field,
            message: message.into(),
        });
    }

    fn add_warning(&mut self, field: LaunchField, message: impl Into<String>) {
        self.diagnostics.push(Diagnostic {
            severity: Severity::Warning,
            field,
            message: message.into(),
        });
    }
}

// ── Public API ────────────────────────────────────────────

/// Check a launch form at time `now` (unix seconds).
pub fn check_launch(form: &LaunchForm, now: u64, config: &DappConfig) -> LaunchCheck {
    let mut check = LaunchCheck::default();

    for (field, value) in [
        (LaunchField::Title, &form.title),
        (LaunchField::Description, &form.description),
        (LaunchField::Goal, &form.goal),
        (LaunchField::Category, &form.category),
        (LaunchField::Start, &form.start),
        (LaunchField::End, &form.end),
    ] {
        if value.trim().is_empty() {
            check.add_error(field, format!("{} is required", field));
        }
    }

    if !form.category.trim().is_empty() && !Category::parse(&form.category).is_known() {
        check.add_warning(
            LaunchField::Category,
            format!("'{}' is not a listed category", form.category),
        );
    }

    let goal = match parse_ether(&form.goal) {
        Ok(goal) if goal.is_zero() => {
            check.add_error(LaunchField::Goal, "Funding goal must be positive");
            None
        }
        Ok(goal) => Some(goal),
        Err(e) => {
            if !form.goal.trim().is_empty() {
                check.add_error(LaunchField::Goal, e.to_string());
            }
            None
        }
    };

    let start = parse_field_date(&mut check, LaunchField::Start, &form.start);
    let end = parse_field_date(&mut check, LaunchField::End, &form.end);

    let now = i64::try_from(now).unwrap_or(i64::MAX);
    let max_duration = i64::try_from(config.launch_max_duration_secs).unwrap_or(i64::MAX);

    if let Some(start) = start {
        if start < now {
            check.add_error(LaunchField::Start, "Start date must be >= now");
        }
    }
    if let (Some(start), Some(end)) = (start, end) {
        if end < start {
            check.add_error(LaunchField::End, "End date must be >= start date");
        }
    }
    if let Some(end) = end {
        if end > now.saturating_add(max_duration) {
            check.add_error(
                LaunchField::End,
                format!(
                    "End date exceeds max duration ({} days)",
                    config.launch_max_duration_secs / 86_400
                ),
            );
        }
    }

    let start = start.and_then(|s| fit_u32(&mut check, LaunchField::Start, s));
    let end = end.and_then(|e| fit_u32(&mut check, LaunchField::End, e));

    if check.is_valid() {
        if let (Some(goal), Some(start), Some(end)) = (goal, start, end) {
            check.valid = Some(ValidLaunch { goal, start, end });
        }
    }
    check
}

/// Check the form, require a wallet, and build the `launch` call.
///
/// # Errors
/// - `Validation` listing every failed check
/// - `WalletNotConnected` when the form is fine but no wallet is connected
pub fn plan_launch(
    config: &DappConfig,
    wallet: &WalletSession,
    form: &LaunchForm,
    now: u64,
) -> Result<WriteCall> {
    let check = check_launch(form, now, config);
    for warning in check.warnings() {
        tracing::warn!(%warning, "launch form");
    }
    let valid = match check.valid() {
        Some(valid) => valid,
        None => {
            return Err(Error::Validation(
                check.errors().iter().map(|d| d.message.clone()).collect(),
            ))
        }
    };

    wallet.require_connected()?;

    tracing::info!(
        title = %form.title,
        goal = %valid.goal,
        start = valid.start,
        end = valid.end,
        "launch planned"
    );
    Ok(WriteCall {
        contract: config.crowdfunding_address.clone(),
        function: WriteFunction::Launch,
        args: vec![
            Value::String(form.title.clone()),
            Value::String(form.description.clone()),
            Value::String(form.category.clone()),
            Value::String(valid.goal.to_string()),
            Value::from(valid.start),
            Value::from(valid.end),
        ],
    })
}

/// Parse a form date into unix seconds (UTC).
///
/// Accepts `YYYY-MM-DD` (midnight UTC), `YYYY-MM-DDTHH:MM[:SS]` (UTC),
/// RFC 3339 with offset, or plain unix seconds.
pub fn parse_date(text: &str) -> Result<i64> {
    let text = text.trim();
    if !text.is_empty() && text.bytes().all(|b| b.is_ascii_digit()) {
        return text
            .parse::<i64>()
            .map_err(|_| Error::InvalidDate(format!("'{}' is out of range", text)));
    }
    if let Ok(date) = NaiveDate::parse_from_str(text, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(Utc.from_utc_datetime(&midnight).timestamp());
        }
    }
    for format in ["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"] {
        if let Ok(datetime) = NaiveDateTime::parse_from_str(text, format) {
            return Ok(Utc.from_utc_datetime(&datetime).timestamp());
        }
    }
    if let Ok(datetime) = DateTime::parse_from_rfc3339(text) {
        return Ok(datetime.timestamp());
    }
    Err(Error::InvalidDate(format!("'{}' is not a date", text)))
}

// ── Helpers ───────────────────────────────────────────────

fn parse_field_date(check: &mut LaunchCheck, field: LaunchField, text: &str) -> Option<i64> {
    if text.trim().is_empty() {
        return None;
    }
    match parse_date(text) {
        Ok(seconds) => Some(seconds),
        Err(e) => {
            check.add_error(field, e.to_string());
            None
        }
    }
}

fn fit_u32(check: &mut LaunchCheck, field: LaunchField, seconds: i64) -> Option<u32> {
    match u32::try_from(seconds) {
        Ok(v) => Some(v),
        Err(_) => {
            check.add_error(field, "Date value out of uint32 range");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wallet::Address;
    use serde_json::json;

    // 2025-01-01T00:00:00Z
    const NOW: u64 = 1_735_689_600;

    fn form() -> LaunchForm {
        LaunchForm {
            title: "Clean Water".into(),
            description: "Wells for the valley".into(),
            goal: "5000".into(),
            category: "Environment".into(),
            start: "2025-01-02".into(),
            end: "2025-02-01".into(),
        }
    }

    fn wallet() -> WalletSession {
        WalletSession::connected(
            Address::parse("0x1111111111111111111111111111111111111111").unwrap(),
        )
    }

    fn messages(check: &LaunchCheck) -> Vec<String> {
        check.errors().iter().map(|d| d.message.clone()).collect()
    }

    // ── Dates ──────────────────────────────────────────

    #[test]
    fn test_parse_date_formats() {
        assert_eq!(parse_date("2025-01-01").unwrap(), 1_735_689_600);
        assert_eq!(parse_date("2025-01-01T01:00").unwrap(), 1_735_693_200);
        assert_eq!(parse_date("2025-01-01T01:00:30").unwrap(), 1_735_693_230);
        assert_eq!(parse_date("2025-01-01T02:00:00+01:00").unwrap(), 1_735_693_200);
        assert_eq!(parse_date("1735689600").unwrap(), 1_735_689_600);
        assert!(matches!(parse_date("tomorrow"), Err(Error::InvalidDate(_))));
        assert!(matches!(parse_date("2025-13-01"), Err(Error::InvalidDate(_))));
    }

    // ── Checks ─────────────────────────────────────────

    #[test]
    fn test_valid_form() {
        let check = check_launch(&form(), NOW, &DappConfig::default());
        assert!(check.is_valid(), "{:?}", check.diagnostics);
        let valid = check.valid().unwrap();
        assert_eq!(valid.goal.as_str(), "5000000000000000000000");
        assert_eq!(valid.start, 1_735_776_000);
        assert_eq!(valid.end, 1_738_368_000);
    }

    #[test]
    fn test_empty_form_reports_every_field() {
        let check = check_launch(&LaunchForm::default(), NOW, &DappConfig::default());
        assert!(!check.is_valid());
        assert!(check.valid().is_none());
        assert_eq!(check.errors().len(), 6);
        assert!(messages(&check).contains(&"title is required".to_string()));
    }

    #[test]
    fn test_start_in_past() {
        let f = LaunchForm {
            start: "2024-12-31".into(),
            ..form()
        };
        let check = check_launch(&f, NOW, &DappConfig::default());
        assert_eq!(messages(&check), ["Start date must be >= now"]);
    }

    #[test]
    fn test_end_before_start() {
        let f = LaunchForm {
            start: "2025-01-10".into(),
            end: "2025-01-05".into(),
            ..form()
        };
        let check = check_launch(&f, NOW, &DappConfig::default());
        assert_eq!(messages(&check), ["End date must be >= start date"]);
    }

    #[test]
    fn test_end_beyond_max_duration() {
        let f = LaunchForm {
            end: "2025-06-01".into(),
            ..form()
        };
        let check = check_launch(&f, NOW, &DappConfig::default());
        assert_eq!(messages(&check), ["End date exceeds max duration (90 days)"]);
    }

    #[test]
    fn test_uint32_overflow() {
        let config = DappConfig {
            launch_max_duration_secs: u64::MAX,
            ..DappConfig::default()
        };
        let f = LaunchForm {
            end: "2106-03-01".into(),
            ..form()
        };
        let check = check_launch(&f, NOW, &config);
        assert_eq!(messages(&check), ["Date value out of uint32 range"]);
    }

    #[test]
    fn test_goal_problems() {
        let zero = LaunchForm {
            goal: "0".into(),
            ..form()
        };
        assert_eq!(
            messages(&check_launch(&zero, NOW, &DappConfig::default())),
            ["Funding goal must be positive"]
        );
        let junk = LaunchForm {
            goal: "lots".into(),
            ..form()
        };
        let check = check_launch(&junk, NOW, &DappConfig::default());
        assert_eq!(check.errors()[0].field, LaunchField::Goal);
    }

    #[test]
    fn test_unknown_category_is_warning() {
        let f = LaunchForm {
            category: "Gaming".into(),
            ..form()
        };
        let check = check_launch(&f, NOW, &DappConfig::default());
        assert!(check.is_valid());
        assert_eq!(check.warnings().len(), 1);
        assert_eq!(
            check.warnings()[0].to_string(),
            "warning [category]: 'Gaming' is not a listed category"
        );
    }

    // ── Planning ───────────────────────────────────────

    #[test]
    fn test_plan_launch_builds_call() {
        let config = DappConfig::default();
        let call = plan_launch(&config, &wallet(), &form(), NOW).unwrap();
        assert_eq!(call.contract, config.crowdfunding_address);
        assert_eq!(call.function, WriteFunction::Launch);
        assert_eq!(
            call.args,
            vec![
                json!("Clean Water"),
                json!("Wells for the valley"),
                json!("Environment"),
                json!("5000000000000000000000"),
                json!(1_735_776_000u32),
                json!(1_738_368_000u32),
            ]
        );
    }

    #[test]
    fn test_plan_launch_validates_before_wallet() {
        let bad = LaunchForm {
            start: "2024-01-01".into(),
            ..form()
        };
        let err = plan_launch(
            &DappConfig::default(),
            &WalletSession::disconnected(),
            &bad,
            NOW,
        )
        .unwrap_err();
        assert!(matches!(err, Error::Validation(ref m) if m == &["Start date must be >= now"]));
    }

    #[test]
    fn test_plan_launch_requires_wallet() {
        let err = plan_launch(
            &DappConfig::default(),
            &WalletSession::disconnected(),
            &form(),
            NOW,
        )
        .unwrap_err();
        assert!(matches!(err, Error::WalletNotConnected));
    }
}
