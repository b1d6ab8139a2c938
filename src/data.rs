//! JSON interchange for calculator state and computed schedules.
//!
//! Field names follow the calculator's export format (`loanData`,
//! `amortizationEntries`, `paymentRecords`, periods as `"YYYY-MM"`), and
//! schedules are written as nested rows labelled by year and month name.

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::error::ScheduleError;
use crate::loan::AmortizationInput;
use crate::period::YearMonth;
use crate::schedule::{AnnualRow, MonthlyRow};
use crate::summary::ScheduleSummary;

/// Reads an amount the calculator may leave as `null`, which counts as zero.
pub(crate) fn null_as_zero<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.))
}

/// A cleared month field arrives as `""` or `null`; both mean "not set yet".
pub(crate) fn blank_as_none<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<YearMonth>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(s) if !s.trim().is_empty() => s.parse().map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}

pub fn from_json(json: &str) -> Result<AmortizationInput, ScheduleError> {
    Ok(serde_json::from_str(json)?)
}

pub fn to_json(input: &AmortizationInput) -> Result<String, ScheduleError> {
    Ok(serde_json::to_string_pretty(input)?)
}

#[derive(Serialize, Debug, PartialEq)]
#[serde(untagged)]
enum RowTime {
    Year(i32),
    Month(&'static str),
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct RowJson {
    time: RowTime,
    principal: f64,
    additional_principal: f64,
    interest: f64,
    remaining_balance: f64,
    details: Vec<RowJson>,
}

impl From<&MonthlyRow> for RowJson {
    fn from(row: &MonthlyRow) -> Self {
        Self {
            time: RowTime::Month(row.label()),
            principal: row.principal,
            additional_principal: row.additional_principal,
            interest: row.interest,
            remaining_balance: row.remaining_balance,
            details: Vec::new(),
        }
    }
}

impl From<&AnnualRow> for RowJson {
    fn from(row: &AnnualRow) -> Self {
        Self {
            time: RowTime::Year(row.year),
            principal: row.principal,
            additional_principal: row.additional_principal,
            interest: row.interest,
            remaining_balance: row.remaining_balance,
            details: row.details.iter().map(RowJson::from).collect(),
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct SummaryJson {
    total_principal: f64,
    total_interest: f64,
    total_amount_paid: f64,
    years_to_pay_off: usize,
    months_to_pay_off: usize,
    payoff_date: Option<String>,
    final_balance: f64,
}

impl From<&ScheduleSummary> for SummaryJson {
    fn from(summary: &ScheduleSummary) -> Self {
        Self {
            total_principal: summary.total_principal,
            total_interest: summary.total_interest,
            total_amount_paid: summary.total_amount_paid,
            years_to_pay_off: summary.years_to_pay_off,
            months_to_pay_off: summary.months_to_pay_off,
            payoff_date: summary.payoff_period.map(|p| p.to_string()),
            final_balance: summary.final_balance,
        }
    }
}

#[derive(Serialize, Debug)]
#[serde(rename_all = "camelCase")]
struct ReportJson {
    schedule: Vec<RowJson>,
    summary: SummaryJson,
}

/// Serializes schedule rows, annual rows labelled by year and monthly rows by
/// month name.
pub fn schedule_to_json(schedule: &[AnnualRow]) -> Result<String, ScheduleError> {
    let rows = schedule.iter().map(RowJson::from).collect::<Vec<_>>();
    Ok(serde_json::to_string_pretty(&rows)?)
}

/// Schedule rows together with their [`ScheduleSummary`].
pub fn report_to_json(schedule: &[AnnualRow]) -> Result<String, ScheduleError> {
    let report = ReportJson {
        schedule: schedule.iter().map(RowJson::from).collect(),
        summary: SummaryJson::from(&ScheduleSummary::from_schedule(schedule)),
    };
    Ok(serde_json::to_string_pretty(&report)?)
}
