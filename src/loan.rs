use log::debug;
use std::fmt;

use crate::error::ScheduleError;
use crate::period::YearMonth;

/// Term used when a loan doesn't specify one: 30 years.
pub const DEFAULT_TERM_MONTHS: u32 = 360;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "lowercase")
)]
pub enum TermUnit {
    #[default]
    Years,
    Months,
}

impl fmt::Display for TermUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TermUnit::Years => write!(f, "years"),
            TermUnit::Months => write!(f, "months"),
        }
    }
}

/// Loan terms as supplied by the form provider.
///
/// The four `Option` fields are required before a schedule can be computed;
/// [`LoanParameters::resolve`] reports which ones are still unset.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoanParameters {
    #[cfg_attr(feature = "serde", serde(rename = "loanAmount"))]
    pub principal_amount: Option<f64>,
    #[cfg_attr(feature = "serde", serde(rename = "rate"))]
    pub annual_rate_percent: Option<f64>,
    #[cfg_attr(feature = "serde", serde(rename = "totalMonthlyPayment"))]
    pub total_monthly_payment: Option<f64>,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "escrow", default, deserialize_with = "crate::data::null_as_zero")
    )]
    pub escrow_monthly_amount: f64,
    #[cfg_attr(
        feature = "serde",
        serde(
            rename = "additionalPrincipal",
            default,
            deserialize_with = "crate::data::null_as_zero"
        )
    )]
    pub recurring_additional_principal: f64,
    #[cfg_attr(
        feature = "serde",
        serde(rename = "startDate", default, deserialize_with = "crate::data::blank_as_none")
    )]
    pub start_period: Option<YearMonth>,
    #[cfg_attr(feature = "serde", serde(rename = "loanTermsTime"))]
    pub term_value: Option<u32>,
    #[cfg_attr(feature = "serde", serde(rename = "loanTermsType"))]
    pub term_unit: Option<TermUnit>,
}

impl LoanParameters {
    pub fn new(
        principal_amount: f64,
        annual_rate_percent: f64,
        total_monthly_payment: f64,
        start_period: YearMonth,
    ) -> Self {
        Self {
            principal_amount: Some(principal_amount),
            annual_rate_percent: Some(annual_rate_percent),
            total_monthly_payment: Some(total_monthly_payment),
            start_period: Some(start_period),
            ..Default::default()
        }
    }

    pub fn with_escrow(mut self, escrow_monthly_amount: f64) -> Self {
        self.escrow_monthly_amount = escrow_monthly_amount;
        self
    }

    pub fn with_additional_principal(mut self, recurring_additional_principal: f64) -> Self {
        self.recurring_additional_principal = recurring_additional_principal;
        self
    }

    pub fn with_term(mut self, value: u32, unit: TermUnit) -> Self {
        self.term_value = Some(value);
        self.term_unit = Some(unit);
        self
    }

    /// Term length in months. A value without a unit is read as years; no
    /// value at all falls back to [`DEFAULT_TERM_MONTHS`].
    pub fn term_length_months(&self) -> Result<u32, ScheduleError> {
        match (self.term_value, self.term_unit) {
            (None, _) => Ok(DEFAULT_TERM_MONTHS),
            (Some(0), _) => Err(ScheduleError::InvalidParameter {
                field: "termLengthMonths",
                reason: "must be greater than zero".to_string(),
            }),
            (Some(months), Some(TermUnit::Months)) => Ok(months),
            (Some(years), _) => years
                .checked_mul(12)
                .ok_or_else(|| ScheduleError::InvalidParameter {
                    field: "termLengthMonths",
                    reason: format!("{} years overflows the month count", years),
                }),
        }
    }

    /// Checks that every required field is present and sane.
    pub fn resolve(&self) -> Result<LoanTerms, ScheduleError> {
        let (principal_amount, annual_rate_percent, total_monthly_payment, start_period) = match (
            self.principal_amount,
            self.annual_rate_percent,
            self.total_monthly_payment,
            self.start_period,
        ) {
            (Some(p), Some(r), Some(t), Some(s)) => (p, r, t, s),
            _ => {
                let missing = [
                    ("principalAmount", self.principal_amount.is_none()),
                    ("annualRatePercent", self.annual_rate_percent.is_none()),
                    ("totalMonthlyPayment", self.total_monthly_payment.is_none()),
                    ("startPeriod", self.start_period.is_none()),
                ]
                .into_iter()
                .filter_map(|(field, absent)| absent.then_some(field))
                .collect::<Vec<_>>();
                debug!("loan parameters not ready, missing {:?}", missing);
                return Err(ScheduleError::IncompleteInput { missing });
            }
        };

        let terms = LoanTerms {
            principal_amount: check_amount("principalAmount", principal_amount)?,
            annual_rate_percent: check_amount("annualRatePercent", annual_rate_percent)?,
            total_monthly_payment: check_amount("totalMonthlyPayment", total_monthly_payment)?,
            escrow_monthly_amount: check_amount("escrowMonthlyAmount", self.escrow_monthly_amount)?,
            recurring_additional_principal: check_amount(
                "recurringAdditionalPrincipal",
                self.recurring_additional_principal,
            )?,
            start_period,
            term_length_months: self.term_length_months()?,
        };
        Ok(terms)
    }
}

fn check_amount(field: &'static str, value: f64) -> Result<f64, ScheduleError> {
    if !value.is_finite() {
        Err(ScheduleError::InvalidParameter {
            field,
            reason: format!("{} is not a finite number", value),
        })
    } else if value < 0. {
        Err(ScheduleError::InvalidParameter {
            field,
            reason: format!("{} is negative", value),
        })
    } else {
        Ok(value)
    }
}

/// Fully resolved loan terms, the form the engine computes from.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct LoanTerms {
    pub principal_amount: f64,
    pub annual_rate_percent: f64,
    pub total_monthly_payment: f64,
    pub escrow_monthly_amount: f64,
    pub recurring_additional_principal: f64,
    pub start_period: YearMonth,
    pub term_length_months: u32,
}

impl LoanTerms {
    /// Nominal monthly rate as a decimal (7% annual -> 0.07 / 12).
    pub fn monthly_rate(&self) -> f64 {
        self.annual_rate_percent / 100. / 12.
    }

    /// Part of the contractual payment that goes to principal and interest.
    pub fn principal_and_interest_payment(&self) -> f64 {
        self.total_monthly_payment - self.escrow_monthly_amount
    }
}

impl fmt::Display for LoanTerms {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "principal ${:.2}, rate {}%, payment ${:.2} (escrow ${:.2}), additional principal ${:.2}, start {}, term {} months",
            self.principal_amount,
            self.annual_rate_percent,
            self.total_monthly_payment,
            self.escrow_monthly_amount,
            self.recurring_additional_principal,
            self.start_period,
            self.term_length_months
        )
    }
}

/// One-off additional principal payment for a given month.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LumpSumEntry {
    pub amount: f64,
    #[cfg_attr(feature = "serde", serde(rename = "date"))]
    pub period: YearMonth,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub id: Option<String>,
}

impl LumpSumEntry {
    pub fn new(amount: f64, period: YearMonth) -> Self {
        Self {
            amount,
            period,
            id: None,
        }
    }
}

/// Actual payment recorded for a month. Its interest replaces the computed
/// interest and its additional principal is added to that month's extras.
#[derive(Clone, PartialEq, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "camelCase")
)]
pub struct PaymentOverrideRecord {
    #[cfg_attr(feature = "serde", serde(rename = "date"))]
    pub period: YearMonth,
    #[cfg_attr(feature = "serde", serde(default))]
    pub principal: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub additional_principal: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub interest: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub escrow: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub additional_escrow: f64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub fees_and_charges: f64,
}

impl PaymentOverrideRecord {
    pub fn new(period: YearMonth, interest: f64, additional_principal: f64) -> Self {
        Self {
            period,
            principal: 0.,
            additional_principal,
            interest,
            escrow: 0.,
            additional_escrow: 0.,
            fees_and_charges: 0.,
        }
    }

    /// Everything paid in this record, escrow and fees included.
    pub fn total_payment(&self) -> f64 {
        self.principal
            + self.additional_principal
            + self.interest
            + self.escrow
            + self.additional_escrow
            + self.fees_and_charges
    }
}

/// Everything one schedule computation reads.
#[derive(Clone, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AmortizationInput {
    #[cfg_attr(feature = "serde", serde(rename = "loanData"))]
    pub loan: LoanParameters,
    #[cfg_attr(feature = "serde", serde(rename = "amortizationEntries", default))]
    pub lump_sums: Vec<LumpSumEntry>,
    #[cfg_attr(feature = "serde", serde(rename = "paymentRecords", default))]
    pub overrides: Vec<PaymentOverrideRecord>,
}

impl AmortizationInput {
    pub fn new(loan: LoanParameters) -> Self {
        Self {
            loan,
            ..Default::default()
        }
    }

    pub fn with_lump_sums(mut self, lump_sums: Vec<LumpSumEntry>) -> Self {
        self.lump_sums = lump_sums;
        self
    }

    pub fn with_overrides(mut self, overrides: Vec<PaymentOverrideRecord>) -> Self {
        self.overrides = overrides;
        self
    }

    /// The same loan paid strictly on schedule: no recurring extra principal
    /// and no lump sums. Recorded payments are kept.
    pub fn standard(&self) -> Self {
        Self {
            loan: self.loan.clone().with_additional_principal(0.),
            lump_sums: Vec::new(),
            overrides: self.overrides.clone(),
        }
    }
}
