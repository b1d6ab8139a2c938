use log::{debug, trace, warn};
use std::{collections::HashMap, fmt, mem};

use crate::error::ScheduleError;
use crate::loan::{AmortizationInput, LoanParameters, LoanTerms, LumpSumEntry, PaymentOverrideRecord};
use crate::period::YearMonth;

/// One simulated month. Produced once and never changed afterwards.
#[derive(Clone, PartialEq, Debug)]
pub struct MonthlyRow {
    pub period: YearMonth,
    pub principal: f64,
    pub additional_principal: f64,
    pub interest: f64,
    pub remaining_balance: f64,
}

impl MonthlyRow {
    /// Month name used as the row label, e.g. "June".
    pub fn label(&self) -> &'static str {
        self.period.month_name()
    }

    pub fn total_paid(&self) -> f64 {
        self.principal + self.additional_principal + self.interest
    }
}

impl fmt::Display for MonthlyRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}: principal ${:.2}, additional principal ${:.2}, interest ${:.2}, remaining balance ${:.2}",
            self.label(),
            self.period.year,
            self.principal,
            self.additional_principal,
            self.interest,
            self.remaining_balance
        )
    }
}

/// Totals for one calendar year, with the months that make it up.
#[derive(Clone, PartialEq, Debug)]
pub struct AnnualRow {
    pub year: i32,
    pub principal: f64,
    pub additional_principal: f64,
    pub interest: f64,
    /// Balance after the last month in `details`.
    pub remaining_balance: f64,
    pub details: Vec<MonthlyRow>,
}

impl AnnualRow {
    pub fn total_paid(&self) -> f64 {
        self.principal + self.additional_principal + self.interest
    }
}

impl fmt::Display for AnnualRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({} months): principal ${:.2}, additional principal ${:.2}, interest ${:.2}, remaining balance ${:.2}",
            self.year,
            self.details.len(),
            self.principal,
            self.additional_principal,
            self.interest,
            self.remaining_balance
        )
    }
}

/// The schedule paid strictly on terms next to the one with every extra applied.
#[derive(Clone, PartialEq, Debug)]
pub struct ScheduleSet {
    pub standard: Vec<AnnualRow>,
    pub with_additional: Vec<AnnualRow>,
}

/// Per-month contributions from lump sums and recorded payments.
#[derive(Default, Debug)]
struct MonthAdjustments {
    lump_sums: f64,
    override_interest: Option<f64>,
    override_additional_principal: f64,
}

fn index_adjustments(
    lump_sums: &[LumpSumEntry],
    overrides: &[PaymentOverrideRecord],
) -> HashMap<YearMonth, MonthAdjustments> {
    let mut by_month: HashMap<YearMonth, MonthAdjustments> = HashMap::new();
    for entry in lump_sums {
        by_month.entry(entry.period).or_default().lump_sums += entry.amount;
    }
    for record in overrides {
        let month = by_month.entry(record.period).or_default();
        *month.override_interest.get_or_insert(0.) += record.interest;
        month.override_additional_principal += record.additional_principal;
    }
    by_month
}

#[derive(Default)]
struct YearAccumulator {
    principal: f64,
    additional_principal: f64,
    interest: f64,
    details: Vec<MonthlyRow>,
}

impl YearAccumulator {
    fn push(&mut self, row: MonthlyRow) {
        self.principal += row.principal;
        self.additional_principal += row.additional_principal;
        self.interest += row.interest;
        self.details.push(row);
    }

    /// Closes the running year, leaving the accumulator empty.
    fn close(&mut self) -> Option<AnnualRow> {
        let acc = mem::take(self);
        let (year, remaining_balance) = acc
            .details
            .last()
            .map(|last| (last.period.year, last.remaining_balance))?;
        let row = AnnualRow {
            year,
            principal: acc.principal,
            additional_principal: acc.additional_principal,
            interest: acc.interest,
            remaining_balance,
            details: acc.details,
        };
        debug!("{}", row);
        Some(row)
    }
}

/// Computes the amortization schedule for a loan.
///
/// Returns [`ScheduleError::IncompleteInput`] when a required loan field is
/// unset, and [`ScheduleError::InvalidParameter`] for a zero term or a
/// negative amount. Every other anomaly, such as a payment that doesn't cover
/// interest, shows up in the returned rows.
pub fn compute_schedule(
    loan: &LoanParameters,
    lump_sums: &[LumpSumEntry],
    overrides: &[PaymentOverrideRecord],
) -> Result<Vec<AnnualRow>, ScheduleError> {
    let terms = loan.resolve()?;
    Ok(amortize(&terms, lump_sums, overrides))
}

pub fn compute(input: &AmortizationInput) -> Result<Vec<AnnualRow>, ScheduleError> {
    compute_schedule(&input.loan, &input.lump_sums, &input.overrides)
}

/// Computes both the standard schedule and the one with extra principal.
pub fn compute_schedules(input: &AmortizationInput) -> Result<ScheduleSet, ScheduleError> {
    Ok(ScheduleSet {
        standard: compute(&input.standard())?,
        with_additional: compute(input)?,
    })
}

/// Runs the month-by-month simulation over already resolved terms.
pub fn amortize(
    terms: &LoanTerms,
    lump_sums: &[LumpSumEntry],
    overrides: &[PaymentOverrideRecord],
) -> Vec<AnnualRow> {
    let adjustments = index_adjustments(lump_sums, overrides);
    let monthly_rate = terms.monthly_rate();
    let payment = terms.principal_and_interest_payment();

    let mut schedule = Vec::new();
    let mut year = YearAccumulator::default();
    let mut balance = terms.principal_amount;
    let mut period = terms.start_period;

    for month_number in 1..=terms.term_length_months {
        if balance <= 0. {
            break;
        }

        let adjustment = adjustments.get(&period);
        let interest = adjustment
            .and_then(|a| a.override_interest)
            .unwrap_or(balance * monthly_rate);

        let mut principal = payment - interest;
        if principal < 0. {
            warn!(
                "{}: payment ${:.2} does not cover interest ${:.2}",
                period, payment, interest
            );
        }

        let additional_principal = terms.recurring_additional_principal
            + adjustment.map_or(0., |a| a.lump_sums + a.override_additional_principal);

        // never pay past the remaining balance
        if principal + additional_principal > balance {
            principal = balance - additional_principal;
            if principal < 0. {
                principal = balance;
            }
        }

        balance -= principal + additional_principal;
        if balance < 0. {
            balance = 0.;
        }
        trace!(
            "month # {}, {}, interest {}, principal {}, additional {}, balance {}",
            month_number,
            period,
            interest,
            principal,
            additional_principal,
            balance
        );

        year.push(MonthlyRow {
            period,
            principal,
            additional_principal,
            interest,
            remaining_balance: balance,
        });

        let paid_off = balance == 0.;
        if period.is_december() || paid_off {
            schedule.extend(year.close());
            if paid_off {
                break;
            }
        }

        period = period.next();
    }

    // term ended part way through a year
    schedule.extend(year.close());

    debug!(
        "schedule complete: {} years, {} months, final balance {}",
        schedule.len(),
        monthly_rows(&schedule).count(),
        balance
    );
    schedule
}

/// All monthly rows of a schedule in chronological order.
pub fn monthly_rows(schedule: &[AnnualRow]) -> impl Iterator<Item = &MonthlyRow> {
    schedule.iter().flat_map(|year| year.details.iter())
}
