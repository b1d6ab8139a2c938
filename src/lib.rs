//! Amortization schedules for mortgage-style loans with extra principal
//! payments and recorded payment overrides.

pub mod error;
pub mod loan;
pub mod period;
pub mod schedule;
pub mod summary;

#[cfg(feature = "serde")]
pub mod data;

pub use error::ScheduleError;
pub use loan::{AmortizationInput, LoanParameters, LoanTerms, LumpSumEntry, PaymentOverrideRecord, TermUnit};
pub use period::YearMonth;
pub use schedule::{compute, compute_schedule, compute_schedules, AnnualRow, MonthlyRow, ScheduleSet};
pub use summary::{ScheduleComparison, ScheduleSummary};

#[cfg(test)]
mod tests {
    use super::*;

    // schedules are plain data and can be shared across threads
    fn is_normal<T: Sized + Send + Sync + Unpin>() {}

    #[test]
    fn normal_types() {
        is_normal::<AmortizationInput>();
        is_normal::<AnnualRow>();
        is_normal::<MonthlyRow>();
        is_normal::<ScheduleSummary>();
        is_normal::<ScheduleError>();
    }
}
