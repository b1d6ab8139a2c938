use std::fmt;

use crate::period::YearMonth;
use crate::schedule::{monthly_rows, AnnualRow};

/// Headline figures for a computed schedule.
#[derive(Clone, Copy, PartialEq, Debug, Default)]
pub struct ScheduleSummary {
    /// Principal plus additional principal.
    pub total_principal: f64,
    pub total_interest: f64,
    pub total_amount_paid: f64,
    /// Calendar years touched, i.e. the number of annual rows.
    pub years_to_pay_off: usize,
    pub months_to_pay_off: usize,
    /// Month of the last payment, if any was made.
    pub payoff_period: Option<YearMonth>,
    pub final_balance: f64,
}

impl ScheduleSummary {
    pub fn from_schedule(schedule: &[AnnualRow]) -> Self {
        let total_principal = schedule
            .iter()
            .map(|y| y.principal + y.additional_principal)
            .sum::<f64>();
        let total_interest = schedule.iter().map(|y| y.interest).sum::<f64>();
        let last_month = monthly_rows(schedule).last();

        Self {
            total_principal,
            total_interest,
            total_amount_paid: total_principal + total_interest,
            years_to_pay_off: schedule.len(),
            months_to_pay_off: monthly_rows(schedule).count(),
            payoff_period: last_month.map(|m| m.period),
            final_balance: last_month.map_or(0., |m| m.remaining_balance),
        }
    }

    /// True once the balance reached zero within the term.
    pub fn is_paid_off(&self) -> bool {
        self.final_balance == 0.
    }
}

impl fmt::Display for ScheduleSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let years = if self.years_to_pay_off == 1 {
            "year"
        } else {
            "years"
        };
        write!(
            f,
            "total paid ${:.2} (principal ${:.2}, interest ${:.2}) over {} {} / {} months",
            self.total_amount_paid,
            self.total_principal,
            self.total_interest,
            self.years_to_pay_off,
            years,
            self.months_to_pay_off
        )?;
        match self.payoff_period {
            Some(period) if self.is_paid_off() => {
                write!(f, ", paid off {} {}", period.month_name(), period.year)
            }
            _ => write!(f, ", remaining balance ${:.2}", self.final_balance),
        }
    }
}

/// What paying extra principal saves against the standard schedule.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct ScheduleComparison {
    pub standard: ScheduleSummary,
    pub with_additional: ScheduleSummary,
    pub interest_saved: f64,
    pub months_saved: i64,
    pub years_saved: i64,
}

impl ScheduleComparison {
    pub fn new(standard: &[AnnualRow], with_additional: &[AnnualRow]) -> Self {
        let standard = ScheduleSummary::from_schedule(standard);
        let with_additional = ScheduleSummary::from_schedule(with_additional);
        Self {
            standard,
            with_additional,
            interest_saved: standard.total_interest - with_additional.total_interest,
            months_saved: standard.months_to_pay_off as i64
                - with_additional.months_to_pay_off as i64,
            years_saved: standard.years_to_pay_off as i64 - with_additional.years_to_pay_off as i64,
        }
    }
}

impl fmt::Display for ScheduleComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "interest saved ${:.2}, {} months ({} years) sooner",
            self.interest_saved, self.months_saved, self.years_saved
        )
    }
}

#[cfg(test)]
mod tests {
    use super::{ScheduleComparison, ScheduleSummary};
    use crate::loan::{AmortizationInput, LoanParameters, TermUnit};
    use crate::period::YearMonth;
    use crate::schedule::{compute_schedule, compute_schedules};
    use approx::assert_relative_eq;
    use test_log::test;

    #[test]
    fn test_summary_of_exact_schedule() {
        let loan = LoanParameters::new(10000., 0., 1000., YearMonth::new(2024, 10));
        let schedule = compute_schedule(&loan, &[], &[]).unwrap();
        let summary = ScheduleSummary::from_schedule(&schedule);

        assert_eq!(summary.total_principal, 10000.);
        assert_eq!(summary.total_interest, 0.);
        assert_eq!(summary.total_amount_paid, 10000.);
        assert_eq!(summary.years_to_pay_off, 2);
        assert_eq!(summary.months_to_pay_off, 10);
        assert_eq!(summary.payoff_period, Some(YearMonth::new(2025, 7)));
        assert!(summary.is_paid_off());
        assert_eq!(
            summary.to_string(),
            "total paid $10000.00 (principal $10000.00, interest $0.00) over 2 years / 10 months, paid off July 2025"
        );
    }

    #[test]
    fn test_summary_of_unfinished_schedule() {
        let loan = LoanParameters::new(12000., 0., 1000., YearMonth::new(2024, 1))
            .with_term(6, TermUnit::Months);
        let schedule = compute_schedule(&loan, &[], &[]).unwrap();
        let summary = ScheduleSummary::from_schedule(&schedule);

        assert!(!summary.is_paid_off());
        assert_eq!(summary.final_balance, 6000.);
        assert_eq!(
            summary.to_string(),
            "total paid $6000.00 (principal $6000.00, interest $0.00) over 1 year / 6 months, remaining balance $6000.00"
        );
    }

    #[test]
    fn test_summary_of_empty_schedule() {
        let summary = ScheduleSummary::from_schedule(&[]);
        assert_eq!(summary, ScheduleSummary::default());
        assert_eq!(summary.payoff_period, None);
    }

    #[test]
    fn test_summary_totals_match_rows() {
        let loan = LoanParameters::new(120000., 6., 900., YearMonth::new(2024, 1));
        let schedule = compute_schedule(&loan, &[], &[]).unwrap();
        let summary = ScheduleSummary::from_schedule(&schedule);

        let paid: f64 = schedule.iter().map(|y| y.total_paid()).sum();
        assert_relative_eq!(summary.total_amount_paid, paid, max_relative = 1e-9);
        assert_relative_eq!(summary.total_principal, 120000., max_relative = 1e-6);
        assert!(summary.total_interest > 0.);
    }

    #[test]
    fn test_comparison_with_extra_principal() {
        let input = AmortizationInput::new(
            LoanParameters::new(120000., 6., 900., YearMonth::new(2024, 1))
                .with_additional_principal(500.),
        );
        let set = compute_schedules(&input).unwrap();
        let comparison = ScheduleComparison::new(&set.standard, &set.with_additional);

        assert!(comparison.interest_saved > 0.);
        assert!(comparison.months_saved > 0);
        assert!(comparison.years_saved > 0);
        assert_relative_eq!(
            comparison.interest_saved,
            comparison.standard.total_interest - comparison.with_additional.total_interest
        );
    }

    #[test]
    fn test_comparison_without_extras_saves_nothing() {
        let input = AmortizationInput::new(LoanParameters::new(
            36000.,
            0.,
            1000.,
            YearMonth::new(2024, 1),
        ));
        let set = compute_schedules(&input).unwrap();
        let comparison = ScheduleComparison::new(&set.standard, &set.with_additional);

        assert_eq!(comparison.interest_saved, 0.);
        assert_eq!(comparison.months_saved, 0);
        assert_eq!(comparison.years_saved, 0);
        assert_eq!(
            comparison.to_string(),
            "interest saved $0.00, 0 months (0 years) sooner"
        );
    }
}
