//! Derived KPIs: burn, runway, margins, CAC.
//!
//! Pure functions of the monthly aggregate sequence plus an externally
//! supplied new-customer count. No state is kept here.

use serde::Serialize;

use crate::aggregate::MonthlyAggregate;

/// Category whose spend feeds the CAC numerator.
const MARKETING_CATEGORY: &str = "Sales & Marketing";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSnapshot {
    /// Average monthly COGS + OpEx + financing outflow.
    pub gross_burn: f64,
    /// Gross burn less average monthly income. Negative means cash-positive.
    pub net_burn: f64,
    /// Last month's running cash balance.
    pub current_balance: f64,
    /// Months of cash left at the current net burn; infinite when not
    /// burning (net burn <= 0).
    pub runway_months: f64,
    pub gross_margin: f64,
    pub operating_margin: f64,
    /// Total "Sales & Marketing" spend across all months, not averaged.
    pub marketing_spend: f64,
    pub cac: f64,
    pub total_funding: f64,
}

/// Compute the snapshot for an aggregate sequence (ascending by month).
pub fn compute_kpis(months: &[MonthlyAggregate], new_customers: u32) -> KpiSnapshot {
    let total_income: f64 = months.iter().map(|m| m.income).sum();
    let total_cogs: f64 = months.iter().map(|m| m.cogs).sum();
    let total_opex: f64 = months.iter().map(|m| m.opex).sum();
    let total_funding: f64 = months.iter().map(|m| m.funding).sum();
    let total_financing: f64 = months.iter().map(|m| m.financing).sum();

    let count = months.len() as f64;
    let (avg_income, avg_cogs, avg_opex, avg_financing) = if months.is_empty() {
        (0.0, 0.0, 0.0, 0.0)
    } else {
        (
            total_income / count,
            total_cogs / count,
            total_opex / count,
            total_financing / count,
        )
    };

    let gross_burn = avg_cogs + avg_opex + avg_financing;
    let net_burn = gross_burn - avg_income;
    let current_balance = months.last().map(|m| m.cash_balance).unwrap_or(0.0);
    let runway_months = if net_burn > 0.0 {
        current_balance / net_burn
    } else {
        f64::INFINITY
    };

    let gross_margin = if total_income > 0.0 {
        (total_income - total_cogs) / total_income * 100.0
    } else {
        0.0
    };
    let operating_margin = if total_income > 0.0 {
        (total_income - total_cogs - total_opex) / total_income * 100.0
    } else {
        0.0
    };

    let marketing_spend: f64 = months
        .iter()
        .flat_map(|m| m.transactions.iter())
        .filter(|t| t.category == MARKETING_CATEGORY)
        .map(|t| t.abs_amount())
        .sum();
    let cac = if new_customers > 0 {
        marketing_spend / new_customers as f64
    } else {
        0.0
    };

    KpiSnapshot {
        gross_burn,
        net_burn,
        current_balance,
        runway_months,
        gross_margin,
        operating_margin,
        marketing_spend,
        cac,
        total_funding,
    }
}
