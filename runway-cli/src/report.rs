//! Console rendering for the review summary, monthly report and KPI block.

use runway_core::{KpiSnapshot, MonthlyAggregate, TransactionStore};

const MONTH_NAMES: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// `$1,234.56`, negatives as `-$1,234.56`.
pub fn format_currency(value: f64) -> String {
    let cents = (value.abs() * 100.0).round() as u64;
    let dollars = (cents / 100).to_string();
    let mut grouped = String::with_capacity(dollars.len() + dollars.len() / 3);
    for (i, ch) in dollars.chars().enumerate() {
        if i > 0 && (dollars.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    let sign = if value < 0.0 && cents > 0 { "-" } else { "" };
    format!("{sign}${grouped}.{:02}", cents % 100)
}

/// `2024-02` displays as `Feb 2024`; anything unrecognized passes through.
pub fn format_month(key: &str) -> String {
    if let Some((year, month)) = key.split_once('-') {
        if let Some(m) = month.parse::<usize>().ok().filter(|m| (1..=12).contains(m)) {
            return format!("{} {}", MONTH_NAMES[m - 1], year);
        }
    }
    key.to_string()
}

/// Status counts plus the pending merchant groups, largest first.
pub fn print_review(store: &TransactionStore) {
    let counts = store.status_counts();
    println!(
        "\n{} pending review | {} approved | {} excluded",
        counts.pending, counts.approved, counts.excluded
    );

    let groups = store.by_merchant();
    if groups.is_empty() {
        return;
    }
    println!("\nPending by merchant:");
    for (merchant, members) in &groups {
        let total: f64 = members.iter().map(|t| t.amount).sum();
        let label = if merchant.is_empty() { "(unknown)" } else { merchant.as_str() };
        println!(
            "  {label}: {} txn{} | {} | {} [{}]",
            members.len(),
            if members.len() == 1 { "" } else { "s" },
            format_currency(total),
            members[0].category,
            members[0].confidence.as_str()
        );
    }
}

pub fn print_monthly(months: &[MonthlyAggregate]) {
    if months.is_empty() {
        println!("\nNo approved transactions with parseable dates yet.");
        return;
    }
    println!(
        "\n{:<10} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
        "Month", "Income", "COGS", "OpEx", "Fund In", "Fund Out", "Net", "Balance"
    );
    for m in months {
        println!(
            "{:<10} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12} {:>12}",
            format_month(&m.month),
            format_currency(m.income),
            format_currency(m.cogs),
            format_currency(m.opex),
            format_currency(m.funding),
            format_currency(m.financing),
            format_currency(m.net_cash_flow),
            format_currency(m.cash_balance),
        );
    }
}

pub fn print_breakdown(breakdown: &[(String, f64)]) {
    if breakdown.is_empty() {
        return;
    }
    println!("\nApproved spend by category:");
    for (category, total) in breakdown {
        println!("  {category}: {}", format_currency(*total));
    }
}

pub fn print_kpis(kpis: &KpiSnapshot) {
    println!("\nKPIs");
    println!("  Gross burn (monthly avg): {}", format_currency(kpis.gross_burn));
    println!("  Net burn (monthly avg):   {}", format_currency(kpis.net_burn));
    println!("  Cash balance:             {}", format_currency(kpis.current_balance));
    if kpis.runway_months.is_infinite() {
        println!("  Runway:                   infinite (not burning cash)");
    } else {
        println!("  Runway:                   {:.1} months", kpis.runway_months);
    }
    println!("  Gross margin:             {:.1}%", kpis.gross_margin);
    println!("  Operating margin:         {:.1}%", kpis.operating_margin);
    println!("  Marketing spend:          {}", format_currency(kpis.marketing_spend));
    println!("  CAC:                      {}", format_currency(kpis.cac));
    println!("  Total funding raised:     {}", format_currency(kpis.total_funding));
}
