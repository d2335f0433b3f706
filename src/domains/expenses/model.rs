//! Expense records, request shapes, and their validation.
//!
//! The request types double as MCP tool parameters, so their doc comments
//! end up in the published JSON schemas.

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::error::{ExpenseError, ExpenseResult};

/// Page size when `limit` is omitted.
pub const DEFAULT_LIMIT: i64 = 200;

/// Largest accepted `limit`.
pub const MAX_LIMIT: i64 = 1000;

/// Amounts are kept to cents.
pub const AMOUNT_SCALE: u32 = 2;

/// Largest accepted amount in cents, the range of a `DECIMAL(10,2)` column.
const MAX_AMOUNT_CENTS: i64 = 9_999_999_999;

/// Largest accepted amount.
pub fn max_amount() -> Decimal {
    Decimal::new(MAX_AMOUNT_CENTS, AMOUNT_SCALE)
}

/// Longest accepted category label, in characters.
pub const MAX_CATEGORY_LEN: usize = 100;

/// Accepted summary years.
pub const MIN_YEAR: i32 = 2000;
pub const MAX_YEAR: i32 = 2100;

const DATE_FORMAT: &str = "%Y-%m-%d";

// ============================================================================
// Records
// ============================================================================

/// One spending record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Expense {
    /// Storage-assigned identifier.
    pub id: i64,
    /// Amount spent in cents precision, always greater than 0.
    #[schemars(with = "f64")]
    pub amount: Decimal,
    /// Category label, e.g. food, transport.
    pub category: String,
    /// Optional free text.
    pub description: Option<String>,
    /// Day the money was spent.
    pub expense_date: NaiveDate,
    /// When the record was created.
    pub created_at: DateTime<Utc>,
}

/// Outcome of a successful delete.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct DeleteResult {
    /// Always "deleted".
    pub status: String,
    /// Identifier of the removed expense.
    pub deleted_id: i64,
}

impl DeleteResult {
    pub fn deleted(id: i64) -> Self {
        Self {
            status: "deleted".to_string(),
            deleted_id: id,
        }
    }
}

/// A page of expenses.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExpenseList {
    /// Matching expenses, newest first.
    pub expenses: Vec<Expense>,
    /// Number of expenses in this page.
    pub count: usize,
}

impl From<Vec<Expense>> for ExpenseList {
    fn from(expenses: Vec<Expense>) -> Self {
        Self {
            count: expenses.len(),
            expenses,
        }
    }
}

/// Total spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct CategoryTotal {
    pub category: String,
    #[schemars(with = "f64")]
    pub total: Decimal,
}

/// Spending for one calendar month, grouped by category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct MonthlySummary {
    pub year: i32,
    pub month: u32,
    /// Currency code the totals are reported in.
    pub currency: String,
    /// Total per category.
    #[schemars(with = "BTreeMap<String, f64>")]
    pub per_category: BTreeMap<String, Decimal>,
    /// The same totals, largest first.
    pub by_category: Vec<CategoryTotal>,
    /// Sum of all category totals.
    #[schemars(with = "f64")]
    pub total: Decimal,
}

// ============================================================================
// Requests
// ============================================================================

/// Body of `POST /expenses` and parameters of the `add_expense` tool.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct NewExpense {
    /// Expense amount (must be > 0), kept to two decimals.
    pub amount: f64,
    /// Category, e.g. food, transport.
    pub category: String,
    /// Optional description.
    #[serde(default)]
    pub description: Option<String>,
    /// Date of the expense, YYYY-MM-DD.
    pub expense_date: String,
}

/// Filters for listing expenses.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema)]
pub struct ExpenseQuery {
    /// Earliest date to include, YYYY-MM-DD (inclusive).
    #[serde(default)]
    pub start_date: Option<String>,
    /// Latest date to include, YYYY-MM-DD (inclusive).
    #[serde(default)]
    pub end_date: Option<String>,
    /// Only expenses in exactly this category.
    #[serde(default)]
    pub category: Option<String>,
    /// Page size, 1 to 1000 (default 200).
    #[serde(default)]
    pub limit: Option<i64>,
    /// Number of expenses to skip (default 0).
    #[serde(default)]
    pub offset: Option<i64>,
}

/// Parameters for a monthly summary.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct SummaryQuery {
    /// Calendar year, 2000 to 2100.
    pub year: i32,
    /// Calendar month, 1 to 12.
    pub month: u32,
    /// Currency code to report (default IDR).
    #[serde(default)]
    pub currency: Option<String>,
}

/// Identifies a single expense.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ExpenseIdParams {
    /// Identifier of the expense.
    pub expense_id: i64,
}

// ============================================================================
// Validated forms
// ============================================================================

/// A `NewExpense` that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidExpense {
    pub amount: Decimal,
    pub category: String,
    pub description: Option<String>,
    pub expense_date: NaiveDate,
}

/// An `ExpenseQuery` that passed validation.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub category: Option<String>,
    pub limit: i64,
    pub offset: i64,
}

/// The half-open date range `[start, end)` covering one month.
#[derive(Debug, Clone, PartialEq)]
pub struct SummaryPeriod {
    pub year: i32,
    pub month: u32,
    pub currency: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

pub(crate) fn parse_date(value: &str, field: &str) -> ExpenseResult<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), DATE_FORMAT)
        .map_err(|_| ExpenseError::validation(format!("{} must be YYYY-MM-DD", field)))
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

impl NewExpense {
    pub fn validate(&self) -> ExpenseResult<ValidExpense> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(ExpenseError::validation("amount must be greater than 0"));
        }
        let amount = Decimal::try_from(self.amount)
            .map(round_money)
            .map_err(|_| ExpenseError::validation("amount is out of range"))?;
        if amount.is_zero() {
            return Err(ExpenseError::validation("amount must be at least 0.01"));
        }
        if amount > max_amount() {
            return Err(ExpenseError::validation(format!(
                "amount must be at most {}",
                max_amount()
            )));
        }

        let category = self.category.trim();
        if category.is_empty() {
            return Err(ExpenseError::validation("category is required"));
        }
        if category.chars().count() > MAX_CATEGORY_LEN {
            return Err(ExpenseError::validation(format!(
                "category must be at most {} characters",
                MAX_CATEGORY_LEN
            )));
        }

        Ok(ValidExpense {
            amount,
            category: category.to_string(),
            description: non_blank(self.description.as_deref()),
            expense_date: parse_date(&self.expense_date, "expense_date")?,
        })
    }
}

impl ExpenseQuery {
    pub fn validate(&self) -> ExpenseResult<ExpenseFilter> {
        let start_date = non_blank(self.start_date.as_deref())
            .map(|d| parse_date(&d, "start_date"))
            .transpose()?;
        let end_date = non_blank(self.end_date.as_deref())
            .map(|d| parse_date(&d, "end_date"))
            .transpose()?;

        let limit = self.limit.unwrap_or(DEFAULT_LIMIT);
        if !(1..=MAX_LIMIT).contains(&limit) {
            return Err(ExpenseError::validation(format!(
                "limit must be between 1 and {}",
                MAX_LIMIT
            )));
        }

        let offset = self.offset.unwrap_or(0);
        if offset < 0 {
            return Err(ExpenseError::validation("offset must be 0 or greater"));
        }

        Ok(ExpenseFilter {
            start_date,
            end_date,
            category: non_blank(self.category.as_deref()),
            limit,
            offset,
        })
    }
}

impl SummaryQuery {
    pub fn validate(&self, default_currency: &str) -> ExpenseResult<SummaryPeriod> {
        if !(1..=12).contains(&self.month) {
            return Err(ExpenseError::validation("month must be between 1 and 12"));
        }
        if !(MIN_YEAR..=MAX_YEAR).contains(&self.year) {
            return Err(ExpenseError::validation(format!(
                "year must be between {} and {}",
                MIN_YEAR, MAX_YEAR
            )));
        }

        let start = NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .ok_or_else(|| ExpenseError::validation("invalid year/month"))?;
        let (next_year, next_month) = if start.month() == 12 {
            (self.year + 1, 1)
        } else {
            (self.year, self.month + 1)
        };
        let end = NaiveDate::from_ymd_opt(next_year, next_month, 1)
            .ok_or_else(|| ExpenseError::validation("invalid year/month"))?;

        let currency = non_blank(self.currency.as_deref())
            .unwrap_or_else(|| default_currency.to_string())
            .to_uppercase();

        Ok(SummaryPeriod {
            year: self.year,
            month: self.month,
            currency,
            start,
            end,
        })
    }
}

/// Round to cents, halves away from zero like a `DECIMAL(10,2)` column.
pub(crate) fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(AMOUNT_SCALE, RoundingStrategy::MidpointAwayFromZero)
}

/// Read a stored or summed float back as cents.
pub(crate) fn money_from_f64(value: f64) -> Result<Decimal, rust_decimal::Error> {
    Decimal::try_from(value).map(round_money)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_expense(amount: f64, category: &str, date: &str) -> NewExpense {
        NewExpense {
            amount,
            category: category.to_string(),
            description: None,
            expense_date: date.to_string(),
        }
    }

    #[test]
    fn test_valid_expense_is_trimmed() {
        let mut expense = new_expense(75000.0, "  food ", "2025-12-23");
        expense.description = Some("   ".to_string());
        let valid = expense.validate().unwrap();
        assert_eq!(valid.category, "food");
        assert_eq!(valid.description, None);
        assert_eq!(valid.expense_date, NaiveDate::from_ymd_opt(2025, 12, 23).unwrap());
    }

    #[test]
    fn test_rejects_non_positive_amounts() {
        for amount in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let err = new_expense(amount, "food", "2025-12-23").validate().unwrap_err();
            assert!(matches!(err, ExpenseError::Validation(_)), "{} accepted", amount);
        }
    }

    #[test]
    fn test_rejects_blank_and_long_categories() {
        assert!(new_expense(1.0, "   ", "2025-12-23").validate().is_err());
        let long = "x".repeat(MAX_CATEGORY_LEN + 1);
        assert!(new_expense(1.0, &long, "2025-12-23").validate().is_err());
        let max = "x".repeat(MAX_CATEGORY_LEN);
        assert!(new_expense(1.0, &max, "2025-12-23").validate().is_ok());
    }

    #[test]
    fn test_rejects_bad_dates() {
        for date in ["", "23-12-2025", "2025-13-01", "2025-02-30", "yesterday"] {
            let err = new_expense(1.0, "food", date).validate().unwrap_err();
            assert_eq!(err.to_string(), "expense_date must be YYYY-MM-DD");
        }
    }

    #[test]
    fn test_query_defaults() {
        let filter = ExpenseQuery::default().validate().unwrap();
        assert_eq!(filter.limit, DEFAULT_LIMIT);
        assert_eq!(filter.offset, 0);
        assert_eq!(filter.start_date, None);
        assert_eq!(filter.category, None);
    }

    #[test]
    fn test_query_bounds() {
        let query = |limit, offset| ExpenseQuery {
            limit: Some(limit),
            offset: Some(offset),
            ..Default::default()
        };
        assert!(query(0, 0).validate().is_err());
        assert!(query(MAX_LIMIT + 1, 0).validate().is_err());
        assert!(query(10, -1).validate().is_err());
        assert!(query(MAX_LIMIT, 5).validate().is_ok());
    }

    #[test]
    fn test_query_blank_filters_are_ignored() {
        let filter = ExpenseQuery {
            start_date: Some(String::new()),
            category: Some("  ".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap();
        assert_eq!(filter.start_date, None);
        assert_eq!(filter.category, None);
    }

    #[test]
    fn test_query_reports_bad_field() {
        let err = ExpenseQuery {
            end_date: Some("2025/12/01".to_string()),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert_eq!(err.to_string(), "end_date must be YYYY-MM-DD");
    }

    #[test]
    fn test_summary_period_december_rolls_over() {
        let period = SummaryQuery {
            year: 2025,
            month: 12,
            currency: None,
        }
        .validate("IDR")
        .unwrap();
        assert_eq!(period.start, NaiveDate::from_ymd_opt(2025, 12, 1).unwrap());
        assert_eq!(period.end, NaiveDate::from_ymd_opt(2026, 1, 1).unwrap());
        assert_eq!(period.currency, "IDR");
    }

    #[test]
    fn test_summary_rejects_out_of_range() {
        for (year, month) in [(2025, 0), (2025, 13), (1999, 5), (2101, 5)] {
            let result = SummaryQuery {
                year,
                month,
                currency: None,
            }
            .validate("IDR");
            assert!(result.is_err(), "{}-{} accepted", year, month);
        }
    }

    #[test]
    fn test_summary_currency_is_normalized() {
        let period = SummaryQuery {
            year: 2025,
            month: 2,
            currency: Some(" usd".to_string()),
        }
        .validate("IDR")
        .unwrap();
        assert_eq!(period.currency, "USD");
        assert_eq!(period.end, NaiveDate::from_ymd_opt(2025, 3, 1).unwrap());
    }

    fn cents(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    #[test]
    fn test_amount_is_normalized_to_cents() {
        let valid = new_expense(10.006, "food", "2025-12-23").validate().unwrap();
        assert_eq!(valid.amount, cents("10.01"));

        let valid = new_expense(0.1, "food", "2025-12-23").validate().unwrap();
        assert_eq!(valid.amount, cents("0.10"));
    }

    #[test]
    fn test_sub_cent_amount_is_rejected() {
        let err = new_expense(0.004, "food", "2025-12-23").validate().unwrap_err();
        assert_eq!(err.to_string(), "amount must be at least 0.01");

        let valid = new_expense(0.005, "food", "2025-12-23").validate().unwrap();
        assert_eq!(valid.amount, cents("0.01"));
    }

    #[test]
    fn test_amount_upper_bound() {
        assert!(new_expense(99_999_999.99, "rent", "2025-12-23").validate().is_ok());
        assert!(new_expense(100_000_000.0, "rent", "2025-12-23").validate().is_err());
    }

    #[test]
    fn test_money_from_f64() {
        assert_eq!(money_from_f64(1.0 / 3.0).unwrap(), cents("0.33"));
        assert_eq!(money_from_f64(0.1 + 0.2).unwrap(), cents("0.30"));
        assert_eq!(money_from_f64(75000.0).unwrap(), cents("75000"));
        assert!(money_from_f64(f64::NAN).is_err());
    }
}
