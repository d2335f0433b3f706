//! Expense repository.
//!
//! Typed expense operations over the storage adapter. Every operation
//! validates its input first and then issues a single statement, so there is
//! no partial-failure state to clean up.

use chrono::{DateTime, NaiveDate, SecondsFormat, SubsecRound, Utc};
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use sqlx::Row;
use sqlx::any::AnyRow;
use std::collections::BTreeMap;
use tracing::{info, instrument, warn};

use super::error::{ExpenseError, ExpenseResult};
use super::model::{
    CategoryTotal, DeleteResult, Expense, ExpenseQuery, MonthlySummary, NewExpense, SummaryQuery,
    money_from_f64,
};
use crate::core::config::DEFAULT_CURRENCY;
use crate::storage::{Backend, Database, Statement};

const SELECT_EXPENSE: &str =
    "SELECT id, amount, category, description, expense_date, created_at FROM expenses";

/// Expense operations over a shared database handle.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    database: Database,
    default_currency: String,
}

impl ExpenseRepository {
    pub fn new(database: Database) -> Self {
        Self {
            database,
            default_currency: DEFAULT_CURRENCY.to_string(),
        }
    }

    /// Currency reported by summaries that do not name one.
    pub fn with_default_currency(mut self, currency: impl Into<String>) -> Self {
        self.default_currency = currency.into();
        self
    }

    pub fn backend(&self) -> Backend {
        self.database.backend()
    }

    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Validate and persist a new expense.
    #[instrument(skip_all, fields(category = %new_expense.category))]
    pub async fn create(&self, new_expense: &NewExpense) -> ExpenseResult<Expense> {
        let valid = new_expense.validate()?;
        let amount = valid
            .amount
            .to_f64()
            .ok_or_else(|| ExpenseError::validation("amount is out of range"))?;
        let created_at = Utc::now().trunc_subsecs(0);

        let mut statement = Statement::new(
            "INSERT INTO expenses (amount, category, description, expense_date, created_at) ",
        );
        statement
            .push("VALUES (")
            .push_bind(amount)
            .push(", ")
            .push_bind(valid.category.clone())
            .push(", ")
            .push_bind(valid.description.clone())
            .push(", ")
            .push_bind(valid.expense_date.to_string())
            .push(", ")
            .push_bind(created_at.to_rfc3339_opts(SecondsFormat::Secs, true))
            .push(") RETURNING id");

        let row = self.database.fetch_one(&statement).await?;
        let id: i64 = row.try_get("id")?;

        info!("Created expense {} ({} in {})", id, valid.amount, valid.category);

        Ok(Expense {
            id,
            amount: valid.amount,
            category: valid.category,
            description: valid.description,
            expense_date: valid.expense_date,
            created_at,
        })
    }

    /// Expenses matching every given filter, newest first.
    #[instrument(skip_all)]
    pub async fn list(&self, query: &ExpenseQuery) -> ExpenseResult<Vec<Expense>> {
        let filter = query.validate()?;

        let mut statement = Statement::new(SELECT_EXPENSE);
        statement.push(" WHERE 1=1");
        if let Some(start) = filter.start_date {
            statement.push(" AND expense_date >= ").push_bind(start.to_string());
        }
        if let Some(end) = filter.end_date {
            statement.push(" AND expense_date <= ").push_bind(end.to_string());
        }
        if let Some(category) = filter.category {
            statement.push(" AND category = ").push_bind(category);
        }
        statement
            .push(" ORDER BY expense_date DESC, id DESC LIMIT ")
            .push_bind(filter.limit)
            .push(" OFFSET ")
            .push_bind(filter.offset);

        let rows = self.database.fetch_all(&statement).await?;
        let expenses = rows
            .iter()
            .map(expense_from_row)
            .collect::<Result<Vec<_>, _>>()?;

        info!("Listed {} expenses", expenses.len());
        Ok(expenses)
    }

    /// A single expense by id.
    #[instrument(skip(self))]
    pub async fn get(&self, id: i64) -> ExpenseResult<Expense> {
        let mut statement = Statement::new(SELECT_EXPENSE);
        statement.push(" WHERE id = ").push_bind(id);

        match self.database.fetch_optional(&statement).await? {
            Some(row) => Ok(expense_from_row(&row)?),
            None => Err(ExpenseError::NotFound(id)),
        }
    }

    /// Remove an expense. A second delete of the same id is `NotFound`.
    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> ExpenseResult<DeleteResult> {
        let mut statement = Statement::new("DELETE FROM expenses WHERE id = ");
        statement.push_bind(id);

        if self.database.execute(&statement).await? == 0 {
            warn!("Delete of missing expense {}", id);
            return Err(ExpenseError::NotFound(id));
        }

        info!("Deleted expense {}", id);
        Ok(DeleteResult::deleted(id))
    }

    /// Per-category and grand totals for one calendar month.
    #[instrument(skip_all, fields(year = query.year, month = query.month))]
    pub async fn monthly_summary(&self, query: &SummaryQuery) -> ExpenseResult<MonthlySummary> {
        let period = query.validate(&self.default_currency)?;

        let mut statement = Statement::new(
            "SELECT category, SUM(amount) AS total FROM expenses WHERE expense_date >= ",
        );
        statement
            .push_bind(period.start.to_string())
            .push(" AND expense_date < ")
            .push_bind(period.end.to_string())
            .push(" GROUP BY category");

        let rows = self.database.fetch_all(&statement).await?;

        let mut by_category = rows
            .iter()
            .map(|row| {
                Ok(CategoryTotal {
                    category: row.try_get("category")?,
                    total: money_from_f64(row.try_get::<f64, _>("total")?)
                        .map_err(|e| decode_error("total", e))?,
                })
            })
            .collect::<Result<Vec<_>, sqlx::Error>>()?;

        by_category.sort_by(|a, b| {
            b.total
                .cmp(&a.total)
                .then_with(|| a.category.cmp(&b.category))
        });

        let per_category: BTreeMap<String, Decimal> = by_category
            .iter()
            .map(|c| (c.category.clone(), c.total))
            .collect();
        let total: Decimal = by_category.iter().map(|c| c.total).sum();

        Ok(MonthlySummary {
            year: period.year,
            month: period.month,
            currency: period.currency,
            per_category,
            by_category,
            total,
        })
    }
}

fn decode_error(
    column: &str,
    source: impl std::error::Error + Send + Sync + 'static,
) -> sqlx::Error {
    sqlx::Error::ColumnDecode {
        index: column.to_string(),
        source: Box::new(source),
    }
}

fn expense_from_row(row: &AnyRow) -> sqlx::Result<Expense> {
    let expense_date: String = row.try_get("expense_date")?;
    let created_at: String = row.try_get("created_at")?;

    Ok(Expense {
        id: row.try_get("id")?,
        amount: money_from_f64(row.try_get("amount")?).map_err(|e| decode_error("amount", e))?,
        category: row.try_get("category")?,
        description: row.try_get("description")?,
        expense_date: NaiveDate::parse_from_str(&expense_date, "%Y-%m-%d")
            .map_err(|e| decode_error("expense_date", e))?,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| decode_error("created_at", e))?
            .with_timezone(&Utc),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domains::expenses::test_repository;

    fn expense(amount: f64, category: &str, date: &str) -> NewExpense {
        NewExpense {
            amount,
            category: category.to_string(),
            description: None,
            expense_date: date.to_string(),
        }
    }

    fn cents(value: &str) -> Decimal {
        value.parse().unwrap()
    }

    fn december(currency: Option<&str>) -> SummaryQuery {
        SummaryQuery {
            year: 2025,
            month: 12,
            currency: currency.map(str::to_string),
        }
    }

    #[tokio::test]
    async fn test_create_then_get_round_trips() {
        let (_dir, repository) = test_repository().await;

        let mut new_expense = expense(75000.0, "food", "2025-12-23");
        new_expense.description = Some(" lunch ".to_string());
        let created = repository.create(&new_expense).await.unwrap();

        assert!(created.id > 0);
        assert_eq!(created.description.as_deref(), Some("lunch"));

        let fetched = repository.get(created.id).await.unwrap();
        assert_eq!(fetched, created);
    }

    #[tokio::test]
    async fn test_ids_are_unique() {
        let (_dir, repository) = test_repository().await;

        let mut ids = Vec::new();
        for day in 1..=5 {
            let created = repository
                .create(&expense(10.0, "food", &format!("2025-12-0{}", day)))
                .await
                .unwrap();
            ids.push(created.id);
        }
        let mut unique = ids.clone();
        unique.sort_unstable();
        unique.dedup();
        assert_eq!(unique.len(), ids.len());
    }

    #[tokio::test]
    async fn test_invalid_create_persists_nothing() {
        let (_dir, repository) = test_repository().await;

        for bad in [
            expense(0.0, "food", "2025-12-23"),
            expense(-5.0, "food", "2025-12-23"),
            expense(5.0, "", "2025-12-23"),
            expense(5.0, "food", "not-a-date"),
        ] {
            let err = repository.create(&bad).await.unwrap_err();
            assert!(matches!(err, ExpenseError::Validation(_)));
        }

        let all = repository.list(&ExpenseQuery::default()).await.unwrap();
        assert!(all.is_empty());
    }

    #[tokio::test]
    async fn test_delete_then_get_is_not_found() {
        let (_dir, repository) = test_repository().await;

        let created = repository
            .create(&expense(12.5, "transport", "2025-11-02"))
            .await
            .unwrap();

        let deleted = repository.delete(created.id).await.unwrap();
        assert_eq!(deleted, DeleteResult::deleted(created.id));

        assert!(matches!(
            repository.get(created.id).await,
            Err(ExpenseError::NotFound(id)) if id == created.id
        ));
        assert!(matches!(
            repository.delete(created.id).await,
            Err(ExpenseError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_delete_missing_is_not_found_twice() {
        let (_dir, repository) = test_repository().await;

        for _ in 0..2 {
            assert!(matches!(
                repository.delete(4242).await,
                Err(ExpenseError::NotFound(4242))
            ));
        }
    }

    #[tokio::test]
    async fn test_concurrent_deletes_have_one_winner() {
        let (_dir, repository) = test_repository().await;
        let created = repository
            .create(&expense(3.0, "food", "2025-12-01"))
            .await
            .unwrap();

        let (first, second) = tokio::join!(
            repository.delete(created.id),
            repository.delete(created.id)
        );
        let outcomes = [first.is_ok(), second.is_ok()];
        assert_eq!(outcomes.iter().filter(|ok| **ok).count(), 1);
    }

    #[tokio::test]
    async fn test_list_date_range_is_inclusive() {
        let (_dir, repository) = test_repository().await;

        for date in ["2025-11-30", "2025-12-01", "2025-12-15", "2025-12-31", "2026-01-01"] {
            repository.create(&expense(1.0, "food", date)).await.unwrap();
        }

        let listed = repository
            .list(&ExpenseQuery {
                start_date: Some("2025-12-01".to_string()),
                end_date: Some("2025-12-31".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let dates: Vec<String> = listed.iter().map(|e| e.expense_date.to_string()).collect();
        assert_eq!(dates, vec!["2025-12-31", "2025-12-15", "2025-12-01"]);
    }

    #[tokio::test]
    async fn test_list_orders_by_date_then_id_descending() {
        let (_dir, repository) = test_repository().await;

        let a = repository.create(&expense(1.0, "food", "2025-12-10")).await.unwrap();
        let b = repository.create(&expense(2.0, "food", "2025-12-10")).await.unwrap();
        let c = repository.create(&expense(3.0, "food", "2025-12-11")).await.unwrap();

        let listed = repository.list(&ExpenseQuery::default()).await.unwrap();
        let ids: Vec<i64> = listed.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![c.id, b.id, a.id]);
    }

    #[tokio::test]
    async fn test_list_category_is_exact_match() {
        let (_dir, repository) = test_repository().await;

        repository.create(&expense(1.0, "food", "2025-12-10")).await.unwrap();
        repository.create(&expense(2.0, "Food", "2025-12-10")).await.unwrap();
        repository.create(&expense(3.0, "transport", "2025-12-10")).await.unwrap();

        let listed = repository
            .list(&ExpenseQuery {
                category: Some(" food ".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].category, "food");
    }

    #[tokio::test]
    async fn test_list_pagination() {
        let (_dir, repository) = test_repository().await;

        for day in 1..=9 {
            repository
                .create(&expense(day as f64, "food", &format!("2025-12-0{}", day)))
                .await
                .unwrap();
        }

        let page = |limit, offset| ExpenseQuery {
            limit: Some(limit),
            offset: Some(offset),
            ..Default::default()
        };

        let first = repository.list(&page(4, 0)).await.unwrap();
        let second = repository.list(&page(4, 4)).await.unwrap();
        let last = repository.list(&page(4, 8)).await.unwrap();

        assert_eq!(first.len(), 4);
        assert_eq!(second.len(), 4);
        assert_eq!(last.len(), 1);
        assert_eq!(first[0].expense_date.to_string(), "2025-12-09");
        assert_eq!(last[0].expense_date.to_string(), "2025-12-01");
    }

    #[tokio::test]
    async fn test_monthly_summary_example() {
        let (_dir, repository) = test_repository().await;

        repository
            .create(&expense(75000.0, "food", "2025-12-23"))
            .await
            .unwrap();

        let summary = repository.monthly_summary(&december(None)).await.unwrap();
        assert_eq!(summary.per_category.get("food"), Some(&cents("75000")));
        assert_eq!(summary.total, cents("75000"));
        assert_eq!(summary.currency, "IDR");
    }

    #[tokio::test]
    async fn test_monthly_summary_totals() {
        let (_dir, repository) = test_repository().await;

        for (amount, category, date) in [
            (100.0, "food", "2025-12-01"),
            (250.0, "food", "2025-12-31"),
            (40.0, "transport", "2025-12-15"),
            (999.0, "food", "2025-11-30"),
            (999.0, "rent", "2026-01-01"),
        ] {
            repository.create(&expense(amount, category, date)).await.unwrap();
        }

        let summary = repository
            .monthly_summary(&december(Some("usd")))
            .await
            .unwrap();

        assert_eq!(summary.per_category.len(), 2);
        assert_eq!(summary.per_category["food"], cents("350"));
        assert_eq!(summary.per_category["transport"], cents("40"));
        assert_eq!(summary.total, cents("390"));
        assert_eq!(summary.per_category.values().sum::<Decimal>(), summary.total);
        assert_eq!(summary.by_category[0].category, "food");
        assert_eq!(summary.currency, "USD");
    }

    #[tokio::test]
    async fn test_monthly_summary_empty_month() {
        let (_dir, repository) = test_repository().await;

        let summary = repository.monthly_summary(&december(None)).await.unwrap();
        assert!(summary.per_category.is_empty());
        assert!(summary.by_category.is_empty());
        assert_eq!(summary.total, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_sub_cent_amount_is_rejected_and_half_cent_rounds_up() {
        let (_dir, repository) = test_repository().await;

        let err = repository
            .create(&expense(0.004, "food", "2025-12-05"))
            .await
            .unwrap_err();
        assert!(matches!(err, ExpenseError::Validation(_)));
        assert!(repository.list(&ExpenseQuery::default()).await.unwrap().is_empty());

        let created = repository
            .create(&expense(0.005, "food", "2025-12-05"))
            .await
            .unwrap();
        assert_eq!(created.amount, cents("0.01"));
        assert_eq!(repository.get(created.id).await.unwrap().amount, cents("0.01"));

        let summary = repository.monthly_summary(&december(None)).await.unwrap();
        assert_eq!(summary.total, cents("0.01"));
    }

    #[tokio::test]
    async fn test_monthly_summary_fractional_totals_are_exact() {
        let (_dir, repository) = test_repository().await;

        repository.create(&expense(0.1, "food", "2025-12-02")).await.unwrap();
        repository.create(&expense(0.2, "rent", "2025-12-03")).await.unwrap();

        let summary = repository.monthly_summary(&december(None)).await.unwrap();
        assert_eq!(summary.per_category["food"], cents("0.10"));
        assert_eq!(summary.per_category["rent"], cents("0.20"));
        assert_eq!(summary.total, cents("0.30"));
        assert_eq!(summary.per_category.values().sum::<Decimal>(), summary.total);

        let listed = repository.list(&ExpenseQuery::default()).await.unwrap();
        assert_eq!(listed.iter().map(|e| e.amount).sum::<Decimal>(), summary.total);
    }

    #[tokio::test]
    async fn test_monthly_summary_rejects_bad_month() {
        let (_dir, repository) = test_repository().await;

        let query = SummaryQuery {
            year: 2025,
            month: 13,
            currency: None,
        };
        assert!(matches!(
            repository.monthly_summary(&query).await,
            Err(ExpenseError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn test_custom_default_currency() {
        let (_dir, repository) = test_repository().await;
        let repository = repository.with_default_currency("EUR");

        let summary = repository.monthly_summary(&december(None)).await.unwrap();
        assert_eq!(summary.currency, "EUR");
    }

    #[tokio::test]
    async fn test_storage_failure_surfaces() {
        let (_dir, repository) = test_repository().await;
        repository.database().close().await;

        let err = repository.get(1).await.unwrap_err();
        assert!(matches!(err, ExpenseError::Storage(_)));
    }

    /// Runs against a real server: `TEST_DATABASE_URL=postgres://... cargo test -- --ignored`.
    /// The `expenses` table in that database is emptied first.
    #[tokio::test]
    #[ignore]
    async fn test_postgres_backend_properties() {
        use crate::core::config::DatabaseConfig;

        let Ok(url) = std::env::var("TEST_DATABASE_URL") else {
            return;
        };
        let database = Database::connect(&DatabaseConfig {
            url,
            max_connections: 2,
        })
        .await
        .unwrap();
        assert_eq!(database.backend(), Backend::Postgres);
        database
            .execute(&Statement::new("DELETE FROM expenses"))
            .await
            .unwrap();
        let repository = ExpenseRepository::new(database);

        let mut lunch = expense(0.1, "food", "2025-12-02");
        lunch.description = Some("lunch".to_string());
        let food = repository.create(&lunch).await.unwrap();
        let rent = repository
            .create(&expense(0.2, "rent", "2025-12-03"))
            .await
            .unwrap();
        repository
            .create(&expense(9.0, "food", "2026-01-01"))
            .await
            .unwrap();
        assert!(matches!(
            repository.create(&expense(0.004, "food", "2025-12-04")).await,
            Err(ExpenseError::Validation(_))
        ));

        assert_eq!(repository.get(food.id).await.unwrap(), food);

        let december_only = repository
            .list(&ExpenseQuery {
                start_date: Some("2025-12-01".to_string()),
                end_date: Some("2025-12-31".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();
        let ids: Vec<i64> = december_only.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![rent.id, food.id]);

        let summary = repository.monthly_summary(&december(None)).await.unwrap();
        assert_eq!(summary.total, cents("0.30"));
        assert_eq!(summary.per_category.values().sum::<Decimal>(), summary.total);
        assert_eq!(summary.by_category[0].category, "rent");

        repository.delete(rent.id).await.unwrap();
        for _ in 0..2 {
            assert!(matches!(
                repository.delete(rent.id).await,
                Err(ExpenseError::NotFound(_))
            ));
        }
        assert!(matches!(
            repository.get(rent.id).await,
            Err(ExpenseError::NotFound(_))
        ));
    }
}
