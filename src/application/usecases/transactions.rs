use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::{error, info};
use uuid::Uuid;

use crate::{
    application::usecases::{
        export_formatter,
        log_query::{check_export_size, page_offset, validate_page},
    },
    config::config_model::Reporting,
    domain::{
        entities::transactions::TransactionEntity,
        errors::{ReportingError, ReportingResult},
        repositories::transactions::TransactionRepository,
        value_objects::{
            date_ranges::DateRange,
            enums::{
                date_range_presets::DateRangePreset,
                export_formats::{LogExportFormat, ReportFormat},
                transaction_statuses::TransactionStatus,
            },
            exports::ExportPayload,
            pagination::PageMeta,
            plans::format_money,
            time_windows::TimeWindow,
            transaction_filters::TransactionFilters,
            transactions::{
                Growth, MonthlyTransactions, PeriodTotals, TransactionPage, TransactionRecord,
                TransactionStats, TransactionStatusCounts, TransactionView, growth_percent,
            },
        },
    },
};

const EXPORT_BASE_NAME: &str = "transactions";
const REPORT_BASE_NAME: &str = "transactions_report";

pub struct TransactionUseCase<T>
where
    T: TransactionRepository + Send + Sync + 'static,
{
    transaction_repo: Arc<T>,
    limits: Reporting,
}

impl<T> TransactionUseCase<T>
where
    T: TransactionRepository + Send + Sync + 'static,
{
    pub fn new(transaction_repo: Arc<T>, limits: Reporting) -> Self {
        Self {
            transaction_repo,
            limits,
        }
    }

    pub fn default_page_size(&self) -> i64 {
        self.limits.default_page_size
    }

    pub async fn list(
        &self,
        filters: TransactionFilters,
        page: i64,
        page_size: i64,
    ) -> ReportingResult<TransactionPage> {
        validate_page(page, page_size, self.limits.max_page_size)?;

        let offset = page_offset(page, page_size)?;
        let (mut rows, total) = self
            .transaction_repo
            .find_transactions(filters.clone(), offset, page_size)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "transactions: failed to load transactions");
                ReportingError::Upstream(err)
            })?;

        let meta = PageMeta::new(total, page, page_size);
        if meta.page != page && total > 0 {
            let (clamped, _) = self
                .transaction_repo
                .find_transactions(filters, meta.offset(), page_size)
                .await
                .map_err(|err| {
                    error!(db_error = ?err, "transactions: failed to load clamped page");
                    ReportingError::Upstream(err)
                })?;
            rows = clamped;
        }

        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

        Ok(TransactionPage {
            entries: rows.into_iter().map(Into::into).collect(),
            meta,
        })
    }

    /// Payment history of one user. Caller-supplied filters cannot widen it past that user.
    pub async fn user_history(
        &self,
        user_id: Uuid,
        filters: TransactionFilters,
        page: i64,
        page_size: i64,
    ) -> ReportingResult<TransactionPage> {
        let filters = TransactionFilters {
            user_id: Some(user_id),
            ..filters
        };
        self.list(filters, page, page_size).await
    }

    pub async fn detail(&self, id: Uuid) -> ReportingResult<TransactionView> {
        self.find(id)
            .await?
            .map(TransactionView::from)
            .ok_or_else(|| ReportingError::NotFound(format!("transaction {id}")))
    }

    /// Someone else's transaction reads as missing, not forbidden.
    pub async fn user_detail(&self, user_id: Uuid, id: Uuid) -> ReportingResult<TransactionView> {
        self.find(id)
            .await?
            .filter(|row| row.user_id == user_id)
            .map(TransactionView::from)
            .ok_or_else(|| ReportingError::NotFound(format!("transaction {id}")))
    }

    pub async fn stats(&self, now: DateTime<Utc>) -> ReportingResult<TransactionStats> {
        let by_status = self
            .transaction_repo
            .count_by_status()
            .await
            .map_err(|err| {
                error!(db_error = ?err, "transactions: failed to count by status");
                ReportingError::Upstream(err)
            })?;

        let mut overall = TransactionStatusCounts::default();
        for (status, count) in by_status {
            overall.total += count;
            match TransactionStatus::from_str(&status) {
                Some(TransactionStatus::Completed) => overall.completed += count,
                Some(TransactionStatus::Pending) => overall.pending += count,
                Some(TransactionStatus::Failed) => overall.failed += count,
                Some(TransactionStatus::Refunded) => overall.refunded += count,
                None => {}
            }
        }

        let today = now.date_naive();
        let this_month = DateRange::preset(DateRangePreset::ThisMonth).window(today)?;
        let last_month = DateRange::preset(DateRangePreset::LastMonth).window(today)?;

        let all_time = self.period_totals(TimeWindow::default()).await?;
        let current = self.period_totals(this_month).await?;
        let previous = self.period_totals(last_month).await?;

        Ok(TransactionStats {
            overall,
            revenue: format_money(all_time.completed_amount_minor),
            monthly: MonthlyTransactions {
                total: current.transactions,
                completed: current.completed,
                amount: format_money(current.completed_amount_minor),
            },
            growth: Growth {
                payments: growth_percent(current.completed, previous.completed),
                revenue: growth_percent(
                    current.completed_amount_minor,
                    previous.completed_amount_minor,
                ),
            },
        })
    }

    pub async fn export(
        &self,
        filters: TransactionFilters,
        format: LogExportFormat,
        now: DateTime<Utc>,
    ) -> ReportingResult<ExportPayload> {
        let records = self.bounded_records(filters).await?;
        info!(rows = records.len(), %format, "transactions: exporting transactions");
        export_formatter::format_records(&records, format, EXPORT_BASE_NAME, now)
    }

    pub async fn report(
        &self,
        range: DateRange,
        format: ReportFormat,
        now: DateTime<Utc>,
    ) -> ReportingResult<ExportPayload> {
        if format == ReportFormat::Pdf {
            return Err(ReportingError::Unsupported("pdf report"));
        }
        let filters = TransactionFilters {
            window: range.window(now.date_naive())?,
            ..TransactionFilters::default()
        };
        let records = self.bounded_records(filters).await?;
        export_formatter::format_report(&records, format, REPORT_BASE_NAME, now)
    }

    async fn bounded_records(
        &self,
        filters: TransactionFilters,
    ) -> ReportingResult<Vec<TransactionRecord>> {
        let matching = self
            .transaction_repo
            .count_transactions(filters.clone())
            .await
            .map_err(|err| {
                error!(db_error = ?err, "transactions: failed to count for export");
                ReportingError::Upstream(err)
            })?;
        check_export_size(matching, self.limits.export_row_limit)?;

        let mut rows = self
            .transaction_repo
            .list_transactions(filters, self.limits.export_row_limit)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "transactions: failed to load for export");
                ReportingError::Upstream(err)
            })?;
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then_with(|| b.id.cmp(&a.id)));

        Ok(rows.into_iter().map(TransactionRecord::from).collect())
    }

    async fn find(&self, id: Uuid) -> ReportingResult<Option<TransactionEntity>> {
        self.transaction_repo
            .find_transaction(id)
            .await
            .map_err(|err| {
                error!(%id, db_error = ?err, "transactions: failed to load transaction");
                ReportingError::Upstream(err)
            })
    }

    async fn period_totals(&self, window: TimeWindow) -> ReportingResult<PeriodTotals> {
        self.transaction_repo
            .period_totals(window)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "transactions: failed to total period");
                ReportingError::Upstream(err)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::repositories::transactions::MockTransactionRepository;
    use chrono::TimeZone;
    use mockall::predicate::eq;

    fn tx(amount_minor: i64, status: &str, day: u32) -> TransactionEntity {
        TransactionEntity {
            id: Uuid::new_v4(),
            user_id: Uuid::new_v4(),
            plan_id: None,
            plan_name: "Premium, yearly".to_string(),
            amount_minor,
            billing_period: "yearly".to_string(),
            payment_method: "credit_card".to_string(),
            payment_id: Some("PAY-1".to_string()),
            status: status.to_string(),
            created_at: Utc.with_ymd_and_hms(2025, 4, day, 10, 0, 0).unwrap(),
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 4, 20, 12, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn stats_compare_this_month_with_last_month() {
        let this_month_start = Utc.with_ymd_and_hms(2025, 4, 1, 0, 0, 0).unwrap();
        let last_month_start = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();

        let mut repo = MockTransactionRepository::new();
        repo.expect_count_by_status().returning(|| {
            Ok(vec![
                ("completed".to_string(), 7),
                ("pending".to_string(), 1),
                ("refunded".to_string(), 1),
                ("chargeback".to_string(), 1),
            ])
        });
        repo.expect_period_totals().returning(move |window| {
            let totals = match window.since {
                None => PeriodTotals {
                    transactions: 10,
                    completed: 7,
                    completed_amount_minor: 70_000,
                },
                Some(since) if since == this_month_start => PeriodTotals {
                    transactions: 4,
                    completed: 3,
                    completed_amount_minor: 30_000,
                },
                Some(since) if since == last_month_start => PeriodTotals {
                    transactions: 2,
                    completed: 2,
                    completed_amount_minor: 20_000,
                },
                Some(_) => PeriodTotals::default(),
            };
            Ok(totals)
        });

        let usecase = TransactionUseCase::new(Arc::new(repo), Reporting::default());
        let stats = usecase.stats(now()).await.unwrap();

        assert_eq!(stats.overall.total, 10);
        assert_eq!(stats.overall.completed, 7);
        assert_eq!(stats.overall.refunded, 1);
        assert_eq!(stats.revenue, "$700.00");
        assert_eq!(stats.monthly.total, 4);
        assert_eq!(stats.monthly.amount, "$300.00");
        assert_eq!(stats.growth.payments, 50.0);
        assert_eq!(stats.growth.revenue, 50.0);
    }

    #[tokio::test]
    async fn list_decorates_rows_and_orders_newest_first() {
        let mut repo = MockTransactionRepository::new();
        repo.expect_find_transactions()
            .returning(|_, _, _| Ok((vec![tx(1000, "failed", 3), tx(2500, "completed", 9)], 2)));

        let usecase = TransactionUseCase::new(Arc::new(repo), Reporting::default());
        let page = usecase
            .list(TransactionFilters::default(), 1, 20)
            .await
            .unwrap();

        assert_eq!(page.meta.total, 2);
        assert_eq!(page.entries[0].record.amount, "25.00");
        assert_eq!(page.entries[0].status_badge, "bg-success");
        assert_eq!(page.entries[1].status_badge, "bg-danger");
        assert_eq!(page.entries[0].payment_method_label, "Credit Card");
    }

    #[tokio::test]
    async fn unaddressable_page_is_rejected_without_querying() {
        let mut repo = MockTransactionRepository::new();
        repo.expect_find_transactions().never();

        let usecase = TransactionUseCase::new(Arc::new(repo), Reporting::default());
        let result = usecase
            .list(TransactionFilters::default(), i64::MAX, 20)
            .await;

        assert!(matches!(
            result,
            Err(ReportingError::Validation { field: "page", .. })
        ));
    }

    #[tokio::test]
    async fn user_history_is_pinned_to_the_caller() {
        let caller = Uuid::new_v4();
        let mut repo = MockTransactionRepository::new();
        repo.expect_find_transactions()
            .withf(move |filters, offset, limit| {
                filters.user_id == Some(caller) && *offset == 0 && *limit == 20
            })
            .times(1)
            .returning(|_, _, _| Ok((vec![], 0)));

        let usecase = TransactionUseCase::new(Arc::new(repo), Reporting::default());
        let filters = TransactionFilters {
            user_id: Some(Uuid::new_v4()),
            ..TransactionFilters::default()
        };
        let page = usecase.user_history(caller, filters, 1, 20).await.unwrap();

        assert!(page.entries.is_empty());
    }

    #[tokio::test]
    async fn detail_of_a_missing_transaction_is_not_found() {
        let mut repo = MockTransactionRepository::new();
        repo.expect_find_transaction().returning(|_| Ok(None));

        let usecase = TransactionUseCase::new(Arc::new(repo), Reporting::default());
        let result = usecase.detail(Uuid::new_v4()).await;

        assert!(matches!(result, Err(ReportingError::NotFound(_))));
    }

    #[tokio::test]
    async fn user_detail_hides_other_users_transactions() {
        let stored = tx(1500, "completed", 5);
        let (id, owner) = (stored.id, stored.user_id);

        let mut repo = MockTransactionRepository::new();
        repo.expect_find_transaction()
            .with(eq(id))
            .returning(move |_| Ok(Some(stored.clone())));

        let usecase = TransactionUseCase::new(Arc::new(repo), Reporting::default());

        let own = usecase.user_detail(owner, id).await.unwrap();
        assert_eq!(own.record.amount, "15.00");

        let foreign = usecase.user_detail(Uuid::new_v4(), id).await;
        assert!(matches!(foreign, Err(ReportingError::NotFound(_))));
    }

    #[tokio::test]
    async fn csv_export_quotes_plan_names() {
        let mut repo = MockTransactionRepository::new();
        repo.expect_count_transactions().returning(|_| Ok(1));
        repo.expect_list_transactions()
            .returning(|_, _| Ok(vec![tx(9600, "completed", 2)]));

        let usecase = TransactionUseCase::new(Arc::new(repo), Reporting::default());
        let payload = usecase
            .export(TransactionFilters::default(), LogExportFormat::Csv, now())
            .await
            .unwrap();

        let text = String::from_utf8(payload.bytes).unwrap();
        assert!(text.starts_with("transaction_id,created_at,user_id,plan_name,amount,"));
        assert!(text.contains(",\"Premium, yearly\",96.00,completed,credit_card,PAY-1,yearly\r\n"));
        assert_eq!(payload.filename, "transactions_20250420_120000.csv");
    }

    #[tokio::test]
    async fn pdf_report_is_unsupported() {
        let usecase =
            TransactionUseCase::new(Arc::new(MockTransactionRepository::new()), Reporting::default());
        let result = usecase
            .report(
                DateRange::preset(DateRangePreset::Last30Days),
                ReportFormat::Pdf,
                now(),
            )
            .await;

        assert!(matches!(result, Err(ReportingError::Unsupported(_))));
    }
}
