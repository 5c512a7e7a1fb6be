// src/services/analytics_service.rs

use chrono::{DateTime, Datelike, Duration, NaiveDate, TimeZone, Utc};

use crate::{
    common::{error::AppError, sanitize::decimal_or_zero},
    db::{analytics_repo::Period, AnalyticsRepository},
    models::analytics::{
        AnalyticsQuery, AnalyticsSummary, DeadStockEntry, MonthlyRow, MonthlySalesPoint,
        RankedEntry, RankingRow,
    },
};

pub const DEFAULT_LIMIT: u32 = 5;
pub const MAX_LIMIT: u32 = 50;
pub const DEFAULT_DEAD_STOCK_DAYS: u32 = 90;
pub const MAX_DEAD_STOCK_DAYS: u32 = 3650;

#[derive(Clone)]
pub struct AnalyticsService {
    repo: AnalyticsRepository,
}

impl AnalyticsService {
    pub fn new(repo: AnalyticsRepository) -> Self {
        Self { repo }
    }

    /// Cards do painel: mês pedido (ou o atual).
    pub async fn summary(&self, query: &AnalyticsQuery) -> Result<AnalyticsSummary, AppError> {
        let month = match query.month.as_deref() {
            Some(month) => month.trim().to_string(),
            None => Utc::now().format("%Y-%m").to_string(),
        };
        let period = month_period(&month)?;

        let row = self.repo.summary(period).await?;
        let dead_stock = self.repo.dead_stock(dead_stock_cutoff(query.days, Utc::now())).await?;

        Ok(AnalyticsSummary {
            month,
            sales_total: decimal_or_zero(row.sales_total),
            profit: decimal_or_zero(row.profit),
            invoice_count: row.invoice_count.unwrap_or(0),
            dead_stock_count: dead_stock.len() as i64,
        })
    }

    pub async fn monthly_sales(&self, query: &AnalyticsQuery) -> Result<Vec<MonthlySalesPoint>, AppError> {
        let year = query.year.unwrap_or_else(|| Utc::now().year());
        let rows = self.repo.monthly(year_period(year)?).await?;
        Ok(fill_months(year, rows))
    }

    pub async fn dead_stock(&self, query: &AnalyticsQuery) -> Result<Vec<DeadStockEntry>, AppError> {
        self.repo.dead_stock(dead_stock_cutoff(query.days, Utc::now())).await
    }

    pub async fn top_products(&self, query: &AnalyticsQuery) -> Result<Vec<RankedEntry>, AppError> {
        let (period, limit) = ranking_params(query)?;
        Ok(rank(self.repo.top_products(period, limit).await?))
    }

    pub async fn top_customers(&self, query: &AnalyticsQuery) -> Result<Vec<RankedEntry>, AppError> {
        let (period, limit) = ranking_params(query)?;
        Ok(rank(self.repo.top_customers(period, limit).await?))
    }

    pub async fn top_companies(&self, query: &AnalyticsQuery) -> Result<Vec<RankedEntry>, AppError> {
        let (period, limit) = ranking_params(query)?;
        Ok(rank(self.repo.top_companies(period, limit).await?))
    }

    pub async fn leaderboard(&self, query: &AnalyticsQuery) -> Result<Vec<RankedEntry>, AppError> {
        let (period, limit) = ranking_params(query)?;
        Ok(rank(self.repo.leaderboard(period, limit).await?))
    }
}

fn ranking_params(query: &AnalyticsQuery) -> Result<(Period, i64), AppError> {
    let period = match query.month.as_deref() {
        Some(month) => month_period(month)?,
        None => Period::default(),
    };
    Ok((period, i64::from(clamp_limit(query.limit))))
}

pub fn clamp_limit(limit: Option<u32>) -> u32 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Sem venda desde este instante = estoque parado. Janela de 1 a 3650 dias.
pub fn dead_stock_cutoff(days: Option<u32>, now: DateTime<Utc>) -> DateTime<Utc> {
    let days = days.unwrap_or(DEFAULT_DEAD_STOCK_DAYS).clamp(1, MAX_DEAD_STOCK_DAYS);
    now - Duration::days(i64::from(days))
}

/// `"YYYY-MM"` → `[primeiro dia do mês, primeiro dia do mês seguinte)` em UTC.
pub fn month_period(month: &str) -> Result<Period, AppError> {
    let invalid = || AppError::BadRequest(format!("month must be YYYY-MM, got '{}'", month));

    let (year, mon) = month.trim().split_once('-').ok_or_else(invalid)?;
    let year: i32 = year.parse().map_err(|_| invalid())?;
    let mon: u32 = mon.parse().map_err(|_| invalid())?;

    let start = NaiveDate::from_ymd_opt(year, mon, 1).ok_or_else(invalid)?;
    let end = if mon == 12 {
        NaiveDate::from_ymd_opt(year + 1, 1, 1)
    } else {
        NaiveDate::from_ymd_opt(year, mon + 1, 1)
    }
    .ok_or_else(invalid)?;

    Ok(Period { from: Some(midnight_utc(start)), to: Some(midnight_utc(end)) })
}

pub fn year_period(year: i32) -> Result<Period, AppError> {
    let invalid = || AppError::BadRequest(format!("invalid year {}", year));
    let start = NaiveDate::from_ymd_opt(year, 1, 1).ok_or_else(invalid)?;
    let end = NaiveDate::from_ymd_opt(year + 1, 1, 1).ok_or_else(invalid)?;
    Ok(Period { from: Some(midnight_utc(start)), to: Some(midnight_utc(end)) })
}

fn midnight_utc(date: NaiveDate) -> chrono::DateTime<Utc> {
    Utc.from_utc_datetime(&date.and_time(chrono::NaiveTime::MIN))
}

/// Doze pontos `YYYY-01..YYYY-12`; meses sem venda ficam com zero.
pub fn fill_months(year: i32, rows: Vec<MonthlyRow>) -> Vec<MonthlySalesPoint> {
    (1..=12)
        .map(|m| {
            let key = format!("{year:04}-{m:02}");
            let row = rows.iter().find(|r| r.month.as_deref() == Some(key.as_str()));
            MonthlySalesPoint {
                sales: decimal_or_zero(row.and_then(|r| r.sales)),
                profit: decimal_or_zero(row.and_then(|r| r.profit)),
                month: key,
            }
        })
        .collect()
}

/// Numera o ranking (1, 2, 3…) na ordem em que o banco devolveu.
pub fn rank(rows: Vec<RankingRow>) -> Vec<RankedEntry> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| RankedEntry {
            rank: i as u32 + 1,
            id: row.id,
            name: row.name.unwrap_or_default(),
            orders: row.orders.unwrap_or(0),
            quantity: row.quantity.unwrap_or(0),
            total: decimal_or_zero(row.total),
        })
        .collect()
}
