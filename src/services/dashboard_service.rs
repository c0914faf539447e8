// src/services/dashboard_service.rs

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;

use crate::{
    analytics::{
        aggregate::{checked_sum, cumulative, percentage_share, pivot, share_of, sum_by, top_n},
        filter,
        join::join,
        period::{LabelLanguages, MonthGrouping, Period},
    },
    common::error::{translate, AppError},
    db::SalesCache,
    middleware::i18n::Language,
    models::{
        dashboard::{AggregationBucket, DashboardView, FilterOptions, Report, SalesFilter, ViewData},
        sales::EnrichedTransaction,
    },
};

// Quantos produtos entram no donut da visão "circular"
pub const TOP_PRODUCTS: usize = 5;

// Preferências de exibição que vêm da configuração
#[derive(Debug, Clone)]
pub struct ReportSettings {
    pub currency_symbol: String,
    pub month_grouping: MonthGrouping,
    // Idiomas dos rótulos quando o cliente não manda Accept-Language
    pub labels: LabelLanguages,
}

impl Default for ReportSettings {
    fn default() -> Self {
        Self {
            currency_symbol: "S/".to_string(),
            month_grouping: MonthGrouping::YearMonth,
            labels: LabelLanguages::default(),
        }
    }
}

#[derive(Clone)]
pub struct DashboardService {
    cache: Arc<SalesCache>,
    settings: ReportSettings,
}

impl DashboardService {
    pub fn new(cache: Arc<SalesCache>, settings: ReportSettings) -> Self {
        Self { cache, settings }
    }

    // Busca (ou reaproveita do cache) e faz o join. As linhas devolvidas são novas,
    // os dados do cache não são tocados.
    async fn load(&self) -> Result<Vec<EnrichedTransaction>, AppError> {
        let snapshot = self.cache.snapshot().await?;
        join(
            &snapshot.transactions,
            &snapshot.catalog.products,
            &snapshot.catalog.categories,
        )
    }

    pub async fn filter_options(&self) -> Result<FilterOptions, AppError> {
        let rows = self.load().await?;
        Ok(filter::options(&rows))
    }

    /// Fetch -> join -> filtro -> agregação. Sem dados depois do filtro => `Report::Empty`.
    ///
    /// `lang` é o idioma pedido pelo cliente; sem ele, os rótulos seguem a
    /// configuração e as mensagens saem em espanhol.
    pub async fn report(
        &self,
        sales_filter: &SalesFilter,
        view: DashboardView,
        lang: Option<Language>,
    ) -> Result<Report, AppError> {
        let rows = filter::apply(self.load().await?, sales_filter);

        if rows.is_empty() {
            tracing::info!("Nenhuma venda para o filtro {:?}", sales_filter);
            return Ok(Report::Empty {
                message: translate(lang.unwrap_or_default(), "no_data").to_string(),
            });
        }

        let labels = lang.map(LabelLanguages::uniform).unwrap_or(self.settings.labels);
        Ok(Report::Ok {
            total_sales: checked_sum(rows.iter().map(|r| r.line_total))?,
            half_months: half_month_series(&rows, labels)?,
            categories: category_shares(&rows)?,
            data: render_view(view, &rows, labels, &self.settings)?,
        })
    }

    pub async fn refresh(&self) {
        self.cache.invalidate().await;
    }
}

/// Escolhe as agregações de cada visão. Função pura: a visão é um parâmetro.
pub fn render_view(
    view: DashboardView,
    rows: &[EnrichedTransaction],
    labels: LabelLanguages,
    settings: &ReportSettings,
) -> Result<ViewData, AppError> {
    let data = match view {
        DashboardView::Barras => ViewData::Barras {
            monthly: monthly_cumulative(rows, settings.month_grouping, labels)?,
            quarterly: quarterly_shares(rows, labels)?,
        },
        DashboardView::Circular => ViewData::Circular {
            top_products: top_products(rows, TOP_PRODUCTS)?,
            quarterly: quarterly_shares(rows, labels)?,
        },
        DashboardView::Tabla => {
            let table = pivot(rows, labels.months, &settings.currency_symbol)?;
            ViewData::Tabla {
                record_count: table.len(),
                rows: table,
            }
        }
    };
    Ok(data)
}

// Vendas por quincena, em ordem cronológica
pub fn half_month_series(
    rows: &[EnrichedTransaction],
    labels: LabelLanguages,
) -> Result<Vec<AggregationBucket>, AppError> {
    Ok(sum_by(rows, |r| Period::half_month(r.issue_date))?
        .into_iter()
        .map(|(period, total)| AggregationBucket::new(period.label_in(labels), total))
        .collect())
}

pub fn category_shares(rows: &[EnrichedTransaction]) -> Result<Vec<AggregationBucket>, AppError> {
    let totals = sum_by(rows, |r| r.category_name.clone())?;
    with_shares(&totals, |key| key.clone())
}

// Mês a mês com o acumulado (gráfico de linha)
pub fn monthly_cumulative(
    rows: &[EnrichedTransaction],
    grouping: MonthGrouping,
    labels: LabelLanguages,
) -> Result<Vec<AggregationBucket>, AppError> {
    let totals = sum_by(rows, |r| Period::month(r.issue_date, grouping))?;
    let running = cumulative(&totals)?;

    Ok(totals
        .into_iter()
        .zip(running)
        .map(|((period, total), running_total)| AggregationBucket {
            running_total: Some(running_total),
            ..AggregationBucket::new(period.label_in(labels), total)
        })
        .collect())
}

pub fn quarterly_shares(
    rows: &[EnrichedTransaction],
    labels: LabelLanguages,
) -> Result<Vec<AggregationBucket>, AppError> {
    let totals = sum_by(rows, |r| Period::quarter(r.issue_date))?;
    with_shares(&totals, |period| period.label_in(labels))
}

// Top N por faturamento; o percentual é relativo aos N exibidos (é o que o donut mostra)
pub fn top_products(rows: &[EnrichedTransaction], n: usize) -> Result<Vec<AggregationBucket>, AppError> {
    let totals = sum_by(rows, |r| r.product_name.clone())?;
    let ranked = top_n(&totals, n);

    let shown_total = checked_sum(ranked.iter().map(|(_, total)| *total))?;
    ranked
        .into_iter()
        .map(|(name, total)| -> Result<AggregationBucket, AppError> {
            Ok(AggregationBucket {
                percentage_share: Some(share_of(total, shown_total)?),
                ..AggregationBucket::new(name, total)
            })
        })
        .collect()
}

fn with_shares<K, F>(totals: &BTreeMap<K, Decimal>, label: F) -> Result<Vec<AggregationBucket>, AppError>
where
    K: Ord + Clone,
    F: Fn(&K) -> String,
{
    let shares = percentage_share(totals)?;
    Ok(totals
        .iter()
        .map(|(key, total)| AggregationBucket {
            percentage_share: shares.get(key).copied(),
            ..AggregationBucket::new(label(key), *total)
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sales::UNCATEGORIZED_LABEL;
    use crate::test_support::{at, dec, row, tx, MemorySource};
    use std::time::Duration;

    fn service(source: Arc<MemorySource>) -> DashboardService {
        let cache = Arc::new(SalesCache::new(source, Duration::from_secs(300)));
        DashboardService::new(cache, ReportSettings::default())
    }

    fn sample() -> Vec<EnrichedTransaction> {
        vec![
            row(1, at(2023, 11, 2), "1", "100", "Arroz", "Abarrotes"),
            row(2, at(2024, 1, 10), "2", "50", "Widget", "Herramientas"),
            row(3, at(2024, 1, 25), "1", "30", "Widget", "Herramientas"),
            row(4, at(2024, 5, 5), "10", "1", "Clavo", "Ferretería"),
            row(5, at(2024, 11, 30), "3", "20", "Arroz", "Abarrotes"),
        ]
    }

    #[tokio::test]
    async fn widget_scenario_end_to_end() {
        let svc = service(MemorySource::widget_scenario());

        let report = svc
            .report(&SalesFilter::default(), DashboardView::Barras, Some(Language::En))
            .await
            .unwrap();

        let Report::Ok { total_sales, half_months, categories, .. } = report else {
            panic!("esperava dados");
        };
        assert_eq!(total_sales, dec("130"));
        assert_eq!(
            half_months,
            vec![
                AggregationBucket::new("Jan 2024 Q1", dec("100")),
                AggregationBucket::new("Jan 2024 Q2", dec("30")),
            ]
        );
        assert_eq!(categories.len(), 1);
        assert_eq!(categories[0].key, UNCATEGORIZED_LABEL);
        assert_eq!(categories[0].percentage_share, Some(dec("100")));
    }

    #[tokio::test]
    async fn without_requested_language_labels_follow_the_settings() {
        let svc = service(MemorySource::widget_scenario());

        let report = svc
            .report(&SalesFilter::default(), DashboardView::Barras, None)
            .await
            .unwrap();

        let Report::Ok { half_months, data: ViewData::Barras { quarterly, .. }, .. } = report else {
            panic!("esperava dados da visão barras");
        };
        let keys: Vec<&str> = half_months.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, ["Jan 2024 Q1", "Jan 2024 Q2"]);
        assert_eq!(quarterly[0].key, "PRIMER TRIMESTRE");
    }

    #[tokio::test]
    async fn requested_language_applies_to_every_label() {
        let svc = service(MemorySource::widget_scenario());

        let report = svc
            .report(&SalesFilter::default(), DashboardView::Barras, Some(Language::Es))
            .await
            .unwrap();

        let Report::Ok { half_months, .. } = report else {
            panic!("esperava dados");
        };
        assert_eq!(half_months[0].key, "Ene 2024 Q1");
    }

    #[tokio::test]
    async fn corrupt_amounts_fail_the_report_instead_of_panicking() {
        let mut a = tx(1, at(2024, 1, 10), "1", "1", Some(1));
        let mut b = tx(2, at(2024, 1, 11), "1", "1", Some(1));
        a.unit_price = Decimal::MAX;
        b.unit_price = Decimal::MAX;
        let svc = service(MemorySource::new(vec![a, b], vec![], vec![]));

        let result = svc.report(&SalesFilter::default(), DashboardView::Tabla, None).await;
        assert!(matches!(result, Err(AppError::InternalServerError(_))));
    }

    #[tokio::test]
    async fn filter_with_no_match_is_the_empty_state() {
        let svc = service(MemorySource::widget_scenario());
        let filter = SalesFilter {
            category: Some("Bebidas".into()),
            ..Default::default()
        };

        let report = svc.report(&filter, DashboardView::Tabla, Some(Language::Es)).await.unwrap();
        assert!(matches!(report, Report::Empty { ref message } if message.contains("No hay datos")));
    }

    #[tokio::test]
    async fn no_transactions_at_all_is_also_empty() {
        let svc = service(MemorySource::new(vec![], vec![], vec![]));
        let report = svc.report(&SalesFilter::default(), DashboardView::Barras, Some(Language::En)).await.unwrap();
        assert!(matches!(report, Report::Empty { .. }));
    }

    #[tokio::test]
    async fn fetch_failure_aborts_the_report() {
        let svc = service(MemorySource::failing());
        let result = svc.report(&SalesFilter::default(), DashboardView::Barras, None).await;
        assert!(matches!(result, Err(AppError::Fetch(_))));
    }

    #[tokio::test]
    async fn filter_options_come_from_joined_rows() {
        let svc = service(MemorySource::widget_scenario());
        let opts = svc.filter_options().await.unwrap();

        assert_eq!(opts.products, ["Widget"]);
        assert_eq!(opts.categories, [UNCATEGORIZED_LABEL]);
    }

    #[test]
    fn barras_view_has_monthly_running_totals_per_year() {
        let ViewData::Barras { monthly, quarterly } =
            render_view(DashboardView::Barras, &sample(), LabelLanguages::default(), &ReportSettings::default()).unwrap()
        else {
            panic!("visão errada");
        };

        let keys: Vec<&str> = monthly.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, ["2023-11", "2024-01", "2024-05", "2024-11"]);
        let running: Vec<Decimal> = monthly.iter().filter_map(|b| b.running_total).collect();
        assert_eq!(running, vec![dec("100"), dec("230"), dec("240"), dec("300")]);

        // Trimestres não separam anos: nov/2023 e nov/2024 caem no mesmo
        let q4 = quarterly.iter().find(|b| b.key == "CUARTO TRIMESTRE").unwrap();
        assert_eq!(q4.total_amount, dec("160"));
        assert_eq!(q4.percentage_share, Some(dec("53.33")));
    }

    #[test]
    fn month_name_grouping_merges_years() {
        let settings = ReportSettings {
            month_grouping: MonthGrouping::MonthName,
            ..Default::default()
        };
        let ViewData::Barras { monthly, .. } = render_view(DashboardView::Barras, &sample(), LabelLanguages::default(), &settings).unwrap()
        else {
            panic!("visão errada");
        };

        let keys: Vec<&str> = monthly.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(keys, ["Jan", "May", "Nov"]);
        assert_eq!(monthly[2].total_amount, dec("160"));
    }

    #[test]
    fn circular_view_ranks_products_by_revenue() {
        let ViewData::Circular { top_products, .. } =
            render_view(DashboardView::Circular, &sample(), LabelLanguages::uniform(Language::Es), &ReportSettings::default()).unwrap()
        else {
            panic!("visão errada");
        };

        let names: Vec<&str> = top_products.iter().map(|b| b.key.as_str()).collect();
        assert_eq!(names, ["Arroz", "Widget", "Clavo"]);
        assert_eq!(top_products[0].total_amount, dec("160"));
    }

    #[test]
    fn top_products_truncates_to_n() {
        let rows: Vec<EnrichedTransaction> = (1..=8)
            .map(|i| row(i, at(2024, 1, 1), "1", &i.to_string(), &format!("P{}", i), "X"))
            .collect();

        let top = top_products(&rows, TOP_PRODUCTS).unwrap();
        assert_eq!(top.len(), 5);
        assert_eq!(top[0].key, "P8");
        assert_eq!(top[4].key, "P4");
    }

    #[test]
    fn tabla_view_counts_pivot_rows() {
        let ViewData::Tabla { rows, record_count } =
            render_view(DashboardView::Tabla, &sample(), LabelLanguages::uniform(Language::Es), &ReportSettings::default()).unwrap()
        else {
            panic!("visão errada");
        };

        assert_eq!(record_count, 3);
        assert_eq!(rows[0].product, "Clavo");
        assert_eq!(rows[0].total, "S/ 10.00");
        assert_eq!(rows[1].product, "Arroz");
        assert_eq!(rows[1].last_sale, "30-Nov-2024");
    }
}
