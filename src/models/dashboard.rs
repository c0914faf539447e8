// src/models/dashboard.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

// Valores "coringa" que a interface manda quando não há filtro
pub const ALL_CATEGORIES: &str = "Todas";
pub const ALL_PRODUCTS: &str = "Todos";

// 1. Qual visão o usuário escolheu (antes era estado global da sessão)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DashboardView {
    /// Evolução acumulada mês a mês + donut por trimestre
    #[default]
    Barras,
    /// Top 5 produtos + donut por trimestre
    Circular,
    /// Tabela dinâmica produto × categoria
    Tabla,
}

// 2. Filtros da barra lateral (query string)
#[derive(Debug, Clone, Default, Deserialize, Validate, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct ReportQuery {
    #[serde(default)]
    pub view: DashboardView,
    /// Data inicial (inclusive), YYYY-MM-DD
    pub from: Option<NaiveDate>,
    /// Data final (inclusive), YYYY-MM-DD
    pub to: Option<NaiveDate>,
    #[validate(length(min = 1, max = 200))]
    pub category: Option<String>,
    #[validate(length(min = 1, max = 200))]
    pub product: Option<String>,
}

// Filtro já normalizado (coringas viram None)
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category: Option<String>,
    pub product: Option<String>,
}

impl From<&ReportQuery> for SalesFilter {
    fn from(query: &ReportQuery) -> Self {
        Self {
            from: query.from,
            to: query.to,
            category: query.category.clone().filter(|c| c != ALL_CATEGORIES),
            product: query.product.clone().filter(|p| p != ALL_PRODUCTS),
        }
    }
}

// 3. Opções para montar os filtros na interface
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FilterOptions {
    pub min_date: Option<NaiveDate>,
    pub max_date: Option<NaiveDate>,
    pub categories: Vec<String>,
    pub products: Vec<String>,
}

// 4. Um ponto de série (período, categoria ou produto)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AggregationBucket {
    pub key: String,
    pub total_amount: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub running_total: Option<Decimal>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percentage_share: Option<Decimal>,
}

impl AggregationBucket {
    pub fn new(key: impl Into<String>, total_amount: Decimal) -> Self {
        Self {
            key: key.into(),
            total_amount,
            running_total: None,
            percentage_share: None,
        }
    }
}

// 5. Linha da tabela dinâmica (valores já formatados para exibição)
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PivotRow {
    pub product: String,
    pub category: String,
    pub quantity: Decimal,
    /// "S/ 1,234.50"
    pub total: String,
    /// "DD-Mon-YYYY"
    pub last_sale: String,
}

// 6. Conteúdo específico de cada visão
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "view", rename_all = "lowercase")]
pub enum ViewData {
    #[serde(rename_all = "camelCase")]
    Barras {
        monthly: Vec<AggregationBucket>,
        quarterly: Vec<AggregationBucket>,
    },
    #[serde(rename_all = "camelCase")]
    Circular {
        top_products: Vec<AggregationBucket>,
        quarterly: Vec<AggregationBucket>,
    },
    #[serde(rename_all = "camelCase")]
    Tabla {
        rows: Vec<PivotRow>,
        record_count: usize,
    },
}

// 7. Resposta do relatório. "empty" não é erro: é o estado "sem dados".
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum Report {
    #[serde(rename_all = "camelCase")]
    Ok {
        total_sales: Decimal,
        half_months: Vec<AggregationBucket>,
        categories: Vec<AggregationBucket>,
        data: ViewData,
    },
    Empty {
        message: String,
    },
}
