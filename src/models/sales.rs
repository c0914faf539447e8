// src/models/sales.rs

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sqlx::FromRow;

use crate::common::error::AppError;

// Rótulo usado quando o produto não tem categoria (ou nem existe)
pub const UNCATEGORIZED_LABEL: &str = "Sin categoría";

// --- 1. Transações (tabela 'transacciones', só as ativas) ---
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Transaction {
    pub id: i64,
    #[sqlx(rename = "fecha_emision")]
    pub issue_date: NaiveDateTime,
    #[sqlx(rename = "cantidad")]
    pub quantity: Decimal,
    #[sqlx(rename = "precio")]
    pub unit_price: Decimal,
    #[sqlx(rename = "producto_id")]
    pub product_id: Option<i64>,
    #[sqlx(rename = "empleado_id")]
    pub employee_id: Option<i64>,
}

impl Transaction {
    /// Total da linha: preço × quantidade, sem arredondar.
    /// Um produto que não cabe no Decimal vira erro, não pânico.
    pub fn line_total(&self) -> Result<Decimal, AppError> {
        self.unit_price
            .checked_mul(self.quantity)
            .ok_or_else(|| AppError::overflow(format!("total da transação {}", self.id)))
    }
}

// --- 2. Produtos ---
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Product {
    pub id: i64,
    #[sqlx(rename = "nombre")]
    pub name: String,
    #[sqlx(rename = "categoria_id")]
    pub category_id: Option<i64>,
}

// --- 3. Categorias ---
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct Category {
    pub id: i64,
    #[sqlx(rename = "nombre")]
    pub name: String,
}

// Produtos + categorias viajam juntos no cache (são lidos juntos)
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
}

// --- 4. Transação enriquecida (saída do join) ---
// product_name fica vazio quando o produto não existe.
// category_name nunca fica vazio: cai no UNCATEGORIZED_LABEL.
// line_total é calculado uma vez no join (Transaction::line_total).
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedTransaction {
    pub id: i64,
    pub issue_date: NaiveDateTime,
    pub quantity: Decimal,
    pub unit_price: Decimal,
    pub product_id: Option<i64>,
    pub employee_id: Option<i64>,
    pub product_name: String,
    pub category_name: String,
    pub line_total: Decimal,
}
