// src/test_support.rs
// Helpers compartilhados pelos testes (só compila com cfg(test))

use std::str::FromStr;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use rust_decimal::Decimal;

use crate::{
    common::error::AppError,
    db::SalesSource,
    models::sales::{Category, EnrichedTransaction, Product, Transaction},
};

pub fn dec(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap()
}

pub fn day(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn at(year: i32, month: u32, d: u32) -> NaiveDateTime {
    day(year, month, d).and_hms_opt(12, 0, 0).unwrap()
}

pub fn tx(id: i64, date: NaiveDateTime, qty: &str, price: &str, product_id: Option<i64>) -> Transaction {
    Transaction {
        id,
        issue_date: date,
        quantity: dec(qty),
        unit_price: dec(price),
        product_id,
        employee_id: Some(7),
    }
}

pub fn product(id: i64, name: &str, category_id: Option<i64>) -> Product {
    Product { id, name: name.to_string(), category_id }
}

pub fn category(id: i64, name: &str) -> Category {
    Category { id, name: name.to_string() }
}

pub fn row(id: i64, date: NaiveDateTime, qty: &str, price: &str, product: &str, category: &str) -> EnrichedTransaction {
    EnrichedTransaction {
        id,
        issue_date: date,
        quantity: dec(qty),
        unit_price: dec(price),
        product_id: Some(id),
        employee_id: None,
        product_name: product.to_string(),
        category_name: category.to_string(),
        line_total: dec(price) * dec(qty),
    }
}

// Fonte em memória: conta quantas vezes cada consulta foi feita
#[derive(Default)]
pub struct MemorySource {
    pub transactions: Vec<Transaction>,
    pub products: Vec<Product>,
    pub categories: Vec<Category>,
    pub fail: bool,
    pub transaction_calls: AtomicUsize,
    pub catalog_calls: AtomicUsize,
}

impl MemorySource {
    pub fn new(transactions: Vec<Transaction>, products: Vec<Product>, categories: Vec<Category>) -> Arc<Self> {
        Arc::new(Self {
            transactions,
            products,
            categories,
            ..Default::default()
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self { fail: true, ..Default::default() })
    }

    // Cenário do relatório: duas vendas de "Widget" em janeiro de 2024, sem categoria
    pub fn widget_scenario() -> Arc<Self> {
        Self::new(
            vec![
                tx(1, at(2024, 1, 10), "2", "50", Some(1)),
                tx(2, at(2024, 1, 20), "1", "30", Some(1)),
            ],
            vec![product(1, "Widget", None)],
            vec![],
        )
    }

    fn check(&self) -> Result<(), AppError> {
        if self.fail {
            return Err(AppError::Fetch(sqlx::Error::PoolTimedOut));
        }
        Ok(())
    }
}

#[async_trait]
impl SalesSource for MemorySource {
    async fn fetch_active_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        self.transaction_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.transactions.clone())
    }

    async fn fetch_products(&self) -> Result<Vec<Product>, AppError> {
        self.catalog_calls.fetch_add(1, Ordering::SeqCst);
        self.check()?;
        Ok(self.products.clone())
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, AppError> {
        self.check()?;
        Ok(self.categories.clone())
    }
}
