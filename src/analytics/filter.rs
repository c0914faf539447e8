// src/analytics/filter.rs

use std::collections::BTreeSet;

use crate::models::{
    dashboard::{FilterOptions, SalesFilter},
    sales::EnrichedTransaction,
};

/// Aplica data (inclusive nas duas pontas), categoria e produto.
/// Um intervalo invertido simplesmente não casa com nada.
pub fn apply(rows: Vec<EnrichedTransaction>, filter: &SalesFilter) -> Vec<EnrichedTransaction> {
    rows.into_iter()
        .filter(|r| {
            let date = r.issue_date.date();
            filter.from.is_none_or(|from| date >= from)
                && filter.to.is_none_or(|to| date <= to)
                && filter.category.as_deref().is_none_or(|c| r.category_name == c)
                && filter.product.as_deref().is_none_or(|p| r.product_name == p)
        })
        .collect()
}

/// Limites de data e listas ordenadas (sem repetição) para os seletores.
pub fn options(rows: &[EnrichedTransaction]) -> FilterOptions {
    let categories: BTreeSet<&str> = rows.iter().map(|r| r.category_name.as_str()).collect();
    let products: BTreeSet<&str> = rows
        .iter()
        .map(|r| r.product_name.as_str())
        .filter(|name| !name.is_empty())
        .collect();

    FilterOptions {
        min_date: rows.iter().map(|r| r.issue_date.date()).min(),
        max_date: rows.iter().map(|r| r.issue_date.date()).max(),
        categories: categories.into_iter().map(String::from).collect(),
        products: products.into_iter().map(String::from).collect(),
    }
}
