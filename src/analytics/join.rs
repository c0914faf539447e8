// src/analytics/join.rs

use std::collections::HashMap;

use crate::{
    common::error::AppError,
    models::sales::{Category, EnrichedTransaction, Product, Transaction, UNCATEGORIZED_LABEL},
};

/// Left join transação -> produto -> categoria.
///
/// Nunca descarta linhas: uma venda de produto desconhecido continua no
/// resultado (nome vazio, categoria sentinela), senão o faturamento some.
/// A saída tem o mesmo tamanho e a mesma ordem da entrada.
/// Só falha se o total de alguma linha não couber no Decimal.
pub fn join(
    transactions: &[Transaction],
    products: &[Product],
    categories: &[Category],
) -> Result<Vec<EnrichedTransaction>, AppError> {
    let category_names: HashMap<i64, &str> = categories
        .iter()
        .map(|c| (c.id, c.name.as_str()))
        .collect();

    // Produto -> (nome, categoria já resolvida)
    let product_info: HashMap<i64, (&str, &str)> = products
        .iter()
        .map(|p| {
            let category = p
                .category_id
                .and_then(|id| category_names.get(&id).copied())
                .unwrap_or(UNCATEGORIZED_LABEL);
            (p.id, (p.name.as_str(), category))
        })
        .collect();

    transactions
        .iter()
        .map(|t| -> Result<EnrichedTransaction, AppError> {
            let (product_name, category_name) = t
                .product_id
                .and_then(|id| product_info.get(&id).copied())
                .unwrap_or(("", UNCATEGORIZED_LABEL));

            Ok(EnrichedTransaction {
                id: t.id,
                issue_date: t.issue_date,
                quantity: t.quantity,
                unit_price: t.unit_price,
                product_id: t.product_id,
                employee_id: t.employee_id,
                product_name: product_name.to_string(),
                category_name: category_name.to_string(),
                line_total: t.line_total()?,
            })
        })
        .collect()
}
