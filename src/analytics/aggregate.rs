// src/analytics/aggregate.rs
//
// Funções puras de agregação sobre as linhas já enriquecidas e filtradas.
// Entrada vazia nunca é erro: o resultado é um mapa/lista vazio.
// As contas usam checked_*: um total fora do intervalo do Decimal vira AppError.

use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use rust_decimal::Decimal;

use crate::{
    analytics::format::{format_currency, format_date},
    common::error::AppError,
    middleware::i18n::Language,
    models::{dashboard::PivotRow, sales::EnrichedTransaction},
};

fn add(a: Decimal, b: Decimal, context: &str) -> Result<Decimal, AppError> {
    a.checked_add(b).ok_or_else(|| AppError::overflow(context))
}

/// Soma simples, sem pânico em caso de estouro.
pub fn checked_sum<I>(values: I) -> Result<Decimal, AppError>
where
    I: IntoIterator<Item = Decimal>,
{
    values
        .into_iter()
        .try_fold(Decimal::ZERO, |acc, value| add(acc, value, "soma"))
}

/// Percentual de `part` sobre `whole` (2 casas). `whole` zero => zero.
pub fn share_of(part: Decimal, whole: Decimal) -> Result<Decimal, AppError> {
    if whole.is_zero() {
        return Ok(Decimal::ZERO);
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .map(|share| share.round_dp(2))
        .ok_or_else(|| AppError::overflow("percentual"))
}

/// Soma o total da linha por grupo. O mapa fica na ordem natural da chave.
pub fn sum_by<K, F>(rows: &[EnrichedTransaction], key_fn: F) -> Result<BTreeMap<K, Decimal>, AppError>
where
    K: Ord,
    F: Fn(&EnrichedTransaction) -> K,
{
    let mut totals = BTreeMap::new();
    for row in rows {
        let total = totals.entry(key_fn(row)).or_insert(Decimal::ZERO);
        *total = add(*total, row.line_total, "soma por grupo")?;
    }
    Ok(totals)
}

/// Acumulado corrente. Os grupos já devem vir na ordem certa
/// (cronológica para períodos), quem chama é responsável por isso.
pub fn cumulative<'a, K, I>(ordered_groups: I) -> Result<Vec<Decimal>, AppError>
where
    K: 'a,
    I: IntoIterator<Item = (&'a K, &'a Decimal)>,
{
    let mut running = Decimal::ZERO;
    ordered_groups
        .into_iter()
        .map(|(_, total)| -> Result<Decimal, AppError> {
            running = add(running, *total, "acumulado")?;
            Ok(running)
        })
        .collect()
}

/// Participação percentual (2 casas). Total geral zero => tudo zero.
pub fn percentage_share<K>(totals: &BTreeMap<K, Decimal>) -> Result<BTreeMap<K, Decimal>, AppError>
where
    K: Ord + Clone,
{
    let grand_total = checked_sum(totals.values().copied())?;
    totals
        .iter()
        .map(|(key, total)| -> Result<(K, Decimal), AppError> {
            Ok((key.clone(), share_of(*total, grand_total)?))
        })
        .collect()
}

/// Os `n` maiores, do maior para o menor. Empates mantêm a ordem do mapa.
pub fn top_n<K>(totals: &BTreeMap<K, Decimal>, n: usize) -> Vec<(K, Decimal)>
where
    K: Ord + Clone,
{
    let mut ranked: Vec<(K, Decimal)> = totals.iter().map(|(k, v)| (k.clone(), *v)).collect();
    // sort_by é estável
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(n);
    ranked
}

// Métricas da tabela dinâmica por grupo
#[derive(Debug, Clone, PartialEq)]
pub struct PivotTotals {
    pub quantity: Decimal,
    pub total: Decimal,
    pub last_sale: NaiveDateTime,
}

/// Agrupa por uma chave composta: soma de quantidade, soma do total e a data da última venda.
pub fn pivot_by<K, F>(rows: &[EnrichedTransaction], key_fn: F) -> Result<BTreeMap<K, PivotTotals>, AppError>
where
    K: Ord,
    F: Fn(&EnrichedTransaction) -> K,
{
    let mut groups: BTreeMap<K, PivotTotals> = BTreeMap::new();
    for row in rows {
        let group = groups.entry(key_fn(row)).or_insert(PivotTotals {
            quantity: Decimal::ZERO,
            total: Decimal::ZERO,
            last_sale: row.issue_date,
        });
        group.quantity = add(group.quantity, row.quantity, "quantidade da tabela")?;
        group.total = add(group.total, row.line_total, "total da tabela")?;
        group.last_sale = group.last_sale.max(row.issue_date);
    }
    Ok(groups)
}

/// Tabela dinâmica produto × categoria, já formatada e ordenada por quantidade (desc).
pub fn pivot(
    rows: &[EnrichedTransaction],
    lang: Language,
    currency_symbol: &str,
) -> Result<Vec<PivotRow>, AppError> {
    let groups = pivot_by(rows, |r| (r.product_name.clone(), r.category_name.clone()))?;

    let mut ordered: Vec<((String, String), PivotTotals)> = groups.into_iter().collect();
    ordered.sort_by(|a, b| b.1.quantity.cmp(&a.1.quantity));

    Ok(ordered
        .into_iter()
        .map(|((product, category), totals)| PivotRow {
            product,
            category,
            quantity: totals.quantity,
            total: format_currency(totals.total, currency_symbol),
            last_sale: format_date(totals.last_sale, lang),
        })
        .collect())
}
