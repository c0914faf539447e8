// src/db/cache.rs

use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::RwLock;

use crate::{
    common::error::AppError,
    db::SalesSource,
    models::sales::{Catalog, Transaction},
};

// Uma entrada do cache: o valor, quando foi buscado e por quanto tempo vale.
// A validade é checada na leitura.
#[derive(Debug)]
pub struct CacheEntry<T> {
    pub value: Arc<T>,
    pub fetched_at: Instant,
    pub ttl: Duration,
}

impl<T> CacheEntry<T> {
    pub fn new(value: T, ttl: Duration) -> Self {
        Self {
            value: Arc::new(value),
            fetched_at: Instant::now(),
            ttl,
        }
    }

    pub fn is_fresh(&self) -> bool {
        self.fetched_at.elapsed() < self.ttl
    }
}

fn fresh_value<T>(slot: &Option<CacheEntry<T>>) -> Option<Arc<T>> {
    slot.as_ref()
        .filter(|entry| entry.is_fresh())
        .map(|entry| entry.value.clone())
}

// Fotografia imutável dos dados; quem precisa derivar algo cria novas linhas
#[derive(Debug, Clone)]
pub struct SalesSnapshot {
    pub transactions: Arc<Vec<Transaction>>,
    pub catalog: Arc<Catalog>,
}

// Memoização das duas leituras (transações; produtos + categorias).
// Compartilhado entre todas as requisições.
pub struct SalesCache {
    source: Arc<dyn SalesSource>,
    ttl: Duration,
    transactions: RwLock<Option<CacheEntry<Vec<Transaction>>>>,
    catalog: RwLock<Option<CacheEntry<Catalog>>>,
}

impl SalesCache {
    pub fn new(source: Arc<dyn SalesSource>, ttl: Duration) -> Self {
        Self {
            source,
            ttl,
            transactions: RwLock::new(None),
            catalog: RwLock::new(None),
        }
    }

    pub async fn snapshot(&self) -> Result<SalesSnapshot, AppError> {
        Ok(SalesSnapshot {
            transactions: self.transactions().await?,
            catalog: self.catalog().await?,
        })
    }

    pub async fn transactions(&self) -> Result<Arc<Vec<Transaction>>, AppError> {
        if let Some(value) = fresh_value(&*self.transactions.read().await) {
            tracing::debug!("cache hit: transações");
            return Ok(value);
        }

        let mut slot = self.transactions.write().await;
        // Outra requisição pode ter recarregado enquanto esperávamos o lock
        if let Some(value) = fresh_value(&slot) {
            return Ok(value);
        }

        // Se falhar, a entrada antiga (vencida) fica como está
        let rows = self.source.fetch_active_transactions().await?;
        let entry = CacheEntry::new(rows, self.ttl);
        let value = entry.value.clone();
        *slot = Some(entry);
        Ok(value)
    }

    pub async fn catalog(&self) -> Result<Arc<Catalog>, AppError> {
        if let Some(value) = fresh_value(&*self.catalog.read().await) {
            tracing::debug!("cache hit: catálogo");
            return Ok(value);
        }

        let mut slot = self.catalog.write().await;
        if let Some(value) = fresh_value(&slot) {
            return Ok(value);
        }

        let catalog = Catalog {
            products: self.source.fetch_products().await?,
            categories: self.source.fetch_categories().await?,
        };
        let entry = CacheEntry::new(catalog, self.ttl);
        let value = entry.value.clone();
        *slot = Some(entry);
        Ok(value)
    }

    /// Descarta as duas entradas; a próxima leitura vai ao banco.
    pub async fn invalidate(&self) {
        *self.transactions.write().await = None;
        *self.catalog.write().await = None;
        tracing::info!("🧹 Cache de vendas descartado");
    }
}
