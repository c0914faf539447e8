// src/db/sales_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    models::sales::{Category, Product, Transaction},
};

// As três consultas de leitura que o relatório precisa.
// A trait existe para o cache e o serviço não dependerem do Postgres
// (nos testes usamos uma fonte em memória).
#[async_trait]
pub trait SalesSource: Send + Sync {
    /// Todas as transações com `activo = true`. Sem filtro de data.
    async fn fetch_active_transactions(&self) -> Result<Vec<Transaction>, AppError>;

    async fn fetch_products(&self) -> Result<Vec<Product>, AppError>;

    async fn fetch_categories(&self) -> Result<Vec<Category>, AppError>;
}

// O repositório de vendas, responsável pelas tabelas do Supabase
#[derive(Clone)]
pub struct SalesRepository {
    pool: PgPool,
}

impl SalesRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SalesSource for SalesRepository {
    async fn fetch_active_transactions(&self) -> Result<Vec<Transaction>, AppError> {
        // Os casts deixam os tipos estáveis independente de como a coluna foi criada
        // (date/timestamptz -> timestamp, integer/real -> numeric)
        let rows = sqlx::query_as::<_, Transaction>(
            r#"
            SELECT
                id::bigint AS id,
                fecha_emision::timestamp AS fecha_emision,
                cantidad::numeric AS cantidad,
                precio::numeric AS precio,
                producto_id::bigint AS producto_id,
                empleado_id::bigint AS empleado_id
            FROM transacciones
            WHERE activo = true
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        tracing::info!("📥 {} transações ativas carregadas", rows.len());
        Ok(rows)
    }

    async fn fetch_products(&self) -> Result<Vec<Product>, AppError> {
        let rows = sqlx::query_as::<_, Product>(
            r#"
            SELECT id::bigint AS id, nombre, categoria_id::bigint AS categoria_id
            FROM productos
            "#,
        )
            .fetch_all(&self.pool)
            .await?;

        tracing::info!("📥 {} produtos carregados", rows.len());
        Ok(rows)
    }

    async fn fetch_categories(&self) -> Result<Vec<Category>, AppError> {
        let rows = sqlx::query_as::<_, Category>(
            "SELECT id::bigint AS id, nombre FROM categorias",
        )
            .fetch_all(&self.pool)
            .await?;

        tracing::info!("📥 {} categorias carregadas", rows.len());
        Ok(rows)
    }
}
