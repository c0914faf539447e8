// src/docs.rs

use utoipa::OpenApi;
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    info(title = "Reporte de Ventas", description = "Séries e tabela dinâmica das vendas do Supabase"),
    paths(
        // --- Dashboard ---
        handlers::dashboard::get_filter_options,
        handlers::dashboard::get_report,
        handlers::dashboard::refresh,
    ),
    components(
        schemas(
            // --- DASHBOARD ---
            models::dashboard::DashboardView,
            models::dashboard::FilterOptions,
            models::dashboard::AggregationBucket,
            models::dashboard::PivotRow,
            models::dashboard::ViewData,
            models::dashboard::Report,
        )
    ),
    tags(
        (name = "Dashboard", description = "Relatório de vendas: quincenas, categorias, meses, trimestres e tabela dinâmica")
    )
)]
pub struct ApiDoc;
