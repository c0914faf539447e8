// src/handlers/dashboard.rs

use axum::{
    extract::{rejection::QueryRejection, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::i18n::Locale,
    models::dashboard::{FilterOptions, Report, ReportQuery, SalesFilter},
};

// GET /api/dashboard/filters
#[utoipa::path(
    get,
    path = "/api/dashboard/filters",
    tag = "Dashboard",
    responses(
        (status = 200, description = "Datas mínima/máxima, categorias e produtos disponíveis", body = FilterOptions),
        (status = 502, description = "Falha ao consultar o Supabase")
    )
)]
pub async fn get_filter_options(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<impl IntoResponse, ApiError> {
    let options = app_state
        .dashboard_service
        .filter_options()
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(options)))
}

// GET /api/dashboard/report
#[utoipa::path(
    get,
    path = "/api/dashboard/report",
    tag = "Dashboard",
    params(ReportQuery),
    responses(
        (status = 200, description = "Séries da visão escolhida, ou o estado 'empty' quando o filtro não retorna vendas", body = Report),
        (status = 400, description = "Parâmetro inválido"),
        (status = 500, description = "Valores de venda fora do intervalo numérico"),
        (status = 502, description = "Falha ao consultar o Supabase")
    )
)]
pub async fn get_report(
    State(app_state): State<AppState>,
    locale: Locale,
    query: Result<Query<ReportQuery>, QueryRejection>,
) -> Result<impl IntoResponse, ApiError> {
    // view/data mal formados viram o mesmo JSON de erro que o resto da API
    let Query(query) = query
        .map_err(|rejection| AppError::InvalidParameter(rejection.body_text()).to_api_error(&locale))?;

    query
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let filter = SalesFilter::from(&query);
    let report = app_state
        .dashboard_service
        .report(&filter, query.view, locale.0)
        .await
        .map_err(|app_err| app_err.to_api_error(&locale))?;

    Ok((StatusCode::OK, Json(report)))
}

// POST /api/dashboard/refresh
#[utoipa::path(
    post,
    path = "/api/dashboard/refresh",
    tag = "Dashboard",
    responses(
        (status = 204, description = "Cache descartado; a próxima leitura vai ao banco")
    )
)]
pub async fn refresh(State(app_state): State<AppState>) -> StatusCode {
    app_state.dashboard_service.refresh().await;
    StatusCode::NO_CONTENT
}
