// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::middleware::i18n::{Language, Locale};

#[derive(Debug, Error)]
pub enum AppError {
    // Falta de credenciais ou valor inválido no ambiente: fatal na inicialização
    #[error("Erro de configuração: {0}")]
    Configuration(String),

    // Falha na chamada ao banco remoto: aborta o relatório atual, sem retry
    #[error("Erro ao consultar o banco de dados: {0}")]
    Fetch(#[from] sqlx::Error),

    #[error("Parâmetro inválido: {0}")]
    InvalidParameter(String),

    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    // Conta com Decimal que estourou (preço ou quantidade corrompidos na origem)
    pub fn overflow(context: impl std::fmt::Display) -> Self {
        AppError::InternalServerError(anyhow::anyhow!("estouro aritmético em {}", context))
    }
}

// O erro que efetivamente vai para o cliente (já traduzido)
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let lang = locale.language();
        match self {
            AppError::Fetch(e) => {
                tracing::error!("🔥 Falha ao consultar o Supabase: {:?}", e);
                ApiError {
                    status: StatusCode::BAD_GATEWAY,
                    message: translate(lang, "fetch_failed").to_string(),
                }
            }
            AppError::InvalidParameter(detail) => ApiError {
                status: StatusCode::BAD_REQUEST,
                message: format!("{} {}", translate(lang, "invalid_parameter"), detail),
            },
            AppError::ValidationError(errors) => {
                let fields: Vec<String> = errors
                    .field_errors()
                    .keys()
                    .map(|field| field.to_string())
                    .collect();
                ApiError {
                    status: StatusCode::BAD_REQUEST,
                    message: format!("{} {}", translate(lang, "invalid_parameter"), fields.join(", ")),
                }
            }
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                ApiError {
                    status: StatusCode::INTERNAL_SERVER_ERROR,
                    message: translate(lang, "internal").to_string(),
                }
            }
        }
    }
}

// Textos visíveis ao usuário, por idioma
pub fn translate(lang: Language, key: &str) -> &'static str {
    match (lang, key) {
        (Language::Es, "fetch_failed") => "No se pudieron cargar los datos de ventas. Inténtalo de nuevo más tarde.",
        (Language::En, "fetch_failed") => "Sales data could not be loaded. Please try again later.",
        (Language::Es, "invalid_parameter") => "Parámetro inválido:",
        (Language::En, "invalid_parameter") => "Invalid parameter:",
        (Language::Es, "no_data") => "⚠️ No hay datos con las combinaciones de filtros seleccionadas. Por favor, ajusta los filtros.",
        (Language::En, "no_data") => "⚠️ No data matches the selected filters. Please adjust them.",
        (Language::Es, _) => "Ocurrió un error inesperado.",
        (Language::En, _) => "An unexpected error occurred.",
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}
