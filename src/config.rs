// src/config.rs

use std::{env, str::FromStr, sync::Arc, time::Duration};

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use crate::{
    analytics::period::{LabelLanguages, MonthGrouping},
    common::error::AppError,
    db::{SalesCache, SalesRepository, SalesSource},
    services::dashboard_service::{DashboardService, ReportSettings},
};

// Tudo o que vem do ambiente (.env incluído)
#[derive(Debug, Clone)]
pub struct Config {
    /// URL de conexão Postgres do projeto Supabase
    pub supabase_url: String,
    /// Chave de acesso; usada como senha da conexão
    pub supabase_key: String,
    pub cache_ttl: Duration,
    pub bind_addr: String,
    pub max_connections: u32,
    pub report: ReportSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    // Separado do `env` para poder testar sem mexer nas variáveis do processo
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.trim().is_empty())
                .ok_or_else(|| AppError::Configuration(format!("{} deve ser definida", key)))
        };

        let supabase_url = required("SUPABASE_URL")?;
        let supabase_key = required("SUPABASE_ANON_KEY")?;

        let cache_ttl_secs: u64 = parse_or(&lookup, "CACHE_TTL_SECS", 300)?;
        let max_connections: u32 = parse_or(&lookup, "DB_MAX_CONNECTIONS", 5)?;
        let month_grouping = match lookup("MONTH_GROUPING") {
            Some(raw) => raw.parse::<MonthGrouping>().map_err(AppError::Configuration)?,
            None => MonthGrouping::default(),
        };
        // Idiomas dos rótulos quando a requisição não traz Accept-Language
        let defaults = LabelLanguages::default();
        let labels = LabelLanguages {
            months: parse_or(&lookup, "MONTH_LABELS", defaults.months)?,
            quarters: parse_or(&lookup, "QUARTER_LABELS", defaults.quarters)?,
        };

        Ok(Self {
            supabase_url,
            supabase_key,
            cache_ttl: Duration::from_secs(cache_ttl_secs),
            bind_addr: lookup("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_string()),
            max_connections,
            report: ReportSettings {
                currency_symbol: lookup("CURRENCY_SYMBOL").unwrap_or_else(|| "S/".to_string()),
                month_grouping,
                labels,
            },
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> Result<T, AppError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::Configuration(format!("{} inválida: '{}'", key, raw))),
        None => Ok(default),
    }
}

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub dashboard_service: DashboardService,
}

impl AppState {
    pub fn new(config: &Config) -> Result<Self, AppError> {
        let options = PgConnectOptions::from_str(&config.supabase_url)
            .map_err(|e| AppError::Configuration(format!("SUPABASE_URL inválida: {}", e)))?
            .password(&config.supabase_key);

        // connect_lazy: a primeira consulta é que abre a conexão.
        // Falha de rede vira FetchError no relatório, não derruba o servidor.
        let db_pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(3))
            .connect_lazy_with(options);

        tracing::info!("✅ Pool do Supabase configurada (cache de {}s)", config.cache_ttl.as_secs());

        // --- Monta o gráfico de dependências ---
        let source: Arc<dyn SalesSource> = Arc::new(SalesRepository::new(db_pool));
        Ok(Self::with_source(source, config))
    }

    pub fn with_source(source: Arc<dyn SalesSource>, config: &Config) -> Self {
        let cache = Arc::new(SalesCache::new(source, config.cache_ttl));
        Self {
            dashboard_service: DashboardService::new(cache, config.report.clone()),
        }
    }
}
