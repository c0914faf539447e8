// src/middleware/i18n.rs

use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};

// Idiomas que sabemos exibir (meses abreviados, trimestres, mensagens)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Language {
    #[default]
    Es,
    En,
}

impl Language {
    // "es-PE" -> "es"; idioma desconhecido -> None
    pub fn from_tag(tag: &str) -> Option<Self> {
        let primary = tag.split('-').next().unwrap_or(tag).trim().to_ascii_lowercase();
        match primary.as_str() {
            "es" => Some(Language::Es),
            "en" => Some(Language::En),
            _ => None,
        }
    }
}

// Usado pela configuração (MONTH_LABELS / QUARTER_LABELS)
impl std::str::FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Language::from_tag(s).ok_or_else(|| format!("idioma desconhecido: '{}'", s.trim()))
    }
}

// Nosso extrator de idioma.
// None: o cliente não pediu nenhum idioma que sabemos exibir.
#[derive(Debug, Clone, Copy, Default)]
pub struct Locale(pub Option<Language>);

impl Locale {
    // Idioma das mensagens (espanhol quando o cliente não pediu nada)
    pub fn language(&self) -> Language {
        self.0.unwrap_or_default()
    }
}

impl<S> FromRequestParts<S> for Locale
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Self, Self::Rejection> {
        let lang = parts
            .headers
            .get(header::ACCEPT_LANGUAGE)
            .and_then(|header_value| header_value.to_str().ok())
            .and_then(|header_str| {
                // Pega o primeiro idioma da lista (já ordenada por peso) que sabemos exibir
                accept_language::parse(header_str)
                    .iter()
                    .find_map(|tag| Language::from_tag(tag))
            });

        Ok(Locale(lang))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn locale_for(header_value: Option<&str>) -> Option<Language> {
        let mut builder = Request::builder();
        if let Some(v) = header_value {
            builder = builder.header(header::ACCEPT_LANGUAGE, v);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        let Locale(lang) = Locale::from_request_parts(&mut parts, &()).await.unwrap();
        lang
    }

    #[tokio::test]
    async fn missing_or_unsupported_header_requests_nothing() {
        assert_eq!(locale_for(None).await, None);
        assert_eq!(locale_for(Some("fr-FR")).await, None);
        assert_eq!(Locale(None).language(), Language::Es);
    }

    #[tokio::test]
    async fn picks_first_supported_language() {
        assert_eq!(locale_for(Some("en-US,en;q=0.9")).await, Some(Language::En));
        assert_eq!(locale_for(Some("pt-BR, en;q=0.5")).await, Some(Language::En));
        assert_eq!(locale_for(Some("es-PE")).await, Some(Language::Es));
    }

    #[test]
    fn parses_configured_language() {
        assert_eq!("en".parse::<Language>(), Ok(Language::En));
        assert_eq!(" ES ".parse::<Language>(), Ok(Language::Es));
        assert!("pt".parse::<Language>().is_err());
    }
}
