// src/analytics/period.rs
//
// Períodos de tempo usados para agrupar as vendas. A chave é tipada e
// ordenável (ordem cronológica); o rótulo só é gerado na hora de exibir.

use chrono::{Datelike, NaiveDateTime};

use crate::middleware::i18n::Language;

const MONTHS_ES: [&str; 12] = [
    "Ene", "Feb", "Mar", "Abr", "May", "Jun", "Jul", "Ago", "Sep", "Oct", "Nov", "Dic",
];
const MONTHS_EN: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

const QUARTERS_ES: [&str; 4] = [
    "PRIMER TRIMESTRE",
    "SEGUNDO TRIMESTRE",
    "TERCER TRIMESTRE",
    "CUARTO TRIMESTRE",
];
const QUARTERS_EN: [&str; 4] = [
    "FIRST QUARTER",
    "SECOND QUARTER",
    "THIRD QUARTER",
    "FOURTH QUARTER",
];

/// Abreviação do mês (1..=12) no idioma pedido.
pub fn month_abbrev(month: u32, lang: Language) -> &'static str {
    let idx = (month.clamp(1, 12) - 1) as usize;
    match lang {
        Language::Es => MONTHS_ES[idx],
        Language::En => MONTHS_EN[idx],
    }
}

// Idioma de cada tipo de rótulo, escolhido separadamente.
// O padrão é o do painel de origem: meses abreviados em inglês ("Jan 2024 Q1")
// e trimestres em espanhol ("PRIMER TRIMESTRE").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LabelLanguages {
    pub months: Language,
    pub quarters: Language,
}

impl Default for LabelLanguages {
    fn default() -> Self {
        Self {
            months: Language::En,
            quarters: Language::Es,
        }
    }
}

impl LabelLanguages {
    // Quando o cliente pede um idioma, tudo sai nele
    pub fn uniform(lang: Language) -> Self {
        Self { months: lang, quarters: lang }
    }

    pub fn for_period(&self, period: &Period) -> Language {
        match period {
            Period::Quarter(_) => self.quarters,
            _ => self.months,
        }
    }
}

// Como agrupar por mês.
// YearMonth: janeiro/2023 e janeiro/2024 são grupos diferentes.
// MonthName: só o nome do mês conta (anos iguais se misturam).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MonthGrouping {
    #[default]
    YearMonth,
    MonthName,
}

impl std::str::FromStr for MonthGrouping {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "year-month" => Ok(MonthGrouping::YearMonth),
            "month-name" => Ok(MonthGrouping::MonthName),
            other => Err(format!("MONTH_GROUPING desconhecido: '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Period {
    /// Quincena: dias 1..=15 são a primeira metade, o resto a segunda.
    HalfMonth { year: i32, month: u32, second_half: bool },
    /// `year` é None quando o agrupamento ignora o ano.
    Month { year: Option<i32>, month: u32 },
    /// Trimestre do calendário (1..=4), sem ano.
    Quarter(u32),
}

impl Period {
    pub fn half_month(date: NaiveDateTime) -> Self {
        Period::HalfMonth {
            year: date.year(),
            month: date.month(),
            second_half: date.day() > 15,
        }
    }

    pub fn month(date: NaiveDateTime, grouping: MonthGrouping) -> Self {
        let year = match grouping {
            MonthGrouping::YearMonth => Some(date.year()),
            MonthGrouping::MonthName => None,
        };
        Period::Month { year, month: date.month() }
    }

    pub fn quarter(date: NaiveDateTime) -> Self {
        Period::Quarter(date.month0() / 3 + 1)
    }

    // Rótulo com o idioma configurado para o tipo de período
    pub fn label_in(&self, labels: LabelLanguages) -> String {
        self.label(labels.for_period(self))
    }

    pub fn label(&self, lang: Language) -> String {
        match *self {
            Period::HalfMonth { year, month, second_half } => {
                let half = if second_half { "Q2" } else { "Q1" };
                format!("{} {} {}", month_abbrev(month, lang), year, half)
            }
            Period::Month { year: Some(year), month } => format!("{:04}-{:02}", year, month),
            Period::Month { year: None, month } => month_abbrev(month, lang).to_string(),
            Period::Quarter(q) => {
                let idx = (q.clamp(1, 4) - 1) as usize;
                match lang {
                    Language::Es => QUARTERS_ES[idx].to_string(),
                    Language::En => QUARTERS_EN[idx].to_string(),
                }
            }
        }
    }
}
