//! Извлечение даты расчётов из заголовка документа TSA.
//!
//! Заголовком считается строка, начинающаяся с `00`. Дата берётся из окна
//! фиксированной ширины первого заголовка, в котором она нашлась; если
//! таких нет, используется текущая дата.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ConvertError;

/// Префикс строки заголовка.
pub const HEADER_PREFIX: &str = "00";

/// Смещение окна даты в строке заголовка (в символах).
pub const DATE_OFFSET: usize = 11;

/// Ширина окна даты (в символах).
pub const DATE_WIDTH: usize = 10;

/// Минимальное количество цифр, при котором окно считается датой.
const MIN_DATE_DIGITS: usize = 7;

/// Максимальная длина даты (`YYYYMMDD`).
const MAX_DATE_DIGITS: usize = 8;

/// Дата расчётов документа.
///
/// Используется как `TradeDate` и `IntendedSettlementDate` каждой строки SI2.
/// Содержит 7–8 ASCII-цифр (7 — только если заголовок дал не больше).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SettlementDate(String);

impl SettlementDate {
    /// Текущая локальная дата в формате `YYYYMMDD`.
    #[must_use]
    pub fn today() -> Self {
        Self(jiff::Zoned::now().strftime("%Y%m%d").to_string())
    }

    /// Строковое представление даты.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SettlementDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for SettlementDate {
    type Err = ConvertError;

    /// Разбирает явно заданную дату.
    ///
    /// # Пример
    /// ```
    /// use tsa::header::SettlementDate;
    /// assert_eq!("20240301".parse::<SettlementDate>().unwrap().as_str(), "20240301");
    /// assert!("2024-03-01".parse::<SettlementDate>().is_err());
    /// ```
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let len = s.len();
        if (MIN_DATE_DIGITS..=MAX_DATE_DIGITS).contains(&len) && s.bytes().all(|b| b.is_ascii_digit())
        {
            Ok(Self(s.to_string()))
        } else {
            Err(ConvertError::InvalidSettlementDate(s.to_string()))
        }
    }
}

impl TryFrom<String> for SettlementDate {
    type Error = ConvertError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<SettlementDate> for String {
    fn from(date: SettlementDate) -> Self {
        date.0
    }
}

/// Извлекает дату из строки заголовка.
///
/// Возвращает `None`, если окно даты содержит меньше 7 цифр.
fn date_from_header_line(line: &str) -> Option<SettlementDate> {
    let window: String = line.chars().skip(DATE_OFFSET).take(DATE_WIDTH).collect();
    let digits: String = window.trim().chars().filter(char::is_ascii_digit).collect();

    if digits.len() < MIN_DATE_DIGITS {
        return None;
    }
    Some(SettlementDate(digits.chars().take(MAX_DATE_DIGITS).collect()))
}

/// Ищет дату расчётов в заголовке документа.
///
/// Просматривает строки по порядку; строки, начинающиеся с `00`, проверяются
/// на наличие даты в окне `[11, 21)`. Возвращает первую найденную дату.
///
/// # Пример
///
/// ```
/// use tsa::header::extract_date_from_header;
///
/// let doc = "00BROKER    20240115  TSA\n1'D'E'7046'000010000'05921'1.0'X'000010018'";
/// assert_eq!(extract_date_from_header(doc).unwrap().as_str(), "20240115");
/// assert!(extract_date_from_header("1'D'E'no header'").is_none());
/// ```
#[must_use]
pub fn extract_date_from_header(content: &str) -> Option<SettlementDate> {
    content
        .lines()
        .filter(|line| line.starts_with(HEADER_PREFIX))
        .find_map(date_from_header_line)
}

/// Дата расчётов документа: из заголовка или, если её нет, текущая дата.
#[must_use]
pub fn settlement_date(content: &str) -> SettlementDate {
    extract_date_from_header(content).unwrap_or_else(|| {
        let today = SettlementDate::today();
        debug!(%today, "no usable header date, falling back to current date");
        today
    })
}
