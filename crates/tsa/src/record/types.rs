//! Основные типы записей TSA.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use super::normalize::parse_quantity;
use crate::error::{ConvertError, ConvertResult};

/// Разделитель подполей в строке TSA.
pub const FIELD_DELIMITER: char = '\'';

/// Минимальное количество подполей в строке данных (индексы 0–8).
pub const REQUIRED_FIELDS: usize = 9;

/// Префикс строки данных TSA.
pub const RECORD_PREFIX: char = '1';

/// Тип записи TSA, собранный из подполей 1 и 2.
///
/// - [`Deliver`][RecordType::Deliver]: `DE`, поставка бумаг
/// - [`Receive`][RecordType::Receive]: `IE`, приём (расчёт через RTGS)
/// - [`Other`][RecordType::Other]: любое другое значение; структурно допустимо
///   и обрабатывается как пакетный расчёт без префикса счёта
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum RecordType {
    /// Поставка (`DE`).
    Deliver,
    /// Приём (`IE`).
    Receive,
    /// Нераспознанный код типа.
    Other(String),
}

impl RecordType {
    /// Собирает тип записи из двух подполей.
    ///
    /// # Пример
    /// ```
    /// use tsa::record::RecordType;
    /// assert_eq!(RecordType::from_parts("D", "E"), RecordType::Deliver);
    /// assert_eq!(RecordType::from_parts("I", "E"), RecordType::Receive);
    /// assert_eq!(RecordType::from_parts("X", "Y"), RecordType::Other("XY".into()));
    /// ```
    #[must_use]
    pub fn from_parts(first: &str, second: &str) -> Self {
        let code = format!("{first}{second}");
        match code.as_str() {
            "DE" => Self::Deliver,
            "IE" => Self::Receive,
            _ => Self::Other(code),
        }
    }

    /// Возвращает двухбуквенный код типа.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::Deliver => "DE",
            Self::Receive => "IE",
            Self::Other(code) => code,
        }
    }
}

impl fmt::Display for RecordType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Метод расчёта инструкции SI2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SettlementMethod {
    /// Валовый расчёт в реальном времени (записи `IE`).
    #[serde(rename = "RTGS")]
    Rtgs,
    /// Пакетный расчёт (все остальные записи).
    #[serde(rename = "BATCH_SETTLEMENT")]
    BatchSettlement,
}

impl SettlementMethod {
    /// Выбирает метод расчёта по типу записи.
    #[must_use]
    pub fn for_record(record_type: &RecordType) -> Self {
        match record_type {
            RecordType::Receive => Self::Rtgs,
            RecordType::Deliver | RecordType::Other(_) => Self::BatchSettlement,
        }
    }

    /// Возвращает строковое представление метода.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Rtgs => "RTGS",
            Self::BatchSettlement => "BATCH_SETTLEMENT",
        }
    }
}

impl fmt::Display for SettlementMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Количество бумаг в инструкции.
///
/// Целые значения выводятся с одной цифрой после точки (`27.0`), дробные —
/// кратчайшим десятичным представлением без экспоненты (`1500.25`).
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Quantity(f64);

impl Quantity {
    /// Разбирает количество из текста TSA (`00000001,500.2500000`).
    pub fn parse(text: &str) -> ConvertResult<Self> {
        parse_quantity(text).map(Self)
    }

    /// Числовое значение.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Quantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.fract() == 0.0 { write!(f, "{:.1}", self.0) } else { write!(f, "{}", self.0) }
    }
}

impl FromStr for Quantity {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Quantity {
    type Error = ConvertError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Quantity> for String {
    fn from(q: Quantity) -> Self {
        q.to_string()
    }
}

/// Разобранная строка данных TSA.
///
/// Подполя заимствуются из исходной строки и не нормализуются:
/// нормализация выполняется при сборке строки SI2.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawRecord<'a> {
    /// Тип записи (подполя 1 + 2).
    pub record_type: RecordType,
    /// Исходный код участника (подполе 3).
    pub original_code: &'a str,
    /// Номер счёта с ведущими нулями (подполе 4).
    pub account_number: &'a str,
    /// Код инструмента с ведущими нулями (подполе 5).
    pub instrument: &'a str,
    /// Текст количества (подполе 6).
    pub quantity_text: &'a str,
    /// Счёт контрагента с ведущими нулями (подполе 8).
    pub counterparty_account: &'a str,
}

impl<'a> RawRecord<'a> {
    /// Является ли строка кандидатом в записи данных (начинается с `1`).
    #[must_use]
    pub fn is_candidate(line: &str) -> bool {
        line.starts_with(RECORD_PREFIX)
    }

    /// Разбивает строку по `'` и извлекает подполя.
    ///
    /// # Ошибки
    ///
    /// [`ConvertError::MalformedRecord`], если подполей меньше [`REQUIRED_FIELDS`].
    ///
    /// # Пример
    /// ```
    /// use tsa::record::{RawRecord, RecordType};
    ///
    /// let raw = RawRecord::parse("1'I'E'0847'000020000'00125'00000000010.0000000'X'000030000'").unwrap();
    /// assert_eq!(raw.record_type, RecordType::Receive);
    /// assert_eq!(raw.original_code, "0847");
    /// assert_eq!(raw.counterparty_account, "000030000");
    /// ```
    pub fn parse(line: &'a str) -> ConvertResult<Self> {
        let fields: Vec<&'a str> = line.split(FIELD_DELIMITER).collect();
        if fields.len() < REQUIRED_FIELDS {
            return Err(ConvertError::malformed(fields.len()));
        }

        Ok(Self {
            record_type: RecordType::from_parts(fields[1], fields[2]),
            original_code: fields[3],
            account_number: fields[4],
            instrument: fields[5],
            quantity_text: fields[6],
            counterparty_account: fields[8],
        })
    }
}
