//! Модуль ошибок конвертации TSA → SI2.

use thiserror::Error;

use crate::record::REQUIRED_FIELDS;

/// Главная ошибка конвертации.
///
/// Ошибки разбора отдельной строки (`MalformedRecord`, `InvalidCode`,
/// `InvalidQuantity`) не прерывают конвертацию документа: строка
/// отбрасывается, а ошибка попадает в отчёт [`Conversion`](crate::convert::Conversion).
#[derive(Debug, Error)]
pub enum ConvertError {
    // === Ошибки разбора записи TSA ===
    /// В строке меньше обязательных подполей, разделённых `'`.
    #[error("Malformed record: expected at least {required} quote-delimited fields, got {fields}")]
    MalformedRecord {
        /// Фактическое количество подполей.
        fields: usize,
        /// Минимально необходимое количество подполей.
        required: usize,
    },

    /// Код участника не является десятичным числом.
    #[error("Invalid participant code '{0}': expected decimal digits")]
    InvalidCode(String),

    /// Количество не является конечным десятичным числом.
    #[error("Invalid quantity '{0}': expected a decimal number")]
    InvalidQuantity(String),

    // === Ошибки типизированных полей ===
    /// Некорректный идентификатор инструкции (ожидается `EA` + 14 цифр).
    #[error("Invalid instruction reference '{0}': expected 'EA' followed by 14 digits")]
    InvalidReference(String),

    /// Некорректная дата расчётов (ожидается `YYYYMMDD`).
    #[error("Invalid settlement date '{0}': expected digits in YYYYMMDD form")]
    InvalidSettlementDate(String),

    // === Ошибки формата SI2 ===
    /// Заголовок SI2-файла не совпадает с ожидаемым.
    #[error("Unexpected SI2 header: '{0}'")]
    UnexpectedHeader(String),

    /// Ошибка чтения или записи строк SI2.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Строка SI2 не является корректной UTF-8 строкой.
    #[error("Invalid UTF-8 in SI2 output: {0}")]
    InvalidUtf8(#[from] std::string::FromUtf8Error),

    // === I/O ошибки ===
    /// Ошибка ввода/вывода.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Создаёт ошибку для строки с недостаточным числом подполей.
    #[must_use]
    pub fn malformed(fields: usize) -> Self {
        Self::MalformedRecord { fields, required: REQUIRED_FIELDS }
    }
}

/// Удобный alias для Result с ConvertError.
pub type ConvertResult<T> = Result<T, ConvertError>;
