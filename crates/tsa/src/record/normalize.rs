//! Нормализация числовых подполей TSA.

use super::RecordType;
use crate::error::{ConvertError, ConvertResult};

/// Код участника, который сохраняется как есть для поставки со счёта
/// [`INSTITUTIONAL_ACCOUNT`].
pub const INSTITUTIONAL_CODE: &str = "7046";

/// Счёт, для которого действует исключение [`INSTITUTIONAL_CODE`].
pub const INSTITUTIONAL_ACCOUNT: &str = "10000";

/// Убирает пробелы по краям и ведущие нули; пустой результат даёт `"0"`.
///
/// Цифры не проверяются: нецифровые значения проходят без изменений.
///
/// # Пример
/// ```
/// use tsa::record::clean_number;
/// assert_eq!(clean_number("000010000"), "10000");
/// assert_eq!(clean_number("0000"), "0");
/// assert_eq!(clean_number(""), "0");
/// ```
#[must_use]
pub fn clean_number(value: &str) -> &str {
    let cleaned = value.trim().trim_start_matches('0');
    if cleaned.is_empty() { "0" } else { cleaned }
}

/// Переводит код участника в минимальную десятичную запись (`0847` → `847`).
///
/// # Ошибки
///
/// [`ConvertError::InvalidCode`], если код пуст или содержит не только цифры.
pub fn convert_code(original: &str) -> ConvertResult<&str> {
    let code = original.trim();
    if code.is_empty() || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(ConvertError::InvalidCode(original.to_string()));
    }
    Ok(clean_number(code))
}

/// Переводит код участника с учётом исключения для институционального счёта.
///
/// Для поставки (`DE`) с исходным кодом ровно `7046` и очищенным счётом
/// `10000` код возвращается буквально, без разбора.
///
/// # Пример
/// ```
/// use tsa::record::{RecordType, convert_code_with_account};
///
/// let code = convert_code_with_account("7046", &RecordType::Deliver, "10000").unwrap();
/// assert_eq!(code, "7046");
///
/// let code = convert_code_with_account("0847", &RecordType::Receive, "10000").unwrap();
/// assert_eq!(code, "847");
/// ```
pub fn convert_code_with_account<'a>(
    original: &'a str,
    record_type: &RecordType,
    account: &str,
) -> ConvertResult<&'a str> {
    if *record_type == RecordType::Deliver
        && original == INSTITUTIONAL_CODE
        && account == INSTITUTIONAL_ACCOUNT
    {
        return Ok(INSTITUTIONAL_CODE);
    }
    convert_code(original)
}

/// Разбирает количество: убирает разделители тысяч и ведущие нули.
///
/// # Ошибки
///
/// [`ConvertError::InvalidQuantity`], если остаток не является конечным числом.
///
/// # Пример
/// ```
/// use tsa::record::parse_quantity;
/// assert_eq!(parse_quantity("00000000027.0000000").unwrap(), 27.0);
/// assert_eq!(parse_quantity("000001,500.5000000").unwrap(), 1500.5);
/// ```
pub fn parse_quantity(text: &str) -> ConvertResult<f64> {
    let without_separators: String = text.trim().chars().filter(|&c| c != ',').collect();
    let digits = without_separators.trim_start_matches('0');
    let digits = if digits.is_empty() { "0" } else { digits };

    digits
        .parse::<f64>()
        .ok()
        .filter(|q| q.is_finite())
        .ok_or_else(|| ConvertError::InvalidQuantity(text.to_string()))
}
