//! Модель записей TSA.
//!
//! Строка данных TSA начинается с `1` и состоит из подполей, разделённых `'`.
//! Этот модуль определяет разобранное представление строки [`RawRecord`],
//! связанные типы и правила нормализации числовых подполей.

mod normalize;
mod types;

pub use normalize::{
    INSTITUTIONAL_ACCOUNT, INSTITUTIONAL_CODE, clean_number, convert_code,
    convert_code_with_account, parse_quantity,
};
pub use types::{
    FIELD_DELIMITER, Quantity, RECORD_PREFIX, REQUIRED_FIELDS, RawRecord, RecordType,
    SettlementMethod,
};
