//! Библиотека конвертации инструкций TSA в формат SI2.
//!
//! Этот крейт разбирает документы TSA (строки с подполями, разделёнными `'`)
//! и собирает из них инструкции по расчётам в табличном формате SI2
//! (поля разделены `;`):
//!
//! - [`header`] — извлечение даты расчётов из заголовка документа
//! - [`record`] — разбор строк данных и нормализация кодов, счетов и количеств
//! - [`convert`] — конвертация строки и документа целиком
//! - [`si2`], [`reader`], [`writer`] — чтение и запись файлов SI2
//!
//! # Быстрый старт
//!
//! ```
//! use tsa::convert::Converter;
//!
//! let doc = "00CVSA       20240301\n\
//!            1'D'E'7046'000010000'05921'00000000027.0000000'X'000010018'\n\
//!            1'D'E'BROKEN\n";
//!
//! let conversion = Converter::new().convert(doc);
//! assert_eq!(conversion.records.len(), 1);
//! assert_eq!(conversion.errors.len(), 1);
//!
//! let output = conversion.to_si2_string().unwrap();
//! assert!(output.starts_with("InstructingParty;SettlementParty;"));
//! assert!(output.contains(";77046/10000;5921;LOCAL_CODE;CVSA;7046;7046/10018;EA"));
//! ```

pub mod convert;
pub mod error;
pub mod header;
pub mod reader;
pub mod record;
pub mod reference;
pub mod si2;
pub mod writer;

/// Часто используемые типы.
pub mod prelude {
    pub use crate::{
        convert::{Conversion, Converter, LineError, convert_file, process_line},
        error::{ConvertError, ConvertResult},
        header::SettlementDate,
        reader::Si2Reader,
        record::{Quantity, RecordType, SettlementMethod},
        reference::InstructionReference,
        si2::Si2Record,
        writer::Si2Writer,
    };
}
