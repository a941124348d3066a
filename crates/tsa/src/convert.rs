//! Конвертация документов TSA в SI2.
//!
//! Документ конвертируется за один синхронный проход по тексту в памяти:
//! дата расчётов извлекается один раз, затем каждая непустая строка
//! превращается в ноль или одну строку SI2. Ошибки отдельных строк не
//! прерывают конвертацию и возвращаются вызывающему в [`Conversion`].

use std::io::Write;

use rand::{Rng, rngs::ThreadRng};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::{
    error::{ConvertError, ConvertResult},
    header::{self, SettlementDate},
    record::{
        Quantity, RawRecord, RecordType, SettlementMethod, clean_number, convert_code_with_account,
    },
    reference::InstructionReference,
    si2::{self, Si2Record},
    writer::Si2Writer,
};

/// Префикс счёта ценных бумаг для записей поставки (`DE`).
pub const DELIVER_ACCOUNT_PREFIX: &str = "7";

/// Ошибка конвертации одной строки документа.
#[derive(Debug, Error)]
#[error("line {line_no}: {error}")]
pub struct LineError {
    /// Номер строки в документе (1-based).
    pub line_no: usize,
    /// Текст строки без пробелов по краям.
    pub line: String,
    /// Причина.
    #[source]
    pub error: ConvertError,
}

/// Собирает строку SI2 из разобранной записи.
fn build_record<R: Rng>(
    raw: &RawRecord<'_>,
    date: &SettlementDate,
    rng: &mut R,
) -> ConvertResult<Si2Record> {
    let account = clean_number(raw.account_number);
    let instrument = clean_number(raw.instrument);
    let counterparty = clean_number(raw.counterparty_account);

    let code = convert_code_with_account(raw.original_code, &raw.record_type, account)?;
    let quantity = Quantity::parse(raw.quantity_text)?;

    let securities_account = match raw.record_type {
        RecordType::Deliver => format!("{DELIVER_ACCOUNT_PREFIX}{code}/{account}"),
        RecordType::Receive | RecordType::Other(_) => format!("{code}/{account}"),
    };

    Ok(Si2Record {
        instructing_party: code.to_string(),
        settlement_party: code.to_string(),
        securities_account,
        instrument: instrument.to_string(),
        instrument_identifier_type: si2::INSTRUMENT_IDENTIFIER_TYPE.to_string(),
        csd_of_counterparty: si2::CSD_OF_COUNTERPARTY.to_string(),
        settlement_counterparty: code.to_string(),
        securities_account_of_counterparty: format!("{code}/{counterparty}"),
        instruction_reference: InstructionReference::generate(rng),
        movement_of_securities: si2::MOVEMENT_OF_SECURITIES.to_string(),
        quantity,
        quantity_type: String::new(),
        transaction_type: si2::TRANSACTION_TYPE.to_string(),
        settlement_method: SettlementMethod::for_record(&raw.record_type),
        trade_date: date.clone(),
        intended_settlement_date: date.clone(),
        payment_type: si2::PAYMENT_TYPE.to_string(),
    })
}

/// Конвертирует одну строку TSA.
///
/// - `Ok(Some(record))` — строка данных успешно сконвертирована;
/// - `Ok(None)` — строка не является строкой данных (не начинается с `1`);
/// - `Err(_)` — строка данных повреждена.
///
/// # Пример
///
/// ```
/// use tsa::{convert::process_line, header::SettlementDate};
///
/// let date: SettlementDate = "20240301".parse().unwrap();
/// let line = "1'I'E'0847'000020000'00125'00000000010.5000000'X'000030000'";
///
/// let record = process_line(line, &date, &mut rand::rng()).unwrap().unwrap();
/// assert_eq!(record.securities_account, "847/20000");
/// assert_eq!(record.quantity.to_string(), "10.5");
///
/// assert!(process_line("00HEADER", &date, &mut rand::rng()).unwrap().is_none());
/// ```
pub fn process_line<R: Rng>(
    line: &str,
    date: &SettlementDate,
    rng: &mut R,
) -> ConvertResult<Option<Si2Record>> {
    if !RawRecord::is_candidate(line) {
        return Ok(None);
    }
    let raw = RawRecord::parse(line)?;
    build_record(&raw, date, rng).map(Some)
}

/// Результат конвертации документа.
#[derive(Debug)]
pub struct Conversion {
    /// Дата расчётов, использованная для всех строк.
    pub settlement_date: SettlementDate,
    /// Сконвертированные инструкции в порядке входных строк.
    pub records: Vec<Si2Record>,
    /// Отброшенные строки с причинами, в порядке входных строк.
    pub errors: Vec<LineError>,
}

impl Conversion {
    /// Все ли строки данных сконвертированы без ошибок.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }

    /// Записывает заголовок и все инструкции в формате SI2.
    ///
    /// Возвращает количество записанных инструкций.
    pub fn write_to<W: Write>(&self, writer: W) -> ConvertResult<usize> {
        let mut writer = Si2Writer::new(writer);
        writer.write_header()?;
        writer.write_all(&self.records)?;
        writer.flush()?;
        Ok(writer.records_written())
    }

    /// Возвращает текст SI2: заголовок и строки, разделённые `\n`.
    ///
    /// Без завершающего перевода строки; без инструкций возвращается ровно заголовок.
    pub fn to_si2_string(&self) -> ConvertResult<String> {
        let mut output = String::from(si2::HEADER);
        for record in &self.records {
            output.push('\n');
            output.push_str(si2::to_row(record)?.trim_end_matches('\n'));
        }
        Ok(output)
    }
}

/// Конвертер документов TSA.
///
/// Владеет источником случайности для идентификаторов инструкций, поэтому
/// документы можно конвертировать параллельно, по конвертеру на поток.
///
/// # Пример
///
/// ```
/// use rand::{SeedableRng, rngs::StdRng};
/// use tsa::convert::Converter;
///
/// let doc = "00CVSA       20240301\n\
///            1'D'E'0847'000020000'00125'00000000010.0000000'X'000030000'\n";
///
/// let mut converter = Converter::with_rng(StdRng::seed_from_u64(1));
/// let conversion = converter.convert(doc);
///
/// assert_eq!(conversion.records.len(), 1);
/// assert_eq!(conversion.records[0].securities_account, "7847/20000");
/// assert_eq!(conversion.settlement_date.as_str(), "20240301");
/// ```
#[derive(Debug)]
pub struct Converter<R = ThreadRng> {
    rng: R,
    settlement_date: Option<SettlementDate>,
}

impl Converter<ThreadRng> {
    /// Создаёт конвертер с потоковым генератором случайных чисел.
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(rand::rng())
    }
}

impl Default for Converter<ThreadRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: Rng> Converter<R> {
    /// Создаёт конвертер с заданным источником случайности.
    pub fn with_rng(rng: R) -> Self {
        Self { rng, settlement_date: None }
    }

    /// Задаёт дату расчётов явно, вместо даты из заголовка.
    #[must_use]
    pub fn with_settlement_date(mut self, date: SettlementDate) -> Self {
        self.settlement_date = Some(date);
        self
    }

    /// Конвертирует документ.
    ///
    /// Пустые строки пропускаются, остальные обрабатываются по порядку.
    /// Порядок инструкций совпадает с порядком входных строк.
    pub fn convert(&mut self, content: &str) -> Conversion {
        let settlement_date =
            self.settlement_date.clone().unwrap_or_else(|| header::settlement_date(content));

        let mut records = Vec::new();
        let mut errors = Vec::new();

        for (idx, raw_line) in content.lines().enumerate() {
            let line = raw_line.trim();
            if line.is_empty() {
                continue;
            }
            let line_no = idx + 1;

            match process_line(line, &settlement_date, &mut self.rng) {
                Ok(Some(record)) => records.push(record),
                Ok(None) => debug!(line_no, "skipping non-record line"),
                Err(error) => {
                    warn!(line_no, %error, "rejected TSA line");
                    errors.push(LineError { line_no, line: line.to_string(), error });
                }
            }
        }

        info!(
            %settlement_date,
            records = records.len(),
            rejected = errors.len(),
            "converted TSA document"
        );

        Conversion { settlement_date, records, errors }
    }
}

/// Конвертирует документ TSA в текст SI2 с настройками по умолчанию.
///
/// Ошибки отдельных строк отбрасываются (они логируются на уровне `warn`);
/// чтобы получить их, используйте [`Converter::convert`].
pub fn convert_file(content: &str) -> ConvertResult<String> {
    Converter::new().convert(content).to_si2_string()
}
