//! SI2 format: semicolon-delimited settlement instructions.
//!
//! # Format
//!
//! ```text
//! InstructingParty;SettlementParty;SecuritiesAccount;...;PaymentType
//! 7046;7046;77046/10000;5921;LOCAL_CODE;CVSA;7046;7046/10018;EA01234567890123;DELIVER;27.0;;TRAD;BATCH_SETTLEMENT;20240301;20240301;NOTHING
//! ```
//!
//! Rows are written with the `csv` crate, so a field containing `;`, `"` or a
//! line break is quoted. Every row ends with `\n`.

use std::io::Write;

use serde::{Deserialize, Serialize};

use crate::{
    error::{ConvertError, ConvertResult},
    header::SettlementDate,
    record::{Quantity, SettlementMethod},
    reference::InstructionReference,
};

/// Field delimiter.
pub const DELIMITER: u8 = b';';

/// Column names in output order.
pub const COLUMNS: [&str; 17] = [
    "InstructingParty",
    "SettlementParty",
    "SecuritiesAccount",
    "Instrument",
    "InstrumentIdentifierType",
    "CSDOfCounterparty",
    "SettlementCounterparty",
    "SecuritiesAccountOfCounterparty",
    "InstructionReference",
    "Instrument(MovementOfSecurities)",
    "Quantity",
    "QuantityType",
    "TransactionType",
    "SettlementMethod",
    "TradeDate",
    "IntendedSettlementDate",
    "PaymentType",
];

/// Header line with all column names.
pub const HEADER: &str = "InstructingParty;SettlementParty;SecuritiesAccount;Instrument;InstrumentIdentifierType;CSDOfCounterparty;SettlementCounterparty;SecuritiesAccountOfCounterparty;InstructionReference;Instrument(MovementOfSecurities);Quantity;QuantityType;TransactionType;SettlementMethod;TradeDate;IntendedSettlementDate;PaymentType";

/// `InstrumentIdentifierType` of every converted instruction.
pub const INSTRUMENT_IDENTIFIER_TYPE: &str = "LOCAL_CODE";

/// `CSDOfCounterparty` of every converted instruction.
pub const CSD_OF_COUNTERPARTY: &str = "CVSA";

/// `Instrument(MovementOfSecurities)` of every converted instruction.
pub const MOVEMENT_OF_SECURITIES: &str = "DELIVER";

/// `TransactionType` of every converted instruction.
pub const TRANSACTION_TYPE: &str = "TRAD";

/// `PaymentType` of every converted instruction.
pub const PAYMENT_TYPE: &str = "NOTHING";

/// One SI2 settlement instruction.
///
/// Field order matches [`COLUMNS`]; rows are (de)serialized positionally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Si2Record {
    #[serde(rename = "InstructingParty")]
    pub instructing_party: String,
    #[serde(rename = "SettlementParty")]
    pub settlement_party: String,
    #[serde(rename = "SecuritiesAccount")]
    pub securities_account: String,
    #[serde(rename = "Instrument")]
    pub instrument: String,
    #[serde(rename = "InstrumentIdentifierType")]
    pub instrument_identifier_type: String,
    #[serde(rename = "CSDOfCounterparty")]
    pub csd_of_counterparty: String,
    #[serde(rename = "SettlementCounterparty")]
    pub settlement_counterparty: String,
    #[serde(rename = "SecuritiesAccountOfCounterparty")]
    pub securities_account_of_counterparty: String,
    #[serde(rename = "InstructionReference")]
    pub instruction_reference: InstructionReference,
    #[serde(rename = "Instrument(MovementOfSecurities)")]
    pub movement_of_securities: String,
    #[serde(rename = "Quantity")]
    pub quantity: Quantity,
    /// Always empty for converted instructions.
    #[serde(rename = "QuantityType")]
    pub quantity_type: String,
    #[serde(rename = "TransactionType")]
    pub transaction_type: String,
    #[serde(rename = "SettlementMethod")]
    pub settlement_method: SettlementMethod,
    #[serde(rename = "TradeDate")]
    pub trade_date: SettlementDate,
    #[serde(rename = "IntendedSettlementDate")]
    pub intended_settlement_date: SettlementDate,
    #[serde(rename = "PaymentType")]
    pub payment_type: String,
}

impl Si2Record {
    /// Returns the field values as text, in [`COLUMNS`] order.
    #[must_use]
    pub fn fields(&self) -> [String; 17] {
        [
            self.instructing_party.clone(),
            self.settlement_party.clone(),
            self.securities_account.clone(),
            self.instrument.clone(),
            self.instrument_identifier_type.clone(),
            self.csd_of_counterparty.clone(),
            self.settlement_counterparty.clone(),
            self.securities_account_of_counterparty.clone(),
            self.instruction_reference.to_string(),
            self.movement_of_securities.clone(),
            self.quantity.to_string(),
            self.quantity_type.clone(),
            self.transaction_type.clone(),
            self.settlement_method.to_string(),
            self.trade_date.to_string(),
            self.intended_settlement_date.to_string(),
            self.payment_type.clone(),
        ]
    }
}

fn writer_builder() -> ::csv::WriterBuilder {
    let mut builder = ::csv::WriterBuilder::new();
    builder.delimiter(DELIMITER).has_headers(false).terminator(::csv::Terminator::Any(b'\n'));
    builder
}

fn reader_builder() -> ::csv::ReaderBuilder {
    let mut builder = ::csv::ReaderBuilder::new();
    builder.delimiter(DELIMITER).has_headers(false);
    builder
}

// ============================================================================
// Streaming API
// ============================================================================

/// Writes the SI2 header line.
///
/// Should be called once before writing any records.
pub fn write_header<W: Write>(writer: &mut W) -> ConvertResult<()> {
    writeln!(writer, "{HEADER}")?;
    Ok(())
}

/// Writes a single record as an SI2 row.
///
/// # Example
///
/// ```ignore
/// use tsa::si2;
/// use std::fs::File;
///
/// let mut file = File::create("instructions.si2")?;
/// si2::write_header(&mut file)?;
/// si2::write_one(&mut file, &record)?;
/// ```
pub fn write_one<W: Write>(writer: &mut W, record: &Si2Record) -> ConvertResult<()> {
    let mut csv_writer = writer_builder().from_writer(writer);

    csv_writer.serialize(record)?;
    csv_writer.flush()?;

    Ok(())
}

/// Checks that a parsed header row matches [`COLUMNS`].
pub(crate) fn check_header(header: &::csv::StringRecord) -> ConvertResult<()> {
    if header.iter().eq(COLUMNS.iter().copied()) {
        Ok(())
    } else {
        Err(ConvertError::UnexpectedHeader(header.iter().collect::<Vec<_>>().join(";")))
    }
}

/// Creates a csv reader configured for SI2 rows (header handled by the caller).
pub(crate) fn csv_reader<R: std::io::Read>(reader: R) -> ::csv::Reader<R> {
    reader_builder().from_reader(reader)
}

// ============================================================================
// Buffered API
// ============================================================================

/// Serializes a record to an SI2 row string (with trailing `\n`).
pub fn to_row(record: &Si2Record) -> ConvertResult<String> {
    let mut writer = writer_builder().from_writer(Vec::new());

    writer.serialize(record)?;
    writer.flush()?;

    let bytes = writer.into_inner().map_err(|e| ConvertError::Io(e.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Deserializes a record from one SI2 row (without header).
pub fn from_row(row: &str) -> ConvertResult<Si2Record> {
    let mut reader = reader_builder().from_reader(row.as_bytes());

    match reader.deserialize().next() {
        Some(Ok(record)) => Ok(record),
        Some(Err(e)) => Err(ConvertError::Csv(e)),
        None => Err(ConvertError::Io(std::io::ErrorKind::UnexpectedEof.into())),
    }
}
