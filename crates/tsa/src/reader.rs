//! Потоковый reader для файлов SI2.
//!
//! Предоставляет итератор [`Si2Reader`], который читает инструкции SI2
//! из любого источника, реализующего [`Read`].

use std::io::Read;

use csv::StringRecord;

use crate::{
    error::ConvertResult,
    si2::{self, Si2Record},
};

/// Потоковый reader для инструкций SI2.
///
/// Первая строка источника должна быть заголовком [`si2::HEADER`]; она
/// проверяется при первом чтении. Пустой источник даёт пустой итератор.
///
/// # Пример
///
/// ```ignore
/// use tsa::reader::Si2Reader;
/// use std::fs::File;
///
/// let file = File::open("instructions.si2")?;
/// for result in Si2Reader::new(file) {
///     let record = result?;
///     println!("{}", record.instruction_reference);
/// }
/// ```
pub struct Si2Reader<R> {
    inner: csv::Reader<R>,
    /// Буфер текущей строки.
    row: StringRecord,
    /// Счётчик прочитанных записей.
    records_read: usize,
    /// Флаг достижения EOF или ошибки.
    finished: bool,
    /// Флаг: был ли проверен заголовок.
    header_checked: bool,
}

impl<R: Read> Si2Reader<R> {
    /// Создаёт новый reader.
    pub fn new(reader: R) -> Self {
        Self {
            inner: si2::csv_reader(reader),
            row: StringRecord::new(),
            records_read: 0,
            finished: false,
            header_checked: false,
        }
    }

    /// Возвращает количество успешно прочитанных записей.
    #[must_use]
    pub fn records_read(&self) -> usize {
        self.records_read
    }

    /// Читает и проверяет заголовок. `Ok(false)`, если источник пуст.
    fn check_header(&mut self) -> ConvertResult<bool> {
        if !self.inner.read_record(&mut self.row)? {
            return Ok(false);
        }
        si2::check_header(&self.row)?;
        Ok(true)
    }

    fn read_next(&mut self) -> ConvertResult<Option<Si2Record>> {
        if !self.inner.read_record(&mut self.row)? {
            return Ok(None);
        }
        Ok(Some(self.row.deserialize(None)?))
    }
}

impl<R: Read> Iterator for Si2Reader<R> {
    type Item = ConvertResult<Si2Record>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        if !self.header_checked {
            self.header_checked = true;
            match self.check_header() {
                Ok(true) => {}
                Ok(false) => {
                    self.finished = true;
                    return None;
                }
                Err(e) => {
                    self.finished = true;
                    return Some(Err(e));
                }
            }
        }

        match self.read_next() {
            Ok(Some(record)) => {
                self.records_read += 1;
                Some(Ok(record))
            }
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(e) => {
                self.finished = true; // Остановка при ошибке
                Some(Err(e))
            }
        }
    }
}
