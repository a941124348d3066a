//! Потоковый writer для файлов SI2.
//!
//! Предоставляет [`Si2Writer`] для записи инструкций
//! в любой тип, реализующий [`Write`].

use std::io::{BufWriter, Write};

use crate::{
    error::ConvertResult,
    si2::{self, Si2Record},
};

/// Потоковый writer для инструкций SI2.
///
/// Использует буферизацию для эффективного I/O.
///
/// # Пример
///
/// ```ignore
/// use tsa::writer::Si2Writer;
/// use std::fs::File;
///
/// let file = File::create("instructions.si2")?;
/// let mut writer = Si2Writer::new(file);
///
/// writer.write_header()?;
/// writer.write_all(&conversion.records)?;
/// writer.flush()?;
/// ```
pub struct Si2Writer<W: Write> {
    inner: BufWriter<W>,
    /// Счётчик записанных инструкций.
    records_written: usize,
    /// Флаг: записан ли заголовок.
    header_written: bool,
}

impl<W: Write> Si2Writer<W> {
    /// Создаёт новый writer.
    pub fn new(writer: W) -> Self {
        Self { inner: BufWriter::new(writer), records_written: 0, header_written: false }
    }

    /// Записывает строку заголовка SI2.
    ///
    /// Может вызываться несколько раз, но заголовок записывается только один раз.
    pub fn write_header(&mut self) -> ConvertResult<()> {
        if !self.header_written {
            si2::write_header(&mut self.inner)?;
            self.header_written = true;
        }
        Ok(())
    }

    /// Записывает одну инструкцию.
    pub fn write(&mut self, record: &Si2Record) -> ConvertResult<()> {
        si2::write_one(&mut self.inner, record)?;
        self.records_written += 1;
        Ok(())
    }

    /// Записывает несколько инструкций.
    pub fn write_all(&mut self, records: &[Si2Record]) -> ConvertResult<()> {
        for record in records {
            self.write(record)?;
        }
        Ok(())
    }

    /// Принудительно сбрасывает буфер.
    pub fn flush(&mut self) -> ConvertResult<()> {
        self.inner.flush()?;
        Ok(())
    }

    /// Возвращает количество записанных инструкций.
    #[must_use]
    pub fn records_written(&self) -> usize {
        self.records_written
    }

    /// Извлекает внутренний writer (с предварительным flush).
    pub fn into_inner(self) -> ConvertResult<W> {
        self.inner.into_inner().map_err(|e| e.into_error().into())
    }
}
