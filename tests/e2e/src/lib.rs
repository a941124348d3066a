//! # e2e-tests - End-to-end тесты CLI инструментов
//!
//! Этот крейт содержит e2e тесты для CLI инструментов воркспейса:
//! - `tsa2si2`: конвертер TSA → SI2
//! - `si2_compare`: сравниватель файлов SI2
//!
//! Бинарники ищутся в каталоге сборки, поэтому перед запуском тестов
//! воркспейс должен быть собран (`cargo build --workspace`).
//!
//! ## Фикстуры
//!
//! Входные файлы расположены в `fixtures/`:
//! - `instructions_example.tsa` — заголовок с датой `20240301`, три
//!   корректные строки (`DE`, `IE`, `DE`) и трейлер
//! - `instructions_rejected.tsa` — дата `20240415`, две корректные строки
//!   и три отбрасываемые (короткая, нецифровой код, нечисловое количество)
//! - `header_only.tsa` — заголовок и трейлер без строк данных

use std::path::PathBuf;

/// Получить путь к директории фикстур.
pub fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures")
}

/// Получить путь к фикстуре по имени файла.
pub fn fixture(name: &str) -> PathBuf {
    fixtures_dir().join(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fixtures_exist() {
        for name in ["instructions_example.tsa", "instructions_rejected.tsa", "header_only.tsa"] {
            assert!(fixture(name).is_file(), "missing fixture {name}");
        }
    }
}
