//! # xtask - Автоматизация сборки проекта
//!
//! Команды проверки воркспейса и сквозной прогон конвертера на фикстурах.
//!
//! См. [`HELP_TEXT`] для полного списка команд.
use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use xshell::{Shell, cmd};

/// Текст справки для команды xtask.
pub const HELP_TEXT: &str = r#"xtask

Использование:
  cargo run -p xtask -- <команда>

Команды:
  help         Показать это сообщение
  fmt          Запустить rustfmt
  fmt-check    Проверить форматирование (CI)
  clippy       Запустить clippy (воркспейс)
  test         Запустить тесты через nextest (воркспейс)
  ci           Запустить fmt-check + clippy + test + smoke
  smoke        Сконвертировать фикстуры TSA дважды и сравнить результаты

Примечание:
  cargo-nextest устанавливается автоматически при первом запуске тестов
"#;

/// Фикстуры, на которых прогоняется `smoke`.
const SMOKE_FIXTURES: &[&str] = &["instructions_example.tsa", "instructions_rejected.tsa"];

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let cmd = args.next().unwrap_or_else(|| "help".to_string());

    let sh = Shell::new()?;
    sh.change_dir(project_root()?);

    match cmd.as_str() {
        "help" | "-h" | "--help" => help(),
        "fmt" => Ok(cmd!(sh, "cargo +nightly fmt --all").run()?),
        "fmt-check" => Ok(cmd!(sh, "cargo +nightly fmt --all -- --check").run()?),
        "clippy" => Ok(cmd!(sh, "cargo +nightly clippy --workspace -- -D warnings").run()?),
        "test" => {
            ensure_nextest(&sh)?;
            // e2e тесты запускают собранные бинарники
            cmd!(sh, "cargo build --workspace").run()?;
            cmd!(sh, "cargo nextest run --workspace").run()?;
            // nextest не запускает doc-тесты
            cmd!(sh, "cargo +nightly test --workspace --doc").run()?;
            Ok(())
        }
        "ci" => {
            ensure_nextest(&sh)?;
            cmd!(sh, "cargo +nightly fmt --all -- --check").run()?;
            cmd!(sh, "cargo +nightly clippy --workspace -- -D warnings").run()?;
            cmd!(sh, "cargo build --workspace").run()?;
            cmd!(sh, "cargo nextest run --workspace").run()?;
            cmd!(sh, "cargo +nightly test --workspace --doc").run()?;
            smoke(&sh)
        }
        "smoke" => smoke(&sh),
        other => bail!("Неизвестная команда: {other}\n\nЗапустите: cargo run -p xtask -- help"),
    }
}

/// Показать сообщение справки.
fn help() -> Result<()> {
    println!("{HELP_TEXT}");
    Ok(())
}

/// Сквозной прогон бинарников на фикстурах.
///
/// Каждая фикстура конвертируется дважды; `si2_compare` должен признать
/// результаты одинаковыми (идентификаторы инструкций случайны и по
/// умолчанию не сравниваются). Результаты остаются в `target/smoke/`.
fn smoke(sh: &Shell) -> Result<()> {
    let out_dir = PathBuf::from("target").join("smoke");
    sh.create_dir(&out_dir)?;

    cmd!(sh, "cargo build --bin tsa2si2 --bin si2_compare").run()?;

    for name in SMOKE_FIXTURES {
        let input = PathBuf::from("tests/e2e/fixtures").join(name);
        let first = out_dir.join(format!("{name}.1.si2"));
        let second = out_dir.join(format!("{name}.2.si2"));

        for output in [&first, &second] {
            cmd!(sh, "cargo run -q --bin tsa2si2 -- --input {input} --output {output}")
                .run()
                .with_context(|| format!("Конвертация {name} завершилась ошибкой"))?;
        }

        cmd!(sh, "cargo run -q --bin si2_compare -- --file1 {first} --file2 {second}")
            .run()
            .with_context(|| format!("Повторная конвертация {name} дала другой результат"))?;
    }

    eprintln!("smoke: {} фикстур(ы) сконвертированы стабильно", SMOKE_FIXTURES.len());
    Ok(())
}

/// Получить корневую директорию проекта.
///
/// Корнем считается родительская директория манифеста `xtask`.
fn project_root() -> Result<PathBuf> {
    Ok(std::env::var("CARGO_MANIFEST_DIR")
        .map(PathBuf::from)?
        .parent()
        .context("CARGO_MANIFEST_DIR не имеет родительской директории")?
        .to_path_buf())
}

/// Проверить наличие cargo-nextest и установить при необходимости.
fn ensure_nextest(sh: &Shell) -> Result<()> {
    // quiet: проверка не должна печатать версию
    if cmd!(sh, "cargo nextest --version").quiet().run().is_ok() {
        return Ok(());
    }

    eprintln!("cargo-nextest не найден, устанавливаю...");
    cmd!(sh, "cargo install cargo-nextest --locked").run()?;
    eprintln!("cargo-nextest успешно установлен");
    Ok(())
}
