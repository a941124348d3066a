//! Идентификаторы инструкций SI2.

use std::{fmt, str::FromStr};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::ConvertError;

/// Фиксированный префикс идентификатора.
pub const REFERENCE_PREFIX: &str = "EA";

/// Количество случайных цифр после префикса.
pub const REFERENCE_DIGITS: usize = 14;

/// Идентификатор инструкции: `EA` и 14 десятичных цифр.
///
/// Генерируется заново для каждой строки SI2 и не выводится из входных данных.
///
/// # Пример
///
/// ```
/// use rand::{SeedableRng, rngs::StdRng};
/// use tsa::reference::InstructionReference;
///
/// let mut rng = StdRng::seed_from_u64(7);
/// let reference = InstructionReference::generate(&mut rng);
/// assert!(reference.as_str().starts_with("EA"));
/// assert_eq!(reference.as_str().len(), 16);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InstructionReference(String);

impl InstructionReference {
    /// Генерирует новый идентификатор; каждая цифра выбирается независимо.
    pub fn generate<R: Rng>(rng: &mut R) -> Self {
        let mut reference = String::with_capacity(REFERENCE_PREFIX.len() + REFERENCE_DIGITS);
        reference.push_str(REFERENCE_PREFIX);
        reference
            .extend((0..REFERENCE_DIGITS).map(|_| char::from(b'0' + rng.random_range(0..10u8))));
        Self(reference)
    }

    /// Строковое представление идентификатора.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Проверяет, что строка имеет вид `EA` + 14 цифр.
    #[must_use]
    pub fn is_valid(s: &str) -> bool {
        s.strip_prefix(REFERENCE_PREFIX).is_some_and(|digits| {
            digits.len() == REFERENCE_DIGITS && digits.bytes().all(|b| b.is_ascii_digit())
        })
    }
}

impl fmt::Display for InstructionReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for InstructionReference {
    type Err = ConvertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if Self::is_valid(s) {
            Ok(Self(s.to_string()))
        } else {
            Err(ConvertError::InvalidReference(s.to_string()))
        }
    }
}

impl TryFrom<String> for InstructionReference {
    type Error = ConvertError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        if Self::is_valid(&value) {
            Ok(Self(value))
        } else {
            Err(ConvertError::InvalidReference(value))
        }
    }
}

impl From<InstructionReference> for String {
    fn from(reference: InstructionReference) -> Self {
        reference.0
    }
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;

    #[test]
    fn generated_references_match_pattern() {
        let mut rng = rand::rng();
        for _ in 0..1000 {
            let reference = InstructionReference::generate(&mut rng);
            assert!(
                InstructionReference::is_valid(reference.as_str()),
                "bad reference {reference}"
            );
        }
    }

    #[test]
    fn seeded_generation_is_reproducible() {
        let a = InstructionReference::generate(&mut StdRng::seed_from_u64(42));
        let b = InstructionReference::generate(&mut StdRng::seed_from_u64(42));
        assert_eq!(a, b);
    }

    #[test]
    fn consecutive_draws_are_independent() {
        let mut rng = StdRng::seed_from_u64(1);
        let first = InstructionReference::generate(&mut rng);
        let second = InstructionReference::generate(&mut rng);
        // 10^14 вариантов: совпадение при фиксированном seed исключено
        assert_ne!(first, second);
    }

    #[test]
    fn all_digits_are_drawn() {
        let mut rng = StdRng::seed_from_u64(3);
        let mut seen = [false; 10];
        for _ in 0..100 {
            for b in InstructionReference::generate(&mut rng).as_str().bytes().skip(2) {
                seen[usize::from(b - b'0')] = true;
            }
        }
        assert!(seen.iter().all(|&s| s), "digit alphabet not covered: {seen:?}");
    }

    #[test]
    fn parse_validates_pattern() {
        assert!("EA12345678901234".parse::<InstructionReference>().is_ok());
        assert!("EB12345678901234".parse::<InstructionReference>().is_err());
        assert!("EA1234567890123".parse::<InstructionReference>().is_err());
        assert!("EA123456789012345".parse::<InstructionReference>().is_err());
        assert!("EA1234567890123X".parse::<InstructionReference>().is_err());
    }
}
