//! The MOUS visual-task trigger alphabet.
//!
//! | code   | meaning                                                  |
//! |--------|----------------------------------------------------------|
//! | 1 – 3  | word onset, or button response 1 – 3 (same code!)        |
//! | 4 – 8  | word onset                                               |
//! | 10     | mini-block onset (`WOORDEN` / `ZINNEN`)                  |
//! | 15     | inter-stimulus interval                                  |
//! | 16, 32 | button response 1 / 2 (undocumented)                     |
//! | 20     | fixation cross                                           |
//! | 30     | pause between blocks                                     |
//! | 40     | comprehension question                                   |
//! | 128    | `UDIO001` digital input echo, ignored                    |
//!
//! Word codes encode the stimulus condition, see [`TriggerCode::condition`].
use crate::error::ReconcileError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TriggerCode {
    /// Word trigger `1..=8`.
    Word(u8),
    Block,
    Isi,
    Fixation,
    Pause,
    Question,
    ResponseOne,
    ResponseTwo,
    DigitalInput,
}

/// Stimulus condition flags carried by word triggers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Condition {
    pub sentence: bool,
    pub relative_clause: bool,
    pub target: bool,
}

impl Condition {
    pub const NONE: Condition = Condition::new(false, false, false);

    pub const fn new(sentence: bool, relative_clause: bool, target: bool) -> Self {
        Self { sentence, relative_clause, target }
    }
}

impl TriggerCode {
    /// Every code the stream may contain.
    pub const KNOWN: [i64; 16] = [1, 2, 3, 4, 5, 6, 7, 8, 10, 15, 16, 20, 30, 32, 40, 128];

    /// Look up `code`; `None` for anything outside the alphabet.
    pub fn from_code(code: i64) -> Option<Self> {
        let tc = match code {
            1..=8 => Self::Word(code as u8),
            10 => Self::Block,
            15 => Self::Isi,
            16 => Self::ResponseOne,
            20 => Self::Fixation,
            30 => Self::Pause,
            32 => Self::ResponseTwo,
            40 => Self::Question,
            128 => Self::DigitalInput,
            _ => return None,
        };
        Some(tc)
    }

    /// Like [`from_code`](Self::from_code) but an unknown code is fatal.
    pub fn resolve(code: i64, index: usize) -> Result<Self, ReconcileError> {
        Self::from_code(code).ok_or(ReconcileError::UnknownTriggerCode { index, code })
    }

    pub fn code(&self) -> i64 {
        match self {
            Self::Word(d) => *d as i64,
            Self::Block => 10,
            Self::Isi => 15,
            Self::ResponseOne => 16,
            Self::Fixation => 20,
            Self::Pause => 30,
            Self::ResponseTwo => 32,
            Self::Question => 40,
            Self::DigitalInput => 128,
        }
    }

    /// Condition flags for word triggers; all-false for everything else.
    ///
    /// | code | sentence | relative clause | target |
    /// |------|----------|-----------------|--------|
    /// | 1    | ✓        | ✓               |        |
    /// | 2    | ✓        | ✓               | ✓      |
    /// | 3    |          | ✓               |        |
    /// | 4    |          | ✓               | ✓      |
    /// | 5    | ✓        |                 |        |
    /// | 6    | ✓        |                 | ✓      |
    /// | 7    |          |                 |        |
    /// | 8    |          |                 | ✓      |
    pub fn condition(&self) -> Condition {
        match self {
            Self::Word(1) => Condition::new(true, true, false),
            Self::Word(2) => Condition::new(true, true, true),
            Self::Word(3) => Condition::new(false, true, false),
            Self::Word(4) => Condition::new(false, true, true),
            Self::Word(5) => Condition::new(true, false, false),
            Self::Word(6) => Condition::new(true, false, true),
            Self::Word(7) => Condition::new(false, false, false),
            Self::Word(8) => Condition::new(false, false, true),
            _ => Condition::NONE,
        }
    }

    /// Digit a word payload must start with (`'1'..='8'`).
    pub fn leading_digit(&self) -> Option<char> {
        match self {
            Self::Word(d) => char::from_digit(*d as u32, 10),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_alphabet_round_trips() {
        for code in TriggerCode::KNOWN {
            let tc = TriggerCode::from_code(code).unwrap();
            assert_eq!(tc.code(), code);
        }
    }

    #[test]
    fn unknown_codes_rejected() {
        for code in [0, 9, 11, 12, 13, 64, 999, -1] {
            assert!(TriggerCode::from_code(code).is_none(), "code {code}");
        }
        assert_eq!(
            TriggerCode::resolve(999, 4),
            Err(ReconcileError::UnknownTriggerCode { index: 4, code: 999 })
        );
    }

    #[test]
    fn word_conditions() {
        assert_eq!(TriggerCode::Word(2).condition(), Condition::new(true, true, true));
        assert_eq!(TriggerCode::Word(7).condition(), Condition::NONE);
        assert_eq!(TriggerCode::Word(8).condition(), Condition::new(false, false, true));
        assert_eq!(TriggerCode::Block.condition(), Condition::NONE);
    }

    #[test]
    fn leading_digit_only_for_words() {
        assert_eq!(TriggerCode::Word(5).leading_digit(), Some('5'));
        assert_eq!(TriggerCode::Fixation.leading_digit(), None);
    }
}
