//! Data-driven game balance
//!
//! Immutable difficulty tables for every mini-game. All knobs live here
//! as `const fn` lookups so a round's configuration is fixed at compile
//! time and never mutated.

use serde::{Deserialize, Serialize};

use crate::games::math::Op;
use crate::games::stroop::StroopColor;

/// Difficulty tier shared by every tiered game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "easy" => Some(Difficulty::Easy),
            "medium" => Some(Difficulty::Medium),
            "hard" => Some(Difficulty::Hard),
            _ => None,
        }
    }

    /// Display name shown in the difficulty selector.
    pub fn label(&self) -> &'static str {
        match self {
            Difficulty::Easy => "Легко",
            Difficulty::Medium => "Средне",
            Difficulty::Hard => "Сложно",
        }
    }
}

/// Schulte grid sizes offered by the selector.
pub const SCHULTE_GRID_SIZES: &[usize] = &[4, 5, 6, 7];

const RU_VOWELS: &[char] = &['А', 'Е', 'И', 'О', 'У', 'Ы', 'Э', 'Ю', 'Я'];
const RU_ALPHABET: &[char] = &[
    'А', 'Б', 'В', 'Г', 'Д', 'Е', 'Ё', 'Ж', 'З', 'И', 'Й', 'К', 'Л', 'М', 'Н', 'О', 'П', 'Р',
    'С', 'Т', 'У', 'Ф', 'Х', 'Ц', 'Ч', 'Ш', 'Щ', 'Ъ', 'Ы', 'Ь', 'Э', 'Ю', 'Я',
];
const RU_EN_ALPHABET: &[char] = &[
    'А', 'Б', 'В', 'Г', 'Д', 'Е', 'Ё', 'Ж', 'З', 'И', 'Й', 'К', 'Л', 'М', 'Н', 'О', 'П', 'Р',
    'С', 'Т', 'У', 'Ф', 'Х', 'Ц', 'Ч', 'Ш', 'Щ', 'Ъ', 'Ы', 'Ь', 'Э', 'Ю', 'Я', 'A', 'B', 'C',
    'D', 'E', 'F', 'G', 'H', 'I', 'J', 'K', 'L', 'M', 'N', 'O', 'P', 'Q', 'R', 'S', 'T', 'U',
    'V', 'W', 'X', 'Y', 'Z',
];

/// Catch-the-letter: falling letters, resolved by keyboard.
#[derive(Debug, Clone, Copy)]
pub struct CatchLetterSettings {
    pub letters: &'static [char],
    /// Fall speed in percent of area height per reference frame
    pub speed: f64,
    pub max_letters: usize,
    pub duration_secs: u32,
    pub spawn_interval_ms: f64,
}

impl CatchLetterSettings {
    pub const fn for_difficulty(d: Difficulty) -> Self {
        match d {
            Difficulty::Easy => Self {
                letters: RU_VOWELS,
                speed: 2.0,
                max_letters: 1,
                duration_secs: 30,
                spawn_interval_ms: 2000.0,
            },
            Difficulty::Medium => Self {
                letters: RU_ALPHABET,
                speed: 3.0,
                max_letters: 2,
                duration_secs: 45,
                spawn_interval_ms: 1500.0,
            },
            Difficulty::Hard => Self {
                letters: RU_EN_ALPHABET,
                speed: 4.0,
                max_letters: 4,
                duration_secs: 60,
                spawn_interval_ms: 1000.0,
            },
        }
    }
}

/// Whack-a-mole: clickable targets popping out of a hole grid.
#[derive(Debug, Clone, Copy)]
pub struct WhackMoleSettings {
    pub grid_size: usize,
    pub max_moles: usize,
    pub mole_visible_ms: f64,
    pub spawn_interval_ms: f64,
    pub duration_secs: u32,
}

impl WhackMoleSettings {
    pub const fn for_difficulty(d: Difficulty) -> Self {
        match d {
            Difficulty::Easy => Self {
                grid_size: 2,
                max_moles: 1,
                mole_visible_ms: 2500.0,
                spawn_interval_ms: 2000.0,
                duration_secs: 30,
            },
            Difficulty::Medium => Self {
                grid_size: 3,
                max_moles: 2,
                mole_visible_ms: 1800.0,
                spawn_interval_ms: 1400.0,
                duration_secs: 45,
            },
            Difficulty::Hard => Self {
                grid_size: 4,
                max_moles: 3,
                mole_visible_ms: 1200.0,
                spawn_interval_ms: 900.0,
                duration_secs: 60,
            },
        }
    }

    pub const fn holes(&self) -> usize {
        self.grid_size * self.grid_size
    }
}

/// Math drill: random arithmetic problems against the clock.
#[derive(Debug, Clone, Copy)]
pub struct MathSettings {
    pub operations: &'static [Op],
    pub min_number: i32,
    pub max_number: i32,
    pub max_multiplier: i32,
    pub duration_secs: u32,
}

impl MathSettings {
    pub const fn for_difficulty(d: Difficulty) -> Self {
        match d {
            Difficulty::Easy => Self {
                operations: &[Op::Add, Op::Sub],
                min_number: 1,
                max_number: 20,
                max_multiplier: 10,
                duration_secs: 60,
            },
            Difficulty::Medium => Self {
                operations: &[Op::Add, Op::Sub, Op::Mul],
                min_number: 1,
                max_number: 50,
                max_multiplier: 10,
                duration_secs: 90,
            },
            Difficulty::Hard => Self {
                operations: &[Op::Add, Op::Sub, Op::Mul, Op::Div],
                min_number: 10,
                max_number: 100,
                max_multiplier: 12,
                duration_secs: 120,
            },
        }
    }
}

/// Sequence memory: repeat an ever-growing flash sequence.
#[derive(Debug, Clone, Copy)]
pub struct SequenceSettings {
    pub grid_size: usize,
    pub start_length: usize,
    pub show_time_ms: f64,
    pub pause_between_ms: f64,
}

impl SequenceSettings {
    pub const fn for_difficulty(d: Difficulty) -> Self {
        match d {
            Difficulty::Easy => Self {
                grid_size: 3,
                start_length: 2,
                show_time_ms: 800.0,
                pause_between_ms: 400.0,
            },
            Difficulty::Medium => Self {
                grid_size: 4,
                start_length: 3,
                show_time_ms: 600.0,
                pause_between_ms: 300.0,
            },
            Difficulty::Hard => Self {
                grid_size: 5,
                start_length: 4,
                show_time_ms: 400.0,
                pause_between_ms: 200.0,
            },
        }
    }

    pub const fn cells(&self) -> usize {
        self.grid_size * self.grid_size
    }
}

/// Stroop color test: name the ink, not the word.
#[derive(Debug, Clone, Copy)]
pub struct StroopSettings {
    pub questions: usize,
    pub colors: &'static [StroopColor],
    pub time_limit_secs: u32,
}

impl StroopSettings {
    pub const fn for_difficulty(d: Difficulty) -> Self {
        match d {
            Difficulty::Easy => Self {
                questions: 10,
                colors: &[
                    StroopColor::Red,
                    StroopColor::Blue,
                    StroopColor::Green,
                    StroopColor::Yellow,
                ],
                time_limit_secs: 60,
            },
            Difficulty::Medium => Self {
                questions: 15,
                colors: &[
                    StroopColor::Red,
                    StroopColor::Blue,
                    StroopColor::Green,
                    StroopColor::Yellow,
                    StroopColor::Purple,
                    StroopColor::Orange,
                ],
                time_limit_secs: 45,
            },
            Difficulty::Hard => Self {
                questions: 20,
                colors: &[
                    StroopColor::Red,
                    StroopColor::Blue,
                    StroopColor::Green,
                    StroopColor::Yellow,
                    StroopColor::Purple,
                    StroopColor::Orange,
                    StroopColor::Pink,
                    StroopColor::Brown,
                ],
                time_limit_secs: 30,
            },
        }
    }
}

/// Typing test: AI-generated target text with static fallbacks.
#[derive(Debug, Clone, Copy)]
pub struct TypingSettings {
    pub word_count: usize,
    pub duration_secs: u32,
    pub fallback_texts: &'static [&'static str],
}

impl TypingSettings {
    pub const fn for_difficulty(d: Difficulty) -> Self {
        match d {
            Difficulty::Easy => Self {
                word_count: 20,
                duration_secs: 30,
                fallback_texts: &[
                    "Быстрая коричневая лиса перепрыгнула через ленивую собаку.",
                    "Программирование - это искусство решения проблем.",
                    "Каждый день приносит новые возможности для роста.",
                    "Практика делает мастера в любом деле.",
                    "Знание - это сила, которая меняет мир.",
                ],
            },
            Difficulty::Medium => Self {
                word_count: 30,
                duration_secs: 45,
                fallback_texts: &[
                    "Регулярные тренировки мозга улучшают память, внимание и скорость \
                     мышления, а короткие игровые сессии делают процесс увлекательным.",
                    "Хорошие привычки формируются постепенно: небольшие ежедневные шаги \
                     приводят к заметным результатам уже через несколько недель.",
                ],
            },
            Difficulty::Hard => Self {
                word_count: 40,
                duration_secs: 60,
                fallback_texts: &[
                    "The quick brown fox jumps over the lazy dog. Быстрая коричневая лиса \
                     перепрыгивает через ленивую собаку. This sentence contains every \
                     letter of the English alphabet.",
                    "Сосредоточенность и точность важнее скорости: опытные машинистки \
                     сначала добиваются безошибочного набора, and only then push the pace \
                     to its limit.",
                ],
            },
        }
    }
}

/// Reaction test: click the target as soon as it appears.
#[derive(Debug, Clone, Copy)]
pub struct ReactionSettings {
    pub delay_min_ms: f64,
    pub delay_max_ms: f64,
    /// Target diameter in px (display only)
    pub target_size: f64,
    pub random_position: bool,
    pub rounds: usize,
}

impl ReactionSettings {
    pub const fn for_difficulty(d: Difficulty) -> Self {
        match d {
            Difficulty::Easy => Self {
                delay_min_ms: 1000.0,
                delay_max_ms: 3000.0,
                target_size: 100.0,
                random_position: false,
                rounds: 5,
            },
            Difficulty::Medium => Self {
                delay_min_ms: 500.0,
                delay_max_ms: 2000.0,
                target_size: 70.0,
                random_position: true,
                rounds: 5,
            },
            Difficulty::Hard => Self {
                delay_min_ms: 300.0,
                delay_max_ms: 1500.0,
                target_size: 50.0,
                random_position: true,
                rounds: 5,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tiers_scale_monotonically() {
        let easy = WhackMoleSettings::for_difficulty(Difficulty::Easy);
        let hard = WhackMoleSettings::for_difficulty(Difficulty::Hard);
        assert!(easy.mole_visible_ms > hard.mole_visible_ms);
        assert!(easy.spawn_interval_ms > hard.spawn_interval_ms);
        assert!(easy.max_moles < hard.max_moles);

        let easy = CatchLetterSettings::for_difficulty(Difficulty::Easy);
        let hard = CatchLetterSettings::for_difficulty(Difficulty::Hard);
        assert!(easy.speed < hard.speed);
        assert!(easy.letters.len() < hard.letters.len());
    }

    #[test]
    fn difficulty_round_trips_through_str() {
        for d in Difficulty::ALL {
            assert_eq!(Difficulty::from_str(d.as_str()), Some(d));
        }
        assert_eq!(Difficulty::from_str("extreme"), None);
    }

    #[test]
    fn difficulty_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&Difficulty::Easy).unwrap(),
            "\"easy\""
        );
    }

    #[test]
    fn stroop_tiers_have_enough_colors() {
        for d in Difficulty::ALL {
            let s = StroopSettings::for_difficulty(d);
            assert!(s.colors.len() >= 4);
            assert!(s.questions >= 10);
        }
    }
}
