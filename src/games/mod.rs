//! Mini-game state machines.
//!
//! Each game is a pure, headless struct driven by the shell: the shell
//! feeds it `now_ms` timestamps and user input, the game answers with
//! state the shell renders. No game module touches the DOM or the
//! network; finished rounds expose an [`crate::api::GameResult`] for
//! the shell to POST.

pub mod catch_letter;
pub mod math;
pub mod reaction;
pub mod schulte;
pub mod sequence;
pub mod spot_difference;
pub mod stroop;
pub mod typing;
pub mod whack_mole;

/// Every playable exercise, keyed by the slug used in routes and
/// leaderboard lookups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GameKind {
    Schulte,
    Sequence,
    SpotDifference,
    Reaction,
    Math,
    Stroop,
    Typing,
    CatchLetter,
    WhackMole,
}

impl GameKind {
    pub const ALL: [GameKind; 9] = [
        GameKind::Schulte,
        GameKind::Sequence,
        GameKind::SpotDifference,
        GameKind::Reaction,
        GameKind::Math,
        GameKind::Stroop,
        GameKind::Typing,
        GameKind::CatchLetter,
        GameKind::WhackMole,
    ];

    pub fn slug(&self) -> &'static str {
        match self {
            GameKind::Schulte => "schulte",
            GameKind::Sequence => "sequence",
            GameKind::SpotDifference => "spot-difference",
            GameKind::Reaction => "reaction",
            GameKind::Math => "math",
            GameKind::Stroop => "stroop",
            GameKind::Typing => "typing",
            GameKind::CatchLetter => "catch-letter",
            GameKind::WhackMole => "whack-mole",
        }
    }

    pub fn from_slug(slug: &str) -> Option<Self> {
        Self::ALL.iter().copied().find(|k| k.slug() == slug)
    }

    pub fn title(&self) -> &'static str {
        match self {
            GameKind::Schulte => "Таблицы Шульте",
            GameKind::Sequence => "Запоминание последовательностей",
            GameKind::SpotDifference => "Поиск отличий",
            GameKind::Reaction => "Скорость реакции",
            GameKind::Math => "Математические задачи",
            GameKind::Stroop => "Тест Струпа",
            GameKind::Typing => "Скоростная печать",
            GameKind::CatchLetter => "Поймай букву",
            GameKind::WhackMole => "Поймай крота",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugs_round_trip() {
        for k in GameKind::ALL {
            assert_eq!(GameKind::from_slug(k.slug()), Some(k));
        }
        assert_eq!(GameKind::from_slug("sudoku"), None);
    }
}
