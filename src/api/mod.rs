//! Wire types for the backend REST API.
//!
//! Every request and response body is a plain serde struct; the field
//! names match the server contract exactly. The fetch client lives in
//! [`client`] and only builds for the browser target.

#[cfg(target_arch = "wasm32")]
pub mod client;

use serde::{Deserialize, Serialize};

use crate::tuning::Difficulty;

/// Authenticated user as returned by `/api/auth/me`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: Option<String>,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
}

/// Catalog entry from `GET /api/exercises`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExerciseInfo {
    pub exercise_id: String,
    pub name: String,
    pub description: String,
    pub icon: String,
    pub difficulty: String,
    pub category: String,
}

/// One row of `GET /api/leaderboard/<exercise_id>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub user_id: String,
    pub name: String,
    #[serde(default)]
    pub picture: Option<String>,
    pub level: u32,
    #[serde(default)]
    pub best_time: Option<f64>,
    pub total_games: u32,
}

/// Per-exercise aggregate inside profile stats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProgressRow {
    pub exercise_id: String,
    pub level: u32,
    pub total_games: u32,
    #[serde(default)]
    pub best_score: Option<f64>,
    #[serde(default)]
    pub average_score: Option<f64>,
    #[serde(default)]
    pub last_played: Option<String>,
}

/// Response of `GET /api/profile/stats`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProfileStats {
    pub user: User,
    pub progress: Vec<ProgressRow>,
    pub total_games: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionRequest {
    pub session_id: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct TelegramLoginRequest {
    pub init_data: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub user: User,
}

#[derive(Debug, Clone, Serialize)]
pub struct GenerateTextRequest {
    pub difficulty: Difficulty,
    pub word_count: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GenerateTextResponse {
    pub text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpotDifferenceStartRequest {
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotDifferenceStartResponse {
    pub game_id: String,
    /// Base64-encoded images
    pub image1: String,
    pub image2: String,
    pub total_differences: u32,
    pub found_count: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct SpotDifferenceCheckRequest {
    pub game_id: String,
    pub x_percent: f64,
    pub y_percent: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SpotDifferenceCheckResponse {
    pub correct: bool,
    pub found_count: u32,
    pub completed: bool,
    #[serde(default)]
    pub time_taken: Option<f64>,
}

/// Result payload for a finished round, one variant per exercise.
///
/// Serializing a variant yields exactly the body its `/api/<game>/save`
/// endpoint expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum GameResult {
    Schulte {
        grid_size: u32,
        time_ms: u32,
    },
    Sequence {
        difficulty: Difficulty,
        level_reached: u32,
        max_sequence_length: u32,
        grid_size: u32,
    },
    Math {
        difficulty: Difficulty,
        correct_answers: u32,
        total_problems: u32,
        errors: u32,
        accuracy: u32,
        max_streak: u32,
        total_time: u32,
    },
    Stroop {
        difficulty: Difficulty,
        correct_answers: u32,
        total_questions: u32,
        average_time: f64,
    },
    Typing {
        difficulty: Difficulty,
        wpm: u32,
        accuracy: u32,
        total_time: u32,
    },
    CatchLetter {
        difficulty: Difficulty,
        caught_letters: u32,
        missed_letters: u32,
        total_time: u32,
    },
    WhackMole {
        difficulty: Difficulty,
        hits: u32,
        misses: u32,
        total_time: u32,
    },
    Reaction {
        difficulty: Difficulty,
        attempts: Vec<f64>,
        average_time: f64,
        best_time: f64,
    },
}

impl GameResult {
    /// Save endpoint path for this result, relative to the backend base.
    pub fn save_path(&self) -> &'static str {
        match self {
            GameResult::Schulte { .. } => "/api/schulte/save",
            GameResult::Sequence { .. } => "/api/sequence/save",
            GameResult::Math { .. } => "/api/math/save",
            GameResult::Stroop { .. } => "/api/stroop/save",
            GameResult::Typing { .. } => "/api/typing/save",
            GameResult::CatchLetter { .. } => "/api/catch-letter/save",
            GameResult::WhackMole { .. } => "/api/whack-mole/save",
            GameResult::Reaction { .. } => "/api/reaction/save",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_body_matches_contract() {
        let r = GameResult::CatchLetter {
            difficulty: Difficulty::Easy,
            caught_letters: 12,
            missed_letters: 3,
            total_time: 30,
        };
        let json: serde_json::Value = serde_json::to_value(&r).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "difficulty": "easy",
                "caught_letters": 12,
                "missed_letters": 3,
                "total_time": 30,
            })
        );
        assert_eq!(r.save_path(), "/api/catch-letter/save");
    }

    #[test]
    fn schulte_body_has_no_difficulty() {
        let r = GameResult::Schulte {
            grid_size: 5,
            time_ms: 42_130,
        };
        let json = serde_json::to_value(&r).unwrap();
        assert!(json.get("difficulty").is_none());
        assert_eq!(json["grid_size"], 5);
    }

    #[test]
    fn user_tolerates_missing_picture() {
        let u: User = serde_json::from_str(
            r#"{"id":"u1","email":"a@b.c","name":"Ann"}"#,
        )
        .unwrap();
        assert!(u.picture.is_none());
    }
}
