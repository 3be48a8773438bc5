// =============================================================================
// Filmstrip - Time-Gated Puzzle Sequence State Machine
// =============================================================================
//
// The filmstrip is the ordered run of daily puzzle tiles. Each tile is in
// one of three states, derived from the unlock calculator and the player's
// progress:
//
//   locked            - its day hasn't arrived; no submission allowed
//   unlocked-unsolved - open for answering
//   unlocked-solved   - answered correctly; shows the accepted answer
//
// Transitions:
//
//   State             | Input            | Next              | Effects
//   ------------------|------------------|-------------------|------------------
//   unlocked-unsolved | correct answer   | unlocked-solved   | record answer +
//                     |                  |                   | reveal, advance
//                     |                  |                   | index, milestone
//   unlocked-unsolved | wrong answer     | unlocked-unsolved | attempt counter
//   locked            | any submission   | locked            | rejected
//
// The controller never reads the clock itself; callers pass the current
// unlocked count so the same machine runs under the real clock, a test
// override, or replayed history.

mod controller;

pub use controller::Filmstrip;

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Per-player progress. The serialized form doubles as the local cache
/// format, so fields keep their wire names.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Progress {
    /// Completed puzzle ids in completion order. Monotone: nothing in
    /// the library removes entries (only an admin clear wipes remote
    /// state, and that never reaches back into a live session).
    pub completed_ids: Vec<String>,
    /// Failed attempts per puzzle id.
    pub attempts_by_id: HashMap<String, u32>,
    /// Current navigation index into the puzzle sequence, 0-based.
    pub current_idx: usize,
    /// Reveal text shown for solved puzzles.
    pub reveal_by_id: HashMap<String, String>,
    /// The exact answer text that was accepted, per puzzle id.
    pub accepted_answer_by_id: HashMap<String, String>,
}

/// Derived state of a single tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TileState {
    Locked,
    Unsolved,
    Solved,
}

/// A solve row fetched from the remote progress store, reduced to what
/// hydration needs.
#[derive(Debug, Clone)]
pub struct RemoteSolve {
    pub puzzle_id: String,
    pub answer: String,
}

/// A previously-unsolved puzzle was just completed. Reported at most
/// once per puzzle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Milestone {
    pub completed_count: usize,
    pub just_completed_id: String,
}

/// Result of processing a submission.
#[derive(Debug, Clone)]
pub enum SubmitOutcome {
    /// The current tile's day hasn't arrived; nothing changed.
    Locked,
    /// The current tile was already solved; nothing changed.
    AlreadySolved,
    /// Wrong answer; the attempt counter advanced.
    Incorrect { attempts: u32 },
    /// Correct answer; the tile is now solved.
    Solved {
        milestone: Milestone,
        reveal_text: Option<String>,
    },
}
