// =============================================================================
// Filmstrip Controller
// =============================================================================

use crate::answer;
use crate::puzzles::Puzzle;

use super::{Milestone, Progress, RemoteSolve, SubmitOutcome, TileState};

/// State machine over the puzzle sequence for one player.
#[derive(Debug)]
pub struct Filmstrip {
    puzzles: Vec<Puzzle>,
    progress: Progress,
}

impl Filmstrip {
    /// Fresh filmstrip: index 0, empty completed set.
    pub fn new(puzzles: Vec<Puzzle>) -> Self {
        Self {
            puzzles,
            progress: Progress::default(),
        }
    }

    /// Rebuild from cached progress, dropping duplicates and clamping
    /// the navigation index into the unlocked range.
    pub fn restore(puzzles: Vec<Puzzle>, mut progress: Progress, unlocked_count: usize) -> Self {
        let mut seen = std::collections::HashSet::new();
        progress.completed_ids.retain(|id| seen.insert(id.clone()));

        let mut strip = Self { puzzles, progress };
        strip.clamp_index(unlocked_count);
        strip
    }

    pub fn puzzles(&self) -> &[Puzzle] {
        &self.puzzles
    }

    pub fn progress(&self) -> &Progress {
        &self.progress
    }

    pub fn current_index(&self) -> usize {
        self.progress.current_idx
    }

    /// The puzzle the player is looking at, if the catalog is non-empty.
    pub fn current(&self) -> Option<&Puzzle> {
        self.puzzles.get(self.progress.current_idx)
    }

    pub fn is_solved(&self, puzzle_id: &str) -> bool {
        self.progress.completed_ids.iter().any(|id| id == puzzle_id)
    }

    pub fn completed_count(&self) -> usize {
        self.progress.completed_ids.len()
    }

    /// Every puzzle solved: the terminal state.
    pub fn all_complete(&self) -> bool {
        !self.puzzles.is_empty() && self.completed_count() == self.puzzles.len()
    }

    /// Derived state of the tile at `idx`.
    pub fn tile_state(&self, idx: usize, unlocked_count: usize) -> TileState {
        if idx >= unlocked_count {
            return TileState::Locked;
        }
        match self.puzzles.get(idx) {
            Some(p) if self.is_solved(&p.id) => TileState::Solved,
            Some(_) => TileState::Unsolved,
            None => TileState::Locked,
        }
    }

    /// Check a submission against the current puzzle's bundled answers.
    /// Pure; the remote-validation fallback composes on top of this.
    pub fn check_local(&self, input: &str) -> bool {
        self.current()
            .map(|p| answer::matches(input, p.answers()))
            .unwrap_or(false)
    }

    /// Apply a submission verdict to the current tile.
    ///
    /// `correct` is whatever the caller settled on (local match, or the
    /// remote validator's verdict when the local check missed - remote
    /// wins on disagreement). On success the index advances to
    /// `min(idx + 1, unlocked_count - 1, total - 1)` and a milestone is
    /// reported; re-solving an already-solved tile is a no-op.
    pub fn apply_submission(
        &mut self,
        input: &str,
        correct: bool,
        reveal_text: Option<String>,
        unlocked_count: usize,
    ) -> SubmitOutcome {
        let idx = self.progress.current_idx;
        let Some(puzzle) = self.puzzles.get(idx) else {
            return SubmitOutcome::Locked;
        };
        if idx >= unlocked_count {
            return SubmitOutcome::Locked;
        }
        let puzzle_id = puzzle.id.clone();
        if self.is_solved(&puzzle_id) {
            return SubmitOutcome::AlreadySolved;
        }

        if !correct {
            let attempts = self
                .progress
                .attempts_by_id
                .entry(puzzle_id)
                .and_modify(|n| *n += 1)
                .or_insert(1);
            return SubmitOutcome::Incorrect { attempts: *attempts };
        }

        self.progress.completed_ids.push(puzzle_id.clone());
        self.progress
            .accepted_answer_by_id
            .insert(puzzle_id.clone(), input.to_string());
        if let Some(text) = reveal_text.clone() {
            self.progress.reveal_by_id.insert(puzzle_id.clone(), text);
        }

        let last = self.puzzles.len().saturating_sub(1);
        self.progress.current_idx = (idx + 1)
            .min(unlocked_count.saturating_sub(1))
            .min(last);

        SubmitOutcome::Solved {
            milestone: Milestone {
                completed_count: self.progress.completed_ids.len(),
                just_completed_id: puzzle_id,
            },
            reveal_text,
        }
    }

    /// Local-only submission: bundled-answer check plus application.
    pub fn submit_local(&mut self, input: &str, unlocked_count: usize) -> SubmitOutcome {
        let correct = self.check_local(input);
        let reveal = self.current().and_then(|p| p.reveal_text.clone());
        self.apply_submission(input, correct, reveal, unlocked_count)
    }

    /// Manual tile selection. Only unlocked tiles are reachable.
    pub fn select(&mut self, idx: usize, unlocked_count: usize) -> bool {
        if idx >= unlocked_count || idx >= self.puzzles.len() {
            return false;
        }
        self.progress.current_idx = idx;
        true
    }

    /// Re-clamp the navigation index as unlock boundaries pass.
    pub fn clamp_index(&mut self, unlocked_count: usize) {
        let last = self.puzzles.len().saturating_sub(1);
        let max_idx = unlocked_count.saturating_sub(1).min(last);
        if self.progress.current_idx > max_idx {
            self.progress.current_idx = max_idx;
        }
    }

    /// Merge remote progress into local state. Additive and idempotent:
    /// the completed set becomes the union, and the remote accepted
    /// answer text wins when both sides have one.
    pub fn merge_remote(&mut self, rows: &[RemoteSolve]) {
        for row in rows {
            if !self.is_solved(&row.puzzle_id) {
                self.progress.completed_ids.push(row.puzzle_id.clone());
            }
            if !row.answer.is_empty() {
                self.progress
                    .accepted_answer_by_id
                    .insert(row.puzzle_id.clone(), row.answer.clone());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzles::AnswerSpec;

    fn puzzle(id: &str, answers: &[&str]) -> Puzzle {
        Puzzle {
            id: id.to_string(),
            title: None,
            question: format!("question {id}"),
            answer: AnswerSpec::Many(answers.iter().map(|s| s.to_string()).collect()),
            hint: None,
            image_url: None,
            reveal_text: Some(format!("reveal {id}")),
        }
    }

    fn three_day_strip() -> Filmstrip {
        Filmstrip::new(vec![
            puzzle("d1", &["echo"]),
            puzzle("d2", &["piano"]),
            puzzle("d3", &["map"]),
        ])
    }

    #[test]
    fn test_solve_advances_within_unlocked_range() {
        let mut strip = three_day_strip();

        // All three days unlocked: solving day 1 moves to day 2.
        let outcome = strip.submit_local("Echo", 3);
        match outcome {
            SubmitOutcome::Solved { milestone, reveal_text } => {
                assert_eq!(milestone.completed_count, 1);
                assert_eq!(milestone.just_completed_id, "d1");
                assert_eq!(reveal_text.as_deref(), Some("reveal d1"));
            }
            other => panic!("expected Solved, got {other:?}"),
        }
        assert_eq!(strip.current_index(), 1);
    }

    #[test]
    fn test_solve_never_advances_past_unlocked_count() {
        let mut strip = three_day_strip();

        // Only day 1 unlocked: solving it leaves the index pinned at 0.
        let outcome = strip.submit_local("echo", 1);
        assert!(matches!(outcome, SubmitOutcome::Solved { .. }));
        assert_eq!(strip.current_index(), 0);
        assert_eq!(strip.tile_state(0, 1), TileState::Solved);
        assert_eq!(strip.tile_state(1, 1), TileState::Locked);
    }

    #[test]
    fn test_wrong_answer_counts_attempts_and_stays_put() {
        let mut strip = three_day_strip();

        for want in 1..=3u32 {
            match strip.submit_local("wrong", 3) {
                SubmitOutcome::Incorrect { attempts } => assert_eq!(attempts, want),
                other => panic!("expected Incorrect, got {other:?}"),
            }
        }
        assert_eq!(strip.current_index(), 0);
        assert_eq!(strip.completed_count(), 0);
    }

    #[test]
    fn test_locked_tile_rejects_submission() {
        let mut strip = three_day_strip();
        let outcome = strip.submit_local("echo", 0);
        assert!(matches!(outcome, SubmitOutcome::Locked));
        assert_eq!(strip.completed_count(), 0);
    }

    #[test]
    fn test_resolve_is_noop() {
        let mut strip = three_day_strip();
        strip.submit_local("echo", 1);
        assert!(matches!(
            strip.submit_local("echo", 1),
            SubmitOutcome::AlreadySolved
        ));
        assert_eq!(strip.completed_count(), 1);
    }

    #[test]
    fn test_remote_verdict_wins_over_local_miss() {
        let mut strip = three_day_strip();

        // Local check misses, but the remote validator said yes.
        assert!(!strip.check_local("reverberation"));
        let outcome =
            strip.apply_submission("reverberation", true, Some("surprise".into()), 3);
        assert!(matches!(outcome, SubmitOutcome::Solved { .. }));
        assert_eq!(
            strip.progress().accepted_answer_by_id.get("d1").unwrap(),
            "reverberation"
        );
        assert_eq!(strip.progress().reveal_by_id.get("d1").unwrap(), "surprise");
    }

    #[test]
    fn test_select_bounded_by_unlocked() {
        let mut strip = three_day_strip();
        assert!(strip.select(1, 2));
        assert_eq!(strip.current_index(), 1);
        assert!(!strip.select(2, 2));
        assert_eq!(strip.current_index(), 1);
        assert!(!strip.select(9, 3));
    }

    #[test]
    fn test_clamp_index_when_range_shrinks() {
        // A cached index past today's unlock count snaps back.
        let mut progress = Progress::default();
        progress.current_idx = 2;
        let strip = Filmstrip::restore(
            vec![
                puzzle("d1", &["a"]),
                puzzle("d2", &["b"]),
                puzzle("d3", &["c"]),
            ],
            progress,
            1,
        );
        assert_eq!(strip.current_index(), 0);
    }

    #[test]
    fn test_restore_drops_duplicate_completions() {
        let mut progress = Progress::default();
        progress.completed_ids =
            vec!["d1".to_string(), "d2".to_string(), "d1".to_string()];
        let strip = Filmstrip::restore(
            vec![puzzle("d1", &["a"]), puzzle("d2", &["b"])],
            progress,
            2,
        );
        assert_eq!(strip.progress().completed_ids, ["d1", "d2"]);
    }

    #[test]
    fn test_merge_remote_is_union_and_idempotent() {
        let mut strip = three_day_strip();
        strip.submit_local("echo", 3);

        let rows = vec![
            RemoteSolve { puzzle_id: "d2".into(), answer: "grand piano".into() },
            RemoteSolve { puzzle_id: "d1".into(), answer: "an echo".into() },
        ];
        strip.merge_remote(&rows);
        let after_once = strip.progress().clone();

        strip.merge_remote(&rows);
        let after_twice = strip.progress().clone();

        assert_eq!(after_once.completed_ids, after_twice.completed_ids);
        assert_eq!(
            after_once.accepted_answer_by_id,
            after_twice.accepted_answer_by_id
        );
        assert_eq!(after_once.completed_ids, ["d1", "d2"]);
        // Remote answer text overwrites the local copy on conflict.
        assert_eq!(
            after_once.accepted_answer_by_id.get("d1").unwrap(),
            "an echo"
        );
    }

    #[test]
    fn test_merge_order_does_not_change_membership() {
        let a = RemoteSolve { puzzle_id: "d1".into(), answer: String::new() };
        let b = RemoteSolve { puzzle_id: "d2".into(), answer: String::new() };

        let mut forward = three_day_strip();
        forward.merge_remote(&[a.clone(), b.clone()]);
        let mut backward = three_day_strip();
        backward.merge_remote(&[b, a]);

        let mut lhs = forward.progress().completed_ids.clone();
        let mut rhs = backward.progress().completed_ids.clone();
        lhs.sort();
        rhs.sort();
        assert_eq!(lhs, rhs);
    }

    #[test]
    fn test_completed_set_is_monotone() {
        let mut strip = three_day_strip();
        strip.submit_local("echo", 3);
        strip.submit_local("wrong", 3);
        strip.submit_local("piano", 3);
        strip.merge_remote(&[]);
        strip.clamp_index(3);
        strip.select(0, 3);

        assert!(strip.is_solved("d1"));
        assert!(strip.is_solved("d2"));
    }

    #[test]
    fn test_all_complete_milestone_at_final_solve() {
        let mut strip = three_day_strip();
        strip.submit_local("echo", 3);
        strip.submit_local("piano", 3);
        assert!(!strip.all_complete());

        match strip.submit_local("map", 3) {
            SubmitOutcome::Solved { milestone, .. } => {
                assert_eq!(milestone.completed_count, 3);
            }
            other => panic!("expected Solved, got {other:?}"),
        }
        assert!(strip.all_complete());
        // Index stays on the final tile.
        assert_eq!(strip.current_index(), 2);
    }
}
