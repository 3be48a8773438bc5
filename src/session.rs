//! Player Session
//!
//! Wires the clock, schedule, filmstrip, local cache, and remote
//! progress client into one interactive session. Remote calls never
//! block or fail the interaction: hydration is awaited but non-fatal,
//! solve persistence is fire-and-forget, and local state stays
//! authoritative throughout.

use std::path::PathBuf;

use crate::cache;
use crate::clock::Clock;
use crate::filmstrip::{Filmstrip, Progress, RemoteSolve, SubmitOutcome, TileState};
use crate::puzzles::Puzzle;
use crate::remote::ProgressClient;
use crate::schedule::{Schedule, UnlockStatus};

pub struct PlayerSession {
    filmstrip: Filmstrip,
    client: ProgressClient,
    cache_path: PathBuf,
    schedule: Schedule,
    clock: Clock,
}

impl PlayerSession {
    /// Start a session: load the local cache, clamp into today's
    /// unlocked range, then hydrate and merge remote progress.
    pub async fn start(
        puzzles: Vec<Puzzle>,
        schedule: Schedule,
        clock: Clock,
        client: ProgressClient,
        cache_path: PathBuf,
    ) -> Self {
        let unlocked = schedule.unlock_status(clock.now_local()).unlocked_count;
        let local = cache::load(&cache_path).await.unwrap_or_default();
        let mut filmstrip = Filmstrip::restore(puzzles, local, unlocked);

        match client.fetch_progress().await {
            Ok(rows) => {
                let remote: Vec<RemoteSolve> = rows
                    .into_iter()
                    .map(|r| RemoteSolve {
                        puzzle_id: r.puzzle_id,
                        answer: r.answer,
                    })
                    .collect();
                filmstrip.merge_remote(&remote);
                log::debug!(
                    "hydrated {} remote solves for {}",
                    remote.len(),
                    client.player_id()
                );
            }
            Err(e) => {
                // Local progress still works without the server.
                log::debug!("remote hydration skipped: {e}");
            }
        }

        cache::save(&cache_path, filmstrip.progress()).await;

        Self {
            filmstrip,
            client,
            cache_path,
            schedule,
            clock,
        }
    }

    pub fn filmstrip(&self) -> &Filmstrip {
        &self.filmstrip
    }

    pub fn progress(&self) -> &Progress {
        self.filmstrip.progress()
    }

    pub fn schedule(&self) -> &Schedule {
        &self.schedule
    }

    pub fn now_local(&self) -> chrono::NaiveDateTime {
        self.clock.now_local()
    }

    pub fn unlock_status(&self) -> UnlockStatus {
        self.schedule.unlock_status(self.clock.now_local())
    }

    /// Submit an answer for the current puzzle.
    ///
    /// The bundled answers are checked first; on a local miss the
    /// server's validator gets the final word (it may know answers this
    /// build doesn't). A solve saves the cache and fires off the remote
    /// write without waiting for it.
    pub async fn submit(&mut self, input: &str) -> SubmitOutcome {
        let status = self.unlock_status();
        self.filmstrip.clamp_index(status.unlocked_count);

        let Some(current) = self.filmstrip.current() else {
            return SubmitOutcome::Locked;
        };
        let puzzle_id = current.id.clone();
        let day_number = self.filmstrip.current_index() + 1;
        let title = current.display_title(day_number);
        let mut reveal = current.reveal_text.clone();

        let tile = self
            .filmstrip
            .tile_state(self.filmstrip.current_index(), status.unlocked_count);
        let mut correct = self.filmstrip.check_local(input);
        if !correct && tile == TileState::Unsolved {
            match self.client.check_answer(&puzzle_id, input).await {
                Ok(verdict) => {
                    correct = verdict.correct;
                    if verdict.reveal_text.is_some() {
                        reveal = verdict.reveal_text;
                    }
                }
                Err(e) => log::debug!("remote validation unavailable: {e}"),
            }
        }

        let outcome =
            self.filmstrip
                .apply_submission(input, correct, reveal, status.unlocked_count);

        if let SubmitOutcome::Solved { .. } = outcome {
            let client = self.client.clone();
            let answer = input.to_string();
            let meta = serde_json::json!({ "title": title, "day": day_number });
            tokio::spawn(async move {
                if let Err(e) = client.record_solve(&puzzle_id, &answer, meta).await {
                    log::debug!("solve persistence deferred to local cache: {e}");
                }
            });
        }

        cache::save(&self.cache_path, self.filmstrip.progress()).await;
        outcome
    }

    /// Jump to an unlocked tile.
    pub async fn select(&mut self, idx: usize) -> bool {
        let status = self.unlock_status();
        let moved = self.filmstrip.select(idx, status.unlocked_count);
        if moved {
            cache::save(&self.cache_path, self.filmstrip.progress()).await;
        }
        moved
    }
}
