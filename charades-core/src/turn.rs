use charades_types::{ActiveTurnState, DeckItem, GamePhase, Limit, WordResult, WordStatus};
use std::mem;
use tracing::{debug, info};

use crate::{ClockTick, Game, GameEvent};

/// Seconds of 3-2-1 before play begins
pub const LEAD_IN_SECONDS: u32 = 3;

/// Remaining-time marks that fire a [`GameEvent::TimeWarning`]
pub const TIME_WARNINGS: [u32; 2] = [10, 5];

impl Game {
    /// READY_CHECK -> ACTIVE_TURN(COUNTDOWN), seeding time and skips from settings.
    pub fn start_turn(&mut self) -> bool {
        if self.phase != GamePhase::ReadyCheck {
            return false;
        }

        self.phase = GamePhase::ActiveTurn {
            turn: ActiveTurnState::Countdown {
                lead_in_remaining: LEAD_IN_SECONDS,
                time_remaining: self.settings.round_duration,
                skips_remaining: self.settings.skips_per_turn,
            },
        };
        self.is_paused = false;
        self.start_clock(LEAD_IN_SECONDS);

        info!(
            "Turn started for team {} in round {}",
            self.current_team_index, self.current_round
        );
        self.event_bus.publish(GameEvent::TurnStarted {
            team_index: self.current_team_index,
            round: self.current_round,
        });
        true
    }

    /// COUNTDOWN -> PLAYING: draw the first word and start the round clock.
    pub fn finish_countdown(&mut self) -> bool {
        let Some(ActiveTurnState::Countdown {
            time_remaining,
            skips_remaining,
            ..
        }) = self.phase.active_turn().cloned()
        else {
            return false;
        };

        let first = self.deck.draw_next_card();
        self.phase = GamePhase::ActiveTurn {
            turn: ActiveTurnState::Playing {
                time_remaining,
                skips_remaining,
                current_word: first,
                words: Vec::new(),
            },
        };
        if !self.is_paused {
            self.start_clock(time_remaining);
        }

        self.event_bus.publish(GameEvent::PlayStarted {
            team_index: self.current_team_index,
        });
        true
    }

    /// Deliver a tick from the clock. Stale tickets and ticks while paused are dropped.
    pub fn clock_tick(&mut self, tick: ClockTick) {
        if !self.accepts_tick(tick.ticket) {
            debug!("Dropped stale clock tick {:?}", tick);
            return;
        }

        match &mut self.phase {
            GamePhase::ActiveTurn {
                turn:
                    ActiveTurnState::Countdown {
                        lead_in_remaining, ..
                    },
            } => {
                *lead_in_remaining = tick.remaining;
                self.event_bus.publish(GameEvent::CountdownTick {
                    remaining: tick.remaining,
                });
                if tick.remaining == 0 {
                    self.finish_countdown();
                }
            }
            GamePhase::ActiveTurn {
                turn: ActiveTurnState::Playing { .. },
            } => self.update_timer(tick.remaining),
            _ => {}
        }
    }

    /// Set the remaining play time. Reaching zero ends the turn; once the turn has
    /// left PLAYING further calls are ignored.
    pub fn update_timer(&mut self, remaining: u32) {
        let GamePhase::ActiveTurn {
            turn: ActiveTurnState::Playing { time_remaining, .. },
        } = &mut self.phase
        else {
            return;
        };

        let previous = mem::replace(time_remaining, remaining);
        for mark in TIME_WARNINGS {
            if previous > mark && remaining <= mark && remaining > 0 {
                self.event_bus.publish(GameEvent::TimeWarning {
                    seconds_remaining: mark,
                });
            }
        }

        if remaining == 0 {
            self.end_turn();
        }
    }

    /// Whether a skip is still allowed this turn.
    pub fn can_skip(&self) -> bool {
        self.skips_remaining().is_some_and(|s| !s.is_exhausted())
    }

    pub fn skips_remaining(&self) -> Option<Limit> {
        match self.phase.active_turn()? {
            ActiveTurnState::Countdown {
                skips_remaining, ..
            }
            | ActiveTurnState::Playing {
                skips_remaining, ..
            } => Some(*skips_remaining),
            ActiveTurnState::SecondChance { .. } => None,
        }
    }

    pub fn time_remaining(&self) -> Option<u32> {
        match self.phase.active_turn()? {
            ActiveTurnState::Countdown { time_remaining, .. }
            | ActiveTurnState::Playing { time_remaining, .. } => Some(*time_remaining),
            ActiveTurnState::SecondChance { .. } => None,
        }
    }

    pub fn current_word(&self) -> Option<&DeckItem> {
        self.phase.active_turn()?.current_word()
    }

    /// The active card's hint, when hints are on.
    pub fn current_hint(&self) -> Option<&str> {
        if !self.settings.hints_enabled {
            return None;
        }
        self.current_word()?.hint.as_deref()
    }

    /// Record the active word as GotIt or Skipped and draw its replacement.
    /// Ignored without an active word, while paused, or for any other status.
    pub fn mark_word(&mut self, status: WordStatus) -> bool {
        if self.is_paused || !matches!(status, WordStatus::GotIt | WordStatus::Skipped) {
            return false;
        }

        let GamePhase::ActiveTurn {
            turn:
                ActiveTurnState::Playing {
                    skips_remaining,
                    current_word,
                    words,
                    ..
                },
        } = &mut self.phase
        else {
            return false;
        };
        let Some(item) = current_word.take() else {
            return false;
        };

        if status == WordStatus::Skipped {
            *skips_remaining = skips_remaining.consume();
        }
        debug!("Marked '{}' as {:?}", item.word, status);
        let word = item.word.clone();
        words.push(WordResult::from_item(item, status));
        *current_word = self.deck.draw_next_card();

        self.event_bus
            .publish(GameEvent::WordMarked { word, status });
        true
    }

    /// Close out play. A word still on screen is recorded as Skipped. With second
    /// chance on and something skipped, move to SECOND_CHANCE; otherwise to REVIEW.
    /// Ending play lifts any pause, since no clock runs past this point.
    pub fn end_turn(&mut self) -> bool {
        let ends_play = matches!(
            self.phase.active_turn(),
            Some(ActiveTurnState::Countdown { .. } | ActiveTurnState::Playing { .. })
        );
        if !ends_play {
            return false;
        }
        self.cancel_clock();
        if self.is_paused {
            self.is_paused = false;
            self.event_bus
                .publish(GameEvent::PauseChanged { paused: false });
        }

        let words = match &mut self.phase {
            GamePhase::ActiveTurn {
                turn:
                    ActiveTurnState::Playing {
                        current_word,
                        words,
                        ..
                    },
            } => {
                let mut words = mem::take(words);
                if let Some(item) = current_word.take() {
                    words.push(WordResult::from_item(item, WordStatus::Skipped));
                }
                words
            }
            _ => Vec::new(),
        };

        let words_played = words.len();
        let queue: Vec<usize> = words
            .iter()
            .enumerate()
            .filter(|(_, w)| w.status == WordStatus::Skipped)
            .map(|(index, _)| index)
            .collect();

        if self.settings.second_chance_enabled && !queue.is_empty() {
            let queued = queue.len();
            self.phase = GamePhase::ActiveTurn {
                turn: ActiveTurnState::SecondChance {
                    words,
                    queue,
                    cursor: 0,
                },
            };
            self.event_bus
                .publish(GameEvent::SecondChanceStarted { queued });
        } else {
            self.phase = GamePhase::Review { words };
        }

        info!(
            "Turn ended for team {} with {} words played",
            self.current_team_index, words_played
        );
        self.event_bus.publish(GameEvent::TurnEnded {
            team_index: self.current_team_index,
            words_played,
        });
        true
    }

    /// Verdict on the word under the recovery cursor. Recovered words are promoted
    /// to SecondChance. Past the last queued word the turn moves to REVIEW.
    pub fn resolve_second_chance(&mut self, recovered: bool) -> bool {
        if self.is_paused {
            return false;
        }
        let GamePhase::ActiveTurn {
            turn:
                ActiveTurnState::SecondChance {
                    words,
                    queue,
                    cursor,
                },
        } = &mut self.phase
        else {
            return false;
        };

        let resolved = queue
            .get(*cursor)
            .and_then(|&index| words.get_mut(index))
            .map(|word| {
                if recovered {
                    word.status = WordStatus::SecondChance;
                }
                word.word.clone()
            });
        *cursor = cursor.saturating_add(1);
        let exhausted = *cursor >= queue.len();

        if exhausted {
            let words = mem::take(words);
            self.phase = GamePhase::Review { words };
        }
        if let Some(word) = resolved {
            self.event_bus
                .publish(GameEvent::SecondChanceResolved { word, recovered });
        }
        true
    }
}
