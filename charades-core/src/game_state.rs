use charades_types::{
    ActiveTurnState, DeckItem, GamePhase, GameSettings, Limit, MAX_TEAMS, MIN_TEAMS, Score,
    Team, TeamId, WordResult,
};
use tracing::{debug, info};

use crate::{
    ClockTicket, DeckEngine, Entitlement, GameEvent, GameEventBus, GameEventHandler,
    PersistedState, ScoringEngine, TurnClock,
};

/// One device, one match. Owns the roster, the settings, the phase machine and
/// the deck; every mutation goes through a named method and is total over the
/// reachable states. Calls that make no sense in the current phase are no-ops.
pub struct Game {
    pub(crate) teams: Vec<Team>,
    pub(crate) settings: GameSettings,
    pub(crate) phase: GamePhase,
    pub(crate) current_team_index: usize,
    pub(crate) current_round: u32,
    pub(crate) is_paused: bool,
    pub(crate) is_game_over: bool,
    pub(crate) deck: DeckEngine,
    pub(crate) event_bus: GameEventBus,
    entitlement: Box<dyn Entitlement>,
    clock: Box<dyn TurnClock>,
    active_ticket: Option<ClockTicket>,
    next_ticket: u64,
}

impl Game {
    pub fn new(
        deck: DeckEngine,
        entitlement: Box<dyn Entitlement>,
        clock: Box<dyn TurnClock>,
    ) -> Self {
        Self::restore(PersistedState::default(), deck, entitlement, clock)
    }

    /// Rebuild a game from a saved record. The record should already have been
    /// through `normalize_on_load`.
    pub fn restore(
        state: PersistedState,
        mut deck: DeckEngine,
        entitlement: Box<dyn Entitlement>,
        clock: Box<dyn TurnClock>,
    ) -> Self {
        let in_play = cards_out(&state.phase);
        deck.restore(state.available_words, state.used_words, in_play);

        let mut game = Self {
            teams: state.teams,
            settings: state.settings,
            phase: state.phase,
            current_team_index: state.current_team_index,
            current_round: state.current_round.max(1),
            is_paused: state.is_paused,
            is_game_over: state.is_game_over,
            deck,
            event_bus: GameEventBus::new(),
            entitlement,
            clock,
            active_ticket: None,
            next_ticket: 0,
        };
        game.clamp_team_index();
        game
    }

    pub fn snapshot(&self) -> PersistedState {
        PersistedState {
            teams: self.teams.clone(),
            settings: self.settings.clone(),
            phase: self.phase.clone(),
            current_team_index: self.current_team_index,
            current_round: self.current_round,
            is_paused: self.is_paused,
            is_game_over: self.is_game_over,
            available_words: self.deck.available().to_vec(),
            used_words: self.deck.used().to_vec(),
        }
    }

    pub fn add_event_handler(&mut self, handler: Box<dyn GameEventHandler>) {
        self.event_bus.add_handler(handler);
    }

    // ----- read access -----

    pub fn teams(&self) -> &[Team] {
        &self.teams
    }

    pub fn settings(&self) -> &GameSettings {
        &self.settings
    }

    pub fn phase(&self) -> &GamePhase {
        &self.phase
    }

    pub fn current_team_index(&self) -> usize {
        self.current_team_index
    }

    pub fn current_team(&self) -> Option<&Team> {
        self.teams.get(self.current_team_index)
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    pub fn deck(&self) -> &DeckEngine {
        &self.deck
    }

    pub fn standings(&self) -> Vec<Team> {
        ScoringEngine::standings(&self.teams)
    }

    pub fn winner(&self) -> Option<&Team> {
        ScoringEngine::winner(&self.teams)
    }

    /// Cards currently accounted for: both piles plus everything out on the table.
    /// Equals `deck().deck_size()` in every reachable state.
    pub fn cards_in_play(&self) -> usize {
        self.deck.available().len() + self.deck.used().len() + cards_out(&self.phase)
    }

    // ----- match lifecycle -----

    /// SETUP -> READY_CHECK. Needs at least two teams.
    pub fn start_game(&mut self) -> bool {
        if self.phase != GamePhase::Setup || self.teams.len() < MIN_TEAMS {
            return false;
        }

        let deck_size = self.deck.initialize(&self.settings, self.entitlement.as_ref());
        for team in &mut self.teams {
            team.score = Score::ZERO;
        }
        self.current_round = 1;
        self.current_team_index = 0;
        self.is_game_over = false;
        self.is_paused = false;
        self.phase = GamePhase::ReadyCheck;

        info!(
            "Game started with {} teams and {} cards",
            self.teams.len(),
            deck_size
        );
        self.event_bus.publish(GameEvent::GameStarted {
            teams: self.teams.len(),
            deck_size,
        });
        true
    }

    /// SCOREBOARD -> READY_CHECK, or -> SETUP with the game-over flag once the
    /// round cap is passed. Turn order is roster order.
    pub fn next_team(&mut self) -> bool {
        if !matches!(self.phase, GamePhase::Scoreboard { .. }) {
            return false;
        }

        let team_count = self.teams.len().max(1);
        let next = (self.current_team_index + 1) % team_count;
        self.current_team_index = next;

        if next == 0 {
            self.current_round += 1;
            if self.settings.total_rounds.is_exceeded_by(self.current_round) {
                self.phase = GamePhase::Setup;
                self.is_game_over = true;
                info!("Game completed after {} rounds", self.current_round - 1);
                let standings = self.standings();
                self.event_bus
                    .publish(GameEvent::GameCompleted { standings });
                return true;
            }
            info!("Round {} begins", self.current_round);
            self.event_bus.publish(GameEvent::RoundStarted {
                round: self.current_round,
            });
        }

        self.phase = GamePhase::ReadyCheck;
        true
    }

    /// Abandon the match from any phase.
    pub fn reset_game(&mut self) {
        self.cancel_clock();

        for team in &mut self.teams {
            team.score = Score::ZERO;
        }
        self.deck.initialize(&self.settings, self.entitlement.as_ref());
        self.phase = GamePhase::Setup;
        self.current_round = 1;
        self.current_team_index = 0;
        self.is_paused = false;
        self.is_game_over = false;

        info!("Game reset");
        self.event_bus.publish(GameEvent::GameReset);
    }

    // ----- pause -----

    /// Flip the pause flag. Only meaningful during an active turn.
    pub fn toggle_pause(&mut self) -> bool {
        if !self.phase.is_active_turn() {
            return false;
        }
        self.set_paused(!self.is_paused);
        true
    }

    /// Foreground lost while the clock runs: pause immediately.
    pub fn handle_focus_lost(&mut self) {
        let clock_running = matches!(
            self.phase.active_turn(),
            Some(ActiveTurnState::Countdown { .. } | ActiveTurnState::Playing { .. })
        );
        if clock_running && !self.is_paused {
            debug!("Focus lost mid-turn, pausing");
            self.set_paused(true);
        }
    }

    fn set_paused(&mut self, paused: bool) {
        if paused == self.is_paused {
            return;
        }

        if paused {
            self.active_ticket = None;
            self.clock.pause();
        } else if let Some(remaining) = self.phase.active_turn().and_then(|t| t.clock_remaining())
        {
            let ticket = self.issue_ticket();
            self.clock.resume(ticket, remaining);
        }

        self.is_paused = paused;
        self.event_bus.publish(GameEvent::PauseChanged { paused });
    }

    // ----- clock plumbing -----

    fn issue_ticket(&mut self) -> ClockTicket {
        self.next_ticket += 1;
        let ticket = ClockTicket(self.next_ticket);
        self.active_ticket = Some(ticket);
        ticket
    }

    pub(crate) fn start_clock(&mut self, remaining: u32) {
        let ticket = self.issue_ticket();
        self.clock.start(ticket, remaining);
    }

    pub(crate) fn cancel_clock(&mut self) {
        self.active_ticket = None;
        self.clock.cancel();
    }

    pub(crate) fn accepts_tick(&self, ticket: ClockTicket) -> bool {
        !self.is_paused && self.active_ticket == Some(ticket)
    }

    // ----- roster -----

    /// Append a team. Blank names, a full roster and an exhausted id space are ignored.
    pub fn add_team(&mut self, name: &str) -> Option<TeamId> {
        if self.teams.len() >= MAX_TEAMS {
            return None;
        }

        let id = self.teams.iter().map(|t| t.id).max().unwrap_or(0).checked_add(1)?;
        let color_index = (0..MAX_TEAMS as u32)
            .find(|c| self.teams.iter().all(|t| t.color_index != *c))
            .unwrap_or(0);
        let team = Team::new(id, name, color_index)?;

        debug!("Added team {} ({})", team.name, id);
        self.teams.push(team);
        Some(id)
    }

    /// Remove a team, never going below the minimum roster.
    pub fn remove_team(&mut self, id: TeamId) -> bool {
        if self.teams.len() <= MIN_TEAMS {
            return false;
        }
        let Some(position) = self.teams.iter().position(|t| t.id == id) else {
            return false;
        };

        self.teams.remove(position);
        self.clamp_team_index();
        true
    }

    pub fn rename_team(&mut self, id: TeamId, name: &str) -> bool {
        self.teams
            .iter_mut()
            .find(|t| t.id == id)
            .is_some_and(|team| team.rename(name))
    }

    fn clamp_team_index(&mut self) {
        if self.current_team_index >= self.teams.len() {
            self.current_team_index = self.teams.len().saturating_sub(1);
        }
    }

    // ----- settings and deck configuration -----

    /// Edit match settings. Takes effect from the next turn; the deck picks up
    /// deck changes at the next start or reset.
    pub fn update_settings(&mut self, edit: impl FnOnce(&mut GameSettings)) {
        edit(&mut self.settings);
    }

    pub fn toggle_unlimited_skips(&mut self) -> Limit {
        self.settings.toggle_unlimited_skips();
        self.settings.skips_per_turn
    }

    pub fn toggle_unlimited_rounds(&mut self) -> Limit {
        self.settings.toggle_unlimited_rounds();
        self.settings.total_rounds
    }

    /// Add a custom word unless it is blank or duplicates a playable word.
    pub fn add_custom_word(&mut self, word: &str) -> bool {
        match self.deck.accept_custom_word(&self.settings, word) {
            Some(word) => {
                self.settings.custom_words.push(word);
                true
            }
            None => false,
        }
    }

    pub fn remove_custom_word(&mut self, word: &str) -> bool {
        let before = self.settings.custom_words.len();
        self.settings.custom_words.retain(|w| w != word);
        self.settings.custom_words.len() != before
    }

    /// Replace deck selection and custom words together. Does not reshuffle.
    pub fn set_deck_config(&mut self, name: &str, custom_words: Vec<String>) {
        self.settings.selected_deck = name.to_string();
        self.settings.custom_words = custom_words
            .into_iter()
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .collect();
    }
}

/// Cards out of both piles: the active word plus the turn history.
fn cards_out(phase: &GamePhase) -> usize {
    match phase {
        GamePhase::ActiveTurn { turn } => {
            turn.words().len() + usize::from(turn.current_word().is_some())
        }
        GamePhase::Review { words } => words.len(),
        GamePhase::Setup | GamePhase::ReadyCheck | GamePhase::Scoreboard { .. } => 0,
    }
}

pub(crate) fn deck_items(words: Vec<WordResult>) -> (Vec<DeckItem>, Vec<DeckItem>) {
    let (retired, returned): (Vec<WordResult>, Vec<WordResult>) =
        words.into_iter().partition(|w| w.status.retires_card());
    (
        retired.into_iter().map(WordResult::into_deck_item).collect(),
        returned.into_iter().map(WordResult::into_deck_item).collect(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{DeckLibrary, ManualClock, NoopClock};

    fn new_game() -> Game {
        Game::new(
            DeckEngine::with_seed(DeckLibrary::builtin(), 11),
            Box::new(true),
            Box::new(NoopClock),
        )
    }

    fn to_scoreboard(game: &mut Game) {
        game.start_turn();
        game.end_turn();
        game.apply_review_scores();
    }

    #[test]
    fn test_new_game_starts_in_setup() {
        let game = new_game();
        assert_eq!(*game.phase(), GamePhase::Setup);
        assert_eq!(game.teams().len(), 2);
        assert_eq!(game.current_round(), 1);
        assert!(!game.is_paused());
    }

    #[test]
    fn test_start_game_initializes_deck() {
        let mut game = new_game();
        assert!(game.start_game());
        assert_eq!(*game.phase(), GamePhase::ReadyCheck);
        assert_eq!(game.deck().available().len(), 30);
        assert!(!game.start_game(), "only from setup");
    }

    #[test]
    fn test_start_game_needs_two_teams() {
        let mut game = new_game();
        game.teams.truncate(1);
        assert!(!game.start_game());
        assert_eq!(*game.phase(), GamePhase::Setup);
    }

    #[test]
    fn test_roster_limits() {
        let mut game = new_game();
        assert_eq!(game.add_team("  "), None);
        assert_eq!(game.add_team("Owls"), Some(3));
        assert_eq!(game.add_team("Foxes"), Some(4));
        assert_eq!(game.add_team("Bears"), Some(5));
        assert_eq!(game.add_team("Wolves"), None);

        let colors: std::collections::HashSet<u32> =
            game.teams().iter().map(|t| t.color_index).collect();
        assert_eq!(colors.len(), MAX_TEAMS);

        assert!(game.rename_team(3, "Night Owls"));
        assert!(!game.rename_team(42, "Nobody"));
        assert_eq!(game.teams()[2].name, "Night Owls");
    }

    #[test]
    fn test_add_team_with_exhausted_ids() {
        let mut game = new_game();
        game.teams[1].id = TeamId::MAX;
        assert_eq!(game.add_team("Owls"), None);
        assert_eq!(game.teams().len(), 2);
    }

    #[test]
    fn test_remove_team_clamps_index() {
        let mut game = new_game();
        game.add_team("Owls");
        game.current_team_index = 2;

        assert!(game.remove_team(3));
        assert_eq!(game.current_team_index(), 1);
        assert!(!game.remove_team(1), "never below two teams");
        assert!(!game.remove_team(99));
    }

    #[test]
    fn test_next_team_wraps_and_counts_rounds() {
        let mut game = new_game();
        game.start_game();

        to_scoreboard(&mut game);
        assert!(game.next_team());
        assert_eq!(game.current_team_index(), 1);
        assert_eq!(game.current_round(), 1);

        to_scoreboard(&mut game);
        game.next_team();
        assert_eq!(game.current_team_index(), 0);
        assert_eq!(game.current_round(), 2);
        assert_eq!(*game.phase(), GamePhase::ReadyCheck);
    }

    #[test]
    fn test_round_cap_ends_game() {
        let mut game = new_game();
        game.update_settings(|s| s.set_total_rounds(Limit::Finite(1)));
        game.start_game();

        to_scoreboard(&mut game);
        game.next_team();
        to_scoreboard(&mut game);
        game.next_team();

        assert_eq!(*game.phase(), GamePhase::Setup);
        assert!(game.is_game_over());

        assert!(game.start_game());
        assert!(!game.is_game_over());
        assert_eq!(game.current_round(), 1);
    }

    #[test]
    fn test_unlimited_rounds_never_end() {
        let mut game = new_game();
        game.update_settings(|s| s.set_total_rounds(Limit::Unlimited));
        game.start_game();
        for _ in 0..20 {
            to_scoreboard(&mut game);
            game.next_team();
        }
        assert_eq!(*game.phase(), GamePhase::ReadyCheck);
        assert_eq!(game.current_round(), 11);
    }

    #[test]
    fn test_reset_from_mid_turn() {
        let clock = ManualClock::new();
        let mut game = Game::new(
            DeckEngine::with_seed(DeckLibrary::builtin(), 11),
            Box::new(true),
            Box::new(clock.clone()),
        );
        game.start_game();
        game.start_turn();
        game.finish_countdown();
        game.teams[0].score = Score::new(4.0);
        game.toggle_pause();

        game.reset_game();
        assert_eq!(*game.phase(), GamePhase::Setup);
        assert!(!game.is_paused());
        assert_eq!(game.teams()[0].score, Score::ZERO);
        assert_eq!(game.deck().available().len(), 30);
        assert!(!clock.is_running());
    }

    #[test]
    fn test_pause_only_during_active_turn() {
        let mut game = new_game();
        assert!(!game.toggle_pause());
        game.start_game();
        assert!(!game.toggle_pause());
        game.start_turn();
        assert!(game.toggle_pause());
        assert!(game.is_paused());
        assert!(game.toggle_pause());
        assert!(!game.is_paused());
    }

    #[test]
    fn test_custom_words() {
        let mut game = new_game();
        assert!(game.add_custom_word("Zebra Crossing"));
        assert!(!game.add_custom_word("zebracrossing"));
        assert!(!game.add_custom_word("Pizza"));
        assert!(!game.add_custom_word("  "));
        assert!(!game.remove_custom_word("zebra crossing"), "exact match only");
        assert!(game.remove_custom_word("Zebra Crossing"));
        assert!(game.settings().custom_words.is_empty());
    }

    #[test]
    fn test_set_deck_config_does_not_reshuffle() {
        let mut game = new_game();
        game.start_game();
        let before = game.deck().available().to_vec();

        game.set_deck_config("movies", vec!["Alien".into(), " ".into()]);
        assert_eq!(game.settings().selected_deck, "movies");
        assert_eq!(game.settings().custom_words, vec!["Alien".to_string()]);
        assert_eq!(game.deck().available(), before.as_slice());
    }

    #[test]
    fn test_toggle_helpers() {
        let mut game = new_game();
        assert_eq!(game.toggle_unlimited_skips(), Limit::Unlimited);
        assert_eq!(game.toggle_unlimited_skips(), Limit::Finite(3));
        assert_eq!(game.toggle_unlimited_rounds(), Limit::Unlimited);
    }
}
