//! A play session: the screen graph wired to a live deck, ship and dice.

use std::path::Path;

use dsd6_core::die::Die;
use dsd6_core::error::Result;
use dsd6_core::fsm::{FsmError, State, StateHooks, StateId, StateMachine};
use dsd6_core::identity::IdAllocator;
use dsd6_core::rng::RandomSource;
use dsd6_core::save_game::SaveGame;
use dsd6_core::screens::{Screen, ScreenGraph};
use dsd6_core::ship::Ship;
use dsd6_core::threat_deck::ThreatDeck;

use crate::data_loader::GameData;

/// Randomness settings for a session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionConfig {
    /// Shuffle the deck reproducibly.
    pub reproducible: bool,
    /// Seed for the deck; the dice derive theirs from it.
    pub seed: Option<u64>,
}

/// State shared with every screen's hooks.
#[derive(Debug)]
pub struct GameContext {
    /// The player's ship.
    pub ship: Ship,
    /// The threat deck.
    pub deck: ThreatDeck,
    /// The threat die.
    pub threat_die: Die,
    /// The crew dice share one die; each roll is one crew die.
    pub crew_die: Die,
    /// Screen most recently entered.
    pub screen: Option<Screen>,
    /// Play-throughs started from the new game screen.
    pub play_throughs: u32,
}

impl GameContext {
    /// Refit the ship and reshuffle the whole deck.
    fn new_play_through(&mut self) {
        self.ship.refit();
        self.deck.reset_deck();
        self.deck.shuffle_deck(true);
        self.play_throughs += 1;
        tracing::info!(
            play_through = self.play_throughs,
            cards = self.deck.available_cards().len(),
            "New play-through"
        );
    }
}

/// Hooks shared by every screen.
///
/// Entering the board from the new game screen starts a fresh play-through;
/// entering it from anywhere else resumes the current one.
#[derive(Debug, Clone, Copy)]
struct ScreenHooks {
    screen: Screen,
}

impl StateHooks<GameContext> for ScreenHooks {
    fn enter(&mut self, ctx: &mut GameContext, _state: &State, previous: Option<&State>) {
        let from = previous.and_then(|p| Screen::from_name(p.name()));
        ctx.screen = Some(self.screen);
        if self.screen == Screen::GamePlay && from == Some(Screen::NewGame) {
            ctx.new_play_through();
        }
        tracing::debug!(screen = %self.screen, previous = ?from, "Entered screen");
    }

    fn leave(&mut self, _ctx: &mut GameContext, _state: &State, next: &State) {
        tracing::trace!(screen = %self.screen, next = next.name(), "Leaving screen");
    }
}

/// The screen graph and everything its hooks act on.
#[derive(Debug)]
pub struct GameSession {
    machine: StateMachine<GameContext>,
    graph: ScreenGraph,
    ctx: GameContext,
}

impl GameSession {
    /// Build a session from loaded data. The machine is not started yet.
    pub fn new(data: &GameData, config: SessionConfig) -> Result<Self> {
        let mut ids = IdAllocator::new();
        let mut machine = StateMachine::new();
        let graph = ScreenGraph::build(&mut machine, &mut ids, |screen| ScreenHooks { screen })?;

        let deck = ThreatDeck::from_catalogue(
            &data.catalogue,
            &mut ids,
            RandomSource::new(config.reproducible, config.seed),
        );
        let ship = Ship::from_data(&data.ship, &mut ids)?;
        let dice_rng = |offset: u64| {
            RandomSource::new(
                config.reproducible,
                config.seed.map(|seed| seed.wrapping_add(offset)),
            )
        };

        Ok(Self {
            machine,
            graph,
            ctx: GameContext {
                ship,
                deck,
                threat_die: Die::threat_die(dice_rng(1)),
                crew_die: Die::crew_die(dice_rng(2)),
                screen: None,
                play_throughs: 0,
            },
        })
    }

    /// Enter the splash screen.
    pub fn start(&mut self) -> Result<Screen> {
        let splash = self.graph.state_id(Screen::Splash);
        self.machine.start(&mut self.ctx, splash)?;
        Ok(Screen::Splash)
    }

    /// Current screen, once started.
    pub fn screen(&self) -> Option<Screen> {
        self.machine
            .current()
            .and_then(|id| self.graph.screen(id))
    }

    /// Fire a transition out of the current screen and return the screen
    /// entered.
    pub fn fire(&mut self, target: Option<Screen>) -> Result<Screen> {
        let target = target.map(|screen| self.graph.state_id(screen));
        let entered = self.machine.fire_from_current(&mut self.ctx, target, None)?;
        self.screen_for(entered)
    }

    fn screen_for(&self, state: StateId) -> Result<Screen> {
        self.graph
            .screen(state)
            .ok_or_else(|| FsmError::UnknownState(state).into())
    }

    /// Shared context.
    pub fn context(&self) -> &GameContext {
        &self.ctx
    }

    /// Mutable shared context, for deck, ship and dice commands.
    pub fn context_mut(&mut self) -> &mut GameContext {
        &mut self.ctx
    }

    /// The state machine driving the screens.
    pub fn machine(&self) -> &StateMachine<GameContext> {
        &self.machine
    }

    /// Write the current play-through to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let screen = self.screen().unwrap_or(Screen::Splash);
        SaveGame::capture(&self.ctx.deck, &self.ctx.ship, screen)?.save(path)?;
        tracing::info!(path = %path.display(), %screen, "Game saved");
        Ok(())
    }

    /// Restore a play-through from `path` into the current deck and ship.
    ///
    /// The current screen is left alone; the saved screen is returned so the
    /// caller can navigate back to it.
    pub fn load(&mut self, path: &Path) -> Result<Option<Screen>> {
        let save = SaveGame::load(path)?;
        save.apply(&mut self.ctx.deck, &mut self.ctx.ship)?;
        Ok(save.screen())
    }
}
