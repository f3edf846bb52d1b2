//! The game's screen graph.
//!
//! Every screen of the game is a state; the legal moves between screens are
//! the transitions wired by [`ScreenGraph::build`]. Presentation code supplies
//! the hooks for each screen.

use std::collections::HashMap;
use std::fmt;

use crate::fsm::{FsmError, StateHooks, StateId, StateMachine};
use crate::identity::IdAllocator;

/// One screen of the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    /// Shown once at start-up.
    Splash,
    /// Top-level menu.
    MainMenu,
    /// Ship selection for a new play-through.
    NewGame,
    /// Saved game selection.
    LoadGame,
    /// Settings.
    Options,
    /// Credits roll.
    Credits,
    /// Extra content.
    Extras,
    /// Exit confirmation.
    Quit,
    /// The board.
    GamePlay,
    /// In-game pause menu.
    GamePlayMenu,
    /// Save slot selection.
    SaveGame,
}

impl Screen {
    /// Every screen, in registration order.
    pub const ALL: [Self; 11] = [
        Self::Splash,
        Self::MainMenu,
        Self::NewGame,
        Self::LoadGame,
        Self::Options,
        Self::Credits,
        Self::Extras,
        Self::Quit,
        Self::GamePlay,
        Self::GamePlayMenu,
        Self::SaveGame,
    ];

    /// Stable state name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Splash => "splash_screen",
            Self::MainMenu => "main_menu_screen",
            Self::NewGame => "new_game_screen",
            Self::LoadGame => "load_game_screen",
            Self::Options => "options_screen",
            Self::Credits => "credits_screen",
            Self::Extras => "extras_screen",
            Self::Quit => "quit_screen",
            Self::GamePlay => "game_play_screen",
            Self::GamePlayMenu => "game_play_menu_screen",
            Self::SaveGame => "save_game_screen",
        }
    }

    /// Screen with the given state name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|screen| screen.name() == name)
    }

    const fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Screen {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Legal screen changes, in the order they are wired.
pub const SCREEN_TRANSITIONS: [(Screen, Screen); 24] = [
    (Screen::Splash, Screen::MainMenu),
    (Screen::MainMenu, Screen::NewGame),
    (Screen::NewGame, Screen::MainMenu),
    (Screen::NewGame, Screen::GamePlay),
    (Screen::MainMenu, Screen::LoadGame),
    (Screen::LoadGame, Screen::MainMenu),
    (Screen::LoadGame, Screen::GamePlay),
    (Screen::MainMenu, Screen::Options),
    (Screen::Options, Screen::MainMenu),
    (Screen::MainMenu, Screen::Credits),
    (Screen::Credits, Screen::MainMenu),
    (Screen::MainMenu, Screen::Extras),
    (Screen::Extras, Screen::MainMenu),
    (Screen::MainMenu, Screen::Quit),
    (Screen::GamePlay, Screen::MainMenu),
    (Screen::GamePlay, Screen::GamePlayMenu),
    (Screen::GamePlayMenu, Screen::GamePlay),
    (Screen::GamePlayMenu, Screen::SaveGame),
    (Screen::SaveGame, Screen::GamePlayMenu),
    (Screen::GamePlayMenu, Screen::LoadGame),
    (Screen::LoadGame, Screen::GamePlayMenu),
    (Screen::GamePlayMenu, Screen::Options),
    (Screen::Options, Screen::GamePlayMenu),
    (Screen::GamePlayMenu, Screen::MainMenu),
];

/// Mapping between [`Screen`]s and the state ids registered for them.
#[derive(Debug, Clone)]
pub struct ScreenGraph {
    ids: [StateId; 11],
    screens: HashMap<StateId, Screen>,
}

impl ScreenGraph {
    /// Register every screen in `machine` and wire [`SCREEN_TRANSITIONS`].
    ///
    /// `hooks` is called once per screen to create that screen's hooks.
    pub fn build<C, H, F>(
        machine: &mut StateMachine<C>,
        ids: &mut IdAllocator,
        mut hooks: F,
    ) -> Result<Self, FsmError>
    where
        H: StateHooks<C> + 'static,
        F: FnMut(Screen) -> H,
    {
        let state_ids = Screen::ALL.map(|screen| machine.add_state(ids, screen.name(), hooks(screen)));
        let graph = Self {
            ids: state_ids,
            screens: Screen::ALL
                .into_iter()
                .zip(state_ids)
                .map(|(screen, id)| (id, screen))
                .collect(),
        };

        for (source, target) in SCREEN_TRANSITIONS {
            machine.add_transition(ids, graph.state_id(source), graph.state_id(target), None)?;
        }
        tracing::debug!(
            screens = Screen::ALL.len(),
            transitions = SCREEN_TRANSITIONS.len(),
            "Screen graph wired"
        );
        Ok(graph)
    }

    /// State registered for `screen`.
    #[must_use]
    pub const fn state_id(&self, screen: Screen) -> StateId {
        self.ids[screen.slot()]
    }

    /// Screen registered under `id`, if any.
    #[must_use]
    pub fn screen(&self, id: StateId) -> Option<Screen> {
        self.screens.get(&id).copied()
    }
}
