//! Headless session runner.

use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};

use dsd6_core::error::GameError;
use dsd6_core::screens::Screen;
use dsd6_core::threats::{Threat, ThreatKind};
use thiserror::Error;

use crate::data_loader::{self, DataLoadError, GameData};
use crate::protocol::{
    CardState, Command, DeckState, DieKind, HealthState, Response, ShipState,
};
use crate::session::{GameContext, GameSession, SessionConfig};

/// Headless runner configuration.
#[derive(Debug, Clone, Default)]
pub struct HeadlessConfig {
    /// Directory holding the catalogue and ship files.
    pub data_dir: Option<PathBuf>,
    /// Catalogue file, overriding the one found in the data directory.
    pub catalogue: Option<PathBuf>,
    /// Ship file, overriding the one found in the data directory.
    pub ship: Option<PathBuf>,
    /// Ship to pick from the data directory, by file stem.
    pub ship_name: Option<String>,
    /// Shuffle reproducibly.
    pub reproducible: bool,
    /// Seed for the deck and dice.
    pub seed: Option<u64>,
}

impl HeadlessConfig {
    /// Load the data this configuration points at.
    ///
    /// Explicit files win; anything still missing comes from the data
    /// directory, or from [`data_loader::default_data_dir`] when none is set.
    pub fn load_data(&self) -> Result<GameData, RunnerError> {
        if let (Some(catalogue), Some(ship)) = (&self.catalogue, &self.ship) {
            return Ok(GameData {
                catalogue: data_loader::load_catalogue_file(catalogue)?,
                ship: data_loader::load_ship_file(ship)?,
            });
        }

        let dir = self
            .data_dir
            .clone()
            .or_else(data_loader::default_data_dir)
            .ok_or(RunnerError::NoDataDirectory)?;
        let mut data = data_loader::load_from_directory(&dir, self.ship_name.as_deref())?;
        if let Some(catalogue) = &self.catalogue {
            data.catalogue = data_loader::load_catalogue_file(catalogue)?;
        }
        if let Some(ship) = &self.ship {
            data.ship = data_loader::load_ship_file(ship)?;
        }
        Ok(data)
    }

    /// Randomness settings for the session.
    pub fn session_config(&self) -> SessionConfig {
        SessionConfig {
            reproducible: self.reproducible,
            seed: self.seed,
        }
    }
}

/// Errors that stop a runner from starting.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Data files could not be loaded.
    #[error(transparent)]
    Data(#[from] DataLoadError),

    /// The session could not be built.
    #[error(transparent)]
    Game(#[from] GameError),

    /// No data directory was given and none of the default locations exist.
    #[error("No data directory found; pass --data-dir or set {}", data_loader::DATA_DIR_ENV)]
    NoDataDirectory,
}

/// Drives a [`GameSession`] from protocol commands.
#[derive(Debug)]
pub struct HeadlessRunner {
    session: GameSession,
}

impl HeadlessRunner {
    /// Load data per `config` and enter the splash screen.
    pub fn new(config: &HeadlessConfig) -> Result<Self, RunnerError> {
        let data = config.load_data()?;
        Ok(Self::from_data(&data, config.session_config())?)
    }

    /// Build a runner from data already in memory and enter the splash screen.
    pub fn from_data(data: &GameData, config: SessionConfig) -> Result<Self, GameError> {
        let mut session = GameSession::new(data, config)?;
        session.start()?;
        tracing::info!(
            ship = %data.ship.name,
            cards = data.catalogue.card_count(),
            reproducible = config.reproducible,
            seed = ?config.seed,
            "Headless session ready"
        );
        Ok(Self { session })
    }

    /// The session being driven.
    pub fn session(&self) -> &GameSession {
        &self.session
    }

    /// Ready message for the current screen.
    pub fn ready(&self) -> Response {
        Response::ready(self.screen_name().unwrap_or_default())
    }

    /// Run one command. The flag is set when the session should end.
    pub fn handle(&mut self, cmd: Command) -> (Response, bool) {
        let cmd_name = cmd.name();
        let quit = matches!(cmd, Command::Quit);
        let response = self.dispatch(cmd).unwrap_or_else(|message| {
            tracing::warn!(cmd = cmd_name, %message, "Command rejected");
            Response::error(message, Some(cmd_name))
        });
        (response, quit)
    }

    /// Serve commands from `input` until `quit` or end of input.
    ///
    /// Writes the ready message first, then one response per non-empty line.
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, mut output: W) -> io::Result<()> {
        write_response(&mut output, &self.ready())?;

        for line in input.lines() {
            let line = line?;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }

            let (response, quit) = match Command::from_json(line) {
                Ok(cmd) => self.handle(cmd),
                Err(e) => (Response::error(format!("Parse error: {e}"), None), false),
            };
            write_response(&mut output, &response)?;
            if quit {
                tracing::info!("Quit requested");
                break;
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, cmd: Command) -> Result<Response, String> {
        let cmd_name = cmd.name();
        match cmd {
            Command::Query => Ok(self.state()),

            Command::Fire { target } => {
                let target = target
                    .map(|name| {
                        Screen::from_name(&name).ok_or_else(|| format!("Unknown screen '{name}'"))
                    })
                    .transpose()?;
                let previous = self.screen_name().unwrap_or_default().to_string();
                let entered = self.session.fire(target).map_err(|e| e.to_string())?;
                Ok(Response::Screen {
                    screen: entered.name().to_string(),
                    previous,
                })
            }

            Command::Draw => {
                let ctx = self.session.context_mut();
                let card = ctx
                    .deck
                    .draw_card()
                    .and_then(|id| ctx.deck.card(id))
                    .map(card_state);
                Ok(Response::Card { card })
            }

            Command::Discard { card } => {
                let deck = &mut self.session.context_mut().deck;
                deck.discard_card(card).map_err(|e| e.to_string())?;
                Ok(Response::ack(cmd_name))
            }

            Command::Destroy { card } => {
                let deck = &mut self.session.context_mut().deck;
                deck.destroy_card(card).map_err(|e| e.to_string())?;
                Ok(Response::ack(cmd_name))
            }

            Command::ResetDeck => {
                self.session.context_mut().deck.reset_deck();
                Ok(Response::ack(cmd_name))
            }

            Command::ReformDeck => {
                self.session.context_mut().deck.reform_deck();
                Ok(Response::ack(cmd_name))
            }

            Command::Shuffle { reproducible } => {
                self.session.context_mut().deck.shuffle_deck(reproducible);
                Ok(Response::ack(cmd_name))
            }

            Command::Roll { die } => {
                let ctx = self.session.context_mut();
                let die_ref = match die {
                    DieKind::Threat => &mut ctx.threat_die,
                    DieKind::Crew => &mut ctx.crew_die,
                };
                let value = die_ref.roll();
                Ok(Response::Roll {
                    die,
                    value,
                    face: die_ref.last_face().map(String::from),
                })
            }

            Command::CrewToInfirmary { amount } => {
                self.session.context_mut().ship.move_crew_to_infirmary(amount);
                Ok(Response::ack(cmd_name))
            }

            Command::CrewFromInfirmary { amount } => {
                self.session.context_mut().ship.move_crew_from_infirmary(amount);
                Ok(Response::ack(cmd_name))
            }

            Command::ClearInfirmary => {
                self.session.context_mut().ship.clear_infirmary();
                Ok(Response::ack(cmd_name))
            }

            Command::Save { path } => {
                self.session
                    .save(Path::new(&path))
                    .map_err(|e| e.to_string())?;
                Ok(Response::ack(cmd_name))
            }

            Command::Load { path } => {
                let saved = self
                    .session
                    .load(Path::new(&path))
                    .map_err(|e| e.to_string())?;
                tracing::info!(path = %path, screen = ?saved, "Game loaded");
                Ok(self.state())
            }

            Command::Quit => Ok(Response::ack(cmd_name)),
        }
    }

    fn screen_name(&self) -> Option<&'static str> {
        self.session.screen().map(Screen::name)
    }

    fn state(&self) -> Response {
        let ctx = self.session.context();
        Response::State {
            screen: self.screen_name().map(String::from),
            ship: ship_state(ctx),
            deck: deck_state(ctx),
        }
    }
}

fn write_response<W: Write>(output: &mut W, response: &Response) -> io::Result<()> {
    output.write_all(response.to_json_line().as_bytes())?;
    output.flush()
}

fn ship_state(ctx: &GameContext) -> ShipState {
    let ship = &ctx.ship;
    ShipState {
        name: ship.name().to_string(),
        complement: ship.complement(),
        available_crew: ship.available_crew(),
        infirmary: ship.infirmary_count(),
        shields: ship.shield_points(),
        max_shields: ship.full_shield_points(),
        hull: ship.hull_points(),
        max_hull: ship.full_hull_points(),
        threats_detected: ship.threats_detected(),
        destroyed: ship.is_destroyed(),
    }
}

fn deck_state(ctx: &GameContext) -> DeckState {
    let deck = &ctx.deck;
    DeckState {
        total: deck.len(),
        available: deck.available_cards().to_vec(),
        discarded: deck.discarded_cards().to_vec(),
        destroyed: deck.destroyed_cards().to_vec(),
        reproducible: deck.rng().is_reproducible(),
        seed: deck.rng().seed(),
    }
}

fn card_state(card: &Threat) -> CardState {
    let (kind, health) = match card.kind() {
        ThreatKind::Plain => ("threat", None),
        ThreatKind::External(health) => (
            "external",
            health.uses_health().then(|| HealthState {
                current: health.current(),
                max: health.starting(),
            }),
        ),
        ThreatKind::Internal => ("internal", None),
    };
    CardState {
        id: card.uid(),
        name: card.name().to_string(),
        kind: kind.to_string(),
        effect_text: card.effect_text().to_string(),
        activation: card.activation_list().to_vec(),
        health,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dsd6_test_utils::fixtures::{sample_catalogue, sample_ship_data, SAMPLE_CARD_COUNT};
    use std::io::Cursor;

    fn runner() -> HeadlessRunner {
        let data = GameData {
            catalogue: sample_catalogue(),
            ship: sample_ship_data(),
        };
        HeadlessRunner::from_data(
            &data,
            SessionConfig {
                reproducible: true,
                seed: Some(3),
            },
        )
        .unwrap()
    }

    fn send(runner: &mut HeadlessRunner, json: &str) -> Response {
        runner.handle(Command::from_json(json).unwrap()).0
    }

    fn play(runner: &mut HeadlessRunner) {
        send(runner, r#"{"cmd":"fire"}"#);
        send(runner, r#"{"cmd":"fire","target":"new_game_screen"}"#);
        send(runner, r#"{"cmd":"fire","target":"game_play_screen"}"#);
    }

    #[test]
    fn test_fire_reports_screens() {
        let mut runner = runner();
        let response = send(&mut runner, r#"{"cmd":"fire"}"#);
        assert_eq!(
            response,
            Response::Screen {
                screen: "main_menu_screen".to_string(),
                previous: "splash_screen".to_string(),
            }
        );
    }

    #[test]
    fn test_fire_unknown_screen() {
        let mut runner = runner();
        let response = send(&mut runner, r#"{"cmd":"fire","target":"bridge_screen"}"#);
        assert!(matches!(response, Response::Error { .. }));
    }

    #[test]
    fn test_draw_until_empty() {
        let mut runner = runner();
        play(&mut runner);
        for _ in 0..SAMPLE_CARD_COUNT {
            let response = send(&mut runner, r#"{"cmd":"draw"}"#);
            assert!(matches!(response, Response::Card { card: Some(_) }));
        }
        let response = send(&mut runner, r#"{"cmd":"draw"}"#);
        assert_eq!(response, Response::Card { card: None });
    }

    #[test]
    fn test_destroyed_card_stays_destroyed() {
        let mut runner = runner();
        play(&mut runner);
        let Response::Card { card: Some(card) } = send(&mut runner, r#"{"cmd":"draw"}"#) else {
            panic!("expected a card");
        };
        let destroy = format!(r#"{{"cmd":"destroy","card":{}}}"#, card.id);
        let discard = format!(r#"{{"cmd":"discard","card":{}}}"#, card.id);

        assert_eq!(send(&mut runner, &destroy), Response::ack("destroy"));
        assert_eq!(send(&mut runner, &discard), Response::ack("discard"));
        let Response::State { deck, .. } = send(&mut runner, r#"{"cmd":"query"}"#) else {
            panic!("expected state");
        };
        assert_eq!(deck.destroyed, vec![card.id]);
        assert!(deck.discarded.is_empty());
    }

    #[test]
    fn test_unknown_card_is_rejected() {
        let mut runner = runner();
        let response = send(&mut runner, r#"{"cmd":"discard","card":42}"#);
        assert!(matches!(
            response,
            Response::Error { cmd: Some(ref cmd), .. } if cmd == "discard"
        ));
    }

    #[test]
    fn test_crew_commands_update_state() {
        let mut runner = runner();
        send(&mut runner, r#"{"cmd":"crew_to_infirmary","amount":4}"#);
        send(&mut runner, r#"{"cmd":"crew_from_infirmary","amount":1}"#);
        let Response::State { ship, .. } = send(&mut runner, r#"{"cmd":"query"}"#) else {
            panic!("expected state");
        };
        assert_eq!(ship.infirmary, 3);
        assert_eq!(ship.available_crew, 3);

        send(&mut runner, r#"{"cmd":"clear_infirmary"}"#);
        let Response::State { ship, .. } = send(&mut runner, r#"{"cmd":"query"}"#) else {
            panic!("expected state");
        };
        assert_eq!(ship.infirmary, 0);
    }

    #[test]
    fn test_roll_has_face() {
        let mut runner = runner();
        let Response::Roll { value, face, .. } = send(&mut runner, r#"{"cmd":"roll","die":"crew"}"#)
        else {
            panic!("expected roll");
        };
        assert!((1..=6).contains(&value));
        assert!(face.is_some());
    }

    #[test]
    fn test_run_session() {
        let mut runner = runner();
        let input = [
            r#"{"cmd":"fire"}"#,
            "",
            "not json",
            r#"{"cmd":"query"}"#,
            r#"{"cmd":"quit"}"#,
            r#"{"cmd":"draw"}"#,
        ]
        .join("\n");
        let mut output = Vec::new();
        runner.run(Cursor::new(input), &mut output).unwrap();

        let lines: Vec<Response> = String::from_utf8(output)
            .unwrap()
            .lines()
            .map(|line| serde_json::from_str(line).unwrap())
            .collect();
        assert_eq!(lines.len(), 5);
        assert_eq!(lines[0], Response::ready("splash_screen"));
        assert!(matches!(lines[1], Response::Screen { .. }));
        assert!(matches!(lines[2], Response::Error { cmd: None, .. }));
        assert!(matches!(
            lines[3],
            Response::State { screen: Some(ref s), .. } if s == "main_menu_screen"
        ));
        assert_eq!(lines[4], Response::ack("quit"));
    }

    #[test]
    fn test_explicit_files_skip_directory() {
        let dir = tempfile::tempdir().unwrap();
        let catalogue = dir.path().join("cards.json");
        let ship = dir.path().join("ship.ron");
        std::fs::write(&catalogue, dsd6_test_utils::fixtures::SAMPLE_CATALOGUE_JSON).unwrap();
        std::fs::write(&ship, dsd6_test_utils::fixtures::SAMPLE_SHIP_RON).unwrap();

        let config = HeadlessConfig {
            catalogue: Some(catalogue),
            ship: Some(ship),
            ..HeadlessConfig::default()
        };
        let data = config.load_data().unwrap();
        assert_eq!(data.catalogue.card_count(), SAMPLE_CARD_COUNT);
    }
}
