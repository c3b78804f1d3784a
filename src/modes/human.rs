use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::time::Duration;
use tokio::time::interval;
use tracing::{info, warn};

use crate::game::{Action, Direction, GameConfig, GameEngine, GameError};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::{Renderer, Screen};

/// Real-time terminal play: keyboard in, ratatui out, one engine step per tick
pub struct HumanMode {
    engine: GameEngine,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    screen: Screen,
    tick_interval: Duration,
    should_quit: bool,
    pending_direction: Option<Direction>,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Result<Self> {
        let tick_interval = Duration::from_millis(1000 / u64::from(config.speed.max(1)));
        let engine = GameEngine::new(config).context("Failed to create game engine")?;

        Ok(Self {
            engine,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            screen: Screen::Start,
            tick_interval,
            should_quit: false,
            pending_direction: None,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        // Cleanup terminal
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // One engine step per tick, `speed` ticks per second
        let mut tick_timer = interval(self.tick_interval);

        // Render at 30 FPS (33ms per frame)
        let render_interval = Duration::from_millis(33);
        let mut render_timer = interval(render_interval);

        loop {
            tokio::select! {
                // Handle terminal events
                maybe_event = event_stream.next() => {
                    match maybe_event {
                        Some(Ok(event)) => self.handle_event(event),
                        Some(Err(err)) => warn!(error = %err, "failed to read terminal event"),
                        None => self.should_quit = true,
                    }
                }

                // Game logic tick
                _ = tick_timer.tick() => {
                    if self.screen == Screen::Playing {
                        self.update_game();
                    }
                }

                // Render frame
                _ = render_timer.tick() => {
                    self.metrics.update();
                    terminal.draw(|frame| {
                        self.renderer.render(frame, &self.engine, &self.metrics, self.screen);
                    }).context("Failed to draw frame")?;
                }

                // Handle Ctrl+C
                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        info!(
            games = self.metrics.games_played,
            best = self.metrics.high_score,
            "leaving interactive mode"
        );
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };

        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        let action = self.input_handler.handle_key_event(key);

        match (self.screen, action) {
            (_, KeyAction::Quit) => self.should_quit = true,
            (Screen::Start, _) => self.start_game(),
            (Screen::Playing, KeyAction::Steer(dir)) => self.pending_direction = Some(dir),
            (_, KeyAction::Restart) => self.reset_game(),
            _ => {}
        }
    }

    fn update_game(&mut self) {
        let action = self
            .pending_direction
            .take()
            .and_then(|dir| self.input_handler.steer(self.engine.direction(), dir))
            .unwrap_or(Action::Continue);

        match self.engine.step(action) {
            Ok(outcome) if outcome.game_over => {
                info!(
                    score = outcome.score,
                    cause = ?outcome.info.termination,
                    "game over"
                );
                self.finish_game();
            }
            Ok(_) => {}
            Err(GameError::BoardFull) => {
                info!(score = self.engine.score(), "board filled");
                self.finish_game();
            }
            Err(err) => {
                warn!(error = %err, "step failed");
                self.finish_game();
            }
        }
    }

    fn finish_game(&mut self) {
        self.metrics.on_game_over(self.engine.score());
        self.screen = Screen::GameOver;
    }

    fn start_game(&mut self) {
        self.screen = Screen::Playing;
        self.metrics.on_game_start();
        self.pending_direction = None;
    }

    fn reset_game(&mut self) {
        self.engine.reset();
        self.start_game();
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::Position;
    use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

    fn press(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mode() -> HumanMode {
        HumanMode::new(GameConfig::default().with_seed(3)).unwrap()
    }

    #[test]
    fn test_game_initialization() {
        let mode = mode();
        assert_eq!(mode.screen, Screen::Start);
        assert!(mode.engine.is_alive());
        assert_eq!(mode.engine.score(), 0);
        assert_eq!(mode.tick_interval, Duration::from_millis(50));
    }

    #[test]
    fn test_any_key_starts() {
        let mut mode = mode();
        mode.handle_event(press(KeyCode::Char(' ')));
        assert_eq!(mode.screen, Screen::Playing);
    }

    #[test]
    fn test_quit_from_start_screen() {
        let mut mode = mode();
        mode.handle_event(press(KeyCode::Esc));
        assert!(mode.should_quit);
        assert_eq!(mode.screen, Screen::Start);
    }

    #[test]
    fn test_steering_turns_snake() {
        let mut mode = mode();
        mode.start_game();

        mode.handle_event(press(KeyCode::Up));
        mode.update_game();

        assert_eq!(mode.engine.direction(), Direction::Up);
        assert_eq!(mode.engine.head(), Position::new(320, 220));
        assert_eq!(mode.pending_direction, None);
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut mode = mode();
        mode.start_game();

        mode.handle_event(press(KeyCode::Left));
        mode.update_game();

        assert_eq!(mode.engine.direction(), Direction::Right);
        assert_eq!(mode.engine.head(), Position::new(340, 240));
    }

    #[test]
    fn test_game_over_and_restart() {
        let mut mode = mode();
        mode.start_game();

        // Run straight into the right wall
        for _ in 0..20 {
            if mode.screen != Screen::Playing {
                break;
            }
            mode.update_game();
        }
        assert_eq!(mode.screen, Screen::GameOver);
        assert_eq!(mode.metrics.games_played, 1);

        mode.handle_event(press(KeyCode::Char('r')));
        assert_eq!(mode.screen, Screen::Playing);
        assert!(mode.engine.is_alive());
        assert_eq!(mode.engine.score(), 0);
    }
}
