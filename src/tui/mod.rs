//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Event Flow
//!
//! ```text
//! crossterm Event ─map_event()─▶ TuiEvent ─dispatch()─▶ Action ─update()─▶ Effect
//!                                                                            │
//!            Action::DiagramRendered ◀── mpsc ◀── tokio task ◀─ RenderDiagram┘
//! ```
//!
//! ## Redraw Strategy
//!
//! The loop sleeps up to 250ms waiting for input and only redraws after an
//! event, a terminal resize, or a finished diagram render.

mod component;
pub mod components;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::Duration;

use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
    PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::catalog::Catalog;
use crate::core::config::ResolvedConfig;
use crate::core::content::{ContentStore, Language};
use crate::core::quiz::QuizAttempt;
use crate::core::state::{App, Screen};
use crate::diagram::{
    DiagramRenderer, DiagramRequest, DiagramTheme, KrokiRenderer, OutlineRenderer, RenderError,
    RendererKind,
};
use crate::tui::component::EventHandler;
use crate::tui::components::{
    LibraryEvent, LibraryState, QuizEvent, QuizPanelState, SectionTextState, StudyAidsState,
};
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

/// Which reader pane receives scroll and cursor keys.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Focus {
    #[default]
    Text,
    Aids,
    Quiz,
}

impl Focus {
    pub fn next(self) -> Self {
        match self {
            Focus::Text => Focus::Aids,
            Focus::Aids => Focus::Quiz,
            Focus::Quiz => Focus::Text,
        }
    }
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    pub focus: Focus,
    pub text: SectionTextState,
    pub aids: StudyAidsState,
    pub quiz: QuizPanelState,
    pub library: LibraryState,
    // What the panes were last synced to
    section_id: String,
    language: Language,
}

impl TuiState {
    pub fn new(app: &App) -> Self {
        let mut state = Self {
            focus: Focus::default(),
            text: SectionTextState::default(),
            aids: StudyAidsState::default(),
            quiz: QuizPanelState::default(),
            library: LibraryState::new(&app.catalog),
            section_id: String::new(),
            language: app.language(),
        };
        state.sync(app);
        state
    }

    /// Reset pane scroll positions after the section or language changed,
    /// and lock the quiz pane once its attempt is submitted.
    pub fn sync(&mut self, app: &App) {
        self.quiz
            .lock(app.current_attempt().is_some_and(QuizAttempt::is_submitted));
        let section = app.current_section();
        if section.id == self.section_id && app.language() == self.language {
            return;
        }
        self.text.reset();
        self.aids.reset();
        self.quiz.sync(section);
        self.section_id = section.id.clone();
        self.language = app.language();
    }
}

/// Translate a terminal event into an action for the current screen.
///
/// Presentation-only events (scrolling, focus, tab switches) are handled
/// here against `tui` and produce no action.
pub fn dispatch(app: &App, tui: &mut TuiState, event: &TuiEvent) -> Option<Action> {
    if matches!(event, TuiEvent::ForceQuit) {
        return Some(Action::Quit);
    }
    match app.screen {
        Screen::Library => match event {
            TuiEvent::Escape | TuiEvent::InputChar('q') => Some(Action::Quit),
            _ => tui
                .library
                .handle_event(event)
                .map(|LibraryEvent::Open(path)| Action::OpenBook(path)),
        },
        Screen::Reader => match event {
            TuiEvent::Escape => Some(Action::CloseBook),
            TuiEvent::PreviousSection => Some(Action::PreviousSection),
            TuiEvent::NextSection => Some(Action::NextSection),
            TuiEvent::CycleFocus => {
                tui.focus = tui.focus.next();
                None
            }
            TuiEvent::InputChar(c) => match c {
                '1' | 'e' => Some(Action::SetLanguage(Language::En)),
                '2' | 'd' => Some(Action::SetLanguage(Language::De)),
                '3' | 'z' => Some(Action::SetLanguage(Language::Zh)),
                's' => Some(Action::SubmitQuiz),
                'v' => {
                    tui.aids.next_tab();
                    None
                }
                _ => None,
            },
            TuiEvent::Resize => None,
            _ => match tui.focus {
                Focus::Text => tui.text.handle_event(event).and(None),
                Focus::Aids => tui.aids.handle_event(event).and(None),
                Focus::Quiz => tui.quiz.handle_event(event).map(
                    |QuizEvent::Select {
                         question_id,
                         option,
                     }| Action::SelectAnswer {
                        question_id,
                        option,
                    },
                ),
            },
        },
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Report key releases so they can be filtered; ignored by terminals
        // without the protocol
        execute!(
            stdout(),
            EnableMouseCapture,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags, DisableMouseCapture);
    }
}

/// Build the diagram renderer selected by the resolved config.
pub fn build_renderer(config: &ResolvedConfig) -> Arc<dyn DiagramRenderer> {
    match config.renderer {
        RendererKind::Outline => Arc::new(OutlineRenderer::new()),
        RendererKind::Kroki => Arc::new(KrokiRenderer::new(
            config.kroki_url.clone(),
            config.diagram_dir.clone(),
            DiagramTheme::default(),
        )),
    }
}

pub fn run(config: ResolvedConfig, store: Arc<ContentStore>, catalog: Catalog) -> std::io::Result<()> {
    let renderer = build_renderer(&config);
    info!("Diagram renderer: {}", renderer.name());
    let mut app = App::from_config(store, catalog, &config);
    let mut tui = TuiState::new(&app);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    // Abort handle for the in-flight diagram render
    let mut active_render: Option<tokio::task::AbortHandle> = None;

    let mut needs_redraw = true; // Force first frame

    'event_loop: loop {
        tui.sync(&app);
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(Duration::from_millis(250));
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let Some(action) = dispatch(&app, &mut tui, &event) else {
                continue;
            };
            debug!("Dispatching {:?}", action);
            let effect = update(&mut app, action);
            if !handle_effect(effect, &config, &renderer, &mut active_render, &tx) {
                break 'event_loop;
            }
            tui.sync(&app);
        }

        // Handle background task actions (finished renders)
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let effect = update(&mut app, action);
            if !handle_effect(effect, &config, &renderer, &mut active_render, &tx) {
                break 'event_loop;
            }
        }
    }

    if let Some(handle) = active_render.take() {
        handle.abort();
    }
    ratatui::restore();
    Ok(())
}

/// Perform an effect. Returns `false` when the loop should stop.
fn handle_effect(
    effect: Effect,
    config: &ResolvedConfig,
    renderer: &Arc<dyn DiagramRenderer>,
    active_render: &mut Option<tokio::task::AbortHandle>,
    tx: &mpsc::Sender<Action>,
) -> bool {
    match effect {
        Effect::None => true,
        Effect::Quit => false,
        Effect::RenderDiagram(request) => {
            if let Some(previous) = active_render.take() {
                debug!("Aborting superseded diagram render");
                previous.abort();
            }
            *active_render = Some(spawn_render(
                Arc::clone(renderer),
                request,
                config.render_timeout,
                tx.clone(),
            ));
            true
        }
    }
}

/// Render a diagram on the runtime and post the result back as
/// `Action::DiagramRendered`.
fn spawn_render(
    renderer: Arc<dyn DiagramRenderer>,
    request: DiagramRequest,
    timeout: Duration,
    tx: mpsc::Sender<Action>,
) -> tokio::task::AbortHandle {
    let DiagramRequest { ticket, definition } = request;
    info!(
        "Spawning {} render for '{}' (generation {})",
        renderer.name(),
        ticket.section_id,
        ticket.generation
    );
    let handle = tokio::spawn(async move {
        let result = match tokio::time::timeout(timeout, renderer.render(&definition)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "Diagram render for '{}' timed out after {}s",
                    ticket.section_id,
                    timeout.as_secs()
                );
                Err(RenderError::TimedOut(timeout))
            }
        };
        if let Err(e) = &result {
            warn!("Diagram render for '{}' failed: {}", ticket.section_id, e);
        }
        if tx.send(Action::DiagramRendered { ticket, result }).is_err() {
            warn!("Failed to send diagram result: receiver dropped");
        }
    });
    handle.abort_handle()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::diagram::{DiagramArtifact, RenderTicket};
    use crate::test_support::{test_app, test_store};
    use async_trait::async_trait;

    fn reader() -> (App, TuiState) {
        let app = test_app();
        let tui = TuiState::new(&app);
        (app, tui)
    }

    fn press(app: &mut App, tui: &mut TuiState, event: TuiEvent) -> Effect {
        let effect = match dispatch(app, tui, &event) {
            Some(action) => update(app, action),
            None => Effect::None,
        };
        tui.sync(app);
        effect
    }

    #[test]
    fn test_ctrl_c_quits_on_both_screens() {
        let (app, mut tui) = reader();
        assert_eq!(dispatch(&app, &mut tui, &TuiEvent::ForceQuit), Some(Action::Quit));

        let library = App::new(Arc::new(test_store()), Catalog::default(), Language::En);
        let mut tui = TuiState::new(&library);
        assert_eq!(dispatch(&library, &mut tui, &TuiEvent::ForceQuit), Some(Action::Quit));
    }

    #[test]
    fn test_library_keys() {
        let app = App::new(
            Arc::new(test_store()),
            Catalog::embedded().unwrap(),
            Language::En,
        );
        let mut tui = TuiState::new(&app);
        assert_eq!(
            dispatch(&app, &mut tui, &TuiEvent::InputChar('q')),
            Some(Action::Quit)
        );
        assert_eq!(dispatch(&app, &mut tui, &TuiEvent::Escape), Some(Action::Quit));
        assert_eq!(
            dispatch(&app, &mut tui, &TuiEvent::Select),
            Some(Action::OpenBook("/read/kant-kritik".to_string()))
        );
    }

    #[test]
    fn test_reader_keys_map_to_actions() {
        let (app, mut tui) = reader();
        let cases = [
            (TuiEvent::PreviousSection, Action::PreviousSection),
            (TuiEvent::NextSection, Action::NextSection),
            (TuiEvent::InputChar('2'), Action::SetLanguage(Language::De)),
            (TuiEvent::InputChar('z'), Action::SetLanguage(Language::Zh)),
            (TuiEvent::InputChar('e'), Action::SetLanguage(Language::En)),
            (TuiEvent::InputChar('s'), Action::SubmitQuiz),
            (TuiEvent::Escape, Action::CloseBook),
        ];
        for (event, expected) in cases {
            assert_eq!(dispatch(&app, &mut tui, &event), Some(expected));
        }
    }

    #[test]
    fn test_tab_and_v_only_change_presentation() {
        let (app, mut tui) = reader();
        assert_eq!(dispatch(&app, &mut tui, &TuiEvent::CycleFocus), None);
        assert_eq!(tui.focus, Focus::Aids);
        assert_eq!(dispatch(&app, &mut tui, &TuiEvent::InputChar('v')), None);
        assert_eq!(tui.aids.tab, crate::tui::components::AidsTab::Vocabulary);
        dispatch(&app, &mut tui, &TuiEvent::CycleFocus);
        dispatch(&app, &mut tui, &TuiEvent::CycleFocus);
        assert_eq!(tui.focus, Focus::Text);
    }

    #[test]
    fn test_quiz_focus_selects_and_submits() {
        let (mut app, mut tui) = reader();
        tui.focus = Focus::Quiz;

        // dedication-1 is correct at option 2
        press(&mut app, &mut tui, TuiEvent::CursorDown);
        press(&mut app, &mut tui, TuiEvent::CursorDown);
        press(&mut app, &mut tui, TuiEvent::Select);
        assert_eq!(app.current_attempt().unwrap().answer("dedication-1"), Some(2));

        press(&mut app, &mut tui, TuiEvent::InputChar('s'));
        assert_eq!(app.score.xp(), 100);
        assert_eq!(app.status_message, "Quiz: 1/2 correct, +100 XP");
    }

    #[test]
    fn test_submitted_quiz_takes_no_selection() {
        let (mut app, mut tui) = reader();
        tui.focus = Focus::Quiz;
        press(&mut app, &mut tui, TuiEvent::Select);
        press(&mut app, &mut tui, TuiEvent::InputChar('s'));
        assert!(tui.quiz.is_locked());

        press(&mut app, &mut tui, TuiEvent::CursorDown);
        assert_eq!(dispatch(&app, &mut tui, &TuiEvent::Select), None);
        assert_eq!(app.status_message, "Quiz: 0/2 correct, +0 XP");

        // The next section's quiz is still open
        press(&mut app, &mut tui, TuiEvent::NextSection);
        assert!(!tui.quiz.is_locked());
        assert!(dispatch(&app, &mut tui, &TuiEvent::Select).is_some());
    }

    #[test]
    fn test_section_change_resets_quiz_cursor() {
        let (mut app, mut tui) = reader();
        tui.focus = Focus::Quiz;
        press(&mut app, &mut tui, TuiEvent::CursorDown);
        press(&mut app, &mut tui, TuiEvent::NextSection);
        assert_eq!(app.current_section().id, "preface");
        assert_eq!(
            dispatch(&app, &mut tui, &TuiEvent::Select),
            Some(Action::SelectAnswer {
                question_id: "preface-1".to_string(),
                option: 0
            })
        );
    }

    #[test]
    fn test_build_renderer_follows_config() {
        let mut config = crate::core::config::resolve_with_env(
            &Default::default(),
            &Default::default(),
            |_| None,
        );
        assert_eq!(build_renderer(&config).name(), "outline");
        config.renderer = RendererKind::Kroki;
        assert_eq!(build_renderer(&config).name(), "kroki");
    }

    struct SlowRenderer;

    #[async_trait]
    impl DiagramRenderer for SlowRenderer {
        fn name(&self) -> &str {
            "slow"
        }

        async fn render(&self, _definition: &str) -> Result<DiagramArtifact, RenderError> {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok(DiagramArtifact::Outline(Vec::new()))
        }
    }

    fn ticket() -> RenderTicket {
        RenderTicket {
            generation: 1,
            section_id: "dedication".to_string(),
        }
    }

    #[tokio::test]
    async fn test_spawn_render_posts_result() {
        let (tx, rx) = mpsc::channel();
        let request = DiagramRequest {
            ticket: ticket(),
            definition: "graph TB\n    A --> B".to_string(),
        };
        spawn_render(
            Arc::new(OutlineRenderer::new()),
            request,
            Duration::from_secs(5),
            tx,
        );
        let action = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .unwrap()
            .unwrap();
        match action {
            Action::DiagramRendered { ticket: t, result } => {
                assert_eq!(t, ticket());
                assert!(matches!(result, Ok(DiagramArtifact::Outline(_))));
            }
            other => panic!("unexpected action {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_spawn_render_times_out() {
        let (tx, rx) = mpsc::channel();
        let request = DiagramRequest {
            ticket: ticket(),
            definition: String::new(),
        };
        spawn_render(Arc::new(SlowRenderer), request, Duration::from_millis(20), tx);
        let action = tokio::task::spawn_blocking(move || rx.recv_timeout(Duration::from_secs(5)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(
            action,
            Action::DiagramRendered {
                ticket: ticket(),
                result: Err(RenderError::TimedOut(Duration::from_millis(20))),
            }
        );
    }
}
