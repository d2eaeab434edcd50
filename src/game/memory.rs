//! The memory game orchestrator.
//!
//! `MemoryGame` owns the renderer, the scene graph and two pointer routers:
//! one for the board (cards, and the board itself as a dismissal target) and
//! one for the side-panel buttons. The host feeds it [`InputEvent`]s and
//! calls [`MemoryGame::frame`] once per tick, passing the current time in
//! milliseconds.
//!
//! ## Turn flow
//!
//! 1. First card clicked: it turns face up and stops being clickable.
//! 2. Second card clicked: it turns face up, the board becomes clickable.
//!    A matching pair scores a point for the active player; a mismatch hands
//!    the turn to the next player.
//! 3. Board clicked: a mismatch is turned face down again, a pair is
//!    removed from the board.
//!
//! Finding the last pair stops the clock and offers the time to the record
//! file.
//!
//! ## Errors
//!
//! Resource failures (missing images, text that cannot be rendered) are
//! logged and leave gaps on screen. An [`GameError::Invariant`] raised while
//! handling a click is logged and sets the quit flag.

use log::{debug, error, info, warn};
use std::rc::Rc;

use super::error::{GameError, GameResult};
use super::layout::{layout_cards, pair_capacity};
use super::menu::{build_menu, ButtonAction, Menu, MenuButton};
use super::records::HighScores;
use super::state::{GameMessage, MatchState};
use super::timer::{format_clock, MatchTimer};
use crate::cards::{pick_faces, CardFace, CardState};
use crate::core::{Color, ConfigError, GameRng, MemoryConfig, Point, Rect, Size};
use crate::input::{InputEvent, Key, PointerRouter};
use crate::render::{FontId, Renderer, TextureId};
use crate::scene::{ClickCallback, NodeId, RemovePolicy, SceneGraph, SceneResult, ScoreTrack};

const TEXT_COLOR: Color = Color::WHITE;
const HOVER_COLOR: Color = Color::WHITE;
const SELECTED_COLOR: Color = Color::GOLD;

fn main_menu_buttons() -> Vec<MenuButton> {
    vec![
        MenuButton::new("button_one_player", "1 player", 0.1, ButtonAction::OnePlayer),
        MenuButton::new("button_two_players", "2 players", 0.2, ButtonAction::TwoPlayers),
        MenuButton::new("button_inc_pairs", "+", 0.6, ButtonAction::IncPairs),
        MenuButton::new("button_dec_pairs", "-", 0.6, ButtonAction::DecPairs),
        MenuButton::new("button_inc_pairs_10", "+10", 0.7, ButtonAction::IncPairs10),
        MenuButton::new("button_dec_pairs_10", "-10", 0.7, ButtonAction::DecPairs10),
        MenuButton::new("button_start", "Start", 0.8, ButtonAction::Start),
        MenuButton::new("button_quit", "Quit", 0.9, ButtonAction::Quit),
    ]
}

fn game_menu_buttons() -> Vec<MenuButton> {
    vec![
        MenuButton::new("button_menu", "Menu", 0.8, ButtonAction::NewGame),
        MenuButton::new("button_quit", "Quit", 0.9, ButtonAction::Quit),
    ]
}

fn pairs_label(pairs: u8) -> String {
    format!("{} pairs", pairs)
}

fn best_label(ms: u32) -> String {
    format!("Best {}", format_clock(u64::from(ms)))
}

/// Textures and font loaded once per session.
#[derive(Clone, Copy, Debug, Default)]
struct Assets {
    sprite_sheet: Option<TextureId>,
    back: Option<TextureId>,
    font: Option<FontId>,
}

impl Assets {
    fn load<R: Renderer>(renderer: &mut R, graph: &mut SceneGraph<GameMessage>, config: &MemoryConfig) -> Self {
        let font = config.font.as_ref().and_then(|f| match renderer.load_font(&f.path, f.size) {
            Ok(font) => {
                renderer.set_default_font(font);
                Some(font)
            }
            Err(e) => {
                error!("[Memory] Font unavailable, using the default: {}", e);
                None
            }
        });

        let sprite_sheet = match renderer.load_image(&config.sprite_sheet) {
            Ok(sheet) => {
                graph.textures_mut().share(sheet);
                Some(sheet)
            }
            Err(e) => {
                error!("[Memory] Cards will have no faces: {}", e);
                None
            }
        };

        let back_cell = CardFace::back().sprite_cell(config.card_size);
        let back = sprite_sheet.and_then(|sheet| match renderer.crop_texture(sheet, back_cell) {
            Ok(back) => {
                graph.textures_mut().share(back);
                Some(back)
            }
            Err(e) => {
                error!("[Memory] Cards will have no back: {}", e);
                None
            }
        });

        Self { sprite_sheet, back, font }
    }
}

/// Side panel shown while a match runs.
#[derive(Clone, Debug)]
struct GameMenu {
    menu: Menu,
    players: Vec<NodeId>,
    timer: Option<NodeId>,
    best: Option<NodeId>,
}

/// A memory match: menus, board, players, clock and records.
pub struct MemoryGame<R: Renderer> {
    renderer: R,
    graph: SceneGraph<GameMessage>,
    config: MemoryConfig,
    deal_rng: GameRng,
    layout_rng: GameRng,
    card_router: PointerRouter,
    button_router: PointerRouter,
    records: HighScores,
    assets: Assets,
    board: NodeId,
    main_menu: Menu,
    pairs_text: NodeId,
    game_menu: Option<GameMenu>,
    state: MatchState,
    players: u8,
    pairs: u8,
    pair_limit: u8,
    pairs_found: u8,
    cards: Vec<NodeId>,
    revealed: (Option<NodeId>, Option<NodeId>),
    timer: MatchTimer,
    pointer: Point,
    quit: bool,
}

impl<R: Renderer> MemoryGame<R> {
    /// Load assets and records and build the board and main menu.
    pub fn new(mut renderer: R, config: MemoryConfig) -> GameResult<Self> {
        config.validate()?;

        let rng = config.seed.map_or_else(GameRng::from_entropy, GameRng::new);
        info!("[Memory] Session seed {}", rng.seed());

        let records = HighScores::load(&config.save_path, config.min_pairs, config.max_pairs).unwrap_or_else(|e| {
            warn!("[Memory] Ignoring unreadable record file: {}", e);
            HighScores::new(&config.save_path, config.min_pairs, config.max_pairs)
        });

        let viewport = renderer.viewport();
        let mut graph = SceneGraph::new(viewport);
        let assets = Assets::load(&mut renderer, &mut graph, &config);
        let root = graph.root();

        let board_width = (viewport.w as f32 * config.board_width_ratio) as i32;
        let board_rect = Rect::new(0, 0, board_width, viewport.h);
        let board = match renderer.load_image(&config.background) {
            Ok(background) => graph.create_image("board", board_rect, background),
            Err(e) => {
                error!("[Memory] Board has no background: {}", e);
                graph.create_node("board", board_rect)
            }
        };
        graph.add_child(root, board)?;
        graph.set_on_click(board, |_, _| GameMessage::Board)?;
        graph.set_clickable(board, false)?;

        let mut card_router = PointerRouter::new("CardRouter").with_action_area(board_rect);
        // The board is checked before any card.
        card_router.add_subscriber(board);

        let panel = Rect::new(board_width, 0, viewport.w - board_width, viewport.h);
        let main_menu = build_menu(
            &mut graph,
            &mut renderer,
            "main_menu",
            panel,
            &main_menu_buttons(),
            TEXT_COLOR,
            assets.font,
        )?;
        graph.add_child(root, main_menu.panel)?;
        spread_pair_buttons(&mut graph, &main_menu)?;

        let capacity = pair_capacity(config.card_size, board_rect.size());
        let pair_limit = u8::try_from(capacity)
            .unwrap_or(u8::MAX)
            .clamp(config.min_pairs, config.max_pairs);
        if pair_limit < config.max_pairs {
            info!("[Memory] Board fits at most {} pair(s)", pair_limit);
        }
        let pairs = config.initial_pairs.min(pair_limit);
        if pairs < config.initial_pairs {
            warn!(
                "[Memory] Initial pair count {} lowered to {}",
                config.initial_pairs, pairs
            );
        }
        let pairs_text = graph.create_text(
            &mut renderer,
            "textfield_pairs",
            0,
            0,
            &pairs_label(pairs),
            TEXT_COLOR,
            assets.font,
        );
        place_in_panel(&mut graph, main_menu.panel, pairs_text, 0.5)?;

        let mut button_router = PointerRouter::new("ButtonRouter")
            .with_action_area(panel)
            .with_highlight(HOVER_COLOR);
        for button in main_menu.button_ids() {
            button_router.add_subscriber(button);
        }

        let mut game = Self {
            renderer,
            graph,
            deal_rng: rng.for_context("deal"),
            layout_rng: rng.for_context("layout"),
            card_router,
            button_router,
            records,
            assets,
            board,
            main_menu,
            pairs_text,
            game_menu: None,
            state: MatchState::Menu,
            players: config.players,
            pairs,
            pair_limit,
            pairs_found: 0,
            cards: Vec::new(),
            revealed: (None, None),
            timer: MatchTimer::new(config.timer_interval_ms),
            pointer: Point::ZERO,
            quit: false,
            config,
        };
        game.refresh_pair_buttons()?;
        info!("[Memory] Ready, {} pair(s), {} player(s)", game.pairs, game.players);
        Ok(game)
    }

    /// Free every texture and hand the renderer back.
    pub fn shutdown(mut self) -> R {
        self.card_router.clear_subscribers();
        self.button_router.clear_subscribers();
        self.graph.clear(&mut self.renderer);
        info!("[Memory] Shut down");
        self.renderer
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    #[must_use]
    pub fn state(&self) -> MatchState {
        self.state
    }

    #[must_use]
    pub fn players(&self) -> u8 {
        self.players
    }

    #[must_use]
    pub fn pairs(&self) -> u8 {
        self.pairs
    }

    /// Largest pair count the menu offers: the configured maximum, lowered
    /// to what the board can hold.
    #[must_use]
    pub fn pair_limit(&self) -> u8 {
        self.pair_limit
    }

    #[must_use]
    pub fn pairs_found(&self) -> u8 {
        self.pairs_found
    }

    /// Cards still on the board.
    #[must_use]
    pub fn cards(&self) -> &[NodeId] {
        &self.cards
    }

    /// Face-up cards of the current turn.
    #[must_use]
    pub fn revealed(&self) -> (Option<NodeId>, Option<NodeId>) {
        self.revealed
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.quit
    }

    #[must_use]
    pub fn config(&self) -> &MemoryConfig {
        &self.config
    }

    #[must_use]
    pub fn graph(&self) -> &SceneGraph<GameMessage> {
        &self.graph
    }

    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    #[must_use]
    pub fn records(&self) -> &HighScores {
        &self.records
    }

    #[must_use]
    pub fn card_router(&self) -> &PointerRouter {
        &self.card_router
    }

    #[must_use]
    pub fn button_router(&self) -> &PointerRouter {
        &self.button_router
    }

    #[must_use]
    pub fn board(&self) -> NodeId {
        self.board
    }

    #[must_use]
    pub fn main_menu(&self) -> &Menu {
        &self.main_menu
    }

    #[must_use]
    pub fn pairs_text(&self) -> NodeId {
        self.pairs_text
    }

    /// Panel of the running match, if any.
    #[must_use]
    pub fn game_menu(&self) -> Option<&Menu> {
        self.game_menu.as_ref().map(|m| &m.menu)
    }

    /// Score nodes, first player first.
    #[must_use]
    pub fn player_nodes(&self) -> &[NodeId] {
        self.game_menu.as_ref().map_or(&[], |m| m.players.as_slice())
    }

    #[must_use]
    pub fn timer_node(&self) -> Option<NodeId> {
        self.game_menu.as_ref().and_then(|m| m.timer)
    }

    #[must_use]
    pub fn best_time_node(&self) -> Option<NodeId> {
        self.game_menu.as_ref().and_then(|m| m.best)
    }

    /// Button bound to `action`, looked up in the game menu first.
    #[must_use]
    pub fn button(&self, action: ButtonAction) -> Option<NodeId> {
        self.game_menu
            .as_ref()
            .and_then(|m| m.menu.button(action))
            .or_else(|| self.main_menu.button(action))
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// Handle one input event at time `now`.
    pub fn handle_event(&mut self, event: InputEvent, now: u64) {
        match event {
            InputEvent::PointerMoved(pointer) => {
                self.pointer = pointer;
                self.update_hover();
            }
            InputEvent::PointerClicked => {
                self.click(now);
            }
            InputEvent::Key(Key::Escape) | InputEvent::Quit => {
                info!("[Memory] Quit requested");
                self.quit = true;
            }
            InputEvent::Key(Key::Space) => self.toggle_main_menu(),
            InputEvent::Key(Key::Other) => {}
        }
    }

    fn update_hover(&mut self) {
        self.card_router.motion(&self.graph, self.pointer, &mut self.renderer);
        self.button_router.motion(&self.graph, self.pointer, &mut self.renderer);
    }

    /// Route a click: board first, then buttons. Returns the handled message.
    pub fn click(&mut self, now: u64) -> Option<GameMessage> {
        let message = self
            .card_router
            .click(&self.graph)
            .into_message()
            .or_else(|| self.button_router.click(&self.graph).into_message())?;
        self.dispatch(message, now);
        // Clickability may have changed under the pointer.
        self.update_hover();
        Some(message)
    }

    fn dispatch(&mut self, message: GameMessage, now: u64) {
        if let Err(e) = self.handle_message(message, now) {
            error!("[Memory] {:?} failed: {}", message, e);
            if e.is_invariant() {
                self.quit = true;
            }
        }
    }

    /// Apply a click message to the state machine.
    pub fn handle_message(&mut self, message: GameMessage, now: u64) -> GameResult<()> {
        match (message, self.state) {
            (GameMessage::Button(action), _) => self.press(action, now),
            (GameMessage::Card(card), MatchState::NoReveal) => self.reveal_first(card),
            (GameMessage::Card(card), MatchState::OneRevealed) => self.reveal_second(card, now),
            (_, MatchState::TwoRevealedMismatch) => self.hide_pair(),
            (_, MatchState::PairFound) => self.discard_pair(),
            (message, state) => {
                debug!("[Memory] {:?} ignored in state {}", message, state);
                Ok(())
            }
        }
    }

    fn press(&mut self, action: ButtonAction, now: u64) -> GameResult<()> {
        debug!("[Memory] Button {:?}", action);
        match action {
            ButtonAction::OnePlayer => self.set_players(1),
            ButtonAction::TwoPlayers => self.set_players(2),
            ButtonAction::IncPairs | ButtonAction::DecPairs | ButtonAction::IncPairs10 | ButtonAction::DecPairs10 => {
                self.change_pairs(action.pair_offset().unwrap_or(0)).map(|_| ())
            }
            ButtonAction::Start => self.start(now),
            ButtonAction::NewGame => {
                self.new_game();
                Ok(())
            }
            ButtonAction::Quit => {
                self.quit = true;
                Ok(())
            }
        }
    }

    /// Show or hide the main menu.
    pub fn toggle_main_menu(&mut self) {
        let panel = self.main_menu.panel;
        let visible = self.graph.node(panel).is_some_and(|n| n.visible_flag());
        if let Err(e) = self.graph.set_visible(panel, !visible) {
            error!("[Memory] Cannot toggle the main menu: {}", e);
        }
    }

    // =========================================================================
    // Menu settings
    // =========================================================================

    /// Choose the player count for the next match.
    ///
    /// Only allowed in the main menu state; the main menu can be shown over
    /// a running match but its settings are locked until the match ends.
    pub fn set_players(&mut self, players: u8) -> GameResult<()> {
        self.expect_state(MatchState::Menu)?;
        if !(1..=2).contains(&players) {
            return Err(ConfigError::PlayerCount(players).into());
        }
        self.players = players;
        info!("[Memory] Players set to {}", players);
        Ok(())
    }

    /// Change the pair count by `offset`, clamped to
    /// `min_pairs..=pair_limit()`. Returns the new count.
    ///
    /// Locked outside the main menu state, like [`Self::set_players`].
    pub fn change_pairs(&mut self, offset: i32) -> GameResult<u8> {
        self.expect_state(MatchState::Menu)?;
        let min = i32::from(self.config.min_pairs);
        let max = i32::from(self.pair_limit);
        let pairs = (i32::from(self.pairs) + offset).clamp(min, max);
        self.pairs = u8::try_from(pairs).map_err(|_| GameError::Invariant(format!("pair count {}", pairs)))?;

        if let Err(e) = self.graph.set_text(&mut self.renderer, self.pairs_text, &pairs_label(self.pairs)) {
            error!("[Memory] Pair count not redrawn: {}", e);
        }
        self.graph.center_x(self.pairs_text)?;
        self.refresh_pair_buttons()?;
        info!("[Memory] Pairs set to {}", self.pairs);
        Ok(self.pairs)
    }

    fn refresh_pair_buttons(&mut self) -> SceneResult<()> {
        let can_grow = self.pairs < self.pair_limit;
        let can_shrink = self.pairs > self.config.min_pairs;
        for &(button, action) in &self.main_menu.buttons {
            let visible = match action {
                ButtonAction::IncPairs | ButtonAction::IncPairs10 => can_grow,
                ButtonAction::DecPairs | ButtonAction::DecPairs10 => can_shrink,
                _ => continue,
            };
            self.graph.set_visible(button, visible)?;
        }
        Ok(())
    }

    // =========================================================================
    // State transitions
    // =========================================================================

    fn expect_state(&self, expected: MatchState) -> GameResult<()> {
        if self.state != expected {
            return Err(GameError::WrongState {
                expected,
                actual: self.state,
            });
        }
        Ok(())
    }

    fn expect_card(&self, card: NodeId) -> GameResult<()> {
        if !self.cards.contains(&card) {
            return Err(GameError::NotACard(card));
        }
        Ok(())
    }

    fn card_key(&self, card: NodeId) -> GameResult<u32> {
        self.graph
            .card(card)
            .map(CardState::key)
            .ok_or(GameError::NotACard(card))
    }

    fn board_size(&self) -> Size {
        self.graph.node(self.board).map_or(Size::default(), |n| n.rect().size())
    }

    /// Deal a match with the current settings.
    ///
    /// Every card spot is chosen before anything is built, so a board too
    /// small for the pair count leaves the main menu untouched.
    pub fn start(&mut self, now: u64) -> GameResult<()> {
        self.expect_state(MatchState::Menu)?;

        let faces = pick_faces(&mut self.deal_rng, usize::from(self.pairs))?;
        let board = self.board_size();
        let spots = layout_cards(
            &mut self.layout_rng,
            self.config.card_size,
            board,
            faces.len() * 2,
            self.config.max_placement_attempts,
        )?;

        if let Err(e) = self.build_match(&faces, &spots) {
            self.teardown();
            return Err(e);
        }

        self.timer.start(now);
        self.graph.set_visible(self.main_menu.panel, false)?;
        self.state = MatchState::NoReveal;
        info!("[Memory] Match started: {} pair(s), {} player(s)", self.pairs, self.players);
        Ok(())
    }

    fn build_match(&mut self, faces: &[CardFace], spots: &[Rect]) -> GameResult<()> {
        self.build_game_menu()?;

        let on_click: ClickCallback<GameMessage> = Rc::new(|id, _| GameMessage::Card(id));
        let halves = faces.iter().flat_map(|&face| [(face, 1), (face, 2)]);
        for ((face, half), &spot) in halves.zip(spots) {
            let card = self.create_card(face, half, spot)?;
            self.graph.set_shared_on_click(card, Rc::clone(&on_click))?;
        }

        let first = self
            .player_nodes()
            .first()
            .copied()
            .ok_or_else(|| GameError::Invariant("match has no players".into()))?;
        self.graph.set_active(first, true)?;
        Ok(())
    }

    fn build_game_menu(&mut self) -> GameResult<()> {
        let panel = self.graph.node(self.main_menu.panel).map_or(Rect::EMPTY, |n| n.rect());
        let menu = build_menu(
            &mut self.graph,
            &mut self.renderer,
            "game_menu",
            panel,
            &game_menu_buttons(),
            TEXT_COLOR,
            self.assets.font,
        )?;
        let panel_id = menu.panel;
        for button in menu.button_ids() {
            self.button_router.add_subscriber(button);
        }
        self.game_menu = Some(GameMenu {
            menu,
            players: Vec::new(),
            timer: None,
            best: None,
        });
        let root = self.graph.root();
        self.graph.add_child(root, panel_id)?;

        for n in 1..=self.players {
            let track = ScoreTrack::new(format!("Player {}", n), TEXT_COLOR, self.assets.font);
            let player = self
                .graph
                .create_score(&mut self.renderer, format!("player{}", n), 0, 0, track);
            if let Some(menu) = self.game_menu.as_mut() {
                menu.players.push(player);
            }
            place_in_panel(&mut self.graph, panel_id, player, 0.1 * f32::from(n))?;
        }

        let timer = self
            .graph
            .create_text(&mut self.renderer, "timer", 0, 0, &format_clock(0), TEXT_COLOR, self.assets.font);
        if let Some(menu) = self.game_menu.as_mut() {
            menu.timer = Some(timer);
        }
        place_in_panel(&mut self.graph, panel_id, timer, 0.6)?;

        if let Some(best) = self.records.best(self.pairs) {
            self.show_best(best)?;
        }
        Ok(())
    }

    fn create_card(&mut self, face: CardFace, half: u8, spot: Rect) -> GameResult<NodeId> {
        let cell = face.sprite_cell(self.config.card_size);
        let front = self.assets.sprite_sheet.and_then(|sheet| match self.renderer.crop_texture(sheet, cell) {
            Ok(front) => Some(front),
            Err(e) => {
                error!("[Memory] No face for {}: {}", face, e);
                None
            }
        });

        let state = CardState::new(face, front, self.assets.back);
        let card = self.graph.create_card(format!("{}_{}", face.name(), half), spot, state);
        self.cards.push(card);
        self.graph.add_child(self.board, card)?;
        self.card_router.add_subscriber(card);
        Ok(card)
    }

    fn show_best(&mut self, ms: u32) -> SceneResult<()> {
        let Some(menu) = self.game_menu.as_ref() else {
            return Ok(());
        };
        let (panel, existing) = (menu.menu.panel, menu.best);
        match existing {
            Some(best) => {
                self.graph.set_text(&mut self.renderer, best, &best_label(ms))?;
                self.graph.center_x(best)
            }
            None => {
                let best =
                    self.graph
                        .create_text(&mut self.renderer, "best_time", 0, 0, &best_label(ms), TEXT_COLOR, self.assets.font);
                if let Some(menu) = self.game_menu.as_mut() {
                    menu.best = Some(best);
                }
                place_in_panel(&mut self.graph, panel, best, 0.7)
            }
        }
    }

    /// Turn the first card of a turn face up.
    pub fn reveal_first(&mut self, card: NodeId) -> GameResult<()> {
        self.expect_state(MatchState::NoReveal)?;
        self.expect_card(card)?;

        self.graph.set_card_revealed(card, true)?;
        self.graph.set_clickable(card, false)?;
        self.revealed = (Some(card), None);
        self.state = MatchState::OneRevealed;
        debug!("[Memory] First card {}", self.graph.name(card));
        Ok(())
    }

    /// Turn the second card face up and settle the turn.
    pub fn reveal_second(&mut self, card: NodeId, now: u64) -> GameResult<()> {
        self.expect_state(MatchState::OneRevealed)?;
        self.expect_card(card)?;
        let first = self
            .revealed
            .0
            .ok_or_else(|| GameError::Invariant("one card revealed but none remembered".into()))?;
        if first == card {
            return Err(GameError::AlreadyRevealed(card));
        }

        self.graph.set_card_revealed(card, true)?;
        self.graph.set_clickable(first, true)?;
        self.revealed.1 = Some(card);
        self.graph.set_clickable(self.board, true)?;

        if self.card_key(first)? == self.card_key(card)? {
            let player = self.active_player()?;
            let score = self.graph.inc_score(&mut self.renderer, player)?;
            self.pairs_found += 1;
            info!(
                "[Memory] Pair found by {} ({} point(s)), {}/{}",
                self.graph.name(player),
                score,
                self.pairs_found,
                self.pairs
            );
            if self.pairs_found >= self.pairs {
                self.finish(now);
            }
            self.state = MatchState::PairFound;
        } else {
            let player = self.active_player()?;
            let next = self.next_player()?;
            self.graph.set_active(player, false)?;
            self.graph.set_active(next, true)?;
            self.state = MatchState::TwoRevealedMismatch;
        }
        Ok(())
    }

    fn finish(&mut self, now: u64) {
        let elapsed = self.timer.elapsed(now);
        self.show_time(elapsed);
        info!("[Memory] All pairs found in {}", format_clock(elapsed));

        let elapsed_ms = u32::try_from(elapsed).unwrap_or(u32::MAX);
        match self.records.submit(self.pairs, elapsed_ms) {
            Ok(true) => {
                if let Err(e) = self.show_best(elapsed_ms) {
                    error!("[Memory] New record not shown: {}", e);
                }
            }
            Ok(false) => {}
            Err(e) => error!("[Memory] Record not saved: {}", e),
        }
    }

    fn revealed_pair(&self) -> GameResult<(NodeId, NodeId)> {
        match self.revealed {
            (Some(first), Some(second)) => Ok((first, second)),
            _ => Err(GameError::Invariant(format!("state {} without two revealed cards", self.state))),
        }
    }

    /// Turn a mismatched pair face down again.
    pub fn hide_pair(&mut self) -> GameResult<()> {
        self.expect_state(MatchState::TwoRevealedMismatch)?;
        let (first, second) = self.revealed_pair()?;

        self.graph.set_card_revealed(first, false)?;
        self.graph.set_card_revealed(second, false)?;
        self.revealed = (None, None);
        self.graph.set_clickable(self.board, false)?;
        self.state = MatchState::NoReveal;
        Ok(())
    }

    /// Take a found pair off the board.
    pub fn discard_pair(&mut self) -> GameResult<()> {
        self.expect_state(MatchState::PairFound)?;
        let (first, second) = self.revealed_pair()?;

        self.remove_card(first)?;
        self.remove_card(second)?;
        self.revealed = (None, None);
        self.graph.set_clickable(self.board, false)?;
        self.state = MatchState::NoReveal;
        Ok(())
    }

    fn remove_card(&mut self, card: NodeId) -> GameResult<()> {
        self.card_router.remove_subscriber(card)?;
        self.cards.retain(|c| *c != card);
        self.graph
            .remove_child(&mut self.renderer, self.board, card, RemovePolicy::Destroy)?;
        Ok(())
    }

    /// Abandon the match and return to the main menu.
    pub fn new_game(&mut self) {
        self.teardown();
        if let Err(e) = self.graph.set_visible(self.main_menu.panel, true) {
            error!("[Memory] Cannot show the main menu: {}", e);
        }
        self.state = MatchState::Menu;
        info!("[Memory] Back to the main menu");
    }

    fn teardown(&mut self) {
        if let Some(menu) = self.game_menu.take() {
            for button in menu.menu.button_ids() {
                let _ = self.button_router.remove_subscriber(button);
            }
            if let Err(e) = self.graph.destroy(&mut self.renderer, menu.menu.panel) {
                warn!("[Memory] Game menu already gone: {}", e);
            }
        }
        for card in std::mem::take(&mut self.cards) {
            let _ = self.card_router.remove_subscriber(card);
            if self.graph.contains(card) {
                if let Err(e) = self.graph.destroy(&mut self.renderer, card) {
                    warn!("[Memory] Cannot destroy card: {}", e);
                }
            }
        }
        self.revealed = (None, None);
        if let Err(e) = self.graph.set_clickable(self.board, false) {
            error!("[Memory] Board lost: {}", e);
        }
        self.pairs_found = 0;
        self.timer.reset();
    }

    // =========================================================================
    // Players
    // =========================================================================

    /// Score node of the player whose turn it is.
    pub fn active_player(&self) -> GameResult<NodeId> {
        self.player_nodes()
            .iter()
            .copied()
            .find(|&p| self.graph.score(p).is_some_and(ScoreTrack::is_active))
            .ok_or_else(|| GameError::Invariant("no active player".into()))
    }

    /// Player after the active one, wrapping around.
    pub fn next_player(&self) -> GameResult<NodeId> {
        let players = self.player_nodes();
        let active = self.active_player()?;
        let index = players
            .iter()
            .position(|&p| p == active)
            .ok_or_else(|| GameError::Invariant("active player not in the match".into()))?;
        Ok(players[(index + 1) % players.len()])
    }

    // =========================================================================
    // Frame
    // =========================================================================

    /// Draw one frame at time `now`.
    ///
    /// Every step runs even if an earlier one failed; the first failure is
    /// returned.
    pub fn frame(&mut self, now: u64) -> GameResult<()> {
        let mut failure = None;
        keep_first(&mut failure, self.renderer.clear());
        let root = self.graph.root();
        keep_first(&mut failure, self.graph.render(&mut self.renderer, root));

        self.update_hover();
        if self.state.in_play() && self.pairs_found < self.pairs {
            if let Some(elapsed) = self.timer.refresh(now) {
                self.show_time(elapsed);
            }
        }

        keep_first(&mut failure, self.draw_overlays());
        self.renderer.present();
        failure.map_or(Ok(()), Err)
    }

    fn show_time(&mut self, elapsed: u64) {
        let Some(timer) = self.timer_node() else {
            return;
        };
        let result = self
            .graph
            .set_text(&mut self.renderer, timer, &format_clock(elapsed))
            .and_then(|()| self.graph.center_x(timer));
        if let Err(e) = result {
            error!("[Memory] Timer not redrawn: {}", e);
        }
    }

    fn draw_overlays(&mut self) -> SceneResult<()> {
        let selected = if self.state.in_play() {
            self.active_player().ok()
        } else {
            let action = if self.players == 1 {
                ButtonAction::OnePlayer
            } else {
                ButtonAction::TwoPlayers
            };
            self.main_menu.button(action)
        };
        if let Some(node) = selected.filter(|&n| self.graph.is_visible(n)) {
            self.graph.highlight(&mut self.renderer, node, SELECTED_COLOR)?;
        }
        self.button_router.highlight_hovered(&self.graph, &mut self.renderer)
    }
}

impl<R: Renderer> std::fmt::Debug for MemoryGame<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryGame")
            .field("state", &self.state)
            .field("players", &self.players)
            .field("pairs", &self.pairs)
            .field("pairs_found", &self.pairs_found)
            .field("cards", &self.cards.len())
            .field("quit", &self.quit)
            .finish()
    }
}

fn keep_first<E: Into<GameError>>(slot: &mut Option<GameError>, result: Result<(), E>) {
    if let Err(e) = result {
        let e = e.into();
        error!("[Memory] Frame: {}", e);
        if slot.is_none() {
            *slot = Some(e);
        }
    }
}

/// Attach `node` to `panel`, centred horizontally at `y_factor` of its height.
fn place_in_panel(
    graph: &mut SceneGraph<GameMessage>,
    panel: NodeId,
    node: NodeId,
    y_factor: f32,
) -> SceneResult<()> {
    graph.add_child(panel, node)?;
    graph.center_x(node)?;
    let height = graph.node(panel).map_or(0, |n| n.height());
    let x = graph.node(node).map_or(0, |n| n.x());
    graph.set_position(node, x, (height as f32 * y_factor).round() as i32)
}

/// Move "+" buttons right and "-" buttons left of the centre line.
fn spread_pair_buttons(graph: &mut SceneGraph<GameMessage>, menu: &Menu) -> SceneResult<()> {
    for (inc, dec) in [
        (ButtonAction::IncPairs, ButtonAction::DecPairs),
        (ButtonAction::IncPairs10, ButtonAction::DecPairs10),
    ] {
        let (Some(inc), Some(dec)) = (menu.button(inc), menu.button(dec)) else {
            continue;
        };
        let Some(rect) = graph.node(inc).map(|n| n.rect()) else {
            continue;
        };
        graph.set_position(inc, rect.x + rect.w, rect.y)?;
        if let Some(dec_rect) = graph.node(dec).map(|n| n.rect()) {
            graph.set_position(dec, dec_rect.x - rect.w, dec_rect.y)?;
        }
    }
    Ok(())
}
