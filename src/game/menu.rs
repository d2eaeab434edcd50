//! Side-panel menus made of text buttons.
//!
//! A menu is a plain panel node holding one text node per button, each
//! centred horizontally and placed at a fraction of the panel height. Every
//! button's click handler yields a [`GameMessage::Button`] carrying its
//! [`ButtonAction`].

use log::{debug, error};
use rustc_hash::FxHashSet;

use super::error::MenuError;
use super::state::GameMessage;
use crate::core::{Color, Rect};
use crate::render::{FontId, Renderer};
use crate::scene::{NodeId, SceneGraph};

/// What a menu button does.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ButtonAction {
    OnePlayer,
    TwoPlayers,
    IncPairs,
    DecPairs,
    IncPairs10,
    DecPairs10,
    Start,
    /// Back to the main menu.
    NewGame,
    Quit,
}

impl ButtonAction {
    /// Signed pair-count change, for the pair buttons.
    #[must_use]
    pub fn pair_offset(self) -> Option<i32> {
        match self {
            ButtonAction::IncPairs => Some(1),
            ButtonAction::DecPairs => Some(-1),
            ButtonAction::IncPairs10 => Some(10),
            ButtonAction::DecPairs10 => Some(-10),
            _ => None,
        }
    }
}

/// One button of a menu.
#[derive(Clone, Debug, PartialEq)]
pub struct MenuButton {
    pub name: String,
    pub label: String,
    /// Vertical position as a fraction of the panel height.
    pub y_factor: f32,
    pub action: ButtonAction,
}

impl MenuButton {
    #[must_use]
    pub fn new(name: impl Into<String>, label: impl Into<String>, y_factor: f32, action: ButtonAction) -> Self {
        Self {
            name: name.into(),
            label: label.into(),
            y_factor,
            action,
        }
    }
}

/// A built menu: its panel and its buttons in definition order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Menu {
    pub panel: NodeId,
    pub buttons: Vec<(NodeId, ButtonAction)>,
}

impl Menu {
    /// First button bound to `action`.
    #[must_use]
    pub fn button(&self, action: ButtonAction) -> Option<NodeId> {
        self.buttons.iter().find(|(_, a)| *a == action).map(|(id, _)| *id)
    }

    pub fn button_ids(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.buttons.iter().map(|(id, _)| *id)
    }
}

fn validate(name: &str, buttons: &[MenuButton]) -> Result<(), MenuError> {
    if name.is_empty() {
        return Err(MenuError::EmptyName);
    }
    let mut seen = FxHashSet::default();
    for button in buttons {
        if button.name.is_empty() {
            return Err(MenuError::EmptyButtonName { menu: name.to_string() });
        }
        if !seen.insert(button.name.as_str()) {
            return Err(MenuError::DuplicateButton {
                menu: name.to_string(),
                button: button.name.clone(),
            });
        }
        if !(0.0..=1.0).contains(&button.y_factor) {
            return Err(MenuError::YFactor {
                button: button.name.clone(),
                factor: button.y_factor,
            });
        }
    }
    Ok(())
}

/// Build a detached menu panel covering `panel` with the given buttons.
///
/// The definition is validated before any node is created. The caller
/// attaches the panel and subscribes the buttons to a router.
pub fn build_menu<R: Renderer + ?Sized>(
    graph: &mut SceneGraph<GameMessage>,
    renderer: &mut R,
    name: &str,
    panel: Rect,
    buttons: &[MenuButton],
    color: Color,
    font: Option<FontId>,
) -> Result<Menu, MenuError> {
    validate(name, buttons)?;

    let panel_id = graph.create_node(name, panel);
    let mut menu = Menu {
        panel: panel_id,
        buttons: Vec::with_capacity(buttons.len()),
    };
    for button in buttons {
        match add_button(graph, renderer, panel_id, button, color, font) {
            Ok(id) => menu.buttons.push((id, button.action)),
            Err(e) => {
                error!("[Menu] Failed to add '{}' to '{}': {}", button.name, name, e);
                let _ = graph.destroy(renderer, panel_id);
                return Err(e);
            }
        }
    }
    debug!("[Menu] Built '{}' with {} button(s)", name, menu.buttons.len());
    Ok(menu)
}

fn add_button<R: Renderer + ?Sized>(
    graph: &mut SceneGraph<GameMessage>,
    renderer: &mut R,
    panel: NodeId,
    button: &MenuButton,
    color: Color,
    font: Option<FontId>,
) -> Result<NodeId, MenuError> {
    let height = graph.node(panel).map_or(0, |n| n.height());
    let id = graph.create_text(renderer, button.name.as_str(), 0, 0, &button.label, color, font);
    graph.add_child(panel, id)?;
    graph.center_x(id)?;
    let x = graph.node(id).map_or(0, |n| n.x());
    graph.set_position(id, x, (height as f32 * button.y_factor).round() as i32)?;
    let action = button.action;
    graph.set_on_click(id, move |_, _| GameMessage::Button(action))?;
    Ok(id)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::{HeadlessRenderer, GLYPH_WIDTH};

    fn setup() -> (SceneGraph<GameMessage>, HeadlessRenderer) {
        (SceneGraph::new(Rect::new(0, 0, 1000, 600)), HeadlessRenderer::new(1000, 600))
    }

    fn buttons() -> Vec<MenuButton> {
        vec![
            MenuButton::new("button_start", "Start", 0.8, ButtonAction::Start),
            MenuButton::new("button_quit", "Quit", 0.9, ButtonAction::Quit),
        ]
    }

    #[test]
    fn test_build_places_buttons() {
        let (mut graph, mut renderer) = setup();
        let menu = build_menu(
            &mut graph,
            &mut renderer,
            "main_menu",
            Rect::new(800, 0, 200, 600),
            &buttons(),
            Color::WHITE,
            None,
        )
        .unwrap();

        let start = menu.button(ButtonAction::Start).unwrap();
        let node = graph.node(start).unwrap();
        assert_eq!(node.name(), "button_start");
        assert_eq!(node.x(), (200 - 5 * GLYPH_WIDTH) / 2);
        assert_eq!(node.y(), 480);
        assert_eq!(graph.dispatch_click(start), None);

        let root = graph.root();
        graph.add_child(root, menu.panel).unwrap();
        assert_eq!(graph.dispatch_click(start), Some(GameMessage::Button(ButtonAction::Start)));
    }

    #[test]
    fn test_invalid_definitions_leave_nothing() {
        let (mut graph, mut renderer) = setup();
        let panel = Rect::new(800, 0, 200, 600);
        let before = graph.len();

        let err = build_menu(&mut graph, &mut renderer, "", panel, &buttons(), Color::WHITE, None);
        assert_eq!(err, Err(MenuError::EmptyName));

        let mut dup = buttons();
        dup[1].name = "button_start".into();
        let err = build_menu(&mut graph, &mut renderer, "m", panel, &dup, Color::WHITE, None);
        assert!(matches!(err, Err(MenuError::DuplicateButton { .. })));

        let mut unnamed = buttons();
        unnamed[0].name.clear();
        let err = build_menu(&mut graph, &mut renderer, "m", panel, &unnamed, Color::WHITE, None);
        assert!(matches!(err, Err(MenuError::EmptyButtonName { .. })));

        let mut low = buttons();
        low[0].y_factor = 1.5;
        let err = build_menu(&mut graph, &mut renderer, "m", panel, &low, Color::WHITE, None);
        assert!(matches!(err, Err(MenuError::YFactor { .. })));

        assert_eq!(graph.len(), before);
        assert_eq!(renderer.live_textures(), 0);
    }

    #[test]
    fn test_pair_offsets() {
        assert_eq!(ButtonAction::IncPairs10.pair_offset(), Some(10));
        assert_eq!(ButtonAction::DecPairs.pair_offset(), Some(-1));
        assert_eq!(ButtonAction::Start.pair_offset(), None);
    }
}
