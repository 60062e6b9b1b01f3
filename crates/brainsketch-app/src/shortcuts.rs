//! Keyboard shortcut registry and documentation.

use brainsketch_core::canvas::CanvasAction;
use brainsketch_core::tools::ToolKind;
use std::borrow::Cow;

/// What a shortcut does.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    /// A toolbar action on the session.
    Action(CanvasAction),
    /// Persist the drawing now.
    Save,
}

/// A keyboard shortcut definition.
#[derive(Debug, Clone)]
pub struct Shortcut {
    pub key: Cow<'static, str>,
    pub ctrl: bool,
    pub shift: bool,
    pub description: Cow<'static, str>,
    pub command: KeyCommand,
}

impl Shortcut {
    pub fn new(
        key: impl Into<Cow<'static, str>>,
        ctrl: bool,
        shift: bool,
        description: impl Into<Cow<'static, str>>,
        command: KeyCommand,
    ) -> Self {
        Self {
            key: key.into(),
            ctrl,
            shift,
            description: description.into(),
            command,
        }
    }

    /// Format the shortcut for display (e.g., "Ctrl+S").
    pub fn format(&self) -> String {
        let mut parts = Vec::new();
        if self.ctrl {
            parts.push("Ctrl");
        }
        if self.shift {
            parts.push("Shift");
        }
        parts.push(self.key.as_ref());
        parts.join("+")
    }

    /// Does a DOM `KeyboardEvent.key` with these modifiers trigger this shortcut?
    pub fn matches(&self, key: &str, ctrl: bool, shift: bool) -> bool {
        self.ctrl == ctrl && self.shift == shift && self.key.eq_ignore_ascii_case(key)
    }
}

/// Registry of all keyboard shortcuts.
pub struct ShortcutRegistry;

impl ShortcutRegistry {
    /// Get all registered shortcuts.
    pub fn all() -> Vec<Shortcut> {
        let mut shortcuts: Vec<Shortcut> = ToolKind::ALL
            .into_iter()
            .map(|tool| {
                Shortcut::new(
                    tool.shortcut().to_string(),
                    false,
                    false,
                    format!("{} tool", tool.name()),
                    KeyCommand::Action(CanvasAction::SelectTool(tool)),
                )
            })
            .collect();

        shortcuts.extend([
            Shortcut::new("Z", true, false, "Undo", KeyCommand::Action(CanvasAction::Undo)),
            Shortcut::new(
                "Backspace",
                true,
                true,
                "Clear the canvas",
                KeyCommand::Action(CanvasAction::Clear),
            ),
            Shortcut::new(
                "Delete",
                true,
                true,
                "Clear the canvas",
                KeyCommand::Action(CanvasAction::Clear),
            ),
            Shortcut::new("S", true, false, "Save", KeyCommand::Save),
        ]);
        shortcuts
    }

    /// Find the command bound to a key press.
    pub fn resolve(key: &str, ctrl: bool, shift: bool) -> Option<KeyCommand> {
        Self::all()
            .into_iter()
            .find(|shortcut| shortcut.matches(key, ctrl, shift))
            .map(|shortcut| shortcut.command)
    }

    /// Log all shortcuts.
    pub fn log_all() {
        log::info!("=== Keyboard Shortcuts ===");
        for shortcut in Self::all() {
            log::info!("  {:20} {}", shortcut.format(), shortcut.description);
        }
    }
}
