use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::config::actions::{DialogAction, GlobalAction, NavAction, PlanAction};
use crate::config::key::KeyBinding;
use crate::config::keybindings::KeybindingsConfig;

/// Maps key events to the actions configured for them.
pub struct KeyResolver {
    pub keybindings: Arc<KeybindingsConfig>,
}

impl KeyResolver {
    pub const fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    fn global_binding(&self, action: GlobalAction) -> &KeyBinding {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => &kb.quit,
            GlobalAction::Help => &kb.help,
            GlobalAction::Back => &kb.back,
            GlobalAction::Contact => &kb.contact,
        }
    }

    fn nav_binding(&self, action: NavAction) -> &KeyBinding {
        let kb = &self.keybindings.navigation;
        match action {
            NavAction::Up => &kb.up,
            NavAction::Down => &kb.down,
            NavAction::Left => &kb.left,
            NavAction::Right => &kb.right,
            NavAction::PageUp => &kb.page_up,
            NavAction::PageDown => &kb.page_down,
            NavAction::Home => &kb.home,
            NavAction::End => &kb.end,
            NavAction::Select => &kb.select,
        }
    }

    fn plan_binding(&self, action: PlanAction) -> &KeyBinding {
        match action {
            PlanAction::CopyLink => &self.keybindings.plans.copy_link,
        }
    }

    fn dialog_binding(&self, action: DialogAction) -> &KeyBinding {
        match action {
            DialogAction::Dismiss => &self.keybindings.dialog.dismiss,
        }
    }

    // Global actions
    pub fn matches_global(&self, event: &KeyEvent, action: GlobalAction) -> bool {
        self.global_binding(action).matches(event)
    }

    pub fn display_global(&self, action: GlobalAction) -> String {
        self.global_binding(action).display()
    }

    // Navigation actions
    pub fn matches_nav(&self, event: &KeyEvent, action: NavAction) -> bool {
        self.nav_binding(action).matches(event)
    }

    pub fn display_nav(&self, action: NavAction) -> String {
        self.nav_binding(action).display()
    }

    // Plan modal actions
    pub fn matches_plan(&self, event: &KeyEvent, action: PlanAction) -> bool {
        self.plan_binding(action).matches(event)
    }

    pub fn display_plan(&self, action: PlanAction) -> String {
        self.plan_binding(action).display()
    }

    // Dialog actions
    pub fn matches_dialog(&self, event: &KeyEvent, action: DialogAction) -> bool {
        self.dialog_binding(action).matches(event)
    }

    pub fn display_dialog(&self, action: DialogAction) -> String {
        self.dialog_binding(action).display()
    }
}

impl Default for KeyResolver {
    fn default() -> Self {
        Self::new(Arc::new(KeybindingsConfig::default()))
    }
}
