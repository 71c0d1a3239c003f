use crossterm::event::KeyCode;
use serde::{Deserialize, Serialize};

use crate::config::key::{Key, KeyBinding};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalKeybindings {
    pub quit: KeyBinding,
    pub help: KeyBinding,
    pub back: KeyBinding,
    pub contact: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigationKeybindings {
    pub up: KeyBinding,
    pub down: KeyBinding,
    pub left: KeyBinding,
    pub right: KeyBinding,
    pub page_up: KeyBinding,
    pub page_down: KeyBinding,
    pub home: KeyBinding,
    pub end: KeyBinding,
    pub select: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanKeybindings {
    pub copy_link: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogKeybindings {
    pub dismiss: KeyBinding,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct KeybindingsConfig {
    pub global: GlobalKeybindings,
    pub navigation: NavigationKeybindings,
    pub plans: PlanKeybindings,
    pub dialog: DialogKeybindings,
}

impl Default for GlobalKeybindings {
    fn default() -> Self {
        Self {
            quit: Key::char('q').into(),
            help: Key::char('?').into(),
            back: Key::new(KeyCode::Esc).into(),
            contact: Key::char('w').into(),
        }
    }
}

impl Default for NavigationKeybindings {
    fn default() -> Self {
        Self {
            up: vec![Key::char('k'), Key::new(KeyCode::Up)].into(),
            down: vec![Key::char('j'), Key::new(KeyCode::Down)].into(),
            left: vec![Key::char('h'), Key::new(KeyCode::Left)].into(),
            right: vec![Key::char('l'), Key::new(KeyCode::Right)].into(),
            page_up: Key::new(KeyCode::PageUp).into(),
            page_down: Key::new(KeyCode::PageDown).into(),
            home: vec![Key::char('g'), Key::new(KeyCode::Home)].into(),
            end: vec![Key::char('G'), Key::new(KeyCode::End)].into(),
            select: Key::new(KeyCode::Enter).into(),
        }
    }
}

impl Default for PlanKeybindings {
    fn default() -> Self {
        Self {
            copy_link: Key::char('y').into(),
        }
    }
}

impl Default for DialogKeybindings {
    fn default() -> Self {
        Self {
            dismiss: vec![
                Key::new(KeyCode::Esc),
                Key::new(KeyCode::Enter),
                Key::char('q'),
            ]
            .into(),
        }
    }
}
