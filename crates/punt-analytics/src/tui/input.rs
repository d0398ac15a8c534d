// Keyboard input handling.
//
// Playback keys become `UserCommand`s for the driver; display toggles are
// applied to `ViewState` directly.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use super::ViewState;
use crate::protocol::UserCommand;

/// Handle a keyboard event.
///
/// Returns `Some(UserCommand)` when the key should be forwarded to the
/// playback driver, `None` when it was handled locally or ignored.
pub fn handle_key(key_event: KeyEvent, view_state: &mut ViewState) -> Option<UserCommand> {
    // crossterm reports Press and Release on some platforms
    if key_event.kind != KeyEventKind::Press {
        return None;
    }

    if key_event.modifiers.contains(KeyModifiers::CONTROL) && key_event.code == KeyCode::Char('c')
    {
        return Some(UserCommand::Quit);
    }

    match key_event.code {
        KeyCode::Char(' ') => Some(UserCommand::TogglePause),
        KeyCode::Right | KeyCode::Char('l') => Some(UserCommand::StepForward),
        KeyCode::Left | KeyCode::Char('h') => Some(UserCommand::StepBack),
        KeyCode::Char('r') => Some(UserCommand::Restart),
        KeyCode::Char('q') | KeyCode::Esc => Some(UserCommand::Quit),
        KeyCode::Char('n') => {
            view_state.show_names = !view_state.show_names;
            None
        }
        KeyCode::Char('t') => {
            view_state.show_tracks = !view_state.show_tracks;
            None
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyEventState;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn ctrl_key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::CONTROL,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn playback_keys_map_to_commands() {
        let mut state = ViewState::default();
        let cases = [
            (KeyCode::Char(' '), UserCommand::TogglePause),
            (KeyCode::Right, UserCommand::StepForward),
            (KeyCode::Left, UserCommand::StepBack),
            (KeyCode::Char('r'), UserCommand::Restart),
            (KeyCode::Char('q'), UserCommand::Quit),
        ];
        for (code, expected) in cases {
            assert_eq!(handle_key(key(code), &mut state), Some(expected), "{code:?}");
        }
    }

    #[test]
    fn ctrl_c_quits() {
        let mut state = ViewState::default();
        assert_eq!(
            handle_key(ctrl_key(KeyCode::Char('c')), &mut state),
            Some(UserCommand::Quit)
        );
    }

    #[test]
    fn plain_c_is_ignored() {
        let mut state = ViewState::default();
        assert!(handle_key(key(KeyCode::Char('c')), &mut state).is_none());
    }

    #[test]
    fn toggles_are_local() {
        let mut state = ViewState::default();
        assert!(state.show_names);
        assert!(handle_key(key(KeyCode::Char('n')), &mut state).is_none());
        assert!(!state.show_names);
        assert!(handle_key(key(KeyCode::Char('t')), &mut state).is_none());
        assert!(!state.show_tracks);
    }

    #[test]
    fn release_events_ignored() {
        let mut state = ViewState::default();
        let mut event = key(KeyCode::Char('q'));
        event.kind = KeyEventKind::Release;
        assert!(handle_key(event, &mut state).is_none());
    }
}
