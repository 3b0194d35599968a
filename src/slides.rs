// Keyboard and media behaviour bound to slide deck events.

use crate::role::DisplayRole;


// `HTMLMediaElement.readyState` value meaning the current frame is available but playback
// cannot advance yet.
pub const HAVE_CURRENT_DATA: u16 = 2;

pub const DEFAULT_QUIT_KEYS: [&str; 3] = ["Escape", "q", "x"];

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyPress {
    // `KeyboardEvent.key`.
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    pub shift: bool,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuitKeys {
    keys: Vec<String>,
}

// Decides what a key press on a presentation page does.
#[derive(Clone, Debug)]
pub struct SlideKeyBinder {
    quit_keys: QuitKeys,
    role: DisplayRole,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MediaState {
    pub current_time: f64,
    pub ready_state: u16,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SlideMedia {
    // Slide is marked as audio/video-bearing.
    pub auto_play: bool,
    pub media: Vec<MediaState>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MediaCommand {
    // Index into the media of the slide being left.
    Pause(usize),
    // Index into the media of the slide being entered.
    Play(usize),
}

impl KeyPress {
    pub fn new(key: &str) -> Self { KeyPress { key: key.to_owned(), ..KeyPress::default() } }

    // Shift does not count: it only changes the case of the letter.
    pub fn has_modifier(&self) -> bool { self.ctrl || self.alt || self.meta }
}

impl QuitKeys {
    pub fn new(keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        QuitKeys { keys: keys.into_iter().map(|k| k.into()).collect() }
    }

    pub fn matches(&self, key: &str) -> bool {
        // "Esc" is what older browsers report for the escape key.
        let key = if key == "Esc" { "Escape" } else { key };
        self.keys.iter().any(|k| k.eq_ignore_ascii_case(key))
    }
}

impl Default for QuitKeys {
    fn default() -> Self { QuitKeys::new(DEFAULT_QUIT_KEYS) }
}

impl SlideKeyBinder {
    pub fn new(role: DisplayRole, quit_keys: QuitKeys) -> Self {
        SlideKeyBinder { quit_keys, role }
    }

    pub fn role(&self) -> &DisplayRole { &self.role }

    // Returns the page to go to, if the key quits the presentation.
    pub fn on_key(&self, key: &KeyPress) -> Option<&'static str> {
        if key.has_modifier() || !self.quit_keys.matches(&key.key) {
            return None;
        }
        Some(self.role.exit_href())
    }
}

impl MediaState {
    pub fn is_playing(&self) -> bool {
        self.current_time > 0.0 && self.ready_state > HAVE_CURRENT_DATA
    }
}

// Media commands for a slide change, pauses first.
pub fn plan_slide_change(from: &SlideMedia, to: &SlideMedia) -> Vec<MediaCommand> {
    let pauses = from
        .media
        .iter()
        .enumerate()
        .filter(|(_, m)| m.is_playing())
        .map(|(i, _)| MediaCommand::Pause(i));
    let plays = to
        .auto_play
        .then(|| (0..to.media.len()).map(MediaCommand::Play))
        .into_iter()
        .flatten();
    pauses.chain(plays).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn playing() -> MediaState { MediaState { current_time: 3.0, ready_state: 4 } }
    fn idle() -> MediaState { MediaState { current_time: 0.0, ready_state: 4 } }
    fn buffering() -> MediaState { MediaState { current_time: 1.0, ready_state: 2 } }

    #[test]
    fn quit_key_depends_on_role() {
        let controller = SlideKeyBinder::new(DisplayRole::Controller, QuitKeys::default());
        let puppet = SlideKeyBinder::new(DisplayRole::from_flag("P"), QuitKeys::default());
        assert_eq!(controller.on_key(&KeyPress::new("Escape")), Some("/controller"));
        assert_eq!(puppet.on_key(&KeyPress::new("q")), Some("/displays"));
        assert_eq!(puppet.on_key(&KeyPress::new("Q")), Some("/displays"));
        assert_eq!(puppet.on_key(&KeyPress::new("Esc")), Some("/displays"));
        assert_eq!(puppet.on_key(&KeyPress::new("ArrowRight")), None);
    }

    #[test]
    fn modifier_blocks_quit() {
        let binder = SlideKeyBinder::new(DisplayRole::Controller, QuitKeys::default());
        let ctrl_x = KeyPress { ctrl: true, ..KeyPress::new("x") };
        let alt_q = KeyPress { alt: true, ..KeyPress::new("q") };
        let meta_esc = KeyPress { meta: true, ..KeyPress::new("Escape") };
        let shift_x = KeyPress { shift: true, ..KeyPress::new("X") };
        assert_eq!(binder.on_key(&ctrl_x), None);
        assert_eq!(binder.on_key(&alt_q), None);
        assert_eq!(binder.on_key(&meta_esc), None);
        assert_eq!(binder.on_key(&shift_x), Some("/controller"));
    }

    #[test]
    fn pause_playing_then_play_av_slide() {
        let from = SlideMedia {
            auto_play: true,
            media: vec![playing(), idle(), buffering(), playing()],
        };
        let to = SlideMedia { auto_play: true, media: vec![idle(), idle()] };
        assert_eq!(plan_slide_change(&from, &to), vec![
            MediaCommand::Pause(0),
            MediaCommand::Pause(3),
            MediaCommand::Play(0),
            MediaCommand::Play(1),
        ]);
    }

    #[test]
    fn plain_slide_does_not_play() {
        let from = SlideMedia::default();
        let to = SlideMedia { auto_play: false, media: vec![idle()] };
        assert!(plan_slide_change(&from, &to).is_empty());
    }
}
