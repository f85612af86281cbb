#[allow(unused_macros)]
macro_rules! key_event {
    ($ch: literal) => {
        crossterm::event::KeyEvent::new(
            crossterm::event::KeyCode::Char($ch),
            match $ch.is_ascii_uppercase() {
                true => crossterm::event::KeyModifiers::SHIFT,
                false => crossterm::event::KeyModifiers::NONE,
            },
        )
    };
    ($kc: expr) => {
        crossterm::event::KeyEvent::new($kc, crossterm::event::KeyModifiers::NONE)
    };
    ($kc: literal, $km: expr) => {
        crossterm::event::KeyEvent::new(crossterm::event::KeyCode::Char($kc), $km)
    };
    ($kc: expr, $km: expr) => {
        crossterm::event::KeyEvent::new($kc, $km)
    };
}

#[allow(unused_macros)]
macro_rules! key {
    ($ch: literal) => {
        $crate::key::KeyInfo::from(key_event!($ch))
    };
    ($kc: expr) => {
        $crate::key::KeyInfo::from(key_event!($kc))
    };
    ($kc: literal, $km: expr) => {
        $crate::key::KeyInfo::from(key_event!($kc, $km))
    };
    ($kc: expr, $km: expr) => {
        $crate::key::KeyInfo::from(key_event!($kc, $km))
    };
}

#[allow(unused_macros)]
macro_rules! ctl {
    ($ch: literal) => {
        key!(
            crossterm::event::KeyCode::Char($ch.to_ascii_lowercase()),
            crossterm::event::KeyModifiers::CONTROL
        )
    };
}
