use std::ops::BitOr;

use crossterm::event::{KeyCode, KeyModifiers};

use nom::{
    branch::alt,
    bytes::complete::tag,
    character::complete::{anychar, char, digit1},
    combinator::{eof, map, map_res, value, verify},
    multi::{many0, many1},
    IResult,
};

use super::KeyInfo;

fn parse_modifier(input: &str) -> IResult<&str, KeyModifiers> {
    // <D-...> (Apple's Command key) never reaches us as a distinct modifier, so it isn't
    // accepted here.
    alt((
        value(KeyModifiers::ALT, tag("A-")),
        value(KeyModifiers::ALT, tag("M-")),
        value(KeyModifiers::CONTROL, tag("C-")),
        value(KeyModifiers::SHIFT, tag("S-")),
    ))(input)
}

fn parse_motion_name(input: &str) -> IResult<&str, KeyCode> {
    alt((
        value(KeyCode::Left, tag("Left")),
        value(KeyCode::Right, tag("Right")),
        value(KeyCode::Up, tag("Up")),
        value(KeyCode::Down, tag("Down")),
        value(KeyCode::PageUp, tag("PageUp")),
        value(KeyCode::PageDown, tag("PageDown")),
        value(KeyCode::Home, tag("Home")),
        value(KeyCode::End, tag("End")),
    ))(input)
}

fn parse_control_name(input: &str) -> IResult<&str, KeyCode> {
    alt((
        value(KeyCode::Esc, alt((tag("Escape"), tag("Esc")))),
        value(KeyCode::Tab, tag("Tab")),
        value(KeyCode::Backspace, alt((tag("BS"), tag("BackSpace")))),
        value(KeyCode::Enter, alt((tag("CR"), tag("Return"), tag("Enter")))),
        value(KeyCode::Char('\n'), alt((tag("NL"), tag("NewLine"), tag("LF")))),
        value(KeyCode::Delete, alt((tag("Delete"), tag("Del")))),
        value(KeyCode::Insert, alt((tag("Insert"), tag("Ins")))),
        value(KeyCode::Null, tag("Nul")),
        value(KeyCode::Pause, tag("Pause")),
        value(KeyCode::Menu, tag("Menu")),
        value(KeyCode::PrintScreen, alt((tag("PrintScreen"), tag("PS"), tag("SysRq")))),
        value(KeyCode::CapsLock, tag("CapsLock")),
        value(KeyCode::ScrollLock, tag("ScrollLock")),
        value(KeyCode::NumLock, tag("NumLock")),
    ))(input)
}

fn parse_ascii_name(input: &str) -> IResult<&str, KeyCode> {
    alt((
        value(KeyCode::Char(' '), tag("Space")),
        value(KeyCode::Char('|'), tag("Bar")),
        value(KeyCode::Char('\\'), tag("Bslash")),
        value(KeyCode::Char('<'), tag("lt")),
    ))(input)
}

fn parse_function(input: &str) -> IResult<&str, KeyCode> {
    let (input, _) = char('F')(input)?;
    let (input, n) = verify(map_res(digit1, str::parse::<u8>), |n: &u8| *n >= 1)(input)?;

    Ok((input, KeyCode::F(n)))
}

fn parse_keyname(input: &str) -> IResult<&str, KeyCode> {
    alt((
        parse_motion_name,
        parse_control_name,
        parse_ascii_name,
        parse_function,
        map(anychar, KeyCode::Char),
    ))(input)
}

/// Control characters with a conventional meaning of their own.
fn ctl_alias(c: char, m: KeyModifiers) -> KeyInfo {
    match c.to_ascii_lowercase() {
        'i' => KeyInfo::from(KeyCode::Tab),
        'j' => KeyInfo::from(KeyCode::Char('\n')),
        'm' => KeyInfo::from(KeyCode::Enter),
        '[' => KeyInfo::from(KeyCode::Esc),
        '?' => KeyInfo::from(KeyCode::Backspace),
        '@' => KeyInfo::new(KeyCode::Char(' '), m),
        c => KeyInfo::new(KeyCode::Char(c), m),
    }
}

pub fn parse_simple(input: &str) -> IResult<&str, KeyInfo> {
    let (input, c) = anychar(input)?;

    Ok((input, KeyInfo::from(KeyCode::Char(c))))
}

pub fn parse_special(input: &str) -> IResult<&str, KeyInfo> {
    let (input, _) = char('<')(input)?;
    let (input, m) = many0(parse_modifier)(input)?;
    let (input, k) = parse_keyname(input)?;
    let (input, _) = char('>')(input)?;

    let mut m = m.into_iter().fold(KeyModifiers::NONE, BitOr::bitor);

    let key = match k {
        KeyCode::Char(c) if m.contains(KeyModifiers::CONTROL) => {
            m -= KeyModifiers::SHIFT;
            ctl_alias(c, m)
        },
        KeyCode::Char(c) if m.contains(KeyModifiers::SHIFT) => {
            KeyInfo::new(KeyCode::Char(c.to_ascii_uppercase()), m)
        },
        KeyCode::Tab if m == KeyModifiers::SHIFT => KeyInfo::from(KeyCode::BackTab),
        k => KeyInfo::new(k, m),
    };

    return Ok((input, key));
}

pub fn parse_key_str(input: &str) -> IResult<&str, KeyInfo> {
    let (input, res) = alt((parse_special, parse_simple))(input)?;
    let (input, _) = eof(input)?;

    Ok((input, res))
}

pub fn parse_macro_str(input: &str) -> IResult<&str, Vec<KeyInfo>> {
    let (input, res) = many1(alt((parse_special, parse_simple)))(input)?;
    let (input, _) = eof(input)?;

    Ok((input, res))
}
