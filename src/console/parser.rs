use super::{
    commands::{ConsoleCommand, ConsoleError, SessionCommand},
    util::{
        parse_f32_ascii, parse_i32_ascii, parse_u8_ascii, split_pair, tokens,
        trim_ascii_whitespace,
    },
};
use crate::metrics::Thresholds;

pub fn parse_console_command(line: &[u8]) -> Result<ConsoleCommand, ConsoleError> {
    let line = trim_ascii_whitespace(line);
    let mut words = tokens(line);
    let keyword = words.next().ok_or(ConsoleError::UnknownCommand)?;

    if keyword.eq_ignore_ascii_case(b"THRESHSET") {
        return parse_threshset(words);
    }
    if keyword.eq_ignore_ascii_case(b"SESSION") {
        let action = words.next().ok_or(ConsoleError::MissingArgument)?;
        let command = if action.eq_ignore_ascii_case(b"START") {
            SessionCommand::Start
        } else if action.eq_ignore_ascii_case(b"STOP") {
            SessionCommand::Stop
        } else {
            return Err(ConsoleError::BadValue);
        };
        return no_more(words, ConsoleCommand::Session(command));
    }

    let command = if keyword.eq_ignore_ascii_case(b"PING") {
        ConsoleCommand::Ping
    } else if keyword.eq_ignore_ascii_case(b"STATUS") || keyword.eq_ignore_ascii_case(b"METRICS")
    {
        ConsoleCommand::Status
    } else if keyword.eq_ignore_ascii_case(b"RESET") {
        ConsoleCommand::Reset
    } else if keyword.eq_ignore_ascii_case(b"THRESH") {
        ConsoleCommand::ThresholdsGet
    } else {
        return Err(ConsoleError::UnknownCommand);
    };
    no_more(words, command)
}

fn no_more<'a>(
    mut rest: impl Iterator<Item = &'a [u8]>,
    command: ConsoleCommand,
) -> Result<ConsoleCommand, ConsoleError> {
    match rest.next() {
        None => Ok(command),
        Some(_) => Err(ConsoleError::BadValue),
    }
}

fn parse_threshset<'a>(
    mut pairs: impl Iterator<Item = &'a [u8]>,
) -> Result<ConsoleCommand, ConsoleError> {
    let first = pairs.next().ok_or(ConsoleError::MissingArgument)?;
    if first.eq_ignore_ascii_case(b"DEFAULT") {
        return no_more(pairs, ConsoleCommand::ThresholdsSet(Thresholds::default()));
    }

    let mut thresholds = Thresholds::default();
    for pair in core::iter::once(first).chain(pairs) {
        let (key, value) = split_pair(pair).ok_or(ConsoleError::BadValue)?;
        apply_pair(&mut thresholds, key, value)?;
    }
    thresholds.validate().map_err(ConsoleError::Invalid)?;
    Ok(ConsoleCommand::ThresholdsSet(thresholds))
}

fn apply_pair(t: &mut Thresholds, key: &[u8], value: &[u8]) -> Result<(), ConsoleError> {
    let band = |value: &[u8]| parse_i32_ascii(value).ok_or(ConsoleError::BadValue);
    let float = |value: &[u8]| parse_f32_ascii(value).ok_or(ConsoleError::BadValue);
    let size = |value: &[u8]| parse_u8_ascii(value).ok_or(ConsoleError::BadValue);

    if key.eq_ignore_ascii_case(b"r1") {
        t.r1 = band(value)?;
    } else if key.eq_ignore_ascii_case(b"r2") {
        t.r2 = band(value)?;
    } else if key.eq_ignore_ascii_case(b"c1") {
        t.c1 = band(value)?;
    } else if key.eq_ignore_ascii_case(b"c2") {
        t.c2 = band(value)?;
    } else if key.eq_ignore_ascii_case(b"f1") {
        t.f1 = band(value)?;
    } else if key.eq_ignore_ascii_case(b"f2") {
        t.f2 = band(value)?;
    } else if key.eq_ignore_ascii_case(b"quietude_percent") {
        t.quietude_percent = float(value)?;
    } else if key.eq_ignore_ascii_case(b"smoothing_window") {
        t.smoothing_window = size(value)?;
    } else if key.eq_ignore_ascii_case(b"rate_smoothing_factor") {
        t.rate_smoothing_factor = float(value)?;
    } else if key.eq_ignore_ascii_case(b"hysteresis_margin") {
        t.hysteresis_margin = float(value)?;
    } else if key.eq_ignore_ascii_case(b"trend_buffer_size") {
        t.trend_buffer_size = size(value)?;
    } else {
        return Err(ConsoleError::UnknownKey);
    }
    Ok(())
}
