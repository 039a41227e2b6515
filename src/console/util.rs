pub(super) fn trim_ascii_whitespace(line: &[u8]) -> &[u8] {
    let mut start = 0usize;
    let mut end = line.len();
    while start < end && line[start].is_ascii_whitespace() {
        start += 1;
    }
    while end > start && line[end - 1].is_ascii_whitespace() {
        end -= 1;
    }
    &line[start..end]
}

pub(super) fn tokens(line: &[u8]) -> impl Iterator<Item = &[u8]> {
    line.split(|byte| byte.is_ascii_whitespace())
        .filter(|token| !token.is_empty())
}

pub(super) fn split_pair(token: &[u8]) -> Option<(&[u8], &[u8])> {
    let eq = token.iter().position(|&byte| byte == b'=')?;
    let (key, value) = (&token[..eq], &token[eq + 1..]);
    if key.is_empty() || value.is_empty() {
        return None;
    }
    Some((key, value))
}

pub(super) fn parse_i32_ascii(bytes: &[u8]) -> Option<i32> {
    let (negative, digits) = match bytes.split_first()? {
        (b'-', rest) => (true, rest),
        (b'+', rest) => (false, rest),
        _ => (false, bytes),
    };
    if digits.is_empty() {
        return None;
    }
    let mut value = 0i64;
    for &byte in digits {
        if !byte.is_ascii_digit() {
            return None;
        }
        value = value.checked_mul(10)?.checked_add(i64::from(byte - b'0'))?;
        if value > i64::from(i32::MAX) + 1 {
            return None;
        }
    }
    let signed = if negative { -value } else { value };
    i32::try_from(signed).ok()
}

pub(super) fn parse_u8_ascii(bytes: &[u8]) -> Option<u8> {
    u8::try_from(parse_i32_ascii(bytes)?).ok()
}

pub(super) fn parse_f32_ascii(bytes: &[u8]) -> Option<f32> {
    let value: f32 = core::str::from_utf8(bytes).ok()?.parse().ok()?;
    value.is_finite().then_some(value)
}
