//! uuencode framing.
//!
//! ```text
//! begin 644 report.pdf
//! M<45 bytes as 60 chars>
//! #0V%T
//! `
//! end
//! ```
//!
//! Each data line starts with `chr(0x20 + n)` for its `n` payload bytes,
//! then 4 chars per 3 bytes. Zero sextets are written as a backtick so
//! the output never contains spaces; decoding accepts either form.

use super::Frame;
use crate::error::{Result, SheetError};

/// Payload bytes per full data line.
pub const LINE_BYTES: usize = 45;

const HEADER_PREFIX: &str = "begin ";
const TERMINATOR: &str = "`\nend\n";

pub fn encode(frame: &Frame) -> String {
    let data = frame.data();
    let lines = data.len().div_ceil(LINE_BYTES);
    let mut out = String::with_capacity(
        HEADER_PREFIX.len() + 12 + frame.name().len() + lines * (2 + LINE_BYTES / 3 * 4) + 6,
    );
    out.push_str(&format!(
        "{HEADER_PREFIX}{:o} {}\n",
        frame.mode(),
        frame.name()
    ));

    for line in data.chunks(LINE_BYTES) {
        out.push(sym(line.len() as u8));
        for group in line.chunks(3) {
            let b0 = group[0];
            let b1 = group.get(1).copied().unwrap_or(0);
            let b2 = group.get(2).copied().unwrap_or(0);
            out.push(sym(b0 >> 2));
            out.push(sym(((b0 & 0x03) << 4) | (b1 >> 4)));
            out.push(sym(((b1 & 0x0f) << 2) | (b2 >> 6)));
            out.push(sym(b2 & 0x3f));
        }
        out.push('\n');
    }

    out.push_str(TERMINATOR);
    out
}

pub fn decode(text: &str) -> Result<Frame> {
    let mut lines = text.split('\n');
    let header = lines.next().unwrap_or_default();
    let (mode, name) = parse_header(trim_cr(header))?;

    let mut data = Vec::with_capacity(text.len() / 4 * 3);
    let mut terminated = false;
    for (i, line) in lines.by_ref().enumerate() {
        let lineno = i + 2;
        let bytes = trim_cr(line).as_bytes();
        let Some((&len_char, body)) = bytes.split_first() else {
            return Err(malformed(format!("line {lineno} is empty")));
        };
        let n = value(len_char)
            .ok_or_else(|| malformed(format!("line {lineno} has a bad length char")))?
            as usize;
        if n == 0 {
            if !body.is_empty() {
                return Err(malformed(format!(
                    "zero-length line {lineno} carries data"
                )));
            }
            terminated = true;
            break;
        }
        if n > LINE_BYTES {
            return Err(malformed(format!(
                "line {lineno} claims {n} bytes, max is {LINE_BYTES}"
            )));
        }
        let expected = n.div_ceil(3) * 4;
        if body.len() != expected {
            return Err(malformed(format!(
                "line {lineno} has {} chars, its length char requires {expected}",
                body.len()
            )));
        }
        decode_line(body, n, lineno, &mut data)?;
    }

    if !terminated {
        return Err(malformed("missing zero-length terminator line".to_string()));
    }
    match lines.next().map(trim_cr) {
        Some("end") => {}
        _ => return Err(malformed("missing `end` trailer".to_string())),
    }
    if lines.any(|rest| !trim_cr(rest).is_empty()) {
        return Err(malformed("data after `end` trailer".to_string()));
    }

    Frame::new(name, mode, data).map_err(|e| malformed(e.to_string()))
}

fn parse_header(line: &str) -> Result<(u32, &str)> {
    let rest = line
        .strip_prefix(HEADER_PREFIX)
        .ok_or_else(|| malformed("missing `begin` header".to_string()))?;
    let (mode, name) = rest
        .split_once(' ')
        .ok_or_else(|| malformed(format!("header {line:?} has no name")))?;
    // from_str_radix alone would let a sign through
    let octal = !mode.is_empty() && mode.bytes().all(|b| matches!(b, b'0'..=b'7'));
    let mode = octal
        .then(|| u32::from_str_radix(mode, 8).ok())
        .flatten()
        .ok_or_else(|| malformed(format!("header mode {mode:?} is not octal")))?;
    Ok((mode, name))
}

fn decode_line(body: &[u8], n: usize, lineno: usize, out: &mut Vec<u8>) -> Result<()> {
    let mut left = n;
    for group in body.chunks(4) {
        let mut v = [0u8; 4];
        for (slot, &c) in v.iter_mut().zip(group) {
            *slot = value(c)
                .ok_or_else(|| malformed(format!("line {lineno} has char {c:#04x}")))?;
        }
        let triple = [
            (v[0] << 2) | (v[1] >> 4),
            (v[1] << 4) | (v[2] >> 2),
            (v[2] << 6) | v[3],
        ];
        let take = left.min(3);
        if triple[take..].iter().any(|&b| b != 0) {
            return Err(malformed(format!("line {lineno} has non-zero padding")));
        }
        out.extend_from_slice(&triple[..take]);
        left -= take;
    }
    Ok(())
}

#[inline]
fn sym(v: u8) -> char {
    if v == 0 { '`' } else { (0x20 + v) as char }
}

#[inline]
fn value(c: u8) -> Option<u8> {
    match c {
        b'`' | b' ' => Some(0),
        0x21..=0x5f => Some(c - 0x20),
        _ => None,
    }
}

#[inline]
fn trim_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

fn malformed(msg: String) -> SheetError {
    SheetError::MalformedFrame(msg)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn frame(data: &[u8]) -> Frame {
        Frame::new("cat.txt", 0o644, data.to_vec()).unwrap()
    }

    #[test]
    fn known_vector() {
        let text = encode(&frame(b"Cat"));
        assert_eq!(text, "begin 644 cat.txt\n#0V%T\n`\nend\n");
        assert_eq!(decode(&text).unwrap(), frame(b"Cat"));
    }

    #[test]
    fn empty_blob_still_has_header_and_trailer() {
        let text = encode(&frame(b""));
        assert_eq!(text, "begin 644 cat.txt\n`\nend\n");
        assert_eq!(decode(&text).unwrap().data(), b"");
    }

    #[test]
    fn full_lines_and_binary_bytes() {
        let data: Vec<u8> = (0..=255u8).cycle().take(1000).collect();
        let text = encode(&frame(&data));
        assert!(text.lines().skip(1).all(|l| l.len() <= 61));
        assert!(text.is_ascii());
        assert_eq!(decode(&text).unwrap().into_data(), data);
    }

    #[test]
    fn output_has_no_spaces_after_header() {
        let text = encode(&frame(&[0u8; 90]));
        let body = text.split_once('\n').unwrap().1;
        assert!(!body.contains(' '));
        assert_eq!(decode(&text).unwrap().into_data(), vec![0u8; 90]);
    }

    #[test]
    fn accepts_space_for_zero() {
        // classic encoders emit spaces instead of backticks
        let text = "begin 644 z\n#    \n \nend\n";
        assert_eq!(decode(text).unwrap().into_data(), vec![0, 0, 0]);
    }

    #[test]
    fn accepts_crlf_lines() {
        let text = "begin 644 cat.txt\r\n#0V%T\r\n`\r\nend\r\n";
        assert_eq!(decode(text).unwrap().into_data(), b"Cat".to_vec());
    }

    #[test]
    fn keeps_name_and_mode() {
        let f = Frame::new("my report.pdf", 0o100755, b"x".to_vec()).unwrap();
        let back = decode(&encode(&f)).unwrap();
        assert_eq!(back.name(), "my report.pdf");
        assert_eq!(back.mode(), 0o755);
    }

    #[test]
    fn rejects_truncated_or_tampered_text() {
        let good = encode(&frame(b"hello world"));
        let cases = [
            String::new(),
            good.replacen("begin", "begun", 1),
            good.replace("end\n", ""),
            good.replace("`\nend\n", "end\n"),
            format!("{good}trailing"),
            good.replacen("644", "9x9", 1),
            // length char says 15 bytes but the line holds 11
            good.replacen("\n+", "\n/", 1),
            good.replacen("\n+", "\nz", 1),
        ];
        for bad in cases {
            assert!(
                matches!(decode(&bad), Err(SheetError::MalformedFrame(_))),
                "accepted {bad:?}"
            );
        }
    }

    #[test]
    fn rejects_non_zero_padding() {
        // "#0V%T" is "Cat"; one byte with a dirty padding sextet
        let text = "begin 644 x\n!0V%T\n`\nend\n";
        assert!(matches!(decode(text), Err(SheetError::MalformedFrame(_))));
    }

    #[test]
    fn header_mode_must_be_plain_octal() {
        for header in ["begin +644 x", "begin -644 x", "begin 648 x", "begin  x"] {
            let text = format!("{header}\n`\nend\n");
            assert!(
                matches!(decode(&text), Err(SheetError::MalformedFrame(_))),
                "accepted {header:?}"
            );
        }
        assert_eq!(decode("begin 0755 x\n`\nend\n").unwrap().mode(), 0o755);
    }

    #[test]
    fn rejects_multiline_names() {
        assert!(Frame::new("a\nb", 0o644, vec![]).is_err());
        assert!(Frame::new("", 0o644, vec![]).is_err());
    }
}
