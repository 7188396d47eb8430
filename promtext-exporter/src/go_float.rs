//! Float rendering compatible with Go's `strconv.FormatFloat(v, 'g', -1, 64)`.
//!
//! Scrapers and fixtures written against the Go client expect this exact
//! text, so `f64::to_string` (no exponent, `inf`) cannot be used. The
//! shortest round-trip digits come from Rust's `{:e}` formatting, which
//! selects the same digit string as Go; only the layout differs.

use std::fmt::{self, Write as _};

/// Go switches to exponent form at this decimal exponent in shortest mode.
const EXP_THRESHOLD: i32 = 6;

/// `{:e}` of any finite f64 fits: 17 digits, the point, and `e-324`.
const SCRATCH_LEN: usize = 32;

/// Render `value` as Go would.
pub fn format_go_float(value: f64) -> String {
    let mut out = String::with_capacity(24);
    append_go_float(&mut out, value);
    out
}

/// Append the Go rendering of `value` to `out`.
pub fn append_go_float(out: &mut String, value: f64) {
    if value.is_nan() {
        out.push_str("NaN");
        return;
    }
    if value.is_infinite() {
        out.push_str(if value > 0.0 { "+Inf" } else { "-Inf" });
        return;
    }
    if value.is_sign_negative() {
        out.push('-');
    }
    if value == 0.0 {
        out.push('0');
        return;
    }

    let mut scratch = Scratch::default();
    let written = write!(scratch, "{:e}", value.abs());
    debug_assert!(written.is_ok(), "scientific form exceeded scratch buffer");

    let (digits, exp) = scratch.split();
    if !(-4..EXP_THRESHOLD).contains(&exp) {
        push_exponent_form(out, digits, exp);
    } else {
        push_fixed_form(out, digits, exp);
    }
}

/// `d[.ddd]e±XX`, exponent at least two digits.
fn push_exponent_form(out: &mut String, digits: &[u8], exp: i32) {
    out.push(digits[0] as char);
    if digits.len() > 1 {
        out.push('.');
        push_digits(out, &digits[1..]);
    }
    out.push('e');
    out.push(if exp < 0 { '-' } else { '+' });
    let abs = exp.unsigned_abs();
    if abs < 10 {
        out.push('0');
    }
    let mut buf = itoa::Buffer::new();
    out.push_str(buf.format(abs));
}

/// Plain decimal for `-4 <= exp < 6`.
fn push_fixed_form(out: &mut String, digits: &[u8], exp: i32) {
    if exp < 0 {
        out.push_str("0.");
        for _ in 0..(-exp - 1) {
            out.push('0');
        }
        push_digits(out, digits);
        return;
    }

    let int_len = exp as usize + 1;
    if digits.len() <= int_len {
        push_digits(out, digits);
        for _ in digits.len()..int_len {
            out.push('0');
        }
    } else {
        push_digits(out, &digits[..int_len]);
        out.push('.');
        push_digits(out, &digits[int_len..]);
    }
}

fn push_digits(out: &mut String, digits: &[u8]) {
    out.extend(digits.iter().map(|&d| d as char));
}

/// Stack buffer receiving Rust's `{:e}` output, e.g. `1.2345e-5`.
struct Scratch {
    buf: [u8; SCRATCH_LEN],
    len: usize,
}

impl Default for Scratch {
    fn default() -> Self {
        Self {
            buf: [0; SCRATCH_LEN],
            len: 0,
        }
    }
}

impl fmt::Write for Scratch {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        let end = self.len + s.len();
        if end > SCRATCH_LEN {
            return Err(fmt::Error);
        }
        self.buf[self.len..end].copy_from_slice(s.as_bytes());
        self.len = end;
        Ok(())
    }
}

impl Scratch {
    /// Pull the mantissa digits (point removed, in place) and the decimal
    /// exponent out of the scientific form.
    fn split(&mut self) -> (&[u8], i32) {
        let raw = &mut self.buf[..self.len];
        let e_pos = raw.iter().position(|&b| b == b'e').unwrap_or(raw.len());

        let mut exp: i32 = 0;
        let mut negative = false;
        for &b in &raw[(e_pos + 1).min(raw.len())..] {
            match b {
                b'-' => negative = true,
                b'0'..=b'9' => exp = exp * 10 + i32::from(b - b'0'),
                _ => {}
            }
        }
        if negative {
            exp = -exp;
        }

        let mut n = 0;
        for i in 0..e_pos {
            if raw[i] != b'.' {
                raw[n] = raw[i];
                n += 1;
            }
        }
        (&self.buf[..n], exp)
    }
}
