//! Reference-client style rendering of command replies.
//!
//! Every reply becomes a sequence of display lines:
//!
//! ```text
//! 1) "a"
//! 2) 1) "x"
//!    2) (nil)
//! 3) (empty array)
//! ```
//!
//! Each item marker is `"{n}) "`. Nested numbering repeats the parent marker
//! on the first child only; later children replace the inherited prefix with
//! spaces of the same width so their markers line up under the first one.

#[cfg(test)]
mod renderer_test;

use crate::value::ResultValue;
use std::io::{self, Write};

pub const NIL_MARKER: &str = "(nil)";
pub const EMPTY_ARRAY_MARKER: &str = "(empty array)";

/// Render `value` lazily, one display line per item.
///
/// `quote_scalars` applies only to a scalar at the top of the call; scalars
/// inside sequences are always quoted.
pub fn render<'a>(value: &'a ResultValue, prefix: &str, quote_scalars: bool) -> Lines<'a> {
    Lines {
        stack: vec![Frame {
            value,
            prefix: prefix.to_string(),
            quote: quote_scalars,
        }],
    }
}

pub fn render_lines(value: &ResultValue, prefix: &str, quote_scalars: bool) -> Vec<String> {
    render(value, prefix, quote_scalars).collect()
}

/// Write every rendered line, newline-terminated and in order, to `sink`.
pub fn write_lines<W: Write>(value: &ResultValue, sink: &mut W) -> io::Result<()> {
    for line in render(value, "", true) {
        writeln!(sink, "{line}")?;
    }
    Ok(())
}

struct Frame<'a> {
    value: &'a ResultValue,
    prefix: String,
    quote: bool,
}

/// Pre-order walk over a reply with an explicit stack, so arbitrarily deep
/// replies never grow the call stack.
pub struct Lines<'a> {
    stack: Vec<Frame<'a>>,
}

impl Iterator for Lines<'_> {
    type Item = String;

    fn next(&mut self) -> Option<String> {
        loop {
            let Frame {
                value,
                prefix,
                quote,
            } = self.stack.pop()?;

            match value {
                ResultValue::Nil => return Some(format!("{prefix}{NIL_MARKER}")),
                ResultValue::Scalar(text) => return Some(scalar_line(&prefix, text, quote)),
                ResultValue::Integer(n) => return Some(format!("{prefix}{n}")),
                ResultValue::Number(text) => return Some(format!("{prefix}{text}")),
                ResultValue::Sequence(items) if items.is_empty() => {
                    return Some(scalar_line(&prefix, EMPTY_ARRAY_MARKER, false));
                }
                ResultValue::Sequence(items) => {
                    let padding = " ".repeat(prefix.chars().count());
                    // Reverse so the first child is popped first.
                    for (index, item) in items.iter().enumerate().rev() {
                        let item_prefix = if index == 0 {
                            format!("{prefix}{}) ", index + 1)
                        } else {
                            format!("{padding}{}) ", index + 1)
                        };
                        self.stack.push(Frame {
                            value: item,
                            prefix: item_prefix,
                            quote: true,
                        });
                    }
                }
            }
        }
    }
}

fn scalar_line(prefix: &str, text: &str, quote: bool) -> String {
    if quote {
        format!("{prefix}\"{text}\"")
    } else {
        format!("{prefix}{text}")
    }
}
