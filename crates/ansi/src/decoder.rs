//! Incremental SGR decoder.
//!
//! Converts raw log text into HTML fragments, one chunk at a time. Style
//! state survives across chunks, and a sequence split by a chunk boundary is
//! held in a carry buffer and re-scanned once the rest arrives; the decoder
//! never emits or discards a possibly-incomplete sequence.

use crate::color::{Rgb, ansi16_to_rgb, ansi256_to_rgb};
use crate::html::escape_into;

/// The raw escape control byte.
const ESC: char = '\u{1b}';
/// Visible stand-in some backends substitute for the control byte when log
/// text crosses a serialization boundary. Compatibility shim; treated
/// identically to [`ESC`].
const ESC_GLYPH: char = '\u{241b}';

/// Text attributes accumulated from SGR parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleState {
    pub fg: Option<Rgb>,
    pub bg: Option<Rgb>,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

impl StyleState {
    fn is_plain(&self) -> bool {
        self.fg.is_none() && self.bg.is_none() && !self.bold && !self.italic && !self.underline
    }

    fn clear(&mut self) {
        *self = Self::default();
    }

    fn css(&self) -> String {
        let mut props = Vec::new();
        if let Some(fg) = self.fg {
            props.push(format!("color:{}", fg.css()));
        }
        if let Some(bg) = self.bg {
            props.push(format!("background-color:{}", bg.css()));
        }
        if self.bold {
            props.push("font-weight:bold".to_string());
        }
        if self.italic {
            props.push("font-style:italic".to_string());
        }
        if self.underline {
            props.push("text-decoration:underline".to_string());
        }
        props.join(";")
    }
}

/// Streaming ANSI/SGR decoder. One instance per log source; the owning
/// viewer resets it whenever stream continuity is lost.
#[derive(Debug, Clone, Default)]
pub struct AnsiStreamDecoder {
    style: StyleState,
    carry: String,
}

impl AnsiStreamDecoder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all style state and any buffered partial sequence.
    pub fn reset(&mut self) {
        self.style.clear();
        self.carry.clear();
    }

    /// Decode one chunk into an HTML fragment.
    ///
    /// A trailing unterminated escape sequence is stashed and prepended to
    /// the next chunk, so feeding a stream in arbitrary pieces renders the
    /// same styled text as feeding it whole.
    pub fn decode(&mut self, chunk: &str) -> String {
        let input = if self.carry.is_empty() {
            chunk.to_owned()
        } else {
            let mut held = std::mem::take(&mut self.carry);
            held.push_str(chunk);
            held
        };

        let mut out = String::with_capacity(input.len());
        let mut pos = 0;

        while let Some((rel, intro)) = find_introducer(&input[pos..]) {
            let idx = pos + rel;
            self.emit(&mut out, &input[pos..idx]);
            let after = idx + intro.len_utf8();

            if after == input.len() {
                // Introducer is the last char: defer to the next chunk.
                self.carry.push_str(&input[idx..]);
                return out;
            }

            if !input[after..].starts_with('[') {
                // Foreign escape: drop the introducer, rescan from here.
                pos = after;
                continue;
            }

            let body = after + 1;
            match input[body..]
                .char_indices()
                .find(|&(_, c)| ('\u{40}'..='\u{7e}').contains(&c))
            {
                None => {
                    // Unterminated sequence: stash it whole, never guess.
                    self.carry.push_str(&input[idx..]);
                    return out;
                }
                Some((rel, final_byte)) => {
                    let fin = body + rel;
                    if final_byte == 'm' {
                        self.apply_sgr(&input[body..fin]);
                    }
                    // Any other final byte is consumed with no style effect.
                    pos = fin + 1;
                }
            }
        }

        self.emit(&mut out, &input[pos..]);
        out
    }

    fn emit(&self, out: &mut String, text: &str) {
        if text.is_empty() {
            return;
        }
        if self.style.is_plain() {
            escape_into(out, text);
        } else {
            out.push_str("<span style=\"");
            out.push_str(&self.style.css());
            out.push_str("\">");
            escape_into(out, text);
            out.push_str("</span>");
        }
    }

    /// Apply one `;`-separated SGR parameter list. Non-numeric or unknown
    /// parameters are skipped without aborting the rest; an empty parameter
    /// counts as 0.
    fn apply_sgr(&mut self, raw: &str) {
        let params: Vec<Option<u16>> = raw
            .split(';')
            .map(|p| {
                if p.is_empty() {
                    Some(0)
                } else {
                    p.parse::<u32>().ok().map(|v| v.min(u16::MAX as u32) as u16)
                }
            })
            .collect();

        let mut i = 0;
        while i < params.len() {
            let Some(code) = params[i] else {
                i += 1;
                continue;
            };
            match code {
                0 => self.style.clear(),
                1 => self.style.bold = true,
                22 => self.style.bold = false,
                3 => self.style.italic = true,
                23 => self.style.italic = false,
                4 => self.style.underline = true,
                24 => self.style.underline = false,
                39 => self.style.fg = None,
                49 => self.style.bg = None,
                30..=37 => self.style.fg = Some(ansi16_to_rgb((code - 30) as u8)),
                90..=97 => self.style.fg = Some(ansi16_to_rgb((code - 90 + 8) as u8)),
                40..=47 => self.style.bg = Some(ansi16_to_rgb((code - 40) as u8)),
                100..=107 => self.style.bg = Some(ansi16_to_rgb((code - 100 + 8) as u8)),
                38 | 48 => {
                    let (color, used) = extended_color(&params[i + 1..]);
                    if let Some(rgb) = color {
                        if code == 38 {
                            self.style.fg = Some(rgb);
                        } else {
                            self.style.bg = Some(rgb);
                        }
                    }
                    i += used;
                }
                _ => {}
            }
            i += 1;
        }
    }
}

fn find_introducer(s: &str) -> Option<(usize, char)> {
    s.char_indices().find(|&(_, c)| c == ESC || c == ESC_GLYPH)
}

/// Resolve the tail of a `38;…`/`48;…` extended color. Returns the color (if
/// the sub-sequence was well formed) and how many parameters it consumed.
fn extended_color(params: &[Option<u16>]) -> (Option<Rgb>, usize) {
    match params.first().copied().flatten() {
        Some(5) => match params.get(1).copied().flatten() {
            Some(n) => (Some(ansi256_to_rgb(n.min(255) as u8)), 2),
            None => (None, params.len().min(2)),
        },
        Some(2) => {
            let r = params.get(1).copied().flatten();
            let g = params.get(2).copied().flatten();
            let b = params.get(3).copied().flatten();
            match (r, g, b) {
                (Some(r), Some(g), Some(b)) => (
                    Some(Rgb::new(
                        r.min(255) as u8,
                        g.min(255) as u8,
                        b.min(255) as u8,
                    )),
                    4,
                ),
                _ => (None, params.len().min(4)),
            }
        }
        Some(_) => (None, 1),
        None => (None, 0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::strip_markup;

    fn decode_all(chunks: &[&str]) -> String {
        let mut decoder = AnsiStreamDecoder::new();
        chunks.iter().map(|c| decoder.decode(c)).collect()
    }

    /// Collapse a fragment into (style, text) runs with adjacent same-style
    /// runs merged, so chunking differences in span boundaries don't matter.
    fn styled_runs(html: &str) -> Vec<(String, String)> {
        let mut runs: Vec<(String, String)> = Vec::new();
        let mut rest = html;
        while !rest.is_empty() {
            if let Some(tail) = rest.strip_prefix("<span style=\"") {
                let style_end = tail.find("\">").expect("span attribute terminator");
                let style = tail[..style_end].to_string();
                let body = &tail[style_end + 2..];
                let body_end = body.find("</span>").expect("span close tag");
                push_run(&mut runs, style, strip_markup(&body[..body_end]));
                rest = &body[body_end + "</span>".len()..];
            } else {
                let end = rest.find("<span").unwrap_or(rest.len());
                push_run(&mut runs, String::new(), strip_markup(&rest[..end]));
                rest = &rest[end..];
            }
        }
        runs
    }

    fn push_run(runs: &mut Vec<(String, String)>, style: String, text: String) {
        if text.is_empty() {
            return;
        }
        match runs.last_mut() {
            Some((last_style, last_text)) if *last_style == style => last_text.push_str(&text),
            _ => runs.push((style, text)),
        }
    }

    #[test]
    fn plain_text_passes_through_escaped() {
        let mut decoder = AnsiStreamDecoder::new();
        assert_eq!(decoder.decode("a < b & c"), "a &lt; b &amp; c");
    }

    #[test]
    fn basic_color_wraps_in_styled_span() {
        let mut decoder = AnsiStreamDecoder::new();
        assert_eq!(
            decoder.decode("\u{1b}[31mHello"),
            "<span style=\"color:#cd0000\">Hello</span>"
        );
    }

    #[test]
    fn split_inside_escape_sequence_is_exact() {
        // The carry buffer makes mid-sequence splits byte-for-byte identical.
        let whole = decode_all(&["\u{1b}[31mHello"]);
        assert_eq!(decode_all(&["\u{1b}[3", "1mHello"]), whole);
        assert_eq!(decode_all(&["\u{1b}", "[31mHello"]), whole);
        assert_eq!(decode_all(&["\u{1b}[31m", "Hello"]), whole);
    }

    #[test]
    fn every_split_point_renders_the_same_runs() {
        let streams = [
            "plain \u{1b}[1mbold text\u{1b}[0m done",
            "\u{1b}[38;5;196mred\u{1b}[48;2;0;0;255m on blue\u{1b}[0m",
            "héllo \u{241b}[32mgrün\u{241b}[0m wörld",
            "a\u{1b}Zb\u{1b}[2Jc\u{1b}[4munder",
            "mix <tags> & \u{1b}[90;103mbright\u{1b}[39m tail",
        ];
        for stream in streams {
            let whole = styled_runs(&decode_all(&[stream]));
            let boundaries: Vec<usize> = stream.char_indices().map(|(i, _)| i).collect();
            for split in boundaries {
                let halves = [&stream[..split], &stream[split..]];
                assert_eq!(
                    styled_runs(&decode_all(&halves)),
                    whole,
                    "split at byte {split} of {stream:?}"
                );
            }
        }
    }

    #[test]
    fn bold_run_spans_chunk_boundary() {
        let html = decode_all(&["plain \u{1b}[1mbold", " text\u{1b}[0m done"]);
        assert_eq!(
            styled_runs(&html),
            vec![
                (String::new(), "plain ".to_string()),
                ("font-weight:bold".to_string(), "bold text".to_string()),
                (String::new(), " done".to_string()),
            ]
        );
    }

    #[test]
    fn sgr_zero_clears_every_attribute() {
        let mut decoder = AnsiStreamDecoder::new();
        decoder.decode("\u{1b}[1;3;4;31;44m");
        assert!(!decoder.style.is_plain());
        decoder.decode("\u{1b}[0m");
        assert!(decoder.style.is_plain());
        assert_eq!(decoder.decode("plain"), "plain");
    }

    #[test]
    fn attribute_toggles_turn_off_individually() {
        let mut decoder = AnsiStreamDecoder::new();
        decoder.decode("\u{1b}[1;4;31m");
        let html = decoder.decode("\u{1b}[22;24mx");
        assert_eq!(html, "<span style=\"color:#cd0000\">x</span>");
        let html = decoder.decode("\u{1b}[39my");
        assert_eq!(html, "y");
    }

    #[test]
    fn extended_colors_resolve_to_rgb() {
        let mut decoder = AnsiStreamDecoder::new();
        assert_eq!(
            decoder.decode("\u{1b}[38;5;196mr"),
            "<span style=\"color:#ff0000\">r</span>"
        );
        decoder.reset();
        assert_eq!(
            decoder.decode("\u{1b}[38;5;244mg"),
            "<span style=\"color:#808080\">g</span>"
        );
        decoder.reset();
        assert_eq!(
            decoder.decode("\u{1b}[48;2;300;128;0mt"),
            "<span style=\"background-color:#ff8000\">t</span>"
        );
    }

    #[test]
    fn truecolor_with_missing_channels_is_skipped() {
        let mut decoder = AnsiStreamDecoder::new();
        assert_eq!(decoder.decode("\u{1b}[38;2;10;20mx"), "x");
        assert!(decoder.style.is_plain());
    }

    #[test]
    fn unknown_and_garbage_parameters_do_not_abort_the_list() {
        let mut decoder = AnsiStreamDecoder::new();
        let html = decoder.decode("\u{1b}[31;zz;1mx");
        assert_eq!(html, "<span style=\"color:#cd0000;font-weight:bold\">x</span>");
    }

    #[test]
    fn empty_parameter_list_resets() {
        let mut decoder = AnsiStreamDecoder::new();
        decoder.decode("\u{1b}[1;31m");
        assert_eq!(decoder.decode("\u{1b}[mx"), "x");
    }

    #[test]
    fn non_sgr_sequences_are_consumed_silently() {
        let mut decoder = AnsiStreamDecoder::new();
        assert_eq!(decoder.decode("a\u{1b}[2Jb\u{1b}[10;20Hc"), "abc");
        assert!(decoder.style.is_plain());
    }

    #[test]
    fn foreign_escape_drops_only_the_introducer() {
        let mut decoder = AnsiStreamDecoder::new();
        assert_eq!(decoder.decode("a\u{1b}Zb"), "aZb");
    }

    #[test]
    fn trailing_introducer_defers_to_next_chunk() {
        let mut decoder = AnsiStreamDecoder::new();
        assert_eq!(decoder.decode("abc\u{1b}"), "abc");
        assert_eq!(decoder.decode("[31mx"), "<span style=\"color:#cd0000\">x</span>");
    }

    #[test]
    fn unterminated_sequence_is_never_emitted() {
        let mut decoder = AnsiStreamDecoder::new();
        assert_eq!(decoder.decode("\u{1b}[38;5;1"), "");
        // Carry + "96m" reassembles 38;5;196, the cube's pure-red corner.
        assert_eq!(
            decoder.decode("96mx"),
            "<span style=\"color:#ff0000\">x</span>"
        );
    }

    #[test]
    fn glyph_introducer_matches_control_byte() {
        let control = decode_all(&["\u{1b}[35mtext\u{1b}[0m"]);
        let glyph = decode_all(&["\u{241b}[35mtext\u{241b}[0m"]);
        assert_eq!(control, glyph);
    }

    #[test]
    fn reset_drops_carry_and_style() {
        let mut decoder = AnsiStreamDecoder::new();
        decoder.decode("\u{1b}[31mx\u{1b}[");
        decoder.reset();
        assert_eq!(decoder.decode("hi"), "hi");
    }

    #[test]
    fn strip_markup_recovers_plain_text() {
        let mut decoder = AnsiStreamDecoder::new();
        let html = decoder.decode("plain \u{1b}[1;32m<ok>\u{1b}[0m & done");
        assert_eq!(strip_markup(&html), "plain <ok> & done");
    }
}
