/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::ast::{Token, TokenType};
use crate::minifier::MinifierPlugin;

/// Return the shortest hex notation of a named color,
/// if that notation is shorter than the name.
///
/// Matching is case-insensitive in the ASCII range.
///
/// <https://w3c.github.io/csswg-drafts/css-color-4/#color-keywords>
pub fn short_hex_for_color_keyword(ident: &str) -> Option<&'static str> {
    ascii_case_insensitive_phf_map! {
        hex_from_named_color -> &'static str = {
            "aliceblue" => "#f0f8ff",
            "antiquewhite" => "#faebd7",
            "aquamarine" => "#7fffd4",
            "black" => "#000",
            "blanchedalmond" => "#ffebcd",
            "blueviolet" => "#8a2be2",
            "burlywood" => "#deb887",
            "cadetblue" => "#5f9ea0",
            "chartreuse" => "#7fff00",
            "chocolate" => "#d2691e",
            "cornflowerblue" => "#6495ed",
            "cornsilk" => "#fff8dc",
            "darkblue" => "#00008b",
            "darkcyan" => "#008b8b",
            "darkgoldenrod" => "#b8860b",
            "darkgray" => "#a9a9a9",
            "darkgreen" => "#006400",
            "darkgrey" => "#a9a9a9",
            "darkkhaki" => "#bdb76b",
            "darkmagenta" => "#8b008b",
            "darkolivegreen" => "#556b2f",
            "darkorange" => "#ff8c00",
            "darkorchid" => "#9932cc",
            "darksalmon" => "#e9967a",
            "darkseagreen" => "#8fbc8f",
            "darkslateblue" => "#483d8b",
            "darkslategray" => "#2f4f4f",
            "darkslategrey" => "#2f4f4f",
            "darkturquoise" => "#00ced1",
            "darkviolet" => "#9400d3",
            "deeppink" => "#ff1493",
            "deepskyblue" => "#00bfff",
            "dodgerblue" => "#1e90ff",
            "firebrick" => "#b22222",
            "floralwhite" => "#fffaf0",
            "forestgreen" => "#228b22",
            "fuchsia" => "#f0f",
            "gainsboro" => "#dcdcdc",
            "ghostwhite" => "#f8f8ff",
            "goldenrod" => "#daa520",
            "greenyellow" => "#adff2f",
            "honeydew" => "#f0fff0",
            "indianred" => "#cd5c5c",
            "lavender" => "#e6e6fa",
            "lavenderblush" => "#fff0f5",
            "lawngreen" => "#7cfc00",
            "lemonchiffon" => "#fffacd",
            "lightblue" => "#add8e6",
            "lightcoral" => "#f08080",
            "lightcyan" => "#e0ffff",
            "lightgoldenrodyellow" => "#fafad2",
            "lightgray" => "#d3d3d3",
            "lightgreen" => "#90ee90",
            "lightgrey" => "#d3d3d3",
            "lightpink" => "#ffb6c1",
            "lightsalmon" => "#ffa07a",
            "lightseagreen" => "#20b2aa",
            "lightskyblue" => "#87cefa",
            "lightslategray" => "#789",
            "lightslategrey" => "#789",
            "lightsteelblue" => "#b0c4de",
            "lightyellow" => "#ffffe0",
            "limegreen" => "#32cd32",
            "magenta" => "#f0f",
            "mediumaquamarine" => "#66cdaa",
            "mediumblue" => "#0000cd",
            "mediumorchid" => "#ba55d3",
            "mediumpurple" => "#9370db",
            "mediumseagreen" => "#3cb371",
            "mediumslateblue" => "#7b68ee",
            "mediumspringgreen" => "#00fa9a",
            "mediumturquoise" => "#48d1cc",
            "mediumvioletred" => "#c71585",
            "midnightblue" => "#191970",
            "mintcream" => "#f5fffa",
            "mistyrose" => "#ffe4e1",
            "moccasin" => "#ffe4b5",
            "navajowhite" => "#ffdead",
            "olivedrab" => "#6b8e23",
            "orangered" => "#ff4500",
            "palegoldenrod" => "#eee8aa",
            "palegreen" => "#98fb98",
            "paleturquoise" => "#afeeee",
            "palevioletred" => "#db7093",
            "papayawhip" => "#ffefd5",
            "peachpuff" => "#ffdab9",
            "powderblue" => "#b0e0e6",
            "rebeccapurple" => "#639",
            "rosybrown" => "#bc8f8f",
            "royalblue" => "#4169e1",
            "saddlebrown" => "#8b4513",
            "sandybrown" => "#f4a460",
            "seagreen" => "#2e8b57",
            "seashell" => "#fff5ee",
            "slateblue" => "#6a5acd",
            "slategray" => "#708090",
            "slategrey" => "#708090",
            "springgreen" => "#00ff7f",
            "steelblue" => "#4682b4",
            "turquoise" => "#40e0d0",
            "white" => "#fff",
            "whitesmoke" => "#f5f5f5",
            "yellow" => "#ff0",
            "yellowgreen" => "#9acd32",
        }
    }
    hex_from_named_color(ident).cloned()
}

/// If a quoted string or a `url()` starts at byte `start` of `value`,
/// return the byte index right after it.
///
/// An unclosed string or `url(` runs to the end of `value`.
fn literal_end(value: &str, start: usize) -> Option<usize> {
    let rest = &value[start..];
    let first = rest.chars().next()?;
    if first == '"' || first == '\'' {
        let mut chars = rest.char_indices().skip(1);
        while let Some((offset, c)) = chars.next() {
            if c == '\\' {
                chars.next();
            } else if c == first {
                return Some(start + offset + 1);
            }
        }
        return Some(value.len());
    }
    if rest.get(..4).map_or(false, |name| name.eq_ignore_ascii_case("url(")) {
        return Some(rest.find(')').map_or(value.len(), |offset| start + offset + 1));
    }
    None
}

/// Whether the value of `property` may hold color keywords.
///
/// Other properties use the same words as plain identifiers,
/// e.g. `animation-name: white`.
fn takes_color(property: &str) -> bool {
    if property.starts_with("--") {
        return false;
    }
    let property = property.to_ascii_lowercase();
    property.ends_with("-color")
        || property.ends_with("-shadow")
        || match_ignore_ascii_case! { &property,
            "color" | "background" | "border" | "border-top" | "border-right"
            | "border-bottom" | "border-left" | "border-block" | "border-block-start"
            | "border-block-end" | "border-inline" | "border-inline-start"
            | "border-inline-end" | "outline" | "column-rule" | "text-decoration"
            | "text-emphasis" | "fill" | "stroke" => true,
            _ => false,
        }
}

/// Replaces color names by their hex notation where that is shorter,
/// e.g. `white` by `#fff`.
///
/// Only properties that take colors are rewritten,
/// and only whole words of their value,
/// words being separated by whitespace or commas.
/// Quoted strings and `url()` arguments are left alone.
#[derive(Default)]
pub struct ConvertNamedColors;

impl ConvertNamedColors {
    /// Create the plugin.
    #[inline]
    pub fn new() -> ConvertNamedColors {
        ConvertNamedColors
    }
}

#[inline]
fn is_word_separator(c: char) -> bool {
    c == ',' || c.is_whitespace()
}

impl MinifierPlugin for ConvertNamedColors {
    fn trigger_tokens(&self) -> &[TokenType] {
        &[TokenType::RulesetDeclaration]
    }

    fn apply(&mut self, token: &mut Token) -> bool {
        let declaration = match token.declaration_mut() {
            Some(declaration) => declaration,
            None => return false,
        };
        if !takes_color(&declaration.property) {
            return false;
        }

        let value = &declaration.value;
        let mut converted = String::with_capacity(value.len());
        let mut changed = false;
        let mut position = 0;
        while position < value.len() {
            if let Some(end) = literal_end(value, position) {
                converted.push_str(&value[position..end]);
                position = end;
                continue;
            }
            let rest = &value[position..];
            let word_end = rest
                .find(|c: char| is_word_separator(c) || c == '"' || c == '\'')
                .unwrap_or_else(|| rest.len());
            if word_end == 0 {
                let c = match rest.chars().next() {
                    Some(c) => c,
                    None => break,
                };
                converted.push(c);
                position += c.len_utf8();
                continue;
            }
            let word = &rest[..word_end];
            match short_hex_for_color_keyword(word) {
                Some(hex) => {
                    converted.push_str(hex);
                    changed = true;
                }
                None => converted.push_str(word),
            }
            position += word_end;
        }
        if changed {
            declaration.value = converted;
        }
        false
    }
}

/// Find the first `#` followed by exactly six hex digits,
/// outside of quoted strings and `url()` arguments.
fn find_six_digit_hex(value: &str) -> Option<usize> {
    let bytes = value.as_bytes();
    let mut position = 0;
    while position < value.len() {
        if let Some(end) = literal_end(value, position) {
            position = end;
            continue;
        }
        if bytes[position] == b'#' {
            let digits_are_hex = bytes
                .get(position + 1..position + 7)
                .map_or(false, |digits| digits.iter().all(u8::is_ascii_hexdigit));
            // `#rrggbbaa` has no three digit equivalent.
            if digits_are_hex && !bytes.get(position + 7).map_or(false, u8::is_ascii_hexdigit) {
                return Some(position);
            }
        }
        position += value[position..].chars().next().map_or(1, char::len_utf8);
    }
    None
}

/// Converts six digit hex colors to their three digit notation, when possible.
///
/// `color: #aabbcc` becomes `color: #abc`.
/// Only the first six digit hex color of a value is considered.
#[derive(Default)]
pub struct CompressColorValues;

impl CompressColorValues {
    /// Create the plugin.
    #[inline]
    pub fn new() -> CompressColorValues {
        CompressColorValues
    }
}

impl MinifierPlugin for CompressColorValues {
    fn trigger_tokens(&self) -> &[TokenType] {
        &[TokenType::RulesetDeclaration]
    }

    fn apply(&mut self, token: &mut Token) -> bool {
        let declaration = match token.declaration_mut() {
            Some(declaration) => declaration,
            None => return false,
        };
        if !declaration.value.contains('#') {
            return false;
        }
        if let Some(position) = find_six_digit_hex(&declaration.value) {
            let digits = declaration.value[position + 1..position + 7].to_ascii_lowercase();
            let d = digits.as_bytes();
            if d[0] == d[1] && d[2] == d[3] && d[4] == d[5] {
                let short = format!("#{}{}{}", d[0] as char, d[2] as char, d[4] as char);
                declaration.value.replace_range(position..position + 7, &short);
            }
        }
        false
    }
}
