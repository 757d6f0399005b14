/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

#![crate_name = "cssmin"]
#![crate_type = "rlib"]
#![deny(missing_docs)]

/*!

A CSS minifier.

# Parsing

A `Parser` reads the input one character at a time.
It keeps a stack of lexical `State`s and a text buffer in a `ParserContext`,
and offers each character to the `ParserPlugin`s registered for that character
in the active state, in registration order, until one of them claims it.
Characters nobody claims accumulate in the buffer.
Plugins read the buffer at delimiters and append `Token`s.

# Minifying

A `Minifier` first filters the token sequence (comments, empty blocks),
then offers each token to the `MinifierPlugin`s registered for its `TokenType`,
which rewrite it in place.
The result serializes back to CSS with `ToCss`.

```rust
let css = cssmin::minify("a, b { color: #AABBCC; background: white !important; }").unwrap();
assert_eq!(css, "a,b{color:#abc;background:#fff!important}");
```

*/

#[doc(hidden)]
pub use cssmin_macros::*;
#[doc(hidden)]
pub use phf as _cssmin_internal_phf;

#[macro_use]
mod macros;

pub use crate::ast::{Declaration, Token, TokenType};
pub use crate::at_rules::{AtMediaParserPlugin, AtRuleParserPlugin};
pub use crate::color::{short_hex_for_color_keyword, CompressColorValues, ConvertNamedColors};
pub use crate::comments_and_strings::{CommentParserPlugin, StringParserPlugin};
pub use crate::error::{CssError, ParseError, ParseErrorKind, SourceLocation};
#[doc(hidden)]
pub use crate::macros::_cssmin_internal_to_lowercase;
pub use crate::minifier::{Minifier, MinifierOptions, MinifierPlugin, MinifierPluginRegistry};
pub use crate::parser::{
    Claim, Delimiter, Delimiters, Parser, ParserContext, ParserOptions, ParserPlugin,
    ParserPluginRegistry, State,
};
pub use crate::rules_and_declarations::{parse_important, RulesetParserPlugin};
pub use crate::serializer::ToCss;

/// Parse `input` with the default plugins, minify it with the default options,
/// and serialize the result.
pub fn minify(input: &str) -> Result<String, ParseError> {
    let mut tokens = Parser::new().parse(input)?;
    Minifier::new().minify(&mut tokens);
    Ok(tokens.to_css_string())
}

mod ast;
mod at_rules;
mod color;
mod comments_and_strings;
mod error;
mod minifier;
mod parser;
mod rules_and_declarations;
mod serializer;

#[cfg(test)]
mod tests;
