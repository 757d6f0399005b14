/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::fmt;

use crate::ast::{Declaration, Token};

/// Trait for things the can serialize themselves in CSS syntax.
pub trait ToCss {
    /// Serialize `self` in CSS syntax, writing to `dest`.
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write;

    /// Serialize `self` in CSS syntax and return a string.
    ///
    /// (This is a convenience wrapper for `to_css` and probably should not be overridden.)
    #[inline]
    fn to_css_string(&self) -> String {
        let mut s = String::new();
        self.to_css(&mut s).unwrap();
        s
    }
}

fn write_list<W>(items: &[String], dest: &mut W) -> fmt::Result
where
    W: fmt::Write,
{
    let mut first = true;
    for item in items {
        if !first {
            dest.write_char(',')?;
        }
        first = false;
        dest.write_str(item)?;
    }
    Ok(())
}

impl Declaration {
    fn to_css_without_semicolon<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        dest.write_str(&self.property)?;
        dest.write_char(':')?;
        dest.write_str(&self.value)?;
        if self.important {
            dest.write_str("!important")?;
        }
        Ok(())
    }
}

impl ToCss for Declaration {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        self.to_css_without_semicolon(dest)?;
        dest.write_char(';')
    }
}

impl ToCss for Token {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        match *self {
            Token::RulesetStart { ref selectors } => {
                write_list(selectors, dest)?;
                dest.write_char('{')
            }
            Token::RulesetDeclaration(ref declaration) => declaration.to_css(dest),
            Token::RulesetEnd | Token::AtMediaEnd | Token::AtBlockEnd => dest.write_char('}'),
            Token::AtMediaStart { ref media_types } => {
                dest.write_str("@media ")?;
                write_list(media_types, dest)?;
                dest.write_char('{')
            }
            Token::Comment(ref text) => dest.write_str(text),
            Token::AtCharset(ref charset) => write!(dest, "@charset {};", charset),
            Token::AtImport(ref import) => write!(dest, "@import {};", import),
            Token::AtBlockStart {
                ref keyword,
                ref prelude,
            } => {
                dest.write_char('@')?;
                dest.write_str(keyword)?;
                if !prelude.is_empty() {
                    dest.write_char(' ')?;
                    dest.write_str(prelude)?;
                }
                dest.write_char('{')
            }
        }
    }
}

/// A token sequence serializes to a stylesheet.
///
/// The last declaration of a block loses its `;`.
impl ToCss for [Token] {
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        let mut tokens = self.iter().peekable();
        while let Some(token) = tokens.next() {
            match (token, tokens.peek()) {
                (
                    &Token::RulesetDeclaration(ref declaration),
                    Some(&&Token::RulesetEnd) | Some(&&Token::AtBlockEnd),
                ) => declaration.to_css_without_semicolon(dest)?,
                _ => token.to_css(dest)?,
            }
        }
        Ok(())
    }
}

impl ToCss for Vec<Token> {
    #[inline]
    fn to_css<W>(&self, dest: &mut W) -> fmt::Result
    where
        W: fmt::Write,
    {
        self[..].to_css(dest)
    }
}
