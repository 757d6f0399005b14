/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// One of the pieces the parser breaks a stylesheet into.
///
/// Unlike a syntax tree, tokens are flat:
/// blocks are delimited by matching start and end tokens.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum Token {
    /// The selector list of a ruleset, sent when its `{` is reached.
    RulesetStart {
        /// Selectors in source order, trimmed.
        selectors: Vec<String>,
    },

    /// A `property: value` pair inside a ruleset.
    RulesetDeclaration(Declaration),

    /// The `}` closing a ruleset.
    RulesetEnd,

    /// The prelude of an `@media` block.
    AtMediaStart {
        /// Comma separated media queries, trimmed.
        media_types: Vec<String>,
    },

    /// The `}` closing an `@media` block.
    AtMediaEnd,

    /// A comment, including the `/*` and `*/` markers.
    Comment(String),

    /// An `@charset` rule, with its quoted encoding name as written.
    AtCharset(String),

    /// An `@import` rule, with everything between the keyword and the `;`.
    AtImport(String),

    /// The opening of a block at-rule other than `@media`,
    /// such as `@font-face`, `@page` or `@keyframes`.
    AtBlockStart {
        /// The at-keyword without its `@`, lower-cased.
        keyword: String,
        /// The text between the keyword and the `{`, trimmed.
        prelude: String,
    },

    /// The `}` closing a block at-rule.
    AtBlockEnd,
}

/// A single declaration of a ruleset or of a declaration block at-rule.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Declaration {
    /// The property name, lower-cased.
    pub property: String,
    /// The raw value, without the `!important` marker.
    pub value: String,
    /// The media types of the enclosing `@media` block, if any.
    pub media_types: Vec<String>,
    /// Whether the value was followed by `!important`.
    pub important: bool,
}

/// The kind of a `Token`, without its payload.
///
/// Minifier plugins are registered against these.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// `Token::RulesetStart`
    RulesetStart,
    /// `Token::RulesetDeclaration`
    RulesetDeclaration,
    /// `Token::RulesetEnd`
    RulesetEnd,
    /// `Token::AtMediaStart`
    AtMediaStart,
    /// `Token::AtMediaEnd`
    AtMediaEnd,
    /// `Token::Comment`
    Comment,
    /// `Token::AtCharset`
    AtCharset,
    /// `Token::AtImport`
    AtImport,
    /// `Token::AtBlockStart`
    AtBlockStart,
    /// `Token::AtBlockEnd`
    AtBlockEnd,
}

impl Token {
    /// Return the kind of this token.
    #[inline]
    pub fn token_type(&self) -> TokenType {
        match *self {
            Token::RulesetStart { .. } => TokenType::RulesetStart,
            Token::RulesetDeclaration(_) => TokenType::RulesetDeclaration,
            Token::RulesetEnd => TokenType::RulesetEnd,
            Token::AtMediaStart { .. } => TokenType::AtMediaStart,
            Token::AtMediaEnd => TokenType::AtMediaEnd,
            Token::Comment(_) => TokenType::Comment,
            Token::AtCharset(_) => TokenType::AtCharset,
            Token::AtImport(_) => TokenType::AtImport,
            Token::AtBlockStart { .. } => TokenType::AtBlockStart,
            Token::AtBlockEnd => TokenType::AtBlockEnd,
        }
    }

    /// Return the declaration carried by this token, if any.
    #[inline]
    pub fn declaration(&self) -> Option<&Declaration> {
        match *self {
            Token::RulesetDeclaration(ref declaration) => Some(declaration),
            _ => None,
        }
    }

    /// Mutable access to the declaration carried by this token, if any.
    #[inline]
    pub fn declaration_mut(&mut self) -> Option<&mut Declaration> {
        match *self {
            Token::RulesetDeclaration(ref mut declaration) => Some(declaration),
            _ => None,
        }
    }

    /// Whether this token opens a block that a later token closes.
    pub fn is_block_start(&self) -> bool {
        matches!(
            *self,
            Token::RulesetStart { .. } | Token::AtMediaStart { .. } | Token::AtBlockStart { .. }
        )
    }

    /// Whether `self` opens a block and `end` is the token that closes it.
    pub fn is_closed_by(&self, end: &Token) -> bool {
        matches!(
            (self, end),
            (Token::RulesetStart { .. }, Token::RulesetEnd)
                | (Token::AtMediaStart { .. }, Token::AtMediaEnd)
                | (Token::AtBlockStart { .. }, Token::AtBlockEnd)
        )
    }
}
