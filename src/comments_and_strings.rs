/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::ast::Token;
use crate::error::{ParseError, ParseErrorKind};
use crate::parser::{Claim, ParserContext, ParserPlugin, State};

const BUILTIN_STATES: &[State] = &[
    State::Document,
    State::AtMediaPrepare,
    State::AtMedia,
    State::RulesetSelectors,
    State::Ruleset,
    State::RulesetDeclaration,
    State::AtRulePrepare,
    State::AtRuleBlock,
    State::AtRuleDeclarations,
    State::AtRuleDeclaration,
];

/// Emits a `Comment` token for each `/* ... */`.
///
/// The comment is read in one go by looking ahead in the source,
/// so its content never reaches the buffer.
#[derive(Default)]
pub struct CommentParserPlugin;

impl CommentParserPlugin {
    /// Create the plugin.
    #[inline]
    pub fn new() -> CommentParserPlugin {
        CommentParserPlugin
    }
}

impl ParserPlugin for CommentParserPlugin {
    fn trigger_chars(&self) -> &[char] {
        &['*']
    }

    fn trigger_states(&self) -> &[State] {
        BUILTIN_STATES
    }

    fn parse(
        &mut self,
        context: &mut ParserContext<'_>,
        index: usize,
        _c: char,
        previous: Option<char>,
        _state: State,
    ) -> Result<Claim, ParseError> {
        // The `/` must be unclaimed text, not the end of a previous comment.
        if previous != Some('/') || !context.buffer().ends_with('/') {
            return Ok(Claim::Declined);
        }
        let source = context.source();
        // The closing `*` can not be the opening one: `/*/` is still open.
        let mut end = None;
        let mut position = index + 2;
        while position < source.len() {
            if source[position] == '/' && source[position - 1] == '*' {
                end = Some(position);
                break;
            }
            position += 1;
        }
        let end = match end {
            Some(end) => end,
            None => return Err(context.new_error(ParseErrorKind::UnterminatedComment)),
        };
        context.pop_from_buffer('/');
        let mut text = String::with_capacity(end - index + 2);
        text.push('/');
        text.extend(&source[index..=end]);
        context.append_token(Token::Comment(text));
        Ok(Claim::Jump(end))
    }
}

/// Keeps quoted strings intact: the whole literal, quotes and escapes included,
/// goes to the buffer without whitespace collapsing,
/// and none of its characters are seen by other plugins.
#[derive(Default)]
pub struct StringParserPlugin;

impl StringParserPlugin {
    /// Create the plugin.
    #[inline]
    pub fn new() -> StringParserPlugin {
        StringParserPlugin
    }
}

impl ParserPlugin for StringParserPlugin {
    fn trigger_chars(&self) -> &[char] {
        &['"', '\'']
    }

    fn trigger_states(&self) -> &[State] {
        BUILTIN_STATES
    }

    fn parse(
        &mut self,
        context: &mut ParserContext<'_>,
        index: usize,
        quote: char,
        _previous: Option<char>,
        _state: State,
    ) -> Result<Claim, ParseError> {
        let source = context.source();
        let mut position = index + 1;
        let end = loop {
            match source.get(position).copied() {
                Some(c) if c == quote => break position,
                // An escape swallows the next character, escaped newlines included.
                Some('\\') => position += 2,
                Some('\n') | None => {
                    return Err(context.new_error(ParseErrorKind::UnterminatedString))
                }
                Some(_) => position += 1,
            }
        };
        let literal: String = source[index..=end].iter().collect();
        context.append_to_buffer(&literal);
        Ok(Claim::Jump(end))
    }
}
