/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::ast::{Declaration, Token};
use crate::error::{ParseError, ParseErrorKind};
use crate::parser::{Claim, Delimiter, ParserContext, ParserPlugin, State};

const IMPORTANT: &str = "!important";

/// Split a trailing `!important` off a declaration value.
///
/// The comparison is on the last ten characters, ignoring ASCII case.
pub fn parse_important(value: &str) -> (&str, bool) {
    if value.len() >= IMPORTANT.len() {
        let split = value.len() - IMPORTANT.len();
        if let Some(suffix) = value.get(split..) {
            if suffix.eq_ignore_ascii_case(IMPORTANT) {
                return (value[..split].trim(), true);
            }
        }
    }
    (value, false)
}

/// Parses rulesets: a selector list followed by a block of declarations.
///
/// Emits `RulesetStart`, then one `RulesetDeclaration` per declaration,
/// then `RulesetEnd`.
#[derive(Default)]
pub struct RulesetParserPlugin {
    selectors: Vec<String>,
    property: String,
}

impl RulesetParserPlugin {
    /// A plugin with no pending selectors.
    #[inline]
    pub fn new() -> RulesetParserPlugin {
        RulesetParserPlugin::default()
    }

    fn end_declaration(&mut self, context: &mut ParserContext<'_>, c: char) {
        let declaration = take_declaration(context, std::mem::take(&mut self.property));
        context.pop_state();
        context.append_token(Token::RulesetDeclaration(declaration));
        // A declaration ended by `}` ends its ruleset too.
        if c == '}' {
            context.append_token(Token::RulesetEnd);
            context.pop_state();
        }
    }
}

/// Build the declaration of `property` from the value in the buffer,
/// and clear the buffer.
pub(crate) fn take_declaration(context: &mut ParserContext<'_>, property: String) -> Declaration {
    let raw = context.get_and_clear_buffer(Delimiter::Semicolon | Delimiter::CloseCurlyBracket, false);
    let (value, important) = parse_important(&raw);
    Declaration {
        property,
        value: value.to_owned(),
        media_types: context.media_types().to_vec(),
        important,
    }
}

impl ParserPlugin for RulesetParserPlugin {
    fn trigger_chars(&self) -> &[char] {
        &[',', '{', '}', ':', ';']
    }

    fn trigger_states(&self) -> &[State] {
        &[
            State::Document,
            State::AtMedia,
            State::AtRuleBlock,
            State::RulesetSelectors,
            State::Ruleset,
            State::RulesetDeclaration,
        ]
    }

    fn parse(
        &mut self,
        context: &mut ParserContext<'_>,
        _index: usize,
        c: char,
        _previous: Option<char>,
        state: State,
    ) -> Result<Claim, ParseError> {
        let in_selectors = matches!(
            state,
            State::Document | State::AtMedia | State::AtRuleBlock | State::RulesetSelectors
        );
        match (c, state) {
            (',', _) if in_selectors => {
                if state != State::RulesetSelectors {
                    context.push_state(State::RulesetSelectors);
                }
                let selector = context.get_and_clear_buffer(Delimiter::Comma | Delimiter::CurlyBracketBlock, false);
                self.selectors.push(selector);
            }
            ('{', _) if in_selectors => {
                if !context.buffer().trim().is_empty() {
                    let selector = context.get_and_clear_buffer(Delimiter::Comma | Delimiter::CurlyBracketBlock, false);
                    self.selectors.push(selector);
                    if state == State::RulesetSelectors {
                        context.pop_state();
                    }
                    context.push_state(State::Ruleset);
                    let selectors = std::mem::take(&mut self.selectors);
                    context.append_token(Token::RulesetStart { selectors });
                }
            }
            (':', State::Ruleset) => {
                context.push_state(State::RulesetDeclaration);
                self.property = context.get_and_clear_buffer(Delimiter::Colon | Delimiter::Semicolon, true);
            }
            (':', State::RulesetDeclaration) => {
                // Internet Explorer filters look like `filter:progid:DXImageTransform...`
                if self.property == "filter" {
                    return Ok(Claim::Declined);
                }
                return Err(context.new_error(ParseErrorKind::UnterminatedDeclaration {
                    property: self.property.clone(),
                    buffer: context.buffer().trim().to_owned(),
                }));
            }
            (';', State::RulesetDeclaration) | ('}', State::RulesetDeclaration) => {
                self.end_declaration(context, c);
            }
            ('}', State::Ruleset) => {
                context.pop_state();
                context.clear_buffer();
                context.append_token(Token::RulesetEnd);
                self.property.clear();
                self.selectors.clear();
            }
            _ => return Ok(Claim::Declined),
        }
        Ok(Claim::Handled)
    }

    fn reset(&mut self) {
        self.selectors.clear();
        self.property.clear();
    }
}
