/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use crate::ast::Token;
use crate::error::ParseError;
use crate::parser::{Claim, Delimiter, ParserContext, ParserPlugin, State};
use crate::rules_and_declarations::take_declaration;

#[inline]
fn is_name_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '-' || c == '_' || !c.is_ascii()
}

/// The name of the at-keyword whose `@` is at `index`, as written.
fn at_keyword_name(source: &[char], index: usize) -> String {
    source[index + 1..]
        .iter()
        .take_while(|&&c| is_name_char(c))
        .collect()
}

/// Parses `@media` blocks.
///
/// Rulesets inside the block are left to the ruleset plugin;
/// their declarations pick up the block's media types from the context.
#[derive(Default)]
pub struct AtMediaParserPlugin;

impl AtMediaParserPlugin {
    /// Create the plugin.
    #[inline]
    pub fn new() -> AtMediaParserPlugin {
        AtMediaParserPlugin
    }
}

impl ParserPlugin for AtMediaParserPlugin {
    fn trigger_chars(&self) -> &[char] {
        &['@', '{', '}']
    }

    fn trigger_states(&self) -> &[State] {
        &[State::Document, State::AtMediaPrepare, State::AtMedia]
    }

    fn parse(
        &mut self,
        context: &mut ParserContext<'_>,
        index: usize,
        c: char,
        _previous: Option<char>,
        state: State,
    ) -> Result<Claim, ParseError> {
        match (c, state) {
            ('@', State::Document) => {
                let name = at_keyword_name(context.source(), index);
                let is_media = match_ignore_ascii_case! { &name,
                    "media" => true,
                    _ => false,
                };
                if !is_media {
                    return Ok(Claim::Declined);
                }
                context.push_state(State::AtMediaPrepare);
                context.clear_buffer();
                return Ok(Claim::Jump(index + name.chars().count()));
            }
            ('{', State::AtMediaPrepare) => {
                let prelude = context.get_and_clear_buffer(Delimiter::CurlyBracketBlock, false);
                let media_types: Vec<String> = prelude
                    .split(',')
                    .map(str::trim)
                    .filter(|media_type| !media_type.is_empty())
                    .map(str::to_owned)
                    .collect();
                context.pop_state();
                context.push_state(State::AtMedia);
                context.set_media_types(media_types.clone());
                context.append_token(Token::AtMediaStart { media_types });
            }
            ('}', State::AtMedia) => {
                context.append_token(Token::AtMediaEnd);
                context.clear_buffer();
                context.pop_state();
                context.unset_media_types();
            }
            _ => return Ok(Claim::Declined),
        }
        Ok(Claim::Handled)
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum AtRuleKind {
    Charset,
    Import,
    /// The block holds declarations.
    Declarations,
    /// The block holds rulesets.
    Rulesets,
}

fn at_rule_kind(name: &str) -> Option<AtRuleKind> {
    match_ignore_ascii_case! { name,
        "charset" => Some(AtRuleKind::Charset),
        "import" => Some(AtRuleKind::Import),
        "font-face" | "page" => Some(AtRuleKind::Declarations),
        "keyframes" | "-webkit-keyframes" | "-moz-keyframes" | "-o-keyframes" | "supports" => {
            Some(AtRuleKind::Rulesets)
        },
        _ => None,
    }
}

/// Parses the at-rules other than `@media`.
///
/// * `@charset` and `@import` end at their `;`
///   and become `AtCharset` and `AtImport` tokens.
/// * `@font-face` and `@page` hold declarations,
///   which this plugin reads itself.
/// * `@keyframes` (vendor prefixed or not) and `@supports` hold rulesets,
///   which are left to the ruleset plugin.
///
/// Blocks are sent as `AtBlockStart`, their content, and `AtBlockEnd`.
/// Other at-keywords are declined and stay in the buffer as text.
#[derive(Default)]
pub struct AtRuleParserPlugin {
    keyword: String,
    kind: Option<AtRuleKind>,
    property: String,
}

impl AtRuleParserPlugin {
    /// Create the plugin.
    #[inline]
    pub fn new() -> AtRuleParserPlugin {
        AtRuleParserPlugin::default()
    }
}

impl ParserPlugin for AtRuleParserPlugin {
    fn trigger_chars(&self) -> &[char] {
        &['@', ';', '{', '}', ':']
    }

    fn trigger_states(&self) -> &[State] {
        &[
            State::Document,
            State::AtMedia,
            State::AtRulePrepare,
            State::AtRuleBlock,
            State::AtRuleDeclarations,
            State::AtRuleDeclaration,
        ]
    }

    fn parse(
        &mut self,
        context: &mut ParserContext<'_>,
        index: usize,
        c: char,
        _previous: Option<char>,
        state: State,
    ) -> Result<Claim, ParseError> {
        match (c, state) {
            ('@', State::Document) | ('@', State::AtMedia) | ('@', State::AtRuleBlock) => {
                let name = at_keyword_name(context.source(), index);
                let kind = match at_rule_kind(&name) {
                    Some(kind) => kind,
                    None => return Ok(Claim::Declined),
                };
                self.keyword = name.to_ascii_lowercase();
                self.kind = Some(kind);
                context.push_state(State::AtRulePrepare);
                context.clear_buffer();
                return Ok(Claim::Jump(index + name.chars().count()));
            }
            (';', State::AtRulePrepare) => {
                let prelude = context.get_and_clear_buffer(Delimiter::Semicolon, false);
                context.pop_state();
                self.keyword.clear();
                match self.kind.take() {
                    Some(AtRuleKind::Charset) => context.append_token(Token::AtCharset(prelude)),
                    Some(AtRuleKind::Import) => context.append_token(Token::AtImport(prelude)),
                    // A block at-rule cut short by `;` has nothing to send.
                    _ => {}
                }
            }
            ('{', State::AtRulePrepare) => {
                let block = match self.kind {
                    Some(AtRuleKind::Declarations) => State::AtRuleDeclarations,
                    Some(AtRuleKind::Rulesets) => State::AtRuleBlock,
                    _ => return Ok(Claim::Declined),
                };
                let prelude = context.get_and_clear_buffer(Delimiter::CurlyBracketBlock, false);
                self.kind = None;
                context.pop_state();
                context.push_state(block);
                context.append_token(Token::AtBlockStart {
                    keyword: std::mem::take(&mut self.keyword),
                    prelude,
                });
            }
            ('}', State::AtRuleBlock) | ('}', State::AtRuleDeclarations) => {
                context.clear_buffer();
                context.pop_state();
                context.append_token(Token::AtBlockEnd);
            }
            (':', State::AtRuleDeclarations) => {
                context.push_state(State::AtRuleDeclaration);
                self.property = context.get_and_clear_buffer(Delimiter::Colon | Delimiter::Semicolon, true);
            }
            (';', State::AtRuleDeclaration) | ('}', State::AtRuleDeclaration) => {
                let declaration = take_declaration(context, std::mem::take(&mut self.property));
                context.pop_state();
                context.append_token(Token::RulesetDeclaration(declaration));
                if c == '}' {
                    context.append_token(Token::AtBlockEnd);
                    context.pop_state();
                }
            }
            // Colons are common in at-rule values, e.g. `src: url(data:...)`.
            _ => return Ok(Claim::Declined),
        }
        Ok(Claim::Handled)
    }

    fn reset(&mut self) {
        self.keyword.clear();
        self.kind = None;
        self.property.clear();
    }
}
