/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::collections::HashMap;
use std::fmt;
use std::ops::BitOr;

use smallvec::SmallVec;
use tracing::{debug, trace, warn};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ast::Token;
use crate::at_rules::{AtMediaParserPlugin, AtRuleParserPlugin};
use crate::comments_and_strings::{CommentParserPlugin, StringParserPlugin};
use crate::error::{ParseError, ParseErrorKind, SourceLocation};
use crate::rules_and_declarations::RulesetParserPlugin;

/// A lexical context of the scanner.
///
/// States form a stack; the top of the stack is the active state
/// that decides which plugins see the next character.
#[derive(Copy, Clone, PartialEq, Eq, Hash, Debug)]
pub enum State {
    /// Top level of the stylesheet.
    Document,
    /// Between `@media` and its `{`.
    AtMediaPrepare,
    /// Inside an `@media` block.
    AtMedia,
    /// After the first `,` of a selector list.
    RulesetSelectors,
    /// Inside a declaration block.
    Ruleset,
    /// Between the `:` and the end of a declaration.
    RulesetDeclaration,
    /// Between an at-keyword other than `@media` and its `;` or `{`.
    AtRulePrepare,
    /// Inside an at-rule block holding rulesets, such as `@keyframes`.
    AtRuleBlock,
    /// Inside an at-rule block holding declarations, such as `@font-face`.
    AtRuleDeclarations,
    /// Between the `:` and the end of a declaration of an at-rule block.
    AtRuleDeclaration,
    /// A state owned by a plugin outside this crate.
    Custom(&'static str),
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            State::Document => f.write_str("T_DOCUMENT"),
            State::AtMediaPrepare => f.write_str("T_AT_MEDIA::PREPARE"),
            State::AtMedia => f.write_str("T_AT_MEDIA"),
            State::RulesetSelectors => f.write_str("T_RULESET::SELECTORS"),
            State::Ruleset => f.write_str("T_RULESET"),
            State::RulesetDeclaration => f.write_str("T_RULESET_DECLARATION"),
            State::AtRulePrepare => f.write_str("T_AT_RULE::PREPARE"),
            State::AtRuleBlock => f.write_str("T_AT_RULE"),
            State::AtRuleDeclarations => f.write_str("T_AT_RULE::DECLARATIONS"),
            State::AtRuleDeclaration => f.write_str("T_AT_RULE_DECLARATION"),
            State::Custom(name) => f.write_str(name),
        }
    }
}

/// A set of characters trimmed by `ParserContext::get_and_clear_buffer`.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub struct Delimiters {
    bits: u8,
}

/// `Delimiters` constants.
#[allow(non_upper_case_globals, non_snake_case)]
pub mod Delimiter {
    use super::Delimiters;

    /// The empty delimiter set
    pub const None: Delimiters = Delimiters { bits: 0 };
    /// The delimiter set with only the `{` opening curly bracket
    pub const CurlyBracketBlock: Delimiters = Delimiters { bits: 1 << 1 };
    /// The delimiter set with only the `}` closing curly bracket
    pub const CloseCurlyBracket: Delimiters = Delimiters { bits: 1 << 2 };
    /// The delimiter set with only the `;` semicolon
    pub const Semicolon: Delimiters = Delimiters { bits: 1 << 3 };
    /// The delimiter set with only the `:` colon
    pub const Colon: Delimiters = Delimiters { bits: 1 << 4 };
    /// The delimiter set with only the `,` comma
    pub const Comma: Delimiters = Delimiters { bits: 1 << 5 };
}

impl BitOr<Delimiters> for Delimiters {
    type Output = Delimiters;

    #[inline]
    fn bitor(self, other: Delimiters) -> Delimiters {
        Delimiters {
            bits: self.bits | other.bits,
        }
    }
}

impl Delimiters {
    #[inline]
    fn contains(self, other: Delimiters) -> bool {
        (self.bits & other.bits) != 0
    }

    #[inline]
    fn from_char(c: char) -> Delimiters {
        match c {
            '{' => Delimiter::CurlyBracketBlock,
            '}' => Delimiter::CloseCurlyBracket,
            ';' => Delimiter::Semicolon,
            ':' => Delimiter::Colon,
            ',' => Delimiter::Comma,
            _ => Delimiter::None,
        }
    }

    /// Whether `c` is whitespace or one of these delimiters.
    #[inline]
    fn trims(self, c: char) -> bool {
        is_css_whitespace(c) || self.contains(Delimiters::from_char(c))
    }
}

#[inline]
pub(crate) fn is_css_whitespace(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r' | '\x0C')
}

/// What a plugin did with the character it was given.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Claim {
    /// The character was consumed; no other plugin sees it.
    Handled,
    /// The character is not for this plugin; the next candidate gets it.
    Declined,
    /// The plugin consumed everything up to and including this index.
    /// Scanning resumes right after it.
    Jump(usize),
}

/// The mutable state of one `Parser::parse` call, shared with every plugin.
pub struct ParserContext<'a> {
    source: &'a [char],
    index: usize,
    buffer: String,
    states: Vec<State>,
    tokens: Vec<Token>,
    media_types: Vec<String>,
    ambient_media_types: Vec<String>,
}

impl<'a> ParserContext<'a> {
    fn new(source: &'a [char], ambient_media_types: Vec<String>) -> ParserContext<'a> {
        ParserContext {
            source,
            index: 0,
            buffer: String::new(),
            states: vec![State::Document],
            tokens: Vec::new(),
            media_types: ambient_media_types.clone(),
            ambient_media_types,
        }
    }

    /// The whole input, for plugins that need to look ahead.
    #[inline]
    pub fn source(&self) -> &'a [char] {
        self.source
    }

    /// The active state.
    #[inline]
    pub fn state(&self) -> State {
        *self.states.last().unwrap_or(&State::Document)
    }

    /// Make `state` the active state.
    pub fn push_state(&mut self, state: State) {
        trace!(%state, index = self.index, "push state");
        self.states.push(state);
    }

    /// Leave the active state and return it.
    ///
    /// Panics when called on the initial `Document` state:
    /// a plugin may only pop states it pushed.
    pub fn pop_state(&mut self) -> State {
        if self.states.len() <= 1 {
            panic!("ParserContext::pop_state can not pop the document state");
        }
        let state = self.states.pop().unwrap_or(State::Document);
        trace!(%state, index = self.index, "pop state");
        state
    }

    /// Text accumulated since the buffer was last cleared.
    #[inline]
    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    /// Drop the text accumulated so far.
    #[inline]
    pub fn clear_buffer(&mut self) {
        self.buffer.clear()
    }

    /// Append `text` to the buffer as is, without whitespace collapsing.
    #[inline]
    pub fn append_to_buffer(&mut self, text: &str) {
        self.buffer.push_str(text)
    }

    /// Remove one trailing `c` from the buffer, if it ends with it.
    pub fn pop_from_buffer(&mut self, c: char) -> bool {
        if self.buffer.ends_with(c) {
            self.buffer.pop();
            true
        } else {
            false
        }
    }

    /// Take the buffer, with whitespace and `delimiters` trimmed from both ends,
    /// lower-cased in the ASCII range if `lowercase` is set.
    pub fn get_and_clear_buffer(&mut self, delimiters: Delimiters, lowercase: bool) -> String {
        let mut value = self.buffer.trim_matches(|c| delimiters.trims(c)).to_owned();
        if lowercase {
            value.make_ascii_lowercase();
        }
        self.buffer.clear();
        value
    }

    /// Add `token` to the output.
    #[inline]
    pub fn append_token(&mut self, token: Token) {
        trace!(?token, index = self.index, "append token");
        self.tokens.push(token)
    }

    /// The media types declarations are currently subject to.
    #[inline]
    pub fn media_types(&self) -> &[String] {
        &self.media_types
    }

    /// Make `media_types` apply to the declarations that follow.
    pub fn set_media_types(&mut self, media_types: Vec<String>) {
        self.media_types = media_types
    }

    /// Go back to the media types the parse started with.
    pub fn unset_media_types(&mut self) {
        self.media_types = self.ambient_media_types.clone()
    }

    /// The location of the character being dispatched.
    #[inline]
    pub fn current_source_location(&self) -> SourceLocation {
        SourceLocation::from_index(self.source, self.index)
    }

    /// Create an error of the given kind at the current location.
    pub fn new_error(&self, kind: ParseErrorKind) -> ParseError {
        ParseError {
            kind,
            location: self.current_source_location(),
        }
    }

    /// Default handling of a character no plugin claimed.
    fn accumulate(&mut self, c: char) {
        if is_css_whitespace(c) {
            if !self.buffer.is_empty() && !self.buffer.ends_with(' ') {
                self.buffer.push(' ');
            }
        } else {
            self.buffer.push(c);
        }
    }
}

/// A parser extension, consulted for the characters and states it declares.
pub trait ParserPlugin {
    /// Characters this plugin wants to see.
    fn trigger_chars(&self) -> &[char];

    /// States in which this plugin wants to see its trigger characters.
    fn trigger_states(&self) -> &[State];

    /// Handle `c`, found at `index` while `state` is active.
    fn parse(
        &mut self,
        context: &mut ParserContext<'_>,
        index: usize,
        c: char,
        previous: Option<char>,
        state: State,
    ) -> Result<Claim, ParseError>;

    /// Forget anything remembered from a previous parse.
    fn reset(&mut self) {}
}

/// Parser plugins in registration order, indexed by `(character, state)`.
#[derive(Default)]
pub struct ParserPluginRegistry {
    plugins: Vec<Box<dyn ParserPlugin>>,
    triggers: HashMap<(char, State), SmallVec<[usize; 4]>>,
}

impl ParserPluginRegistry {
    /// An empty registry.
    #[inline]
    pub fn new() -> ParserPluginRegistry {
        ParserPluginRegistry::default()
    }

    /// Add a plugin after all the already registered ones.
    pub fn register<P: ParserPlugin + 'static>(&mut self, plugin: P) {
        let position = self.plugins.len();
        for &c in plugin.trigger_chars() {
            for &state in plugin.trigger_states() {
                self.triggers.entry((c, state)).or_default().push(position);
            }
        }
        self.plugins.push(Box::new(plugin));
    }

    /// The number of registered plugins.
    #[inline]
    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    /// Whether no plugin is registered.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    fn reset(&mut self) {
        for plugin in &mut self.plugins {
            plugin.reset()
        }
    }

    /// Offer `c` to the candidate plugins until one claims it.
    fn dispatch(
        &mut self,
        context: &mut ParserContext<'_>,
        index: usize,
        c: char,
        previous: Option<char>,
        state: State,
    ) -> Result<Claim, ParseError> {
        let candidates = match self.triggers.get(&(c, state)) {
            Some(candidates) => candidates,
            None => return Ok(Claim::Declined),
        };
        for &position in candidates {
            match self.plugins[position].parse(context, index, c, previous, state)? {
                Claim::Declined => {}
                claim => {
                    trace!(index, %c, %state, plugin = position, ?claim, "claimed");
                    return Ok(claim);
                }
            }
        }
        Ok(Claim::Declined)
    }
}

/// Which built-in parser plugins to register, and the ambient media types.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct ParserOptions {
    /// Emit `Comment` tokens instead of treating comments as text.
    pub comments: bool,
    /// Keep quoted strings intact.
    pub strings: bool,
    /// Recognize `@media` blocks.
    pub at_media: bool,
    /// Recognize `@charset`, `@import` and the block at-rules
    /// `@font-face`, `@page`, `@keyframes` and `@supports`.
    pub at_rules: bool,
    /// Media types that apply to the whole stylesheet.
    pub media_types: Vec<String>,
}

impl Default for ParserOptions {
    fn default() -> ParserOptions {
        ParserOptions {
            comments: true,
            strings: true,
            at_media: true,
            at_rules: true,
            media_types: Vec::new(),
        }
    }
}

/// The scanning engine: turns CSS text into tokens by feeding it,
/// one character at a time, to the registered plugins.
pub struct Parser {
    plugins: ParserPluginRegistry,
    media_types: Vec<String>,
}

impl Default for Parser {
    fn default() -> Parser {
        Parser::with_options(&ParserOptions::default())
    }
}

impl Parser {
    /// A parser with all the built-in plugins.
    #[inline]
    pub fn new() -> Parser {
        Parser::default()
    }

    /// A parser with the built-in plugins selected by `options`.
    ///
    /// Strings come before comments, so that `/*` in a string stays literal,
    /// and the ruleset plugin comes last.
    pub fn with_options(options: &ParserOptions) -> Parser {
        let mut plugins = ParserPluginRegistry::new();
        if options.strings {
            plugins.register(StringParserPlugin::new());
        }
        if options.comments {
            plugins.register(CommentParserPlugin::new());
        }
        if options.at_media {
            plugins.register(AtMediaParserPlugin::new());
        }
        if options.at_rules {
            plugins.register(AtRuleParserPlugin::new());
        }
        plugins.register(RulesetParserPlugin::new());
        Parser::with_plugins(plugins, options.media_types.clone())
    }

    /// A parser with exactly the given plugins.
    #[inline]
    pub fn with_plugins(plugins: ParserPluginRegistry, media_types: Vec<String>) -> Parser {
        Parser {
            plugins,
            media_types,
        }
    }

    /// Add a plugin after the ones already registered.
    #[inline]
    pub fn register<P: ParserPlugin + 'static>(&mut self, plugin: P) {
        self.plugins.register(plugin)
    }

    /// Parse `input` into tokens.
    pub fn parse(&mut self, input: &str) -> Result<Vec<Token>, ParseError> {
        let source: Vec<char> = input.chars().collect();
        let mut context = ParserContext::new(&source, self.media_types.clone());
        self.plugins.reset();

        let mut index = 0;
        let mut previous = None;
        while let Some(&c) = source.get(index) {
            context.index = index;
            let state = context.state();
            match self.plugins.dispatch(&mut context, index, c, previous, state)? {
                Claim::Handled => {
                    previous = Some(c);
                    index += 1;
                }
                Claim::Declined => {
                    context.accumulate(c);
                    previous = Some(c);
                    index += 1;
                }
                Claim::Jump(last) => {
                    debug_assert!(last >= index, "plugins can not jump backwards");
                    let last = last.max(index);
                    previous = source.get(last).copied();
                    index = last + 1;
                }
            }
        }

        if !context.buffer.trim().is_empty() {
            warn!(text = %context.buffer, "input ended with unparsed text");
        }
        if context.states.len() > 1 {
            warn!(
                state = %context.state(),
                depth = context.states.len() - 1,
                "input ended inside an unclosed block"
            );
        }
        debug!(
            chars = source.len(),
            tokens = context.tokens.len(),
            "parsed stylesheet"
        );
        Ok(context.tokens)
    }
}
