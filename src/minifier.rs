/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::collections::HashMap;

use smallvec::SmallVec;
use tracing::{debug, trace};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::ast::{Token, TokenType};
use crate::color::{CompressColorValues, ConvertNamedColors};

/// A token rewriting extension.
pub trait MinifierPlugin {
    /// The kinds of token this plugin rewrites.
    fn trigger_tokens(&self) -> &[TokenType];

    /// Rewrite `token` in place.
    ///
    /// Return `true` to keep the remaining plugins from seeing this token.
    fn apply(&mut self, token: &mut Token) -> bool;
}

/// Minifier plugins in registration order, indexed by token type.
#[derive(Default)]
pub struct MinifierPluginRegistry {
    plugins: Vec<Box<dyn MinifierPlugin>>,
    triggers: HashMap<TokenType, SmallVec<[usize; 4]>>,
}

impl MinifierPluginRegistry {
    /// An empty registry.
    #[inline]
    pub fn new() -> MinifierPluginRegistry {
        MinifierPluginRegistry::default()
    }

    /// Add a plugin after all the already registered ones.
    pub fn register<P: MinifierPlugin + 'static>(&mut self, plugin: P) {
        let position = self.plugins.len();
        for &token_type in plugin.trigger_tokens() {
            self.triggers.entry(token_type).or_default().push(position);
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

    fn apply(&mut self, token: &mut Token) {
        let candidates = match self.triggers.get(&token.token_type()) {
            Some(candidates) => candidates,
            None => return,
        };
        for &position in candidates {
            if self.plugins[position].apply(token) {
                trace!(plugin = position, ?token, "stopped at plugin");
                break;
            }
        }
    }
}

/// Which minification steps to run.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct MinifierOptions {
    /// Drop `Comment` tokens.
    pub remove_comments: bool,
    /// Drop rulesets and `@media` blocks with nothing inside.
    pub remove_empty_blocks: bool,
    /// Replace color names by shorter hex notations.
    pub convert_named_colors: bool,
    /// Replace `#aabbcc` by `#abc`.
    pub compress_color_values: bool,
}

impl Default for MinifierOptions {
    fn default() -> MinifierOptions {
        MinifierOptions {
            remove_comments: true,
            remove_empty_blocks: true,
            convert_named_colors: true,
            compress_color_values: true,
        }
    }
}

/// Rewrites a token sequence into a shorter equivalent one.
///
/// Filters run first and are the only step that removes tokens.
/// Plugins then rewrite the remaining tokens in place, in one pass.
pub struct Minifier {
    options: MinifierOptions,
    plugins: MinifierPluginRegistry,
}

impl Default for Minifier {
    fn default() -> Minifier {
        Minifier::with_options(MinifierOptions::default())
    }
}

impl Minifier {
    /// A minifier with every step enabled.
    #[inline]
    pub fn new() -> Minifier {
        Minifier::default()
    }

    /// A minifier running the steps enabled in `options`.
    pub fn with_options(options: MinifierOptions) -> Minifier {
        let mut plugins = MinifierPluginRegistry::new();
        if options.convert_named_colors {
            plugins.register(ConvertNamedColors::new());
        }
        if options.compress_color_values {
            plugins.register(CompressColorValues::new());
        }
        Minifier { options, plugins }
    }

    /// Add a plugin after the ones already registered.
    #[inline]
    pub fn register<P: MinifierPlugin + 'static>(&mut self, plugin: P) {
        self.plugins.register(plugin)
    }

    /// Filter `tokens`, then run the plugins over what is left.
    pub fn minify(&mut self, tokens: &mut Vec<Token>) {
        let before = tokens.len();
        if self.options.remove_comments {
            tokens.retain(|token| token.token_type() != TokenType::Comment);
        }
        if self.options.remove_empty_blocks {
            remove_empty_blocks(tokens);
        }
        for token in tokens.iter_mut() {
            self.plugins.apply(token);
        }
        debug!(before, after = tokens.len(), "minified tokens");
    }
}

/// Remove ruleset and `@media` start/end pairs with nothing in between.
///
/// A block left empty by removing its children is removed too.
/// Other at-rule blocks are kept: an empty `@keyframes` still defines its name.
fn remove_empty_blocks(tokens: &mut Vec<Token>) {
    let mut kept: Vec<Token> = Vec::with_capacity(tokens.len());
    for token in tokens.drain(..) {
        let closes_last = kept.last().map_or(false, |last| {
            last.is_closed_by(&token) && last.token_type() != TokenType::AtBlockStart
        });
        if closes_last {
            kept.pop();
            continue;
        }
        kept.push(token);
    }
    *tokens = kept;
}
