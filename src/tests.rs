/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use serde_json::{self, json, Value};
use tracing_test::traced_test;

use super::{
    minify, Claim, CompressColorValues, CssError, Minifier, MinifierOptions, MinifierPlugin,
    ParseError, ParseErrorKind, Parser, ParserContext, ParserOptions, ParserPlugin,
    ParserPluginRegistry, RulesetParserPlugin, SourceLocation, State, ToCss, Token, TokenType,
};

fn assert_json_eq(results: Value, expected: Value, message: &str) {
    if results != expected {
        println!(
            "{}",
            ::difference::Changeset::new(
                &serde_json::to_string_pretty(&results).unwrap(),
                &serde_json::to_string_pretty(&expected).unwrap(),
                "\n",
            )
        );
        panic!("{}", message)
    }
}

fn run_raw_json_tests<F: Fn(Value, Value)>(json_data: &str, run: F) {
    let items = match serde_json::from_str(json_data) {
        Ok(Value::Array(items)) => items,
        other => panic!("Invalid JSON: {:?}", other),
    };
    assert!(items.len() % 2 == 0);
    let mut input = None;
    for item in items.into_iter() {
        match (&input, item) {
            (&None, json_obj) => input = Some(json_obj),
            (&Some(_), expected) => {
                let input = input.take().unwrap();
                run(input, expected)
            }
        };
    }
}

fn run_json_tests<F: Fn(&str) -> Value>(json_data: &str, parse: F) {
    run_raw_json_tests(json_data, |input, expected| match input {
        Value::String(input) => {
            let result = parse(&input);
            assert_json_eq(result, expected, &input);
        }
        _ => panic!("Unexpected JSON"),
    });
}

fn token_to_json(token: &Token) -> Value {
    match *token {
        Token::RulesetStart { ref selectors } => json!(["ruleset-start", selectors]),
        Token::RulesetDeclaration(ref declaration) => json!([
            "declaration",
            declaration.property,
            declaration.value,
            declaration.important,
            declaration.media_types,
        ]),
        Token::RulesetEnd => json!(["ruleset-end"]),
        Token::AtMediaStart { ref media_types } => json!(["media-start", media_types]),
        Token::AtMediaEnd => json!(["media-end"]),
        Token::Comment(ref text) => json!(["comment", text]),
        Token::AtCharset(ref charset) => json!(["charset", charset]),
        Token::AtImport(ref import) => json!(["import", import]),
        Token::AtBlockStart {
            ref keyword,
            ref prelude,
        } => json!(["at-block-start", keyword, prelude]),
        Token::AtBlockEnd => json!(["at-block-end"]),
    }
}

fn error_to_json(error: &ParseError) -> Value {
    json!([
        "error",
        error.kind.to_string(),
        error.location.line,
        error.location.column,
    ])
}

fn parse_to_json(parser: &mut Parser, input: &str) -> Value {
    match parser.parse(input) {
        Ok(tokens) => Value::Array(tokens.iter().map(token_to_json).collect()),
        Err(error) => error_to_json(&error),
    }
}

fn parse(input: &str) -> Vec<Token> {
    Parser::new().parse(input).unwrap()
}

#[test]
fn rulesets() {
    run_json_tests(include_str!("css-minifier-tests/rulesets.json"), |input| {
        parse_to_json(&mut Parser::new(), input)
    });
}

#[test]
fn minified_stylesheets() {
    run_json_tests(include_str!("css-minifier-tests/minify.json"), |input| {
        match minify(input) {
            Ok(css) => Value::String(css),
            Err(error) => error_to_json(&error),
        }
    });
}

#[test]
fn minification_is_idempotent() {
    run_raw_json_tests(include_str!("css-minifier-tests/minify.json"), |_, expected| {
        let once = expected.as_str().unwrap();
        let twice = minify(once).unwrap();
        assert_eq!(twice, once);

        let mut tokens = parse(once);
        let mut minifier = Minifier::new();
        minifier.minify(&mut tokens);
        let snapshot = tokens.clone();
        minifier.minify(&mut tokens);
        assert_eq!(tokens, snapshot);
    });
}

#[test]
fn ruleset_starts_and_ends_are_balanced() {
    let css = "a{b:c}@media print{d,e{f:g;h:i}j{}}k{l:m !important}";
    let mut depth = 0i32;
    let mut rulesets = 0;
    for token in parse(css) {
        match token {
            Token::RulesetStart { .. } => {
                depth += 1;
                rulesets += 1;
                assert_eq!(depth, 1, "rulesets do not nest");
            }
            Token::RulesetEnd => {
                depth -= 1;
                assert!(depth >= 0);
            }
            _ => {}
        }
    }
    assert_eq!(depth, 0);
    assert_eq!(rulesets, 4);
}

#[test]
fn canonical_ruleset() {
    assert_eq!(
        parse("a,b{color:#aabbcc;}"),
        vec![
            Token::RulesetStart {
                selectors: vec!["a".to_owned(), "b".to_owned()]
            },
            Token::RulesetDeclaration(super::Declaration {
                property: "color".to_owned(),
                value: "#aabbcc".to_owned(),
                media_types: vec![],
                important: false,
            }),
            Token::RulesetEnd,
        ]
    );
}

#[test]
fn compress_color_values() {
    fn compress(value: &str) -> String {
        let mut token = Token::RulesetDeclaration(super::Declaration {
            property: "color".to_owned(),
            value: value.to_owned(),
            media_types: vec![],
            important: false,
        });
        assert!(!CompressColorValues::new().apply(&mut token));
        token.declaration().unwrap().value.clone()
    }

    assert_eq!(compress("#aabbcc"), "#abc");
    assert_eq!(compress("#a1b2c3"), "#a1b2c3");
    assert_eq!(compress("#abc"), "#abc");
    assert_eq!(compress("#AaBbCc"), "#abc");
    assert_eq!(compress("1px solid #001122"), "1px solid #012");
    assert_eq!(compress("#aabbccdd"), "#aabbccdd");
    assert_eq!(compress("\"#aabbcc\" #aabbcc"), "\"#aabbcc\" #abc");
    assert_eq!(compress("url(#aabbcc)"), "url(#aabbcc)");
    assert_eq!(compress("none"), "none");
}

#[test]
fn color_plugins_ignore_other_tokens() {
    let mut token = Token::RulesetStart {
        selectors: vec!["#aabbcc".to_owned()],
    };
    assert!(!CompressColorValues::new().apply(&mut token));
    assert_eq!(
        token,
        Token::RulesetStart {
            selectors: vec!["#aabbcc".to_owned()]
        }
    );
}

#[test]
fn ambient_media_types() {
    let options = ParserOptions {
        media_types: vec!["print".to_owned()],
        ..ParserOptions::default()
    };
    let tokens = Parser::with_options(&options)
        .parse("a{b:c}@media screen{d{e:f}}g{h:i}")
        .unwrap();
    let media_types: Vec<Vec<String>> = tokens
        .iter()
        .filter_map(Token::declaration)
        .map(|declaration| declaration.media_types.clone())
        .collect();
    assert_eq!(
        media_types,
        vec![
            vec!["print".to_owned()],
            vec!["screen".to_owned()],
            vec!["print".to_owned()],
        ]
    );
}

#[test]
fn disabled_comment_plugin_leaves_comments_as_text() {
    let options = ParserOptions {
        comments: false,
        ..ParserOptions::default()
    };
    let mut parser = Parser::with_options(&options);
    assert_json_eq(
        parse_to_json(&mut parser, "/*x*/a{b:c}"),
        json!([
            ["ruleset-start", ["/*x*/a"]],
            ["declaration", "b", "c", false, []],
            ["ruleset-end"]
        ]),
        "comments disabled",
    );
}

#[test]
fn disabled_at_rule_plugin_leaves_at_rules_as_text() {
    let options = ParserOptions {
        at_rules: false,
        ..ParserOptions::default()
    };
    let tokens = Parser::with_options(&options)
        .parse("@page{margin:0}")
        .unwrap();
    assert_eq!(
        tokens[0],
        Token::RulesetStart {
            selectors: vec!["@page".to_owned()]
        }
    );
}

#[test]
#[traced_test]
fn trailing_text_is_reported() {
    let tokens = parse("a{b:c}d e");
    assert_eq!(tokens.len(), 3);
    assert!(logs_contain("input ended with unparsed text"));
}

#[test]
fn parser_is_reset_between_parses() {
    let mut parser = Parser::new();
    let first = parser.parse("a,").unwrap();
    assert!(first.is_empty());
    let second = parser.parse("b{c:d}").unwrap();
    assert_eq!(
        second[0],
        Token::RulesetStart {
            selectors: vec!["b".to_owned()]
        }
    );
}

/// Swallows every comma of the document.
struct CommaEater;

impl ParserPlugin for CommaEater {
    fn trigger_chars(&self) -> &[char] {
        &[',']
    }

    fn trigger_states(&self) -> &[State] {
        &[State::Document]
    }

    fn parse(
        &mut self,
        _context: &mut ParserContext<'_>,
        _index: usize,
        _c: char,
        _previous: Option<char>,
        _state: State,
    ) -> Result<Claim, ParseError> {
        Ok(Claim::Handled)
    }
}

#[test]
fn first_registered_plugin_wins() {
    let mut plugins = ParserPluginRegistry::new();
    plugins.register(CommaEater);
    plugins.register(RulesetParserPlugin::new());
    let mut parser = Parser::with_plugins(plugins, vec![]);
    assert_eq!(
        parser.parse("a,b{}").unwrap()[0],
        Token::RulesetStart {
            selectors: vec!["ab".to_owned()]
        }
    );

    let mut plugins = ParserPluginRegistry::new();
    plugins.register(RulesetParserPlugin::new());
    plugins.register(CommaEater);
    let mut parser = Parser::with_plugins(plugins, vec![]);
    assert_eq!(
        parser.parse("a,b{}").unwrap()[0],
        Token::RulesetStart {
            selectors: vec!["a".to_owned(), "b".to_owned()]
        }
    );
}

/// Skips everything between `<` and `>` in the document.
struct AngleSkipper;

impl ParserPlugin for AngleSkipper {
    fn trigger_chars(&self) -> &[char] {
        &['<']
    }

    fn trigger_states(&self) -> &[State] {
        &[State::Document]
    }

    fn parse(
        &mut self,
        context: &mut ParserContext<'_>,
        index: usize,
        _c: char,
        _previous: Option<char>,
        _state: State,
    ) -> Result<Claim, ParseError> {
        match context.source()[index..].iter().position(|&c| c == '>') {
            Some(offset) => Ok(Claim::Jump(index + offset)),
            None => Ok(Claim::Declined),
        }
    }
}

#[test]
fn plugins_can_jump_ahead() {
    let mut parser = Parser::new();
    parser.register(AngleSkipper);
    assert_eq!(
        parser.parse("a<{,}>b{}").unwrap()[0],
        Token::RulesetStart {
            selectors: vec!["ab".to_owned()]
        }
    );
}

/// Pops a state it never pushed.
struct DocumentPopper;

impl ParserPlugin for DocumentPopper {
    fn trigger_chars(&self) -> &[char] {
        &['!']
    }

    fn trigger_states(&self) -> &[State] {
        &[State::Document]
    }

    fn parse(
        &mut self,
        context: &mut ParserContext<'_>,
        _index: usize,
        _c: char,
        _previous: Option<char>,
        _state: State,
    ) -> Result<Claim, ParseError> {
        context.pop_state();
        Ok(Claim::Handled)
    }
}

#[test]
#[should_panic(expected = "can not pop the document state")]
fn popping_the_document_state_panics() {
    let mut parser = Parser::new();
    parser.register(DocumentPopper);
    let _ = parser.parse("!");
}

/// Rewrites every declaration value, optionally stopping the pipeline.
struct Overwrite {
    stop: bool,
}

impl MinifierPlugin for Overwrite {
    fn trigger_tokens(&self) -> &[TokenType] {
        &[TokenType::RulesetDeclaration]
    }

    fn apply(&mut self, token: &mut Token) -> bool {
        if let Some(declaration) = token.declaration_mut() {
            declaration.value = "#ffffff".to_owned();
        }
        self.stop
    }
}

#[test]
fn minifier_plugin_can_stop_the_pipeline() {
    for &(stop, expected) in &[(true, "a{b:#ffffff}"), (false, "a{b:#fff}")] {
        let mut minifier = Minifier::with_options(MinifierOptions {
            convert_named_colors: false,
            compress_color_values: false,
            ..MinifierOptions::default()
        });
        minifier.register(Overwrite { stop });
        minifier.register(CompressColorValues::new());
        let mut tokens = parse("a{b:c}");
        minifier.minify(&mut tokens);
        assert_eq!(tokens.to_css_string(), expected);
    }
}

#[test]
fn minifier_options() {
    let mut tokens = parse("/*x*/a{color:white;border-color:#aabbcc}b{}");
    Minifier::with_options(MinifierOptions {
        remove_comments: false,
        remove_empty_blocks: false,
        convert_named_colors: false,
        compress_color_values: false,
    })
    .minify(&mut tokens);
    assert_eq!(
        tokens.to_css_string(),
        "/*x*/a{color:white;border-color:#aabbcc}b{}"
    );
}

#[test]
fn serialization() {
    let tokens = parse("@media screen,print{a,b{c:d;e:f !important}}");
    assert_eq!(
        tokens.to_css_string(),
        "@media screen,print{a,b{c:d;e:f!important}}"
    );
    assert_eq!(tokens[2].to_css_string(), "c:d;");
}

#[test]
fn parse_error_display() {
    let error = Parser::new().parse("a{color:red}\nb{x:y:z}").unwrap_err();
    assert_eq!(
        error,
        ParseError {
            kind: ParseErrorKind::UnterminatedDeclaration {
                property: "x".to_owned(),
                buffer: "y".to_owned(),
            },
            location: SourceLocation { line: 2, column: 6 },
        }
    );
    assert_eq!(
        error.to_string(),
        "Unterminated declaration, x: y at line 2, column 6"
    );
    assert!(minify("a{color:red}\nb{x:y:z}").is_err());
}

#[test]
fn css_error_rendering() {
    assert_eq!(
        CssError::new("style.css", 3, "Unterminated declaration", "").to_string(),
        "Unterminated declaration in file style.css at line 3"
    );
    assert_eq!(
        CssError::new("style.css", 3, "Unterminated declaration", "a{b:c:d}").to_string(),
        "Unterminated declaration: a{b:c:d} in file style.css at line 3"
    );

    let input = "a{color:red}\n  b{x:y:z}\n";
    let error = Parser::new().parse(input).unwrap_err();
    let report = error.to_css_error("x.css", input);
    assert_eq!(
        report,
        CssError {
            file: "x.css".to_owned(),
            line: 2,
            message: "Unterminated declaration, x: y".to_owned(),
            source: "b{x:y:z}".to_owned(),
        }
    );
    assert_eq!(
        report.to_string(),
        "Unterminated declaration, x: y: b{x:y:z} in file x.css at line 2"
    );
}

#[test]
fn named_color_lookup() {
    use super::short_hex_for_color_keyword;

    assert_eq!(short_hex_for_color_keyword("white"), Some("#fff"));
    assert_eq!(short_hex_for_color_keyword("WhiteSmoke"), Some("#f5f5f5"));
    assert_eq!(short_hex_for_color_keyword("red"), None);
    assert_eq!(short_hex_for_color_keyword("notacolor"), None);
    assert_eq!(
        short_hex_for_color_keyword("lightgoldenrodyellowbazinga"),
        None
    );
}

#[test]
fn state_names() {
    assert_eq!(State::RulesetSelectors.to_string(), "T_RULESET::SELECTORS");
    assert_eq!(State::AtRuleBlock.to_string(), "T_AT_RULE");
    assert_eq!(State::Custom("T_FOO").to_string(), "T_FOO");
}

#[cfg(feature = "serde")]
#[test]
fn options_deserialize_with_defaults() {
    let options: MinifierOptions = serde_json::from_str(r#"{"remove_comments": false}"#).unwrap();
    assert_eq!(
        options,
        MinifierOptions {
            remove_comments: false,
            ..MinifierOptions::default()
        }
    );
    let options: ParserOptions = serde_json::from_str(r#"{"media_types": ["print"]}"#).unwrap();
    assert!(options.comments);
    assert_eq!(options.media_types, vec!["print".to_owned()]);
}
