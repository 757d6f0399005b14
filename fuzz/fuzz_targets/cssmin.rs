#![no_main]

use cssmin::*;

const DEBUG: bool = false;

fn minify_tokens(input: &str) -> Option<String> {
    let mut tokens = Parser::new().parse(input).ok()?;
    let mut depth = 0usize;
    for token in &tokens {
        match *token {
            _ if token.is_block_start() => depth += 1,
            Token::RulesetEnd | Token::AtMediaEnd | Token::AtBlockEnd => {
                assert!(depth > 0, "block end without a start");
                depth -= 1;
            }
            _ => {}
        }
    }
    Minifier::new().minify(&mut tokens);
    Some(tokens.to_css_string())
}

fn fuzz(data: &str) {
    let minified = match minify_tokens(data) {
        Some(minified) => minified,
        None => return,
    };
    let reminified = minify_tokens(&minified);
    if DEBUG {
        println!("IN: {:?}", minified);
        println!("OUT: {:?}", reminified);
    }
    assert_eq!(
        Some(minified), reminified,
        "Minification should be idempotent"
    );
}

libfuzzer_sys::fuzz_target!(|data: &str| {
    fuzz(data);
});
