/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

extern crate proc_macro;

use proc_macro::TokenStream;

/// Input: string literal patterns (possibly wrapped in invisible groups by `macro_rules`)
/// and `_` wildcards, with no separator.
///
/// Output: a `MAX_LENGTH` constant with the length of the longest string.
///
/// Fails to compile if a string contains ASCII uppercase letters,
/// since the lookup side only ever sees lower-cased input.
#[allow(non_snake_case)]
#[proc_macro]
pub fn _cssmin_internal_max_len(input: TokenStream) -> TokenStream {
    struct Input {
        max_length: usize,
    }

    impl syn::parse::Parse for Input {
        fn parse(input: syn::parse::ParseStream) -> syn::parse::Result<Self> {
            let mut max_length = 0;
            while !input.is_empty() {
                if input.peek(syn::Token![_]) {
                    input.parse::<syn::Token![_]>()?;
                    continue;
                }
                let lit: syn::LitStr = input.parse()?;
                let value = lit.value();
                if value.to_ascii_lowercase() != value {
                    return Err(syn::Error::new(
                        lit.span(),
                        "string patterns must be given in ASCII lowercase",
                    ));
                }
                max_length = max_length.max(value.len());
            }
            Ok(Input { max_length })
        }
    }

    let Input { max_length } = syn::parse_macro_input!(input);
    quote::quote!(
        pub(super) const MAX_LENGTH: usize = #max_length;
    )
    .into()
}
