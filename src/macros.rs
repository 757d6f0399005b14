/* This Source Code Form is subject to the terms of the Mozilla Public
 * License, v. 2.0. If a copy of the MPL was not distributed with this
 * file, You can obtain one at http://mozilla.org/MPL/2.0/. */

use std::mem::MaybeUninit;

/// Expands to a `match` expression with string patterns,
/// matching case-insensitively in the ASCII range.
///
/// The patterns must not contain ASCII upper case letters. (They must be already be lower-cased.)
///
/// # Example
///
/// ```rust
/// #[macro_use] extern crate cssmin;
///
/// # fn main() {}  // Make doctest not wrap everything in its own main
/// # fn dummy(at_keyword: &str) -> bool {
/// match_ignore_ascii_case! { at_keyword,
///     "media" => true,
///     "import" | "charset" => false,
///     _ => false,
/// }
/// # }
/// ```
#[macro_export]
macro_rules! match_ignore_ascii_case {
    ( $input:expr,
        $(
            $( $pattern: pat )|+ $( if $guard: expr )? => $then: expr
        ),+
        $(,)?
    ) => {
        {
            // Proc macros cannot expand to statements,
            // so the constant lives in a dummy module item.
            mod cssmin_internal {
                $crate::_cssmin_internal_max_len! {
                    $( $( $pattern )+ )+
                }
            }
            $crate::_cssmin_internal_to_lowercase!($input, cssmin_internal::MAX_LENGTH => lowercase);
            // "A" never matches a pattern: patterns are checked to be lower case.
            match lowercase.unwrap_or("A") {
                $(
                    $( $pattern )|+ $( if $guard )? => $then,
                )+
            }
        }
    };
}

/// Define a function `$name(&str) -> Option<&'static $ValueType>`
///
/// The function finds a match for the input string
/// in a [`phf` map](https://github.com/sfackler/rust-phf)
/// and returns a reference to the corresponding value.
/// Matching is case-insensitive in the ASCII range.
///
/// ## Example:
///
/// ```rust
/// #[macro_use] extern crate cssmin;
///
/// # fn main() {}  // Make doctest not wrap everything in its own main
///
/// fn short_hex(input: &str) -> Option<&'static str> {
///     ascii_case_insensitive_phf_map! {
///         keyword -> &'static str = {
///             "white" => "#fff",
///             "black" => "#000",
///         }
///     }
///     keyword(input).cloned()
/// }
/// ```
#[macro_export]
macro_rules! ascii_case_insensitive_phf_map {
    ($name: ident -> $ValueType: ty = { $( $key: tt => $value: expr ),+ }) => {
        ascii_case_insensitive_phf_map!($name -> $ValueType = { $( $key => $value, )+ })
    };
    ($name: ident -> $ValueType: ty = { $( $key: tt => $value: expr, )+ }) => {
        use $crate::_cssmin_internal_phf as phf;

        // See `match_ignore_ascii_case!` for why this is a module.
        mod cssmin_internal {
            $crate::_cssmin_internal_max_len! {
                $( $key )+
            }
        }

        static MAP: phf::Map<&'static str, $ValueType> = phf::phf_map! {
            $(
                $key => $value,
            )*
        };

        fn $name(input: &str) -> Option<&'static $ValueType> {
            $crate::_cssmin_internal_to_lowercase!(input, cssmin_internal::MAX_LENGTH => lowercase);
            lowercase.and_then(|s| MAP.get(s))
        }
    }
}

/// Implementation detail of match_ignore_ascii_case! and ascii_case_insensitive_phf_map! macros.
///
/// **This macro is not part of the public API. It can change or be removed between any versions.**
///
/// Define a local variable named `$output`
/// to the result of calling `_cssmin_internal_to_lowercase`
/// with a stack-allocated buffer of length `$BUFFER_SIZE`.
#[macro_export]
#[doc(hidden)]
macro_rules! _cssmin_internal_to_lowercase {
    ($input: expr, $BUFFER_SIZE: expr => $output: ident) => {
        let mut buffer = [::std::mem::MaybeUninit::<u8>::uninit(); $BUFFER_SIZE];
        let input: &str = $input;
        let $output = $crate::_cssmin_internal_to_lowercase(&mut buffer, input);
    };
}

/// Implementation detail of match_ignore_ascii_case! and ascii_case_insensitive_phf_map! macros.
///
/// **This function is not part of the public API. It can change or be removed between any versions.**
///
/// If `input` is larger than buffer, return `None`.
/// Otherwise, return `input` ASCII-lowercased, using `buffer` as temporary space if necessary.
#[doc(hidden)]
#[allow(non_snake_case)]
#[inline]
pub fn _cssmin_internal_to_lowercase<'a>(
    buffer: &'a mut [MaybeUninit<u8>],
    input: &'a str,
) -> Option<&'a str> {
    let buffer = buffer.get_mut(..input.len())?;

    #[cold]
    fn make_ascii_lowercase<'a>(
        buffer: &'a mut [MaybeUninit<u8>],
        input: &'a str,
        first_uppercase: usize,
    ) -> &'a str {
        // `u8` has the same layout as `MaybeUninit<u8>`.
        let input_bytes =
            unsafe { &*(input.as_bytes() as *const [u8] as *const [MaybeUninit<u8>]) };

        buffer.copy_from_slice(input_bytes);

        // Same layout, and every byte is now initialized.
        let buffer = unsafe { &mut *(buffer as *mut [MaybeUninit<u8>] as *mut [u8]) };

        buffer[first_uppercase..].make_ascii_lowercase();
        // A copy of a `&str`, ASCII-lowercased, is still well-formed UTF-8.
        unsafe { ::std::str::from_utf8_unchecked(buffer) }
    }

    Some(
        match input.bytes().position(|byte| byte.is_ascii_uppercase()) {
            Some(first_uppercase) => make_ascii_lowercase(buffer, input, first_uppercase),
            // common case: input is already lower-case
            None => input,
        },
    )
}
