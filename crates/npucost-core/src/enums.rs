//! Text-keyed enumerations.
//!
//! Every enumeration that ends up in a descriptor is contiguous from zero, knows its
//! cardinality (the width of its one-hot encoding) and has one canonical text key per
//! value. The text keys are the stable bridge between the present-day enumerations and
//! the older enumerations each descriptor interface was trained with.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::{CoreError, Result};

/// An enumeration with contiguous values and canonical text keys.
pub trait TextEnum: Copy + Eq + fmt::Debug + 'static {
    /// Enumeration name, used in diagnostics.
    const NAME: &'static str;
    /// All values, in index order.
    const VARIANTS: &'static [Self];
    /// Cardinality, the width of a one-hot encoding of this enumeration.
    const COUNT: usize = Self::VARIANTS.len();

    /// Position of this value, `0..COUNT`.
    fn index(self) -> usize;

    /// Canonical text key.
    fn as_text(self) -> &'static str;

    /// Text key to index map, built once on first use.
    fn inverse_map() -> &'static BTreeMap<&'static str, usize>;

    fn variants() -> &'static [Self] {
        Self::VARIANTS
    }

    /// Value at `index`, if any.
    fn from_index(index: usize) -> Option<Self> {
        Self::VARIANTS.get(index).copied()
    }

    /// Value whose canonical text is `text`, if any.
    fn from_text(text: &str) -> Option<Self> {
        Self::inverse_map().get(text).and_then(|&i| Self::from_index(i))
    }

    /// Parse a canonical text key.
    fn parse(text: &str) -> Result<Self> {
        Self::from_text(text).ok_or_else(|| CoreError::UnknownText {
            enumeration: Self::NAME,
            text: text.to_string(),
        })
    }

    /// Render the whole index to text map, e.g. `[ (0:UINT8) (1:INT8) ]`.
    fn describe_map() -> String {
        let mut out = String::from("[");
        for v in Self::VARIANTS {
            out.push_str(&format!(" ({}:{})", v.index(), v.as_text()));
        }
        out.push_str(" ]");
        out
    }
}

/// Declare a [`TextEnum`] together with its canonical text keys.
///
/// The generated type derives the usual value traits plus serde, serializing as its
/// text key. Crates using this macro must depend on `serde`.
///
/// ```
/// npucost_core::text_enum! {
///     /// Example.
///     pub enum Color {
///         Red => "RED",
///         Green => "GREEN",
///     }
/// }
/// use npucost_core::TextEnum;
/// assert_eq!(Color::COUNT, 2);
/// assert_eq!(Color::from_text("GREEN"), Some(Color::Green));
/// ```
#[macro_export]
macro_rules! text_enum {
    (
        $(#[$meta:meta])*
        $vis:vis enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $text:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash,
            serde::Serialize, serde::Deserialize,
        )]
        $vis enum $name {
            $( $(#[$vmeta])* #[serde(rename = $text)] $variant ),+
        }

        impl $crate::enums::TextEnum for $name {
            const NAME: &'static str = stringify!($name);
            const VARIANTS: &'static [Self] = &[ $( $name::$variant ),+ ];

            fn index(self) -> usize {
                self as usize
            }

            fn as_text(self) -> &'static str {
                match self {
                    $( $name::$variant => $text ),+
                }
            }

            fn inverse_map() -> &'static ::std::collections::BTreeMap<&'static str, usize> {
                static INVERSE: ::std::sync::OnceLock<::std::collections::BTreeMap<&'static str, usize>> =
                    ::std::sync::OnceLock::new();
                INVERSE.get_or_init(|| {
                    <Self as $crate::enums::TextEnum>::VARIANTS
                        .iter()
                        .map(|v| (
                            <Self as $crate::enums::TextEnum>::as_text(*v),
                            <Self as $crate::enums::TextEnum>::index(*v),
                        ))
                        .collect()
                })
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(<Self as $crate::enums::TextEnum>::as_text(*self))
            }
        }
    };
}
