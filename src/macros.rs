//! Declarative implementations of the codec traits.

/// Implement [`Persist`](crate::Persist) and the value codec traits for a struct.
///
/// Every listed field needs a type implementing [`Encode`](crate::Encode),
/// [`Decode`](crate::Decode) and [`WireType`](crate::WireType); the struct
/// needs `Default` to be registered. The wire name of a field is its
/// identifier unless renamed with `as "Name"`.
///
/// ```ignore
/// persist! {
///     Stockpile = "game.Stockpile" {
///         count as "Count": Primitive,
///         items: Sequence,
///     }
///     hooks: [post_load]
/// }
/// ```
///
/// `hooks` may list `post_load` (requires [`PostLoad`](crate::PostLoad)) and
/// `state` (requires [`PersistState`](crate::PersistState)).
#[macro_export]
macro_rules! persist {
    (@name $field:ident) => {
        stringify!($field)
    };
    (@name $field:ident $wire:literal) => {
        $wire
    };
    (@hook post_load) => {
        fn post_load(&mut self) -> ::std::option::Option<&mut dyn $crate::PostLoad> {
            ::std::option::Option::Some(self)
        }
    };
    (@hook state) => {
        fn has_state(&self) -> bool {
            true
        }

        fn write_state(&self, state: &mut $crate::StateWriter<'_, '_>) -> $crate::Result<()> {
            <Self as $crate::PersistState>::write_state(self, state)
        }

        fn read_state(&mut self, state: &mut $crate::StateReader<'_, '_>) -> $crate::Result<()> {
            <Self as $crate::PersistState>::read_state(self, state)
        }
    };
    (
        $ty:ident = $type_name:literal {
            $( $field:ident $(as $wire:literal)? : $marker:ident ),* $(,)?
        }
        $( hooks: [ $( $hook:ident ),* $(,)? ] )?
    ) => {
        impl $crate::Named for $ty {
            const TYPE_NAME: &'static str = $type_name;
        }

        impl $crate::Persist for $ty {
            fn type_name(&self) -> &'static str {
                $type_name
            }

            fn fields(&self) -> &'static [$crate::FieldSpec] {
                const FIELDS: &[$crate::FieldSpec] = &[
                    $( $crate::FieldSpec::new(
                        $crate::persist!(@name $field $($wire)?),
                        $crate::Marker::$marker,
                    ), )*
                ];
                FIELDS
            }

            fn encode_field(
                &self,
                field: &$crate::FieldSpec,
                enc: &mut $crate::Encoder<'_>,
            ) -> $crate::Result<()> {
                $(
                    if field.name == $crate::persist!(@name $field $($wire)?) {
                        return enc.field(field, &self.$field);
                    }
                )*
                let _ = enc;
                ::std::result::Result::Err($crate::Error::other(::std::format!(
                    "{} has no field {}",
                    $type_name,
                    field.name
                )))
            }

            fn decode_field(
                &mut self,
                field: &$crate::FieldSpec,
                item: &$crate::Item,
                dec: &mut $crate::Decoder<'_>,
            ) -> $crate::Result<()> {
                $(
                    if field.name == $crate::persist!(@name $field $($wire)?) {
                        self.$field = dec.decode(item)?;
                        return Ok(());
                    }
                )*
                let _ = (item, dec);
                ::std::result::Result::Err($crate::Error::other(::std::format!(
                    "{} has no field {}",
                    $type_name,
                    field.name
                )))
            }

            $( $( $crate::persist!(@hook $hook); )* )?

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }

            fn as_any_mut(&mut self) -> &mut dyn ::std::any::Any {
                self
            }

            fn into_any(self: ::std::boxed::Box<Self>) -> ::std::boxed::Box<dyn ::std::any::Any> {
                self
            }
        }

        impl $crate::WireType for $ty {
            fn wire_type() -> ::std::borrow::Cow<'static, str> {
                ::std::borrow::Cow::Borrowed($type_name)
            }

            fn wire_kind() -> $crate::Kind {
                $crate::Kind::ClassStart
            }
        }

        impl $crate::Encode for $ty {
            fn encode(&self, name_hash: i32, enc: &mut $crate::Encoder<'_>) -> $crate::Result<()> {
                $crate::codec::encode_object(self, name_hash, enc)
            }
        }

        impl $crate::Decode for $ty {
            fn decode(item: &$crate::Item, dec: &mut $crate::Decoder<'_>) -> $crate::Result<Self> {
                $crate::codec::decode_typed::<Self>(item, dec)
            }
        }
    };
}

/// Implement [`PersistEnum`](crate::PersistEnum) and the value codec traits
/// for a fieldless enum with explicit, stable discriminants.
///
/// ```ignore
/// persist_enum! {
///     Biome = "game.Biome" { Plains = 0, Desert = 1 }
/// }
/// ```
#[macro_export]
macro_rules! persist_enum {
    ($ty:ident = $type_name:literal { $( $variant:ident = $value:literal ),* $(,)? }) => {
        impl $crate::PersistEnum for $ty {
            const TYPE_NAME: &'static str = $type_name;

            fn to_repr(self) -> i32 {
                match self {
                    $( Self::$variant => $value, )*
                }
            }

            fn from_repr(value: i32) -> ::std::option::Option<Self> {
                match value {
                    $( $value => ::std::option::Option::Some(Self::$variant), )*
                    _ => ::std::option::Option::None,
                }
            }
        }

        impl $crate::WireType for $ty {
            fn wire_type() -> ::std::borrow::Cow<'static, str> {
                ::std::borrow::Cow::Borrowed($type_name)
            }

            fn wire_kind() -> $crate::Kind {
                $crate::Kind::EnumStart
            }
        }

        impl $crate::Encode for $ty {
            fn encode(&self, name_hash: i32, enc: &mut $crate::Encoder<'_>) -> $crate::Result<()> {
                $crate::codec::encode_enum(*self, name_hash, enc)
            }
        }

        impl $crate::Decode for $ty {
            fn decode(item: &$crate::Item, dec: &mut $crate::Decoder<'_>) -> $crate::Result<Self> {
                $crate::codec::decode_enum::<Self>(item, dec)
            }
        }
    };
}
