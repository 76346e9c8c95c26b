//! Helper macro for port error enums.
//!
//! Each variant gets a `thiserror` message and a snake_case constructor whose
//! fields accept anything convertible into the field type, so adapters can
//! write `ListingSourceError::query(err.to_string())`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
    };
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        pub enum LookupPortError {
            Unreachable => "store unreachable",
            Query { message: String } => "lookup failed: {message}",
            Missing { relation: String } => "relation {relation} does not exist",
            Timeout { message: String, seconds: u64 } => "lookup timed out after {seconds}s: {message}",
        }
    }

    #[test]
    fn unit_variants_get_constructors() {
        assert_eq!(LookupPortError::unreachable(), LookupPortError::Unreachable);
    }

    #[test]
    fn string_fields_accept_str() {
        let err = LookupPortError::missing("services");
        assert_eq!(err.to_string(), "relation services does not exist");
    }

    #[test]
    fn mixed_fields_keep_their_types() {
        let err = LookupPortError::timeout("pool exhausted", 5_u64);
        assert_eq!(err.to_string(), "lookup timed out after 5s: pool exhausted");
        assert!(matches!(err, LookupPortError::Timeout { seconds: 5, .. }));
    }
}
