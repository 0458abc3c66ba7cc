//! Macro generating driven-port error enums.
//!
//! Each variant names the domain [`ErrorCode`](crate::domain::ErrorCode) it
//! surfaces as, so services can propagate store failures with `?`.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )?
                    => $code:ident, $message:expr
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

            /// Domain error code this failure surfaces as.
            pub fn error_code(&self) -> $crate::domain::ErrorCode {
                match self {
                    $(
                        Self::$variant { .. } => $crate::domain::ErrorCode::$code,
                    )*
                }
            }
        }

        impl From<$name> for $crate::domain::Error {
            fn from(err: $name) -> Self {
                $crate::domain::Error::new(err.error_code(), err.to_string())
            }
        }
    };
}

pub(crate) use define_port_error;
