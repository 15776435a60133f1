//! Helper macro for port error enums.
//!
//! Every port error variant carries a `message` describing the adapter-side
//! failure; the macro derives the `thiserror` plumbing and snake_case
//! constructors so adapters stay terse.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant {
                    /// Adapter-side failure detail.
                    message: String,
                },
            )*
        }

        impl $name {
            ::paste::paste! {
                $(
                    #[doc = concat!("Construct [`Self::", stringify!($variant), "`].")]
                    pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                        Self::$variant { message: message.into() }
                    }
                )*
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    define_port_error! {
        /// Example error for macro coverage.
        pub enum ExamplePortError {
            /// Connection-flavoured failure.
            Connection => "connect: {message}",
            /// Query-flavoured failure.
            Query => "query: {message}",
        }
    }

    #[test]
    fn constructors_accept_str() {
        let error = ExamplePortError::connection("refused");
        assert_eq!(error.to_string(), "connect: refused");
    }

    #[test]
    fn variants_format_their_messages() {
        let error = ExamplePortError::query("bad filter");
        assert_eq!(error.to_string(), "query: bad filter");
    }
}
