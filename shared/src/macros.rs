/// String newtype whose `Debug` output never shows the contents.
#[macro_export]
macro_rules! secret_wrapper {
    ($name:ident) => {
        #[derive(Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);
        impl std::fmt::Debug for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}(***)", stringify!($name))
            }
        }
        impl<S: Into<String>> From<S> for $name {
            fn from(s: S) -> Self {
                Self(s.into())
            }
        }
        impl $name {
            pub fn expose(&self) -> &str {
                &self.0
            }
        }
    };
}
