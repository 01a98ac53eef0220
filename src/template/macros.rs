//! Declaration macros for layouts and masters.

/// Declare a slide layout.
///
/// Fields marked `placeholder` fill the placeholders of a new slide in
/// declaration order; other fields are plain data. A field without a default
/// starts from `Default::default()`. `as "Name"` records the backend layout
/// the type stands for, and `extends Base` puts the placeholders of `Base`
/// first and dereferences to it.
///
/// # Examples
///
/// ```
/// use slidecraft::slide_layout;
/// use slidecraft::template::SlideLayout;
///
/// slide_layout! {
///     pub struct Cover as "Title Slide" {
///         placeholder title: String,
///         placeholder subtitle: Option<String>,
///     }
/// }
///
/// slide_layout! {
///     pub struct DatedCover extends Cover {
///         placeholder date: String = "today".to_string(),
///         audience: String,
///     }
/// }
///
/// assert_eq!(DatedCover::placeholder_names(), ["title", "subtitle", "date"]);
/// let cover = DatedCover::default();
/// assert_eq!(cover.date, "today");
/// assert_eq!(cover.title, "");
/// ```
#[macro_export]
macro_rules! slide_layout {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident $(as $backend:literal)? $(extends $base:ty)? {
            $($body:tt)*
        }
    ) => {
        $crate::slide_layout!(@munch
            [$(#[$meta])*] [$vis] [$name] [$($backend)?] [$($base)?]
            fields [] placeholders []
            $($body)*
        );
    };

    (@munch $meta:tt $vis:tt $name:tt $backend:tt $base:tt
        fields [$($fields:tt)*] placeholders [$($placeholders:tt)*]
    ) => {
        $crate::slide_layout!(@emit $meta $vis $name $backend $base
            fields [$($fields)*] placeholders [$($placeholders)*]
        );
    };

    (@munch $meta:tt $vis:tt $name:tt $backend:tt $base:tt
        fields [$($fields:tt)*] placeholders [$($placeholders:tt)*]
        $(#[$fmeta:meta])* placeholder $field:ident : $ty:ty $(= $default:expr)? $(, $($rest:tt)*)?
    ) => {
        $crate::slide_layout!(@munch $meta $vis $name $backend $base
            fields [$($fields)* {
                [$(#[$fmeta])*] $field ($ty) ($crate::slide_layout!(@default $($default)?))
            }]
            placeholders [$($placeholders)* {
                $field ($ty) ($crate::slide_layout!(@has_default $($default)?))
            }]
            $($($rest)*)?
        );
    };

    (@munch $meta:tt $vis:tt $name:tt $backend:tt $base:tt
        fields [$($fields:tt)*] placeholders [$($placeholders:tt)*]
        $(#[$fmeta:meta])* $field:ident : $ty:ty $(= $default:expr)? $(, $($rest:tt)*)?
    ) => {
        $crate::slide_layout!(@munch $meta $vis $name $backend $base
            fields [$($fields)* {
                [$(#[$fmeta])*] $field ($ty) ($crate::slide_layout!(@default $($default)?))
            }]
            placeholders [$($placeholders)*]
            $($($rest)*)?
        );
    };

    (@emit [$(#[$meta:meta])*] [$vis:vis] [$name:ident] [$($backend:literal)?] [$($base:ty)?]
        fields [$({ [$(#[$fmeta:meta])*] $field:ident ($ty:ty) ($default:expr) })*]
        placeholders [$({ $ph:ident ($ph_ty:ty) ($ph_default:expr) })*]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            $(pub base: $base,)?
            $($(#[$fmeta])* pub $field: $ty,)*
        }

        impl ::core::default::Default for $name {
            fn default() -> Self {
                Self {
                    $(base: <$base as ::core::default::Default>::default(),)?
                    $($field: $default,)*
                }
            }
        }

        $(
            impl ::core::ops::Deref for $name {
                type Target = $base;

                fn deref(&self) -> &$base {
                    &self.base
                }
            }

            impl ::core::ops::DerefMut for $name {
                fn deref_mut(&mut self) -> &mut $base {
                    &mut self.base
                }
            }
        )?

        impl $crate::template::SlideLayout for $name {
            const NAME: &'static str = ::core::stringify!($name);
            const BACKEND_NAME: ::core::option::Option<&'static str> =
                $crate::slide_layout!(@backend $($backend)?);

            fn placeholder_fields() -> ::std::vec::Vec<$crate::template::PlaceholderField> {
                #[allow(unused_mut)]
                let mut fields = ::std::vec::Vec::new();
                $(fields.extend(<$base as $crate::template::SlideLayout>::placeholder_fields());)?
                $(fields.push($crate::template::PlaceholderField::new(
                    ::core::stringify!($ph),
                    ::core::stringify!($ph_ty),
                    <$ph_ty as $crate::template::PlaceholderValue>::KIND,
                    $ph_default,
                ));)*
                fields
            }

            fn placeholder_values(&self) -> ::std::vec::Vec<$crate::adapter::PlaceholderContent> {
                #[allow(unused_mut)]
                let mut values = ::std::vec::Vec::new();
                $(values.extend(<$base as $crate::template::SlideLayout>::placeholder_values(&self.base));)?
                $(values.push($crate::template::PlaceholderValue::to_content(&self.$ph));)*
                values
            }
        }
    };

    (@default) => { ::core::default::Default::default() };
    (@default $default:expr) => { $default };
    (@has_default) => { false };
    (@has_default $default:expr) => { true };
    (@backend) => { ::core::option::Option::None };
    (@backend $backend:literal) => { ::core::option::Option::Some($backend) };
}

/// Declare a slide master.
///
/// Each `field: Layout` stands for the backend layout at the same position
/// among the layout fields. Fields marked `plain` are not layouts. `from`
/// names a deck whose first master is adopted: a string literal is resolved
/// against the directory of the declaring source file, a parenthesized
/// expression is used as it is. Without `from` the built-in deck is used.
///
/// For every layout field the master gets an accessor returning a
/// [`SlideLayoutProxy`](crate::template::SlideLayoutProxy).
///
/// # Examples
///
/// ```
/// use slidecraft::{slide_layout, slide_master};
/// use slidecraft::template::{MasterSource, SlideMaster};
///
/// slide_layout! {
///     pub struct Cover as "Title Slide" {
///         placeholder title: String,
///     }
/// }
///
/// slide_master! {
///     pub struct Deck {
///         cover: Cover,
///         plain theme: String,
///     }
/// }
///
/// assert_eq!(Deck::source(), MasterSource::Default);
/// assert_eq!(Deck::layout_field("cover")?.index, 0);
/// assert!(Deck::layout_field("theme").is_err());
/// # Ok::<(), slidecraft::Error>(())
/// ```
#[macro_export]
macro_rules! slide_master {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident $(from $source:tt)? {
            $($body:tt)*
        }
    ) => {
        $crate::slide_master!(@munch
            [$(#[$meta])*] [$vis] [$name] [$($source)?]
            index [0] fields [] layouts [] plains []
            $($body)*
        );
    };

    (@munch $meta:tt $vis:tt $name:tt $source:tt
        index [$($index:tt)*] fields [$($fields:tt)*] layouts [$($layouts:tt)*] plains [$($plains:tt)*]
    ) => {
        $crate::slide_master!(@emit $meta $vis $name $source
            fields [$($fields)*] layouts [$($layouts)*] plains [$($plains)*]
        );
    };

    (@munch $meta:tt $vis:tt $name:tt $source:tt
        index [$($index:tt)*] fields [$($fields:tt)*] layouts [$($layouts:tt)*] plains [$($plains:tt)*]
        $(#[$fmeta:meta])* plain $field:ident : $ty:ty $(, $($rest:tt)*)?
    ) => {
        $crate::slide_master!(@munch $meta $vis $name $source
            index [$($index)*]
            fields [$($fields)* { plain $field ($ty) }]
            layouts [$($layouts)*]
            plains [$($plains)* { [$(#[$fmeta])*] $field ($ty) }]
            $($($rest)*)?
        );
    };

    (@munch $meta:tt $vis:tt $name:tt $source:tt
        index [$($index:tt)*] fields [$($fields:tt)*] layouts [$($layouts:tt)*] plains [$($plains:tt)*]
        $(#[$fmeta:meta])* $field:ident : $ty:ty $(, $($rest:tt)*)?
    ) => {
        $crate::slide_master!(@munch $meta $vis $name $source
            index [$($index)* + 1]
            fields [$($fields)* { layout $field ($ty) ($($index)*) }]
            layouts [$($layouts)* { [$(#[$fmeta])*] $field ($ty) ($($index)*) }]
            plains [$($plains)*]
            $($($rest)*)?
        );
    };

    (@emit [$(#[$meta:meta])*] [$vis:vis] [$name:ident] $source:tt
        fields [$($field:tt)*]
        layouts [$({ [$(#[$lmeta:meta])*] $layout:ident ($layout_ty:ty) ($index:expr) })*]
        plains [$({ [$(#[$pmeta:meta])*] $plain:ident ($plain_ty:ty) })*]
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone)]
        $vis struct $name {
            binding: $crate::template::MasterBinding,
            $($(#[$pmeta])* pub $plain: $plain_ty,)*
        }

        impl $name {
            $(
                $(#[$lmeta])*
                pub fn $layout(&self) -> $crate::template::SlideLayoutProxy<$layout_ty> {
                    self.binding.proxy::<$layout_ty>($index)
                }
            )*
        }

        impl $crate::template::SlideMaster for $name {
            const NAME: &'static str = ::core::stringify!($name);

            fn fields() -> ::std::vec::Vec<$crate::template::MasterField> {
                ::std::vec![$($crate::slide_master!(@field $field)),*]
            }

            fn source() -> $crate::template::MasterSource {
                $crate::slide_master!(@source $source)
            }

            fn bind(binding: $crate::template::MasterBinding) -> Self {
                Self {
                    binding,
                    $($plain: ::core::default::Default::default(),)*
                }
            }

            fn binding(&self) -> &$crate::template::MasterBinding {
                &self.binding
            }
        }
    };

    (@field { layout $field:ident ($ty:ty) ($index:expr) }) => {
        $crate::template::MasterField::layout::<$ty>(::core::stringify!($field), $index)
    };
    (@field { plain $field:ident ($ty:ty) }) => {
        $crate::template::MasterField::plain(::core::stringify!($field), ::core::stringify!($ty))
    };

    (@source []) => { $crate::template::MasterSource::Default };
    (@source [($path:expr)]) => {
        $crate::template::MasterSource::File(::std::path::PathBuf::from($path))
    };
    (@source [$path:literal]) => {
        $crate::template::MasterSource::resolve(
            ::core::file!(),
            ::core::env!("CARGO_MANIFEST_DIR"),
            $path,
        )
    };
}
