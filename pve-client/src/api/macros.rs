/// Declare a typed handle wrapping a [`Resource`](crate::Resource).
macro_rules! handle {
    ($(#[$attr:meta])* $name:ident) => {
        $(#[$attr])*
        pub struct $name<'c, C: ?Sized> {
            resource: $crate::Resource<'c, C>,
        }

        impl<'c, C> $name<'c, C>
        where
            C: $crate::HttpApiClient + ?Sized,
        {
            pub(crate) fn new(resource: $crate::Resource<'c, C>) -> Self {
                Self { resource }
            }

            /// The generic handle on this path, for calls not covered by the typed methods.
            pub fn resource(&self) -> &$crate::Resource<'c, C> {
                &self.resource
            }

            pub fn path(&self) -> &str {
                self.resource.path()
            }
        }
    };
}

/// Parameter structs which map their members one to one.
macro_rules! api_params {
    ($($ty:ty),+ $(,)?) => {$(
        impl $crate::api::ApiParams for $ty {}
    )+};
}

/// Parameter structs with indexed groups (`net0`, `net1`, ...) besides their plain members.
///
/// The listed fields must be `#[serde(skip)]` maps from index to value.
macro_rules! indexed_params {
    ($ty:ty { $($field:ident),+ $(,)? }) => {
        impl $crate::api::ApiParams for $ty {
            fn to_parameters(&self) -> Result<$crate::Parameters, $crate::Error> {
                let mut params = $crate::Parameters::from_serialize(self)?;
                $(
                    $crate::add_indexed_parameter(
                        &mut params,
                        stringify!($field),
                        self.$field.as_ref(),
                    );
                )+
                Ok(params)
            }
        }
    };
}

/// String enums used as parameter values.
macro_rules! param_enum {
    ($($ty:ty),+ $(,)?) => {$(
        serde_plain::derive_display_from_serialize!($ty);
        serde_plain::derive_fromstr_from_deserialize!($ty);

        impl From<$ty> for $crate::ParamValue {
            fn from(value: $ty) -> Self {
                $crate::ParamValue::Str(value.to_string())
            }
        }
    )+};
}
