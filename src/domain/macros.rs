/// Declares a model variant: a struct of default-valued fields on top of
/// [`ModelBase`](crate::domain::model::ModelBase).
///
/// ```ignore
/// small_models::declare_model! {
///     /// A city a place belongs to.
///     pub struct City {
///         pub name: String = String::new(),
///         pub state_id: String = String::new(),
///     }
/// }
/// ```
///
/// Field types must implement `Serialize` and `DeserializeOwned`; record values
/// that do not deserialize into the field type are kept as extra attributes.
#[macro_export]
macro_rules! declare_model {
    (
        $(#[$meta:meta])*
        $vis:vis struct $name:ident {
            $(
                $(#[$field_meta:meta])*
                $field_vis:vis $field:ident : $ty:ty = $default:expr
            ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq)]
        $vis struct $name {
            base: $crate::domain::model::ModelBase,
            $(
                $(#[$field_meta])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::domain::model::Model for $name {
            const TYPE_NAME: &'static str = stringify!($name);

            fn from_base(base: $crate::domain::model::ModelBase) -> Self {
                Self {
                    base,
                    $( $field: $default, )*
                }
            }

            fn base(&self) -> &$crate::domain::model::ModelBase {
                &self.base
            }

            fn base_mut(&mut self) -> &mut $crate::domain::model::ModelBase {
                &mut self.base
            }

            #[allow(unused_mut)]
            fn declared_fields(&self) -> $crate::domain::model::Record {
                let mut record = $crate::domain::model::Record::new();
                $(
                    record.insert(
                        stringify!($field),
                        $crate::__serde_json::to_value(&self.$field)
                            .unwrap_or($crate::__serde_json::Value::Null),
                    );
                )*
                record
            }

            #[allow(unused_variables)]
            fn set_field(
                &mut self,
                name: &str,
                value: $crate::__serde_json::Value,
            ) -> Option<$crate::__serde_json::Value> {
                $(
                    if name == stringify!($field) {
                        return match $crate::__serde_json::from_value::<$ty>(value.clone()) {
                            Ok(parsed) => {
                                self.$field = parsed;
                                None
                            }
                            Err(_) => Some(value),
                        };
                    }
                )*
                Some(value)
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str(&$crate::domain::model::DynModel::render(self))
            }
        }
    };
}
